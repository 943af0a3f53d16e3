pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260301_000001_users_table;
mod m20260301_000002_agents_table;
mod m20260302_000001_engagement_tables;
mod m20260303_000001_ratings_reviews;
mod m20260305_000001_engagement_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_users_table::Migration),
            Box::new(m20260301_000002_agents_table::Migration),
            Box::new(m20260302_000001_engagement_tables::Migration),
            Box::new(m20260303_000001_ratings_reviews::Migration),
            Box::new(m20260305_000001_engagement_indexes::Migration),
        ]
    }
}
