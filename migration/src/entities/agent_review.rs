//! Review entity, one row per (agent, user)
//!
//! The rating value is denormalized into the review for display; the
//! authoritative aggregate lives in agent_ratings.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "agent_reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub agent_id: i64,
    pub user_id: i64,
    pub rating: i16,
    #[sea_orm(column_type = "Text")]
    pub review_text: String,
    pub helpful_count: i64,
    pub reviewed_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
