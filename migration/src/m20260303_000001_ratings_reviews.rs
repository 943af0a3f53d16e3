//! Ratings and reviews tables migration
//!
//! Both tables are unique per (agent_id, user_id): a resubmission is an
//! update, never a second row. The unique index on agent_ratings also backs
//! the ON CONFLICT upsert path.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AgentRatings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AgentRatings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AgentRatings::AgentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentRatings::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentRatings::Rating)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentRatings::RatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_agent_ratings_agent_user")
                    .table(AgentRatings::Table)
                    .col(AgentRatings::AgentId)
                    .col(AgentRatings::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AgentReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AgentReviews::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AgentReviews::AgentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentReviews::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentReviews::Rating)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AgentReviews::ReviewText).text().not_null())
                    .col(
                        ColumnDef::new(AgentReviews::HelpfulCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AgentReviews::ReviewedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentReviews::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_agent_reviews_agent_user")
                    .table(AgentReviews::Table)
                    .col(AgentReviews::AgentId)
                    .col(AgentReviews::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_agent_reviews_agent_user")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(AgentReviews::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_agent_ratings_agent_user")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(AgentRatings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AgentRatings {
    #[sea_orm(iden = "agent_ratings")]
    Table,
    Id,
    AgentId,
    UserId,
    Rating,
    RatedAt,
}

#[derive(DeriveIden)]
enum AgentReviews {
    #[sea_orm(iden = "agent_reviews")]
    Table,
    Id,
    AgentId,
    UserId,
    Rating,
    ReviewText,
    HelpfulCount,
    ReviewedAt,
    UpdatedAt,
}
