//! Additional engagement indexes
//!
//! The view-dedup probe filters on (agent_id, user_id, viewed_at >= cutoff),
//! and admin dashboard recents scan by timestamp.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_agent_views_dedup")
                    .table(AgentViews::Table)
                    .col(AgentViews::AgentId)
                    .col(AgentViews::UserId)
                    .col(AgentViews::ViewedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_agent_views_viewed_at")
                    .table(AgentViews::Table)
                    .col(AgentViews::ViewedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_agent_clicks_clicked_at")
                    .table(AgentClicks::Table)
                    .col(AgentClicks::ClickedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_agent_clicks_clicked_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_agent_views_viewed_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_agent_views_dedup").to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AgentViews {
    #[sea_orm(iden = "agent_views")]
    Table,
    AgentId,
    UserId,
    ViewedAt,
}

#[derive(DeriveIden)]
enum AgentClicks {
    #[sea_orm(iden = "agent_clicks")]
    Table,
    ClickedAt,
}
