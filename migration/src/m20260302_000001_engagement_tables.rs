//! Engagement event tables migration
//!
//! Creates the three raw event tables:
//! - agent_views: one row per counted view (deduplicated at write time)
//! - agent_clicks: one row per click, no dedup
//! - agent_sessions: one row per accepted session (> 1s)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AgentViews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AgentViews::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AgentViews::AgentId).big_integer().not_null())
                    .col(ColumnDef::new(AgentViews::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(AgentViews::ViewedAt)
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
                    .name("idx_agent_views_agent")
                    .table(AgentViews::Table)
                    .col(AgentViews::AgentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AgentClicks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AgentClicks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AgentClicks::AgentId).big_integer().not_null())
                    .col(ColumnDef::new(AgentClicks::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(AgentClicks::ClickType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AgentClicks::Referrer).text().null())
                    .col(
                        ColumnDef::new(AgentClicks::ClickedAt)
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
                    .name("idx_agent_clicks_agent")
                    .table(AgentClicks::Table)
                    .col(AgentClicks::AgentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AgentSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AgentSessions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AgentSessions::AgentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentSessions::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentSessions::SessionStart)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentSessions::SessionEnd)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentSessions::DurationSeconds)
                            .double()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_agent_sessions_agent")
                    .table(AgentSessions::Table)
                    .col(AgentSessions::AgentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_agent_sessions_agent").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AgentSessions::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_agent_clicks_agent").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AgentClicks::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_agent_views_agent").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AgentViews::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AgentViews {
    #[sea_orm(iden = "agent_views")]
    Table,
    Id,
    AgentId,
    UserId,
    ViewedAt,
}

#[derive(DeriveIden)]
enum AgentClicks {
    #[sea_orm(iden = "agent_clicks")]
    Table,
    Id,
    AgentId,
    UserId,
    ClickType,
    Referrer,
    ClickedAt,
}

#[derive(DeriveIden)]
enum AgentSessions {
    #[sea_orm(iden = "agent_sessions")]
    Table,
    Id,
    AgentId,
    UserId,
    SessionStart,
    SessionEnd,
    DurationSeconds,
}
