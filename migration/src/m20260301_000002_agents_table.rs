//! Agents table migration
//!
//! Creates the agents table holding catalog submissions:
//! - name / description / app_url / category
//! - approval status (pending / approved / rejected) with reviewer tracking
//! - denormalized view_count, maintained alongside agent_views

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Agents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Agents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Agents::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Agents::Description).text().not_null())
                    .col(ColumnDef::new(Agents::AppUrl).string_len(2048).not_null())
                    .col(ColumnDef::new(Agents::Category).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Agents::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Agents::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(Agents::ApprovedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Agents::ApprovedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Agents::RejectionReason).text().null())
                    .col(
                        ColumnDef::new(Agents::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Agents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Catalog queries filter on status and category
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_agents_status")
                    .table(Agents::Table)
                    .col(Agents::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_agents_category")
                    .table(Agents::Table)
                    .col(Agents::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_agents_author")
                    .table(Agents::Table)
                    .col(Agents::AuthorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_agents_author").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_agents_category").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_agents_status").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Agents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Agents {
    #[sea_orm(iden = "agents")]
    Table,
    Id,
    Name,
    Description,
    AppUrl,
    Category,
    Status,
    AuthorId,
    ApprovedBy,
    ApprovedAt,
    RejectionReason,
    ViewCount,
    CreatedAt,
}
