//! Create wiki page table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WikiPage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WikiPage::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WikiPage::Title).string_len(200).not_null())
                    .col(ColumnDef::new(WikiPage::Content).text().not_null())
                    .col(
                        ColumnDef::new(WikiPage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WikiPage::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WikiPage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum WikiPage {
    Table,
    Id,
    Title,
    Content,
    CreatedAt,
    UpdatedAt,
}
