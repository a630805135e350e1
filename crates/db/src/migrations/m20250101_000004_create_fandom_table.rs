//! Create fandom table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Fandom::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Fandom::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Fandom::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Fandom::Description).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Fandom::CreatedAt)
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
            .drop_table(Table::drop().table(Fandom::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Fandom {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
}
