//! Create author table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Author::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Author::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Author::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Author::Bio).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Author::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_author_user")
                            .from(Author::Table, Author::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: user_id - one author per user
        manager
            .create_index(
                Index::create()
                    .name("idx_author_user_id")
                    .table(Author::Table)
                    .col(Author::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Author::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Author {
    Table,
    Id,
    UserId,
    Bio,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
