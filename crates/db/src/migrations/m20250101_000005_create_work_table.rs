//! Create work table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Work::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Work::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Work::AuthorId).string_len(32).not_null())
                    .col(ColumnDef::new(Work::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Work::Description).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Work::Genre)
                            .string_len(32)
                            .not_null()
                            .default("other"),
                    )
                    .col(
                        ColumnDef::new(Work::Audience)
                            .string_len(16)
                            .not_null()
                            .default("general"),
                    )
                    .col(ColumnDef::new(Work::FandomId).string_len(32))
                    .col(
                        ColumnDef::new(Work::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Work::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_author")
                            .from(Work::Table, Work::AuthorId)
                            .to(Author::Table, Author::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_fandom")
                            .from(Work::Table, Work::FandomId)
                            .to(Fandom::Table, Fandom::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: author_id (for listing an author's works)
        manager
            .create_index(
                Index::create()
                    .name("idx_work_author_id")
                    .table(Work::Table)
                    .col(Work::AuthorId)
                    .to_owned(),
            )
            .await?;

        // Index: fandom_id (for fandom feeds)
        manager
            .create_index(
                Index::create()
                    .name("idx_work_fandom_id")
                    .table(Work::Table)
                    .col(Work::FandomId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Work::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Work {
    Table,
    Id,
    AuthorId,
    Title,
    Description,
    Genre,
    Audience,
    FandomId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Author {
    Table,
    Id,
}

#[derive(Iden)]
enum Fandom {
    Table,
    Id,
}
