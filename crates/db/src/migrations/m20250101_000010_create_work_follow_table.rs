//! Create work follow table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkFollow::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkFollow::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkFollow::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(WorkFollow::WorkId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(WorkFollow::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_follow_user")
                            .from(WorkFollow::Table, WorkFollow::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_follow_work")
                            .from(WorkFollow::Table, WorkFollow::WorkId)
                            .to(Work::Table, Work::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, work_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_work_follow_user_work")
                    .table(WorkFollow::Table)
                    .col(WorkFollow::UserId)
                    .col(WorkFollow::WorkId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_follow_work_id")
                    .table(WorkFollow::Table)
                    .col(WorkFollow::WorkId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkFollow::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum WorkFollow {
    Table,
    Id,
    UserId,
    WorkId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Work {
    Table,
    Id,
}
