//! Migration: Create user_tasks table with soft delete support.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserTasks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserTasks::Title).string().not_null())
                    .col(ColumnDef::new(UserTasks::Description).text().not_null())
                    .col(ColumnDef::new(UserTasks::Priority).integer().not_null())
                    .col(
                        ColumnDef::new(UserTasks::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(UserTasks::AssignTo).big_integer().null())
                    .col(ColumnDef::new(UserTasks::CreatedBy).string().not_null())
                    // Stored in the dd-mm-yyyy hh:mm wire format
                    .col(ColumnDef::new(UserTasks::DueDate).string().null())
                    .col(
                        ColumnDef::new(UserTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserTasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserTasks::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_tasks_assign_to")
                            .from(UserTasks::Table, UserTasks::AssignTo)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_tasks_deleted_at")
                    .table(UserTasks::Table)
                    .col(UserTasks::DeletedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_tasks_assign_to")
                    .table(UserTasks::Table)
                    .col(UserTasks::AssignTo)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserTasks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserTasks {
    Table,
    Id,
    Title,
    Description,
    Priority,
    Status,
    AssignTo,
    CreatedBy,
    DueDate,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
