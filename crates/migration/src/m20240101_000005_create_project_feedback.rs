//! Create `project_feedback` table.
//! One row per project at most; the unique index lives in the index migration.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectFeedback::Table)
                    .if_not_exists()
                    .col(uuid(ProjectFeedback::Id).primary_key())
                    .col(uuid(ProjectFeedback::ProjectId))
                    .col(text(ProjectFeedback::FeedbackText))
                    .col(string_len(ProjectFeedback::AuthorName, 120))
                    .col(timestamp_with_time_zone(ProjectFeedback::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_feedback_project_id")
                            .from(ProjectFeedback::Table, ProjectFeedback::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProjectFeedback::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProjectFeedback {
    Table,
    Id,
    ProjectId,
    FeedbackText,
    AuthorName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Projects { Table, Id }
