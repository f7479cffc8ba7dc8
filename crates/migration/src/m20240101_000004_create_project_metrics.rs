use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectMetrics::Table)
                    .if_not_exists()
                    .col(uuid(ProjectMetrics::Id).primary_key())
                    .col(uuid(ProjectMetrics::ProjectId))
                    .col(string_len(ProjectMetrics::Label, 120))
                    .col(string_len(ProjectMetrics::Value, 64))
                    .col(ColumnDef::new(ProjectMetrics::ChangePercentage).string_len(32).null())
                    .col(ColumnDef::new(ProjectMetrics::ChangeType).string_len(16).null())
                    .col(integer(ProjectMetrics::DisplayOrder).default(0))
                    .col(timestamp_with_time_zone(ProjectMetrics::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_metrics_project_id")
                            .from(ProjectMetrics::Table, ProjectMetrics::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProjectMetrics::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProjectMetrics {
    Table,
    Id,
    ProjectId,
    Label,
    Value,
    ChangePercentage,
    ChangeType,
    DisplayOrder,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Projects { Table, Id }
