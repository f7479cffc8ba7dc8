use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Sibling lists are always read by parent, ordered by display_order
        manager
            .create_index(
                Index::create()
                    .name("idx_sub_services_parent_order")
                    .table(SubServices::Table)
                    .col(SubServices::ServiceId)
                    .col(SubServices::DisplayOrder)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_projects_parent_order")
                    .table(Projects::Table)
                    .col(Projects::SubServiceId)
                    .col(Projects::DisplayOrder)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_project_metrics_parent_order")
                    .table(ProjectMetrics::Table)
                    .col(ProjectMetrics::ProjectId)
                    .col(ProjectMetrics::DisplayOrder)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_project_gallery_parent_order")
                    .table(ProjectGallery::Table)
                    .col(ProjectGallery::ProjectId)
                    .col(ProjectGallery::DisplayOrder)
                    .to_owned(),
            )
            .await?;

        // Feedback is one-to-one with its project
        manager
            .create_index(
                Index::create()
                    .name("uniq_project_feedback_project")
                    .table(ProjectFeedback::Table)
                    .col(ProjectFeedback::ProjectId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_sub_services_parent_order").table(SubServices::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_projects_parent_order").table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_project_metrics_parent_order").table(ProjectMetrics::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_project_gallery_parent_order").table(ProjectGallery::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_project_feedback_project").table(ProjectFeedback::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SubServices { Table, ServiceId, DisplayOrder }

#[derive(DeriveIden)]
enum Projects { Table, SubServiceId, DisplayOrder }

#[derive(DeriveIden)]
enum ProjectMetrics { Table, ProjectId, DisplayOrder }

#[derive(DeriveIden)]
enum ProjectGallery { Table, ProjectId, DisplayOrder }

#[derive(DeriveIden)]
enum ProjectFeedback { Table, ProjectId }
