use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectGallery::Table)
                    .if_not_exists()
                    .col(uuid(ProjectGallery::Id).primary_key())
                    .col(uuid(ProjectGallery::ProjectId))
                    .col(string_len(ProjectGallery::Title, 200))
                    .col(ColumnDef::new(ProjectGallery::Description).text().null())
                    .col(string_len(ProjectGallery::MediaUrl, 1024))
                    .col(string_len(ProjectGallery::MediaType, 16))
                    .col(string_len(ProjectGallery::MediaKind, 32))
                    .col(ColumnDef::new(ProjectGallery::MediaProvider).string_len(32).null())
                    .col(ColumnDef::new(ProjectGallery::MediaRef).string_len(256).null())
                    .col(integer(ProjectGallery::DisplayOrder).default(0))
                    .col(boolean(ProjectGallery::IsVisible).default(true))
                    .col(timestamp_with_time_zone(ProjectGallery::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(ProjectGallery::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_gallery_project_id")
                            .from(ProjectGallery::Table, ProjectGallery::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProjectGallery::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProjectGallery {
    Table,
    Id,
    ProjectId,
    Title,
    Description,
    MediaUrl,
    MediaType,
    MediaKind,
    MediaProvider,
    MediaRef,
    DisplayOrder,
    IsVisible,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Projects { Table, Id }
