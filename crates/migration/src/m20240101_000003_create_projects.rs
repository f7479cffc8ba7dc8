//! Create `projects` table.
//! The video columns hold the classified form of `video_url` so readers never
//! re-parse provider URLs.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(uuid(Projects::Id).primary_key())
                    .col(uuid(Projects::SubServiceId))
                    .col(string_len(Projects::Title, 200))
                    .col(string_len(Projects::ProjectType, 64))
                    .col(ColumnDef::new(Projects::ThumbnailUrl).string_len(1024).null())
                    .col(ColumnDef::new(Projects::VideoUrl).string_len(1024).null())
                    .col(ColumnDef::new(Projects::VideoKind).string_len(32).null())
                    .col(ColumnDef::new(Projects::VideoProvider).string_len(32).null())
                    .col(ColumnDef::new(Projects::VideoRef).string_len(256).null())
                    .col(integer(Projects::DisplayOrder).default(0))
                    .col(boolean(Projects::IsVisible).default(true))
                    .col(timestamp_with_time_zone(Projects::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Projects::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_sub_service_id")
                            .from(Projects::Table, Projects::SubServiceId)
                            .to(SubServices::Table, SubServices::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Projects::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    SubServiceId,
    Title,
    ProjectType,
    ThumbnailUrl,
    VideoUrl,
    VideoKind,
    VideoProvider,
    VideoRef,
    DisplayOrder,
    IsVisible,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SubServices { Table, Id }
