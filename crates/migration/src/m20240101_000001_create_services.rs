//! Create `services` table, the root of the catalog tree.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(uuid(Services::Id).primary_key())
                    .col(string_len(Services::Title, 200))
                    .col(text(Services::Description))
                    .col(string_len(Services::Icon, 64))
                    .col(integer(Services::DisplayOrder).default(0))
                    .col(boolean(Services::IsVisible).default(true))
                    .col(timestamp_with_time_zone(Services::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Services::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Services::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
    Title,
    Description,
    Icon,
    DisplayOrder,
    IsVisible,
    CreatedAt,
    UpdatedAt,
}
