use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClientLogos::Table)
                    .if_not_exists()
                    .col(uuid(ClientLogos::Id).primary_key())
                    .col(string_len(ClientLogos::Name, 120))
                    .col(string_len(ClientLogos::LogoUrl, 1024))
                    .col(integer(ClientLogos::DisplayOrder).default(0))
                    .col(boolean(ClientLogos::IsVisible).default(true))
                    .col(timestamp_with_time_zone(ClientLogos::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ClientLogos::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ClientLogos {
    Table,
    Id,
    Name,
    LogoUrl,
    DisplayOrder,
    IsVisible,
    CreatedAt,
}
