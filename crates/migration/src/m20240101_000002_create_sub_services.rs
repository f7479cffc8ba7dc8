use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubServices::Table)
                    .if_not_exists()
                    .col(uuid(SubServices::Id).primary_key())
                    .col(uuid(SubServices::ServiceId))
                    .col(string_len(SubServices::Title, 200))
                    .col(integer(SubServices::DisplayOrder).default(0))
                    .col(boolean(SubServices::IsVisible).default(true))
                    .col(timestamp_with_time_zone(SubServices::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(SubServices::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sub_services_service_id")
                            .from(SubServices::Table, SubServices::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SubServices::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SubServices {
    Table,
    Id,
    ServiceId,
    Title,
    DisplayOrder,
    IsVisible,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Services { Table, Id }
