use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Testimonials::Table)
                    .if_not_exists()
                    .col(uuid(Testimonials::Id).primary_key())
                    .col(string_len(Testimonials::Name, 120))
                    .col(string_len(Testimonials::Role, 120))
                    .col(string_len(Testimonials::Company, 120))
                    .col(text(Testimonials::Content))
                    .col(
                        integer(Testimonials::Rating)
                            .check(Expr::col(Testimonials::Rating).between(1, 5)),
                    )
                    .col(string_len(Testimonials::Service, 120))
                    .col(integer(Testimonials::DisplayOrder).default(0))
                    .col(boolean(Testimonials::IsVisible).default(true))
                    .col(timestamp_with_time_zone(Testimonials::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Testimonials::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Testimonials::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Testimonials {
    Table,
    Id,
    Name,
    Role,
    Company,
    Content,
    Rating,
    Service,
    DisplayOrder,
    IsVisible,
    CreatedAt,
    UpdatedAt,
}
