//! Migrator registering content tables in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_services;
mod m20240101_000002_create_sub_services;
mod m20240101_000003_create_projects;
mod m20240101_000004_create_project_metrics;
mod m20240101_000005_create_project_feedback;
mod m20240101_000006_create_project_gallery;
mod m20240101_000007_create_testimonials;
mod m20240101_000008_create_client_logos;
mod m20240101_000009_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_services::Migration),
            Box::new(m20240101_000002_create_sub_services::Migration),
            Box::new(m20240101_000003_create_projects::Migration),
            Box::new(m20240101_000004_create_project_metrics::Migration),
            Box::new(m20240101_000005_create_project_feedback::Migration),
            Box::new(m20240101_000006_create_project_gallery::Migration),
            Box::new(m20240101_000007_create_testimonials::Migration),
            Box::new(m20240101_000008_create_client_logos::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000009_add_indexes::Migration),
        ]
    }
}
