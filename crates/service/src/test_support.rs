#![cfg(test)]
use std::sync::Arc;

use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::admin::AdminService;
use crate::store::MemoryRowStore;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// DB-backed tests only run against an explicit `DATABASE_URL`.
pub fn skip_db_tests() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

fn test_db_config() -> DatabaseConfig {
    DatabaseConfig {
        url: std::env::var("DATABASE_URL").unwrap_or_default(),
        max_connections: 10,
        min_connections: 1,
        connect_timeout_secs: 10,
        idle_timeout_secs: 60,
        max_lifetime_secs: 600,
        acquire_timeout_secs: 10,
        sqlx_logging: false,
        run_migrations: true,
    }
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_init(|| async {
            let db = connect_with_config(&test_db_config()).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
            drop(db);
        })
        .await;

    // Return a fresh connection for the current test's runtime
    connect_with_config(&test_db_config()).await
}

/// Ids of a seeded Audiovisual > Drone > Lot Aerial chain.
pub struct Seeded {
    pub service: Uuid,
    pub sub_service: Uuid,
    pub project: Uuid,
}

pub fn admin() -> (Arc<MemoryRowStore>, AdminService<MemoryRowStore>) {
    let store = Arc::new(MemoryRowStore::new());
    let admin = AdminService::new(store.clone());
    (store, admin)
}

pub async fn seed_chain(admin: &AdminService<MemoryRowStore>) -> Seeded {
    use models::{project, service, sub_service};

    let svc = admin
        .create::<service::Model>(service::NewService {
            title: "Audiovisual".into(),
            description: "Film and photo".into(),
            icon: "camera".into(),
            display_order: 0,
            is_visible: true,
        })
        .await
        .expect("service");
    let sub = admin
        .create::<sub_service::Model>(sub_service::NewSubService {
            service_id: svc.id,
            title: "Drone".into(),
            display_order: 0,
            is_visible: true,
        })
        .await
        .expect("sub_service");
    let proj = admin
        .create::<project::Model>(project::NewProject {
            sub_service_id: sub.id,
            title: "Lot Aerial".into(),
            project_type: "video".into(),
            thumbnail_url: None,
            video_url: None,
            display_order: 0,
            is_visible: true,
        })
        .await
        .expect("project");
    Seeded { service: svc.id, sub_service: sub.id, project: proj.id }
}
