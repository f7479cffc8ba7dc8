use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, StoreBackend, StoreConfig};
use migration::MigratorTrait;
use service::{
    admin::AdminService,
    cache::CachedRowStore,
    catalog::CatalogService,
    store::{MemoryRowStore, RestRowStore, SeaOrmRowStore},
    RowStore,
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;

/// Shared handler state. Both services sit on the same store, so writes made
/// through `admin` evict what `catalog` has cached.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService<dyn RowStore>,
    pub admin: AdminService<dyn RowStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { catalog: CatalogService::new(store.clone()), admin: AdminService::new(store) }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the configured backend, optionally behind the query cache.
pub async fn build_store(cfg: &StoreConfig) -> Result<Arc<dyn RowStore>, StartupError> {
    let base: Arc<dyn RowStore> = match cfg.backend {
        StoreBackend::Memory => {
            warn!("memory row store selected; content is lost on restart");
            Arc::new(MemoryRowStore::new())
        }
        StoreBackend::Rest => {
            let store = RestRowStore::new(&cfg.rest).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
            info!(url = %cfg.rest.url, "using hosted row store");
            Arc::new(store)
        }
        StoreBackend::Postgres => {
            let db = models::db::connect_with_config(&cfg.database).await?;
            if cfg.database.run_migrations {
                migration::Migrator::up(&db, None)
                    .await
                    .map_err(|e| StartupError::Database(e.to_string()))?;
                info!("migrations applied");
            }
            Arc::new(SeaOrmRowStore::new(db))
        }
    };
    // cache wraps whichever backend was chosen
    if cfg.cache_enabled {
        Ok(Arc::new(CachedRowStore::new(base)))
    } else {
        Ok(base)
    }
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    // frontend bundle check
    common::env::ensure_env(&cfg.server.frontend_dir).await?;

    // row store, then the services and routes on top of it
    let store = build_store(&cfg.store).await?;
    let state = AppState::new(store);
    let app: Router = routes::build_router(state, build_cors(), &cfg.server.frontend_dir);

    // bind and serve
    let addr = bind_addr(&cfg)?;
    info!(%addr, backend = ?cfg.store.backend, cache = cfg.store.cache_enabled, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_builds_without_external_services() {
        let store = build_store(&StoreConfig::default()).await.unwrap();
        let state = AppState::new(store);
        assert!(state.catalog.load_catalog(true).await.unwrap().is_empty());
    }

    #[test]
    fn bind_addr_comes_from_server_section() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 9090;
        assert_eq!(bind_addr(&cfg).unwrap().port(), 9090);
    }
}
