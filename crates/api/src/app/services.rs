use std::sync::Arc;

use sqlx::PgPool;

use bookshop_infra::{CatalogStore, InMemoryCatalogStore, PostgresCatalogStore, seed};
use bookshop_orders::OrderService;

/// DI root: the catalog store plus the operations constructed over it.
pub struct AppServices {
    store: Arc<dyn CatalogStore>,
    orders: OrderService,
}

impl AppServices {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        let orders = OrderService::new(store.clone());
        Self { store, orders }
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    pub fn orders(&self) -> &OrderService {
        &self.orders
    }
}

/// Build services from environment configuration.
///
/// `USE_PERSISTENT_STORE=true` + `DATABASE_URL` selects Postgres; anything
/// else runs in-memory (dev/test). `SEED_DEMO_DATA=true` loads the demo
/// catalog into a fresh store.
pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORE")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    let store: Arc<dyn CatalogStore> = if use_persistent {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set when USE_PERSISTENT_STORE=true");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("failed to connect to Postgres");

        let store = PostgresCatalogStore::new(pool);
        store
            .ensure_schema()
            .await
            .expect("failed to ensure catalog schema");
        Arc::new(store)
    } else {
        Arc::new(InMemoryCatalogStore::new())
    };

    let seed_demo = std::env::var("SEED_DEMO_DATA")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if seed_demo {
        if let Err(e) = seed::demo_catalog(store.as_ref()).await {
            tracing::warn!("demo seed failed: {e}");
        }
    }

    AppServices::new(store)
}
