pub mod app_config;
pub mod database;
pub mod catalog_repo;
pub mod order_repo;
pub mod customer_repo;
pub mod ledger_repo;
pub mod memory;
pub mod seed;

use std::sync::Arc;
use printpilot_core::{
    CustomerRepository, LedgerRepository, OrderRepository, PriceListRepository, StoreError,
};
use sqlx::PgPool;
use tracing::info;

pub use database::DbClient;
pub use memory::MemoryStore;
pub use catalog_repo::StorePriceListRepository;
pub use order_repo::StoreOrderRepository;
pub use customer_repo::StoreCustomerRepository;
pub use ledger_repo::StoreLedgerRepository;

/// Every repository the service needs, behind trait objects
#[derive(Clone)]
pub struct Repositories {
    pub price_lists: Arc<dyn PriceListRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub ledger: Arc<dyn LedgerRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            price_lists: store.clone(),
            orders: store.clone(),
            customers: store.clone(),
            ledger: store,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            price_lists: Arc::new(StorePriceListRepository::new(pool.clone())),
            orders: Arc::new(StoreOrderRepository::new(pool.clone())),
            customers: Arc::new(StoreCustomerRepository::new(pool.clone())),
            ledger: Arc::new(StoreLedgerRepository::new(pool)),
        }
    }

    /// `memory://` selects the in-memory store; anything else is handed to
    /// PostgreSQL and migrated.
    pub async fn open(config: &app_config::DatabaseConfig) -> Result<Self, StoreError> {
        let repos = if config.url.starts_with("memory:") {
            info!("Using in-memory store");
            Self::in_memory()
        } else {
            let db = DbClient::new(&config.url, config.max_connections)
                .await
                .map_err(StoreError::backend)?;
            db.migrate().await.map_err(StoreError::backend)?;
            Self::postgres(db.pool)
        };

        if config.seed_catalog {
            seed::seed_if_empty(repos.price_lists.as_ref()).await?;
        }

        Ok(repos)
    }
}

pub(crate) fn db_err(err: sqlx::Error) -> StoreError {
    StoreError::backend(err)
}
