use printpilot_catalog::PricingError;

pub mod repository;
pub mod orchestrator;

pub use repository::{
    CustomerRepository, LedgerRepository, OrderRepository, PriceListRepository, RepoResult, StoreError,
};
pub use orchestrator::OrderOrchestrator;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

pub type CoreResult<T> = Result<T, CoreError>;
