use std::sync::Arc;
use printpilot_core::{
    CustomerRepository, LedgerRepository, OrderOrchestrator, OrderRepository, PriceListRepository,
};
use printpilot_store::app_config::{PdfConfig, ShopConfig};
use printpilot_store::Repositories;

#[derive(Clone)]
pub struct AppState {
    pub price_lists: Arc<dyn PriceListRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub ledger: Arc<dyn LedgerRepository>,
    pub orchestrator: Arc<OrderOrchestrator>,
    pub shop: Arc<ShopConfig>,
    pub pdf: Arc<PdfConfig>,
}

impl AppState {
    pub fn new(repos: Repositories, shop: ShopConfig, pdf: PdfConfig) -> Self {
        let orchestrator = OrderOrchestrator::new(repos.price_lists.clone(), repos.orders.clone());
        Self {
            price_lists: repos.price_lists,
            orders: repos.orders,
            customers: repos.customers,
            ledger: repos.ledger,
            orchestrator: Arc::new(orchestrator),
            shop: Arc::new(shop),
            pdf: Arc::new(pdf),
        }
    }
}
