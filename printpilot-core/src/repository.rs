use async_trait::async_trait;
use uuid::Uuid;
use printpilot_catalog::{PriceListEntry, PriceListPatch};
use printpilot_order::{
    Customer, CustomerPatch, Deposit, Expense, GoodwillTransaction, Order, PeriodActivity, Receipt,
    ReportPeriod, Sale,
};

/// Failures surfaced by a storage backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("corrupt {entity} record: {detail}")]
    Corrupt { entity: &'static str, detail: String },

    #[error("{0} is still referenced by other records")]
    InUse(&'static str),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

pub type RepoResult<T> = Result<T, StoreError>;

/// Price-list (catalog) access
#[async_trait]
pub trait PriceListRepository: Send + Sync {
    async fn list_entries(&self) -> RepoResult<Vec<PriceListEntry>>;

    async fn get_entry(&self, id: Uuid) -> RepoResult<Option<PriceListEntry>>;

    async fn create_entry(&self, entry: &PriceListEntry) -> RepoResult<()>;

    /// Returns the updated entry, or `None` when `id` is unknown.
    async fn update_entry(&self, id: Uuid, patch: PriceListPatch) -> RepoResult<Option<PriceListEntry>>;

    /// Returns `false` when `id` is unknown.
    async fn delete_entry(&self, id: Uuid) -> RepoResult<bool>;
}

/// Orders and their receipt snapshots
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist an order together with its receipt.
    async fn place_order(&self, order: &Order, receipt: &Receipt) -> RepoResult<()>;

    /// Newest first
    async fn list_orders(&self) -> RepoResult<Vec<Order>>;

    async fn get_order(&self, id: Uuid) -> RepoResult<Option<Order>>;

    async fn get_receipt(&self, order_id: Uuid) -> RepoResult<Option<Receipt>>;
}

/// Customers and the per-customer ledgers (deposits, goodwill)
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn list_customers(&self) -> RepoResult<Vec<Customer>>;

    async fn get_customer(&self, id: Uuid) -> RepoResult<Option<Customer>>;

    async fn create_customer(&self, customer: &Customer) -> RepoResult<()>;

    async fn update_customer(&self, id: Uuid, patch: CustomerPatch) -> RepoResult<Option<Customer>>;

    /// Fails with [`StoreError::InUse`] while deposits or goodwill reference
    /// the customer.
    async fn delete_customer(&self, id: Uuid) -> RepoResult<bool>;

    /// Store the deposit and credit the customer. `None` when the customer
    /// does not exist (nothing is written).
    async fn record_deposit(&self, deposit: &Deposit) -> RepoResult<Option<Customer>>;

    async fn list_deposits(&self, customer_id: Option<Uuid>) -> RepoResult<Vec<Deposit>>;

    /// Store the transaction and adjust the customer's goodwill. `None` when
    /// the customer does not exist.
    async fn record_goodwill(&self, entry: &GoodwillTransaction) -> RepoResult<Option<Customer>>;

    async fn list_goodwill(&self, customer_id: Option<Uuid>) -> RepoResult<Vec<GoodwillTransaction>>;
}

/// Counter sales, expenses and period sums
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn list_sales(&self) -> RepoResult<Vec<Sale>>;

    async fn create_sale(&self, sale: &Sale) -> RepoResult<()>;

    async fn list_expenses(&self) -> RepoResult<Vec<Expense>>;

    async fn create_expense(&self, expense: &Expense) -> RepoResult<()>;

    /// Order totals, sale totals and expense amounts created inside `period`.
    async fn period_activity(&self, period: &ReportPeriod) -> RepoResult<PeriodActivity>;
}
