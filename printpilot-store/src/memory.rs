use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;
use printpilot_catalog::{PriceListEntry, PriceListPatch};
use printpilot_core::{
    CustomerRepository, LedgerRepository, OrderRepository, PriceListRepository, RepoResult,
    StoreError,
};
use printpilot_order::{
    Customer, CustomerPatch, Deposit, Expense, GoodwillTransaction, Order, PeriodActivity, Receipt,
    ReportPeriod, Sale,
};

#[derive(Default)]
struct Tables {
    price_lists: Vec<PriceListEntry>,
    orders: Vec<Order>,
    receipts: Vec<Receipt>,
    customers: Vec<Customer>,
    deposits: Vec<Deposit>,
    goodwill: Vec<GoodwillTransaction>,
    sales: Vec<Sale>,
    expenses: Vec<Expense>,
}

/// Process-local store used for development and tests. One lock covers every
/// table, so multi-table writes are all-or-nothing.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(rows: impl Iterator<Item = T>, at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(|r| std::cmp::Reverse(at(r)));
    rows
}

#[async_trait]
impl PriceListRepository for MemoryStore {
    async fn list_entries(&self) -> RepoResult<Vec<PriceListEntry>> {
        Ok(self.tables.read().await.price_lists.clone())
    }

    async fn get_entry(&self, id: Uuid) -> RepoResult<Option<PriceListEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.price_lists.iter().find(|e| e.id == id).cloned())
    }

    async fn create_entry(&self, entry: &PriceListEntry) -> RepoResult<()> {
        self.tables.write().await.price_lists.push(entry.clone());
        Ok(())
    }

    async fn update_entry(&self, id: Uuid, patch: PriceListPatch) -> RepoResult<Option<PriceListEntry>> {
        let mut tables = self.tables.write().await;
        Ok(tables.price_lists.iter_mut().find(|e| e.id == id).map(|entry| {
            entry.apply(patch);
            entry.clone()
        }))
    }

    async fn delete_entry(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.price_lists.len();
        tables.price_lists.retain(|e| e.id != id);
        Ok(tables.price_lists.len() != before)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn place_order(&self, order: &Order, receipt: &Receipt) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        tables.orders.push(order.clone());
        tables.receipts.push(receipt.clone());
        Ok(())
    }

    async fn list_orders(&self) -> RepoResult<Vec<Order>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.orders.iter().cloned(), |o| o.created_at))
    }

    async fn get_order(&self, id: Uuid) -> RepoResult<Option<Order>> {
        let tables = self.tables.read().await;
        Ok(tables.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn get_receipt(&self, order_id: Uuid) -> RepoResult<Option<Receipt>> {
        let tables = self.tables.read().await;
        Ok(tables.receipts.iter().find(|r| r.order_id == order_id).cloned())
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn list_customers(&self) -> RepoResult<Vec<Customer>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.customers.iter().cloned(), |c| c.created_at))
    }

    async fn get_customer(&self, id: Uuid) -> RepoResult<Option<Customer>> {
        let tables = self.tables.read().await;
        Ok(tables.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn create_customer(&self, customer: &Customer) -> RepoResult<()> {
        self.tables.write().await.customers.push(customer.clone());
        Ok(())
    }

    async fn update_customer(&self, id: Uuid, patch: CustomerPatch) -> RepoResult<Option<Customer>> {
        let mut tables = self.tables.write().await;
        Ok(tables.customers.iter_mut().find(|c| c.id == id).map(|customer| {
            customer.apply(patch);
            customer.clone()
        }))
    }

    async fn delete_customer(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let referenced = tables.deposits.iter().any(|d| d.customer_id == id)
            || tables.goodwill.iter().any(|g| g.customer_id == id);
        if referenced {
            return Err(StoreError::InUse("customer"));
        }

        let before = tables.customers.len();
        tables.customers.retain(|c| c.id != id);
        Ok(tables.customers.len() != before)
    }

    async fn record_deposit(&self, deposit: &Deposit) -> RepoResult<Option<Customer>> {
        let mut tables = self.tables.write().await;
        let Some(customer) = tables.customers.iter_mut().find(|c| c.id == deposit.customer_id) else {
            return Ok(None);
        };
        customer.record_deposit(deposit.amount);
        let updated = customer.clone();
        tables.deposits.push(deposit.clone());
        Ok(Some(updated))
    }

    async fn list_deposits(&self, customer_id: Option<Uuid>) -> RepoResult<Vec<Deposit>> {
        let tables = self.tables.read().await;
        let rows = tables
            .deposits
            .iter()
            .filter(|d| customer_id.map_or(true, |id| d.customer_id == id))
            .cloned();
        Ok(newest_first(rows, |d| d.created_at))
    }

    async fn record_goodwill(&self, entry: &GoodwillTransaction) -> RepoResult<Option<Customer>> {
        let mut tables = self.tables.write().await;
        let Some(customer) = tables.customers.iter_mut().find(|c| c.id == entry.customer_id) else {
            return Ok(None);
        };
        customer.record_goodwill(entry.kind, entry.amount);
        let updated = customer.clone();
        tables.goodwill.push(entry.clone());
        Ok(Some(updated))
    }

    async fn list_goodwill(&self, customer_id: Option<Uuid>) -> RepoResult<Vec<GoodwillTransaction>> {
        let tables = self.tables.read().await;
        let rows = tables
            .goodwill
            .iter()
            .filter(|g| customer_id.map_or(true, |id| g.customer_id == id))
            .cloned();
        Ok(newest_first(rows, |g| g.created_at))
    }
}

#[async_trait]
impl LedgerRepository for MemoryStore {
    async fn list_sales(&self) -> RepoResult<Vec<Sale>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.sales.iter().cloned(), |s| s.created_at))
    }

    async fn create_sale(&self, sale: &Sale) -> RepoResult<()> {
        self.tables.write().await.sales.push(sale.clone());
        Ok(())
    }

    async fn list_expenses(&self) -> RepoResult<Vec<Expense>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.expenses.iter().cloned(), |e| e.created_at))
    }

    async fn create_expense(&self, expense: &Expense) -> RepoResult<()> {
        self.tables.write().await.expenses.push(expense.clone());
        Ok(())
    }

    async fn period_activity(&self, period: &ReportPeriod) -> RepoResult<PeriodActivity> {
        let tables = self.tables.read().await;
        Ok(PeriodActivity {
            order_totals: tables.orders.iter().filter(|o| period.contains(o.created_at)).map(|o| o.total).collect(),
            sale_totals: tables.sales.iter().filter(|s| period.contains(s.created_at)).map(|s| s.total).collect(),
            expense_amounts: tables
                .expenses
                .iter()
                .filter(|e| period.contains(e.created_at))
                .map(|e| e.amount)
                .collect(),
        })
    }
}
