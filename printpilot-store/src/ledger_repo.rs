use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use sqlx::PgPool;
use rust_decimal::Decimal;
use printpilot_core::{LedgerRepository, RepoResult};
use printpilot_order::{Expense, PeriodActivity, ReportPeriod, Sale};
use crate::db_err;

pub struct StoreLedgerRepository {
    pool: PgPool,
}

impl StoreLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn amounts_between(&self, sql: &str, period: &ReportPeriod) -> RepoResult<Vec<Decimal>> {
        sqlx::query_scalar::<_, Decimal>(sql)
            .bind(period.starts_at())
            .bind(period.ends_before())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)
    }
}

#[derive(sqlx::FromRow)]
struct SaleRow {
    id: Uuid,
    sale_number: String,
    paper_type: String,
    paper_variant: String,
    quantity: i32,
    unit_price: Decimal,
    total: Decimal,
    payment_method: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            sale_number: row.sale_number,
            paper_type: row.paper_type,
            paper_variant: row.paper_variant,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total: row.total,
            payment_method: row.payment_method,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ExpenseRow {
    id: Uuid,
    category: String,
    description: String,
    amount: Decimal,
    payment_method: String,
    created_at: DateTime<Utc>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Expense {
            id: row.id,
            category: row.category,
            description: row.description,
            amount: row.amount,
            payment_method: row.payment_method,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl LedgerRepository for StoreLedgerRepository {
    async fn list_sales(&self) -> RepoResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            "SELECT id, sale_number, paper_type, paper_variant, quantity, unit_price, total, \
                    payment_method, created_at \
             FROM sales ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Sale::from).collect())
    }

    async fn create_sale(&self, sale: &Sale) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO sales (id, sale_number, paper_type, paper_variant, quantity, unit_price, \
                                total, payment_method, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(sale.id)
        .bind(&sale.sale_number)
        .bind(&sale.paper_type)
        .bind(&sale.paper_variant)
        .bind(sale.quantity)
        .bind(sale.unit_price)
        .bind(sale.total)
        .bind(&sale.payment_method)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn list_expenses(&self) -> RepoResult<Vec<Expense>> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            "SELECT id, category, description, amount, payment_method, created_at \
             FROM expenses ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Expense::from).collect())
    }

    async fn create_expense(&self, expense: &Expense) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO expenses (id, category, description, amount, payment_method, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(expense.id)
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(&expense.payment_method)
        .bind(expense.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn period_activity(&self, period: &ReportPeriod) -> RepoResult<PeriodActivity> {
        Ok(PeriodActivity {
            order_totals: self
                .amounts_between("SELECT total FROM orders WHERE created_at >= $1 AND created_at < $2", period)
                .await?,
            sale_totals: self
                .amounts_between("SELECT total FROM sales WHERE created_at >= $1 AND created_at < $2", period)
                .await?,
            expense_amounts: self
                .amounts_between("SELECT amount FROM expenses WHERE created_at >= $1 AND created_at < $2", period)
                .await?,
        })
    }
}
