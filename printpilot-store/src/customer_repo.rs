use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use sqlx::PgPool;
use rust_decimal::Decimal;
use printpilot_core::{CustomerRepository, RepoResult, StoreError};
use printpilot_order::{Customer, CustomerPatch, Deposit, GoodwillTransaction, GoodwillType};
use printpilot_shared::Masked;
use crate::db_err;

pub struct StoreCustomerRepository {
    pool: PgPool,
}

impl StoreCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    company: Option<String>,
    address: Option<String>,
    balance: Decimal,
    total_deposits: Decimal,
    goodwill: Decimal,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            email: row.email.map(Masked),
            phone: row.phone.map(Masked),
            company: row.company,
            address: row.address,
            balance: row.balance,
            total_deposits: row.total_deposits,
            goodwill: row.goodwill,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DepositRow {
    id: Uuid,
    customer_id: Uuid,
    amount: Decimal,
    description: Option<String>,
    payment_method: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DepositRow> for Deposit {
    fn from(row: DepositRow) -> Self {
        Deposit {
            id: row.id,
            customer_id: row.customer_id,
            amount: row.amount,
            description: row.description,
            payment_method: row.payment_method,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GoodwillRow {
    id: Uuid,
    customer_id: Uuid,
    amount: Decimal,
    reason: String,
    kind: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<GoodwillRow> for GoodwillTransaction {
    type Error = StoreError;

    fn try_from(row: GoodwillRow) -> Result<Self, Self::Error> {
        let kind = GoodwillType::parse(&row.kind).ok_or_else(|| StoreError::Corrupt {
            entity: "goodwill transaction",
            detail: format!("unknown type '{}' on {}", row.kind, row.id),
        })?;

        Ok(GoodwillTransaction {
            id: row.id,
            customer_id: row.customer_id,
            amount: row.amount,
            reason: row.reason,
            kind,
            created_at: row.created_at,
        })
    }
}

const CUSTOMER_COLUMNS: &str =
    "id, name, email, phone, company, address, balance, total_deposits, goodwill, created_at";

#[async_trait]
impl CustomerRepository for StoreCustomerRepository {
    async fn list_customers(&self) -> RepoResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn get_customer(&self, id: Uuid) -> RepoResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Customer::from))
    }

    async fn create_customer(&self, customer: &Customer) -> RepoResult<()> {
        sqlx::query(&format!(
            "INSERT INTO customers ({CUSTOMER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        ))
        .bind(customer.id)
        .bind(&customer.name)
        .bind(customer.email.as_ref().map(|e| e.expose().as_str()))
        .bind(customer.phone.as_ref().map(|p| p.expose().as_str()))
        .bind(&customer.company)
        .bind(&customer.address)
        .bind(customer.balance)
        .bind(customer.total_deposits)
        .bind(customer.goodwill)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn update_customer(&self, id: Uuid, patch: CustomerPatch) -> RepoResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE customers SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                phone = COALESCE($4, phone), \
                company = COALESCE($5, company), \
                address = COALESCE($6, address), \
                balance = COALESCE($7, balance), \
                total_deposits = COALESCE($8, total_deposits), \
                goodwill = COALESCE($9, goodwill) \
             WHERE id = $1 \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.phone)
        .bind(patch.company)
        .bind(patch.address)
        .bind(patch.balance)
        .bind(patch.total_deposits)
        .bind(patch.goodwill)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Customer::from))
    }

    async fn delete_customer(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(StoreError::InUse("customer"))
            }
            Err(e) => Err(db_err(e)),
        }
    }

    async fn record_deposit(&self, deposit: &Deposit) -> RepoResult<Option<Customer>> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE customers SET \
                total_deposits = total_deposits + $2, \
                balance = balance + $2 \
             WHERE id = $1 \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(deposit.customer_id)
        .bind(deposit.amount)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(db_err)?;
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO deposits (id, customer_id, amount, description, payment_method, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(deposit.id)
        .bind(deposit.customer_id)
        .bind(deposit.amount)
        .bind(&deposit.description)
        .bind(&deposit.payment_method)
        .bind(deposit.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(Some(Customer::from(row)))
    }

    async fn list_deposits(&self, customer_id: Option<Uuid>) -> RepoResult<Vec<Deposit>> {
        let rows = sqlx::query_as::<_, DepositRow>(
            "SELECT id, customer_id, amount, description, payment_method, created_at \
             FROM deposits \
             WHERE $1::uuid IS NULL OR customer_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Deposit::from).collect())
    }

    async fn record_goodwill(&self, entry: &GoodwillTransaction) -> RepoResult<Option<Customer>> {
        let delta = match entry.kind {
            GoodwillType::Credit => entry.amount,
            GoodwillType::Debit => -entry.amount,
        };

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE customers SET goodwill = goodwill + $2 WHERE id = $1 RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(entry.customer_id)
        .bind(delta)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(db_err)?;
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO goodwill_transactions (id, customer_id, amount, reason, kind, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(entry.id)
        .bind(entry.customer_id)
        .bind(entry.amount)
        .bind(&entry.reason)
        .bind(entry.kind.as_str())
        .bind(entry.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(Some(Customer::from(row)))
    }

    async fn list_goodwill(&self, customer_id: Option<Uuid>) -> RepoResult<Vec<GoodwillTransaction>> {
        let rows = sqlx::query_as::<_, GoodwillRow>(
            "SELECT id, customer_id, amount, reason, kind, created_at \
             FROM goodwill_transactions \
             WHERE $1::uuid IS NULL OR customer_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(GoodwillTransaction::try_from).collect()
    }
}
