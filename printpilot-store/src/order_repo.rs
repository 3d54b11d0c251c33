use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use sqlx::{types::Json, PgPool};
use rust_decimal::Decimal;
use printpilot_catalog::{LineItem, PrintType, ServiceType};
use printpilot_core::{OrderRepository, RepoResult, StoreError};
use printpilot_order::{Order, Receipt};
use crate::db_err;

pub struct StoreOrderRepository {
    pool: PgPool,
}

impl StoreOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    job_number: String,
    service_type: String,
    service_name: Option<String>,
    paper_size: Option<String>,
    quantity: i32,
    print_type: Option<String>,
    custom_width: Option<Decimal>,
    custom_height: Option<Decimal>,
    finishing_options: Vec<String>,
    additional_specs: Option<String>,
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
    payment_method: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let corrupt = |detail: String| StoreError::Corrupt { entity: "order", detail };

        let service_type = ServiceType::parse(&row.service_type)
            .ok_or_else(|| corrupt(format!("unknown service type '{}' on {}", row.service_type, row.id)))?;
        let print_type = match row.print_type.as_deref() {
            Some(raw) => Some(
                PrintType::parse(raw)
                    .ok_or_else(|| corrupt(format!("unknown print type '{}' on {}", raw, row.id)))?,
            ),
            None => None,
        };

        Ok(Order {
            id: row.id,
            job_number: row.job_number,
            service_type,
            service_name: row.service_name,
            paper_size: row.paper_size,
            quantity: row.quantity,
            print_type,
            custom_width: row.custom_width,
            custom_height: row.custom_height,
            finishing_options: row.finishing_options,
            additional_specs: row.additional_specs,
            subtotal: row.subtotal,
            tax: row.tax,
            total: row.total,
            payment_method: row.payment_method,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReceiptRow {
    id: Uuid,
    receipt_number: String,
    order_id: Uuid,
    itemized_breakdown: Json<Vec<LineItem>>,
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl From<ReceiptRow> for Receipt {
    fn from(row: ReceiptRow) -> Self {
        Receipt {
            id: row.id,
            receipt_number: row.receipt_number,
            order_id: row.order_id,
            itemized_breakdown: row.itemized_breakdown.0,
            subtotal: row.subtotal,
            tax: row.tax,
            total: row.total,
            created_at: row.created_at,
        }
    }
}

const ORDER_COLUMNS: &str = "id, job_number, service_type, service_name, paper_size, quantity, \
    print_type, custom_width, custom_height, finishing_options, additional_specs, \
    subtotal, tax, total, payment_method, created_at";

#[async_trait]
impl OrderRepository for StoreOrderRepository {
    async fn place_order(&self, order: &Order, receipt: &Receipt) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(&format!(
            "INSERT INTO orders ({ORDER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"
        ))
        .bind(order.id)
        .bind(&order.job_number)
        .bind(order.service_type.as_str())
        .bind(&order.service_name)
        .bind(&order.paper_size)
        .bind(order.quantity)
        .bind(order.print_type.map(|p| p.as_str()))
        .bind(order.custom_width)
        .bind(order.custom_height)
        .bind(&order.finishing_options)
        .bind(&order.additional_specs)
        .bind(order.subtotal)
        .bind(order.tax)
        .bind(order.total)
        .bind(&order.payment_method)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "INSERT INTO receipts (id, receipt_number, order_id, itemized_breakdown, subtotal, tax, total, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(receipt.id)
        .bind(&receipt.receipt_number)
        .bind(receipt.order_id)
        .bind(Json(&receipt.itemized_breakdown))
        .bind(receipt.subtotal)
        .bind(receipt.tax)
        .bind(receipt.total)
        .bind(receipt.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn list_orders(&self) -> RepoResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn get_order(&self, id: Uuid) -> RepoResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Order::try_from).transpose()
    }

    async fn get_receipt(&self, order_id: Uuid) -> RepoResult<Option<Receipt>> {
        let row = sqlx::query_as::<_, ReceiptRow>(
            "SELECT id, receipt_number, order_id, itemized_breakdown, subtotal, tax, total, created_at \
             FROM receipts WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Receipt::from))
    }
}
