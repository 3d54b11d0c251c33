use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;
use printpilot_order::{
    Deposit, Expense, GoodwillTransaction, GoodwillType, NewDeposit, NewExpense, NewGoodwill,
    NewSale, Sale,
};
use printpilot_shared::decimal::fixed2;

use crate::error::AppError;
use crate::extract::{blank_as_none, ValidatedJson};
use crate::state::AppState;
use crate::validation::{not_blank, positive_amount, valid_price};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/sales", get(list_sales).post(create_sale))
        .route("/api/deposits", get(list_deposits).post(create_deposit))
        .route("/api/goodwill", get(list_goodwill).post(create_goodwill))
        .route("/api/expenses", get(list_expenses).post(create_expense))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    #[validate(custom(function = "not_blank"))]
    pub paper_type: String,
    #[validate(custom(function = "not_blank"))]
    pub paper_variant: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    #[serde(with = "fixed2")]
    #[validate(custom(function = "valid_price"))]
    pub unit_price: Decimal,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepositRequest {
    pub customer_id: Uuid,
    #[serde(with = "fixed2")]
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoodwillRequest {
    pub customer_id: Uuid,
    #[serde(with = "fixed2")]
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    #[validate(custom(function = "not_blank"))]
    pub reason: String,
    #[serde(rename = "type")]
    pub kind: GoodwillType,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    #[validate(custom(function = "not_blank"))]
    pub category: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(with = "fixed2")]
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    #[validate(custom(function = "not_blank"))]
    pub payment_method: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFilter {
    pub customer_id: Option<Uuid>,
}

/// GET /api/sales
async fn list_sales(State(state): State<AppState>) -> Result<Json<Vec<Sale>>, AppError> {
    Ok(Json(state.ledger.list_sales().await?))
}

/// POST /api/sales
/// `total` is always `unitPrice × quantity`, whatever the client sent.
async fn create_sale(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateSaleRequest>,
) -> Result<(StatusCode, Json<Sale>), AppError> {
    let sale = Sale::new(
        NewSale {
            paper_type: req.paper_type.trim().to_string(),
            paper_variant: req.paper_variant.trim().to_string(),
            quantity: req.quantity,
            unit_price: req.unit_price,
            payment_method: req.payment_method,
        },
        Utc::now(),
    )
    .map_err(|e| AppError::invalid_field("total", "out_of_range", e.to_string()))?;
    state.ledger.create_sale(&sale).await?;
    tracing::info!(sale_number = %sale.sale_number, total = %sale.total, "Counter sale recorded");
    Ok((StatusCode::CREATED, Json(sale)))
}

/// GET /api/deposits?customerId=
async fn list_deposits(
    State(state): State<AppState>,
    Query(filter): Query<CustomerFilter>,
) -> Result<Json<Vec<Deposit>>, AppError> {
    Ok(Json(state.customers.list_deposits(filter.customer_id).await?))
}

/// POST /api/deposits
async fn create_deposit(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateDepositRequest>,
) -> Result<(StatusCode, Json<Deposit>), AppError> {
    let deposit = Deposit::new(
        NewDeposit {
            customer_id: req.customer_id,
            amount: req.amount,
            description: req.description,
            payment_method: req.payment_method,
        },
        Utc::now(),
    );
    let customer = state
        .customers
        .record_deposit(&deposit)
        .await?
        .ok_or_else(|| AppError::not_found("Customer"))?;

    tracing::info!(
        customer_id = %customer.id,
        amount = %deposit.amount,
        balance = %customer.balance,
        "Deposit recorded"
    );
    Ok((StatusCode::CREATED, Json(deposit)))
}

/// GET /api/goodwill?customerId=
async fn list_goodwill(
    State(state): State<AppState>,
    Query(filter): Query<CustomerFilter>,
) -> Result<Json<Vec<GoodwillTransaction>>, AppError> {
    Ok(Json(state.customers.list_goodwill(filter.customer_id).await?))
}

/// POST /api/goodwill
async fn create_goodwill(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateGoodwillRequest>,
) -> Result<(StatusCode, Json<GoodwillTransaction>), AppError> {
    let entry = GoodwillTransaction::new(
        NewGoodwill {
            customer_id: req.customer_id,
            amount: req.amount,
            reason: req.reason.trim().to_string(),
            kind: req.kind,
        },
        Utc::now(),
    );
    let customer = state
        .customers
        .record_goodwill(&entry)
        .await?
        .ok_or_else(|| AppError::not_found("Customer"))?;

    tracing::info!(
        customer_id = %customer.id,
        kind = entry.kind.as_str(),
        goodwill = %customer.goodwill,
        "Goodwill adjusted"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/expenses
async fn list_expenses(State(state): State<AppState>) -> Result<Json<Vec<Expense>>, AppError> {
    Ok(Json(state.ledger.list_expenses().await?))
}

/// POST /api/expenses
async fn create_expense(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let expense = Expense::new(
        NewExpense {
            category: req.category.trim().to_string(),
            description: req.description.trim().to_string(),
            amount: req.amount,
            payment_method: req.payment_method.trim().to_string(),
        },
        Utc::now(),
    );
    state.ledger.create_expense(&expense).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}
