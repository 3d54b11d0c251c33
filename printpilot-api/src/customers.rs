use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;
use printpilot_order::{Customer, CustomerPatch, Deposit, GoodwillTransaction, NewCustomer};
use printpilot_shared::decimal::fixed2_opt;

use crate::error::{from_store, AppError};
use crate::extract::{blank_as_none, ValidatedJson, ValidatedPath};
use crate::state::AppState;
use crate::validation::{not_blank, signed_amount};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/customers", get(list_customers).post(create_customer))
        .route(
            "/api/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/api/customers/{id}/deposits", get(list_customer_deposits))
        .route("/api/customers/{id}/goodwill", get(list_customer_goodwill))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub address: Option<String>,
    #[serde(default, with = "fixed2_opt")]
    #[validate(custom(function = "signed_amount"))]
    pub balance: Option<Decimal>,
    #[serde(default, with = "fixed2_opt")]
    #[validate(custom(function = "signed_amount"))]
    pub total_deposits: Option<Decimal>,
    #[serde(default, with = "fixed2_opt")]
    #[validate(custom(function = "signed_amount"))]
    pub goodwill: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub address: Option<String>,
    #[serde(default, with = "fixed2_opt")]
    #[validate(custom(function = "signed_amount"))]
    pub balance: Option<Decimal>,
    #[serde(default, with = "fixed2_opt")]
    #[validate(custom(function = "signed_amount"))]
    pub total_deposits: Option<Decimal>,
    #[serde(default, with = "fixed2_opt")]
    #[validate(custom(function = "signed_amount"))]
    pub goodwill: Option<Decimal>,
}

async fn require_customer(state: &AppState, id: Uuid) -> Result<Customer, AppError> {
    state
        .customers
        .get_customer(id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer"))
}

/// GET /api/customers
async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(state.customers.list_customers().await?))
}

/// GET /api/customers/:id
async fn get_customer(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(require_customer(&state, id).await?))
}

/// POST /api/customers
async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let customer = Customer::new(
        NewCustomer {
            name: req.name.trim().to_string(),
            email: req.email,
            phone: req.phone,
            company: req.company,
            address: req.address,
            balance: req.balance.unwrap_or_default(),
            total_deposits: req.total_deposits.unwrap_or_default(),
            goodwill: req.goodwill.unwrap_or_default(),
        },
        Utc::now(),
    );
    state.customers.create_customer(&customer).await?;
    tracing::info!(id = %customer.id, email = ?customer.email, "Customer created");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// PUT /api/customers/:id
async fn update_customer(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateCustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    let patch = CustomerPatch {
        name: req.name.map(|n| n.trim().to_string()),
        email: req.email,
        phone: req.phone,
        company: req.company,
        address: req.address,
        balance: req.balance,
        total_deposits: req.total_deposits,
        goodwill: req.goodwill,
    };
    let customer = state
        .customers
        .update_customer(id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Customer"))?;
    Ok(Json(customer))
}

/// DELETE /api/customers/:id
/// 409 while deposits or goodwill still reference the customer.
async fn delete_customer(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.customers.delete_customer(id).await.map_err(from_store)? {
        return Err(AppError::not_found("Customer"));
    }
    tracing::info!(%id, "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/customers/:id/deposits
async fn list_customer_deposits(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<Vec<Deposit>>, AppError> {
    require_customer(&state, id).await?;
    Ok(Json(state.customers.list_deposits(Some(id)).await?))
}

/// GET /api/customers/:id/goodwill
async fn list_customer_goodwill(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<Vec<GoodwillTransaction>>, AppError> {
    require_customer(&state, id).await?;
    Ok(Json(state.customers.list_goodwill(Some(id)).await?))
}
