use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};
use printpilot_catalog::{JobSpecification, PrintType, Quote, ServiceType};
use printpilot_order::Order;
use printpilot_shared::decimal::fixed2_opt;

use crate::error::{field_error, from_core, AppError};
use crate::extract::{ValidatedJson, ValidatedPath};
use crate::state::AppState;
use crate::validation::valid_dimension;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/quote", post(quote_order))
        .route("/api/orders/{id}", get(get_order))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub service_type: Option<String>,
    pub service_name: Option<String>,
    pub paper_size: Option<String>,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    pub print_type: Option<String>,
    #[serde(default, with = "fixed2_opt")]
    #[validate(custom(function = "valid_dimension"))]
    pub custom_width: Option<Decimal>,
    #[serde(default, with = "fixed2_opt")]
    #[validate(custom(function = "valid_dimension"))]
    pub custom_height: Option<Decimal>,
    #[serde(default)]
    pub finishing_options: Vec<String>,
    pub additional_specs: Option<String>,
    pub payment_method: Option<String>,
}

/// Forms post empty strings for untouched inputs.
fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl CreateOrderRequest {
    /// Cross-field rules that depend on the service type.
    pub fn into_job(self) -> Result<(JobSpecification, Option<String>), AppError> {
        let mut errors = ValidationErrors::new();

        let service_type = match present(self.service_type) {
            None => {
                errors.add("serviceType", field_error("required", "serviceType is required"));
                None
            }
            Some(raw) => {
                let parsed = ServiceType::parse(&raw);
                if parsed.is_none() {
                    errors.add(
                        "serviceType",
                        field_error("invalid", format!("unknown service type '{}'", raw)),
                    );
                }
                parsed
            }
        };

        let print_type = match present(self.print_type) {
            None => None,
            Some(raw) => {
                let parsed = PrintType::parse(&raw);
                if parsed.is_none() {
                    errors.add("printType", field_error("invalid", format!("unknown print type '{}'", raw)));
                }
                parsed
            }
        };

        let service_name = present(self.service_name);
        let paper_size = present(self.paper_size);

        match service_type {
            Some(ServiceType::Printing) => {
                if paper_size.is_none() {
                    errors.add("paperSize", field_error("required", "paperSize is required for printing"));
                }
                if print_type.is_none() && !errors.field_errors().contains_key("printType") {
                    errors.add("printType", field_error("required", "printType is required for printing"));
                }
            }
            Some(kind @ (ServiceType::LargeFormat | ServiceType::Products)) => {
                if service_name.is_none() {
                    errors.add(
                        "serviceName",
                        field_error("required", format!("serviceName is required for {}", kind.as_str())),
                    );
                }
            }
            None => {}
        }

        let Some(service_type) = service_type.filter(|_| errors.errors().is_empty()) else {
            return Err(AppError::ValidationFailed(errors));
        };

        let job = JobSpecification {
            service_type,
            service_name,
            paper_size,
            print_type,
            quantity: self.quantity,
            custom_width: self.custom_width,
            custom_height: self.custom_height,
            finishing_options: self
                .finishing_options
                .into_iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            additional_specs: present(self.additional_specs),
        };
        Ok((job, present(self.payment_method)))
    }
}

/// GET /api/orders
async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.orders.list_orders().await?))
}

/// GET /api/orders/:id
async fn get_order(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(Json(order))
}

/// POST /api/orders
/// Prices the job, stores the order and its receipt, returns the order.
async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let (job, payment_method) = req.into_job()?;
    let (order, _receipt) = state
        .orchestrator
        .place_order(job, payment_method)
        .await
        .map_err(from_core)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// POST /api/orders/quote
/// Same pricing as order creation; nothing is stored.
async fn quote_order(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateOrderRequest>,
) -> Result<Json<Quote>, AppError> {
    let (job, _) = req.into_job()?;
    let quote = state.orchestrator.quote(&job).await.map_err(from_core)?;
    Ok(Json(quote))
}
