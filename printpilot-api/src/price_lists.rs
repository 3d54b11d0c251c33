use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;
use printpilot_catalog::{
    Ambiguity, Category, NewPriceListEntry, PriceCatalog, PriceListEntry, PriceListPatch,
};
use printpilot_shared::decimal::{fixed2, fixed2_opt};

use crate::error::AppError;
use crate::extract::{ValidatedJson, ValidatedPath};
use crate::state::AppState;
use crate::validation::{not_blank, valid_price};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/price-lists", get(list_price_lists).post(create_price_list))
        .route("/api/price-lists/ambiguities", get(list_ambiguities))
        .route(
            "/api/price-lists/{id}",
            get(get_price_list).put(update_price_list).delete(delete_price_list),
        )
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePriceListRequest {
    #[validate(custom(function = "not_blank"))]
    pub service_name: String,
    pub category: Category,
    #[serde(with = "fixed2")]
    #[validate(custom(function = "valid_price"))]
    pub base_price: Decimal,
    #[validate(custom(function = "not_blank"))]
    pub unit: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriceListRequest {
    #[validate(custom(function = "not_blank"))]
    pub service_name: Option<String>,
    pub category: Option<Category>,
    #[serde(default, with = "fixed2_opt")]
    #[validate(custom(function = "valid_price"))]
    pub base_price: Option<Decimal>,
    #[validate(custom(function = "not_blank"))]
    pub unit: Option<String>,
    pub is_active: Option<bool>,
}

/// Logged whenever the catalog changes so overlapping names are noticed early.
async fn warn_on_ambiguities(state: &AppState) -> Result<(), AppError> {
    let catalog = PriceCatalog::new(state.price_lists.list_entries().await?);
    for ambiguity in catalog.ambiguities() {
        tracing::warn!(
            category = %ambiguity.category,
            key = %ambiguity.key,
            matches = ambiguity.matches.len(),
            "Overlapping price-list names"
        );
    }
    Ok(())
}

/// GET /api/price-lists
async fn list_price_lists(State(state): State<AppState>) -> Result<Json<Vec<PriceListEntry>>, AppError> {
    let catalog = PriceCatalog::new(state.price_lists.list_entries().await?);
    Ok(Json(catalog.entries().to_vec()))
}

/// GET /api/price-lists/ambiguities
async fn list_ambiguities(State(state): State<AppState>) -> Result<Json<Vec<Ambiguity>>, AppError> {
    let catalog = PriceCatalog::new(state.price_lists.list_entries().await?);
    Ok(Json(catalog.ambiguities()))
}

/// GET /api/price-lists/:id
async fn get_price_list(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<PriceListEntry>, AppError> {
    let entry = state
        .price_lists
        .get_entry(id)
        .await?
        .ok_or_else(|| AppError::not_found("Price list"))?;
    Ok(Json(entry))
}

/// POST /api/price-lists
async fn create_price_list(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreatePriceListRequest>,
) -> Result<(StatusCode, Json<PriceListEntry>), AppError> {
    let entry = PriceListEntry::new(NewPriceListEntry {
        service_name: req.service_name.trim().to_string(),
        category: req.category,
        base_price: req.base_price,
        unit: req.unit.trim().to_string(),
        is_active: req.is_active,
    });
    state.price_lists.create_entry(&entry).await?;
    tracing::info!(id = %entry.id, service = %entry.service_name, category = %entry.category, "Price list entry created");

    warn_on_ambiguities(&state).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /api/price-lists/:id
async fn update_price_list(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdatePriceListRequest>,
) -> Result<Json<PriceListEntry>, AppError> {
    let patch = PriceListPatch {
        service_name: req.service_name.map(|s| s.trim().to_string()),
        category: req.category,
        base_price: req.base_price,
        unit: req.unit.map(|u| u.trim().to_string()),
        is_active: req.is_active,
    };
    let entry = state
        .price_lists
        .update_entry(id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Price list"))?;
    tracing::info!(id = %entry.id, "Price list entry updated");

    warn_on_ambiguities(&state).await?;
    Ok(Json(entry))
}

/// DELETE /api/price-lists/:id
async fn delete_price_list(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.price_lists.delete_entry(id).await? {
        return Err(AppError::not_found("Price list"));
    }
    tracing::info!(%id, "Price list entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
