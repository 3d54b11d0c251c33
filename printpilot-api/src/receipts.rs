use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use printpilot_order::Receipt;

use crate::error::AppError;
use crate::extract::ValidatedPath;
use crate::pdf;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/receipts/{order_id}", get(get_receipt))
        .route("/api/receipts/{order_id}/pdf", get(get_receipt_pdf))
}

/// `application/pdf` download with the given file name
pub(crate) fn pdf_attachment(filename: String, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename={}", filename)),
        ],
        bytes,
    )
        .into_response()
}

/// GET /api/receipts/:orderId
async fn get_receipt(
    State(state): State<AppState>,
    ValidatedPath(order_id): ValidatedPath<Uuid>,
) -> Result<Json<Receipt>, AppError> {
    let receipt = state
        .orders
        .get_receipt(order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Receipt"))?;
    Ok(Json(receipt))
}

/// GET /api/receipts/:orderId/pdf
async fn get_receipt_pdf(
    State(state): State<AppState>,
    ValidatedPath(order_id): ValidatedPath<Uuid>,
) -> Result<Response, AppError> {
    let order = state.orders.get_order(order_id).await?;
    let receipt = state.orders.get_receipt(order_id).await?;
    let (Some(order), Some(receipt)) = (order, receipt) else {
        return Err(AppError::not_found("Receipt"));
    };

    let filename = format!("Receipt-{}.pdf", receipt.receipt_number);
    let (shop, pdf_config) = (state.shop.clone(), state.pdf.clone());
    let bytes = tokio::task::spawn_blocking(move || {
        pdf::render_receipt(&shop, &pdf_config, &order, &receipt)
    })
    .await??;

    tracing::debug!(%order_id, size = bytes.len(), "Receipt PDF rendered");
    Ok(pdf_attachment(filename, bytes))
}
