use std::borrow::Cow;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use validator::{ValidationError, ValidationErrors};
use printpilot_core::{CoreError, StoreError};

#[derive(Debug)]
pub enum AppError {
    ValidationFailed(ValidationErrors),
    BadRequest(String),
    NotFoundError(String),
    ConflictError(String),
    Anyhow(anyhow::Error),
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl AppError {
    pub fn not_found(resource: &str) -> Self {
        AppError::NotFoundError(format!("{} not found", resource))
    }

    /// Single-field failure, e.g. a cross-field rule checked by hand.
    pub fn invalid_field(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, field_error(code, message));
        AppError::ValidationFailed(errors)
    }
}

pub fn field_error(code: &'static str, message: impl Into<String>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message.into()));
    error
}

/// `service_name` -> `serviceName`, matching the JSON field names.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = camel_case(&field);
            errs.iter().map(move |e| FieldError {
                field: field.clone(),
                code: e.code.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field)),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    fields
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, fields) = match self {
            AppError::ValidationFailed(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(field_errors(&errors)),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Some(Vec::new())),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg, None),
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string(), None)
            },
        };

        let body = match fields {
            Some(fields) => json!({ "error": error_message, "fields": fields }),
            None => json!({ "error": error_message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Store conflicts surface as 409 and unpriceable jobs as 400; everything
/// else is a 500.
pub fn from_core(err: CoreError) -> AppError {
    match err {
        CoreError::Store(store) => from_store(store),
        CoreError::Pricing(pricing) => AppError::invalid_field("total", "out_of_range", pricing.to_string()),
    }
}

pub fn from_store(err: StoreError) -> AppError {
    match err {
        StoreError::InUse(what) => AppError::ConflictError(format!("{} is still referenced by other records", what)),
        other => AppError::Anyhow(other.into()),
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
