use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::ValidationErrors;
use printpilot_order::{IncomeReport, ReportError, ReportPeriod};

use crate::error::{field_error, AppError};
use crate::pdf;
use crate::receipts::pdf_attachment;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/reports/weekly", get(weekly_report))
        .route("/api/reports/monthly", get(monthly_report))
        .route("/api/reports/pdf/weekly", get(weekly_report_pdf))
        .route("/api/reports/pdf/monthly", get(monthly_report_pdf))
}

/// Raw strings so malformed values produce field errors instead of a bare
/// query rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthlyParams {
    pub year: Option<String>,
    pub month: Option<String>,
}

fn report_error(err: ReportError) -> AppError {
    match err {
        ReportError::InvertedRange { .. } => AppError::invalid_field("endDate", "before_start", err.to_string()),
        ReportError::InvalidMonth { .. } => AppError::invalid_field("month", "out_of_range", err.to_string()),
        ReportError::OutOfRange => AppError::BadRequest(err.to_string()),
    }
}

fn required<'a>(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: Option<&'a str>,
) -> Option<&'a str> {
    let value = raw.map(str::trim).filter(|v| !v.is_empty());
    if value.is_none() {
        errors.add(field, field_error("required", format!("{} is required", field)));
    }
    value
}

fn parse_field<T: std::str::FromStr>(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: Option<&str>,
    expected: &str,
) -> Option<T> {
    let raw = required(errors, field, raw)?;
    let parsed = raw.parse::<T>().ok();
    if parsed.is_none() {
        errors.add(field, field_error("invalid", format!("{} must be {}", field, expected)));
    }
    parsed
}

pub fn weekly_period(params: &WeeklyParams) -> Result<ReportPeriod, AppError> {
    let mut errors = ValidationErrors::new();
    let start = parse_field::<NaiveDate>(&mut errors, "startDate", params.start_date.as_deref(), "a YYYY-MM-DD date");
    let end = parse_field::<NaiveDate>(&mut errors, "endDate", params.end_date.as_deref(), "a YYYY-MM-DD date");

    match (start, end) {
        (Some(start), Some(end)) => ReportPeriod::between(start, end).map_err(report_error),
        _ => Err(AppError::ValidationFailed(errors)),
    }
}

pub fn monthly_period(params: &MonthlyParams) -> Result<ReportPeriod, AppError> {
    let mut errors = ValidationErrors::new();
    let year = parse_field::<i32>(&mut errors, "year", params.year.as_deref(), "a whole number");
    let month = parse_field::<u32>(&mut errors, "month", params.month.as_deref(), "a number from 1 to 12");

    match (year, month) {
        (Some(year), Some(month)) => ReportPeriod::month(year, month).map_err(report_error),
        _ => Err(AppError::ValidationFailed(errors)),
    }
}

async fn build_report(state: &AppState, period: &ReportPeriod) -> Result<IncomeReport, AppError> {
    let activity = state.ledger.period_activity(period).await?;
    let report = IncomeReport::aggregate(period, &activity);
    tracing::debug!(
        start = %report.start_date,
        end = %report.end_date,
        net = %report.net_income,
        "Report aggregated"
    );
    Ok(report)
}

async fn render(
    state: &AppState,
    title: &'static str,
    period_label: String,
    report: IncomeReport,
) -> Result<Vec<u8>, AppError> {
    let (shop, pdf_config) = (state.shop.clone(), state.pdf.clone());
    let bytes = tokio::task::spawn_blocking(move || {
        pdf::render_report(&shop, &pdf_config, title, &period_label, &report)
    })
    .await??;
    Ok(bytes)
}

/// GET /api/reports/weekly?startDate&endDate
async fn weekly_report(
    State(state): State<AppState>,
    Query(params): Query<WeeklyParams>,
) -> Result<Json<IncomeReport>, AppError> {
    let period = weekly_period(&params)?;
    Ok(Json(build_report(&state, &period).await?))
}

/// GET /api/reports/monthly?year&month
async fn monthly_report(
    State(state): State<AppState>,
    Query(params): Query<MonthlyParams>,
) -> Result<Json<IncomeReport>, AppError> {
    let period = monthly_period(&params)?;
    Ok(Json(build_report(&state, &period).await?))
}

/// GET /api/reports/pdf/weekly?startDate&endDate
async fn weekly_report_pdf(
    State(state): State<AppState>,
    Query(params): Query<WeeklyParams>,
) -> Result<Response, AppError> {
    let period = weekly_period(&params)?;
    let report = build_report(&state, &period).await?;
    let label = format!("Period: {} - {}", period.start_date, period.end_date);
    let bytes = render(&state, "Weekly Income & Expense Report", label, report).await?;
    Ok(pdf_attachment("weekly-report.pdf".to_string(), bytes))
}

/// GET /api/reports/pdf/monthly?year&month
async fn monthly_report_pdf(
    State(state): State<AppState>,
    Query(params): Query<MonthlyParams>,
) -> Result<Response, AppError> {
    let period = monthly_period(&params)?;
    let report = build_report(&state, &period).await?;
    let label = period.start_date.format("%B %Y").to_string();
    let bytes = render(&state, "Monthly Income & Expense Report", label, report).await?;
    let filename = format!(
        "monthly-report-{}.pdf",
        period.start_date.format("%Y-%-m")
    );
    Ok(pdf_attachment(filename, bytes))
}
