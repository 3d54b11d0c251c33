use serde::Serialize;
use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use printpilot_shared::decimal::fixed2;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ReportError {
    #[error("End date {end} is before start date {start}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Date out of supported range")]
    OutOfRange,
}

/// Whole calendar days, both ends inclusive, interpreted in UTC
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    starts_at: DateTime<Utc>,
    ends_before: DateTime<Utc>,
}

impl ReportPeriod {
    pub fn between(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, ReportError> {
        if end_date < start_date {
            return Err(ReportError::InvertedRange { start: start_date, end: end_date });
        }
        let day_after = end_date.succ_opt().ok_or(ReportError::OutOfRange)?;

        Ok(Self {
            start_date,
            end_date,
            starts_at: start_date.and_time(NaiveTime::MIN).and_utc(),
            ends_before: day_after.and_time(NaiveTime::MIN).and_utc(),
        })
    }

    pub fn month(year: i32, month: u32) -> Result<Self, ReportError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(ReportError::InvalidMonth { year, month })?;
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .ok_or(ReportError::OutOfRange)?;
        Self::between(first, last)
    }

    /// Inclusive lower bound
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    /// Exclusive upper bound: midnight after `end_date`
    pub fn ends_before(&self) -> DateTime<Utc> {
        self.ends_before
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.starts_at && at < self.ends_before
    }
}

/// Raw amounts recorded inside a period, as fetched from the store
#[derive(Debug, Clone, Default)]
pub struct PeriodActivity {
    pub order_totals: Vec<Decimal>,
    pub sale_totals: Vec<Decimal>,
    pub expense_amounts: Vec<Decimal>,
}

/// Income and expense summary for a period
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "fixed2")]
    pub total_income: Decimal,
    #[serde(with = "fixed2")]
    pub order_income: Decimal,
    #[serde(with = "fixed2")]
    pub sales_income: Decimal,
    #[serde(with = "fixed2")]
    pub total_expenses: Decimal,
    #[serde(with = "fixed2")]
    pub net_income: Decimal,
    pub order_count: usize,
    pub sale_count: usize,
    pub expense_count: usize,
}

impl IncomeReport {
    pub fn aggregate(period: &ReportPeriod, activity: &PeriodActivity) -> Self {
        let order_income: Decimal = activity.order_totals.iter().sum();
        let sales_income: Decimal = activity.sale_totals.iter().sum();
        let total_expenses: Decimal = activity.expense_amounts.iter().sum();
        let total_income = order_income + sales_income;

        Self {
            start_date: period.start_date,
            end_date: period.end_date,
            total_income,
            order_income,
            sales_income,
            total_expenses,
            net_income: total_income - total_expenses,
            order_count: activity.order_totals.len(),
            sale_count: activity.sale_totals.len(),
            expense_count: activity.expense_amounts.len(),
        }
    }
}
