//! Field rules shared by the request bodies. Money has to fit NUMERIC(10,2)
//! and dimensions NUMERIC(12,4), so values are bounded and limited in
//! precision before anything is priced or stored.

use rust_decimal::Decimal;
use validator::ValidationError;
use printpilot_shared::decimal::{dimension_limit, money_limit, places};

use crate::error::field_error;

const MONEY_PLACES: u32 = 2;
const DIMENSION_PLACES: u32 = 4;

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("blank", "must not be empty"));
    }
    Ok(())
}

fn bounded(value: &Decimal, limit: Decimal, max_places: u32) -> Result<(), ValidationError> {
    if places(*value) > max_places {
        return Err(field_error(
            "too_precise",
            format!("must have at most {} decimal places", max_places),
        ));
    }
    if value.abs() > limit {
        return Err(field_error("out_of_range", format!("must not exceed {}", limit)));
    }
    Ok(())
}

/// Unit prices: zero is allowed (free items).
pub(crate) fn valid_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(field_error("negative", "must be zero or greater"));
    }
    bounded(value, money_limit(), MONEY_PLACES)
}

/// Deposits, goodwill and expenses.
pub(crate) fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(field_error("not_positive", "must be greater than zero"));
    }
    bounded(value, money_limit(), MONEY_PLACES)
}

/// Running customer totals; may be negative.
pub(crate) fn signed_amount(value: &Decimal) -> Result<(), ValidationError> {
    bounded(value, money_limit(), MONEY_PLACES)
}

pub(crate) fn valid_dimension(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(field_error("negative", "must be zero or greater"));
    }
    bounded(value, dimension_limit(), DIMENSION_PLACES)
}
