use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::dates;
use crate::error::{AppError, Result};
use crate::models::PeriodQuery;

const OPEN_RANGE_START: &str = "0000-01-01";
const OPEN_RANGE_END: &str = "9999-12-31";

/// Upper bounds for a single entry. Keeps aggregate sums far from `Decimal::MAX`.
pub const MAX_MONETARY_VALUE: i64 = 10_000_000;
pub const MAX_LITERS: i64 = 10_000;

/// Trims and collapses inner whitespace so the same label is always stored
/// the same way.
pub fn normalize_label(field: &str, text: &str) -> Result<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(AppError::MissingField(field.to_string()));
    }
    Ok(normalized)
}

/// Accepts `DD/MM/YYYY` or `YYYY-MM-DD` and returns the ISO form.
pub fn normalize_date(text: &str) -> Result<String> {
    dates::normalize_to_iso(text).ok_or_else(|| AppError::InvalidDate(text.to_string()))
}

pub fn validate_odometer(km: i32) -> Result<()> {
    if km < 0 {
        return Err(AppError::InvalidOdometer(km));
    }
    Ok(())
}

pub fn validate_monetary_value(name: &str, value: &Decimal) -> Result<()> {
    if value < &Decimal::ZERO || value > &Decimal::from(MAX_MONETARY_VALUE) {
        return Err(AppError::InvalidMonetaryValue(name.to_string()));
    }
    Ok(())
}

/// Volumes are stored at two decimal places, so anything that rounds to zero
/// is rejected.
pub fn validate_liters(liters: &Decimal) -> Result<()> {
    if liters.round_dp(2) <= Decimal::ZERO || liters > &Decimal::from(MAX_LITERS) {
        return Err(AppError::InvalidLiters(liters.to_string()));
    }
    Ok(())
}

/// Both bounds must already be ISO.
pub fn validate_date_range(start: &str, end: &str) -> Result<()> {
    if start > end {
        return Err(AppError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}

/// Turns a period query into inclusive ISO bounds. A named period wins over
/// explicit bounds; a missing bound leaves that side open. `None` means no
/// filtering.
pub fn resolve_range(query: &PeriodQuery, today: NaiveDate) -> Result<Option<(String, String)>> {
    if let Some(period) = query.period {
        return Ok(Some(period.bounds(today)));
    }
    if query.start.is_none() && query.end.is_none() {
        return Ok(None);
    }

    let start = match query.start.as_deref() {
        Some(text) => normalize_date(text)?,
        None => OPEN_RANGE_START.to_string(),
    };
    let end = match query.end.as_deref() {
        Some(text) => normalize_date(text)?,
        None => OPEN_RANGE_END.to_string(),
    };
    validate_date_range(&start, &end)?;

    Ok(Some((start, end)))
}

pub fn sanitize_notes(notes: Option<String>) -> Option<String> {
    notes.and_then(|n| {
        let trimmed = n.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
