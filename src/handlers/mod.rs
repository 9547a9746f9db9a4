pub mod fuel;
pub mod health;
pub mod lookups;
pub mod maintenance;
pub mod workshops;

use chrono::Utc;

use crate::{dates, error::Result, models::PeriodQuery, validation};

/// Resolves a period query against today's date (UTC).
pub(crate) fn requested_range(query: &PeriodQuery) -> Result<Option<(String, String)>> {
    validation::resolve_range(query, Utc::now().date_naive())
}

/// Keeps the records whose date falls inside `range`; `None` keeps all.
pub(crate) fn filter_by_range<T, F>(records: Vec<T>, range: Option<&(String, String)>, date_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    match range {
        Some((start, end)) => records
            .into_iter()
            .filter(|record| dates::is_within_range(date_of(record), start, end))
            .collect(),
        None => records,
    }
}
