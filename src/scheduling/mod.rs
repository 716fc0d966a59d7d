//! Query-building core: symbolic time ranges, status filters, and the
//! composed session query the repositories execute.

mod filter;
mod query;
mod range;

pub use filter::StatusFilter;
pub use query::SessionQuery;
pub use range::{day_start, resolve, specific_date, DateRange, TimeRange};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AppError;

/// Raw filter tokens as they arrive from the outside (querystring shape).
/// Unrecognized status/time-range tokens are ignored; a malformed specific
/// date is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionFilters {
    pub status_filter: Option<String>,
    pub time_range: Option<String>,
    pub specific_date: Option<String>,
}

impl SessionFilters {
    /// Fold the filters into a query: resolve the date range onto the start
    /// time (a specific date wins over a symbolic token), then apply the
    /// status filter on top so its cutoffs intersect with the range.
    pub fn apply(&self, query: &mut SessionQuery, now: DateTime<Utc>) -> Result<(), AppError> {
        if let Some(raw) = self.specific_date.as_deref() {
            let range = specific_date(raw)
                .map_err(|err| AppError::Validation(format!("invalid date '{raw}': {err}")))?;
            query.range = Some(range);
        } else if let Some(token) = self.time_range.as_deref() {
            if let Some(time_range) = TimeRange::parse(token) {
                query.range = Some(resolve(time_range, now));
            }
        }

        if let Some(token) = self.status_filter.as_deref() {
            if let Some(filter) = StatusFilter::parse(token) {
                query.apply_status_filter(filter, now);
            }
        }

        Ok(())
    }
}
