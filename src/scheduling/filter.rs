use serde::{Deserialize, Serialize};

/// Status-filter token accepted by the session query entry points. `overdue`
/// and `upcoming` split Scheduled sessions around the reference instant;
/// `completed` and `cancelled` match on status alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusFilter {
    Overdue,
    Upcoming,
    Completed,
    Cancelled,
}

impl StatusFilter {
    /// Lenient token parse, mirroring `TimeRange::parse`: unrecognized tokens
    /// leave the query unfiltered.
    pub fn parse(token: &str) -> Option<StatusFilter> {
        match token {
            "overdue" => Some(StatusFilter::Overdue),
            "upcoming" => Some(StatusFilter::Upcoming),
            "completed" => Some(StatusFilter::Completed),
            "cancelled" => Some(StatusFilter::Cancelled),
            _ => None,
        }
    }
}
