//! Journey queries.

use crate::domain::StationName;

use super::search::PlanError;

/// Which side of the journey the requested time binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Leave the origin no earlier than the requested time; find the
    /// earliest arrival.
    DepartAfter,
    /// Reach the destination no later than the requested time; find the
    /// latest departure.
    ArriveBefore,
}

/// A point-to-point journey query.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyQuery {
    pub from: StationName,
    pub to: StationName,
    /// Minutes past midnight.
    pub requested_minute: f64,
    pub mode: QueryMode,
}

impl JourneyQuery {
    /// Create a new query.
    pub fn new(
        from: StationName,
        to: StationName,
        requested_minute: f64,
        mode: QueryMode,
    ) -> Self {
        Self {
            from,
            to,
            requested_minute,
            mode,
        }
    }

    /// Leave `from` at or after `minute`.
    pub fn depart_after(from: StationName, to: StationName, minute: f64) -> Self {
        Self::new(from, to, minute, QueryMode::DepartAfter)
    }

    /// Reach `to` at or before `minute`.
    pub fn arrive_before(from: StationName, to: StationName, minute: f64) -> Self {
        Self::new(from, to, minute, QueryMode::ArriveBefore)
    }

    /// Validate the query.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.from == self.to {
            return Err(PlanError::InvalidQuery(format!(
                "origin and destination are both {}",
                self.from
            )));
        }

        if !self.requested_minute.is_finite() || self.requested_minute < 0.0 {
            return Err(PlanError::InvalidQuery(format!(
                "requested minute {} must be a non-negative number",
                self.requested_minute
            )));
        }

        Ok(())
    }
}
