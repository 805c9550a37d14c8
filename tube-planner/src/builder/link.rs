//! Timetable link records.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::{LineName, StationName, StopPointRef, VehicleJourneyId};

/// One scheduled hop of one vehicle journey, from a stop to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableLink {
    pub journey: VehicleJourneyId,
    pub line: LineName,
    pub from_stop: StopPointRef,
    pub from_station: StationName,
    pub to_stop: StopPointRef,
    pub to_station: StationName,
    /// Minutes past midnight the vehicle leaves `from_stop`.
    pub departure_minute: f64,
    /// Minutes past midnight the vehicle reaches `to_stop`.
    pub arrival_minute: f64,
    /// Scheduled running time in minutes.
    pub run_time: f64,
    /// True if `to_stop` is where the journey terminates.
    pub is_last_stop: bool,
}

impl TimetableLink {
    /// Compare by `(from_station, departure_minute, journey)`, the order the
    /// graph builder requires.
    pub fn build_order(&self, other: &Self) -> Ordering {
        self.from_station
            .cmp(&other.from_station)
            .then_with(|| self.departure_minute.total_cmp(&other.departure_minute))
            .then_with(|| self.journey.cmp(&other.journey))
    }
}

/// Sort links into the order the graph builder requires.
pub fn sort_links(links: &mut [TimetableLink]) {
    links.sort_by(TimetableLink::build_order);
}
