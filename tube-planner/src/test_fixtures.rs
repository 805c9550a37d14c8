//! Shared test data: a small slice of the Central and Victoria lines.
//!
//! ```text
//! CEN-0  Bank 530 -> Oxford Circus 538 -> Marble Arch 540
//! CEN-1  Bank 541 -> Oxford Circus 549 -> Marble Arch 551
//! VIC-0  Oxford Circus 539 -> Victoria 543
//! VIC-1  Oxford Circus 550 -> Victoria 554
//! RV1-0  Bankside 542 -> Victoria 548
//! ```

use crate::builder::{TimetableLink, build_network, sort_links};
use crate::domain::{LineName, StationName, StopPointRef, VehicleJourneyId};
use crate::network::{Network, NodeId};

pub fn station(s: &str) -> StationName {
    StationName::new(s).unwrap()
}

pub fn node_id(journey: &str, stop: &str) -> NodeId {
    NodeId::event(
        VehicleJourneyId::new(journey).unwrap(),
        StopPointRef::new(stop).unwrap(),
    )
}

#[allow(clippy::too_many_arguments)]
pub fn link(
    journey: &str,
    line: &str,
    from_stop: &str,
    from_station: &str,
    to_stop: &str,
    to_station: &str,
    departure: f64,
    arrival: f64,
    is_last_stop: bool,
) -> TimetableLink {
    TimetableLink {
        journey: VehicleJourneyId::new(journey).unwrap(),
        line: LineName::new(line).unwrap(),
        from_stop: StopPointRef::new(from_stop).unwrap(),
        from_station: station(from_station),
        to_stop: StopPointRef::new(to_stop).unwrap(),
        to_station: station(to_station),
        departure_minute: departure,
        arrival_minute: arrival,
        run_time: arrival - departure,
        is_last_stop,
    }
}

/// Fixture links in build order.
pub fn tube_links() -> Vec<TimetableLink> {
    let mut links = vec![
        link("CEN-0", "CEN", "BNK", "Bank", "OXC-C", "Oxford Circus", 530.0, 538.0, false),
        link("CEN-0", "CEN", "OXC-C", "Oxford Circus", "MBA", "Marble Arch", 538.0, 540.0, true),
        link("CEN-1", "CEN", "BNK", "Bank", "OXC-C", "Oxford Circus", 541.0, 549.0, false),
        link("CEN-1", "CEN", "OXC-C", "Oxford Circus", "MBA", "Marble Arch", 549.0, 551.0, true),
        link("VIC-0", "VIC", "OXC-V", "Oxford Circus", "VIC", "Victoria", 539.0, 543.0, true),
        link("VIC-1", "VIC", "OXC-V", "Oxford Circus", "VIC", "Victoria", 550.0, 554.0, true),
        link("RV1-0", "RV1", "BSD", "Bankside", "VIC", "Victoria", 542.0, 548.0, true),
    ];
    sort_links(&mut links);
    links
}

pub fn tube_network() -> Network {
    build_network(tube_links()).unwrap().0
}
