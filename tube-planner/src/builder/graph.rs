//! Builds the time-expanded network from timetable links.
//!
//! Links must arrive sorted by `(from_station, departure_minute, journey)`.
//! That ordering puts consecutive departures from the same station next to
//! each other, so wait edges can be added by comparing each link with the
//! one before it.

use std::cmp::Ordering;

use tracing::{debug, trace, warn};

use super::link::TimetableLink;
use crate::domain::{LineName, StationName, StopPointRef, VehicleJourneyId};
use crate::network::{EdgeKind, Movement, Network, NetworkError, Node, NodeId};

/// Errors from building a network. All of them mean the input broke the
/// builder's preconditions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// Record sorts before its predecessor
    #[error("record {index} ({station} at {minute}, journey {journey}) is out of order")]
    OutOfOrder {
        index: usize,
        station: StationName,
        minute: f64,
        journey: VehicleJourneyId,
    },

    /// A time or running time is negative or not finite
    #[error("record {index} has invalid {field}: {value}")]
    InvalidTime {
        index: usize,
        field: &'static str,
        value: f64,
    },

    /// Arrival is scheduled before departure
    #[error("record {index} arrives at {arrival} before departing at {departure}")]
    ArrivalBeforeDeparture {
        index: usize,
        departure: f64,
        arrival: f64,
    },

    /// The same journey departs the same stop twice
    #[error("journey {journey} departs stop {stop} more than once")]
    DuplicateDeparture {
        journey: VehicleJourneyId,
        stop: StopPointRef,
    },

    /// A journey both departs from and terminates at the same stop
    #[error("journey {journey} terminates at stop {stop}, which it also departs from")]
    RevisitedStop {
        journey: VehicleJourneyId,
        stop: StopPointRef,
    },

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Counts describing a finished build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub records: usize,
    pub nodes: usize,
    pub travel_edges: usize,
    pub wait_edges: usize,
    /// Travel edges dropped because the journey's next stop never appeared.
    pub dead_ends: usize,
}

/// A travel edge whose destination may not exist yet.
#[derive(Debug)]
struct PendingTravel {
    from: NodeId,
    to: NodeId,
    line: LineName,
    cost: f64,
}

/// Incremental network builder.
///
/// Intermediate stops are a single node: the arrival of a vehicle at a stop
/// and its departure from it are the departure node of the following link.
/// Only terminating stops get a separate arrival node.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    network: Network,
    previous: Option<TimetableLink>,
    pending: Vec<PendingTravel>,
    records: usize,
    wait_edges: usize,
}

impl GraphBuilder {
    /// Create a builder with an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one link. Links must be pushed in build order.
    pub fn push(&mut self, link: TimetableLink) -> Result<(), BuildError> {
        let index = self.records;
        validate_times(index, &link)?;

        if let Some(previous) = &self.previous {
            if link.build_order(previous) == Ordering::Less {
                return Err(BuildError::OutOfOrder {
                    index,
                    station: link.from_station,
                    minute: link.departure_minute,
                    journey: link.journey,
                });
            }
        }

        let departure = NodeId::event(link.journey.clone(), link.from_stop.clone());
        match self.network.node(&departure).map(Node::movement) {
            Some(Movement::Departure) => {
                return Err(BuildError::DuplicateDeparture {
                    journey: link.journey,
                    stop: link.from_stop,
                });
            }
            Some(Movement::Arrival) => {
                return Err(BuildError::RevisitedStop {
                    journey: link.journey,
                    stop: link.from_stop,
                });
            }
            None => {}
        }

        let destination = NodeId::event(link.journey.clone(), link.to_stop.clone());
        if link.is_last_stop
            && (destination == departure || self.network.contains(&destination))
        {
            return Err(BuildError::RevisitedStop {
                journey: link.journey,
                stop: link.to_stop,
            });
        }

        self.network.add_node(
            departure.clone(),
            Node::event(
                link.from_station.clone(),
                link.departure_minute,
                Movement::Departure,
            ),
        );

        if link.is_last_stop {
            self.network.add_node(
                destination.clone(),
                Node::event(
                    link.to_station.clone(),
                    link.arrival_minute,
                    Movement::Arrival,
                ),
            );
        }

        // The destination of a non-terminal hop is the next link's departure
        // node, which may not have been seen yet.
        self.pending.push(PendingTravel {
            from: departure.clone(),
            to: destination,
            line: link.line.clone(),
            cost: link.run_time,
        });

        if let Some(previous) = &self.previous {
            if previous.from_station == link.from_station {
                let waited_from =
                    NodeId::event(previous.journey.clone(), previous.from_stop.clone());
                let cost = link.departure_minute - previous.departure_minute;
                self.network
                    .add_edge(&waited_from, &departure, EdgeKind::Wait, cost)?;
                self.wait_edges += 1;
            }
        }

        trace!(
            index,
            journey = %link.journey,
            station = %link.from_station,
            minute = link.departure_minute,
            "added timetable link"
        );

        self.previous = Some(link);
        self.records += 1;
        Ok(())
    }

    /// Add every link from an iterator, in order.
    pub fn extend<I>(&mut self, links: I) -> Result<(), BuildError>
    where
        I: IntoIterator<Item = TimetableLink>,
    {
        for link in links {
            self.push(link)?;
        }
        Ok(())
    }

    /// Resolve travel edges and return the finished network.
    ///
    /// A travel edge whose destination never materialised (a journey that
    /// stops without being flagged as terminating) is dropped; its departure
    /// node stays in the network as a dead end.
    pub fn finish(mut self) -> Result<(Network, BuildSummary), BuildError> {
        let mut travel_edges = 0;
        let mut dead_ends = 0;

        for travel in std::mem::take(&mut self.pending) {
            if !self.network.contains(&travel.to) {
                warn!(
                    from = %travel.from,
                    to = %travel.to,
                    "no onward stop event, dropping travel edge"
                );
                dead_ends += 1;
                continue;
            }
            self.network.add_edge(
                &travel.from,
                &travel.to,
                EdgeKind::Travel { line: travel.line },
                travel.cost,
            )?;
            travel_edges += 1;
        }

        let summary = BuildSummary {
            records: self.records,
            nodes: self.network.node_count(),
            travel_edges,
            wait_edges: self.wait_edges,
            dead_ends,
        };

        debug!(
            records = summary.records,
            nodes = summary.nodes,
            travel_edges = summary.travel_edges,
            wait_edges = summary.wait_edges,
            dead_ends = summary.dead_ends,
            "built timetable network"
        );

        Ok((self.network, summary))
    }
}

/// Build a network from links already in build order.
pub fn build_network<I>(links: I) -> Result<(Network, BuildSummary), BuildError>
where
    I: IntoIterator<Item = TimetableLink>,
{
    let mut builder = GraphBuilder::new();
    builder.extend(links)?;
    builder.finish()
}

fn validate_times(index: usize, link: &TimetableLink) -> Result<(), BuildError> {
    for (field, value) in [
        ("departure minute", link.departure_minute),
        ("arrival minute", link.arrival_minute),
        ("run time", link.run_time),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(BuildError::InvalidTime {
                index,
                field,
                value,
            });
        }
    }

    if link.arrival_minute < link.departure_minute {
        return Err(BuildError::ArrivalBeforeDeparture {
            index,
            departure: link.departure_minute,
            arrival: link.arrival_minute,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::sort_links;
    use crate::network::GraphView;
    use crate::test_fixtures::{link, node_id, station, tube_links};

    #[test]
    fn builds_tube_fixture() {
        let (network, summary) = build_network(tube_links()).unwrap();

        assert_eq!(summary.records, 7);
        assert_eq!(summary.nodes, 12);
        assert_eq!(summary.travel_edges, 7);
        assert_eq!(summary.wait_edges, 4);
        assert_eq!(summary.dead_ends, 0);
        assert_eq!(network.edge_count(), 11);
    }

    #[test]
    fn intermediate_stop_is_one_node() {
        let (network, _) = build_network(tube_links()).unwrap();

        // CEN-1 arrives at Oxford Circus at 549 and leaves again at 549
        let oxc = network.node(&node_id("CEN-1", "OXC-C")).unwrap();
        assert_eq!(oxc.movement(), Movement::Departure);
        assert_eq!(oxc.minute(), Some(549.0));

        let travel = network
            .edge(&node_id("CEN-1", "BNK"), &node_id("CEN-1", "OXC-C"))
            .unwrap();
        assert_eq!(travel.cost, 8.0);
        assert_eq!(
            travel.kind,
            EdgeKind::Travel {
                line: LineName::new("CEN").unwrap()
            }
        );
    }

    #[test]
    fn last_stop_gets_arrival_node() {
        let (network, _) = build_network(tube_links()).unwrap();

        let victoria = network.node(&node_id("VIC-1", "VIC")).unwrap();
        assert_eq!(victoria.movement(), Movement::Arrival);
        assert_eq!(victoria.minute(), Some(554.0));
        assert_eq!(victoria.station(), &station("Victoria"));
        assert!(network.neighbors(&node_id("VIC-1", "VIC")).is_empty());
    }

    #[test]
    fn wait_edges_link_consecutive_departures() {
        let (network, _) = build_network(tube_links()).unwrap();

        let wait = network
            .edge(&node_id("CEN-1", "OXC-C"), &node_id("VIC-1", "OXC-V"))
            .unwrap();
        assert_eq!(wait.kind, EdgeKind::Wait);
        assert_eq!(wait.cost, 1.0);

        // Only consecutive departures are linked
        assert!(
            network
                .edge(&node_id("CEN-0", "OXC-C"), &node_id("VIC-1", "OXC-V"))
                .is_none()
        );
    }

    #[test]
    fn wait_edges_stay_within_station() {
        let (network, _) = build_network(tube_links()).unwrap();

        for (from, edge) in network.edges() {
            if edge.kind == EdgeKind::Wait {
                let a = network.node(from).unwrap().station();
                let b = network.node(&edge.to).unwrap().station();
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn at_most_one_travel_edge_per_departure() {
        let (network, _) = build_network(tube_links()).unwrap();

        for (id, _) in network.nodes() {
            let travel = network
                .neighbors(id)
                .iter()
                .filter(|e| matches!(e.kind, EdgeKind::Travel { .. }))
                .count();
            assert!(travel <= 1, "{id} has {travel} travel edges");
        }
    }

    #[test]
    fn unterminated_journey_is_a_dead_end() {
        let mut links = tube_links();
        links.push(link(
            "CEN-9", "CEN", "BNK", "Bank", "LST", "Liverpool Street", 560.0, 562.0, false,
        ));
        sort_links(&mut links);

        let (network, summary) = build_network(links).unwrap();
        assert_eq!(summary.dead_ends, 1);
        assert!(network.contains(&node_id("CEN-9", "BNK")));
        assert!(
            network
                .neighbors(&node_id("CEN-9", "BNK"))
                .iter()
                .all(|e| e.kind == EdgeKind::Wait)
        );
    }

    #[test]
    fn out_of_order_is_fatal() {
        let mut links = tube_links();
        links.swap(0, 1);

        let err = build_network(links).unwrap_err();
        assert!(matches!(err, BuildError::OutOfOrder { index: 1, .. }));
    }

    #[test]
    fn duplicate_departure_is_fatal() {
        let mut builder = GraphBuilder::new();
        let first = link(
            "CEN-1", "CEN", "BNK", "Bank", "OXC-C", "Oxford Circus", 541.0, 549.0, false,
        );
        builder.push(first.clone()).unwrap();

        let err = builder.push(first).unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateDeparture {
                journey: VehicleJourneyId::new("CEN-1").unwrap(),
                stop: StopPointRef::new("BNK").unwrap(),
            }
        );
    }

    #[test]
    fn looping_journey_is_fatal() {
        // Terminal arrival first: the later departure from the same stop collides
        let links = vec![
            link("J", "CIR", "BEE", "Bee", "ZZ", "Zed", 610.0, 620.0, true),
            link("J", "CIR", "ZZ", "Zed", "BEE", "Bee", 600.0, 610.0, false),
        ];
        assert_eq!(
            build_network(links).unwrap_err(),
            BuildError::RevisitedStop {
                journey: VehicleJourneyId::new("J").unwrap(),
                stop: StopPointRef::new("ZZ").unwrap(),
            }
        );

        // Departure first: the terminal arrival collides
        let mut builder = GraphBuilder::new();
        builder
            .push(link("J", "CIR", "AA", "Aye", "BEE", "Bee", 590.0, 600.0, false))
            .unwrap();
        let err = builder
            .push(link("J", "CIR", "BEE", "Bee", "AA", "Aye", 600.0, 610.0, true))
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::RevisitedStop {
                journey: VehicleJourneyId::new("J").unwrap(),
                stop: StopPointRef::new("AA").unwrap(),
            }
        );

        // A journey that never returns to a stop is unaffected
        assert!(build_network(tube_links()).is_ok());
    }

    #[test]
    fn invalid_times_are_fatal() {
        let mut negative = link(
            "CEN-1", "CEN", "BNK", "Bank", "OXC-C", "Oxford Circus", 541.0, 549.0, true,
        );
        negative.run_time = -8.0;
        assert!(matches!(
            build_network([negative]),
            Err(BuildError::InvalidTime {
                field: "run time",
                ..
            })
        ));

        let mut nan = link(
            "CEN-1", "CEN", "BNK", "Bank", "OXC-C", "Oxford Circus", 541.0, 549.0, true,
        );
        nan.departure_minute = f64::NAN;
        assert!(build_network([nan]).is_err());

        let mut backwards = link(
            "CEN-1", "CEN", "BNK", "Bank", "OXC-C", "Oxford Circus", 549.0, 541.0, true,
        );
        backwards.run_time = 8.0;
        assert!(matches!(
            build_network([backwards]),
            Err(BuildError::ArrivalBeforeDeparture { .. })
        ));
    }

    #[test]
    fn error_display() {
        let err = BuildError::InvalidTime {
            index: 3,
            field: "run time",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "record 3 has invalid run time: -1");

        let err = BuildError::DuplicateDeparture {
            journey: VehicleJourneyId::new("VJ1").unwrap(),
            stop: StopPointRef::new("BNK").unwrap(),
        };
        assert_eq!(err.to_string(), "journey VJ1 departs stop BNK more than once");

        let err = BuildError::RevisitedStop {
            journey: VehicleJourneyId::new("VJ1").unwrap(),
            stop: StopPointRef::new("BNK").unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "journey VJ1 terminates at stop BNK, which it also departs from"
        );
    }

    #[test]
    fn overnight_times_are_accepted() {
        let links = [link(
            "N-1", "NGT", "BNK", "Bank", "OXC-C", "Oxford Circus", 1435.0, 1445.0, true,
        )];
        let (network, _) = build_network(links).unwrap();
        assert_eq!(
            network.node(&node_id("N-1", "OXC-C")).unwrap().minute(),
            Some(1445.0)
        );
    }
}
