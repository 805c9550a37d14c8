//! Ride state machine.
//!
//! Classifying an itinerary step depends only on where the traveller is
//! (the state left by the previous edge) and the kind of the next edge.
//! The whole table is spelled out in [`RideState::transition`]; there is
//! no "previous edge" to be undefined on the first hop because the walk
//! starts in [`RideState::AtOrigin`].

use super::ItineraryError;
use crate::domain::LineName;
use crate::network::EdgeKind;

/// Where the traveller is while walking a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RideState {
    /// At the origin station, not yet on a vehicle.
    AtOrigin,
    /// On board a vehicle of the given line.
    Riding(LineName),
    /// Off a vehicle, waiting on a platform to change.
    Waiting,
    /// Journey complete.
    AtDestination,
}

/// What a transition contributes to the itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emit {
    Nothing,
    Start,
    Board(LineName),
    Disembark(LineName),
    /// Stepping straight from one line's vehicle onto another's.
    Change { from: LineName, to: LineName },
    Finish,
}

impl RideState {
    pub fn name(&self) -> &'static str {
        match self {
            RideState::AtOrigin => "at origin",
            RideState::Riding(_) => "riding",
            RideState::Waiting => "waiting",
            RideState::AtDestination => "at destination",
        }
    }

    /// Apply one edge, returning the next state and the step to emit.
    pub fn transition(&self, kind: &EdgeKind) -> Result<(RideState, Emit), ItineraryError> {
        use EdgeKind as E;
        use RideState as S;

        let next = match (self, kind) {
            (S::AtOrigin, E::Start) => (S::AtOrigin, Emit::Start),
            // Letting earlier trains go by before boarding
            (S::AtOrigin, E::Wait) => (S::AtOrigin, Emit::Nothing),
            (S::AtOrigin | S::Waiting, E::Travel { line }) => {
                (S::Riding(line.clone()), Emit::Board(line.clone()))
            }
            (S::Riding(current), E::Travel { line }) if current == line => {
                (self.clone(), Emit::Nothing)
            }
            (S::Riding(current), E::Travel { line }) => (
                S::Riding(line.clone()),
                Emit::Change {
                    from: current.clone(),
                    to: line.clone(),
                },
            ),
            (S::Riding(current), E::Wait) => (S::Waiting, Emit::Disembark(current.clone())),
            (S::Waiting, E::Wait) => (S::Waiting, Emit::Nothing),
            (S::AtOrigin | S::Riding(_) | S::Waiting, E::End) => (S::AtDestination, Emit::Finish),
            (S::Riding(_) | S::Waiting, E::Start) | (S::AtDestination, _) => {
                return Err(ItineraryError::UnexpectedEdge {
                    state: self.name(),
                    edge: kind.name(),
                });
            }
        };

        Ok(next)
    }
}
