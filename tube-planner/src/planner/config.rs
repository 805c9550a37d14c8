//! Planner configuration.

/// Configuration parameters for journey planning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Reject queries naming a station with no stop events, instead of
    /// running a search that cannot succeed.
    pub reject_unknown_stations: bool,

    /// Only connect the query endpoints to events within this many minutes
    /// of the requested time. `None` considers every event on the right
    /// side of the requested time.
    pub time_window_mins: Option<f64>,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(reject_unknown_stations: bool, time_window_mins: Option<f64>) -> Self {
        Self {
            reject_unknown_stations,
            time_window_mins,
        }
    }

    /// Returns true if an event `slack` minutes away from the requested
    /// time falls inside the window.
    pub fn within_window(&self, slack: f64) -> bool {
        self.time_window_mins.is_none_or(|window| slack <= window)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            reject_unknown_stations: true,
            time_window_mins: None,
        }
    }
}
