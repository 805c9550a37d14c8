//! London Underground journey planner over a time-expanded graph.
//!
//! Every departure and arrival of every vehicle journey is a node; riding a
//! train between stops and waiting on a platform are weighted edges. A
//! journey query then reduces to a shortest-path search between two
//! virtual nodes wired in for the duration of that query.
//!
//! - [`builder`] turns sorted timetable links into a [`network::Network`]
//! - [`planner`] answers depart-after and arrive-before queries
//! - [`itinerary`] turns the resulting path into travel instructions

pub mod builder;
pub mod domain;
pub mod itinerary;
pub mod network;
pub mod planner;

#[cfg(test)]
mod test_fixtures;
