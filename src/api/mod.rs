//! Endpoint builders layered over the throttle core.

mod client;
mod league;
mod matches;
mod url;

pub use client::ApiClient;
pub use league::{Division, LeagueApi, Queue, Tier};
pub use matches::{MatchApi, MatchFilter};
