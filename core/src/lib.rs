//! Core data handling for the location tracking dashboard.
//!
//! The modules cover loading a location log, holding the per-session date and
//! hour selection, summarising the selected records, and describing the map
//! scene the dashboard draws. Nothing here knows about HTTP.

pub mod auth;
pub mod dataset;
pub mod filter;
pub mod map;
pub mod math;
pub mod prelude;
pub mod report;
pub mod telemetry;
pub mod view;

pub use prelude::{TrackError, TrackResult};
