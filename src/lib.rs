// Time-tracking stats probe
// Fetches time status and custom-range statistics and cross-checks the durations

pub mod verbosity;
pub mod error;
pub mod models;
pub mod client;
pub mod range;
pub mod report;
pub mod probe;
pub mod config;

// Re-export commonly used types
pub use models::{
    stats::{FieldValue, SessionEntry, StatsResponse, ValueKind, coerce_seconds},
    responses::TimeStatusResponse,
};

pub use client::TimeTrackerClient;
pub use config::ProbeConfig;
pub use error::ProbeError;
pub use probe::{StatsProbe, RunOutcome};
pub use range::StatsRange;
pub use report::{summarize, DisplayReport, DurationBreakdown};
