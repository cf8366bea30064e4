// Client module - time-tracking API client
pub mod api;

pub use api::TimeTrackerClient;
