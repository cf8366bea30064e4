// Models module - response payloads of the time-tracking API

pub mod stats;
pub mod responses;

pub use stats::*;
pub use responses::*;
