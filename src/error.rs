// Error taxonomy for the probe
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    /// Connection refused, timeout, DNS failure and friends
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Body was not valid JSON. `snippet` holds the start of the body.
    #[error("JSON decode error: {source} (body: {snippet})")]
    Decode {
        #[source]
        source: serde_json::Error,
        snippet: String,
    },

    /// Valid JSON, but not the shape the endpoint is documented to return
    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("cannot parse timestamp '{value}': {reason}")]
    TimestampParse { value: String, reason: String },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ProbeError {
    /// Short marker printed before the message so failures are easy to grep
    pub fn label(&self) -> &'static str {
        match self {
            ProbeError::Transport(_) => "TRANSPORT",
            ProbeError::HttpStatus { .. } => "HTTP",
            ProbeError::Decode { .. } => "DECODE",
            ProbeError::Shape(_) => "SHAPE",
            ProbeError::TimestampParse { .. } => "TIMESTAMP",
            ProbeError::InvalidDate(_) => "DATE",
            ProbeError::Config(_) => "CONFIG",
        }
    }
}
