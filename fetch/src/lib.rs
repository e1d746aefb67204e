pub mod client;
pub mod payload;
pub mod pool;
pub mod response;

pub use client::{GraphBackend, HttpBackend};
pub use payload::{GraphRequest, HoverRequest, LoadRequest, TimeWindow};
pub use pool::SyncPool;
pub use response::{AjaxGraph, CurveValue, HoverData};

/// Everything that can go wrong between issuing a request and holding a
/// decoded response. Kept `Clone` so it can travel inside UI messages.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("{message} (code {code})")]
    Application { code: i64, message: String },
    #[error("Malformed response: {0}")]
    Parse(String),
    #[error("Invalid URL: {0}")]
    Url(String),
}

impl FetchError {
    /// Text shown in place of, or above, the affected graph.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Application { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::Url(err.to_string())
    }
}
