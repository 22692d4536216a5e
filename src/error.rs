use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Malformed analysis response: {0}")]
    MalformedResponse(String),

    #[error("Unexpected language model envelope: {0}")]
    UpstreamProtocolError(String),

    #[error("Language model returned invalid JSON ({source}): {payload}")]
    InvalidJsonPayload {
        payload: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl InsightError {
    /// Whether a caller may reasonably retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, InsightError::UpstreamUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;
