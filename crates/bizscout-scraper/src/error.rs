use thiserror::Error;

/// Transport-level failures shared by every HTTP-backed source.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("access refused with HTTP {status} by {url}")]
    Forbidden { status: u16, url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("{source_name} rejected the request: {reason}")]
    Rejected {
        source_name: &'static str,
        reason: String,
    },

    #[error("{source_name} is not configured with credentials")]
    MissingCredentials { source_name: &'static str },

    #[error("invalid value for header {name}: {reason}")]
    InvalidHeader { name: &'static str, reason: String },
}
