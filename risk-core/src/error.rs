use thiserror::Error;

/// Failure to obtain a parseable reply from the risk service.
///
/// These never reach the view; callers only log them.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("risk assessment request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("risk assessment response from {url} is not valid (status {status}): {source}; body: {body}")]
    Decode {
        url: String,
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}
