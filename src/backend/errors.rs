//! Error types for the backend content API client.

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("backend returned HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("backend returned business code {code} for {url}: {msg}")]
    Api { code: i64, url: String, msg: String },
    #[error("failed to decode response from {url} at '{path}': {source}")]
    Decode {
        url: String,
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
