use thiserror::Error;

/// Failures talking to the protein explorer backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The endpoint URL could not be built from the configured base URL.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// DNS, connection, TLS or timeout failure.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The backend answered with a non-2xx status.
    #[error("request to {url} returned HTTP {code}")]
    Status { url: String, code: u16 },

    /// The response body could not be read (or exceeded the size limit).
    #[error("failed to read response from {url}: {message}")]
    Body { url: String, message: String },

    /// The response body was not the JSON shape we expected.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend reported an error in an otherwise successful response.
    #[error("{0}")]
    Remote(String),
}
