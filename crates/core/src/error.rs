use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("invalid response from {source_name}: {details}")]
    BackendResponse { source_name: String, details: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("suggestion request failed: {0}")]
    Request(String),

    #[error("source timed out after {0:?}")]
    Timeout(std::time::Duration),
}

pub type Result<T, E = SuggestError> = std::result::Result<T, E>;
