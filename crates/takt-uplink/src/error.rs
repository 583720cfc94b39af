use thiserror::Error;

#[derive(Debug, Error)]
pub enum UplinkError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store rejected request: {0}")]
    Rejected(reqwest::StatusCode),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
