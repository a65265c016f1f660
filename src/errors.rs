use reqwest::StatusCode;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failures at the HTTP gateway layer. These carry the real cause and are
/// logged with context; user-facing code sees `SessionError` instead.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid url: {0}")]
    Url(String),
}

/// Fixed, operation-specific messages surfaced to the user. No error code
/// or structured detail crosses this boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Could not load the book list. Check the server connection.")]
    ListFailed,

    #[error("Could not add the book. Please try again.")]
    AddFailed,

    #[error("Could not update the book. Please try again.")]
    UpdateFailed,

    #[error("Could not delete the book. Please try again.")]
    DeleteFailed,

    #[error("Book name must not be empty")]
    BlankName,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Parse(String, std::num::ParseIntError),
}
