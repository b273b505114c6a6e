use thiserror::Error;

/// Transport-level failure: no HTTP response was obtained at all.
///
/// This is the only kind of failure the retry loop repeats.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError(e.to_string())
    }
}

/// Errors surfaced by the API access layer and the pre-flight validators.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Every attempt failed before a response arrived (service asleep or unreachable).
    #[error("could not connect to server after {attempts} attempts: {last}")]
    Unreachable { attempts: u32, last: TransportError },
    /// The server answered with a non-success status. Displays the message only
    /// so it can be shown to the user verbatim.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),
    /// A success response whose body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    Request(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
