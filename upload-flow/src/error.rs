use thiserror::Error;

/// Failures surfaced by a flow submission.
///
/// Every variant displays exactly the message shown to the user, so
/// `err.to_string()` is what ends up in [`RequestState::Failed`](crate::RequestState).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Nothing to submit yet.
    #[error("{0}")]
    Validation(String),

    /// The analysis service answered, but with a failure.
    #[error("{message}")]
    Service {
        status: Option<u16>,
        message: String,
    },

    /// The request never produced a usable answer.
    #[error("{0}")]
    Transport(String),

    #[error("An analysis is already in progress")]
    InFlight,
}

/// Low-level failures while talking to the analysis service, decoding its
/// reply or reading the upload.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid upload: {0}")]
    InvalidUpload(String),
}

impl From<TransportError> for SubmissionError {
    fn from(err: TransportError) -> Self {
        SubmissionError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SubmissionError>;
