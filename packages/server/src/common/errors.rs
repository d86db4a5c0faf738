use thiserror::Error;

/// Failures the caller can do something about.
///
/// Actions return `anyhow::Result`; these variants travel inside the
/// `anyhow::Error` and the HTTP layer downcasts to choose a status code.
/// Everything else is an internal failure.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),
}

impl TriageError {
    pub fn invalid(message: impl Into<String>) -> Self {
        TriageError::InvalidInput(message.into())
    }
}
