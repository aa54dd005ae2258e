use thiserror::Error;

/// Failures reported by the trajectory engine.
///
/// Both variants are raised before any sample is handed back: a call either
/// returns a complete trajectory or one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("tracking was cancelled before completion")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Cancelled,
}

impl TrackingError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        TrackingError::InvalidArgument(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TrackingError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            TrackingError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackingError>;
