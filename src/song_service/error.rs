//! Classified errors of the song service.

use thiserror::Error;

/// Broad class of a [`SongError`], used to pick the log level and status family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller sent something malformed.
    Validation,
    /// The request was valid but there is nothing to return.
    NotFound,
    Timeout,
    Internal,
}

/// Every failure the song service reports to its callers.
///
/// The `Display` text of classified variants is the public message; internal
/// failures keep their cause for logging but are rendered generically.
#[derive(Error, Debug)]
pub enum SongError {
    #[error("invalid song ID")]
    InvalidId,

    #[error("invalid page")]
    InvalidPage,

    #[error("invalid page size")]
    InvalidPageSize,

    #[error("invalid date format")]
    InvalidDate,

    #[error("invalid JSON request")]
    InvalidJson,

    #[error("end of song text")]
    EndOfText,

    #[error("song does not have text yet")]
    NoText,

    #[error("songs not found")]
    NoSongs,

    #[error("request timeout")]
    ApiCallTimeout,

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl SongError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SongError::InvalidId
            | SongError::InvalidPage
            | SongError::InvalidPageSize
            | SongError::InvalidDate
            | SongError::InvalidJson => ErrorCategory::Validation,
            SongError::EndOfText | SongError::NoText | SongError::NoSongs => {
                ErrorCategory::NotFound
            }
            SongError::ApiCallTimeout => ErrorCategory::Timeout,
            SongError::Internal(_) => ErrorCategory::Internal,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound => 400,
            ErrorCategory::Timeout => 408,
            ErrorCategory::Internal => 500,
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            SongError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

pub type SongResult<T> = Result<T, SongError>;
