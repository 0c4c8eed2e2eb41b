//! Error types with fix suggestions

use thiserror::Error;

use crate::codec::duration::DurationError;
use crate::codec::time::TimeParseError;
use crate::codec::uuid::UuidCodecError;
use crate::registry::RegistryError;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Crate-wide error, wrapping each module's own error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Duration(#[from] DurationError),

    #[error(transparent)]
    Time(#[from] TimeParseError),

    #[error(transparent)]
    Uuid(#[from] UuidCodecError),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FixSuggestion for CoreError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            CoreError::Registry(e) => e.fix_suggestion(),
            CoreError::Duration(_) => {
                Some("Use an ISO 8601 duration (P1DT2H) or units like 1h30m, 1.5s, 300ms")
            }
            CoreError::Time(_) => Some(
                "Use RFC 3339 (2024-01-02T15:04:05Z), a date (2024-01-02), a time (T15:04:05) or now/today/tomorrow/yesterday",
            ),
            CoreError::Uuid(_) => Some("A short UUID is 22 characters from A-Z a-z 0-9 - _"),
            CoreError::InvalidUuid(_) => {
                Some("Use the hyphenated form: 67e55044-10b1-426f-9247-bb680e5fe0c8")
            }
            CoreError::Json(_) => Some("Ensure the input is valid JSON (try parsing with jq)"),
            CoreError::Io(_) => Some("Check file path and permissions"),
        }
    }
}
