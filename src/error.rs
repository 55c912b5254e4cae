//! Error types for deck conversion and card lookups

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    /// Input is structurally invalid for the chosen format
    #[error("Invalid {format} input: {message}")]
    Format {
        format: &'static str,
        message: String,
    },

    /// The card directory has no record for the requested id or name
    #[error("Card not found: {0}")]
    NotFound(String),

    /// The format cannot produce output (decode-only formats)
    #[error("{message}")]
    Unsupported {
        format: &'static str,
        message: String,
    },

    /// A dataset download or deck page fetch failed
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Decoding succeeded but produced no cards at all
    #[error("Decoded deck is empty")]
    EmptyDeck,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Card database error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl DeckError {
    /// Shorthand for a [`DeckError::Format`] error
    pub fn format(format: &'static str, message: impl Into<String>) -> Self {
        DeckError::Format {
            format,
            message: message.into(),
        }
    }

    /// True for lookups that missed, as opposed to malformed input or I/O
    pub fn is_not_found(&self) -> bool {
        matches!(self, DeckError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_message() {
        let err = DeckError::format("ydke", "missing component");
        assert_eq!(err.to_string(), "Invalid ydke input: missing component");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: DeckError = json_err.into();
        assert!(matches!(err, DeckError::JsonError(_)));
    }
}
