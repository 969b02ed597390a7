//! Extraction failures.

use crate::acquisition::fetcher::FetchError;
use crate::extraction::tokenizer::TokenizeError;
use serde::Serialize;
use thiserror::Error;

/// Why an extraction call produced no text.
///
/// Every variant ends the whole call tree: a failure in a nested frame
/// discards everything gathered by its ancestors.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not fetch {address}")]
    FetchFailed {
        address: String,
        #[source]
        source: FetchError,
    },
    #[error("malformed document at {address}")]
    MalformedDocument {
        address: String,
        #[source]
        source: TokenizeError,
    },
    #[error("frame {address} is nested deeper than {max_depth} levels")]
    TooDeep { address: String, max_depth: usize },
    #[error("frame {address} embeds itself")]
    CycleDetected { address: String },
}

/// Coarse classification of an [`ExtractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FetchFailed,
    MalformedDocument,
    TooDeep,
    CycleDetected,
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FetchFailed { .. } => ErrorKind::FetchFailed,
            Self::MalformedDocument { .. } => ErrorKind::MalformedDocument,
            Self::TooDeep { .. } => ErrorKind::TooDeep,
            Self::CycleDetected { .. } => ErrorKind::CycleDetected,
        }
    }

    /// Address of the document the failure happened at.
    pub fn address(&self) -> &str {
        match self {
            Self::FetchFailed { address, .. }
            | Self::MalformedDocument { address, .. }
            | Self::TooDeep { address, .. }
            | Self::CycleDetected { address } => address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_address() {
        let err = ExtractError::MalformedDocument {
            address: "https://example.com/".to_string(),
            source: TokenizeError::InvalidUtf8 { token: "text" },
        };
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
        assert_eq!(err.address(), "https://example.com/");
    }

    #[test]
    fn test_display_chains_source() {
        let err = ExtractError::FetchFailed {
            address: "http://bad.invalid".to_string(),
            source: FetchError::Status {
                address: "http://bad.invalid".to_string(),
                status: 503,
            },
        };
        assert_eq!(err.to_string(), "could not fetch http://bad.invalid");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "http://bad.invalid answered with HTTP 503");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::CycleDetected).unwrap();
        assert_eq!(json, "\"cycle_detected\"");
    }
}
