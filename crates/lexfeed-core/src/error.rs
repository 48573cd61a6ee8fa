//! Error types for lexfeed-core
//!
//! A single failure taxonomy covers every remote operation so the
//! presentation layer can decide between a generic retry affordance and a
//! specific message. Errors are `Clone` because they are retained on cache
//! entries and surfaced to every subscriber.

use thiserror::Error;

/// Failure of a fetch or mutation against the remote API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport failure: no response was received at all.
    #[error("network error: {message}")]
    Network { message: String },

    /// The server responded with a non-success status.
    #[error("server responded {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Client-side rejection; no request was issued.
    #[error("invalid input: {message}")]
    Validation { message: String },
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        FetchError::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        FetchError::Decode {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        FetchError::Validation {
            message: message.into(),
        }
    }

    /// True when the server reported the resource missing, so consumers can
    /// say "not found" instead of showing a generic failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Api { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let missing = FetchError::Api {
            status: 404,
            message: "article not found".into(),
        };
        let server = FetchError::Api {
            status: 500,
            message: "boom".into(),
        };

        assert!(missing.is_not_found());
        assert!(!server.is_not_found());
        assert!(!FetchError::network("timed out").is_not_found());
    }

    #[test]
    fn test_display_includes_status() {
        let error = FetchError::Api {
            status: 422,
            message: "abbreviation taken".into(),
        };
        assert_eq!(error.to_string(), "server responded 422: abbreviation taken");
    }
}
