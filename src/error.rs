//! Error types for graphcal.
//!
//! Uses `thiserror` for library-style errors with automatic `Display` and `Error` implementations.

use thiserror::Error;

/// Top-level error type returned by the demo sequences.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Token acquisition errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Token endpoint rejected the request (HTTP {status}): {error}: {description}")]
    Rejected {
        status: u16,
        error: String,
        description: String,
    },

    #[error("Token response did not contain an access_token: {0}")]
    MissingAccessToken(String),

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
}

/// Graph API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Graph API request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Graph API returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Failed to parse API response: {0}")]
    Decode(String),

    #[error("Failed to encode request body: {0}")]
    Encode(String),

    #[error("API response is missing field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid resource path: {0}")]
    InvalidPath(String),
}

impl ApiError {
    /// Returns true for failures worth retrying: throttling, gateway and
    /// server-side outages, timeouts and refused connections.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::UnexpectedStatus { status, .. } => {
                matches!(status, 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }

    /// HTTP status of the failed call, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl AppError {
    /// Returns a short remediation hint for the console, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Auth(AuthError::Rejected { .. }) => {
                Some("Check AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET.")
            }
            Self::Api(e) => match e.status() {
                Some(401) => Some("The access token was rejected. It may be expired."),
                Some(403) => Some(
                    "Insufficient permissions. The app registration needs Calendars.ReadWrite \
                     or OnlineMeetings.ReadWrite.",
                ),
                Some(404) => Some("Resource not found. Check the configured Graph user."),
                Some(429) => Some("Too many requests. Please wait a moment."),
                _ => None,
            },
            Self::Network(_) => Some("Network error. Check your connection."),
            Self::Config(_) => Some("Configuration error. Please check config.toml."),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        for status in [429, 500, 502, 503, 504] {
            let err = ApiError::UnexpectedStatus {
                status,
                body: String::new(),
            };
            assert!(err.is_transient(), "{} should be transient", status);
        }

        for status in [400, 401, 403, 404, 409] {
            let err = ApiError::UnexpectedStatus {
                status,
                body: String::new(),
            };
            assert!(!err.is_transient(), "{} should be permanent", status);
        }

        assert!(!ApiError::Decode("bad".into()).is_transient());
        assert!(!ApiError::MissingField("joinUrl").is_transient());
    }

    #[test]
    fn test_unexpected_status_includes_body() {
        let err = ApiError::UnexpectedStatus {
            status: 403,
            body: r#"{"error":{"code":"ErrorAccessDenied"}}"#.into(),
        };
        let message = err.to_string();
        assert!(message.contains("403"));
        assert!(message.contains("ErrorAccessDenied"));
    }

    #[test]
    fn test_hints() {
        let err = AppError::Api(ApiError::UnexpectedStatus {
            status: 401,
            body: String::new(),
        });
        assert_eq!(
            err.hint(),
            Some("The access token was rejected. It may be expired.")
        );

        let err = AppError::Api(ApiError::Decode("x".into()));
        assert!(err.hint().is_none());
    }
}
