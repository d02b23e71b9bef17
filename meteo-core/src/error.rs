//! Errors raised by weather providers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network failure or a non-success HTTP status.
    #[error("Remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// The response body could not be understood.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// What the caller was doing when the error came back; picks the display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    Forecast,
}

impl ClientError {
    /// Display text for the UI. Callers show this instead of matching on the variant.
    pub fn user_message(&self, operation: Operation) -> String {
        match (self, operation) {
            (Self::InvalidInput(msg), _) => msg.clone(),
            (_, Operation::Search) => {
                "Failed to search locations. Please check your internet connection.".to_string()
            }
            (_, Operation::Forecast) => {
                "Failed to fetch weather data. Please try again later.".to_string()
            }
        }
    }
}
