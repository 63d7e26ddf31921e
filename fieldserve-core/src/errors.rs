use crate::models::TaskStatus;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Everything that can go wrong between a controller and the backend.
///
/// The four user-facing categories (network, server, validation, data shape)
/// each map to a distinct message in [`ApiError::user_message`]; controllers
/// store that message in their state instead of letting the error escape to
/// the UI layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response received at all: timeout, DNS failure, offline.
    #[error("network error: {0}")]
    Network(String),

    /// The request reached the server and the server failed (5xx).
    #[error("server error ({status})")]
    Server { status: u16, message: Option<String> },

    /// The server rejected the request (4xx, or a `success: false` envelope).
    #[error("request rejected ({status})")]
    Validation { status: u16, message: Option<String> },

    /// The response decoded but is missing structure we require.
    #[error("unexpected response shape: {0}")]
    DataShape(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rejected locally: the cached status already proves the transition
    /// illegal, so no request is issued.
    #[error("cannot {action} a task that is {from}")]
    IllegalTransition {
        action: &'static str,
        from: TaskStatus,
    },
}

impl ApiError {
    /// The message shown to the technician. Validation messages from the
    /// server are surfaced verbatim; every other category gets a generic
    /// one, 5xx bodies included.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Check your internet connection and try again.".to_string(),
            ApiError::Server { .. } => "Server error, try again later.".to_string(),
            ApiError::Validation { message, .. } => message
                .clone()
                .unwrap_or_else(|| "The request could not be processed.".to_string()),
            ApiError::DataShape(_) | ApiError::Serialization(_) => {
                "Unexpected response from the server.".to_string()
            }
            ApiError::IllegalTransition { action, from } => {
                format!("Cannot {} a task that is {}.", action, from)
            }
        }
    }

    /// Build the right category from an HTTP status and an optional body
    /// message.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        if status >= 500 {
            ApiError::Server { status, message }
        } else {
            ApiError::Validation { status, message }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_category() {
        assert!(matches!(
            ApiError::from_status(503, None),
            ApiError::Server { status: 503, .. }
        ));
        assert!(matches!(
            ApiError::from_status(422, Some("bad".into())),
            ApiError::Validation { status: 422, .. }
        ));
    }

    #[test]
    fn server_message_wins_over_generic() {
        let err = ApiError::Validation {
            status: 422,
            message: Some("Task already started".to_string()),
        };
        assert_eq!(err.user_message(), "Task already started");

        let err = ApiError::Validation {
            status: 400,
            message: None,
        };
        assert_eq!(err.user_message(), "The request could not be processed.");
    }

    #[test]
    fn illegal_transition_names_the_status() {
        let err = ApiError::IllegalTransition {
            action: "finish",
            from: TaskStatus::Pending,
        };
        assert_eq!(err.user_message(), "Cannot finish a task that is pending.");
    }
}
