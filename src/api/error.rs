use thiserror::Error;

/// Failure of a backend call, or of the local guard in front of one.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("request rejected with status {status}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Rejected { status: u16, message: Option<String> },

    /// The configured base URL cannot have paths appended to it.
    #[error("invalid API base url: {0}")]
    InvalidBaseUrl(String),

    /// A call that needs a session was attempted without one. No request is made.
    #[error("not authenticated")]
    Unauthenticated,
}

impl ApiError {
    /// Text to show the user: the backend's message verbatim when it sent one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            ApiError::Unauthenticated => "Not authenticated".to_string(),
            _ => fallback.to_string(),
        }
    }

    /// The server refused the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Rejected { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_is_used_verbatim() {
        let err = ApiError::Rejected {
            status: 401,
            message: Some("Invalid credentials".into()),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn missing_or_blank_message_falls_back() {
        let none = ApiError::Rejected { status: 500, message: None };
        assert_eq!(none.user_message("Error saving book"), "Error saving book");
        let blank = ApiError::Rejected {
            status: 400,
            message: Some("  ".into()),
        };
        assert_eq!(blank.user_message("Error saving book"), "Error saving book");
        assert!(!blank.is_unauthorized());
    }

    #[test]
    fn guard_error_has_its_own_message() {
        assert_eq!(ApiError::Unauthenticated.user_message("Error deleting book"), "Not authenticated");
        assert_eq!(ApiError::Unauthenticated.to_string(), "not authenticated");
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = ApiError::Rejected {
            status: 422,
            message: Some("Title is required".into()),
        };
        assert_eq!(err.to_string(), "request rejected with status 422: Title is required");
    }
}
