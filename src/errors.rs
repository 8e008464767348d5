//! Typed error hierarchy for readme-genie.
//!
//! Two enums cover the two failure domains:
//! - `GenieError`: request-level failures surfaced to callers
//! - `CompletionError`: a single call to the text completion service

use thiserror::Error;

/// Errors that end a generation request.
#[derive(Debug, Error)]
pub enum GenieError {
    #[error("User not found")]
    UserNotFound { user: String },

    #[error("Repository not found")]
    RepositoryNotFound { user: String, repository: String },

    #[error("Hosting API error: {0}")]
    HostingApi(String),

    #[error("Final completion failed: {0}")]
    FinalCompletionFailed(#[source] CompletionError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Request cancelled")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from one call to the text completion service.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Transport(String),

    #[error("Completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion service returned no text")]
    EmptyResponse,

    #[error("Failed to decode completion response: {0}")]
    Decode(String),
}

impl CompletionError {
    /// Whether retrying the same prompt may succeed.
    ///
    /// Transport failures, rate limiting (429) and server errors (5xx) are
    /// transient; everything else is a property of the request itself.
    pub fn is_transient(&self) -> bool {
        match self {
            CompletionError::Transport(_) => true,
            CompletionError::Status { status, .. } => *status == 429 || *status >= 500,
            CompletionError::EmptyResponse | CompletionError::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_not_found_carries_user() {
        let err = GenieError::UserNotFound {
            user: "alice".to_string(),
        };
        match &err {
            GenieError::UserNotFound { user } => assert_eq!(user, "alice"),
            _ => panic!("Expected UserNotFound"),
        }
        assert_eq!(err.to_string(), "User not found");
    }

    #[test]
    fn not_found_variants_are_distinct() {
        let user_err = GenieError::UserNotFound { user: "a".into() };
        let repo_err = GenieError::RepositoryNotFound {
            user: "a".into(),
            repository: "b".into(),
        };
        assert!(matches!(user_err, GenieError::UserNotFound { .. }));
        assert!(!matches!(repo_err, GenieError::UserNotFound { .. }));
        assert_eq!(repo_err.to_string(), "Repository not found");
    }

    #[test]
    fn final_completion_failed_exposes_source() {
        use std::error::Error as _;
        let err = GenieError::FinalCompletionFailed(CompletionError::EmptyResponse);
        let source = err.source().expect("source should be set");
        assert_eq!(source.to_string(), "Completion service returned no text");
    }

    #[test]
    fn timeout_message_contains_seconds() {
        let err = GenieError::Timeout { secs: 30 };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn genie_error_converts_from_anyhow() {
        let err: GenieError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, GenieError::Other(_)));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn transient_classification() {
        assert!(CompletionError::Transport("reset".into()).is_transient());
        assert!(
            CompletionError::Status {
                status: 429,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            CompletionError::Status {
                status: 503,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            !CompletionError::Status {
                status: 400,
                body: String::new()
            }
            .is_transient()
        );
        assert!(!CompletionError::EmptyResponse.is_transient());
        assert!(!CompletionError::Decode("bad json".into()).is_transient());
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&GenieError::Cancelled);
        assert_std_error(&CompletionError::EmptyResponse);
    }
}
