pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

/// Terminal failure of a generation call. The detail is written so it can be
/// embedded verbatim in a user-facing Romanian sentence.
#[derive(Debug, Clone, Error)]
#[error("{detail}")]
pub struct GenerationError {
    pub status: Option<u16>,
    pub detail: String,
}

impl GenerationError {
    pub fn new(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

/// Text-generation boundary. Implementations retry transient overload errors
/// internally; callers only ever see text or a terminal [`GenerationError`].
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Rate-limit / overload statuses that are worth retrying before giving up.
pub(crate) fn is_transient(status: u16) -> bool {
    status == 429 || status == 503
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_statuses() {
        assert!(is_transient(429));
        assert!(is_transient(503));
        assert!(!is_transient(500));
        assert!(!is_transient(404));
        assert!(!is_transient(200));
    }

    #[test]
    fn error_display_is_just_the_detail() {
        let err = GenerationError::new(Some(500), "ceva nu a mers");
        assert_eq!(err.to_string(), "ceva nu a mers");
    }
}
