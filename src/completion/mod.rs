//! Text completion service abstraction.
//!
//! The pipeline only needs `prompt -> text`. The real implementation is
//! [`GeminiCompleter`]; [`Retrying`] adds bounded retry for transient
//! failures around any completer.

mod gemini;
mod retry;

pub use gemini::GeminiCompleter;
pub use retry::Retrying;

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::CompletionError;

/// Maps one prompt to one generated text.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait TextCompleter: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[async_trait]
impl<T: TextCompleter + ?Sized> TextCompleter for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        (**self).complete(prompt).await
    }
}
