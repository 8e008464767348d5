use std::time::Duration;

use async_trait::async_trait;

use super::TextCompleter;
use crate::errors::CompletionError;

/// Retries transient completion failures with linear backoff.
///
/// Attempt `n` (1-based) waits `max(n * backoff, min_wait)` first.
/// Non-transient errors are returned immediately.
pub struct Retrying<C> {
    inner: C,
    max_retries: u32,
    backoff: Duration,
    min_wait: Duration,
}

impl<C> Retrying<C> {
    pub fn new(inner: C, max_retries: u32, backoff: Duration) -> Self {
        Self {
            inner,
            max_retries,
            backoff,
            min_wait: Duration::ZERO,
        }
    }

    /// Floor for every retry wait. Set to the pacing interval so a retried
    /// call is never closer to the previous one than paced calls are.
    pub fn with_min_wait(mut self, min_wait: Duration) -> Self {
        self.min_wait = min_wait;
        self
    }
}

#[async_trait]
impl<C: TextCompleter> TextCompleter for Retrying<C> {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let mut attempt = 0u32;
        loop {
            match self.inner.complete(prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let wait = (self.backoff * attempt).max(self.min_wait);
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        wait_ms = wait.as_millis() as u64,
                        error = %err,
                        "Transient completion failure, retrying"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
