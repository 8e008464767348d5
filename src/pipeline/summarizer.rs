use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::or_cancelled;
use crate::completion::TextCompleter;
use crate::errors::GenieError;

/// Concatenated chunk summaries plus how many chunks made it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSummaries {
    pub text: String,
    pub succeeded: usize,
    pub failed: usize,
}

/// Summarizes the parts of an oversized prompt one at a time.
///
/// Calls are strictly sequential and in part order. After every call,
/// including the last, the loop waits `pacing` so that the next call to the
/// completion service (another chunk or the final synthesis) never comes
/// sooner than that. A failed chunk is logged and contributes nothing.
pub struct ChunkSummarizer<'a> {
    completer: &'a dyn TextCompleter,
    instruction: &'a str,
    pacing: Duration,
}

impl<'a> ChunkSummarizer<'a> {
    pub fn new(completer: &'a dyn TextCompleter, instruction: &'a str, pacing: Duration) -> Self {
        Self {
            completer,
            instruction,
            pacing,
        }
    }

    /// Only cancellation aborts the loop; completion failures never do.
    pub async fn summarize_parts(
        &self,
        parts: &[String],
        cancel: &CancellationToken,
    ) -> Result<ChunkSummaries, GenieError> {
        let total = parts.len();
        let mut summaries = ChunkSummaries::default();

        for (index, part) in parts.iter().enumerate() {
            let chunk = index + 1;
            let prompt = format!("{}{}", part, self.instruction);

            match or_cancelled(cancel, self.completer.complete(&prompt)).await? {
                Ok(text) => {
                    tracing::debug!(chunk, total, summary_chars = text.len(), "Chunk summarized");
                    summaries.text.push_str(&text);
                    summaries.succeeded += 1;
                }
                Err(e) => {
                    tracing::warn!(chunk, total, error = %e, "Chunk summarization failed, skipping");
                    summaries.failed += 1;
                }
            }

            or_cancelled(cancel, tokio::time::sleep(self.pacing)).await?;
        }

        Ok(summaries)
    }
}
