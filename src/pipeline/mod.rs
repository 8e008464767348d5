//! Prompt-size management pipeline.
//!
//! One request flows through: existence checks, file listing, prompt
//! assembly, classification, and then either a single completion call
//! (short path) or split → paced chunk summaries → final synthesis (long
//! path). Every step runs sequentially.

mod classifier;
mod splitter;
mod summarizer;
mod synthesizer;

pub use classifier::{SizeClass, SizeLimits, classify};
pub use splitter::{PartitionPlan, split};
pub use summarizer::{ChunkSummaries, ChunkSummarizer};
pub use synthesizer::synthesize;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use genie_common::GenerationRequest;
use tokio_util::sync::CancellationToken;

use crate::completion::{GeminiCompleter, Retrying, TextCompleter};
use crate::config::{GenieConfig, PipelineSection};
use crate::errors::GenieError;
use crate::prompt::{self, AssembledPrompt};
use crate::source::{FileSource, GitHubSource};

/// Which route a request took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Short,
    Long { parts: usize, failed_parts: usize },
}

/// Generated text plus how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub text: String,
    pub route: Route,
}

/// Shared, request-independent pipeline. One instance serves every request.
pub struct Pipeline {
    source: Arc<dyn FileSource>,
    completer: Arc<dyn TextCompleter>,
    limits: SizeLimits,
    pacing: Duration,
    summarization_instruction: String,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn FileSource>,
        completer: Arc<dyn TextCompleter>,
        config: &PipelineSection,
    ) -> Self {
        Self {
            source,
            completer,
            limits: config.limits(),
            pacing: config.pacing_interval(),
            summarization_instruction: config.summarization_instruction.clone(),
        }
    }

    /// Wire the GitHub source and the retrying Gemini client from config.
    pub fn from_config(config: &GenieConfig) -> Self {
        let source = GitHubSource::from_config(&config.hosting);
        let completer = Retrying::new(
            GeminiCompleter::from_config(&config.completion),
            config.completion.max_retries,
            Duration::from_millis(config.completion.retry_backoff_ms),
        )
        .with_min_wait(config.pipeline.pacing_interval());
        Self::new(Arc::new(source), Arc::new(completer), &config.pipeline)
    }

    /// Run one request end to end.
    ///
    /// Unknown users or repositories fail before any completion call. On the
    /// long path, chunk failures are skipped; only the final call can fail
    /// the request.
    #[tracing::instrument(
        name = "generate",
        skip_all,
        fields(
            request_id = %uuid::Uuid::new_v4(),
            user = %request.user,
            repository = %request.repository,
            output = request.output.kind(),
        )
    )]
    pub async fn run(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<GenerationOutcome, GenieError> {
        if !self.source.user_exists(&request.user).await? {
            return Err(GenieError::UserNotFound {
                user: request.user.clone(),
            });
        }
        if !self
            .source
            .repository_exists(&request.user, &request.repository)
            .await?
        {
            return Err(GenieError::RepositoryNotFound {
                user: request.user.clone(),
                repository: request.repository.clone(),
            });
        }

        let files = self
            .source
            .list_files(&request.user, &request.repository)
            .await?;
        let assembled = AssembledPrompt::assemble(&files, prompt::instruction_for(&request.output));
        let prompt_chars = assembled.len_chars();

        match classify(prompt_chars, &self.limits) {
            SizeClass::ShortPath => {
                tracing::info!(files = files.len(), prompt_chars, "Prompt fits in one call");
                let text = or_cancelled(cancel, self.completer.complete(&assembled.text()))
                    .await?
                    .map_err(GenieError::FinalCompletionFailed)?;
                Ok(GenerationOutcome {
                    text,
                    route: Route::Short,
                })
            }
            SizeClass::LongPath { .. } => {
                // Only the dump is split, so size the parts from it
                let part_count = self.limits.part_count(assembled.dump_chars());
                tracing::info!(
                    files = files.len(),
                    prompt_chars,
                    part_count,
                    "Prompt too large, summarizing in parts"
                );
                let plan = PartitionPlan::new(assembled.dump(), part_count);
                let summaries = ChunkSummarizer::new(
                    self.completer.as_ref(),
                    &self.summarization_instruction,
                    self.pacing,
                )
                .summarize_parts(&plan.parts, cancel)
                .await?;

                if summaries.succeeded == 0 {
                    tracing::warn!(
                        part_count,
                        "Every chunk summary failed, synthesizing from an empty summary"
                    );
                }

                let final_instruction = prompt::final_instruction_for(&request.output);
                let text = or_cancelled(
                    cancel,
                    synthesize(self.completer.as_ref(), &summaries.text, &final_instruction),
                )
                .await??;

                Ok(GenerationOutcome {
                    text,
                    route: Route::Long {
                        parts: plan.part_count(),
                        failed_parts: summaries.failed,
                    },
                })
            }
        }
    }
}

/// Race `fut` against cancellation. Cancellation wins ties.
pub(crate) async fn or_cancelled<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, GenieError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(GenieError::Cancelled),
        out = fut => Ok(out),
    }
}
