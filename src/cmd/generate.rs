//! One-shot generation command: `readme-genie generate`.

use std::path::Path;

use anyhow::{Context, Result};
use genie_common::{GenerationRequest, OutputSpec};
use readme_genie::config::GenieConfig;
use readme_genie::errors::GenieError;
use readme_genie::pipeline::{Pipeline, Route};
use tokio_util::sync::CancellationToken;

pub async fn cmd_generate(
    config_path: Option<&Path>,
    user: &str,
    repo: &str,
    output_type: &str,
) -> Result<()> {
    let output: OutputSpec = output_type
        .parse()
        .with_context(|| format!("Invalid --type '{}'", output_type))?;
    let config = GenieConfig::resolve(config_path)?;
    if config.completion.api_key.is_empty() {
        anyhow::bail!("No completion API key configured. Set API_KEY or completion.api_key.");
    }

    let pipeline = Pipeline::from_config(&config);
    let request = GenerationRequest::new(user, repo, output);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let timeout = config.request_timeout();
    let outcome = tokio::time::timeout(timeout, pipeline.run(&request, &cancel))
        .await
        .map_err(|_| GenieError::Timeout {
            secs: timeout.as_secs(),
        })??;

    if let Route::Long {
        parts,
        failed_parts,
    } = outcome.route
        && failed_parts > 0
    {
        tracing::warn!(parts, failed_parts, "Some chunk summaries failed; output is based on the rest");
    }

    println!("{}", outcome.text);
    Ok(())
}
