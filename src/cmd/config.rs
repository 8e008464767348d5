//! Configuration view and validation commands: `readme-genie config`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use readme_genie::config::{DEFAULT_CONFIG_FILE, GenieConfig, redact};

use super::super::ConfigCommands;

pub fn cmd_config(config_path: Option<&Path>, command: Option<ConfigCommands>) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => show(config_path),
        Some(ConfigCommands::Validate) => validate(config_path),
        Some(ConfigCommands::Init) => init(config_path),
    }
}

fn show(config_path: Option<&Path>) -> Result<()> {
    let config = GenieConfig::resolve(config_path)?;

    println!();
    println!("readme-genie Configuration");
    println!("==========================");
    println!();
    match GenieConfig::source_path(config_path) {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("No {} found, using defaults.", DEFAULT_CONFIG_FILE),
    }
    println!("Effective values (with env overrides):");
    println!();

    println!("[server]");
    println!("  host = \"{}\"", config.server.host);
    println!("  port = {}", config.server.port);
    println!("  request_timeout_secs = {}", config.server.request_timeout_secs);
    println!();

    println!("[hosting]");
    println!("  api_base_url = \"{}\"", config.hosting.api_base_url);
    println!("  token = {}", redact(&config.hosting.token));
    println!(
        "  supported_extensions = [{}]",
        config.hosting.supported_extensions.join(", ")
    );
    println!(
        "  excluded_directories = [{}]",
        config.hosting.excluded_directories.join(", ")
    );
    println!();

    println!("[completion]");
    println!("  api_base_url = \"{}\"", config.completion.api_base_url);
    println!("  api_key = {}", redact(&config.completion.api_key));
    println!("  model = \"{}\"", config.completion.model);
    println!("  max_retries = {}", config.completion.max_retries);
    println!("  retry_backoff_ms = {}", config.completion.retry_backoff_ms);
    println!();

    println!("[pipeline]");
    println!("  split_threshold_chars = {}", config.pipeline.split_threshold_chars);
    println!("  chunk_size_chars = {}", config.pipeline.chunk_size_chars);
    println!("  pacing_interval_ms = {}", config.pipeline.pacing_interval_ms);
    println!(
        "  summarization_instruction = {:?}",
        config.pipeline.summarization_instruction
    );
    println!();

    Ok(())
}

fn validate(config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("Validating configuration...");
    println!();

    let config = GenieConfig::resolve(config_path)?;
    let warnings = config.validate();

    if warnings.is_empty() {
        println!("Configuration is valid.");
    } else {
        println!("Configuration warnings:");
        for warning in warnings {
            println!("  - {}", warning);
        }
    }
    println!();
    Ok(())
}

fn init(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };

    if path.exists() {
        println!("{} already exists.", path.display());
        println!("Delete it first if you want to recreate it.");
        return Ok(());
    }

    GenieConfig::default().save(&path)?;

    println!("Created {}", path.display());
    println!();
    println!("Secrets are best kept out of the file:");
    println!("  - GIT_TOKEN for the GitHub API");
    println!("  - API_KEY for the completion service");
    println!();
    Ok(())
}
