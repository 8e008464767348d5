//! Configuration for readme-genie.
//!
//! Settings are layered: built-in defaults, then `genie.toml`, then the
//! environment (including a `.env` file loaded at startup), then CLI flags.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3001
//! request_timeout_secs = 900
//!
//! [hosting]
//! api_base_url = "https://api.github.com"
//! token = "ghp_..."
//! excluded_directories = ["node_modules", "vendor"]
//!
//! [completion]
//! api_key = "..."
//! model = "gemini-1.5-flash"
//! max_retries = 2
//!
//! [pipeline]
//! split_threshold_chars = 75000
//! chunk_size_chars = 74000
//! pacing_interval_ms = 10000
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::pipeline::SizeLimits;

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "genie.toml";

const DEFAULT_SUPPORTED_EXTENSIONS: &[&str] = &[
    "html", "css", "js", "jsx", "ts", "py", "rb", "java", "kt", "swift", "c", "cpp", "cs", "go",
    "php", "sql", "md", "yaml", "yml", "sh", "ps1", "bat", "cmd", "xml", "svg", "pl", "rs", "lua",
    "coffee", "sass", "scss", "vue",
];

const DEFAULT_EXCLUDED_DIRECTORIES: &[&str] = &[
    "node_modules",
    "site-packages",
    "lib",
    "gems",
    "vendor",
    "build",
    "assets",
];

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for one whole generation request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_request_timeout_secs() -> u64 {
    900
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Repository hosting API (GitHub) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostingSection {
    #[serde(default = "default_hosting_api_base_url")]
    pub api_base_url: String,
    /// Access token; empty means unauthenticated requests
    #[serde(default)]
    pub token: String,
    /// File extensions (without the dot) whose files are included
    #[serde(default = "default_supported_extensions")]
    pub supported_extensions: Vec<String>,
    /// Directory names that are never descended into
    #[serde(default = "default_excluded_directories")]
    pub excluded_directories: Vec<String>,
}

fn default_hosting_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_supported_extensions() -> Vec<String> {
    DEFAULT_SUPPORTED_EXTENSIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_excluded_directories() -> Vec<String> {
    DEFAULT_EXCLUDED_DIRECTORIES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for HostingSection {
    fn default() -> Self {
        Self {
            api_base_url: default_hosting_api_base_url(),
            token: String::new(),
            supported_extensions: default_supported_extensions(),
            excluded_directories: default_excluded_directories(),
        }
    }
}

/// Text completion service (Gemini) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSection {
    #[serde(default = "default_completion_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Extra attempts for transient failures (0 disables retry)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff before retry N is `N * retry_backoff_ms`
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_completion_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    2000
}

impl Default for CompletionSection {
    fn default() -> Self {
        Self {
            api_base_url: default_completion_api_base_url(),
            api_key: String::new(),
            model: default_model(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Prompt-size management settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSection {
    /// Prompts at or above this many characters are split
    #[serde(default = "default_split_threshold_chars")]
    pub split_threshold_chars: usize,
    /// Divisor used to derive the number of parts
    #[serde(default = "default_chunk_size_chars")]
    pub chunk_size_chars: usize,
    /// Minimum gap between successive chunk summarization calls
    #[serde(default = "default_pacing_interval_ms")]
    pub pacing_interval_ms: u64,
    /// Appended to every chunk before it is summarized
    #[serde(default = "default_summarization_instruction")]
    pub summarization_instruction: String,
}

fn default_split_threshold_chars() -> usize {
    75_000
}

fn default_chunk_size_chars() -> usize {
    74_000
}

fn default_pacing_interval_ms() -> u64 {
    10_000
}

fn default_summarization_instruction() -> String {
    crate::prompt::SUMMARIZATION_INSTRUCTION.to_string()
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            split_threshold_chars: default_split_threshold_chars(),
            chunk_size_chars: default_chunk_size_chars(),
            pacing_interval_ms: default_pacing_interval_ms(),
            summarization_instruction: default_summarization_instruction(),
        }
    }
}

impl PipelineSection {
    pub fn limits(&self) -> SizeLimits {
        SizeLimits {
            split_threshold_chars: self.split_threshold_chars,
            chunk_size_chars: self.chunk_size_chars,
        }
    }

    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(self.pacing_interval_ms)
    }
}

/// The complete genie.toml configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenieConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub hosting: HostingSection,
    #[serde(default)]
    pub completion: CompletionSection,
    #[serde(default)]
    pub pipeline: PipelineSection,
}

impl GenieConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse genie.toml")
    }

    /// Load the explicit file if given, else `genie.toml` in `dir` if present,
    /// else defaults.
    pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if candidate.exists() {
                    Self::load(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Resolve the full layered configuration from the process environment.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let mut config = Self::load_or_default(explicit, &cwd)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Path that `resolve` would read, if any.
    pub fn source_path(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let candidate = std::env::current_dir().ok()?.join(DEFAULT_CONFIG_FILE);
                candidate.exists().then_some(candidate)
            }
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize genie.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply environment overrides. `lookup` is `std::env::var` in production.
    ///
    /// `GIT_TOKEN` and `API_KEY` are accepted alongside the `GENIE_*` names;
    /// the `GENIE_*` name wins when both are set.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty("GENIE_HOSTING_TOKEN").or_else(|| non_empty("GIT_TOKEN")) {
            self.hosting.token = token;
        }
        if let Some(url) = non_empty("GENIE_HOSTING_API_URL") {
            self.hosting.api_base_url = url;
        }
        if let Some(key) = non_empty("GENIE_COMPLETION_API_KEY").or_else(|| non_empty("API_KEY")) {
            self.completion.api_key = key;
        }
        if let Some(model) = non_empty("GENIE_COMPLETION_MODEL") {
            self.completion.model = model;
        }
        if let Some(port) = non_empty("GENIE_PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.pipeline.split_threshold_chars == 0 {
            warnings.push("pipeline.split_threshold_chars is 0: every prompt will be split".into());
        }
        if self.pipeline.chunk_size_chars == 0 {
            warnings.push(
                "pipeline.chunk_size_chars is 0: it will be treated as 1 when computing parts"
                    .into(),
            );
        }
        if self.pipeline.chunk_size_chars > self.pipeline.split_threshold_chars {
            warnings.push(format!(
                "pipeline.chunk_size_chars ({}) is larger than split_threshold_chars ({})",
                self.pipeline.chunk_size_chars, self.pipeline.split_threshold_chars
            ));
        }
        if self.hosting.supported_extensions.is_empty() {
            warnings.push("hosting.supported_extensions is empty: no files will be read".into());
        }
        if self.completion.api_key.is_empty() {
            warnings.push(
                "completion.api_key is not set (set API_KEY or GENIE_COMPLETION_API_KEY)".into(),
            );
        }
        if self.server.request_timeout_secs == 0 {
            warnings.push("server.request_timeout_secs is 0: every request will time out".into());
        }

        warnings
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

/// Mask a secret for display, keeping only a short prefix.
pub fn redact(secret: &str) -> String {
    if secret.is_empty() {
        "(not set)".to_string()
    } else {
        let prefix: String = secret.chars().take(4).collect();
        format!("{}****", prefix)
    }
}
