//! Repository file sources.
//!
//! A [`FileSource`] answers existence checks and lists the text files of a
//! repository. [`GitHubSource`] talks to the GitHub REST API; the traversal
//! policy (which files to read, which directories to skip) lives in
//! [`FilterPolicy`] so it can be tested without a network.

mod github;

pub use github::GitHubSource;

use std::collections::HashSet;

use async_trait::async_trait;
use genie_common::FileRecord;

use crate::config::HostingSection;
use crate::errors::GenieError;

/// Abstraction over repository hosting for testability.
/// Real implementation: `GitHubSource`.
#[async_trait]
pub trait FileSource: Send + Sync {
    async fn user_exists(&self, user: &str) -> Result<bool, GenieError>;

    async fn repository_exists(&self, user: &str, repository: &str) -> Result<bool, GenieError>;

    /// Every supported file in the repository, depth-first in listing order.
    /// Unreadable files and directories are skipped.
    async fn list_files(&self, user: &str, repository: &str)
    -> Result<Vec<FileRecord>, GenieError>;
}

/// Which files are read and which directories are descended into.
#[derive(Debug, Clone)]
pub struct FilterPolicy {
    supported_extensions: HashSet<String>,
    excluded_directories: HashSet<String>,
}

impl FilterPolicy {
    pub fn new<E, D>(supported_extensions: E, excluded_directories: D) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            supported_extensions: supported_extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            excluded_directories: excluded_directories
                .into_iter()
                .map(|d| d.as_ref().to_string())
                .collect(),
        }
    }

    pub fn from_config(config: &HostingSection) -> Self {
        Self::new(&config.supported_extensions, &config.excluded_directories)
    }

    /// The text after the last `.` of a file name, or the whole name when
    /// there is no dot.
    pub fn extension_of(file_name: &str) -> &str {
        file_name.rsplit('.').next().unwrap_or(file_name)
    }

    pub fn is_supported_file(&self, file_name: &str) -> bool {
        let ext = Self::extension_of(file_name).to_ascii_lowercase();
        self.supported_extensions.contains(&ext)
    }

    /// Directory names are matched exactly.
    pub fn is_excluded_dir(&self, dir_name: &str) -> bool {
        self.excluded_directories.contains(dir_name)
    }
}
