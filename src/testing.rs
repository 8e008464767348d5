//! In-memory collaborators shared by unit tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use genie_common::FileRecord;
use tokio::time::Instant;

use crate::completion::TextCompleter;
use crate::errors::{CompletionError, GenieError};
use crate::source::FileSource;

/// Fixed set of users, repositories and files.
#[derive(Default)]
pub struct MockFileSource {
    users: HashSet<String>,
    repositories: HashSet<(String, String)>,
    files: Vec<FileRecord>,
    hosting_down: bool,
    list_calls: AtomicUsize,
}

impl MockFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.users.insert(user.to_string());
        self
    }

    /// Registers the repository and its owner.
    pub fn with_repository(mut self, user: &str, repository: &str) -> Self {
        self.users.insert(user.to_string());
        self.repositories
            .insert((user.to_string(), repository.to_string()));
        self
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.push(FileRecord::new(path, content));
        self
    }

    /// Every existence check fails with a hosting error.
    pub fn hosting_down(mut self) -> Self {
        self.hosting_down = true;
        self
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check(&self, found: bool) -> Result<bool, GenieError> {
        if self.hosting_down {
            Err(GenieError::HostingApi("503 Service Unavailable".into()))
        } else {
            Ok(found)
        }
    }
}

#[async_trait]
impl FileSource for MockFileSource {
    async fn user_exists(&self, user: &str) -> Result<bool, GenieError> {
        self.check(self.users.contains(user))
    }

    async fn repository_exists(&self, user: &str, repository: &str) -> Result<bool, GenieError> {
        self.check(
            self.repositories
                .contains(&(user.to_string(), repository.to_string())),
        )
    }

    async fn list_files(
        &self,
        _user: &str,
        _repository: &str,
    ) -> Result<Vec<FileRecord>, GenieError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.files.clone())
    }
}

type Responder = dyn Fn(usize, &str) -> Result<String, CompletionError> + Send + Sync;

/// One observed completion call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub at: Instant,
}

/// Records every prompt and answers through a closure of `(call_index, prompt)`.
pub struct MockCompleter {
    responder: Box<Responder>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockCompleter {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(usize, &str) -> Result<String, CompletionError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers call `i` with `[summary i]`.
    pub fn numbered() -> Self {
        Self::new(|i, _| Ok(format!("[summary {}]", i)))
    }

    /// Like `numbered`, but the listed call indices fail with a 500.
    pub fn failing_on(indices: &[usize]) -> Self {
        let failing: HashSet<usize> = indices.iter().copied().collect();
        Self::new(move |i, _| {
            if failing.contains(&i) {
                Err(CompletionError::Status {
                    status: 500,
                    body: "internal".into(),
                })
            } else {
                Ok(format!("[summary {}]", i))
            }
        })
    }

    pub fn always_failing() -> Self {
        Self::new(|_, _| Err(CompletionError::Transport("connection refused".into())))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.prompt).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TextCompleter for MockCompleter {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                at: Instant::now(),
            });
            calls.len() - 1
        };
        (self.responder)(index, prompt)
    }
}
