use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use futures::future::{BoxFuture, FutureExt};
use genie_common::FileRecord;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use super::{FileSource, FilterPolicy};
use crate::config::HostingSection;
use crate::errors::GenieError;

const USER_AGENT: &str = "readme-genie";

/// One entry of a `GET /repos/{owner}/{repo}/contents/{path}` directory listing.
#[derive(Debug, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// A single file from the contents API (subset of fields).
#[derive(Debug, Deserialize)]
pub struct FileContent {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl FileContent {
    /// Decode the payload to text. Returns `None` when the API omitted the
    /// content (files over 1 MB come back with encoding `none`).
    pub fn decode(&self) -> Result<Option<String>, base64::DecodeError> {
        let Some(raw) = self.content.as_deref() else {
            return Ok(None);
        };
        match self.encoding.as_deref() {
            Some("base64") => {
                // GitHub wraps base64 at 60 columns
                let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
                let bytes = STANDARD.decode(compact)?;
                Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
            }
            Some("none") => Ok(None),
            _ if raw.is_empty() => Ok(None),
            _ => Ok(Some(raw.to_string())),
        }
    }
}

/// Reads repositories through the GitHub REST API.
pub struct GitHubSource {
    client: Client,
    api_base_url: String,
    token: String,
    policy: FilterPolicy,
}

impl GitHubSource {
    pub fn new(api_base_url: impl Into<String>, token: impl Into<String>, policy: FilterPolicy) -> Self {
        Self {
            client: Client::new(),
            api_base_url: api_base_url.into(),
            token: token.into(),
            policy,
        }
    }

    pub fn from_config(config: &HostingSection) -> Self {
        Self::new(
            &config.api_base_url,
            &config.token,
            FilterPolicy::from_config(config),
        )
    }

    /// Build an API URL from path segments, percent-encoding each one.
    fn api_url<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Result<Url, GenieError> {
        let mut url = Url::parse(&self.api_base_url).map_err(|e| {
            GenieError::HostingApi(format!("Invalid API base URL '{}': {}", self.api_base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                GenieError::HostingApi(format!("API base URL cannot be a base: {}", self.api_base_url))
            })?
            .pop_if_empty()
            .extend(segments.into_iter().filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn contents_url(&self, user: &str, repository: &str, path: &str) -> Result<Url, GenieError> {
        self.api_url(
            ["repos", user, repository, "contents"]
                .into_iter()
                .chain(path.split('/')),
        )
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT);
        if self.token.is_empty() {
            request
        } else {
            request.header("Authorization", format!("Bearer {}", self.token))
        }
    }

    /// `true` on 2xx, `false` on 404, error otherwise.
    async fn exists(&self, url: Url) -> Result<bool, GenieError> {
        let resp = self
            .get(url.clone())
            .send()
            .await
            .map_err(|e| GenieError::HostingApi(format!("Request to {} failed: {}", url, e)))?;

        match resp.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            s => Err(GenieError::HostingApi(format!("{} returned {}", url, s))),
        }
    }

    async fn list_dir(
        &self,
        user: &str,
        repository: &str,
        path: &str,
    ) -> anyhow::Result<Vec<ContentEntry>> {
        let url = self.contents_url(user, repository, path)?;
        let entries = self
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<ContentEntry>>()
            .await?;
        Ok(entries)
    }

    async fn fetch_file(
        &self,
        user: &str,
        repository: &str,
        path: &str,
    ) -> anyhow::Result<Option<String>> {
        let url = self.contents_url(user, repository, path)?;
        let file = self
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<FileContent>()
            .await?;
        Ok(file.decode()?)
    }

    /// Depth-first walk of one directory. Failures are logged and skipped.
    fn collect_dir<'a>(
        &'a self,
        user: &'a str,
        repository: &'a str,
        path: String,
    ) -> BoxFuture<'a, Vec<FileRecord>> {
        async move {
            let entries = match self.list_dir(user, repository, &path).await {
                Ok(entries) => entries,
                Err(e) => {
                    let error = format!("{:#}", e);
                    tracing::warn!(path = %path, %error, "Skipping unreadable directory");
                    return Vec::new();
                }
            };

            let mut files = Vec::new();
            for entry in entries {
                match entry.kind {
                    EntryKind::File if self.policy.is_supported_file(&entry.name) => {
                        match self.fetch_file(user, repository, &entry.path).await {
                            Ok(Some(content)) => files.push(FileRecord::new(entry.path, content)),
                            Ok(None) => {
                                tracing::debug!(path = %entry.path, "File has no inline content, skipping");
                            }
                            Err(e) => {
                                let error = format!("{:#}", e);
                                tracing::warn!(path = %entry.path, %error, "Skipping unreadable file");
                            }
                        }
                    }
                    EntryKind::Dir if !self.policy.is_excluded_dir(&entry.name) => {
                        let nested = self.collect_dir(user, repository, entry.path).await;
                        files.extend(nested);
                    }
                    _ => {}
                }
            }
            files
        }
        .boxed()
    }
}

#[async_trait]
impl FileSource for GitHubSource {
    async fn user_exists(&self, user: &str) -> Result<bool, GenieError> {
        self.exists(self.api_url(["users", user])?).await
    }

    async fn repository_exists(&self, user: &str, repository: &str) -> Result<bool, GenieError> {
        self.exists(self.api_url(["repos", user, repository])?).await
    }

    async fn list_files(
        &self,
        user: &str,
        repository: &str,
    ) -> Result<Vec<FileRecord>, GenieError> {
        let files = self.collect_dir(user, repository, String::new()).await;
        let chars: usize = files.iter().map(FileRecord::content_chars).sum();
        tracing::info!(user, repository, files = files.len(), chars, "Listed repository files");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Request, State},
        http::StatusCode as AxumStatus,
        response::{IntoResponse, Response},
    };
    use std::collections::HashMap;
    use std::sync::Arc;

    type Routes = Arc<HashMap<String, (AxumStatus, serde_json::Value)>>;

    async fn canned(State(routes): State<Routes>, req: Request) -> Response {
        match routes.get(req.uri().path()) {
            Some((status, body)) => (*status, Json(body.clone())).into_response(),
            None => (AxumStatus::NOT_FOUND, Json(serde_json::json!({"message": "Not Found"})))
                .into_response(),
        }
    }

    /// Serve canned GitHub responses on an ephemeral port; returns the base URL.
    async fn fake_github(routes: Vec<(&str, AxumStatus, serde_json::Value)>) -> String {
        let routes: Routes = Arc::new(
            routes
                .into_iter()
                .map(|(path, status, body)| (path.to_string(), (status, body)))
                .collect(),
        );
        let app = Router::new().fallback(canned).with_state(routes);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn dir_entry(name: &str, path: &str, kind: &str) -> serde_json::Value {
        serde_json::json!({"name": name, "path": path, "type": kind, "sha": "abc"})
    }

    fn file_body(text: &str) -> serde_json::Value {
        serde_json::json!({"content": STANDARD.encode(text), "encoding": "base64"})
    }

    fn source(base: &str) -> GitHubSource {
        GitHubSource::from_config(&HostingSection {
            api_base_url: base.to_string(),
            ..HostingSection::default()
        })
    }

    // ── Deserialization ──────────────────────────────────────────────

    #[test]
    fn test_content_entry_kinds() {
        let json = r#"[
            {"name": "src", "path": "src", "type": "dir"},
            {"name": "main.rs", "path": "src/main.rs", "type": "file"},
            {"name": "link", "path": "link", "type": "symlink"},
            {"name": "weird", "path": "weird", "type": "something-new"}
        ]"#;
        let entries: Vec<ContentEntry> = serde_json::from_str(json).unwrap();
        let kinds: Vec<EntryKind> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EntryKind::Dir, EntryKind::File, EntryKind::Symlink, EntryKind::Other]
        );
    }

    #[test]
    fn test_decode_wrapped_base64() {
        let encoded = STANDARD.encode("fn main() {}\n");
        let wrapped = format!("{}\n{}\n", &encoded[..8], &encoded[8..]);
        let file = FileContent {
            content: Some(wrapped),
            encoding: Some("base64".into()),
        };
        assert_eq!(file.decode().unwrap().as_deref(), Some("fn main() {}\n"));
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let file = FileContent {
            content: Some(STANDARD.encode([0x66u8, 0x6f, 0xff])),
            encoding: Some("base64".into()),
        };
        assert_eq!(file.decode().unwrap().as_deref(), Some("fo\u{FFFD}"));
    }

    #[test]
    fn test_decode_large_file_without_content() {
        let file: FileContent =
            serde_json::from_str(r#"{"content": "", "encoding": "none"}"#).unwrap();
        assert_eq!(file.decode().unwrap(), None);
        let file: FileContent = serde_json::from_str(r#"{"type": "file"}"#).unwrap();
        assert_eq!(file.decode().unwrap(), None);
    }

    #[test]
    fn test_decode_bad_base64_is_error() {
        let file = FileContent {
            content: Some("!!!not base64!!!".into()),
            encoding: Some("base64".into()),
        };
        assert!(file.decode().is_err());
    }

    // ── URL building ─────────────────────────────────────────────────

    #[test]
    fn test_contents_url_root_and_nested() {
        let src = source("https://api.github.com");
        assert_eq!(
            src.contents_url("alice", "blog", "").unwrap().as_str(),
            "https://api.github.com/repos/alice/blog/contents"
        );
        assert_eq!(
            src.contents_url("alice", "blog", "src/posts/a b.md").unwrap().as_str(),
            "https://api.github.com/repos/alice/blog/contents/src/posts/a%20b.md"
        );
    }

    #[test]
    fn test_api_url_with_base_path() {
        let src = source("https://ghe.example.com/api/v3/");
        assert_eq!(
            src.api_url(["users", "alice"]).unwrap().as_str(),
            "https://ghe.example.com/api/v3/users/alice"
        );
    }

    #[test]
    fn test_api_url_rejects_garbage_base() {
        let src = source("not a url");
        assert!(matches!(
            src.api_url(["users", "alice"]),
            Err(GenieError::HostingApi(_))
        ));
    }

    // ── Against a fake GitHub ────────────────────────────────────────

    #[tokio::test]
    async fn test_existence_checks() {
        let base = fake_github(vec![
            ("/users/alice", AxumStatus::OK, serde_json::json!({"login": "alice"})),
            ("/repos/alice/blog", AxumStatus::OK, serde_json::json!({"name": "blog"})),
            ("/users/limited", AxumStatus::FORBIDDEN, serde_json::json!({})),
        ])
        .await;
        let src = source(&base);

        assert!(src.user_exists("alice").await.unwrap());
        assert!(!src.user_exists("bob").await.unwrap());
        assert!(src.repository_exists("alice", "blog").await.unwrap());
        assert!(!src.repository_exists("alice", "nope").await.unwrap());
        assert!(matches!(
            src.user_exists("limited").await,
            Err(GenieError::HostingApi(_))
        ));
    }

    #[tokio::test]
    async fn test_list_files_walks_depth_first_and_filters() {
        let base = fake_github(vec![
            (
                "/repos/alice/blog/contents",
                AxumStatus::OK,
                serde_json::json!([
                    dir_entry("README.md", "README.md", "file"),
                    dir_entry("src", "src", "dir"),
                    dir_entry("node_modules", "node_modules", "dir"),
                    dir_entry("logo.png", "logo.png", "file"),
                    dir_entry("index.js", "index.js", "file"),
                ]),
            ),
            ("/repos/alice/blog/contents/README.md", AxumStatus::OK, file_body("# Blog")),
            (
                "/repos/alice/blog/contents/src",
                AxumStatus::OK,
                serde_json::json!([dir_entry("app.py", "src/app.py", "file")]),
            ),
            ("/repos/alice/blog/contents/src/app.py", AxumStatus::OK, file_body("print('hi')")),
            ("/repos/alice/blog/contents/index.js", AxumStatus::OK, file_body("run()")),
            (
                "/repos/alice/blog/contents/node_modules",
                AxumStatus::OK,
                serde_json::json!([dir_entry("dep.js", "node_modules/dep.js", "file")]),
            ),
        ])
        .await;

        let files = source(&base).list_files("alice", "blog").await.unwrap();
        assert_eq!(
            files,
            vec![
                FileRecord::new("README.md", "# Blog"),
                FileRecord::new("src/app.py", "print('hi')"),
                FileRecord::new("index.js", "run()"),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_files_skips_failures() {
        let base = fake_github(vec![
            (
                "/repos/alice/blog/contents",
                AxumStatus::OK,
                serde_json::json!([
                    dir_entry("broken.rs", "broken.rs", "file"),
                    dir_entry("private", "private", "dir"),
                    dir_entry("ok.rs", "ok.rs", "file"),
                ]),
            ),
            ("/repos/alice/blog/contents/broken.rs", AxumStatus::INTERNAL_SERVER_ERROR, serde_json::json!({})),
            ("/repos/alice/blog/contents/private", AxumStatus::FORBIDDEN, serde_json::json!({})),
            ("/repos/alice/blog/contents/ok.rs", AxumStatus::OK, file_body("fn ok() {}")),
        ])
        .await;

        let files = source(&base).list_files("alice", "blog").await.unwrap();
        assert_eq!(files, vec![FileRecord::new("ok.rs", "fn ok() {}")]);
    }

    #[tokio::test]
    async fn test_list_files_missing_root_is_empty() {
        let base = fake_github(vec![]).await;
        let files = source(&base).list_files("alice", "blog").await.unwrap();
        assert!(files.is_empty());
    }
}
