/// One text file fetched from a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Repo-relative path, unique within a listing.
    pub path: String,
    /// Decoded text content.
    pub content: String,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Content length in characters (not bytes).
    pub fn content_chars(&self) -> usize {
        self.content.chars().count()
    }
}
