//! Target record model.
//!
//! A `FileRecord` is one entry of a query result: a vault-relative file the
//! canvas should mirror one-to-one as a file-link node.

use serde::{Deserialize, Serialize};

/// Query-result entry keyed by its vault-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileRecord {
    /// `/`-separated path relative to the vault root. Identity key.
    pub path: String,
}

impl FileRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Base name including extension (`notes/Idea.md` -> `Idea.md`).
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(self.path.as_str())
    }
}
