//! File-system boundary: canvas documents, vault records and note metadata.
//!
//! # Responsibility
//! - Keep all disk access out of the pure reconcile/classify components.
//! - Apply whole-file atomic replacement for every write.
//!
//! # Invariants
//! - Unparseable canvas content degrades to an empty document.
//! - Writes go through a sibling temp file followed by a rename.

pub mod canvas_store;
pub mod frontmatter;
pub mod vault;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for canvas and note file operations.
#[derive(Debug)]
pub enum StoreError {
    /// Required file does not exist.
    NotFound(PathBuf),
    /// Read/write failure on an existing path.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Document could not be encoded.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Encode(err) => write!(f, "failed to encode canvas document: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Replaces `path` with `contents` via a sibling `.tmp` file and rename.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> StoreResult<()> {
    let temp_path = temp_path_for(path);
    {
        let mut file =
            std::fs::File::create(&temp_path).map_err(|err| StoreError::io(&temp_path, err))?;
        file.write_all(contents)
            .and_then(|()| file.sync_all())
            .map_err(|err| StoreError::io(&temp_path, err))?;
    }

    if let Err(err) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(StoreError::io(path, err));
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
