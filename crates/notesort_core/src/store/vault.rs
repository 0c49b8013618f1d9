//! Vault directory access.
//!
//! # Responsibility
//! - Resolve vault-relative record paths to files on disk.
//! - Produce ordered target record sets from a folder/content query or a
//!   plain list file.
//!
//! # Invariants
//! - Record paths are vault-relative and `/`-separated.
//! - Paths escaping the vault root (`..`, absolute) never resolve.
//! - Query results are sorted by path.

use crate::model::record::FileRecord;
use log::{debug, info};
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Component, Path, PathBuf};

pub type VaultResult<T> = Result<T, VaultError>;

/// Vault-layer error.
#[derive(Debug)]
pub enum VaultError {
    /// Root path is missing or not a directory.
    NotADirectory(PathBuf),
    /// Directory walk or file read failure.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Content filter is not a valid regular expression.
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

impl Display for VaultError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotADirectory(path) => {
                write!(f, "vault root is not a directory: {}", path.display())
            }
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::InvalidPattern { pattern, source } => {
                write!(f, "invalid content pattern `{pattern}`: {source}")
            }
        }
    }
}

impl Error for VaultError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotADirectory(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::InvalidPattern { source, .. } => Some(source),
        }
    }
}

/// Saved-filter replacement: which vault files form the target set.
#[derive(Debug, Clone)]
pub struct VaultQuery {
    /// Vault-relative folder prefix; `None` scans the whole vault.
    pub folder: Option<String>,
    /// File extension without the dot.
    pub extension: String,
    /// Files must contain a match to be selected.
    pub content_pattern: Option<Regex>,
    /// Vault-relative paths never selected.
    pub exclude: Vec<String>,
}

impl Default for VaultQuery {
    fn default() -> Self {
        Self {
            folder: None,
            extension: "md".to_string(),
            content_pattern: None,
            exclude: Vec::new(),
        }
    }
}

impl VaultQuery {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            ..Self::default()
        }
    }

    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        let folder = folder.into();
        let trimmed = folder.trim_matches('/');
        self.folder = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Compiles and attaches a content filter.
    pub fn matching(mut self, pattern: &str) -> VaultResult<Self> {
        let regex = Regex::new(pattern).map_err(|source| VaultError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.content_pattern = Some(regex);
        Ok(self)
    }

    pub fn excluding(mut self, path: impl Into<String>) -> Self {
        self.exclude.push(path.into());
        self
    }
}

/// Handle on a vault root directory.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    /// Opens a vault rooted at an existing directory.
    pub fn open(root: impl AsRef<Path>) -> VaultResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(VaultError::NotADirectory(root.to_path_buf()));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a vault-relative path to an existing file.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative_path = Path::new(relative);
        let contained = relative_path
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if relative.is_empty() || !contained {
            return None;
        }
        let full = self.root.join(relative_path);
        full.is_file().then_some(full)
    }

    /// Runs `query` and returns matching records sorted by path.
    pub fn query(&self, query: &VaultQuery) -> VaultResult<Vec<FileRecord>> {
        let start = match query.folder.as_deref() {
            Some(folder) => self.root.join(folder),
            None => self.root.clone(),
        };
        if !start.is_dir() {
            debug!(
                "event=vault_query module=vault status=empty reason=folder_missing folder={}",
                start.display()
            );
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        collect_files(&start, query.extension.as_str(), &mut files)?;

        let mut records = Vec::new();
        for file in files {
            let Some(relative) = self.relative_path(&file) else {
                continue;
            };
            if query.exclude.iter().any(|excluded| excluded == &relative) {
                continue;
            }
            if let Some(pattern) = &query.content_pattern {
                let content = std::fs::read_to_string(&file).map_err(|source| VaultError::Io {
                    path: file.clone(),
                    source,
                })?;
                if !pattern.is_match(content.as_str()) {
                    continue;
                }
            }
            records.push(FileRecord::new(relative));
        }
        records.sort();

        info!(
            "event=vault_query module=vault status=ok matched={} folder={}",
            records.len(),
            query.folder.as_deref().unwrap_or("/")
        );
        Ok(records)
    }

    fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

/// Reads a target list: one vault-relative path per line.
///
/// Blank lines and `#` comments are skipped; order is preserved.
pub fn read_target_list(path: impl AsRef<Path>) -> VaultResult<Vec<FileRecord>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| VaultError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_target_list(content.as_str()))
}

pub fn parse_target_list(content: &str) -> Vec<FileRecord> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| FileRecord::new(line.replace('\\', "/")))
        .collect()
}

fn collect_files(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> VaultResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|source| VaultError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| VaultError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden {
            continue;
        }
        if path.is_dir() {
            collect_files(&path, extension, out)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        {
            out.push(path);
        }
    }
    Ok(())
}
