//! Sorter configuration.
//!
//! # Responsibility
//! - Hold every tunable the sync/sort use-cases read (sentinel suffix,
//!   placement, id style, metadata field names).
//! - Load from TOML once per invocation and pass the value explicitly.
//!
//! # Invariants
//! - Missing sections and keys fall back to the defaults below.
//! - `validate()` runs on every load path.
//!
//! Example:
//! ```toml
//! [canvas]
//! sentinel_suffix = "ns-center.svg"
//! note_extension = "md"
//!
//! [placement]
//! step = 100
//! node_width = 400
//! node_height = 400
//!
//! [ids]
//! style = "timestamp"
//!
//! [metadata]
//! distance_field = "ns-distance"
//! priority_field = "ns-priority"
//! ```

use crate::reconcile::id_gen::{NodeIdGenerator, TimestampIdGenerator, UuidIdGenerator};
use crate::reconcile::reconciler::{Placement, DEFAULT_CASCADE_STEP, DEFAULT_NODE_SIZE};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration load/validation error.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// File-link path suffix marking the center node.
    pub sentinel_suffix: String,
    /// Extension (no dot) of notes that receive sort metadata.
    pub note_extension: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            sentinel_suffix: "ns-center.svg".to_string(),
            note_extension: "md".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub step: f64,
    pub node_width: f64,
    pub node_height: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_CASCADE_STEP,
            node_width: DEFAULT_NODE_SIZE,
            node_height: DEFAULT_NODE_SIZE,
        }
    }
}

impl PlacementConfig {
    pub fn placement(&self) -> Placement {
        Placement {
            step: self.step,
            node_width: self.node_width,
            node_height: self.node_height,
        }
    }
}

/// Id scheme for inserted nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStyle {
    /// `<name>-<YYYYMMDDTHHmmss>`.
    #[default]
    Timestamp,
    /// Random v4 UUID.
    Uuid,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdConfig {
    pub style: IdStyle,
}

impl IdConfig {
    pub fn generator(&self) -> Box<dyn NodeIdGenerator> {
        match self.style {
            IdStyle::Timestamp => Box::new(TimestampIdGenerator::new()),
            IdStyle::Uuid => Box::new(UuidIdGenerator),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub distance_field: String,
    pub priority_field: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            distance_field: "ns-distance".to_string(),
            priority_field: "ns-priority".to_string(),
        }
    }
}

/// Root configuration value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SorterConfig {
    pub canvas: CanvasConfig,
    pub placement: PlacementConfig,
    pub ids: IdConfig,
    pub metadata: MetadataConfig,
}

impl SorterConfig {
    /// Parses and validates TOML text.
    pub fn from_toml(input: &str) -> ConfigResult<Self> {
        let config: SorterConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(content.as_str())
    }

    /// Loads `path` when given, otherwise returns defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let placement = &self.placement;
        if !(placement.node_width > 0.0 && placement.node_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "placement node size must be positive, got {}x{}",
                placement.node_width, placement.node_height
            )));
        }
        if !(placement.step >= 0.0 && placement.step.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "placement step must be a non-negative number, got {}",
                placement.step
            )));
        }

        for (name, value) in [
            ("canvas.sentinel_suffix", &self.canvas.sentinel_suffix),
            ("canvas.note_extension", &self.canvas.note_extension),
            ("metadata.distance_field", &self.metadata.distance_field),
            ("metadata.priority_field", &self.metadata.priority_field),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} cannot be empty")));
            }
        }
        if self.metadata.distance_field == self.metadata.priority_field {
            return Err(ConfigError::Invalid(
                "metadata.distance_field and metadata.priority_field must differ".to_string(),
            ));
        }
        Ok(())
    }
}
