//! Canvas document model.
//!
//! # Responsibility
//! - Mirror the editor's canvas JSON shape with typed node variants.
//! - Carry every field the core does not interpret through unchanged.
//!
//! # Invariants
//! - A node is `FileLink` only when `type == "file"`, `id` and `file` are
//!   strings and all four geometry keys are numbers. Anything else is
//!   `Opaque` and serializes back to the exact JSON value it was read from.
//! - One odd node never fails the whole document.
//! - `edges`, `connections` and unknown top-level keys are never inspected.

use super::geometry::{Bounds, Rect};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `type` tag value of file-link nodes.
pub const FILE_NODE_TYPE: &str = "file";

/// Node mirroring exactly one vault file by path.
#[derive(Debug, Clone, PartialEq)]
pub struct FileLinkNode {
    pub id: String,
    pub bounds: Bounds,
    /// Vault-relative path of the linked file.
    pub file: String,
    /// Passthrough fields such as `color` or `subpath`.
    pub extra: Map<String, Value>,
}

impl FileLinkNode {
    pub fn new(id: impl Into<String>, file: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            id: id.into(),
            bounds,
            file: file.into(),
            extra: Map::new(),
        }
    }
}

/// Any node the core does not interpret (text, link, group, malformed file
/// nodes, ...). The raw JSON value is kept and written back as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueNode {
    /// `id` read leniently; numeric ids are stringified, others are empty.
    pub id: String,
    /// Geometry read leniently; non-numeric or missing values are `0`.
    pub bounds: Bounds,
    pub raw: Value,
}

impl OpaqueNode {
    pub fn from_value(raw: Value) -> Self {
        let id = match raw.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => String::new(),
        };
        let coord = |key: &str| raw.get(key).and_then(Value::as_f64).unwrap_or(0.0);
        let bounds = Bounds::new(coord("x"), coord("y"), coord("width"), coord("height"));
        Self { id, bounds, raw }
    }

    /// Raw `type` tag, if it is a string.
    pub fn kind(&self) -> Option<&str> {
        self.raw.get("type").and_then(Value::as_str)
    }
}

/// Canvas node discriminated by its `type` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasNode {
    FileLink(FileLinkNode),
    Opaque(OpaqueNode),
}

impl CanvasNode {
    pub fn id(&self) -> &str {
        match self {
            Self::FileLink(node) => node.id.as_str(),
            Self::Opaque(node) => node.id.as_str(),
        }
    }

    pub fn bounds(&self) -> &Bounds {
        match self {
            Self::FileLink(node) => &node.bounds,
            Self::Opaque(node) => &node.bounds,
        }
    }

    /// Linked vault path for file-link nodes, `None` for everything else.
    pub fn linked_path(&self) -> Option<&str> {
        match self {
            Self::FileLink(node) => Some(node.file.as_str()),
            Self::Opaque(_) => None,
        }
    }

    pub fn as_file_link(&self) -> Option<&FileLinkNode> {
        match self {
            Self::FileLink(node) => Some(node),
            Self::Opaque(_) => None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            id: self.id().to_string(),
            bounds: *self.bounds(),
        }
    }
}

/// Whole canvas file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasDocument {
    #[serde(default)]
    pub nodes: Vec<CanvasNode>,
    #[serde(default)]
    pub edges: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanvasDocument {
    /// Fresh canvas in the editor's default shape:
    /// `{"nodes": [], "edges": [], "connections": []}`.
    pub fn empty() -> Self {
        Self {
            connections: Some(Value::Array(Vec::new())),
            ..Self::default()
        }
    }

    pub fn file_links(&self) -> impl Iterator<Item = &FileLinkNode> {
        self.nodes.iter().filter_map(CanvasNode::as_file_link)
    }

    pub fn find_node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }
}

const GEOMETRY_KEYS: [&str; 4] = ["x", "y", "width", "height"];

#[derive(Deserialize)]
struct FileLinkWire {
    id: String,
    #[serde(rename = "type")]
    _kind: String,
    file: String,
    #[serde(flatten)]
    bounds: Bounds,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Serialize)]
struct FileLinkWireRef<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(flatten)]
    bounds: &'a Bounds,
    file: &'a str,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

impl CanvasNode {
    /// Types one raw node; anything short of a complete file link stays opaque.
    pub fn from_value(raw: Value) -> Self {
        match file_link_from(&raw) {
            Some(node) => Self::FileLink(node),
            None => Self::Opaque(OpaqueNode::from_value(raw)),
        }
    }
}

fn file_link_from(raw: &Value) -> Option<FileLinkNode> {
    let object = raw.as_object()?;
    if object.get("type").and_then(Value::as_str) != Some(FILE_NODE_TYPE) {
        return None;
    }
    let typed_geometry = GEOMETRY_KEYS
        .iter()
        .all(|key| object.get(*key).is_some_and(Value::is_number));
    if !typed_geometry {
        return None;
    }
    let wire = FileLinkWire::deserialize(raw).ok()?;
    Some(FileLinkNode {
        id: wire.id,
        bounds: wire.bounds,
        file: wire.file,
        extra: wire.extra,
    })
}

impl<'de> Deserialize<'de> for CanvasNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl Serialize for CanvasNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::FileLink(node) => FileLinkWireRef {
                id: node.id.as_str(),
                kind: FILE_NODE_TYPE,
                bounds: &node.bounds,
                file: node.file.as_str(),
                extra: &node.extra,
            }
            .serialize(serializer),
            Self::Opaque(node) => node.raw.serialize(serializer),
        }
    }
}
