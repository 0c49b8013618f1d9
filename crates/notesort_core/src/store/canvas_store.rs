//! Canvas document persistence.
//!
//! # Responsibility
//! - Read canvas JSON leniently (parse failures become an empty document).
//! - Write canvas JSON pretty-printed with 2-space indent, atomically.

use super::{write_atomic, StoreError, StoreResult};
use crate::model::canvas::CanvasDocument;
use log::{info, warn};
use std::path::Path;

/// Parses canvas JSON; invalid content yields [`CanvasDocument::empty`].
pub fn parse_canvas(content: &str) -> CanvasDocument {
    match serde_json::from_str(content) {
        Ok(document) => document,
        Err(err) => {
            warn!(
                "event=canvas_parse module=store status=fallback_empty line={} column={} error={}",
                err.line(),
                err.column(),
                err
            );
            CanvasDocument::empty()
        }
    }
}

/// Loads a canvas, treating a missing or unparseable file as empty.
///
/// # Errors
/// - Returns `StoreError::Io` for read failures other than "not found".
pub fn load_canvas(path: impl AsRef<Path>) -> StoreResult<CanvasDocument> {
    let path = path.as_ref();
    match load_canvas_strict(path) {
        Err(StoreError::NotFound(_)) => {
            warn!(
                "event=canvas_load module=store status=fallback_empty reason=not_found path={}",
                path.display()
            );
            Ok(CanvasDocument::empty())
        }
        other => other,
    }
}

/// Loads a canvas that must exist; content is still parsed leniently.
///
/// # Errors
/// - Returns `StoreError::NotFound` when the file is absent.
/// - Returns `StoreError::Io` for other read failures.
pub fn load_canvas_strict(path: impl AsRef<Path>) -> StoreResult<CanvasDocument> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|err| StoreError::io(path, err))?;
    let document = parse_canvas(content.as_str());
    info!(
        "event=canvas_load module=store status=ok nodes={} path={}",
        document.nodes.len(),
        path.display()
    );
    Ok(document)
}

/// Serializes a canvas the way the editor writes it.
pub fn render_canvas(document: &CanvasDocument) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Overwrites the whole canvas file.
///
/// Last writer wins; no versioning is attempted.
pub fn save_canvas(path: impl AsRef<Path>, document: &CanvasDocument) -> StoreResult<()> {
    let path = path.as_ref();
    let json = render_canvas(document)?;
    write_atomic(path, json.as_bytes())?;
    info!(
        "event=canvas_save module=store status=ok nodes={} bytes={} path={}",
        document.nodes.len(),
        json.len(),
        path.display()
    );
    Ok(())
}
