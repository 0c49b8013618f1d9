//! Canvas/query-result reconciliation.
//!
//! # Responsibility
//! - Append file-link nodes for target records missing from the canvas.
//! - Drop file-link nodes whose record left the target set.
//!
//! # Invariants
//! - Opaque nodes, edges and passthrough keys are never modified.
//! - Matched file-link nodes keep their id, bounds and extra fields.
//! - No second node is created for a path already linked on the canvas.
//! - Duplicate target paths are inserted once (first occurrence wins).

use super::id_gen::NodeIdGenerator;
use crate::model::canvas::{CanvasDocument, CanvasNode, FileLinkNode};
use crate::model::geometry::Bounds;
use crate::model::record::FileRecord;
use log::warn;
use std::collections::HashSet;

pub const DEFAULT_CASCADE_STEP: f64 = 100.0;
pub const DEFAULT_NODE_SIZE: f64 = 400.0;

/// Placement policy for newly inserted nodes.
///
/// The k-th insertion of one pass lands at `(step * k, step * k)`. This only
/// keeps new nodes apart from each other, not from pre-existing ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub step: f64,
    pub node_width: f64,
    pub node_height: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            step: DEFAULT_CASCADE_STEP,
            node_width: DEFAULT_NODE_SIZE,
            node_height: DEFAULT_NODE_SIZE,
        }
    }
}

impl Placement {
    pub fn bounds_for(&self, index: usize) -> Bounds {
        let offset = self.step * index as f64;
        Bounds::new(offset, offset, self.node_width, self.node_height)
    }
}

/// Reconciled document plus the node ids that changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    pub document: CanvasDocument,
    /// Ids of appended nodes, in insertion order.
    pub added: Vec<String>,
    /// Ids of removed nodes, in original canvas order.
    pub removed: Vec<String>,
}

/// Reconciles `document` against `targets` and returns the new document.
pub fn reconcile(
    document: CanvasDocument,
    targets: &[FileRecord],
    ids: &mut dyn NodeIdGenerator,
    placement: &Placement,
) -> CanvasDocument {
    reconcile_with_outcome(document, targets, ids, placement).document
}

/// Same as [`reconcile`], also reporting which node ids were added/removed.
pub fn reconcile_with_outcome(
    mut document: CanvasDocument,
    targets: &[FileRecord],
    ids: &mut dyn NodeIdGenerator,
    placement: &Placement,
) -> ReconcileOutcome {
    let mut linked: HashSet<String> = document
        .file_links()
        .map(|node| node.file.clone())
        .collect();
    let target_paths: HashSet<&str> = targets.iter().map(|record| record.path.as_str()).collect();

    let mut removed = Vec::new();
    document.nodes.retain(|node| match node.linked_path() {
        Some(path) if !target_paths.contains(path) => {
            removed.push(node.id().to_string());
            false
        }
        _ => true,
    });

    let mut added = Vec::new();
    let mut seen = HashSet::new();
    for record in targets {
        if !seen.insert(record.path.as_str()) {
            warn!(
                "event=duplicate_target module=reconcile status=skipped path={}",
                record.path
            );
            continue;
        }
        if !linked.insert(record.path.clone()) {
            continue;
        }

        let node = FileLinkNode::new(
            ids.next_id(record),
            record.path.as_str(),
            placement.bounds_for(added.len()),
        );
        added.push(node.id.clone());
        document.nodes.push(CanvasNode::FileLink(node));
    }

    ReconcileOutcome {
        document,
        added,
        removed,
    }
}

#[cfg(test)]
mod tests {
    use super::{reconcile_with_outcome, Placement};
    use crate::model::canvas::CanvasDocument;
    use crate::model::record::FileRecord;

    fn doc(value: serde_json::Value) -> CanvasDocument {
        serde_json::from_value(value).expect("fixture document should parse")
    }

    #[test]
    fn duplicate_targets_insert_once() {
        let mut ids = |record: &FileRecord| format!("new-{}", record.name());
        let targets = vec![
            FileRecord::new("a.md"),
            FileRecord::new("a.md"),
            FileRecord::new("b.md"),
        ];
        let outcome = reconcile_with_outcome(
            CanvasDocument::empty(),
            &targets,
            &mut ids,
            &Placement::default(),
        );
        assert_eq!(outcome.added, vec!["new-a.md", "new-b.md"]);
        let second = outcome.document.nodes[1].bounds();
        assert_eq!((second.x, second.y), (100.0, 100.0));
    }

    #[test]
    fn pre_existing_duplicates_pass_through() {
        let document = doc(serde_json::json!({
            "nodes": [
                {"id": "x1", "type": "file", "file": "p.md", "x": 0, "y": 0, "width": 1, "height": 1},
                {"id": "x2", "type": "file", "file": "p.md", "x": 5, "y": 5, "width": 1, "height": 1}
            ]
        }));
        let mut ids = |_: &FileRecord| "unused".to_string();
        let outcome = reconcile_with_outcome(
            document.clone(),
            &[FileRecord::new("p.md")],
            &mut ids,
            &Placement::default(),
        );
        assert_eq!(outcome.document, document);
        assert!(outcome.added.is_empty());
        assert!(outcome.removed.is_empty());
    }

    #[test]
    fn custom_placement_controls_cascade() {
        let placement = Placement {
            step: 50.0,
            node_width: 200.0,
            node_height: 120.0,
        };
        let bounds = placement.bounds_for(3);
        assert_eq!((bounds.x, bounds.y), (150.0, 150.0));
        assert_eq!((bounds.width, bounds.height), (200.0, 120.0));
    }
}
