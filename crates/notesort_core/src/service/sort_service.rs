//! Sort-metadata export use-case.
//!
//! # Responsibility
//! - Locate the center node, classify note nodes around it and write the
//!   resulting distance/priority into each note's front matter.
//!
//! # Invariants
//! - The first file-link whose path ends with the sentinel suffix is the
//!   center; without one the origin rectangle is used.
//! - A note that cannot be resolved or written is reported and skipped;
//!   the remaining notes are still processed.

use super::{ServiceError, ServiceResult};
use crate::classify::spatial::classify;
use crate::config::SorterConfig;
use crate::model::canvas::{CanvasDocument, FileLinkNode};
use crate::model::geometry::Rect;
use crate::model::sort::{Quadrant, SortResult};
use crate::store::canvas_store::load_canvas_strict;
use crate::store::frontmatter::write_sort_metadata;
use crate::store::vault::Vault;
use log::{debug, error, info, warn};
use std::path::Path;

/// Whether classified values are written to notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Write front matter fields.
    Apply,
    /// Classify and report only.
    DryRun,
}

/// Per-note result of an export pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteOutcome {
    Written,
    /// Dry run; nothing written.
    Skipped,
    /// Linked file does not exist in the vault.
    Missing,
    /// Write failed with the given message.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortedNote {
    pub node_id: String,
    pub path: String,
    pub distance: f64,
    pub quadrant: Quadrant,
    pub outcome: NoteOutcome,
}

/// Summary of one export pass, entries in canvas order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SortReport {
    /// Id of the sentinel node used as center, if any.
    pub center: Option<String>,
    pub entries: Vec<SortedNote>,
}

impl SortReport {
    pub fn missing(&self) -> impl Iterator<Item = &SortedNote> {
        self.entries
            .iter()
            .filter(|entry| entry.outcome == NoteOutcome::Missing)
    }

    pub fn failed(&self) -> impl Iterator<Item = &SortedNote> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, NoteOutcome::Failed(_)))
    }

    pub fn written_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome == NoteOutcome::Written)
            .count()
    }
}

/// Returns the first file-link node whose path ends with `suffix`.
pub fn find_sentinel<'a>(document: &'a CanvasDocument, suffix: &str) -> Option<&'a FileLinkNode> {
    document.file_links().find(|node| node.file.ends_with(suffix))
}

/// Center rectangle: the sentinel node, or the origin when absent.
pub fn locate_center(document: &CanvasDocument, suffix: &str) -> Rect {
    find_sentinel(document, suffix)
        .map(|node| Rect {
            id: node.id.clone(),
            bounds: node.bounds,
        })
        .unwrap_or_else(Rect::origin)
}

/// File-link nodes whose path carries the note extension.
pub fn sort_candidates<'a>(document: &'a CanvasDocument, extension: &str) -> Vec<&'a FileLinkNode> {
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    document
        .file_links()
        .filter(|node| node.file.ends_with(suffix.as_str()))
        .collect()
}

/// Sort service bound to one configuration.
pub struct SortService {
    config: SorterConfig,
}

impl SortService {
    pub fn new(config: SorterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SorterConfig {
        &self.config
    }

    /// Classifies note nodes of an in-memory document.
    ///
    /// `center_id` overrides sentinel lookup with an explicit node.
    ///
    /// # Errors
    /// - Returns `ServiceError::CenterNotFound` when `center_id` is not on the canvas.
    pub fn classify_document(
        &self,
        document: &CanvasDocument,
        center_id: Option<&str>,
    ) -> ServiceResult<SortResult> {
        let center = match center_id {
            Some(id) => document
                .find_node(id)
                .map(|node| node.rect())
                .ok_or_else(|| ServiceError::CenterNotFound(id.to_string()))?,
            None => locate_center(document, self.config.canvas.sentinel_suffix.as_str()),
        };
        let rects: Vec<Rect> = sort_candidates(document, self.config.canvas.note_extension.as_str())
            .into_iter()
            .map(|node| Rect {
                id: node.id.clone(),
                bounds: node.bounds,
            })
            .collect();
        Ok(classify(&rects, &center))
    }

    /// Loads `canvas_path`, classifies its notes and writes their metadata.
    ///
    /// # Errors
    /// - Returns `ServiceError::Store` when the canvas is missing or unreadable.
    pub fn export_sort_data(
        &self,
        canvas_path: impl AsRef<Path>,
        vault: &Vault,
        mode: SortMode,
    ) -> ServiceResult<SortReport> {
        let canvas_path = canvas_path.as_ref();
        let document = load_canvas_strict(canvas_path)?;

        let sentinel = find_sentinel(&document, self.config.canvas.sentinel_suffix.as_str());
        match sentinel {
            Some(node) => info!(
                "event=sort_center module=service status=ok center_id={} x={} y={}",
                node.id, node.bounds.x, node.bounds.y
            ),
            None => info!("event=sort_center module=service status=default center=origin"),
        }

        let sorted = self.classify_document(&document, None)?;
        let candidates = sort_candidates(&document, self.config.canvas.note_extension.as_str());

        let mut report = SortReport {
            center: sentinel.map(|node| node.id.clone()),
            entries: Vec::with_capacity(candidates.len()),
        };
        for node in candidates {
            let Some(entry) = sorted.get(node.id.as_str()) else {
                continue;
            };
            debug!(
                "event=sort_note module=service node_id={} path={} quadrant={} distance={}",
                node.id, node.file, entry.quadrant, entry.distance
            );

            let outcome = match vault.resolve(node.file.as_str()) {
                None => {
                    warn!(
                        "event=sort_note module=service status=missing node_id={} path={}",
                        node.id, node.file
                    );
                    NoteOutcome::Missing
                }
                Some(_) if mode == SortMode::DryRun => NoteOutcome::Skipped,
                Some(path) => match write_sort_metadata(&path, &self.config.metadata, entry) {
                    Ok(()) => NoteOutcome::Written,
                    Err(err) => {
                        error!(
                            "event=sort_note module=service status=error node_id={} path={} error={}",
                            node.id, node.file, err
                        );
                        NoteOutcome::Failed(err.to_string())
                    }
                },
            };

            report.entries.push(SortedNote {
                node_id: node.id.clone(),
                path: node.file.clone(),
                distance: entry.distance,
                quadrant: entry.quadrant,
                outcome,
            });
        }

        info!(
            "event=sort_export module=service status=ok notes={} written={} missing={} mode={:?}",
            report.entries.len(),
            report.written_count(),
            report.missing().count(),
            mode
        );
        Ok(report)
    }
}
