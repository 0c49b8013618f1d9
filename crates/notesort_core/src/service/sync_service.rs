//! Canvas sync use-case.
//!
//! # Responsibility
//! - Load a canvas, reconcile it against a target record set, persist it.
//!
//! # Invariants
//! - A missing or unparseable canvas is rebuilt from an empty document.
//! - The canvas is rewritten as a whole; concurrent writers are last-wins.

use super::ServiceResult;
use crate::config::SorterConfig;
use crate::model::record::FileRecord;
use crate::reconcile::id_gen::NodeIdGenerator;
use crate::reconcile::reconciler::reconcile_with_outcome;
use crate::store::canvas_store::{load_canvas, save_canvas};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Summary of one sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub canvas: PathBuf,
    /// Ids of nodes appended for new records.
    pub added: Vec<String>,
    /// Ids of file-link nodes dropped because their record left the set.
    pub removed: Vec<String>,
    /// Node count after reconciliation.
    pub total_nodes: usize,
}

/// Sync service bound to one configuration and id source.
pub struct SyncService {
    config: SorterConfig,
    ids: Box<dyn NodeIdGenerator>,
}

impl SyncService {
    /// Uses the id style selected by `config.ids`.
    pub fn new(config: SorterConfig) -> Self {
        let ids = config.ids.generator();
        Self { config, ids }
    }

    pub fn with_id_generator(config: SorterConfig, ids: Box<dyn NodeIdGenerator>) -> Self {
        Self { config, ids }
    }

    pub fn config(&self) -> &SorterConfig {
        &self.config
    }

    /// Reconciles the canvas at `canvas_path` with `targets` and saves it.
    ///
    /// # Errors
    /// - Returns `ServiceError::Store` when the canvas cannot be read or written.
    pub fn sync_canvas(
        &mut self,
        canvas_path: impl AsRef<Path>,
        targets: &[FileRecord],
    ) -> ServiceResult<SyncReport> {
        let canvas_path = canvas_path.as_ref();
        let started_at = Instant::now();
        info!(
            "event=canvas_sync module=service status=start targets={} path={}",
            targets.len(),
            canvas_path.display()
        );

        let document = load_canvas(canvas_path)?;
        let placement = self.config.placement.placement();
        let outcome = reconcile_with_outcome(document, targets, self.ids.as_mut(), &placement);

        if let Err(err) = save_canvas(canvas_path, &outcome.document) {
            error!(
                "event=canvas_sync module=service status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }

        info!(
            "event=canvas_sync module=service status=ok added={} removed={} nodes={} duration_ms={}",
            outcome.added.len(),
            outcome.removed.len(),
            outcome.document.nodes.len(),
            started_at.elapsed().as_millis()
        );

        Ok(SyncReport {
            canvas: canvas_path.to_path_buf(),
            total_nodes: outcome.document.nodes.len(),
            added: outcome.added,
            removed: outcome.removed,
        })
    }
}
