//! Core logic for NoteSort: canvas/query-result reconciliation and
//! center-relative note classification.
//! This crate is the single source of truth for the sync/sort invariants.

pub mod classify;
pub mod config;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod service;
pub mod store;

pub use classify::spatial::{classify, normalize_distance};
pub use config::{ConfigError, IdStyle, SorterConfig};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget};
pub use model::canvas::{CanvasDocument, CanvasNode, FileLinkNode, OpaqueNode};
pub use model::geometry::{Bounds, Rect};
pub use model::record::FileRecord;
pub use model::sort::{Quadrant, SortEntry, SortResult};
pub use reconcile::id_gen::{NodeIdGenerator, TimestampIdGenerator, UuidIdGenerator};
pub use reconcile::reconciler::{reconcile, reconcile_with_outcome, Placement, ReconcileOutcome};
pub use service::sort_service::{
    locate_center, sort_candidates, NoteOutcome, SortMode, SortReport, SortService, SortedNote,
};
pub use service::sync_service::{SyncReport, SyncService};
pub use service::{ServiceError, ServiceResult};
pub use store::canvas_store::{load_canvas, load_canvas_strict, parse_canvas, save_canvas};
pub use store::vault::{read_target_list, Vault, VaultError, VaultQuery};
pub use store::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
