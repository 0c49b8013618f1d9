//! Plain data model for canvas documents and query results.
//!
//! # Responsibility
//! - Define the typed canvas shape consumed by reconciliation and sorting.
//! - Keep geometry helpers next to the records that carry them.
//!
//! # Invariants
//! - Model types hold no I/O handles; loading and saving live in `store`.

pub mod canvas;
pub mod geometry;
pub mod record;
pub mod sort;
