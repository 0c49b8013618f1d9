//! Relative-position classification against a center rectangle.
//!
//! # Responsibility
//! - Derive normalized distance and quadrant for positioned rectangles.
//!
//! # Invariants
//! - Pure: no I/O, no logging, no shared state.

pub mod spatial;
