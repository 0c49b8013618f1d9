//! Canvas reconciliation against query results.
//!
//! # Responsibility
//! - Make the set of file-link nodes mirror a target record set.
//! - Keep id generation injectable so the algorithm stays testable.

pub mod id_gen;
pub mod reconciler;
