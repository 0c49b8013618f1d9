//! Exit codes. Scripts rely on these; keep them stable.
//!
//! | Code | Meaning                                        |
//! |------|------------------------------------------------|
//! | 0    | Success                                        |
//! | 1    | Runtime error (I/O, unwritable note)           |
//! | 2    | Usage error (bad logging or config options)    |
//! | 3    | `sort` finished but some notes were missing    |

pub const EXIT_SUCCESS: u8 = 0;

pub const EXIT_ERROR: u8 = 1;

pub const EXIT_USAGE: u8 = 2;

/// Canvas references notes that do not exist in the vault.
pub const EXIT_MISSING_RECORDS: u8 = 3;
