//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls around the pure reconcile/classify components.
//! - Keep the CLI decoupled from file-system details.

pub mod sort_service;
pub mod sync_service;

use crate::store::vault::VaultError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for sync/sort use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    Vault(VaultError),
    /// Explicitly requested center node id is not on the canvas.
    CenterNotFound(String),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Vault(err) => write!(f, "{err}"),
            Self::CenterNotFound(id) => write!(f, "center node not found on canvas: {id}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Vault(err) => Some(err),
            Self::CenterNotFound(_) => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<VaultError> for ServiceError {
    fn from(value: VaultError) -> Self {
        Self::Vault(value)
    }
}
