use crate::auth::{Role, Section};
use crate::model::{Collection, DocumentId};
use crate::record::PatchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Document not found: {0}/{1}")]
    DocumentNotFound(Collection, DocumentId),

    #[error("Access denied: {0} requires the {1} role")]
    AccessDenied(Section, Role),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Patch(#[from] PatchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, AdminError>;
