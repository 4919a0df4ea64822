use std::path::PathBuf;

use thiserror::Error;

use crate::model::EntityKind;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} {key} already exists")]
    AlreadyExists { entity: EntityKind, key: String },
    #[error("{entity} \"{id}\" not found")]
    NotFound { entity: EntityKind, id: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("storage error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store file {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("write task failed: {0}")]
    Task(String),
}

impl ServiceError {
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Corrupt { path: path.into(), reason: reason.to_string() }
    }
}
