use std::fmt::{Display, Formatter};

use lmdb::Error as LmdbError;
use serde_json::Error as SerdeError;

/// Failure reported by a [`ProjectStore`](crate::project_store::ProjectStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Database(String),
    Serialization(String),
    /// No record exists for the given code.
    NotFound(String),
    /// The code cannot be used as a key by this store.
    InvalidCode(String),
    /// A lock guarding an in-memory store was poisoned by a panicking writer.
    Poisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(msg) => write!(f, "Database error: {}", msg),
            StoreError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StoreError::NotFound(code) => write!(f, "No project stored under code '{}'", code),
            StoreError::InvalidCode(msg) => write!(f, "Invalid project code: {}", msg),
            StoreError::Poisoned => write!(f, "Store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<LmdbError> for StoreError {
    fn from(err: LmdbError) -> Self {
        match err {
            LmdbError::MapFull => StoreError::Database("LMDB map is full; raise map_size".to_string()),
            LmdbError::Corrupted => StoreError::Database("Database is corrupted".to_string()),
            LmdbError::BadValSize => StoreError::Database("Key or value has an invalid size".to_string()),
            _ => StoreError::Database(format!("LMDB error: {}", err)),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Database(format!("IO error: {}", err))
    }
}

impl From<SerdeError> for StoreError {
    fn from(err: SerdeError) -> Self {
        StoreError::Serialization(format!("JSON serialization error: {}", err))
    }
}

/// Failure of a [`TemplateCollectionManager`](crate::manager::TemplateCollectionManager)
/// or draft operation.
///
/// Validation failures (`IndexOutOfRange`, `InvalidTextSelection`) are raised
/// before any state changes. `StoreUnavailable` is raised after the in-memory
/// mutation was applied; the manager stays usable either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    StoreUnavailable(StoreError),
    /// The store refused the project code itself; retrying will not help.
    InvalidCode(String),
    IndexOutOfRange { index: usize, len: usize },
    InvalidTextSelection(String),
    NotFound(String),
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::StoreUnavailable(err) => write!(f, "Store unavailable: {}", err),
            TemplateError::InvalidCode(msg) => write!(f, "Invalid project code: {}", msg),
            TemplateError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range for length {}", index, len)
            }
            TemplateError::InvalidTextSelection(msg) => write!(f, "Invalid text selection: {}", msg),
            TemplateError::NotFound(code) => write!(f, "Project '{}' does not exist", code),
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TemplateError::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for TemplateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidCode(msg) => TemplateError::InvalidCode(msg),
            other => TemplateError::StoreUnavailable(other),
        }
    }
}

/// Checks `index` against a sequence of length `len`.
pub(crate) fn check_index(index: usize, len: usize) -> Result<(), TemplateError> {
    if index < len {
        Ok(())
    } else {
        Err(TemplateError::IndexOutOfRange { index, len })
    }
}
