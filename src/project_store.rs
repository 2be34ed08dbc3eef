//! The document store contract and an in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use crate::error::StoreError;
use crate::project_model::{ProjectField, ProjectRecord};

/// A key-value document store holding one [`ProjectRecord`] per project code.
///
/// Codes are opaque and case-sensitive. Writes replace whole fields; the store
/// offers no version tokens, so concurrent writers to one code race and the
/// last write wins.
pub trait ProjectStore {
    /// Fetches the record for `code`, `None` if absent.
    fn get(&self, code: &str) -> Result<Option<ProjectRecord>, StoreError>;

    /// Stores `record` under `code`, overwriting any existing record.
    fn create(&self, code: &str, record: &ProjectRecord) -> Result<(), StoreError>;

    /// Replaces one field of an existing record. Fails with
    /// [`StoreError::NotFound`] if no record exists for `code`.
    fn replace_field(&self, code: &str, field: ProjectField) -> Result<(), StoreError>;

    /// Removes the record. Returns `false` if there was nothing to remove.
    fn delete(&self, code: &str) -> Result<bool, StoreError>;
}

impl<T: ProjectStore + ?Sized> ProjectStore for &T {
    fn get(&self, code: &str) -> Result<Option<ProjectRecord>, StoreError> {
        (**self).get(code)
    }

    fn create(&self, code: &str, record: &ProjectRecord) -> Result<(), StoreError> {
        (**self).create(code, record)
    }

    fn replace_field(&self, code: &str, field: ProjectField) -> Result<(), StoreError> {
        (**self).replace_field(code, field)
    }

    fn delete(&self, code: &str) -> Result<bool, StoreError> {
        (**self).delete(code)
    }
}

impl<T: ProjectStore + ?Sized> ProjectStore for Arc<T> {
    fn get(&self, code: &str) -> Result<Option<ProjectRecord>, StoreError> {
        (**self).get(code)
    }

    fn create(&self, code: &str, record: &ProjectRecord) -> Result<(), StoreError> {
        (**self).create(code, record)
    }

    fn replace_field(&self, code: &str, field: ProjectField) -> Result<(), StoreError> {
        (**self).replace_field(code, field)
    }

    fn delete(&self, code: &str) -> Result<bool, StoreError> {
        (**self).delete(code)
    }
}

/// Process-local store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    records: Mutex<HashMap<String, ProjectRecord>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored codes, sorted.
    pub fn list_codes(&self) -> Result<Vec<String>, StoreError> {
        let mut codes: Vec<String> = self.lock()?.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, ProjectRecord>>, StoreError> {
        self.records.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl ProjectStore for MemoryProjectStore {
    fn get(&self, code: &str) -> Result<Option<ProjectRecord>, StoreError> {
        Ok(self.lock()?.get(code).cloned())
    }

    fn create(&self, code: &str, record: &ProjectRecord) -> Result<(), StoreError> {
        self.lock()?.insert(code.to_string(), record.clone());
        Ok(())
    }

    fn replace_field(&self, code: &str, field: ProjectField) -> Result<(), StoreError> {
        let mut records = self.lock()?;
        let record = records
            .get_mut(code)
            .ok_or_else(|| StoreError::NotFound(code.to_string()))?;
        debug!("Replacing '{}' of project '{}' in memory", field.name(), code);
        field.apply_to(record);
        Ok(())
    }

    fn delete(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.remove(code).is_some())
    }
}
