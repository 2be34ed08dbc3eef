use std::path::{Path, PathBuf};
use std::sync::Arc;

use lmdb::{Cursor, Database, DatabaseFlags, Environment, Error as LmdbError, Transaction, WriteFlags};
use log::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::project_model::{ProjectField, ProjectRecord};
use crate::project_store::ProjectStore;

/// Longest key LMDB accepts with its default build settings.
pub const MAX_CODE_BYTES: usize = 511;

/// LMDB keys must be 1..=511 bytes; reject anything else before touching a txn.
fn check_code(code: &str) -> Result<(), StoreError> {
    if code.is_empty() || code.len() > MAX_CODE_BYTES {
        return Err(StoreError::InvalidCode(format!(
            "project codes must be 1 to {} bytes, got {}",
            MAX_CODE_BYTES,
            code.len()
        )));
    }
    Ok(())
}

/// Durable [`ProjectStore`] on an LMDB environment.
///
/// Each project is one JSON document keyed by its code. Clones share the
/// environment. Codes longer than [`MAX_CODE_BYTES`] or empty are rejected
/// with [`StoreError::InvalidCode`].
#[derive(Clone)]
pub struct LmdbProjectStore {
    env: Arc<Environment>,
    db: Database,
    path: PathBuf,
}

impl LmdbProjectStore {
    /// Opens (or creates) the store at `<name>.lmdb` with default settings.
    pub fn init(name: String) -> Result<Self, StoreError> {
        Self::open(&StoreConfig::named(&name))
    }

    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&config.path)?;

        let env = Environment::new()
            .set_max_dbs(config.max_dbs)
            .set_map_size(config.map_size)
            .set_max_readers(config.max_readers)
            .open(&config.path)
            .map_err(|e| {
                warn!("Failed to open LMDB environment at {}: {}", config.path.display(), e);
                StoreError::from(e)
            })?;

        let db = env.create_db(Some(config.database.as_str()), DatabaseFlags::empty())?;

        info!("Project store opened at {}", config.path.display());

        Ok(Self {
            env: Arc::new(env),
            db,
            path: config.path.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored project code, in key order.
    pub fn list_codes(&self) -> Result<Vec<String>, StoreError> {
        let txn = self.env.begin_ro_txn()?;
        let mut cursor = txn.open_ro_cursor(self.db)?;
        let mut codes = Vec::new();

        // `iter` walks from the first key and yields nothing on an empty db
        for (key, _) in cursor.iter() {
            match std::str::from_utf8(key) {
                Ok(code) => codes.push(code.to_string()),
                Err(e) => warn!("Skipping non UTF-8 key in project store: {e}"),
            }
        }

        Ok(codes)
    }

    /// Removes every project. Irreversible.
    pub fn clear_all_projects(&self) -> Result<(), StoreError> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.clear_db(self.db)?;
        txn.commit()?;
        info!("All projects cleared from {}", self.path.display());
        Ok(())
    }

    /// Forces buffered data to disk.
    pub fn sync(&self) -> Result<(), StoreError> {
        self.env.sync(true)?;
        Ok(())
    }
}

impl ProjectStore for LmdbProjectStore {
    fn get(&self, code: &str) -> Result<Option<ProjectRecord>, StoreError> {
        check_code(code)?;
        let txn = self.env.begin_ro_txn()?;

        let record = match txn.get(self.db, &code) {
            Ok(bytes) => Some(serde_json::from_slice(bytes)?),
            Err(LmdbError::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        Ok(record)
    }

    fn create(&self, code: &str, record: &ProjectRecord) -> Result<(), StoreError> {
        check_code(code)?;
        let json = serde_json::to_vec(record)?;

        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &code, &json, WriteFlags::empty())?;
        txn.commit()?;

        debug!("Stored project '{}' ({} bytes)", code, json.len());
        Ok(())
    }

    fn replace_field(&self, code: &str, field: ProjectField) -> Result<(), StoreError> {
        check_code(code)?;
        let mut txn = self.env.begin_rw_txn()?;

        let mut record: ProjectRecord = match txn.get(self.db, &code) {
            Ok(bytes) => serde_json::from_slice(bytes)?,
            Err(LmdbError::NotFound) => return Err(StoreError::NotFound(code.to_string())),
            Err(e) => return Err(e.into()),
        };

        let name = field.name();
        field.apply_to(&mut record);

        let json = serde_json::to_vec(&record)?;
        txn.put(self.db, &code, &json, WriteFlags::empty())?;
        txn.commit()?;

        debug!("Replaced '{}' of project '{}' ({} bytes)", name, code, json.len());
        Ok(())
    }

    fn delete(&self, code: &str) -> Result<bool, StoreError> {
        check_code(code)?;
        let mut txn = self.env.begin_rw_txn()?;

        match txn.del(self.db, &code, None) {
            Ok(()) => {
                txn.commit()?;
                info!("Deleted project '{}'", code);
                Ok(true)
            }
            Err(LmdbError::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
