//! Configuration for the LMDB-backed project store.

use std::path::PathBuf;

use serde::Deserialize;

/// Default LMDB map size: 1 GiB. Image blobs are inline data URIs and every
/// write rewrites the whole record, so the map has to hold many multi-MiB
/// documents. LMDB maps the file sparsely; unused space costs no disk.
pub const DEFAULT_MAP_SIZE: usize = 1024 * 1024 * 1024;
pub const DEFAULT_DATABASE: &str = "projects";

/// Settings used by [`LmdbProjectStore::open`](crate::lmdb_store::LmdbProjectStore::open).
///
/// Every field has a default (`path` falls back to `template_store.lmdb` in
/// the working directory), so a JSON config can be as small as
/// `{"path": "my_app.lmdb"}` or even `{}`.
///
/// ```rust
/// use template_store_core::config::StoreConfig;
///
/// let config: StoreConfig = serde_json::from_str(r#"{"path":"my_app.lmdb","map_size":1048576}"#)?;
/// assert_eq!(config.database, "projects");
/// assert_eq!(config.map_size, 1_048_576);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Environment directory. Created if missing.
    pub path: PathBuf,
    /// Named database inside the environment holding the project records.
    pub database: String,
    pub map_size: usize,
    pub max_dbs: u32,
    pub max_readers: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("template_store.lmdb"),
            database: DEFAULT_DATABASE.to_string(),
            map_size: DEFAULT_MAP_SIZE,
            max_dbs: 4,
            max_readers: 126,
        }
    }
}

impl StoreConfig {
    /// Config for a bare store name; the environment lives in `<name>.lmdb`.
    pub fn named(name: &str) -> Self {
        Self {
            path: PathBuf::from(format!("{name}.lmdb")),
            ..Self::default()
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}
