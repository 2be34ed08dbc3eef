//! # Template Store Core
//!
//! Local storage and bookkeeping for template projects, designed for FFI
//! integration with Flutter and other cross-platform front ends.
//!
//! A project is addressed by a shareable code and holds a list of standalone
//! images plus a numbered list of templates. Each template carries several
//! alternative texts, one of them selected, and an image gallery per text.
//! Records are persisted as JSON documents in LMDB.
//!
//! ## Features
//!
//! - **Typed records**: [`project_model::ProjectRecord`] and
//!   [`project_model::Template`] with the shared document field names
//! - **Invariant-keeping manager**: sequential 1-based template ids, clamped
//!   text selection, whole-sequence writes after each mutation
//! - **Pluggable storage**: any [`project_store::ProjectStore`]; LMDB and
//!   in-memory implementations included
//! - **FFI-optimized**: every C function returns a JSON [`AppResponse`]
//!
//! ## Quick Start
//!
//! ```rust
//! use template_store_core::manager::{Direction, TemplateCollectionManager};
//! use template_store_core::project_store::MemoryProjectStore;
//!
//! let store = MemoryProjectStore::new();
//! let mut project = TemplateCollectionManager::load(&store, "ABC1")?;
//!
//! project.create_template(vec!["Hi".into(), "Hey".into()], 0, None)?;
//! project.create_template(vec!["Yo".into()], 0, Some(0))?;
//! project.navigate_template_text(0, Direction::Next)?;
//!
//! assert_eq!(project.templates()[1].id, 2);
//! assert_eq!(project.templates()[0].selected_text(), Some("Hey"));
//! # Ok::<(), template_store_core::error::TemplateError>(())
//! ```
//!
//! ## FFI Functions
//!
//! - [`create_db`] / [`create_db_with_config`] - Open a project store
//! - [`open_project`] - Load or create a project session
//! - [`open_existing_project`] - Load a project only if it has templates
//! - [`execute_command`] - Apply a JSON [`command::ProjectCommand`]
//! - [`project_snapshot`] - Current project state
//! - [`delete_project`] - Remove the project from the store
//! - [`close_project`] / [`close_database`] - Release handles
//! - [`list_projects`] / [`clear_all_projects`] - Store administration
//! - [`free_response`] - Release a returned string

pub mod command;
pub mod config;
pub mod draft;
pub mod error;
pub mod lmdb_store;
pub mod manager;
pub mod project_model;
pub mod project_store;
mod app_response;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};

use crate::command::ProjectCommand;
use crate::config::StoreConfig;
use crate::lmdb_store::LmdbProjectStore;
use crate::manager::TemplateCollectionManager;
use crate::project_model::normalize_code;

pub use crate::app_response::AppResponse;

/// A loaded project bound to an LMDB store, as handed across the FFI boundary.
pub type ProjectSession = TemplateCollectionManager<LmdbProjectStore>;

/// Opens or creates a project store in `<name>.lmdb`.
///
/// Returns a null pointer if the name is null, not UTF-8, or the environment
/// cannot be opened. Release the handle with [`close_database`].
///
/// ```no_run
/// use std::ffi::CString;
/// use template_store_core::create_db;
///
/// let name = CString::new("templates").unwrap();
/// let store = create_db(name.as_ptr());
/// assert!(!store.is_null());
/// ```
///
/// # Safety
///
/// This function is unsafe because it:
/// - Dereferences `name`, which must be null or a valid null-terminated string
/// - Returns a raw pointer that must be released exactly once
///
/// # Errors
///
/// Returns null pointer if:
/// - Input name pointer is null
/// - Input string contains invalid UTF-8
/// - The LMDB environment cannot be opened
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_db(name: *const c_char) -> *mut LmdbProjectStore {
    let name_str = match c_ptr_to_str(name) {
        Some(s) => s,
        None => {
            warn!("Null or invalid name pointer passed to create_db");
            return std::ptr::null_mut();
        }
    };

    open_store(&StoreConfig::named(&name_str))
}

/// Opens a project store from a JSON [`StoreConfig`].
///
/// # Safety
///
/// `config_json` must be null or a valid null-terminated string. The
/// returned pointer has the same ownership rules as [`create_db`].
///
/// # Errors
///
/// Returns null pointer if the config pointer is null, the JSON does not
/// parse as a [`StoreConfig`], or the LMDB environment cannot be opened.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_db_with_config(config_json: *const c_char) -> *mut LmdbProjectStore {
    let json = match c_ptr_to_str(config_json) {
        Some(s) => s,
        None => {
            warn!("Null or invalid config pointer passed to create_db_with_config");
            return std::ptr::null_mut();
        }
    };

    match serde_json::from_str::<StoreConfig>(&json) {
        Ok(config) => open_store(&config),
        Err(e) => {
            warn!("Invalid store config: {e}");
            std::ptr::null_mut()
        }
    }
}

fn open_store(config: &StoreConfig) -> *mut LmdbProjectStore {
    info!("Attempting to open project store at: {}", config.path.display());

    match LmdbProjectStore::open(config) {
        Ok(store) => Box::into_raw(Box::new(store)),
        Err(e) => {
            warn!("Failed to open project store: {e}");
            warn!("Attempted path: {}", config.path.display());
            std::ptr::null_mut()
        }
    }
}

/// Releases a store handle. Open project sessions keep working; they share
/// the environment.
///
/// # Returns
///
/// A JSON-formatted `AppResponse`; `DatabaseError` if the final sync failed.
/// The returned string must be freed with [`free_response`].
///
/// # Safety
///
/// This function takes ownership of `store`. It must be a pointer returned
/// by [`create_db`] or [`create_db_with_config`] and must not be used again
/// after this call.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_database(store: *mut LmdbProjectStore) -> *const c_char {
    if store.is_null() {
        return response_to_c_string(&AppResponse::BadRequest("Null store pointer passed to close_database".to_string()));
    }

    let store = unsafe { Box::from_raw(store) };
    let result = store.sync();
    drop(store);

    match result {
        Ok(()) => response_to_c_string(&AppResponse::success("Database connection closed successfully")),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Lists every stored project code as a JSON array.
///
/// # Safety
///
/// This function is unsafe because it dereferences a raw pointer.
/// `store` must be null or a live pointer from [`create_db`].
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn list_projects(store: *mut LmdbProjectStore) -> *const c_char {
    let store = match unsafe { store.as_ref() } {
        Some(s) => s,
        None => return response_to_c_string(&AppResponse::BadRequest("Null store pointer passed to list_projects".to_string())),
    };

    let response = match store.list_codes() {
        Ok(codes) => json_response(&codes),
        Err(e) => AppResponse::from(e),
    };
    response_to_c_string(&response)
}

/// Deletes every project in the store.
///
/// # Safety
///
/// `store` must be null or a live pointer from [`create_db`]. Sessions opened
/// before the call keep their in-memory state; their next write fails with
/// `NotFound`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn clear_all_projects(store: *mut LmdbProjectStore) -> *const c_char {
    let store = match unsafe { store.as_ref() } {
        Some(s) => s,
        None => return response_to_c_string(&AppResponse::BadRequest("Null store pointer passed to clear_all_projects".to_string())),
    };

    let response = match store.clear_all_projects() {
        Ok(()) => AppResponse::success("All projects cleared successfully"),
        Err(e) => AppResponse::from(e),
    };
    response_to_c_string(&response)
}

/// Loads the project for `code`, creating it on first access.
///
/// The code is trimmed; a blank code yields a null pointer. Release the
/// session with [`close_project`].
///
/// # Safety
///
/// This function is unsafe because it dereferences raw pointers.
/// `store` must be a live pointer from [`create_db`] and `code` a valid
/// null-terminated string.
///
/// # Errors
///
/// Returns null pointer if either pointer is null, the code is blank or
/// longer than the store accepts, or the store cannot be read.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn open_project(store: *mut LmdbProjectStore, code: *const c_char) -> *mut ProjectSession {
    open_session(store, code, "open_project", |store, code| TemplateCollectionManager::load(store, code))
}

/// Loads the project for `code` only if it already holds templates.
/// Never creates a record. Returns null for unknown codes.
///
/// # Safety
///
/// Same pointer requirements as [`open_project`].
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn open_existing_project(store: *mut LmdbProjectStore, code: *const c_char) -> *mut ProjectSession {
    open_session(store, code, "open_existing_project", |store, code| {
        TemplateCollectionManager::open_existing(store, code)
    })
}

fn open_session(
    store: *mut LmdbProjectStore,
    code: *const c_char,
    caller: &str,
    open: fn(LmdbProjectStore, String) -> Result<ProjectSession, error::TemplateError>,
) -> *mut ProjectSession {
    let store = match unsafe { store.as_ref() } {
        Some(s) => s,
        None => {
            warn!("Null store pointer passed to {caller}");
            return std::ptr::null_mut();
        }
    };

    let code = match c_ptr_to_str(code).as_deref().and_then(normalize_code) {
        Some(code) => code,
        None => {
            warn!("Null or blank code passed to {caller}");
            return std::ptr::null_mut();
        }
    };

    match open(store.clone(), code) {
        Ok(session) => Box::into_raw(Box::new(session)),
        Err(e) => {
            warn!("{caller} failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Returns the session's current [`ProjectRecord`](project_model::ProjectRecord) as JSON.
///
/// # Safety
///
/// `session` must be null or a live pointer from [`open_project`] or
/// [`open_existing_project`].
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn project_snapshot(session: *mut ProjectSession) -> *const c_char {
    let session = match unsafe { session.as_ref() } {
        Some(s) => s,
        None => return response_to_c_string(&AppResponse::BadRequest("Null session pointer passed to project_snapshot".to_string())),
    };

    response_to_c_string(&json_response(&session.snapshot()))
}

/// Applies a JSON [`ProjectCommand`] and returns the resulting record.
///
/// ```json
/// {"op": "create_template", "texts": ["Hi", "Hey"], "selected_index": 0, "insert_after": 2}
/// ```
///
/// A `DatabaseError` response means the change was applied in memory but
/// not persisted.
///
/// # Returns
///
/// A JSON-formatted `AppResponse` that must be freed with [`free_response`].
///
/// # Safety
///
/// This function is unsafe because it dereferences raw pointers and mutates
/// the session. `session` must be a live session pointer not used from
/// another thread during the call; `command_json` must be a valid
/// null-terminated string.
///
/// # Errors
///
/// - `BadRequest` for null pointers, unknown indices or an unusable code
/// - `SerializationError` for malformed command JSON
/// - `ValidationError` for empty, blank or out-of-range template texts
/// - `NotFound` when the project was deleted underneath the session
/// - `DatabaseError` when LMDB rejects the write
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn execute_command(session: *mut ProjectSession, command_json: *const c_char) -> *const c_char {
    let session = match unsafe { session.as_mut() } {
        Some(s) => s,
        None => return response_to_c_string(&AppResponse::BadRequest("Null session pointer passed to execute_command".to_string())),
    };

    let json = match c_ptr_to_str(command_json) {
        Some(json) => json,
        None => return response_to_c_string(&AppResponse::BadRequest("Null or invalid command pointer".to_string())),
    };

    let command: ProjectCommand = match serde_json::from_str(&json) {
        Ok(command) => command,
        Err(e) => return response_to_c_string(&AppResponse::SerializationError(format!("Invalid command: {e}"))),
    };

    let response = match session.apply(command) {
        Ok(record) => json_response(&record),
        Err(e) => AppResponse::from(e),
    };
    response_to_c_string(&response)
}

/// Deletes the session's project from the store. The session stays open.
///
/// # Safety
///
/// `session` must be null or a live session pointer.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn delete_project(session: *mut ProjectSession) -> *const c_char {
    let session = match unsafe { session.as_ref() } {
        Some(s) => s,
        None => return response_to_c_string(&AppResponse::BadRequest("Null session pointer passed to delete_project".to_string())),
    };

    let response = match session.delete_project() {
        Ok(()) => AppResponse::success(format!("Project '{}' deleted", session.code())),
        Err(e) => AppResponse::from(e),
    };
    response_to_c_string(&response)
}

/// Releases a session returned by [`open_project`] or [`open_existing_project`].
///
/// # Safety
///
/// This function takes ownership of `session`; it must not be used again
/// afterwards. Null is ignored.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_project(session: *mut ProjectSession) {
    if !session.is_null() {
        drop(unsafe { Box::from_raw(session) });
    }
}

/// Releases a string returned by any function in this library.
///
/// # Safety
///
/// `ptr` must be null or a string returned by this library that has not
/// already been freed. Freeing the same pointer twice is undefined behavior.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(ptr: *const c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr as *mut c_char) });
    }
}

fn json_response<T: serde::Serialize>(value: &T) -> AppResponse {
    match serde_json::to_string(value) {
        Ok(json) => AppResponse::Ok(json),
        Err(e) => AppResponse::from(e),
    }
}

fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

fn c_ptr_to_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Some(s.to_string()),
        Err(e) => {
            warn!("Invalid UTF-8 across FFI boundary: {e}");
            None
        }
    }
}
