use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

use crate::error::{StoreError, TemplateError};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppResponse {
    DatabaseError(String),
    SerializationError(String),
    NotFound(String),
    ValidationError(String),
    BadRequest(String),
    Ok(String),
}

impl Display for AppResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AppResponse::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppResponse::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppResponse::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppResponse::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppResponse::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppResponse::Ok(msg) => write!(f, "Ok: {}", msg),
        }
    }
}

impl From<StoreError> for AppResponse {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(code) => AppResponse::NotFound(format!("No project stored under code '{}'", code)),
            StoreError::Serialization(msg) => AppResponse::SerializationError(msg),
            StoreError::InvalidCode(msg) => AppResponse::BadRequest(format!("Invalid project code: {}", msg)),
            other => AppResponse::DatabaseError(other.to_string()),
        }
    }
}

impl From<TemplateError> for AppResponse {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::StoreUnavailable(store_err) => AppResponse::from(store_err),
            TemplateError::IndexOutOfRange { .. } | TemplateError::InvalidCode(_) => AppResponse::BadRequest(err.to_string()),
            TemplateError::InvalidTextSelection(_) => AppResponse::ValidationError(err.to_string()),
            TemplateError::NotFound(_) => AppResponse::NotFound(err.to_string()),
        }
    }
}

impl From<SerdeError> for AppResponse {
    fn from(err: SerdeError) -> Self {
        AppResponse::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl AppResponse {
    pub fn success(msg: impl Into<String>) -> Self {
        AppResponse::Ok(msg.into())
    }
}
