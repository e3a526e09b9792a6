// errors.rs
use std::fmt;

/// Errors originating from the storage engine, the spreadsheet bridge, or a
/// malformed caller request. Expected business outcomes (missing record,
/// empty result, no-op delete) are values, never errors.
#[derive(Debug)]
pub enum RegistryError {
    BadRequest(String),
    DbError(String),
    XlsxError(String),
    InternalError,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            RegistryError::DbError(msg) => write!(f, "Database Error: {msg}"),
            RegistryError::XlsxError(msg) => write!(f, "Spreadsheet Error: {msg}"),
            RegistryError::InternalError => write!(f, "Internal Error"),
        }
    }
}

impl std::error::Error for RegistryError {}
