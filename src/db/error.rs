//! Storage error types.
//!
//! Every backend classifies its native failures into [`StorageError`] at the
//! adapter boundary, so callers only ever see these kinds. It uses miette for
//! diagnostic output and thiserror for derive macros.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

/// Boxed backend cause carried by [`StorageError::NotFound`].
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Storage operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum StorageError {
    #[error("Record not found")]
    #[diagnostic(code(mend::db::not_found))]
    NotFound {
        #[source]
        cause: Option<Cause>,
    },

    #[error("Nil entity passed: {entity}")]
    #[diagnostic(
        code(mend::db::nil_entity),
        help("Send a JSON object in the request body")
    )]
    NilEntity { entity: &'static str },

    #[error("Connection error: {message}")]
    #[diagnostic(code(mend::db::connection_error))]
    Connection { message: String },

    #[error("Operation '{operation}' timed out after {timeout:?}")]
    #[diagnostic(code(mend::db::timeout))]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Database error: {message}")]
    #[diagnostic(code(mend::db::database_error))]
    Database { message: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(mend::db::config_error),
        help("Supported storage types are 'sqlite' and 'surrealdb'")
    )]
    Config { message: String },
}

impl StorageError {
    /// A `NotFound` without a backend cause.
    pub fn not_found() -> Self {
        StorageError::NotFound { cause: None }
    }

    /// A `NotFound` wrapping the backend signal that produced it.
    pub fn not_found_from(cause: impl Into<Cause>) -> Self {
        StorageError::NotFound {
            cause: Some(cause.into()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }

    pub(crate) fn database(e: impl std::fmt::Display) -> Self {
        StorageError::Database {
            message: e.to_string(),
        }
    }

    pub(crate) fn connection(e: impl std::fmt::Display) -> Self {
        StorageError::Connection {
            message: e.to_string(),
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StorageError::not_found_from(e),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_) => StorageError::connection(e),
            other => StorageError::database(other),
        }
    }
}

impl From<surrealdb::Error> for StorageError {
    fn from(e: surrealdb::Error) -> Self {
        use surrealdb::error::Api;

        match e {
            surrealdb::Error::Api(
                Api::Ws(_)
                | Api::Http(_)
                | Api::ConnectionUninitialised
                | Api::InvalidUrl(_),
            ) => StorageError::connection(e),
            other => StorageError::database(other),
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
