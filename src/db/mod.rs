//! Storage abstraction layer.
//!
//! This module provides one adapter contract for clients and projects,
//! implemented by a SQLite backend and a SurrealDB backend with identical
//! external semantics.
//!
//! # Architecture
//!
//! - `error`: Backend-agnostic error kinds
//! - `models`: Domain entities (Client, Project)
//! - `adapter`: The [`StorageAdapter`] contract and per-operation deadlines
//! - `storage`: Backend selection ([`Storage`], [`StorageKind`])
//! - `sqlite`, `surreal`: The two backends

mod adapter;
mod error;
mod models;
pub mod sqlite;
mod storage;
pub mod surreal;

#[cfg(test)]
mod contract_test;

pub use adapter::{ConnectOptions, DEFAULT_TIMEOUT, StorageAdapter};
pub use error::{Cause, StorageError, StorageResult};
pub use models::*;
pub use sqlite::SqliteStorage;
pub use storage::{Storage, StorageKind};
pub use surreal::SurrealStorage;
