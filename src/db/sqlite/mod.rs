//! SQLite implementation of the storage adapter.
//!
//! One `sqlx` pool per adapter. Ids come from SQLite's `INTEGER PRIMARY KEY`
//! allocation and upserts are single `INSERT ... ON CONFLICT ... RETURNING`
//! statements.

mod client;
mod connection;
mod project;

#[cfg(test)]
mod project_test;

pub use client::SqliteClientRepository;
pub use connection::SqliteStorage;
pub use project::SqliteProjectRepository;
