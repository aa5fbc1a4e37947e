//! SurrealDB implementation of the storage adapter.
//!
//! Records are keyed by their integer id (`clients:7`). SurrealDB has no
//! integer auto-increment, so ids are minted from the `counters` table by
//! [`Sequence`].

mod client;
mod connection;
mod project;
mod sequence;


pub use client::SurrealClientRepository;
pub use connection::{DATABASE, NAMESPACE, SurrealStorage};
pub use project::SurrealProjectRepository;
pub use sequence::Sequence;
