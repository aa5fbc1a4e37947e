//! Domain models for the mend storage layer.
//!
//! These models are storage-agnostic. The same shapes travel over HTTP as JSON
//! and into the document store, so the serde attributes here define both.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Surrogate integer key assigned by the storage backend.
pub type Id = i64;

/// A customer whose code gets scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Client {
    /// Absent on creation requests, always present on stored records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 1)]
    pub id: Option<Id>,
    #[schema(example = "Acme")]
    pub name: String,
    #[serde(default)]
    pub settings: ClientSettings,
}

/// Per-client scanning settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClientSettings {
    /// Interval between code scans, in seconds.
    #[serde(with = "crate::serde_utils::duration_secs")]
    #[schema(value_type = u64, example = 3600)]
    pub code_scan_interval: Duration,
}

/// A project, optionally owned by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 1)]
    pub id: Option<Id>,
    /// Owning client. Not enforced by storage; orphans are allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 1)]
    pub client_id: Option<Id>,
    #[schema(example = "Linux")]
    pub name: String,
}

impl Client {
    pub fn new(name: impl Into<String>, code_scan_interval: Duration) -> Self {
        Self {
            id: None,
            name: name.into(),
            settings: ClientSettings { code_scan_interval },
        }
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }
}

impl Project {
    pub fn new(name: impl Into<String>, client_id: Option<Id>) -> Self {
        Self {
            id: None,
            client_id,
            name: name.into(),
        }
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }
}

/// Entity collections known to every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Clients,
    Projects,
}

impl Collection {
    /// Table name in SQLite, table and counter key in SurrealDB.
    pub const fn as_str(self) -> &'static str {
        match self {
            Collection::Clients => "clients",
            Collection::Projects => "projects",
        }
    }

    /// Singular name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            Collection::Clients => "client",
            Collection::Projects => "project",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
