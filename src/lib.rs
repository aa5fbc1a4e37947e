pub mod api;
pub mod config;
pub mod db;
mod serde_utils;
