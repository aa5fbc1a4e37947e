//! Serde utility functions for common patterns
use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// (De)serialize a [`Duration`] as a whole number of seconds.
///
/// Sub-second precision is dropped on the way out.
///
/// Usage:
/// ```ignore
/// use serde::{Deserialize, Serialize};
/// use std::time::Duration;
///
/// #[derive(Serialize, Deserialize)]
/// struct Example {
///     #[serde(with = "crate::serde_utils::duration_secs")]
///     interval: Duration,
/// }
/// ```
pub mod duration_secs {
    use super::*;

    pub fn serialize<S>(value: &Duration, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(de).map(Duration::from_secs)
    }
}
