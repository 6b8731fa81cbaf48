//! Tri-state fields for partial updates: absent (`None`), explicit `null`
//! (`Some(None)`), or a value (`Some(Some(v))`).

use serde::{Deserialize, Deserializer};

/// Use with `#[serde(default, deserialize_with = "crate::nullable::deserialize")]`.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
