//! Serde helpers writing `None` as the `"~"` sentinel and reading it back as `None`
//!
//! Use with `#[serde(with = "crate::records::sentinel")]` on `Option<String>` fields.

use super::SENTINEL;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(SENTINEL))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| v != SENTINEL && !v.is_empty()))
}
