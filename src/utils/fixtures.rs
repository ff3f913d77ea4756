//! JSON helpers for loading test data in consuming services.

use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

pub fn load_data_from_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let content = std::fs::read(path)?;
    Ok(serde_json::from_slice(&content)?)
}

/// Converts any serializable struct into a JSON object map. Fails when the
/// value does not serialize to an object.
pub fn convert_struct_to_map<T: Serialize>(
    value: &T,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    let json = serde_json::to_value(value)?;
    Ok(serde_json::from_value(json)?)
}
