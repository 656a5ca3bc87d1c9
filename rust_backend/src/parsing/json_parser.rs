use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use super::parse_catalog_date;
use crate::core::{Release, ReleaseVersion, SimulationError, SimulationResult};

/// Keys that may hold the release list when the payload is an object
const RELEASE_KEYS: &[&str] = &["releases", "Releases", "catalog"];

/// Raw JSON structure for a single release
#[derive(Debug, Deserialize)]
struct RawRelease {
    version: String,
    release_date: String,
    end_of_support_date: String,
}

/// Parse a release catalog JSON file
pub fn parse_catalog_json(json_path: &Path) -> SimulationResult<Vec<Release>> {
    let content = std::fs::read_to_string(json_path).map_err(|e| {
        SimulationError::DataError(format!(
            "Failed to read release catalog {}: {}",
            json_path.display(),
            e
        ))
    })?;
    parse_catalog_json_str(&content)
}

/// Parse a release catalog JSON string.
///
/// Accepts either a bare array of releases or an object holding the array
/// under `releases`.
pub fn parse_catalog_json_str(json_str: &str) -> SimulationResult<Vec<Release>> {
    let payload: Value = serde_json::from_str(json_str).map_err(|e| {
        SimulationError::DataError(format!("Failed to parse release catalog JSON: {}", e))
    })?;

    let array = find_release_array(payload).ok_or_else(|| {
        SimulationError::DataError("Could not find a release array in catalog JSON".to_string())
    })?;

    let raw: Vec<RawRelease> = serde_path_to_error::deserialize(array).map_err(|e| {
        SimulationError::DataError(format!("Invalid release at {}: {}", e.path(), e.inner()))
    })?;

    raw.into_iter()
        .enumerate()
        .map(|(row, r)| {
            let version = r
                .version
                .parse::<ReleaseVersion>()
                .map_err(|e| SimulationError::DataError(format!("Row {}: {}", row, e)))?;
            let release_date = parse_catalog_date(&r.release_date, "release_date", row)?;
            let end_of_support_date =
                parse_catalog_date(&r.end_of_support_date, "end_of_support_date", row)?;
            Ok(Release::new(version, release_date, end_of_support_date))
        })
        .collect()
}

fn find_release_array(payload: Value) -> Option<Value> {
    match payload {
        Value::Array(_) => Some(payload),
        Value::Object(mut obj) => RELEASE_KEYS
            .iter()
            .find_map(|key| obj.remove(*key).filter(Value::is_array)),
        _ => None,
    }
}
