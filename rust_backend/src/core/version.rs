//! Dotted-numeric release versions.
//!
//! Versions compare component by component as numbers, so `1.10.0` sorts
//! after `1.9.0`. This is the precedence the release catalog is ordered by.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::SimulationError;

/// A `major.minor.patch` release version.
///
/// # Examples
///
/// ```
/// use escalator_rust::core::ReleaseVersion;
///
/// let older: ReleaseVersion = "1.9.0".parse().unwrap();
/// let newer: ReleaseVersion = "1.10.0".parse().unwrap();
/// assert!(newer > older);
/// assert_eq!(newer.to_string(), "1.10.0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReleaseVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ReleaseVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for ReleaseVersion {
    type Err = SimulationError;

    /// Parses one to three numeric components, with an optional leading `v`.
    /// Missing components default to zero (`"1.15"` is `1.15.0`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        if body.is_empty() {
            return Err(SimulationError::DataError(format!(
                "Invalid version '{}': empty",
                s
            )));
        }

        let parts: Vec<&str> = body.split('.').collect();
        if parts.len() > 3 {
            return Err(SimulationError::DataError(format!(
                "Invalid version '{}': expected at most 3 components",
                s
            )));
        }

        let mut components = [0u32; 3];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part.parse::<u32>().map_err(|_| {
                SimulationError::DataError(format!(
                    "Invalid version '{}': component '{}' is not numeric",
                    s, part
                ))
            })?;
        }

        Ok(Self::new(components[0], components[1], components[2]))
    }
}

impl TryFrom<String> for ReleaseVersion {
    type Error = SimulationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReleaseVersion> for String {
    fn from(version: ReleaseVersion) -> Self {
        version.to_string()
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
