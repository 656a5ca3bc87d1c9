//! Parsers for release catalog formats.
//!
//! The release catalog is a table with one row per release. It is usually
//! shipped as CSV; a JSON form is accepted too.
//!
//! # Parsers
//!
//! - [`csv_parser`]: Parse CSV release tables through Polars
//! - [`json_parser`]: Parse JSON release lists
//!
//! # Example
//!
//! ```no_run
//! use escalator_rust::parsing::csv_parser::parse_catalog_csv;
//! use std::path::Path;
//!
//! let releases = parse_catalog_csv(Path::new("data/k8s-releases.csv"))
//!     .expect("Failed to parse catalog");
//! ```

pub mod csv_parser;
pub mod json_parser;


pub use csv_parser::{parse_catalog_csv, parse_catalog_csv_str};
pub use json_parser::{parse_catalog_json, parse_catalog_json_str};

use chrono::{NaiveDate, NaiveDateTime};

use crate::core::{SimulationError, SimulationResult};

/// Parse a catalog date cell. Accepts `YYYY-MM-DD` and ISO date-times, in
/// which case the time of day is dropped.
pub(crate) fn parse_catalog_date(value: &str, column: &str, row: usize) -> SimulationResult<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(datetime.date());
        }
    }
    Err(SimulationError::DataError(format!(
        "Invalid {} '{}' at row {}",
        column, value, row
    )))
}
