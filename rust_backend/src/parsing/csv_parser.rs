use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use super::parse_catalog_date;
use crate::core::{Release, ReleaseVersion, SimulationError, SimulationResult};

pub const VERSION_COLUMN: &str = "version";
pub const RELEASE_DATE_COLUMN: &str = "release_date";
pub const END_OF_SUPPORT_DATE_COLUMN: &str = "end_of_support_date";

/// Parse a release catalog CSV file into releases, in file order
pub fn parse_catalog_csv(csv_path: &Path) -> SimulationResult<Vec<Release>> {
    let content = std::fs::read_to_string(csv_path).map_err(|e| {
        SimulationError::DataError(format!(
            "Failed to read release catalog {}: {}",
            csv_path.display(),
            e
        ))
    })?;
    parse_catalog_csv_str(&content)
}

/// Parse release catalog CSV content into releases, in file order
pub fn parse_catalog_csv_str(csv: &str) -> SimulationResult<Vec<Release>> {
    let df = read_catalog_frame(csv)?;
    dataframe_to_releases(&df)
}

/// Read the CSV with every column kept as a string so that dates and
/// versions are validated by us rather than by type inference.
fn read_catalog_frame(csv: &str) -> SimulationResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(csv.as_bytes().to_vec()))
        .finish()
        .map_err(|e| {
            SimulationError::DataError(format!("Failed to parse release catalog CSV: {}", e))
        })
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> SimulationResult<&'a StringChunked> {
    df.column(name).and_then(|c| c.str()).map_err(|e| {
        SimulationError::DataError(format!("Release catalog column '{}': {}", name, e))
    })
}

fn missing_cell(column: &str, row: usize) -> SimulationError {
    SimulationError::DataError(format!("Missing {} at row {}", column, row))
}

/// Convert a catalog DataFrame (string columns) to releases
pub fn dataframe_to_releases(df: &DataFrame) -> SimulationResult<Vec<Release>> {
    let versions = string_column(df, VERSION_COLUMN)?;
    let release_dates = string_column(df, RELEASE_DATE_COLUMN)?;
    let end_of_support_dates = string_column(df, END_OF_SUPPORT_DATE_COLUMN)?;

    let mut releases = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        let version = versions
            .get(i)
            .ok_or_else(|| missing_cell(VERSION_COLUMN, i))?
            .parse::<ReleaseVersion>()
            .map_err(|e| SimulationError::DataError(format!("Row {}: {}", i, e)))?;

        let release_date = release_dates
            .get(i)
            .ok_or_else(|| missing_cell(RELEASE_DATE_COLUMN, i))
            .and_then(|s| parse_catalog_date(s, RELEASE_DATE_COLUMN, i))?;

        let end_of_support_date = end_of_support_dates
            .get(i)
            .ok_or_else(|| missing_cell(END_OF_SUPPORT_DATE_COLUMN, i))
            .and_then(|s| parse_catalog_date(s, END_OF_SUPPORT_DATE_COLUMN, i))?;

        releases.push(Release::new(version, release_date, end_of_support_date));
    }

    Ok(releases)
}
