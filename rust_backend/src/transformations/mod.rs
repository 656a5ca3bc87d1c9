//! Tabular views of simulation output.
//!
//! The models accumulate plain record vectors; this module turns them into
//! Polars DataFrames for the charting layer, once per run.
//!
//! # Example
//!
//! ```no_run
//! use escalator_rust::io::CatalogLoader;
//! use escalator_rust::services::compute_remain_on_latest_timeline;
//! use escalator_rust::transformations::{timeline_to_dataframe, version_changes};
//! use chrono::NaiveDate;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = CatalogLoader::load_default()?;
//! let samples = compute_remain_on_latest_timeline(
//!     &catalog,
//!     "remain-on-latest",
//!     NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
//! )?;
//!
//! let df = timeline_to_dataframe(&samples)?;
//! let upgrades = timeline_to_dataframe(&version_changes(&samples))?;
//! # Ok(())
//! # }
//! ```

pub mod tables;

pub use tables::{
    catalog_to_dataframe, schedule_to_dataframe, timeline_to_dataframe, version_changes,
};
