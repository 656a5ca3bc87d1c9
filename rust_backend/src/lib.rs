//! Escalator Rust Backend - Kubernetes release timelines and upgrade cycles.
//!
//! Simulates which upstream release a fleet runs over time and how long it
//! takes a fleet to move from one release to the next. Results are plain
//! record vectors that convert to Polars DataFrames for charting.

pub mod algorithms;
pub mod config;
pub mod core;
pub mod io;
pub mod parsing;
pub mod services;
pub mod transformations;

pub use crate::algorithms::{compute_next_upgrade_cycle, UpgradeCyclePolicy};
pub use crate::config::SimulationConfig;
pub use crate::core::{ReleaseCatalog, ReleaseVersion, SimulationError, SimulationResult};
pub use crate::io::CatalogLoader;
