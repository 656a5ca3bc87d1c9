//! Core domain models for release timelines and upgrade cycles.
//!
//! This module defines the fundamental data structures used throughout the
//! simulation: release versions, the release catalog, fleet topology, and the
//! records produced by the timeline and upgrade-cycle models.

pub mod catalog;
pub mod domain;
pub mod error;
pub mod version;


pub use catalog::ReleaseCatalog;
pub use domain::{
    Environment, EnvironmentGroup, EnvironmentStateSample, MaintenanceWindow, Release,
    ScheduleStep, Step,
};
pub use error::{SimulationError, SimulationResult};
pub use version::ReleaseVersion;
