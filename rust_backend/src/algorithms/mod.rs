//! Upgrade-cycle algorithms.
//!
//! This module computes the calendar schedule of moving a fleet from one
//! release to the next, including randomized upgrade failures.
//!
//! # Components
//!
//! - [`upgrade_cycle`]: Phase-by-phase schedule of a single upgrade cycle
//! - [`sampling`]: Failure injection over the flattened fleet roster
//!
//! # Example
//!
//! ```ignore
//! use escalator_rust::algorithms::{compute_next_upgrade_cycle, UpgradeCyclePolicy};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let steps = compute_next_upgrade_cycle(start, &groups, &UpgradeCyclePolicy::default(),
//!     &mut StdRng::seed_from_u64(42))?;
//! println!("{} schedule rows", steps.len());
//! ```

pub mod sampling;
pub mod upgrade_cycle;

pub use sampling::{failure_count, FailurePlan};
pub use upgrade_cycle::{compute_next_upgrade_cycle, UpgradeCyclePolicy};
