//! Simulation services.
//!
//! The release-timeline model lives in [`timeline`]; [`drivers`] runs it and
//! the upgrade-cycle model across whole fleets and release paths.

pub mod drivers;
pub mod timeline;

pub use drivers::{
    build_fleet, compute_chained_upgrade_cycles, compute_fleet_timelines, summarize_cycle,
    supported_release_counts, CycleSummary, FleetMember, UpgradePolicy,
};
pub use timeline::{
    compute_fixed_cadence_timeline, compute_remain_on_latest_timeline, predict_version,
    predict_version_with_support_window, VersionPrediction,
};
