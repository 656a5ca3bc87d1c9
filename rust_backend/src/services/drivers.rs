//! Simulation drivers.
//!
//! Orchestration over the timeline and upgrade-cycle models: sweeping whole
//! fleets over a date range and chaining upgrade cycles back to back along a
//! release path.

use chrono::NaiveDate;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::timeline::{
    compute_fixed_cadence_timeline, compute_remain_on_latest_timeline, days_inclusive,
    validate_date_range,
};
use crate::algorithms::{compute_next_upgrade_cycle, UpgradeCyclePolicy};
use crate::core::{
    Environment, EnvironmentGroup, EnvironmentStateSample, ReleaseCatalog, ReleaseVersion,
    ScheduleStep, SimulationError, SimulationResult,
};

/// Start, finish and length of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub start_date: NaiveDate,
    pub finish_date: NaiveDate,
    pub total_days: i64,
}

/// Summarize a schedule as its earliest start and latest finish.
///
/// Returns `None` for an empty schedule.
pub fn summarize_cycle(steps: &[ScheduleStep]) -> Option<CycleSummary> {
    let start_date = steps.iter().map(|s| s.start_date).min()?;
    let finish_date = steps.iter().map(|s| s.finish_date).max()?;
    Some(CycleSummary {
        start_date,
        finish_date,
        total_days: (finish_date - start_date).num_days(),
    })
}

/// Build a uniform fleet of `group_count` groups with
/// `environments_per_group` environments each.
///
/// Groups are named `Group 1..n`; environments are numbered across the
/// whole fleet (`Cluster 1..group_count * environments_per_group`).
pub fn build_fleet(
    group_count: usize,
    environments_per_group: usize,
) -> SimulationResult<Vec<EnvironmentGroup>> {
    if group_count == 0 || environments_per_group == 0 {
        return Err(SimulationError::ConfigurationError(format!(
            "A fleet needs at least one group and one environment per group, got {} x {}",
            group_count, environments_per_group
        )));
    }

    Ok((0..group_count)
        .map(|i| {
            let environments = (0..environments_per_group)
                .map(|j| Environment::new(format!("Cluster {}", i * environments_per_group + j + 1)))
                .collect();
            EnvironmentGroup::new(format!("Group {}", i + 1), environments)
        })
        .collect())
}

/// Run consecutive upgrade cycles from `start_version` up to
/// `target_version`, one per release step.
///
/// Each cycle starts on the previous cycle's latest finish date. Phase labels
/// are prefixed with the transition they belong to, e.g.
/// `"1.15.0 -> 1.16.0: Group 1: Cluster 1"`. Upgrading a version to itself
/// yields an empty schedule.
///
/// # Errors
///
/// `NotFound` for versions missing from the catalog, `ConfigurationError` if
/// the target is older than the start or the policy is invalid.
pub fn compute_chained_upgrade_cycles<R: Rng + ?Sized>(
    catalog: &ReleaseCatalog,
    start_date: NaiveDate,
    start_version: &ReleaseVersion,
    target_version: &ReleaseVersion,
    environment_groups: &[EnvironmentGroup],
    policy: &UpgradeCyclePolicy,
    rng: &mut R,
) -> SimulationResult<Vec<ScheduleStep>> {
    policy.validate()?;
    let path = catalog.versions_between(start_version, target_version)?;

    let mut steps = Vec::new();
    let mut next_start_date = start_date;

    for pair in path.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        let prefix = format!("{} -> {}: ", current.version, next.version);

        let cycle = compute_next_upgrade_cycle(next_start_date, environment_groups, policy, rng)?;
        if let Some(summary) = summarize_cycle(&cycle) {
            debug!(
                "Cycle {}{} to {} ({} days)",
                prefix, summary.start_date, summary.finish_date, summary.total_days
            );
            next_start_date = summary.finish_date;
        }

        steps.extend(cycle.into_iter().map(|mut step| {
            step.phase.insert_str(0, &prefix);
            step
        }));
    }

    info!(
        "Computed {} chained upgrade cycles {} -> {}: {} rows",
        path.len().saturating_sub(1),
        start_version,
        target_version,
        steps.len()
    );

    Ok(steps)
}

/// How a simulated environment chooses its release over time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum UpgradePolicy {
    /// Always runs the newest shipped release
    RemainOnLatest,
    /// Starts on `first_version`, upgrades one release every
    /// `upgrade_every_days` once the next one has shipped
    FixedCadence {
        first_version: ReleaseVersion,
        upgrade_every_days: u32,
    },
}

/// One environment of a simulated fleet and its upgrade policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetMember {
    pub environment_id: String,
    pub policy: UpgradePolicy,
}

impl FleetMember {
    pub fn remain_on_latest(environment_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            policy: UpgradePolicy::RemainOnLatest,
        }
    }

    pub fn fixed_cadence(
        environment_id: impl Into<String>,
        first_version: ReleaseVersion,
        upgrade_every_days: u32,
    ) -> Self {
        Self {
            environment_id: environment_id.into(),
            policy: UpgradePolicy::FixedCadence {
                first_version,
                upgrade_every_days,
            },
        }
    }
}

/// Sweep every member of a fleet over `[start_date, end_date]`.
///
/// Rows are grouped by member, in member order, and by day within a member.
pub fn compute_fleet_timelines(
    catalog: &ReleaseCatalog,
    members: &[FleetMember],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> SimulationResult<Vec<EnvironmentStateSample>> {
    validate_date_range(start_date, end_date)?;

    let mut samples = Vec::new();
    for member in members {
        let timeline = match &member.policy {
            UpgradePolicy::RemainOnLatest => compute_remain_on_latest_timeline(
                catalog,
                &member.environment_id,
                start_date,
                end_date,
            )?,
            UpgradePolicy::FixedCadence {
                first_version,
                upgrade_every_days,
            } => compute_fixed_cadence_timeline(
                catalog,
                &member.environment_id,
                start_date,
                end_date,
                first_version,
                *upgrade_every_days,
            )?,
        };
        samples.extend(timeline);
    }

    info!(
        "Computed fleet timelines for {} environments from {} to {}: {} rows",
        members.len(),
        start_date,
        end_date,
        samples.len()
    );

    Ok(samples)
}

/// Number of supported releases on each day of `[start_date, end_date]`.
pub fn supported_release_counts(
    catalog: &ReleaseCatalog,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> SimulationResult<Vec<(NaiveDate, usize)>> {
    validate_date_range(start_date, end_date)?;
    Ok(days_inclusive(start_date, end_date)
        .map(|day| (day, catalog.supported_at(day).len()))
        .collect())
}
