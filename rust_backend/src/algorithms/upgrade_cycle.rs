//! Upgrade-cycle model.
//!
//! An upgrade cycle is the calendar time between a fleet starting on one
//! release and every environment running the next. It is made of three
//! fleet-wide phases followed by a `waiting -> upgrading -> recovering`
//! sequence per environment.

use chrono::{Days, NaiveDate};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::sampling::{validate_failure_percentage, FailurePlan};
use crate::core::{
    EnvironmentGroup, MaintenanceWindow, ScheduleStep, SimulationError, SimulationResult, Step,
};

/// Durations and probabilities that shape an upgrade cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeCyclePolicy {
    /// Days nobody looks at the new release
    pub ignore_days: u32,
    pub plan_days: u32,
    pub prework_days: u32,
    /// Days one environment spends upgrading; not yet size dependent
    pub upgrade_days: u32,
    /// Share of the fleet whose upgrade fails, within `[0, 1]`
    pub upgrade_failure_percentage: f64,
    pub maintenance_window: MaintenanceWindow,
}

impl Default for UpgradeCyclePolicy {
    fn default() -> Self {
        Self {
            ignore_days: 14,
            plan_days: 1,
            prework_days: 1,
            upgrade_days: 1,
            upgrade_failure_percentage: 1.0,
            maintenance_window: MaintenanceWindow::Weekends,
        }
    }
}

impl UpgradeCyclePolicy {
    pub fn with_failure_percentage(mut self, upgrade_failure_percentage: f64) -> Self {
        self.upgrade_failure_percentage = upgrade_failure_percentage;
        self
    }

    pub fn with_maintenance_window(mut self, maintenance_window: MaintenanceWindow) -> Self {
        self.maintenance_window = maintenance_window;
        self
    }

    pub fn validate(&self) -> SimulationResult<()> {
        validate_failure_percentage(self.upgrade_failure_percentage)
    }

    /// Recovery takes one extra day plus a full re-run of the upgrade.
    pub fn recover_days(&self, failed: bool) -> u32 {
        if failed {
            1 + self.upgrade_days
        } else {
            0
        }
    }
}

fn add_days(date: NaiveDate, days: u64) -> SimulationResult<NaiveDate> {
    date.checked_add_days(Days::new(days)).ok_or_else(|| {
        SimulationError::ConfigurationError(format!(
            "Adding {} days to {} leaves the supported date range",
            days, date
        ))
    })
}

/// Appends a row starting at `start` and returns its finish date.
fn push_step(
    steps: &mut Vec<ScheduleStep>,
    phase: &str,
    step: Step,
    start: NaiveDate,
    days: u64,
) -> SimulationResult<NaiveDate> {
    let finish = add_days(start, days)?;
    steps.push(ScheduleStep::new(phase, step, start, finish));
    Ok(finish)
}

/// Compute the schedule of the next upgrade cycle starting on `start_date`.
///
/// Rows come out in declaration order: the three global phases, then three
/// rows per environment, group by group. Environments of one group share the
/// group start; each following group starts when the previous group's last
/// environment finishes recovering.
///
/// Failures are drawn from `rng` before anything is scheduled, so a seeded
/// generator makes the schedule reproducible.
///
/// # Errors
///
/// `ConfigurationError` if the policy is invalid or an environment name
/// repeats within a group.
///
/// # Examples
///
/// ```
/// use escalator_rust::algorithms::{compute_next_upgrade_cycle, UpgradeCyclePolicy};
/// use escalator_rust::core::{Environment, EnvironmentGroup, MaintenanceWindow};
/// use chrono::NaiveDate;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let groups = vec![EnvironmentGroup::new("Group 1", vec![Environment::new("Cluster 1")])];
/// let policy = UpgradeCyclePolicy::default()
///     .with_failure_percentage(0.0)
///     .with_maintenance_window(MaintenanceWindow::None);
///
/// let steps = compute_next_upgrade_cycle(
///     NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
///     &groups,
///     &policy,
///     &mut StdRng::seed_from_u64(0),
/// )
/// .unwrap();
/// assert_eq!(steps.len(), 6);
/// ```
pub fn compute_next_upgrade_cycle<R: Rng + ?Sized>(
    start_date: NaiveDate,
    environment_groups: &[EnvironmentGroup],
    policy: &UpgradeCyclePolicy,
    rng: &mut R,
) -> SimulationResult<Vec<ScheduleStep>> {
    policy.validate()?;
    for group in environment_groups {
        group.validate()?;
    }

    let failures = FailurePlan::sample(environment_groups, policy.upgrade_failure_percentage, rng)?;

    let environment_count = failures.len();
    let mut steps = Vec::with_capacity(3 + 3 * environment_count);

    let global_durations = [policy.ignore_days, policy.plan_days, policy.prework_days];
    let mut cursor = start_date;
    for (step, days) in Step::GLOBAL.into_iter().zip(global_durations) {
        cursor = push_step(
            &mut steps,
            ScheduleStep::GLOBAL_PHASE,
            step,
            cursor,
            u64::from(days),
        )?;
    }

    let mut position = 0;
    for group in environment_groups {
        let group_start_date = steps.last().map_or(start_date, |s| s.finish_date);
        let wait_days = policy.maintenance_window.wait_days(group_start_date);

        for environment in &group.environments {
            let phase = group.phase_label(environment);
            let recover_days = policy.recover_days(failures.is_failed(position));

            let upgrade_start = push_step(
                &mut steps,
                &phase,
                Step::Waiting,
                group_start_date,
                u64::from(wait_days),
            )?;
            let recover_start = push_step(
                &mut steps,
                &phase,
                Step::Upgrading,
                upgrade_start,
                u64::from(policy.upgrade_days),
            )?;
            push_step(
                &mut steps,
                &phase,
                Step::Recovering,
                recover_start,
                u64::from(recover_days),
            )?;

            position += 1;
        }
    }

    info!(
        "Computed upgrade cycle from {}: {} groups, {} environments, {} failed upgrades",
        start_date,
        environment_groups.len(),
        environment_count,
        failures.failed_count()
    );

    Ok(steps)
}
