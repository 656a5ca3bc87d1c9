//! Domain models for releases, fleets and simulation records.
//!
//! This module provides the data structures shared by the release-timeline and
//! upgrade-cycle models: catalog releases, the environments of a fleet, and the
//! rows both models emit for the charting layer.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::error::{SimulationError, SimulationResult};
use super::version::ReleaseVersion;

/// Weekday index of Saturday when Monday is 0.
pub const SATURDAY_INDEX: u32 = 5;

/// A published upstream release and its support window.
///
/// # Examples
///
/// ```
/// use escalator_rust::core::{Release, ReleaseVersion};
/// use chrono::NaiveDate;
///
/// let release = Release::new(
///     ReleaseVersion::new(1, 9, 0),
///     NaiveDate::from_ymd_opt(2017, 12, 15).unwrap(),
///     NaiveDate::from_ymd_opt(2018, 9, 27).unwrap(),
/// );
/// assert!(release.is_supported_at(NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()));
/// assert!(!release.is_supported_at(NaiveDate::from_ymd_opt(2018, 9, 27).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub version: ReleaseVersion,
    pub release_date: NaiveDate,
    pub end_of_support_date: NaiveDate,
}

impl Release {
    pub fn new(
        version: ReleaseVersion,
        release_date: NaiveDate,
        end_of_support_date: NaiveDate,
    ) -> Self {
        Self {
            version,
            release_date,
            end_of_support_date,
        }
    }

    /// Days between this release's release date and `at_date`.
    pub fn age_at(&self, at_date: NaiveDate) -> i64 {
        (at_date - self.release_date).num_days()
    }

    /// Days left until end of support, negative once support has lapsed.
    pub fn days_until_end_of_support(&self, at_date: NaiveDate) -> i64 {
        (self.end_of_support_date - at_date).num_days()
    }

    /// Whether `at_date` falls inside `[release_date, end_of_support_date)`.
    pub fn is_supported_at(&self, at_date: NaiveDate) -> bool {
        self.release_date <= at_date && at_date < self.end_of_support_date
    }
}

/// A single deployment target (e.g. one cluster) within a fleet.
///
/// `node_count` and `pod_count` are capacity hints; scheduling does not use
/// them yet. The `id` is assigned at creation and only correlates failure
/// sampling with the environment it hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub id: Uuid,
    pub name: String,
    pub node_count: u32,
    pub pod_count: u32,
}

impl Environment {
    pub const DEFAULT_NODE_COUNT: u32 = 3;
    pub const DEFAULT_POD_COUNT: u32 = 30;

    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, Self::DEFAULT_NODE_COUNT, Self::DEFAULT_POD_COUNT)
    }

    pub fn with_capacity(name: impl Into<String>, node_count: u32, pod_count: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            node_count,
            pod_count,
        }
    }
}

/// Environments that enter their maintenance window together.
///
/// Groups are upgraded one after another in the order supplied; the
/// environments inside a group are upgraded in parallel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentGroup {
    pub name: String,
    pub environments: Vec<Environment>,
}

impl EnvironmentGroup {
    pub fn new(name: impl Into<String>, environments: Vec<Environment>) -> Self {
        Self {
            name: name.into(),
            environments,
        }
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    /// Rejects environment names that repeat within the group, since they
    /// would share a chart label.
    pub fn validate(&self) -> SimulationResult<()> {
        let mut seen = HashSet::with_capacity(self.environments.len());
        for environment in &self.environments {
            if !seen.insert(environment.name.as_str()) {
                return Err(SimulationError::ConfigurationError(format!(
                    "Environment name {} appears more than once in group {}",
                    environment.name, self.name
                )));
            }
        }
        Ok(())
    }

    /// Chart label for one of this group's environments.
    pub fn phase_label(&self, environment: &Environment) -> String {
        format!("{}: {}", self.name, environment.name)
    }
}

/// When the `upgrading` step of an environment may begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceWindow {
    /// Upgrades start immediately.
    None,
    /// Upgrades wait for the next Saturday.
    #[default]
    Weekends,
}

impl MaintenanceWindow {
    /// Days to wait from `group_start_date` until the window opens.
    ///
    /// For weekends this is `max(0, SATURDAY - weekday)`, so a group starting
    /// on Saturday or Sunday waits zero days.
    pub fn wait_days(&self, group_start_date: NaiveDate) -> u32 {
        match self {
            MaintenanceWindow::None => 0,
            MaintenanceWindow::Weekends => {
                SATURDAY_INDEX.saturating_sub(group_start_date.weekday().num_days_from_monday())
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceWindow::None => "none",
            MaintenanceWindow::Weekends => "weekends",
        }
    }
}

impl FromStr for MaintenanceWindow {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(MaintenanceWindow::None),
            "weekends" => Ok(MaintenanceWindow::Weekends),
            other => Err(SimulationError::ConfigurationError(format!(
                "Unknown maintenance_window: '{}'. Use 'none' or 'weekends'",
                other
            ))),
        }
    }
}

impl fmt::Display for MaintenanceWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The state an upgrade-cycle row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    Ignoring,
    Planning,
    PreWork,
    Waiting,
    Upgrading,
    Recovering,
}

impl Step {
    pub const GLOBAL: [Step; 3] = [Step::Ignoring, Step::Planning, Step::PreWork];
    pub const PER_ENVIRONMENT: [Step; 3] = [Step::Waiting, Step::Upgrading, Step::Recovering];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Ignoring => "ignoring",
            Step::Planning => "planning",
            Step::PreWork => "pre-work",
            Step::Waiting => "waiting",
            Step::Upgrading => "upgrading",
            Step::Recovering => "recovering",
        }
    }

    pub fn is_global(&self) -> bool {
        Self::GLOBAL.contains(self)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of an upgrade-cycle schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStep {
    pub phase: String,
    pub step: Step,
    pub start_date: NaiveDate,
    pub finish_date: NaiveDate,
}

impl ScheduleStep {
    /// Label used for the fleet-wide phases.
    pub const GLOBAL_PHASE: &'static str = "Global";

    pub fn new(
        phase: impl Into<String>,
        step: Step,
        start_date: NaiveDate,
        finish_date: NaiveDate,
    ) -> Self {
        Self {
            phase: phase.into(),
            step,
            start_date,
            finish_date,
        }
    }

    pub fn duration_days(&self) -> i64 {
        (self.finish_date - self.start_date).num_days()
    }
}

/// State of one environment on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentStateSample {
    pub environment_id: String,
    pub at_date: NaiveDate,
    pub version: ReleaseVersion,
    pub release_date: NaiveDate,
    pub end_of_support_date: NaiveDate,
    pub release_age: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_until_end_of_support: Option<i64>,
}

impl EnvironmentStateSample {
    /// Builds the sample for `release` observed on `at_date`, including the
    /// remaining support window.
    pub fn observe(environment_id: &str, at_date: NaiveDate, release: &Release) -> Self {
        Self {
            environment_id: environment_id.to_string(),
            at_date,
            version: release.version,
            release_date: release.release_date,
            end_of_support_date: release.end_of_support_date,
            release_age: release.age_at(at_date),
            days_until_end_of_support: Some(release.days_until_end_of_support(at_date)),
        }
    }

    pub fn is_out_of_support(&self) -> bool {
        self.days_until_end_of_support.is_some_and(|days| days <= 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekend_wait_days() {
        let window = MaintenanceWindow::Weekends;
        // 2020-01-13 is a Monday
        assert_eq!(window.wait_days(date(2020, 1, 13)), 5);
        assert_eq!(window.wait_days(date(2020, 1, 17)), 1);
        assert_eq!(window.wait_days(date(2020, 1, 18)), 0);
        assert_eq!(window.wait_days(date(2020, 1, 19)), 0);
        assert_eq!(MaintenanceWindow::None.wait_days(date(2020, 1, 13)), 0);
    }

    #[test]
    fn test_group_rejects_duplicate_environment_names() {
        let group = EnvironmentGroup::new(
            "Group 1",
            vec![Environment::new("Cluster 1"), Environment::new("Cluster 1")],
        );
        let err = group.validate().unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("Cluster 1"));

        let distinct = EnvironmentGroup::new(
            "Group 1",
            vec![Environment::new("Cluster 1"), Environment::new("Cluster 2")],
        );
        assert!(distinct.validate().is_ok());
    }

    #[test]
    fn test_maintenance_window_parsing() {
        assert_eq!("weekends".parse::<MaintenanceWindow>().unwrap(), MaintenanceWindow::Weekends);
        assert_eq!(" None ".parse::<MaintenanceWindow>().unwrap(), MaintenanceWindow::None);
        let err = "nights".parse::<MaintenanceWindow>().unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("nights"));
    }

    #[test]
    fn test_step_labels() {
        assert_eq!(Step::PreWork.to_string(), "pre-work");
        assert_eq!(serde_json::to_string(&Step::PreWork).unwrap(), "\"pre-work\"");
        assert!(Step::Planning.is_global());
        assert!(!Step::Recovering.is_global());
    }

    #[test]
    fn test_release_age_and_support_window() {
        let release = Release::new(ReleaseVersion::new(1, 8, 0), date(2017, 9, 29), date(2018, 6, 27));
        assert_eq!(release.age_at(date(2018, 1, 1)), 94);
        assert_eq!(release.days_until_end_of_support(date(2018, 6, 26)), 1);
        assert_eq!(release.days_until_end_of_support(date(2018, 7, 1)), -4);
    }

    #[test]
    fn test_environment_ids_are_unique() {
        let a = Environment::new("Cluster 1");
        let b = Environment::new("Cluster 1");
        assert_ne!(a.id, b.id);
        assert_eq!(a.node_count, 3);
        assert_eq!(a.pod_count, 30);
    }
}
