//! Failure injection for upgrade cycles.
//!
//! A fixed share of the whole fleet is drawn without replacement, uniformly
//! over the flattened roster. Groups are not sampled individually, so a small
//! group can end up with none or all of its environments failing.

use log::debug;
use rand::seq::index;
use rand::Rng;
use uuid::Uuid;

use crate::core::{EnvironmentGroup, SimulationError, SimulationResult};

/// Reject failure probabilities outside `[0, 1]` (NaN included).
pub fn validate_failure_percentage(upgrade_failure_percentage: f64) -> SimulationResult<()> {
    if !(0.0..=1.0).contains(&upgrade_failure_percentage) {
        return Err(SimulationError::ConfigurationError(format!(
            "upgrade_failure_percentage must be within [0, 1], got {}",
            upgrade_failure_percentage
        )));
    }
    Ok(())
}

/// Number of environments that fail out of `total`.
///
/// Rounds half to even, so 2.5 failures round to 2.
pub fn failure_count(total: usize, upgrade_failure_percentage: f64) -> usize {
    let expected = (total as f64 * upgrade_failure_percentage).round_ties_even();
    (expected as usize).min(total)
}

/// Which environments of a fleet fail their upgrade, by roster position.
///
/// Positions follow declaration order: every environment of the first group,
/// then every environment of the second, and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailurePlan {
    failed: Vec<bool>,
}

impl FailurePlan {
    /// Sample `round(total * upgrade_failure_percentage)` failures.
    pub fn sample<R: Rng + ?Sized>(
        groups: &[EnvironmentGroup],
        upgrade_failure_percentage: f64,
        rng: &mut R,
    ) -> SimulationResult<Self> {
        validate_failure_percentage(upgrade_failure_percentage)?;

        let total: usize = groups.iter().map(EnvironmentGroup::len).sum();
        let amount = failure_count(total, upgrade_failure_percentage);

        let mut failed = vec![false; total];
        for position in index::sample(rng, total, amount).iter() {
            failed[position] = true;
        }

        let plan = Self { failed };
        debug!(
            "Sampled {} of {} environments to fail: {:?} ({:?})",
            amount,
            total,
            plan.failed_names(groups),
            plan.failed_ids(groups)
        );
        Ok(plan)
    }

    /// Whether the environment at `position` in the flattened roster fails.
    pub fn is_failed(&self, position: usize) -> bool {
        self.failed.get(position).copied().unwrap_or(false)
    }

    pub fn failed_count(&self) -> usize {
        self.failed.iter().filter(|f| **f).count()
    }

    pub fn len(&self) -> usize {
        self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failed.is_empty()
    }

    /// Ids of the failing environments, in roster order.
    pub fn failed_ids(&self, groups: &[EnvironmentGroup]) -> Vec<Uuid> {
        groups
            .iter()
            .flat_map(|g| g.environments.iter().map(|e| e.id))
            .zip(&self.failed)
            .filter_map(|(id, &failed)| failed.then_some(id))
            .collect()
    }

    /// Phase labels of the failing environments, in roster order.
    pub fn failed_names(&self, groups: &[EnvironmentGroup]) -> Vec<String> {
        groups
            .iter()
            .flat_map(|g| g.environments.iter().map(move |e| g.phase_label(e)))
            .zip(&self.failed)
            .filter_map(|(label, &failed)| failed.then_some(label))
            .collect()
    }
}
