//! The immutable, time-sorted release catalog.
//!
//! A catalog is validated once when it is built and is read-only afterwards.
//! Positions inside the catalog are an implementation detail: callers look
//! releases up by version or by date.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

use super::domain::Release;
use super::error::{SimulationError, SimulationResult};
use super::version::ReleaseVersion;

/// Ordered sequence of releases, unique by version and strictly ascending by
/// both version and release date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseCatalog {
    releases: Vec<Release>,
}

impl ReleaseCatalog {
    /// Builds a catalog, rejecting data that violates the catalog invariants.
    ///
    /// # Errors
    ///
    /// `DataError` if the list is empty, a release does not ship before its
    /// end of support, a version repeats, or versions and release dates are
    /// not strictly ascending together.
    pub fn new(releases: Vec<Release>) -> SimulationResult<Self> {
        if releases.is_empty() {
            return Err(SimulationError::DataError(
                "Release catalog contains no releases".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(releases.len());
        for (row, release) in releases.iter().enumerate() {
            if release.release_date >= release.end_of_support_date {
                return Err(SimulationError::DataError(format!(
                    "Release {} (row {}) has release_date {} not before end_of_support_date {}",
                    release.version, row, release.release_date, release.end_of_support_date
                )));
            }
            if !seen.insert(release.version) {
                return Err(SimulationError::DataError(format!(
                    "Duplicate version {} at row {}",
                    release.version, row
                )));
            }
        }

        for (row, pair) in releases.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.version <= prev.version {
                return Err(SimulationError::DataError(format!(
                    "Version {} at row {} does not follow {}",
                    next.version,
                    row + 1,
                    prev.version
                )));
            }
            if next.release_date <= prev.release_date {
                return Err(SimulationError::DataError(format!(
                    "Release {} at row {} ({}) is not after {} ({})",
                    next.version,
                    row + 1,
                    next.release_date,
                    prev.version,
                    prev.release_date
                )));
            }
        }

        Ok(Self { releases })
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Release> {
        self.releases.iter()
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    /// Always false: a catalog holds at least one release.
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// The oldest release.
    pub fn first(&self) -> &Release {
        &self.releases[0]
    }

    /// The newest release.
    pub fn latest(&self) -> &Release {
        &self.releases[self.releases.len() - 1]
    }

    /// Earliest release date and latest end-of-support date in the catalog.
    pub fn date_span(&self) -> (NaiveDate, NaiveDate) {
        let last_eos = self
            .releases
            .iter()
            .map(|r| r.end_of_support_date)
            .max()
            .unwrap_or(self.first().end_of_support_date);
        (self.first().release_date, last_eos)
    }

    pub(crate) fn position_of(&self, version: &ReleaseVersion) -> Option<usize> {
        self.releases
            .binary_search_by(|r| r.version.cmp(version))
            .ok()
    }

    pub(crate) fn position_of_or_not_found(
        &self,
        version: &ReleaseVersion,
    ) -> SimulationResult<usize> {
        self.position_of(version).ok_or_else(|| {
            SimulationError::NotFound(format!("Version {} is not in the release catalog", version))
        })
    }

    pub(crate) fn at_position(&self, index: usize) -> &Release {
        &self.releases[index.min(self.releases.len() - 1)]
    }

    /// Looks up a release by version.
    pub fn get(&self, version: &ReleaseVersion) -> SimulationResult<&Release> {
        self.position_of_or_not_found(version)
            .map(|index| &self.releases[index])
    }

    /// The release whose `release_date` is the greatest value `<= at_date`.
    ///
    /// # Errors
    ///
    /// `NotFound` if `at_date` precedes the first release.
    pub fn lookup_active(&self, at_date: NaiveDate) -> SimulationResult<&Release> {
        let shipped = self.releases.partition_point(|r| r.release_date <= at_date);
        if shipped == 0 {
            return Err(SimulationError::NotFound(format!(
                "No release shipped on or before {} (catalog starts {})",
                at_date,
                self.first().release_date
            )));
        }
        Ok(&self.releases[shipped - 1])
    }

    /// All releases strictly newer than `version`, oldest first.
    ///
    /// # Errors
    ///
    /// `NotFound` if `version` is not in the catalog.
    pub fn versions_after(&self, version: &ReleaseVersion) -> SimulationResult<&[Release]> {
        let index = self.position_of_or_not_found(version)?;
        Ok(&self.releases[index + 1..])
    }

    /// Releases from `start` to `end`, both inclusive, oldest first.
    ///
    /// # Errors
    ///
    /// `NotFound` if either version is missing, `ConfigurationError` if
    /// `end` is older than `start`.
    pub fn versions_between(
        &self,
        start: &ReleaseVersion,
        end: &ReleaseVersion,
    ) -> SimulationResult<&[Release]> {
        let from = self.position_of_or_not_found(start)?;
        let to = self.position_of_or_not_found(end)?;
        if to < from {
            return Err(SimulationError::ConfigurationError(format!(
                "Target version {} is older than start version {}",
                end, start
            )));
        }
        Ok(&self.releases[from..=to])
    }

    /// Releases whose support window contains `at_date`.
    pub fn supported_at(&self, at_date: NaiveDate) -> Vec<&Release> {
        self.releases
            .iter()
            .filter(|r| r.is_supported_at(at_date))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ReleaseCatalog {
    type Item = &'a Release;
    type IntoIter = std::slice::Iter<'a, Release>;

    fn into_iter(self) -> Self::IntoIter {
        self.releases.iter()
    }
}
