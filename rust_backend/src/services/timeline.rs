//! Release-timeline model.
//!
//! Resolves which release an environment runs on a given day, either by
//! always tracking the newest shipped release or by upgrading on a fixed
//! cadence, and reports how old that release is and how long it stays
//! supported.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{
    EnvironmentStateSample, ReleaseCatalog, ReleaseVersion, SimulationError, SimulationResult,
};

/// The release active on a date, with its age and support window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPrediction {
    pub version: ReleaseVersion,
    pub release_date: NaiveDate,
    pub end_of_support_date: NaiveDate,
    pub release_age_days: i64,
    pub days_until_end_of_support: Option<i64>,
}

/// Predict the release an always-up-to-date environment runs on `at_date`.
///
/// # Errors
///
/// `NotFound` if `at_date` precedes the first release.
pub fn predict_version(
    catalog: &ReleaseCatalog,
    at_date: NaiveDate,
) -> SimulationResult<VersionPrediction> {
    let release = catalog.lookup_active(at_date)?;
    Ok(VersionPrediction {
        version: release.version,
        release_date: release.release_date,
        end_of_support_date: release.end_of_support_date,
        release_age_days: release.age_at(at_date),
        days_until_end_of_support: None,
    })
}

/// Like [`predict_version`], also reporting the days left until end of
/// support. The value turns negative once the release is out of support.
pub fn predict_version_with_support_window(
    catalog: &ReleaseCatalog,
    at_date: NaiveDate,
) -> SimulationResult<VersionPrediction> {
    let mut prediction = predict_version(catalog, at_date)?;
    prediction.days_until_end_of_support =
        Some((prediction.end_of_support_date - at_date).num_days());
    Ok(prediction)
}

pub(crate) fn validate_date_range(start_date: NaiveDate, end_date: NaiveDate) -> SimulationResult<()> {
    if end_date < start_date {
        return Err(SimulationError::ConfigurationError(format!(
            "end_date {} is before start_date {}",
            end_date, start_date
        )));
    }
    Ok(())
}

/// Every day in `[start_date, end_date]`, ascending.
pub(crate) fn days_inclusive(
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> impl Iterator<Item = NaiveDate> {
    start_date.iter_days().take_while(move |day| *day <= end_date)
}

/// Simulate an environment that starts on `first_version` and attempts an
/// upgrade every `upgrade_every_days` elapsed days.
///
/// Once the counter reaches the cadence, the next release is adopted only if
/// it has already shipped; otherwise the environment retries every following
/// day without resetting the counter. A trigger that takes effect resets the
/// counter, even at the newest release where there is nothing newer to adopt.
///
/// Emits one sample per day of the inclusive range.
///
/// # Errors
///
/// `NotFound` if `first_version` is not in the catalog, `ConfigurationError`
/// for an empty range or a zero cadence.
pub fn compute_fixed_cadence_timeline(
    catalog: &ReleaseCatalog,
    environment_id: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    first_version: &ReleaseVersion,
    upgrade_every_days: u32,
) -> SimulationResult<Vec<EnvironmentStateSample>> {
    validate_date_range(start_date, end_date)?;
    if upgrade_every_days == 0 {
        return Err(SimulationError::ConfigurationError(
            "upgrade_every_days must be at least 1".to_string(),
        ));
    }

    let mut cursor = catalog.position_of_or_not_found(first_version)?;
    let mut days_since_last_upgrade: u32 = 0;
    let mut samples = Vec::new();

    for day in days_inclusive(start_date, end_date) {
        if days_since_last_upgrade >= upgrade_every_days {
            let candidate = (cursor + 1).min(catalog.len() - 1);
            if catalog.at_position(candidate).release_date <= day {
                cursor = candidate;
                days_since_last_upgrade = 0;
            }
        }

        samples.push(EnvironmentStateSample::observe(
            environment_id,
            day,
            catalog.at_position(cursor),
        ));

        days_since_last_upgrade += 1;
    }

    Ok(samples)
}

/// Simulate an environment that always runs the newest shipped release.
///
/// # Errors
///
/// `NotFound` if the range starts before the first release,
/// `ConfigurationError` for an empty range.
pub fn compute_remain_on_latest_timeline(
    catalog: &ReleaseCatalog,
    environment_id: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> SimulationResult<Vec<EnvironmentStateSample>> {
    validate_date_range(start_date, end_date)?;

    days_inclusive(start_date, end_date)
        .map(|day| {
            catalog
                .lookup_active(day)
                .map(|release| EnvironmentStateSample::observe(environment_id, day, release))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::CatalogLoader;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn v(s: &str) -> ReleaseVersion {
        s.parse().unwrap()
    }

    /// Rows where the version differs from the previous row
    fn version_changes(samples: &[EnvironmentStateSample]) -> Vec<(NaiveDate, String, i64)> {
        let mut changes = Vec::new();
        let mut previous: Option<ReleaseVersion> = None;
        for s in samples {
            if previous != Some(s.version) {
                changes.push((s.at_date, s.version.to_string(), s.release_age));
            }
            previous = Some(s.version);
        }
        changes
    }

    #[test]
    fn test_predict_version() {
        let catalog = CatalogLoader::load_default().unwrap();
        let prediction = predict_version(&catalog, date("2018-01-01")).unwrap();
        assert_eq!(prediction.version, v("1.9.0"));
        assert_eq!(prediction.release_age_days, 17);
        assert_eq!(prediction.days_until_end_of_support, None);
    }

    #[test]
    fn test_predict_version_with_support_window() {
        let catalog = CatalogLoader::load_default().unwrap();
        let prediction = predict_version_with_support_window(&catalog, date("2018-09-01")).unwrap();
        assert_eq!(prediction.version, v("1.11.0"));
        assert_eq!(prediction.days_until_end_of_support, Some(205));
    }

    #[test]
    fn test_predict_version_before_catalog() {
        let catalog = CatalogLoader::load_default().unwrap();
        let err = predict_version(&catalog, date("2015-01-01")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_fixed_cadence_row_per_day() {
        let catalog = CatalogLoader::load_default().unwrap();
        let samples = compute_fixed_cadence_timeline(
            &catalog,
            "upgrade-every-90-days",
            date("2018-01-01"),
            date("2019-01-01"),
            &v("1.9.0"),
            90,
        )
        .unwrap();
        assert_eq!(samples.len(), 366);
        assert!(samples.iter().all(|s| s.environment_id == "upgrade-every-90-days"));
    }

    #[test]
    fn test_fixed_cadence_changes_version_every_upgrade() {
        let catalog = CatalogLoader::load_default().unwrap();
        let samples = compute_fixed_cadence_timeline(
            &catalog,
            "upgrade-every-30-days",
            date("2018-01-01"),
            date("2018-03-15"),
            &v("1.7.0"),
            30,
        )
        .unwrap();

        assert_eq!(
            version_changes(&samples),
            vec![
                (date("2018-01-01"), "1.7.0".to_string(), 185),
                (date("2018-01-31"), "1.8.0".to_string(), 124),
                (date("2018-03-02"), "1.9.0".to_string(), 77),
            ]
        );
    }

    #[test]
    fn test_fixed_cadence_waits_for_unreleased_version() {
        let catalog = CatalogLoader::load_default().unwrap();
        let samples = compute_fixed_cadence_timeline(
            &catalog,
            "upgrade-every-1-day",
            date("2018-01-01"),
            date("2018-10-01"),
            &v("1.8.0"),
            1,
        )
        .unwrap();

        assert_eq!(
            version_changes(&samples),
            vec![
                (date("2018-01-01"), "1.8.0".to_string(), 94),
                (date("2018-01-02"), "1.9.0".to_string(), 18),
                (date("2018-03-26"), "1.10.0".to_string(), 0),
                (date("2018-06-27"), "1.11.0".to_string(), 0),
                (date("2018-09-27"), "1.12.0".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_fixed_cadence_blocked_trigger_keeps_counter() {
        let catalog = CatalogLoader::load_default().unwrap();
        let samples = compute_fixed_cadence_timeline(
            &catalog,
            "blocked",
            date("2018-02-10"),
            date("2018-04-30"),
            &v("1.9.0"),
            20,
        )
        .unwrap();

        // Due on 2018-03-02 but 1.10.0 is not out; adopted on release day.
        let changes = version_changes(&samples);
        assert_eq!(changes[1], (date("2018-03-26"), "1.10.0".to_string(), 0));
        // The counter restarted on 2018-03-26, so nothing else happens before
        // 1.11.0 ships.
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_fixed_cadence_stays_on_newest_release() {
        let catalog = CatalogLoader::load_default().unwrap();
        let samples = compute_fixed_cadence_timeline(
            &catalog,
            "pinned",
            date("2021-01-01"),
            date("2021-03-01"),
            &v("1.20.0"),
            7,
        )
        .unwrap();
        assert!(samples.iter().all(|s| s.version == v("1.20.0")));
    }

    #[test]
    fn test_fixed_cadence_unknown_version() {
        let catalog = CatalogLoader::load_default().unwrap();
        let err = compute_fixed_cadence_timeline(
            &catalog,
            "x",
            date("2018-01-01"),
            date("2018-02-01"),
            &v("1.99.0"),
            30,
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_fixed_cadence_rejects_zero_cadence_and_reversed_range() {
        let catalog = CatalogLoader::load_default().unwrap();
        let zero = compute_fixed_cadence_timeline(
            &catalog,
            "x",
            date("2018-01-01"),
            date("2018-02-01"),
            &v("1.9.0"),
            0,
        )
        .unwrap_err();
        assert!(zero.is_configuration_error());

        let reversed = compute_fixed_cadence_timeline(
            &catalog,
            "x",
            date("2018-02-01"),
            date("2018-01-01"),
            &v("1.9.0"),
            30,
        )
        .unwrap_err();
        assert!(reversed.is_configuration_error());
    }

    #[test]
    fn test_remain_on_latest_row_per_day() {
        let catalog = CatalogLoader::load_default().unwrap();
        let samples = compute_remain_on_latest_timeline(
            &catalog,
            "remain-on-latest",
            date("2018-01-01"),
            date("2019-01-01"),
        )
        .unwrap();
        assert_eq!(samples.len(), 366);
        assert_eq!(samples[0].version, v("1.9.0"));
        assert_eq!(samples[365].version, v("1.13.0"));
        assert!(samples.iter().all(|s| s.days_until_end_of_support.is_some()));
    }

    #[test]
    fn test_remain_on_latest_single_day() {
        let catalog = CatalogLoader::load_default().unwrap();
        let samples =
            compute_remain_on_latest_timeline(&catalog, "one", date("2018-03-26"), date("2018-03-26"))
                .unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].release_age, 0);
    }

    #[test]
    fn test_remain_on_latest_before_catalog() {
        let catalog = CatalogLoader::load_default().unwrap();
        let err = compute_remain_on_latest_timeline(
            &catalog,
            "early",
            date("2015-07-01"),
            date("2015-08-01"),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }
}
