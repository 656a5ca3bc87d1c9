//! Integration tests for the release-timeline model over the bundled
//! Kubernetes catalog and user-supplied catalogs.

use anyhow::Result;
use chrono::NaiveDate;
use escalator_rust::core::ReleaseVersion;
use escalator_rust::io::CatalogLoader;
use escalator_rust::services::{
    compute_fixed_cadence_timeline, compute_fleet_timelines, compute_remain_on_latest_timeline,
    predict_version_with_support_window, supported_release_counts, FleetMember,
};
use escalator_rust::transformations::{timeline_to_dataframe, version_changes};
use std::io::Write;
use tempfile::Builder;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn v(s: &str) -> ReleaseVersion {
    s.parse().unwrap()
}

#[test]
fn test_cadence_strategies_side_by_side() -> Result<()> {
    let catalog = CatalogLoader::kubernetes_releases()?;
    let members = vec![
        FleetMember::remain_on_latest("remain-on-latest"),
        FleetMember::fixed_cadence("upgrade-every-30-days", v("1.7.0"), 30),
        FleetMember::fixed_cadence("upgrade-every-90-days", v("1.9.0"), 90),
    ];

    let samples = compute_fleet_timelines(catalog, &members, date("2018-01-01"), date("2019-01-01"))?;
    assert_eq!(samples.len(), 3 * 366);

    let df = timeline_to_dataframe(&samples)?;
    assert_eq!(df.height(), samples.len());

    // The always-latest environment is never older than any other one.
    for day in 0..366 {
        let latest = &samples[day];
        assert!(latest.release_age <= samples[366 + day].release_age);
        assert!(latest.release_age <= samples[2 * 366 + day].release_age);
    }
    Ok(())
}

#[test]
fn test_thirty_day_cadence_upgrade_markers() -> Result<()> {
    let catalog = CatalogLoader::kubernetes_releases()?;
    let samples = compute_fixed_cadence_timeline(
        catalog,
        "upgrade-every-30-days",
        date("2018-01-01"),
        date("2018-03-15"),
        &v("1.7.0"),
        30,
    )?;

    let markers: Vec<(NaiveDate, String, i64)> = version_changes(&samples)
        .into_iter()
        .map(|s| (s.at_date, s.version.to_string(), s.release_age))
        .collect();
    assert_eq!(
        markers,
        vec![
            (date("2018-01-01"), "1.7.0".to_string(), 185),
            (date("2018-01-31"), "1.8.0".to_string(), 124),
            (date("2018-03-02"), "1.9.0".to_string(), 77),
        ]
    );
    Ok(())
}

#[test]
fn test_out_of_support_shows_negative_days() -> Result<()> {
    let catalog = CatalogLoader::kubernetes_releases()?;
    let samples = compute_fixed_cadence_timeline(
        catalog,
        "slow",
        date("2018-01-01"),
        date("2018-12-31"),
        &v("1.7.0"),
        365,
    )?;

    let last = samples.last().unwrap();
    assert_eq!(last.version, v("1.7.0"));
    assert!(last.is_out_of_support());
    assert!(last.days_until_end_of_support.unwrap() < 0);
    Ok(())
}

#[test]
fn test_prediction_and_supported_counts_agree() -> Result<()> {
    let catalog = CatalogLoader::kubernetes_releases()?;
    let counts = supported_release_counts(catalog, date("2019-01-01"), date("2019-12-31"))?;
    assert_eq!(counts.len(), 365);

    for (day, count) in counts {
        let prediction = predict_version_with_support_window(catalog, day)?;
        assert!(count >= 1, "no supported release on {}", day);
        assert!(prediction.days_until_end_of_support.unwrap() > 0);
    }
    Ok(())
}

#[test]
fn test_custom_csv_catalog() -> Result<()> {
    let mut file = Builder::new().suffix(".csv").tempfile()?;
    writeln!(file, "version,release_date,end_of_support_date")?;
    writeln!(file, "2.0.0,2022-01-01,2022-12-31")?;
    writeln!(file, "2.1.0,2022-04-01,2023-03-31")?;
    writeln!(file, "2.2.0,2022-07-01,2023-06-30")?;
    file.flush()?;

    let catalog = CatalogLoader::load_from_file(file.path())?;
    let samples =
        compute_remain_on_latest_timeline(&catalog, "custom", date("2022-01-01"), date("2022-12-31"))?;

    let versions: Vec<String> = version_changes(&samples)
        .iter()
        .map(|s| s.version.to_string())
        .collect();
    assert_eq!(versions, vec!["2.0.0", "2.1.0", "2.2.0"]);
    Ok(())
}
