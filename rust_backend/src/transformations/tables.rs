use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

use crate::core::{EnvironmentStateSample, ReleaseCatalog, ScheduleStep, SimulationResult};

/// Days between 0001-01-01 and 1970-01-01, the offset of Polars `Date`.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn date_column(name: &str, dates: impl Iterator<Item = NaiveDate>) -> SimulationResult<Column> {
    let days: Vec<i32> = dates
        .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        .collect();
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(Column::from(series))
}

/// One row per sample: `environment_id, at_date, version, release_date,
/// end_of_support_date, release_age, days_until_end_of_support`.
pub fn timeline_to_dataframe(samples: &[EnvironmentStateSample]) -> SimulationResult<DataFrame> {
    let environment_ids: Vec<&str> = samples.iter().map(|s| s.environment_id.as_str()).collect();
    let versions: Vec<String> = samples.iter().map(|s| s.version.to_string()).collect();
    let ages: Vec<i64> = samples.iter().map(|s| s.release_age).collect();
    let days_left: Vec<Option<i64>> = samples.iter().map(|s| s.days_until_end_of_support).collect();

    let df = DataFrame::new(vec![
        Column::new("environment_id".into(), environment_ids),
        date_column("at_date", samples.iter().map(|s| s.at_date))?,
        Column::new("version".into(), versions),
        date_column("release_date", samples.iter().map(|s| s.release_date))?,
        date_column(
            "end_of_support_date",
            samples.iter().map(|s| s.end_of_support_date),
        )?,
        Column::new("release_age".into(), ages),
        Column::new("days_until_end_of_support".into(), days_left),
    ])?;
    Ok(df)
}

/// One row per schedule step: `phase, step, start_date, finish_date`.
pub fn schedule_to_dataframe(steps: &[ScheduleStep]) -> SimulationResult<DataFrame> {
    let phases: Vec<&str> = steps.iter().map(|s| s.phase.as_str()).collect();
    let labels: Vec<&str> = steps.iter().map(|s| s.step.as_str()).collect();

    let df = DataFrame::new(vec![
        Column::new("phase".into(), phases),
        Column::new("step".into(), labels),
        date_column("start_date", steps.iter().map(|s| s.start_date))?,
        date_column("finish_date", steps.iter().map(|s| s.finish_date))?,
    ])?;
    Ok(df)
}

/// The catalog as `version, release_date, end_of_support_date`.
pub fn catalog_to_dataframe(catalog: &ReleaseCatalog) -> SimulationResult<DataFrame> {
    let versions: Vec<String> = catalog.iter().map(|r| r.version.to_string()).collect();

    let df = DataFrame::new(vec![
        Column::new("version".into(), versions),
        date_column("release_date", catalog.iter().map(|r| r.release_date))?,
        date_column(
            "end_of_support_date",
            catalog.iter().map(|r| r.end_of_support_date),
        )?,
    ])?;
    Ok(df)
}

/// Samples whose version differs from the previous sample of the same
/// environment. The first sample of every environment is included.
pub fn version_changes(samples: &[EnvironmentStateSample]) -> Vec<EnvironmentStateSample> {
    let mut changes = Vec::new();
    let mut previous: Option<&EnvironmentStateSample> = None;
    for sample in samples {
        let changed = previous.map_or(true, |p| {
            p.environment_id != sample.environment_id || p.version != sample.version
        });
        if changed {
            changes.push(sample.clone());
        }
        previous = Some(sample);
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ReleaseVersion, Step};
    use crate::io::CatalogLoader;
    use crate::services::{compute_fixed_cadence_timeline, compute_remain_on_latest_timeline};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn v(s: &str) -> ReleaseVersion {
        s.parse().unwrap()
    }

    fn column_names(df: &DataFrame) -> Vec<&str> {
        df.get_column_names().into_iter().map(|n| n.as_str()).collect()
    }

    #[test]
    fn test_timeline_to_dataframe() {
        let catalog = CatalogLoader::load_default().unwrap();
        let samples =
            compute_remain_on_latest_timeline(&catalog, "latest", date("2018-01-01"), date("2018-01-31"))
                .unwrap();
        let df = timeline_to_dataframe(&samples).unwrap();

        assert_eq!(df.height(), 31);
        assert_eq!(
            column_names(&df),
            vec![
                "environment_id",
                "at_date",
                "version",
                "release_date",
                "end_of_support_date",
                "release_age",
                "days_until_end_of_support",
            ]
        );
        assert_eq!(df.column("at_date").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("release_age").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_schedule_to_dataframe() {
        let steps = vec![
            ScheduleStep::new("Global", Step::Ignoring, date("2020-01-01"), date("2020-01-15")),
            ScheduleStep::new("G: a", Step::PreWork, date("2020-01-15"), date("2020-01-16")),
        ];
        let df = schedule_to_dataframe(&steps).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(
            column_names(&df),
            vec!["phase", "step", "start_date", "finish_date"]
        );
        assert_eq!(df.column("finish_date").unwrap().dtype(), &DataType::Date);
        let labels = df.column("step").unwrap().str().unwrap();
        assert_eq!(labels.get(1), Some("pre-work"));
    }

    #[test]
    fn test_empty_schedule_is_empty_frame() {
        let df = schedule_to_dataframe(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 4);
    }

    #[test]
    fn test_catalog_to_dataframe() {
        let catalog = CatalogLoader::load_default().unwrap();
        let df = catalog_to_dataframe(&catalog).unwrap();
        assert_eq!(df.height(), catalog.len());
        let versions = df.column("version").unwrap().str().unwrap();
        assert_eq!(versions.get(0), Some("1.0.0"));
    }

    #[test]
    fn test_version_changes_per_environment() {
        let catalog = CatalogLoader::load_default().unwrap();
        let mut samples = compute_fixed_cadence_timeline(
            &catalog,
            "a",
            date("2018-01-01"),
            date("2018-03-15"),
            &v("1.7.0"),
            30,
        )
        .unwrap();
        samples.extend(
            compute_fixed_cadence_timeline(
                &catalog,
                "b",
                date("2018-01-01"),
                date("2018-03-15"),
                &v("1.7.0"),
                30,
            )
            .unwrap(),
        );

        let changes = version_changes(&samples);
        assert_eq!(changes.len(), 6);
        assert_eq!(changes[3].environment_id, "b");
        assert_eq!(changes[3].version, v("1.7.0"));
        assert_eq!(changes[1].at_date, date("2018-01-31"));
    }
}
