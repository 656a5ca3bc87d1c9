use log::info;
use once_cell::sync::OnceCell;
use std::path::Path;

use crate::core::{Release, ReleaseCatalog, SimulationError, SimulationResult};
use crate::parsing::{csv_parser, json_parser};

/// Kubernetes release catalog bundled with the crate
pub const KUBERNETES_RELEASES_CSV: &str = include_str!("../../data/k8s-releases.csv");

static KUBERNETES_CATALOG: OnceCell<ReleaseCatalog> = OnceCell::new();

/// Represents the source format of catalog data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSourceType {
    Json,
    Csv,
}

impl CatalogSourceType {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> SimulationResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                SimulationError::DataError(format!("File has no extension: {}", path.display()))
            })?;

        match extension.to_lowercase().as_str() {
            "json" => Ok(CatalogSourceType::Json),
            "csv" => Ok(CatalogSourceType::Csv),
            other => Err(SimulationError::DataError(format!(
                "Unsupported catalog format: {}",
                other
            ))),
        }
    }
}

/// Unified interface for loading a release catalog
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load the bundled Kubernetes release catalog
    pub fn load_default() -> SimulationResult<ReleaseCatalog> {
        Self::load_from_csv_str(KUBERNETES_RELEASES_CSV)
    }

    /// Shared Kubernetes catalog, parsed on first use and read-only afterwards
    pub fn kubernetes_releases() -> SimulationResult<&'static ReleaseCatalog> {
        KUBERNETES_CATALOG.get_or_try_init(Self::load_default)
    }

    /// Load a catalog from a file (auto-detects JSON or CSV)
    pub fn load_from_file(path: &Path) -> SimulationResult<ReleaseCatalog> {
        let releases = match CatalogSourceType::from_path(path)? {
            CatalogSourceType::Csv => csv_parser::parse_catalog_csv(path)?,
            CatalogSourceType::Json => json_parser::parse_catalog_json(path)?,
        };
        Self::build(releases, &path.display().to_string())
    }

    /// Load a catalog from CSV content
    pub fn load_from_csv_str(csv: &str) -> SimulationResult<ReleaseCatalog> {
        let releases = csv_parser::parse_catalog_csv_str(csv)?;
        Self::build(releases, "csv string")
    }

    /// Load a catalog from JSON content
    pub fn load_from_json_str(json: &str) -> SimulationResult<ReleaseCatalog> {
        let releases = json_parser::parse_catalog_json_str(json)?;
        Self::build(releases, "json string")
    }

    fn build(releases: Vec<Release>, source: &str) -> SimulationResult<ReleaseCatalog> {
        let catalog = ReleaseCatalog::new(releases)?;
        info!(
            "Loaded release catalog from {}: {} releases ({} to {})",
            source,
            catalog.len(),
            catalog.first().version,
            catalog.latest().version
        );
        Ok(catalog)
    }
}
