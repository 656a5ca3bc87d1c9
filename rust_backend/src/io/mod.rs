//! High-level release catalog loading.
//!
//! This module combines the catalog parsers with catalog validation. Loaders
//! handle format detection and error context, and produce a ready-to-use
//! [`ReleaseCatalog`](crate::core::ReleaseCatalog).
//!
//! # Example
//!
//! ```no_run
//! use escalator_rust::io::loaders::CatalogLoader;
//! use std::path::Path;
//!
//! let catalog = CatalogLoader::load_from_file(Path::new("k8s-releases.csv"))
//!     .expect("Failed to load");
//! println!("Loaded {} releases", catalog.len());
//! ```

pub mod loaders;


pub use loaders::{CatalogLoader, CatalogSourceType};
