//! Catalog loading with a time-boxed in-memory cache.
//!
//! A `catalog.json` file in the data directory overrides the built-in sample
//! set; load failures fall back to the samples so the app always has data.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::model::Catalog;
use super::sample::sample_catalog;

const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

pub struct CatalogSource {
    override_path: PathBuf,
    cached: Option<(Instant, Arc<Catalog>)>,
}

impl CatalogSource {
    pub fn new(data_dir: &std::path::Path) -> Self {
        Self {
            override_path: data_dir.join("catalog.json"),
            cached: None,
        }
    }

    /// Return the current catalog, re-reading the override file only after
    /// the cache TTL has elapsed.
    pub fn load(&mut self) -> Arc<Catalog> {
        if let Some((at, catalog)) = &self.cached {
            if at.elapsed() < CACHE_TTL {
                return catalog.clone();
            }
        }
        let catalog = Arc::new(self.fetch());
        self.cached = Some((Instant::now(), catalog.clone()));
        catalog
    }

    /// Drop the cache so the next [`CatalogSource::load`] re-reads the file.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    fn fetch(&self) -> Catalog {
        match std::fs::read_to_string(&self.override_path) {
            Ok(text) => match serde_json::from_str::<Catalog>(&text) {
                Ok(catalog) => {
                    tracing::info!(
                        path = %self.override_path.display(),
                        tracks = catalog.tracks.len(),
                        "loaded catalog override"
                    );
                    catalog
                }
                Err(e) => {
                    tracing::warn!(
                        path = %self.override_path.display(),
                        error = %e,
                        "catalog override unreadable, using sample data"
                    );
                    sample_catalog()
                }
            },
            // Missing file is the normal case.
            Err(_) => sample_catalog(),
        }
    }
}
