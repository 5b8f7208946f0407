//! Catalogue store with atomic snapshot reads and explicit reload
//!
//! The store keeps the loaded catalogue behind an `ArcSwap` so per-turn reads
//! never contend with a reload. A failed reload keeps the previous snapshot.

use crate::catalog::types::EndpointDescriptor;
use crate::error::{GatewayError, Result};
use arc_swap::ArcSwap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// On-disk catalogue file shape, as produced by the offline build pipeline
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    apis: Vec<EndpointDescriptor>,
    #[serde(default)]
    portfolio_names: Vec<String>,
    #[serde(default)]
    benchmark_names: Vec<String>,
}

/// One immutable catalogue snapshot
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    endpoints: Vec<EndpointDescriptor>,
    portfolio_names: Vec<String>,
    benchmark_names: Vec<String>,
}

impl Catalog {
    /// Build a catalogue snapshot from already-validated parts
    pub fn new(
        endpoints: Vec<EndpointDescriptor>,
        portfolio_names: Vec<String>,
        benchmark_names: Vec<String>,
    ) -> Self {
        Self {
            endpoints,
            portfolio_names,
            benchmark_names,
        }
    }

    /// All endpoint descriptors, in catalogue (file) order
    pub fn endpoints(&self) -> &[EndpointDescriptor] {
        &self.endpoints
    }

    /// Look up an endpoint descriptor by name
    pub fn endpoint(&self, name: &str) -> Option<&EndpointDescriptor> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// Reference names for an entity category ("portfolios", "benchmarks")
    pub fn reference_names(&self, category: &str) -> &[String] {
        match category {
            "portfolios" => &self.portfolio_names,
            "benchmarks" => &self.benchmark_names,
            _ => &[],
        }
    }
}

/// Catalogue store holding the current snapshot
pub struct CatalogStore {
    snapshot: ArcSwap<Catalog>,
    path: PathBuf,
}

impl CatalogStore {
    /// Load the catalogue from a JSON file; failure here is startup-fatal
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let catalog = Self::read_catalog(&path)?;
        info!(
            "Loaded catalogue from {}: {} endpoints, {} portfolios, {} benchmarks",
            path.display(),
            catalog.endpoints.len(),
            catalog.portfolio_names.len(),
            catalog.benchmark_names.len()
        );
        Ok(Self {
            snapshot: ArcSwap::from_pointee(catalog),
            path,
        })
    }

    /// Explicitly reload the catalogue file, swapping in the new snapshot.
    /// On failure the previous snapshot stays in place.
    pub fn reload(&self) -> Result<()> {
        match Self::read_catalog(&self.path) {
            Ok(catalog) => {
                info!(
                    "Reloaded catalogue from {}: {} endpoints",
                    self.path.display(),
                    catalog.endpoints.len()
                );
                self.snapshot.store(Arc::new(catalog));
                Ok(())
            }
            Err(e) => {
                warn!("Catalogue reload failed, keeping previous snapshot: {}", e);
                Err(e)
            }
        }
    }

    /// Get the current catalogue snapshot
    pub fn current(&self) -> Arc<Catalog> {
        self.snapshot.load_full()
    }

    fn read_catalog(path: &Path) -> Result<Catalog> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::catalog(format!(
                "Failed to read catalogue file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let file: CatalogFile = serde_json::from_str(&content).map_err(|e| {
            GatewayError::catalog(format!(
                "Failed to parse catalogue file '{}': {}",
                path.display(),
                e
            ))
        })?;

        for endpoint in &file.apis {
            endpoint.validate()?;
        }

        Ok(Catalog {
            endpoints: file.apis,
            portfolio_names: file.portfolio_names,
            benchmark_names: file.benchmark_names,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom, Write};

    fn write_catalog(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_lookup() {
        let file = write_catalog(
            r#"{
                "apis": [
                    {"name": "sharpe_ratio", "route": "/analytics/sharpe", "method": "POST"},
                    {"name": "max_drawdown", "route": "/analytics/drawdown", "method": "GET"}
                ],
                "portfolio_names": ["Growth Fund", "Income Fund"],
                "benchmark_names": ["S&P 500"]
            }"#,
        );

        let store = CatalogStore::load(file.path()).unwrap();
        let catalog = store.current();
        assert_eq!(catalog.endpoints().len(), 2);
        assert!(catalog.endpoint("sharpe_ratio").is_some());
        assert!(catalog.endpoint("nonexistent").is_none());
        assert_eq!(catalog.reference_names("portfolios").len(), 2);
        assert_eq!(catalog.reference_names("benchmarks"), ["S&P 500"]);
        assert!(catalog.reference_names("currencies").is_empty());
    }

    #[test]
    fn test_load_rejects_invalid_descriptor() {
        let file = write_catalog(r#"{"apis": [{"name": "", "route": "/x"}]}"#);
        assert!(CatalogStore::load(file.path()).is_err());
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let mut file = write_catalog(
            r#"{"apis": [{"name": "sharpe_ratio", "route": "/analytics/sharpe"}]}"#,
        );

        let store = CatalogStore::load(file.path()).unwrap();
        assert_eq!(store.current().endpoints().len(), 1);

        file.as_file_mut().set_len(0).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        file.write_all(b"not json").unwrap();
        file.flush().unwrap();

        assert!(store.reload().is_err());
        assert_eq!(store.current().endpoints().len(), 1);
    }
}
