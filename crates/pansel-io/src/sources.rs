//! Data-source abstractions over the raw importers.
//!
//! Callers depend on [`CatalogSource`] and [`DemandSource`] so the
//! engine never knows where its tables came from. The CSV
//! implementations here are the only ones shipped today.

use crate::importers;
use pansel_core::{Catalog, DemandSet, PanselResult};
use std::path::PathBuf;

/// Anything that can produce a full catalog snapshot.
pub trait CatalogSource {
    fn load_catalog(&self) -> PanselResult<Catalog>;
}

/// Anything that can produce the per-panel demand set.
pub trait DemandSource {
    fn load_demand(&self) -> PanselResult<DemandSet>;
}

/// Catalog assembled from up to four CSV files, one per hardware tier.
/// Absent files leave their tier empty rather than failing the load.
#[derive(Debug, Clone, Default)]
pub struct CsvCatalogSource {
    pub controllers: Option<PathBuf>,
    pub servers: Option<PathBuf>,
    pub modules: Option<PathBuf>,
    pub accessories: Option<PathBuf>,
    /// Name substring marking the primary server when the server sheet
    /// has no `Role` column.
    pub primary_marker: String,
}

impl CsvCatalogSource {
    pub fn new() -> Self {
        Self {
            primary_marker: "AS-P".to_string(),
            ..Default::default()
        }
    }

    pub fn with_controllers(mut self, path: impl Into<PathBuf>) -> Self {
        self.controllers = Some(path.into());
        self
    }

    pub fn with_servers(mut self, path: impl Into<PathBuf>) -> Self {
        self.servers = Some(path.into());
        self
    }

    pub fn with_modules(mut self, path: impl Into<PathBuf>) -> Self {
        self.modules = Some(path.into());
        self
    }

    pub fn with_accessories(mut self, path: impl Into<PathBuf>) -> Self {
        self.accessories = Some(path.into());
        self
    }

    pub fn with_primary_marker(mut self, marker: impl Into<String>) -> Self {
        self.primary_marker = marker.into();
        self
    }
}

impl CatalogSource for CsvCatalogSource {
    fn load_catalog(&self) -> PanselResult<Catalog> {
        let mut catalog = Catalog::default();
        if let Some(path) = &self.controllers {
            catalog.controllers = importers::read_components(path)?;
        }
        if let Some(path) = &self.servers {
            let (primary, standalone) = importers::read_servers(path, &self.primary_marker)?;
            catalog.primary_server = primary;
            catalog.standalone_servers = standalone;
        }
        if let Some(path) = &self.modules {
            catalog.modules = importers::read_components(path)?;
        }
        if let Some(path) = &self.accessories {
            catalog.accessories = importers::read_accessory_rules(path)?;
        }
        Ok(catalog)
    }
}

/// Demand set read from a single panels CSV.
#[derive(Debug, Clone)]
pub struct CsvDemandSource {
    pub panels: PathBuf,
}

impl CsvDemandSource {
    pub fn new(panels: impl Into<PathBuf>) -> Self {
        Self {
            panels: panels.into(),
        }
    }
}

impl DemandSource for CsvDemandSource {
    fn load_demand(&self) -> PanselResult<DemandSet> {
        Ok(DemandSet::new(importers::read_panels(&self.panels)?))
    }
}
