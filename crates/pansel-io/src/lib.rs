//! # pansel-io: table import for catalogs and panel demand
//!
//! Loads the hardware catalog (controllers, servers, expansion modules,
//! accessory rules) and per-panel point demand from CSV files into the
//! typed records of `pansel-core`. All validation that belongs to the
//! data itself happens here, so the sizing engine only ever sees clean
//! snapshots.

pub mod importers;
pub mod sources;

pub use importers::{
    read_accessory_rules, read_components, read_panels, read_servers, ImportError,
};
pub use sources::{CatalogSource, CsvCatalogSource, CsvDemandSource, DemandSource};
