//! # pansel-core: Catalog & Demand Model
//!
//! Typed records shared by the pansel sizing pipeline: hardware catalog
//! specs, per-panel point demand, accessory rules, and the solution and
//! bill-of-quantities types produced by the algorithms.
//!
//! This crate carries no algorithmic logic. Everything here is an
//! immutable snapshot for the duration of a request or batch: loaders
//! construct the records once, the algorithms only read them.

pub mod catalog;
pub mod demand;
pub mod error;
pub mod parts;

pub use catalog::{AccessoryRule, Catalog, ComponentSpec, ServerRole};
pub use demand::{DemandSet, PanelRequirement, PointDemand, SparePolicy};
pub use error::{PanselError, PanselResult};
pub use parts::{BoqLine, OptionKind, PanelOption, PartLine, SizingSolution, GRAND_TOTAL, NO_SOLUTION};
