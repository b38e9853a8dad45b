//! CSV importers for catalog and demand tables.
//!
//! Column names follow the established catalog sheet layout (`Name`,
//! `PartNumber`, `Cost`, `DI`, `DO`, `AI`, `AO`, `UI`, `UO`, `UIO`).
//! Missing numeric columns and empty cells default to zero at load
//! time; names and part numbers are trimmed of surrounding whitespace
//! before they enter the typed records.

use pansel_core::{AccessoryRule, ComponentSpec, PanelRequirement, PanselError, ServerRole};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors raised while importing tabular data.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read '{path}': {message}")]
    Read { path: String, message: String },

    #[error("malformed row in '{path}': {message}")]
    Row { path: String, message: String },

    #[error("{0}")]
    Data(String),
}

impl From<ImportError> for PanselError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Read { .. } | ImportError::Row { .. } => {
                PanselError::Parse(err.to_string())
            }
            ImportError::Data(message) => PanselError::Data(message),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ComponentRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "PartNumber")]
    part_number: String,
    #[serde(rename = "Cost", default)]
    cost: Option<f64>,
    #[serde(rename = "DI", default)]
    digital_in: Option<u32>,
    #[serde(rename = "DO", default)]
    digital_out: Option<u32>,
    #[serde(rename = "AI", default)]
    analog_in: Option<u32>,
    #[serde(rename = "AO", default)]
    analog_out: Option<u32>,
    #[serde(rename = "UI", default)]
    universal_in: Option<u32>,
    #[serde(rename = "UO", default)]
    universal_out: Option<u32>,
    #[serde(rename = "UIO", default)]
    universal_io: Option<u32>,
    #[serde(rename = "Role", default)]
    role: Option<String>,
}

impl ComponentRow {
    fn into_spec(self, path: &Path) -> Result<ComponentSpec, ImportError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ImportError::Row {
                path: path.display().to_string(),
                message: "component row with empty Name".into(),
            });
        }
        let cost = self.cost.unwrap_or(0.0);
        if !cost.is_finite() || cost < 0.0 {
            return Err(ImportError::Row {
                path: path.display().to_string(),
                message: format!("component '{name}' has invalid cost {cost}"),
            });
        }
        Ok(ComponentSpec {
            name,
            part_number: self.part_number.trim().to_string(),
            cost,
            digital_in: self.digital_in.unwrap_or(0),
            digital_out: self.digital_out.unwrap_or(0),
            analog_in: self.analog_in.unwrap_or(0),
            analog_out: self.analog_out.unwrap_or(0),
            universal_in: self.universal_in.unwrap_or(0),
            universal_out: self.universal_out.unwrap_or(0),
            universal_io: self.universal_io.unwrap_or(0),
        })
    }
}

#[derive(Debug, Deserialize)]
struct PanelRow {
    #[serde(rename = "PanelName")]
    panel_name: String,
    #[serde(rename = "DI", default)]
    digital_in: Option<u32>,
    #[serde(rename = "DO", default)]
    digital_out: Option<u32>,
    #[serde(rename = "AI", default)]
    analog_in: Option<u32>,
    #[serde(rename = "AO", default)]
    analog_out: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct AccessoryRow {
    #[serde(rename = "ParentPartNumber")]
    parent_part_number: String,
    #[serde(rename = "AccessoryPartNumber")]
    accessory_part_number: String,
    #[serde(rename = "AccessoryName")]
    accessory_name: String,
    #[serde(rename = "AccessoryCost", default)]
    accessory_cost: Option<f64>,
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, ImportError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| ImportError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

fn row_error(path: &Path, e: impl std::fmt::Display) -> ImportError {
    ImportError::Row {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Read one tier of component specs (controllers or modules).
pub fn read_components(path: &Path) -> Result<Vec<ComponentSpec>, ImportError> {
    let mut reader = open_reader(path)?;
    let mut components = Vec::new();
    for result in reader.deserialize() {
        let row: ComponentRow = result.map_err(|e| row_error(path, e))?;
        components.push(row.into_spec(path)?);
    }
    Ok(components)
}

/// Read the server catalog, separating the primary server from the
/// standalone units.
///
/// Roles come from the optional `Role` column; rows without one fall
/// back to a name-substring match against `primary_marker`. Exactly one
/// primary server may be designated.
pub fn read_servers(
    path: &Path,
    primary_marker: &str,
) -> Result<(Option<ComponentSpec>, Vec<ComponentSpec>), ImportError> {
    let mut reader = open_reader(path)?;
    let mut primary: Option<ComponentSpec> = None;
    let mut standalone = Vec::new();

    for result in reader.deserialize() {
        let row: ComponentRow = result.map_err(|e| row_error(path, e))?;
        let role = match row.role.as_deref().filter(|r| !r.trim().is_empty()) {
            Some(raw) => raw
                .parse::<ServerRole>()
                .map_err(|message| row_error(path, message))?,
            None if row.name.contains(primary_marker) => ServerRole::Primary,
            None => ServerRole::Standalone,
        };
        let spec = row.into_spec(path)?;
        match role {
            ServerRole::Primary => {
                if let Some(existing) = &primary {
                    return Err(ImportError::Data(format!(
                        "multiple primary servers in '{}': '{}' and '{}'",
                        path.display(),
                        existing.name,
                        spec.name
                    )));
                }
                primary = Some(spec);
            }
            ServerRole::Standalone => standalone.push(spec),
        }
    }
    Ok((primary, standalone))
}

/// Read per-panel point demand.
pub fn read_panels(path: &Path) -> Result<Vec<PanelRequirement>, ImportError> {
    let mut reader = open_reader(path)?;
    let mut panels = Vec::new();
    for result in reader.deserialize() {
        let row: PanelRow = result.map_err(|e| row_error(path, e))?;
        let panel_name = row.panel_name.trim().to_string();
        if panel_name.is_empty() {
            return Err(ImportError::Row {
                path: path.display().to_string(),
                message: "panel row with empty PanelName".into(),
            });
        }
        panels.push(PanelRequirement {
            panel_name,
            digital_in: row.digital_in.unwrap_or(0),
            digital_out: row.digital_out.unwrap_or(0),
            analog_in: row.analog_in.unwrap_or(0),
            analog_out: row.analog_out.unwrap_or(0),
        });
    }
    Ok(panels)
}

/// Read the mandatory-accessory rules.
pub fn read_accessory_rules(path: &Path) -> Result<Vec<AccessoryRule>, ImportError> {
    let mut reader = open_reader(path)?;
    let mut rules = Vec::new();
    for result in reader.deserialize() {
        let row: AccessoryRow = result.map_err(|e| row_error(path, e))?;
        rules.push(AccessoryRule {
            parent_part_number: row.parent_part_number.trim().to_string(),
            accessory_part_number: row.accessory_part_number.trim().to_string(),
            accessory_name: row.accessory_name.trim().to_string(),
            accessory_cost: row.accessory_cost.unwrap_or(0.0),
        });
    }
    Ok(rules)
}
