//! Catalog records: purchasable hardware and accessory rules.
//!
//! Every point-count field defaults to zero at construction time, so a
//! spec loaded from a sparse source never carries "missing" counts into
//! the sizing math.

use serde::{Deserialize, Serialize};

/// One purchasable catalog item: a controller, an automation server, or
/// an expansion I/O module.
///
/// Point counts follow the industry taxonomy: `digital_in`/`digital_out`/
/// `analog_in`/`analog_out` are fixed-type points, `universal_in`/
/// `universal_out` can serve digital or analog on their fixed direction,
/// and `universal_io` points can serve any of the four demand types.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    pub part_number: String,
    pub cost: f64,
    #[serde(default)]
    pub digital_in: u32,
    #[serde(default)]
    pub digital_out: u32,
    #[serde(default)]
    pub analog_in: u32,
    #[serde(default)]
    pub analog_out: u32,
    #[serde(default)]
    pub universal_in: u32,
    #[serde(default)]
    pub universal_out: u32,
    #[serde(default)]
    pub universal_io: u32,
}

impl ComponentSpec {
    /// Every point the unit can offer, regardless of type.
    pub fn total_points(&self) -> u32 {
        self.digital_in
            + self.digital_out
            + self.analog_in
            + self.analog_out
            + self.universal_in
            + self.universal_out
            + self.universal_io
    }

    /// Maximum points the unit could dedicate to inputs.
    pub fn max_inputs(&self) -> u32 {
        self.digital_in + self.analog_in + self.universal_in + self.universal_io
    }

    /// Maximum points the unit could dedicate to outputs.
    pub fn max_outputs(&self) -> u32 {
        self.digital_out + self.analog_out + self.universal_out + self.universal_io
    }

    /// Whether the unit offers any capacity usable as analog input.
    pub fn offers_analog_in(&self) -> bool {
        self.analog_in > 0 || self.universal_in > 0 || self.universal_io > 0
    }
}

/// Role of a server catalog entry in the alternative evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerRole {
    /// The designated head unit of a modular build; sized together with
    /// expansion modules.
    Primary,
    /// Fixed-capacity unit evaluated standalone at quantity 1.
    Standalone,
}

impl std::fmt::Display for ServerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerRole::Primary => write!(f, "primary"),
            ServerRole::Standalone => write!(f, "standalone"),
        }
    }
}

impl std::str::FromStr for ServerRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(ServerRole::Primary),
            "standalone" => Ok(ServerRole::Standalone),
            other => Err(format!(
                "unknown server role '{other}'; expected 'primary' or 'standalone'"
            )),
        }
    }
}

/// Mandatory-accessory rule: each unit of the parent part pulls in one
/// unit-set of the accessory. Rules may chain, so an accessory can be a
/// parent of further accessories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryRule {
    pub parent_part_number: String,
    pub accessory_part_number: String,
    pub accessory_name: String,
    pub accessory_cost: f64,
}

/// Read-only catalog snapshot for one sizing request or batch.
///
/// Callers hold their own snapshot; nothing here is shared mutable state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Discrete controllers sized for standard panels.
    pub controllers: Vec<ComponentSpec>,
    /// The designated primary server for modular builds, if any.
    pub primary_server: Option<ComponentSpec>,
    /// Fixed-capacity standalone server units.
    pub standalone_servers: Vec<ComponentSpec>,
    /// Expansion I/O modules sized alongside the primary server.
    pub modules: Vec<ComponentSpec>,
    /// Mandatory accessory rules keyed by parent part number.
    pub accessories: Vec<AccessoryRule>,
}

impl Catalog {
    /// Look a component up by display name across every hardware tier.
    ///
    /// Used when joining solved quantities back against part numbers and
    /// unit costs for the BOQ.
    pub fn find_by_name(&self, name: &str) -> Option<&ComponentSpec> {
        self.controllers
            .iter()
            .chain(self.primary_server.iter())
            .chain(self.standalone_servers.iter())
            .chain(self.modules.iter())
            .find(|c| c.name == name)
    }
}
