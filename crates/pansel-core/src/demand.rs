//! Panel demand records and the spare-margin policy.

use crate::{PanselError, PanselResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw point demand for one control panel. Loaded per batch, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelRequirement {
    pub panel_name: String,
    #[serde(default)]
    pub digital_in: u32,
    #[serde(default)]
    pub digital_out: u32,
    #[serde(default)]
    pub analog_in: u32,
    #[serde(default)]
    pub analog_out: u32,
}

impl PanelRequirement {
    pub fn is_zero(&self) -> bool {
        self.digital_in == 0 && self.digital_out == 0 && self.analog_in == 0 && self.analog_out == 0
    }
}

/// Uniform safety margin applied to raw demand before sizing.
///
/// The margin multiplies each raw point count and the result is rounded
/// up to the next whole point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SparePolicy {
    /// Spare percentage, e.g. 20.0 for a 20% margin. Never negative.
    pub percent: f64,
}

impl Default for SparePolicy {
    fn default() -> Self {
        Self { percent: 20.0 }
    }
}

impl SparePolicy {
    pub fn new(percent: f64) -> PanselResult<Self> {
        if !percent.is_finite() || percent < 0.0 {
            return Err(PanselError::Config(format!(
                "spare percentage must be a non-negative number, got {percent}"
            )));
        }
        Ok(Self { percent })
    }

    /// No spare margin at all.
    pub fn none() -> Self {
        Self { percent: 0.0 }
    }

    /// Raw demand with the margin applied, rounded up.
    pub fn apply(&self, raw: u32) -> u32 {
        (f64::from(raw) * (1.0 + self.percent / 100.0)).ceil() as u32
    }
}

/// Spare-adjusted demand, one count per point type. This is what the
/// formulation actually has to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointDemand {
    pub digital_in: u32,
    pub digital_out: u32,
    pub analog_in: u32,
    pub analog_out: u32,
}

impl PointDemand {
    /// Apply a spare policy to a raw panel requirement.
    pub fn required(req: &PanelRequirement, spare: SparePolicy) -> Self {
        Self {
            digital_in: spare.apply(req.digital_in),
            digital_out: spare.apply(req.digital_out),
            analog_in: spare.apply(req.analog_in),
            analog_out: spare.apply(req.analog_out),
        }
    }

    pub fn inputs(&self) -> u32 {
        self.digital_in + self.analog_in
    }

    pub fn outputs(&self) -> u32 {
        self.digital_out + self.analog_out
    }

    pub fn total(&self) -> u32 {
        self.inputs() + self.outputs()
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }
}

/// Panel requirements for one batch, keyed by panel name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemandSet {
    panels: BTreeMap<String, PanelRequirement>,
}

impl DemandSet {
    pub fn new(panels: Vec<PanelRequirement>) -> Self {
        Self {
            panels: panels
                .into_iter()
                .map(|p| (p.panel_name.clone(), p))
                .collect(),
        }
    }

    /// Resolve a panel by name. Unknown names are a data error, surfaced
    /// to the caller for that request only.
    pub fn get(&self, panel_name: &str) -> PanselResult<&PanelRequirement> {
        self.panels
            .get(panel_name)
            .ok_or_else(|| PanselError::Data(format!("unknown panel '{panel_name}'")))
    }

    pub fn panel_names(&self) -> impl Iterator<Item = &str> {
        self.panels.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PanelRequirement> {
        self.panels.values()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spare_rounds_up() {
        let spare = SparePolicy::default();
        // 10 * 1.2 = 12 exactly
        assert_eq!(spare.apply(10), 12);
        // 7 * 1.2 = 8.4 -> 9
        assert_eq!(spare.apply(7), 9);
        assert_eq!(SparePolicy::none().apply(7), 7);
        assert_eq!(spare.apply(0), 0);
    }

    #[test]
    fn negative_spare_rejected() {
        assert!(SparePolicy::new(-5.0).is_err());
        assert!(SparePolicy::new(f64::NAN).is_err());
        assert!(SparePolicy::new(0.0).is_ok());
    }

    #[test]
    fn required_demand_applies_margin_per_type() {
        let req = PanelRequirement {
            panel_name: "AHU-1".into(),
            digital_in: 10,
            digital_out: 7,
            analog_in: 0,
            analog_out: 1,
        };
        let d = PointDemand::required(&req, SparePolicy::default());
        assert_eq!(d.digital_in, 12);
        assert_eq!(d.digital_out, 9);
        assert_eq!(d.analog_in, 0);
        assert_eq!(d.analog_out, 2);
        assert_eq!(d.inputs(), 12);
        assert_eq!(d.outputs(), 11);
    }

    #[test]
    fn unknown_panel_is_data_error() {
        let set = DemandSet::new(vec![PanelRequirement {
            panel_name: "AHU-1".into(),
            ..Default::default()
        }]);
        assert!(set.get("AHU-1").is_ok());
        let err = set.get("AHU-9").unwrap_err();
        assert!(matches!(err, PanselError::Data(_)));
    }
}
