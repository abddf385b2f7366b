//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Status string a running beacon advertises in its persisted snapshot.
pub const ACTIVE_STATUS: &str = "Active.";

/// Status string an idle beacon advertises in its persisted snapshot.
pub const OFFLINE_STATUS: &str = "Offline.";

/// Resource keywords that mark cargo as high-energy and unstable in transit.
pub const DEFAULT_HAZARD_KEYWORDS: [&str; 7] = [
    "karborundum",
    "uranium",
    "plutonium",
    "antimatter",
    "thorium",
    "nuclear",
    "exotic",
];

/// Tunables shared by the beacon state machine, registry and executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Consumable resource paid for transfers and tracked as `fuelOnBoard`.
    pub fuel_resource: String,
    /// Resource drawn for activation and the running beacon draw.
    pub charge_resource: String,
    /// Minimum fuel needed to initiate or sustain the beacon reaction.
    pub reaction_threshold: f64,
    /// Altitude floor as a fraction of the body radius.
    pub floor_fraction: f64,
    /// Near beacons further than this (meters) are never auto-selected.
    pub near_selection_radius_m: f64,
    /// Lower-case keywords classifying a resource as high-energy cargo.
    pub hazard_keywords: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fuel_resource: "Karborundum".to_string(),
            charge_resource: "ElectricCharge".to_string(),
            reaction_threshold: 0.1,
            floor_fraction: 0.25,
            near_selection_radius_m: 3000.0,
            hazard_keywords: DEFAULT_HAZARD_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl EngineConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.fuel_resource.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "fuel_resource must not be empty".to_string(),
            });
        }
        if self.charge_resource.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "charge_resource must not be empty".to_string(),
            });
        }

        let fields = [
            (self.reaction_threshold, "reaction_threshold"),
            (self.floor_fraction, "floor_fraction"),
            (self.near_selection_radius_m, "near_selection_radius_m"),
        ];
        for (value, field) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig {
                    message: format!("{field} must be finite and non-negative, got {value}"),
                });
            }
        }

        if self.hazard_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(Error::InvalidConfig {
                message: "hazard_keywords must not contain empty entries".to_string(),
            });
        }

        Ok(())
    }

    /// Whether a resource name matches one of the high-energy keywords.
    pub fn is_hazardous_resource(&self, resource: &str) -> bool {
        let lowered = resource.to_lowercase();
        self.hazard_keywords
            .iter()
            .any(|keyword| lowered.contains(keyword.to_lowercase().as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        EngineConfig::default().validate().expect("defaults validate");
    }

    #[test]
    fn rejects_negative_threshold() {
        let config = EngineConfig {
            reaction_threshold: -1.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn hazard_match_is_case_insensitive_substring() {
        let config = EngineConfig::default();
        assert!(config.is_hazardous_resource("EnrichedUranium"));
        assert!(config.is_hazardous_resource("Karborundum"));
        assert!(!config.is_hazardous_resource("LiquidFuel"));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"near_selection_radius_m": 1500.0}"#).expect("parses");
        assert_eq!(config.near_selection_radius_m, 1500.0);
        assert_eq!(config.fuel_resource, "Karborundum");
    }
}
