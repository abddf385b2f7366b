//! Beacon hardware models and their fixed per-model constants.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::capability::{Capability, CapabilitySet};

/// Multiplier the gravimetric upgrade applies to the gravity limit.
pub const GRAVIMETRIC_BOOST: f64 = 1.25;

/// Installed transit device model. Immutable after placement.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum BeaconModel {
    #[serde(rename = "LB10")]
    #[strum(serialize = "LB10")]
    Small,
    #[serde(rename = "LB15")]
    #[strum(serialize = "LB15")]
    Medium,
    #[serde(rename = "LB100")]
    #[strum(serialize = "LB100")]
    Large,
    #[serde(rename = "IB1")]
    #[strum(serialize = "IB1")]
    Jumpdrive,
    /// Any model string the engine does not recognise; uses fallback constants.
    #[serde(other)]
    #[strum(serialize = "unknown")]
    Unknown,
}

impl BeaconModel {
    /// Parse a persisted model string; unrecognised strings map to `Unknown`.
    pub fn from_model_str(value: &str) -> Self {
        value.trim().parse().unwrap_or(BeaconModel::Unknown)
    }

    /// Gravity tolerance (m/s²) before upgrades.
    pub fn base_gravity_limit(self) -> f64 {
        match self {
            BeaconModel::Small => 1.0,
            BeaconModel::Medium => 0.5,
            BeaconModel::Large => 0.1,
            BeaconModel::Jumpdrive => 0.1,
            BeaconModel::Unknown => 0.1,
        }
    }

    /// Gravity tolerance with the gravimetric upgrade applied when present.
    pub fn gravity_limit(self, capabilities: CapabilitySet) -> f64 {
        let base = self.base_gravity_limit();
        if capabilities.contains(Capability::Gmu) {
            base * GRAVIMETRIC_BOOST
        } else {
            base
        }
    }

    /// Logarithm base of the arrival dispersion formula for this destination model.
    pub fn drift_modifier(self) -> f64 {
        match self {
            BeaconModel::Small => 10.0,
            BeaconModel::Medium => 50.0,
            BeaconModel::Large => 80.0,
            BeaconModel::Jumpdrive => 2.0,
            BeaconModel::Unknown => 1.0,
        }
    }

    /// Jumpdrives move their own vessel and never serve as a remote origin.
    pub fn is_jumpdrive(self) -> bool {
        self == BeaconModel::Jumpdrive
    }
}
