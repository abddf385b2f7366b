//! Beacon devices: hardware models, live state and the activation lifecycle.
//!
//! - [`model`] - Beacon models and their per-model constants
//! - [`state`] - Activation state machine with safety interlocks
//!
//! A [`Beacon`] lives inside a part module on its vessel. Its `fuel_on_board`,
//! capabilities, floor and charge figures are derived values recomputed every
//! tick; only `state` is authoritative.

pub mod model;
pub mod state;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::body::{operational_floor_km, CelestialBody};
use crate::capability::{Capability, CapabilitySet};
use crate::config::{ACTIVE_STATUS, OFFLINE_STATUS};
use crate::vessel::{ModuleSnapshot, VesselId};

pub use model::{BeaconModel, GRAVIMETRIC_BOOST};
pub use state::{activate, shutdown, tick, BeaconReadings, ShutdownCause, TickReport};

/// Module name under which beacons are persisted in vessel snapshots.
pub const BEACON_MODULE: &str = "BeaconModule";
/// Snapshot field holding the status string (`"Active."` / `"Offline."`).
pub const FIELD_STATUS: &str = "beaconStatus";
/// Snapshot field holding the model string (`"LB10"` ...).
pub const FIELD_MODEL: &str = "beaconModel";
/// Snapshot field holding the last reported fuel quantity.
pub const FIELD_FUEL: &str = "fuelOnBoard";
/// Snapshot field holding the gravity limit.
pub const FIELD_GRAVITY_LIMIT: &str = "gLimit";
/// Snapshot field holding the activation flag.
pub const FIELD_ACTIVATED: &str = "activated";
/// Snapshot field holding the capability inventory mask.
pub const FIELD_INVENTORY: &str = "techBoxInventory";

/// Lifecycle state of a beacon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeaconState {
    #[default]
    Offline,
    /// Interlocks are being validated; never persists past one call.
    Activating,
    Active,
}

/// Address of a beacon: the vessel and the index of the part carrying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeaconRef {
    pub vessel: VesselId,
    pub part: usize,
}

/// One installed transit device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    pub model: BeaconModel,
    #[serde(default)]
    pub state: BeaconState,
    /// Sum of the fuel resource across the owning vessel at the last tick.
    #[serde(default)]
    pub fuel_on_board: f64,
    #[serde(default)]
    pub capabilities: CapabilitySet,
    /// Minimum safe altitude above the current body, in kilometers.
    #[serde(default)]
    pub operational_floor_km: f64,
    /// One-time charge required to activate.
    #[serde(default)]
    pub activation_charge: f64,
    /// Charge drawn per second while active.
    #[serde(default)]
    pub running_draw: f64,
}

impl Beacon {
    pub fn new(model: BeaconModel) -> Self {
        Self {
            model,
            state: BeaconState::Offline,
            fuel_on_board: 0.0,
            capabilities: CapabilitySet::empty(),
            operational_floor_km: 0.0,
            activation_charge: 0.0,
            running_draw: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == BeaconState::Active
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn gravity_limit(&self) -> f64 {
        self.model.gravity_limit(self.capabilities)
    }

    pub fn inventory_mask(&self) -> u8 {
        self.capabilities.inventory_mask()
    }

    /// Status string shown to the operator and persisted in snapshots.
    pub fn status(&self) -> &'static str {
        if self.is_active() {
            ACTIVE_STATUS
        } else {
            OFFLINE_STATUS
        }
    }

    /// Recompute the derived figures from the current surroundings.
    pub fn refresh(
        &mut self,
        capabilities: CapabilitySet,
        body: &CelestialBody,
        gravity: f64,
        fuel: f64,
    ) {
        self.capabilities = capabilities;
        self.fuel_on_board = fuel;

        let limit = self.gravity_limit();
        let (charge_mult, draw_div) = if self.has(Capability::Gmu) {
            (15.0, 33.0)
        } else {
            (10.0, 50.0)
        };
        let load = gravity / limit;
        self.operational_floor_km = operational_floor_km(body, limit);
        self.activation_charge = (fuel * charge_mult * load).round();
        self.running_draw = (fuel / draw_div * load * 100.0).round() / 100.0;
    }

    /// Serialized view other vessels read while this one is out of range.
    pub fn snapshot(&self) -> ModuleSnapshot {
        let values: BTreeMap<String, String> = [
            (FIELD_STATUS, self.status().to_string()),
            (FIELD_MODEL, self.model.to_string()),
            (FIELD_FUEL, self.fuel_on_board.to_string()),
            (FIELD_GRAVITY_LIMIT, self.gravity_limit().to_string()),
            (FIELD_ACTIVATED, self.is_active().to_string()),
            (FIELD_INVENTORY, self.inventory_mask().to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        ModuleSnapshot {
            module_name: BEACON_MODULE.to_string(),
            values,
        }
    }
}
