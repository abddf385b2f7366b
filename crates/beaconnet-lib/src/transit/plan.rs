//! Transfer plans: a priced, checked, ephemeral view of one candidate jump.

use serde::Serialize;
use tracing::debug;

use crate::beacon::BeaconModel;
use crate::capability::{Capability, CapabilitySet};
use crate::feasibility::{check_path, PathVerdict};
use crate::registry::{BeaconView, SnapshotBeaconView};
use crate::universe::Universe;
use crate::vessel::{HazardousPart, Vessel, VesselId};

use super::cost::{
    base_cost, drift_penalty_percent, price_transfer, round2, shielding_surcharge, spread_radius,
    PriceInputs,
};
use super::offset::{compensation, jump_offset_for_model, Endpoint};

/// Priced candidate transfer. Recomputed on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferPlan {
    pub traveller: VesselId,
    pub origin_vessel: VesselId,
    pub origin_model: BeaconModel,
    pub capabilities: CapabilitySet,
    pub destination: VesselId,
    pub destination_model: BeaconModel,
    pub trip_distance: f64,
    pub tonnage: f64,
    pub base_cost: f64,
    pub drift_penalty_percent: f64,
    pub coil_discount_applied: bool,
    pub inertial_surcharge: f64,
    pub shielding_surcharge: f64,
    pub equipment_adjusted_cost: f64,
    pub spread_radius: f64,
    pub path_verdict: PathVerdict,
    /// Cargo that destabilizes when the origin lacks shielding.
    pub hazards: Vec<HazardousPart>,
    pub crew: usize,
}

impl TransferPlan {
    pub fn shielded(&self) -> bool {
        self.capabilities.contains(Capability::Hcu)
    }

    /// Whether crew or cargo would be lost in this transfer.
    pub fn destabilizes(&self) -> bool {
        !self.shielded() && (self.crew > 0 || !self.hazards.is_empty())
    }

    pub fn affordable(&self, fuel: f64) -> bool {
        self.equipment_adjusted_cost <= fuel
    }
}

/// Whether the destination beacon could send the traveller back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnTrip {
    /// Highest base cost over the destination's active beacons.
    pub required: f64,
    /// Fuel reported by the destination; `None` when it could not be read.
    pub available: Option<f64>,
    pub feasible: bool,
}

/// Price and check a transfer of `traveller` from `origin` to `destination`.
///
/// `drift_distance` and `drift_velocity` describe how far the traveller sits
/// from the origin beacon and how fast it drifts away; both are zero for an
/// onboard jumpdrive. Returns `None` when the origin model has no price for
/// this transfer.
pub fn plan_transfer(
    universe: &Universe,
    traveller: &Vessel,
    origin: &dyn BeaconView,
    destination: &dyn BeaconView,
    drift_distance: f64,
    drift_velocity: f64,
) -> Option<TransferPlan> {
    let catalog = universe.catalog();
    let capabilities = origin.capabilities();
    let trip_distance = origin.position().distance_to(destination.position());
    let tonnage = traveller.mass_t(catalog);
    let hazards = traveller.hazardous_parts(universe.config(), catalog);
    let crew = traveller.crew_count();

    let offset = jump_offset_for_model(
        &universe.bodies,
        Endpoint::of_vessel(traveller),
        destination.endpoint(),
        origin.model(),
    );

    let pricing = price_transfer(&PriceInputs {
        origin_model: origin.model(),
        capabilities,
        trip_distance,
        tonnage,
        drift_penalty_percent: drift_penalty_percent(drift_distance, drift_velocity),
        compensation: compensation(offset, destination.endpoint()),
        shielding: shielding_surcharge(&hazards, crew),
    })?;

    let path_verdict = check_path(
        origin.position(),
        destination.position(),
        origin.gravity_limit(),
        &universe.bodies,
    );

    debug!(
        traveller = %traveller.name,
        destination = %destination.vessel_name(),
        trip_distance,
        cost = pricing.total,
        verdict = ?path_verdict,
        "transfer planned"
    );

    Some(TransferPlan {
        traveller: traveller.id,
        origin_vessel: origin.vessel(),
        origin_model: origin.model(),
        capabilities,
        destination: destination.vessel(),
        destination_model: destination.model(),
        trip_distance,
        tonnage,
        base_cost: pricing.base_cost,
        drift_penalty_percent: pricing.drift_penalty_percent,
        coil_discount_applied: pricing.coil_discount_applied,
        inertial_surcharge: pricing.inertial_surcharge,
        shielding_surcharge: pricing.shielding_surcharge,
        equipment_adjusted_cost: pricing.total,
        spread_radius: spread_radius(trip_distance, destination.model()),
        path_verdict,
        hazards,
        crew,
    })
}

/// Estimate the return trip from the destination's active beacons.
pub fn return_trip(beacons: &[SnapshotBeaconView<'_>], trip_distance: f64, tonnage: f64) -> ReturnTrip {
    let required = round2(
        beacons
            .iter()
            .map(|b| base_cost(b.model(), trip_distance, tonnage))
            .fold(0.0, f64::max),
    );
    let available = beacons.iter().filter_map(|b| b.fuel_on_board()).last();
    ReturnTrip {
        required,
        available,
        feasible: required <= available.unwrap_or(0.0),
    }
}
