//! Commit step of a transfer.
//!
//! Everything shown to the operator earlier is advisory. `commit` resolves
//! the origin and the destination again, re-applies the near-scan origin
//! rules, re-prices, re-checks the path and only then pays and moves the
//! traveller. Any failure before the fuel debit
//! leaves the universe exactly as it was.

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::beacon::BeaconRef;
use crate::environment::{OrbitPrimitive, ResourceLedger};
use crate::error::{Error, Result};
use crate::geometry::Vec3;
use crate::registry::{is_eligible_origin, resolve_target, BeaconView, LiveBeaconView};
use crate::universe::Universe;
use crate::vessel::VesselId;

use super::offset::{arrival_velocity, dispersion_offset, jump_offset_for_model, Endpoint};
use super::plan::{plan_transfer, TransferPlan};

/// A jump the operator has confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JumpRequest {
    pub traveller: VesselId,
    pub origin: BeaconRef,
    pub target: VesselId,
}

/// Irreversible loss caused by an unshielded transfer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum JumpWarning {
    CrewLost { name: String },
    CargoDestabilized { part: String, resource: String },
}

impl std::fmt::Display for JumpWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JumpWarning::CrewLost { name } => write!(f, "{name} was killed in transit"),
            JumpWarning::CargoDestabilized { part, resource } => {
                write!(f, "{part} destabilized ({resource})")
            }
        }
    }
}

/// What a successful commit did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JumpOutcome {
    pub request: JumpRequest,
    pub plan: TransferPlan,
    pub fuel_spent: f64,
    pub reference_body: usize,
    /// Arrival position relative to the reference body.
    pub arrival_position: Vec3,
    pub arrival_velocity: Vec3,
    pub dispersion: Vec3,
    pub warnings: Vec<JumpWarning>,
}

/// Execute a confirmed jump.
pub fn commit<R: Rng + ?Sized>(universe: &mut Universe, request: JumpRequest, rng: &mut R) -> Result<JumpOutcome> {
    let traveller = universe
        .vessel(request.traveller)
        .ok_or_else(|| Error::UnknownVessel {
            name: request.traveller.to_string(),
            suggestions: Vec::new(),
        })?;

    let origin = LiveBeaconView::resolve(universe, request.origin)?;
    let origin_vessel = universe
        .vessel(request.origin.vessel)
        .ok_or_else(|| Error::NoNearBeacon {
            vessel: traveller.name.clone(),
        })?;
    if !is_eligible_origin(universe, traveller, origin_vessel, origin.beacon()) {
        return Err(Error::NoNearBeacon {
            vessel: traveller.name.clone(),
        });
    }

    let reader = &*universe;
    let destination = resolve_target(universe, request.traveller, request.target, reader)?;

    let drift_distance = traveller.position.distance_to(origin_vessel.position).round();
    let drift_velocity = ((universe.frame_velocity(traveller) - universe.frame_velocity(origin_vessel))
        .length()
        * 10.0)
        .round()
        / 10.0;

    let plan = plan_transfer(universe, traveller, &origin, &destination, drift_distance, drift_velocity)
        .ok_or_else(|| Error::InvalidPlan {
            reason: format!("{} beacons cannot price this transfer", origin.model()),
        })?;

    if !plan.spread_radius.is_finite() {
        return Err(Error::InvalidPlan {
            reason: format!(
                "destination model '{}' has no arrival dispersion",
                destination.model_name()
            ),
        });
    }

    if let Some((kind, body)) = plan.path_verdict.obstruction() {
        let body = universe
            .body(body)
            .map(|b| b.display_name())
            .unwrap_or_else(|| body.to_string());
        return Err(Error::PathObstructed { kind, body });
    }

    let offset = jump_offset_for_model(
        &universe.bodies,
        Endpoint::of_vessel(traveller),
        destination.endpoint(),
        origin.model(),
    );
    let velocity = arrival_velocity(offset, destination.endpoint(), plan.capabilities);
    let dispersion = dispersion_offset(rng, plan.spread_radius);
    let reference_body = destination.main_body();
    let body_position = universe
        .body(reference_body)
        .map(|b| b.position)
        .ok_or_else(|| Error::UnknownBody {
            name: reference_body.to_string(),
        })?;
    let arrival_position = destination.position() - body_position + dispersion;
    if !arrival_position.is_finite() || !velocity.is_finite() {
        return Err(Error::InvalidPlan {
            reason: "arrival state is not finite".to_string(),
        });
    }

    let fuel_resource = universe.config.fuel_resource.clone();
    let cost = plan.equipment_adjusted_cost;
    if !universe.debit(request.origin.vessel, &fuel_resource, cost) {
        return Err(Error::InsufficientFuel {
            required: cost,
            available: universe.query(request.origin.vessel, &fuel_resource),
        });
    }

    let warnings = if plan.shielded() {
        Vec::new()
    } else {
        destabilize(universe, request.traveller)
    };

    let epoch = universe.epoch;
    universe.set_state(request.traveller, arrival_position, velocity, reference_body, epoch)?;
    info!(
        traveller = request.traveller,
        target = request.target,
        cost,
        spread = plan.spread_radius,
        casualties = warnings.len(),
        "jump committed"
    );

    Ok(JumpOutcome {
        request,
        plan,
        fuel_spent: cost,
        reference_body,
        arrival_position,
        arrival_velocity: velocity,
        dispersion,
        warnings,
    })
}

/// Kill every crew member and destroy every hazardous part aboard.
fn destabilize(universe: &mut Universe, traveller: VesselId) -> Vec<JumpWarning> {
    let mut warnings: Vec<JumpWarning> = universe
        .remove_crew(traveller)
        .into_iter()
        .map(|name| {
            warn!(vessel = traveller, crew = %name, "crew member killed in transit");
            JumpWarning::CrewLost { name }
        })
        .collect();

    let hazards = match universe.vessel(traveller) {
        Some(v) => v.hazardous_parts(universe.config(), universe.catalog()),
        None => return warnings,
    };
    let indices: Vec<usize> = hazards.iter().map(|h| h.part).collect();
    universe.destroy_parts(traveller, &indices);
    for hazard in hazards {
        warn!(
            vessel = traveller,
            part = %hazard.part_name,
            resource = %hazard.resource,
            "part destabilized in transit"
        );
        warnings.push(JumpWarning::CargoDestabilized {
            part: hazard.part_name,
            resource: hazard.resource,
        });
    }
    warnings
}
