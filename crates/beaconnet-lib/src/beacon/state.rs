//! Activation lifecycle: `Offline → Activating → Active → Offline`.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{BeaconRef, BeaconState};
use crate::body::BodyId;
use crate::capability;
use crate::environment::{GravityOracle, ResourceLedger};
use crate::error::{Error, Result};
use crate::universe::Universe;

/// Surroundings sampled for one beacon during a refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeaconReadings {
    pub body: BodyId,
    pub body_name: String,
    /// Local gravitational acceleration (m/s²).
    pub gravity: f64,
    pub gravity_limit: f64,
    /// Altitude above the body surface (m).
    pub altitude: f64,
    /// Minimum operating altitude (m).
    pub floor: f64,
    pub fuel: f64,
}

/// Why an active beacon shut itself down.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum ShutdownCause {
    GravityExceeded { gravity: f64, limit: f64 },
    BelowFloor { altitude: f64, floor: f64 },
    ChargeDepleted { required: f64 },
    FuelDepleted { available: f64 },
}

impl fmt::Display for ShutdownCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownCause::GravityExceeded { gravity, limit } => {
                write!(f, "too deep in gravity well ({gravity:.3} > {limit:.3} m/s²)")
            }
            ShutdownCause::BelowFloor { altitude, floor } => {
                write!(f, "below operational floor ({altitude:.0} m < {floor:.0} m)")
            }
            ShutdownCause::ChargeDepleted { required } => {
                write!(f, "charge depleted ({required} needed)")
            }
            ShutdownCause::FuelDepleted { available } => {
                write!(f, "fuel depleted ({available} left)")
            }
        }
    }
}

/// Result of one fixed tick for one beacon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub beacon: BeaconRef,
    pub state: BeaconState,
    /// Charge drawn to keep the beacon running this tick.
    pub charge_drawn: f64,
    /// Every shutdown cause detected this tick; empty when nothing tripped.
    pub causes: Vec<ShutdownCause>,
}

impl TickReport {
    pub fn shut_down(&self) -> bool {
        !self.causes.is_empty()
    }
}

/// Re-aggregate capabilities and recompute every derived figure.
pub fn refresh(universe: &mut Universe, at: BeaconRef) -> Result<BeaconReadings> {
    let model = universe.beacon(at)?.model;
    let vessel = universe.vessel(at.vessel).ok_or_else(|| Error::UnknownVessel {
        name: at.vessel.to_string(),
        suggestions: Vec::new(),
    })?;
    let capabilities = capability::aggregate(model, vessel.techboxes());
    let body = universe
        .body(vessel.main_body)
        .ok_or_else(|| Error::UnknownBody {
            name: vessel.main_body.to_string(),
        })?
        .clone();

    let gravity = universe.gravity_at(vessel.position);
    let altitude = body.altitude_of(vessel.position);
    let floor = body.radius_m * universe.config.floor_fraction;
    let fuel = universe.query(at.vessel, &universe.config.fuel_resource);
    let main_body = vessel.main_body;

    let beacon = universe.beacon_mut(at)?;
    beacon.refresh(capabilities, &body, gravity, fuel);

    Ok(BeaconReadings {
        body: main_body,
        body_name: body.display_name(),
        gravity,
        gravity_limit: beacon.gravity_limit(),
        altitude,
        floor,
        fuel,
    })
}

/// Operator-initiated activation.
///
/// Interlocks are checked in order (reactant, gravity, altitude, charge); the
/// first failure aborts and the beacon stays `Offline`. The activation charge
/// is only drawn once every earlier interlock has passed.
pub fn activate(universe: &mut Universe, at: BeaconRef) -> Result<()> {
    if universe.beacon(at)?.is_active() {
        debug!(vessel = at.vessel, part = at.part, "beacon already active");
        return Ok(());
    }

    let readings = refresh(universe, at)?;
    universe.beacon_mut(at)?.state = BeaconState::Activating;

    let outcome = check_interlocks(universe, at, &readings);
    let beacon = universe.beacon_mut(at)?;
    match outcome {
        Ok(charge) => {
            beacon.state = BeaconState::Active;
            info!(
                vessel = at.vessel,
                part = at.part,
                model = %beacon.model,
                charge,
                gravity = readings.gravity,
                limit = readings.gravity_limit,
                "beacon activated"
            );
            Ok(())
        }
        Err(err) => {
            beacon.state = BeaconState::Offline;
            debug!(vessel = at.vessel, part = at.part, error = %err, "activation refused");
            Err(err)
        }
    }
}

fn check_interlocks(universe: &mut Universe, at: BeaconRef, readings: &BeaconReadings) -> Result<f64> {
    let fuel_resource = universe.config.fuel_resource.clone();
    let charge_resource = universe.config.charge_resource.clone();
    let threshold = universe.config.reaction_threshold;

    if !universe.available(at.vessel, &fuel_resource, threshold) {
        return Err(Error::InsufficientReactant {
            resource: fuel_resource,
        });
    }
    if readings.gravity > readings.gravity_limit {
        return Err(Error::GravityExceeded {
            body: readings.body_name.clone(),
            gravity: readings.gravity,
            limit: readings.gravity_limit,
        });
    }
    if readings.altitude < readings.floor {
        return Err(Error::ProximityViolation {
            body: readings.body_name.clone(),
        });
    }

    let required = universe.beacon(at)?.activation_charge;
    if !universe.debit(at.vessel, &charge_resource, required) {
        return Err(Error::InsufficientCharge {
            available: universe.query(at.vessel, &charge_resource),
            resource: charge_resource,
            required,
        });
    }
    Ok(required)
}

/// Operator-initiated shutdown; always succeeds for an existing beacon.
pub fn shutdown(universe: &mut Universe, at: BeaconRef) -> Result<()> {
    let beacon = universe.beacon_mut(at)?;
    if beacon.state != BeaconState::Offline {
        beacon.state = BeaconState::Offline;
        info!(vessel = at.vessel, part = at.part, "beacon shut down");
    }
    Ok(())
}

/// Fixed-tick update: refresh derived figures and, while active, draw the
/// running charge and evaluate every shutdown cause independently.
pub fn tick(universe: &mut Universe, at: BeaconRef, dt: f64) -> Result<TickReport> {
    let readings = refresh(universe, at)?;
    let beacon = universe.beacon(at)?;
    if !beacon.is_active() {
        return Ok(TickReport {
            beacon: at,
            state: beacon.state,
            charge_drawn: 0.0,
            causes: Vec::new(),
        });
    }

    let draw = dt * beacon.running_draw;
    let fuel_resource = universe.config.fuel_resource.clone();
    let charge_resource = universe.config.charge_resource.clone();
    let threshold = universe.config.reaction_threshold;

    let mut causes = Vec::new();
    if readings.gravity > readings.gravity_limit {
        causes.push(ShutdownCause::GravityExceeded {
            gravity: readings.gravity,
            limit: readings.gravity_limit,
        });
    }
    if readings.altitude < readings.floor {
        causes.push(ShutdownCause::BelowFloor {
            altitude: readings.altitude,
            floor: readings.floor,
        });
    }
    let charge_drawn = if universe.debit(at.vessel, &charge_resource, draw) {
        draw
    } else {
        causes.push(ShutdownCause::ChargeDepleted { required: draw });
        0.0
    };
    if !universe.available(at.vessel, &fuel_resource, threshold) {
        causes.push(ShutdownCause::FuelDepleted {
            available: universe.query(at.vessel, &fuel_resource),
        });
    }

    let beacon = universe.beacon_mut(at)?;
    if !causes.is_empty() {
        for cause in &causes {
            warn!(
                vessel = at.vessel,
                part = at.part,
                body = %readings.body_name,
                %cause,
                "beacon shut down for safety"
            );
        }
        beacon.state = BeaconState::Offline;
    }

    Ok(TickReport {
        beacon: at,
        state: beacon.state,
        charge_drawn,
        causes,
    })
}
