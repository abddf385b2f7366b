//! Transfer pricing: base cost, drift, dispersion and equipment adjustments.
//!
//! Every function here is pure. Monetary values are rounded to two decimals
//! at each checkpoint of [`price_transfer`], and the intermediate rounding is
//! part of the observable result.

use serde::{Deserialize, Serialize};

use crate::beacon::BeaconModel;
use crate::capability::{Capability, CapabilitySet};
use crate::vessel::HazardousPart;

use super::constants::{
    COIL_DISCOUNT, DRIFT_DISTANCE_STEP, INERTIAL_MASS_WEIGHT, JUMPDRIVE_DISTANCE_OFFSET,
    JUMPDRIVE_SHIELDING_REBATE, LONG_RANGE_EXPONENT_PENALTY, LONG_RANGE_THRESHOLD,
    RESCALE_DIVISOR, RESCALE_FACTOR, SHIELDING_CARGO_RATE, SHIELDING_CARGO_SCALE,
    SHIELDING_CREW_RATE, SHIELDING_CREW_SCALE, UNKNOWN_MODEL_COST, YARDSTICK_REFERENCE,
};

/// Round to two decimal places.
///
/// # Examples
/// ```
/// use beaconnet_lib::transit::round2;
///
/// assert_eq!(round2(2.857142), 2.86);
/// assert_eq!(round2(0.004), 0.0);
/// ```
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fourth root of the reference orbital distance.
pub fn yardstick() -> f64 {
    YARDSTICK_REFERENCE.sqrt().sqrt()
}

/// Unrounded base cost of moving `tonnage` tonnes over `trip_distance` meters
/// with an origin beacon of `model`.
///
/// Each formula ends with the historical `/ t · 10000 … · t / 2000` rescaling,
/// kept verbatim because it shifts the floating-point result that later
/// rounding checkpoints see.
///
/// # Examples
/// ```
/// use beaconnet_lib::beacon::BeaconModel;
/// use beaconnet_lib::transit::{base_cost, round2};
///
/// let cost = base_cost(BeaconModel::Small, 5e6, 10.0);
/// assert_eq!(round2(cost), 0.71);
/// assert_eq!(base_cost(BeaconModel::Unknown, 5e6, 10.0), 1000.0);
/// ```
pub fn base_cost(model: BeaconModel, trip_distance: f64, tonnage: f64) -> f64 {
    let t = tonnage;
    let d = trip_distance;
    let y = yardstick();
    match model {
        BeaconModel::Small => {
            let penalty = if d > LONG_RANGE_THRESHOLD {
                LONG_RANGE_EXPONENT_PENALTY
            } else {
                0.0
            };
            ((t.powf(1.0 + 0.001 * t + penalty) / 10.0) * ((d * (d / 5e6)).sqrt().sqrt() / y)
                / t
                * RESCALE_FACTOR)
                * t
                / RESCALE_DIVISOR
        }
        BeaconModel::Medium => {
            (700.0
                + (t.powf(1.0 + 0.0002 * t.powi(2)) / 10.0) * ((d * (d / 5e10)).sqrt().sqrt() / y)
                    / t
                    * RESCALE_FACTOR)
                * t
                / RESCALE_DIVISOR
        }
        BeaconModel::Large => {
            (500.0
                + (t.powf(1.0 + 0.00025 * t) / 20.0) * ((d * 25000.0).sqrt().sqrt().sqrt() / y.sqrt())
                    / t
                    * RESCALE_FACTOR)
                * t
                / RESCALE_DIVISOR
        }
        BeaconModel::Jumpdrive => {
            ((((t.powf(1.0 + t / 6000.0)) * 0.9) / 10.0)
                * ((d + JUMPDRIVE_DISTANCE_OFFSET).sqrt().sqrt() / y)
                / t
                * RESCALE_FACTOR)
                * t
                / RESCALE_DIVISOR
        }
        BeaconModel::Unknown => UNKNOWN_MODEL_COST,
    }
}

/// Percentage surcharge for a traveller drifting away from its origin beacon:
/// `floor(distance / 200)² + floor(relative_velocity^1.5)`.
pub fn drift_penalty_percent(distance: f64, relative_velocity: f64) -> f64 {
    (distance / DRIFT_DISTANCE_STEP).floor().powi(2) + relative_velocity.powf(1.5).floor()
}

/// Radius (m) of the random arrival dispersion around a destination beacon.
///
/// The unknown model's drift modifier of 1 makes the radius non-finite; such a
/// plan can be listed but never committed.
pub fn spread_radius(trip_distance: f64, destination_model: BeaconModel) -> f64 {
    (trip_distance.ln() / destination_model.drift_modifier().ln() * 10.0).round() * 100.0
}

/// Surcharge for matching the destination frame, saturating in the velocity
/// mismatch `compensation` (m/s).
pub fn inertial_surcharge(compensation: f64, tonnage: f64) -> f64 {
    let denominator = compensation + tonnage * INERTIAL_MASS_WEIGHT;
    if denominator <= 0.0 {
        return 0.0;
    }
    round2(compensation * tonnage / denominator)
}

/// Surcharge for shielding hazardous cargo and crew.
pub fn shielding_surcharge(hazards: &[HazardousPart], crew: usize) -> f64 {
    let cargo: f64 = hazards
        .iter()
        .map(|h| h.density * h.amount * SHIELDING_CARGO_RATE / SHIELDING_CARGO_SCALE)
        .sum();
    round2(cargo + crew as f64 * SHIELDING_CREW_RATE / SHIELDING_CREW_SCALE)
}

/// Everything [`price_transfer`] needs to know about one transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceInputs {
    pub origin_model: BeaconModel,
    pub capabilities: CapabilitySet,
    pub trip_distance: f64,
    pub tonnage: f64,
    pub drift_penalty_percent: f64,
    /// Velocity mismatch the inertial upgrade would absorb (m/s).
    pub compensation: f64,
    /// Unadjusted shielding surcharge from [`shielding_surcharge`].
    pub shielding: f64,
}

/// Breakdown of a priced transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    /// Base cost rounded for display.
    pub base_cost: f64,
    pub drift_penalty_percent: f64,
    pub coil_discount_applied: bool,
    /// Zero when the origin lacks the inertial upgrade.
    pub inertial_surcharge: f64,
    /// Zero when the origin lacks shielding; rebated for jumpdrives.
    pub shielding_surcharge: f64,
    pub total: f64,
}

/// Assemble the full price of a transfer.
///
/// Order of operations:
/// 1. base cost; a base rounding to zero (or not finite) means the transfer
///    has no price and `None` is returned
/// 2. coil array discount, only when the drift penalty is exactly zero
/// 3. drift penalty, then round
/// 4. inertial surcharge
/// 5. shielding surcharge (jumpdrives rebate 2% of the running cost)
/// 6. final round
///
/// # Examples
/// ```
/// use beaconnet_lib::beacon::BeaconModel;
/// use beaconnet_lib::capability::CapabilitySet;
/// use beaconnet_lib::transit::{price_transfer, PriceInputs};
///
/// let pricing = price_transfer(&PriceInputs {
///     origin_model: BeaconModel::Small,
///     capabilities: CapabilitySet::empty(),
///     trip_distance: 5e6,
///     tonnage: 10.0,
///     drift_penalty_percent: 0.0,
///     compensation: 0.0,
///     shielding: 0.0,
/// })
/// .expect("small beacons have a formula");
/// assert_eq!(pricing.base_cost, 0.71);
/// assert_eq!(pricing.total, 0.71);
/// ```
pub fn price_transfer(inputs: &PriceInputs) -> Option<Pricing> {
    let caps = inputs.capabilities;
    let raw = base_cost(inputs.origin_model, inputs.trip_distance, inputs.tonnage);
    if !raw.is_finite() || round2(raw) == 0.0 {
        return None;
    }

    let mut cost = raw;
    let coil_discount_applied = caps.contains(Capability::Scu) && inputs.drift_penalty_percent == 0.0;
    if coil_discount_applied {
        cost *= COIL_DISCOUNT;
    }

    cost += cost * inputs.drift_penalty_percent / 100.0;
    cost = round2(cost);

    let inertial_surcharge = if caps.contains(Capability::Amu) {
        inertial_surcharge(inputs.compensation, inputs.tonnage)
    } else {
        0.0
    };
    cost += inertial_surcharge;

    let shielding_surcharge = if caps.contains(Capability::Hcu) {
        if inputs.origin_model.is_jumpdrive() {
            round2(inputs.shielding - cost * JUMPDRIVE_SHIELDING_REBATE)
        } else {
            inputs.shielding
        }
    } else {
        0.0
    };
    cost += shielding_surcharge;

    Some(Pricing {
        base_cost: round2(raw),
        drift_penalty_percent: inputs.drift_penalty_percent,
        coil_discount_applied,
        inertial_surcharge,
        shielding_surcharge,
        total: round2(cost).max(0.0),
    })
}
