//! Calibration constants of the transfer cost model.

/// Reference orbital distance whose fourth root is the cost yardstick.
pub const YARDSTICK_REFERENCE: f64 = 13_599_840_256.0;

/// Trip distance beyond which small beacons pay the long-range exponent step.
pub const LONG_RANGE_THRESHOLD: f64 = 1e9;

/// Exponent step added to the small beacon's mass term past the threshold.
pub const LONG_RANGE_EXPONENT_PENALTY: f64 = 2.0;

/// Flat cost of any beacon model without a formula.
pub const UNKNOWN_MODEL_COST: f64 = 1000.0;

/// Distance offset of the jumpdrive formula; keeps its distance term non-zero.
pub const JUMPDRIVE_DISTANCE_OFFSET: f64 = 2e11;

/// Historical rescaling pair applied to every formula (`/t·SCALE … ·t/DIVISOR`).
pub const RESCALE_FACTOR: f64 = 10_000.0;
pub const RESCALE_DIVISOR: f64 = 2_000.0;

/// Distance step (m) of the drift penalty.
pub const DRIFT_DISTANCE_STEP: f64 = 200.0;

/// Coil array discount multiplier on drift-free transfers.
pub const COIL_DISCOUNT: f64 = 0.9;

/// Mass weighting in the saturating inertial compensation surcharge.
pub const INERTIAL_MASS_WEIGHT: f64 = 25.0;

/// Shielding surcharge per tonne-unit of hazardous cargo (`0.02 / 0.02256`).
pub const SHIELDING_CARGO_RATE: f64 = 0.02;
pub const SHIELDING_CARGO_SCALE: f64 = 0.02256;

/// Shielding surcharge per crew member (`0.9 / 1.13`).
pub const SHIELDING_CREW_RATE: f64 = 0.9;
pub const SHIELDING_CREW_SCALE: f64 = 1.13;

/// Fraction of the running cost a jumpdrive rebates from its shielding.
pub const JUMPDRIVE_SHIELDING_REBATE: f64 = 0.02;
