//! Transfer planning and execution.
//!
//! - [`constants`] - Calibration constants of the cost model
//! - [`cost`] - Base cost, drift, dispersion and equipment adjustments
//! - [`offset`] - Jump offset, arrival velocity and dispersion sampling
//! - [`plan`] - Priced, path-checked candidate transfers
//! - [`executor`] - Commit-time revalidation and placement
//!
//! # Example
//!
//! ```
//! use beaconnet_lib::beacon::BeaconModel;
//! use beaconnet_lib::transit::{drift_penalty_percent, spread_radius};
//!
//! // Traveller 450 m from the origin beacon, drifting at 3 m/s.
//! assert_eq!(drift_penalty_percent(450.0, 3.0), 9.0);
//! assert_eq!(spread_radius(1.2e7, BeaconModel::Medium), 4200.0);
//! ```

pub mod constants;
pub mod cost;
pub mod executor;
pub mod offset;
pub mod plan;

pub use cost::{
    base_cost, drift_penalty_percent, inertial_surcharge, price_transfer, round2,
    shielding_surcharge, spread_radius, yardstick, PriceInputs, Pricing,
};
pub use executor::{commit, JumpOutcome, JumpRequest, JumpWarning};
pub use offset::{
    arrival_velocity, compensation, dispersion_offset, jump_offset, jump_offset_for_model,
    Endpoint,
};
pub use plan::{plan_transfer, return_trip, ReturnTrip, TransferPlan};
