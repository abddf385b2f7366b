use std::path::PathBuf;

use thiserror::Error;

use crate::feasibility::ObstructionKind;

/// Convenient result alias for the beaconnet library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Transit failures are recoverable from the operator's point of view: a failed
/// activation or commit leaves every piece of state untouched and can simply be
/// retried once the reported condition clears.
#[derive(Debug, Error)]
pub enum Error {
    /// The origin beacon's vessel cannot cover the transfer cost.
    #[error("origin beacon has {available} of {required} fuel required to jump")]
    InsufficientFuel { required: f64, available: f64 },

    /// The beacon's local gravity is above what the device tolerates.
    #[error("gravity from {body} is too strong ({gravity:.3} > {limit:.3} m/s²)")]
    GravityExceeded {
        body: String,
        gravity: f64,
        limit: f64,
    },

    /// The beacon sits below the operational floor of its body.
    #[error("beacon is too close to {body}")]
    ProximityViolation { body: String },

    /// The straight-line transfer path is blocked by a massive body.
    #[error("transfer path is obstructed by {body} ({kind})")]
    PathObstructed { kind: ObstructionKind, body: String },

    /// A far target seen in an earlier snapshot can no longer be resolved.
    #[error("destination {target} is no longer reachable")]
    StaleTargetVanished { target: String },

    /// Not enough reactant aboard to initiate or sustain the beacon reaction.
    #[error("insufficient {resource} to initiate reaction")]
    InsufficientReactant { resource: String },

    /// Not enough charge to pay the one-time activation cost.
    #[error("insufficient {resource} for activation ({available} of {required})")]
    InsufficientCharge {
        resource: String,
        required: f64,
        available: f64,
    },

    /// No usable origin beacon is in range of the requesting vessel.
    #[error("no active beacon in range of {vessel}")]
    NoNearBeacon { vessel: String },

    /// The referenced beacon does not exist on the vessel.
    #[error("vessel {vessel} has no beacon at part {part}")]
    UnknownBeacon { vessel: String, part: usize },

    /// The transfer plan has no defined cost or placement.
    #[error("transfer plan is not valid: {reason}")]
    InvalidPlan { reason: String },

    /// Raised when a vessel name could not be found in the universe.
    #[error("unknown vessel: {name}{}", format_suggestions(.suggestions))]
    UnknownVessel {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a body reference could not be resolved.
    #[error("unknown body: {name}")]
    UnknownBody { name: String },

    /// Raised when a vessel carries no hailer.
    #[error("vessel {vessel} has no hailer")]
    NoHailer { vessel: String },

    /// Raised when scenario data fails validation.
    #[error("invalid scenario: {message}")]
    ScenarioValidation { message: String },

    /// Raised when the resource catalog fails validation.
    #[error("invalid resource catalog: {message}")]
    ResourceCatalog { message: String },

    /// Raised when a duplicate resource is encountered during catalog load.
    #[error("duplicate resource name encountered: {name}")]
    DuplicateResource { name: String },

    /// Raised when engine configuration values are out of range.
    #[error("invalid engine configuration: {message}")]
    InvalidConfig { message: String },

    /// Raised when a scenario file could not be found.
    #[error("scenario not found at {path}")]
    ScenarioNotFound { path: PathBuf },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
