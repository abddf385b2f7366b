//! Collaborator interfaces the engine consumes from its host environment.
//!
//! The engine never propagates orbits or stores resources itself. It reads
//! gravity and positions through [`GravityOracle`], moves vessels through
//! [`OrbitPrimitive`], pays through [`ResourceLedger`] and reads distant
//! vessels through [`SnapshotReader`]. [`crate::universe::Universe`] is the
//! in-memory implementation used by the CLI and the tests.

use crate::body::BodyId;
use crate::error::Result;
use crate::geometry::Vec3;
use crate::vessel::{ModuleSnapshot, VesselId};

/// Authoritative placement of a vessel after a transfer.
pub trait OrbitPrimitive {
    /// Place `vessel` at `position` (relative to `reference_body`) moving with
    /// `velocity` in that body's frame, as of `epoch`.
    fn set_state(
        &mut self,
        vessel: VesselId,
        position: Vec3,
        velocity: Vec3,
        reference_body: BodyId,
        epoch: f64,
    ) -> Result<()>;
}

/// Resource accounting for vessels.
pub trait ResourceLedger {
    /// Total quantity of `resource` aboard `vessel`.
    fn query(&self, vessel: VesselId, resource: &str) -> f64;

    /// Remove `amount` of `resource`. All-or-nothing: returns `false` and
    /// leaves every tank untouched when the full amount is not available.
    fn debit(&mut self, vessel: VesselId, resource: &str, amount: f64) -> bool;

    /// Whether `amount` could be debited right now, without debiting it.
    fn available(&self, vessel: VesselId, resource: &str, amount: f64) -> bool {
        self.query(vessel, resource) >= amount
    }
}

/// Read-only access to serialized module state of out-of-range vessels.
pub trait SnapshotReader {
    fn read_field<'a>(&self, snapshot: &'a ModuleSnapshot, field: &str) -> Option<&'a str>;
}

/// Gravity and position sampling.
pub trait GravityOracle {
    /// Magnitude of the gravitational acceleration at a world position.
    fn gravity_at(&self, position: Vec3) -> f64;

    /// World position of a vessel, if it exists.
    fn position(&self, vessel: VesselId) -> Option<Vec3>;
}

/// Plain key/value snapshot reader with no host-specific decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainSnapshots;

impl SnapshotReader for PlainSnapshots {
    fn read_field<'a>(&self, snapshot: &'a ModuleSnapshot, field: &str) -> Option<&'a str> {
        snapshot.values.get(field).map(String::as_str)
    }
}
