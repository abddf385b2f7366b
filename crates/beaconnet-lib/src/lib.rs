//! Beaconnet library entry points.
//!
//! This crate models a network of transit beacons: devices that, once
//! powered, let a nearby vessel jump to any other active beacon. It covers
//! beacon activation and upkeep, the transfer cost model, path feasibility
//! against massive bodies, discovery of near and far beacons and the commit
//! step that pays for and performs a jump. Front-ends (the CLI) should only
//! depend on the items exported here instead of reimplementing behavior.

#![deny(warnings)]

pub mod beacon;
pub mod body;
pub mod capability;
pub mod config;
pub mod environment;
pub mod error;
pub mod feasibility;
pub mod geometry;
pub mod hailer;
pub mod registry;
pub mod resources;
pub mod transit;
pub mod universe;
pub mod vessel;

pub use beacon::{Beacon, BeaconModel, BeaconRef, BeaconState, ShutdownCause, TickReport};
pub use body::{BodyId, CelestialBody};
pub use capability::{Capability, CapabilitySet, Techbox};
pub use config::EngineConfig;
pub use environment::{GravityOracle, OrbitPrimitive, ResourceLedger, SnapshotReader};
pub use error::{Error, Result};
pub use feasibility::{check_path, ObstructionKind, PathVerdict};
pub use geometry::Vec3;
pub use hailer::{Destination, DestinationStatus, Hailer};
pub use registry::{list_far, scan_near, BeaconView, FarTarget, NearBeacon, NearPresence};
pub use resources::ResourceCatalog;
pub use transit::{commit, plan_transfer, JumpOutcome, JumpRequest, JumpWarning, TransferPlan};
pub use universe::Universe;
pub use vessel::{Part, Situation, Vessel, VesselId};
