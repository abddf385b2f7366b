//! Arrival kinematics: jump offset, arrival velocity and dispersion.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::beacon::BeaconModel;
use crate::body::{self, BodyId, CelestialBody};
use crate::capability::{Capability, CapabilitySet};
use crate::geometry::Vec3;
use crate::vessel::Vessel;

/// Where an endpoint orbits and how fast it moves relative to that body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub main_body: BodyId,
    pub orbital_velocity: Vec3,
}

impl Endpoint {
    pub fn of_vessel(vessel: &Vessel) -> Self {
        Self {
            main_body: vessel.main_body,
            orbital_velocity: vessel.orbital_velocity,
        }
    }

    /// Velocity relative to the root body: own orbital velocity plus every
    /// ancestor body's.
    pub fn frame_velocity(&self, bodies: &[CelestialBody]) -> Vec3 {
        self.orbital_velocity + body::frame_velocity(bodies, self.main_body)
    }
}

/// `origin frame velocity − destination frame velocity`.
pub fn jump_offset(bodies: &[CelestialBody], origin: Endpoint, destination: Endpoint) -> Vec3 {
    origin.frame_velocity(bodies) - destination.frame_velocity(bodies)
}

/// Jump offset as produced by an origin beacon of `model`. Small beacons
/// ignore the destination's own orbital velocity and only subtract its
/// ancestors' frame.
pub fn jump_offset_for_model(
    bodies: &[CelestialBody],
    origin: Endpoint,
    destination: Endpoint,
    model: BeaconModel,
) -> Vec3 {
    let offset = jump_offset(bodies, origin, destination);
    match model {
        BeaconModel::Small => offset + destination.orbital_velocity,
        _ => offset,
    }
}

/// Velocity mismatch the inertial upgrade absorbs.
pub fn compensation(offset: Vec3, destination: Endpoint) -> f64 {
    (offset - destination.orbital_velocity).length()
}

/// Post-jump velocity in the destination body's frame.
pub fn arrival_velocity(offset: Vec3, destination: Endpoint, capabilities: CapabilitySet) -> Vec3 {
    if capabilities.contains(Capability::Amu) {
        destination.orbital_velocity
    } else {
        offset
    }
}

/// Uniform point on the unit sphere.
pub fn on_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = sample_cube(rng);
        let len2 = p.length_squared();
        if len2 > 1e-12 && len2 <= 1.0 {
            return p / len2.sqrt();
        }
    }
}

/// Uniform point inside the unit ball.
pub fn inside_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = sample_cube(rng);
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}

fn sample_cube<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
    )
}

/// Random arrival offset `((onUnitSphere + insideUnitSphere) / 2) · spread`;
/// its length never exceeds `spread`.
pub fn dispersion_offset<R: Rng + ?Sized>(rng: &mut R, spread: f64) -> Vec3 {
    let surface = on_unit_sphere(rng);
    let interior = inside_unit_sphere(rng);
    (surface + interior) / 2.0 * spread
}
