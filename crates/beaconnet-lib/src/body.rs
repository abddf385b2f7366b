//! Celestial bodies, gravity sampling and altitude floors.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;

/// Index of a body inside the universe's body list. The root body is `0`.
pub type BodyId = usize;

/// Gravitational constant used by every gravity calculation (m³ kg⁻¹ s⁻²).
pub const GRAVITATIONAL_CONSTANT: f64 = 6.673e-11;

/// A massive body: a star, planet or moon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    pub name: String,
    pub mass_kg: f64,
    pub radius_m: f64,
    /// World-frame position of the body's center.
    pub position: Vec3,
    /// Velocity relative to the parent body; ignored for the root.
    #[serde(default)]
    pub orbital_velocity: Vec3,
    /// Parent body the orbit is expressed against; `None` for the root.
    #[serde(default)]
    pub parent: Option<BodyId>,
}

impl CelestialBody {
    /// `G·M`, the standard gravitational parameter.
    pub fn gravitational_parameter(&self) -> f64 {
        GRAVITATIONAL_CONSTANT * self.mass_kg
    }

    /// Gravitational acceleration vector this body exerts at `position`.
    pub fn acceleration_at(&self, position: Vec3) -> Vec3 {
        let offset = self.position - position;
        let r2 = offset.length_squared();
        if r2 == 0.0 {
            return Vec3::ZERO;
        }
        offset.normalized() * (self.gravitational_parameter() / r2)
    }

    /// Altitude above the surface for a world-frame position.
    pub fn altitude_of(&self, position: Vec3) -> f64 {
        position.distance_to(self.position) - self.radius_m
    }

    /// Definite article used in operator-facing messages ("the Mun").
    pub fn display_name(&self) -> String {
        match self.name.as_str() {
            "Mun" | "Sun" => format!("the {}", self.name),
            _ => self.name.clone(),
        }
    }
}

/// Magnitude of the summed gravitational acceleration at `position`.
pub fn gravity_at(bodies: &[CelestialBody], position: Vec3) -> f64 {
    bodies
        .iter()
        .fold(Vec3::ZERO, |acc, body| acc + body.acceleration_at(position))
        .length()
}

/// Body exerting the strongest pull at `position`.
pub fn dominant_body(bodies: &[CelestialBody], position: Vec3) -> Option<BodyId> {
    bodies
        .iter()
        .enumerate()
        .map(|(id, body)| (id, body.acceleration_at(position).length()))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Lowest altitude (meters) at which a device with `gravity_limit` can operate
/// around `body`: `max(0.25·R, sqrt(G·M/g) − R)`.
pub fn find_acceptable_altitude(body: &CelestialBody, gravity_limit: f64) -> f64 {
    let gravity_radius = (body.gravitational_parameter() / gravity_limit).sqrt() - body.radius_m;
    gravity_radius.max(body.radius_m * 0.25)
}

/// Operational floor in kilometers as shown to the operator.
pub fn operational_floor_km(body: &CelestialBody, gravity_limit: f64) -> f64 {
    find_acceptable_altitude(body, gravity_limit).round() / 1000.0
}

/// Velocity of `body`'s frame relative to the root: its own orbital velocity
/// plus every ancestor's. The root contributes nothing.
pub fn frame_velocity(bodies: &[CelestialBody], body: BodyId) -> Vec3 {
    let mut velocity = Vec3::ZERO;
    let mut current = Some(body);
    // Depth bound guards against a malformed parent cycle.
    let mut remaining = bodies.len();
    while let Some(id) = current {
        let Some(b) = bodies.get(id) else { break };
        let Some(parent) = b.parent else { break };
        velocity += b.orbital_velocity;
        current = Some(parent);
        remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            break;
        }
    }
    velocity
}
