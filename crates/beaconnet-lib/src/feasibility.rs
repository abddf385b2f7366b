//! Straight-line path clearance between two beacons.
//!
//! Every body whose center projects onto the origin→destination segment gets
//! an exclusion radius derived from the gravity limit. Clearance needs a
//! lateral offset strictly greater than that radius, so a tie obstructs.
//! Bodies are visited in list order and the first obstruction wins. A clear
//! path still fails when the destination itself sits in gravity above the
//! limit.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::body::{dominant_body, gravity_at, BodyId, CelestialBody};
use crate::geometry::Vec3;

/// Exclusion radii below this multiple of the body radius fall back to the
/// proximity clamp.
const PROXIMITY_TRIGGER: f64 = 1.25;
/// Exclusion radius (as a multiple of the body radius) used by the clamp.
const PROXIMITY_CLEARANCE: f64 = 1.025;

/// Why a path is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstructionKind {
    Gravity,
    Proximity,
}

impl fmt::Display for ObstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObstructionKind::Gravity => f.write_str("gravity"),
            ObstructionKind::Proximity => f.write_str("proximity"),
        }
    }
}

/// Outcome of a path check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "body", rename_all = "snake_case")]
pub enum PathVerdict {
    Ok,
    Gravity(BodyId),
    Proximity(BodyId),
}

impl PathVerdict {
    pub fn is_clear(self) -> bool {
        self == PathVerdict::Ok
    }

    /// Kind and body of the obstruction, if any.
    pub fn obstruction(self) -> Option<(ObstructionKind, BodyId)> {
        match self {
            PathVerdict::Ok => None,
            PathVerdict::Gravity(body) => Some((ObstructionKind::Gravity, body)),
            PathVerdict::Proximity(body) => Some((ObstructionKind::Proximity, body)),
        }
    }
}

/// Exclusion radius around `body` for a device tolerating `gravity_limit`.
pub fn exclusion_radius(body: &CelestialBody, gravity_limit: f64) -> (f64, ObstructionKind) {
    let limbo = (body.gravitational_parameter() / gravity_limit).sqrt() - body.radius_m;
    if limbo < body.radius_m * PROXIMITY_TRIGGER {
        (body.radius_m * PROXIMITY_CLEARANCE, ObstructionKind::Proximity)
    } else {
        (limbo, ObstructionKind::Gravity)
    }
}

/// Check the segment from `origin` to `destination` against every body.
pub fn check_path(
    origin: Vec3,
    destination: Vec3,
    gravity_limit: f64,
    bodies: &[CelestialBody],
) -> PathVerdict {
    let segment = destination - origin;
    let length = segment.length();
    let direction = segment.normalized();

    for (id, body) in bodies.iter().enumerate() {
        let to_body = body.position - origin;
        if to_body.dot(segment) <= 0.0 {
            continue;
        }
        let along = to_body.dot(direction);
        if along >= length {
            continue;
        }
        let lateral = (to_body - direction * along).length();
        let (radius, kind) = exclusion_radius(body, gravity_limit);
        if lateral <= radius {
            trace!(body = %body.name, lateral, radius, %kind, "path obstructed");
            return match kind {
                ObstructionKind::Gravity => PathVerdict::Gravity(id),
                ObstructionKind::Proximity => PathVerdict::Proximity(id),
            };
        }
    }

    if gravity_at(bodies, destination) > gravity_limit {
        if let Some(body) = dominant_body(bodies, destination) {
            return PathVerdict::Gravity(body);
        }
    }
    PathVerdict::Ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(name: &str, mass_kg: f64, radius_m: f64, position: Vec3) -> CelestialBody {
        CelestialBody {
            name: name.to_string(),
            mass_kg,
            radius_m,
            position,
            orbital_velocity: Vec3::ZERO,
            parent: None,
        }
    }

    fn mun(position: Vec3) -> CelestialBody {
        body("Mun", 9.7599066e20, 200_000.0, position)
    }

    #[test]
    fn weak_gravity_body_on_segment_is_proximity() {
        // Generous limit → gravity radius well under 1.25·R.
        let bodies = [mun(Vec3::new(5e6, 0.0, 0.0))];
        let verdict = check_path(Vec3::ZERO, Vec3::new(1e7, 0.0, 0.0), 5.0, &bodies);
        assert_eq!(verdict, PathVerdict::Proximity(0));
    }

    #[test]
    fn strong_gravity_body_on_segment_is_gravity() {
        let bodies = [mun(Vec3::new(5e8, 0.0, 0.0))];
        let verdict = check_path(Vec3::ZERO, Vec3::new(1e9, 0.0, 0.0), 0.01, &bodies);
        assert_eq!(verdict, PathVerdict::Gravity(0));
    }

    #[test]
    fn bodies_behind_or_beyond_are_skipped() {
        let bodies = [
            mun(Vec3::new(-1e6, 0.0, 0.0)),
            mun(Vec3::new(2e7, 0.0, 0.0)),
        ];
        let verdict = check_path(Vec3::ZERO, Vec3::new(1e7, 0.0, 0.0), 5.0, &bodies);
        assert_eq!(verdict, PathVerdict::Ok);
    }

    #[test]
    fn tie_on_clearance_obstructs() {
        let m = mun(Vec3::new(5e6, 0.0, 0.0));
        let (radius, _) = exclusion_radius(&m, 5.0);
        let bodies = [mun(Vec3::new(5e6, radius, 0.0))];
        let verdict = check_path(Vec3::ZERO, Vec3::new(1e7, 0.0, 0.0), 5.0, &bodies);
        assert_eq!(verdict, PathVerdict::Proximity(0));

        let bodies = [mun(Vec3::new(5e6, radius * 1.001, 0.0))];
        let verdict = check_path(Vec3::ZERO, Vec3::new(1e7, 0.0, 0.0), 5.0, &bodies);
        assert_eq!(verdict, PathVerdict::Ok);
    }

    #[test]
    fn first_obstruction_wins() {
        let bodies = [
            mun(Vec3::new(7e6, 0.0, 0.0)),
            mun(Vec3::new(3e6, 0.0, 0.0)),
        ];
        let verdict = check_path(Vec3::ZERO, Vec3::new(1e7, 0.0, 0.0), 5.0, &bodies);
        assert_eq!(verdict, PathVerdict::Proximity(0));
    }

    #[test]
    fn destination_gravity_is_reported_on_clear_path() {
        let bodies = [mun(Vec3::new(0.0, 1e7, 0.0))];
        // Destination just above the Mun's surface: ~1.5 m/s².
        let destination = Vec3::new(0.0, 1e7 - 210_000.0, 0.0);
        let verdict = check_path(Vec3::ZERO, destination, 0.1, &bodies);
        assert_eq!(verdict, PathVerdict::Gravity(0));
    }
}
