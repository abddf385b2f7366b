//! In-memory universe: bodies, vessels, the resource catalog and the clock.
//!
//! `Universe` is the host environment the CLI and the tests run the engine
//! against. It implements every collaborator trait in
//! [`crate::environment`] and is loaded from a JSON scenario file.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::beacon::{self, Beacon, BeaconRef, TickReport};
use crate::body::{self, BodyId, CelestialBody};
use crate::config::EngineConfig;
use crate::environment::{GravityOracle, OrbitPrimitive, ResourceLedger, SnapshotReader};
use crate::error::{Error, Result};
use crate::geometry::Vec3;
use crate::resources::ResourceCatalog;
use crate::vessel::{ModuleSnapshot, Part, Situation, Vessel, VesselId};

/// Minimum Jaro-Winkler similarity for a vessel name to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Complete simulated environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Universe {
    /// Current simulation time in seconds.
    #[serde(default)]
    pub epoch: f64,
    pub bodies: Vec<CelestialBody>,
    #[serde(default)]
    pub vessels: Vec<Vessel>,
    /// Vessel under direct operator control.
    #[serde(default)]
    pub active_vessel: Option<VesselId>,
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(skip)]
    catalog: ResourceCatalog,
}

impl Universe {
    /// Build a universe directly from its parts.
    pub fn new(bodies: Vec<CelestialBody>, vessels: Vec<Vessel>) -> Result<Self> {
        let universe = Self {
            epoch: 0.0,
            bodies,
            vessels,
            active_vessel: None,
            config: EngineConfig::default(),
            catalog: ResourceCatalog::builtin()?,
        };
        universe.validate()?;
        Ok(universe)
    }

    /// Load a scenario file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ScenarioNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = fs::File::open(path)?;
        let universe = Self::from_reader(file)?;
        debug!(
            path = %path.display(),
            bodies = universe.bodies.len(),
            vessels = universe.vessels.len(),
            "loaded scenario"
        );
        Ok(universe)
    }

    /// Parse a scenario from any JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut universe: Universe = serde_json::from_reader(reader)?;
        universe.catalog = ResourceCatalog::builtin()?;
        universe.validate()?;
        Ok(universe)
    }

    /// Write the scenario as pretty-printed JSON.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Check referential integrity of the scenario.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;

        if self.bodies.is_empty() {
            return Err(Error::ScenarioValidation {
                message: "scenario must define at least one body".to_string(),
            });
        }
        for (id, b) in self.bodies.iter().enumerate() {
            if !(b.mass_kg.is_finite() && b.mass_kg > 0.0) {
                return Err(Error::ScenarioValidation {
                    message: format!("body '{}' must have a positive mass", b.name),
                });
            }
            if !(b.radius_m.is_finite() && b.radius_m > 0.0) {
                return Err(Error::ScenarioValidation {
                    message: format!("body '{}' must have a positive radius", b.name),
                });
            }
            if let Some(parent) = b.parent {
                if parent == id || parent >= self.bodies.len() {
                    return Err(Error::ScenarioValidation {
                        message: format!("body '{}' has invalid parent {parent}", b.name),
                    });
                }
            }
        }

        let mut seen = std::collections::HashSet::new();
        for v in &self.vessels {
            if !seen.insert(v.id) {
                return Err(Error::ScenarioValidation {
                    message: format!("duplicate vessel id {}", v.id),
                });
            }
            if v.main_body >= self.bodies.len() {
                return Err(Error::ScenarioValidation {
                    message: format!("vessel '{}' orbits unknown body {}", v.name, v.main_body),
                });
            }
            if !v.position.is_finite() {
                return Err(Error::ScenarioValidation {
                    message: format!("vessel '{}' has a non-finite position", v.name),
                });
            }
        }

        if let Some(active) = self.active_vessel {
            if !seen.contains(&active) {
                return Err(Error::ScenarioValidation {
                    message: format!("active vessel {active} does not exist"),
                });
            }
        }
        Ok(())
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    /// Replace the resource catalog (e.g. with one loaded from disk).
    pub fn set_catalog(&mut self, catalog: ResourceCatalog) {
        self.catalog = catalog;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn body(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id)
    }

    /// Look up a body by name (case-insensitive).
    pub fn body_by_name(&self, name: &str) -> Result<BodyId> {
        self.bodies
            .iter()
            .position(|b| b.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| Error::UnknownBody {
                name: name.to_string(),
            })
    }

    pub fn vessel(&self, id: VesselId) -> Option<&Vessel> {
        self.vessels.iter().find(|v| v.id == id)
    }

    pub fn vessel_mut(&mut self, id: VesselId) -> Option<&mut Vessel> {
        self.vessels.iter_mut().find(|v| v.id == id)
    }

    /// Resolve a vessel by exact name, falling back to fuzzy suggestions.
    pub fn vessel_by_name(&self, name: &str) -> Result<&Vessel> {
        let trimmed = name.trim();
        self.vessels
            .iter()
            .find(|v| v.name == trimmed)
            .or_else(|| {
                self.vessels
                    .iter()
                    .find(|v| v.name.eq_ignore_ascii_case(trimmed))
            })
            .ok_or_else(|| Error::UnknownVessel {
                name: name.to_string(),
                suggestions: self.fuzzy_vessel_matches(trimmed, 3),
            })
    }

    /// Vessel names similar to `name`, best match first.
    pub fn fuzzy_vessel_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .vessels
            .iter()
            .map(|v| (strsim::jaro_winkler(&needle, &v.name.to_lowercase()), v.name.as_str()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, n)| n.to_string())
            .collect()
    }

    fn vessel_or_err(&self, id: VesselId) -> Result<&Vessel> {
        self.vessel(id).ok_or_else(|| Error::UnknownVessel {
            name: id.to_string(),
            suggestions: Vec::new(),
        })
    }

    pub fn beacon(&self, at: BeaconRef) -> Result<&Beacon> {
        let vessel = self.vessel_or_err(at.vessel)?;
        vessel
            .parts
            .get(at.part)
            .and_then(Part::beacon)
            .ok_or_else(|| Error::UnknownBeacon {
                vessel: vessel.name.clone(),
                part: at.part,
            })
    }

    pub fn beacon_mut(&mut self, at: BeaconRef) -> Result<&mut Beacon> {
        let vessel = self.vessel_mut(at.vessel).ok_or_else(|| Error::UnknownVessel {
            name: at.vessel.to_string(),
            suggestions: Vec::new(),
        })?;
        let name = vessel.name.clone();
        vessel
            .parts
            .get_mut(at.part)
            .and_then(Part::beacon_mut)
            .ok_or(Error::UnknownBeacon {
                vessel: name,
                part: at.part,
            })
    }

    /// Every beacon in the universe, loaded or not.
    pub fn beacon_refs(&self) -> Vec<BeaconRef> {
        self.vessels
            .iter()
            .flat_map(|v| {
                v.beacons().map(move |(part, _)| BeaconRef {
                    vessel: v.id,
                    part,
                })
            })
            .collect()
    }

    /// Altitude of a vessel above its main body's surface.
    pub fn altitude(&self, vessel: &Vessel) -> f64 {
        self.body(vessel.main_body)
            .map(|b| b.altitude_of(vessel.position))
            .unwrap_or(f64::INFINITY)
    }

    /// Velocity of a vessel relative to the root body's frame.
    pub fn frame_velocity(&self, vessel: &Vessel) -> Vec3 {
        vessel.orbital_velocity + body::frame_velocity(&self.bodies, vessel.main_body)
    }

    /// Move a vessel in or out of live-simulation range. Leaving range
    /// captures the snapshot distant readers will see.
    pub fn set_loaded(&mut self, id: VesselId, loaded: bool) -> Result<()> {
        let vessel = self.vessel_mut(id).ok_or_else(|| Error::UnknownVessel {
            name: id.to_string(),
            suggestions: Vec::new(),
        })?;
        if vessel.loaded && !loaded {
            vessel.proto_modules = vessel.capture_snapshot();
            debug!(vessel = %vessel.name, modules = vessel.proto_modules.len(), "vessel unloaded");
        }
        vessel.loaded = loaded;
        Ok(())
    }

    /// Remove every crew member aboard, returning their names.
    pub fn remove_crew(&mut self, id: VesselId) -> Vec<String> {
        let Some(vessel) = self.vessel_mut(id) else {
            return Vec::new();
        };
        vessel
            .parts
            .iter_mut()
            .flat_map(|p| std::mem::take(&mut p.crew))
            .collect()
    }

    /// Destroy the parts at `indices`, returning the removed parts.
    pub fn destroy_parts(&mut self, id: VesselId, indices: &[usize]) -> Vec<Part> {
        let Some(vessel) = self.vessel_mut(id) else {
            return Vec::new();
        };
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        // Highest index first so earlier indices stay valid.
        let mut removed = Vec::with_capacity(sorted.len());
        for i in sorted.into_iter().rev() {
            if i < vessel.parts.len() {
                removed.push(vessel.parts.remove(i));
            }
        }
        removed
    }

    /// Toggle the techbox on part `part` and re-aggregate every beacon aboard.
    pub fn set_techbox(&mut self, id: VesselId, part: usize, activated: bool) -> Result<()> {
        let vessel = self.vessel_mut(id).ok_or_else(|| Error::UnknownVessel {
            name: id.to_string(),
            suggestions: Vec::new(),
        })?;
        let name = vessel.name.clone();
        let techbox = vessel
            .parts
            .get_mut(part)
            .and_then(Part::techbox_mut)
            .ok_or_else(|| Error::ScenarioValidation {
                message: format!("vessel '{name}' has no techbox on part {part}"),
            })?;
        if activated {
            techbox.activate();
        } else {
            techbox.deactivate();
        }
        info!(vessel = %name, part, status = %techbox.status(), "techbox toggled");

        let beacons: Vec<BeaconRef> = self
            .vessel(id)
            .map(|v| {
                v.beacons()
                    .map(|(part, _)| BeaconRef { vessel: id, part })
                    .collect()
            })
            .unwrap_or_default();
        for at in beacons {
            beacon::state::refresh(self, at)?;
        }
        Ok(())
    }

    /// Advance the clock by `dt` seconds and tick every live beacon.
    pub fn fixed_tick(&mut self, dt: f64) -> Result<Vec<TickReport>> {
        self.epoch += dt;
        let live: Vec<BeaconRef> = self
            .vessels
            .iter()
            .filter(|v| v.loaded)
            .flat_map(|v| {
                v.beacons().map(move |(part, _)| BeaconRef {
                    vessel: v.id,
                    part,
                })
            })
            .collect();

        let mut reports = Vec::with_capacity(live.len());
        for at in live {
            reports.push(beacon::tick(self, at, dt)?);
        }
        Ok(reports)
    }
}

impl GravityOracle for Universe {
    fn gravity_at(&self, position: Vec3) -> f64 {
        body::gravity_at(&self.bodies, position)
    }

    fn position(&self, vessel: VesselId) -> Option<Vec3> {
        self.vessel(vessel).map(|v| v.position)
    }
}

impl ResourceLedger for Universe {
    fn query(&self, vessel: VesselId, resource: &str) -> f64 {
        self.vessel(vessel)
            .map(|v| v.resource_amount(resource))
            .unwrap_or(0.0)
    }

    fn debit(&mut self, vessel: VesselId, resource: &str, amount: f64) -> bool {
        if !self.available(vessel, resource, amount) {
            return false;
        }
        let Some(v) = self.vessel_mut(vessel) else {
            return false;
        };
        let mut remaining = amount;
        for res in v
            .parts
            .iter_mut()
            .flat_map(|p| p.resources.iter_mut())
            .filter(|r| r.name == resource && r.amount > 0.0)
        {
            if remaining <= 0.0 {
                break;
            }
            let draw = res.amount.min(remaining);
            res.amount -= draw;
            remaining -= draw;
        }
        true
    }

    /// Unloaded vessels never report resources as available.
    fn available(&self, vessel: VesselId, resource: &str, amount: f64) -> bool {
        match self.vessel(vessel) {
            Some(v) if v.loaded => v.resource_amount(resource) >= amount,
            _ => false,
        }
    }
}

impl SnapshotReader for Universe {
    fn read_field<'a>(&self, snapshot: &'a ModuleSnapshot, field: &str) -> Option<&'a str> {
        snapshot.values.get(field).map(|s| s.trim())
    }
}

impl OrbitPrimitive for Universe {
    fn set_state(
        &mut self,
        vessel: VesselId,
        position: Vec3,
        velocity: Vec3,
        reference_body: BodyId,
        epoch: f64,
    ) -> Result<()> {
        if !position.is_finite() || !velocity.is_finite() {
            return Err(Error::InvalidPlan {
                reason: "placement is not finite".to_string(),
            });
        }
        let origin = self
            .body(reference_body)
            .map(|b| b.position)
            .ok_or_else(|| Error::UnknownBody {
                name: reference_body.to_string(),
            })?;
        let v = self.vessel_mut(vessel).ok_or_else(|| Error::UnknownVessel {
            name: vessel.to_string(),
            suggestions: Vec::new(),
        })?;
        v.position = origin + position;
        v.orbital_velocity = velocity;
        v.main_body = reference_body;
        if v.situation != Situation::Orbiting {
            warn!(vessel = %v.name, from = ?v.situation, "forcing vessel into orbit");
        }
        v.situation = Situation::Orbiting;
        info!(vessel = %v.name, body = reference_body, epoch, "vessel placed");
        Ok(())
    }
}
