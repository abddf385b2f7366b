//! Vessels, their parts and the persisted module snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::beacon::Beacon;
use crate::body::BodyId;
use crate::capability::Techbox;
use crate::config::EngineConfig;
use crate::geometry::Vec3;
use crate::resources::ResourceCatalog;

/// Stable vessel identifier.
pub type VesselId = u32;

/// Flight situation of a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Situation {
    Landed,
    Flying,
    #[default]
    Orbiting,
    Escaping,
}

/// Quantity of one resource held in a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartResource {
    pub name: String,
    pub amount: f64,
    pub max_amount: f64,
}

/// Functional module attached to a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "module", rename_all = "snake_case")]
pub enum PartModule {
    Beacon(Beacon),
    Techbox(Techbox),
    /// Transit console; its runtime state lives in [`crate::hailer::Hailer`].
    Hailer,
}

/// One part of a vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    #[serde(default)]
    pub dry_mass_t: f64,
    #[serde(default)]
    pub crew: Vec<String>,
    #[serde(default)]
    pub resources: Vec<PartResource>,
    #[serde(default)]
    pub modules: Vec<PartModule>,
}

impl Part {
    pub fn beacon(&self) -> Option<&Beacon> {
        self.modules.iter().find_map(|m| match m {
            PartModule::Beacon(b) => Some(b),
            _ => None,
        })
    }

    pub fn beacon_mut(&mut self) -> Option<&mut Beacon> {
        self.modules.iter_mut().find_map(|m| match m {
            PartModule::Beacon(b) => Some(b),
            _ => None,
        })
    }

    pub fn techboxes(&self) -> impl Iterator<Item = &Techbox> {
        self.modules.iter().filter_map(|m| match m {
            PartModule::Techbox(t) => Some(t),
            _ => None,
        })
    }

    pub fn techbox_mut(&mut self) -> Option<&mut Techbox> {
        self.modules.iter_mut().find_map(|m| match m {
            PartModule::Techbox(t) => Some(t),
            _ => None,
        })
    }

    pub fn resource_amount(&self, resource: &str) -> f64 {
        self.resources
            .iter()
            .filter(|r| r.name == resource)
            .map(|r| r.amount)
            .sum()
    }

    pub fn mass_t(&self, catalog: &ResourceCatalog) -> f64 {
        self.dry_mass_t
            + self
                .resources
                .iter()
                .map(|r| r.amount * catalog.density(&r.name))
                .sum::<f64>()
    }
}

/// Serialized state of one part module, read as plain key/value strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModuleSnapshot {
    pub module_name: String,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// A part carrying high-energy cargo that destabilizes without shielding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardousPart {
    pub part: usize,
    pub part_name: String,
    pub resource: String,
    pub amount: f64,
    pub density: f64,
}

/// A vehicle: the unit that owns beacons, techboxes and hailers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub id: VesselId,
    pub name: String,
    /// Body whose frame the orbital velocity is expressed in.
    pub main_body: BodyId,
    /// World-frame position.
    pub position: Vec3,
    /// Velocity relative to `main_body`.
    #[serde(default)]
    pub orbital_velocity: Vec3,
    #[serde(default)]
    pub situation: Situation,
    /// Whether the vessel is inside live-simulation range.
    #[serde(default)]
    pub loaded: bool,
    #[serde(default)]
    pub parts: Vec<Part>,
    /// Module state captured when the vessel last left live range.
    #[serde(default)]
    pub proto_modules: Vec<ModuleSnapshot>,
}

impl Vessel {
    /// Every beacon aboard with the index of its part.
    pub fn beacons(&self) -> impl Iterator<Item = (usize, &Beacon)> {
        self.parts
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.beacon().map(|b| (i, b)))
    }

    pub fn techboxes(&self) -> impl Iterator<Item = &Techbox> {
        self.parts.iter().flat_map(Part::techboxes)
    }

    pub fn has_hailer(&self) -> bool {
        self.parts
            .iter()
            .any(|p| p.modules.iter().any(|m| matches!(m, PartModule::Hailer)))
    }

    pub fn crew(&self) -> impl Iterator<Item = &str> {
        self.parts
            .iter()
            .flat_map(|p| p.crew.iter().map(String::as_str))
    }

    pub fn crew_count(&self) -> usize {
        self.parts.iter().map(|p| p.crew.len()).sum()
    }

    pub fn resource_amount(&self, resource: &str) -> f64 {
        self.parts.iter().map(|p| p.resource_amount(resource)).sum()
    }

    /// Total mass in tonnes.
    pub fn mass_t(&self, catalog: &ResourceCatalog) -> f64 {
        self.parts.iter().map(|p| p.mass_t(catalog)).sum()
    }

    /// Parts holding a non-empty high-energy resource. Each part is listed
    /// once, under the first matching resource.
    pub fn hazardous_parts(
        &self,
        config: &EngineConfig,
        catalog: &ResourceCatalog,
    ) -> Vec<HazardousPart> {
        self.parts
            .iter()
            .enumerate()
            .filter_map(|(i, part)| {
                part.resources
                    .iter()
                    .find(|r| r.amount > 0.0 && config.is_hazardous_resource(&r.name))
                    .map(|r| HazardousPart {
                        part: i,
                        part_name: part.name.clone(),
                        resource: r.name.clone(),
                        amount: r.amount,
                        density: catalog.density(&r.name),
                    })
            })
            .collect()
    }

    /// Serialize every beacon module for consumption while out of range.
    pub fn capture_snapshot(&self) -> Vec<ModuleSnapshot> {
        self.beacons().map(|(_, b)| b.snapshot()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beacon::BeaconModel;
    use crate::capability::Capability;

    fn part(name: &str, resources: &[(&str, f64)]) -> Part {
        Part {
            name: name.to_string(),
            dry_mass_t: 1.0,
            crew: Vec::new(),
            resources: resources
                .iter()
                .map(|&(n, a)| PartResource {
                    name: n.to_string(),
                    amount: a,
                    max_amount: a,
                })
                .collect(),
            modules: Vec::new(),
        }
    }

    fn vessel(parts: Vec<Part>) -> Vessel {
        Vessel {
            id: 1,
            name: "Test".to_string(),
            main_body: 0,
            position: Vec3::ZERO,
            orbital_velocity: Vec3::ZERO,
            situation: Situation::Orbiting,
            loaded: true,
            parts,
            proto_modules: Vec::new(),
        }
    }

    #[test]
    fn hazardous_parts_are_listed_once() {
        let config = EngineConfig::default();
        let catalog = ResourceCatalog::builtin().expect("catalog");
        let v = vessel(vec![
            part("reactor", &[("EnrichedUranium", 5.0), ("Karborundum", 2.0)]),
            part("tank", &[("LiquidFuel", 100.0)]),
            part("empty", &[("Karborundum", 0.0)]),
        ]);
        let hazards = v.hazardous_parts(&config, &catalog);
        assert_eq!(hazards.len(), 1);
        assert_eq!(hazards[0].part, 0);
        assert_eq!(hazards[0].resource, "EnrichedUranium");
    }

    #[test]
    fn mass_includes_resources() {
        let catalog = ResourceCatalog::builtin().expect("catalog");
        let v = vessel(vec![part("tank", &[("LiquidFuel", 200.0)])]);
        assert!((v.mass_t(&catalog) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn snapshot_captures_each_beacon() {
        let mut p = part("beacon", &[]);
        p.modules.push(PartModule::Beacon(Beacon::new(BeaconModel::Large)));
        p.modules
            .push(PartModule::Techbox(Techbox::new(Capability::Amu)));
        let v = vessel(vec![p]);
        assert_eq!(v.capture_snapshot().len(), 1);
        assert_eq!(v.techboxes().count(), 1);
    }
}
