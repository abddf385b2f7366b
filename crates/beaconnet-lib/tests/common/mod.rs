//! Common test utilities and scenario builders.
//!
//! The standard scenario places a crewed shuttle in low Kerbin orbit next to
//! an active LB15 relay, with two out-of-range destinations: an LB10 gate
//! orbiting the Mun and an LB100 beacon on the far side of Kerbin.

use std::path::PathBuf;

use beaconnet_lib::beacon::{self, Beacon, BeaconModel, BeaconRef, BeaconState};
use beaconnet_lib::capability::{Capability, Techbox};
use beaconnet_lib::geometry::Vec3;
use beaconnet_lib::universe::Universe;
use beaconnet_lib::vessel::{Part, PartModule, PartResource, Situation, Vessel, VesselId};
use beaconnet_lib::CelestialBody;

pub const SHUTTLE: VesselId = 1;
pub const RELAY: VesselId = 2;
pub const GATE: VesselId = 3;
pub const FAR_SIDE: VesselId = 4;

#[allow(dead_code)]
pub const RELAY_BEACON: BeaconRef = BeaconRef {
    vessel: RELAY,
    part: 0,
};

/// Path to fixtures directory shared with the CLI tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn kerbin() -> CelestialBody {
    CelestialBody {
        name: "Kerbin".to_string(),
        mass_kg: 5.2915158e22,
        radius_m: 600_000.0,
        position: Vec3::ZERO,
        orbital_velocity: Vec3::ZERO,
        parent: None,
    }
}

pub fn mun() -> CelestialBody {
    CelestialBody {
        name: "Mun".to_string(),
        mass_kg: 9.7599066e20,
        radius_m: 200_000.0,
        position: Vec3::new(1.2e7, 0.0, 0.0),
        orbital_velocity: Vec3::new(0.0, 543.0, 0.0),
        parent: Some(0),
    }
}

#[allow(dead_code)]
pub fn minmus() -> CelestialBody {
    CelestialBody {
        name: "Minmus".to_string(),
        mass_kg: 2.645758e19,
        radius_m: 60_000.0,
        position: Vec3::ZERO,
        orbital_velocity: Vec3::ZERO,
        parent: None,
    }
}

pub fn resource(name: &str, amount: f64) -> PartResource {
    PartResource {
        name: name.to_string(),
        amount,
        max_amount: amount.max(1.0),
    }
}

/// Beacon part with its own fuel and charge stores.
pub fn beacon_part(model: BeaconModel, state: BeaconState, fuel: f64, charge: f64) -> Part {
    let mut beacon = Beacon::new(model);
    beacon.state = state;
    Part {
        name: format!("{model} beacon"),
        dry_mass_t: 1.0,
        crew: Vec::new(),
        resources: vec![
            resource("Karborundum", fuel),
            resource("ElectricCharge", charge),
        ],
        modules: vec![PartModule::Beacon(beacon)],
    }
}

pub fn vessel(id: VesselId, name: &str, main_body: usize, position: Vec3, velocity: Vec3) -> Vessel {
    Vessel {
        id,
        name: name.to_string(),
        main_body,
        position,
        orbital_velocity: velocity,
        situation: Situation::Orbiting,
        loaded: true,
        parts: Vec::new(),
        proto_modules: Vec::new(),
    }
}

/// Two-tonne capsule with one crew member and a hailer.
pub fn shuttle() -> Vessel {
    Vessel {
        parts: vec![Part {
            name: "capsule".to_string(),
            dry_mass_t: 2.0,
            crew: vec!["Jebediah Kerman".to_string()],
            resources: Vec::new(),
            modules: vec![PartModule::Hailer],
        }],
        ..vessel(
            SHUTTLE,
            "Shuttle",
            0,
            Vec3::new(5.6e6, 0.0, 0.0),
            Vec3::new(0.0, 2300.0, 0.0),
        )
    }
}

/// The standard scenario with every beacon refreshed and the far vessels
/// already out of range.
pub fn scenario() -> Universe {
    let relay = Vessel {
        parts: vec![beacon_part(BeaconModel::Medium, BeaconState::Active, 1000.0, 5000.0)],
        ..vessel(
            RELAY,
            "Relay One",
            0,
            Vec3::new(5.6e6, 400.0, 0.0),
            Vec3::new(0.0, 2300.0, 0.0),
        )
    };
    let gate = Vessel {
        parts: vec![beacon_part(BeaconModel::Small, BeaconState::Active, 200.0, 1000.0)],
        ..vessel(
            GATE,
            "Mun Gate",
            1,
            Vec3::new(1.2e7, 1e6, 0.0),
            Vec3::new(-255.0, 0.0, 0.0),
        )
    };
    let far_side = Vessel {
        parts: vec![beacon_part(BeaconModel::Large, BeaconState::Active, 50.0, 1000.0)],
        ..vessel(
            FAR_SIDE,
            "Far Side",
            0,
            Vec3::new(-8e6, 0.0, 0.0),
            Vec3::new(0.0, -2200.0, 0.0),
        )
    };

    let mut universe =
        Universe::new(vec![kerbin(), mun()], vec![shuttle(), relay, gate, far_side])
            .expect("valid scenario");
    universe.active_vessel = Some(SHUTTLE);
    for at in universe.beacon_refs() {
        beacon::state::refresh(&mut universe, at).expect("refresh beacon");
    }
    universe.set_loaded(GATE, false).expect("gate exists");
    universe.set_loaded(FAR_SIDE, false).expect("far side exists");
    universe
}

/// Add a tank of enriched uranium to the shuttle.
#[allow(dead_code)]
pub fn add_hazard_tank(universe: &mut Universe) {
    let shuttle = universe.vessel_mut(SHUTTLE).expect("shuttle exists");
    shuttle.parts.push(Part {
        name: "uranium tank".to_string(),
        dry_mass_t: 0.5,
        crew: Vec::new(),
        resources: vec![resource("EnrichedUranium", 100.0)],
        modules: Vec::new(),
    });
}

/// Install an activated techbox on the relay and refresh its beacon.
#[allow(dead_code)]
pub fn install_relay_techbox(universe: &mut Universe, capability: Capability) {
    let mut techbox = Techbox::new(capability);
    techbox.activate();
    let relay = universe.vessel_mut(RELAY).expect("relay exists");
    relay.parts.push(Part {
        name: format!("{capability} techbox"),
        dry_mass_t: 0.2,
        crew: Vec::new(),
        resources: Vec::new(),
        modules: vec![PartModule::Techbox(techbox)],
    });
    beacon::state::refresh(universe, RELAY_BEACON).expect("refresh relay");
}
