mod common;

use beaconnet_lib::beacon::{BeaconModel, BeaconRef, BeaconState};
use beaconnet_lib::capability::Capability;
use beaconnet_lib::environment::ResourceLedger;
use beaconnet_lib::feasibility::ObstructionKind;
use beaconnet_lib::geometry::Vec3;
use beaconnet_lib::transit::{commit, JumpRequest, JumpWarning};
use beaconnet_lib::vessel::Situation;
use beaconnet_lib::Error;
use common::{
    add_hazard_tank, beacon_part, install_relay_techbox, scenario, FAR_SIDE, GATE, RELAY,
    RELAY_BEACON, SHUTTLE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn request(target: u32) -> JumpRequest {
    JumpRequest {
        traveller: SHUTTLE,
        origin: RELAY_BEACON,
        target,
    }
}

#[test]
fn commit_pays_and_places_traveller_near_destination() {
    let mut universe = scenario();
    let mut rng = StdRng::seed_from_u64(7);

    let outcome = commit(&mut universe, request(GATE), &mut rng).expect("jump succeeds");

    // LB15, 2 t over ~6478 km with a 400 m drift: 0.72 base, +4%.
    assert_eq!(outcome.plan.drift_penalty_percent, 4.0);
    assert_eq!(outcome.fuel_spent, 0.74);
    assert_eq!(outcome.plan.spread_radius, 6800.0);
    assert!((universe.query(RELAY, "Karborundum") - 999.26).abs() < 1e-9);

    let shuttle = universe.vessel(SHUTTLE).expect("shuttle");
    let gate = universe.vessel(GATE).expect("gate");
    assert_eq!(shuttle.main_body, 1);
    assert_eq!(shuttle.situation, Situation::Orbiting);
    assert!(shuttle.position.distance_to(gate.position) <= 6800.0);
    // Without inertial matching the traveller keeps its frame velocity.
    assert_eq!(shuttle.orbital_velocity, Vec3::new(255.0, 1757.0, 0.0));
}

#[test]
fn unshielded_commit_kills_crew_and_destroys_hazardous_cargo() {
    let mut universe = scenario();
    add_hazard_tank(&mut universe);
    let mut rng = StdRng::seed_from_u64(11);

    let outcome = commit(&mut universe, request(GATE), &mut rng).expect("jump succeeds");

    assert_eq!(
        outcome.warnings,
        vec![
            JumpWarning::CrewLost {
                name: "Jebediah Kerman".to_string()
            },
            JumpWarning::CargoDestabilized {
                part: "uranium tank".to_string(),
                resource: "EnrichedUranium".to_string()
            },
        ]
    );
    // 3.5 t now: 1.25 base, +4%.
    assert_eq!(outcome.fuel_spent, 1.3);
    let shuttle = universe.vessel(SHUTTLE).expect("shuttle");
    assert_eq!(shuttle.crew_count(), 0);
    assert_eq!(shuttle.parts.len(), 1);
    assert_eq!(shuttle.main_body, 1);
}

#[test]
fn shielded_commit_charges_surcharge_and_keeps_everyone() {
    let mut universe = scenario();
    add_hazard_tank(&mut universe);
    install_relay_techbox(&mut universe, Capability::Hcu);
    let mut rng = StdRng::seed_from_u64(11);

    let outcome = commit(&mut universe, request(GATE), &mut rng).expect("jump succeeds");

    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.plan.shielding_surcharge, 1.68);
    assert_eq!(outcome.fuel_spent, 2.98);
    let shuttle = universe.vessel(SHUTTLE).expect("shuttle");
    assert_eq!(shuttle.crew_count(), 1);
    assert_eq!(shuttle.parts.len(), 2);
}

#[test]
fn inertial_matching_adopts_destination_velocity() {
    let mut universe = scenario();
    install_relay_techbox(&mut universe, Capability::Amu);
    let mut rng = StdRng::seed_from_u64(3);

    let outcome = commit(&mut universe, request(GATE), &mut rng).expect("jump succeeds");

    assert!(outcome.plan.inertial_surcharge > 0.0);
    assert_eq!(outcome.arrival_velocity, Vec3::new(-255.0, 0.0, 0.0));
    let shuttle = universe.vessel(SHUTTLE).expect("shuttle");
    assert_eq!(shuttle.orbital_velocity, Vec3::new(-255.0, 0.0, 0.0));
}

#[test]
fn insufficient_fuel_leaves_universe_untouched() {
    let mut universe = scenario();
    let relay = universe.vessel_mut(RELAY).expect("relay");
    relay.parts[0].resources[0].amount = 0.5;
    let before = universe.vessels.clone();
    let mut rng = StdRng::seed_from_u64(1);

    let err = commit(&mut universe, request(GATE), &mut rng).unwrap_err();

    match err {
        Error::InsufficientFuel {
            required,
            available,
        } => {
            assert_eq!(required, 0.74);
            assert_eq!(available, 0.5);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(universe.vessels, before);
}

#[test]
fn obstructed_path_is_rejected_before_payment() {
    let mut universe = scenario();
    let before = universe.vessels.clone();
    let mut rng = StdRng::seed_from_u64(1);

    let err = commit(&mut universe, request(FAR_SIDE), &mut rng).unwrap_err();

    assert!(matches!(
        err,
        Error::PathObstructed {
            kind: ObstructionKind::Gravity,
            ref body,
        } if body == "Kerbin"
    ));
    assert_eq!(universe.vessels, before);
}

#[test]
fn target_that_came_into_range_is_stale() {
    let mut universe = scenario();
    universe.set_loaded(GATE, true).expect("gate exists");
    let mut rng = StdRng::seed_from_u64(1);

    let err = commit(&mut universe, request(GATE), &mut rng).unwrap_err();
    assert!(matches!(err, Error::StaleTargetVanished { .. }));
    assert_eq!(universe.query(RELAY, "Karborundum"), 1000.0);
}

#[test]
fn offline_origin_cannot_commit() {
    let mut universe = scenario();
    beaconnet_lib::beacon::shutdown(&mut universe, RELAY_BEACON).expect("relay beacon");
    let mut rng = StdRng::seed_from_u64(1);

    let err = commit(&mut universe, request(GATE), &mut rng).unwrap_err();
    assert!(matches!(err, Error::NoNearBeacon { .. }));
}

#[test]
fn seeded_commits_are_reproducible() {
    let run = |seed| {
        let mut universe = scenario();
        let mut rng = StdRng::seed_from_u64(seed);
        commit(&mut universe, request(GATE), &mut rng)
            .expect("jump succeeds")
            .dispersion
    };
    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn jumpdrive_on_another_vessel_cannot_carry_the_traveller() {
    let mut universe = scenario();
    universe
        .vessel_mut(RELAY)
        .expect("relay")
        .parts
        .push(beacon_part(BeaconModel::Jumpdrive, BeaconState::Active, 500.0, 1000.0));
    let before = universe.vessels.clone();
    let mut rng = StdRng::seed_from_u64(1);

    let request = JumpRequest {
        traveller: SHUTTLE,
        origin: BeaconRef {
            vessel: RELAY,
            part: 1,
        },
        target: GATE,
    };
    let err = commit(&mut universe, request, &mut rng).unwrap_err();

    assert!(matches!(err, Error::NoNearBeacon { .. }));
    assert_eq!(universe.vessels, before);
}

#[test]
fn origin_outside_selection_radius_cannot_commit() {
    let mut universe = scenario();
    let radius = universe.config.near_selection_radius_m;
    universe.vessel_mut(RELAY).expect("relay").position = Vec3::new(5.6e6, radius, 0.0);
    let mut rng = StdRng::seed_from_u64(1);

    let err = commit(&mut universe, request(GATE), &mut rng).unwrap_err();

    assert!(matches!(err, Error::NoNearBeacon { .. }));
    assert_eq!(universe.query(RELAY, "Karborundum"), 1000.0);
}

#[test]
fn remote_beacon_model_aboard_the_traveller_cannot_commit() {
    let mut universe = scenario();
    universe
        .vessel_mut(SHUTTLE)
        .expect("shuttle")
        .parts
        .push(beacon_part(BeaconModel::Small, BeaconState::Active, 500.0, 1000.0));
    let mut rng = StdRng::seed_from_u64(1);

    let request = JumpRequest {
        traveller: SHUTTLE,
        origin: BeaconRef {
            vessel: SHUTTLE,
            part: 1,
        },
        target: GATE,
    };
    let err = commit(&mut universe, request, &mut rng).unwrap_err();

    assert!(matches!(err, Error::NoNearBeacon { .. }));
    assert_eq!(universe.query(SHUTTLE, "Karborundum"), 500.0);
}
