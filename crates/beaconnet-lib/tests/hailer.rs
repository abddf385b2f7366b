mod common;

use beaconnet_lib::beacon::{self, BeaconModel, BeaconState};
use beaconnet_lib::feasibility::ObstructionKind;
use beaconnet_lib::geometry::Vec3;
use beaconnet_lib::hailer::{DestinationStatus, Hailer};
use beaconnet_lib::registry::NearPresence;
use beaconnet_lib::transit::{base_cost, round2, JumpWarning};
use beaconnet_lib::vessel::Vessel;
use beaconnet_lib::Error;
use common::{beacon_part, scenario, vessel, FAR_SIDE, GATE, RELAY, RELAY_BEACON, SHUTTLE};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn active_hailer(universe: &beaconnet_lib::Universe) -> Hailer {
    let mut hailer = Hailer::for_vessel(universe, SHUTTLE).expect("shuttle has a hailer");
    hailer.activate(universe).expect("activate");
    hailer
}

#[test]
fn vessels_without_hailer_are_refused() {
    let universe = scenario();
    let err = Hailer::for_vessel(&universe, RELAY).unwrap_err();
    assert!(matches!(err, Error::NoHailer { ref vessel } if vessel == "Relay One"));
}

#[test]
fn activation_finds_near_relay_and_far_targets() {
    let universe = scenario();
    let hailer = active_hailer(&universe);

    assert_eq!(hailer.presence(), NearPresence::Present);
    let near = hailer.near_beacon().expect("near beacon");
    assert_eq!(near.beacon, RELAY_BEACON);
    assert_eq!(near.description, "LB15 (Relay One)");
    assert_eq!(near.distance, 400.0);
    assert_eq!(near.relative_velocity, 0.0);

    let far: Vec<_> = hailer.far_targets().iter().map(|t| t.vessel).collect();
    assert_eq!(far, vec![GATE, FAR_SIDE]);
}

#[test]
fn destinations_report_price_and_path_status() {
    let universe = scenario();
    let mut hailer = active_hailer(&universe);
    hailer.open_interface(&universe).expect("open");

    let destinations = hailer.destinations(&universe).expect("destinations");
    assert_eq!(destinations.len(), 2);

    let gate = &destinations[0];
    assert_eq!(gate.name, "Mun Gate");
    assert_eq!(gate.model_name, "LB10");
    assert_eq!(gate.body, "Mun");
    assert_eq!(gate.altitude_km, 800.0);
    assert_eq!(gate.status, DestinationStatus::Ready);
    assert_eq!(gate.plan.equipment_adjusted_cost, 0.74);
    let expected_return = round2(base_cost(
        BeaconModel::Small,
        gate.plan.trip_distance,
        gate.plan.tonnage,
    ));
    assert_eq!(gate.return_trip.required, expected_return);
    assert_eq!(gate.return_trip.available, Some(200.0));
    assert!(gate.return_trip.feasible);

    let far_side = &destinations[1];
    assert_eq!(
        far_side.status,
        DestinationStatus::Blocked {
            kind: ObstructionKind::Gravity,
            body: "Kerbin".to_string()
        }
    );
}

#[test]
fn unaffordable_destinations_skip_path_check() {
    let mut universe = scenario();
    let relay = universe.vessel_mut(RELAY).expect("relay");
    relay.parts[0].resources[0].amount = 0.2;
    beacon::state::refresh(&mut universe, RELAY_BEACON).expect("refresh");

    let mut hailer = active_hailer(&universe);
    hailer.open_interface(&universe).expect("open");
    let destinations = hailer.destinations(&universe).expect("destinations");
    assert!(destinations
        .iter()
        .all(|d| d.status == DestinationStatus::NoFuel));
}

#[test]
fn warnings_list_crew_without_shielding() {
    let universe = scenario();
    let hailer = active_hailer(&universe);
    assert_eq!(
        hailer.warnings(&universe),
        vec![JumpWarning::CrewLost {
            name: "Jebediah Kerman".to_string()
        }]
    );
}

#[test]
fn cycling_pins_the_next_candidate() {
    let mut universe = scenario();
    let backup: Vessel = Vessel {
        parts: vec![beacon_part(BeaconModel::Small, BeaconState::Active, 100.0, 100.0)],
        ..vessel(
            5,
            "Relay Two",
            0,
            Vec3::new(5.6e6, -1200.0, 0.0),
            Vec3::new(0.0, 2300.0, 0.0),
        )
    };
    universe.vessels.push(backup);

    let mut hailer = active_hailer(&universe);
    assert_eq!(hailer.candidates().len(), 2);
    assert_eq!(hailer.near_beacon().expect("near").beacon.vessel, RELAY);

    let picked = hailer.cycle_beacon().expect("cycled").clone();
    assert_eq!(picked.beacon.vessel, 5);
    assert!(picked.user_selected);

    // The pinned beacon survives a rescan even though the relay is nearer.
    hailer.fixed_tick(&universe).expect("tick");
    assert_eq!(hailer.near_beacon().expect("near").beacon.vessel, 5);
    assert_eq!(hailer.selection_index(), Some(1));
}

#[test]
fn losing_the_near_beacon_closes_the_interface() {
    let mut universe = scenario();
    let mut hailer = active_hailer(&universe);
    hailer.open_interface(&universe).expect("open");
    assert!(hailer.is_open());

    beacon::shutdown(&mut universe, RELAY_BEACON).expect("shutdown");
    hailer.fixed_tick(&universe).expect("tick");

    assert_eq!(hailer.presence(), NearPresence::NotPresent);
    assert!(!hailer.is_open());
    assert!(hailer.open_interface(&universe).is_err());
}

#[test]
fn switching_vessels_closes_the_interface() {
    let mut universe = scenario();
    let mut hailer = active_hailer(&universe);
    hailer.open_interface(&universe).expect("open");

    universe.active_vessel = Some(RELAY);
    hailer.fixed_tick(&universe).expect("tick");
    assert!(!hailer.is_open());
}

#[test]
fn commit_through_hailer_closes_the_interface() {
    let mut universe = scenario();
    let mut hailer = active_hailer(&universe);
    hailer.open_interface(&universe).expect("open");
    let mut rng = StdRng::seed_from_u64(5);

    let outcome = hailer
        .commit(&mut universe, GATE, &mut rng)
        .expect("jump succeeds");

    assert_eq!(outcome.request.traveller, SHUTTLE);
    assert!(!hailer.is_open());
    assert_eq!(universe.vessel(SHUTTLE).expect("shuttle").main_body, 1);
}
