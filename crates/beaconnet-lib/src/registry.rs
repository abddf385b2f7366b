//! Beacon discovery across the two fidelity domains.
//!
//! Near beacons are live: they sit on vessels inside simulation range and are
//! read straight from their [`Beacon`] state. Far beacons are read from the
//! key/value snapshot their vessel left behind when it went out of range, so
//! they are a best-effort, possibly stale view. Both are exposed through
//! [`BeaconView`] so pricing and feasibility never care which one they get.

use serde::Serialize;
use tracing::debug;

use crate::beacon::{
    Beacon, BeaconModel, BeaconRef, BEACON_MODULE, FIELD_FUEL, FIELD_INVENTORY, FIELD_MODEL,
    FIELD_STATUS,
};
use crate::body::BodyId;
use crate::capability::CapabilitySet;
use crate::config::ACTIVE_STATUS;
use crate::environment::SnapshotReader;
use crate::error::{Error, Result};
use crate::geometry::Vec3;
use crate::transit::Endpoint;
use crate::universe::Universe;
use crate::vessel::{ModuleSnapshot, Situation, Vessel, VesselId};

/// Read-only query contract shared by live and snapshot beacons.
pub trait BeaconView {
    fn vessel(&self) -> VesselId;
    fn vessel_name(&self) -> &str;
    fn model(&self) -> BeaconModel;
    fn is_active(&self) -> bool;
    fn capabilities(&self) -> CapabilitySet;
    /// Last known fuel aboard; `None` when it cannot be read.
    fn fuel_on_board(&self) -> Option<f64>;
    fn position(&self) -> Vec3;
    fn main_body(&self) -> BodyId;
    fn orbital_velocity(&self) -> Vec3;

    fn gravity_limit(&self) -> f64 {
        self.model().gravity_limit(self.capabilities())
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint {
            main_body: self.main_body(),
            orbital_velocity: self.orbital_velocity(),
        }
    }
}

/// A beacon on a vessel inside simulation range.
#[derive(Debug, Clone, Copy)]
pub struct LiveBeaconView<'a> {
    vessel: &'a Vessel,
    beacon: &'a Beacon,
}

impl<'a> LiveBeaconView<'a> {
    pub fn new(vessel: &'a Vessel, beacon: &'a Beacon) -> Self {
        Self { vessel, beacon }
    }

    /// Resolve a live beacon by reference.
    pub fn resolve(universe: &'a Universe, at: BeaconRef) -> Result<Self> {
        let beacon = universe.beacon(at)?;
        let vessel = universe.vessel(at.vessel).ok_or_else(|| Error::UnknownVessel {
            name: at.vessel.to_string(),
            suggestions: Vec::new(),
        })?;
        Ok(Self { vessel, beacon })
    }

    pub fn beacon(&self) -> &'a Beacon {
        self.beacon
    }
}

impl BeaconView for LiveBeaconView<'_> {
    fn vessel(&self) -> VesselId {
        self.vessel.id
    }

    fn vessel_name(&self) -> &str {
        &self.vessel.name
    }

    fn model(&self) -> BeaconModel {
        self.beacon.model
    }

    fn is_active(&self) -> bool {
        self.beacon.is_active()
    }

    fn capabilities(&self) -> CapabilitySet {
        self.beacon.capabilities
    }

    fn fuel_on_board(&self) -> Option<f64> {
        Some(self.beacon.fuel_on_board)
    }

    fn position(&self) -> Vec3 {
        self.vessel.position
    }

    fn main_body(&self) -> BodyId {
        self.vessel.main_body
    }

    fn orbital_velocity(&self) -> Vec3 {
        self.vessel.orbital_velocity
    }
}

/// A beacon known only through its vessel's persisted snapshot.
#[derive(Clone, Copy)]
pub struct SnapshotBeaconView<'a> {
    vessel: &'a Vessel,
    snapshot: &'a ModuleSnapshot,
    reader: &'a dyn SnapshotReader,
}

impl<'a> SnapshotBeaconView<'a> {
    pub fn new(vessel: &'a Vessel, snapshot: &'a ModuleSnapshot, reader: &'a dyn SnapshotReader) -> Self {
        Self {
            vessel,
            snapshot,
            reader,
        }
    }

    fn field(&self, name: &str) -> Option<&'a str> {
        self.reader.read_field(self.snapshot, name)
    }

    /// Model string exactly as persisted.
    pub fn model_name(&self) -> &'a str {
        self.field(FIELD_MODEL).unwrap_or_default()
    }
}

impl std::fmt::Debug for SnapshotBeaconView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotBeaconView")
            .field("vessel", &self.vessel.name)
            .field("snapshot", self.snapshot)
            .finish()
    }
}

impl BeaconView for SnapshotBeaconView<'_> {
    fn vessel(&self) -> VesselId {
        self.vessel.id
    }

    fn vessel_name(&self) -> &str {
        &self.vessel.name
    }

    fn model(&self) -> BeaconModel {
        BeaconModel::from_model_str(self.model_name())
    }

    fn is_active(&self) -> bool {
        self.field(FIELD_STATUS) == Some(ACTIVE_STATUS)
    }

    fn capabilities(&self) -> CapabilitySet {
        self.field(FIELD_INVENTORY)
            .and_then(|v| v.parse::<u8>().ok())
            .map(CapabilitySet::from_mask)
            .unwrap_or_default()
    }

    fn fuel_on_board(&self) -> Option<f64> {
        self.field(FIELD_FUEL).and_then(|v| v.parse().ok())
    }

    fn position(&self) -> Vec3 {
        self.vessel.position
    }

    fn main_body(&self) -> BodyId {
        self.vessel.main_body
    }

    fn orbital_velocity(&self) -> Vec3 {
        self.vessel.orbital_velocity
    }
}

/// Active beacon snapshots persisted by `vessel`, in part order.
pub fn snapshot_views<'a>(vessel: &'a Vessel, reader: &'a dyn SnapshotReader) -> Vec<SnapshotBeaconView<'a>> {
    vessel
        .proto_modules
        .iter()
        .filter(|m| m.module_name == BEACON_MODULE)
        .map(|m| SnapshotBeaconView::new(vessel, m, reader))
        .filter(|view| view.is_active())
        .collect()
}

/// How the selected near beacon relates to the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NearPresence {
    /// An active jumpdrive aboard the requesting vessel.
    Onboard,
    /// A beacon on another vessel in range.
    Present,
    NotPresent,
}

/// A usable origin beacon near the requester.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearBeacon {
    pub beacon: BeaconRef,
    pub model: BeaconModel,
    /// Operator-facing label, e.g. `LB15 (Relay One)`.
    pub description: String,
    /// Distance to the requester, rounded to meters.
    pub distance: f64,
    /// Relative speed, rounded to 0.1 m/s.
    pub relative_velocity: f64,
    pub user_selected: bool,
}

/// Result of a near scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearScan {
    pub presence: NearPresence,
    pub selected: Option<NearBeacon>,
    /// Every selectable beacon, in discovery order.
    pub candidates: Vec<NearBeacon>,
}

impl NearScan {
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.candidates
            .iter()
            .position(|c| c.beacon == selected.beacon)
    }
}

fn near_entry(universe: &Universe, requester: &Vessel, vessel: &Vessel, part: usize, beacon: &Beacon) -> NearBeacon {
    let distance = requester.position.distance_to(vessel.position).round();
    let drift = universe.frame_velocity(requester) - universe.frame_velocity(vessel);
    NearBeacon {
        beacon: BeaconRef {
            vessel: vessel.id,
            part,
        },
        model: beacon.model,
        description: format!("{} ({})", beacon.model, vessel.name),
        distance,
        relative_velocity: (drift.length() * 10.0).round() / 10.0,
        user_selected: false,
    }
}

/// Whether `beacon` aboard `vessel` may carry `requester` right now.
///
/// A jumpdrive only moves its own vessel. Every other model must sit on a
/// different loaded vessel, not the active one, closer than the selection
/// radius.
pub fn is_eligible_origin(universe: &Universe, requester: &Vessel, vessel: &Vessel, beacon: &Beacon) -> bool {
    if !beacon.is_active() || !vessel.loaded {
        return false;
    }
    if beacon.model.is_jumpdrive() {
        return vessel.id == requester.id;
    }
    vessel.id != requester.id
        && Some(vessel.id) != universe.active_vessel
        && requester.position.distance_to(vessel.position).round() < universe.config.near_selection_radius_m
}

/// Find the origin beacon a requester would use right now.
///
/// Precedence: an active jumpdrive aboard the requester, then a previously
/// user-selected beacon that is still loaded and active, then the nearest
/// active beacon within the selection radius.
pub fn scan_near(universe: &Universe, requester: VesselId, previous: Option<&NearBeacon>) -> Result<NearScan> {
    let origin = universe.vessel(requester).ok_or_else(|| Error::UnknownVessel {
        name: requester.to_string(),
        suggestions: Vec::new(),
    })?;

    if let Some((part, beacon)) = origin
        .beacons()
        .find(|(_, b)| b.model.is_jumpdrive() && is_eligible_origin(universe, origin, origin, b))
    {
        let onboard = NearBeacon {
            distance: 0.0,
            relative_velocity: 0.0,
            ..near_entry(universe, origin, origin, part, beacon)
        };
        return Ok(NearScan {
            presence: NearPresence::Onboard,
            selected: Some(onboard.clone()),
            candidates: vec![onboard],
        });
    }

    let candidates: Vec<NearBeacon> = universe
        .vessels
        .iter()
        .flat_map(|v| {
            v.beacons()
                .filter(move |(_, b)| is_eligible_origin(universe, origin, v, b))
                .map(move |(part, b)| near_entry(universe, origin, v, part, b))
        })
        .collect();

    if let Some(prev) = previous.filter(|p| p.user_selected) {
        let still_valid = universe.vessel(prev.beacon.vessel).and_then(|v| {
            v.parts
                .get(prev.beacon.part)
                .and_then(|p| p.beacon())
                .filter(|b| is_eligible_origin(universe, origin, v, b))
                .map(|b| (v, b))
        });
        if let Some((vessel, beacon)) = still_valid {
            let kept = NearBeacon {
                user_selected: true,
                ..near_entry(universe, origin, vessel, prev.beacon.part, beacon)
            };
            return Ok(NearScan {
                presence: NearPresence::Present,
                selected: Some(kept),
                candidates,
            });
        }
        debug!(beacon = ?prev.beacon, "user-selected beacon no longer usable");
    }

    let nearest = candidates
        .iter()
        .fold(None::<&NearBeacon>, |best, c| match best {
            Some(b) if b.distance <= c.distance => Some(b),
            _ => Some(c),
        })
        .cloned();

    Ok(NearScan {
        presence: if nearest.is_some() {
            NearPresence::Present
        } else {
            NearPresence::NotPresent
        },
        selected: nearest,
        candidates,
    })
}

/// A destination advertised by an out-of-range vessel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarTarget {
    pub vessel: VesselId,
    pub vessel_name: String,
    /// Model string as read from the snapshot.
    pub model_name: String,
    pub model: BeaconModel,
    pub body: BodyId,
}

fn is_far_candidate(universe: &Universe, requester: VesselId, vessel: &Vessel) -> bool {
    !vessel.loaded
        && vessel.id != requester
        && Some(vessel.id) != universe.active_vessel
        && vessel.situation == Situation::Orbiting
}

/// Enumerate destinations from snapshots of unloaded, orbiting vessels. Each
/// vessel appears once, under its first active beacon.
pub fn list_far(universe: &Universe, requester: VesselId, reader: &dyn SnapshotReader) -> Vec<FarTarget> {
    let targets: Vec<FarTarget> = universe
        .vessels
        .iter()
        .filter(|v| is_far_candidate(universe, requester, v))
        .filter_map(|v| {
            snapshot_views(v, reader).first().map(|view| FarTarget {
                vessel: v.id,
                vessel_name: v.name.clone(),
                model_name: view.model_name().to_string(),
                model: view.model(),
                body: v.main_body,
            })
        })
        .collect();
    debug!(requester, targets = targets.len(), "far beacons listed");
    targets
}

/// Re-resolve a far target at commit time. Snapshot state is never trusted
/// across ticks, so the vessel must still be out of range, orbiting and
/// advertising an active beacon.
pub fn resolve_target<'a>(
    universe: &'a Universe,
    requester: VesselId,
    target: VesselId,
    reader: &'a dyn SnapshotReader,
) -> Result<SnapshotBeaconView<'a>> {
    let stale = || Error::StaleTargetVanished {
        target: universe
            .vessel(target)
            .map(|v| v.name.clone())
            .unwrap_or_else(|| target.to_string()),
    };
    let vessel = universe.vessel(target).ok_or_else(stale)?;
    if !is_far_candidate(universe, requester, vessel) {
        return Err(stale());
    }
    snapshot_views(vessel, reader)
        .into_iter()
        .next()
        .ok_or_else(stale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::CelestialBody;
    use crate::environment::PlainSnapshots;
    use crate::vessel::{Part, PartModule};

    fn beacon_vessel(id: VesselId, x: f64, model: BeaconModel, active: bool, loaded: bool) -> Vessel {
        let mut beacon = Beacon::new(model);
        if active {
            beacon.state = crate::beacon::BeaconState::Active;
        }
        let mut vessel = Vessel {
            id,
            name: format!("Vessel {id}"),
            main_body: 0,
            position: Vec3::new(x, 0.0, 0.0),
            orbital_velocity: Vec3::ZERO,
            situation: Situation::Orbiting,
            loaded,
            parts: vec![Part {
                name: "beacon".to_string(),
                dry_mass_t: 1.0,
                crew: Vec::new(),
                resources: Vec::new(),
                modules: vec![PartModule::Beacon(beacon)],
            }],
            proto_modules: Vec::new(),
        };
        if !loaded {
            vessel.proto_modules = vessel.capture_snapshot();
        }
        vessel
    }

    fn requester() -> Vessel {
        Vessel {
            parts: Vec::new(),
            ..beacon_vessel(1, 1e7, BeaconModel::Small, false, true)
        }
    }

    fn universe(vessels: Vec<Vessel>) -> Universe {
        let kerbin = CelestialBody {
            name: "Kerbin".to_string(),
            mass_kg: 5.2915158e22,
            radius_m: 600_000.0,
            position: Vec3::ZERO,
            orbital_velocity: Vec3::ZERO,
            parent: None,
        };
        let mut u = Universe::new(vec![kerbin], vessels).expect("valid universe");
        u.active_vessel = Some(1);
        u
    }

    #[test]
    fn nearest_active_beacon_is_selected() {
        let u = universe(vec![
            requester(),
            beacon_vessel(2, 1e7 + 900.0, BeaconModel::Medium, true, true),
            beacon_vessel(3, 1e7 + 400.0, BeaconModel::Small, true, true),
            beacon_vessel(4, 1e7 + 100.0, BeaconModel::Large, false, true),
            beacon_vessel(5, 1e7 + 5000.0, BeaconModel::Large, true, true),
        ]);
        let scan = scan_near(&u, 1, None).expect("scan");
        assert_eq!(scan.presence, NearPresence::Present);
        let selected = scan.selected.expect("selected");
        assert_eq!(selected.beacon.vessel, 3);
        assert_eq!(selected.distance, 400.0);
        assert_eq!(selected.description, "LB10 (Vessel 3)");
        assert_eq!(scan.candidates.len(), 2);
    }

    #[test]
    fn onboard_jumpdrive_wins() {
        let mut me = beacon_vessel(1, 1e7, BeaconModel::Jumpdrive, true, true);
        me.name = "Me".to_string();
        let u = universe(vec![me, beacon_vessel(2, 1e7 + 10.0, BeaconModel::Small, true, true)]);
        let scan = scan_near(&u, 1, None).expect("scan");
        assert_eq!(scan.presence, NearPresence::Onboard);
        let selected = scan.selected.expect("selected");
        assert_eq!(selected.beacon.vessel, 1);
        assert_eq!(selected.distance, 0.0);
    }

    #[test]
    fn user_selection_is_kept_while_valid() {
        let mut u = universe(vec![
            requester(),
            beacon_vessel(2, 1e7 + 900.0, BeaconModel::Medium, true, true),
            beacon_vessel(3, 1e7 + 400.0, BeaconModel::Small, true, true),
        ]);
        let first = scan_near(&u, 1, None).expect("scan");
        let mut chosen = first.candidates[0].clone();
        chosen.user_selected = true;
        assert_eq!(chosen.beacon.vessel, 2);

        let again = scan_near(&u, 1, Some(&chosen)).expect("scan");
        assert_eq!(again.selected.expect("kept").beacon.vessel, 2);

        u.set_loaded(2, false).expect("vessel exists");
        let after = scan_near(&u, 1, Some(&chosen)).expect("scan");
        assert_eq!(after.selected.expect("fallback").beacon.vessel, 3);
    }

    #[test]
    fn jumpdrives_on_other_vessels_are_not_origins() {
        let u = universe(vec![
            requester(),
            beacon_vessel(2, 1e7 + 10.0, BeaconModel::Jumpdrive, true, true),
        ]);
        let scan = scan_near(&u, 1, None).expect("scan");
        assert_eq!(scan.presence, NearPresence::NotPresent);
        assert!(scan.selected.is_none());
    }

    #[test]
    fn origin_eligibility_matches_the_scan_rules() {
        let mut me = requester();
        me.parts = beacon_vessel(1, 1e7, BeaconModel::Jumpdrive, true, true).parts;
        let u = universe(vec![
            me,
            beacon_vessel(2, 1e7 + 10.0, BeaconModel::Jumpdrive, true, true),
            beacon_vessel(3, 1e7 + 2999.0, BeaconModel::Small, true, true),
            beacon_vessel(4, 1e7 + 3000.0, BeaconModel::Small, true, true),
        ]);
        let eligible = |id: VesselId| {
            let vessel = u.vessel(id).expect("vessel");
            let beacon = vessel.beacons().next().expect("beacon").1;
            is_eligible_origin(&u, u.vessel(1).expect("requester"), vessel, beacon)
        };
        assert!(eligible(1));
        assert!(!eligible(2));
        assert!(eligible(3));
        assert!(!eligible(4));
    }

    #[test]
    fn far_targets_come_from_active_snapshots() {
        let mut landed = beacon_vessel(4, 4e7, BeaconModel::Large, true, false);
        landed.situation = Situation::Landed;
        let u = universe(vec![
            requester(),
            beacon_vessel(2, 2e7, BeaconModel::Medium, true, false),
            beacon_vessel(3, 3e7, BeaconModel::Small, false, false),
            landed,
        ]);
        let targets = list_far(&u, 1, &PlainSnapshots);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].vessel, 2);
        assert_eq!(targets[0].model_name, "LB15");
    }

    #[test]
    fn snapshot_view_reads_string_fields() {
        let vessel = beacon_vessel(2, 2e7, BeaconModel::Large, true, false);
        let views = snapshot_views(&vessel, &PlainSnapshots);
        let view = views.first().expect("active snapshot");
        assert_eq!(view.model(), BeaconModel::Large);
        assert_eq!(view.fuel_on_board(), Some(0.0));
        assert!(view.capabilities().is_empty());
    }

    #[test]
    fn vanished_targets_are_stale() {
        let mut u = universe(vec![
            requester(),
            beacon_vessel(2, 2e7, BeaconModel::Medium, true, false),
        ]);
        assert!(resolve_target(&u, 1, 2, &PlainSnapshots).is_ok());
        u.vessels[1].proto_modules[0]
            .values
            .insert(FIELD_STATUS.to_string(), "Offline.".to_string());
        let err = resolve_target(&u, 1, 2, &PlainSnapshots).unwrap_err();
        assert!(matches!(err, Error::StaleTargetVanished { .. }));
        let err = resolve_target(&u, 1, 99, &PlainSnapshots).unwrap_err();
        assert!(matches!(err, Error::StaleTargetVanished { .. }));
    }
}
