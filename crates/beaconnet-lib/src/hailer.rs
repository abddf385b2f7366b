//! Per-vessel transit console.
//!
//! The hailer tracks the near beacon its vessel would jump from, rebuilds the
//! list of far destinations while its interface is open, and forwards the
//! operator's confirmed jump to the executor. It only talks to the registry
//! and the planner; it never edits beacon state itself.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::capability::Capability;
use crate::error::{Error, Result};
use crate::feasibility::ObstructionKind;
use crate::registry::{
    list_far, scan_near, snapshot_views, BeaconView, FarTarget, LiveBeaconView, NearBeacon,
    NearPresence, NearScan,
};
use crate::transit::{
    commit, plan_transfer, return_trip, JumpOutcome, JumpRequest, JumpWarning, ReturnTrip,
    TransferPlan,
};
use crate::universe::Universe;
use crate::vessel::VesselId;

/// Display state of one destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DestinationStatus {
    Ready,
    /// The origin beacon cannot pay for the transfer.
    NoFuel,
    Blocked { kind: ObstructionKind, body: String },
}

/// One reachable destination with its plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destination {
    pub target: VesselId,
    pub name: String,
    pub model_name: String,
    pub body: String,
    pub altitude_km: f64,
    pub plan: TransferPlan,
    pub status: DestinationStatus,
    pub return_trip: ReturnTrip,
}

/// Transit console attached to one vessel.
#[derive(Debug, Clone, Serialize)]
pub struct Hailer {
    vessel: VesselId,
    active: bool,
    gui_open: bool,
    scan: NearScan,
    far_targets: Vec<FarTarget>,
}

impl Hailer {
    pub fn new(vessel: VesselId) -> Self {
        Self {
            vessel,
            active: false,
            gui_open: false,
            scan: NearScan {
                presence: NearPresence::NotPresent,
                selected: None,
                candidates: Vec::new(),
            },
            far_targets: Vec::new(),
        }
    }

    /// Console for `vessel`, which must carry a hailer part.
    pub fn for_vessel(universe: &Universe, vessel: VesselId) -> Result<Self> {
        let v = universe.vessel(vessel).ok_or_else(|| Error::UnknownVessel {
            name: vessel.to_string(),
            suggestions: Vec::new(),
        })?;
        if !v.has_hailer() {
            return Err(Error::NoHailer {
                vessel: v.name.clone(),
            });
        }
        Ok(Self::new(vessel))
    }

    pub fn vessel(&self) -> VesselId {
        self.vessel
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_open(&self) -> bool {
        self.gui_open
    }

    pub fn presence(&self) -> NearPresence {
        self.scan.presence
    }

    pub fn near_beacon(&self) -> Option<&NearBeacon> {
        self.scan.selected.as_ref()
    }

    pub fn candidates(&self) -> &[NearBeacon] {
        &self.scan.candidates
    }

    pub fn selection_index(&self) -> Option<usize> {
        self.scan.selected_index()
    }

    pub fn far_targets(&self) -> &[FarTarget] {
        &self.far_targets
    }

    /// Power the console on and run a first scan.
    pub fn activate(&mut self, universe: &Universe) -> Result<()> {
        self.active = true;
        self.rescan(universe)?;
        self.far_targets = list_far(universe, self.vessel, universe);
        info!(vessel = self.vessel, presence = ?self.scan.presence, "hailer activated");
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.close_interface();
        self.active = false;
        info!(vessel = self.vessel, "hailer deactivated");
    }

    /// Open the destination interface; needs a usable near beacon.
    pub fn open_interface(&mut self, universe: &Universe) -> Result<()> {
        if !self.active || self.scan.selected.is_none() {
            let name = universe
                .vessel(self.vessel)
                .map(|v| v.name.clone())
                .unwrap_or_else(|| self.vessel.to_string());
            return Err(Error::NoNearBeacon { vessel: name });
        }
        self.gui_open = true;
        self.far_targets = list_far(universe, self.vessel, universe);
        Ok(())
    }

    pub fn close_interface(&mut self) {
        self.gui_open = false;
    }

    fn rescan(&mut self, universe: &Universe) -> Result<()> {
        let previous = self.scan.selected.take();
        self.scan = scan_near(universe, self.vessel, previous.as_ref())?;
        Ok(())
    }

    /// Per-tick refresh. Losing the near beacon or control of the vessel
    /// closes the interface; far targets are only rebuilt while it is open.
    pub fn fixed_tick(&mut self, universe: &Universe) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        let before = self.scan.presence;
        self.rescan(universe)?;

        let controlled = universe.active_vessel.map_or(true, |id| id == self.vessel);
        let lost_near = self.scan.selected.is_none() && before != self.scan.presence;
        if self.gui_open && (!controlled || lost_near) {
            debug!(vessel = self.vessel, controlled, "closing hailer interface");
            self.close_interface();
        }
        if self.gui_open {
            self.far_targets = list_far(universe, self.vessel, universe);
        }
        Ok(())
    }

    /// Select the next near candidate and pin it as user-selected.
    pub fn cycle_beacon(&mut self) -> Option<&NearBeacon> {
        if self.scan.presence == NearPresence::Onboard || self.scan.candidates.is_empty() {
            return self.scan.selected.as_ref();
        }
        let next = self
            .scan
            .selected_index()
            .map_or(0, |i| (i + 1) % self.scan.candidates.len());
        let mut chosen = self.scan.candidates[next].clone();
        chosen.user_selected = true;
        self.scan.selected = Some(chosen);
        self.scan.selected.as_ref()
    }

    /// Priced destinations from the current near beacon. Plans without a price
    /// are omitted; the path is only checked for affordable transfers.
    pub fn destinations(&self, universe: &Universe) -> Result<Vec<Destination>> {
        let Some(near) = self.scan.selected.as_ref() else {
            return Ok(Vec::new());
        };
        let traveller = universe.vessel(self.vessel).ok_or_else(|| Error::UnknownVessel {
            name: self.vessel.to_string(),
            suggestions: Vec::new(),
        })?;
        let origin = LiveBeaconView::resolve(universe, near.beacon)?;
        let fuel = origin.fuel_on_board().unwrap_or(0.0);

        let mut destinations = Vec::new();
        for target in &self.far_targets {
            let Some(vessel) = universe.vessel(target.vessel) else {
                continue;
            };
            let views = snapshot_views(vessel, universe);
            let Some(view) = views.first() else {
                continue;
            };
            let Some(plan) = plan_transfer(
                universe,
                traveller,
                &origin,
                view,
                near.distance,
                near.relative_velocity,
            ) else {
                continue;
            };

            let status = if !plan.affordable(fuel) {
                DestinationStatus::NoFuel
            } else if let Some((kind, body)) = plan.path_verdict.obstruction() {
                DestinationStatus::Blocked {
                    kind,
                    body: universe
                        .body(body)
                        .map(|b| b.display_name())
                        .unwrap_or_default(),
                }
            } else {
                DestinationStatus::Ready
            };

            destinations.push(Destination {
                target: target.vessel,
                name: vessel.name.clone(),
                model_name: target.model_name.clone(),
                body: universe
                    .body(vessel.main_body)
                    .map(|b| b.name.clone())
                    .unwrap_or_default(),
                altitude_km: (universe.altitude(vessel) / 1000.0).round(),
                return_trip: return_trip(&views, plan.trip_distance, plan.tonnage),
                plan,
                status,
            });
        }
        Ok(destinations)
    }

    /// Losses the current near beacon would inflict, for display before
    /// confirmation. Empty when the beacon shields the transfer.
    pub fn warnings(&self, universe: &Universe) -> Vec<JumpWarning> {
        let Some(near) = self.scan.selected.as_ref() else {
            return Vec::new();
        };
        let shielded = universe
            .beacon(near.beacon)
            .map(|b| b.has(Capability::Hcu))
            .unwrap_or(false);
        let Some(vessel) = universe.vessel(self.vessel) else {
            return Vec::new();
        };
        if shielded {
            return Vec::new();
        }
        let crew = vessel.crew().map(|name| JumpWarning::CrewLost {
            name: name.to_string(),
        });
        let cargo = vessel
            .hazardous_parts(universe.config(), universe.catalog())
            .into_iter()
            .map(|h| JumpWarning::CargoDestabilized {
                part: h.part_name,
                resource: h.resource,
            });
        crew.chain(cargo).collect()
    }

    /// Commit a jump to `target` from the current near beacon.
    pub fn commit<R: Rng + ?Sized>(
        &mut self,
        universe: &mut Universe,
        target: VesselId,
        rng: &mut R,
    ) -> Result<JumpOutcome> {
        let near = self.scan.selected.as_ref().ok_or_else(|| Error::NoNearBeacon {
            vessel: universe
                .vessel(self.vessel)
                .map(|v| v.name.clone())
                .unwrap_or_else(|| self.vessel.to_string()),
        })?;
        let outcome = commit(
            universe,
            JumpRequest {
                traveller: self.vessel,
                origin: near.beacon,
                target,
            },
            rng,
        )?;
        self.close_interface();
        Ok(outcome)
    }
}
