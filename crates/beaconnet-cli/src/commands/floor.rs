//! Operational floor lookup.

use anyhow::{anyhow, Result};

use beaconnet_lib::body::operational_floor_km;
use beaconnet_lib::{BeaconModel, Capability, CapabilitySet, Universe};

/// Floor in kilometers for `model` around `body`, optionally with the
/// gravimetric upgrade fitted.
pub fn floor_for(universe: &Universe, body: &str, model: &str, gmu: bool) -> Result<f64> {
    let id = universe.body_by_name(body)?;
    let body = universe
        .body(id)
        .ok_or_else(|| anyhow!("body {id} vanished from the scenario"))?;
    let model = match BeaconModel::from_model_str(model) {
        BeaconModel::Unknown => return Err(anyhow!("unknown beacon model '{model}'")),
        known => known,
    };
    let capabilities = if gmu {
        CapabilitySet::empty().with(Capability::Gmu)
    } else {
        CapabilitySet::empty()
    };
    Ok(operational_floor_km(body, model.gravity_limit(capabilities)))
}

/// Handle the `floor` subcommand.
pub fn handle_floor(universe: &Universe, body: &str, model: &str, gmu: bool) -> Result<()> {
    let floor = floor_for(universe, body, model, gmu)?;
    println!("Operational floor for {model} at {body}: {floor:.2} km");
    Ok(())
}
