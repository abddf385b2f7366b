//! Jump commit handler.

use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;

use beaconnet_lib::{JumpOutcome, Universe};

use crate::commands::destinations::open_hailer;
use crate::output::{print_warnings, render_json};
use crate::scenario::save_universe;
use crate::terminal::{format_with_separators, ColorPalette};

/// Handle the `jump` subcommand.
pub fn handle_jump<R: Rng + ?Sized>(
    universe: &mut Universe,
    vessel: &str,
    to: &str,
    rng: &mut R,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let target = universe.vessel_by_name(to)?.id;
    let mut hailer = open_hailer(universe, vessel)?;
    let outcome = hailer
        .commit(universe, target, rng)
        .with_context(|| format!("jump from {vessel} to {to} failed"))?;

    if json {
        render_json(&outcome).context("failed to write jump outcome")?;
    } else {
        print_outcome(universe, &outcome, &ColorPalette::detect());
    }
    if let Some(path) = output {
        save_universe(universe, path)?;
    }
    Ok(())
}

fn print_outcome(universe: &Universe, outcome: &JumpOutcome, palette: &ColorPalette) {
    let name = |id| {
        universe
            .vessel(id)
            .map(|v| v.name.as_str())
            .unwrap_or("<unknown>")
    };
    let body = universe
        .body(outcome.reference_body)
        .map(|b| b.display_name())
        .unwrap_or_else(|| outcome.reference_body.to_string());
    let plan = &outcome.plan;

    println!(
        "{}{}{} jumped to {}{}{} via {}",
        palette.white_bold,
        name(outcome.request.traveller),
        palette.reset,
        palette.white_bold,
        name(outcome.request.target),
        palette.reset,
        plan.origin_model
    );
    println!(
        "  Fuel spent:   {}{:.2}{} {}",
        palette.cyan,
        outcome.fuel_spent,
        palette.reset,
        universe.config.fuel_resource
    );
    println!(
        "  Trip:         {} m, {:.2} t",
        format_with_separators(plan.trip_distance.round() as u64),
        plan.tonnage
    );
    println!(
        "  Arrival:      {:.0} m from the destination beacon, orbiting {body}",
        outcome.dispersion.length()
    );
    println!(
        "  Velocity:     ({:.1}, {:.1}, {:.1}) m/s",
        outcome.arrival_velocity.x, outcome.arrival_velocity.y, outcome.arrival_velocity.z
    );
    print_warnings("Losses", &outcome.warnings, palette);
}
