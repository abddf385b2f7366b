//! Beacon status, activation and clock-advance handlers.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use beaconnet_lib::{beacon, BeaconModel, BeaconRef, BeaconState, TickReport, Universe};

use crate::output::{format_state, render_json};
use crate::scenario::save_universe;
use crate::terminal::ColorPalette;

/// One row of the beacon status table.
#[derive(Debug, Clone, Serialize)]
pub struct BeaconRow {
    pub vessel: String,
    pub part: usize,
    pub model: BeaconModel,
    pub state: BeaconState,
    pub loaded: bool,
    pub gravity_limit: f64,
    pub operational_floor_km: f64,
    pub fuel_on_board: f64,
    pub inventory_mask: u8,
    pub capabilities: String,
}

/// Collect a status row for every beacon in the universe.
pub fn beacon_rows(universe: &Universe) -> Result<Vec<BeaconRow>> {
    universe
        .beacon_refs()
        .into_iter()
        .map(|at| {
            let vessel = universe
                .vessel(at.vessel)
                .ok_or_else(|| anyhow!("beacon {at:?} points at a missing vessel"))?;
            let b = universe.beacon(at)?;
            Ok(BeaconRow {
                vessel: vessel.name.clone(),
                part: at.part,
                model: b.model,
                state: b.state,
                loaded: vessel.loaded,
                gravity_limit: b.gravity_limit(),
                operational_floor_km: b.operational_floor_km,
                fuel_on_board: b.fuel_on_board,
                inventory_mask: b.inventory_mask(),
                capabilities: b.capabilities.to_string(),
            })
        })
        .collect()
}

/// Handle the `beacons` subcommand.
pub fn handle_list_beacons(universe: &Universe, json: bool) -> Result<()> {
    let rows = beacon_rows(universe)?;
    if json {
        return render_json(&rows).context("failed to write beacon list");
    }
    print_beacons(&rows, &ColorPalette::detect());
    Ok(())
}

fn print_beacons(rows: &[BeaconRow], palette: &ColorPalette) {
    if rows.is_empty() {
        println!("No beacons in scenario.");
        return;
    }

    println!("Beacons ({}):", rows.len());
    println!(
        "{}{:<18} {:>4} {:<6} {:<12} {:>7} {:>11} {:>10} {:>4} {:<15} {:<8}{}",
        palette.gray,
        "Vessel",
        "Part",
        "Model",
        "State",
        "Limit",
        "Floor (km)",
        "Fuel",
        "Mask",
        "Upgrades",
        "Range",
        palette.reset
    );
    for row in rows {
        println!(
            "{}{:<18}{} {:>4} {:<6} {} {:>7.3} {:>11.3} {}{:>10.2}{} {:>4} {:<15} {:<8}",
            palette.white_bold,
            row.vessel,
            palette.reset,
            row.part,
            row.model.to_string(),
            format_state(row.state, palette),
            row.gravity_limit,
            row.operational_floor_km,
            palette.cyan,
            row.fuel_on_board,
            palette.reset,
            row.inventory_mask,
            row.capabilities,
            if row.loaded { "live" } else { "snapshot" },
        );
    }
}

/// Resolve `--vessel` and an optional `--part` to a beacon address.
pub fn resolve_beacon(universe: &Universe, vessel: &str, part: Option<usize>) -> Result<BeaconRef> {
    let vessel = universe.vessel_by_name(vessel)?;
    let at = match part {
        Some(part) => BeaconRef {
            vessel: vessel.id,
            part,
        },
        None => vessel
            .beacons()
            .next()
            .map(|(part, _)| BeaconRef {
                vessel: vessel.id,
                part,
            })
            .ok_or_else(|| anyhow!("vessel '{}' carries no beacon", vessel.name))?,
    };
    universe.beacon(at)?;
    Ok(at)
}

/// Handle the `activate` subcommand.
pub fn handle_activate(
    universe: &mut Universe,
    vessel: &str,
    part: Option<usize>,
    output: Option<&Path>,
) -> Result<()> {
    let at = resolve_beacon(universe, vessel, part)?;
    beacon::activate(universe, at)
        .with_context(|| format!("failed to activate beacon on {vessel}"))?;

    let b = universe.beacon(at)?;
    println!(
        "{} on {vessel} activated (activation charge {:.0}, draw {:.2}/s, floor {:.3} km)",
        b.model,
        b.activation_charge,
        b.running_draw,
        b.operational_floor_km
    );
    if let Some(path) = output {
        save_universe(universe, path)?;
    }
    Ok(())
}

/// Handle the `tick` subcommand: advance the clock and report shutdowns.
pub fn handle_tick(universe: &mut Universe, seconds: f64, output: Option<&Path>) -> Result<()> {
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(anyhow!("--seconds must be a positive number"));
    }
    let reports = universe.fixed_tick(seconds)?;
    print_tick_reports(universe, &reports);
    if let Some(path) = output {
        save_universe(universe, path)?;
    }
    Ok(())
}

fn print_tick_reports(universe: &Universe, reports: &[TickReport]) {
    println!("Advanced to t = {:.1} s", universe.epoch);
    for report in reports {
        let name = universe
            .vessel(report.beacon.vessel)
            .map(|v| v.name.as_str())
            .unwrap_or("<unknown>");
        if report.shut_down() {
            let causes: Vec<String> = report.causes.iter().map(ToString::to_string).collect();
            println!("- {name}: shut down: {}", causes.join("; "));
        } else if report.state == BeaconState::Active {
            println!("- {name}: active, drew {:.2} charge", report.charge_drawn);
        }
    }
}
