//! Destination listing through a vessel's hailer.

use anyhow::{Context, Result};
use serde::Serialize;

use beaconnet_lib::{Destination, Hailer, JumpWarning, NearBeacon, Universe};

use crate::output::{format_status, print_warnings, render_json};
use crate::terminal::{format_with_separators, ColorPalette};

/// Everything the hailer shows once its interface is open.
#[derive(Debug, Clone, Serialize)]
pub struct DestinationReport {
    pub vessel: String,
    pub near: Option<NearBeacon>,
    pub warnings: Vec<JumpWarning>,
    pub destinations: Vec<Destination>,
}

/// Bring up the hailer on `vessel` and open its interface.
pub fn open_hailer(universe: &Universe, vessel: &str) -> Result<Hailer> {
    let vessel = universe.vessel_by_name(vessel)?;
    let mut hailer = Hailer::for_vessel(universe, vessel.id)?;
    hailer.activate(universe)?;
    hailer
        .open_interface(universe)
        .with_context(|| format!("cannot open the hailer on {}", vessel.name))?;
    Ok(hailer)
}

/// Build the destination report for `vessel`.
pub fn destination_report(universe: &Universe, vessel: &str) -> Result<DestinationReport> {
    let hailer = open_hailer(universe, vessel)?;
    let name = universe
        .vessel(hailer.vessel())
        .map(|v| v.name.clone())
        .unwrap_or_else(|| vessel.to_string());
    Ok(DestinationReport {
        vessel: name,
        near: hailer.near_beacon().cloned(),
        warnings: hailer.warnings(universe),
        destinations: hailer.destinations(universe)?,
    })
}

/// Handle the `destinations` subcommand.
pub fn handle_destinations(universe: &Universe, vessel: &str, json: bool) -> Result<()> {
    let report = destination_report(universe, vessel)?;
    if json {
        return render_json(&report).context("failed to write destinations");
    }
    print_destinations(&report, &ColorPalette::detect());
    Ok(())
}

fn print_destinations(report: &DestinationReport, palette: &ColorPalette) {
    if let Some(ref near) = report.near {
        println!(
            "Origin: {}{}{} at {} m, drifting {:.1} m/s",
            palette.white_bold,
            near.description,
            palette.reset,
            format_with_separators(near.distance as u64),
            near.relative_velocity
        );
    }
    print_warnings("Losses if jumping unshielded", &report.warnings, palette);

    if report.destinations.is_empty() {
        println!("No destinations in range.");
        return;
    }

    println!("Destinations ({}):", report.destinations.len());
    println!(
        "{}{:<18} {:<6} {:<10} {:>10} {:>8} {:>10} {:>8}  {:<}{}",
        palette.gray,
        "Name",
        "Model",
        "Body",
        "Alt (km)",
        "Cost",
        "Spread (m)",
        "Return",
        "Status",
        palette.reset
    );
    for d in &report.destinations {
        let back = if d.return_trip.feasible {
            format!("{:.2}", d.return_trip.required)
        } else {
            "n/a".to_string()
        };
        println!(
            "{}{:<18}{} {:<6} {:<10} {:>10} {:>8.2} {:>10} {:>8}  {}",
            palette.white_bold,
            d.name,
            palette.reset,
            d.model_name,
            d.body,
            format_with_separators(d.altitude_km.max(0.0) as u64),
            d.plan.equipment_adjusted_cost,
            format_spread(d.plan.spread_radius),
            back,
            format_status(&d.status, palette)
        );
    }
}

fn format_spread(spread: f64) -> String {
    if spread.is_finite() {
        format_with_separators(spread.round() as u64)
    } else {
        "unknown".to_string()
    }
}
