//! Rendering helpers shared by the subcommands.

use std::io::{self, Write};

use serde::Serialize;

use beaconnet_lib::{BeaconState, DestinationStatus, JumpWarning};

use crate::terminal::{status_marker, ColorPalette};

/// Write any serializable value to stdout as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization or writing fails.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// Colored, fixed-width label for a beacon state.
pub fn format_state(state: BeaconState, palette: &ColorPalette) -> String {
    let (color, label) = match state {
        BeaconState::Active => (palette.green, "Active"),
        BeaconState::Activating => (palette.yellow, "Activating"),
        BeaconState::Offline => (palette.red, "Offline"),
    };
    format!(
        "{color}{} {label:<10}{reset}",
        status_marker(state == BeaconState::Active),
        reset = palette.reset
    )
}

/// Plain-text label for a destination status.
pub fn status_label(status: &DestinationStatus) -> String {
    match status {
        DestinationStatus::Ready => "Ready".to_string(),
        DestinationStatus::NoFuel => "No fuel".to_string(),
        DestinationStatus::Blocked { kind, body } => format!("Blocked ({kind}: {body})"),
    }
}

/// Colored label for a destination status.
pub fn format_status(status: &DestinationStatus, palette: &ColorPalette) -> String {
    let color = match status {
        DestinationStatus::Ready => palette.green,
        DestinationStatus::NoFuel => palette.yellow,
        DestinationStatus::Blocked { .. } => palette.red,
    };
    format!(
        "{color}{} {}{reset}",
        status_marker(*status == DestinationStatus::Ready),
        status_label(status),
        reset = palette.reset
    )
}

/// Print the losses an unshielded transfer causes or caused.
pub fn print_warnings(heading: &str, warnings: &[JumpWarning], palette: &ColorPalette) {
    if warnings.is_empty() {
        return;
    }
    println!("{}{heading}:{}", palette.red, palette.reset);
    for warning in warnings {
        println!("  - {warning}");
    }
}
