//! Scenario loading and saving shared by every subcommand.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use beaconnet_lib::{beacon, ResourceCatalog, Universe};

/// Input files selected on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ScenarioPaths {
    pub scenario: Option<PathBuf>,
    pub resources: Option<PathBuf>,
}

impl ScenarioPaths {
    fn scenario_path(&self) -> Result<&Path> {
        self.scenario
            .as_deref()
            .ok_or_else(|| anyhow!("no scenario given; pass --scenario or set BEACONNET_SCENARIO"))
    }
}

/// Load the universe and bring every live beacon's derived figures up to date.
pub fn load_universe(paths: &ScenarioPaths) -> Result<Universe> {
    let path = paths.scenario_path()?;
    let mut universe = Universe::from_path(path)
        .with_context(|| format!("failed to load scenario from {}", path.display()))?;

    if let Some(ref catalog_path) = paths.resources {
        let catalog = ResourceCatalog::from_path(catalog_path).with_context(|| {
            format!(
                "failed to load resource catalog from {}",
                catalog_path.display()
            )
        })?;
        universe.set_catalog(catalog);
    }

    let live: Vec<_> = universe
        .beacon_refs()
        .into_iter()
        .filter(|at| universe.vessel(at.vessel).is_some_and(|v| v.loaded))
        .collect();
    for at in live {
        beacon::state::refresh(&mut universe, at)
            .with_context(|| format!("failed to refresh beacon {at:?}"))?;
    }
    debug!(path = %path.display(), vessels = universe.vessels.len(), "scenario ready");
    Ok(universe)
}

/// Persist the universe as pretty-printed JSON.
pub fn save_universe(universe: &Universe, path: &Path) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    universe
        .to_writer(file)
        .with_context(|| format!("failed to write scenario to {}", path.display()))?;
    info!(path = %path.display(), "scenario saved");
    Ok(())
}
