use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use beaconnet_cli::commands::{beacons, destinations, floor, jump, resources};
use beaconnet_cli::scenario::{load_universe, ScenarioPaths};

#[derive(Parser, Debug)]
#[command(author, version, about = "Beacon network inspection and jump tools")]
struct Cli {
    /// Scenario file describing bodies and vessels.
    #[arg(long, env = "BEACONNET_SCENARIO", global = true)]
    scenario: Option<PathBuf>,

    /// Resource catalog CSV overriding the built-in densities.
    #[arg(long, env = "BEACONNET_RESOURCES", global = true)]
    resources: Option<PathBuf>,

    /// Seed for arrival dispersion; random when omitted.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every beacon with its state, limits and upgrades.
    Beacons {
        #[arg(long)]
        json: bool,
    },
    /// Power up a beacon.
    Activate {
        /// Vessel carrying the beacon.
        #[arg(long)]
        vessel: String,
        /// Part index of the beacon; defaults to the first beacon aboard.
        #[arg(long)]
        part: Option<usize>,
        /// Write the updated scenario here.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show what a vessel's hailer can reach.
    Destinations {
        #[arg(long)]
        vessel: String,
        #[arg(long)]
        json: bool,
    },
    /// Commit a jump through the nearest beacon.
    Jump {
        /// Travelling vessel (must carry a hailer).
        #[arg(long)]
        vessel: String,
        /// Destination vessel.
        #[arg(long = "to")]
        to: String,
        /// Write the updated scenario here.
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Advance the clock and run every live beacon's upkeep.
    Tick {
        #[arg(long, default_value_t = 1.0)]
        seconds: f64,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Lowest safe altitude for a beacon model around a body.
    Floor {
        #[arg(long)]
        body: String,
        #[arg(long)]
        model: String,
        /// Assume a gravimetric upgrade is fitted.
        #[arg(long)]
        gmu: bool,
    },
    /// List the resource catalog.
    Resources,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let paths = ScenarioPaths {
        scenario: cli.scenario,
        resources: cli.resources,
    };
    let mut universe = load_universe(&paths)?;

    match cli.command {
        Command::Beacons { json } => beacons::handle_list_beacons(&universe, json),
        Command::Activate {
            vessel,
            part,
            output,
        } => beacons::handle_activate(&mut universe, &vessel, part, output.as_deref()),
        Command::Destinations { vessel, json } => {
            destinations::handle_destinations(&universe, &vessel, json)
        }
        Command::Jump {
            vessel,
            to,
            output,
            json,
        } => {
            let mut rng = match cli.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            jump::handle_jump(
                &mut universe,
                &vessel,
                &to,
                &mut rng,
                output.as_deref(),
                json,
            )
        }
        Command::Tick { seconds, output } => {
            beacons::handle_tick(&mut universe, seconds, output.as_deref())
        }
        Command::Floor { body, model, gmu } => floor::handle_floor(&universe, &body, &model, gmu),
        Command::Resources => resources::handle_list_resources(&universe),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
