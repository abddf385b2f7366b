// One module per subcommand. main.rs parses arguments and dispatches here.

pub mod beacons;
pub mod destinations;
pub mod floor;
pub mod jump;
pub mod resources;
