//! Beaconnet CLI library.
//!
//! Subcommand handlers, scenario loading and terminal rendering for the
//! `beaconnet` binary. The handlers are exposed so integration tests and
//! other front-ends can drive them without spawning a process.

pub mod commands;
pub mod output;
pub mod scenario;
pub mod terminal;
