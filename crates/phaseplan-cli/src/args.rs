use std::path::PathBuf;

use clap::{Parser, Subcommand};
use phaseplan_core::models::DEFAULT_MISSION_NAME;

use crate::cli::{MissionCommands, PhaseCommands, UnitCommands};

/// Phased mission planner
///
/// A mission is a sequence of time-boxed phases. Units placed on the map keep
/// one position per phase, so moving a unit in one phase leaves every other
/// phase as it was. Missions are stored in a local SQLite database and can be
/// exported as JSON documents or geomessages.
#[derive(Parser)]
#[command(version, about, name = "phaseplan")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/phaseplan/phaseplan.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Path to a JSON configuration file. Defaults to
    /// $XDG_CONFIG_HOME/phaseplan/config.json when present
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Name of the mission to work on
    #[arg(short, long, global = true, default_value = DEFAULT_MISSION_NAME)]
    pub mission: String,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
///
/// - `phase`: add, select and navigate phases
/// - `unit`: place, move and remove units in the selected phase
/// - `mission`: show, list, import and export whole missions
#[derive(Subcommand)]
pub enum Commands {
    /// Manage phases
    #[command(alias = "p")]
    Phase {
        #[command(subcommand)]
        command: PhaseCommands,
    },
    /// Manage units in the selected phase
    #[command(alias = "u")]
    Unit {
        #[command(subcommand)]
        command: UnitCommands,
    },
    /// Manage stored missions
    #[command(alias = "m")]
    Mission {
        #[command(subcommand)]
        command: MissionCommands,
    },
}
