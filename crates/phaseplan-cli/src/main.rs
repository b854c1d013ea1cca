//! phaseplan CLI application
//!
//! Command-line interface for planning missions as a sequence of phases.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use phaseplan_core::PlannerBuilder;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        config_file,
        mission,
        no_color,
        command,
    } = Args::parse();

    let planner = PlannerBuilder::new()
        .with_database_path(database_file)
        .with_config_file(config_file)
        .build()
        .await
        .context("Failed to initialize planner")?;

    let renderer = TerminalRenderer::new(!no_color);
    let cli = Cli::new(planner, renderer, mission);

    info!("phaseplan started");

    match command {
        Some(Phase { command }) => cli.handle_phase_command(command).await,
        Some(Unit { command }) => cli.handle_unit_command(command).await,
        Some(Mission { command }) => cli.handle_mission_command(command).await,
        None => cli.list_missions().await,
    }
}
