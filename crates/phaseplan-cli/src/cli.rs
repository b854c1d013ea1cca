//! Command definitions and handlers.
//!
//! Argument structs carry the clap derives and convert into the core's
//! interface-agnostic parameter types:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Planner → Display wrapper
//! ```
//!
//! The mission name is a global flag, so conversions take it alongside the
//! parsed arguments. Phase numbers on the command line are one-based, the
//! way phase lists print them.

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use jiff::Timestamp;
use log::debug;
use phaseplan_core::{
    display::{CreateResult, DeleteResult, Entities, OperationStatus, UpdateResult},
    models::{parse_control_points, EntityId, Geometry},
    params::*,
    MissionDocument, Planner,
};

use crate::renderer::TerminalRenderer;

// ============================================================================
// Shared argument types
// ============================================================================

/// Geometry kind for the coordinates given on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShapeArg {
    /// A single x,y pair
    Point,
    /// An open line through every pair
    Polyline,
    /// A closed ring through every pair
    Polygon,
}

/// Coordinates as `x,y` pairs separated by `;`, e.g. `10,20` or
/// `0,0;10,0;10,10`. Without `--shape`, one pair is a point and more are a
/// polyline.
fn parse_geometry(coordinates: &str, shape: Option<ShapeArg>) -> Result<Geometry> {
    let points = parse_control_points(coordinates)?;
    let shape = shape.unwrap_or(if points.len() == 1 {
        ShapeArg::Point
    } else {
        ShapeArg::Polyline
    });

    Ok(match shape {
        ShapeArg::Point => match points.as_slice() {
            [point] => Geometry::Point(*point),
            _ => bail!(
                "A point takes exactly one x,y pair, got {}",
                points.len()
            ),
        },
        ShapeArg::Polyline => Geometry::polyline(points),
        ShapeArg::Polygon => Geometry::polygon(points),
    })
}

/// One-based phase number as typed by the user.
fn phase_index(number: usize) -> usize {
    number.saturating_sub(1)
}

// ============================================================================
// Phase commands
// ============================================================================

/// Append a phase after the last one and select it
#[derive(Args)]
pub struct AddPhaseArgs {
    #[arg(help = "Name of the new phase")]
    pub name: String,
    #[arg(
        long,
        help = "Start of the first phase as an RFC 3339 timestamp. Defaults to now; ignored once the mission has phases"
    )]
    pub start: Option<Timestamp>,
}

impl AddPhaseArgs {
    pub fn into_params(self, mission: String) -> AddPhase {
        AddPhase {
            mission,
            name: self.name,
            start: self.start,
        }
    }
}

/// Address a phase by its number in the phase list
#[derive(Args)]
pub struct PhaseNumberArgs {
    #[arg(
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Phase number, starting at 1"
    )]
    pub number: u64,
}

impl PhaseNumberArgs {
    pub fn into_params(self, mission: String) -> PhaseRef {
        PhaseRef {
            mission,
            index: phase_index(self.number as usize),
        }
    }
}

/// Rename a phase or move its time span
///
/// The new span must stay between the neighbouring phases. Units whose
/// lifetime began or ended on the old boundaries follow the new ones.
#[derive(Args)]
pub struct EditPhaseArgs {
    #[arg(
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Phase number, starting at 1"
    )]
    pub number: u64,
    #[arg(short, long, help = "New name for the phase")]
    pub name: Option<String>,
    #[arg(long, help = "New start as an RFC 3339 timestamp")]
    pub start: Option<Timestamp>,
    #[arg(long, help = "New end as an RFC 3339 timestamp")]
    pub end: Option<Timestamp>,
}

impl EditPhaseArgs {
    pub fn into_params(self, mission: String) -> EditPhase {
        EditPhase {
            mission,
            index: phase_index(self.number as usize),
            name: self.name,
            start: self.start,
            end: self.end,
        }
    }
}

#[derive(Subcommand)]
pub enum PhaseCommands {
    /// Append a phase and select it
    #[command(alias = "a")]
    Add(AddPhaseArgs),
    /// List all phases, marking the selected one
    #[command(alias = "l")]
    List,
    /// Show the units of the selected phase
    #[command(alias = "s")]
    Show,
    /// Select a phase by number
    Select(PhaseNumberArgs),
    /// Select the next phase
    #[command(alias = "n")]
    Next,
    /// Select the previous phase
    #[command(alias = "b", alias = "prev")]
    Back,
    /// Delete a phase by number
    #[command(alias = "d")]
    Delete(PhaseNumberArgs),
    /// Rename a phase or change its time span
    #[command(alias = "e")]
    Edit(EditPhaseArgs),
}

// ============================================================================
// Unit commands
// ============================================================================

/// Place a new unit in the selected phase
///
/// When the mission has no phases yet, a first phase is added.
#[derive(Args)]
pub struct CreateUnitArgs {
    #[arg(help = "Symbol identification code, e.g. SFGPUCI----K---")]
    pub symbol_code: String,
    #[arg(
        allow_hyphen_values = true,
        help = "Coordinates as x,y pairs separated by ';'"
    )]
    pub coordinates: String,
    #[arg(short, long, value_enum, help = "Geometry kind of the coordinates")]
    pub shape: Option<ShapeArg>,
}

impl CreateUnitArgs {
    pub fn into_params(self, mission: String) -> Result<CreateEntity> {
        Ok(CreateEntity {
            mission,
            geometry: parse_geometry(&self.coordinates, self.shape)?,
            symbol_code: self.symbol_code,
        })
    }
}

/// Move a unit within the selected phase
///
/// Positions recorded in other phases are kept.
#[derive(Args)]
pub struct MoveUnitArgs {
    #[arg(help = "Unit ID")]
    pub id: EntityId,
    #[arg(
        allow_hyphen_values = true,
        help = "Coordinates as x,y pairs separated by ';'"
    )]
    pub coordinates: String,
    #[arg(short, long, value_enum, help = "Geometry kind of the coordinates")]
    pub shape: Option<ShapeArg>,
}

impl MoveUnitArgs {
    pub fn into_params(self, mission: String) -> Result<UpdatePosition> {
        Ok(UpdatePosition {
            mission,
            id: self.id,
            geometry: parse_geometry(&self.coordinates, self.shape)?,
        })
    }
}

/// Set a unit attribute such as its designation
#[derive(Args)]
pub struct SetAttributeArgs {
    #[arg(help = "Unit ID")]
    pub id: EntityId,
    #[arg(help = "Attribute key, e.g. uniquedesignation")]
    pub key: String,
    #[arg(help = "New value")]
    pub value: String,
}

impl SetAttributeArgs {
    pub fn into_params(self, mission: String) -> SetAttribute {
        SetAttribute {
            mission,
            id: self.id,
            key: self.key,
            value: self.value,
        }
    }
}

/// Address a unit by ID
#[derive(Args)]
pub struct UnitIdArgs {
    #[arg(help = "Unit ID")]
    pub id: EntityId,
}

impl UnitIdArgs {
    pub fn into_params(self, mission: String) -> EntityRef {
        EntityRef {
            mission,
            id: self.id,
        }
    }
}

#[derive(Subcommand)]
pub enum UnitCommands {
    /// Place a unit in the selected phase
    #[command(alias = "c")]
    Create(CreateUnitArgs),
    /// Move a unit in the selected phase
    #[command(alias = "mv")]
    Move(MoveUnitArgs),
    /// Set a unit attribute
    Set(SetAttributeArgs),
    /// Remove a unit from the selected phase
    ///
    /// A unit spanning several phases is trimmed or split rather than
    /// deleted outright.
    #[command(alias = "d", alias = "rm")]
    Delete(UnitIdArgs),
    /// Show a unit with its positions by phase
    #[command(alias = "s")]
    Show(UnitIdArgs),
    /// List every unit of the mission
    #[command(alias = "l")]
    List,
}

// ============================================================================
// Mission commands
// ============================================================================

/// Export the mission
#[derive(Args)]
pub struct ExportArgs {
    #[arg(
        long,
        help = "Export flat geomessages for the selected phase instead of the mission document"
    )]
    pub geomessages: bool,
    #[arg(short, long, help = "Write to this file instead of standard output")]
    pub output: Option<PathBuf>,
}

/// Import a mission document
#[derive(Args)]
pub struct ImportArgs {
    #[arg(help = "Path to a JSON mission document")]
    pub file: PathBuf,
    #[arg(short, long, help = "Store under this name instead of the document's")]
    pub name: Option<String>,
    #[arg(long, help = "Overwrite a stored mission with the same name")]
    pub replace: bool,
}

#[derive(Subcommand)]
pub enum MissionCommands {
    /// Show the mission's phases and units
    #[command(alias = "s")]
    Show,
    /// List stored missions
    #[command(alias = "l")]
    List,
    /// Export the mission as JSON
    #[command(alias = "x")]
    Export(ExportArgs),
    /// Import a mission document
    #[command(alias = "i")]
    Import(ImportArgs),
    /// Delete the mission
    #[command(alias = "d")]
    Delete,
}

// ============================================================================
// Handlers
// ============================================================================

/// Runs parsed commands against the planner and renders the results.
pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
    mission: String,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer, mission: String) -> Self {
        Self {
            planner,
            renderer,
            mission,
        }
    }

    fn mission_ref(&self) -> MissionRef {
        MissionRef {
            mission: self.mission.clone(),
        }
    }

    pub async fn handle_phase_command(&self, command: PhaseCommands) -> Result<()> {
        match command {
            PhaseCommands::Add(args) => {
                let snapshot = self
                    .planner
                    .add_phase(&args.into_params(self.mission.clone()))
                    .await?;
                self.renderer.render(&CreateResult::new(snapshot).to_string())
            }
            PhaseCommands::List => {
                let phases = self.planner.list_phases(&self.mission_ref()).await?;
                self.renderer.render(&phases.to_string())
            }
            PhaseCommands::Show => {
                let snapshot = self.planner.current_phase(&self.mission_ref()).await?;
                self.renderer.render(&snapshot.to_string())
            }
            PhaseCommands::Select(args) => {
                let snapshot = self
                    .planner
                    .select_phase(&args.into_params(self.mission.clone()))
                    .await?;
                self.renderer.render(&snapshot.to_string())
            }
            PhaseCommands::Next => {
                match self.planner.next_phase(&self.mission_ref()).await? {
                    Some(snapshot) => self.renderer.render(&snapshot.to_string()),
                    None => self.renderer.render("Already at the last phase.\n"),
                }
            }
            PhaseCommands::Back => {
                match self.planner.previous_phase(&self.mission_ref()).await? {
                    Some(snapshot) => self.renderer.render(&snapshot.to_string()),
                    None => self.renderer.render("Already at the first phase.\n"),
                }
            }
            PhaseCommands::Delete(args) => {
                let removal = self
                    .planner
                    .delete_phase(&args.into_params(self.mission.clone()))
                    .await?;
                self.renderer.render(&DeleteResult::new(removal).to_string())
            }
            PhaseCommands::Edit(args) => {
                let params = args.into_params(self.mission.clone());
                let mut changes = Vec::new();
                if let Some(name) = &params.name {
                    changes.push(format!("Name: {name}"));
                }
                if let Some(start) = &params.start {
                    changes.push(format!("Start: {start}"));
                }
                if let Some(end) = &params.end {
                    changes.push(format!("End: {end}"));
                }
                if changes.is_empty() {
                    bail!("Nothing to change: pass --name, --start or --end");
                }

                let phase = self.planner.edit_phase(&params).await?;
                self.renderer
                    .render(&UpdateResult::with_changes(phase, changes).to_string())
            }
        }
    }

    pub async fn handle_unit_command(&self, command: UnitCommands) -> Result<()> {
        match command {
            UnitCommands::Create(args) => {
                let params = args.into_params(self.mission.clone())?;
                let unit = self.planner.create_entity(&params).await?;
                self.renderer.render(&CreateResult::new(unit).to_string())
            }
            UnitCommands::Move(args) => {
                let params = args.into_params(self.mission.clone())?;
                let unit = self.planner.update_position(&params).await?;
                let changes = vec![format!(
                    "Position: `{}`",
                    unit.control_points().unwrap_or_default()
                )];
                self.renderer
                    .render(&UpdateResult::with_changes(unit, changes).to_string())
            }
            UnitCommands::Set(args) => {
                let params = args.into_params(self.mission.clone());
                let change = format!("{}: {}", params.key, params.value);
                let unit = self.planner.set_attribute(&params).await?;
                self.renderer
                    .render(&UpdateResult::with_changes(unit, vec![change]).to_string())
            }
            UnitCommands::Delete(args) => {
                let removal = self
                    .planner
                    .delete_entity(&args.into_params(self.mission.clone()))
                    .await?;
                self.renderer.render(&DeleteResult::new(removal).to_string())
            }
            UnitCommands::Show(args) => {
                let id = args.id;
                match self
                    .planner
                    .get_entity(&args.into_params(self.mission.clone()))
                    .await?
                {
                    Some(unit) => self.renderer.render(&unit.to_string()),
                    None => self
                        .renderer
                        .render(&OperationStatus::failure(format!("Unit {id} not found")).to_string()),
                }
            }
            UnitCommands::List => {
                let units = self.planner.list_entities(&self.mission_ref()).await?;
                self.renderer.render(&Entities(units).to_string())
            }
        }
    }

    pub async fn handle_mission_command(&self, command: MissionCommands) -> Result<()> {
        match command {
            MissionCommands::Show => {
                let mission = self.planner.get_mission(&self.mission_ref()).await?;
                self.renderer.render(&mission.to_string())
            }
            MissionCommands::List => self.list_missions().await,
            MissionCommands::Export(args) => self.export(args).await,
            MissionCommands::Import(args) => self.import(args).await,
            MissionCommands::Delete => {
                self.planner.delete_mission(&self.mission_ref()).await?;
                let status = OperationStatus::success(format!("Deleted mission '{}'", self.mission));
                self.renderer.render(&status.to_string())
            }
        }
    }

    pub async fn list_missions(&self) -> Result<()> {
        let summaries = self.planner.list_missions().await?;
        self.renderer.render(&summaries.to_string())
    }

    async fn export(&self, args: ExportArgs) -> Result<()> {
        let json = if args.geomessages {
            let messages = self.planner.export_geomessages(&self.mission_ref()).await?;
            serde_json::to_string_pretty(&messages)?
        } else {
            let document = self.planner.export_mission(&self.mission_ref()).await?;
            serde_json::to_string_pretty(&document)?
        };

        match args.output {
            Some(path) => {
                fs::write(&path, format!("{json}\n"))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                let status = OperationStatus::success(format!(
                    "Exported mission '{}' to {}",
                    self.mission,
                    path.display()
                ));
                self.renderer.render(&status.to_string())
            }
            None => self.renderer.render_raw(&json),
        }
    }

    async fn import(&self, args: ImportArgs) -> Result<()> {
        let json = fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?;
        let document: MissionDocument = serde_json::from_str(&json)
            .with_context(|| format!("{} is not a mission document", args.file.display()))?;
        debug!(
            "importing '{}' with {} phases",
            document.name,
            document.phase_list.len()
        );

        let mission = self
            .planner
            .import_mission(&ImportMission {
                name: args.name,
                document,
                replace: args.replace,
            })
            .await?;

        let status = OperationStatus::success(format!(
            "Imported mission '{}' with {} phases and {} units",
            mission.name,
            mission.phase_count(),
            mission.entities.len()
        ));
        self.renderer.render(&status.to_string())
    }
}
