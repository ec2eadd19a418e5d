#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for editing dental clinic floor plans.

mod ascii;
mod config;
mod session;
mod transfer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dental_planner_core::{Edge, Rgb, RoomType};
use dental_planner_persistence::{FileStore, OwnerId};
use tracing_subscriber::EnvFilter;

use crate::{config::PlannerConfig, session::Session};

#[derive(Debug, Parser)]
#[command(
    name = "dental-planner",
    version,
    about = "Edit dental clinic floor plans stored on disk"
)]
struct Cli {
    /// Configuration file; `planner.toml` in the working directory is used when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding saved workspaces.
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Owner whose workspace is edited.
    #[arg(long, global = true)]
    owner: Option<String>,
    #[command(subcommand)]
    command: PlannerCommand,
}

/// Subcommands, each applied to the owner's saved workspace.
#[derive(Debug, Subcommand)]
pub(crate) enum PlannerCommand {
    /// Prints the floor plan as a character map.
    Show {
        /// Highlights the room, wall or cell under this column and row.
        #[arg(long, num_args = 2, value_names = ["X", "Y"])]
        at: Option<Vec<u32>>,
    },
    /// Paints a room; large rooms are centered on the cell.
    Paint {
        /// Room type, e.g. waiting-room, operatory-suite, reception.
        room: RoomType,
        /// Column of the cell.
        x: u32,
        /// Row of the cell.
        y: u32,
        /// Clockwise quarter turns of the furniture layout.
        #[arg(long, default_value_t = 0)]
        rotation: u32,
        /// Label written to the room.
        #[arg(long)]
        label: Option<String>,
        /// Furnishing color as #rrggbb.
        #[arg(long)]
        color: Option<Rgb>,
        /// Enables the room's inventory.
        #[arg(long)]
        inventory: bool,
    },
    /// Attaches a wall, door or window to a cell edge.
    Wall {
        /// straight-wall, door or window.
        kind: RoomType,
        /// Column of the cell.
        x: u32,
        /// Row of the cell.
        y: u32,
        /// north, east, south or west.
        edge: Edge,
        /// Segment color as #rrggbb.
        #[arg(long)]
        color: Option<Rgb>,
    },
    /// Erases the room covering a cell, or one of the cell's walls.
    Erase {
        /// Column of the cell.
        x: u32,
        /// Row of the cell.
        y: u32,
        /// Index of the wall to erase instead of the room.
        #[arg(long)]
        wall: Option<u32>,
    },
    /// Moves a room, or one wall, between cells.
    Move {
        /// Column of the source cell.
        from_x: u32,
        /// Row of the source cell.
        from_y: u32,
        /// Column of the destination cell.
        to_x: u32,
        /// Row of the destination cell.
        to_y: u32,
        /// Index of the wall to move instead of the room.
        #[arg(long)]
        wall: Option<u32>,
    },
    /// Turns a room, or one wall, a quarter turn clockwise.
    Rotate {
        /// Column of the cell.
        x: u32,
        /// Row of the cell.
        y: u32,
        /// Index of the wall to rotate instead of the room.
        #[arg(long)]
        wall: Option<u32>,
    },
    /// Lists inventory stored in rooms.
    Inventory {
        /// Sums quantities per item name.
        #[arg(long)]
        totals: bool,
        /// Prints the entries as JSON.
        #[arg(long, conflicts_with = "totals")]
        json: bool,
    },
    /// Prints the design as a single-line transfer string.
    Export,
    /// Replaces the design with one read from a transfer string.
    Import {
        /// String produced by `export`.
        value: String,
    },
}

/// Entry point for the dental planner command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = PlannerConfig::load(cli.config.as_deref())?;

    let directory = cli.store.unwrap_or(config.store.directory);
    let owner = OwnerId::new(cli.owner.unwrap_or(config.store.owner))
        .context("invalid workspace owner")?;
    let mut store = FileStore::new(directory);

    let mut session = Session::open(&store, owner, &config.colors)?;
    print!("{}", session.execute(cli.command)?);
    if let Some(status) = session.finish(&mut store)? {
        println!("{status}");
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
