#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative editing session for the dental clinic floor-plan planner.
//!
//! The [`World`] owns the current grid, its undo history and the scene colors.
//! Every change goes through [`apply`], which runs the placement and move
//! engines, snapshots the pre-edit grid on success and reports the outcome as
//! [`Event`] values.

use dental_planner_core::{
    CellCoord, Command, Event, Grid, GridError, HistoryDirection, MoveError, PlacementError,
    Rgb, DEFAULT_FLOOR_COLOR, DEFAULT_WORLD_COLOR, GRID_SIZE,
};
use tracing::{debug, error, info, warn};

mod footprint;
pub mod history;
pub mod placement;
pub mod relocation;

use history::History;

/// Represents the authoritative editing session.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    history: History,
    world_color: Rgb,
    floor_color: Rgb,
    design_open: bool,
}

impl World {
    /// Creates a session holding a fresh, empty design of the default size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_grid_size(GRID_SIZE)
    }

    /// Creates a session holding a fresh, empty design of the provided size.
    #[must_use]
    pub fn with_grid_size(size: u32) -> Self {
        Self {
            grid: Grid::new(size),
            history: History::new(),
            world_color: DEFAULT_WORLD_COLOR,
            floor_color: DEFAULT_FLOOR_COLOR,
            design_open: true,
        }
    }

    fn commit(&mut self, grid: Grid) {
        self.history.record_before_edit(&self.grid);
        self.grid = grid;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadDesign {
            grid,
            world_color,
            floor_color,
        } => {
            if let Err(reason) = admit_design(&world.grid, &grid) {
                warn!(%reason, "design rejected");
                out_events.push(Event::DesignRejected { reason });
                return;
            }
            let size = grid.size();
            world.grid = grid;
            world.world_color = world_color;
            world.floor_color = floor_color;
            world.history.clear();
            world.design_open = true;
            info!(size, "design loaded");
            out_events.push(Event::DesignLoaded { size });
        }
        Command::CloseDesign => {
            world.grid = Grid::new(world.grid.size());
            world.history.clear();
            world.design_open = false;
            info!("design closed");
            out_events.push(Event::DesignClosed);
        }
        Command::Paint {
            tool,
            cell,
            sub_target,
            brush,
        } => {
            let result = if world.design_open {
                placement::place(&world.grid, tool, cell, sub_target, &brush)
            } else {
                Err(PlacementError::NoDesignLoaded)
            };
            match result {
                Ok(painted) => {
                    debug!(?tool, ?cell, outcome = ?painted.outcome, "paint committed");
                    world.commit(painted.grid);
                    out_events.push(painted.outcome.into());
                }
                Err(reason) => {
                    log_placement_rejection(cell, reason);
                    out_events.push(Event::PlacementRejected { tool, cell, reason });
                }
            }
        }
        Command::Move {
            from,
            to,
            sub_target,
        } => {
            let result = if world.design_open {
                relocation::relocate(&world.grid, from, to, sub_target)
            } else {
                Err(MoveError::NoDesignLoaded)
            };
            match result {
                Ok(relocated) => {
                    debug!(?from, ?to, outcome = ?relocated.outcome, "move committed");
                    world.commit(relocated.grid);
                    out_events.push(relocated.outcome.into());
                }
                Err(reason) => {
                    log_move_rejection(from, to, reason);
                    out_events.push(Event::MoveRejected { from, to, reason });
                }
            }
        }
        Command::UpdateRoom { cell, patch } => {
            let result = if world.design_open {
                placement::update_room(&world.grid, cell, &patch)
            } else {
                Err(PlacementError::NoDesignLoaded)
            };
            match result {
                Ok(updated) => {
                    debug!(?cell, room_type = ?updated.room_type, "room updated");
                    world.commit(updated.grid);
                    out_events.push(Event::RoomUpdated {
                        room_type: updated.room_type,
                        region: updated.region,
                    });
                }
                Err(reason) => {
                    log_placement_rejection(cell, reason);
                    out_events.push(Event::UpdateRejected { cell, reason });
                }
            }
        }
        Command::UpdateWall {
            cell,
            wall_index,
            patch,
        } => {
            let result = if world.design_open {
                placement::update_wall(&world.grid, cell, wall_index, &patch)
            } else {
                Err(PlacementError::NoDesignLoaded)
            };
            match result {
                Ok(grid) => {
                    debug!(?cell, wall_index = wall_index.get(), "wall updated");
                    world.commit(grid);
                    out_events.push(Event::WallUpdated { cell, wall_index });
                }
                Err(reason) => {
                    log_placement_rejection(cell, reason);
                    out_events.push(Event::UpdateRejected { cell, reason });
                }
            }
        }
        Command::SetColors {
            world_color,
            floor_color,
        } => {
            world.world_color = world_color;
            world.floor_color = floor_color;
            out_events.push(Event::ColorsChanged {
                world_color,
                floor_color,
            });
        }
        Command::Undo => {
            if let Some(previous) = world.history.undo(&world.grid) {
                world.grid = previous;
                debug!(remaining = world.history.undo_depth(), "undo");
                out_events.push(Event::HistoryRestored {
                    direction: HistoryDirection::Undo,
                });
            }
        }
        Command::Redo => {
            if let Some(next) = world.history.redo(&world.grid) {
                world.grid = next;
                debug!(remaining = world.history.redo_depth(), "redo");
                out_events.push(Event::HistoryRestored {
                    direction: HistoryDirection::Redo,
                });
            }
        }
    }
}

/// Flags a large room whose member offsets cannot be reconciled with the grid.
///
/// Panics in debug builds; release builds log and let the caller reject.
/// The session's grid is never resized, so a design must match its edge
/// length as well as the stored-grid invariants.
fn admit_design(current: &Grid, offered: &Grid) -> Result<(), GridError> {
    if offered.size() != current.size() {
        return Err(GridError::WrongSize {
            expected: current.size(),
            found: offered.size(),
        });
    }
    offered.validate()
}

pub(crate) fn report_corrupt_group(cell: CellCoord) {
    error!(
        column = cell.column(),
        row = cell.row(),
        "large room member offsets disagree with the grid"
    );
    if cfg!(debug_assertions) {
        panic!("corrupt large room group at {cell:?}");
    }
}

fn log_placement_rejection(cell: CellCoord, reason: PlacementError) {
    match reason {
        PlacementError::OutOfBounds | PlacementError::MissingWall => {
            warn!(?cell, ?reason, "edit addressed a missing cell or wall");
        }
        _ => debug!(?cell, ?reason, "edit rejected"),
    }
}

fn log_move_rejection(from: CellCoord, to: CellCoord, reason: MoveError) {
    match reason {
        MoveError::MissingWall => warn!(?from, ?to, "move addressed a missing wall"),
        _ => debug!(?from, ?to, ?reason, "move rejected"),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dental_planner_core::{
        Brush, CellCoord, CellRect, Grid, MoveError, PlacementError, Rgb, RoomType, SubTarget,
        TileRecord,
    };

    use super::World;
    use crate::footprint::{centered_anchor, room_footprint};
    use crate::{placement, relocation};

    /// Provides read-only access to the current grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Tile stored at the provided cell.
    #[must_use]
    pub fn tile(world: &World, cell: CellCoord) -> Option<&TileRecord> {
        world.grid.tile(cell)
    }

    /// Background color of the scene.
    #[must_use]
    pub fn world_color(world: &World) -> Rgb {
        world.world_color
    }

    /// Floor color of the scene.
    #[must_use]
    pub fn floor_color(world: &World) -> Rgb {
        world.floor_color
    }

    /// Reports whether a design is open for editing.
    #[must_use]
    pub fn is_design_open(world: &World) -> bool {
        world.design_open
    }

    /// Reports whether an undo is available.
    #[must_use]
    pub fn can_undo(world: &World) -> bool {
        world.history.can_undo()
    }

    /// Reports whether a redo is available.
    #[must_use]
    pub fn can_redo(world: &World) -> bool {
        world.history.can_redo()
    }

    /// Ghost footprint for a pending paint together with its verdict.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlacementPreview {
        /// Cells the paint would touch.
        pub region: CellRect,
        /// Reason the paint would be rejected, if it would.
        pub rejection: Option<PlacementError>,
    }

    /// Ghost footprint for a pending drop together with its verdict.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MovePreview {
        /// Cells the dragged entity would cover.
        pub region: CellRect,
        /// Reason the drop would be rejected, if it would.
        pub rejection: Option<MoveError>,
    }

    /// Evaluates a paint against the current grid without committing it.
    ///
    /// Returns `None` when `cell` lies outside the grid.
    #[must_use]
    pub fn placement_preview(
        world: &World,
        tool: RoomType,
        cell: CellCoord,
        sub_target: SubTarget,
        brush: &Brush,
    ) -> Option<PlacementPreview> {
        if !world.grid.contains(cell) {
            return None;
        }
        let fallback = if tool.is_large_room() {
            centered_anchor(cell, world.grid.size()).map_or(CellRect::single(cell), room_footprint)
        } else {
            CellRect::single(cell)
        };
        if !world.design_open {
            return Some(PlacementPreview {
                region: fallback,
                rejection: Some(PlacementError::NoDesignLoaded),
            });
        }

        Some(
            match placement::place(&world.grid, tool, cell, sub_target, brush) {
                Ok(painted) => PlacementPreview {
                    region: painted.outcome.region(),
                    rejection: None,
                },
                Err(reason) => PlacementPreview {
                    region: fallback,
                    rejection: Some(reason),
                },
            },
        )
    }

    /// Evaluates a drop of the drag that started at `from` on `to` without
    /// committing it.
    ///
    /// Returns `None` when nothing movable sits under `from` or the dragged
    /// footprint cannot be placed relative to `to` inside the grid.
    #[must_use]
    pub fn move_preview(
        world: &World,
        from: CellCoord,
        to: CellCoord,
        sub_target: SubTarget,
    ) -> Option<MovePreview> {
        let region = relocation::drag_footprint(&world.grid, from, to, sub_target)?;
        let rejection = if world.design_open {
            relocation::check_drag(&world.grid, from, to, sub_target).err()
        } else {
            Some(MoveError::NoDesignLoaded)
        };
        Some(MovePreview { region, rejection })
    }

    /// Reports whether dropping the drag that started at `from` on `to` would
    /// be accepted.
    #[must_use]
    pub fn is_drag_valid(
        world: &World,
        from: CellCoord,
        to: CellCoord,
        sub_target: SubTarget,
    ) -> bool {
        world.design_open && relocation::is_drag_valid(&world.grid, from, to, sub_target)
    }
}
