#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure selection system resolving clicks into rooms, cells and wall segments.
//!
//! [`resolve`] normalizes a click the same way the editing engines address
//! rooms, [`inspect`] builds the inspector view for a selection and
//! [`SelectionTracker`] keeps the current selection pointing at the right
//! entity as world events arrive.

use dental_planner_core::{
    CellCoord, CellRect, CellRectSize, Event, Grid, InventoryItem, PlacedWall, Rgb,
    RoomMembership, RoomType, Rotation, SubTarget, WallIndex, LARGE_ROOM_CENTER, LARGE_ROOM_SIZE,
};
use tracing::trace;

/// Entity addressed by the inspector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Selection {
    /// One wall segment of a cell.
    Wall {
        /// Cell carrying the wall.
        cell: CellCoord,
        /// Index of the wall in the cell's list.
        wall_index: WallIndex,
    },
    /// A large room, addressed by its anchor.
    Room {
        /// Top-left member of the room.
        anchor: CellCoord,
    },
    /// A single cell: a single-tile room or empty floor.
    Cell {
        /// Selected cell.
        cell: CellCoord,
    },
}

impl Selection {
    /// Cell that edit commands for this selection should address.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        match *self {
            Self::Wall { cell, .. } | Self::Cell { cell } => cell,
            Self::Room { anchor } => anchor,
        }
    }

    /// Sub-target matching the selection.
    #[must_use]
    pub const fn sub_target(&self) -> SubTarget {
        match *self {
            Self::Wall { wall_index, .. } => SubTarget::Wall(wall_index),
            Self::Room { .. } | Self::Cell { .. } => SubTarget::None,
        }
    }
}

/// Resolves a click into a selection.
///
/// Wall sub-targets select that wall when it exists. Otherwise clicks on any
/// large-room member select the room's anchor and every other click selects
/// the cell itself. Returns `None` for cells outside the grid.
#[must_use]
pub fn resolve(grid: &Grid, cell: CellCoord, sub_target: SubTarget) -> Option<Selection> {
    let tile = grid.tile(cell)?;
    if let Some(wall_index) = sub_target.wall_index() {
        if tile.wall(wall_index).is_some() {
            return Some(Selection::Wall { cell, wall_index });
        }
    }

    match grid.membership(cell)? {
        RoomMembership::Large { anchor } => Some(Selection::Room { anchor }),
        RoomMembership::Vacant | RoomMembership::Single | RoomMembership::Corrupt => {
            Some(Selection::Cell { cell })
        }
    }
}

/// Inspector view of a selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inspection {
    /// A wall segment.
    Wall {
        /// Cell carrying the wall.
        cell: CellCoord,
        /// Index of the wall in the cell's list.
        wall_index: WallIndex,
        /// Current wall attributes.
        wall: PlacedWall,
    },
    /// A room, large or single-tile.
    Room(RoomDetails),
    /// Empty floor.
    Floor {
        /// Selected cell.
        cell: CellCoord,
        /// Number of walls attached to the cell.
        wall_count: usize,
    },
}

/// Room-scoped attributes shown by the inspector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomDetails {
    /// Type of the room.
    pub room_type: RoomType,
    /// Cells covered by the room.
    pub region: CellRect,
    /// Shared rotation.
    pub rotation: Rotation,
    /// Shared color override.
    pub custom_color: Option<Rgb>,
    /// Label stored on the room's label-bearing cell.
    pub label: Option<String>,
    /// Inventory flag stored on the room's label-bearing cell.
    pub has_inventory: bool,
    /// Inventory stored on the room's label-bearing cell.
    pub inventory_items: Vec<InventoryItem>,
}

/// Builds the inspector view of `selection` against the current grid.
///
/// Returns `None` when the selection no longer addresses anything.
#[must_use]
pub fn inspect(grid: &Grid, selection: Selection) -> Option<Inspection> {
    match selection {
        Selection::Wall { cell, wall_index } => {
            let wall = grid.tile(cell)?.wall(wall_index)?.clone();
            Some(Inspection::Wall {
                cell,
                wall_index,
                wall,
            })
        }
        Selection::Room { anchor } => {
            let center = CellCoord::new(
                anchor.column() + LARGE_ROOM_CENTER.column(),
                anchor.row() + LARGE_ROOM_CENTER.row(),
            );
            let shared = grid.tile(anchor)?;
            let scoped = grid.tile(center)?;
            if !shared.room_type.is_large_room() {
                return None;
            }
            Some(Inspection::Room(RoomDetails {
                room_type: shared.room_type,
                region: CellRect::from_origin_and_size(
                    anchor,
                    CellRectSize::new(LARGE_ROOM_SIZE, LARGE_ROOM_SIZE),
                ),
                rotation: shared.rotation,
                custom_color: shared.custom_color,
                label: scoped.label.clone(),
                has_inventory: scoped.has_inventory,
                inventory_items: scoped.inventory_items.clone(),
            }))
        }
        Selection::Cell { cell } => {
            let tile = grid.tile(cell)?;
            if !tile.is_occupied() {
                return Some(Inspection::Floor {
                    cell,
                    wall_count: tile.placed_walls.len(),
                });
            }
            Some(Inspection::Room(RoomDetails {
                room_type: tile.room_type,
                region: CellRect::single(cell),
                rotation: tile.rotation,
                custom_color: tile.custom_color,
                label: tile.label.clone(),
                has_inventory: tile.has_inventory,
                inventory_items: tile.inventory_items.clone(),
            }))
        }
    }
}

/// Keeps the current selection aligned with world events.
#[derive(Clone, Debug, Default)]
pub struct SelectionTracker {
    current: Option<Selection>,
}

impl SelectionTracker {
    /// Creates a tracker with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected entity, if any.
    #[must_use]
    pub fn current(&self) -> Option<Selection> {
        self.current
    }

    /// Replaces the current selection.
    pub fn select(&mut self, selection: Option<Selection>) {
        self.current = selection;
    }

    /// Drops the current selection.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Consumes world events, following moved entities and dropping
    /// selections whose target disappeared.
    ///
    /// Wall indices are renumbered by history restores, so wall selections do
    /// not survive undo or redo.
    ///
    /// `grid` must be the grid after the events were produced.
    pub fn handle(&mut self, events: &[Event], grid: &Grid) {
        for event in events {
            self.current = match (event, self.current) {
                (Event::DesignLoaded { .. } | Event::DesignClosed, _) => None,
                (Event::RoomMoved { room_type, to, .. }, _) => Some(if room_type.is_large_room() {
                    Selection::Room { anchor: *to }
                } else {
                    Selection::Cell { cell: *to }
                }),
                (Event::WallMoved { to, to_index, .. }, _) => Some(Selection::Wall {
                    cell: *to,
                    wall_index: *to_index,
                }),
                (
                    Event::WallErased { cell, wall_index },
                    Some(Selection::Wall {
                        cell: selected,
                        wall_index: index,
                    }),
                ) if *cell == selected => shift_after_removal(selected, index, *wall_index),
                (Event::HistoryRestored { .. }, Some(Selection::Wall { .. })) => None,
                (Event::RoomErased { region, .. }, Some(selection))
                    if !matches!(selection, Selection::Wall { .. })
                        && region.contains(selection.cell()) =>
                {
                    None
                }
                (_, current) => current,
            };
        }

        if let Some(selection) = self.current {
            if !still_valid(grid, selection) {
                trace!(?selection, "selection no longer addresses anything");
                self.current = None;
            }
        }
    }
}

fn shift_after_removal(
    cell: CellCoord,
    selected: WallIndex,
    removed: WallIndex,
) -> Option<Selection> {
    if selected == removed {
        return None;
    }
    let wall_index = if selected > removed {
        WallIndex::new(selected.get() - 1)
    } else {
        selected
    };
    Some(Selection::Wall { cell, wall_index })
}

fn still_valid(grid: &Grid, selection: Selection) -> bool {
    match selection {
        Selection::Wall { cell, wall_index } => grid
            .tile(cell)
            .is_some_and(|tile| tile.wall(wall_index).is_some()),
        Selection::Room { anchor } => {
            grid.membership(anchor) == Some(RoomMembership::Large { anchor })
        }
        Selection::Cell { cell } => grid.contains(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_walls_shift_down_when_an_earlier_one_is_removed() {
        let cell = CellCoord::new(1, 1);
        assert_eq!(
            shift_after_removal(cell, WallIndex::new(2), WallIndex::new(0)),
            Some(Selection::Wall {
                cell,
                wall_index: WallIndex::new(1)
            })
        );
        assert_eq!(
            shift_after_removal(cell, WallIndex::new(0), WallIndex::new(2)),
            Some(Selection::Wall {
                cell,
                wall_index: WallIndex::new(0)
            })
        );
        assert_eq!(
            shift_after_removal(cell, WallIndex::new(1), WallIndex::new(1)),
            None
        );
    }

    #[test]
    fn selection_exposes_addressed_cell() {
        let anchor = CellCoord::new(5, 5);
        assert_eq!(Selection::Room { anchor }.cell(), anchor);
        assert_eq!(Selection::Room { anchor }.sub_target(), SubTarget::None);
        assert_eq!(
            Selection::Wall {
                cell: anchor,
                wall_index: WallIndex::new(3)
            }
            .sub_target(),
            SubTarget::Wall(WallIndex::new(3))
        );
    }

    #[test]
    fn empty_grid_clicks_select_cells() {
        let grid = Grid::new(3);
        assert_eq!(
            resolve(&grid, CellCoord::new(2, 0), SubTarget::Wall(WallIndex::new(0))),
            Some(Selection::Cell {
                cell: CellCoord::new(2, 0)
            })
        );
        assert_eq!(resolve(&grid, CellCoord::new(3, 0), SubTarget::None), None);
    }
}
