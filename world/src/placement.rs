//! Placement engine: applies paint tools and inspector edits to a grid.
//!
//! Every function here is pure. It reads the provided grid and either returns
//! a new grid together with a description of the change, or a
//! [`PlacementError`] explaining why the grid was left untouched. Snapshotting
//! the previous grid into history is the caller's responsibility.

use dental_planner_core::{
    Brush, CellCoord, CellRect, Event, Grid, PlacedWall, PlacementError, RoomMembership,
    RoomPatch, RoomType, Rotation, StructureKind, SubTarget, TileRecord, WallIndex, WallPatch,
    LARGE_ROOM_CENTER,
};

use crate::footprint::{centered_anchor, offset_from, room_footprint, wall_fits};
use crate::report_corrupt_group;

/// Result of a successful paint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Painted {
    /// Grid after the paint.
    pub grid: Grid,
    /// What the paint changed.
    pub outcome: PaintOutcome,
}

/// Description of the change made by a paint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintOutcome {
    /// A room was written.
    RoomPlaced {
        /// Type of the new room.
        room_type: RoomType,
        /// Top-left cell of the room.
        anchor: CellCoord,
        /// Cells written.
        region: CellRect,
    },
    /// A room was reset to empty floor.
    RoomErased {
        /// Type of the erased room.
        room_type: RoomType,
        /// Cells covered by the erased room.
        region: CellRect,
    },
    /// A wall was attached.
    WallPlaced {
        /// Cell carrying the wall.
        cell: CellCoord,
        /// Index of the wall in the cell's list.
        wall_index: WallIndex,
        /// Kind of structure.
        kind: StructureKind,
        /// Edge occupied by the wall.
        rotation: Rotation,
        /// Whether an existing wall on the edge was overwritten.
        replaced: bool,
    },
    /// A wall was removed.
    WallErased {
        /// Cell that carried the wall.
        cell: CellCoord,
        /// Index the wall occupied.
        wall_index: WallIndex,
    },
}

impl PaintOutcome {
    /// Cells touched by the paint.
    #[must_use]
    pub const fn region(&self) -> CellRect {
        match *self {
            Self::RoomPlaced { region, .. } | Self::RoomErased { region, .. } => region,
            Self::WallPlaced { cell, .. } | Self::WallErased { cell, .. } => CellRect::single(cell),
        }
    }
}

impl From<PaintOutcome> for Event {
    fn from(outcome: PaintOutcome) -> Self {
        match outcome {
            PaintOutcome::RoomPlaced {
                room_type,
                anchor,
                region,
            } => Event::RoomPlaced {
                room_type,
                anchor,
                region,
            },
            PaintOutcome::RoomErased { room_type, region } => {
                Event::RoomErased { room_type, region }
            }
            PaintOutcome::WallPlaced {
                cell,
                wall_index,
                kind,
                rotation,
                replaced,
            } => Event::WallPlaced {
                cell,
                wall_index,
                kind,
                rotation,
                replaced,
            },
            PaintOutcome::WallErased { cell, wall_index } => Event::WallErased { cell, wall_index },
        }
    }
}

/// Applies a paint tool at `cell`.
///
/// Structural tools attach a wall on the brush's edge, [`RoomType::Empty`]
/// erases (a wall when `sub_target` names one, otherwise the room under the
/// cell), large room types write a whole footprint centered on the click and
/// single-tile types write one cell.
pub fn place(
    grid: &Grid,
    tool: RoomType,
    cell: CellCoord,
    sub_target: SubTarget,
    brush: &Brush,
) -> Result<Painted, PlacementError> {
    let tile = grid.tile(cell).ok_or(PlacementError::OutOfBounds)?;

    if let Some(kind) = tool.as_structure() {
        return place_wall(grid, tile, kind, brush);
    }
    if tool.is_empty() {
        return erase(grid, cell, sub_target);
    }
    if tool.is_large_room() {
        return place_large_room(grid, tool, cell, brush);
    }
    place_single_tile(grid, tile, tool, brush)
}

fn place_wall(
    grid: &Grid,
    tile: &TileRecord,
    kind: StructureKind,
    brush: &Brush,
) -> Result<Painted, PlacementError> {
    let rotation = brush.rotation;
    if !wall_fits(tile, rotation) {
        return Err(PlacementError::OffPerimeter);
    }

    let cell = tile.cell();
    let mut next = grid.clone();
    let target = next.tile_mut(cell).ok_or(PlacementError::OutOfBounds)?;
    let mut wall = PlacedWall::new(kind, rotation);
    wall.custom_color = brush.custom_color;
    let (wall_index, replaced) = target.attach_wall(wall);

    Ok(Painted {
        grid: next,
        outcome: PaintOutcome::WallPlaced {
            cell,
            wall_index,
            kind,
            rotation,
            replaced,
        },
    })
}

fn erase(grid: &Grid, cell: CellCoord, sub_target: SubTarget) -> Result<Painted, PlacementError> {
    if let SubTarget::Wall(wall_index) = sub_target {
        let mut next = grid.clone();
        let _removed = next
            .tile_mut(cell)
            .and_then(|tile| tile.detach_wall(wall_index))
            .ok_or(PlacementError::MissingWall)?;
        return Ok(Painted {
            grid: next,
            outcome: PaintOutcome::WallErased { cell, wall_index },
        });
    }

    let room_type = grid
        .tile(cell)
        .map(|tile| tile.room_type)
        .ok_or(PlacementError::OutOfBounds)?;

    let region = match grid.membership(cell) {
        None => return Err(PlacementError::OutOfBounds),
        Some(RoomMembership::Vacant) => return Err(PlacementError::NothingToErase),
        Some(RoomMembership::Corrupt) => {
            report_corrupt_group(cell);
            return Err(PlacementError::CorruptGroup);
        }
        Some(RoomMembership::Single) => CellRect::single(cell),
        Some(RoomMembership::Large { anchor }) => room_footprint(anchor),
    };

    let mut next = grid.clone();
    for member in region.cells() {
        if let Some(tile) = next.tile_mut(member) {
            if tile.room_type == room_type {
                tile.clear_room();
            }
        }
    }

    Ok(Painted {
        grid: next,
        outcome: PaintOutcome::RoomErased { room_type, region },
    })
}

fn place_large_room(
    grid: &Grid,
    room_type: RoomType,
    click: CellCoord,
    brush: &Brush,
) -> Result<Painted, PlacementError> {
    let anchor = centered_anchor(click, grid.size()).ok_or(PlacementError::OutOfBounds)?;
    let region = room_footprint(anchor);

    let blocked = region
        .cells()
        .any(|member| grid.tile(member).map_or(true, TileRecord::is_occupied));
    if blocked {
        return Err(PlacementError::Occupied);
    }

    let mut next = grid.clone();
    for member in region.cells() {
        let offset = offset_from(anchor, member);
        let Some(tile) = next.tile_mut(member) else {
            return Err(PlacementError::OutOfBounds);
        };
        tile.clear_room();
        tile.room_type = room_type;
        tile.rotation = brush.rotation;
        tile.custom_color = brush.custom_color;
        tile.set_variant(Some(offset));
        if offset == LARGE_ROOM_CENTER {
            tile.label = brush.label.clone();
            tile.has_inventory = brush.has_inventory;
        }
    }

    Ok(Painted {
        grid: next,
        outcome: PaintOutcome::RoomPlaced {
            room_type,
            anchor,
            region,
        },
    })
}

fn place_single_tile(
    grid: &Grid,
    tile: &TileRecord,
    room_type: RoomType,
    brush: &Brush,
) -> Result<Painted, PlacementError> {
    if tile.is_occupied() {
        return Err(PlacementError::Occupied);
    }

    let cell = tile.cell();
    let mut next = grid.clone();
    let target = next.tile_mut(cell).ok_or(PlacementError::OutOfBounds)?;
    target.clear_room();
    target.room_type = room_type;
    target.rotation = brush.rotation;
    target.label = brush.label.clone();
    target.custom_color = brush.custom_color;
    target.has_inventory = brush.has_inventory;

    Ok(Painted {
        grid: next,
        outcome: PaintOutcome::RoomPlaced {
            room_type,
            anchor: cell,
            region: CellRect::single(cell),
        },
    })
}

/// Result of a successful room update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomUpdated {
    /// Grid after the update.
    pub grid: Grid,
    /// Type of the edited room.
    pub room_type: RoomType,
    /// Cells covered by the room.
    pub region: CellRect,
}

/// Applies `patch` to the room containing `cell`.
///
/// Rotation and color fan out to every member of a large room that still
/// carries the room's type; label and inventory fields land on the center
/// member only.
pub fn update_room(
    grid: &Grid,
    cell: CellCoord,
    patch: &RoomPatch,
) -> Result<RoomUpdated, PlacementError> {
    let room_type = grid
        .tile(cell)
        .map(|tile| tile.room_type)
        .ok_or(PlacementError::OutOfBounds)?;
    if patch.is_empty() {
        return Err(PlacementError::NothingToUpdate);
    }

    let (region, scoped_cell) = match grid.membership(cell) {
        None => return Err(PlacementError::OutOfBounds),
        Some(RoomMembership::Vacant) => return Err(PlacementError::NothingToUpdate),
        Some(RoomMembership::Corrupt) => {
            report_corrupt_group(cell);
            return Err(PlacementError::CorruptGroup);
        }
        Some(RoomMembership::Single) => (CellRect::single(cell), cell),
        Some(RoomMembership::Large { anchor }) => (
            room_footprint(anchor),
            CellCoord::new(
                anchor.column() + LARGE_ROOM_CENTER.column(),
                anchor.row() + LARGE_ROOM_CENTER.row(),
            ),
        ),
    };

    let mut next = grid.clone();
    for member in region.cells() {
        let Some(tile) = next.tile_mut(member) else {
            continue;
        };
        if tile.room_type != room_type {
            continue;
        }
        if let Some(rotation) = patch.rotation {
            tile.rotation = rotation;
        }
        if let Some(color) = patch.custom_color {
            tile.custom_color = color;
        }
        if member == scoped_cell {
            if let Some(label) = &patch.label {
                tile.label = label.clone();
            }
            if let Some(has_inventory) = patch.has_inventory {
                tile.has_inventory = has_inventory;
            }
            if let Some(items) = &patch.inventory_items {
                tile.inventory_items = items.clone();
            }
        }
    }

    Ok(RoomUpdated {
        grid: next,
        room_type,
        region,
    })
}

/// Applies `patch` to one wall segment.
///
/// Changing the wall's edge is subject to the same rules as placing it: the
/// new edge must be free on that cell and, inside a large room, lie on the
/// room's perimeter.
pub fn update_wall(
    grid: &Grid,
    cell: CellCoord,
    wall_index: WallIndex,
    patch: &WallPatch,
) -> Result<Grid, PlacementError> {
    let tile = grid.tile(cell).ok_or(PlacementError::OutOfBounds)?;
    let wall = tile.wall(wall_index).ok_or(PlacementError::MissingWall)?;
    if patch.kind.is_none() && patch.custom_color.is_none() && patch.rotation.is_none() {
        return Err(PlacementError::NothingToUpdate);
    }

    if let Some(rotation) = patch.rotation {
        if rotation != wall.rotation {
            if tile.wall_on(rotation).is_some() {
                return Err(PlacementError::EdgeOccupied);
            }
            if !wall_fits(tile, rotation) {
                return Err(PlacementError::OffPerimeter);
            }
        }
    }

    let mut next = grid.clone();
    let target = next
        .tile_mut(cell)
        .and_then(|tile| tile.wall_mut(wall_index))
        .ok_or(PlacementError::MissingWall)?;
    if let Some(kind) = patch.kind {
        target.kind = kind;
    }
    if let Some(color) = patch.custom_color {
        target.custom_color = color;
    }
    if let Some(rotation) = patch.rotation {
        target.rotation = rotation;
    }
    Ok(next)
}
