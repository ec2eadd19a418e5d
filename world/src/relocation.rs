//! Move engine: relocates rooms and wall segments between cells.

use dental_planner_core::{
    CellCoord, CellRect, Event, Grid, MoveError, PlacedWall, RoomMembership, RoomType, SubTarget,
    TileRecord, VariantOffset, WallIndex, LARGE_ROOM_SIZE,
};

use crate::footprint::{offset_from, room_footprint, wall_fits};
use crate::report_corrupt_group;

/// Result of a successful move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relocated {
    /// Grid after the move.
    pub grid: Grid,
    /// What the move changed.
    pub outcome: MoveOutcome,
}

/// Description of the change made by a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// A room changed position.
    RoomMoved {
        /// Type of the moved room.
        room_type: RoomType,
        /// Previous anchor.
        from: CellCoord,
        /// New anchor.
        to: CellCoord,
        /// Cells covered after the move.
        region: CellRect,
    },
    /// A wall segment changed cell.
    WallMoved {
        /// Source cell.
        from: CellCoord,
        /// Index in the source list before removal.
        from_index: WallIndex,
        /// Destination cell.
        to: CellCoord,
        /// Index in the destination list.
        to_index: WallIndex,
    },
}

impl From<MoveOutcome> for Event {
    fn from(outcome: MoveOutcome) -> Self {
        match outcome {
            MoveOutcome::RoomMoved {
                room_type,
                from,
                to,
                region,
            } => Event::RoomMoved {
                room_type,
                from,
                to,
                region,
            },
            MoveOutcome::WallMoved {
                from,
                from_index,
                to,
                to_index,
            } => Event::WallMoved {
                from,
                from_index,
                to,
                to_index,
            },
        }
    }
}

#[derive(Clone, Debug)]
enum MovePlan {
    Wall {
        index: WallIndex,
        wall: PlacedWall,
    },
    Single {
        room_type: RoomType,
    },
    Large {
        room_type: RoomType,
        source: CellCoord,
        target: CellCoord,
    },
}

/// Moves the room or wall found at `from` so that the grabbed cell lands on `to`.
///
/// When `sub_target` names a wall only that segment travels. Otherwise the
/// whole room under `from` moves, keeping the grabbed member under the
/// pointer. Walls attached to room cells stay where they are.
pub fn relocate(
    grid: &Grid,
    from: CellCoord,
    to: CellCoord,
    sub_target: SubTarget,
) -> Result<Relocated, MoveError> {
    let plan = plan_move(grid, from, to, sub_target).inspect_err(|error| {
        if *error == MoveError::CorruptGroup {
            report_corrupt_group(from);
        }
    })?;

    match plan {
        MovePlan::Wall { index, wall } => move_wall(grid, from, index, to, wall),
        MovePlan::Single { room_type } => move_single_tile(grid, room_type, from, to),
        MovePlan::Large {
            room_type,
            source,
            target,
        } => move_large_room(grid, room_type, source, target),
    }
}

/// Reports whether dropping the drag that started at `from` on `to` would
/// succeed, without touching the grid.
#[must_use]
pub fn is_drag_valid(
    grid: &Grid,
    from: CellCoord,
    to: CellCoord,
    sub_target: SubTarget,
) -> bool {
    check_drag(grid, from, to, sub_target).is_ok()
}

/// Validates the drag that started at `from` against a drop on `to`,
/// returning the reason a drop would be rejected.
pub fn check_drag(
    grid: &Grid,
    from: CellCoord,
    to: CellCoord,
    sub_target: SubTarget,
) -> Result<(), MoveError> {
    plan_move(grid, from, to, sub_target).map(|_| ())
}

/// Footprint a drag would occupy if dropped on `to`, valid or not.
///
/// Returns `None` when nothing movable sits under `from` or the footprint
/// would leave the grid.
#[must_use]
pub fn drag_footprint(
    grid: &Grid,
    from: CellCoord,
    to: CellCoord,
    sub_target: SubTarget,
) -> Option<CellRect> {
    if sub_target.wall_index().is_some() {
        return grid.contains(to).then(|| CellRect::single(to));
    }
    match grid.membership(from)? {
        RoomMembership::Single => grid.contains(to).then(|| CellRect::single(to)),
        RoomMembership::Large { anchor } => {
            let target = shifted_anchor(grid, anchor, from, to).ok()?;
            Some(room_footprint(target))
        }
        RoomMembership::Vacant | RoomMembership::Corrupt => None,
    }
}

fn plan_move(
    grid: &Grid,
    from: CellCoord,
    to: CellCoord,
    sub_target: SubTarget,
) -> Result<MovePlan, MoveError> {
    if from == to {
        return Err(MoveError::SameCell);
    }
    let source = grid.tile(from).ok_or(MoveError::OutOfBounds)?;
    let destination = grid.tile(to).ok_or(MoveError::OutOfBounds)?;

    if let Some(index) = sub_target.wall_index() {
        let wall = source.wall(index).ok_or(MoveError::MissingWall)?;
        if destination.wall_on(wall.rotation).is_some() {
            return Err(MoveError::EdgeOccupied);
        }
        if !wall_fits(destination, wall.rotation) {
            return Err(MoveError::OffPerimeter);
        }
        return Ok(MovePlan::Wall {
            index,
            wall: wall.clone(),
        });
    }

    let room_type = source.room_type;
    match grid.membership(from) {
        None => Err(MoveError::OutOfBounds),
        Some(RoomMembership::Vacant) => Err(MoveError::NothingToMove),
        Some(RoomMembership::Corrupt) => Err(MoveError::CorruptGroup),
        Some(RoomMembership::Single) => {
            if destination.is_occupied() {
                Err(MoveError::Occupied)
            } else {
                Ok(MovePlan::Single { room_type })
            }
        }
        Some(RoomMembership::Large { anchor }) => {
            let target = shifted_anchor(grid, anchor, from, to)?;
            let source_region = room_footprint(anchor);
            let blocked = room_footprint(target).cells().any(|cell| {
                grid.tile(cell).map_or(true, |tile| {
                    tile.is_occupied()
                        && !(source_region.contains(cell) && tile.room_type == room_type)
                })
            });
            if blocked {
                return Err(MoveError::Occupied);
            }
            Ok(MovePlan::Large {
                room_type,
                source: anchor,
                target,
            })
        }
    }
}

fn shifted_anchor(
    grid: &Grid,
    anchor: CellCoord,
    from: CellCoord,
    to: CellCoord,
) -> Result<CellCoord, MoveError> {
    let grabbed = offset_from(anchor, from);
    let column = to
        .column()
        .checked_sub(grabbed.column())
        .ok_or(MoveError::OutOfBounds)?;
    let row = to
        .row()
        .checked_sub(grabbed.row())
        .ok_or(MoveError::OutOfBounds)?;
    if column + LARGE_ROOM_SIZE > grid.size() || row + LARGE_ROOM_SIZE > grid.size() {
        return Err(MoveError::OutOfBounds);
    }
    Ok(CellCoord::new(column, row))
}

fn move_wall(
    grid: &Grid,
    from: CellCoord,
    from_index: WallIndex,
    to: CellCoord,
    wall: PlacedWall,
) -> Result<Relocated, MoveError> {
    let mut next = grid.clone();
    let _removed = next
        .tile_mut(from)
        .and_then(|tile| tile.detach_wall(from_index))
        .ok_or(MoveError::MissingWall)?;
    let (to_index, _) = next
        .tile_mut(to)
        .ok_or(MoveError::OutOfBounds)?
        .attach_wall(wall);

    Ok(Relocated {
        grid: next,
        outcome: MoveOutcome::WallMoved {
            from,
            from_index,
            to,
            to_index,
        },
    })
}

fn move_single_tile(
    grid: &Grid,
    room_type: RoomType,
    from: CellCoord,
    to: CellCoord,
) -> Result<Relocated, MoveError> {
    let mut next = grid.clone();
    let source = next.tile(from).cloned().ok_or(MoveError::OutOfBounds)?;
    next.tile_mut(to)
        .ok_or(MoveError::OutOfBounds)?
        .copy_room_from(&source);
    next.tile_mut(from)
        .ok_or(MoveError::OutOfBounds)?
        .clear_room();

    Ok(Relocated {
        grid: next,
        outcome: MoveOutcome::RoomMoved {
            room_type,
            from,
            to,
            region: CellRect::single(to),
        },
    })
}

fn move_large_room(
    grid: &Grid,
    room_type: RoomType,
    source: CellCoord,
    target: CellCoord,
) -> Result<Relocated, MoveError> {
    let members: Vec<(VariantOffset, TileRecord)> = room_footprint(source)
        .cells()
        .filter_map(|cell| grid.tile(cell))
        .filter(|tile| tile.room_type == room_type)
        .map(|tile| (offset_from(source, tile.cell()), tile.clone()))
        .collect();

    let mut next = grid.clone();
    for (offset, _) in &members {
        let cell = CellCoord::new(
            source.column() + offset.column(),
            source.row() + offset.row(),
        );
        next.tile_mut(cell)
            .ok_or(MoveError::OutOfBounds)?
            .clear_room();
    }
    for (offset, member) in &members {
        let cell = CellCoord::new(
            target.column() + offset.column(),
            target.row() + offset.row(),
        );
        let tile = next.tile_mut(cell).ok_or(MoveError::OutOfBounds)?;
        tile.copy_room_from(member);
        tile.set_variant(Some(*offset));
    }

    Ok(Relocated {
        grid: next,
        outcome: MoveOutcome::RoomMoved {
            room_type,
            from: source,
            to: target,
            region: room_footprint(target),
        },
    })
}
