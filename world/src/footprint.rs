//! Large-room footprint and perimeter helpers.

use dental_planner_core::{
    CellCoord, CellRect, CellRectSize, Edge, Rotation, TileRecord, VariantOffset, LARGE_ROOM_SIZE,
};

/// Square footprint of a large room anchored at `anchor`.
pub(crate) const fn room_footprint(anchor: CellCoord) -> CellRect {
    CellRect::from_origin_and_size(anchor, CellRectSize::new(LARGE_ROOM_SIZE, LARGE_ROOM_SIZE))
}

/// Anchor that centers a large room on `click`, clamped to keep the footprint
/// inside a grid of `grid_size` cells.
///
/// Returns `None` when the grid is smaller than a large room.
pub(crate) fn centered_anchor(click: CellCoord, grid_size: u32) -> Option<CellCoord> {
    let max_origin = grid_size.checked_sub(LARGE_ROOM_SIZE)?;
    let half = LARGE_ROOM_SIZE / 2;
    let clamp = |value: u32| value.saturating_sub(half).min(max_origin);
    Some(CellCoord::new(clamp(click.column()), clamp(click.row())))
}

/// Offset of `cell` from `anchor`.
pub(crate) const fn offset_from(anchor: CellCoord, cell: CellCoord) -> VariantOffset {
    VariantOffset::new(cell.column() - anchor.column(), cell.row() - anchor.row())
}

/// Reports whether a wall on `edge` of the member at `offset` lies on the
/// room's outer boundary.
pub(crate) const fn edge_on_perimeter(offset: VariantOffset, edge: Edge) -> bool {
    match edge {
        Edge::North => offset.row() == 0,
        Edge::East => offset.column() == LARGE_ROOM_SIZE - 1,
        Edge::South => offset.row() == LARGE_ROOM_SIZE - 1,
        Edge::West => offset.column() == 0,
    }
}

/// Reports whether a wall with the provided rotation may be attached to `tile`.
///
/// Cells outside large rooms accept any edge. Members without recorded
/// offsets use their position modulo the room size.
pub(crate) fn wall_fits(tile: &TileRecord, rotation: Rotation) -> bool {
    if !tile.room_type.is_large_room() {
        return true;
    }

    let offset = tile.variant().unwrap_or_else(|| {
        VariantOffset::new(tile.x % LARGE_ROOM_SIZE, tile.y % LARGE_ROOM_SIZE)
    });
    edge_on_perimeter(offset, rotation.edge())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dental_planner_core::{RoomType, GRID_SIZE};

    #[test]
    fn centered_anchor_clamps_to_grid() {
        assert_eq!(
            centered_anchor(CellCoord::new(7, 7), GRID_SIZE),
            Some(CellCoord::new(5, 5))
        );
        assert_eq!(
            centered_anchor(CellCoord::new(0, 1), GRID_SIZE),
            Some(CellCoord::new(0, 0))
        );
        assert_eq!(
            centered_anchor(CellCoord::new(14, 13), GRID_SIZE),
            Some(CellCoord::new(10, 10))
        );
        assert_eq!(centered_anchor(CellCoord::new(1, 1), 4), None);
    }

    #[test]
    fn only_boundary_edges_are_on_perimeter() {
        for row in 0..LARGE_ROOM_SIZE {
            for column in 0..LARGE_ROOM_SIZE {
                let offset = VariantOffset::new(column, row);
                assert_eq!(edge_on_perimeter(offset, Edge::North), row == 0);
                assert_eq!(edge_on_perimeter(offset, Edge::East), column == 4);
                assert_eq!(edge_on_perimeter(offset, Edge::South), row == 4);
                assert_eq!(edge_on_perimeter(offset, Edge::West), column == 0);
            }
        }
    }

    #[test]
    fn walls_fit_anywhere_outside_large_rooms() {
        let mut tile = TileRecord::empty(CellCoord::new(7, 7));
        assert!(Rotation::ALL.into_iter().all(|rotation| wall_fits(&tile, rotation)));

        tile.room_type = RoomType::Office;
        assert!(Rotation::ALL.into_iter().all(|rotation| wall_fits(&tile, rotation)));

        tile.room_type = RoomType::WaitingRoom;
        tile.set_variant(Some(VariantOffset::new(2, 2)));
        assert!(!Rotation::ALL.into_iter().any(|rotation| wall_fits(&tile, rotation)));
    }
}
