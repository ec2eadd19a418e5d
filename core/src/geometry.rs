//! Pure coordinate helpers shared by the engine and the render adapter.

use crate::{CellCoord, Rotation, VariantOffset};

/// Number of cells along each edge of the reference floor plan.
pub const GRID_SIZE: u32 = 15;

/// Number of cells along each edge of a large room's footprint.
pub const LARGE_ROOM_SIZE: u32 = 5;

/// Offset of a large room's center member from its anchor along each axis.
pub const LARGE_ROOM_CENTER: VariantOffset =
    VariantOffset::new(LARGE_ROOM_SIZE / 2, LARGE_ROOM_SIZE / 2);

/// Side length of one cell in world units.
pub const CELL_SIZE: f32 = 2.0;

/// Maps a grid cell to the world-space center of its floor tile.
///
/// The grid is centered on the world origin in the X/Z plane with Y up, so
/// column grows along +X and row grows along +Z.
#[must_use]
pub fn grid_to_world(cell: CellCoord, grid_size: u32) -> [f32; 3] {
    let half_extent = grid_size as f32 * CELL_SIZE / 2.0;
    [
        (cell.column() as f32 + 0.5) * CELL_SIZE - half_extent,
        0.0,
        (cell.row() as f32 + 0.5) * CELL_SIZE - half_extent,
    ]
}

/// Maps a world-space point on the floor plane back to the cell beneath it.
///
/// Returns `None` when the point lies outside the grid.
#[must_use]
pub fn world_to_grid(position: [f32; 3], grid_size: u32) -> Option<CellCoord> {
    let half_extent = grid_size as f32 * CELL_SIZE / 2.0;
    let column = ((position[0] + half_extent) / CELL_SIZE).floor();
    let row = ((position[2] + half_extent) / CELL_SIZE).floor();
    let limit = grid_size as f32;
    if !(0.0..limit).contains(&column) || !(0.0..limit).contains(&row) {
        return None;
    }
    Some(CellCoord::new(column as u32, row as u32))
}

/// Maps a member's physical offset to the logical layout slot it shows once
/// the room has been rotated clockwise by `rotation` quarter turns.
///
/// This is the inverse rotation about the footprint center, so furniture
/// layouts can be authored once in a fixed frame. Offsets outside the
/// footprint are returned unchanged.
#[must_use]
pub fn effective_variant(variant: VariantOffset, rotation: Rotation) -> VariantOffset {
    let center = i64::from(LARGE_ROOM_SIZE / 2);
    let size = i64::from(LARGE_ROOM_SIZE);
    let x = i64::from(variant.column()) - center;
    let y = i64::from(variant.row()) - center;

    let (column, row) = match rotation.quarter_turns() {
        0 => (x, y),
        1 => (y, -x),
        2 => (-x, -y),
        _ => (-y, x),
    };

    let column = column + center;
    let row = row + center;
    if !(0..size).contains(&column) || !(0..size).contains(&row) {
        return variant;
    }
    VariantOffset::new(column as u32, row as u32)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    fn all_offsets() -> impl Iterator<Item = VariantOffset> {
        (0..LARGE_ROOM_SIZE)
            .flat_map(|row| (0..LARGE_ROOM_SIZE).map(move |column| VariantOffset::new(column, row)))
    }

    #[test]
    fn effective_variant_is_a_bijection_for_every_rotation() {
        for rotation in Rotation::ALL {
            let image: BTreeSet<_> = all_offsets()
                .map(|offset| effective_variant(offset, rotation))
                .collect();
            assert_eq!(
                image.len(),
                (LARGE_ROOM_SIZE * LARGE_ROOM_SIZE) as usize,
                "rotation {rotation:?} collapsed offsets"
            );
            assert!(image.iter().all(|offset| offset.column() < LARGE_ROOM_SIZE
                && offset.row() < LARGE_ROOM_SIZE));
        }
    }

    #[test]
    fn effective_variant_keeps_center_fixed() {
        for rotation in Rotation::ALL {
            assert_eq!(effective_variant(LARGE_ROOM_CENTER, rotation), LARGE_ROOM_CENTER);
        }
    }

    #[test]
    fn quarter_turn_maps_top_left_to_bottom_left() {
        let top_left = VariantOffset::new(0, 0);
        assert_eq!(
            effective_variant(top_left, Rotation::wrapping(1)),
            VariantOffset::new(0, 4)
        );
        assert_eq!(
            effective_variant(top_left, Rotation::wrapping(2)),
            VariantOffset::new(4, 4)
        );
        assert_eq!(
            effective_variant(top_left, Rotation::wrapping(3)),
            VariantOffset::new(4, 0)
        );
    }

    #[test]
    fn grid_to_world_round_trips_through_hit_testing() {
        for row in 0..GRID_SIZE {
            for column in 0..GRID_SIZE {
                let cell = CellCoord::new(column, row);
                assert_eq!(world_to_grid(grid_to_world(cell, GRID_SIZE), GRID_SIZE), Some(cell));
            }
        }
        assert_eq!(world_to_grid([1000.0, 0.0, 0.0], GRID_SIZE), None);
    }

    #[test]
    fn grid_is_centered_on_origin() {
        let first = grid_to_world(CellCoord::new(0, 0), GRID_SIZE);
        let last = grid_to_world(CellCoord::new(GRID_SIZE - 1, GRID_SIZE - 1), GRID_SIZE);
        assert!((first[0] + last[0]).abs() < f32::EPSILON);
        assert!((first[2] + last[2]).abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn rotation_then_inverse_is_identity(
            column in 0..LARGE_ROOM_SIZE,
            row in 0..LARGE_ROOM_SIZE,
            turns in 0u32..4,
        ) {
            let rotation = Rotation::wrapping(turns);
            let offset = VariantOffset::new(column, row);
            let there = effective_variant(offset, rotation);
            prop_assert_eq!(effective_variant(there, rotation.inverse()), offset);
        }
    }
}
