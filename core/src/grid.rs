//! Authoritative tile store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    CellCoord, CellRect, CellRectSize, Rotation, TileRecord, VariantOffset, GRID_SIZE,
    LARGE_ROOM_SIZE,
};

/// Fixed-size square matrix of [`TileRecord`] values.
///
/// Tiles are stored behind [`Arc`] so cloning a grid shares every tile with
/// the original; writes through [`Grid::tile_mut`] copy only the touched tile.
/// History snapshots therefore cost one pointer per cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<TileRecord>>", into = "Vec<Vec<TileRecord>>")]
pub struct Grid {
    size: u32,
    cells: Vec<Arc<TileRecord>>,
}

impl Grid {
    /// Creates a grid of empty floor tiles.
    #[must_use]
    pub fn new(size: u32) -> Self {
        let mut cells = Vec::with_capacity(size as usize * size as usize);
        for row in 0..size {
            for column in 0..size {
                cells.push(Arc::new(TileRecord::empty(CellCoord::new(column, row))));
            }
        }
        Self { size, cells }
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Rectangle covering the whole grid.
    #[must_use]
    pub const fn bounds(&self) -> CellRect {
        CellRect::from_origin_and_size(
            CellCoord::new(0, 0),
            CellRectSize::new(self.size, self.size),
        )
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.size && cell.row() < self.size
    }

    /// Tile stored at the provided cell.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<&TileRecord> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .map(Arc::as_ref)
    }

    /// Mutable access to the tile stored at the provided cell, detaching it
    /// from any snapshot that still shares it.
    pub fn tile_mut(&mut self, cell: CellCoord) -> Option<&mut TileRecord> {
        let index = self.index(cell)?;
        self.cells.get_mut(index).map(Arc::make_mut)
    }

    /// Iterator over all tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &TileRecord> + '_ {
        self.cells.iter().map(Arc::as_ref)
    }

    /// Reports whether both grids still share the same allocation for a cell.
    #[must_use]
    pub fn shares_tile_with(&self, other: &Grid, cell: CellCoord) -> bool {
        match (self.index(cell), other.index(cell)) {
            (Some(left), Some(right)) => match (self.cells.get(left), other.cells.get(right)) {
                (Some(left), Some(right)) => Arc::ptr_eq(left, right),
                _ => false,
            },
            _ => false,
        }
    }

    /// Classifies how the cell participates in a room placement.
    ///
    /// Large-room members resolve their anchor from the recorded variant
    /// offsets. Members lacking offsets fall back to snapping the coordinate
    /// down to a multiple of [`LARGE_ROOM_SIZE`]; that path exists for older
    /// designs and assumes grid-aligned rooms.
    ///
    /// The resolved footprint must hold the same room type on every cell, each
    /// recording the offset matching its position. Legacy members tolerate
    /// neighbours without offsets. Anything else is [`RoomMembership::Corrupt`].
    #[must_use]
    pub fn membership(&self, cell: CellCoord) -> Option<RoomMembership> {
        let tile = self.tile(cell)?;
        if !tile.is_occupied() {
            return Some(RoomMembership::Vacant);
        }
        if !tile.room_type.is_large_room() {
            return Some(RoomMembership::Single);
        }

        let anchor = match tile.variant() {
            Some(offset) => {
                if offset.column() >= LARGE_ROOM_SIZE || offset.row() >= LARGE_ROOM_SIZE {
                    return Some(RoomMembership::Corrupt);
                }
                match (
                    cell.column().checked_sub(offset.column()),
                    cell.row().checked_sub(offset.row()),
                ) {
                    (Some(column), Some(row)) => CellCoord::new(column, row),
                    _ => return Some(RoomMembership::Corrupt),
                }
            }
            None => CellCoord::new(
                cell.column() / LARGE_ROOM_SIZE * LARGE_ROOM_SIZE,
                cell.row() / LARGE_ROOM_SIZE * LARGE_ROOM_SIZE,
            ),
        };

        if anchor.column() + LARGE_ROOM_SIZE > self.size || anchor.row() + LARGE_ROOM_SIZE > self.size
        {
            return Some(RoomMembership::Corrupt);
        }

        let legacy = tile.variant().is_none();
        if !self.footprint_agrees(anchor, tile, legacy) {
            return Some(RoomMembership::Corrupt);
        }

        Some(RoomMembership::Large { anchor })
    }

    /// Checks the invariants a stored design must satisfy: at most one wall
    /// per cell edge and member offsets inside a large room's footprint.
    ///
    /// Large-room groups are not cross-checked here; [`Grid::membership`]
    /// reports broken groups when they are edited.
    pub fn validate(&self) -> Result<(), GridError> {
        for tile in self.tiles() {
            let cell = tile.cell();
            for (slot, wall) in tile.placed_walls.iter().enumerate() {
                if tile.placed_walls[..slot]
                    .iter()
                    .any(|earlier| earlier.rotation == wall.rotation)
                {
                    return Err(GridError::DuplicateEdge {
                        cell,
                        rotation: wall.rotation,
                    });
                }
            }
            let out_of_range =
                |offset: Option<u32>| offset.is_some_and(|value| value >= LARGE_ROOM_SIZE);
            if out_of_range(tile.variant_x) || out_of_range(tile.variant_y) {
                return Err(GridError::OffsetOutOfRange { cell });
            }
        }
        Ok(())
    }

    fn footprint_agrees(&self, anchor: CellCoord, member: &TileRecord, legacy: bool) -> bool {
        (0..LARGE_ROOM_SIZE).all(|row| {
            (0..LARGE_ROOM_SIZE).all(|column| {
                let expected = VariantOffset::new(column, row);
                self.tile(CellCoord::new(anchor.column() + column, anchor.row() + row))
                    .is_some_and(|tile| {
                        tile.room_type == member.room_type
                            && tile.variant().map_or(legacy, |offset| offset == expected)
                    })
            })
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GRID_SIZE)
    }
}

/// How a cell participates in a room placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomMembership {
    /// The cell holds no room.
    Vacant,
    /// The cell holds a single-tile room or structure tile.
    Single,
    /// The cell belongs to a large room anchored at `anchor`.
    Large {
        /// Top-left member of the room's footprint.
        anchor: CellCoord,
    },
    /// The cell claims large-room membership but its offsets place the
    /// footprint outside the grid or disagree with the other members.
    Corrupt,
}

impl From<Grid> for Vec<Vec<TileRecord>> {
    fn from(grid: Grid) -> Self {
        let width = grid.size as usize;
        let mut rows = Vec::with_capacity(width);
        let mut cells = grid.cells.into_iter();
        for _ in 0..width {
            rows.push(
                cells
                    .by_ref()
                    .take(width)
                    .map(Arc::unwrap_or_clone)
                    .collect(),
            );
        }
        rows
    }
}

impl TryFrom<Vec<Vec<TileRecord>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<TileRecord>>) -> Result<Self, Self::Error> {
        if rows.is_empty() {
            return Err(GridError::Empty);
        }

        let size = u32::try_from(rows.len()).map_err(|_| GridError::TooLarge)?;
        let mut cells = Vec::with_capacity(rows.len() * rows.len());
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != size as usize {
                return Err(GridError::NotSquare {
                    row: row_index,
                    expected: size as usize,
                    found: row.len(),
                });
            }
            for (column_index, tile) in row.into_iter().enumerate() {
                let expected = CellCoord::new(column_index as u32, row_index as u32);
                if tile.cell() != expected {
                    return Err(GridError::MisplacedTile {
                        expected,
                        found: tile.cell(),
                    });
                }
                cells.push(Arc::new(tile));
            }
        }

        let grid = Self { size, cells };
        grid.validate()?;
        Ok(grid)
    }
}

/// Reasons a serialized grid cannot be accepted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grid contained no rows.
    #[error("grid contains no rows")]
    Empty,
    /// The grid has more rows than can be addressed.
    #[error("grid is too large")]
    TooLarge,
    /// A row's length differs from the number of rows.
    #[error("row {row} has {found} tiles, expected {expected}")]
    NotSquare {
        /// Index of the offending row.
        row: usize,
        /// Required number of tiles.
        expected: usize,
        /// Number of tiles found.
        found: usize,
    },
    /// A tile's recorded coordinate disagrees with its position.
    #[error("tile at {expected:?} records position {found:?}")]
    MisplacedTile {
        /// Position of the tile in the matrix.
        expected: CellCoord,
        /// Coordinate recorded on the tile.
        found: CellCoord,
    },
    /// Two walls of one cell occupy the same edge.
    #[error("cell {cell:?} carries more than one wall on edge {rotation:?}")]
    DuplicateEdge {
        /// Cell carrying the walls.
        cell: CellCoord,
        /// Edge claimed twice.
        rotation: Rotation,
    },
    /// A member offset lies outside a large room's footprint.
    #[error("cell {cell:?} records a member offset outside the room footprint")]
    OffsetOutOfRange {
        /// Cell recording the offset.
        cell: CellCoord,
    },
    /// The design's edge length differs from the session's grid.
    #[error("design is {found}x{found}, expected {expected}x{expected}")]
    WrongSize {
        /// Edge length the session works with.
        expected: u32,
        /// Edge length of the offered design.
        found: u32,
    },
}
