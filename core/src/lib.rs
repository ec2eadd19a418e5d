#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the dental clinic floor-plan planner.
//!
//! This crate defines the data model and the message surface that connects
//! adapters, the authoritative editing world, and pure systems. Adapters and
//! systems submit [`Command`] values describing desired edits, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values describing what changed or why a request was rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod geometry;
mod grid;
mod room;
mod tile;

pub use geometry::{
    effective_variant, grid_to_world, world_to_grid, CELL_SIZE, GRID_SIZE, LARGE_ROOM_CENTER,
    LARGE_ROOM_SIZE,
};
pub use grid::{Grid, GridError, RoomMembership};
pub use room::{
    ColorParseError, Edge, Rgb, RoomType, Rotation, RotationError, StructureKind, UnknownEdge,
    UnknownRoomType,
};
pub use tile::{
    Brush, InventoryItem, PlacedWall, RoomPatch, SubTarget, SubTargetParseError, TileRecord, Tool,
    VariantOffset, WallIndex, WallPatch,
};

/// Background color used for the surroundings of a fresh design.
pub const DEFAULT_WORLD_COLOR: Rgb = Rgb::from_rgb(0xe8, 0xee, 0xf2);

/// Floor color used for a fresh design.
pub const DEFAULT_FLOOR_COLOR: Rgb = Rgb::from_rgb(0xd9, 0xd4, 0xc7);

/// Commands that express all permissible edits of the design.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the design wholesale without touching history.
    LoadDesign {
        /// Grid to install.
        grid: Grid,
        /// Background color of the scene.
        world_color: Rgb,
        /// Floor color of the scene.
        floor_color: Rgb,
    },
    /// Discards the design and its history.
    CloseDesign,
    /// Applies a paint tool to a cell.
    Paint {
        /// Room type to paint; [`RoomType::Empty`] erases.
        tool: RoomType,
        /// Clicked cell.
        cell: CellCoord,
        /// Wall targeted by the click, if any.
        sub_target: SubTarget,
        /// Attributes applied to the painted room or wall.
        brush: Brush,
    },
    /// Relocates the room or wall found at `from`.
    Move {
        /// Cell where the drag started.
        from: CellCoord,
        /// Cell where the drag ended.
        to: CellCoord,
        /// Wall latched when the drag started, if any.
        sub_target: SubTarget,
    },
    /// Edits the room containing `cell`.
    UpdateRoom {
        /// Any cell of the room.
        cell: CellCoord,
        /// Fields to change.
        patch: RoomPatch,
    },
    /// Edits one wall segment.
    UpdateWall {
        /// Cell carrying the wall.
        cell: CellCoord,
        /// Index of the wall in the cell's list.
        wall_index: WallIndex,
        /// Fields to change.
        patch: WallPatch,
    },
    /// Changes the scene colors; not recorded in history.
    SetColors {
        /// Background color of the scene.
        world_color: Rgb,
        /// Floor color of the scene.
        floor_color: Rgb,
    },
    /// Restores the grid preceding the last edit.
    Undo,
    /// Re-applies the last undone edit.
    Redo,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A design was installed.
    DesignLoaded {
        /// Edge length of the loaded grid.
        size: u32,
    },
    /// An offered design broke a grid invariant and was not installed.
    DesignRejected {
        /// Invariant the design broke.
        reason: GridError,
    },
    /// The design was discarded.
    DesignClosed,
    /// A room was painted.
    RoomPlaced {
        /// Type of the new room.
        room_type: RoomType,
        /// Top-left cell of the room.
        anchor: CellCoord,
        /// Cells written by the placement.
        region: CellRect,
    },
    /// A room was erased.
    RoomErased {
        /// Type of the erased room.
        room_type: RoomType,
        /// Cells covered by the erased room.
        region: CellRect,
    },
    /// A wall segment was attached to a cell edge.
    WallPlaced {
        /// Cell carrying the wall.
        cell: CellCoord,
        /// Index of the wall in the cell's list.
        wall_index: WallIndex,
        /// Kind of structure.
        kind: StructureKind,
        /// Edge occupied by the wall.
        rotation: Rotation,
        /// Whether a wall already on that edge was replaced.
        replaced: bool,
    },
    /// A wall segment was removed.
    WallErased {
        /// Cell that carried the wall.
        cell: CellCoord,
        /// Index the wall occupied before removal.
        wall_index: WallIndex,
    },
    /// A room's attributes changed.
    RoomUpdated {
        /// Type of the edited room.
        room_type: RoomType,
        /// Cells covered by the room.
        region: CellRect,
    },
    /// A wall's attributes changed.
    WallUpdated {
        /// Cell carrying the wall.
        cell: CellCoord,
        /// Index of the wall in the cell's list.
        wall_index: WallIndex,
    },
    /// A room was relocated.
    RoomMoved {
        /// Type of the moved room.
        room_type: RoomType,
        /// Previous anchor (the tile itself for single-tile rooms).
        from: CellCoord,
        /// New anchor (the tile itself for single-tile rooms).
        to: CellCoord,
        /// Cells covered by the room after the move.
        region: CellRect,
    },
    /// A wall segment was relocated to another cell.
    WallMoved {
        /// Cell that carried the wall.
        from: CellCoord,
        /// Index the wall occupied before the move.
        from_index: WallIndex,
        /// Cell now carrying the wall.
        to: CellCoord,
        /// Index of the wall in the destination's list.
        to_index: WallIndex,
    },
    /// A paint request left the grid unchanged.
    PlacementRejected {
        /// Room type requested.
        tool: RoomType,
        /// Clicked cell.
        cell: CellCoord,
        /// Specific reason the request failed.
        reason: PlacementError,
    },
    /// A move request left the grid unchanged.
    MoveRejected {
        /// Cell where the drag started.
        from: CellCoord,
        /// Cell where the drag ended.
        to: CellCoord,
        /// Specific reason the request failed.
        reason: MoveError,
    },
    /// An update request left the grid unchanged.
    UpdateRejected {
        /// Cell named by the request.
        cell: CellCoord,
        /// Specific reason the request failed.
        reason: PlacementError,
    },
    /// The grid was replaced by a history snapshot.
    HistoryRestored {
        /// Whether the snapshot came from undo or redo.
        direction: HistoryDirection,
    },
    /// The scene colors changed.
    ColorsChanged {
        /// Background color of the scene.
        world_color: Rgb,
        /// Floor color of the scene.
        floor_color: Rgb,
    },
}

impl Event {
    /// Reports whether the event implies the grid contents changed.
    #[must_use]
    pub const fn changes_grid(&self) -> bool {
        matches!(
            self,
            Self::DesignLoaded { .. }
                | Self::DesignClosed
                | Self::RoomPlaced { .. }
                | Self::RoomErased { .. }
                | Self::WallPlaced { .. }
                | Self::WallErased { .. }
                | Self::RoomUpdated { .. }
                | Self::WallUpdated { .. }
                | Self::RoomMoved { .. }
                | Self::WallMoved { .. }
                | Self::HistoryRestored { .. }
        )
    }
}

/// Direction of a history restore.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryDirection {
    /// Stepped back to an earlier snapshot.
    Undo,
    /// Stepped forward to a later snapshot.
    Redo,
}

/// Reasons a paint or update request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// No design is open, so editing is disabled.
    #[error("no design is open")]
    NoDesignLoaded,
    /// The cell, or the footprint derived from it, lies outside the grid.
    #[error("target lies outside the grid")]
    OutOfBounds,
    /// The requested footprint overlaps an existing room.
    #[error("target overlaps an existing room")]
    Occupied,
    /// Another wall already occupies the requested edge.
    #[error("edge already carries a wall")]
    EdgeOccupied,
    /// The wall edge is interior to a large room.
    #[error("walls may only sit on a large room's perimeter")]
    OffPerimeter,
    /// The referenced wall index does not exist.
    #[error("no wall at that index")]
    MissingWall,
    /// The clicked cell holds nothing to erase.
    #[error("nothing to erase")]
    NothingToErase,
    /// The cell holds no room to edit.
    #[error("no room to edit")]
    NothingToUpdate,
    /// The room's member offsets disagree with the grid.
    #[error("room members disagree with the grid")]
    CorruptGroup,
}

/// Reasons a move request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum MoveError {
    /// No design is open, so editing is disabled.
    #[error("no design is open")]
    NoDesignLoaded,
    /// Source and destination are the same cell.
    #[error("source and destination are the same cell")]
    SameCell,
    /// A cell, or the relocated footprint, lies outside the grid.
    #[error("move leaves the grid")]
    OutOfBounds,
    /// The destination overlaps another room.
    #[error("destination overlaps another room")]
    Occupied,
    /// The destination already has a wall on the moved wall's edge.
    #[error("destination edge already carries a wall")]
    EdgeOccupied,
    /// The moved wall's edge would be interior to a large room.
    #[error("walls may only sit on a large room's perimeter")]
    OffPerimeter,
    /// The referenced wall index does not exist.
    #[error("no wall at that index")]
    MissingWall,
    /// The source cell holds nothing to move.
    #[error("nothing to move")]
    NothingToMove,
    /// The room's member offsets disagree with the grid.
    #[error("room members disagree with the grid")]
    CorruptGroup,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell (`x`).
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell (`y`).
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Rectangle covering exactly one cell.
    #[must_use]
    pub const fn single(cell: CellCoord) -> Self {
        Self::from_origin_and_size(cell, CellRectSize::new(1, 1))
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Reports whether the cell lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= self.origin.column()
            && cell.row() >= self.origin.row()
            && cell.column() - self.origin.column() < self.size.width()
            && cell.row() - self.origin.row() < self.size.height()
    }

    /// Iterator over the covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin;
        let width = self.size.width();
        (0..self.size.height()).flat_map(move |row| {
            (0..width).map(move |column| {
                CellCoord::new(origin.column() + column, origin.row() + row)
            })
        })
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, CellRect, CellRectSize, Event, HistoryDirection, MoveError, PlacementError,
        Rotation, WallIndex,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn wire_types_round_trip_through_bincode() {
        assert_round_trip(&PlacementError::OffPerimeter);
        assert_round_trip(&MoveError::Occupied);
        assert_round_trip(&HistoryDirection::Redo);
        assert_round_trip(&WallIndex::new(3));
        assert_round_trip(&Rotation::wrapping(3));
        assert_round_trip(&CellRect::from_origin_and_size(
            CellCoord::new(5, 7),
            CellRectSize::new(2, 3),
        ));
    }

    #[test]
    fn rect_contains_only_covered_cells() {
        let rect = CellRect::from_origin_and_size(CellCoord::new(2, 3), CellRectSize::new(2, 2));
        assert!(rect.contains(CellCoord::new(2, 3)));
        assert!(rect.contains(CellCoord::new(3, 4)));
        assert!(!rect.contains(CellCoord::new(4, 3)));
        assert!(!rect.contains(CellCoord::new(1, 3)));
        assert_eq!(
            rect.cells().collect::<Vec<_>>(),
            vec![
                CellCoord::new(2, 3),
                CellCoord::new(3, 3),
                CellCoord::new(2, 4),
                CellCoord::new(3, 4),
            ]
        );
    }

    #[test]
    fn only_edits_change_the_grid() {
        assert!(Event::WallErased {
            cell: CellCoord::new(0, 0),
            wall_index: WallIndex::new(0),
        }
        .changes_grid());
        assert!(!Event::PlacementRejected {
            tool: super::RoomType::Door,
            cell: CellCoord::new(0, 0),
            reason: PlacementError::OffPerimeter,
        }
        .changes_grid());
    }
}
