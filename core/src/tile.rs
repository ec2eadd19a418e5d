//! Per-cell records, wall segments and the editing brush.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, Rgb, RoomType, Rotation, StructureKind};

/// Inventory line item attached to a room.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Stable identifier of the line item.
    pub id: String,
    /// Display name of the stocked item.
    pub name: String,
    /// Number of units on hand.
    pub quantity: u32,
    /// Optional grouping used by reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl InventoryItem {
    /// Creates an uncategorised line item.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            category: None,
        }
    }
}

/// Structural element attached to one edge of a cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedWall {
    /// Kind of structure.
    #[serde(rename = "type")]
    pub kind: StructureKind,
    /// Edge of the cell the segment occupies.
    pub rotation: Rotation,
    /// Optional override color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<Rgb>,
}

impl PlacedWall {
    /// Creates an uncolored wall segment on the provided edge.
    #[must_use]
    pub const fn new(kind: StructureKind, rotation: Rotation) -> Self {
        Self {
            kind,
            rotation,
            custom_color: None,
        }
    }
}

/// Position of a wall inside its cell's wall list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallIndex(u32);

impl WallIndex {
    /// Creates a new wall index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    fn slot(self) -> usize {
        self.0 as usize
    }

    fn from_slot(slot: usize) -> Self {
        Self(u32::try_from(slot).unwrap_or(u32::MAX))
    }
}

/// Offset of a large-room member relative to the room's top-left anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantOffset {
    column: u32,
    row: u32,
}

impl VariantOffset {
    /// Creates a new member offset.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Column offset from the anchor.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Row offset from the anchor.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// One cell of the floor-plan grid.
///
/// `x` and `y` always equal the cell's position in its [`crate::Grid`]. Room
/// scoped fields (`label`, `has_inventory`, `inventory_items`) are meaningful
/// only on a single-tile room or on the center member of a large room.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRecord {
    /// Column of the cell.
    pub x: u32,
    /// Row of the cell.
    pub y: u32,
    /// Content of the cell.
    #[serde(default)]
    pub room_type: RoomType,
    /// Orientation of the room's furniture layout.
    #[serde(default)]
    pub rotation: Rotation,
    /// Optional display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Optional furnishing color override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<Rgb>,
    /// Column offset within a large room, if this cell is a member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_x: Option<u32>,
    /// Row offset within a large room, if this cell is a member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_y: Option<u32>,
    /// Whether the room exposes an inventory affordance.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_inventory: bool,
    /// Inventory attached to this specific cell.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inventory_items: Vec<InventoryItem>,
    /// Wall segments attached to the cell's edges, at most one per edge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placed_walls: Vec<PlacedWall>,
}

impl TileRecord {
    /// Creates an empty floor tile at the provided cell.
    #[must_use]
    pub fn empty(cell: CellCoord) -> Self {
        Self {
            x: cell.column(),
            y: cell.row(),
            room_type: RoomType::Empty,
            rotation: Rotation::IDENTITY,
            label: None,
            custom_color: None,
            variant_x: None,
            variant_y: None,
            has_inventory: false,
            inventory_items: Vec::new(),
            placed_walls: Vec::new(),
        }
    }

    /// Coordinate recorded on the tile.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        CellCoord::new(self.x, self.y)
    }

    /// Reports whether a room or structure tile occupies the cell.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        !self.room_type.is_empty()
    }

    /// Member offset within a large room; present only when both axes are recorded.
    #[must_use]
    pub const fn variant(&self) -> Option<VariantOffset> {
        match (self.variant_x, self.variant_y) {
            (Some(column), Some(row)) => Some(VariantOffset::new(column, row)),
            _ => None,
        }
    }

    /// Records or clears the member offset.
    pub fn set_variant(&mut self, variant: Option<VariantOffset>) {
        self.variant_x = variant.map(|offset| offset.column());
        self.variant_y = variant.map(|offset| offset.row());
    }

    /// Resets every room-scoped field back to empty floor, keeping walls.
    pub fn clear_room(&mut self) {
        self.room_type = RoomType::Empty;
        self.rotation = Rotation::IDENTITY;
        self.label = None;
        self.custom_color = None;
        self.set_variant(None);
        self.has_inventory = false;
        self.inventory_items.clear();
    }

    /// Copies every room-scoped field from `source`, keeping this tile's
    /// position and walls.
    pub fn copy_room_from(&mut self, source: &TileRecord) {
        self.room_type = source.room_type;
        self.rotation = source.rotation;
        self.label = source.label.clone();
        self.custom_color = source.custom_color;
        self.variant_x = source.variant_x;
        self.variant_y = source.variant_y;
        self.has_inventory = source.has_inventory;
        self.inventory_items = source.inventory_items.clone();
    }

    /// Wall stored at the provided index.
    #[must_use]
    pub fn wall(&self, index: WallIndex) -> Option<&PlacedWall> {
        self.placed_walls.get(index.slot())
    }

    /// Mutable access to the wall stored at the provided index.
    pub fn wall_mut(&mut self, index: WallIndex) -> Option<&mut PlacedWall> {
        self.placed_walls.get_mut(index.slot())
    }

    /// Wall occupying the edge addressed by `rotation`, if any.
    #[must_use]
    pub fn wall_on(&self, rotation: Rotation) -> Option<(WallIndex, &PlacedWall)> {
        self.placed_walls
            .iter()
            .enumerate()
            .find(|(_, wall)| wall.rotation == rotation)
            .map(|(slot, wall)| (WallIndex::from_slot(slot), wall))
    }

    /// Attaches a wall, replacing any wall already on the same edge.
    ///
    /// Returns the wall's index and whether an existing wall was replaced.
    pub fn attach_wall(&mut self, wall: PlacedWall) -> (WallIndex, bool) {
        if let Some(slot) = self
            .placed_walls
            .iter()
            .position(|existing| existing.rotation == wall.rotation)
        {
            self.placed_walls[slot] = wall;
            return (WallIndex::from_slot(slot), true);
        }

        self.placed_walls.push(wall);
        (WallIndex::from_slot(self.placed_walls.len() - 1), false)
    }

    /// Removes and returns the wall stored at the provided index.
    pub fn detach_wall(&mut self, index: WallIndex) -> Option<PlacedWall> {
        if index.slot() < self.placed_walls.len() {
            Some(self.placed_walls.remove(index.slot()))
        } else {
            None
        }
    }
}

/// Attributes applied to newly painted rooms and walls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Brush {
    /// Rotation for rooms, edge for walls.
    pub rotation: Rotation,
    /// Optional color override.
    pub custom_color: Option<Rgb>,
    /// Label written to the room's center member.
    pub label: Option<String>,
    /// Whether the room exposes inventory.
    pub has_inventory: bool,
}

/// Partial edit applied to an existing room.
///
/// `None` leaves a field untouched; for the optional fields `Some(None)` clears them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomPatch {
    /// New label.
    pub label: Option<Option<String>>,
    /// New color override.
    pub custom_color: Option<Option<Rgb>>,
    /// New rotation.
    pub rotation: Option<Rotation>,
    /// New inventory flag.
    pub has_inventory: Option<bool>,
    /// Replacement inventory list.
    pub inventory_items: Option<Vec<InventoryItem>>,
}

impl RoomPatch {
    /// Reports whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.custom_color.is_none()
            && self.rotation.is_none()
            && self.has_inventory.is_none()
            && self.inventory_items.is_none()
    }
}

/// Partial edit applied to an existing wall segment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WallPatch {
    /// New structure kind.
    pub kind: Option<StructureKind>,
    /// New color override; `Some(None)` clears it.
    pub custom_color: Option<Option<Rgb>>,
    /// New edge.
    pub rotation: Option<Rotation>,
}

/// Optional refinement of a click: either the cell itself or one of its walls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SubTarget {
    /// The cell itself.
    #[default]
    None,
    /// A wall attached to the cell.
    Wall(WallIndex),
}

impl SubTarget {
    /// Wall index carried by the sub-target, if any.
    #[must_use]
    pub const fn wall_index(self) -> Option<WallIndex> {
        match self {
            Self::None => None,
            Self::Wall(index) => Some(index),
        }
    }
}

impl fmt::Display for SubTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Wall(index) => write!(f, "wall:{}", index.get()),
        }
    }
}

impl FromStr for SubTarget {
    type Err = SubTargetParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "none" {
            return Ok(Self::None);
        }

        let index = trimmed
            .strip_prefix("wall:")
            .and_then(|index| index.parse::<u32>().ok())
            .ok_or_else(|| SubTargetParseError(value.to_owned()))?;
        Ok(Self::Wall(WallIndex::new(index)))
    }
}

/// Raised when a sub-target string is neither `none` nor `wall:<index>`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("'{0}' is not a sub-target, expected 'none' or 'wall:<index>'")]
pub struct SubTargetParseError(pub String);

/// Active editing tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Click selects, drag moves.
    #[default]
    Select,
    /// Click paints the room type; [`RoomType::Empty`] erases.
    Paint(RoomType),
}

impl Tool {
    /// Eraser tool.
    pub const ERASER: Tool = Tool::Paint(RoomType::Empty);
}
