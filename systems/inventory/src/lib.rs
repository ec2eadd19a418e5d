#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Derived inventory projection over the floor-plan grid.
//!
//! Inventory lives on individual tiles. This system flattens it into a list of
//! entries tagged with a readable location, recomputing whenever the world
//! reports that the grid changed.

use std::collections::BTreeMap;

use dental_planner_core::{CellCoord, Event, Grid, InventoryItem, TileRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One inventory line item together with where it is stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    /// The stocked item.
    #[serde(flatten)]
    pub item: InventoryItem,
    /// Human-readable location of the cell carrying the item.
    pub location: String,
    /// Column of the cell carrying the item.
    pub x: u32,
    /// Row of the cell carrying the item.
    pub y: u32,
}

impl InventoryEntry {
    /// Cell carrying the item.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        CellCoord::new(self.x, self.y)
    }
}

/// Readable location of a tile: its label, else its room type's display
/// name, else its coordinates.
#[must_use]
pub fn location_of(tile: &TileRecord) -> String {
    if let Some(label) = tile.label.as_deref().filter(|label| !label.trim().is_empty()) {
        return label.to_owned();
    }
    if tile.is_occupied() {
        return tile.room_type.display_name().to_owned();
    }
    format!("Room {},{}", tile.x, tile.y)
}

/// Flattens every tile's inventory into entries, in row-major order.
#[must_use]
pub fn aggregate(grid: &Grid) -> Vec<InventoryEntry> {
    grid.tiles()
        .filter(|tile| !tile.inventory_items.is_empty())
        .flat_map(|tile| {
            let location = location_of(tile);
            tile.inventory_items.iter().map(move |item| InventoryEntry {
                item: item.clone(),
                location: location.clone(),
                x: tile.x,
                y: tile.y,
            })
        })
        .collect()
}

/// Sums quantities per item name across all entries.
#[must_use]
pub fn totals_by_name(entries: &[InventoryEntry]) -> BTreeMap<String, u64> {
    let mut totals = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.item.name.clone()).or_insert(0) += u64::from(entry.item.quantity);
    }
    totals
}

/// Cached inventory projection kept current from world events.
#[derive(Clone, Debug, Default)]
pub struct InventoryLedger {
    entries: Vec<InventoryEntry>,
}

impl InventoryLedger {
    /// Creates a ledger populated from the provided grid.
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        Self {
            entries: aggregate(grid),
        }
    }

    /// Current projection.
    #[must_use]
    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    /// Consumes world events, recomputing the projection when any of them
    /// changed the grid.
    ///
    /// Returns whether the projection was recomputed.
    pub fn handle(&mut self, events: &[Event], grid: &Grid) -> bool {
        if !events.iter().any(Event::changes_grid) {
            return false;
        }
        self.entries = aggregate(grid);
        debug!(entries = self.entries.len(), "inventory recomputed");
        true
    }
}
