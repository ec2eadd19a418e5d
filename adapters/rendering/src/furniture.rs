//! Furniture layouts authored in the unrotated frame of each room.

use dental_planner_core::{RoomType, VariantOffset};

/// Piece of furniture drawn on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FurnitureKind {
    /// Visitor seat.
    Chair,
    /// Potted plant.
    Plant,
    /// Service counter.
    Counter,
    /// Patient chair with its delivery unit.
    DentalChair,
    /// Hand-wash sink.
    Sink,
    /// Instrument cabinet.
    Cabinet,
    /// Operator stool.
    Stool,
    /// Radiography unit.
    XRayUnit,
    /// Imaging control console.
    Console,
    /// Steam autoclave.
    Autoclave,
    /// Toilet.
    Toilet,
    /// Office desk.
    Desk,
    /// Supply shelving.
    Shelf,
    /// Lab workbench.
    Workbench,
}

/// Furniture shown on a tile of `room_type` whose logical layout slot is `slot`.
///
/// Large rooms are keyed by slot, single-tile rooms ignore it.
#[must_use]
pub fn furniture_for(room_type: RoomType, slot: Option<VariantOffset>) -> Option<FurnitureKind> {
    let slot = slot.map(|offset| (offset.column(), offset.row()));
    match (room_type, slot) {
        (RoomType::WaitingRoom, Some((2, 2))) => Some(FurnitureKind::Plant),
        (RoomType::WaitingRoom, Some((4, 4))) => Some(FurnitureKind::Counter),
        (RoomType::WaitingRoom, Some((_, 0) | (0, _))) => Some(FurnitureKind::Chair),

        (RoomType::OperatorySuite, Some((2, 2))) => Some(FurnitureKind::DentalChair),
        (RoomType::OperatorySuite, Some((3, 2))) => Some(FurnitureKind::Stool),
        (RoomType::OperatorySuite, Some((0, 0))) => Some(FurnitureKind::Sink),
        (RoomType::OperatorySuite, Some((4, 0) | (4, 1))) => Some(FurnitureKind::Cabinet),

        (RoomType::ImagingSuite, Some((2, 2))) => Some(FurnitureKind::XRayUnit),
        (RoomType::ImagingSuite, Some((4, 2))) => Some(FurnitureKind::Console),
        (RoomType::ImagingSuite, Some((0, 4))) => Some(FurnitureKind::Cabinet),

        (RoomType::Reception, _) => Some(FurnitureKind::Counter),
        (RoomType::Sterilization, _) => Some(FurnitureKind::Autoclave),
        (RoomType::Restroom, _) => Some(FurnitureKind::Toilet),
        (RoomType::Office, _) => Some(FurnitureKind::Desk),
        (RoomType::Storage, _) => Some(FurnitureKind::Shelf),
        (RoomType::Lab, _) => Some(FurnitureKind::Workbench),
        _ => None,
    }
}
