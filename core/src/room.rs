//! Room kinds, quarter-turn rotations and colors.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content a grid cell can hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    /// Empty floor.
    #[default]
    Empty,
    /// Patient waiting area spanning a large-room block.
    WaitingRoom,
    /// Treatment suite spanning a large-room block.
    OperatorySuite,
    /// Radiography suite spanning a large-room block.
    ImagingSuite,
    /// Front desk occupying a single tile.
    Reception,
    /// Instrument sterilization bay occupying a single tile.
    Sterilization,
    /// Restroom occupying a single tile.
    Restroom,
    /// Staff office occupying a single tile.
    Office,
    /// Supply storage occupying a single tile.
    Storage,
    /// Dental lab bench occupying a single tile.
    Lab,
    /// Plain wall segment.
    StraightWall,
    /// Door segment.
    Door,
    /// Window segment.
    Window,
}

impl RoomType {
    /// Every room type in declaration order.
    pub const ALL: [RoomType; 13] = [
        Self::Empty,
        Self::WaitingRoom,
        Self::OperatorySuite,
        Self::ImagingSuite,
        Self::Reception,
        Self::Sterilization,
        Self::Restroom,
        Self::Office,
        Self::Storage,
        Self::Lab,
        Self::StraightWall,
        Self::Door,
        Self::Window,
    ];

    /// Reports whether the type denotes empty floor.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Reports whether the type spans a large-room block instead of one tile.
    #[must_use]
    pub const fn is_large_room(self) -> bool {
        matches!(
            self,
            Self::WaitingRoom | Self::OperatorySuite | Self::ImagingSuite
        )
    }

    /// Reports whether the type is a structural element.
    #[must_use]
    pub const fn is_structure(self) -> bool {
        matches!(self, Self::StraightWall | Self::Door | Self::Window)
    }

    /// Reports whether the type carries furniture (neither empty nor structural).
    #[must_use]
    pub const fn is_furnished(self) -> bool {
        !self.is_empty() && !self.is_structure()
    }

    /// Narrows the type to the structural subset, if applicable.
    #[must_use]
    pub const fn as_structure(self) -> Option<StructureKind> {
        match self {
            Self::StraightWall => Some(StructureKind::StraightWall),
            Self::Door => Some(StructureKind::Door),
            Self::Window => Some(StructureKind::Window),
            _ => None,
        }
    }

    /// Human readable name shown in inspectors and inventory reports.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::WaitingRoom => "Waiting Room",
            Self::OperatorySuite => "Operatory Suite",
            Self::ImagingSuite => "Imaging Suite",
            Self::Reception => "Reception",
            Self::Sterilization => "Sterilization",
            Self::Restroom => "Restroom",
            Self::Office => "Office",
            Self::Storage => "Storage",
            Self::Lab => "Lab",
            Self::StraightWall => "Wall",
            Self::Door => "Door",
            Self::Window => "Window",
        }
    }

    /// Kebab-case identifier accepted by [`FromStr`].
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::WaitingRoom => "waiting-room",
            Self::OperatorySuite => "operatory-suite",
            Self::ImagingSuite => "imaging-suite",
            Self::Reception => "reception",
            Self::Sterilization => "sterilization",
            Self::Restroom => "restroom",
            Self::Office => "office",
            Self::Storage => "storage",
            Self::Lab => "lab",
            Self::StraightWall => "straight-wall",
            Self::Door => "door",
            Self::Window => "window",
        }
    }
}

impl FromStr for RoomType {
    type Err = UnknownRoomType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|room_type| room_type.slug() == normalized)
            .ok_or_else(|| UnknownRoomType(value.to_owned()))
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Raised when a room type identifier cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown room type '{0}'")]
pub struct UnknownRoomType(pub String);

/// Structural element that may be attached to a cell edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// Plain wall segment.
    StraightWall,
    /// Door segment.
    Door,
    /// Window segment.
    Window,
}

impl StructureKind {
    /// Human readable name of the structure.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        RoomType::from_structure(self).display_name()
    }
}

impl RoomType {
    /// Widens a structural kind back into the room type enumeration.
    #[must_use]
    pub const fn from_structure(kind: StructureKind) -> Self {
        match kind {
            StructureKind::StraightWall => Self::StraightWall,
            StructureKind::Door => Self::Door,
            StructureKind::Window => Self::Window,
        }
    }
}

impl From<StructureKind> for RoomType {
    fn from(kind: StructureKind) -> Self {
        Self::from_structure(kind)
    }
}

/// Clockwise quarter-turn orientation in the range `0..=3`.
///
/// For rooms the value rotates the furniture layout; for walls it names the
/// cell edge the segment occupies (see [`Edge`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rotation(u8);

impl Rotation {
    /// No rotation (north edge for walls).
    pub const IDENTITY: Rotation = Rotation(0);

    /// All four orientations in ascending order.
    pub const ALL: [Rotation; 4] = [Rotation(0), Rotation(1), Rotation(2), Rotation(3)];

    /// Builds a rotation by reducing any number of quarter turns modulo four.
    #[must_use]
    pub const fn wrapping(quarter_turns: u32) -> Self {
        Self((quarter_turns % 4) as u8)
    }

    /// Number of clockwise quarter turns.
    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        self.0
    }

    /// Rotation advanced by one further clockwise quarter turn.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    /// Rotation that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self((4 - self.0) % 4)
    }

    /// Cell edge addressed by this rotation when used as a wall orientation.
    #[must_use]
    pub const fn edge(self) -> Edge {
        match self.0 {
            0 => Edge::North,
            1 => Edge::East,
            2 => Edge::South,
            _ => Edge::West,
        }
    }

    /// Clockwise angle in radians.
    #[must_use]
    pub fn radians(self) -> f32 {
        f32::from(self.0) * std::f32::consts::FRAC_PI_2
    }
}

impl TryFrom<u8> for Rotation {
    type Error = RotationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < 4 {
            Ok(Self(value))
        } else {
            Err(RotationError(value))
        }
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

/// Raised when a serialized rotation lies outside `0..=3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("rotation {0} is outside the quarter-turn range 0..=3")]
pub struct RotationError(pub u8);

/// Cell edge occupied by a wall segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Edge facing decreasing rows.
    North,
    /// Edge facing increasing columns.
    East,
    /// Edge facing increasing rows.
    South,
    /// Edge facing decreasing columns.
    West,
}

impl Edge {
    /// Wall rotation that addresses this edge.
    #[must_use]
    pub const fn rotation(self) -> Rotation {
        match self {
            Self::North => Rotation(0),
            Self::East => Rotation(1),
            Self::South => Rotation(2),
            Self::West => Rotation(3),
        }
    }
}

impl From<Edge> for Rotation {
    fn from(edge: Edge) -> Self {
        edge.rotation()
    }
}

impl FromStr for Edge {
    type Err = UnknownEdge;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Self::North),
            "e" | "east" => Ok(Self::East),
            "s" | "south" => Ok(Self::South),
            "w" | "west" => Ok(Self::West),
            _ => Err(UnknownEdge(value.to_owned())),
        }
    }
}

/// Raised when an edge name cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown edge '{0}', expected north, east, south or west")]
pub struct UnknownEdge(pub String);

/// Opaque RGB color serialized as a `#rrggbb` string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorParseError(value.to_owned()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError(value.to_owned()))
        };

        Ok(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// Raised when a color string is not of the form `#rrggbb`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("'{0}' is not a #rrggbb color")]
pub struct ColorParseError(pub String);
