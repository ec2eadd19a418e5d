#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for dental clinic planner adapters.
//!
//! Backends never read the grid directly. They receive a [`Scene`] of tile and
//! wall descriptors positioned in world space, with furniture already resolved
//! through [`effective_variant`] so layouts are authored once in a fixed frame.
//! Previews are expressed as ghost tiles drawn in [`RenderMode::Ghost`].

use std::{error::Error, fmt};

use anyhow::Result as AnyResult;
use dental_planner_core::{
    effective_variant, grid_to_world, world_to_grid, CellCoord, CellRect, Edge, Grid, Rgb,
    RoomType, Rotation, StructureKind, SubTarget, TileRecord, VariantOffset, WallIndex,
    CELL_SIZE,
};
use glam::Vec3;

mod furniture;

pub use furniture::{furniture_for, FurnitureKind};

/// Fraction of a cell's half-width around an edge that still picks the wall on it.
pub const WALL_PICK_TOLERANCE: f32 = 0.25;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color blended towards `tint` by the provided amount.
    #[must_use]
    pub fn tinted(self, tint: Color, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: mix_channel(self.red, tint.red, amount),
            green: mix_channel(self.green, tint.green, amount),
            blue: mix_channel(self.blue, tint.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb_u8(rgb.red(), rgb.green(), rgb.blue())
    }
}

fn mix_channel(channel: f32, target: f32, amount: f32) -> f32 {
    channel + (target - channel) * amount
}

/// Tint applied to ghosts of accepted previews.
pub const GHOST_VALID_TINT: Color = Color::from_rgb_u8(0x3c, 0xb3, 0x71);

/// Tint applied to ghosts of rejected previews.
pub const GHOST_INVALID_TINT: Color = Color::from_rgb_u8(0xe0, 0x4b, 0x4b);

/// Opacity of ghost geometry.
pub const GHOST_OPACITY: f32 = 0.45;

/// How a descriptor should be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderMode {
    /// Regular, opaque geometry.
    Solid,
    /// Translucent preview geometry blended towards a tint.
    Ghost {
        /// Color the geometry is blended towards.
        tint: Color,
        /// Alpha applied to the geometry.
        opacity: f32,
    },
}

impl RenderMode {
    /// Ghost mode signalling whether the previewed edit would be accepted.
    #[must_use]
    pub const fn preview(valid: bool) -> Self {
        Self::Ghost {
            tint: if valid {
                GHOST_VALID_TINT
            } else {
                GHOST_INVALID_TINT
            },
            opacity: GHOST_OPACITY,
        }
    }

    /// Final color of geometry whose base color is `color`.
    #[must_use]
    pub fn apply(self, color: Color) -> Color {
        match self {
            Self::Solid => color,
            Self::Ghost { tint, opacity } => color.tinted(tint, 0.6).with_alpha(opacity),
        }
    }
}

/// Floor tile and its furnishing, positioned in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneTile {
    /// Cell the tile represents.
    pub cell: CellCoord,
    /// World-space center of the tile's floor.
    pub position: Vec3,
    /// Room occupying the tile.
    pub room_type: RoomType,
    /// Rotation about the vertical axis in radians.
    pub yaw: f32,
    /// Physical offset inside a large room.
    pub variant: Option<VariantOffset>,
    /// Furniture drawn on the tile.
    pub furniture: Option<FurnitureKind>,
    /// Color of the furnishing.
    pub color: Color,
    /// Text drawn above the tile.
    pub label: Option<String>,
    /// How the tile should be drawn.
    pub mode: RenderMode,
}

/// Wall segment positioned in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneWall {
    /// Cell carrying the wall.
    pub cell: CellCoord,
    /// Index of the wall in the cell's list.
    pub wall_index: WallIndex,
    /// Kind of structure.
    pub kind: StructureKind,
    /// Edge of the cell the wall occupies.
    pub edge: Edge,
    /// World-space center of the segment.
    pub position: Vec3,
    /// Rotation about the vertical axis in radians.
    pub yaw: f32,
    /// Color of the segment.
    pub color: Color,
    /// How the segment should be drawn.
    pub mode: RenderMode,
}

/// Scene description consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of cells along each edge.
    pub grid_size: u32,
    /// Color behind the floor plan.
    pub world_color: Color,
    /// Color of bare floor.
    pub floor_color: Color,
    /// Occupied tiles.
    pub tiles: Vec<SceneTile>,
    /// Wall segments.
    pub walls: Vec<SceneWall>,
    /// Preview geometry drawn on top of the plan.
    pub ghosts: Vec<SceneTile>,
    /// Cells outlined as selected.
    pub highlight: Option<CellRect>,
}

impl Scene {
    /// Builds descriptors for every occupied tile and every wall of `grid`.
    ///
    /// Returns an error when the grid has no cells.
    pub fn from_grid(
        grid: &Grid,
        world_color: Rgb,
        floor_color: Rgb,
    ) -> std::result::Result<Self, RenderingError> {
        if grid.size() == 0 {
            return Err(RenderingError::EmptyGrid);
        }

        let size = grid.size();
        let tiles = grid
            .tiles()
            .filter(|tile| tile.is_occupied())
            .map(|tile| scene_tile(tile, size, RenderMode::Solid))
            .collect();
        let walls = grid
            .tiles()
            .flat_map(|tile| {
                tile.placed_walls
                    .iter()
                    .enumerate()
                    .map(move |(slot, wall)| SceneWall {
                        cell: tile.cell(),
                        wall_index: WallIndex::new(slot as u32),
                        kind: wall.kind,
                        edge: wall.rotation.edge(),
                        position: edge_midpoint(tile.cell(), wall.rotation.edge(), size),
                        yaw: wall.rotation.radians(),
                        color: wall
                            .custom_color
                            .map_or_else(|| default_structure_color(wall.kind), Color::from),
                        mode: RenderMode::Solid,
                    })
            })
            .collect();

        Ok(Self {
            grid_size: size,
            world_color: world_color.into(),
            floor_color: floor_color.into(),
            tiles,
            walls,
            ghosts: Vec::new(),
            highlight: None,
        })
    }

    /// Adds ghost tiles previewing `room_type` over `region`.
    ///
    /// Large rooms receive offsets relative to the region's origin so the
    /// ghost shows the same furniture the committed room would.
    pub fn push_ghost(
        &mut self,
        room_type: RoomType,
        rotation: Rotation,
        region: CellRect,
        valid: bool,
    ) {
        let mode = RenderMode::preview(valid);
        let origin = region.origin();
        for cell in region.cells() {
            let mut tile = TileRecord::empty(cell);
            tile.room_type = room_type;
            tile.rotation = rotation;
            if room_type.is_large_room() {
                tile.set_variant(Some(VariantOffset::new(
                    cell.column() - origin.column(),
                    cell.row() - origin.row(),
                )));
            }
            self.ghosts.push(scene_tile(&tile, self.grid_size, mode));
        }
    }

    /// Adds ghost tiles copying the room under `from` onto `region`.
    pub fn push_move_ghost(&mut self, grid: &Grid, from: CellCoord, region: CellRect, valid: bool) {
        if let Some(tile) = grid.tile(from).filter(|tile| tile.is_occupied()) {
            self.push_ghost(tile.room_type, tile.rotation, region, valid);
        }
    }

    /// Cell under a world-space point on the floor plane.
    #[must_use]
    pub fn cell_at(&self, point: Vec3) -> Option<CellCoord> {
        world_to_grid(point.to_array(), self.grid_size)
    }

    /// Cell and wall under a world-space point.
    ///
    /// Points close to an edge carrying a wall pick that wall; every other
    /// point inside the grid picks the cell.
    #[must_use]
    pub fn pick(&self, grid: &Grid, point: Vec3) -> Option<(CellCoord, SubTarget)> {
        let cell = self.cell_at(point)?;
        let tile = grid.tile(cell)?;
        let center = Vec3::from_array(grid_to_world(cell, self.grid_size));
        let local = point - center;
        let half = CELL_SIZE / 2.0;
        let reach = half * WALL_PICK_TOLERANCE;

        let closest = Rotation::ALL
            .into_iter()
            .filter_map(|rotation| {
                let distance = match rotation.edge() {
                    Edge::North => local.z + half,
                    Edge::East => half - local.x,
                    Edge::South => half - local.z,
                    Edge::West => local.x + half,
                };
                (distance <= reach).then_some((distance, rotation))
            })
            .filter_map(|(distance, rotation)| {
                tile.wall_on(rotation).map(|(index, _)| (distance, index))
            })
            .min_by(|left, right| left.0.total_cmp(&right.0));

        Some(match closest {
            Some((_, index)) => (cell, SubTarget::Wall(index)),
            None => (cell, SubTarget::None),
        })
    }
}

fn scene_tile(tile: &TileRecord, grid_size: u32, mode: RenderMode) -> SceneTile {
    let variant = tile.variant();
    let logical = variant.map(|offset| effective_variant(offset, tile.rotation));
    let base = tile
        .custom_color
        .map_or_else(|| default_room_color(tile.room_type), Color::from);
    SceneTile {
        cell: tile.cell(),
        position: Vec3::from_array(grid_to_world(tile.cell(), grid_size)),
        room_type: tile.room_type,
        yaw: tile.rotation.radians(),
        variant,
        furniture: furniture_for(tile.room_type, logical),
        color: mode.apply(base),
        label: tile.label.clone(),
        mode,
    }
}

fn edge_midpoint(cell: CellCoord, edge: Edge, grid_size: u32) -> Vec3 {
    let center = Vec3::from_array(grid_to_world(cell, grid_size));
    let half = CELL_SIZE / 2.0;
    center
        + match edge {
            Edge::North => Vec3::new(0.0, 0.0, -half),
            Edge::East => Vec3::new(half, 0.0, 0.0),
            Edge::South => Vec3::new(0.0, 0.0, half),
            Edge::West => Vec3::new(-half, 0.0, 0.0),
        }
}

/// Furnishing color used when a room carries no override.
#[must_use]
pub const fn default_room_color(room_type: RoomType) -> Color {
    match room_type {
        RoomType::Empty => Color::from_rgb_u8(0xd9, 0xd4, 0xc7),
        RoomType::WaitingRoom => Color::from_rgb_u8(0x8f, 0xb9, 0xd8),
        RoomType::OperatorySuite => Color::from_rgb_u8(0x6c, 0xc4, 0xb4),
        RoomType::ImagingSuite => Color::from_rgb_u8(0xa9, 0x9b, 0xd1),
        RoomType::Reception => Color::from_rgb_u8(0xe3, 0xb5, 0x6b),
        RoomType::Sterilization => Color::from_rgb_u8(0xc7, 0xd6, 0xdd),
        RoomType::Restroom => Color::from_rgb_u8(0xb8, 0xd8, 0xe8),
        RoomType::Office => Color::from_rgb_u8(0xa6, 0x7c, 0x52),
        RoomType::Storage => Color::from_rgb_u8(0x9a, 0x9a, 0x8e),
        RoomType::Lab => Color::from_rgb_u8(0xd6, 0xe2, 0xa8),
        RoomType::StraightWall | RoomType::Door | RoomType::Window => {
            Color::from_rgb_u8(0xf4, 0xf1, 0xea)
        }
    }
}

/// Segment color used when a wall carries no override.
#[must_use]
pub const fn default_structure_color(kind: StructureKind) -> Color {
    match kind {
        StructureKind::StraightWall => Color::from_rgb_u8(0xf4, 0xf1, 0xea),
        StructureKind::Door => Color::from_rgb_u8(0x8b, 0x5e, 0x3c),
        StructureKind::Window => Color::from_rgb_u8(0xa8, 0xd4, 0xf0),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer position projected onto the floor plane.
    pub pointer_world_space: Option<Vec3>,
}

impl FrameInput {
    /// Input whose pointer rests on the center of `cell`.
    #[must_use]
    pub fn pointing_at(cell: CellCoord, grid_size: u32) -> Self {
        Self {
            pointer_world_space: Some(Vec3::from_array(grid_to_world(cell, grid_size))),
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting floor-plan scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives per-frame input captured
    /// by the adapter and may replace the scene before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The grid has no cells to draw.
    EmptyGrid,
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "cannot render a grid without cells"),
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use dental_planner_core::{PlacedWall, DEFAULT_FLOOR_COLOR, DEFAULT_WORLD_COLOR, GRID_SIZE};

    fn room_grid(rotation: Rotation) -> Grid {
        let mut grid = Grid::default();
        for row in 0..5 {
            for column in 0..5 {
                let tile = grid
                    .tile_mut(CellCoord::new(column, row))
                    .expect("cell inside grid");
                tile.room_type = RoomType::OperatorySuite;
                tile.rotation = rotation;
                tile.set_variant(Some(VariantOffset::new(column, row)));
            }
        }
        grid
    }

    #[test]
    fn scene_lists_only_occupied_tiles() {
        let grid = room_grid(Rotation::IDENTITY);
        let scene = Scene::from_grid(&grid, DEFAULT_WORLD_COLOR, DEFAULT_FLOOR_COLOR)
            .expect("non-empty grid");

        assert_eq!(scene.tiles.len(), 25);
        assert!(scene.walls.is_empty());
        assert_eq!(scene.floor_color, Color::from(DEFAULT_FLOOR_COLOR));
    }

    #[test]
    fn rotation_moves_furniture_between_members() {
        let upright = Scene::from_grid(
            &room_grid(Rotation::IDENTITY),
            DEFAULT_WORLD_COLOR,
            DEFAULT_FLOOR_COLOR,
        )
        .expect("non-empty grid");
        let turned = Scene::from_grid(
            &room_grid(Rotation::wrapping(2)),
            DEFAULT_WORLD_COLOR,
            DEFAULT_FLOOR_COLOR,
        )
        .expect("non-empty grid");

        let furniture_at = |scene: &Scene, column, row| {
            scene
                .tiles
                .iter()
                .find(|tile| tile.cell == CellCoord::new(column, row))
                .and_then(|tile| tile.furniture)
        };
        assert_eq!(furniture_at(&upright, 0, 0), furniture_at(&turned, 4, 4));
        assert_eq!(furniture_at(&upright, 2, 2), furniture_at(&turned, 2, 2));
    }

    #[test]
    fn ghosts_are_translucent_and_tinted() {
        let mut scene = Scene::from_grid(&Grid::default(), DEFAULT_WORLD_COLOR, DEFAULT_FLOOR_COLOR)
            .expect("non-empty grid");
        scene.push_ghost(
            RoomType::WaitingRoom,
            Rotation::IDENTITY,
            CellRect::from_origin_and_size(
                CellCoord::new(5, 5),
                dental_planner_core::CellRectSize::new(5, 5),
            ),
            false,
        );

        assert_eq!(scene.ghosts.len(), 25);
        assert!(scene
            .ghosts
            .iter()
            .all(|ghost| (ghost.color.alpha - GHOST_OPACITY).abs() < f32::EPSILON));
        assert_eq!(
            scene.ghosts[12].variant,
            Some(VariantOffset::new(2, 2)),
            "center ghost should carry the center offset"
        );
        assert_eq!(scene.ghosts[0].mode, RenderMode::preview(false));
    }

    #[test]
    fn move_ghost_copies_the_dragged_room() {
        let grid = room_grid(Rotation::wrapping(1));
        let mut scene = Scene::from_grid(&grid, DEFAULT_WORLD_COLOR, DEFAULT_FLOOR_COLOR)
            .expect("non-empty grid");
        let target = CellRect::from_origin_and_size(
            CellCoord::new(10, 10),
            dental_planner_core::CellRectSize::new(5, 5),
        );

        scene.push_move_ghost(&grid, CellCoord::new(9, 9), target, true);
        assert!(scene.ghosts.is_empty(), "bare floor has nothing to drag");

        scene.push_move_ghost(&grid, CellCoord::new(1, 1), target, true);
        assert_eq!(scene.ghosts.len(), 25);
        assert!(scene
            .ghosts
            .iter()
            .all(|ghost| ghost.room_type == RoomType::OperatorySuite
                && ghost.yaw == Rotation::wrapping(1).radians()));
    }

    #[test]
    fn pick_prefers_walls_near_edges() {
        let mut grid = Grid::default();
        let cell = CellCoord::new(3, 3);
        let _ = grid
            .tile_mut(cell)
            .expect("cell inside grid")
            .attach_wall(PlacedWall::new(StructureKind::Door, Rotation::wrapping(1)));
        let scene =
            Scene::from_grid(&grid, DEFAULT_WORLD_COLOR, DEFAULT_FLOOR_COLOR).expect("non-empty");

        let center = Vec3::from_array(grid_to_world(cell, GRID_SIZE));
        assert_eq!(scene.pick(&grid, center), Some((cell, SubTarget::None)));
        let near_east = center + Vec3::new(CELL_SIZE / 2.0 - 0.05, 0.0, 0.0);
        assert_eq!(
            scene.pick(&grid, near_east),
            Some((cell, SubTarget::Wall(WallIndex::new(0))))
        );
        let near_west = center - Vec3::new(CELL_SIZE / 2.0 - 0.05, 0.0, 0.0);
        assert_eq!(scene.pick(&grid, near_west), Some((cell, SubTarget::None)));
        assert_eq!(scene.walls.len(), 1);
        assert_eq!(scene.walls[0].edge, Edge::East);
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert_eq!(
            Scene::from_grid(&Grid::new(0), DEFAULT_WORLD_COLOR, DEFAULT_FLOOR_COLOR),
            Err(RenderingError::EmptyGrid)
        );
    }

    #[test]
    fn pointer_at_a_cell_maps_back_to_that_cell() {
        let scene = Scene::from_grid(&Grid::default(), DEFAULT_WORLD_COLOR, DEFAULT_FLOOR_COLOR)
            .expect("non-empty grid");
        let cell = CellCoord::new(11, 4);
        let input = FrameInput::pointing_at(cell, scene.grid_size);

        assert_eq!(input.pointer_world_space.and_then(|point| scene.cell_at(point)), Some(cell));
        assert_eq!(FrameInput::default().pointer_world_space, None);
    }
}
