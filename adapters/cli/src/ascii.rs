//! Text backend printing the floor plan as a character map.

use std::{fmt::Write as _, io::Write};

use anyhow::{Context, Result as AnyResult};
use dental_planner_core::{CellCoord, RoomType};
use dental_planner_rendering::{FrameInput, Presentation, RenderingBackend, Scene};

/// Writes one frame of the scene to the wrapped writer and exits.
#[derive(Debug)]
pub(crate) struct AsciiBackend<W> {
    out: W,
    pointer: Option<CellCoord>,
}

impl<W: Write> AsciiBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out, pointer: None }
    }

    /// Reports the pointer as resting on `cell` for the frame.
    pub(crate) fn pointing_at(mut self, cell: CellCoord) -> Self {
        self.pointer = Some(cell);
        self
    }
}

impl<W: Write> RenderingBackend for AsciiBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            mut scene,
        } = presentation;
        let input = self.pointer.map_or_else(FrameInput::default, |cell| {
            FrameInput::pointing_at(cell, scene.grid_size)
        });
        update_scene(input, &mut scene);

        writeln!(self.out, "{window_title}").context("failed to write map title")?;
        self.out
            .write_all(render(&scene).as_bytes())
            .context("failed to write map")?;
        self.out.flush().context("failed to flush map")
    }
}

/// Map glyph of a room type.
pub(crate) const fn glyph(room_type: RoomType) -> char {
    match room_type {
        RoomType::Empty => '.',
        RoomType::WaitingRoom => 'W',
        RoomType::OperatorySuite => 'O',
        RoomType::ImagingSuite => 'I',
        RoomType::Reception => 'R',
        RoomType::Sterilization => 'S',
        RoomType::Restroom => 'T',
        RoomType::Office => 'F',
        RoomType::Storage => 'K',
        RoomType::Lab => 'L',
        RoomType::StraightWall | RoomType::Door | RoomType::Window => '#',
    }
}

/// Renders the scene as rows of glyphs followed by a wall listing.
///
/// Empty cells carrying walls are drawn as `+`. A highlighted region is
/// reported after the labels.
pub(crate) fn render(scene: &Scene) -> String {
    let size = scene.grid_size as usize;
    let mut rows = vec![vec!['.'; size]; size];
    for wall in &scene.walls {
        rows[wall.cell.row() as usize][wall.cell.column() as usize] = '+';
    }
    for tile in &scene.tiles {
        rows[tile.cell.row() as usize][tile.cell.column() as usize] = glyph(tile.room_type);
    }

    let mut map = String::new();
    for (index, row) in rows.iter().enumerate() {
        let line: String = row
            .iter()
            .flat_map(|ch| [*ch, ' '])
            .collect::<String>();
        let _ = writeln!(map, "{index:>2} {}", line.trim_end());
    }
    for wall in &scene.walls {
        let _ = writeln!(
            map,
            "wall {},{} #{} {} on {:?} edge",
            wall.cell.column(),
            wall.cell.row(),
            wall.wall_index.get(),
            wall.kind.display_name(),
            wall.edge,
        );
    }
    for tile in &scene.tiles {
        if let Some(label) = &tile.label {
            let _ = writeln!(
                map,
                "label {},{} {label}",
                tile.cell.column(),
                tile.cell.row()
            );
        }
    }
    if let Some(region) = scene.highlight {
        let _ = writeln!(
            map,
            "selected {},{} {}x{}",
            region.origin().column(),
            region.origin().row(),
            region.size().width(),
            region.size().height(),
        );
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use dental_planner_core::{
        CellRect, Grid, PlacedWall, Rotation, StructureKind, DEFAULT_FLOOR_COLOR,
        DEFAULT_WORLD_COLOR,
    };

    #[test]
    fn map_shows_rooms_and_bare_walls() {
        let mut grid = Grid::new(3);
        let tile = grid.tile_mut(CellCoord::new(1, 0)).expect("cell inside grid");
        tile.room_type = RoomType::Office;
        tile.label = Some("Dr. Ito".to_owned());
        let _ = grid
            .tile_mut(CellCoord::new(2, 2))
            .expect("cell inside grid")
            .attach_wall(PlacedWall::new(StructureKind::Window, Rotation::wrapping(2)));
        let scene =
            Scene::from_grid(&grid, DEFAULT_WORLD_COLOR, DEFAULT_FLOOR_COLOR).expect("scene");

        assert_eq!(
            render(&scene),
            " 0 . F .\n 1 . . .\n 2 . . +\nwall 2,2 #0 Window on South edge\nlabel 1,0 Dr. Ito\n"
        );
    }

    #[test]
    fn backend_writes_title_then_map() {
        let scene = Scene::from_grid(&Grid::new(1), DEFAULT_WORLD_COLOR, DEFAULT_FLOOR_COLOR)
            .expect("scene");
        let mut buffer = Vec::new();
        AsciiBackend::new(&mut buffer)
            .run(Presentation::new("Plan", scene), |_, _| {})
            .expect("render succeeds");

        assert_eq!(String::from_utf8(buffer).expect("utf8"), "Plan\n 0 .\n");
    }

    #[test]
    fn pointer_reaches_the_scene_update() {
        let scene = Scene::from_grid(&Grid::new(2), DEFAULT_WORLD_COLOR, DEFAULT_FLOOR_COLOR)
            .expect("scene");
        let mut buffer = Vec::new();
        AsciiBackend::new(&mut buffer)
            .pointing_at(CellCoord::new(1, 0))
            .run(Presentation::new("Plan", scene), |input, scene| {
                scene.highlight = input
                    .pointer_world_space
                    .and_then(|point| scene.cell_at(point))
                    .map(CellRect::single);
            })
            .expect("render succeeds");

        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            "Plan\n 0 . .\n 1 . .\nselected 1,0 1x1\n"
        );
    }
}
