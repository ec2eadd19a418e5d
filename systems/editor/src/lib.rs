#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure editor system translating pointer and inspector input into commands.
//!
//! The editor owns the active [`Tool`], the paint [`Brush`], the current
//! selection and the latched drag source. Pointer input follows a two-phase
//! protocol: pointer-down latches a drag source, and the matching pointer-up
//! resolves to a click when it lands on the same cell or to a move when it
//! lands elsewhere. The grid is never touched here; every edit leaves as a
//! [`Command`].

use dental_planner_core::{
    Brush, CellCoord, Command, Event, Grid, InventoryItem, Rgb, RoomPatch, RoomType, StructureKind,
    SubTarget, Tool, WallPatch,
};
use dental_planner_system_selection::{resolve, Selection, SelectionTracker};
use tracing::debug;

/// Discrete input delivered to the editor by an adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorInput {
    /// Activates a tool, resetting the selection and brush.
    SelectTool(Tool),
    /// Pointer pressed over a cell.
    PointerDown {
        /// Cell under the pointer.
        cell: CellCoord,
        /// Wall under the pointer, if any.
        sub_target: SubTarget,
    },
    /// Pointer released; `cell` is `None` when released outside the grid.
    PointerUp {
        /// Cell under the pointer.
        cell: Option<CellCoord>,
        /// Wall under the pointer, if any.
        sub_target: SubTarget,
    },
    /// Rotates the brush, or the selected room or wall, a quarter turn clockwise.
    Rotate,
    /// Sets the label of the brush or selected room.
    SetLabel(Option<String>),
    /// Sets the color override of the brush or selection.
    SetColor(Option<Rgb>),
    /// Sets the inventory flag of the brush or selected room.
    SetHasInventory(bool),
    /// Replaces the inventory of the selected room.
    SetInventory(Vec<InventoryItem>),
    /// Changes the kind of the selected wall.
    SetWallKind(StructureKind),
    /// Erases the selected room or wall.
    EraseSelection,
    /// Requests an undo.
    Undo,
    /// Requests a redo.
    Redo,
}

/// Editor system holding tool, brush, selection and drag state.
#[derive(Clone, Debug, Default)]
pub struct Editor {
    tool: Tool,
    brush: Brush,
    selection: SelectionTracker,
    drag_source: Option<(CellCoord, SubTarget)>,
}

impl Editor {
    /// Creates an editor with the select tool active.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Attributes applied to the next paint.
    #[must_use]
    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.selection.current()
    }

    /// Cell and sub-target latched by the last pointer-down, if a drag is pending.
    #[must_use]
    pub fn drag_source(&self) -> Option<(CellCoord, SubTarget)> {
        self.drag_source
    }

    /// Consumes world events and adapter input to emit editing commands.
    ///
    /// `grid` must reflect every event in `events`; selection resolution and
    /// inspector edits read it.
    pub fn handle(
        &mut self,
        events: &[Event],
        inputs: &[EditorInput],
        grid: &Grid,
        out: &mut Vec<Command>,
    ) {
        self.selection.handle(events, grid);

        for input in inputs {
            match input {
                EditorInput::SelectTool(tool) => {
                    self.tool = *tool;
                    self.brush = Brush::default();
                    self.selection.clear();
                    self.drag_source = None;
                }
                EditorInput::PointerDown { cell, sub_target } => {
                    self.drag_source = Some((*cell, *sub_target));
                }
                EditorInput::PointerUp { cell, sub_target } => {
                    self.pointer_up(*cell, *sub_target, grid, out);
                }
                EditorInput::Rotate => self.rotate(grid, out),
                EditorInput::SetLabel(label) => {
                    self.edit_room_or_brush(
                        RoomPatch {
                            label: Some(label.clone()),
                            ..RoomPatch::default()
                        },
                        |brush| brush.label = label.clone(),
                        out,
                    );
                }
                EditorInput::SetColor(color) => {
                    if let Some(Selection::Wall { cell, wall_index }) = self.selection() {
                        out.push(Command::UpdateWall {
                            cell,
                            wall_index,
                            patch: WallPatch {
                                custom_color: Some(*color),
                                ..WallPatch::default()
                            },
                        });
                    } else {
                        self.edit_room_or_brush(
                            RoomPatch {
                                custom_color: Some(*color),
                                ..RoomPatch::default()
                            },
                            |brush| brush.custom_color = *color,
                            out,
                        );
                    }
                }
                EditorInput::SetHasInventory(has_inventory) => {
                    self.edit_room_or_brush(
                        RoomPatch {
                            has_inventory: Some(*has_inventory),
                            ..RoomPatch::default()
                        },
                        |brush| brush.has_inventory = *has_inventory,
                        out,
                    );
                }
                EditorInput::SetInventory(items) => {
                    if let Some(cell) = self.selected_room_cell() {
                        out.push(Command::UpdateRoom {
                            cell,
                            patch: RoomPatch {
                                inventory_items: Some(items.clone()),
                                ..RoomPatch::default()
                            },
                        });
                    }
                }
                EditorInput::SetWallKind(kind) => {
                    if let Some(Selection::Wall { cell, wall_index }) = self.selection() {
                        out.push(Command::UpdateWall {
                            cell,
                            wall_index,
                            patch: WallPatch {
                                kind: Some(*kind),
                                ..WallPatch::default()
                            },
                        });
                    }
                }
                EditorInput::EraseSelection => {
                    if let Some(selection) = self.selection() {
                        out.push(Command::Paint {
                            tool: RoomType::Empty,
                            cell: selection.cell(),
                            sub_target: selection.sub_target(),
                            brush: Brush::default(),
                        });
                    }
                }
                EditorInput::Undo => out.push(Command::Undo),
                EditorInput::Redo => out.push(Command::Redo),
            }
        }
    }

    fn pointer_up(
        &mut self,
        cell: Option<CellCoord>,
        sub_target: SubTarget,
        grid: &Grid,
        out: &mut Vec<Command>,
    ) {
        let Some((start, start_sub_target)) = self.drag_source.take() else {
            return;
        };
        let Some(end) = cell else {
            debug!(?start, "drag cancelled outside the grid");
            return;
        };

        if start == end {
            match self.tool {
                Tool::Select => self.selection.select(resolve(grid, end, sub_target)),
                Tool::Paint(tool) => out.push(Command::Paint {
                    tool,
                    cell: end,
                    sub_target,
                    brush: self.brush.clone(),
                }),
            }
        } else if self.tool == Tool::Select {
            out.push(Command::Move {
                from: start,
                to: end,
                sub_target: start_sub_target,
            });
        } else {
            debug!(?start, ?end, "drag ignored outside the select tool");
        }
    }

    fn rotate(&mut self, grid: &Grid, out: &mut Vec<Command>) {
        if let Tool::Paint(_) = self.tool {
            self.brush.rotation = self.brush.rotation.clockwise();
            return;
        }

        match self.selection() {
            Some(Selection::Wall { cell, wall_index }) => {
                if let Some(wall) = grid.tile(cell).and_then(|tile| tile.wall(wall_index)) {
                    out.push(Command::UpdateWall {
                        cell,
                        wall_index,
                        patch: WallPatch {
                            rotation: Some(wall.rotation.clockwise()),
                            ..WallPatch::default()
                        },
                    });
                }
            }
            Some(selection) => {
                let cell = selection.cell();
                if let Some(tile) = grid.tile(cell).filter(|tile| tile.is_occupied()) {
                    out.push(Command::UpdateRoom {
                        cell,
                        patch: RoomPatch {
                            rotation: Some(tile.rotation.clockwise()),
                            ..RoomPatch::default()
                        },
                    });
                }
            }
            None => {
                self.brush.rotation = self.brush.rotation.clockwise();
            }
        }
    }

    fn selected_room_cell(&self) -> Option<CellCoord> {
        match self.selection()? {
            Selection::Wall { .. } => None,
            selection => Some(selection.cell()),
        }
    }

    fn edit_room_or_brush<F>(&mut self, patch: RoomPatch, update_brush: F, out: &mut Vec<Command>)
    where
        F: FnOnce(&mut Brush),
    {
        if self.tool == Tool::Select {
            if let Some(cell) = self.selected_room_cell() {
                out.push(Command::UpdateRoom { cell, patch });
            }
        } else {
            update_brush(&mut self.brush);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_a_tool_resets_brush_and_drag() {
        let mut editor = Editor::new();
        let mut commands = Vec::new();
        editor.handle(
            &[],
            &[
                EditorInput::SelectTool(Tool::Paint(RoomType::Office)),
                EditorInput::Rotate,
                EditorInput::SetLabel(Some("Dr. Smile".to_owned())),
                EditorInput::PointerDown {
                    cell: CellCoord::new(0, 0),
                    sub_target: SubTarget::None,
                },
            ],
            &Grid::new(3),
            &mut commands,
        );
        assert_eq!(editor.brush().rotation, dental_planner_core::Rotation::wrapping(1));
        assert!(editor.drag_source().is_some());

        editor.handle(
            &[],
            &[EditorInput::SelectTool(Tool::ERASER)],
            &Grid::new(3),
            &mut commands,
        );
        assert_eq!(editor.brush(), &Brush::default());
        assert_eq!(editor.drag_source(), None);
        assert!(commands.is_empty());
    }

    #[test]
    fn release_outside_grid_cancels_drag() {
        let mut editor = Editor::new();
        let mut commands = Vec::new();
        editor.handle(
            &[],
            &[
                EditorInput::PointerDown {
                    cell: CellCoord::new(1, 1),
                    sub_target: SubTarget::None,
                },
                EditorInput::PointerUp {
                    cell: None,
                    sub_target: SubTarget::None,
                },
            ],
            &Grid::new(3),
            &mut commands,
        );
        assert!(commands.is_empty());
        assert_eq!(editor.drag_source(), None);
    }
}
