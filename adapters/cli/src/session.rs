//! One CLI invocation: open the workspace, apply a command, save.

use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use dental_planner_core::{
    Brush, CellCoord, CellRect, Command, Event, RoomPatch, RoomType, Rotation, SubTarget,
    WallIndex, WallPatch, DEFAULT_FLOOR_COLOR, DEFAULT_WORLD_COLOR,
};
use dental_planner_persistence::{
    open_workspace, Autosave, OwnerId, SaveStatus, Workspace, WorkspaceStore,
};
use dental_planner_rendering::{Presentation, RenderingBackend, Scene};
use dental_planner_system_inventory::{aggregate, totals_by_name};
use dental_planner_system_selection::{inspect, resolve, Inspection};
use dental_planner_world::{apply, query, World};
use tracing::debug;

use crate::{ascii::AsciiBackend, config::ColorConfig, transfer, PlannerCommand};

/// Editing session backed by a workspace store.
pub(crate) struct Session {
    world: World,
    autosave: Autosave,
}

impl Session {
    /// Loads the owner's workspace, applying configured colors to fresh designs.
    pub(crate) fn open<S>(store: &S, owner: OwnerId, colors: &ColorConfig) -> Result<Self>
    where
        S: WorkspaceStore + ?Sized,
    {
        let mut world = World::new();
        let mut events = Vec::new();
        let found = open_workspace(store, &owner, &mut world, &mut events)
            .with_context(|| format!("failed to open workspace for '{owner}'"))?;
        let mut autosave = Autosave::new(owner);
        autosave.handle(&events);

        if !found && (colors.world.is_some() || colors.floor.is_some()) {
            events.clear();
            apply(
                &mut world,
                Command::SetColors {
                    world_color: colors.world.unwrap_or(DEFAULT_WORLD_COLOR),
                    floor_color: colors.floor.unwrap_or(DEFAULT_FLOOR_COLOR),
                },
                &mut events,
            );
            autosave.handle(&events);
        }
        Ok(Self { world, autosave })
    }

    /// Runs one subcommand and returns the text to print.
    pub(crate) fn execute(&mut self, command: PlannerCommand) -> Result<String> {
        let command = match command {
            PlannerCommand::Show { at } => {
                let pointer = match at.as_deref() {
                    Some(&[x, y]) => Some(CellCoord::new(x, y)),
                    Some(_) => bail!("--at takes a column and a row"),
                    None => None,
                };
                return self.show(pointer);
            }
            PlannerCommand::Inventory { totals, json } => return self.inventory(totals, json),
            PlannerCommand::Export => {
                return Ok(transfer::encode(&Workspace::from_world(&self.world))? + "\n")
            }
            PlannerCommand::Import { value } => {
                let workspace = transfer::decode(&value)?;
                let size = workspace.grid.size();
                let events = self.apply(workspace.into_command());
                if let Some(Event::DesignRejected { reason }) = events.first() {
                    bail!("imported design rejected: {reason}");
                }
                self.autosave.mark_dirty();
                return Ok(format!("imported {size}x{size} design\n"));
            }
            PlannerCommand::Paint {
                room,
                x,
                y,
                rotation,
                label,
                color,
                inventory,
            } => Command::Paint {
                tool: room,
                cell: CellCoord::new(x, y),
                sub_target: SubTarget::None,
                brush: Brush {
                    rotation: Rotation::wrapping(rotation),
                    custom_color: color,
                    label,
                    has_inventory: inventory,
                },
            },
            PlannerCommand::Wall {
                kind,
                x,
                y,
                edge,
                color,
            } => {
                if kind.as_structure().is_none() {
                    bail!("{kind} is not a wall kind; use straight-wall, door or window");
                }
                Command::Paint {
                    tool: kind,
                    cell: CellCoord::new(x, y),
                    sub_target: SubTarget::None,
                    brush: Brush {
                        rotation: edge.rotation(),
                        custom_color: color,
                        ..Brush::default()
                    },
                }
            }
            PlannerCommand::Erase { x, y, wall } => Command::Paint {
                tool: RoomType::Empty,
                cell: CellCoord::new(x, y),
                sub_target: sub_target(wall),
                brush: Brush::default(),
            },
            PlannerCommand::Move {
                from_x,
                from_y,
                to_x,
                to_y,
                wall,
            } => Command::Move {
                from: CellCoord::new(from_x, from_y),
                to: CellCoord::new(to_x, to_y),
                sub_target: sub_target(wall),
            },
            PlannerCommand::Rotate { x, y, wall } => self.rotation_command(x, y, wall)?,
        };

        let events = self.apply(command);
        let mut report = String::new();
        for line in events.iter().filter_map(describe) {
            let _ = writeln!(report, "{line}");
        }
        Ok(report)
    }

    /// Saves pending changes.
    ///
    /// Returns the status to print, or an error when the store rejected the save.
    pub(crate) fn finish<S>(&mut self, store: &mut S) -> Result<Option<String>>
    where
        S: WorkspaceStore + ?Sized,
    {
        match self.autosave.tick(store, &self.world) {
            Some(status @ SaveStatus::Failed(_)) => bail!("{status}"),
            status => Ok(status.map(ToString::to_string)),
        }
    }

    fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.world, command, &mut events);
        debug!(events = events.len(), "command applied");
        self.autosave.handle(&events);
        events
    }

    fn show(&self, pointer: Option<CellCoord>) -> Result<String> {
        let grid = query::grid(&self.world).clone();
        let scene = Scene::from_grid(
            &grid,
            query::world_color(&self.world),
            query::floor_color(&self.world),
        )?;
        let title = format!("Clinic floor plan for {}", self.autosave.owner());
        let mut buffer = Vec::new();
        let mut backend = AsciiBackend::new(&mut buffer);
        if let Some(cell) = pointer {
            backend = backend.pointing_at(cell);
        }
        backend.run(Presentation::new(title, scene), move |input, scene| {
            scene.highlight = input
                .pointer_world_space
                .and_then(|point| scene.pick(&grid, point))
                .and_then(|(cell, sub_target)| resolve(&grid, cell, sub_target))
                .and_then(|selection| inspect(&grid, selection))
                .map(|inspection| match inspection {
                    Inspection::Room(details) => details.region,
                    Inspection::Wall { cell, .. } | Inspection::Floor { cell, .. } => {
                        CellRect::single(cell)
                    }
                });
        })?;
        String::from_utf8(buffer).context("map is not valid UTF-8")
    }

    fn inventory(&self, totals: bool, json: bool) -> Result<String> {
        let entries = aggregate(query::grid(&self.world));
        if json {
            return Ok(serde_json::to_string_pretty(&entries)? + "\n");
        }

        let mut report = String::new();
        if totals {
            for (name, quantity) in totals_by_name(&entries) {
                let _ = writeln!(report, "{quantity:>6} {name}");
            }
        } else {
            for entry in &entries {
                let _ = writeln!(
                    report,
                    "{:>6} {} @ {} ({},{})",
                    entry.item.quantity, entry.item.name, entry.location, entry.x, entry.y
                );
            }
        }
        Ok(report)
    }

    fn rotation_command(&self, x: u32, y: u32, wall: Option<u32>) -> Result<Command> {
        let grid = query::grid(&self.world);
        let cell = CellCoord::new(x, y);
        let selection = resolve(grid, cell, sub_target(wall))
            .with_context(|| format!("{x},{y} lies outside the grid"))?;

        match inspect(grid, selection) {
            Some(Inspection::Wall {
                cell,
                wall_index,
                wall,
            }) => Ok(Command::UpdateWall {
                cell,
                wall_index,
                patch: WallPatch {
                    rotation: Some(wall.rotation.clockwise()),
                    ..WallPatch::default()
                },
            }),
            Some(Inspection::Room(details)) => Ok(Command::UpdateRoom {
                cell,
                patch: RoomPatch {
                    rotation: Some(details.rotation.clockwise()),
                    ..RoomPatch::default()
                },
            }),
            Some(Inspection::Floor { .. }) | None => bail!("nothing to rotate at {x},{y}"),
        }
    }
}

fn sub_target(wall: Option<u32>) -> SubTarget {
    wall.map_or(SubTarget::None, |index| SubTarget::Wall(WallIndex::new(index)))
}

fn at(cell: CellCoord) -> String {
    format!("{},{}", cell.column(), cell.row())
}

fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::RoomPlaced {
            room_type, anchor, ..
        } => format!("placed {room_type} at {}", at(*anchor)),
        Event::RoomErased { room_type, region } => {
            format!("erased {room_type} at {}", at(region.origin()))
        }
        Event::WallPlaced {
            cell,
            wall_index,
            kind,
            rotation,
            replaced,
        } => format!(
            "{} {} #{} on {:?} edge of {}",
            if *replaced { "replaced" } else { "placed" },
            kind.display_name(),
            wall_index.get(),
            rotation.edge(),
            at(*cell)
        ),
        Event::WallErased { cell, wall_index } => {
            format!("erased wall #{} at {}", wall_index.get(), at(*cell))
        }
        Event::RoomUpdated { room_type, region } => {
            format!("updated {room_type} at {}", at(region.origin()))
        }
        Event::WallUpdated { cell, wall_index } => {
            format!("updated wall #{} at {}", wall_index.get(), at(*cell))
        }
        Event::RoomMoved {
            room_type, from, to, ..
        } => format!("moved {room_type} from {} to {}", at(*from), at(*to)),
        Event::WallMoved { from, to, .. } => {
            format!("moved wall from {} to {}", at(*from), at(*to))
        }
        Event::PlacementRejected { reason, .. } | Event::UpdateRejected { reason, .. } => {
            format!("rejected: {reason}")
        }
        Event::MoveRejected { reason, .. } => format!("rejected: {reason}"),
        _ => return None,
    };
    Some(line)
}
