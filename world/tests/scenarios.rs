use dental_planner_core::{
    Brush, CellCoord, Command, Event, Grid, HistoryDirection, MoveError, PlacementError,
    RoomType, Rotation, StructureKind, SubTarget, VariantOffset, WallIndex, DEFAULT_FLOOR_COLOR,
    DEFAULT_WORLD_COLOR,
};
use dental_planner_world::{apply, query, World};

fn paint(world: &mut World, tool: RoomType, cell: CellCoord, brush: Brush) -> Vec<Event> {
    let mut events = Vec::new();
    apply(
        world,
        Command::Paint {
            tool,
            cell,
            sub_target: SubTarget::None,
            brush,
        },
        &mut events,
    );
    events
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn lobby_brush() -> Brush {
    Brush {
        label: Some("Lobby".to_owned()),
        has_inventory: true,
        ..Brush::default()
    }
}

#[test]
fn waiting_room_centers_on_click() {
    let mut world = World::new();
    let events = paint(
        &mut world,
        RoomType::WaitingRoom,
        CellCoord::new(7, 7),
        lobby_brush(),
    );
    assert!(
        matches!(
            events.as_slice(),
            [Event::RoomPlaced {
                room_type: RoomType::WaitingRoom,
                anchor,
                ..
            }] if *anchor == CellCoord::new(5, 5)
        ),
        "placement should report the clamped anchor, got {events:?}",
    );

    let grid = query::grid(&world);
    for row in 0..15 {
        for column in 0..15 {
            let tile = grid
                .tile(CellCoord::new(column, row))
                .expect("cell inside grid");
            let inside = (5..10).contains(&column) && (5..10).contains(&row);
            assert_eq!(
                tile.room_type == RoomType::WaitingRoom,
                inside,
                "cell ({column}, {row}) has unexpected room type",
            );
            let is_center = column == 7 && row == 7;
            assert_eq!(tile.label.is_some(), is_center, "only the center carries a label");
            assert_eq!(tile.has_inventory, is_center, "only the center carries inventory");
        }
    }
    assert_eq!(
        grid.tile(CellCoord::new(7, 7)).and_then(|tile| tile.variant()),
        Some(VariantOffset::new(2, 2)),
    );
}

#[test]
fn repeated_placement_is_blocked() {
    let mut world = World::new();
    let _ = paint(
        &mut world,
        RoomType::WaitingRoom,
        CellCoord::new(7, 7),
        lobby_brush(),
    );
    let before = query::grid(&world).clone();

    let events = paint(
        &mut world,
        RoomType::WaitingRoom,
        CellCoord::new(7, 7),
        lobby_brush(),
    );

    assert_eq!(
        events,
        vec![Event::PlacementRejected {
            tool: RoomType::WaitingRoom,
            cell: CellCoord::new(7, 7),
            reason: PlacementError::Occupied,
        }],
    );
    assert_eq!(query::grid(&world), &before, "blocked placement must not touch the grid");
}

#[test]
fn walls_attach_only_on_room_perimeter() {
    let mut world = World::new();
    let _ = paint(
        &mut world,
        RoomType::WaitingRoom,
        CellCoord::new(7, 7),
        Brush::default(),
    );
    let corner = CellCoord::new(5, 5);

    let north = paint(
        &mut world,
        RoomType::StraightWall,
        corner,
        Brush {
            rotation: Rotation::wrapping(0),
            ..Brush::default()
        },
    );
    assert_eq!(
        north,
        vec![Event::WallPlaced {
            cell: corner,
            wall_index: WallIndex::new(0),
            kind: StructureKind::StraightWall,
            rotation: Rotation::wrapping(0),
            replaced: false,
        }],
    );

    let before = query::grid(&world).clone();
    let south = paint(
        &mut world,
        RoomType::StraightWall,
        corner,
        Brush {
            rotation: Rotation::wrapping(2),
            ..Brush::default()
        },
    );
    assert_eq!(
        south,
        vec![Event::PlacementRejected {
            tool: RoomType::StraightWall,
            cell: corner,
            reason: PlacementError::OffPerimeter,
        }],
    );
    assert_eq!(query::grid(&world), &before, "interior wall must leave grid unchanged");
}

#[test]
fn single_tile_door_moves_with_payload() {
    let mut grid = Grid::default();
    {
        let door = grid
            .tile_mut(CellCoord::new(3, 3))
            .expect("cell inside grid");
        door.room_type = RoomType::Door;
        door.rotation = Rotation::wrapping(1);
        door.label = Some("Staff entrance".to_owned());
        let _ = door.attach_wall(dental_planner_core::PlacedWall::new(
            StructureKind::StraightWall,
            Rotation::wrapping(3),
        ));
    }
    {
        let below = grid
            .tile_mut(CellCoord::new(3, 4))
            .expect("cell inside grid");
        let _ = below.attach_wall(dental_planner_core::PlacedWall::new(
            StructureKind::Window,
            Rotation::wrapping(2),
        ));
    }

    let mut world = World::new();
    let _ = run(
        &mut world,
        Command::LoadDesign {
            grid,
            world_color: DEFAULT_WORLD_COLOR,
            floor_color: DEFAULT_FLOOR_COLOR,
        },
    );
    let events = run(
        &mut world,
        Command::Move {
            from: CellCoord::new(3, 3),
            to: CellCoord::new(3, 4),
            sub_target: SubTarget::None,
        },
    );
    assert!(
        matches!(events.as_slice(), [Event::RoomMoved { room_type: RoomType::Door, .. }]),
        "door move should succeed, got {events:?}",
    );

    let origin = query::tile(&world, CellCoord::new(3, 3)).expect("cell inside grid");
    assert_eq!(origin.room_type, RoomType::Empty);
    assert_eq!(origin.label, None);
    assert_eq!(
        origin.placed_walls,
        vec![dental_planner_core::PlacedWall::new(
            StructureKind::StraightWall,
            Rotation::wrapping(3),
        )],
        "source keeps its walls",
    );
    let landed = query::tile(&world, CellCoord::new(3, 4)).expect("cell inside grid");
    assert_eq!(landed.room_type, RoomType::Door);
    assert_eq!(landed.rotation, Rotation::wrapping(1));
    assert_eq!(landed.label.as_deref(), Some("Staff entrance"));
    assert_eq!(
        landed.placed_walls,
        vec![dental_planner_core::PlacedWall::new(
            StructureKind::Window,
            Rotation::wrapping(2),
        )],
        "destination keeps only its own walls",
    );
}

#[test]
fn undo_and_redo_walk_through_edits() {
    let mut world = World::new();
    let empty = query::grid(&world).clone();

    let _ = paint(&mut world, RoomType::Office, CellCoord::new(1, 1), Brush::default());
    let after_first = query::grid(&world).clone();
    let _ = paint(&mut world, RoomType::Lab, CellCoord::new(2, 1), Brush::default());
    let after_second = query::grid(&world).clone();

    assert_eq!(
        run(&mut world, Command::Undo),
        vec![Event::HistoryRestored {
            direction: HistoryDirection::Undo
        }],
    );
    assert_eq!(query::grid(&world), &after_first);
    let _ = run(&mut world, Command::Undo);
    assert_eq!(query::grid(&world), &empty);
    assert!(run(&mut world, Command::Undo).is_empty(), "nothing left to undo");

    let _ = run(&mut world, Command::Redo);
    let _ = run(&mut world, Command::Redo);
    assert_eq!(query::grid(&world), &after_second);
    assert!(!query::can_redo(&world));
}

#[test]
fn new_edit_after_undo_discards_redo() {
    let mut world = World::new();
    let _ = paint(&mut world, RoomType::Office, CellCoord::new(1, 1), Brush::default());
    let _ = run(&mut world, Command::Undo);
    assert!(query::can_redo(&world));

    let _ = paint(&mut world, RoomType::Storage, CellCoord::new(4, 4), Brush::default());
    assert!(!query::can_redo(&world), "fresh edit must clear the redo stack");
    assert!(run(&mut world, Command::Redo).is_empty());
}

#[test]
fn moving_onto_same_cell_is_rejected() {
    let mut world = World::new();
    let _ = paint(&mut world, RoomType::Office, CellCoord::new(1, 1), Brush::default());
    let events = run(
        &mut world,
        Command::Move {
            from: CellCoord::new(1, 1),
            to: CellCoord::new(1, 1),
            sub_target: SubTarget::None,
        },
    );
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            from: CellCoord::new(1, 1),
            to: CellCoord::new(1, 1),
            reason: MoveError::SameCell,
        }],
    );
}

#[test]
fn erase_restores_empty_floor_but_keeps_walls() {
    let mut world = World::new();
    let _ = paint(
        &mut world,
        RoomType::Window,
        CellCoord::new(10, 10),
        Brush {
            rotation: Rotation::wrapping(3),
            ..Brush::default()
        },
    );
    let _ = paint(
        &mut world,
        RoomType::ImagingSuite,
        CellCoord::new(12, 12),
        Brush::default(),
    );

    let events = paint(&mut world, RoomType::Empty, CellCoord::new(14, 14), Brush::default());
    assert!(
        matches!(events.as_slice(), [Event::RoomErased { room_type: RoomType::ImagingSuite, .. }]),
        "erase should clear the imaging suite, got {events:?}",
    );

    let corner = query::tile(&world, CellCoord::new(10, 10)).expect("cell inside grid");
    assert_eq!(corner.room_type, RoomType::Empty);
    assert_eq!(corner.placed_walls.len(), 1);
    assert!(
        query::grid(&world)
            .tiles()
            .all(|tile| tile.room_type == RoomType::Empty),
        "every member should be erased",
    );
}

#[test]
fn move_preview_reports_collisions_without_mutation() {
    let mut world = World::new();
    let _ = paint(&mut world, RoomType::WaitingRoom, CellCoord::new(2, 2), Brush::default());
    let _ = paint(&mut world, RoomType::Storage, CellCoord::new(9, 9), Brush::default());
    let before = query::grid(&world).clone();

    let preview = query::move_preview(
        &world,
        CellCoord::new(2, 2),
        CellCoord::new(8, 8),
        SubTarget::None,
    )
    .expect("footprint fits inside grid");
    assert_eq!(preview.rejection, Some(MoveError::Occupied));
    assert_eq!(preview.region.origin(), CellCoord::new(6, 6));
    assert!(!query::is_drag_valid(
        &world,
        CellCoord::new(2, 2),
        CellCoord::new(8, 8),
        SubTarget::None
    ));
    assert_eq!(query::grid(&world), &before);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "corrupt large room group")]
fn corrupt_group_fails_loudly_in_debug_builds() {
    let mut grid = Grid::default();
    {
        let tile = grid
            .tile_mut(CellCoord::new(1, 1))
            .expect("cell inside grid");
        tile.room_type = RoomType::OperatorySuite;
        tile.set_variant(Some(VariantOffset::new(4, 4)));
    }
    let mut world = World::new();
    let _ = run(
        &mut world,
        Command::LoadDesign {
            grid,
            world_color: DEFAULT_WORLD_COLOR,
            floor_color: DEFAULT_FLOOR_COLOR,
        },
    );
    let _ = paint(&mut world, RoomType::Empty, CellCoord::new(1, 1), Brush::default());
}

#[cfg(not(debug_assertions))]
#[test]
fn corrupt_group_is_rejected_in_release_builds() {
    let mut grid = Grid::default();
    {
        let tile = grid
            .tile_mut(CellCoord::new(1, 1))
            .expect("cell inside grid");
        tile.room_type = RoomType::OperatorySuite;
        tile.set_variant(Some(VariantOffset::new(4, 4)));
    }
    let mut world = World::new();
    let _ = run(
        &mut world,
        Command::LoadDesign {
            grid: grid.clone(),
            world_color: DEFAULT_WORLD_COLOR,
            floor_color: DEFAULT_FLOOR_COLOR,
        },
    );
    let events = paint(&mut world, RoomType::Empty, CellCoord::new(1, 1), Brush::default());
    assert_eq!(
        events,
        vec![Event::PlacementRejected {
            tool: RoomType::Empty,
            cell: CellCoord::new(1, 1),
            reason: PlacementError::CorruptGroup,
        }],
    );
    assert_eq!(query::grid(&world), &grid);
}

fn waiting_room_with_member_claiming_anchor() -> World {
    let mut world = World::new();
    let _ = paint(
        &mut world,
        RoomType::WaitingRoom,
        CellCoord::new(7, 7),
        Brush::default(),
    );
    let mut grid = query::grid(&world).clone();
    grid.tile_mut(CellCoord::new(9, 9))
        .expect("cell inside grid")
        .set_variant(Some(VariantOffset::new(0, 0)));
    let loaded = run(
        &mut world,
        Command::LoadDesign {
            grid,
            world_color: DEFAULT_WORLD_COLOR,
            floor_color: DEFAULT_FLOOR_COLOR,
        },
    );
    assert_eq!(loaded, vec![Event::DesignLoaded { size: 15 }]);
    world
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "corrupt large room group")]
fn member_disagreeing_with_anchor_fails_loudly_in_debug_builds() {
    let mut world = waiting_room_with_member_claiming_anchor();
    let _ = paint(&mut world, RoomType::Empty, CellCoord::new(9, 9), Brush::default());
}

#[cfg(not(debug_assertions))]
#[test]
fn member_disagreeing_with_anchor_is_not_erased_in_release_builds() {
    let mut world = waiting_room_with_member_claiming_anchor();
    let before = query::grid(&world).clone();

    let events = paint(&mut world, RoomType::Empty, CellCoord::new(9, 9), Brush::default());
    assert_eq!(
        events,
        vec![Event::PlacementRejected {
            tool: RoomType::Empty,
            cell: CellCoord::new(9, 9),
            reason: PlacementError::CorruptGroup,
        }],
    );
    let events = run(
        &mut world,
        Command::Move {
            from: CellCoord::new(6, 6),
            to: CellCoord::new(2, 2),
            sub_target: SubTarget::None,
        },
    );
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            from: CellCoord::new(6, 6),
            to: CellCoord::new(2, 2),
            reason: MoveError::CorruptGroup,
        }],
    );
    assert_eq!(query::grid(&world), &before);
}
