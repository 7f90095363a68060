use grid_arcade_arena::{self as arena, Arena, ArenaConfig};
use grid_arcade_core::{
    ArenaCommand, ArenaEvent, CrashCause, Direction, GridCoord, GridSize, SnakeId, SteerError,
};

#[test]
fn snakes_keep_a_constant_length_without_food() {
    let mut arena = arena_10x10();
    let mut events = Vec::new();
    spawn(&mut arena, &mut events, GridCoord::new(5, 5), 3, Direction::Up);

    for _ in 0..3 {
        arena::apply(&mut arena, ArenaCommand::Tick, &mut events);
    }

    let snapshot = sole_snake(&arena);
    assert!(snapshot.alive);
    assert_eq!(
        snapshot.body,
        vec![
            GridCoord::new(5, 4),
            GridCoord::new(5, 3),
            GridCoord::new(5, 2),
        ]
    );
}

#[test]
fn eating_food_grows_the_snake_by_exactly_one_cell() {
    // On a 1x2 field the only free cell forces the food placement.
    let mut arena = Arena::new(ArenaConfig::new(GridSize::new(1, 2), 3));
    let mut events = Vec::new();
    spawn(&mut arena, &mut events, GridCoord::new(0, 1), 1, Direction::Up);
    arena::apply(&mut arena, ArenaCommand::SpawnFood, &mut events);
    assert_eq!(arena::query::food_cells(&arena), vec![GridCoord::new(0, 0)]);

    events.clear();
    arena::apply(&mut arena, ArenaCommand::Tick, &mut events);

    let snapshot = sole_snake(&arena);
    assert_eq!(
        snapshot.body,
        vec![GridCoord::new(0, 1), GridCoord::new(0, 0)]
    );
    assert!(events.iter().any(|event| matches!(
        event,
        ArenaEvent::FoodEaten { cell, .. } if *cell == GridCoord::new(0, 0)
    )));
    assert!(events
        .iter()
        .any(|event| matches!(event, ArenaEvent::SnakeGrew { length: 2, .. })));
}

#[test]
fn two_heads_entering_the_same_cell_both_die() {
    let mut arena = arena_10x10();
    let mut events = Vec::new();
    spawn(&mut arena, &mut events, GridCoord::new(1, 2), 1, Direction::Right);
    spawn(&mut arena, &mut events, GridCoord::new(3, 2), 1, Direction::Left);

    events.clear();
    arena::apply(&mut arena, ArenaCommand::Tick, &mut events);

    assert_eq!(arena::query::alive_count(&arena), 0);
    let head_on = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                ArenaEvent::SnakeCrashed {
                    cause: CrashCause::HeadOn,
                    ..
                }
            )
        })
        .count();
    assert_eq!(head_on, 2, "both contenders die regardless of order");
}

#[test]
fn leaving_the_field_is_a_wall_crash() {
    let mut arena = arena_10x10();
    let mut events = Vec::new();
    spawn(&mut arena, &mut events, GridCoord::new(0, 5), 2, Direction::Left);

    events.clear();
    arena::apply(&mut arena, ArenaCommand::Tick, &mut events);

    assert_eq!(arena::query::alive_count(&arena), 0);
    assert!(events.iter().any(|event| matches!(
        event,
        ArenaEvent::SnakeCrashed {
            cause: CrashCause::Wall,
            ..
        }
    )));
}

#[test]
fn entering_a_body_cell_is_fatal_while_a_vacated_tail_is_not() {
    let mut arena = arena_10x10();
    let mut events = Vec::new();
    // Vertical snake with body (2,4) (2,3) (2,2), tail at (2,4).
    let blocker = spawn(&mut arena, &mut events, GridCoord::new(2, 2), 3, Direction::Up);
    let rammer = spawn(&mut arena, &mut events, GridCoord::new(1, 3), 1, Direction::Right);
    let follower = spawn(&mut arena, &mut events, GridCoord::new(1, 4), 1, Direction::Right);

    events.clear();
    arena::apply(&mut arena, ArenaCommand::Tick, &mut events);

    let view = arena::query::snake_view(&arena).into_vec();
    let by_id = |id: SnakeId| {
        view.iter()
            .find(|snapshot| snapshot.id == id)
            .expect("snake present")
    };

    assert!(by_id(blocker).alive);
    assert!(!by_id(rammer).alive, "mid-body cell stays occupied");
    assert!(
        by_id(follower).alive,
        "the tail cell is vacated during the tick"
    );
    assert_eq!(by_id(follower).head, Some(GridCoord::new(2, 4)));
    assert!(events.iter().any(|event| matches!(
        event,
        ArenaEvent::SnakeCrashed {
            snake,
            cause: CrashCause::Body,
        } if *snake == rammer
    )));
}

#[test]
fn reversing_and_flooded_steering_are_rejected() {
    let mut arena = arena_10x10();
    let mut events = Vec::new();
    let snake = spawn(&mut arena, &mut events, GridCoord::new(5, 5), 3, Direction::Up);

    events.clear();
    steer(&mut arena, &mut events, snake, Direction::Down);
    assert!(events.iter().any(|event| matches!(
        event,
        ArenaEvent::SteerRejected {
            reason: SteerError::ReversesPrevious,
            ..
        }
    )));

    events.clear();
    steer(&mut arena, &mut events, snake, Direction::Left);
    assert!(events.is_empty(), "one pending change is accepted");

    steer(&mut arena, &mut events, snake, Direction::Up);
    assert!(events.iter().any(|event| matches!(
        event,
        ArenaEvent::SteerRejected {
            reason: SteerError::Saturated,
            ..
        }
    )));
}

#[test]
fn a_buffered_turn_takes_effect_on_the_next_tick() {
    let mut arena = arena_10x10();
    let mut events = Vec::new();
    let snake = spawn(&mut arena, &mut events, GridCoord::new(5, 5), 3, Direction::Up);

    steer(&mut arena, &mut events, snake, Direction::Left);
    arena::apply(&mut arena, ArenaCommand::Tick, &mut events);

    assert_eq!(sole_snake(&arena).head, Some(GridCoord::new(4, 5)));
}

#[test]
fn entering_the_tail_of_a_crashing_snake_is_survivable() {
    let mut arena = arena_10x10();
    let mut events = Vec::new();
    // Doomed snake with body (1,2) (0,2) about to hit the left wall.
    let doomed = spawn(&mut arena, &mut events, GridCoord::new(0, 2), 2, Direction::Left);
    let survivor = spawn(&mut arena, &mut events, GridCoord::new(1, 3), 1, Direction::Up);

    events.clear();
    arena::apply(&mut arena, ArenaCommand::Tick, &mut events);

    // The crashing snake never vacates its tail, but the cell was
    // scheduled to empty and entering it is not fatal.
    assert!(events.iter().any(|event| matches!(
        event,
        ArenaEvent::SnakeCrashed {
            snake,
            cause: CrashCause::Wall,
        } if *snake == doomed
    )));
    let view = arena::query::snake_view(&arena).into_vec();
    let entrant = view
        .iter()
        .find(|snapshot| snapshot.id == survivor)
        .expect("snake present");
    assert!(entrant.alive);
    assert_eq!(entrant.head, Some(GridCoord::new(1, 2)));
}

#[test]
fn multiple_food_items_occupy_distinct_cells() {
    let mut arena = Arena::new(ArenaConfig::new(GridSize::new(2, 2), 11));
    let mut events = Vec::new();
    for _ in 0..4 {
        arena::apply(&mut arena, ArenaCommand::SpawnFood, &mut events);
    }

    let mut cells = arena::query::food_cells(&arena);
    cells.sort_by_key(|cell| (cell.row(), cell.column()));
    cells.dedup();
    assert_eq!(cells.len(), 4, "every item lands on its own cell");

    // A fifth item finds no free cell and is not placed.
    events.clear();
    arena::apply(&mut arena, ArenaCommand::SpawnFood, &mut events);
    assert!(events.is_empty());
    assert_eq!(arena::query::food_cells(&arena).len(), 4);
}

#[test]
fn reset_steering_discards_the_buffered_turn() {
    let mut arena = arena_10x10();
    let mut events = Vec::new();
    let snake = spawn(&mut arena, &mut events, GridCoord::new(5, 5), 3, Direction::Up);

    steer(&mut arena, &mut events, snake, Direction::Left);
    arena::apply(&mut arena, ArenaCommand::ResetSteering, &mut events);
    arena::apply(&mut arena, ArenaCommand::Tick, &mut events);

    assert_eq!(sole_snake(&arena).head, Some(GridCoord::new(5, 4)));
}

fn arena_10x10() -> Arena {
    Arena::new(ArenaConfig::new(GridSize::new(10, 10), 1))
}

fn spawn(
    arena: &mut Arena,
    out_events: &mut Vec<ArenaEvent>,
    head: GridCoord,
    length: u32,
    heading: Direction,
) -> SnakeId {
    arena::apply(
        arena,
        ArenaCommand::SpawnSnake {
            head,
            length,
            heading,
        },
        out_events,
    );
    out_events
        .iter()
        .rev()
        .find_map(|event| match event {
            ArenaEvent::SnakeSpawned { snake, .. } => Some(*snake),
            _ => None,
        })
        .expect("spawn emits an event")
}

fn steer(
    arena: &mut Arena,
    out_events: &mut Vec<ArenaEvent>,
    snake: SnakeId,
    direction: Direction,
) {
    arena::apply(
        arena,
        ArenaCommand::Steer { snake, direction },
        out_events,
    );
}

fn sole_snake(arena: &Arena) -> arena::query::SnakeSnapshot {
    arena::query::snake_view(arena)
        .into_vec()
        .pop()
        .expect("exactly one snake")
}
