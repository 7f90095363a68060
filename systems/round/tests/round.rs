use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use grid_arcade_board::{self as board, BoardConfig};
use grid_arcade_core::{Direction, GridCoord, GridSize, Outcome, TileValue};
use grid_arcade_system_round::{
    MergeRound, RoundController, RoundPhase, SnakeRound, SnakeSeed, TickScheduler,
};
use grid_arcade_arena::{self as arena, ArenaConfig};

const INTERVAL: Duration = Duration::from_millis(150);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SchedulerAction {
    Started(Duration),
    Stopped,
}

/// Scheduler double that records every engagement for later inspection.
#[derive(Clone, Debug, Default)]
struct RecordingScheduler {
    log: Rc<RefCell<Vec<SchedulerAction>>>,
}

impl RecordingScheduler {
    fn actions(&self) -> Vec<SchedulerAction> {
        self.log.borrow().clone()
    }
}

impl TickScheduler for RecordingScheduler {
    fn start(&mut self, interval: Duration) {
        self.log.borrow_mut().push(SchedulerAction::Started(interval));
    }

    fn stop(&mut self) {
        self.log.borrow_mut().push(SchedulerAction::Stopped);
    }
}

#[test]
fn scheduler_engages_on_start_and_disengages_on_outcome() {
    let scheduler = RecordingScheduler::default();
    let round = SnakeRound::new(
        ArenaConfig::new(GridSize::new(5, 5), 1),
        vec![SnakeSeed {
            head: GridCoord::new(0, 2),
            length: 1,
            heading: Direction::Left,
        }],
        0,
    );
    let mut controller = RoundController::new(round, scheduler.clone(), INTERVAL);

    let mut events = Vec::new();
    controller.start(&mut events);
    assert_eq!(controller.phase(), RoundPhase::Running);
    assert_eq!(scheduler.actions(), vec![SchedulerAction::Started(INTERVAL)]);

    // The only snake walks straight off the field.
    controller.tick(&mut events);
    assert_eq!(controller.phase(), RoundPhase::Stopped);
    assert_eq!(controller.outcome(), Some(Outcome::Lost));
    assert_eq!(
        scheduler.actions(),
        vec![
            SchedulerAction::Started(INTERVAL),
            SchedulerAction::Stopped
        ]
    );
}

#[test]
fn ticks_and_steering_are_ignored_outside_a_live_round() {
    let round = snake_round_10x10(GridCoord::new(5, 5), Direction::Up);
    let mut controller = RoundController::new(round, RecordingScheduler::default(), INTERVAL);
    let mut events = Vec::new();

    // Not started yet.
    controller.tick(&mut events);
    controller.steer(0, Direction::Left, &mut events);
    assert_eq!(controller.phase(), RoundPhase::NotStarted);
    assert!(events.is_empty());

    controller.start(&mut events);
    controller.stop();
    assert_eq!(controller.phase(), RoundPhase::Stopped);

    events.clear();
    controller.tick(&mut events);
    controller.steer(0, Direction::Left, &mut events);
    controller.pause_toggle();
    assert_eq!(controller.phase(), RoundPhase::Stopped);
    assert!(events.is_empty());

    let head = head_of(controller.simulation());
    assert_eq!(head, Some(GridCoord::new(5, 5)), "no tick may move the snake");
}

#[test]
fn pausing_blocks_ticks_and_resuming_discards_buffered_steering() {
    let round = snake_round_10x10(GridCoord::new(5, 5), Direction::Up);
    let mut controller = RoundController::new(round, RecordingScheduler::default(), INTERVAL);
    let mut events = Vec::new();
    controller.start(&mut events);

    controller.pause_toggle();
    assert_eq!(controller.phase(), RoundPhase::Paused);

    controller.tick(&mut events);
    assert_eq!(head_of(controller.simulation()), Some(GridCoord::new(5, 5)));

    // Steering is accepted while paused, but resuming forgets it.
    controller.steer(0, Direction::Left, &mut events);
    controller.pause_toggle();
    assert_eq!(controller.phase(), RoundPhase::Running);

    controller.tick(&mut events);
    assert_eq!(
        head_of(controller.simulation()),
        Some(GridCoord::new(5, 4)),
        "the buffered turn must not survive the pause"
    );
}

#[test]
fn merge_round_resolves_moves_and_latches_the_win() {
    // Two initial tiles fill a 2x1 board, so the first sweep merges them
    // into the target value.
    let config = BoardConfig::new(GridSize::new(2, 1), TileValue::new(4), 11);
    let mut controller =
        RoundController::new(MergeRound::new(config), RecordingScheduler::default(), INTERVAL);
    let mut events = Vec::new();
    controller.start(&mut events);

    controller.steer(0, Direction::Left, &mut events);
    assert_eq!(controller.outcome(), Some(Outcome::Won));
    assert_eq!(controller.phase(), RoundPhase::Stopped);
    assert_eq!(
        board::query::max_value(controller.simulation().board()),
        TileValue::new(4)
    );

    // A stopped round swallows further input.
    let view_before = board::query::tile_view(controller.simulation().board()).into_vec();
    events.clear();
    controller.steer(0, Direction::Right, &mut events);
    assert!(events.is_empty());
    assert_eq!(
        board::query::tile_view(controller.simulation().board()).into_vec(),
        view_before
    );
}

#[test]
fn a_paused_merge_round_ignores_direction_input() {
    let config = BoardConfig::new(GridSize::new(4, 4), TileValue::new(2048), 5);
    let mut controller =
        RoundController::new(MergeRound::new(config), RecordingScheduler::default(), INTERVAL);
    let mut events = Vec::new();
    controller.start(&mut events);

    controller.pause_toggle();
    assert_eq!(controller.phase(), RoundPhase::Paused);

    // Puzzle moves execute immediately, so none may run while paused.
    let view_before = board::query::tile_view(controller.simulation().board()).into_vec();
    events.clear();
    controller.steer(0, Direction::Left, &mut events);
    assert!(events.is_empty());
    assert_eq!(
        board::query::tile_view(controller.simulation().board()).into_vec(),
        view_before
    );
    assert_eq!(controller.phase(), RoundPhase::Paused);

    controller.pause_toggle();
    controller.steer(0, Direction::Left, &mut events);
    assert!(!events.is_empty(), "resuming restores move resolution");
}

#[test]
fn multi_snake_round_is_won_by_the_last_survivor() {
    let seeds = vec![
        SnakeSeed {
            head: GridCoord::new(0, 1),
            length: 1,
            heading: Direction::Left,
        },
        SnakeSeed {
            head: GridCoord::new(3, 3),
            length: 1,
            heading: Direction::Up,
        },
    ];
    let round = SnakeRound::new(ArenaConfig::new(GridSize::new(7, 7), 1), seeds, 0);
    let mut controller = RoundController::new(round, RecordingScheduler::default(), INTERVAL);
    let mut events = Vec::new();
    controller.start(&mut events);

    controller.tick(&mut events);

    assert_eq!(controller.outcome(), Some(Outcome::Won));
    let survivor = controller
        .simulation()
        .survivor()
        .expect("one snake remains");
    assert_eq!(survivor, controller.simulation().players()[1]);
}

#[test]
fn multi_snake_round_ends_in_a_draw_when_no_snake_survives() {
    let seeds = vec![
        SnakeSeed {
            head: GridCoord::new(1, 2),
            length: 1,
            heading: Direction::Right,
        },
        SnakeSeed {
            head: GridCoord::new(3, 2),
            length: 1,
            heading: Direction::Left,
        },
    ];
    let round = SnakeRound::new(ArenaConfig::new(GridSize::new(7, 7), 1), seeds, 0);
    let mut controller = RoundController::new(round, RecordingScheduler::default(), INTERVAL);
    let mut events = Vec::new();
    controller.start(&mut events);

    controller.tick(&mut events);

    assert_eq!(controller.outcome(), Some(Outcome::Draw));
    assert_eq!(controller.phase(), RoundPhase::Stopped);
}

fn snake_round_10x10(head: GridCoord, heading: Direction) -> SnakeRound {
    SnakeRound::new(
        ArenaConfig::new(GridSize::new(10, 10), 1),
        vec![SnakeSeed {
            head,
            length: 3,
            heading,
        }],
        0,
    )
}

fn head_of(round: &SnakeRound) -> Option<GridCoord> {
    arena::query::snake_view(round.arena())
        .into_vec()
        .pop()
        .and_then(|snapshot| snapshot.head)
}
