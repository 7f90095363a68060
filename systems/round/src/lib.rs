#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round orchestration for Grid Arcade.
//!
//! The [`RoundController`] owns the lifecycle of one round and drives a
//! [`Simulation`] through its phases. The
//! periodic timer that fires ticks stays behind the [`TickScheduler`] seam
//! so adapters decide how wall-clock time is produced.

use std::time::Duration;

use grid_arcade_arena::{self as arena, Arena, ArenaConfig};
use grid_arcade_board::{self as board, Board, BoardConfig};
use grid_arcade_core::{
    ArenaCommand, ArenaEvent, BoardCommand, BoardEvent, Direction, GridCoord, Outcome, SnakeId,
};

/// Lifecycle phase of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// The round was constructed but never started.
    NotStarted,
    /// Ticks are being processed.
    Running,
    /// The round is suspended; resuming discards stale buffered input.
    Paused,
    /// The round ended; no further ticks or input are accepted.
    Stopped,
}

/// Periodic-callback collaborator invoked on round transitions.
///
/// Implementations wrap whatever timer primitive the host environment
/// offers; the controller only tells it when ticking should begin and end.
pub trait TickScheduler {
    /// Begins periodic tick delivery at the provided interval.
    fn start(&mut self, interval: Duration);
    /// Cancels periodic tick delivery.
    fn stop(&mut self);
}

/// Scheduler for adapters that drive ticks themselves, such as headless
/// runs or tests. Start and stop requests are accepted and ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualScheduler;

impl TickScheduler for ManualScheduler {
    fn start(&mut self, _interval: Duration) {}

    fn stop(&mut self) {}
}

/// Game variant driven by the round controller.
///
/// The merge puzzle and the snake arena share this seam: both consume
/// direction input and report a terminal outcome, while only the arena
/// does per-tick work.
pub trait Simulation {
    /// Event type broadcast by the underlying world.
    type Event;

    /// Performs initial placement when the round starts.
    fn begin(&mut self, out_events: &mut Vec<Self::Event>);

    /// Advances the simulation by one tick.
    fn advance(&mut self, out_events: &mut Vec<Self::Event>);

    /// Routes a direction intent from the identified player slot.
    fn steer(&mut self, player: usize, direction: Direction, out_events: &mut Vec<Self::Event>);

    /// Whether direction input is merely buffered for the next tick.
    ///
    /// Buffered input is safe to accept while paused; input that executes
    /// immediately is only accepted while running.
    fn buffers_input(&self) -> bool;

    /// Discards input buffered before a pause.
    fn discard_buffered_input(&mut self);

    /// Terminal outcome reached by the simulation, if any.
    fn outcome(&self) -> Option<Outcome>;
}

/// Orchestrates one round of a [`Simulation`] behind a [`TickScheduler`].
#[derive(Debug)]
pub struct RoundController<S, C> {
    simulation: S,
    scheduler: C,
    interval: Duration,
    phase: RoundPhase,
    outcome: Option<Outcome>,
}

impl<S: Simulation, C: TickScheduler> RoundController<S, C> {
    /// Creates a controller that will drive the provided simulation at the
    /// given tick interval once started.
    #[must_use]
    pub const fn new(simulation: S, scheduler: C, interval: Duration) -> Self {
        Self {
            simulation,
            scheduler,
            interval,
            phase: RoundPhase::NotStarted,
            outcome: None,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Terminal outcome of the round, if one was reached.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Read-only access to the driven simulation.
    #[must_use]
    pub const fn simulation(&self) -> &S {
        &self.simulation
    }

    /// Starts the round, performing initial placement and engaging the
    /// scheduler. A no-op unless the round was never started.
    pub fn start(&mut self, out_events: &mut Vec<S::Event>) {
        if self.phase != RoundPhase::NotStarted {
            return;
        }
        self.simulation.begin(out_events);
        self.phase = RoundPhase::Running;
        self.scheduler.start(self.interval);
    }

    /// Toggles between running and paused. Resuming discards direction
    /// changes buffered before the pause.
    pub fn pause_toggle(&mut self) {
        match self.phase {
            RoundPhase::Running => {
                self.phase = RoundPhase::Paused;
                self.scheduler.stop();
            }
            RoundPhase::Paused => {
                self.simulation.discard_buffered_input();
                self.phase = RoundPhase::Running;
                self.scheduler.start(self.interval);
            }
            RoundPhase::NotStarted | RoundPhase::Stopped => {}
        }
    }

    /// Processes one scheduler tick. A no-op unless the round is running.
    pub fn tick(&mut self, out_events: &mut Vec<S::Event>) {
        if self.phase != RoundPhase::Running {
            return;
        }
        self.simulation.advance(out_events);
        self.latch_outcome();
    }

    /// Routes a direction intent from the identified player slot. Accepted
    /// while running, and while paused when the simulation only buffers it;
    /// buffered input from a pause is discarded on resume.
    pub fn steer(&mut self, player: usize, direction: Direction, out_events: &mut Vec<S::Event>) {
        match self.phase {
            RoundPhase::Running => {}
            RoundPhase::Paused if self.simulation.buffers_input() => {}
            _ => return,
        }
        self.simulation.steer(player, direction, out_events);
        self.latch_outcome();
    }

    /// Stops the round from any phase. Stopped is terminal.
    pub fn stop(&mut self) {
        if self.phase == RoundPhase::Stopped {
            return;
        }
        self.phase = RoundPhase::Stopped;
        self.scheduler.stop();
    }

    fn latch_outcome(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        if let Some(outcome) = self.simulation.outcome() {
            self.outcome = Some(outcome);
            self.phase = RoundPhase::Stopped;
            self.scheduler.stop();
        }
    }
}

/// Merge-puzzle round: every direction intent resolves a sweep immediately;
/// ticks perform no work.
#[derive(Debug)]
pub struct MergeRound {
    board: Board,
}

impl MergeRound {
    /// Creates a puzzle round over a freshly configured board.
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        Self {
            board: Board::new(config),
        }
    }

    /// Read-only access to the underlying board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }
}

impl Simulation for MergeRound {
    type Event = BoardEvent;

    fn begin(&mut self, _out_events: &mut Vec<BoardEvent>) {
        // The board spawns its two initial tiles at construction.
    }

    fn advance(&mut self, _out_events: &mut Vec<BoardEvent>) {
        // Tile motion is driven by direction input, not by the clock.
    }

    fn steer(&mut self, _player: usize, direction: Direction, out_events: &mut Vec<BoardEvent>) {
        board::apply(
            &mut self.board,
            BoardCommand::Move { direction },
            out_events,
        );
    }

    fn buffers_input(&self) -> bool {
        false
    }

    fn discard_buffered_input(&mut self) {}

    fn outcome(&self) -> Option<Outcome> {
        board::query::outcome(&self.board)
    }
}

/// Placement request for one snake joining a [`SnakeRound`].
#[derive(Clone, Copy, Debug)]
pub struct SnakeSeed {
    /// Cell the snake's head occupies after spawning.
    pub head: GridCoord,
    /// Requested body length.
    pub length: u32,
    /// Direction the snake initially travels.
    pub heading: Direction,
}

/// Snake round: one or more snakes advance per tick; food respawns as it
/// is eaten.
#[derive(Debug)]
pub struct SnakeRound {
    arena: Arena,
    seeds: Vec<SnakeSeed>,
    players: Vec<SnakeId>,
    food_items: u32,
}

impl SnakeRound {
    /// Creates a snake round; the snakes and food are placed when the
    /// round starts.
    #[must_use]
    pub fn new(config: ArenaConfig, seeds: Vec<SnakeSeed>, food_items: u32) -> Self {
        Self {
            arena: Arena::new(config),
            seeds,
            players: Vec::new(),
            food_items,
        }
    }

    /// Read-only access to the underlying arena.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Snake identifiers in player-slot order.
    #[must_use]
    pub fn players(&self) -> &[SnakeId] {
        &self.players
    }

    /// The last snake standing in a multi-player round, if exactly one
    /// remains.
    #[must_use]
    pub fn survivor(&self) -> Option<SnakeId> {
        let mut alive = arena::query::snake_view(&self.arena)
            .into_vec()
            .into_iter()
            .filter(|snapshot| snapshot.alive);
        let first = alive.next()?;
        alive.next().is_none().then_some(first.id)
    }
}

impl Simulation for SnakeRound {
    type Event = ArenaEvent;

    fn begin(&mut self, out_events: &mut Vec<ArenaEvent>) {
        for seed in &self.seeds {
            arena::apply(
                &mut self.arena,
                ArenaCommand::SpawnSnake {
                    head: seed.head,
                    length: seed.length,
                    heading: seed.heading,
                },
                out_events,
            );
        }
        self.players = arena::query::snake_view(&self.arena)
            .into_vec()
            .into_iter()
            .map(|snapshot| snapshot.id)
            .collect();
        for _ in 0..self.food_items {
            arena::apply(&mut self.arena, ArenaCommand::SpawnFood, out_events);
        }
    }

    fn advance(&mut self, out_events: &mut Vec<ArenaEvent>) {
        arena::apply(&mut self.arena, ArenaCommand::Tick, out_events);
    }

    fn steer(&mut self, player: usize, direction: Direction, out_events: &mut Vec<ArenaEvent>) {
        let Some(snake) = self.players.get(player).copied() else {
            return;
        };
        arena::apply(
            &mut self.arena,
            ArenaCommand::Steer { snake, direction },
            out_events,
        );
    }

    fn buffers_input(&self) -> bool {
        true
    }

    fn discard_buffered_input(&mut self) {
        let mut ignored = Vec::new();
        arena::apply(&mut self.arena, ArenaCommand::ResetSteering, &mut ignored);
    }

    fn outcome(&self) -> Option<Outcome> {
        if self.players.is_empty() {
            return None;
        }
        let alive = arena::query::alive_count(&self.arena);
        if self.players.len() == 1 {
            return (alive == 0).then_some(Outcome::Lost);
        }
        match alive {
            0 => Some(Outcome::Draw),
            1 => Some(Outcome::Won),
            _ => None,
        }
    }
}
