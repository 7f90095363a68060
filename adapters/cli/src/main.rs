#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Grid Arcade headlessly.
//!
//! Both variants consume an input script instead of live key events: each
//! script character is one discrete input, so any run is reproducible from
//! its seed and script alone. Finished runs print a session string that
//! can be replayed with the `replay` subcommand.

mod presenter;
mod session_transfer;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use grid_arcade_arena::{self as arena, Arena, ArenaConfig};
use grid_arcade_board::{self as board, Board, BoardConfig};
use grid_arcade_core::{
    ArenaEvent, CrashCause, Direction, GridCoord, GridSize, Outcome, TileValue, WELCOME_BANNER,
};
use grid_arcade_rendering::{FramePresenter, GridPresentation, Scene, SceneSnake, SceneTile, StatusLine};
use grid_arcade_system_round::{
    ManualScheduler, MergeRound, RoundController, RoundPhase, SnakeRound, SnakeSeed,
};

use presenter::TextPresenter;
use session_transfer::{SessionGame, SessionSnapshot};

/// Interval reported to the scheduler seam; headless runs tick manually.
const TICK_INTERVAL: Duration = Duration::from_millis(200);
/// Cell edge length used when presenting the merge board.
const MERGE_CELL_LENGTH: f32 = 100.0;
/// Cell edge length used when presenting the snake field.
const SNAKE_CELL_LENGTH: f32 = 8.0;

/// Command-line interface for the Grid Arcade experience.
#[derive(Debug, Parser)]
#[command(name = "grid-arcade", about = "Deterministic grid-game runner")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Runs the tile-merging puzzle over a move script.
    Merge(MergeArgs),
    /// Runs the snake variant over a tick script.
    Snake(SnakeArgs),
    /// Replays a previously exported session string.
    Replay {
        /// Session string produced by an earlier run.
        session: String,
    },
}

#[derive(Debug, Args)]
struct MergeArgs {
    /// Number of board columns.
    #[arg(long, default_value_t = 4)]
    columns: u32,
    /// Number of board rows.
    #[arg(long, default_value_t = 4)]
    rows: u32,
    /// Tile value that wins the round.
    #[arg(long, default_value_t = 2048)]
    target: u32,
    /// Seed driving tile placement; derived from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Move script, one of `U`, `D`, `L`, `R` per move.
    #[arg(long, default_value = "")]
    moves: String,
}

#[derive(Debug, Args)]
struct SnakeArgs {
    /// Number of field columns.
    #[arg(long, default_value_t = 21)]
    columns: u32,
    /// Number of field rows.
    #[arg(long, default_value_t = 21)]
    rows: u32,
    /// Number of snakes placed onto the field.
    #[arg(long, default_value_t = 1)]
    players: u32,
    /// Initial body length of each snake.
    #[arg(long, default_value_t = 3)]
    length: u32,
    /// Seed driving food placement; derived from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Tick script: `U/D/L/R` steer player one, `u/d/l/r` steer player
    /// two, `.` is an idle tick and `P` toggles pause.
    #[arg(long, default_value = "")]
    script: String,
}

fn main() -> Result<()> {
    println!("{WELCOME_BANNER}");
    let cli = Cli::parse();
    match cli.command {
        CliCommand::Merge(args) => {
            let seed = args.seed.unwrap_or_else(random_seed);
            run_merge(
                GridSize::new(args.columns, args.rows),
                args.target,
                seed,
                &args.moves,
            )
        }
        CliCommand::Snake(args) => {
            let seed = args.seed.unwrap_or_else(random_seed);
            run_snake(
                GridSize::new(args.columns, args.rows),
                args.players,
                args.length,
                seed,
                &args.script,
            )
        }
        CliCommand::Replay { session } => {
            let snapshot = SessionSnapshot::decode(&session).context("decode session string")?;
            let size = GridSize::new(snapshot.columns, snapshot.rows);
            match snapshot.game {
                SessionGame::Merge { target } => {
                    run_merge(size, target, snapshot.seed, &snapshot.script)
                }
                SessionGame::Snake { players, length } => {
                    run_snake(size, players, length, snapshot.seed, &snapshot.script)
                }
            }
        }
    }
}

fn run_merge(size: GridSize, target: u32, seed: u64, moves: &str) -> Result<()> {
    if size.columns() == 0 || size.rows() == 0 {
        bail!("grid dimensions must be positive");
    }
    if target < 2 || !target.is_power_of_two() {
        bail!("target must be a power of two of at least two");
    }

    let config = BoardConfig::new(size, TileValue::new(target), seed);
    let mut controller =
        RoundController::new(MergeRound::new(config), ManualScheduler, TICK_INTERVAL);
    let stdout = io::stdout();
    let mut presenter = TextPresenter::new(stdout.lock());

    let mut events = Vec::new();
    controller.start(&mut events);
    presenter.present(&merge_scene(controller.simulation().board(), None))?;

    for input in moves.chars() {
        let direction = parse_direction(input)
            .with_context(|| format!("unsupported move script character '{input}'"))?;
        events.clear();
        controller.steer(0, direction, &mut events);
        let status = outcome_status(controller.outcome(), controller.phase());
        presenter.present(&merge_scene(controller.simulation().board(), status))?;
        if controller.phase() == RoundPhase::Stopped {
            break;
        }
    }
    controller.stop();

    let board = controller.simulation().board();
    println!("final score: {}", board::query::score(board));
    println!("largest tile: {}", board::query::max_value(board).get());
    if let Some(outcome) = controller.outcome() {
        println!("{}", merge_outcome_message(outcome));
    }
    print_session(SessionSnapshot {
        columns: size.columns(),
        rows: size.rows(),
        game: SessionGame::Merge { target },
        seed,
        script: moves.to_owned(),
    });
    Ok(())
}

fn run_snake(size: GridSize, players: u32, length: u32, seed: u64, script: &str) -> Result<()> {
    if size.columns() == 0 || size.rows() == 0 {
        bail!("grid dimensions must be positive");
    }
    if players == 0 {
        bail!("at least one snake is required");
    }
    if length == 0 {
        bail!("snakes must start with at least one body cell");
    }

    let seeds = snake_seeds(size, players, length);
    let round = SnakeRound::new(ArenaConfig::new(size, seed), seeds, 1);
    let mut controller = RoundController::new(round, ManualScheduler, TICK_INTERVAL);
    let stdout = io::stdout();
    let mut presenter = TextPresenter::new(stdout.lock());

    let mut events = Vec::new();
    controller.start(&mut events);
    presenter.present(&snake_scene(controller.simulation().arena(), None))?;

    for input in script.chars() {
        events.clear();
        match input {
            '.' => {}
            'P' | 'p' => controller.pause_toggle(),
            _ => {
                let (player, direction) = parse_snake_input(input)
                    .with_context(|| format!("unsupported tick script character '{input}'"))?;
                controller.steer(player, direction, &mut events);
            }
        }
        controller.tick(&mut events);
        report_arena_events(&events);

        let status = snake_status(&controller);
        presenter.present(&snake_scene(controller.simulation().arena(), status))?;
        if controller.phase() == RoundPhase::Stopped {
            break;
        }
    }
    controller.stop();

    match controller.outcome() {
        Some(Outcome::Won) => {
            if let Some(survivor) = controller.simulation().survivor() {
                println!("snake {} wins", survivor.get());
            }
        }
        Some(Outcome::Draw) => println!("draw: no snake survived"),
        Some(Outcome::Lost) | None => println!("GAME OVER"),
    }
    print_session(SessionSnapshot {
        columns: size.columns(),
        rows: size.rows(),
        game: SessionGame::Snake { players, length },
        seed,
        script: script.to_owned(),
    });
    Ok(())
}

/// Spreads snake heads evenly along the field's middle row, all heading up.
fn snake_seeds(size: GridSize, players: u32, length: u32) -> Vec<SnakeSeed> {
    let mut seeds = Vec::with_capacity(usize::try_from(players).unwrap_or(0));
    for player in 0..players {
        let column = (u64::from(size.columns()) * (u64::from(player) + 1)
            / (u64::from(players) + 1)) as u32;
        let column = column.min(size.columns().saturating_sub(1));
        let head = GridCoord::new(column, size.rows() / 2);
        seeds.push(SnakeSeed {
            head,
            length,
            heading: Direction::Up,
        });
    }
    seeds
}

fn parse_direction(input: char) -> Option<Direction> {
    match input.to_ascii_uppercase() {
        'U' => Some(Direction::Up),
        'D' => Some(Direction::Down),
        'L' => Some(Direction::Left),
        'R' => Some(Direction::Right),
        _ => None,
    }
}

fn parse_snake_input(input: char) -> Option<(usize, Direction)> {
    let player = usize::from(input.is_ascii_lowercase());
    parse_direction(input).map(|direction| (player, direction))
}

fn merge_scene(board: &Board, status: Option<StatusLine>) -> Scene {
    let mut scene = Scene::new(GridPresentation::new(
        board::query::size(board),
        MERGE_CELL_LENGTH,
    ));
    scene.tiles = board::query::tile_view(board)
        .iter()
        .map(|tile| SceneTile {
            cell: tile.cell,
            value: tile.value,
        })
        .collect();
    scene.score = Some(board::query::score(board));
    scene.status = status;
    scene
}

fn snake_scene(arena: &Arena, status: Option<StatusLine>) -> Scene {
    let mut scene = Scene::new(GridPresentation::new(
        arena::query::size(arena),
        SNAKE_CELL_LENGTH,
    ));
    scene.snakes = arena::query::snake_view(arena)
        .iter()
        .map(|snapshot| SceneSnake {
            id: snapshot.id,
            body: snapshot.body.clone(),
            alive: snapshot.alive,
        })
        .collect();
    scene.food = arena::query::food_cells(arena);
    scene.status = status;
    scene
}

fn snake_status(
    controller: &RoundController<SnakeRound, ManualScheduler>,
) -> Option<StatusLine> {
    match controller.phase() {
        RoundPhase::Paused => Some(StatusLine::new("PAUSED")),
        RoundPhase::Stopped => outcome_status(controller.outcome(), RoundPhase::Stopped),
        RoundPhase::NotStarted | RoundPhase::Running => None,
    }
}

fn outcome_status(outcome: Option<Outcome>, phase: RoundPhase) -> Option<StatusLine> {
    if phase != RoundPhase::Stopped {
        return None;
    }
    outcome.map(|outcome| StatusLine::new(merge_outcome_message(outcome)))
}

fn merge_outcome_message(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Won => "You win!",
        Outcome::Lost => "Game over",
        Outcome::Draw => "Draw",
    }
}

fn report_arena_events(events: &[ArenaEvent]) {
    for event in events {
        match event {
            ArenaEvent::SnakeCrashed { snake, cause } => {
                let cause = match cause {
                    CrashCause::Wall => "hit the wall",
                    CrashCause::Body => "ran into a snake",
                    CrashCause::HeadOn => "collided head-on",
                };
                println!("snake {} {cause}", snake.get());
            }
            ArenaEvent::FoodEaten { snake, .. } => {
                println!("snake {} ate the food", snake.get());
            }
            _ => {}
        }
    }
}

fn random_seed() -> u64 {
    ChaCha8Rng::from_entropy().next_u64()
}

fn print_session(session: SessionSnapshot) {
    println!("session: {}", session.encode());
    let _ = io::stdout().flush();
}
