#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Arcade engine.
//!
//! This crate defines the vocabulary that connects adapters, the two
//! authoritative game worlds, and the round controller. Adapters submit
//! command values describing desired mutations, a world executes those
//! commands via its `apply` entry point, and then broadcasts event values
//! that adapters and the round controller inspect deterministically.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Arcade.";

/// Discrete movement directions shared by both game variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Returns the direction that exactly reverses this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Column and row deltas applied when stepping one cell this way.
    #[must_use]
    pub const fn deltas(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    column: u32,
    row: u32,
}

impl GridCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Steps one cell in the provided direction, or `None` when the step
    /// would leave the bounds described by `size`.
    #[must_use]
    pub fn step(self, direction: Direction, size: GridSize) -> Option<Self> {
        let (column_delta, row_delta) = direction.deltas();
        let column = i64::from(self.column).checked_add(column_delta)?;
        let row = i64::from(self.row).checked_add(row_delta)?;
        if column < 0 || row < 0 {
            return None;
        }
        let stepped = Self::new(u32::try_from(column).ok()?, u32::try_from(row).ok()?);
        size.contains(stepped).then_some(stepped)
    }
}

/// Dimensions of a rectangular grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    /// Reports whether the provided coordinate lies within the grid.
    #[must_use]
    pub const fn contains(&self, cell: GridCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }
}

/// Value carried by a puzzle tile, always a power of two of at least two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileValue(u32);

impl TileValue {
    /// Value carried by every freshly spawned tile.
    pub const SPAWN: Self = Self(2);

    /// Creates a new tile value.
    ///
    /// Callers must supply a power of two of at least two; the precondition
    /// is checked in debug builds only.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        debug_assert!(value >= 2 && value.is_power_of_two());
        Self(value)
    }

    /// Retrieves the numeric representation of the value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Value produced when two tiles of this value merge.
    #[must_use]
    pub const fn doubled(self) -> Self {
        Self(self.0 * 2)
    }
}

/// Unique identifier assigned to a snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnakeId(u32);

impl SnakeId {
    /// Creates a new snake identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Bounded buffer holding the active movement direction plus at most one
/// pending change.
///
/// The queue never empties: the entry at the front is always the direction
/// the owning snake is currently travelling. Input that would reverse the
/// most recent entry, or that arrives while a change is already buffered,
/// is rejected so rapid key presses between ticks collapse safely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionQueue {
    slots: [Direction; 2],
    len: usize,
}

impl DirectionQueue {
    /// Creates a queue travelling in the provided initial direction.
    #[must_use]
    pub const fn new(initial: Direction) -> Self {
        Self {
            slots: [initial, initial],
            len: 1,
        }
    }

    /// Direction the owning entity is currently executing.
    #[must_use]
    pub const fn current(&self) -> Direction {
        self.slots[0]
    }

    /// Buffers a direction change for the next tick.
    ///
    /// Rejects the change when it reverses the most recent queue entry or
    /// when a pending change is already buffered.
    pub fn enqueue(&mut self, direction: Direction) -> Result<(), SteerError> {
        let last = self.slots[self.len - 1];
        if direction == last.opposite() {
            return Err(SteerError::ReversesPrevious);
        }
        if self.len == self.slots.len() {
            return Err(SteerError::Saturated);
        }
        self.slots[self.len] = direction;
        self.len += 1;
        Ok(())
    }

    /// Promotes the buffered change, if any. Called once per tick.
    pub fn advance(&mut self) {
        if self.len > 1 {
            self.slots[0] = self.slots[1];
            self.len = 1;
        }
    }

    /// Collapses the queue to the currently executing direction, dropping
    /// any change buffered before a pause.
    pub fn reset_to_current(&mut self) {
        self.len = 1;
    }

    /// Number of entries currently held, always one or two.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// A direction queue is never empty; provided for lint-friendly callers.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Reasons a steering request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteerError {
    /// The direction reverses the most recent queue entry.
    ReversesPrevious,
    /// A pending change is already buffered; excess input is dropped.
    Saturated,
}

/// Reasons a puzzle move request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveError {
    /// The round already reached a terminal outcome.
    RoundOver,
}

/// Terminal outcome of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The round was won.
    Won,
    /// The round was lost.
    Lost,
    /// The round ended without a winner.
    Draw,
}

/// Cause recorded when a snake is eliminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrashCause {
    /// The snake's head left the board bounds.
    Wall,
    /// The snake's head entered a cell registered to a snake body.
    Body,
    /// Two snakes' heads entered the same cell on the same tick.
    HeadOn,
}

/// Commands that express all permissible puzzle-board mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardCommand {
    /// Resets the board to a fresh round with the provided configuration.
    Configure {
        /// Dimensions of the tile grid.
        size: GridSize,
        /// Tile value that wins the round when first produced.
        target: TileValue,
        /// Seed driving deterministic tile placement.
        seed: u64,
    },
    /// Resolves one directional sweep of the board.
    Move {
        /// Direction every tile slides toward.
        direction: Direction,
    },
}

/// Events broadcast by the puzzle board after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardEvent {
    /// A tile slid from one cell to another without merging.
    TileSlid {
        /// Cell the tile occupied before the slide.
        from: GridCoord,
        /// Cell the tile occupies after the slide.
        to: GridCoord,
    },
    /// Two equal tiles combined into one of double value.
    TilesMerged {
        /// Cell vacated by the consumed tile.
        from: GridCoord,
        /// Cell holding the merged tile.
        into: GridCoord,
        /// Value carried by the merged tile.
        value: TileValue,
    },
    /// A fresh tile appeared on a previously free cell.
    TileSpawned {
        /// Cell the tile occupies.
        cell: GridCoord,
        /// Value carried by the spawned tile.
        value: TileValue,
    },
    /// A directional sweep finished resolving.
    MoveResolved {
        /// Direction the sweep moved toward.
        direction: Direction,
        /// Whether any tile slid or merged during the sweep.
        moved: bool,
    },
    /// The accumulated score changed.
    ScoreChanged {
        /// Score after the change.
        score: u32,
    },
    /// The round reached a terminal outcome.
    OutcomeLatched {
        /// Outcome the round latched.
        outcome: Outcome,
    },
    /// A move request was rejected.
    MoveRejected {
        /// Direction supplied in the rejected request.
        direction: Direction,
        /// Specific reason the move was rejected.
        reason: MoveError,
    },
}

/// Commands that express all permissible snake-arena mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaCommand {
    /// Resets the arena to an empty grid with the provided configuration.
    Configure {
        /// Dimensions of the playing field.
        size: GridSize,
        /// Seed driving deterministic food placement.
        seed: u64,
    },
    /// Places a new snake onto the field.
    SpawnSnake {
        /// Cell the snake's head occupies after spawning.
        head: GridCoord,
        /// Requested body length; clipped at the field boundary.
        length: u32,
        /// Direction the snake initially travels.
        heading: Direction,
    },
    /// Places one food item on a uniformly random free cell.
    SpawnFood,
    /// Buffers a direction change for the identified snake.
    Steer {
        /// Snake whose queue receives the change.
        snake: SnakeId,
        /// Requested direction of travel.
        direction: Direction,
    },
    /// Collapses every snake's direction queue to its current entry.
    ResetSteering,
    /// Advances every living snake by one cell.
    Tick,
}

/// Events broadcast by the snake arena after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaEvent {
    /// Confirms that a snake was placed onto the field.
    SnakeSpawned {
        /// Identifier assigned to the snake.
        snake: SnakeId,
        /// Cell occupied by the snake's head.
        head: GridCoord,
    },
    /// A snake's head advanced one cell.
    SnakeAdvanced {
        /// Identifier of the snake that advanced.
        snake: SnakeId,
        /// Cell the head occupied before the tick.
        from: GridCoord,
        /// Cell the head occupies after the tick.
        to: GridCoord,
    },
    /// A snake ate food and kept its tail this tick.
    SnakeGrew {
        /// Identifier of the snake that grew.
        snake: SnakeId,
        /// Body length after growing.
        length: u32,
    },
    /// A snake crashed and was eliminated.
    SnakeCrashed {
        /// Identifier of the eliminated snake.
        snake: SnakeId,
        /// What the snake collided with.
        cause: CrashCause,
    },
    /// A food item appeared on a free cell.
    FoodSpawned {
        /// Cell the food occupies.
        cell: GridCoord,
    },
    /// A snake's head reached a food cell.
    FoodEaten {
        /// Identifier of the snake that ate.
        snake: SnakeId,
        /// Cell the food occupied.
        cell: GridCoord,
    },
    /// A steering request was rejected.
    SteerRejected {
        /// Snake named in the rejected request.
        snake: SnakeId,
        /// Direction supplied in the rejected request.
        direction: Direction,
        /// Specific reason the steering was rejected.
        reason: SteerError,
    },
}
