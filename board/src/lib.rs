#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative puzzle-board state for Grid Arcade.
//!
//! The board owns a rectangular grid of merge tiles and resolves one
//! directional sweep per [`BoardCommand::Move`]: tiles slide toward the
//! requested edge, equal neighbors merge at most once per tile per sweep,
//! and an effective move spawns exactly one fresh tile on a uniformly
//! random free cell.

use grid_arcade_core::{
    BoardCommand, BoardEvent, Direction, GridCoord, GridSize, MoveError, Outcome, TileValue,
};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;
const INITIAL_SPAWN_COUNT: usize = 2;

/// Configuration parameters required to construct a puzzle board.
#[derive(Clone, Copy, Debug)]
pub struct BoardConfig {
    size: GridSize,
    target: TileValue,
    seed: u64,
}

impl BoardConfig {
    /// Creates a new configuration from grid dimensions, the winning tile
    /// value, and the seed driving deterministic tile placement.
    #[must_use]
    pub const fn new(size: GridSize, target: TileValue, seed: u64) -> Self {
        Self { size, target, seed }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Tile {
    value: TileValue,
    merged_this_sweep: bool,
}

impl Tile {
    const fn fresh(value: TileValue) -> Self {
        Self {
            value,
            merged_this_sweep: false,
        }
    }
}

/// Represents the authoritative puzzle-board state.
#[derive(Clone, Debug)]
pub struct Board {
    size: GridSize,
    cells: Vec<Option<Tile>>,
    free_count: u32,
    target: TileValue,
    score: u32,
    max_value: TileValue,
    outcome: Option<Outcome>,
    rng_state: u64,
}

impl Board {
    /// Creates a new board ready for play, holding two spawned tiles.
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        let mut board = Self::empty(config);
        for _ in 0..INITIAL_SPAWN_COUNT {
            let _ = board.spawn_tile();
        }
        board.assert_free_count();
        board
    }

    fn empty(config: BoardConfig) -> Self {
        let capacity = usize::try_from(config.size.cell_count()).unwrap_or(0);
        let free_count = u32::try_from(capacity).unwrap_or(u32::MAX);
        Self {
            size: config.size,
            cells: vec![None; capacity],
            free_count,
            target: config.target,
            score: 0,
            max_value: TileValue::SPAWN,
            outcome: None,
            rng_state: config.seed,
        }
    }

    /// Dimensions of the tile grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Retrieves the tile value stored at the provided cell, if any.
    ///
    /// The coordinate must lie within the grid; the precondition is checked
    /// in debug builds only.
    #[must_use]
    pub fn get(&self, cell: GridCoord) -> Option<TileValue> {
        debug_assert!(self.size.contains(cell));
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
            .map(|tile| tile.value)
    }

    /// Stores or clears a tile value at the provided cell, keeping the
    /// free-cell count consistent.
    ///
    /// The coordinate must lie within the grid; the precondition is checked
    /// in debug builds only.
    pub fn set(&mut self, cell: GridCoord, value: Option<TileValue>) {
        debug_assert!(self.size.contains(cell));
        self.write(cell, value.map(Tile::fresh));
    }

    /// Reports whether every cell holds a tile.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.free_count == 0
    }

    fn write(&mut self, cell: GridCoord, tile: Option<Tile>) {
        let Some(index) = self.index(cell) else {
            return;
        };
        let Some(slot) = self.cells.get_mut(index) else {
            return;
        };
        match (slot.is_some(), tile.is_some()) {
            (true, false) => self.free_count += 1,
            (false, true) => self.free_count -= 1,
            _ => {}
        }
        *slot = tile;
    }

    fn tile_at(&self, cell: GridCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        if !self.size.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.size.columns()).ok()?;
        Some(row * width + column)
    }

    fn spawn_tile(&mut self) -> Option<GridCoord> {
        if self.free_count == 0 {
            return None;
        }

        let pick = self.advance_rng() % u64::from(self.free_count);
        let mut remaining = pick;
        for row in 0..self.size.rows() {
            for column in 0..self.size.columns() {
                let cell = GridCoord::new(column, row);
                if self.tile_at(cell).is_some() {
                    continue;
                }
                if remaining == 0 {
                    self.write(cell, Some(Tile::fresh(TileValue::SPAWN)));
                    return Some(cell);
                }
                remaining -= 1;
            }
        }
        None
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }

    fn clear_merge_flags(&mut self) {
        for slot in &mut self.cells {
            if let Some(tile) = slot {
                tile.merged_this_sweep = false;
            }
        }
    }

    /// Walks one source tile toward the requested edge, sliding through
    /// empty cells and merging at most once before coming to rest.
    fn slide_tile(
        &mut self,
        origin: GridCoord,
        direction: Direction,
        out_events: &mut Vec<BoardEvent>,
    ) -> bool {
        let Some(tile) = self.tile_at(origin) else {
            return false;
        };

        let mut resting = origin;
        loop {
            let Some(next) = resting.step(direction, self.size) else {
                break;
            };
            match self.tile_at(next) {
                None => resting = next,
                Some(neighbor) => {
                    if neighbor.value == tile.value
                        && !neighbor.merged_this_sweep
                        && !tile.merged_this_sweep
                    {
                        let merged = tile.value.doubled();
                        self.write(
                            next,
                            Some(Tile {
                                value: merged,
                                merged_this_sweep: true,
                            }),
                        );
                        self.write(origin, None);
                        self.score = self.score.saturating_add(merged.get());
                        if merged > self.max_value {
                            self.max_value = merged;
                        }
                        out_events.push(BoardEvent::TilesMerged {
                            from: origin,
                            into: next,
                            value: merged,
                        });
                        return true;
                    }
                    break;
                }
            }
        }

        if resting == origin {
            return false;
        }
        self.write(resting, Some(tile));
        self.write(origin, None);
        out_events.push(BoardEvent::TileSlid {
            from: origin,
            to: resting,
        });
        true
    }

    fn resolve_move(&mut self, direction: Direction, out_events: &mut Vec<BoardEvent>) {
        if self.outcome.is_some() {
            out_events.push(BoardEvent::MoveRejected {
                direction,
                reason: MoveError::RoundOver,
            });
            return;
        }

        self.clear_merge_flags();
        let score_before = self.score;
        let mut moved = false;
        for source in sweep_sources(direction, self.size) {
            if self.slide_tile(source, direction, out_events) {
                moved = true;
            }
        }

        if moved {
            if let Some(cell) = self.spawn_tile() {
                out_events.push(BoardEvent::TileSpawned {
                    cell,
                    value: TileValue::SPAWN,
                });
            }
            if self.score != score_before {
                out_events.push(BoardEvent::ScoreChanged { score: self.score });
            }
            if self.max_value == self.target {
                self.latch_outcome(Outcome::Won, out_events);
            }
        }

        if self.outcome.is_none() && self.free_count == 0 && !self.any_merge_possible() {
            self.latch_outcome(Outcome::Lost, out_events);
        }

        out_events.push(BoardEvent::MoveResolved { direction, moved });
        self.assert_free_count();
    }

    fn latch_outcome(&mut self, outcome: Outcome, out_events: &mut Vec<BoardEvent>) {
        self.outcome = Some(outcome);
        out_events.push(BoardEvent::OutcomeLatched { outcome });
    }

    /// Reports whether any directional sweep could still change the board.
    /// With no free cell left, only an adjacent equal pair can move.
    fn any_merge_possible(&self) -> bool {
        for row in 0..self.size.rows() {
            for column in 0..self.size.columns() {
                let cell = GridCoord::new(column, row);
                let Some(tile) = self.tile_at(cell) else {
                    return true;
                };
                for direction in [Direction::Right, Direction::Down] {
                    if let Some(neighbor) = cell.step(direction, self.size) {
                        if let Some(other) = self.tile_at(neighbor) {
                            if other.value == tile.value {
                                return true;
                            }
                        }
                    }
                }
            }
        }
        false
    }

    fn assert_free_count(&self) {
        debug_assert_eq!(
            self.free_count as usize,
            self.cells.iter().filter(|slot| slot.is_none()).count(),
        );
    }
}

/// Applies the provided command to the board, mutating state deterministically.
pub fn apply(board: &mut Board, command: BoardCommand, out_events: &mut Vec<BoardEvent>) {
    match command {
        BoardCommand::Configure { size, target, seed } => {
            *board = Board::empty(BoardConfig::new(size, target, seed));
            for _ in 0..INITIAL_SPAWN_COUNT {
                if let Some(cell) = board.spawn_tile() {
                    out_events.push(BoardEvent::TileSpawned {
                        cell,
                        value: TileValue::SPAWN,
                    });
                }
            }
            board.assert_free_count();
        }
        BoardCommand::Move { direction } => board.resolve_move(direction, out_events),
    }
}

/// Enumerates sweep sources from the target edge outward so tiles near the
/// wall resolve before the tiles behind them.
fn sweep_sources(direction: Direction, size: GridSize) -> Vec<GridCoord> {
    let columns = size.columns();
    let rows = size.rows();
    let mut sources = Vec::with_capacity(usize::try_from(size.cell_count()).unwrap_or(0));

    match direction {
        Direction::Left => {
            for column in 1..columns {
                for row in 0..rows {
                    sources.push(GridCoord::new(column, row));
                }
            }
        }
        Direction::Right => {
            for column in (0..columns.saturating_sub(1)).rev() {
                for row in 0..rows {
                    sources.push(GridCoord::new(column, row));
                }
            }
        }
        Direction::Up => {
            for row in 1..rows {
                for column in 0..columns {
                    sources.push(GridCoord::new(column, row));
                }
            }
        }
        Direction::Down => {
            for row in (0..rows.saturating_sub(1)).rev() {
                for column in 0..columns {
                    sources.push(GridCoord::new(column, row));
                }
            }
        }
    }

    sources
}

/// Query functions that provide read-only access to the board state.
pub mod query {
    use super::Board;
    use grid_arcade_core::{GridCoord, GridSize, Outcome, TileValue};

    /// Dimensions of the board's tile grid.
    #[must_use]
    pub fn size(board: &Board) -> GridSize {
        board.size
    }

    /// Accumulated score, the sum of all merged tile values.
    #[must_use]
    pub fn score(board: &Board) -> u32 {
        board.score
    }

    /// Largest tile value produced so far.
    #[must_use]
    pub fn max_value(board: &Board) -> TileValue {
        board.max_value
    }

    /// Terminal outcome latched by the board, if any.
    #[must_use]
    pub fn outcome(board: &Board) -> Option<Outcome> {
        board.outcome
    }

    /// Number of cells currently holding no tile.
    #[must_use]
    pub fn free_cells(board: &Board) -> u32 {
        board.free_count
    }

    /// Captures a read-only view of every tile on the board.
    #[must_use]
    pub fn tile_view(board: &Board) -> TileView {
        let mut snapshots = Vec::new();
        for row in 0..board.size.rows() {
            for column in 0..board.size.columns() {
                let cell = GridCoord::new(column, row);
                if let Some(value) = board.get(cell) {
                    snapshots.push(TileSnapshot { cell, value });
                }
            }
        }
        TileView { snapshots }
    }

    /// Read-only snapshot describing all tiles on the board.
    #[derive(Clone, Debug)]
    pub struct TileView {
        snapshots: Vec<TileSnapshot>,
    }

    impl TileView {
        /// Iterator over the captured tile snapshots in row-major order.
        pub fn iter(&self) -> impl Iterator<Item = &TileSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<TileSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single tile used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TileSnapshot {
        /// Cell the tile occupies.
        pub cell: GridCoord,
        /// Value carried by the tile.
        pub value: TileValue,
    }
}
