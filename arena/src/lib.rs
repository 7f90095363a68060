#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative snake-arena state for Grid Arcade.
//!
//! The arena owns every snake's body and direction queue plus the food
//! items on the field. One [`ArenaCommand::Tick`] advances all living
//! snakes against a single pre-tick snapshot of the occupied cells, so two
//! heads entering the same cell on the same tick are both eliminated
//! regardless of iteration order.

use std::collections::{HashSet, VecDeque};

use grid_arcade_core::{
    ArenaCommand, ArenaEvent, CrashCause, Direction, DirectionQueue, GridCoord, GridSize, SnakeId,
};

mod spawning;

use spawning::FoodSpawner;

/// Configuration parameters required to construct an arena.
#[derive(Clone, Copy, Debug)]
pub struct ArenaConfig {
    size: GridSize,
    seed: u64,
}

impl ArenaConfig {
    /// Creates a new configuration from field dimensions and the seed
    /// driving deterministic food placement.
    #[must_use]
    pub const fn new(size: GridSize, seed: u64) -> Self {
        Self { size, seed }
    }
}

#[derive(Clone, Debug)]
struct Snake {
    id: SnakeId,
    /// Body cells ordered tail to head; the back entry is the head.
    body: VecDeque<GridCoord>,
    queue: DirectionQueue,
    alive: bool,
}

impl Snake {
    fn head(&self) -> Option<GridCoord> {
        self.body.back().copied()
    }

    fn length(&self) -> u32 {
        u32::try_from(self.body.len()).unwrap_or(u32::MAX)
    }
}

/// Movement intent captured for one living snake before any snake moves.
#[derive(Clone, Copy, Debug)]
struct StepIntent {
    index: usize,
    snake: SnakeId,
    from: GridCoord,
    destination: Option<GridCoord>,
    food_index: Option<usize>,
}

/// Represents the authoritative snake-arena state.
#[derive(Clone, Debug)]
pub struct Arena {
    size: GridSize,
    snakes: Vec<Snake>,
    foods: Vec<GridCoord>,
    spawner: FoodSpawner,
    next_snake_id: u32,
}

impl Arena {
    /// Creates a new, empty arena ready for snakes and food.
    #[must_use]
    pub fn new(config: ArenaConfig) -> Self {
        Self {
            size: config.size,
            snakes: Vec::new(),
            foods: Vec::new(),
            spawner: FoodSpawner::new(config.seed),
            next_snake_id: 0,
        }
    }

    /// Dimensions of the playing field.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    fn spawn_snake(
        &mut self,
        head: GridCoord,
        length: u32,
        heading: Direction,
        out_events: &mut Vec<ArenaEvent>,
    ) {
        debug_assert!(self.size.contains(head));
        if !self.size.contains(head) {
            return;
        }

        let mut body = VecDeque::new();
        for offset in (0..length.max(1)).rev() {
            if let Some(cell) = trail_cell(head, heading, offset, self.size) {
                body.push_back(cell);
            }
        }

        let id = SnakeId::new(self.next_snake_id);
        self.next_snake_id = self.next_snake_id.saturating_add(1);
        self.snakes.push(Snake {
            id,
            body,
            queue: DirectionQueue::new(heading),
            alive: true,
        });
        out_events.push(ArenaEvent::SnakeSpawned { snake: id, head });
    }

    fn spawn_food(&mut self, out_events: &mut Vec<ArenaEvent>) {
        if let Some(cell) = self.spawner.reposition(self.size, &self.blocked_cells()) {
            self.foods.push(cell);
            out_events.push(ArenaEvent::FoodSpawned { cell });
        }
    }

    fn steer(&mut self, snake: SnakeId, direction: Direction, out_events: &mut Vec<ArenaEvent>) {
        let Some(entry) = self.snakes.iter_mut().find(|entry| entry.id == snake) else {
            return;
        };
        if !entry.alive {
            return;
        }
        if let Err(reason) = entry.queue.enqueue(direction) {
            out_events.push(ArenaEvent::SteerRejected {
                snake,
                direction,
                reason,
            });
        }
    }

    fn reset_steering(&mut self) {
        for snake in &mut self.snakes {
            snake.queue.reset_to_current();
        }
    }

    /// Advances every living snake one step against a pre-tick snapshot.
    ///
    /// Buffered steering is consumed first so an input queued before the
    /// tick takes effect on this step, not the next one.
    fn resolve_tick(&mut self, out_events: &mut Vec<ArenaEvent>) {
        for snake in self.snakes.iter_mut().filter(|snake| snake.alive) {
            snake.queue.advance();
        }
        let intents = self.collect_intents();
        let occupied = self.snapshot_occupied(&intents);
        let mut eaten: Vec<usize> = Vec::new();

        for intent in &intents {
            let Some(destination) = intent.destination else {
                self.eliminate(intent.index, CrashCause::Wall, out_events);
                continue;
            };
            if occupied.contains(&destination) {
                self.eliminate(intent.index, CrashCause::Body, out_events);
                continue;
            }
            if intents
                .iter()
                .any(|other| other.snake != intent.snake && other.destination == Some(destination))
            {
                self.eliminate(intent.index, CrashCause::HeadOn, out_events);
                continue;
            }

            let snake = &mut self.snakes[intent.index];
            snake.body.push_back(destination);
            out_events.push(ArenaEvent::SnakeAdvanced {
                snake: intent.snake,
                from: intent.from,
                to: destination,
            });
            if let Some(food_index) = intent.food_index {
                eaten.push(food_index);
                out_events.push(ArenaEvent::FoodEaten {
                    snake: intent.snake,
                    cell: destination,
                });
                out_events.push(ArenaEvent::SnakeGrew {
                    snake: intent.snake,
                    length: snake.length(),
                });
            } else {
                let _ = snake.body.pop_front();
            }
        }

        // Eaten food is repositioned only after every snake has moved so
        // the occupied set is consistent for the whole tick. Remaining food
        // blocks cells too; an eaten item's stale cell sits under the
        // eater's head and stays in place when no cell is free.
        for food_index in eaten {
            if let Some(cell) = self.spawner.reposition(self.size, &self.blocked_cells()) {
                if let Some(slot) = self.foods.get_mut(food_index) {
                    *slot = cell;
                }
                out_events.push(ArenaEvent::FoodSpawned { cell });
            }
        }
    }

    fn collect_intents(&self) -> Vec<StepIntent> {
        let mut intents = Vec::with_capacity(self.snakes.len());
        for (index, snake) in self.snakes.iter().enumerate() {
            if !snake.alive {
                continue;
            }
            let Some(from) = snake.head() else {
                continue;
            };
            let destination = from.step(snake.queue.current(), self.size);
            let food_index =
                destination.and_then(|cell| self.foods.iter().position(|food| *food == cell));
            intents.push(StepIntent {
                index,
                snake: snake.id,
                from,
                destination,
                food_index,
            });
        }
        intents
    }

    /// Occupied cells as they stand before any snake moves this tick.
    ///
    /// The tail of every snake that will not grow is excluded because that
    /// cell is vacated during the tick. A snake that ends up crashing keeps
    /// its tail in place; entering that cell is still allowed, and the
    /// overlap resolves on the next tick when the corpse leaves the
    /// collision set.
    fn snapshot_occupied(&self, intents: &[StepIntent]) -> HashSet<GridCoord> {
        let mut occupied = HashSet::new();
        for intent in intents {
            let snake = &self.snakes[intent.index];
            let skip_tail = intent.food_index.is_none();
            for (position, cell) in snake.body.iter().enumerate() {
                if skip_tail && position == 0 {
                    continue;
                }
                let _ = occupied.insert(*cell);
            }
        }
        occupied
    }

    fn eliminate(&mut self, index: usize, cause: CrashCause, out_events: &mut Vec<ArenaEvent>) {
        let snake = &mut self.snakes[index];
        snake.alive = false;
        out_events.push(ArenaEvent::SnakeCrashed {
            snake: snake.id,
            cause,
        });
    }

    fn live_body_cells(&self) -> HashSet<GridCoord> {
        let mut occupied = HashSet::new();
        for snake in self.snakes.iter().filter(|snake| snake.alive) {
            for cell in &snake.body {
                let _ = occupied.insert(*cell);
            }
        }
        occupied
    }

    /// Cells food may not land on: living snake bodies plus existing food.
    fn blocked_cells(&self) -> HashSet<GridCoord> {
        let mut occupied = self.live_body_cells();
        for cell in &self.foods {
            let _ = occupied.insert(*cell);
        }
        occupied
    }
}

/// Applies the provided command to the arena, mutating state deterministically.
pub fn apply(arena: &mut Arena, command: ArenaCommand, out_events: &mut Vec<ArenaEvent>) {
    match command {
        ArenaCommand::Configure { size, seed } => {
            *arena = Arena::new(ArenaConfig::new(size, seed));
        }
        ArenaCommand::SpawnSnake {
            head,
            length,
            heading,
        } => arena.spawn_snake(head, length, heading, out_events),
        ArenaCommand::SpawnFood => arena.spawn_food(out_events),
        ArenaCommand::Steer { snake, direction } => arena.steer(snake, direction, out_events),
        ArenaCommand::ResetSteering => arena.reset_steering(),
        ArenaCommand::Tick => arena.resolve_tick(out_events),
    }
}

/// Steps `offset` cells away from the head against the heading, yielding
/// the trailing body cell or `None` when it would leave the field.
fn trail_cell(
    head: GridCoord,
    heading: Direction,
    offset: u32,
    size: GridSize,
) -> Option<GridCoord> {
    let mut cell = head;
    for _ in 0..offset {
        cell = cell.step(heading.opposite(), size)?;
    }
    Some(cell)
}

/// Query functions that provide read-only access to the arena state.
pub mod query {
    use super::Arena;
    use grid_arcade_core::{Direction, GridCoord, GridSize, SnakeId};

    /// Dimensions of the playing field.
    #[must_use]
    pub fn size(arena: &Arena) -> GridSize {
        arena.size
    }

    /// Cells currently holding food.
    #[must_use]
    pub fn food_cells(arena: &Arena) -> Vec<GridCoord> {
        arena.foods.clone()
    }

    /// Number of snakes still alive.
    #[must_use]
    pub fn alive_count(arena: &Arena) -> usize {
        arena.snakes.iter().filter(|snake| snake.alive).count()
    }

    /// Captures a read-only view of every snake on the field.
    #[must_use]
    pub fn snake_view(arena: &Arena) -> SnakeView {
        let mut snapshots: Vec<SnakeSnapshot> = arena
            .snakes
            .iter()
            .map(|snake| SnakeSnapshot {
                id: snake.id,
                body: snake.body.iter().copied().collect(),
                head: snake.body.back().copied(),
                heading: snake.queue.current(),
                alive: snake.alive,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        SnakeView { snapshots }
    }

    /// Read-only snapshot describing all snakes on the field.
    #[derive(Clone, Debug)]
    pub struct SnakeView {
        snapshots: Vec<SnakeSnapshot>,
    }

    impl SnakeView {
        /// Iterator over the captured snake snapshots in identifier order.
        pub fn iter(&self) -> impl Iterator<Item = &SnakeSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<SnakeSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single snake's state used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct SnakeSnapshot {
        /// Unique identifier assigned to the snake.
        pub id: SnakeId,
        /// Body cells ordered tail to head.
        pub body: Vec<GridCoord>,
        /// Cell occupied by the snake's head, if the body is non-empty.
        pub head: Option<GridCoord>,
        /// Direction the snake is currently travelling.
        pub heading: Direction,
        /// Whether the snake is still alive.
        pub alive: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, Arena, ArenaConfig};
    use grid_arcade_core::{ArenaCommand, ArenaEvent, Direction, GridCoord, GridSize};

    fn arena_10x10(seed: u64) -> Arena {
        Arena::new(ArenaConfig::new(GridSize::new(10, 10), seed))
    }

    #[test]
    fn spawned_snake_body_is_clipped_at_the_wall() {
        let mut arena = arena_10x10(1);
        let mut events = Vec::new();
        apply(
            &mut arena,
            ArenaCommand::SpawnSnake {
                head: GridCoord::new(5, 1),
                length: 3,
                heading: Direction::Down,
            },
            &mut events,
        );

        let snapshot = super::query::snake_view(&arena)
            .into_vec()
            .pop()
            .expect("snake spawned");
        // The trail behind the head leaves room for only two of the three
        // requested cells.
        assert_eq!(
            snapshot.body,
            vec![GridCoord::new(5, 0), GridCoord::new(5, 1)]
        );
        assert_eq!(snapshot.head, Some(GridCoord::new(5, 1)));
    }

    #[test]
    fn steering_a_dead_snake_is_ignored() {
        let mut arena = arena_10x10(1);
        let mut events = Vec::new();
        apply(
            &mut arena,
            ArenaCommand::SpawnSnake {
                head: GridCoord::new(0, 0),
                length: 1,
                heading: Direction::Up,
            },
            &mut events,
        );
        apply(&mut arena, ArenaCommand::Tick, &mut events);
        assert_eq!(super::query::alive_count(&arena), 0);

        events.clear();
        let snake = super::query::snake_view(&arena).into_vec()[0].id;
        apply(
            &mut arena,
            ArenaCommand::Steer {
                snake,
                direction: Direction::Right,
            },
            &mut events,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn food_spawn_avoids_snake_bodies() {
        for seed in 0..8 {
            let mut arena = Arena::new(ArenaConfig::new(GridSize::new(2, 2), seed));
            let mut events = Vec::new();
            apply(
                &mut arena,
                ArenaCommand::SpawnSnake {
                    head: GridCoord::new(0, 1),
                    length: 3,
                    heading: Direction::Down,
                },
                &mut events,
            );
            // Body occupies (0,0) and (0,1); sampling must avoid both.
            events.clear();
            apply(&mut arena, ArenaCommand::SpawnFood, &mut events);
            let Some(ArenaEvent::FoodSpawned { cell }) = events.first() else {
                panic!("expected food spawn event");
            };
            assert_eq!(cell.column(), 1);
        }
    }
}
