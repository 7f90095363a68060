#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Grid Arcade adapters.
//!
//! Presenters receive an immutable [`Scene`] snapshot between ticks and
//! draw it however the host environment allows; the simulation never
//! learns how frames are produced.

use anyhow::Result as AnyResult;
use glam::Vec2;
use grid_arcade_core::{GridCoord, GridSize, SnakeId, TileValue};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Background color of an empty board cell.
pub const BOARD_BACKGROUND: Color = Color::from_rgb_u8(0xf8, 0xf8, 0xf8);
/// Color drawn for snake body segments.
pub const SNAKE_BODY: Color = Color::from_rgb_u8(0x00, 0x00, 0xff);
/// Color drawn for food items.
pub const FOOD: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);

/// Fill color associated with a tile value, matching the classic palette
/// that brightens toward the high values.
#[must_use]
pub fn tile_color(value: TileValue) -> Color {
    match value.get() {
        2 => Color::from_rgb_u8(0xdd, 0xdd, 0xdd),
        4 => Color::from_rgb_u8(0xdd, 0xcc, 0xaa),
        8 => Color::from_rgb_u8(0xff, 0x99, 0x33),
        16 => Color::from_rgb_u8(0xff, 0x66, 0x00),
        32 => Color::from_rgb_u8(0xff, 0x33, 0x00),
        64 => Color::from_rgb_u8(0xff, 0x00, 0x00),
        128 | 256 => Color::from_rgb_u8(0xff, 0xcc, 0x00),
        512 | 1024 | 2048 => Color::from_rgb_u8(0xff, 0xcc, 0x66),
        _ => Color::from_rgb_u8(0x00, 0x00, 0x00),
    }
}

/// Describes the square cell grid a scene is laid out on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Dimensions of the grid in whole cells.
    pub size: GridSize,
    /// Side length of a single square cell expressed in world units.
    pub cell_length: f32,
}

impl GridPresentation {
    /// Creates a new grid presentation descriptor.
    #[must_use]
    pub const fn new(size: GridSize, cell_length: f32) -> Self {
        Self { size, cell_length }
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.size.columns() as f32 * self.cell_length
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.size.rows() as f32 * self.cell_length
    }

    /// Center of the provided cell expressed in world units.
    #[must_use]
    pub fn cell_center(&self, cell: GridCoord) -> Vec2 {
        Vec2::new(
            (cell.column() as f32 + 0.5) * self.cell_length,
            (cell.row() as f32 + 0.5) * self.cell_length,
        )
    }
}

/// Immutable snapshot describing a merge tile within the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneTile {
    /// Cell the tile occupies.
    pub cell: GridCoord,
    /// Value carried by the tile.
    pub value: TileValue,
}

/// Immutable snapshot describing a snake within the scene.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneSnake {
    /// Identifier assigned to the snake.
    pub id: SnakeId,
    /// Body cells ordered tail to head.
    pub body: Vec<GridCoord>,
    /// Whether the snake is still alive.
    pub alive: bool,
}

/// Status line shown over the playing field, such as the pause or
/// game-over banner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    /// Text displayed to the player.
    pub text: String,
}

impl StatusLine {
    /// Creates a status line from the provided text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Complete frame description handed to presenters between ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Layout of the cell grid being presented.
    pub grid: GridPresentation,
    /// Merge tiles visible this frame.
    pub tiles: Vec<SceneTile>,
    /// Snakes visible this frame.
    pub snakes: Vec<SceneSnake>,
    /// Cells holding food this frame.
    pub food: Vec<GridCoord>,
    /// Score reported to the player, if the variant keeps one.
    pub score: Option<u32>,
    /// Banner text overriding the playing field, if any.
    pub status: Option<StatusLine>,
}

impl Scene {
    /// Creates an empty scene over the provided grid layout.
    #[must_use]
    pub const fn new(grid: GridPresentation) -> Self {
        Self {
            grid,
            tiles: Vec::new(),
            snakes: Vec::new(),
            food: Vec::new(),
            score: None,
            status: None,
        }
    }
}

/// Sink that draws scenes for the player.
pub trait FramePresenter {
    /// Presents a single frame described by the provided scene.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying output device rejects the
    /// frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}
