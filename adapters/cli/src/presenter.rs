//! Text presenter that draws scenes onto any writer.

use std::io::Write;

use anyhow::{Context, Result};
use grid_arcade_rendering::{FramePresenter, Scene};

const EMPTY_CELL: char = '.';
const FOOD_CELL: char = '*';
const BODY_CELL: char = 'o';
const HEAD_CELL: char = '@';
const DEAD_CELL: char = 'x';

/// Presents frames as plain text, one grid row per line.
#[derive(Debug)]
pub(crate) struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    fn present_tiles(&mut self, scene: &Scene) -> Result<()> {
        let size = scene.grid.size;
        for row in 0..size.rows() {
            for column in 0..size.columns() {
                let value = scene
                    .tiles
                    .iter()
                    .find(|tile| tile.cell.column() == column && tile.cell.row() == row)
                    .map(|tile| tile.value.get());
                match value {
                    Some(value) => write!(self.out, "{value:>5}"),
                    None => write!(self.out, "{:>5}", EMPTY_CELL),
                }
                .context("write tile cell")?;
            }
            writeln!(self.out).context("write tile row")?;
        }
        Ok(())
    }

    fn present_field(&mut self, scene: &Scene) -> Result<()> {
        let size = scene.grid.size;
        let columns = usize::try_from(size.columns()).unwrap_or(0);
        let rows = usize::try_from(size.rows()).unwrap_or(0);
        let mut field = vec![vec![EMPTY_CELL; columns]; rows];

        for cell in &scene.food {
            if let Some(slot) = field
                .get_mut(cell.row() as usize)
                .and_then(|row| row.get_mut(cell.column() as usize))
            {
                *slot = FOOD_CELL;
            }
        }

        for snake in &scene.snakes {
            let head_index = snake.body.len().saturating_sub(1);
            for (position, cell) in snake.body.iter().enumerate() {
                let glyph = if !snake.alive {
                    DEAD_CELL
                } else if position == head_index {
                    HEAD_CELL
                } else {
                    BODY_CELL
                };
                if let Some(slot) = field
                    .get_mut(cell.row() as usize)
                    .and_then(|row| row.get_mut(cell.column() as usize))
                {
                    *slot = glyph;
                }
            }
        }

        for row in field {
            let line: String = row.into_iter().collect();
            writeln!(self.out, "{line}").context("write field row")?;
        }
        Ok(())
    }
}

impl<W: Write> FramePresenter for TextPresenter<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        if let Some(status) = &scene.status {
            writeln!(self.out, "== {} ==", status.text).context("write status")?;
        }
        if scene.snakes.is_empty() {
            self.present_tiles(scene)?;
        } else {
            self.present_field(scene)?;
        }
        if let Some(score) = scene.score {
            writeln!(self.out, "score: {score}").context("write score")?;
        }
        writeln!(self.out).context("write frame separator")?;
        Ok(())
    }
}
