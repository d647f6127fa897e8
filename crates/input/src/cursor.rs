//! Keyboard cursor over the grid, the "finger" for tap-to-select play.

use crate::types::{Direction, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCursor {
    position: Position,
    grid_size: usize,
}

impl GridCursor {
    pub fn new(grid_size: usize) -> Self {
        Self {
            position: 0,
            grid_size,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Step one cell, stopping at the edges.
    pub fn step(&mut self, dir: Direction) {
        let g = self.grid_size;
        if g == 0 {
            return;
        }
        let (row, col) = (self.position / g, self.position % g);
        let (row, col) = match dir {
            Direction::Up => (row.saturating_sub(1), col),
            Direction::Down => ((row + 1).min(g - 1), col),
            Direction::Left => (row, col.saturating_sub(1)),
            Direction::Right => (row, (col + 1).min(g - 1)),
        };
        self.position = row * g + col;
    }

    /// Move to `position` if it is on the grid.
    pub fn jump_to(&mut self, position: Position) {
        if position < self.grid_size * self.grid_size {
            self.position = position;
        }
    }

    /// Back to the top-left cell of a (possibly resized) grid.
    pub fn reset(&mut self, grid_size: usize) {
        self.grid_size = grid_size;
        self.position = 0;
    }
}
