//! Level editing session: paint and erase tiles on a grid, keep the start
//! and end markers unique, save valid levels to disk.

use std::fmt;
use std::path::Path;

use crate::level::{load_level, save_level, LevelError, TileGrid};
use crate::types::Tile;

#[derive(Debug)]
pub enum EditorError {
    MissingStart,
    MissingEnd,
    Level(LevelError),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::MissingStart => write!(f, "level has no start tile"),
            EditorError::MissingEnd => write!(f, "level has no end tile"),
            EditorError::Level(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EditorError {}

impl From<LevelError> for EditorError {
    fn from(e: LevelError) -> Self {
        EditorError::Level(e)
    }
}

pub struct EditorSession {
    pub name: String,
    grid: TileGrid,
}

impl EditorSession {
    pub fn new(name: &str, rows: usize, cols: usize) -> Self {
        Self {
            name: name.to_string(),
            grid: TileGrid::new(rows, cols),
        }
    }

    pub fn open(path: &Path) -> Result<Self, EditorError> {
        let (name, grid) = load_level(path)?;
        Ok(Self { name, grid })
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Paints a tile, ignoring out-of-bounds coordinates. Start and end
    /// stay unique: painting a second one clears the previous marker back
    /// to empty.
    pub fn paint(&mut self, row: usize, col: usize, tile: Tile) {
        if row >= self.grid.rows || col >= self.grid.cols {
            return;
        }
        if matches!(tile, Tile::Start | Tile::End) {
            for (r, c) in self.grid.positions_of(tile) {
                self.grid.set(r, c, Tile::Empty);
            }
        }
        self.grid.set(row, col, tile);
    }

    pub fn erase(&mut self, row: usize, col: usize) {
        if row < self.grid.rows && col < self.grid.cols {
            self.grid.set(row, col, Tile::Empty);
        }
    }

    /// Wipes the whole grid back to empty.
    pub fn clear(&mut self) {
        let (rows, cols) = (self.grid.rows, self.grid.cols);
        self.grid = TileGrid::new(rows, cols);
    }

    pub fn validate(&self) -> Result<(), EditorError> {
        if self.grid.positions_of(Tile::Start).is_empty() {
            return Err(EditorError::MissingStart);
        }
        if self.grid.positions_of(Tile::End).is_empty() {
            return Err(EditorError::MissingEnd);
        }
        Ok(())
    }

    /// Validates, then writes the level file.
    pub fn save(&self, path: &Path) -> Result<(), EditorError> {
        self.validate()?;
        save_level(path, &self.name, &self.grid)?;
        Ok(())
    }
}
