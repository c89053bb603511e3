//! Tile-based levels: the in-memory grid, JSON level files on disk and the
//! level listing used by the campaign.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DARK_LEVEL_THRESHOLD, TILE_SIZE};
use crate::geometry::{Obstacles, Rect};
use crate::types::Tile;

#[derive(Debug)]
pub enum LevelError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Shape { expected: (usize, usize), found: (usize, usize) },
    UnknownTile { code: u8, row: usize, col: usize },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io(e) => write!(f, "level io error: {e}"),
            LevelError::Json(e) => write!(f, "level json error: {e}"),
            LevelError::Shape { expected, found } => write!(
                f,
                "level grid shape mismatch: declared {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            LevelError::UnknownTile { code, row, col } => {
                write!(f, "unknown tile code {code} at row {row}, col {col}")
            }
        }
    }
}

impl std::error::Error for LevelError {}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::Io(e)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Json(e)
    }
}

/// On-disk level format.
#[derive(Debug, Serialize, Deserialize)]
pub struct LevelFile {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub grid: Vec<Vec<u8>>,
}

/// A rectangular grid of tiles with a fixed tile size in pixels.
#[derive(Clone, Debug)]
pub struct TileGrid {
    pub rows: usize,
    pub cols: usize,
    pub tile_size: f32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            tile_size: TILE_SIZE,
            tiles: vec![Tile::Empty; rows * cols],
        }
    }

    pub fn from_tiles(rows: Vec<Vec<Tile>>) -> Self {
        let r = rows.len();
        let c = rows.first().map_or(0, |row| row.len());
        let mut grid = Self::new(r, c);
        for (ri, row) in rows.into_iter().enumerate() {
            for (ci, tile) in row.into_iter().enumerate() {
                grid.set(ri, ci, tile);
            }
        }
        grid
    }

    pub fn from_file(file: &LevelFile) -> Result<Self, LevelError> {
        let found_rows = file.grid.len();
        let found_cols = file.grid.first().map_or(0, |row| row.len());
        if found_rows != file.rows
            || file.grid.iter().any(|row| row.len() != file.cols)
        {
            return Err(LevelError::Shape {
                expected: (file.rows, file.cols),
                found: (found_rows, found_cols),
            });
        }
        let mut grid = Self::new(file.rows, file.cols);
        for (r, row) in file.grid.iter().enumerate() {
            for (c, &code) in row.iter().enumerate() {
                let tile = Tile::from_code(code)
                    .ok_or(LevelError::UnknownTile { code, row: r, col: c })?;
                grid.set(r, c, tile);
            }
        }
        Ok(grid)
    }

    pub fn to_file(&self, name: &str) -> LevelFile {
        let grid = (0..self.rows)
            .map(|r| (0..self.cols).map(|c| self.tile(r, c).code()).collect())
            .collect();
        LevelFile {
            name: name.to_string(),
            rows: self.rows,
            cols: self.cols,
            grid,
        }
    }

    pub fn tile(&self, row: usize, col: usize) -> Tile {
        self.tiles[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, tile: Tile) {
        self.tiles[row * self.cols + col] = tile;
    }

    pub fn width_px(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    pub fn height_px(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    pub fn tile_rect(&self, row: usize, col: usize) -> Rect {
        Rect::new(
            col as f32 * self.tile_size,
            row as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    pub fn positions_of(&self, wanted: Tile) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.tile(r, c) == wanted {
                    out.push((r, c));
                }
            }
        }
        out
    }

    pub fn start_position(&self) -> Option<(usize, usize)> {
        self.positions_of(Tile::Start).into_iter().next()
    }
}

impl Obstacles for TileGrid {
    /// Solid tiles block, and so does anything outside the grid.
    fn blocks(&self, rect: &Rect) -> bool {
        if rect.x < 0.0
            || rect.y < 0.0
            || rect.x + rect.w > self.width_px()
            || rect.y + rect.h > self.height_px()
        {
            return true;
        }
        let c0 = (rect.x / self.tile_size).floor() as usize;
        let r0 = (rect.y / self.tile_size).floor() as usize;
        let c1 = (((rect.x + rect.w) / self.tile_size).ceil() as usize).min(self.cols);
        let r1 = (((rect.y + rect.h) / self.tile_size).ceil() as usize).min(self.rows);
        for r in r0..r1 {
            for c in c0..c1 {
                if self.tile(r, c).is_solid() && self.tile_rect(r, c).intersects(rect) {
                    return true;
                }
            }
        }
        false
    }
}

pub fn load_level(path: &Path) -> Result<(String, TileGrid), LevelError> {
    let text = fs::read_to_string(path)?;
    let file: LevelFile = serde_json::from_str(&text)?;
    let grid = TileGrid::from_file(&file)?;
    Ok((file.name, grid))
}

pub fn save_level(path: &Path, name: &str, grid: &TileGrid) -> Result<(), LevelError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = grid.to_file(name);
    fs::write(path, serde_json::to_string_pretty(&file)?)?;
    Ok(())
}

/// All .json level files in a directory, in natural order so that
/// "level2" sorts before "level10".
pub fn list_levels(dir: &Path) -> Result<Vec<PathBuf>, LevelError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort_by(|a, b| {
        let ka = natural_key(a.file_stem().and_then(|s| s.to_str()).unwrap_or(""));
        let kb = natural_key(b.file_stem().and_then(|s| s.to_str()).unwrap_or(""));
        ka.cmp(&kb)
    });
    Ok(paths)
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug)]
enum NaturalChunk {
    Number(u64),
    Text(String),
}

fn natural_key(name: &str) -> Vec<NaturalChunk> {
    let mut chunks = Vec::new();
    let mut digits = String::new();
    let mut text = String::new();
    for ch in name.chars() {
        if ch.is_ascii_digit() {
            if !text.is_empty() {
                chunks.push(NaturalChunk::Text(std::mem::take(&mut text)));
            }
            digits.push(ch);
        } else {
            if !digits.is_empty() {
                chunks.push(NaturalChunk::Number(
                    std::mem::take(&mut digits).parse().unwrap_or(u64::MAX),
                ));
            }
            text.push(ch);
        }
    }
    if !digits.is_empty() {
        chunks.push(NaturalChunk::Number(digits.parse().unwrap_or(u64::MAX)));
    }
    if !text.is_empty() {
        chunks.push(NaturalChunk::Text(text));
    }
    chunks
}

/// Levels whose name embeds a number past the threshold are played in the
/// dark with the visibility polygon active. Names without a number are
/// bright.
pub fn is_dark_level(name: &str) -> bool {
    match natural_key(name)
        .into_iter()
        .find_map(|chunk| match chunk {
            NaturalChunk::Number(n) => Some(n),
            NaturalChunk::Text(_) => None,
        }) {
        Some(n) => n > DARK_LEVEL_THRESHOLD as u64,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_dir(tag: &str) -> PathBuf {
        env::temp_dir().join(format!("dark_maze_{}_{}", tag, rand::random::<u32>()))
    }

    fn sample_grid() -> TileGrid {
        let mut grid = TileGrid::new(3, 4);
        grid.set(0, 0, Tile::Start);
        grid.set(1, 1, Tile::Wall);
        grid.set(2, 3, Tile::End);
        grid.set(1, 2, Tile::Flashlight);
        grid
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = temp_dir("roundtrip");
        let path = dir.join("level1.json");
        save_level(&path, "first", &sample_grid()).unwrap();
        let (name, loaded) = load_level(&path).unwrap();
        assert_eq!(name, "first");
        assert_eq!(loaded.rows, 3);
        assert_eq!(loaded.cols, 4);
        assert_eq!(loaded.tile(1, 1), Tile::Wall);
        assert_eq!(loaded.tile(1, 2), Tile::Flashlight);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn rejects_unknown_tile_code() {
        let file = LevelFile {
            name: "bad".into(),
            rows: 1,
            cols: 2,
            grid: vec![vec![0, 9]],
        };
        match TileGrid::from_file(&file) {
            Err(LevelError::UnknownTile { code: 9, row: 0, col: 1 }) => {}
            other => panic!("expected UnknownTile, got {other:?}"),
        }
    }

    #[test]
    fn rejects_shape_mismatch() {
        let file = LevelFile {
            name: "bad".into(),
            rows: 2,
            cols: 2,
            grid: vec![vec![0, 0]],
        };
        assert!(matches!(
            TileGrid::from_file(&file),
            Err(LevelError::Shape { .. })
        ));
    }

    #[test]
    fn natural_order_listing() {
        let dir = temp_dir("listing");
        fs::create_dir_all(&dir).unwrap();
        for name in ["level10", "level2", "level1"] {
            save_level(&dir.join(format!("{name}.json")), name, &sample_grid()).unwrap();
        }
        fs::write(dir.join("notes.txt"), "ignored").unwrap();
        let listed = list_levels(&dir).unwrap();
        let stems: Vec<_> = listed
            .iter()
            .map(|p| p.file_stem().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(stems, ["level1", "level2", "level10"]);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn grid_blocks_solid_tiles_and_outside() {
        let grid = sample_grid();
        // tile (1,1) spans 50..100 in both axes
        assert!(grid.blocks(&Rect::new(60.0, 60.0, 10.0, 10.0)));
        assert!(!grid.blocks(&Rect::new(10.0, 110.0, 10.0, 10.0)));
        assert!(grid.blocks(&Rect::new(-5.0, 10.0, 10.0, 10.0)));
        assert!(grid.blocks(&Rect::new(195.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn dark_levels_start_past_threshold() {
        assert!(!is_dark_level("level1"));
        assert!(!is_dark_level("level5"));
        assert!(is_dark_level("level6"));
        assert!(is_dark_level("maze_12"));
        assert!(!is_dark_level("tutorial"));
    }
}
