//! Maze generation via randomized depth-first carving with an explicit
//! stack, plus conversion to wall segments and tile grids.

use crate::constants::{finish_zone_origin, ZONE_SPAN};
use crate::geometry::WallSegment;
use crate::rng::Rng;
use crate::types::Tile;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellWalls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl CellWalls {
    fn closed() -> Self {
        Self {
            top: true,
            right: true,
            bottom: true,
            left: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dir {
    Up,
    Right,
    Down,
    Left,
}

const DIRS: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

#[derive(Clone, Debug)]
pub struct MazeGrid {
    pub rows: usize,
    pub cols: usize,
    cells: Vec<CellWalls>,
}

impl MazeGrid {
    /// Carves a perfect maze over a rows x cols grid, clamping either
    /// dimension up to 1. Grids of at least 4x4 additionally get the start
    /// and finish zones opened up after carving.
    pub fn generate(rows: usize, cols: usize, rng: &mut Rng) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let mut maze = Self {
            rows,
            cols,
            cells: vec![CellWalls::closed(); rows * cols],
        };
        maze.carve(rng);
        if rows >= 2 * ZONE_SPAN && cols >= 2 * ZONE_SPAN {
            maze.open_zones();
        }
        maze
    }

    pub fn walls(&self, row: usize, col: usize) -> CellWalls {
        self.cells[row * self.cols + col]
    }

    fn carve(&mut self, rng: &mut Rng) {
        let mut visited = vec![false; self.rows * self.cols];
        let mut stack = vec![(0usize, 0usize)];
        visited[0] = true;

        while let Some(&(r, c)) = stack.last() {
            let mut dirs = DIRS;
            rng.shuffle(&mut dirs);
            let mut advanced = false;
            for dir in dirs {
                if let Some((nr, nc)) = self.neighbor(r, c, dir) {
                    if !visited[nr * self.cols + nc] {
                        self.open_between(r, c, dir);
                        visited[nr * self.cols + nc] = true;
                        stack.push((nr, nc));
                        advanced = true;
                        break;
                    }
                }
            }
            if !advanced {
                stack.pop();
            }
        }
    }

    fn neighbor(&self, r: usize, c: usize, dir: Dir) -> Option<(usize, usize)> {
        match dir {
            Dir::Up if r > 0 => Some((r - 1, c)),
            Dir::Down if r + 1 < self.rows => Some((r + 1, c)),
            Dir::Left if c > 0 => Some((r, c - 1)),
            Dir::Right if c + 1 < self.cols => Some((r, c + 1)),
            _ => None,
        }
    }

    /// Removes the wall between (r, c) and its neighbor in `dir` on both
    /// cells, keeping the shared-wall flags in sync.
    fn open_between(&mut self, r: usize, c: usize, dir: Dir) {
        let cols = self.cols;
        match dir {
            Dir::Up => {
                self.cells[r * cols + c].top = false;
                self.cells[(r - 1) * cols + c].bottom = false;
            }
            Dir::Down => {
                self.cells[r * cols + c].bottom = false;
                self.cells[(r + 1) * cols + c].top = false;
            }
            Dir::Left => {
                self.cells[r * cols + c].left = false;
                self.cells[r * cols + c - 1].right = false;
            }
            Dir::Right => {
                self.cells[r * cols + c].right = false;
                self.cells[r * cols + c + 1].left = false;
            }
        }
    }

    /// Top-left corner of the first start zone.
    pub fn start_zone_a(&self) -> (usize, usize) {
        (0, 0)
    }

    /// Top-left corner of the second start zone.
    pub fn start_zone_b(&self) -> (usize, usize) {
        (0, self.cols.saturating_sub(ZONE_SPAN))
    }

    /// Top-left corner of the finish zone.
    pub fn finish_zone(&self) -> (usize, usize) {
        finish_zone_origin(self.rows, self.cols)
    }

    /// Clears a zone's internal separating walls and its outward walls
    /// toward in-grid neighbors. The outer maze boundary has no neighbor
    /// and stays closed.
    fn open_zone(&mut self, origin: (usize, usize)) {
        let (r0, c0) = origin;
        for r in r0..r0 + ZONE_SPAN {
            for c in c0..c0 + ZONE_SPAN {
                for dir in DIRS {
                    if self.neighbor(r, c, dir).is_some() {
                        self.open_between(r, c, dir);
                    }
                }
            }
        }
    }

    fn open_zones(&mut self) {
        let zones = [self.start_zone_a(), self.start_zone_b(), self.finish_zone()];
        for zone in zones {
            self.open_zone(zone);
        }
    }

    pub fn in_zone(&self, zone: (usize, usize), r: usize, c: usize) -> bool {
        r >= zone.0 && r < zone.0 + ZONE_SPAN && c >= zone.1 && c < zone.1 + ZONE_SPAN
    }

    /// Converts wall flags to line segments for collision and raycasting.
    /// The outer boundary is four segments; interior walls are emitted once
    /// each, from the right and bottom flags.
    pub fn wall_segments(&self, cell_size: f32) -> Vec<WallSegment> {
        let width = self.cols as f32 * cell_size;
        let height = self.rows as f32 * cell_size;
        let mut segments = vec![
            WallSegment::new(0.0, 0.0, width, 0.0),
            WallSegment::new(width, 0.0, width, height),
            WallSegment::new(width, height, 0.0, height),
            WallSegment::new(0.0, height, 0.0, 0.0),
        ];
        for r in 0..self.rows {
            for c in 0..self.cols {
                let walls = self.walls(r, c);
                let x = c as f32 * cell_size;
                let y = r as f32 * cell_size;
                if walls.right && c + 1 < self.cols {
                    segments.push(WallSegment::new(
                        x + cell_size,
                        y,
                        x + cell_size,
                        y + cell_size,
                    ));
                }
                if walls.bottom && r + 1 < self.rows {
                    segments.push(WallSegment::new(
                        x,
                        y + cell_size,
                        x + cell_size,
                        y + cell_size,
                    ));
                }
            }
        }
        segments
    }

    /// Expands the maze into a (2*rows+1) x (2*cols+1) tile grid, with walls
    /// as their own tiles. Start and finish zone interiors get their marker
    /// tiles.
    pub fn to_tile_grid(&self) -> Vec<Vec<Tile>> {
        let trows = 2 * self.rows + 1;
        let tcols = 2 * self.cols + 1;
        let mut tiles = vec![vec![Tile::Wall; tcols]; trows];
        let start_a = self.start_zone_a();
        let start_b = self.start_zone_b();
        let finish = self.finish_zone();

        for r in 0..self.rows {
            for c in 0..self.cols {
                let tr = 2 * r + 1;
                let tc = 2 * c + 1;
                tiles[tr][tc] = if self.in_zone(start_a, r, c) || self.in_zone(start_b, r, c) {
                    Tile::Start
                } else if self.in_zone(finish, r, c) {
                    Tile::End
                } else {
                    Tile::Empty
                };
                let walls = self.walls(r, c);
                if !walls.right && c + 1 < self.cols {
                    tiles[tr][tc + 1] = Tile::Empty;
                }
                if !walls.bottom && r + 1 < self.rows {
                    tiles[tr + 1][tc] = Tile::Empty;
                }
            }
        }
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn gen(rows: usize, cols: usize, seed: u32) -> MazeGrid {
        MazeGrid::generate(rows, cols, &mut Rng::new(seed))
    }

    fn reachable_count(maze: &MazeGrid) -> usize {
        let mut seen = vec![false; maze.rows * maze.cols];
        let mut queue = VecDeque::from([(0usize, 0usize)]);
        seen[0] = true;
        let mut count = 1;
        while let Some((r, c)) = queue.pop_front() {
            let walls = maze.walls(r, c);
            let mut steps: Vec<(usize, usize)> = Vec::new();
            if !walls.top && r > 0 {
                steps.push((r - 1, c));
            }
            if !walls.bottom && r + 1 < maze.rows {
                steps.push((r + 1, c));
            }
            if !walls.left && c > 0 {
                steps.push((r, c - 1));
            }
            if !walls.right && c + 1 < maze.cols {
                steps.push((r, c + 1));
            }
            for (nr, nc) in steps {
                if !seen[nr * maze.cols + nc] {
                    seen[nr * maze.cols + nc] = true;
                    count += 1;
                    queue.push_back((nr, nc));
                }
            }
        }
        count
    }

    #[test]
    fn every_cell_is_reachable() {
        for seed in 0..200u32 {
            let maze = gen(8, 8, seed);
            assert_eq!(reachable_count(&maze), 64, "seed {seed}");
        }
    }

    #[test]
    fn wall_flags_stay_symmetric() {
        for seed in 0..50u32 {
            let maze = gen(6, 9, seed);
            for r in 0..maze.rows {
                for c in 0..maze.cols {
                    let walls = maze.walls(r, c);
                    if c + 1 < maze.cols {
                        assert_eq!(walls.right, maze.walls(r, c + 1).left, "seed {seed}");
                    }
                    if r + 1 < maze.rows {
                        assert_eq!(walls.bottom, maze.walls(r + 1, c).top, "seed {seed}");
                    }
                }
            }
        }
    }

    #[test]
    fn same_seed_generates_same_maze() {
        let a = gen(10, 10, 42);
        let b = gen(10, 10, 42);
        for r in 0..10 {
            for c in 0..10 {
                assert_eq!(a.walls(r, c), b.walls(r, c));
            }
        }
        assert_eq!(reachable_count(&a), 100);
    }

    #[test]
    fn zones_open_inside_and_outward() {
        let maze = gen(8, 8, 5);
        for zone in [maze.start_zone_a(), maze.start_zone_b(), maze.finish_zone()] {
            let (r0, c0) = zone;
            assert!(!maze.walls(r0, c0).right);
            assert!(!maze.walls(r0, c0).bottom);
            assert!(!maze.walls(r0 + 1, c0 + 1).top);
            assert!(!maze.walls(r0 + 1, c0 + 1).left);
        }
        // outward walls toward in-grid neighbors are cleared too
        let (ar, ac) = maze.start_zone_a();
        assert!(!maze.walls(ar, ac + 1).right);
        assert!(!maze.walls(ar + 1, ac).bottom);
        let (br, bc) = maze.start_zone_b();
        assert!(!maze.walls(br, bc).left);
        let (fr, fc) = maze.finish_zone();
        assert!(!maze.walls(fr, fc).top);
        assert!(!maze.walls(fr, fc).left);
        assert!(!maze.walls(fr, fc + 1).right);
    }

    #[test]
    fn boundary_walls_survive_zone_opening() {
        let maze = gen(8, 8, 11);
        assert!(maze.walls(0, 0).top);
        assert!(maze.walls(0, 0).left);
        assert!(maze.walls(0, maze.cols - 1).right);
        assert!(maze.walls(maze.rows - 1, 0).bottom);
    }

    #[test]
    fn small_maze_skips_zones() {
        // a 3x3 grid has no room for zones and stays a plain perfect maze
        let maze = gen(3, 3, 1);
        assert_eq!(reachable_count(&maze), 9);
    }

    #[test]
    fn tiny_grids_still_generate() {
        for (rows, cols) in [(1, 1), (1, 5), (5, 1), (2, 2)] {
            for seed in 0..20u32 {
                let maze = gen(rows, cols, seed);
                assert_eq!(reachable_count(&maze), rows * cols, "{rows}x{cols} seed {seed}");
            }
        }
        // a 1x1 grid has nothing but the outer boundary
        let maze = gen(1, 1, 0);
        assert_eq!(maze.wall_segments(40.0).len(), 4);
    }

    #[test]
    fn zero_dimensions_clamp_to_one() {
        let maze = gen(0, 0, 0);
        assert_eq!((maze.rows, maze.cols), (1, 1));
    }

    #[test]
    fn zone_corners_stay_in_bounds_on_narrow_grids() {
        for cols in [1usize, 2, 3] {
            let maze = gen(1, cols, 0);
            let (br, bc) = maze.start_zone_b();
            assert_eq!(br, 0);
            assert!(bc < maze.cols, "cols {cols}");
            let (fr, fc) = maze.finish_zone();
            assert!(fr < maze.rows && fc < maze.cols, "cols {cols}");
        }
    }

    #[test]
    fn segment_count_matches_closed_interior_walls() {
        let maze = gen(7, 7, 9);
        let mut closed = 0;
        for r in 0..maze.rows {
            for c in 0..maze.cols {
                let walls = maze.walls(r, c);
                if walls.right && c + 1 < maze.cols {
                    closed += 1;
                }
                if walls.bottom && r + 1 < maze.rows {
                    closed += 1;
                }
            }
        }
        assert_eq!(maze.wall_segments(40.0).len(), closed + 4);
    }

    #[test]
    fn tile_grid_has_expected_shape_and_markers() {
        let maze = gen(8, 8, 3);
        let tiles = maze.to_tile_grid();
        assert_eq!(tiles.len(), 17);
        assert_eq!(tiles[0].len(), 17);
        assert_eq!(tiles[1][1], Tile::Start);
        assert_eq!(tiles[1][15], Tile::Start);
        let (fr, fc) = maze.finish_zone();
        assert_eq!(tiles[2 * fr + 1][2 * fc + 1], Tile::End);
        // boundary is solid wall
        assert!(tiles[0].iter().all(|t| *t == Tile::Wall));
        assert!(tiles[16].iter().all(|t| *t == Tile::Wall));
    }
}
