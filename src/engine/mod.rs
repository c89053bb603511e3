//! The two-player race session: a shared maze, segment-wall collision and
//! a finish zone that both racers can reach.

pub mod level_run;
pub mod movement;

use crate::constants::{CELL_SIZE, RACER_RADIUS, RACE_LIGHT_RADIUS, ZONE_SPAN};
use crate::geometry::{Rect, WallSegment};
use crate::maze::MazeGrid;
use crate::rng::Rng;
use crate::types::{LightSource, MoveIntent, Point, RaceSnapshot, RaceSummary, RacerView, RuntimeEvent};

use self::movement::resolve_move;

#[derive(Clone, Copy, Debug)]
pub struct RaceOptions {
    pub cell_size: f32,
    pub light_radius: f32,
    pub racer_speed: f32,
}

impl Default for RaceOptions {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            light_radius: RACE_LIGHT_RADIUS,
            racer_speed: crate::constants::RACER_SPEED,
        }
    }
}

#[derive(Clone, Debug)]
struct Racer {
    rect: Rect,
    finished: bool,
    finish_time_ms: Option<u64>,
}

impl Racer {
    fn spawn_in_cell(row: usize, col: usize, cell_size: f32) -> Self {
        let side = RACER_RADIUS * 2.0;
        let x = col as f32 * cell_size + (cell_size - side) / 2.0;
        let y = row as f32 * cell_size + (cell_size - side) / 2.0;
        Self {
            rect: Rect::new(x, y, side, side),
            finished: false,
            finish_time_ms: None,
        }
    }

    fn view(&self) -> RacerView {
        let center = self.rect.center();
        RacerView {
            x: center.x,
            y: center.y,
            finished: self.finished,
            finish_time_ms: self.finish_time_ms,
        }
    }
}

pub struct RaceEngine {
    maze: MazeGrid,
    walls: Vec<WallSegment>,
    seed: u32,
    options: RaceOptions,
    racers: [Racer; 2],
    finish: Rect,
    elapsed_ms: u64,
    over: bool,
    events: Vec<RuntimeEvent>,
}

impl RaceEngine {
    /// Builds a race over a freshly generated maze. Racer 0 spawns in the
    /// top-left start zone, racer 1 in the top-right one. Dimensions are
    /// clamped the same way the maze clamps them.
    pub fn new(rows: usize, cols: usize, seed: u32, options: RaceOptions) -> Self {
        let maze = MazeGrid::generate(rows, cols, &mut Rng::new(seed));
        let walls = maze.wall_segments(options.cell_size);
        let (fr, fc) = maze.finish_zone();
        let finish = Rect::new(
            fc as f32 * options.cell_size,
            fr as f32 * options.cell_size,
            ZONE_SPAN as f32 * options.cell_size,
            ZONE_SPAN as f32 * options.cell_size,
        );
        let racers = [
            Racer::spawn_in_cell(0, 0, options.cell_size),
            Racer::spawn_in_cell(0, maze.cols - 1, options.cell_size),
        ];
        Self {
            maze,
            walls,
            seed,
            options,
            racers,
            finish,
            elapsed_ms: 0,
            over: false,
            events: Vec::new(),
        }
    }

    pub fn maze(&self) -> &MazeGrid {
        &self.maze
    }

    pub fn walls(&self) -> &[WallSegment] {
        &self.walls
    }

    pub fn cell_size(&self) -> f32 {
        self.options.cell_size
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn racer_center(&self, idx: usize) -> Point {
        self.racers[idx].rect.center()
    }

    /// Advances the race by `dt_ms`. Finished racers ignore their intent.
    /// Both racers can finish on the same tick; both times are recorded and
    /// the racer with the earlier time (index breaking ties) wins.
    pub fn step(&mut self, dt_ms: u64, intents: [MoveIntent; 2]) {
        if self.over {
            return;
        }
        self.elapsed_ms += dt_ms;
        for (idx, intent) in intents.into_iter().enumerate() {
            let racer = &mut self.racers[idx];
            if racer.finished {
                continue;
            }
            racer.rect = resolve_move(
                racer.rect,
                intent,
                self.options.racer_speed,
                dt_ms,
                &self.walls,
            );
            if self.finish.intersects(&racer.rect) {
                racer.finished = true;
                racer.finish_time_ms = Some(self.elapsed_ms);
                self.events.push(RuntimeEvent::RacerFinished {
                    racer: idx,
                    time_ms: self.elapsed_ms,
                });
            }
        }
        if self.racers.iter().all(|r| r.finished) {
            self.over = true;
        }
    }

    /// Index of the racer with the earliest finish time, if anyone finished.
    pub fn winner(&self) -> Option<usize> {
        self.racers
            .iter()
            .enumerate()
            .filter_map(|(idx, r)| r.finish_time_ms.map(|t| (t, idx)))
            .min()
            .map(|(_, idx)| idx)
    }

    /// One light per racer still on the course.
    pub fn light_sources(&self) -> Vec<LightSource> {
        self.racers
            .iter()
            .filter(|r| !r.finished)
            .map(|r| {
                let center = r.rect.center();
                LightSource {
                    x: center.x,
                    y: center.y,
                    radius: self.options.light_radius,
                }
            })
            .collect()
    }

    pub fn snapshot(&mut self, include_events: bool) -> RaceSnapshot {
        let events = if include_events {
            std::mem::take(&mut self.events)
        } else {
            Vec::new()
        };
        RaceSnapshot {
            elapsed_ms: self.elapsed_ms,
            racers: self.racers.iter().map(Racer::view).collect(),
            over: self.over,
            events,
        }
    }

    pub fn summary(&self) -> RaceSummary {
        RaceSummary {
            seed: self.seed,
            rows: self.maze.rows,
            cols: self.maze.cols,
            winner: self.winner(),
            finish_times_ms: self.racers.iter().map(|r| r.finish_time_ms).collect(),
            elapsed_ms: self.elapsed_ms,
        }
    }
}

/// Shortest cell path to the finish zone, used by the headless driver.
pub fn path_to_finish(maze: &MazeGrid, from: (usize, usize)) -> Vec<(usize, usize)> {
    use std::collections::VecDeque;

    let finish = maze.finish_zone();
    let idx = |r: usize, c: usize| r * maze.cols + c;
    let mut prev: Vec<Option<(usize, usize)>> = vec![None; maze.rows * maze.cols];
    let mut seen = vec![false; maze.rows * maze.cols];
    let mut queue = VecDeque::from([from]);
    seen[idx(from.0, from.1)] = true;
    let mut goal = None;

    while let Some((r, c)) = queue.pop_front() {
        if maze.in_zone(finish, r, c) {
            goal = Some((r, c));
            break;
        }
        let walls = maze.walls(r, c);
        let mut next: Vec<(usize, usize)> = Vec::new();
        if !walls.top && r > 0 {
            next.push((r - 1, c));
        }
        if !walls.bottom && r + 1 < maze.rows {
            next.push((r + 1, c));
        }
        if !walls.left && c > 0 {
            next.push((r, c - 1));
        }
        if !walls.right && c + 1 < maze.cols {
            next.push((r, c + 1));
        }
        for (nr, nc) in next {
            if !seen[idx(nr, nc)] {
                seen[idx(nr, nc)] = true;
                prev[idx(nr, nc)] = Some((r, c));
                queue.push_back((nr, nc));
            }
        }
    }

    let mut path = Vec::new();
    let mut cursor = goal;
    while let Some(cell) = cursor {
        path.push(cell);
        cursor = prev[idx(cell.0, cell.1)];
    }
    path.reverse();
    path
}

/// Intent that steers a racer toward the next cell on its shortest path to
/// the finish, used by the headless driver.
pub fn auto_intent(engine: &RaceEngine, idx: usize) -> MoveIntent {
    let cs = engine.cell_size();
    let pos = engine.racer_center(idx);
    let cell = ((pos.y / cs) as usize, (pos.x / cs) as usize);
    let path = path_to_finish(engine.maze(), cell);
    let target_cell = if path.len() > 1 { path[1] } else { path[0] };
    let target = Point::new(
        target_cell.1 as f32 * cs + cs / 2.0,
        target_cell.0 as f32 * cs + cs / 2.0,
    );
    let dx = target.x - pos.x;
    let dy = target.y - pos.y;
    let axis = |v: f32| {
        if v > 1.0 {
            1
        } else if v < -1.0 {
            -1
        } else {
            0
        }
    };
    MoveIntent::new(axis(dx), axis(dy))
}
