//! A single-player run through one tile level: movement, flashlight
//! pickups, the end tile and the dark-level visibility pass.

use crate::constants::{
    light_radius_for, DEFAULT_NUM_RAYS, FLASHLIGHT_PICKUP_SIZE, PLAYER_SIZE, PLAYER_SPEED,
};
use crate::geometry::Rect;
use crate::level::{is_dark_level, TileGrid};
use crate::lighting::{visibility_polygon, VisibilityPolygon};
use crate::types::{LightSource, MoveIntent, Point, RunSnapshot, RunSummary, RuntimeEvent, Tile};

use super::movement::resolve_move;

pub struct LevelRun {
    name: String,
    grid: TileGrid,
    dark: bool,
    player: Rect,
    flashlights_collected: u32,
    elapsed_ms: u64,
    completed: bool,
    events: Vec<RuntimeEvent>,
}

impl LevelRun {
    /// Starts a run with the player centered on the start tile, or on the
    /// grid center when the level has no start tile. Dark play depends on
    /// the level name, not on the grid contents.
    pub fn new(name: &str, grid: TileGrid) -> Self {
        let start = match grid.start_position() {
            Some((sr, sc)) => grid.tile_rect(sr, sc).center(),
            None => Point::new(grid.width_px() / 2.0, grid.height_px() / 2.0),
        };
        let player = Rect::new(
            start.x - PLAYER_SIZE / 2.0,
            start.y - PLAYER_SIZE / 2.0,
            PLAYER_SIZE,
            PLAYER_SIZE,
        );
        Self {
            name: name.to_string(),
            grid,
            dark: is_dark_level(name),
            player,
            flashlights_collected: 0,
            elapsed_ms: 0,
            completed: false,
            events: Vec::new(),
        }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn player_center(&self) -> Point {
        self.player.center()
    }

    pub fn light_radius(&self) -> f32 {
        light_radius_for(self.flashlights_collected)
    }

    pub fn step(&mut self, dt_ms: u64, intent: MoveIntent) {
        if self.completed {
            return;
        }
        self.elapsed_ms += dt_ms;
        self.player = resolve_move(self.player, intent, PLAYER_SPEED, dt_ms, &self.grid);
        self.collect_flashlights();
        self.check_end();
    }

    fn collect_flashlights(&mut self) {
        let positions = self.grid.positions_of(Tile::Flashlight);
        for (r, c) in positions {
            let tile = self.grid.tile_rect(r, c);
            let inset = (tile.w - FLASHLIGHT_PICKUP_SIZE) / 2.0;
            let pickup = Rect::new(
                tile.x + inset,
                tile.y + inset,
                FLASHLIGHT_PICKUP_SIZE,
                FLASHLIGHT_PICKUP_SIZE,
            );
            if self.player.intersects(&pickup) {
                self.grid.set(r, c, Tile::Empty);
                self.flashlights_collected += 1;
                self.events.push(RuntimeEvent::FlashlightCollected {
                    row: r,
                    col: c,
                    total_collected: self.flashlights_collected,
                });
            }
        }
    }

    fn check_end(&mut self) {
        for (r, c) in self.grid.positions_of(Tile::End) {
            if self.player.intersects(&self.grid.tile_rect(r, c)) {
                self.completed = true;
                self.events.push(RuntimeEvent::LevelCompleted {
                    time_ms: self.elapsed_ms,
                });
                return;
            }
        }
    }

    /// The lit polygon around the player, or None on bright levels where
    /// everything is visible anyway.
    pub fn visibility(&self, num_rays: usize) -> Option<VisibilityPolygon> {
        if !self.dark {
            return None;
        }
        let center = self.player_center();
        let source = LightSource {
            x: center.x,
            y: center.y,
            radius: self.light_radius(),
        };
        Some(visibility_polygon(source, &self.grid, num_rays))
    }

    pub fn default_visibility(&self) -> Option<VisibilityPolygon> {
        self.visibility(DEFAULT_NUM_RAYS)
    }

    /// Top-left of a view window centered on the player, clamped to the
    /// level bounds.
    pub fn camera(&self, view_w: f32, view_h: f32) -> (f32, f32) {
        let center = self.player_center();
        let max_x = (self.grid.width_px() - view_w).max(0.0);
        let max_y = (self.grid.height_px() - view_h).max(0.0);
        let x = (center.x - view_w / 2.0).clamp(0.0, max_x);
        let y = (center.y - view_h / 2.0).clamp(0.0, max_y);
        (x, y)
    }

    pub fn snapshot(&mut self, include_events: bool) -> RunSnapshot {
        let events = if include_events {
            std::mem::take(&mut self.events)
        } else {
            Vec::new()
        };
        let center = self.player_center();
        RunSnapshot {
            elapsed_ms: self.elapsed_ms,
            x: center.x,
            y: center.y,
            flashlights_collected: self.flashlights_collected,
            light_radius: self.light_radius(),
            completed: self.completed,
            events,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            level_name: self.name.clone(),
            completed: self.completed,
            time_ms: self.elapsed_ms,
            flashlights_collected: self.flashlights_collected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BASE_LIGHT_RADIUS, FLASHLIGHT_LIGHT_BONUS, TICK_MS};

    // a 1x5 corridor: start, flashlight, empty, empty, end
    fn corridor() -> TileGrid {
        let mut grid = TileGrid::new(1, 5);
        grid.set(0, 0, Tile::Start);
        grid.set(0, 1, Tile::Flashlight);
        grid.set(0, 4, Tile::End);
        grid
    }

    fn run_until_done(run: &mut LevelRun, max_ticks: usize) {
        for _ in 0..max_ticks {
            if run.is_completed() {
                return;
            }
            run.step(TICK_MS, MoveIntent::new(1, 0));
        }
    }

    #[test]
    fn missing_start_falls_back_to_grid_center() {
        let grid = TileGrid::new(2, 2);
        let run = LevelRun::new("blank", grid);
        let center = run.player_center();
        assert_eq!((center.x, center.y), (50.0, 50.0));
    }

    #[test]
    fn player_spawns_on_start_tile() {
        let run = LevelRun::new("level1", corridor());
        let center = run.player_center();
        assert_eq!((center.x, center.y), (25.0, 25.0));
    }

    #[test]
    fn walking_the_corridor_collects_and_completes() {
        let mut run = LevelRun::new("level1", corridor());
        run_until_done(&mut run, 200);
        assert!(run.is_completed());
        let snap = run.snapshot(true);
        assert_eq!(snap.flashlights_collected, 1);
        assert!(snap
            .events
            .iter()
            .any(|e| matches!(e, RuntimeEvent::FlashlightCollected { total_collected: 1, .. })));
        assert!(snap
            .events
            .iter()
            .any(|e| matches!(e, RuntimeEvent::LevelCompleted { .. })));
        // collected flashlight leaves the grid
        assert_eq!(run.grid().tile(0, 1), Tile::Empty);
    }

    #[test]
    fn flashlight_extends_light_radius() {
        let mut run = LevelRun::new("level7", corridor());
        assert_eq!(run.light_radius(), BASE_LIGHT_RADIUS);
        run_until_done(&mut run, 200);
        assert_eq!(
            run.light_radius(),
            BASE_LIGHT_RADIUS + FLASHLIGHT_LIGHT_BONUS
        );
    }

    #[test]
    fn visibility_only_on_dark_levels() {
        let bright = LevelRun::new("level5", corridor());
        let dark = LevelRun::new("level6", corridor());
        assert!(bright.default_visibility().is_none());
        let poly = dark.default_visibility().unwrap();
        assert!(!poly.points.is_empty());
    }

    #[test]
    fn completed_run_ignores_further_input() {
        let mut run = LevelRun::new("level1", corridor());
        run_until_done(&mut run, 200);
        let before = run.snapshot(false);
        run.step(TICK_MS, MoveIntent::new(-1, 0));
        let after = run.snapshot(false);
        assert_eq!(before.elapsed_ms, after.elapsed_ms);
        assert_eq!(before.x, after.x);
    }

    #[test]
    fn camera_clamps_to_level_bounds() {
        let run = LevelRun::new("level1", corridor());
        // level is 250x50 px; a 100x100 view cannot go negative
        let (x, y) = run.camera(100.0, 100.0);
        assert_eq!(x, 0.0);
        assert_eq!(y, 0.0);
        // view wider than the level clamps to the origin too
        let (x, _) = run.camera(400.0, 40.0);
        assert_eq!(x, 0.0);
    }
}
