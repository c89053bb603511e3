pub const TICK_RATE: u32 = 60;
pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;

/// Edge length of one tile in the single-player tile-grid model.
pub const TILE_SIZE: f32 = 50.0;
/// Edge length of one maze cell in the race (wall-segment) model.
pub const CELL_SIZE: f32 = 40.0;

pub const PLAYER_SPEED: f32 = 360.0;
/// Collision box of the single player, slightly smaller than a tile.
pub const PLAYER_SIZE: f32 = 30.0;
/// Pickup box of a flashlight, centered in its tile.
pub const FLASHLIGHT_PICKUP_SIZE: f32 = 40.0;
pub const RACER_SPEED: f32 = 240.0;
pub const RACER_RADIUS: f32 = 12.0;
pub const DIAGONAL_FACTOR: f32 = 0.707;

pub const BASE_LIGHT_RADIUS: f32 = 80.0;
pub const FLASHLIGHT_LIGHT_BONUS: f32 = 60.0;
pub const RACE_LIGHT_RADIUS: f32 = 120.0;

pub const DEFAULT_NUM_RAYS: usize = 180;
pub const MIN_NUM_RAYS: usize = 8;
pub const RAY_STEP: f32 = 2.0;

/// Levels whose name carries a number above this are played dark.
pub const DARK_LEVEL_THRESHOLD: u32 = 5;

/// Side length (in cells) of the carved-open start and finish zones.
pub const ZONE_SPAN: usize = 2;

pub fn light_radius_for(flashlights: u32) -> f32 {
    BASE_LIGHT_RADIUS + flashlights as f32 * FLASHLIGHT_LIGHT_BONUS
}

/// Top-left cell of the finish zone: bottom rows, middle columns.
pub fn finish_zone_origin(rows: usize, cols: usize) -> (usize, usize) {
    let row = rows.saturating_sub(ZONE_SPAN);
    let col = (cols / 2)
        .saturating_sub(1)
        .min(cols.saturating_sub(ZONE_SPAN));
    (row, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_radius_grows_per_flashlight() {
        assert_eq!(light_radius_for(0), BASE_LIGHT_RADIUS);
        assert_eq!(
            light_radius_for(3),
            BASE_LIGHT_RADIUS + 3.0 * FLASHLIGHT_LIGHT_BONUS
        );
    }

    #[test]
    fn finish_zone_sits_at_bottom_middle() {
        assert_eq!(finish_zone_origin(20, 30), (18, 14));
        assert_eq!(finish_zone_origin(4, 4), (2, 1));
    }

    #[test]
    fn finish_zone_stays_in_bounds_on_tiny_grids() {
        let (row, col) = finish_zone_origin(2, 2);
        assert_eq!(row, 0);
        assert_eq!(col, 0);
    }
}
