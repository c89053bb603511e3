//! Axis-separated collision movement. Each axis is tried on its own and
//! cancelled when blocked, which gives wall sliding for free.

use crate::constants::DIAGONAL_FACTOR;
use crate::geometry::{Obstacles, Rect};
use crate::types::MoveIntent;

/// Advances `rect` by `intent` at `speed` px/s over `dt_ms`, clipping
/// against `obstacles` one axis at a time.
pub fn resolve_move(
    rect: Rect,
    intent: MoveIntent,
    speed: f32,
    dt_ms: u64,
    obstacles: &impl Obstacles,
) -> Rect {
    if intent.is_idle() {
        return rect;
    }
    let mut step = speed * dt_ms as f32 / 1000.0;
    if intent.is_diagonal() {
        step *= DIAGONAL_FACTOR;
    }

    let mut out = rect;
    if intent.dx != 0 {
        let trial = Rect::new(out.x + intent.dx as f32 * step, out.y, out.w, out.h);
        if !obstacles.blocks(&trial) {
            out = trial;
        }
    }
    if intent.dy != 0 {
        let trial = Rect::new(out.x, out.y + intent.dy as f32 * step, out.w, out.h);
        if !obstacles.blocks(&trial) {
            out = trial;
        }
    }
    out
}
