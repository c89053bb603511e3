//! Ray-cast visibility for dark levels. Rays march outward in fixed steps
//! and stop one step short of the first blocked sample.

use std::f32::consts::TAU;

use crate::constants::{MIN_NUM_RAYS, RAY_STEP};
use crate::geometry::{Obstacles, Rect};
use crate::types::{LightSource, Point};

/// Lit region around an observer. `points` is empty when the light is out.
#[derive(Clone, Debug)]
pub struct VisibilityPolygon {
    pub pivot: Point,
    pub points: Vec<Point>,
}

impl VisibilityPolygon {
    /// Shrinks every vertex toward the pivot by `ratio`. Used to draw
    /// concentric gradient rings inside the lit area.
    pub fn scaled_toward(&self, ratio: f32) -> VisibilityPolygon {
        let points = self
            .points
            .iter()
            .map(|p| {
                Point::new(
                    self.pivot.x + (p.x - self.pivot.x) * ratio,
                    self.pivot.y + (p.y - self.pivot.y) * ratio,
                )
            })
            .collect();
        VisibilityPolygon {
            pivot: self.pivot,
            points,
        }
    }
}

/// Marches a single ray from `origin` at `angle`, returning the farthest
/// unblocked sample within `radius`.
pub fn cast_ray(origin: Point, angle: f32, radius: f32, obstacles: &impl Obstacles) -> Point {
    let dx = angle.cos();
    let dy = angle.sin();
    let mut last = origin;
    let mut dist = RAY_STEP;
    while dist <= radius {
        let p = Point::new(origin.x + dx * dist, origin.y + dy * dist);
        let sample = Rect::new(
            p.x - RAY_STEP / 2.0,
            p.y - RAY_STEP / 2.0,
            RAY_STEP,
            RAY_STEP,
        );
        if obstacles.blocks(&sample) {
            break;
        }
        last = p;
        dist += RAY_STEP;
    }
    last
}

/// Casts a full fan of rays around `origin`. The ray count is clamped to a
/// minimum so the polygon stays a polygon, and the first angle is repeated
/// at the end to close it.
pub fn visibility_polygon(
    source: LightSource,
    obstacles: &impl Obstacles,
    num_rays: usize,
) -> VisibilityPolygon {
    let origin = Point::new(source.x, source.y);
    if source.radius <= 0.0 {
        return VisibilityPolygon {
            pivot: origin,
            points: Vec::new(),
        };
    }
    let num_rays = num_rays.max(MIN_NUM_RAYS);
    let mut points = Vec::with_capacity(num_rays + 1);
    for i in 0..=num_rays {
        let angle = i as f32 / num_rays as f32 * TAU;
        points.push(cast_ray(origin, angle, source.radius, obstacles));
    }
    VisibilityPolygon {
        pivot: origin,
        points,
    }
}
