//! Segment intersection, rectangles and the occupancy trait used by
//! movement and lighting.

use crate::types::Point;

/// Axis-aligned rectangle, origin at top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

/// A wall expressed as a line segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSegment {
    pub a: Point,
    pub b: Point,
}

impl WallSegment {
    pub fn new(ax: f32, ay: f32, bx: f32, by: f32) -> Self {
        Self {
            a: Point::new(ax, ay),
            b: Point::new(bx, by),
        }
    }
}

/// Parametric segment intersection. Returns the (t, u) parameters along each
/// segment when they cross, both in [0, 1]. Parallel segments never intersect,
/// overlapping collinear ones included.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<(f32, f32)> {
    let d1x = p2.x - p1.x;
    let d1y = p2.y - p1.y;
    let d2x = p4.x - p3.x;
    let d2y = p4.y - p3.y;

    let denom = d1x * d2y - d1y * d2x;
    if denom == 0.0 {
        return None;
    }

    let t = ((p3.x - p1.x) * d2y - (p3.y - p1.y) * d2x) / denom;
    let u = ((p3.x - p1.x) * d1y - (p3.y - p1.y) * d1x) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some((t, u))
    } else {
        None
    }
}

/// Whether a segment crosses or touches a rectangle. Checks the four edges
/// plus full containment of the segment inside the rectangle.
pub fn rect_intersects_segment(rect: &Rect, seg: &WallSegment) -> bool {
    if rect.contains_point(seg.a) || rect.contains_point(seg.b) {
        return true;
    }
    let tl = Point::new(rect.x, rect.y);
    let tr = Point::new(rect.x + rect.w, rect.y);
    let bl = Point::new(rect.x, rect.y + rect.h);
    let br = Point::new(rect.x + rect.w, rect.y + rect.h);
    segments_intersect(seg.a, seg.b, tl, tr).is_some()
        || segments_intersect(seg.a, seg.b, tr, br).is_some()
        || segments_intersect(seg.a, seg.b, br, bl).is_some()
        || segments_intersect(seg.a, seg.b, bl, tl).is_some()
}

/// Anything movement can collide against.
pub trait Obstacles {
    fn blocks(&self, rect: &Rect) -> bool;
}

impl Obstacles for [WallSegment] {
    fn blocks(&self, rect: &Rect) -> bool {
        self.iter().any(|seg| rect_intersects_segment(rect, seg))
    }
}

impl Obstacles for Vec<WallSegment> {
    fn blocks(&self, rect: &Rect) -> bool {
        self.as_slice().blocks(rect)
    }
}
