// Axis-aligned boxes, rotated label bounds and the collision scan used by
// the spiral search. Pure geometry, no rendering dependency.

use serde::Serialize;

/// Axis-aligned rectangle in canvas coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Unrotated box of `width` x `height` centered on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        let hw = width * 0.5;
        let hh = height * 0.5;
        Self::new(cx - hw, cy - hh, cx + hw, cy + hh)
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn inflate(&self, pad: f32) -> Self {
        if pad <= 0.0 {
            return *self;
        }
        Self::new(self.x1 - pad, self.y1 - pad, self.x2 + pad, self.y2 + pad)
    }

    /// Closed-interval overlap: boxes that merely touch still collide.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !(self.x2 < other.x1 || self.x1 > other.x2 || self.y2 < other.y1 || self.y1 > other.y2)
    }

    /// True when the box lies within `[min, max]` on both axes.
    pub fn contained_in(&self, min: f32, max: f32) -> bool {
        self.x1 >= min && self.y1 >= min && self.x2 <= max && self.y2 <= max
    }
}

/// Axis-aligned bounds of a `2*half_w` x `2*half_h` rectangle rotated by
/// `degrees` about its center `(cx, cy)`.
pub fn rotated_bounds(cx: f32, cy: f32, half_w: f32, half_h: f32, degrees: f32) -> BoundingBox {
    let radians = degrees.to_radians();
    let cos_a = radians.cos();
    let sin_a = radians.sin();
    let corners = [
        (-half_w, -half_h),
        (half_w, -half_h),
        (half_w, half_h),
        (-half_w, half_h),
    ];

    let mut bounds = BoundingBox::new(f32::MAX, f32::MAX, f32::MIN, f32::MIN);
    for (dx, dy) in corners {
        // [cos  -sin] [dx]
        // [sin   cos] [dy]
        let rx = dx * cos_a - dy * sin_a;
        let ry = dx * sin_a + dy * cos_a;
        bounds.x1 = bounds.x1.min(cx + rx);
        bounds.y1 = bounds.y1.min(cy + ry);
        bounds.x2 = bounds.x2.max(cx + rx);
        bounds.y2 = bounds.y2.max(cy + ry);
    }
    bounds
}

/// Linear scan of the reserved boxes. Fine for leaderboard-sized inputs;
/// swap in a grid index if label counts reach the thousands.
pub fn collides(candidate: &BoundingBox, placed: &[BoundingBox]) -> bool {
    placed.iter().any(|other| candidate.overlaps(other))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn rotated_bounds_identity() {
        let b = rotated_bounds(100.0, 50.0, 20.0, 5.0, 0.0);
        assert!(approx_eq(b.x1, 80.0));
        assert!(approx_eq(b.y1, 45.0));
        assert!(approx_eq(b.x2, 120.0));
        assert!(approx_eq(b.y2, 55.0));
    }

    #[test]
    fn rotated_bounds_quarter_turn_swaps_extents() {
        let b = rotated_bounds(0.0, 0.0, 20.0, 5.0, 90.0);
        assert!(approx_eq(b.width(), 10.0), "width {}", b.width());
        assert!(approx_eq(b.height(), 40.0), "height {}", b.height());
    }

    #[test]
    fn rotated_bounds_45_degrees_grows_square() {
        let b = rotated_bounds(0.0, 0.0, 10.0, 10.0, 45.0);
        let expected = 20.0 * std::f32::consts::SQRT_2;
        assert!(approx_eq(b.width(), expected));
        assert!(approx_eq(b.height(), expected));
        assert!(approx_eq(b.x1 + b.x2, 0.0) && approx_eq(b.y1 + b.y2, 0.0));
    }

    #[test]
    fn rotated_bounds_is_symmetric_in_sign() {
        let a = rotated_bounds(5.0, 5.0, 30.0, 8.0, 35.0);
        let b = rotated_bounds(5.0, 5.0, 30.0, 8.0, -35.0);
        assert!(approx_eq(a.width(), b.width()));
        assert!(approx_eq(a.height(), b.height()));
    }

    #[test]
    fn overlap_detects_intersection_and_touching() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&BoundingBox::new(5.0, 5.0, 15.0, 15.0)));
        assert!(a.overlaps(&BoundingBox::new(10.0, 0.0, 20.0, 10.0)));
        assert!(a.overlaps(&BoundingBox::new(2.0, 2.0, 3.0, 3.0)));
    }

    #[test]
    fn overlap_rejects_separated_boxes() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&BoundingBox::new(10.5, 0.0, 20.0, 10.0)));
        assert!(!a.overlaps(&BoundingBox::new(0.0, -20.0, 10.0, -0.5)));
    }

    #[test]
    fn inflate_expands_every_side() {
        let b = BoundingBox::new(10.0, 10.0, 20.0, 30.0).inflate(6.0);
        assert_eq!(b, BoundingBox::new(4.0, 4.0, 26.0, 36.0));
        let same = BoundingBox::new(1.0, 1.0, 2.0, 2.0).inflate(0.0);
        assert_eq!(same, BoundingBox::new(1.0, 1.0, 2.0, 2.0));
    }

    #[test]
    fn collides_scans_every_placed_box() {
        let placed = vec![
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(100.0, 100.0, 110.0, 110.0),
        ];
        assert!(collides(&BoundingBox::new(105.0, 105.0, 120.0, 120.0), &placed));
        assert!(!collides(&BoundingBox::new(50.0, 50.0, 60.0, 60.0), &placed));
        assert!(!collides(&BoundingBox::new(50.0, 50.0, 60.0, 60.0), &[]));
    }

    #[test]
    fn contained_in_checks_both_axes() {
        let b = BoundingBox::new(20.0, 30.0, 100.0, 120.0);
        assert!(b.contained_in(20.0, 120.0));
        assert!(!b.contained_in(25.0, 200.0));
        assert!(!b.contained_in(0.0, 110.0));
    }
}
