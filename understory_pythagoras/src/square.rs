// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Squares and the edge-rotation construction that places child squares.

use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, SQRT_2};

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::util::{rotate_about, sin};

/// A square in the plane: a center, a side length and the orientation of its drawing edge.
///
/// `angle` is in radians and points from the center towards the midpoint of the
/// drawing edge, the side from which child squares grow. Angles are never
/// normalized; deep trees may accumulate large values, which is fine because only
/// their sine and cosine are ever used.
///
/// Squares are plain values and compare by value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Square {
    /// Center of the square.
    pub center: Point,
    /// Side length.
    pub length: f64,
    /// Orientation of the drawing edge, in radians.
    pub angle: f64,
}

impl Square {
    /// Create a square.
    pub const fn new(center: Point, length: f64, angle: f64) -> Self {
        Self {
            center,
            length,
            angle,
        }
    }

    /// Midpoint of the drawing edge.
    pub fn edge_midpoint(&self) -> Point {
        point_on_edge(self.center, self.length, self.angle)
    }

    /// Axis-aligned rectangle of the square before rotation, centered on [`Square::center`].
    ///
    /// Draw the square as [`Square::transform`] applied to this rectangle.
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, Size::new(self.length, self.length))
    }

    /// Rotation about [`Square::center`] that orients [`Square::rect`].
    pub fn transform(&self) -> Affine {
        Affine::rotate_about(self.angle, self.center)
    }

    /// Build the child square occupying the arc `[prior_angle, prior_angle + alpha]`
    /// of this square's drawing edge.
    ///
    /// `alpha` is the child's share of the half-turn above the drawing edge
    /// (`weight * π`); the child's side is `self.length * sin(alpha / 2)`.
    pub fn child(&self, alpha: f64, prior_angle: f64) -> Self {
        let length = self.length * sin(alpha / 2.0);
        let center = compute_center(self, length, alpha, prior_angle);
        let angle = self.angle - FRAC_PI_2 + prior_angle + alpha / 2.0;
        Self::new(center, length, angle)
    }
}

/// Midpoint of the drawing edge of a square with the given center, side and angle.
pub fn point_on_edge(center: Point, length: f64, angle: f64) -> Point {
    center + Vec2::from_angle(angle) * (length / 2.0)
}

/// Compute the center of a child square of side `length` spanning an arc of
/// `alpha` radians, starting `base_angle` radians into the parent's arc.
///
/// The parent's drawing edge midpoint is the pivot. The parent corner where the
/// arc starts is rotated past earlier siblings by `base_angle`, then by `alpha`;
/// the two rotated corners span the child's base edge, and the child's center
/// sits half a side beyond that edge's midpoint.
pub fn compute_center(parent: &Square, length: f64, alpha: f64, base_angle: f64) -> Point {
    let t0 = parent.edge_midpoint();
    let mut edge = point_on_edge(
        parent.center,
        SQRT_2 * parent.length,
        parent.angle - FRAC_PI_4,
    );
    if base_angle != 0.0 {
        edge = rotate_about(edge, t0, base_angle);
    }
    let t1 = rotate_about(edge, t0, alpha);
    let t2 = t1.midpoint(edge);
    let slope = parent.angle - FRAC_PI_2 + alpha / 2.0;
    point_on_edge(t2, length, slope + base_angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_1_SQRT_2, PI};

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn start() -> Square {
        Square::new(Point::ORIGIN, 200.0, -FRAC_PI_2)
    }

    #[test]
    fn edge_midpoint_follows_angle() {
        let m = start().edge_midpoint();
        assert!(close(m, Point::new(0.0, -100.0)), "midpoint {m:?}");
    }

    #[test]
    fn half_weight_children_are_mirror_images() {
        let parent = start();
        let left = parent.child(FRAC_PI_2, 0.0);
        let right = parent.child(FRAC_PI_2, FRAC_PI_2);

        let expected_len = 200.0 * FRAC_1_SQRT_2;
        assert!((left.length - expected_len).abs() < EPS);
        assert!((right.length - expected_len).abs() < EPS);

        assert!(close(left.center, Point::new(-100.0, -200.0)), "{left:?}");
        assert!(close(right.center, Point::new(100.0, -200.0)), "{right:?}");
        assert!((left.angle - (-3.0 * FRAC_PI_4)).abs() < EPS);
        assert!((right.angle - (-FRAC_PI_4)).abs() < EPS);
    }

    #[test]
    fn single_child_sits_flush_on_the_drawing_edge() {
        // A sole child spans the whole half-turn and has the parent's side length.
        let parent = start();
        let child = parent.child(PI, 0.0);
        assert!((child.length - parent.length).abs() < EPS);
        assert!(close(child.center, Point::new(0.0, -200.0)), "{child:?}");
        assert!((child.angle - parent.angle).abs() < EPS);
    }

    #[test]
    fn rect_and_transform_place_the_drawing_edge() {
        let sq = Square::new(Point::new(10.0, 10.0), 4.0, 0.0);
        assert_eq!(sq.rect(), Rect::new(8.0, 8.0, 12.0, 12.0));
        // Angle zero leaves the rect untouched; the drawing edge faces +x.
        let p = sq.transform() * Point::new(12.0, 10.0);
        assert!(close(p, sq.edge_midpoint()));
    }

    #[test]
    fn uneven_siblings_take_consecutive_arcs() {
        // Weights 1/2, 1/6, 1/3 of a half turn.
        let parent = start();
        let first = parent.child(FRAC_PI_2, 0.0);
        let second = parent.child(PI / 6.0, FRAC_PI_2);
        let third = parent.child(PI / 3.0, FRAC_PI_2 + PI / 6.0);

        assert!(close(first.center, Point::new(-100.0, -200.0)), "{first:?}");
        assert!((first.length - 100.0 * SQRT_2).abs() < EPS);
        assert!((first.angle + 3.0 * FRAC_PI_4).abs() < EPS);

        assert!(
            close(
                second.center,
                Point::new(31.698729810778083, -218.30127018922195)
            ),
            "{second:?}"
        );
        assert!((second.length - 51.76380902050415).abs() < EPS);
        assert!((second.angle + 5.0 * PI / 12.0).abs() < EPS);

        assert!(
            close(
                third.center,
                Point::new(118.30127018922192, -168.30127018922195)
            ),
            "{third:?}"
        );
        assert!((third.length - 100.0).abs() < EPS);
        assert!((third.angle + PI / 6.0).abs() < EPS);
    }
}
