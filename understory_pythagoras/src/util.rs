// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Vec2};

/// Sine of `angle`, routed through Kurbo so it works under both `std` and `libm`.
pub(crate) fn sin(angle: f64) -> f64 {
    Vec2::from_angle(angle).y
}

/// Rotate `point` around `pivot` by `angle` radians (counter-clockwise in a y-up frame).
pub(crate) fn rotate_about(point: Point, pivot: Point, angle: f64) -> Point {
    Affine::rotate_about(angle, pivot) * point
}
