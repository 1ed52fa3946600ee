//! Mathematical types shared with rendering layers.

use cgmath::Point2;

/// A 2D point in road space: `x` is the longitudinal position, `y` the lateral offset.
pub type Point2d = Point2<f64>;
