use std::f64::consts::PI;

use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::{Point, Rect};

/// Geometric primitive representing a circle
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        debug_assert!(
            radius.is_finite() && radius >= 0.0,
            "invalid circle radius: {radius}",
        );
        debug_assert!(
            center.0.is_finite() && center.1.is_finite(),
            "invalid circle center: {center:?}",
        );

        Self { center, radius }
    }
}

impl Shape for Circle {
    fn centroid(&self) -> Point {
        self.center
    }

    fn area(&self) -> f64 {
        self.radius * self.radius * PI
    }

    fn bbox(&self) -> Rect {
        let (r, Point(x, y)) = (self.radius, self.center);
        Rect {
            x_min: x - r,
            y_min: y - r,
            x_max: x + r,
            y_max: y + r,
        }
    }
}
