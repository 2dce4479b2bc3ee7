//! Signed measures of how far a shape protrudes outside a bed.
//! Positive values mean the shape does not fit, zero or negative values mean it does.

use crate::geometry::primitives::{Circle, Point, Rect};

/// Overfit of a bounding box against a box bed.
/// Only the dimensions are compared, the position of `bbox` is irrelevant.
pub fn box_overfit(bbox: &Rect, bin: &Rect) -> f64 {
    let w_diff = bbox.width() - bin.width();
    let h_diff = bbox.height() - bin.height();

    let mut diff = 0.0;
    if w_diff > 0.0 {
        diff += w_diff;
    }
    if h_diff > 0.0 {
        diff += h_diff;
    }
    diff
}

/// Overfit of a (convex hull) point set against a circular bed:
/// the largest distance of any point from the bed center minus the radius.
pub fn hull_circle_overfit(hull: &[Point], bin: &Circle) -> f64 {
    let max_dist = hull
        .iter()
        .map(|p| p.distance_to(&bin.center))
        .fold(0.0, f64::max);
    max_dist - bin.radius
}

/// Square of the positive part of `overfit`, zero when the shape fits
pub fn overfit_penalty(overfit: f64) -> f64 {
    match overfit > 0.0 {
        true => overfit.powi(2),
        false => 0.0,
    }
}
