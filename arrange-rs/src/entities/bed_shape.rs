use log::debug;

use crate::geometry::primitives::{Circle, Point, Rect, SPolygon};

/// Smallest distinguishable length in bed units
pub const SCALED_EPSILON: f64 = 1e-4;

/// Maximum relative difference between the area of an outline and the area of its bounding box
/// for the outline to be considered a box
const BOX_AREA_TOLERANCE: f64 = 1e-3;

/// Maximum deviation of a vertex from the mean center distance for the outline to be considered a circle
const CIRCLE_TOLERANCE: f64 = 10.0 * SCALED_EPSILON;

/// Classified shape of a bed, carrying its concrete parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum BedShapeHint {
    /// Axis-aligned rectangular bed
    Box(Rect),
    /// Circular bed
    Circle(Circle),
    /// Any other outline, kept as is
    Irregular(Vec<Point>),
    /// Unbounded plane, anchored at `center`
    Infinite { center: Point },
}

impl BedShapeHint {
    /// Classifies a bed from its outline.
    /// The outline is an ordered ring of points, the closing vertex is implied.
    pub fn from_outline(outline: &[Point]) -> BedShapeHint {
        debug_assert!(
            outline.len() >= 3,
            "bed outline needs at least 3 points: {outline:?}"
        );
        let Some(bbox) = Rect::from_points(outline) else {
            return BedShapeHint::Irregular(vec![]);
        };

        let area = SPolygon::calculate_signed_area(outline).abs();
        let hint = if 1.0 - area / bbox.area() < BOX_AREA_TOLERANCE {
            BedShapeHint::Box(bbox)
        } else if let Some(circle) = as_circle(outline, bbox.centroid()) {
            BedShapeHint::Circle(circle)
        } else {
            BedShapeHint::Irregular(outline.to_vec())
        };

        debug!("[ARR] bed outline of {} points classified as {}", outline.len(), hint.kind());
        hint
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BedShapeHint::Box(_) => "box",
            BedShapeHint::Circle(_) => "circle",
            BedShapeHint::Irregular(_) => "irregular",
            BedShapeHint::Infinite { .. } => "infinite",
        }
    }
}

/// Every vertex has to lie (almost) equally far from `center`
fn as_circle(outline: &[Point], center: Point) -> Option<Circle> {
    let distances = outline
        .iter()
        .map(|p| p.distance_to(&center))
        .collect::<Vec<_>>();
    let avg_dist = distances.iter().sum::<f64>() / distances.len() as f64;

    distances
        .iter()
        .all(|d| (d - avg_dist).abs() <= CIRCLE_TOLERANCE)
        .then(|| Circle::new(center, avg_dist))
}
