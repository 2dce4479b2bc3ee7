use std::fmt::Display;

use anyhow::Result;

use crate::entities::BedShapeHint;
use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::{Circle, Point, Rect, SPolygon};
use crate::util::FPA;

/// Half the side of the reference box standing in for an infinite bed
pub const INFINITE_HALF_EXTENT: f64 = 1e9;

/// The region in which items are placed. Immutable during an arrangement run.
#[derive(Clone, Debug)]
pub enum Bed {
    Box(Rect),
    Circle(Circle),
    Irregular(SPolygon),
    /// Unbounded plane, represented by a huge box around `center` wherever a finite shape is needed
    Infinite { center: Point },
}

impl Bed {
    pub fn from_hint(hint: &BedShapeHint) -> Result<Bed> {
        let bed = match hint {
            BedShapeHint::Box(rect) => Bed::Box(*rect),
            BedShapeHint::Circle(circle) => Bed::Circle(*circle),
            BedShapeHint::Irregular(outline) => Bed::Irregular(SPolygon::new(outline.clone())?),
            BedShapeHint::Infinite { center } => Bed::Infinite { center: *center },
        };
        Ok(bed)
    }

    /// Bounding box of the bed
    pub fn bbox(&self) -> Rect {
        match self {
            Bed::Box(rect) => *rect,
            Bed::Circle(circle) => circle.bbox(),
            Bed::Irregular(poly) => poly.bbox(),
            Bed::Infinite { center } => {
                let side = 2.0 * INFINITE_HALF_EXTENT;
                Rect::centered_at(*center, side, side)
            }
        }
    }

    pub fn area(&self) -> f64 {
        match self {
            Bed::Box(rect) => rect.area(),
            Bed::Circle(circle) => circle.area(),
            Bed::Irregular(poly) => poly.area(),
            Bed::Infinite { .. } => self.bbox().area(),
        }
    }

    /// Reference point the pile gravitates towards
    pub fn center(&self) -> Point {
        match self {
            Bed::Box(rect) => rect.centroid(),
            Bed::Circle(circle) => circle.center,
            Bed::Irregular(poly) => poly.bbox().centroid(),
            Bed::Infinite { center } => *center,
        }
    }

    /// Width used to lay out multiple logical beds next to each other, zero for an infinite bed
    pub fn width(&self) -> f64 {
        match self {
            Bed::Infinite { .. } => 0.0,
            _ => self.bbox().width(),
        }
    }

    /// Checks whether `shape` lies entirely within the bed, touching the boundary is allowed
    pub fn contains(&self, shape: &SPolygon) -> bool {
        match self {
            Bed::Box(rect) => rect.almost_surrounds(&shape.bbox()),
            //a circle is convex: containing every vertex means containing the whole shape
            Bed::Circle(circle) => shape
                .vertices
                .iter()
                .all(|p| FPA(p.distance_to(&circle.center)) <= FPA(circle.radius)),
            Bed::Irregular(poly) => poly.contains(shape),
            Bed::Infinite { .. } => true,
        }
    }
}

impl Display for Bed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bed::Box(r) => write!(f, "box [{:.1}x{:.1}]", r.width(), r.height()),
            Bed::Circle(c) => write!(f, "circle [r: {:.1}]", c.radius),
            Bed::Irregular(p) => write!(f, "irregular [{} vertices]", p.n_vertices()),
            Bed::Infinite { center } => write!(f, "infinite [{:.1}, {:.1}]", center.0, center.1),
        }
    }
}
