use crate::arrange::{Score, ScoringContext};
use crate::entities::{Bed, PlacementItem};
use crate::geometry::overfit::{box_overfit, hull_circle_overfit, overfit_penalty};
use crate::geometry::primitives::{Circle, Point, Rect};

/// Bed specific wrapper around [`ScoringContext::score`].
///
/// The raw score does not know about the bed boundaries,
/// each variant adds a penalty steering the solver away from placements that do not fit.
#[derive(Clone, Debug, PartialEq)]
pub enum Objective {
    /// Penalizes the squared overfit of the pile's bounding box against the bed
    Box { bin: Rect },
    /// Penalizes the squared overfit of the pile's convex hull, for big items only
    Circle { bin: Circle },
    /// Raw score, the bed boundary is left entirely to the solver
    Irregular { center: Point },
    /// Penalizes any growth of the pile's bounding box beyond the bed's bounding box.
    /// Used when fixed items are present.
    FixedOverfit { bin_bbox: Rect },
}

impl Objective {
    pub fn for_bed(bed: &Bed) -> Self {
        match bed {
            //an infinite bed behaves like a box so big it never overfits
            Bed::Box(_) | Bed::Infinite { .. } => Objective::Box { bin: bed.bbox() },
            Bed::Circle(circle) => Objective::Circle { bin: *circle },
            Bed::Irregular(_) => Objective::Irregular {
                center: bed.center(),
            },
        }
    }

    pub fn fixed_overfit(bed: &Bed) -> Self {
        Objective::FixedOverfit {
            bin_bbox: bed.bbox(),
        }
    }

    /// The point the pile gravitates towards
    pub fn center(&self) -> Point {
        match self {
            Objective::Box { bin } => bin.centroid(),
            Objective::Circle { bin } => bin.center,
            Objective::Irregular { center } => *center,
            Objective::FixedOverfit { bin_bbox } => bin_bbox.centroid(),
        }
    }

    pub fn evaluate(&self, ctx: &ScoringContext, item: &PlacementItem) -> f64 {
        let score = ctx.score(item, self.center());
        match self {
            Objective::Box { bin } => {
                score.cost + overfit_penalty(box_overfit(&score.full_bbox, bin))
            }
            Objective::Circle { bin } => match ctx.is_big(item.area()) {
                true => {
                    let hull = ctx.hull_with(item);
                    score.cost + overfit_penalty(hull_circle_overfit(&hull, bin))
                }
                false => score.cost,
            },
            Objective::Irregular { .. } => score.cost,
            Objective::FixedOverfit { bin_bbox } => fixed_overfit(score, bin_bbox),
        }
    }
}

/// Adds the area by which the pile's bounding box grows the bed's bounding box
pub fn fixed_overfit(score: Score, bin_bbox: &Rect) -> f64 {
    let full = Rect::bounding_rect(score.full_bbox, *bin_bbox);
    let diff = full.area() - bin_bbox.area();
    match diff > 0.0 {
        true => score.cost + diff,
        false => score.cost,
    }
}
