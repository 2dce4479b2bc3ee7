use arrange_rs::arrange::{Alignment, PlacementConfig, PlacementObjective};
use arrange_rs::entities::{Bed, PlacementItem};
use arrange_rs::geometry::primitives::{Point, Rect, SPolygon};
use itertools::Itertools;
use log::trace;
use ordered_float::OrderedFloat;
use rand::Rng;
use rayon::prelude::*;

use crate::placer::feasibility::is_feasible;
use crate::samplers::contact_sampler::contact_positions;
use crate::samplers::uniform_rect_sampler::UniformRectSampler;

/// Maximum number of uniform samples per item and rotation, at accuracy 1.0
pub const MAX_RANDOM_SAMPLES: usize = 200;

/// Maximum number of sliding positions per side of a placed item, at accuracy 1.0
pub const MAX_SLIDE_SAMPLES: usize = 16;

/// Extra clearance on top of the minimum distance for sliding positions
pub const CONTACT_CLEARANCE: f64 = 1e-6;

/// Number of candidate positions generated for every item and rotation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchBudget {
    pub n_random_samples: usize,
    pub n_slide_samples: usize,
}

impl SearchBudget {
    pub fn from_accuracy(accuracy: f64) -> Self {
        let accuracy = accuracy.clamp(0.0, 1.0);
        Self {
            n_random_samples: (MAX_RANDOM_SAMPLES as f64 * accuracy).round() as usize,
            n_slide_samples: usize::max(2, (MAX_SLIDE_SAMPLES as f64 * accuracy).round() as usize),
        }
    }
}

/// Best placement found for an item
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub rotation: f64,
    pub translation: Point,
    pub cost: f64,
}

/// Searches the bed for a feasible placement of `item` next to the `placed` items, with minimal cost.
#[allow(clippy::too_many_arguments)]
pub fn search(
    item: &PlacementItem,
    placed: &[&PlacementItem],
    bed: &Bed,
    min_distance: f64,
    config: &PlacementConfig,
    budget: SearchBudget,
    rng: &mut impl Rng,
    objective: &dyn PlacementObjective,
    sample_counter: &mut usize,
) -> Option<Candidate> {
    let pile = placed.iter().map(|p| p.transformed_shape()).collect_vec();
    let pile_bbox = pile.iter().map(|s| s.bbox).reduce(Rect::bounding_rect);
    let gap = min_distance + CONTACT_CLEARANCE;

    //(rotation, bounding box center) pairs to evaluate
    let mut samples = vec![];
    for &delta in &config.rotations {
        //configured rotations are relative to the item's own orientation
        let rotation = item.rotation() + delta;
        let bbox = rotated(item, rotation).bbox();
        let dims = (bbox.width(), bbox.height());

        let start = match config.starting_point {
            Alignment::DontAlign => bbox.centroid(),
            alignment => aligned_center(bed, dims, alignment),
        };
        samples.push((rotation, start));

        for p in &pile {
            samples.extend(
                contact_positions(&p.bbox, dims, gap, budget.n_slide_samples)
                    .into_iter()
                    .map(|c| (rotation, c)),
            );
        }

        //uniform samples over the region where the bounding box of the item fits
        let region = match bed {
            Bed::Infinite { .. } => {
                pile_bbox.and_then(|pb| pb.resize_by(dims.0 / 2.0 + gap, dims.1 / 2.0 + gap))
            }
            _ => bed.bbox().resize_by(-dims.0 / 2.0, -dims.1 / 2.0),
        };
        if let Some(sampler) = region.and_then(UniformRectSampler::new) {
            samples.extend((0..budget.n_random_samples).map(|_| (rotation, sampler.sample(&mut *rng))));
        }
    }
    *sample_counter += samples.len();

    let evaluate = |&(rotation, center): &(f64, Point)| -> Option<Candidate> {
        let mut buffer = rotated(item, rotation);
        buffer.translate(center - buffer.bbox().centroid());
        is_feasible(bed, buffer.transformed_shape(), &pile, min_distance).then(|| Candidate {
            rotation,
            translation: buffer.translation(),
            cost: objective.evaluate(&buffer),
        })
    };

    let best = match config.parallel {
        true => samples
            .par_iter()
            .filter_map(evaluate)
            .min_by_key(|c| OrderedFloat(c.cost)),
        false => samples
            .iter()
            .filter_map(evaluate)
            .min_by_key(|c| OrderedFloat(c.cost)),
    };

    trace!(
        "[FFP] item {}: {} samples, best: {:?}",
        item.id,
        samples.len(),
        best
    );
    best
}

/// Center of a bounding box with dimensions `(w, h)` aligned on the bed
pub fn aligned_center(bed: &Bed, (w, h): (f64, f64), alignment: Alignment) -> Point {
    let bbox = bed.bbox();
    let (hw, hh) = (w / 2.0, h / 2.0);
    match alignment {
        Alignment::Center | Alignment::DontAlign => bed.center(),
        Alignment::BottomLeft => Point(bbox.x_min + hw, bbox.y_min + hh),
        Alignment::BottomRight => Point(bbox.x_max - hw, bbox.y_min + hh),
        Alignment::TopLeft => Point(bbox.x_min + hw, bbox.y_max - hh),
        Alignment::TopRight => Point(bbox.x_max - hw, bbox.y_max - hh),
    }
}

fn rotated(item: &PlacementItem, rotation: f64) -> PlacementItem {
    let mut buffer = item.clone();
    if buffer.rotation() != rotation {
        buffer.set_rotation(rotation);
    }
    buffer
}

/// Shapes of the pile, as handed to the objective
pub fn merged_pile(placed: &[&PlacementItem]) -> Vec<SPolygon> {
    placed
        .iter()
        .map(|p| p.transformed_shape().clone())
        .collect()
}
