use log::trace;

use crate::arrange::{IndexEntry, SpatialIndex};
use crate::entities::{Bed, PlacementItem};
use crate::geometry::convex_hull::{convex_hull_from_shapes, ring_perimeter};
use crate::geometry::primitives::{Point, Rect, SPolygon};
use crate::util::assertions;

/// Items covering a larger fraction of the bed than this are considered big
pub const BIG_ITEM_THRESHOLD: f64 = 0.02;

/// Maximum relative area difference for two items to be considered equally sized
const ALIGNMENT_AREA_TOLERANCE: f64 = 1e-6;

/// Scoring branch applicable to a candidate item
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemCase {
    /// Big item in a mixed scene, or any item in a scene without big items
    BigItem,
    /// The final item of the big item branch, nothing remains to be placed after it
    LastBigItem,
    /// Small item in a scene that already contains big items
    SmallItem,
}

/// Whether an item covers more than [`BIG_ITEM_THRESHOLD`] of the bed's area
pub fn is_big(item_area: f64, bed_area: f64) -> bool {
    item_area / bed_area > BIG_ITEM_THRESHOLD
}

/// Picks the scoring branch for an item, big items are scored as such until nothing remains after them
pub fn classify_item(is_big: bool, big_index_empty: bool, n_remaining: usize) -> ItemCase {
    match (is_big || big_index_empty, n_remaining > 0) {
        (true, true) => ItemCase::BigItem,
        (true, false) => ItemCase::LastBigItem,
        (false, _) => ItemCase::SmallItem,
    }
}

/// Result of the objective function for a single candidate placement
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Score {
    /// Lower is better
    pub cost: f64,
    /// Bounding box of the pile with the candidate included
    pub full_bbox: Rect,
}

/// What the scoring context remembers about an already placed item
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedSnapshot {
    pub bbox: Rect,
    pub area: f64,
}

impl From<&PlacementItem> for PlacedSnapshot {
    fn from(item: &PlacementItem) -> Self {
        PlacedSnapshot {
            bbox: item.bbox(),
            area: item.area(),
        }
    }
}

/// State shared by every evaluation of the objective function while a single item is being placed.
///
/// Only [`ScoringContext::begin_next_item`] and [`ScoringContext::preload`] mutate it.
/// Everything else reads, so evaluations for the same item can safely run concurrently.
#[derive(Clone, Debug)]
pub struct ScoringContext {
    bed_area: f64,
    /// Normalization constant for distances
    norm: f64,
    /// Index of the big items only
    big_index: SpatialIndex,
    /// Index of all items seen so far
    all_index: SpatialIndex,
    placed: Vec<PlacedSnapshot>,
    merged_pile: Vec<SPolygon>,
    pile_bbox: Option<Rect>,
    n_remaining: usize,
}

impl ScoringContext {
    pub fn new(bed: &Bed) -> Self {
        let bed_area = bed.area();
        debug_assert!(bed_area > 0.0, "bed has no area: {bed}");
        Self {
            bed_area,
            norm: bed_area.sqrt(),
            big_index: SpatialIndex::new(),
            all_index: SpatialIndex::new(),
            placed: vec![],
            merged_pile: vec![],
            pile_bbox: None,
            n_remaining: 0,
        }
    }

    /// Synchronizes the context with the state of the solver, right before it starts placing the next item.
    /// Both spatial indexes are rebuilt from scratch.
    pub fn begin_next_item(
        &mut self,
        merged_pile: &[SPolygon],
        placed: &[&PlacementItem],
        remaining: &[&PlacementItem],
    ) {
        self.placed = placed.iter().map(|&item| PlacedSnapshot::from(item)).collect();
        self.merged_pile = merged_pile.to_vec();
        self.n_remaining = remaining.len();
        self.pile_bbox = merged_pile
            .iter()
            .map(|s| s.bbox)
            .reduce(Rect::bounding_rect);

        let all_entries = self
            .placed
            .iter()
            .enumerate()
            .map(|(idx, p)| IndexEntry { bbox: p.bbox, idx })
            .collect::<Vec<_>>();
        let big_entries = all_entries
            .iter()
            .filter(|e| self.is_big(self.placed[e.idx].area))
            .copied()
            .collect::<Vec<_>>();

        self.all_index = SpatialIndex::bulk_load(all_entries);
        self.big_index = SpatialIndex::bulk_load(big_entries);

        trace!(
            "[ARR] synced scoring context: {} placed ({} big), {} remaining",
            self.placed.len(),
            self.big_index.len(),
            self.n_remaining
        );
        debug_assert!(assertions::scoring_context_is_consistent(self));
    }

    /// Registers fixed items in the all-items index, so collision queries work before the solver starts
    pub fn preload(&mut self, fixed: &[PlacementItem]) {
        for (idx, item) in fixed.iter().enumerate() {
            self.all_index.insert(item.bbox(), idx);
        }
        self.placed = fixed.iter().map(PlacedSnapshot::from).collect();
        debug_assert!(assertions::scoring_context_is_consistent(self));
    }

    /// Checks whether the bounding box of `item` intersects with any of the indexed items
    pub fn is_colliding(&self, item: &PlacementItem) -> bool {
        !self.all_index.is_empty() && self.all_index.any_intersecting(&item.bbox())
    }

    pub fn is_big(&self, item_area: f64) -> bool {
        is_big(item_area, self.bed_area)
    }

    pub fn classify(&self, item: &PlacementItem) -> ItemCase {
        classify_item(
            self.is_big(item.area()),
            self.big_index.is_empty(),
            self.n_remaining,
        )
    }

    /// Bounding box of the pile with `item` added
    pub fn full_bbox(&self, item: &PlacementItem) -> Rect {
        match self.pile_bbox {
            Some(pile_bbox) => Rect::bounding_rect(pile_bbox, item.bbox()),
            None => item.bbox(),
        }
    }

    /// Convex hull of the merged pile with `item` added
    pub fn hull_with(&self, item: &PlacementItem) -> Vec<Point> {
        convex_hull_from_shapes(
            self.merged_pile
                .iter()
                .chain(std::iter::once(item.transformed_shape())),
        )
    }

    /// Evaluates the multi-criteria objective function for a candidate placement of `item`.
    /// `bed_center` is the point the pile should gravitate towards.
    pub fn score(&self, item: &PlacementItem, bed_center: Point) -> Score {
        let item_bbox = item.bbox();
        let full_bbox = self.full_bbox(item);

        let cost = match self.classify(item) {
            ItemCase::BigItem => {
                //big items align with big neighbours, the others with anything
                let index = match self.is_big(item.area()) {
                    true => &self.big_index,
                    false => &self.all_index,
                };
                let neighbours = index
                    .query_intersecting(&item_bbox)
                    .map(|e| self.placed[e.idx]);
                big_item_score(
                    item_bbox,
                    item.area(),
                    full_bbox,
                    bed_center,
                    self.norm,
                    neighbours,
                )
            }
            ItemCase::LastBigItem => {
                last_big_item_score(&self.hull_with(item), full_bbox, self.norm)
            }
            ItemCase::SmallItem => {
                let big_bbox = self.big_index.bounds().unwrap_or(full_bbox);
                small_item_score(item_bbox, big_bbox, self.norm)
            }
        };

        Score { cost, full_bbox }
    }

    pub fn bed_area(&self) -> f64 {
        self.bed_area
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn big_index(&self) -> &SpatialIndex {
        &self.big_index
    }

    pub fn all_index(&self) -> &SpatialIndex {
        &self.all_index
    }

    pub fn placed(&self) -> &[PlacedSnapshot] {
        &self.placed
    }

    pub fn merged_pile(&self) -> &[SPolygon] {
        &self.merged_pile
    }

    pub fn pile_bbox(&self) -> Option<Rect> {
        self.pile_bbox
    }

    pub fn n_remaining(&self) -> usize {
        self.n_remaining
    }
}

/// Cost of a big item: balances the distance to the pile and bed center, the density of the pile
/// and the alignment with an equally sized neighbour.
pub fn big_item_score(
    item_bbox: Rect,
    item_area: f64,
    full_bbox: Rect,
    bed_center: Point,
    norm: f64,
    neighbours: impl IntoIterator<Item = PlacedSnapshot>,
) -> f64 {
    let pile_center = full_bbox.centroid();
    let Rect {
        x_min,
        y_min,
        x_max,
        y_max,
    } = item_bbox;
    let anchors = [
        Point(x_min, y_min),
        Point(x_max, y_max),
        item_bbox.centroid(),
        Point(x_min, y_max),
        Point(x_max, y_min),
    ];

    let dist_pile = anchors
        .iter()
        .map(|a| a.distance_to(&pile_center))
        .fold(f64::INFINITY, f64::min)
        / norm;
    let dist_bed = item_bbox.centroid().distance_to(&bed_center) / norm;
    let dist = 0.8 * dist_pile + 0.2 * dist_bed;

    let mut any_neighbour = false;
    let mut alignment = 1.0;
    for n in neighbours {
        any_neighbour = true;
        if (1.0 - n.area / item_area).abs() < ALIGNMENT_AREA_TOLERANCE {
            let combined = Rect::bounding_rect(n.bbox, item_bbox);
            let a_score = 1.0 - (item_area + n.area) / combined.area();
            alignment = f64::min(alignment, a_score);
        }
    }

    let density = (full_bbox.width() / norm * full_bbox.height() / norm).sqrt();

    match any_neighbour {
        false => 0.5 * dist + 0.5 * density,
        true => 0.4 * dist + 0.4 * density + 0.2 * alignment,
    }
}

/// Cost of the last big item: the circumference of the pile's convex hull and bounding box
pub fn last_big_item_score(hull: &[Point], full_bbox: Rect, norm: f64) -> f64 {
    let circ = ring_perimeter(hull) / norm;
    let bcirc = 2.0 * (full_bbox.width() + full_bbox.height()) / norm;
    0.5 * circ + 0.5 * bcirc
}

/// Cost of a small item: its distance to the cluster of big items
pub fn small_item_score(item_bbox: Rect, big_bbox: Rect, norm: f64) -> f64 {
    item_bbox.centroid().distance_to(&big_bbox.centroid()) / norm
}
