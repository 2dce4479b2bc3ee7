use std::cmp::Reverse;
use std::time::Instant;

use arrange_rs::arrange::{
    Alignment, PackGroup, PlacementConfig, PlacementObjective, PlacementSolver, ProgressFn, StopFn,
};
use arrange_rs::entities::{Bed, PlacementItem};
use arrange_rs::geometry::primitives::{Point, Rect};
use itertools::Itertools;
use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use rand::SeedableRng;
use rand::prelude::SmallRng;
use thousands::Separable;

use crate::placer::search::{Candidate, SearchBudget, aligned_center, merged_pile, search};

pub mod feasibility;
pub mod search;

/// Seed of the PRNG, every run of the placer is reproducible
pub const PRNG_SEED: u64 = 0;

/// First Fit Placer: a reference [`PlacementSolver`].
///
/// Items are placed one by one, in order of descending area, on the first bed where a feasible position exists.
/// Positions are sampled around the items already on the bed and uniformly within the bed,
/// the candidate with the lowest cost according to the objective wins.
pub struct FirstFitPlacer {
    pub bed: Bed,
    pub min_distance: f64,
    pub config: PlacementConfig,
    progress: Option<ProgressFn>,
    stop: Option<StopFn>,
    /// SmallRng is a fast, non-cryptographic PRNG <https://rust-random.github.io/book/guide-rngs.html>
    rng: SmallRng,
    pub sample_counter: usize,
}

impl FirstFitPlacer {
    fn stop_requested(&self) -> bool {
        self.stop.as_ref().is_some_and(|stop| stop())
    }

    /// Starts a new placement phase on the bed holding `bin` and searches a position for `items[idx]`
    fn search_bin(
        &mut self,
        items: &[PlacementItem],
        bin: &[usize],
        remaining: &[usize],
        idx: usize,
        objective: &mut dyn PlacementObjective,
    ) -> Option<Candidate> {
        let placed = bin.iter().map(|&i| &items[i]).collect_vec();
        let remaining = remaining.iter().map(|&i| &items[i]).collect_vec();

        objective.begin_next_item(&merged_pile(&placed), &placed, &remaining);

        search(
            &items[idx],
            &placed,
            &self.bed,
            self.min_distance,
            &self.config,
            SearchBudget::from_accuracy(self.config.accuracy),
            &mut self.rng,
            &*objective,
            &mut self.sample_counter,
        )
    }

    /// Moves the movable items of `bin` as a whole, so their bounding box is aligned on the bed.
    /// The pile is left untouched if the move would push an item out of the bed.
    fn align_pile(&self, items: &mut [PlacementItem], bin: &[usize]) {
        let movable = bin
            .iter()
            .copied()
            .filter(|&i| !items[i].is_fixed())
            .collect_vec();
        let Some(pile_bbox) = movable
            .iter()
            .map(|&i| items[i].bbox())
            .reduce(Rect::bounding_rect)
        else {
            return;
        };

        let dims = (pile_bbox.width(), pile_bbox.height());
        let d = aligned_center(&self.bed, dims, self.config.alignment) - pile_bbox.centroid();

        let fits = movable.iter().all(|&i| {
            let mut buffer = items[i].clone();
            buffer.translate(d);
            self.bed.contains(buffer.transformed_shape())
        });
        match fits {
            true => movable.iter().for_each(|&i| items[i].translate(d)),
            false => debug!("[FFP] aligned pile would exceed the bed, left unaligned"),
        }
    }
}

impl PlacementSolver for FirstFitPlacer {
    fn new(bed: Bed, min_distance: f64) -> Self {
        Self {
            bed,
            min_distance,
            config: PlacementConfig::default(),
            progress: None,
            stop: None,
            rng: SmallRng::seed_from_u64(PRNG_SEED),
            sample_counter: 0,
        }
    }

    fn configure(&mut self, config: PlacementConfig) {
        debug_assert!(!config.rotations.is_empty());
        self.config = config;
    }

    fn progress_indicator(&mut self, progress: ProgressFn) {
        self.progress = Some(progress);
    }

    fn stop_condition(&mut self, stop: StopFn) {
        self.stop = Some(stop);
    }

    fn execute(
        &mut self,
        items: &mut [PlacementItem],
        objective: &mut dyn PlacementObjective,
    ) -> PackGroup {
        let start = Instant::now();

        //fixed items are obstacles on the first bed
        let fixed = (0..items.len()).filter(|&i| items[i].is_fixed()).collect_vec();
        let order = (0..items.len())
            .filter(|&i| !items[i].is_fixed())
            .sorted_by_key(|&i| Reverse(OrderedFloat(items[i].area())))
            .collect_vec();

        let mut bins: PackGroup = vec![fixed];
        let mut n_placed = 0;

        for (k, &idx) in order.iter().enumerate() {
            if self.stop_requested() {
                info!(
                    "[FFP] stop requested, {} items left unplaced",
                    order.len() - k
                );
                break;
            }
            let remaining = &order[k + 1..];

            let mut placement = None;
            for (bin_idx, bin) in bins.iter().enumerate() {
                if let Some(c) = self.search_bin(items, bin, remaining, idx, objective) {
                    placement = Some((bin_idx, c));
                    break;
                }
            }
            //no open bed fits the item, try a new one
            if placement.is_none() && bins.last().is_some_and(|bin| !bin.is_empty()) {
                placement = self
                    .search_bin(items, &[], remaining, idx, objective)
                    .map(|c| (bins.len(), c));
            }

            match placement {
                Some((bin_idx, Candidate {
                    rotation,
                    translation,
                    cost,
                })) => {
                    let item = &mut items[idx];
                    item.set_rotation(rotation);
                    item.set_translation(translation);
                    if bin_idx == bins.len() {
                        bins.push(vec![]);
                        debug!("[FFP] opened bed {bin_idx}");
                    }
                    bins[bin_idx].push(idx);
                    n_placed += 1;

                    let Point(x, y) = translation;
                    debug!(
                        "[FFP] placing item {}/{} with id {} on bed {bin_idx} at [{x:.3}, {y:.3}], cost: {cost:.5}",
                        n_placed,
                        order.len(),
                        item.id,
                    );
                    if let Some(progress) = &self.progress {
                        progress(order.len() - k - 1);
                    }
                }
                None => warn!(
                    "[FFP] item {} does not fit on an empty bed, skipped",
                    items[idx].id
                ),
            }
        }

        if self.config.alignment != Alignment::DontAlign {
            for bin in &bins {
                self.align_pile(items, bin);
            }
        }

        info!(
            "[FFP] placed {}/{} items over {} beds in {:.3}ms ({} samples)",
            n_placed,
            order.len(),
            bins.len(),
            start.elapsed().as_secs_f64() * 1000.0,
            self.sample_counter.separate_with_commas()
        );

        bins
    }
}
