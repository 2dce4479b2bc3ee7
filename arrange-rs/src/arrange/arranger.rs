use log::debug;

use crate::arrange::{
    Alignment, Objective, PackGroup, PlacementConfig, PlacementObjective, PlacementSolver,
    ProgressFn, ScoringContext, StopFn,
};
use crate::entities::{Bed, PlacementItem};
use crate::geometry::primitives::SPolygon;
use crate::util::ArrangeConfig;

/// The scoring side of an arrangement: the shared context and the bed specific objective
#[derive(Clone, Debug)]
pub struct ArrangeScorer {
    pub ctx: ScoringContext,
    pub objective: Objective,
}

impl PlacementObjective for ArrangeScorer {
    fn begin_next_item(
        &mut self,
        merged_pile: &[SPolygon],
        placed: &[&PlacementItem],
        remaining: &[&PlacementItem],
    ) {
        self.ctx.begin_next_item(merged_pile, placed, remaining);
    }

    fn evaluate(&self, item: &PlacementItem) -> f64 {
        self.objective.evaluate(&self.ctx, item)
    }
}

/// Binds a [`PlacementSolver`] to a bed and feeds it the arrangement objective
pub struct Arranger<S: PlacementSolver> {
    solver: S,
    bed: Bed,
    config: PlacementConfig,
    scorer: ArrangeScorer,
}

impl<S: PlacementSolver> Arranger<S> {
    pub fn new(
        bed: Bed,
        min_distance: f64,
        arrange_config: &ArrangeConfig,
        progress: Option<ProgressFn>,
        stop: Option<StopFn>,
    ) -> Self {
        let config = PlacementConfig {
            alignment: arrange_config.alignment,
            starting_point: Alignment::Center,
            rotations: vec![0.0],
            accuracy: arrange_config.accuracy,
            parallel: arrange_config.parallel,
        };
        let scorer = ArrangeScorer {
            ctx: ScoringContext::new(&bed),
            objective: Objective::for_bed(&bed),
        };

        let mut solver = S::new(bed.clone(), min_distance);
        if let Some(progress) = progress {
            solver.progress_indicator(progress);
        }
        if let Some(stop) = stop {
            solver.stop_condition(stop);
        }
        solver.configure(config.clone());

        Self {
            solver,
            bed,
            config,
            scorer,
        }
    }

    /// Seeds the arrangement with fixed obstacles.
    /// Disables the alignment of the pile and switches to the fixed overfit objective.
    pub fn preload(&mut self, fixed: &mut [PlacementItem]) {
        self.config.alignment = Alignment::DontAlign;
        self.scorer.objective = Objective::fixed_overfit(&self.bed);

        fixed.iter_mut().for_each(|item| item.mark_as_fixed());
        self.scorer.ctx.preload(fixed);

        self.solver.configure(self.config.clone());
        debug!("[ARR] preloaded {} fixed items", fixed.len());
    }

    /// Cheap pre-check: does the bounding box of `item` intersect with any preloaded item
    pub fn is_colliding(&self, item: &PlacementItem) -> bool {
        self.scorer.ctx.is_colliding(item)
    }

    pub fn execute(&mut self, items: &mut [PlacementItem]) -> PackGroup {
        self.solver.execute(items, &mut self.scorer)
    }

    pub fn bed(&self) -> &Bed {
        &self.bed
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn scorer(&self) -> &ArrangeScorer {
        &self.scorer
    }
}
