use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entities::{Bed, PlacementItem};
use crate::geometry::primitives::SPolygon;

/// For each logical bed, the indices of the items that were placed on it, in placement order
pub type PackGroup = Vec<Vec<usize>>;

/// Called once per placed item with the number of items left to place
pub type ProgressFn = Arc<dyn Fn(usize) + Send + Sync>;

/// Polled between items, the solver stops as soon as it returns `true`
pub type StopFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// Where the pile (or the first item) is put on a bed
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Center,
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
    DontAlign,
}

/// Configuration handed to a [`PlacementSolver`]
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementConfig {
    /// Post-processing of the final pile on each bed
    pub alignment: Alignment,
    /// Where the first item on an empty bed is placed
    pub starting_point: Alignment,
    /// Rotations (in radians) to try for every item, on top of its own rotation
    pub rotations: Vec<f64>,
    /// Search effort, between 0.0 and 1.0
    pub accuracy: f64,
    /// Whether candidates may be evaluated in parallel
    pub parallel: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            alignment: Alignment::Center,
            starting_point: Alignment::Center,
            rotations: vec![0.0],
            accuracy: 0.65,
            parallel: true,
        }
    }
}

/// Ranks candidate placements for the solver.
///
/// [`begin_next_item`](PlacementObjective::begin_next_item) takes `&mut self`,
/// so it cannot overlap with any [`evaluate`](PlacementObjective::evaluate) call still in flight.
pub trait PlacementObjective: Sync {
    /// Called right before the solver starts searching positions for the next item on a bed.
    /// `merged_pile` holds the transformed shapes of `placed`.
    fn begin_next_item(
        &mut self,
        merged_pile: &[SPolygon],
        placed: &[&PlacementItem],
        remaining: &[&PlacementItem],
    );

    /// Cost of `item` at its current placement, lower is better
    fn evaluate(&self, item: &PlacementItem) -> f64;
}

/// Searches positions for items on one or more logical beds.
///
/// Items marked as fixed are obstacles on the first bed and are never moved.
/// Movable items get their final translation and rotation written in place.
pub trait PlacementSolver {
    fn new(bed: Bed, min_distance: f64) -> Self
    where
        Self: Sized;

    fn configure(&mut self, config: PlacementConfig);

    fn progress_indicator(&mut self, progress: ProgressFn);

    fn stop_condition(&mut self, stop: StopFn);

    fn execute(
        &mut self,
        items: &mut [PlacementItem],
        objective: &mut dyn PlacementObjective,
    ) -> PackGroup;
}
