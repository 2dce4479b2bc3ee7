mod arranger;
mod objective;
mod orchestrator;
mod scoring;
mod solver;
mod spatial_index;

#[doc(inline)]
pub use arranger::{ArrangeScorer, Arranger};

#[doc(inline)]
pub use objective::{Objective, fixed_overfit};

#[doc(inline)]
pub use orchestrator::{
    ArrangePolygon, Arrangeable, arrange, arrange_movable, arrange_with_config, stride_padding,
};

#[doc(inline)]
pub use scoring::{
    BIG_ITEM_THRESHOLD, ItemCase, PlacedSnapshot, Score, ScoringContext, big_item_score,
    classify_item, is_big, last_big_item_score, small_item_score,
};

#[doc(inline)]
pub use solver::{
    Alignment, PackGroup, PlacementConfig, PlacementObjective, PlacementSolver, ProgressFn, StopFn,
};

#[doc(inline)]
pub use spatial_index::{IndexEntry, SpatialIndex};
