use std::collections::HashSet;

use itertools::Itertools;
use log::error;

use crate::arrange::{PackGroup, ScoringContext};
use crate::entities::PlacementItem;
use crate::geometry::geo_traits::{CollidesWith, DistanceTo};
use crate::geometry::primitives::Rect;
use crate::util::FPA;
//Various checks to verify correctness of the state of the system
//Used in debug_assertion!() blocks

pub fn scoring_context_is_consistent(ctx: &ScoringContext) -> bool {
    let placed = ctx.placed();
    if ctx.all_index().len() != placed.len() {
        error!(
            "all-items index holds {} entries, {} items placed",
            ctx.all_index().len(),
            placed.len()
        );
        return false;
    }
    let all_match = ctx
        .all_index()
        .iter()
        .all(|e| placed.get(e.idx).is_some_and(|p| p.bbox == e.bbox));
    let big_match = ctx
        .big_index()
        .iter()
        .all(|e| placed.get(e.idx).is_some_and(|p| p.bbox == e.bbox && ctx.is_big(p.area)));

    let pile_bbox = ctx
        .merged_pile()
        .iter()
        .map(|s| s.bbox)
        .reduce(Rect::bounding_rect);

    all_match && big_match && pile_bbox == ctx.pile_bbox()
}

/// Every item appears at most once, and fixed items never leave the first bed
pub fn pack_group_is_valid(pack_group: &PackGroup, items: &[PlacementItem]) -> bool {
    let mut seen = HashSet::new();
    for (bin_idx, group) in pack_group.iter().enumerate() {
        for &i in group {
            if i >= items.len() || !seen.insert(i) {
                error!("invalid or duplicate item index {i} in pack group");
                return false;
            }
            if bin_idx > 0 && items[i].is_fixed() {
                error!("fixed item {} assigned to bed {bin_idx}", items[i].id);
                return false;
            }
        }
    }
    true
}

/// No two items overlap and all of them keep at least `min_distance` from each other
pub fn items_are_separated(items: &[&PlacementItem], min_distance: f64) -> bool {
    items.iter().tuple_combinations().all(|(a, b)| {
        let (s_a, s_b) = (a.transformed_shape(), b.transformed_shape());
        if s_a.collides_with(s_b) {
            error!("items {} and {} collide", a.id, b.id);
            return false;
        }
        let dist = s_a.distance_to(s_b);
        if FPA(dist) < FPA(min_distance) {
            error!(
                "items {} and {} are too close: {dist} < {min_distance}",
                a.id, b.id
            );
            return false;
        }
        true
    })
}
