use anyhow::{Context, Result};
use itertools::Itertools;
use log::{debug, info};

use crate::arrange::{Arranger, PlacementSolver, ProgressFn, StopFn};
use crate::entities::{Bed, BedShapeHint, PlacementItem};
use crate::geometry::primitives::{Point, SPolygon};
use crate::util::{ArrangeConfig, assertions};

/// Contour and current placement of an [`Arrangeable`]
#[derive(Clone, Debug, PartialEq)]
pub struct ArrangePolygon {
    /// Outline in the object's own coordinate system, in any winding order
    pub contour: Vec<Point>,
    pub offset: Point,
    /// Rotation in radians
    pub rotation: f64,
}

/// An external object that can be arranged on a bed
pub trait Arrangeable {
    fn arrange_polygon(&self) -> ArrangePolygon;

    /// Receives the final placement. Called at most once per arrangement run.
    fn apply_arrange_result(&mut self, offset: Point, rotation: f64);
}

/// Horizontal distance between the origins of two successive logical beds of width `w`
pub fn stride_padding(w: f64) -> f64 {
    w + w / 5.0
}

/// Arranges `movable` around the already placed `fixed` objects, using the default [`ArrangeConfig`].
///
/// Returns `Ok(false)` when the stop condition was satisfied at the end of the run.
pub fn arrange<S, A, F>(
    movable: &mut [A],
    fixed: &[F],
    min_distance: f64,
    bed_hint: &BedShapeHint,
    progress: Option<ProgressFn>,
    stop: Option<StopFn>,
) -> Result<bool>
where
    S: PlacementSolver,
    A: Arrangeable,
    F: Arrangeable,
{
    arrange_with_config::<S, A, F>(
        movable,
        fixed,
        min_distance,
        bed_hint,
        &ArrangeConfig::default(),
        progress,
        stop,
    )
}

/// Arranges `movable` on an empty bed
pub fn arrange_movable<S, A>(
    movable: &mut [A],
    min_distance: f64,
    bed_hint: &BedShapeHint,
    progress: Option<ProgressFn>,
    stop: Option<StopFn>,
) -> Result<bool>
where
    S: PlacementSolver,
    A: Arrangeable,
{
    arrange::<S, A, A>(movable, &[], min_distance, bed_hint, progress, stop)
}

pub fn arrange_with_config<S, A, F>(
    movable: &mut [A],
    fixed: &[F],
    min_distance: f64,
    bed_hint: &BedShapeHint,
    config: &ArrangeConfig,
    progress: Option<ProgressFn>,
    stop: Option<StopFn>,
) -> Result<bool>
where
    S: PlacementSolver,
    A: Arrangeable,
    F: Arrangeable,
{
    let bed = Bed::from_hint(bed_hint).context("invalid bed outline")?;

    let mut items = movable
        .iter()
        .enumerate()
        .map(|(i, a)| to_placement_item(i, a).map(|item| item.with_owner(i)))
        .collect::<Result<Vec<_>>>()?;

    //fixed objects outside the bed are discarded
    let n_fixed = fixed.len();
    let mut fixed_items = fixed
        .iter()
        .enumerate()
        .map(|(i, f)| to_placement_item(items.len() + i, f))
        .filter_ok(|item| {
            let inside = bed.contains(item.transformed_shape());
            if !inside {
                debug!("[ARR] fixed item {} lies outside the bed, discarded", item.id);
            }
            inside
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        "[ARR] arranging {} items around {} fixed items ({} discarded) on {bed}",
        items.len(),
        fixed_items.len(),
        n_fixed - fixed_items.len()
    );

    let mut arranger = Arranger::<S>::new(bed.clone(), min_distance, config, progress, stop.clone());

    if !fixed_items.is_empty() {
        arranger.preload(&mut fixed_items);

        //try to put one item in the center, the solver does not do it when the bed is occupied
        let bed_center = bed.bbox().centroid();
        let seed = items.iter_mut().position(|item| {
            let d = bed_center - item.bbox().centroid();
            item.translate(d);
            !arranger.is_colliding(item)
        });
        if let Some(i) = seed {
            let mut seeded = items.remove(i);
            seeded.mark_as_fixed();
            if let Some(owner) = seeded.release_owner() {
                movable[owner].apply_arrange_result(seeded.translation(), seeded.rotation());
            }
            debug!("[ARR] item {} seeded at the bed center", seeded.id);
            //it remains on the bed as an obstacle
            fixed_items.push(seeded);
        }
    }

    let n_movable = items.len();
    items.extend(fixed_items);

    let pack_group = arranger.execute(&mut items);
    debug_assert!(assertions::pack_group_is_valid(&pack_group, &items));

    let stride = stride_padding(bed.width());
    let mut n_applied = 0;
    for (bin_idx, group) in pack_group.iter().enumerate() {
        for &i in group {
            let item = &items[i];
            if let Some(owner) = item.owner() {
                let Point(x, y) = item.translation();
                let offset = Point(x + bin_idx as f64 * stride, y);
                movable[owner].apply_arrange_result(offset, item.rotation());
                n_applied += 1;
            }
        }
    }

    info!(
        "[ARR] {}/{} movable items placed by the solver over {} beds",
        n_applied,
        n_movable,
        pack_group.len()
    );

    let stopped = stop.is_some_and(|stop| stop());
    Ok(!stopped)
}

/// Converts an external object into a [`PlacementItem`]: clockwise, implicitly closed contour at its current placement
fn to_placement_item<A: Arrangeable>(id: usize, a: &A) -> Result<PlacementItem> {
    let ArrangePolygon {
        contour,
        offset,
        rotation,
    } = a.arrange_polygon();
    let shape = SPolygon::new(contour).with_context(|| format!("invalid contour for item {id}"))?;
    Ok(PlacementItem::new(id, shape, offset, rotation))
}
