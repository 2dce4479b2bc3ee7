use arrange_rs::geometry::primitives::{Point, Rect};
use itertools::Itertools;

/// Generates bounding box centers for an item of dimensions `(w, h)` sliding along the four sides of `obstacle`.
///
/// The item stays `gap` away from the obstacle's bounding box. Per side, `n_per_side` evenly spaced positions are
/// generated from corner to corner, together with the two positions where the item is flush with the side's ends.
pub fn contact_positions(obstacle: &Rect, (w, h): (f64, f64), gap: f64, n_per_side: usize) -> Vec<Point> {
    debug_assert!(n_per_side >= 2);
    let (hw, hh) = (w / 2.0, h / 2.0);

    //centers along the x- and y-axis from corner contact to corner contact, plus flush positions
    let x_slide = slide(obstacle.x_min - hw, obstacle.x_max + hw, n_per_side)
        .chain([obstacle.x_min + hw, obstacle.x_max - hw])
        .collect_vec();
    let y_slide = slide(obstacle.y_min - hh, obstacle.y_max + hh, n_per_side)
        .chain([obstacle.y_min + hh, obstacle.y_max - hh])
        .collect_vec();

    let left = obstacle.x_min - gap - hw;
    let right = obstacle.x_max + gap + hw;
    let below = obstacle.y_min - gap - hh;
    let above = obstacle.y_max + gap + hh;

    let vertical_sides = [left, right]
        .into_iter()
        .cartesian_product(y_slide.iter().copied())
        .map(|(x, y)| Point(x, y));
    let horizontal_sides = [below, above]
        .into_iter()
        .cartesian_product(x_slide.iter().copied())
        .map(|(y, x)| Point(x, y));

    vertical_sides.chain(horizontal_sides).collect()
}

fn slide(from: f64, to: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = (to - from) / (n - 1) as f64;
    (0..n).map(move |i| from + i as f64 * step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_keep_the_gap() {
        let obstacle = Rect::try_new(0.0, 0.0, 10.0, 10.0).unwrap();
        let positions = contact_positions(&obstacle, (2.0, 4.0), 0.5, 5);

        assert_eq!(positions.len(), 4 * (5 + 2));
        for p in positions {
            let bbox = Rect::centered_at(p, 2.0, 4.0);
            let dx = f64::max(obstacle.x_min - bbox.x_max, bbox.x_min - obstacle.x_max);
            let dy = f64::max(obstacle.y_min - bbox.y_max, bbox.y_min - obstacle.y_max);
            assert!(f64::max(dx, dy) >= 0.5 - 1e-9, "{p:?} too close");
        }
    }
}
