use ordered_float::OrderedFloat;

use crate::geometry::primitives::{Point, SPolygon};

/// Filters a set of points to only include those that are part of the convex hull.
/// The hull is returned in counterclockwise order, without repeating the first point.
pub fn convex_hull_from_points(mut points: Vec<Point>) -> Vec<Point> {
    //https://en.wikibooks.org/wiki/Algorithm_Implementation/Geometry/Convex_hull/Monotone_chain

    //sort the points lexicographically
    points.sort_by_key(|p| (OrderedFloat(p.0), OrderedFloat(p.1)));
    points.dedup();

    if points.len() < 3 {
        return points;
    }

    let mut lower_hull = points
        .iter()
        .fold(vec![], |hull, p| grow_convex_hull(hull, *p));
    let mut upper_hull = points
        .iter()
        .rev()
        .fold(vec![], |hull, p| grow_convex_hull(hull, *p));

    //First and last element of both hull parts are the same point
    upper_hull.pop();
    lower_hull.pop();

    lower_hull.append(&mut upper_hull);
    lower_hull
}

/// Convex hull of a collection of shapes, such as the merged pile of placed items
pub fn convex_hull_from_shapes<'a>(shapes: impl IntoIterator<Item = &'a SPolygon>) -> Vec<Point> {
    let points = shapes
        .into_iter()
        .flat_map(|s| s.vertices.iter().copied())
        .collect();
    convex_hull_from_points(points)
}

/// Length of the closed ring through `points`
pub fn ring_perimeter(points: &[Point]) -> f64 {
    match points.len() {
        0 | 1 => 0.0,
        n => (0..n)
            .map(|i| points[i].distance_to(&points[(i + 1) % n]))
            .sum(),
    }
}

fn grow_convex_hull(mut h: Vec<Point>, next: Point) -> Vec<Point> {
    //pop all points from the hull which will be made irrelevant due to the new point
    while h.len() >= 2 && cross(h[h.len() - 2], h[h.len() - 1], next) <= 0.0 {
        h.pop();
    }
    h.push(next);
    h
}

fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}
