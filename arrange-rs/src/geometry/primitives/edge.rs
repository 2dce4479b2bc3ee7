use crate::geometry::geo_traits::{CollidesWith, DistanceTo};
use crate::geometry::primitives::Point;

/// Line segment between two [`Point`]s
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

impl Edge {
    /// Returns the closest point which lies on the edge to the given point
    pub fn closest_point_on_edge(&self, point: &Point) -> Point {
        //from https://stackoverflow.com/a/6853926
        let Point(x1, y1) = self.start;
        let Point(x2, y2) = self.end;
        let Point(x, y) = point;

        let a = x - x1;
        let b = y - y1;
        let c = x2 - x1;
        let d = y2 - y1;

        let dot = a * c + b * d;
        let len_sq = c * c + d * d;
        let mut param = -1.0;
        if len_sq != 0.0 {
            param = dot / len_sq;
        }
        let (xx, yy) = match param {
            p if p < 0.0 => (x1, y1),              //start is the closest point
            p if p > 1.0 => (x2, y2),              //end is the closest point
            _ => (x1 + param * c, y1 + param * d), //closest point is on the edge
        };

        Point(xx, yy)
    }

    pub fn x_min(&self) -> f64 {
        f64::min(self.start.0, self.end.0)
    }

    pub fn y_min(&self) -> f64 {
        f64::min(self.start.1, self.end.1)
    }

    pub fn x_max(&self) -> f64 {
        f64::max(self.start.0, self.end.0)
    }

    pub fn y_max(&self) -> f64 {
        f64::max(self.start.1, self.end.1)
    }
}

impl DistanceTo<Point> for Edge {
    #[inline(always)]
    fn distance_to(&self, point: &Point) -> f64 {
        f64::sqrt(self.sq_distance_to(point))
    }

    #[inline(always)]
    fn sq_distance_to(&self, point: &Point) -> f64 {
        let Point(x, y) = point;
        let Point(xx, yy) = self.closest_point_on_edge(point);

        let (dx, dy) = (x - xx, y - yy);
        dx.powi(2) + dy.powi(2)
    }
}

impl DistanceTo<Edge> for Edge {
    fn distance_to(&self, other: &Edge) -> f64 {
        self.sq_distance_to(other).sqrt()
    }

    fn sq_distance_to(&self, other: &Edge) -> f64 {
        if self.collides_with(other) {
            return 0.0;
        }
        //without an intersection, the closest pair always involves an endpoint
        [
            self.sq_distance_to(&other.start),
            self.sq_distance_to(&other.end),
            other.sq_distance_to(&self.start),
            other.sq_distance_to(&self.end),
        ]
        .into_iter()
        .fold(f64::INFINITY, f64::min)
    }
}

impl CollidesWith<Edge> for Edge {
    #[inline(always)]
    fn collides_with(&self, other: &Edge) -> bool {
        edge_intersection(self, other)
    }
}

#[inline(always)]
fn edge_intersection(e1: &Edge, e2: &Edge) -> bool {
    if f64::max(e1.x_min(), e2.x_min()) > f64::min(e1.x_max(), e2.x_max())
        || f64::max(e1.y_min(), e2.y_min()) > f64::min(e1.y_max(), e2.y_max())
    {
        //bounding boxes do not overlap
        return false;
    }

    //based on: https://en.wikipedia.org/wiki/Line%E2%80%93line_intersection#Given_two_points_on_each_line_segment
    let Point(x1, y1) = e1.start;
    let Point(x2, y2) = e1.end;
    let Point(x3, y3) = e2.start;
    let Point(x4, y4) = e2.end;

    let t_nom = (x2 - x4) * (y4 - y3) - (y2 - y4) * (x4 - x3);
    let t_denom = (x2 - x1) * (y4 - y3) - (y2 - y1) * (x4 - x3);
    let u_nom = (x2 - x4) * (y2 - y1) - (y2 - y4) * (x2 - x1);
    let u_denom = (x2 - x1) * (y4 - y3) - (y2 - y1) * (x4 - x3);

    if t_denom == 0.0 || u_denom == 0.0 {
        //parallel edges
        false
    } else {
        let t = t_nom / t_denom;
        let u = u_nom / u_denom;
        (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
    }
}
