use std::borrow::Borrow;

use anyhow::{Result, ensure};
use itertools::Itertools;

use crate::geometry::Transformation;
use crate::geometry::geo_enums::Winding;
use crate::geometry::geo_traits::{
    AlmostCollidesWith, CollidesWith, DistanceTo, Shape, Transformable, TransformableFrom,
};
use crate::geometry::primitives::{Edge, Point, Rect};
use crate::util::FPA;

/// Geometric primitive representing a simple polygon: <https://en.wikipedia.org/wiki/Simple_polygon>
///
/// The ring is stored open (the closing vertex is implied) and always oriented clockwise.
#[derive(Clone, Debug)]
pub struct SPolygon {
    /// Vertices of the polygon, in clockwise order
    pub vertices: Vec<Point>,
    /// Bounding box
    pub bbox: Rect,
    /// Unsigned area
    pub area: f64,
}

impl SPolygon {
    /// Creates a new simple polygon from a ring of points.
    /// A repeated closing vertex is dropped and counterclockwise rings are reversed.
    pub fn new(mut points: Vec<Point>) -> Result<Self> {
        points.dedup();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        ensure!(
            points.len() >= 3,
            "simple polygon must have at least 3 distinct points: {points:?}"
        );

        let area = match SPolygon::calculate_signed_area(&points) {
            area if area == 0.0 => anyhow::bail!("simple polygon has no area: {points:?}"),
            area if area > 0.0 => {
                //rings are kept clockwise (negative signed area)
                points.reverse();
                area
            }
            area => -area,
        };

        let bbox = SPolygon::generate_bounding_box(&points);

        Ok(SPolygon {
            vertices: points,
            bbox,
            area,
        })
    }

    pub fn vertex(&self, i: usize) -> Point {
        self.vertices[i]
    }

    pub fn edge(&self, i: usize) -> Edge {
        let j = (i + 1) % self.n_vertices();
        Edge {
            start: self.vertices[i],
            end: self.vertices[j],
        }
    }

    pub fn edge_iter(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.n_vertices()).map(move |i| self.edge(i))
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn generate_bounding_box(points: &[Point]) -> Rect {
        Rect::from_points(points).expect("bounding box of an empty set of points")
    }

    //https://en.wikipedia.org/wiki/Shoelace_formula
    //counterclockwise = positive area, clockwise = negative area
    pub fn calculate_signed_area(points: &[Point]) -> f64 {
        let mut sigma: f64 = 0.0;
        for i in 0..points.len() {
            //next point
            let j = (i + 1) % points.len();

            let (x_i, y_i) = points[i].into();
            let (x_j, y_j) = points[j].into();

            sigma += (y_i + y_j) * (x_i - x_j)
        }

        0.5 * sigma
    }

    pub fn winding(points: &[Point]) -> Winding {
        match SPolygon::calculate_signed_area(points) >= 0.0 {
            true => Winding::CounterClockwise,
            false => Winding::Clockwise,
        }
    }

    /// Checks whether `other` lies entirely within `self`, boundaries touching included.
    pub fn contains(&self, other: &SPolygon) -> bool {
        if !self.bbox.almost_collides_with(&other.bbox) {
            return false;
        }
        let all_vertices_inside = other
            .vertices
            .iter()
            .all(|p| self.collides_with(p) || self.on_boundary(p));

        all_vertices_inside && !self.edges_cross(other)
    }

    /// Checks if `point` lies on (or extremely close to) one of the edges
    fn on_boundary(&self, point: &Point) -> bool {
        self.edge_iter()
            .any(|e| FPA(e.distance_to(point)).is_zero())
    }

    /// Checks whether any edge of `self` properly crosses an edge of `other`.
    /// Edges that only share an endpoint or touch are ignored.
    fn edges_cross(&self, other: &SPolygon) -> bool {
        let orient = |a: Point, b: Point, c: Point| {
            let cross = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
            match FPA(cross).is_zero() {
                true => 0.0,
                false => cross.signum(),
            }
        };
        self.edge_iter()
            .cartesian_product(other.edge_iter().collect_vec())
            .any(|(e1, e2)| {
                let d1 = orient(e2.start, e2.end, e1.start);
                let d2 = orient(e2.start, e2.end, e1.end);
                let d3 = orient(e1.start, e1.end, e2.start);
                let d4 = orient(e1.start, e1.end, e2.end);
                d1 * d2 < 0.0 && d3 * d4 < 0.0
            })
    }
}

impl Shape for SPolygon {
    fn centroid(&self) -> Point {
        //based on: https://en.wikipedia.org/wiki/Centroid#Of_a_polygon
        let signed_area = SPolygon::calculate_signed_area(&self.vertices);
        let mut c_x = 0.0;
        let mut c_y = 0.0;

        for edge in self.edge_iter() {
            let Point(x_i, y_i) = edge.start;
            let Point(x_j, y_j) = edge.end;
            c_x += (x_i + x_j) * (x_i * y_j - x_j * y_i);
            c_y += (y_i + y_j) * (x_i * y_j - x_j * y_i);
        }

        c_x /= 6.0 * signed_area;
        c_y /= 6.0 * signed_area;

        Point(c_x, c_y)
    }

    fn area(&self) -> f64 {
        self.area
    }

    fn bbox(&self) -> Rect {
        self.bbox
    }
}

impl Transformable for SPolygon {
    fn transform(&mut self, t: &Transformation) -> &mut Self {
        //destructuring pattern to ensure that the code is updated when the struct changes
        let SPolygon {
            vertices,
            bbox,
            area: _,
        } = self;

        vertices.iter_mut().for_each(|p| {
            p.transform(t);
        });

        *bbox = SPolygon::generate_bounding_box(vertices);

        self
    }
}

impl TransformableFrom for SPolygon {
    fn transform_from(&mut self, reference: &Self, t: &Transformation) -> &mut Self {
        let SPolygon {
            vertices,
            bbox,
            area: _,
        } = self;

        for (p, ref_p) in vertices.iter_mut().zip(&reference.vertices) {
            p.transform_from(ref_p, t);
        }

        *bbox = SPolygon::generate_bounding_box(vertices);

        self
    }
}

impl CollidesWith<Point> for SPolygon {
    fn collides_with(&self, point: &Point) -> bool {
        //based on the ray casting algorithm: https://en.wikipedia.org/wiki/Point_in_polygon#Ray_casting_algorithm
        match self.bbox.collides_with(point) {
            false => false,
            true => {
                //horizontal ray shot to the right.
                //Starting from the point to another point that is certainly outside the shape
                let point_outside = Point(self.bbox.x_max + self.bbox.width(), point.1);
                let ray = Edge {
                    start: *point,
                    end: point_outside,
                };

                let mut n_intersections = 0;
                for edge in self.edge_iter() {
                    //Check if the ray does not go through (or almost through) a vertex
                    //This can result in funky behaviour, which could incorrect results
                    //Therefore we handle this case
                    let (s_x, s_y) = (FPA(edge.start.0), FPA(edge.start.1));
                    let (e_x, e_y) = (FPA(edge.end.0), FPA(edge.end.1));
                    let (p_x, p_y) = (FPA(point.0), FPA(point.1));

                    if (s_y == p_y && s_x > p_x) || (e_y == p_y && e_x > p_x) {
                        //in this case, the ray passes through (or dangerously close to) a vertex
                        //We handle this case by only counting an intersection if the edge is below the ray
                        if s_y < p_y || e_y < p_y {
                            n_intersections += 1;
                        }
                    } else if ray.collides_with(&edge) {
                        n_intersections += 1;
                    }
                }

                n_intersections % 2 == 1
            }
        }
    }
}

impl CollidesWith<SPolygon> for SPolygon {
    fn collides_with(&self, other: &SPolygon) -> bool {
        if !self.bbox.collides_with(&other.bbox) {
            return false;
        }
        let edges_intersect = self
            .edge_iter()
            .any(|e1| other.edge_iter().any(|e2| e1.collides_with(&e2)));

        //no intersecting edges, the only remaining possibility is full containment
        edges_intersect
            || self.collides_with(&other.vertices[0])
            || other.collides_with(&self.vertices[0])
    }
}

impl DistanceTo<Point> for SPolygon {
    fn distance_to(&self, point: &Point) -> f64 {
        self.sq_distance_to(point).sqrt()
    }

    fn sq_distance_to(&self, point: &Point) -> f64 {
        match self.collides_with(point) {
            true => 0.0,
            false => self
                .edge_iter()
                .map(|edge| edge.sq_distance_to(point))
                .fold(f64::INFINITY, f64::min),
        }
    }
}

impl DistanceTo<SPolygon> for SPolygon {
    fn distance_to(&self, other: &SPolygon) -> f64 {
        self.sq_distance_to(other).sqrt()
    }

    fn sq_distance_to(&self, other: &SPolygon) -> f64 {
        match self.collides_with(other) {
            true => 0.0,
            false => self
                .edge_iter()
                .cartesian_product(other.edge_iter().collect_vec())
                .map(|(e1, e2)| e1.sq_distance_to(&e2))
                .fold(f64::INFINITY, f64::min),
        }
    }
}

impl<T> From<T> for SPolygon
where
    T: Borrow<Rect>,
{
    fn from(r: T) -> Self {
        let r = r.borrow();
        debug_assert!(r.width() > 0.0 && r.height() > 0.0);
        let vertices = vec![
            Point(r.x_min, r.y_min),
            Point(r.x_min, r.y_max),
            Point(r.x_max, r.y_max),
            Point(r.x_max, r.y_min),
        ];
        SPolygon {
            vertices,
            bbox: *r,
            area: r.area(),
        }
    }
}
