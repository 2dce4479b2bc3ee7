use crate::geometry::geo_traits::{AlmostCollidesWith, CollidesWith};
use crate::geometry::primitives::Point;
use crate::util::FPA;
use anyhow::Result;
use anyhow::ensure;

///Axis-aligned rectangle, used for bounding boxes and box beds
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    pub fn try_new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self> {
        ensure!(
            x_min <= x_max && y_min <= y_max,
            "invalid rectangle, x_min: {x_min}, x_max: {x_max}, y_min: {y_min}, y_max: {y_max}"
        );
        Ok(Rect {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Rectangle of the given dimensions, centered around `center`
    pub fn centered_at(center: Point, width: f64, height: f64) -> Self {
        debug_assert!(width >= 0.0 && height >= 0.0);
        let (hw, hh) = (width / 2.0, height / 2.0);
        Rect {
            x_min: center.0 - hw,
            y_min: center.1 - hh,
            x_max: center.0 + hw,
            y_max: center.1 + hh,
        }
    }

    /// Smallest rectangle containing all `points`, `None` if there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        points
            .into_iter()
            .map(|&Point(x, y)| Rect {
                x_min: x,
                y_min: y,
                x_max: x,
                y_max: y,
            })
            .reduce(Rect::bounding_rect)
    }

    /// Whether `other` lies within `self`, boundaries within floating point tolerance count as inside.
    #[inline(always)]
    pub fn almost_surrounds(&self, other: &Rect) -> bool {
        FPA(self.x_min) <= FPA(other.x_min)
            && FPA(self.y_min) <= FPA(other.y_min)
            && FPA(self.x_max) >= FPA(other.x_max)
            && FPA(self.y_max) >= FPA(other.y_max)
    }

    /// Same centroid, grown by `dx` on the left and right and by `dy` on the top and bottom.
    /// Negative values shrink it, `None` when nothing would be left.
    pub fn resize_by(mut self, dx: f64, dy: f64) -> Option<Self> {
        self.x_min -= dx;
        self.y_min -= dy;
        self.x_max += dx;
        self.y_max += dy;

        (self.x_min <= self.x_max && self.y_min <= self.y_max).then_some(self)
    }

    /// Same centroid, dimensions multiplied by `factor`
    pub fn scale(self, factor: f64) -> Self {
        debug_assert!(factor >= 0.0);
        Rect::centered_at(
            self.centroid(),
            self.width() * factor,
            self.height() * factor,
        )
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Smallest rectangle containing both `a` and `b`
    pub fn bounding_rect(a: Rect, b: Rect) -> Rect {
        Rect {
            x_min: f64::min(a.x_min, b.x_min),
            y_min: f64::min(a.y_min, b.y_min),
            x_max: f64::max(a.x_max, b.x_max),
            y_max: f64::max(a.y_max, b.y_max),
        }
    }

    pub fn centroid(&self) -> Point {
        Point(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

impl CollidesWith<Rect> for Rect {
    #[inline(always)]
    fn collides_with(&self, other: &Rect) -> bool {
        f64::max(self.x_min, other.x_min) <= f64::min(self.x_max, other.x_max)
            && f64::max(self.y_min, other.y_min) <= f64::min(self.y_max, other.y_max)
    }
}

impl AlmostCollidesWith<Rect> for Rect {
    #[inline(always)]
    fn almost_collides_with(&self, other: &Rect) -> bool {
        FPA(f64::max(self.x_min, other.x_min)) <= FPA(f64::min(self.x_max, other.x_max))
            && FPA(f64::max(self.y_min, other.y_min)) <= FPA(f64::min(self.y_max, other.y_max))
    }
}

impl CollidesWith<Point> for Rect {
    #[inline(always)]
    fn collides_with(&self, point: &Point) -> bool {
        let Point(x, y) = *point;
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}
