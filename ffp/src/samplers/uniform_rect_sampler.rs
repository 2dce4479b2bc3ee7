use arrange_rs::geometry::primitives::{Point, Rect};
use rand::Rng;
use rand::distr::{Distribution, Uniform};

/// Samples points from a uniform distribution over a given [`Rect`], borders included.
pub struct UniformRectSampler {
    pub bbox: Rect,
    x_distr: Uniform<f64>,
    y_distr: Uniform<f64>,
}

impl UniformRectSampler {
    /// Returns `None` if `bbox` is not a valid sampling region
    pub fn new(bbox: Rect) -> Option<Self> {
        let x_distr = Uniform::new_inclusive(bbox.x_min, bbox.x_max).ok()?;
        let y_distr = Uniform::new_inclusive(bbox.y_min, bbox.y_max).ok()?;
        Some(Self {
            bbox,
            x_distr,
            y_distr,
        })
    }

    pub fn sample(&self, rng: &mut impl Rng) -> Point {
        Point(self.x_distr.sample(rng), self.y_distr.sample(rng))
    }
}
