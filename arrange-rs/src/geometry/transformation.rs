use std::fmt::Display;

use ordered_float::NotNan;

use crate::geometry::primitives::Point;

/// Proper rigid transformation, decomposed into a rotation around the origin followed by a translation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Copy)]
pub struct Transformation {
    /// rotation in radians
    pub rotation: NotNan<f64>,
    /// translation in (x, y)
    pub translation: (NotNan<f64>, NotNan<f64>),
}

impl Transformation {
    pub fn new(rotation: f64, (tx, ty): (f64, f64)) -> Self {
        Transformation {
            rotation: NotNan::new(rotation).expect("rotation is NaN"),
            translation: (
                NotNan::new(tx).expect("tx is NaN"),
                NotNan::new(ty).expect("ty is NaN"),
            ),
        }
    }

    pub const fn empty() -> Self {
        const _0: NotNan<f64> = unsafe { NotNan::new_unchecked(0.0) };
        Transformation {
            rotation: _0,
            translation: (_0, _0),
        }
    }

    pub fn from_translation(translation: (f64, f64)) -> Self {
        Transformation::new(0.0, translation)
    }

    pub fn rotation(&self) -> f64 {
        self.rotation.into()
    }

    pub fn translation(&self) -> (f64, f64) {
        (self.translation.0.into(), self.translation.1.into())
    }

    /// Maps a point first through the rotation, then through the translation
    #[inline(always)]
    pub fn apply(&self, Point(x, y): Point) -> Point {
        let (tx, ty) = self.translation();
        match self.rotation() {
            r if r == 0.0 => Point(x + tx, y + ty),
            r => {
                let (sin, cos) = r.sin_cos();
                Point(cos * x - sin * y + tx, sin * x + cos * y + ty)
            }
        }
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Transformation::empty()
    }
}

impl Display for Transformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "r: {:.3}°, t: ({:.3}, {:.3})",
            self.rotation.to_degrees(),
            self.translation.0.into_inner(),
            self.translation.1.into_inner()
        )
    }
}
