use std::sync::Arc;

use crate::geometry::Transformation;
use crate::geometry::geo_traits::{Shape, TransformableFrom};
use crate::geometry::primitives::{Point, Rect, SPolygon};

/// Item taking part in an arrangement run.
///
/// Holds the raw contour together with its current placement (rotation followed by translation).
/// The transformed contour is cached and kept in sync with every change of placement.
#[derive(Clone, Debug)]
pub struct PlacementItem {
    pub id: usize,
    /// Contour in its own coordinate system, clockwise
    shape: Arc<SPolygon>,
    translation: Point,
    /// Rotation in radians
    rotation: f64,
    fixed: bool,
    /// Index of the external owner to report the final placement to.
    /// `None` for items which never report back, such as obstacles.
    owner: Option<usize>,
    transformed: SPolygon,
}

impl PlacementItem {
    pub fn new(id: usize, shape: SPolygon, translation: Point, rotation: f64) -> Self {
        let shape = Arc::new(shape);
        let transformed = shape.as_ref().clone();
        let mut item = PlacementItem {
            id,
            shape,
            translation,
            rotation,
            fixed: false,
            owner: None,
            transformed,
        };
        item.update_transformed();
        item
    }

    pub fn with_owner(mut self, owner: usize) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn shape(&self) -> &SPolygon {
        &self.shape
    }

    /// Contour with the current placement applied
    pub fn transformed_shape(&self) -> &SPolygon {
        &self.transformed
    }

    pub fn translation(&self) -> Point {
        self.translation
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn transformation(&self) -> Transformation {
        Transformation::new(self.rotation, self.translation.into())
    }

    pub fn set_translation(&mut self, translation: Point) {
        debug_assert!(!self.fixed, "fixed item {} cannot be moved", self.id);
        self.translation = translation;
        self.update_transformed();
    }

    pub fn translate(&mut self, d: Point) {
        self.set_translation(self.translation + d);
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        debug_assert!(!self.fixed, "fixed item {} cannot be rotated", self.id);
        self.rotation = rotation;
        self.update_transformed();
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Pins the item in place. There is no way back.
    pub fn mark_as_fixed(&mut self) {
        self.fixed = true;
    }

    pub fn owner(&self) -> Option<usize> {
        self.owner
    }

    /// Detaches the item from its owner, returning it
    pub fn release_owner(&mut self) -> Option<usize> {
        self.owner.take()
    }

    /// Bounding box of the transformed contour
    pub fn bbox(&self) -> Rect {
        self.transformed.bbox
    }

    pub fn area(&self) -> f64 {
        self.shape.area
    }

    pub fn center(&self) -> Point {
        self.bbox().centroid()
    }

    pub fn centroid(&self) -> Point {
        self.transformed.centroid()
    }

    fn update_transformed(&mut self) {
        let t = self.transformation();
        self.transformed.transform_from(&self.shape, &t);
    }
}
