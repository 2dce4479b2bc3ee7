mod bed;
mod bed_shape;
mod item;

#[doc(inline)]
pub use bed::Bed;

#[doc(inline)]
pub use bed::INFINITE_HALF_EXTENT;

#[doc(inline)]
pub use bed_shape::BedShapeHint;

#[doc(inline)]
pub use bed_shape::SCALED_EPSILON;

#[doc(inline)]
pub use item::PlacementItem;
