use arrange_rs::entities::Bed;
use arrange_rs::geometry::geo_traits::{CollidesWith, DistanceTo};
use arrange_rs::geometry::primitives::SPolygon;
use arrange_rs::util::FPA;

/// Checks whether `shape` is a valid placement: inside the bed and at least `min_distance` away from every shape of the pile.
pub fn is_feasible(bed: &Bed, shape: &SPolygon, pile: &[&SPolygon], min_distance: f64) -> bool {
    bed.contains(shape)
        && pile
            .iter()
            .all(|other| keeps_distance(shape, other, min_distance))
}

pub fn keeps_distance(shape: &SPolygon, other: &SPolygon, min_distance: f64) -> bool {
    //bounding boxes further apart than min_distance rule out any interaction
    let reach = shape
        .bbox
        .resize_by(min_distance, min_distance)
        .unwrap_or(shape.bbox);
    if !reach.collides_with(&other.bbox) {
        return true;
    }
    !shape.collides_with(other) && FPA(shape.distance_to(other)) >= FPA(min_distance)
}
