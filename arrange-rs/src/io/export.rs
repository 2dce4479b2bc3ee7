use std::time::Duration;

use crate::io::ext_repr::{ExtPlacement, ExtSolution};
use crate::io::import::ArrangeObject;

/// Collects the placements reported to `objects` into an [`ExtSolution`]
pub fn export_solution(
    name: &str,
    success: bool,
    objects: &[ArrangeObject],
    run_time: Duration,
) -> ExtSolution {
    let (placements, unplaced) = objects.iter().fold(
        (vec![], vec![]),
        |(mut placements, mut unplaced), obj| {
            match obj.result {
                Some((offset, rotation)) => placements.push(ExtPlacement {
                    item_id: obj.id,
                    offset: offset.into(),
                    rotation,
                }),
                None => unplaced.push(obj.id),
            }
            (placements, unplaced)
        },
    );

    ExtSolution {
        name: name.to_string(),
        success,
        placements,
        unplaced,
        run_time_ms: run_time.as_millis() as u64,
    }
}
