use anyhow::{Result, ensure};
use itertools::Itertools;

use crate::arrange::{ArrangePolygon, Arrangeable};
use crate::entities::BedShapeHint;
use crate::geometry::primitives::Point;
use crate::io::ext_repr::{ExtBed, ExtInstance, ExtItem, ExtSPolygon, ExtShape};

/// In-memory [`Arrangeable`] object, created from an [`ExtItem`].
/// Stores the placement it receives from the arrangement.
#[derive(Clone, Debug)]
pub struct ArrangeObject {
    pub id: u64,
    pub contour: Vec<Point>,
    pub offset: Point,
    pub rotation: f64,
    /// Final placement, `None` until the arrangement reports it
    pub result: Option<(Point, f64)>,
}

impl ArrangeObject {
    pub fn new(id: u64, contour: Vec<Point>, offset: Point, rotation: f64) -> Self {
        Self {
            id,
            contour,
            offset,
            rotation,
            result: None,
        }
    }
}

impl Arrangeable for ArrangeObject {
    fn arrange_polygon(&self) -> ArrangePolygon {
        ArrangePolygon {
            contour: self.contour.clone(),
            offset: self.offset,
            rotation: self.rotation,
        }
    }

    fn apply_arrange_result(&mut self, offset: Point, rotation: f64) {
        debug_assert!(self.result.is_none(), "item {} placed twice", self.id);
        self.result = Some((offset, rotation));
    }
}

/// An [`ExtInstance`] converted into arrangement inputs
#[derive(Clone, Debug)]
pub struct Instance {
    pub name: String,
    pub bed_hint: BedShapeHint,
    pub min_distance: f64,
    pub movable: Vec<ArrangeObject>,
    pub fixed: Vec<ArrangeObject>,
}

pub fn import_instance(ext_instance: &ExtInstance) -> Result<Instance> {
    ensure!(
        ext_instance.min_distance >= 0.0,
        "negative minimum distance: {}",
        ext_instance.min_distance
    );
    let bed_hint = import_bed(&ext_instance.bed)?;

    let (fixed, movable): (Vec<_>, Vec<_>) = ext_instance
        .items
        .iter()
        .map(|ext_item| import_item(ext_item).map(|obj| (ext_item.fixed, obj)))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .partition_map(|(is_fixed, obj)| match is_fixed {
            true => itertools::Either::Left(obj),
            false => itertools::Either::Right(obj),
        });

    Ok(Instance {
        name: ext_instance.name.clone(),
        bed_hint,
        min_distance: ext_instance.min_distance,
        movable,
        fixed,
    })
}

pub fn import_bed(ext_bed: &ExtBed) -> Result<BedShapeHint> {
    match ext_bed {
        ExtBed::Outline(outline) => {
            let points = import_points(outline)?;
            Ok(BedShapeHint::from_outline(&points))
        }
        ExtBed::Infinite { center } => Ok(BedShapeHint::Infinite {
            center: Point::from(*center),
        }),
    }
}

pub fn import_item(ext_item: &ExtItem) -> Result<ArrangeObject> {
    let contour = match &ext_item.shape {
        ExtShape::Rectangle {
            x_min,
            y_min,
            width,
            height,
        } => {
            ensure!(
                *width > 0.0 && *height > 0.0,
                "item {} has a degenerate rectangle: {width}x{height}",
                ext_item.id
            );
            vec![
                Point(*x_min, *y_min),
                Point(x_min + width, *y_min),
                Point(x_min + width, y_min + height),
                Point(*x_min, y_min + height),
            ]
        }
        ExtShape::SimplePolygon(esp) => import_points(esp)?,
    };
    Ok(ArrangeObject::new(
        ext_item.id,
        contour,
        Point::from(ext_item.offset),
        ext_item.rotation,
    ))
}

fn import_points(esp: &ExtSPolygon) -> Result<Vec<Point>> {
    let points = esp.0.iter().map(|&p| Point::from(p)).collect_vec();
    ensure!(
        points.iter().all(|p| p.0.is_finite() && p.1.is_finite()),
        "polygon contains non-finite coordinates"
    );
    ensure!(points.len() >= 3, "polygon needs at least 3 points, got {}", points.len());
    Ok(points)
}
