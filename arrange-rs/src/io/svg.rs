use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{Context, Result, ensure};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle as SvgCircle, Group, Path, Title};

use crate::arrange::stride_padding;
use crate::entities::Bed;
use crate::geometry::Transformation;
use crate::geometry::geo_traits::Transformable;
use crate::geometry::primitives::{Point, Rect, SPolygon};
use crate::io::import::ArrangeObject;

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SvgDrawOptions {
    #[serde(default)]
    pub theme: SvgTheme,
    /// Draws the bounding box of every item
    #[serde(default)]
    pub bboxes: bool,
}

impl Default for SvgDrawOptions {
    fn default() -> Self {
        Self {
            theme: SvgTheme::default(),
            bboxes: false,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SvgTheme {
    pub stroke_width_multiplier: f64,
    pub bed_fill: Color,
    pub item_fill: Color,
    pub fixed_fill: Color,
}

impl Default for SvgTheme {
    fn default() -> Self {
        SvgTheme::EARTH_TONES
    }
}

impl SvgTheme {
    pub const EARTH_TONES: SvgTheme = SvgTheme {
        stroke_width_multiplier: 2.0,
        bed_fill: Color(0xCC, 0x82, 0x4A),
        item_fill: Color(0xFF, 0xC8, 0x79),
        fixed_fill: Color(0x8F, 0x8F, 0x8F),
    };

    pub const GRAY: SvgTheme = SvgTheme {
        stroke_width_multiplier: 2.5,
        bed_fill: Color(0xD3, 0xD3, 0xD3),
        item_fill: Color(0x7A, 0x7A, 0x7A),
        fixed_fill: Color(0x2D, 0x2D, 0x2D),
    };
}

/// RGB color, (de)serialized as a hex string such as `#CC824A`
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Color(pub u8, pub u8, pub u8);

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        ensure!(
            hex.len() == 6 && hex.is_ascii(),
            "invalid color: {s}, expected #RRGGBB"
        );
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).with_context(|| format!("invalid color: {s}"))
        };
        Ok(Color(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Draws the bed (repeated for every logical bed in use), the fixed objects and the placed movable objects.
/// Movable objects without a placement are left out.
pub fn arrangement_to_svg(
    bed: &Bed,
    movable: &[ArrangeObject],
    fixed: &[ArrangeObject],
    options: SvgDrawOptions,
) -> Result<Document> {
    let theme = &options.theme;

    let placed = movable
        .iter()
        .filter_map(|obj| obj.result.map(|(offset, rotation)| (obj, offset, rotation)))
        .map(|(obj, offset, rotation)| Ok((obj.id, placed_shape(obj, offset, rotation)?)))
        .collect::<Result<Vec<_>>>()?;
    let fixed = fixed
        .iter()
        .map(|obj| Ok((obj.id, placed_shape(obj, obj.offset, obj.rotation)?)))
        .collect::<Result<Vec<_>>>()?;

    let stride = stride_padding(bed.width());
    let n_beds = match (bed, stride > 0.0) {
        (Bed::Infinite { .. }, _) | (_, false) => 1,
        _ => {
            let x_min = bed.bbox().x_min;
            placed
                .iter()
                .map(|(_, s)| ((s.bbox.centroid().0 - x_min) / stride).floor().max(0.0) as usize + 1)
                .max()
                .unwrap_or(1)
        }
    };

    let beds_bbox = match bed {
        Bed::Infinite { .. } => None,
        _ => {
            let bbox = bed.bbox();
            Some(Rect {
                x_max: bbox.x_max + (n_beds - 1) as f64 * stride,
                ..bbox
            })
        }
    };
    let vbox = beds_bbox
        .into_iter()
        .chain(placed.iter().chain(fixed.iter()).map(|(_, s)| s.bbox))
        .reduce(Rect::bounding_rect)
        .map(|r| r.scale(1.05));
    let Some(vbox) = vbox else {
        warn!("nothing to draw, empty svg");
        return Ok(Document::new());
    };

    let stroke_width = f64::min(vbox.width(), vbox.height()) * 0.001 * theme.stroke_width_multiplier;

    let (bed_fill, item_fill, fixed_fill) = (
        theme.bed_fill.to_string(),
        theme.item_fill.to_string(),
        theme.fixed_fill.to_string(),
    );
    let sw = format!("{stroke_width}");
    let sw_2 = format!("{}", 2.0 * stroke_width);
    let dash = format!("{}", 5.0 * stroke_width);

    //draw beds
    let mut bed_group = Group::new().set("id", "beds");
    if !matches!(bed, Bed::Infinite { .. }) {
        let style = [
            ("fill", &*bed_fill),
            ("stroke", "black"),
            ("stroke-width", &*sw_2),
        ];
        for k in 0..n_beds {
            let t = Transformation::from_translation((k as f64 * stride, 0.0));
            let group = Group::new()
                .set("id", format!("bed_{k}"))
                .add(Title::new(format!("bed {k}: {bed}")));
            let group = match bed {
                Bed::Circle(c) => group.add(circle(t.apply(c.center), c.radius, &style)),
                Bed::Box(r) => group.add(data_to_path(
                    polygon_data(&SPolygon::from(r).transform_clone(&t)),
                    &style,
                )),
                Bed::Irregular(p) => {
                    group.add(data_to_path(polygon_data(&p.transform_clone(&t)), &style))
                }
                Bed::Infinite { .. } => group,
            };
            bed_group = bed_group.add(group);
        }
    }

    let mut fixed_group = Group::new().set("id", "fixed_items");
    for (id, shape) in &fixed {
        fixed_group = fixed_group.add(
            data_to_path(
                polygon_data(shape),
                &[
                    ("fill", &*fixed_fill),
                    ("stroke-width", &*sw),
                    ("stroke", "black"),
                    ("opacity", "0.9"),
                ],
            )
            .add(Title::new(format!("fixed item, id: {id}"))),
        );
    }

    let mut items_group = Group::new().set("id", "items");
    for (id, shape) in &placed {
        items_group = items_group.add(
            data_to_path(
                polygon_data(shape),
                &[
                    ("fill", &*item_fill),
                    ("stroke-width", &*sw),
                    ("stroke", "black"),
                    ("opacity", "0.9"),
                ],
            )
            .add(Title::new(format!("item, id: {id}"))),
        );
        if options.bboxes {
            items_group = items_group.add(data_to_path(
                polygon_data(&SPolygon::from(shape.bbox)),
                &[
                    ("fill", "none"),
                    ("stroke", "black"),
                    ("stroke-width", &*sw),
                    ("stroke-dasharray", &*dash),
                ],
            ));
        }
    }

    Ok(Document::new()
        .set(
            "viewBox",
            (vbox.x_min, vbox.y_min, vbox.width(), vbox.height()),
        )
        .add(bed_group)
        .add(fixed_group)
        .add(items_group))
}

fn placed_shape(obj: &ArrangeObject, offset: Point, rotation: f64) -> Result<SPolygon> {
    let shape = SPolygon::new(obj.contour.clone())?;
    Ok(shape.transform_clone(&Transformation::new(rotation, offset.into())))
}

pub fn polygon_data(s_poly: &SPolygon) -> Data {
    let mut data = Data::new().move_to::<(f64, f64)>(s_poly.vertex(0).into());
    for i in 1..s_poly.n_vertices() {
        data = data.line_to::<(f64, f64)>(s_poly.vertex(i).into());
    }
    data.close()
}

pub fn data_to_path(data: Data, params: &[(&str, &str)]) -> Path {
    let mut path = Path::new();
    for param in params {
        path = path.set(param.0, param.1)
    }
    path.set("d", data)
}

pub fn circle(center: Point, radius: f64, params: &[(&str, &str)]) -> SvgCircle {
    let mut circle = SvgCircle::new()
        .set("cx", center.0)
        .set("cy", center.1)
        .set("r", radius);
    for param in params {
        circle = circle.set(param.0, param.1)
    }
    circle
}
