use serde::{Deserialize, Serialize};

/// External representation of an arrangement instance
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtInstance {
    /// Name of the instance
    pub name: String,
    /// The bed on which the items are arranged
    pub bed: ExtBed,
    /// Minimum distance between any two items
    #[serde(default)]
    pub min_distance: f64,
    /// The items to arrange, and the ones already fixed in place
    pub items: Vec<ExtItem>,
}

/// External representation of a bed
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum ExtBed {
    /// Outline of the bed, its shape is classified on import
    Outline(ExtSPolygon),
    /// Unbounded bed anchored at a center point
    Infinite { center: (f64, f64) },
}

/// External representation of an [`Arrangeable`](crate::arrange::Arrangeable) object
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtItem {
    /// Unique identifier of the item
    pub id: u64,
    /// Shape of the item, in its own coordinate system
    pub shape: ExtShape,
    /// Current translation of the item
    #[serde(default)]
    pub offset: (f64, f64),
    /// Current rotation of the item, in radians
    #[serde(default)]
    pub rotation: f64,
    /// Whether the item is already fixed on the bed and must be arranged around
    #[serde(default)]
    pub fixed: bool,
}

/// Various ways to represent a shape
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum ExtShape {
    /// Axis-aligned rectangle. With its left bottom corner at (x_min, y_min), a width and height
    Rectangle {
        x_min: f64,
        y_min: f64,
        width: f64,
        height: f64,
    },
    /// Polygon with a single outer boundary
    SimplePolygon(ExtSPolygon),
}

/// External representation of a [`SPolygon`](crate::geometry::primitives::SPolygon).
/// A polygon with no holes and no self-intersections, in any winding order.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtSPolygon(pub Vec<(f64, f64)>);

/// External representation of the result of an arrangement run
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtSolution {
    /// Name of the instance
    pub name: String,
    /// `false` if the run was stopped early
    pub success: bool,
    /// Placements of every movable item that was arranged
    pub placements: Vec<ExtPlacement>,
    /// Items that could not be placed
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub unplaced: Vec<u64>,
    /// Wall-clock duration of the run in milliseconds
    pub run_time_ms: u64,
}

/// Final placement of a single item
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtPlacement {
    /// The id of the item in the instance
    pub item_id: u64,
    /// Translation, including the offset of the logical bed the item ended up on
    pub offset: (f64, f64),
    /// The rotation angle in radians
    pub rotation: f64,
}
