use rstar::{AABB, RTree, RTreeObject};

use crate::geometry::primitives::Rect;

/// Entry of a [`SpatialIndex`]: the bounding box of an item together with its index
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexEntry {
    pub bbox: Rect,
    pub idx: usize,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        to_aabb(&self.bbox)
    }
}

/// R*-tree mapping bounding boxes to item indices.
///
/// During an arrangement phase the index is read-only, it is rebuilt as a whole at every synchronization point.
#[derive(Clone, Debug, Default)]
pub struct SpatialIndex {
    tree: RTree<IndexEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fresh index from a set of entries
    pub fn bulk_load(entries: Vec<IndexEntry>) -> Self {
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn insert(&mut self, bbox: Rect, idx: usize) {
        self.tree.insert(IndexEntry { bbox, idx });
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// All entries whose bounding box intersects `bbox`, touching included
    pub fn query_intersecting(&self, bbox: &Rect) -> impl Iterator<Item = &IndexEntry> {
        self.tree.locate_in_envelope_intersecting(&to_aabb(bbox))
    }

    /// Checks if any entry intersects `bbox`
    pub fn any_intersecting(&self, bbox: &Rect) -> bool {
        self.query_intersecting(bbox).next().is_some()
    }

    /// Bounding box of all entries, `None` if the index is empty
    pub fn bounds(&self) -> Option<Rect> {
        match self.is_empty() {
            true => None,
            false => {
                let env = self.tree.root().envelope();
                let ([x_min, y_min], [x_max, y_max]) = (env.lower(), env.upper());
                Some(Rect {
                    x_min,
                    y_min,
                    x_max,
                    y_max,
                })
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.tree.iter()
    }
}

fn to_aabb(r: &Rect) -> AABB<[f64; 2]> {
    AABB::from_corners([r.x_min, r.y_min], [r.x_max, r.y_max])
}
