use geo::{BoundingRect, MultiPolygon};
use rstar::{RTree, RTreeObject, AABB};

/// Bounding box of one pool entry, tagged with its pool id. The tree only
/// prunes; the exact geometric predicate always runs on the survivors.
pub struct Envelope {
    pub id: usize,
    aabb: AABB<[f64; 2]>,
}

impl RTreeObject for Envelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

/// Build a bounding-box tree over a pool of geometries. Geometries without
/// an extent (empty multipolygons) are left out of the tree.
pub fn bbox_tree<'a>(geoms: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> RTree<Envelope> {
    let entries: Vec<Envelope> = geoms
        .into_iter()
        .enumerate()
        .filter_map(|(id, geom)| {
            geom.bounding_rect().map(|rect| Envelope {
                id,
                aabb: AABB::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                ),
            })
        })
        .collect();
    RTree::bulk_load(entries)
}

/// Ids of tree entries whose bounding box intersects `geom`'s, in ascending
/// pool order so callers scan deterministically.
pub fn overlapping_ids(tree: &RTree<Envelope>, geom: &MultiPolygon<f64>) -> Vec<usize> {
    let rect = match geom.bounding_rect() {
        Some(rect) => rect,
        None => return Vec::new(),
    };
    let aabb = AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);
    let mut ids: Vec<usize> = tree
        .locate_in_envelope_intersecting(&aabb)
        .map(|e| e.id)
        .collect();
    ids.sort_unstable();
    ids
}
