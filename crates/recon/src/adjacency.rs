use geo::Relate;
use rayon::prelude::*;

use crate::index;
use crate::model::PoolEntry;

/// Recompute neighbor lists over the whole pool. An entry's id is its
/// position; its neighbors are the ids of entries whose geometry touches
/// (boundary contact, interior-disjoint) its own. Self-comparison is
/// excluded, so `id` never appears in its own list.
///
/// Worst case is quadratic in pool size, the complexity driver of the
/// whole pipeline. The bounding-box tree prunes pairs that cannot touch, and
/// the outer loop runs in parallel with per-id results joined by index.
/// Pruned candidate ids are scanned in ascending order, so the lists come
/// out identical to a sequential full scan.
pub fn assign_neighbors(pool: &mut [PoolEntry]) {
    let lists: Vec<Vec<usize>> = {
        let entries: &[PoolEntry] = pool;
        let tree = index::bbox_tree(entries.iter().map(|e| &e.geometry));

        (0..entries.len())
            .into_par_iter()
            .map(|id| {
                index::overlapping_ids(&tree, &entries[id].geometry)
                    .into_iter()
                    .filter(|&other| other != id)
                    .filter(|&other| {
                        entries[id]
                            .geometry
                            .relate(&entries[other].geometry)
                            .is_touches()
                    })
                    .collect()
            })
            .collect()
    };

    for (entry, neighbors) in pool.iter_mut().zip(lists) {
        entry.neighbors = neighbors;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square(x: f64, y: f64) -> MultiPolygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + 1.0, y: y),
            (x: x + 1.0, y: y + 1.0),
            (x: x, y: y + 1.0),
        ]
        .into()
    }

    fn pool_of(geoms: Vec<MultiPolygon<f64>>) -> Vec<PoolEntry> {
        geoms
            .into_iter()
            .enumerate()
            .map(|(i, g)| PoolEntry::unit(g, i))
            .collect()
    }

    #[test]
    fn shared_edge_is_adjacency() {
        let mut pool = pool_of(vec![square(0.0, 0.0), square(1.0, 0.0)]);
        assign_neighbors(&mut pool);
        assert_eq!(pool[0].neighbors, vec![1]);
        assert_eq!(pool[1].neighbors, vec![0]);
    }

    #[test]
    fn overlap_is_not_adjacency() {
        let mut pool = pool_of(vec![square(0.0, 0.0), square(0.5, 0.0)]);
        assign_neighbors(&mut pool);
        assert!(pool[0].neighbors.is_empty());
        assert!(pool[1].neighbors.is_empty());
    }

    #[test]
    fn corner_contact_is_adjacency() {
        let mut pool = pool_of(vec![square(0.0, 0.0), square(1.0, 1.0)]);
        assign_neighbors(&mut pool);
        assert_eq!(pool[0].neighbors, vec![1]);
        assert_eq!(pool[1].neighbors, vec![0]);
    }

    #[test]
    fn never_self_adjacent_and_symmetric() {
        // 3x3 grid of unit squares
        let mut geoms = Vec::new();
        for y in 0..3 {
            for x in 0..3 {
                geoms.push(square(x as f64, y as f64));
            }
        }
        let mut pool = pool_of(geoms);
        assign_neighbors(&mut pool);

        for (id, entry) in pool.iter().enumerate() {
            assert!(!entry.neighbors.contains(&id), "entry {id} lists itself");
            for &n in &entry.neighbors {
                assert!(
                    pool[n].neighbors.contains(&id),
                    "adjacency {id} -> {n} is not mirrored"
                );
            }
        }

        // the center square touches all 8 others
        assert_eq!(pool[4].neighbors.len(), 8);
    }

    #[test]
    fn disjoint_pool_has_no_neighbors() {
        let mut pool = pool_of(vec![square(0.0, 0.0), square(5.0, 5.0), square(9.0, 0.0)]);
        assign_neighbors(&mut pool);
        assert!(pool.iter().all(|e| e.neighbors.is_empty()));
    }
}
