use std::collections::BTreeSet;

use geo::BooleanOps;
use log::debug;

use crate::adjacency;
use crate::config::MergeConfig;
use crate::model::PoolEntry;

#[derive(Debug)]
pub struct MergeOutcome {
    /// The final round's batch of merged candidates. Earlier rounds are
    /// scaffolding; single units stay available through the caller's pool.
    pub candidates: Vec<PoolEntry>,
    pub rounds_completed: usize,
    pub cap_hit: bool,
}

/// Grow a pool of merged candidates out of the filtered single units.
/// `singles` must carry current neighbor lists (see `adjacency`).
///
/// Each round merges every touching pair exactly once, appends the batch
/// to the pool, renumbers ids positionally and recomputes adjacency from
/// scratch over the enlarged pool. Two rounds (the default depth) reach
/// shapes of up to four units; flood-filling whole connected clusters
/// instead would collapse the granularity the matcher needs for small
/// zones. If extending the pool would exceed `max_pool`, generation stops
/// early with `cap_hit` and the last completed batch is returned.
pub fn generate(singles: &[PoolEntry], config: &MergeConfig) -> MergeOutcome {
    let mut pool: Vec<PoolEntry> = singles.to_vec();
    let mut batch: Vec<PoolEntry> = Vec::new();
    let mut rounds_completed = 0;
    let mut cap_hit = false;

    for round in 0..config.depth {
        batch = merge_round(&pool);
        rounds_completed = round + 1;
        debug!(
            "merge round {rounds_completed}: {} candidates from pool of {}",
            batch.len(),
            pool.len()
        );

        if rounds_completed == config.depth {
            break;
        }
        if pool.len() + batch.len() > config.max_pool {
            debug!(
                "pool cap {} reached after round {rounds_completed}, stopping",
                config.max_pool
            );
            cap_hit = true;
            break;
        }

        pool.extend(batch.iter().cloned());
        adjacency::assign_neighbors(&mut pool);
    }

    MergeOutcome {
        candidates: batch,
        rounds_completed,
        cap_hit,
    }
}

/// One round of pairwise merges. The `n > id` rule is the sole
/// duplicate-avoidance mechanism: each unordered touching pair is emitted
/// exactly once and never in both directions. A merged candidate inherits
/// the union of its parents' neighbor sets minus the parents themselves,
/// so a merged shape never lists a part of itself as a neighbor.
fn merge_round(pool: &[PoolEntry]) -> Vec<PoolEntry> {
    let mut batch = Vec::new();

    for (id, entry) in pool.iter().enumerate() {
        for &n in &entry.neighbors {
            if n <= id {
                continue;
            }
            let other = &pool[n];

            let mut units: Vec<usize> =
                entry.units.iter().chain(other.units.iter()).copied().collect();
            units.sort_unstable();
            units.dedup();

            let inherited: BTreeSet<usize> = entry
                .neighbors
                .iter()
                .chain(other.neighbors.iter())
                .copied()
                .filter(|&m| m != id && m != n)
                .collect();

            batch.push(PoolEntry {
                geometry: entry.geometry.union(&other.geometry),
                units,
                neighbors: inherited.into_iter().collect(),
            });
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Area, MultiPolygon};

    fn square(x: f64, y: f64) -> MultiPolygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + 1.0, y: y),
            (x: x + 1.0, y: y + 1.0),
            (x: x, y: y + 1.0),
        ]
        .into()
    }

    fn singles(geoms: Vec<MultiPolygon<f64>>) -> Vec<PoolEntry> {
        let mut pool: Vec<PoolEntry> = geoms
            .into_iter()
            .enumerate()
            .map(|(i, g)| PoolEntry::unit(g, i))
            .collect();
        adjacency::assign_neighbors(&mut pool);
        pool
    }

    fn config(depth: usize, max_pool: usize) -> MergeConfig {
        MergeConfig { depth, max_pool }
    }

    #[test]
    fn adjacent_pair_merges_once() {
        let pool = singles(vec![square(0.0, 0.0), square(1.0, 0.0)]);
        let batch = merge_round(&pool);
        assert_eq!(batch.len(), 1, "one unordered pair, one candidate");
        assert_eq!(batch[0].units, vec![0, 1]);
        assert!((batch[0].geometry.unsigned_area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn no_duplicate_unordered_pairs_per_round() {
        let mut geoms = Vec::new();
        for y in 0..2 {
            for x in 0..3 {
                geoms.push(square(x as f64, y as f64));
            }
        }
        let pool = singles(geoms);
        let batch = merge_round(&pool);

        let mut seen = BTreeSet::new();
        for candidate in &batch {
            assert!(
                seen.insert(candidate.units.clone()),
                "pair {:?} emitted twice",
                candidate.units
            );
        }
    }

    #[test]
    fn inherited_neighbors_exclude_both_parents() {
        // three squares in a row: 0 - 1 - 2
        let pool = singles(vec![square(0.0, 0.0), square(1.0, 0.0), square(2.0, 0.0)]);
        let batch = merge_round(&pool);

        let pair01 = batch.iter().find(|c| c.units == vec![0, 1]).unwrap();
        assert_eq!(pair01.neighbors, vec![2]);
        let pair12 = batch.iter().find(|c| c.units == vec![1, 2]).unwrap();
        assert_eq!(pair12.neighbors, vec![0]);
    }

    #[test]
    fn isolated_entries_contribute_nothing() {
        let pool = singles(vec![square(0.0, 0.0), square(5.0, 5.0)]);
        let out = generate(&pool, &config(2, 10_000));
        assert!(out.candidates.is_empty());
        assert_eq!(out.rounds_completed, 2);
        assert!(!out.cap_hit);
    }

    #[test]
    fn empty_pool_yields_empty_rounds() {
        let out = generate(&[], &config(2, 10_000));
        assert!(out.candidates.is_empty());
        assert_eq!(out.rounds_completed, 2);
    }

    #[test]
    fn second_round_reaches_three_unit_shapes() {
        let pool = singles(vec![square(0.0, 0.0), square(1.0, 0.0), square(2.0, 0.0)]);
        let out = generate(&pool, &config(2, 10_000));

        let triple = out
            .candidates
            .iter()
            .find(|c| c.units == vec![0, 1, 2])
            .expect("depth 2 must produce the full row");
        assert!((triple.geometry.unsigned_area() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn final_batch_still_carries_plain_pairs() {
        // originals stay in the pool across rounds, so round 2 re-emits
        // their pairings alongside the larger shapes
        let pool = singles(vec![square(0.0, 0.0), square(1.0, 0.0), square(2.0, 0.0)]);
        let out = generate(&pool, &config(2, 10_000));
        assert!(out.candidates.iter().any(|c| c.units == vec![0, 1]));
    }

    #[test]
    fn pool_cap_stops_generation() {
        let pool = singles(vec![square(0.0, 0.0), square(1.0, 0.0), square(2.0, 0.0)]);
        // pool of 3 + first batch of 2 exceeds 4
        let out = generate(&pool, &config(3, 4));
        assert!(out.cap_hit);
        assert_eq!(out.rounds_completed, 1);
        assert_eq!(out.candidates.len(), 2);
    }

    #[test]
    fn depth_one_emits_pairs_only() {
        let pool = singles(vec![square(0.0, 0.0), square(1.0, 0.0), square(2.0, 0.0)]);
        let out = generate(&pool, &config(1, 10_000));
        assert_eq!(out.rounds_completed, 1);
        assert!(out.candidates.iter().all(|c| c.units.len() == 2));
    }
}
