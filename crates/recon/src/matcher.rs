use geo::{Area, BooleanOps, MultiPolygon};
use rayon::prelude::*;

use crate::index;
use crate::model::{MatchDecision, MatchProof, PoolEntry, ZoneRecord};

/// Area-overlap (Dice) coefficient: `2·area(A∩B) / (area(A) + area(B))`.
/// 1.0 iff the polygons are areally identical and fully coincident, 0.0 if
/// they are disjoint or either has zero area.
pub fn dice_coefficient(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> f64 {
    let denominator = a.unsigned_area() + b.unsigned_area();
    if denominator == 0.0 {
        return 0.0;
    }
    2.0 * a.intersection(b).unsigned_area() / denominator
}

/// Best overlap per base zone, each zone decided independently; the same
/// pool entry may serve several zones. Zones are scanned in parallel;
/// results are joined by index, so the output order is the input order.
pub fn match_greedy(
    base: &[ZoneRecord],
    pool: &[PoolEntry],
    unit_ids: &[String],
) -> Vec<MatchDecision> {
    let tree = index::bbox_tree(pool.iter().map(|e| &e.geometry));

    base.par_iter()
        .map(|zone| {
            if zone.geometry.unsigned_area() == 0.0 {
                return MatchDecision::RetainDegenerate;
            }
            let candidates = index::overlapping_ids(&tree, &zone.geometry);
            let scan = scan_pool(&zone.geometry, pool, &candidates, |_| false);
            match scan.best {
                Some(id) => replace(pool, id, &scan, "greedy_best_overlap", unit_ids),
                None => MatchDecision::RetainNoOverlap,
            }
        })
        .collect()
}

/// Best overlap per base zone in input order, consuming the winning pool
/// entry so later zones cannot claim it again. Sequential by nature: the
/// consumption state threads through the scan.
pub fn match_exclusive(
    base: &[ZoneRecord],
    pool: &[PoolEntry],
    unit_ids: &[String],
) -> Vec<MatchDecision> {
    let tree = index::bbox_tree(pool.iter().map(|e| &e.geometry));
    let mut taken = vec![false; pool.len()];

    base.iter()
        .map(|zone| {
            if zone.geometry.unsigned_area() == 0.0 {
                return MatchDecision::RetainDegenerate;
            }
            let candidates = index::overlapping_ids(&tree, &zone.geometry);
            let scan = scan_pool(&zone.geometry, pool, &candidates, |id| taken[id]);
            match scan.best {
                Some(id) => {
                    taken[id] = true;
                    replace(pool, id, &scan, "exclusive_best_overlap", unit_ids)
                }
                None => MatchDecision::RetainNoOverlap,
            }
        })
        .collect()
}

struct Scan {
    best: Option<usize>,
    score: f64,
    num_equivalent: usize,
}

/// Scan `candidates` (ascending pool ids, i.e. pool insertion order) and
/// keep the highest-scoring entry with a strict greater-than update: a
/// later candidate tying the incumbent never replaces it, which keeps the
/// result deterministic but order-dependent. Ties at the winning score are
/// counted instead of silently resolved. Zero-area entries are skipped,
/// never scored, and a best score must beat the zero baseline: no
/// positive overlap anywhere leaves `best` empty.
fn scan_pool(
    zone: &MultiPolygon<f64>,
    pool: &[PoolEntry],
    candidates: &[usize],
    skip: impl Fn(usize) -> bool,
) -> Scan {
    let mut best: Option<usize> = None;
    let mut score = 0.0;
    let mut num_equivalent = 0;

    for &id in candidates {
        if skip(id) {
            continue;
        }
        let entry = &pool[id];
        if entry.geometry.unsigned_area() == 0.0 {
            continue;
        }
        let candidate_score = dice_coefficient(zone, &entry.geometry);
        if candidate_score > score {
            best = Some(id);
            score = candidate_score;
            num_equivalent = 1;
        } else if best.is_some() && candidate_score == score {
            num_equivalent += 1;
        }
    }

    Scan {
        best,
        score,
        num_equivalent,
    }
}

fn replace(
    pool: &[PoolEntry],
    id: usize,
    scan: &Scan,
    strategy: &str,
    unit_ids: &[String],
) -> MatchDecision {
    let entry = &pool[id];
    let ambiguous = scan.num_equivalent > 1;
    MatchDecision::Replace {
        geometry: entry.geometry.clone(),
        proof: MatchProof {
            strategy: strategy.to_string(),
            score: scan.score,
            units: entry.units.iter().map(|&u| unit_ids[u].clone()).collect(),
            ambiguous,
            num_equivalent_solutions: scan.num_equivalent,
            tie_break_reason: ambiguous.then(|| "pool_insertion_order".to_string()),
        },
    }
}
