use log::info;

use crate::config::{MatchStrategy, ReconConfig};
use crate::error::ReconError;
use crate::model::{PoolStats, ReconInput, ReconMeta, ReconResult};
use crate::{adjacency, assemble, combine, filter, matcher, summary};

/// Run reconciliation per config. Returns the corrected base layer plus
/// summary and pool diagnostics.
///
/// The stages run strictly in sequence (filter, adjacency, candidate
/// generation, matching, assembly) since each consumes the complete,
/// renumbered output of the previous one.
pub fn run(config: &ReconConfig, input: &ReconInput) -> Result<ReconResult, ReconError> {
    config.validate()?;

    let mut pool = filter::filter_revision(&input.base, &input.revision);
    let filtered_units = pool.len();
    info!(
        "spatial filter: {filtered_units} of {} revision units intersect the base layer",
        input.revision.len()
    );

    adjacency::assign_neighbors(&mut pool);

    let merge = combine::generate(&pool, &config.merge);
    let candidates = merge.candidates.len();
    info!(
        "combination generator: {candidates} candidates after {} round(s){}",
        merge.rounds_completed,
        if merge.cap_hit { " (pool cap hit)" } else { "" }
    );

    // the matcher sees single units and final-round merges as one pool
    pool.extend(merge.candidates);
    let unit_ids: Vec<String> = input
        .revision
        .iter()
        .map(|z| z.record_id.clone())
        .collect();

    let decisions = match config.matching.strategy {
        MatchStrategy::GreedyBestOverlap => matcher::match_greedy(&input.base, &pool, &unit_ids),
        MatchStrategy::ExclusiveBestOverlap => {
            matcher::match_exclusive(&input.base, &pool, &unit_ids)
        }
    };

    let zones = assemble::assemble(&input.base, decisions);
    let summary = summary::compute_summary(&zones);
    info!(
        "matcher: {} of {} base zones replaced, {} tie(s) flagged",
        summary.replaced, summary.total_zones, summary.ties_flagged
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            strategy: config.matching.strategy.to_string(),
            merge_depth: config.merge.depth,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        pool: PoolStats {
            filtered_units,
            rounds_completed: merge.rounds_completed,
            candidates,
            pool_size: pool.len(),
            cap_hit: merge.cap_hit,
        },
        summary,
        zones,
    })
}
