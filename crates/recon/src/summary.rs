use std::collections::HashMap;

use crate::model::{CorrectedZone, MatchOutcome, ReconSummary};

/// Compute summary statistics from the corrected layer.
pub fn compute_summary(zones: &[CorrectedZone]) -> ReconSummary {
    let mut bucket_counts: HashMap<String, usize> = HashMap::new();
    let mut replaced = 0;
    let mut retained_no_overlap = 0;
    let mut retained_degenerate = 0;
    let mut ties_flagged = 0;

    for zone in zones {
        *bucket_counts.entry(zone.outcome.to_string()).or_insert(0) += 1;

        match zone.outcome {
            MatchOutcome::Replaced => replaced += 1,
            MatchOutcome::RetainedNoOverlap => retained_no_overlap += 1,
            MatchOutcome::RetainedDegenerate => retained_degenerate += 1,
        }

        if zone.proof.as_ref().map_or(false, |p| p.ambiguous) {
            ties_flagged += 1;
        }
    }

    ReconSummary {
        total_zones: zones.len(),
        replaced,
        retained_no_overlap,
        retained_degenerate,
        ties_flagged,
        bucket_counts,
    }
}
