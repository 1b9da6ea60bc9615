use crate::model::{CorrectedZone, MatchDecision, MatchOutcome, ZoneRecord};

/// Rebuild the base layer with the matcher's decisions applied: strictly
/// one output record per input record, same order, attributes copied
/// verbatim, only the geometry swapped.
pub fn assemble(base: &[ZoneRecord], decisions: Vec<MatchDecision>) -> Vec<CorrectedZone> {
    debug_assert_eq!(base.len(), decisions.len());

    base.iter()
        .zip(decisions)
        .map(|(record, decision)| {
            let (geometry, outcome, proof) = match decision {
                MatchDecision::Replace { geometry, proof } => {
                    (geometry, MatchOutcome::Replaced, Some(proof))
                }
                MatchDecision::RetainNoOverlap => (
                    record.geometry.clone(),
                    MatchOutcome::RetainedNoOverlap,
                    None,
                ),
                MatchDecision::RetainDegenerate => (
                    record.geometry.clone(),
                    MatchOutcome::RetainedDegenerate,
                    None,
                ),
            };
            CorrectedZone {
                record_id: record.record_id.clone(),
                attributes: record.attributes.clone(),
                geometry,
                outcome,
                proof,
            }
        })
        .collect()
}
