use std::collections::HashMap;

use geo::MultiPolygon;
use serde::Serialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single normalized record from either boundary layer.
#[derive(Debug, Clone)]
pub struct ZoneRecord {
    pub record_id: String,
    pub attributes: HashMap<String, String>,
    pub geometry: MultiPolygon<f64>,
}

impl ZoneRecord {
    pub fn new(record_id: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        Self {
            record_id: record_id.into(),
            attributes: HashMap::new(),
            geometry,
        }
    }
}

/// Pre-loaded boundary layers. `base` is the older vintage whose zones are
/// corrected; `revision` is the newer vintage supplying candidate units.
pub struct ReconInput {
    pub base: Vec<ZoneRecord>,
    pub revision: Vec<ZoneRecord>,
}

// ---------------------------------------------------------------------------
// Candidate pool
// ---------------------------------------------------------------------------

/// One entry of the current candidate pool. Its id is its position in the
/// pool vector; ids and neighbor lists are reassigned whenever the pool is
/// rebuilt, so neither is a stable identity across merge rounds.
#[derive(Debug, Clone)]
pub struct PoolEntry {
    pub geometry: MultiPolygon<f64>,
    /// Revision-layer indices of the units composing this shape.
    pub units: Vec<usize>,
    /// Ids of pool entries whose boundary touches this one. Invariant:
    /// an entry never lists itself.
    pub neighbors: Vec<usize>,
}

impl PoolEntry {
    /// A single unmerged revision unit.
    pub fn unit(geometry: MultiPolygon<f64>, unit: usize) -> Self {
        Self {
            geometry,
            units: vec![unit],
            neighbors: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// How a matched geometry was selected, including an explicit ambiguity
/// flag when other pool entries tied the winning score.
#[derive(Debug, Clone, Serialize)]
pub struct MatchProof {
    pub strategy: String,
    pub score: f64,
    /// Record ids of the revision units composing the selected geometry.
    pub units: Vec<String>,
    pub ambiguous: bool,
    pub num_equivalent_solutions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tie_break_reason: Option<String>,
}

/// Matcher verdict for one base zone.
#[derive(Debug)]
pub enum MatchDecision {
    Replace {
        geometry: MultiPolygon<f64>,
        proof: MatchProof,
    },
    /// No candidate with positive overlap; the original geometry stands.
    RetainNoOverlap,
    /// The base zone has zero area and is never scored.
    RetainDegenerate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Replaced,
    RetainedNoOverlap,
    RetainedDegenerate,
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Replaced => write!(f, "replaced"),
            Self::RetainedNoOverlap => write!(f, "retained_no_overlap"),
            Self::RetainedDegenerate => write!(f, "retained_degenerate"),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One output record per base zone, attributes carried through verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectedZone {
    pub record_id: String,
    pub attributes: HashMap<String, String>,
    pub geometry: MultiPolygon<f64>,
    pub outcome: MatchOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<MatchProof>,
}

/// Candidate-pool diagnostics for a run.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    pub filtered_units: usize,
    pub rounds_completed: usize,
    pub candidates: usize,
    pub pool_size: usize,
    pub cap_hit: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub total_zones: usize,
    pub replaced: usize,
    pub retained_no_overlap: usize,
    pub retained_degenerate: usize,
    pub ties_flagged: usize,
    pub bucket_counts: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub strategy: String,
    pub merge_depth: usize,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub pool: PoolStats,
    pub summary: ReconSummary,
    pub zones: Vec<CorrectedZone>,
}

impl ReconResult {
    pub fn to_json(&self) -> Result<String, ReconError> {
        serde_json::to_string_pretty(self).map_err(|e| ReconError::Serialize(e.to_string()))
    }
}
