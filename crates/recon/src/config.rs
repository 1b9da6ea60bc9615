use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Candidate-generation knobs. `depth` is the number of pairwise merge
/// rounds (2 reaches up to 4-unit shapes); `max_pool` caps pool growth so
/// pathological adjacency cannot make the matcher scan unbounded.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    #[serde(default = "default_depth")]
    pub depth: usize,
    #[serde(default = "default_max_pool")]
    pub max_pool: usize,
}

fn default_depth() -> usize {
    2
}

fn default_max_pool() -> usize {
    10_000
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            max_pool: default_max_pool(),
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_strategy")]
    pub strategy: MatchStrategy,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Best overlap per base zone, independently; one pool entry may be
    /// assigned to several zones.
    GreedyBestOverlap,
    /// Best overlap per base zone in input order; a pool entry already
    /// assigned is skipped for later zones.
    ExclusiveBestOverlap,
}

fn default_strategy() -> MatchStrategy {
    MatchStrategy::GreedyBestOverlap
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GreedyBestOverlap => write!(f, "greedy_best_overlap"),
            Self::ExclusiveBestOverlap => write!(f, "exclusive_best_overlap"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }

        if self.merge.depth == 0 {
            return Err(ReconError::ConfigValidation(
                "merge depth must be at least 1".into(),
            ));
        }

        if self.merge.max_pool == 0 {
            return Err(ReconError::ConfigValidation(
                "merge max_pool must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
