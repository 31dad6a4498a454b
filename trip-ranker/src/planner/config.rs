//! Scoring and ranking configuration.

/// Default number of plans returned by the ranker.
pub const DEFAULT_LIMIT: usize = 5;

/// Relative weights of the score factors.
///
/// The defaults sum to 1.0. Scores are not renormalized per plan, so
/// custom weights that do not sum to 1.0 simply scale the score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub duration: f64,
    pub transfers: f64,
    pub walking: f64,
    pub waiting: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            duration: 0.45,
            transfers: 0.25,
            walking: 0.20,
            waiting: 0.10,
        }
    }
}

/// Configuration for plan scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreConfig {
    /// Total duration that counts as a factor of 1.0 (minutes).
    pub duration_scale_mins: f64,

    /// Transfer count that counts as a factor of 1.0.
    pub transfer_scale: f64,

    /// Walking time that counts as a factor of 1.0 (minutes).
    pub walking_scale_mins: f64,

    /// Waiting time that counts as a factor of 1.0 (minutes).
    pub waiting_scale_mins: f64,

    pub weights: ScoreWeights,

    /// Walking beyond this many minutes is penalized.
    pub walking_penalty_threshold_mins: f64,

    /// Minutes of excess walking per unit of penalty.
    pub walking_penalty_step_mins: f64,

    /// Score multiplier for one full unit of excess walking.
    pub walking_penalty_factor: f64,

    /// Transfers beyond this count are penalized.
    pub transfer_penalty_threshold: usize,

    /// Multiplier for two excess transfers.
    pub transfer_penalty_factor: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            duration_scale_mins: 90.0,
            transfer_scale: 3.0,
            walking_scale_mins: 20.0,
            waiting_scale_mins: 15.0,
            weights: ScoreWeights::default(),
            walking_penalty_threshold_mins: 12.0,
            walking_penalty_step_mins: 10.0,
            walking_penalty_factor: 1.5,
            transfer_penalty_threshold: 2,
            transfer_penalty_factor: 1.4,
        }
    }
}

/// Configuration for plan ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankConfig {
    /// Maximum number of plans to return.
    pub limit: usize,

    /// Plans departing within this many seconds of the previous plan share
    /// a departure cluster.
    pub cluster_window_secs: i64,

    /// Within a cluster, plans whose total durations differ by at most this
    /// many seconds are ordered by score instead of duration.
    pub tie_window_secs: i64,

    /// Drop structurally identical plans before ranking.
    pub deduplicate: bool,

    pub score: ScoreConfig,
}

impl RankConfig {
    /// Create a configuration with the given limit and default windows.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            cluster_window_secs: 60,
            tie_window_secs: 60,
            deduplicate: true,
            score: ScoreConfig::default(),
        }
    }
}
