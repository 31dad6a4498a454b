//! Trip plan scoring and ranking.
//!
//! Given the plans the backend proposes for one origin/destination query,
//! this module decides the order they are shown in:
//! plans that start on foot go last, simpler plans go first, and plans
//! departing together are compared on duration with a score to break
//! near-ties.

mod config;
mod rank;
mod score;
mod trip;

pub use config::{DEFAULT_LIMIT, RankConfig, ScoreConfig, ScoreWeights};
pub use rank::{deduplicate, rank_plans, top_n};
pub use score::{score, score_with};
pub use trip::{PlanSource, TripPlanner, TripResult, rank_records};
