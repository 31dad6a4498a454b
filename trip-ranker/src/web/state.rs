//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedTransitClient;
use crate::planner::{PlanSource, RankConfig, TripPlanner};

/// Shared application state.
///
/// Generic over the plan source so handlers can be exercised against
/// fixture data; the server uses the cached live client.
pub struct AppState<S: PlanSource = CachedTransitClient> {
    /// Trip planner over the plan source
    pub planner: Arc<TripPlanner<S>>,

    /// Ranking configuration for caller-supplied plans
    pub config: Arc<RankConfig>,
}

impl<S: PlanSource> AppState<S> {
    /// Create a new app state.
    pub fn new(source: S, config: RankConfig) -> Self {
        Self {
            planner: Arc::new(TripPlanner::new(source, config)),
            config: Arc::new(config),
        }
    }
}

// Manual impl: a derive would require `S: Clone`.
impl<S: PlanSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            planner: Arc::clone(&self.planner),
            config: Arc::clone(&self.config),
        }
    }
}
