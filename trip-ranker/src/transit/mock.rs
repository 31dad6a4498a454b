//! Mock trip-planner source for testing without API access.
//!
//! Loads saved trip-planner responses from JSON files and serves their
//! plans as if they were live API responses.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::planner::PlanSource;

use super::error::TransitError;
use super::query::TripQuery;
use super::types::TripPlannerResponse;

/// Mock source that serves fixture plans.
///
/// Every query receives the same plans; the fixtures stand in for whatever
/// the backend would have returned.
#[derive(Clone)]
pub struct MockTransitClient {
    plans: Arc<RwLock<Vec<serde_json::Value>>>,
}

impl MockTransitClient {
    /// Create a mock by loading every `*.json` response in a directory.
    ///
    /// Files are read in name order and their plans concatenated.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, TransitError> {
        let plans = load_dir(data_dir.as_ref())?;
        Ok(Self::from_plans(plans))
    }

    /// Create a mock serving the given raw plans.
    pub fn from_plans(plans: Vec<serde_json::Value>) -> Self {
        Self {
            plans: Arc::new(RwLock::new(plans)),
        }
    }

    /// Get raw plans for a trip.
    ///
    /// Mimics `TransitClient::get_trip_plans`; the query is ignored.
    pub async fn get_trip_plans(
        &self,
        query: &TripQuery,
    ) -> Result<Vec<serde_json::Value>, TransitError> {
        let plans = self.plans.read().await;

        if plans.is_empty() {
            return Err(TransitError::NotFound(format!(
                "no mock plans for {} -> {}",
                query.origin, query.destination
            )));
        }

        Ok(plans.clone())
    }

    /// Number of fixture plans loaded.
    pub async fn plan_count(&self) -> usize {
        self.plans.read().await.len()
    }

    /// Reload fixture data from disk (useful for development).
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<(), TransitError> {
        let fresh = load_dir(data_dir.as_ref())?;
        *self.plans.write().await = fresh;
        Ok(())
    }
}

impl PlanSource for MockTransitClient {
    async fn fetch_plans(&self, query: &TripQuery) -> Result<Vec<serde_json::Value>, TransitError> {
        self.get_trip_plans(query).await
    }
}

fn load_dir(data_dir: &Path) -> Result<Vec<serde_json::Value>, TransitError> {
    let entries = std::fs::read_dir(data_dir).map_err(|e| {
        TransitError::NotConfigured(format!("failed to read mock data directory: {e}"))
    })?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            TransitError::NotConfigured(format!("failed to read directory entry: {e}"))
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(TransitError::NotConfigured(format!(
            "no mock response files found in {data_dir:?}"
        )));
    }

    let mut plans = Vec::new();
    for path in files {
        let json = std::fs::read_to_string(&path).map_err(|e| {
            TransitError::NotConfigured(format!("failed to read {path:?}: {e}"))
        })?;

        let response: TripPlannerResponse =
            serde_json::from_str(&json).map_err(|e| TransitError::Json {
                message: format!("failed to parse {path:?}: {e}"),
                body: None,
            })?;

        plans.extend(response.plans);
    }

    Ok(plans)
}
