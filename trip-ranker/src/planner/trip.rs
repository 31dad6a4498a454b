//! End-to-end trip planning: fetch, build, rank.

use std::future::Future;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::domain::TripPlan;
use crate::transit::{PlanBuilder, SkippedPlan, TransitError, TripQuery, build_plans};

use super::config::RankConfig;
use super::rank::{deduplicate, rank_plans};

/// Trait for providing raw trip-plan records.
///
/// This abstraction allows the planner to be tested with mock data.
pub trait PlanSource {
    /// Get the backend's plan records for a trip.
    ///
    /// Records are returned untyped so that one malformed plan does not
    /// prevent the others from being built.
    fn fetch_plans(
        &self,
        query: &TripQuery,
    ) -> impl Future<Output = Result<Vec<serde_json::Value>, TransitError>> + Send;
}

/// Result of planning a trip.
#[derive(Debug, Clone)]
pub struct TripResult {
    /// Ranked plans, best first.
    pub plans: Vec<TripPlan>,

    /// Number of records that built successfully.
    pub parsed: usize,

    /// Records that could not be built.
    pub skipped: Vec<SkippedPlan>,
}

/// Trip planner over a plan source.
pub struct TripPlanner<S: PlanSource> {
    source: S,
    config: RankConfig,
    reference_time: Option<NaiveDateTime>,
}

impl<S: PlanSource> TripPlanner<S> {
    pub fn new(source: S, config: RankConfig) -> Self {
        Self {
            source,
            config,
            reference_time: None,
        }
    }

    /// Use a fixed fallback for unparseable timestamps instead of the
    /// current local time.
    pub fn with_reference_time(mut self, reference_time: NaiveDateTime) -> Self {
        self.reference_time = Some(reference_time);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    /// Plan a trip.
    ///
    /// The query's limit, if set, overrides the configured one. Records that
    /// fail to build are counted in the result, never returned as an error.
    pub async fn plan(&self, query: &TripQuery) -> Result<TripResult, TransitError> {
        let records = self.source.fetch_plans(query).await?;
        debug!(
            origin = %query.origin,
            destination = %query.destination,
            records = records.len(),
            "fetched trip plans"
        );

        let result = self.rank_records(&records, query.limit);

        info!(
            origin = %query.origin,
            destination = %query.destination,
            parsed = result.parsed,
            skipped = result.skipped.len(),
            returned = result.plans.len(),
            "planned trip"
        );

        Ok(result)
    }

    /// Build and rank already-fetched records.
    pub fn rank_records(&self, records: &[serde_json::Value], limit: Option<usize>) -> TripResult {
        let builder = match self.reference_time {
            Some(reference_time) => PlanBuilder::with_reference_time(reference_time),
            None => PlanBuilder::new(),
        };
        rank_records(records, &builder, &self.config, limit)
    }
}

/// Build, optionally de-duplicate, and rank raw plan records.
pub fn rank_records(
    records: &[serde_json::Value],
    builder: &PlanBuilder,
    config: &RankConfig,
    limit: Option<usize>,
) -> TripResult {
    let batch = build_plans(records, builder);
    let parsed = batch.parsed();

    let mut config = *config;
    if let Some(limit) = limit {
        config.limit = limit;
    }

    let plans = if config.deduplicate {
        deduplicate(batch.plans)
    } else {
        batch.plans
    };

    TripResult {
        plans: rank_plans(plans, &config),
        parsed,
        skipped: batch.skipped,
    }
}
