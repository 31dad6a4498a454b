//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::planner::{PlanSource, rank_records};
use crate::transit::{PlanBuilder, TransitError, TripQuery};

use super::dto::*;
use super::state::AppState;

/// Largest result limit a caller may ask for.
const MAX_LIMIT: usize = 50;

/// Create the application router.
pub fn create_router<S>(state: AppState<S>) -> Router
where
    S: PlanSource + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/plans/rank", post(rank_supplied_plans::<S>))
        .route("/trips", get(plan_trip::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Rank plan records supplied in the request body.
async fn rank_supplied_plans<S: PlanSource>(
    State(state): State<AppState<S>>,
    Json(req): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let config = *state.config;
    let limit = req.limit.map(|l| l.min(MAX_LIMIT));

    // Building is CPU-bound and parallel; keep it off the async workers.
    let response = tokio::task::spawn_blocking(move || {
        let result = rank_records(&req.plans, &PlanBuilder::new(), &config, limit);
        RankResponse::from_result(&result)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("ranking task failed: {e}"),
    })?;

    Ok(Json(response))
}

/// Fetch and rank plans for an origin/destination pair.
async fn plan_trip<S: PlanSource + Sync>(
    State(state): State<AppState<S>>,
    Query(req): Query<TripsQuery>,
) -> Result<Json<RankResponse>, AppError> {
    let origin = req.origin.trim();
    let destination = req.destination.trim();
    if origin.is_empty() || destination.is_empty() {
        return Err(AppError::BadRequest {
            message: "origin and destination are required".to_string(),
        });
    }

    let mut query = TripQuery::new(origin, destination);
    if let Some(limit) = req.limit {
        query = query.with_limit(limit.min(MAX_LIMIT));
    }

    let result = state.planner.plan(&query).await?;

    Ok(Json(RankResponse::from_result(&result)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl From<TransitError> for AppError {
    fn from(e: TransitError) -> Self {
        match e {
            TransitError::NotFound(message) => AppError::NotFound { message },
            TransitError::NotConfigured(_) => AppError::Internal {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
