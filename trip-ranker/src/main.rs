use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trip_ranker::cache::{CacheConfig, CachedTransitClient};
use trip_ranker::planner::RankConfig;
use trip_ranker::transit::{TransitClient, TransitConfig};
use trip_ranker::web::{AppState, create_router};

/// Listen address when `TRIP_RANKER_ADDR` is not set.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Get credentials from environment
    let api_key = std::env::var("TRANSIT_API_KEY").unwrap_or_else(|_| {
        warn!("TRANSIT_API_KEY not set; trip-planner calls will fail");
        String::new()
    });

    let mut transit_config = TransitConfig::new(api_key);
    if let Ok(base_url) = std::env::var("TRANSIT_BASE_URL") {
        transit_config = transit_config.with_base_url(base_url);
    }

    let transit_client = TransitClient::new(transit_config)?;
    let cached_transit = CachedTransitClient::new(transit_client, &CacheConfig::default());

    let state = AppState::new(cached_transit, RankConfig::default());
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("TRIP_RANKER_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;

    info!(%addr, "trip ranker listening");
    info!("  GET  /health      - Health check");
    info!("  GET  /trips       - Plan and rank a trip");
    info!("  POST /plans/rank  - Rank supplied plans");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
