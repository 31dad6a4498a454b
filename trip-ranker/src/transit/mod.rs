//! Trip-planner backend integration.
//!
//! This module turns the transit backend's trip-planner output into typed
//! plans, and provides sources that fetch that output.
//!
//! Key characteristics of the backend's records:
//! - Timestamps are naive local `yyyy-MM-ddTHH:mm:ss` literals
//! - Durations are whole seconds
//! - A segment often omits an endpoint that equals its neighbour's, so
//!   endpoints are resolved across segments
//! - Route numbers arrive as either JSON numbers or strings

mod client;
mod convert;
mod endpoint;
mod error;
mod mock;
mod query;
mod types;

pub use client::{TransitClient, TransitConfig};
pub use convert::{ParseError, PlanBatch, PlanBuilder, SkippedPlan, build_plans, build_segment};
pub use endpoint::{
    CURRENT_LOCATION, DESTINATION, LOCATION, Side, parse_catalogued_stop, resolve_endpoint,
};
pub use error::TransitError;
pub use mock::MockTransitClient;
pub use query::TripQuery;
pub use types::{
    NumberOrText, RawAddress, RawCentre, RawDurations, RawEndpoint, RawGeographic,
    RawIntersection, RawLocationPoint, RawMonument, RawPlan, RawRoute, RawSegment, RawStop,
    RawStreet, RawTimes, RawVariant, TripPlannerResponse,
};
