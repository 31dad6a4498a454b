//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Segment, StopRef, TripPlan, format_clock, whole_minutes};
use crate::planner::{TripResult, score};
use crate::transit::SkippedPlan;

/// Request to rank caller-supplied plans.
#[derive(Debug, Deserialize)]
pub struct RankRequest {
    /// Raw trip-planner plan records
    #[serde(default)]
    pub plans: Vec<serde_json::Value>,

    /// Maximum number of plans to return (defaults to the configured limit)
    pub limit: Option<usize>,
}

/// Query string for planning a trip.
#[derive(Debug, Deserialize)]
pub struct TripsQuery {
    /// Backend origin expression, e.g. `stops/10064`
    pub origin: String,

    /// Backend destination expression
    pub destination: String,

    /// Maximum number of plans to return
    pub limit: Option<usize>,
}

/// Ranked plans.
#[derive(Debug, Serialize)]
pub struct RankResponse {
    /// Plans, best first
    pub plans: Vec<PlanResult>,

    /// Number of records that built successfully
    pub parsed: usize,

    /// Records that could not be built
    pub skipped: Vec<SkippedResult>,
}

/// A record that could not be built into a plan.
#[derive(Debug, Serialize)]
pub struct SkippedResult {
    /// Position of the record in the input
    pub index: usize,

    /// Why it was skipped
    pub reason: String,
}

/// A ranked plan.
#[derive(Debug, Serialize)]
pub struct PlanResult {
    /// Backend plan number
    pub number: i64,

    /// Departure time (HH:MM)
    pub departure_time: String,

    /// Arrival time (HH:MM)
    pub arrival_time: String,

    pub duration_mins: i64,
    pub walking_mins: i64,
    pub waiting_mins: i64,
    pub riding_mins: i64,

    /// Number of transfers
    pub transfers: usize,

    /// Desirability score (lower is better)
    pub score: f64,

    /// Route numbers ridden, in order
    pub routes: Vec<String>,

    pub segments: Vec<SegmentResult>,
}

/// A segment of a plan.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    /// Segment kind, e.g. "walk" or "ride"
    #[serde(rename = "type")]
    pub kind: String,

    pub start_time: String,
    pub end_time: String,
    pub duration_mins: i64,

    /// Route number, for rides
    pub route_number: Option<String>,

    /// Route name, for rides
    pub route_name: Option<String>,

    /// Variant (destination sign), for rides
    pub variant_name: Option<String>,

    pub from: StopInfo,
    pub to: StopInfo,
}

/// Stop or location information for display.
#[derive(Debug, Serialize)]
pub struct StopInfo {
    /// Catalogued stop key (absent for addresses and placeholders)
    pub key: Option<i64>,

    /// Display name
    pub name: String,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl RankResponse {
    /// Create from a planning result.
    pub fn from_result(result: &TripResult) -> Self {
        Self {
            plans: result.plans.iter().map(PlanResult::from_plan).collect(),
            parsed: result.parsed,
            skipped: result.skipped.iter().map(SkippedResult::from_skipped).collect(),
        }
    }
}

impl SkippedResult {
    pub fn from_skipped(skipped: &SkippedPlan) -> Self {
        Self {
            index: skipped.index,
            reason: skipped.error.to_string(),
        }
    }
}

impl PlanResult {
    /// Create from a domain TripPlan.
    pub fn from_plan(plan: &TripPlan) -> Self {
        Self {
            number: plan.plan_number(),
            departure_time: format_clock(&plan.start_time()),
            arrival_time: format_clock(&plan.end_time()),
            duration_mins: whole_minutes(plan.total_duration()),
            walking_mins: whole_minutes(plan.walking_duration()),
            waiting_mins: whole_minutes(plan.waiting_duration()),
            riding_mins: whole_minutes(plan.riding_duration()),
            transfers: plan.transfer_count(),
            score: score(plan),
            routes: plan.route_numbers().map(str::to_string).collect(),
            segments: plan.segments().iter().map(SegmentResult::from_segment).collect(),
        }
    }
}

impl SegmentResult {
    /// Create from a domain Segment.
    pub fn from_segment(segment: &Segment) -> Self {
        let ride = segment.ride.as_ref();

        Self {
            kind: segment.kind.as_str().to_string(),
            start_time: format_clock(&segment.start_time),
            end_time: format_clock(&segment.end_time),
            duration_mins: whole_minutes(segment.duration_seconds),
            route_number: ride.map(|r| r.route_number.clone()),
            route_name: ride.and_then(|r| r.route_name.clone()),
            variant_name: ride.and_then(|r| r.variant_name.clone()),
            from: StopInfo::from_stop(&segment.from_stop),
            to: StopInfo::from_stop(&segment.to_stop),
        }
    }
}

impl StopInfo {
    pub fn from_stop(stop: &StopRef) -> Self {
        let location = stop.location();
        Self {
            key: stop.is_catalogued().then(|| stop.key()),
            name: stop.display_name().to_string(),
            latitude: location.map(|c| c.latitude),
            longitude: location.map(|c| c.longitude),
        }
    }
}
