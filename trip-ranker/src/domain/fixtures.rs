//! Plan builders shared by unit tests.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::{Coordinates, PlanDurations, RideInfo, Segment, SegmentKind, StopRef, TripPlan};

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

pub fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    date().and_hms_opt(hour, min, sec).unwrap()
}

pub fn stop(key: i64, name: &str) -> StopRef {
    StopRef::catalogued(key, name, Coordinates::new(49.8 + key as f64 * 1e-4, -97.1))
}

fn segment(kind: SegmentKind, seconds: i64, ride: Option<RideInfo>) -> Segment {
    Segment {
        kind,
        start_time: at(0, 0, 0),
        end_time: at(0, 0, 0) + Duration::seconds(seconds),
        duration_seconds: seconds,
        ride,
        from_stop: StopRef::placeholder("Location"),
        to_stop: StopRef::placeholder("Destination"),
    }
}

pub fn walk(seconds: i64) -> Segment {
    segment(SegmentKind::Walk, seconds, None)
}

pub fn wait(seconds: i64) -> Segment {
    segment(SegmentKind::Wait, seconds, None)
}

pub fn ride(route: &str, seconds: i64) -> Segment {
    let info = RideInfo {
        route_key: route.parse().unwrap_or(0),
        route_number: route.to_string(),
        route_name: Some(format!("Route {route}")),
        variant_key: None,
        variant_name: None,
    };
    segment(SegmentKind::Ride, seconds, Some(info))
}

/// Lays the segments end to end from `start` and derives the walking,
/// waiting and riding totals from them.
pub fn plan(number: i64, start: NaiveDateTime, total: i64, segments: Vec<Segment>) -> TripPlan {
    let sum = |kind: SegmentKind| -> i64 {
        segments
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.duration_seconds)
            .sum()
    };
    let durations = PlanDurations {
        total,
        walking: sum(SegmentKind::Walk),
        waiting: sum(SegmentKind::Wait),
        riding: sum(SegmentKind::Ride),
    };
    plan_with(number, start, durations, segments)
}

pub fn plan_with(
    number: i64,
    start: NaiveDateTime,
    durations: PlanDurations,
    segments: Vec<Segment>,
) -> TripPlan {
    let mut cursor = start;
    let segments = segments
        .into_iter()
        .map(|mut s| {
            s.start_time = cursor;
            s.end_time = cursor + Duration::seconds(s.duration_seconds);
            cursor = s.end_time;
            s
        })
        .collect();

    TripPlan::new(
        number,
        start,
        start + Duration::seconds(durations.total),
        durations,
        segments,
    )
}
