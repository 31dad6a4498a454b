//! Conversion from trip-planner DTOs to domain types.
//!
//! A plan either converts completely or not at all, with one deliberate
//! exception: a segment that fails to convert is dropped and the plan is
//! kept without it. Segment endpoints are resolved against the plan's whole
//! raw segment list, so a dropped segment never hides a stop from its
//! neighbours.

use chrono::{Local, NaiveDateTime};
use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{PlanDurations, RideInfo, Segment, SegmentKind, TripPlan, parse_timestamp_or};

use super::endpoint::{Side, resolve_endpoint};
use super::types::{
    NumberOrText, RawDurations, RawPlan, RawRoute, RawSegment, RawTimes, RawVariant,
};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Field present but unusable
    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Record does not have the expected shape at all
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Converts raw plan records into `TripPlan`s.
///
/// Holds the reference time that unparseable timestamp literals degrade to.
#[derive(Debug, Clone, Copy)]
pub struct PlanBuilder {
    reference_time: NaiveDateTime,
}

impl PlanBuilder {
    /// A builder whose timestamp fallback is the current local time.
    pub fn new() -> Self {
        Self::with_reference_time(Local::now().naive_local())
    }

    /// A builder with a fixed timestamp fallback.
    pub fn with_reference_time(reference_time: NaiveDateTime) -> Self {
        Self { reference_time }
    }

    /// The time that unparseable timestamps become.
    pub fn reference_time(&self) -> NaiveDateTime {
        self.reference_time
    }

    /// Decode and build one plan from an untyped record.
    pub fn build_value(&self, value: &serde_json::Value) -> Result<TripPlan, ParseError> {
        let raw = RawPlan::deserialize(value).map_err(|e| ParseError::Malformed(e.to_string()))?;
        self.build(&raw)
    }

    /// Build one plan.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the plan number, start/end times, any of the four
    /// durations, or the segment list is missing.
    pub fn build(&self, raw: &RawPlan) -> Result<TripPlan, ParseError> {
        let plan_number = raw.number.ok_or(ParseError::MissingField("number"))?;
        let times = raw.times.as_ref().ok_or(ParseError::MissingField("times"))?;
        let (start_time, end_time) = self.parse_span(times)?;

        let durations = times
            .durations
            .as_ref()
            .ok_or(ParseError::MissingField("times.durations"))?;
        let durations = plan_durations(durations)?;

        let raw_segments = raw
            .segments
            .as_ref()
            .ok_or(ParseError::MissingField("segments"))?;

        // Decode every segment up front: endpoint resolution looks at
        // neighbours on both sides.
        let decoded: Vec<Option<RawSegment>> = raw_segments
            .iter()
            .enumerate()
            .map(|(index, value)| match RawSegment::deserialize(value) {
                Ok(segment) => Some(segment),
                Err(e) => {
                    debug!(plan = plan_number, index, error = %e, "undecodable segment");
                    None
                }
            })
            .collect();

        let mut segments = Vec::with_capacity(decoded.len());
        for (index, raw_segment) in decoded.iter().enumerate() {
            let Some(raw_segment) = raw_segment else {
                continue;
            };
            match build_segment(raw_segment, &segments, &decoded, index, self.reference_time) {
                Ok(segment) => segments.push(segment),
                Err(e) => {
                    debug!(plan = plan_number, index, error = %e, "dropping segment");
                }
            }
        }

        Ok(TripPlan::new(
            plan_number,
            start_time,
            end_time,
            durations,
            segments,
        ))
    }

    fn parse_span(&self, times: &RawTimes) -> Result<(NaiveDateTime, NaiveDateTime), ParseError> {
        parse_span(times, self.reference_time)
    }
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build one segment.
///
/// * `built` - segments of the same plan already built, in order
/// * `all` - the plan's full raw segment list (`None` for undecodable entries)
/// * `index` - position of `raw` in `all`
/// * `reference_time` - fallback for unparseable timestamps
///
/// # Errors
///
/// Returns `Err` only when the segment's own type, start/end times or total
/// duration is missing. Endpoints always resolve, if only to a placeholder.
pub fn build_segment(
    raw: &RawSegment,
    built: &[Segment],
    all: &[Option<RawSegment>],
    index: usize,
    reference_time: NaiveDateTime,
) -> Result<Segment, ParseError> {
    let kind_literal = raw.kind.as_deref().ok_or(ParseError::MissingField("type"))?;
    let kind = SegmentKind::parse(kind_literal).ok_or(ParseError::InvalidField {
        field: "type",
        reason: "empty segment type".to_string(),
    })?;

    let times = raw.times.as_ref().ok_or(ParseError::MissingField("times"))?;
    let (start_time, end_time) = parse_span(times, reference_time)?;
    let duration_seconds = times
        .durations
        .as_ref()
        .and_then(|d| d.total)
        .ok_or(ParseError::MissingField("times.durations.total"))?;

    if let Some(previous) = built.last()
        && start_time < previous.end_time
    {
        debug!(
            index,
            start = %start_time,
            previous_end = %previous.end_time,
            "segment starts before the previous one ends"
        );
    }

    let ride = match (&kind, &raw.route) {
        (SegmentKind::Ride, Some(route)) => ride_info(route, raw.variant.as_ref(), index),
        _ => None,
    };

    Ok(Segment {
        kind,
        start_time,
        end_time,
        duration_seconds,
        ride,
        from_stop: resolve_endpoint(all, index, Side::From),
        to_stop: resolve_endpoint(all, index, Side::To),
    })
}

fn ride_info(route: &RawRoute, variant: Option<&RawVariant>, index: usize) -> Option<RideInfo> {
    let (Some(route_key), Some(number)) = (route.key, route.number.as_ref()) else {
        debug!(index, "ride route without key or number");
        return None;
    };

    Some(RideInfo {
        route_key,
        route_number: number.to_text(),
        route_name: route.name.clone(),
        variant_key: variant.and_then(|v| v.key.as_ref()).map(NumberOrText::to_text),
        variant_name: variant.and_then(|v| v.name.clone()),
    })
}

/// Start and end of a plan or segment.
///
/// Missing literals are errors; present but unparseable ones become
/// `reference_time`.
fn parse_span(
    times: &RawTimes,
    reference_time: NaiveDateTime,
) -> Result<(NaiveDateTime, NaiveDateTime), ParseError> {
    let start = times
        .start
        .as_deref()
        .ok_or(ParseError::MissingField("times.start"))?;
    let end = times
        .end
        .as_deref()
        .ok_or(ParseError::MissingField("times.end"))?;

    Ok((
        parse_timestamp_or(start, reference_time),
        parse_timestamp_or(end, reference_time),
    ))
}

fn plan_durations(raw: &RawDurations) -> Result<PlanDurations, ParseError> {
    Ok(PlanDurations {
        total: raw
            .total
            .ok_or(ParseError::MissingField("times.durations.total"))?,
        walking: raw
            .walking
            .ok_or(ParseError::MissingField("times.durations.walking"))?,
        waiting: raw
            .waiting
            .ok_or(ParseError::MissingField("times.durations.waiting"))?,
        riding: raw
            .riding
            .ok_or(ParseError::MissingField("times.durations.riding"))?,
    })
}

/// A raw plan that could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPlan {
    /// Position of the record in the input batch
    pub index: usize,
    pub error: ParseError,
}

/// Outcome of building a batch of raw plans.
#[derive(Debug, Clone, Default)]
pub struct PlanBatch {
    /// Successfully built plans, in input order
    pub plans: Vec<TripPlan>,
    /// Records that failed, in input order
    pub skipped: Vec<SkippedPlan>,
}

impl PlanBatch {
    /// Number of plans built.
    pub fn parsed(&self) -> usize {
        self.plans.len()
    }

    /// Number of records skipped.
    pub fn skipped(&self) -> usize {
        self.skipped.len()
    }
}

/// Build a batch of raw plan records.
///
/// Records are built in parallel and independently; a failing record is
/// reported in [`PlanBatch::skipped`] and never affects the others.
pub fn build_plans(raw_plans: &[serde_json::Value], builder: &PlanBuilder) -> PlanBatch {
    let results: Vec<Result<TripPlan, ParseError>> = raw_plans
        .par_iter()
        .map(|value| builder.build_value(value))
        .collect();

    let mut batch = PlanBatch::default();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(plan) => batch.plans.push(plan),
            Err(error) => {
                warn!(index, error = %error, "skipping trip plan");
                batch.skipped.push(SkippedPlan { index, error });
            }
        }
    }

    if !batch.skipped.is_empty() {
        warn!(
            parsed = batch.parsed(),
            skipped = batch.skipped(),
            "some trip plans could not be built"
        );
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::at;
    use crate::transit::endpoint::{CURRENT_LOCATION, DESTINATION, LOCATION};
    use serde_json::{Value, json};

    fn builder() -> PlanBuilder {
        PlanBuilder::with_reference_time(at(8, 0, 0))
    }

    fn stop_json(key: i64, name: &str) -> Value {
        json!({
            "key": key,
            "name": name,
            "centre": {"geographic": {"latitude": "49.8951", "longitude": "-97.1384"}}
        })
    }

    fn segment_times(start: &str, end: &str, total: i64) -> Value {
        json!({"start": start, "end": end, "durations": {"total": total}})
    }

    fn three_segment_plan() -> Value {
        json!({
            "number": 1,
            "times": {
                "start": "2024-03-15T10:00:00",
                "end": "2024-03-15T10:45:00",
                "durations": {"total": 2700, "walking": 600, "waiting": 0, "riding": 2100}
            },
            "segments": [
                {
                    "type": "walk",
                    "times": segment_times("2024-03-15T10:00:00", "2024-03-15T10:05:00", 300),
                    "from": {"origin": {"address": {"street-number": 393, "street": {"name": "Portage Avenue"}}}},
                    "to": {"stop": stop_json(10064, "Portage@Main")}
                },
                {
                    "type": "ride",
                    "times": segment_times("2024-03-15T10:05:00", "2024-03-15T10:40:00", 2100),
                    "route": {"key": 11, "number": 11, "name": "Portage-Kildonan"},
                    "variant": {"key": "11-1-K", "name": "Kildonan Place"}
                },
                {
                    "type": "walk",
                    "times": segment_times("2024-03-15T10:40:00", "2024-03-15T10:45:00", 300),
                    "from": {"stop": stop_json(20123, "Henderson@Kildonan")},
                    "to": {"destination": {}}
                }
            ]
        })
    }

    #[test]
    fn build_complete_plan() {
        let plan = builder().build_value(&three_segment_plan()).unwrap();

        assert_eq!(plan.plan_number(), 1);
        assert_eq!(plan.start_time(), at(10, 0, 0));
        assert_eq!(plan.end_time(), at(10, 45, 0));
        assert_eq!(
            plan.durations(),
            PlanDurations {
                total: 2700,
                walking: 600,
                waiting: 0,
                riding: 2100
            }
        );
        assert_eq!(plan.segment_count(), 3);

        let segments = plan.segments();
        assert_eq!(segments[0].kind, SegmentKind::Walk);
        assert_eq!(segments[0].from_stop.display_name(), "393 Portage Avenue");
        assert_eq!(segments[0].to_stop.key(), 10064);
        assert_eq!(segments[2].to_stop.display_name(), DESTINATION);
    }

    #[test]
    fn endpoint_back_fill_from_previous_segment() {
        let plan = builder().build_value(&three_segment_plan()).unwrap();
        let ride = &plan.segments()[1];

        // The ride has no endpoints of its own.
        assert_eq!(ride.from_stop.key(), 10064);
        assert_eq!(ride.from_stop.display_name(), "Portage @ Main");
        assert!(ride.from_stop.is_catalogued());
        assert_eq!(ride.to_stop.key(), 20123);
    }

    #[test]
    fn ride_info_extracted() {
        let plan = builder().build_value(&three_segment_plan()).unwrap();
        let ride = plan.segments()[1].ride.as_ref().unwrap();

        assert_eq!(ride.route_key, 11);
        assert_eq!(ride.route_number, "11");
        assert_eq!(ride.route_name.as_deref(), Some("Portage-Kildonan"));
        assert_eq!(ride.variant_key.as_deref(), Some("11-1-K"));
        assert_eq!(ride.variant_name.as_deref(), Some("Kildonan Place"));

        assert!(plan.segments()[0].ride.is_none());
    }

    #[test]
    fn route_number_string_and_integer_agree() {
        let mut numeric = three_segment_plan();
        let mut text = three_segment_plan();
        numeric["segments"][1]["route"]["number"] = json!(11);
        text["segments"][1]["route"]["number"] = json!("11");

        let a = builder().build_value(&numeric).unwrap();
        let b = builder().build_value(&text).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn route_on_non_ride_ignored() {
        let mut value = three_segment_plan();
        value["segments"][0]["route"] = json!({"key": 11, "number": 11});

        let plan = builder().build_value(&value).unwrap();

        assert!(plan.segments()[0].ride.is_none());
    }

    #[test]
    fn segment_duration_is_authoritative() {
        let mut value = three_segment_plan();
        value["segments"][1]["times"]["durations"]["total"] = json!(1999);

        let plan = builder().build_value(&value).unwrap();

        assert_eq!(plan.segments()[1].duration_seconds, 1999);
    }

    #[test]
    fn unknown_segment_kind_kept() {
        let mut value = three_segment_plan();
        value["segments"][1]["type"] = json!("gondola");

        let plan = builder().build_value(&value).unwrap();

        assert_eq!(plan.segment_count(), 3);
        assert_eq!(
            plan.segments()[1].kind,
            SegmentKind::Unrecognized("gondola".into())
        );
        assert!(plan.segments()[1].ride.is_none());
    }

    #[test]
    fn malformed_segment_dropped_but_still_visible_to_neighbours() {
        let mut value = three_segment_plan();
        // The first walk loses its type: it is dropped, but its "to" stop
        // still back-fills the ride.
        value["segments"][0]
            .as_object_mut()
            .unwrap()
            .remove("type");

        let plan = builder().build_value(&value).unwrap();

        assert_eq!(plan.segment_count(), 2);
        assert_eq!(plan.segments()[0].kind, SegmentKind::Ride);
        assert_eq!(plan.segments()[0].from_stop.key(), 10064);
    }

    #[test]
    fn garbled_duration_drops_segment_but_keeps_its_stops() {
        let mut value = three_segment_plan();
        value["segments"][0]["times"]["durations"]["total"] = json!("five");
        value["segments"][2]["times"]["durations"]["total"] = json!("five minutes");

        let plan = builder().build_value(&value).unwrap();

        assert_eq!(plan.segment_count(), 1);
        let ride = &plan.segments()[0];
        assert_eq!(ride.kind, SegmentKind::Ride);
        assert_eq!(ride.from_stop.key(), 10064);
        assert_eq!(ride.to_stop.key(), 20123);
    }

    #[test]
    fn non_object_segment_is_not_a_neighbour() {
        let mut value = three_segment_plan();
        value["segments"][2] = json!("walk to the door");

        let plan = builder().build_value(&value).unwrap();

        assert_eq!(plan.segment_count(), 2);
        assert_eq!(plan.segments()[1].to_stop.display_name(), DESTINATION);
    }

    #[test]
    fn named_route_key_keeps_ride_without_ride_info() {
        let mut value = three_segment_plan();
        value["segments"][1]["route"] = json!({"key": "BLUE", "number": "BLUE"});

        let plan = builder().build_value(&value).unwrap();

        assert_eq!(plan.segment_count(), 3);
        let ride = &plan.segments()[1];
        assert_eq!(ride.kind, SegmentKind::Ride);
        assert!(ride.ride.is_none());
        assert_eq!(ride.from_stop.key(), 10064);
    }

    #[test]
    fn numeric_variant_key_is_kept_as_text() {
        let mut value = three_segment_plan();
        value["segments"][1]["variant"]["key"] = json!(1101);

        let plan = builder().build_value(&value).unwrap();
        let ride = plan.segments()[1].ride.as_ref().unwrap();

        assert_eq!(ride.variant_key.as_deref(), Some("1101"));
    }

    #[test]
    fn mistyped_stop_key_falls_through_to_neighbours() {
        let mut value = three_segment_plan();
        value["segments"][0]["from"] = json!({"stop": {"key": "x10064", "name": "Portage@Main"}});
        value["segments"][2]["to"] = json!({"stop": {"key": "x20123", "name": "Henderson@Kildonan"}});

        let plan = builder().build_value(&value).unwrap();

        assert_eq!(plan.segment_count(), 3);
        // No earlier segment, so the origin becomes the neighbour fallback.
        assert_eq!(plan.segments()[0].from_stop.display_name(), LOCATION);
        assert_eq!(plan.segments()[2].to_stop.display_name(), DESTINATION);
    }

    #[test]
    fn empty_segment_type_fails_segment() {
        let mut value = three_segment_plan();
        value["segments"][2]["type"] = json!("");

        let plan = builder().build_value(&value).unwrap();

        assert_eq!(plan.segment_count(), 2);
    }

    #[test]
    fn missing_segment_duration_fails_segment() {
        let all = vec![Some(
            serde_json::from_value::<RawSegment>(json!({
                "type": "walk",
                "times": {"start": "2024-03-15T10:00:00", "end": "2024-03-15T10:05:00"}
            }))
            .unwrap(),
        )];
        let raw = all[0].as_ref().unwrap();

        let err = build_segment(raw, &[], &all, 0, at(8, 0, 0)).unwrap_err();

        assert_eq!(err, ParseError::MissingField("times.durations.total"));
    }

    #[test]
    fn origin_placeholder_default() {
        let mut value = three_segment_plan();
        value["segments"][0]["from"] = json!({"origin": {}});

        let plan = builder().build_value(&value).unwrap();

        assert_eq!(plan.segments()[0].from_stop.display_name(), CURRENT_LOCATION);
    }

    #[test]
    fn missing_plan_fields_fail() {
        for (pointer, field) in [
            ("number", "number"),
            ("segments", "segments"),
            ("times", "times"),
        ] {
            let mut value = three_segment_plan();
            value.as_object_mut().unwrap().remove(pointer);
            assert_eq!(
                builder().build_value(&value).unwrap_err(),
                ParseError::MissingField(field)
            );
        }
    }

    #[test]
    fn missing_waiting_duration_fails_plan() {
        let mut value = three_segment_plan();
        value["times"]["durations"]
            .as_object_mut()
            .unwrap()
            .remove("waiting");

        let err = builder().build_value(&value).unwrap_err();

        assert_eq!(err, ParseError::MissingField("times.durations.waiting"));
    }

    #[test]
    fn missing_start_fails_but_garbled_start_falls_back() {
        let mut missing = three_segment_plan();
        missing["times"].as_object_mut().unwrap().remove("start");
        assert_eq!(
            builder().build_value(&missing).unwrap_err(),
            ParseError::MissingField("times.start")
        );

        let mut garbled = three_segment_plan();
        garbled["times"]["start"] = json!("10 o'clock");
        let plan = builder().build_value(&garbled).unwrap();
        assert_eq!(plan.start_time(), at(8, 0, 0));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = builder().build_value(&json!({"number": "one"})).unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));

        let err = builder().build_value(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn batch_reports_skipped_plans() {
        let mut broken = three_segment_plan();
        broken["times"]["durations"]
            .as_object_mut()
            .unwrap()
            .remove("waiting");
        let mut second = three_segment_plan();
        second["number"] = json!(2);

        let batch = build_plans(&[three_segment_plan(), broken, second], &builder());

        assert_eq!(batch.parsed(), 2);
        assert_eq!(batch.skipped(), 1);
        assert_eq!(batch.skipped[0].index, 1);
        assert_eq!(
            batch.plans.iter().map(|p| p.plan_number()).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn empty_batch() {
        let batch = build_plans(&[], &builder());
        assert_eq!(batch.parsed(), 0);
        assert_eq!(batch.skipped(), 0);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ParseError::MissingField("number").to_string(),
            "missing required field: number"
        );
        let err = ParseError::InvalidField {
            field: "type",
            reason: "empty segment type".into(),
        };
        assert_eq!(err.to_string(), "invalid field type: empty segment type");
    }
}
