//! Trip plans.
//!
//! A `TripPlan` is one complete proposed journey from origin to destination,
//! made of ordered segments. Plans are built once from a backend record and
//! never change afterwards.

use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;

use super::Segment;

/// Plan-level durations in seconds, as reported by the backend.
///
/// These are not derived from the segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PlanDurations {
    pub total: i64,
    pub walking: i64,
    pub waiting: i64,
    pub riding: i64,
}

/// A complete itinerary.
///
/// # Identity
///
/// Two plans are equal when their start and end times, all four durations
/// and their full segment sequence are equal. The backend's plan number is
/// not part of identity, so the same itinerary returned twice under
/// different numbers compares equal and hashes the same.
///
/// # Examples
///
/// ```
/// use trip_ranker::domain::{PlanDurations, TripPlan};
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(10, 45, 0).unwrap();
/// let durations = PlanDurations { total: 2700, walking: 300, waiting: 120, riding: 2280 };
///
/// let a = TripPlan::new(1, start, end, durations, vec![]);
/// let b = TripPlan::new(2, start, end, durations, vec![]);
///
/// assert_eq!(a, b);
/// assert_eq!(a.transfer_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct TripPlan {
    plan_number: i64,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    durations: PlanDurations,
    segments: Vec<Segment>,
}

impl TripPlan {
    /// Constructs a plan from already-validated parts.
    pub fn new(
        plan_number: i64,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        durations: PlanDurations,
        segments: Vec<Segment>,
    ) -> Self {
        Self {
            plan_number,
            start_time,
            end_time,
            durations,
            segments,
        }
    }

    /// Backend plan number.
    pub fn plan_number(&self) -> i64 {
        self.plan_number
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    pub fn durations(&self) -> PlanDurations {
        self.durations
    }

    /// Total duration in seconds.
    pub fn total_duration(&self) -> i64 {
        self.durations.total
    }

    /// Walking duration in seconds.
    pub fn walking_duration(&self) -> i64 {
        self.durations.walking
    }

    /// Waiting duration in seconds.
    pub fn waiting_duration(&self) -> i64 {
        self.durations.waiting
    }

    /// Riding duration in seconds.
    pub fn riding_duration(&self) -> i64 {
        self.durations.riding
    }

    /// Returns all segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of transfers, counted as one less than the number of segments.
    pub fn transfer_count(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    /// Returns the first segment, if the plan has any.
    pub fn first_segment(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// Returns true if the plan begins on foot.
    pub fn starts_with_walk(&self) -> bool {
        self.first_segment().is_some_and(Segment::is_walk)
    }

    /// Duration of the first segment in seconds (0 for an empty plan).
    pub fn first_segment_duration(&self) -> i64 {
        self.first_segment().map_or(0, |s| s.duration_seconds)
    }

    /// Route numbers of the plan's rides, in order.
    pub fn route_numbers(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::route_number)
    }
}

impl PartialEq for TripPlan {
    fn eq(&self, other: &Self) -> bool {
        self.start_time == other.start_time
            && self.end_time == other.end_time
            && self.durations == other.durations
            && self.segments == other.segments
    }
}

impl Eq for TripPlan {}

impl Hash for TripPlan {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start_time.hash(state);
        self.end_time.hash(state);
        self.durations.hash(state);
        self.segments.hash(state);
    }
}
