//! Itinerary segments.
//!
//! A segment is one leg of a trip plan: a walk, a ride on a transit route,
//! or a wait. Segment kinds the backend adds later are kept as
//! [`SegmentKind::Unrecognized`] so that a new kind never breaks a plan.

use std::fmt;

use chrono::NaiveDateTime;

use super::StopRef;

/// What a segment does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Walking between points
    Walk,
    /// Riding a transit route
    Ride,
    /// Waiting at a stop
    Wait,
    /// Changing between routes
    Transfer,
    /// A kind this crate does not know, kept verbatim
    Unrecognized(String),
}

impl SegmentKind {
    /// Map a backend `type` string to a kind.
    ///
    /// Returns `None` for an empty (or whitespace-only) string; anything
    /// else is a known or unrecognized kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_ranker::domain::SegmentKind;
    ///
    /// assert_eq!(SegmentKind::parse("walk"), Some(SegmentKind::Walk));
    /// assert_eq!(SegmentKind::parse("Ride"), Some(SegmentKind::Ride));
    /// assert_eq!(
    ///     SegmentKind::parse("ferry"),
    ///     Some(SegmentKind::Unrecognized("ferry".into()))
    /// );
    /// assert_eq!(SegmentKind::parse(""), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let kind = if s.eq_ignore_ascii_case("walk") {
            SegmentKind::Walk
        } else if s.eq_ignore_ascii_case("ride") {
            SegmentKind::Ride
        } else if s.eq_ignore_ascii_case("wait") {
            SegmentKind::Wait
        } else if s.eq_ignore_ascii_case("transfer") {
            SegmentKind::Transfer
        } else {
            SegmentKind::Unrecognized(s.to_string())
        };

        Some(kind)
    }

    /// Backend name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            SegmentKind::Walk => "walk",
            SegmentKind::Ride => "ride",
            SegmentKind::Wait => "wait",
            SegmentKind::Transfer => "transfer",
            SegmentKind::Unrecognized(s) => s,
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route details carried by ride segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RideInfo {
    /// Backend route key
    pub route_key: i64,
    /// Public route number ("11", "BLUE")
    pub route_number: String,
    /// Route name
    pub route_name: Option<String>,
    /// Variant key (e.g. "11-1-D")
    pub variant_key: Option<String>,
    /// Variant name, usually the headsign
    pub variant_name: Option<String>,
}

/// One leg of a trip plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub kind: SegmentKind,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Duration as reported by the backend. May disagree with
    /// `end_time - start_time`; this value wins.
    pub duration_seconds: i64,
    /// Present only on ride segments that came with a route.
    pub ride: Option<RideInfo>,
    pub from_stop: StopRef,
    pub to_stop: StopRef,
}

impl Segment {
    /// Returns true if this is a walk segment.
    pub fn is_walk(&self) -> bool {
        self.kind == SegmentKind::Walk
    }

    /// Route number of a ride, if any.
    pub fn route_number(&self) -> Option<&str> {
        self.ride.as_ref().map(|r| r.route_number.as_str())
    }
}
