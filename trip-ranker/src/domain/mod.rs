//! Domain types for trip plans.
//!
//! This module contains the typed model that raw trip-planner records are
//! converted into. Values are immutable once built, so code that receives
//! them can rely on their shape without re-checking.

#[cfg(test)]
pub(crate) mod fixtures;
mod plan;
mod segment;
mod stop;
mod time;

pub use plan::{PlanDurations, TripPlan};
pub use segment::{RideInfo, Segment, SegmentKind};
pub use stop::{Coordinates, PLACEHOLDER_KEY, StopRef};
pub use time::{
    TIMESTAMP_FORMAT, TimeError, format_clock, parse_timestamp, parse_timestamp_or, whole_minutes,
};
