//! Segment endpoint resolution.
//!
//! The backend often leaves out a segment's origin or destination when it is
//! the same point as a neighbouring segment's, so an endpoint is resolved in
//! order from:
//!
//! 1. the segment's own catalogued stop,
//! 2. its own origin/destination address point,
//! 3. the nearest neighbouring segment whose facing side names a catalogued
//!    stop (searching backward for "from", forward for "to"),
//! 4. a fixed placeholder.
//!
//! If the segment has its own stop record but that record is incomplete, the
//! address point is skipped and the neighbour search runs directly.

use tracing::trace;

use crate::domain::{Coordinates, PLACEHOLDER_KEY, StopRef};

use super::types::{RawAddress, RawEndpoint, RawLocationPoint, RawSegment, RawStop};

/// Label for an origin with no usable address.
pub const CURRENT_LOCATION: &str = "Current Location";

/// Label for a destination with no usable address or stop.
pub const DESTINATION: &str = "Destination";

/// Label for an origin that no neighbouring segment could supply.
pub const LOCATION: &str = "Location";

/// Which end of a segment is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    From,
    To,
}

impl Side {
    fn endpoint(self, segment: &RawSegment) -> Option<&RawEndpoint> {
        match self {
            Side::From => segment.from.as_ref(),
            Side::To => segment.to.as_ref(),
        }
    }

    fn opposite(self) -> Self {
        match self {
            Side::From => Side::To,
            Side::To => Side::From,
        }
    }

    fn location_point(self, endpoint: &RawEndpoint) -> Option<&RawLocationPoint> {
        match self {
            Side::From => endpoint.origin.as_ref(),
            Side::To => endpoint.destination.as_ref(),
        }
    }

    fn address_fallback(self) -> &'static str {
        match self {
            Side::From => CURRENT_LOCATION,
            Side::To => DESTINATION,
        }
    }

    fn neighbour_fallback(self) -> &'static str {
        match self {
            Side::From => LOCATION,
            Side::To => DESTINATION,
        }
    }
}

/// Resolve one endpoint of `segments[index]`.
///
/// `segments` is the plan's full raw segment list in order; entries that
/// could not be decoded are `None` and never supply an endpoint.
pub fn resolve_endpoint(segments: &[Option<RawSegment>], index: usize, side: Side) -> StopRef {
    let endpoint = segments
        .get(index)
        .and_then(Option::as_ref)
        .and_then(|s| side.endpoint(s));

    if let Some(endpoint) = endpoint {
        if let Some(raw_stop) = &endpoint.stop {
            if let Some(stop) = parse_catalogued_stop(raw_stop) {
                return stop;
            }
            trace!(index, ?side, "incomplete stop record, searching neighbours");
        } else if let Some(point) = side.location_point(endpoint) {
            return location_point_stop(point, side.address_fallback());
        }
    }

    neighbour_stop(segments, index, side)
        .unwrap_or_else(|| StopRef::placeholder(side.neighbour_fallback()))
}

/// Parse a stop record into a catalogued `StopRef`.
///
/// Requires a key, a name and both coordinates.
pub fn parse_catalogued_stop(raw: &RawStop) -> Option<StopRef> {
    let key = raw.key?;
    let name = raw.name.as_deref()?;
    let geographic = raw.centre.as_ref()?.geographic.as_ref()?;
    let latitude = geographic.latitude.as_ref()?.as_f64()?;
    let longitude = geographic.longitude.as_ref()?.as_f64()?;

    Some(StopRef::catalogued(
        key,
        name,
        Coordinates::new(latitude, longitude),
    ))
}

/// Nearest neighbour whose facing side is a real catalogued stop.
///
/// For the "from" side this walks backward looking at each earlier
/// segment's "to" stop; for the "to" side it walks forward looking at each
/// later segment's "from" stop.
fn neighbour_stop(segments: &[Option<RawSegment>], index: usize, side: Side) -> Option<StopRef> {
    let facing = side.opposite();
    let candidate = |segment: &Option<RawSegment>| -> Option<StopRef> {
        let raw_stop = facing.endpoint(segment.as_ref()?)?.stop.as_ref()?;
        parse_catalogued_stop(raw_stop)
            .filter(|stop| stop.key() != PLACEHOLDER_KEY && stop.location().is_some())
    };

    match side {
        Side::From => segments.get(..index)?.iter().rev().find_map(candidate),
        Side::To => segments.get(index + 1..)?.iter().find_map(candidate),
    }
}

/// Build a placeholder from an origin/destination that is not a stop.
fn location_point_stop(point: &RawLocationPoint, fallback: &str) -> StopRef {
    let monument_address = point
        .monument
        .as_ref()
        .and_then(|m| m.address.as_ref())
        .and_then(street_address);

    let name = monument_address
        .or_else(|| point.address.as_ref().and_then(street_address))
        .or_else(|| point.address.as_ref().and_then(nested_street_address))
        .or_else(|| {
            point
                .intersection
                .as_ref()
                .and_then(|i| i.street.as_ref())
                .and_then(|s| non_empty(s.name.as_deref()))
                .map(|street| format!("closest intersection to destination at {street}"))
        })
        .unwrap_or_else(|| fallback.to_string());

    StopRef::placeholder(&name)
}

/// "{number} {street}" from an address's own street, or just the street.
fn street_address(address: &RawAddress) -> Option<String> {
    let street = non_empty(address.street.as_ref()?.name.as_deref())?;
    Some(join_number(address, None, street))
}

/// Street from an address wrapped inside another address.
///
/// The number is taken from the inner address, then the outer one.
fn nested_street_address(outer: &RawAddress) -> Option<String> {
    let inner = outer.address.as_deref()?;
    let street = non_empty(inner.street.as_ref()?.name.as_deref())?;
    Some(join_number(inner, Some(outer), street))
}

fn join_number(address: &RawAddress, outer: Option<&RawAddress>, street: &str) -> String {
    let number = address
        .street_number
        .as_ref()
        .or_else(|| outer.and_then(|o| o.street_number.as_ref()))
        .map(|n| n.to_text())
        .filter(|n| !n.is_empty());

    match number {
        Some(number) => format!("{number} {street}"),
        None => street.to_string(),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
