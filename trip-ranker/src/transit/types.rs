//! Trip-planner response DTOs.
//!
//! These types map directly to the backend's JSON records. Nearly every
//! field is an `Option` because the backend omits fields rather than
//! sending nulls, and because which fields are required is decided by the
//! conversion step, not by deserialization.
//!
//! Segment records are decoded leniently: a sub-record of the wrong type is
//! treated as absent instead of failing the whole segment, so that a bad
//! route or stop only costs that piece of information.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Top-level trip-planner response.
///
/// Plans stay untyped here so that one malformed plan cannot fail the
/// decoding of its siblings.
#[derive(Debug, Clone, Deserialize)]
pub struct TripPlannerResponse {
    #[serde(default)]
    pub plans: Vec<serde_json::Value>,

    /// When the backend answered the query.
    #[serde(rename = "query-time")]
    pub query_time: Option<String>,
}

/// One itinerary record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlan {
    pub number: Option<i64>,
    pub times: Option<RawTimes>,

    /// Segments stay untyped until the plan is built; see `RawSegment`.
    pub segments: Option<Vec<serde_json::Value>>,
}

/// Start/end literals plus durations, shared by plans and segments.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTimes {
    pub start: Option<String>,
    pub end: Option<String>,
    pub durations: Option<RawDurations>,
}

/// Durations in seconds. Segments only carry `total`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDurations {
    pub total: Option<i64>,
    pub walking: Option<i64>,
    pub waiting: Option<i64>,
    pub riding: Option<i64>,
}

/// One itinerary segment record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSegment {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub times: Option<RawTimes>,
    #[serde(default, deserialize_with = "lenient")]
    pub route: Option<RawRoute>,
    #[serde(default, deserialize_with = "lenient")]
    pub variant: Option<RawVariant>,
    #[serde(default, deserialize_with = "lenient")]
    pub from: Option<RawEndpoint>,
    #[serde(default, deserialize_with = "lenient")]
    pub to: Option<RawEndpoint>,
}

/// Route of a ride segment.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRoute {
    /// Numeric route key. Named keys such as "BLUE" decode as `None`.
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub number: Option<NumberOrText>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// Route variant of a ride segment.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVariant {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<NumberOrText>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// The "from" or "to" side of a segment.
///
/// `origin` only appears on "from" sides and `destination` on "to" sides.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEndpoint {
    #[serde(default, deserialize_with = "lenient")]
    pub stop: Option<RawStop>,
    #[serde(default, deserialize_with = "lenient")]
    pub origin: Option<RawLocationPoint>,
    #[serde(default, deserialize_with = "lenient")]
    pub destination: Option<RawLocationPoint>,
}

/// A catalogued stop.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStop {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub centre: Option<RawCentre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCentre {
    pub geographic: Option<RawGeographic>,
}

/// Coordinates, usually sent as numeric strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGeographic {
    pub latitude: Option<NumberOrText>,
    pub longitude: Option<NumberOrText>,
}

/// A trip origin or destination that is not a stop.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLocationPoint {
    pub monument: Option<RawMonument>,
    pub address: Option<RawAddress>,
    pub intersection: Option<RawIntersection>,
}

/// A named landmark with an address.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMonument {
    pub name: Option<String>,
    pub address: Option<RawAddress>,
}

/// A street address. Some responses wrap the address in another one.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAddress {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<i64>,
    #[serde(rename = "street-number")]
    pub street_number: Option<NumberOrText>,
    pub street: Option<RawStreet>,
    pub address: Option<Box<RawAddress>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStreet {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawIntersection {
    pub street: Option<RawStreet>,
    #[serde(rename = "cross-street")]
    pub cross_street: Option<RawStreet>,
}

/// Decode an optional field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| T::deserialize(v).ok()))
}

/// A scalar the backend sends either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl NumberOrText {
    /// The value as display text. Integers and their string forms agree.
    pub fn to_text(&self) -> String {
        match self {
            NumberOrText::Integer(n) => n.to_string(),
            NumberOrText::Float(f) => f.to_string(),
            NumberOrText::Text(s) => s.trim().to_string(),
        }
    }

    /// The value as a finite float, if it is one.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            NumberOrText::Integer(n) => *n as f64,
            NumberOrText::Float(f) => *f,
            NumberOrText::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}
