//! Segment endpoint references.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Key carried by endpoints that are not catalogued stops.
pub const PLACEHOLDER_KEY: i64 = -1;

/// A latitude/longitude pair.
///
/// Equality and hashing use the bit pattern of each coordinate, which keeps
/// `Coordinates` usable inside `Eq + Hash` plan types. Two coordinates parsed
/// from the same literal always compare equal.
#[derive(Debug, Clone, Copy)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl PartialEq for Coordinates {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl Eq for Coordinates {}

impl Hash for Coordinates {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

/// A possibly-partial reference to a stop or address point.
///
/// Either a catalogued stop (real key and a location) or a synthetic
/// placeholder such as an address, "Current Location" or "Destination"
/// with key [`PLACEHOLDER_KEY`].
///
/// # Examples
///
/// ```
/// use trip_ranker::domain::{Coordinates, StopRef};
///
/// let stop = StopRef::catalogued(10064, "Portage@Main", Coordinates::new(49.89, -97.14));
/// assert!(stop.is_catalogued());
/// assert_eq!(stop.display_name(), "Portage @ Main");
///
/// let here = StopRef::placeholder("Current Location");
/// assert!(!here.is_catalogued());
/// assert_eq!(here.key(), -1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StopRef {
    key: i64,
    display_name: String,
    location: Option<Coordinates>,
}

impl StopRef {
    /// A stop from the backend's stop catalogue.
    pub fn catalogued(key: i64, name: &str, location: Coordinates) -> Self {
        Self {
            key,
            display_name: readable_name(name),
            location: Some(location),
        }
    }

    /// A synthetic endpoint with no catalogue entry.
    pub fn placeholder(name: &str) -> Self {
        Self {
            key: PLACEHOLDER_KEY,
            display_name: readable_name(name),
            location: None,
        }
    }

    /// Backend stop key, or [`PLACEHOLDER_KEY`].
    pub fn key(&self) -> i64 {
        self.key
    }

    /// Name for display.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Location, if known.
    pub fn location(&self) -> Option<Coordinates> {
        self.location
    }

    /// Returns true for a real catalogued stop with a known location.
    pub fn is_catalogued(&self) -> bool {
        self.key != PLACEHOLDER_KEY && self.location.is_some()
    }
}

impl fmt::Display for StopRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

/// Stop names use `@` between street names ("Portage@Main").
fn readable_name(name: &str) -> String {
    name.replace('@', " @ ")
}
