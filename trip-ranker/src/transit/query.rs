//! Trip-planner queries.

use chrono::NaiveDateTime;

/// What to ask the trip planner for.
///
/// `origin` and `destination` are backend location expressions, e.g.
/// `stops/10064`, `addresses/136590` or `geo/49.8951,-97.1384`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TripQuery {
    pub origin: String,
    pub destination: String,
    /// Desired departure; the backend assumes "now" when absent.
    pub at: Option<NaiveDateTime>,
    /// Overrides the configured result limit.
    pub limit: Option<usize>,
}

impl TripQuery {
    /// Create a query departing now.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            at: None,
            limit: None,
        }
    }

    /// Set the desired departure time.
    pub fn departing_at(mut self, at: NaiveDateTime) -> Self {
        self.at = Some(at);
        self
    }

    /// Set the maximum number of plans to return.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::at;

    #[test]
    fn query_builder() {
        let query = TripQuery::new("stops/10064", "geo/49.9,-97.1")
            .departing_at(at(10, 0, 0))
            .with_limit(3);

        assert_eq!(query.origin, "stops/10064");
        assert_eq!(query.destination, "geo/49.9,-97.1");
        assert_eq!(query.at, Some(at(10, 0, 0)));
        assert_eq!(query.limit, Some(3));
    }

    #[test]
    fn query_defaults() {
        let query = TripQuery::new("a", "b");
        assert!(query.at.is_none());
        assert!(query.limit.is_none());
    }
}
