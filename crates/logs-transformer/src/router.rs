// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Daily index rotation.
//!
//! An event lands in `<prefix>-YYYY-MM-DD`, where the date is taken from the event's
//! own timestamp at UTC. There is no default index: an event without a usable
//! timestamp fails routing.

use chrono::{DateTime, Datelike, Utc};

use crate::decoder::RawTimestamp;
use crate::error::RoutingError;

/// Destination of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub index: String,
    pub timestamp: DateTime<Utc>,
}

/// Maps event timestamps to index names for a fixed prefix.
#[derive(Debug, Clone)]
pub struct IndexRouter {
    prefix: String,
}

impl IndexRouter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Parses the timestamp and computes the index for it.
    pub fn route(&self, timestamp: Option<&RawTimestamp>) -> Result<Route, RoutingError> {
        let timestamp = parse_timestamp(timestamp)?;
        Ok(Route {
            index: index_name(&self.prefix, timestamp),
            timestamp,
        })
    }
}

/// `<prefix>-YYYY-MM-DD` for the UTC date of `timestamp`.
pub fn index_name(prefix: &str, timestamp: DateTime<Utc>) -> String {
    format!("{prefix}-{}", timestamp.format("%Y-%m-%d"))
}

/// Interprets a payload timestamp.
///
/// Accepts epoch milliseconds (integer, fractional, or as a decimal string) and RFC 3339
/// text. Dates outside years 0000-9999 are rejected since they cannot be written as a
/// four digit year in an index name.
pub fn parse_timestamp(raw: Option<&RawTimestamp>) -> Result<DateTime<Utc>, RoutingError> {
    let timestamp = match raw {
        None => return Err(RoutingError::Missing),
        Some(RawTimestamp::Millis(millis)) => from_millis(*millis)?,
        Some(RawTimestamp::Fractional(millis)) => {
            if !millis.is_finite() {
                return Err(RoutingError::Unparseable(millis.to_string()));
            }
            // saturating cast, out of range values are caught below
            from_millis(millis.floor() as i64)?
        }
        Some(RawTimestamp::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(RoutingError::Missing);
            }
            match text.parse::<i64>() {
                Ok(millis) => from_millis(millis)?,
                Err(_) => DateTime::parse_from_rfc3339(text)
                    .map_err(|_| RoutingError::Unparseable(text.to_string()))?
                    .with_timezone(&Utc),
            }
        }
    };

    if !(0..=9999).contains(&timestamp.year()) {
        return Err(RoutingError::OutOfRange(timestamp.timestamp_millis()));
    }
    Ok(timestamp)
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>, RoutingError> {
    DateTime::from_timestamp_millis(millis).ok_or(RoutingError::OutOfRange(millis))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use duplicate::duplicate_item;

    fn route_millis(millis: i64) -> String {
        IndexRouter::new("logs")
            .route(Some(&RawTimestamp::Millis(millis)))
            .unwrap()
            .index
    }

    #[test]
    fn test_day_boundary_routes_to_different_indices() {
        // 2024-03-01T23:59:59.999Z and 2024-03-02T00:00:00.000Z
        let before = route_millis(1_709_337_599_999);
        let after = route_millis(1_709_337_600_000);

        assert_eq!(before, "logs-2024-03-01");
        assert_eq!(after, "logs-2024-03-02");
        assert_ne!(before, after);
    }

    #[test]
    fn test_route_is_deterministic() {
        let router = IndexRouter::new("tasks-logs");
        let timestamp = RawTimestamp::Millis(1_510_109_208_016);
        let first = router.route(Some(&timestamp)).unwrap();
        let second = router.route(Some(&timestamp)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.index, "tasks-logs-2017-11-08");
    }

    #[duplicate_item(
        test_name                           raw                                                       expected;
        [test_route_millis]                 [RawTimestamp::Millis(1_709_337_600_000)]                 ["logs-2024-03-02"];
        [test_route_fractional_millis]      [RawTimestamp::Fractional(1_709_337_599_999.9)]           ["logs-2024-03-01"];
        [test_route_millis_text]            [RawTimestamp::Text("1709337599999".to_string())]         ["logs-2024-03-01"];
        [test_route_rfc3339_utc]            [RawTimestamp::Text("2024-03-01T23:59:59.999Z".to_string())]      ["logs-2024-03-01"];
        [test_route_rfc3339_offset]         [RawTimestamp::Text("2024-03-01T20:00:00-05:00".to_string())]     ["logs-2024-03-02"];
        [test_route_leap_day]               [RawTimestamp::Text("2024-02-29T12:00:00Z".to_string())]          ["logs-2024-02-29"];
        [test_route_epoch]                  [RawTimestamp::Millis(0)]                                 ["logs-1970-01-01"];
        [test_route_before_epoch]           [RawTimestamp::Millis(-1)]                                ["logs-1969-12-31"];
    )]
    #[test]
    fn test_name() {
        let route = IndexRouter::new("logs").route(Some(&raw)).unwrap();
        assert_eq!(route.index, expected);
    }

    #[test]
    fn test_route_missing_timestamp() {
        let router = IndexRouter::new("logs");
        assert_eq!(router.route(None), Err(RoutingError::Missing));
        assert_eq!(
            router.route(Some(&RawTimestamp::Text("  ".to_string()))),
            Err(RoutingError::Missing)
        );
    }

    #[test]
    fn test_route_unparseable_timestamp() {
        let router = IndexRouter::new("logs");
        assert_eq!(
            router.route(Some(&RawTimestamp::Text("yesterday".to_string()))),
            Err(RoutingError::Unparseable("yesterday".to_string()))
        );
        assert!(matches!(
            router.route(Some(&RawTimestamp::Fractional(f64::NAN))),
            Err(RoutingError::Unparseable(_))
        ));
    }

    #[test]
    fn test_route_out_of_range_timestamp() {
        let router = IndexRouter::new("logs");
        assert_eq!(
            router.route(Some(&RawTimestamp::Millis(i64::MAX))),
            Err(RoutingError::OutOfRange(i64::MAX))
        );
        // year 10000
        assert!(matches!(
            router.route(Some(&RawTimestamp::Millis(253_402_300_800_000))),
            Err(RoutingError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_index_name_format() {
        let timestamp = DateTime::from_timestamp_millis(1_704_067_200_000).unwrap();
        assert_eq!(index_name("app", timestamp), "app-2024-01-01");
    }
}
