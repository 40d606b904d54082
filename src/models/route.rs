//! Pedestrian routing request/response types and derived distance records.

use serde::{Deserialize, Serialize};

use crate::error::{PrintHubError, Result};
use crate::geo::{Coordinates, ROUTE_POLYLINE_PRECISION, decode_polyline};

/// Costing model requested from the routing service.
const PEDESTRIAN_COSTING: &str = "pedestrian";

/// Distance unit requested from the routing service.
const KILOMETERS: &str = "kilometers";

/// Seconds of routed walking time per displayed minute.
///
/// The walking estimate is halved before display, so 120 seconds of routed
/// time count as one minute.
const SECONDS_PER_DISPLAY_MINUTE: f64 = 120.0;

/// A location in a route request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl From<Coordinates> for Location {
    #[inline]
    fn from(coords: Coordinates) -> Self {
        Self {
            lat: coords.latitude,
            lon: coords.longitude,
        }
    }
}

/// Options controlling turn-by-turn output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionsOptions {
    /// Distance unit for lengths in the response.
    pub units: String,
}

/// Body of `POST /route`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Origin and destination, in that order.
    pub locations: Vec<Location>,
    /// Costing model.
    pub costing: String,
    /// Directions options.
    pub directions_options: DirectionsOptions,
}

impl RouteRequest {
    /// Builds a pedestrian route request in kilometres.
    #[inline]
    #[must_use]
    pub fn pedestrian(origin: Coordinates, destination: Coordinates) -> Self {
        Self {
            locations: vec![origin.into(), destination.into()],
            costing: PEDESTRIAN_COSTING.to_owned(),
            directions_options: DirectionsOptions {
                units: KILOMETERS.to_owned(),
            },
        }
    }
}

/// Length and duration of a trip or leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Length in the requested unit (kilometres).
    pub length: f64,
    /// Duration in seconds.
    pub time: f64,
}

/// One turn-by-turn instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    /// Maneuver type code as defined by the routing service.
    #[serde(rename = "type", default)]
    pub kind: u32,
    /// Human-readable instruction.
    #[serde(default)]
    pub instruction: String,
    /// Length of this maneuver in kilometres.
    #[serde(default)]
    pub length: f64,
    /// Duration of this maneuver in seconds.
    #[serde(default)]
    pub time: f64,
    /// Street names involved, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub street_names: Vec<String>,
}

/// One leg of a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Leg totals.
    pub summary: Summary,
    /// Encoded polyline of the leg geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    /// Turn-by-turn instructions.
    #[serde(default)]
    pub maneuvers: Vec<Maneuver>,
}

/// A computed trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Trip legs; one for a two-location request.
    #[serde(default)]
    pub legs: Vec<Leg>,
    /// Trip totals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

/// Response of `POST /route`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    /// The computed trip.
    pub trip: Trip,
}

impl RouteResponse {
    /// Returns the first leg's summary, or the trip summary when the
    /// response carries no legs.
    #[inline]
    #[must_use]
    pub fn summary(&self) -> Option<Summary> {
        self.trip
            .legs
            .first()
            .map(|leg| leg.summary)
            .or(self.trip.summary)
    }
}

/// Walking distance and display time from the user to a shop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    /// Distance in kilometres, rounded to two decimals.
    #[serde(rename = "distance")]
    pub distance_km: f64,
    /// Display time in minutes.
    #[serde(rename = "time")]
    pub minutes: u32,
}

impl Distance {
    /// Derives a distance record from a route summary.
    ///
    /// Returns `None` for negative or non-finite values.
    #[must_use]
    pub fn from_summary(summary: Summary) -> Option<Self> {
        let valid = |value: f64| value.is_finite() && value >= 0.0;
        if !valid(summary.length) || !valid(summary.time) {
            return None;
        }
        let rounded = (summary.time / SECONDS_PER_DISPLAY_MINUTE).ceil();
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "minutes is finite, non-negative and saturates on overflow"
        )]
        let minutes = rounded as u32;
        Some(Self {
            distance_km: (summary.length * 100.0).round() / 100.0,
            minutes,
        })
    }
}

/// A decoded route from the user to a shop.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Route geometry.
    pub points: Vec<Coordinates>,
    /// Distance record for the route.
    pub distance: Distance,
    /// Turn-by-turn instructions.
    pub maneuvers: Vec<Maneuver>,
}

impl TryFrom<RouteResponse> for Route {
    type Error = PrintHubError;

    fn try_from(response: RouteResponse) -> Result<Self> {
        let summary = response.summary().ok_or(PrintHubError::NoRoute)?;
        let distance = Distance::from_summary(summary).ok_or(PrintHubError::NoRoute)?;
        let Some(leg) = response.trip.legs.into_iter().next() else {
            return Ok(Self {
                points: Vec::new(),
                distance,
                maneuvers: Vec::new(),
            });
        };
        let points = match leg.shape {
            Some(shape) => decode_polyline(&shape, ROUTE_POLYLINE_PRECISION)?,
            None => Vec::new(),
        };
        Ok(Self {
            points,
            distance,
            maneuvers: leg.maneuvers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "trip": {
            "legs": [{
                "summary": {"length": 1.2345, "time": 845.0},
                "shape": "_p~iF~ps|U_ulLnnqC",
                "maneuvers": [
                    {"type": 1, "instruction": "Walk north.", "length": 0.5, "time": 300.0},
                    {"type": 4, "instruction": "You have arrived.", "length": 0.0, "time": 0.0}
                ]
            }],
            "summary": {"length": 1.2345, "time": 845.0}
        }
    }"#;

    #[test]
    fn request_shape_matches_routing_service() {
        let req = RouteRequest::pedestrian(Coordinates::new(1.0, 2.0), Coordinates::new(3.0, 4.0));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["costing"], "pedestrian");
        assert_eq!(json["directions_options"]["units"], "kilometers");
        assert_eq!(json["locations"][1]["lon"], 4.0);
    }

    #[test]
    fn distance_rounds_and_halves_time() {
        let d = Distance::from_summary(Summary {
            length: 1.2345,
            time: 845.0,
        })
        .unwrap();
        assert!((d.distance_km - 1.23).abs() < 1e-9);
        assert_eq!(d.minutes, 8);
    }

    #[test]
    fn distance_exact_multiple_does_not_round_up() {
        let d = Distance::from_summary(Summary {
            length: 0.0,
            time: 240.0,
        })
        .unwrap();
        assert_eq!(d.minutes, 2);
    }

    #[test]
    fn distance_rejects_invalid_values() {
        assert!(Distance::from_summary(Summary {
            length: -1.0,
            time: 1.0
        })
        .is_none());
        assert!(Distance::from_summary(Summary {
            length: 1.0,
            time: f64::NAN
        })
        .is_none());
    }

    #[test]
    fn route_from_response_decodes_shape() {
        let response: RouteResponse = serde_json::from_str(RESPONSE).unwrap();
        let route = Route::try_from(response).unwrap();
        assert_eq!(route.points.len(), 2);
        assert_eq!(route.maneuvers.len(), 2);
        assert_eq!(route.maneuvers[1].kind, 4);
        assert_eq!(route.distance.minutes, 8);
    }

    #[test]
    fn summary_falls_back_to_trip_summary() {
        let response: RouteResponse =
            serde_json::from_str(r#"{"trip": {"summary": {"length": 2.0, "time": 60.0}}}"#)
                .unwrap();
        let route = Route::try_from(response).unwrap();
        assert!(route.points.is_empty());
        assert_eq!(route.distance.minutes, 1);
    }

    #[test]
    fn empty_trip_is_no_route() {
        let response: RouteResponse = serde_json::from_str(r#"{"trip": {"legs": []}}"#).unwrap();
        assert!(matches!(
            Route::try_from(response),
            Err(PrintHubError::NoRoute)
        ));
    }

    #[test]
    fn distance_serde_uses_cache_field_names() {
        let json = serde_json::to_string(&Distance {
            distance_km: 0.5,
            minutes: 3,
        })
        .unwrap();
        assert_eq!(json, r#"{"distance":0.5,"time":3}"#);
    }
}
