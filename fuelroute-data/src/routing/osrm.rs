//! OSRM API response types for the Route service.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// OSRM Route API response.
///
/// The `code` field indicates the response status; `routes` is absent on
/// failure.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route found between the coordinates
    /// - `"NoSegment"` - A coordinate could not be snapped to the network
    /// - `"InvalidQuery"` - Invalid query parameters
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Route candidates, best first.
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// One route candidate.
#[derive(Debug, Deserialize)]
pub struct Route {
    /// Distance in metres.
    pub distance: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Polyline-encoded geometry when `geometries=polyline`.
    pub geometry: String,
    /// One leg per pair of consecutive waypoints.
    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// Route between two waypoints.
#[derive(Debug, Deserialize)]
pub struct Leg {
    /// Turn-by-turn steps when `steps=true`.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One manoeuvre along a leg.
#[derive(Debug, Deserialize)]
pub struct Step {
    /// Distance in metres.
    pub distance: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Name of the road travelled.
    #[serde(default)]
    pub name: String,
    /// Manoeuvre at the start of the step.
    pub maneuver: Option<Maneuver>,
}

/// Manoeuvre description.
#[derive(Debug, Deserialize)]
pub struct Maneuver {
    /// Manoeuvre type, e.g. `turn`, `depart` or `arrive`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Direction modifier, e.g. `left`.
    pub modifier: Option<String>,
}

impl Maneuver {
    /// Human-readable instruction such as `turn left`.
    #[must_use]
    pub fn instruction(&self) -> String {
        match &self.modifier {
            Some(modifier) => format!("{} {modifier}", self.kind),
            None => self.kind.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_success_response() {
        let json = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 16093.4,
                "duration": 720.0,
                "geometry": "_p~iF~ps|U_ulLnnqC",
                "legs": [{"steps": [{
                    "distance": 16093.4,
                    "duration": 720.0,
                    "name": "I-35",
                    "maneuver": {"type": "turn", "modifier": "left", "location": [0.0, 0.0]}
                }]}]
            }],
            "waypoints": []
        }"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let route = response.routes.first().expect("one route");
        assert_eq!(route.distance, 16093.4);
        let step = route
            .legs
            .first()
            .and_then(|leg| leg.steps.first())
            .expect("one step");
        assert_eq!(step.name, "I-35");
        let maneuver = step.maneuver.as_ref().expect("maneuver");
        assert_eq!(maneuver.instruction(), "turn left");
    }

    #[test]
    fn deserialise_error_response() {
        let json = r#"{
            "code": "NoSegment",
            "message": "Could not find a matching segment for coordinate 0"
        }"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert!(response.routes.is_empty());
        assert_eq!(
            response.message.as_deref(),
            Some("Could not find a matching segment for coordinate 0")
        );
    }
}
