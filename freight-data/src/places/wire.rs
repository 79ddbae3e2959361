//! Response types for the place autocomplete and details services.

use serde::Deserialize;

/// Status reported when a search matched nothing.
pub const ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Status reported on success.
pub const OK: &str = "OK";

/// Autocomplete response.
#[derive(Debug, Deserialize)]
pub struct AutocompleteResponse {
    /// `"OK"`, `"ZERO_RESULTS"` or an error status such as
    /// `"OVER_QUERY_LIMIT"`.
    pub status: String,
    /// Detail accompanying an error status.
    #[serde(default)]
    pub error_message: Option<String>,
    /// Matching places.
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// One autocomplete match.
#[derive(Debug, Deserialize)]
pub struct Prediction {
    /// Identifier accepted by the details service.
    pub place_id: String,
    /// Display text.
    pub description: String,
}

/// Place details response, trimmed to the geometry field.
#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    /// Response status.
    pub status: String,
    /// Detail accompanying an error status.
    #[serde(default)]
    pub error_message: Option<String>,
    /// Place details when `status` is `"OK"`.
    pub result: Option<DetailsResult>,
}

/// Details payload.
#[derive(Debug, Deserialize)]
pub struct DetailsResult {
    /// Place geometry.
    pub geometry: Geometry,
}

/// Place geometry.
#[derive(Debug, Deserialize)]
pub struct Geometry {
    /// Representative point.
    pub location: LatLng,
}

/// A WGS84 point as reported by the details service.
#[derive(Debug, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}
