//! Place-search candidates and distance helpers.

use geo::Coord;

use crate::PlaceId;

/// A geocoding search hit awaiting selection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateLocation {
    /// Provider identifier used to fetch coordinates.
    pub place_id: PlaceId,
    /// Text shown to the user.
    pub description: String,
}

impl CandidateLocation {
    /// Construct a candidate.
    pub fn new(place_id: impl Into<PlaceId>, description: impl Into<String>) -> Self {
        Self {
            place_id: place_id.into(),
            description: description.into(),
        }
    }
}

const METERS_PER_KILOMETER: f64 = 1_000.0;

/// Convert a provider distance in meters to kilometers, rounded to two
/// decimal places.
///
/// Negative or non-finite input yields `None`.
///
/// # Examples
/// ```
/// use freight_core::meters_to_kilometers;
///
/// assert_eq!(meters_to_kilometers(12_346.0), Some(12.35));
/// assert_eq!(meters_to_kilometers(-1.0), None);
/// ```
#[must_use]
pub fn meters_to_kilometers(meters: f64) -> Option<f64> {
    if !meters.is_finite() || meters < 0.0 {
        return None;
    }
    let km = meters / METERS_PER_KILOMETER;
    Some((km * 100.0).round() / 100.0)
}

/// Cache key for an origin/destination pair.
///
/// Each coordinate is rounded to four decimal places (about 11 m), so
/// requests for practically identical points share an entry.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use freight_core::coordinate_pair_key;
///
/// let key = coordinate_pair_key(
///     Coord { x: 30.061_23, y: -1.944_44 },
///     Coord { x: 29.74, y: -2.6 },
/// );
/// assert_eq!(key, "-1.9444,30.0612|-2.6000,29.7400");
/// ```
#[must_use]
pub fn coordinate_pair_key(origin: Coord<f64>, destination: Coord<f64>) -> String {
    format!(
        "{}|{}",
        coordinate_key(origin),
        coordinate_key(destination)
    )
}

fn coordinate_key(coord: Coord<f64>) -> String {
    format!("{:.4},{:.4}", coord.y, coord.x)
}
