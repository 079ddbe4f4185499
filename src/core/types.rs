//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Calendar year as stored in the datasets (negative = BCE)
pub type Year = i32;

/// Continuous date on the timeline, in years (negative = BCE)
pub type Date = f64;

/// Geographic point, serialized as `[lat, lng]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear interpolation toward `other` by `t` (0.0 = self, 1.0 = other)
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }

    /// Offset by a `[dLat, dLng]` pair
    pub fn offset(self, by: [f64; 2]) -> Self {
        Self {
            lat: self.lat + by[0],
            lng: self.lng + by[1],
        }
    }

    /// Compass bearing in degrees from `self` to `to` (0 = north, 90 = east).
    ///
    /// Treats lat/lng as planar, which is what the map arrowheads need.
    pub fn bearing_to(self, to: Self) -> f64 {
        let dx = to.lng - self.lng;
        let dy = to.lat - self.lat;
        dx.atan2(dy).to_degrees()
    }

    pub fn approx_eq(self, other: Self, eps: f64) -> bool {
        (self.lat - other.lat).abs() <= eps && (self.lng - other.lng).abs() <= eps
    }
}

impl From<[f64; 2]> for LatLng {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lng]
    }
}

/// Format a date as an era label, e.g. `-2500` -> "2500 BCE"
pub fn bce_label(date: Date) -> String {
    format!("{} BCE", date.abs().round() as i64)
}

/// Format a year range, e.g. "3300–2600 BCE"
pub fn bce_range(start: Year, end: Year) -> String {
    format!("{}\u{2013}{} BCE", start.abs(), end.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latlng_serde_as_pair() {
        let p: LatLng = serde_json::from_str("[47.5, 42.0]").unwrap();
        assert_eq!(p, LatLng::new(47.5, 42.0));
        assert_eq!(serde_json::to_string(&p).unwrap(), "[47.5,42.0]");
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = LatLng::new(0.0, 0.0);
        assert!((origin.bearing_to(LatLng::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((origin.bearing_to(LatLng::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((origin.bearing_to(LatLng::new(0.0, -1.0)) + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_labels() {
        assert_eq!(bce_label(-2500.0), "2500 BCE");
        assert_eq!(bce_range(-3300, -2600), "3300\u{2013}2600 BCE");
    }
}
