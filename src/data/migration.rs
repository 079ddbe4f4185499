//! Migration routes

use serde::{Deserialize, Serialize};

use crate::core::types::{LatLng, Year};

/// A migration drawn as a polyline that grows between its start and end dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRoute {
    pub id: String,
    pub name: String,
    pub start: Year,
    pub end: Year,
    /// Ordered waypoints; at least two for a drawable route
    pub path: Vec<LatLng>,
    pub color: String,
    /// Language branch this movement led to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Compact map label; a line break separates stacked words
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_label: Option<String>,
    /// `[dLat, dLng]` nudge applied to the end-point label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_offset: Option<[f64; 2]>,
    #[serde(default)]
    pub description: String,
}

impl MigrationRoute {
    /// Duration in years; zero or negative for degenerate records
    pub fn duration(&self) -> Year {
        self.end - self.start
    }

    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }

    pub fn last_point(&self) -> Option<LatLng> {
        self.path.last().copied()
    }

    /// Label shown next to a completed route
    pub fn display_label(&self) -> Option<String> {
        self.short_label
            .as_deref()
            .or(self.branch.as_deref())
            .filter(|label| !label.is_empty())
            .map(|label| label.replace('\n', " / "))
    }

    /// Where the completed-route label sits
    pub fn label_anchor(&self) -> Option<LatLng> {
        self.last_point()
            .map(|end| end.offset(self.label_offset.unwrap_or([0.0, 0.0])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> MigrationRoute {
        MigrationRoute {
            id: "yamnaya-europe".into(),
            name: "Yamnaya into Europe".into(),
            start: -3000,
            end: -2500,
            path: vec![LatLng::new(47.0, 35.0), LatLng::new(50.0, 20.0)],
            color: "#E74C3C".into(),
            branch: Some("Germanic, Balto-Slavic".into()),
            short_label: Some("Balto-Slavic\nGermanic".into()),
            label_offset: Some([1.5, -2.0]),
            description: String::new(),
        }
    }

    #[test]
    fn test_display_label_prefers_short_label() {
        assert_eq!(route().display_label().as_deref(), Some("Balto-Slavic / Germanic"));

        let mut r = route();
        r.short_label = None;
        assert_eq!(r.display_label().as_deref(), Some("Germanic, Balto-Slavic"));

        r.branch = None;
        assert_eq!(r.display_label(), None);
    }

    #[test]
    fn test_label_anchor_applies_offset() {
        let anchor = route().label_anchor().unwrap();
        assert!(anchor.approx_eq(LatLng::new(51.5, 18.0), 1e-9));
    }
}
