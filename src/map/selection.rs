//! Exclusive culture/route selection and detail popups

use glam::Vec2;

use crate::core::types::bce_label;
use crate::data::{Culture, Dataset, MigrationRoute};

/// Something on the map that can be clicked
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapTarget {
    Culture(String),
    Route(String),
}

/// At most one culture or route is selected at a time
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MapSelection {
    #[default]
    Nothing,
    Culture { id: String, anchor: Vec2 },
    Route { id: String, anchor: Vec2 },
}

impl MapSelection {
    /// Select `target`, replacing whatever was selected before
    pub fn select(&mut self, target: MapTarget, anchor: Vec2) {
        *self = match target {
            MapTarget::Culture(id) => MapSelection::Culture { id, anchor },
            MapTarget::Route(id) => MapSelection::Route { id, anchor },
        };
    }

    pub fn clear(&mut self) {
        *self = MapSelection::Nothing;
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MapSelection::Nothing)
    }

    pub fn selected_culture(&self) -> Option<&str> {
        match self {
            MapSelection::Culture { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn selected_route(&self) -> Option<&str> {
        match self {
            MapSelection::Route { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Container point the popup hangs from
    pub fn anchor(&self) -> Option<Vec2> {
        match self {
            MapSelection::Nothing => None,
            MapSelection::Culture { anchor, .. } | MapSelection::Route { anchor, .. } => {
                Some(*anchor)
            }
        }
    }
}

/// One row of the ancestry breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct AncestryShare {
    pub code: &'static str,
    pub label: &'static str,
    pub percent: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CultureDetails {
    pub name: String,
    pub color: String,
    /// "3300 BCE to 2600 BCE"
    pub dates: String,
    pub region: String,
    pub description: Option<String>,
    /// Empty when the culture has no genetic profile
    pub ancestry: Vec<AncestryShare>,
    pub innovations: Vec<String>,
}

impl CultureDetails {
    pub fn from_culture(culture: &Culture) -> Self {
        let ancestry = culture
            .genetic_profile
            .as_ref()
            .map(|profile| {
                profile
                    .components()
                    .into_iter()
                    .map(|(component, percent)| AncestryShare {
                        code: component.code(),
                        label: component.label(),
                        percent,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            name: culture.name.clone(),
            color: culture.color.clone(),
            dates: format!(
                "{} to {}",
                bce_label(culture.start as f64),
                bce_label(culture.end as f64)
            ),
            region: culture.region.clone(),
            description: non_empty(&culture.description),
            ancestry,
            innovations: culture.innovations.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteDetails {
    /// Branch label, falling back to the route name
    pub title: String,
    pub name: String,
    pub color: String,
    pub dates: String,
    pub branch: Option<String>,
    pub description: Option<String>,
}

impl RouteDetails {
    pub fn from_route(route: &MigrationRoute) -> Self {
        Self {
            title: route.display_label().unwrap_or_else(|| route.name.clone()),
            name: route.name.clone(),
            color: route.color.clone(),
            dates: format!(
                "{} to {}",
                bce_label(route.start as f64),
                bce_label(route.end as f64)
            ),
            branch: route.branch.clone(),
            description: non_empty(&route.description),
        }
    }
}

/// Popup content for the current selection
#[derive(Debug, Clone, PartialEq)]
pub enum Popup {
    Culture { anchor: Vec2, details: CultureDetails },
    Route { anchor: Vec2, details: RouteDetails },
}

impl Popup {
    /// `None` when nothing is selected or the id no longer resolves
    pub fn for_selection(selection: &MapSelection, dataset: &Dataset) -> Option<Popup> {
        match selection {
            MapSelection::Nothing => None,
            MapSelection::Culture { id, anchor } => dataset.culture(id).map(|c| Popup::Culture {
                anchor: *anchor,
                details: CultureDetails::from_culture(c),
            }),
            MapSelection::Route { id, anchor } => dataset.migration(id).map(|r| Popup::Route {
                anchor: *anchor,
                details: RouteDetails::from_route(r),
            }),
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
