//! Map scene at a given date
//!
//! A pure function of (dataset, date, config). Layers are kept separate so a
//! backend can draw territories, routes, markers and labels in that order.

use crate::core::config::MapConfig;
use crate::core::types::{bce_label, bce_range, Date, LatLng};
use crate::data::{Culture, Dataset, MigrationRoute, TimelineEvent};
use crate::map::progress::{route_progress, tip_bearing, visible_path, RoutePhase};
use crate::map::selection::MapTarget;
use crate::map::visibility::{territory_opacity, visible_cultures};
use crate::render::colors::{self, Color};
use crate::render::{HitRegion, HitShape, Primitive, Stroke, TextAnchor, TextStyle};

pub type MapPrimitive = Primitive<LatLng>;
pub type MapHitRegion = HitRegion<LatLng, MapTarget>;

/// Clickable radius around a completed route's branch label (pixels)
const BRANCH_LABEL_HIT_RADIUS: f32 = 22.0;

/// Style of one layer of a route polyline: (width, opacity)
struct RouteStyle {
    glow: (f32, f32),
    main: (f32, f32),
    arrow_size: f32,
}

const ACTIVE_ROUTE: RouteStyle = RouteStyle {
    glow: (14.0, 0.15),
    main: (5.5, 0.85),
    arrow_size: 28.0,
};

const COMPLETE_ROUTE: RouteStyle = RouteStyle {
    glow: (12.0, 0.1),
    main: (5.0, 0.7),
    arrow_size: 24.0,
};

const ROUTE_OUTLINE: (f32, f32) = (7.0, 0.08);
const ROUTE_HIT_WIDTH: f32 = 20.0;

/// A route as drawn at the scene date
#[derive(Debug, Clone, PartialEq)]
pub struct RouteState {
    pub id: String,
    pub phase: RoutePhase,
    pub progress: f64,
    /// Drawn portion; empty when pending
    pub path: Vec<LatLng>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendRoute {
    pub id: String,
    pub label: String,
    pub color: String,
    /// Still moving at the scene date
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendCulture {
    pub id: String,
    pub label: String,
    pub color: String,
}

/// Legend contents: routes that have started and cultures on the map
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Legend {
    pub routes: Vec<LegendRoute>,
    pub cultures: Vec<LegendCulture>,
}

impl Legend {
    pub fn build(dataset: &Dataset, date: Date, config: &MapConfig) -> Self {
        let routes = dataset
            .migrations
            .iter()
            .filter(|m| (m.start as f64) <= date)
            .map(|m| LegendRoute {
                id: m.id.clone(),
                label: m.display_label().unwrap_or_else(|| m.name.clone()),
                color: m.color.clone(),
                active: (m.end as f64) >= date,
            })
            .collect();
        let cultures = visible_cultures(dataset, date, config)
            .into_iter()
            .map(|c| LegendCulture {
                id: c.id.clone(),
                label: c.short_name().to_string(),
                color: c.color.clone(),
            })
            .collect();
        Self { routes, cultures }
    }

    /// Nothing has started yet
    pub fn is_idle(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Everything the map shows at one date
#[derive(Debug, Clone, Default)]
pub struct MapScene {
    pub date: Date,
    pub territories: Vec<MapPrimitive>,
    pub routes: Vec<MapPrimitive>,
    pub markers: Vec<MapPrimitive>,
    pub labels: Vec<MapPrimitive>,
    /// In drawing order; later regions sit on top
    pub hit_regions: Vec<MapHitRegion>,
    pub route_states: Vec<RouteState>,
    /// Ids of the cultures on the map
    pub visible_cultures: Vec<String>,
    pub legend: Legend,
    /// Most recent timeline event at or before the date
    pub ticker: Option<TimelineEvent>,
}

impl MapScene {
    pub fn build(dataset: &Dataset, date: Date, config: &MapConfig) -> Self {
        let mut scene = MapScene {
            date,
            legend: Legend::build(dataset, date, config),
            ticker: dataset.timeline.latest_at(date).cloned(),
            ..Default::default()
        };

        let cultures = visible_cultures(dataset, date, config);
        for culture in &cultures {
            scene.add_territory(dataset, culture, date, config);
        }
        for route in &dataset.migrations {
            scene.add_route(route, date, config);
        }
        for culture in &cultures {
            scene.add_culture_marker(culture, config);
        }
        scene.add_homeland(config);
        scene.visible_cultures = cultures.iter().map(|c| c.id.clone()).collect();
        scene
    }

    /// All primitives bottom to top
    pub fn primitives(&self) -> impl Iterator<Item = &MapPrimitive> {
        self.territories
            .iter()
            .chain(self.routes.iter())
            .chain(self.markers.iter())
            .chain(self.labels.iter())
    }

    pub fn route_state(&self, id: &str) -> Option<&RouteState> {
        self.route_states.iter().find(|r| r.id == id)
    }

    pub fn is_culture_visible(&self, id: &str) -> bool {
        self.visible_cultures.iter().any(|c| c == id)
    }

    fn add_territory(&mut self, dataset: &Dataset, culture: &Culture, date: Date, config: &MapConfig) {
        let color = Color::from_hex_or_default(&culture.color);
        let opacity = territory_opacity(culture, date, config) as f32;

        match dataset.territories.get(&culture.id) {
            Some(outline) if outline.len() >= 3 => {
                self.territories.push(Primitive::Polygon {
                    points: outline.to_vec(),
                    fill: color,
                    fill_opacity: 0.3 * opacity,
                    stroke: Stroke::new(color, 2.5, 0.6 * opacity),
                });
            }
            _ => tracing::debug!("No territory polygon for culture '{}'", culture.id),
        }

        let label_opacity = (opacity * 1.5).min(1.0);
        self.markers.push(Primitive::Text {
            anchor: culture.center,
            offset: (0.0, -7.0),
            text: culture.short_name().to_string(),
            style: TextStyle::new(color, 12.0).bold().with_opacity(label_opacity),
        });
        self.markers.push(Primitive::Text {
            anchor: culture.center,
            offset: (0.0, 8.0),
            text: bce_range(culture.start, culture.end),
            style: TextStyle::new(colors::MUTED_TEXT, 10.0)
                .bold()
                .with_opacity(label_opacity),
        });
    }

    fn add_route(&mut self, route: &MigrationRoute, date: Date, config: &MapConfig) {
        let phase = RoutePhase::at(route, date);
        let progress = route_progress(route, date);
        let path = visible_path(route, date);
        self.route_states.push(RouteState {
            id: route.id.clone(),
            phase,
            progress,
            path: path.clone().unwrap_or_default(),
        });
        let Some(path) = path else {
            return;
        };

        let color = Color::from_hex_or_default(&route.color);
        let style = match phase {
            RoutePhase::Complete => &COMPLETE_ROUTE,
            _ => &ACTIVE_ROUTE,
        };

        self.routes.push(Primitive::Polyline {
            points: path.clone(),
            stroke: Stroke::new(colors::BLACK, ROUTE_OUTLINE.0, ROUTE_OUTLINE.1),
        });
        self.routes.push(Primitive::Polyline {
            points: path.clone(),
            stroke: Stroke::new(color, style.glow.0, style.glow.1),
        });
        self.routes.push(Primitive::Polyline {
            points: path.clone(),
            stroke: Stroke::new(color, style.main.0, style.main.1),
        });

        let target = MapTarget::Route(route.id.clone());
        self.hit_regions.push(HitRegion {
            target: target.clone(),
            shape: HitShape::Polyline {
                points: path.clone(),
                tolerance: (config.route_hit_tolerance as f32).max(ROUTE_HIT_WIDTH / 2.0),
            },
        });

        let bearing = tip_bearing(&path);
        if let Some(tip) = path.last().copied() {
            self.markers.push(Primitive::Arrowhead {
                tip,
                bearing_deg: bearing,
                size: style.arrow_size,
                color,
            });
        }

        if phase != RoutePhase::Complete {
            return;
        }
        let (Some(label), Some(anchor)) = (route.display_label(), route.label_anchor()) else {
            return;
        };
        self.labels.push(Primitive::Text {
            anchor,
            offset: (0.0, -6.0),
            text: label,
            style: TextStyle::new(colors::WHITE, 12.0)
                .bold()
                .with_background(color.with_alpha(0xdd as f32 / 255.0)),
        });
        self.labels.push(Primitive::Text {
            anchor,
            offset: (0.0, 12.0),
            text: format!("~{}", bce_label(route.end as f64)),
            style: TextStyle::new(colors::MUTED_TEXT, 10.0).bold(),
        });
        self.hit_regions.push(HitRegion {
            target,
            shape: HitShape::Circle {
                center: anchor,
                radius: BRANCH_LABEL_HIT_RADIUS,
            },
        });
    }

    fn add_culture_marker(&mut self, culture: &Culture, config: &MapConfig) {
        let color = Color::from_hex_or_default(&culture.color);
        self.markers.push(Primitive::Circle {
            center: culture.center,
            radius: 7.0,
            fill: Some(color),
            fill_opacity: 0.85,
            stroke: Some(Stroke::new(colors::WHITE, 2.0, 0.9)),
        });
        self.hit_regions.push(HitRegion {
            target: MapTarget::Culture(culture.id.clone()),
            shape: HitShape::Circle {
                center: culture.center,
                radius: config.marker_hit_radius as f32,
            },
        });
    }

    fn add_homeland(&mut self, config: &MapConfig) {
        let gold = colors::ROOT_HIGHLIGHT;
        self.markers.push(Primitive::Circle {
            center: config.homeland,
            radius: 22.0,
            fill: Some(gold),
            fill_opacity: 0.15,
            stroke: Some(Stroke::new(gold, 2.0, 0.4)),
        });
        self.markers.push(Primitive::Circle {
            center: config.homeland,
            radius: 10.0,
            fill: Some(gold),
            fill_opacity: 0.9,
            stroke: Some(Stroke::new(colors::WHITE, 2.5, 0.9)),
        });
        self.labels.push(Primitive::Text {
            anchor: config.homeland,
            offset: (0.0, 24.0),
            text: "PIE HOMELAND".to_string(),
            style: TextStyle::new(colors::HOMELAND_LABEL, 11.0)
                .bold()
                .anchored(TextAnchor::Middle),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TerritoryTable;

    fn scene_at(date: Date) -> MapScene {
        let dataset = Dataset::embedded().unwrap();
        MapScene::build(&dataset, date, &MapConfig::default())
    }

    #[test]
    fn test_homeland_always_present() {
        for date in [-4500.0, -2500.0, -800.0] {
            let scene = scene_at(date);
            assert!(scene.labels.iter().any(|p| matches!(
                p,
                Primitive::Text { text, .. } if text == "PIE HOMELAND"
            )));
        }
    }

    #[test]
    fn test_pending_routes_draw_nothing() {
        let scene = scene_at(-4500.0);
        let state = scene.route_state("yamnaya-europe").unwrap();
        assert_eq!(state.phase, RoutePhase::Pending);
        assert!(state.path.is_empty());
        assert!(!scene
            .hit_regions
            .iter()
            .any(|r| r.target == MapTarget::Route("yamnaya-europe".into())));
    }

    #[test]
    fn test_completed_routes_get_labels() {
        let scene = scene_at(-800.0);
        assert!(scene
            .route_states
            .iter()
            .all(|r| r.phase == RoutePhase::Complete));
        assert!(scene.labels.iter().any(|p| matches!(
            p,
            Primitive::Text { text, .. } if text == "~2500 BCE"
        )));
    }

    #[test]
    fn test_active_route_has_leading_arrow() {
        let scene = scene_at(-2750.0);
        let state = scene.route_state("yamnaya-europe").unwrap();
        assert_eq!(state.phase, RoutePhase::Active);
        assert!((state.progress - 0.5).abs() < 1e-9);
        let tip = *state.path.last().unwrap();
        assert!(scene.markers.iter().any(|p| matches!(
            p,
            Primitive::Arrowhead { tip: t, size, .. } if *t == tip && *size == 28.0
        )));
    }

    #[test]
    fn test_legend_lists_started_routes() {
        let scene = scene_at(-2750.0);
        let europe = scene
            .legend
            .routes
            .iter()
            .find(|r| r.id == "yamnaya-europe")
            .unwrap();
        assert!(europe.active);
        assert!(!scene.legend.routes.iter().any(|r| r.id == "indo-aryan"));
        assert!(scene_at(-4600.0).legend.is_idle());
    }

    #[test]
    fn test_missing_outline_keeps_marker_and_labels() {
        let config = MapConfig::default();
        let mut dataset = Dataset::embedded().unwrap();
        let full = MapScene::build(&dataset, -3000.0, &config);

        let mut territories = TerritoryTable::new();
        let kept: Vec<String> = dataset
            .territories
            .ids()
            .filter(|id| *id != "yamnaya")
            .map(str::to_string)
            .collect();
        for id in kept {
            let outline = dataset.territories.get(&id).unwrap().to_vec();
            territories.insert(id, outline);
        }
        dataset.territories = territories;
        let scene = MapScene::build(&dataset, -3000.0, &config);

        let polygons = |s: &MapScene| {
            s.territories
                .iter()
                .filter(|p| matches!(p, Primitive::Polygon { .. }))
                .count()
        };
        assert_eq!(polygons(&scene), polygons(&full) - 1);
        assert!(scene.is_culture_visible("yamnaya"));

        let center = dataset.culture("yamnaya").unwrap().center;
        assert!(scene.markers.iter().any(|p| matches!(
            p,
            Primitive::Circle { center: c, radius, .. } if *c == center && *radius == 7.0
        )));
        let labels: Vec<&str> = scene
            .markers
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { anchor, text, .. } if *anchor == center => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["Yamnaya", "3300–2600 BCE"]);
        assert!(scene
            .hit_regions
            .iter()
            .any(|r| r.target == MapTarget::Culture("yamnaya".into())));
    }
}
