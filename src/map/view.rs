//! Interactive migration map: transport, selection and hit testing

use std::sync::Arc;

use geo::{Coord, EuclideanDistance, LineString, Point};
use glam::Vec2;

use crate::core::config::{AtlasConfig, MapConfig};
use crate::core::types::Date;
use crate::data::Dataset;
use crate::map::projection::MapViewport;
use crate::map::scene::MapScene;
use crate::map::selection::{MapSelection, MapTarget, Popup};
use crate::map::transport::{FrameOutcome, PlaybackSpeed, Transport};
use crate::render::HitShape;

/// Temporal migration map bound to a dataset
pub struct MigrationMapView {
    dataset: Arc<Dataset>,
    config: MapConfig,
    transport: Transport,
    selection: MapSelection,
    viewport: MapViewport,
    scene: MapScene,
    has_interacted: bool,
}

impl MigrationMapView {
    pub fn new(dataset: Arc<Dataset>, config: &AtlasConfig, width: f64, height: f64) -> Self {
        let transport = Transport::new(&config.map, &config.transport);
        let scene = MapScene::build(&dataset, transport.date(), &config.map);
        Self {
            viewport: MapViewport::new(width, height, &config.map),
            config: config.map.clone(),
            transport,
            selection: MapSelection::default(),
            scene,
            has_interacted: false,
            dataset,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn viewport(&self) -> &MapViewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut MapViewport {
        &mut self.viewport
    }

    pub fn date(&self) -> Date {
        self.transport.date()
    }

    /// Scene at the current date
    pub fn scene(&self) -> &MapScene {
        &self.scene
    }

    pub fn selection(&self) -> &MapSelection {
        &self.selection
    }

    pub fn popup(&self) -> Option<Popup> {
        Popup::for_selection(&self.selection, &self.dataset)
    }

    fn rebuild(&mut self) {
        self.scene = MapScene::build(&self.dataset, self.transport.date(), &self.config);
    }

    pub fn play(&mut self) {
        self.has_interacted = true;
        let before = self.transport.date();
        self.transport.play();
        if self.transport.date() != before {
            self.rebuild();
        }
    }

    pub fn pause(&mut self) {
        self.transport.pause();
    }

    pub fn toggle_play(&mut self) {
        if self.transport.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Space bar handler
    pub fn on_space(&mut self) {
        self.toggle_play();
    }

    pub fn seek(&mut self, date: Date) {
        self.has_interacted = true;
        self.transport.seek(date);
        self.rebuild();
    }

    /// Move the scrubber by whole steps (negative = backwards)
    pub fn step(&mut self, steps: i32) {
        let date = self.transport.date() + steps as f64 * self.config.seek_step;
        self.seek(date);
    }

    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.transport.set_speed(speed);
    }

    /// Animation frame. Returns true when the scene changed.
    pub fn on_frame(&mut self, timestamp_ms: f64) -> bool {
        match self.transport.on_frame(timestamp_ms) {
            FrameOutcome::Idle => false,
            FrameOutcome::Advanced(_) | FrameOutcome::Finished(_) => {
                self.rebuild();
                true
            }
        }
    }

    /// Topmost target under a container point
    pub fn hit_test(&self, point: Vec2) -> Option<MapTarget> {
        let cursor = Point::new(point.x as f64, point.y as f64);
        self.scene
            .hit_regions
            .iter()
            .rev()
            .find(|region| match &region.shape {
                HitShape::Circle { center, radius } => {
                    self.viewport.project(*center).distance(point) <= *radius
                }
                HitShape::Polyline { points, tolerance } => {
                    let line: LineString<f64> = points
                        .iter()
                        .map(|p| {
                            let px = self.viewport.project(*p);
                            Coord {
                                x: px.x as f64,
                                y: px.y as f64,
                            }
                        })
                        .collect();
                    cursor.euclidean_distance(&line) <= *tolerance as f64
                }
            })
            .map(|region| region.target.clone())
    }

    /// Click at a container point: select what is there, or clear
    pub fn click(&mut self, point: Vec2) -> Option<MapTarget> {
        match self.hit_test(point) {
            Some(target) => {
                tracing::debug!("Map selection: {:?}", target);
                self.selection.select(target.clone(), point);
                Some(target)
            }
            None => {
                self.selection.clear();
                None
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.set_size(width, height);
    }

    /// One-line hint under the controls
    pub fn status_hint(&self) -> &'static str {
        let (_, max) = self.transport.bounds();
        if self.transport.date() >= max - self.config.replay_margin {
            "Click routes or cultures for details"
        } else if self.transport.is_playing() {
            "Playing"
        } else if !self.has_interacted {
            "Press play or spacebar to begin"
        } else {
            "Drag the slider or press play"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::LatLng;

    fn view() -> MigrationMapView {
        let dataset = Arc::new(Dataset::embedded().unwrap());
        MigrationMapView::new(dataset, &AtlasConfig::default(), 900.0, 600.0)
    }

    #[test]
    fn test_click_culture_marker_then_empty_space() {
        let mut map = view();
        map.seek(-3000.0);
        let center = map.dataset().culture("yamnaya").unwrap().center;
        let pixel = map.viewport().project(center);
        assert_eq!(
            map.click(pixel),
            Some(MapTarget::Culture("yamnaya".into()))
        );
        assert_eq!(map.selection().selected_culture(), Some("yamnaya"));
        assert!(matches!(map.popup(), Some(Popup::Culture { .. })));

        // Far corner of the map, nothing there
        map.click(Vec2::new(1.0, 1.0));
        assert!(map.selection().is_empty());
    }

    #[test]
    fn test_click_route_replaces_culture() {
        let mut map = view();
        map.seek(-1400.0);
        let culture = map.dataset().culture("andronovo").unwrap().center;
        map.click(map.viewport().project(culture));
        assert!(map.selection().selected_culture().is_some());

        let route = map.dataset().migration("tocharian-route").unwrap();
        let a = route.path[route.path.len() / 2 - 1];
        let b = route.path[route.path.len() / 2];
        let mid = LatLng::new((a.lat + b.lat) / 2.0, (a.lng + b.lng) / 2.0);
        let hit = map.click(map.viewport().project(mid));
        assert_eq!(hit, Some(MapTarget::Route("tocharian-route".into())));
        assert!(map.selection().selected_culture().is_none());
    }

    #[test]
    fn test_space_replays_from_start() {
        let mut map = view();
        map.seek(-800.0);
        map.on_space();
        assert!(map.transport().is_playing());
        assert_eq!(map.date(), -4500.0);
        map.on_space();
        assert!(!map.transport().is_playing());
    }

    #[test]
    fn test_frames_rebuild_scene() {
        let mut map = view();
        map.play();
        assert!(map.on_frame(0.0));
        assert!(map.on_frame(2000.0));
        assert!((map.scene().date - -4300.0).abs() < 1e-9);
        map.pause();
        assert!(!map.on_frame(3000.0));
    }

    #[test]
    fn test_status_hint() {
        let mut map = view();
        assert_eq!(map.status_hint(), "Press play or spacebar to begin");
        map.step(4);
        assert_eq!(map.date(), -4400.0);
        assert_eq!(map.status_hint(), "Drag the slider or press play");
    }
}
