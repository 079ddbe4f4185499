//! Web-Mercator map viewport
//!
//! Converts geographic points to container pixels the way slippy-map
//! widgets do: 256-pixel tiles, world width `256 * 2^zoom`.

use glam::{DVec2, Vec2};

use crate::core::config::MapConfig;
use crate::core::types::LatLng;

const TILE_SIZE: f64 = 256.0;
/// Mercator blows up at the poles; clamp like every slippy map does
const MAX_LATITUDE: f64 = 85.051_128_78;

#[derive(Debug, Clone, PartialEq)]
pub struct MapViewport {
    pub center: LatLng,
    pub zoom: f64,
    /// Container size in pixels
    pub size: (f64, f64),
    min_zoom: f64,
    max_zoom: f64,
}

impl MapViewport {
    pub fn new(width: f64, height: f64, config: &MapConfig) -> Self {
        Self {
            center: config.initial_center,
            zoom: config.initial_zoom.clamp(config.min_zoom, config.max_zoom),
            size: (width, height),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    /// Position on the world plane at the current zoom
    fn world(&self, p: LatLng) -> DVec2 {
        let lat = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (p.lng + 180.0) / 360.0;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0;
        DVec2::new(x, y) * self.world_size()
    }

    fn unworld(&self, w: DVec2) -> LatLng {
        let n = w / self.world_size();
        let lng = n.x * 360.0 - 180.0;
        let lat = (std::f64::consts::PI * (1.0 - 2.0 * n.y)).sinh().atan().to_degrees();
        LatLng::new(lat, lng)
    }

    fn half_size(&self) -> DVec2 {
        DVec2::new(self.size.0, self.size.1) / 2.0
    }

    /// Geographic point -> container pixel
    pub fn project(&self, p: LatLng) -> Vec2 {
        let offset = self.world(p) - self.world(self.center) + self.half_size();
        offset.as_vec2()
    }

    /// Container pixel -> geographic point
    pub fn unproject(&self, pixel: Vec2) -> LatLng {
        let w = self.world(self.center) + pixel.as_dvec2() - self.half_size();
        self.unworld(w)
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.size = (width.max(0.0), height.max(0.0));
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + 1.0);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - 1.0);
    }

    /// Drag the map by a pixel delta
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let w = self.world(self.center) - DVec2::new(dx, dy);
        self.center = self.unworld(w);
    }
}
