//! Camera for the zoomable tree canvas
//!
//! A uniform scale plus translation maps content coordinates to container
//! pixels: `screen = content * k + (x, y)`. Fit-to-view animations are data
//! (start transform, target transform, tween) sampled on every frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::config::{FitRequest, TreeConfig, ZoomConfig};
use crate::render::{Easing, Tween};
use crate::viewport::bounds::Bounds;

/// Uniform scale and translation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f32,
    pub x: f32,
    pub y: f32,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn new(k: f32, x: f32, y: f32) -> Self {
        Self { k, x, y }
    }

    /// Content -> screen
    pub fn apply(&self, p: Vec2) -> Vec2 {
        p * self.k + Vec2::new(self.x, self.y)
    }

    /// Screen -> content
    pub fn invert(&self, p: Vec2) -> Vec2 {
        (p - Vec2::new(self.x, self.y)) / self.k
    }

    pub fn lerp(&self, other: &ZoomTransform, t: f32) -> ZoomTransform {
        ZoomTransform {
            k: self.k + (other.k - self.k) * t,
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn approx_eq(&self, other: &ZoomTransform, eps: f32) -> bool {
        (self.k - other.k).abs() <= eps
            && (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
    }
}

#[derive(Debug, Clone, Copy)]
struct CameraAnimation {
    from: ZoomTransform,
    to: ZoomTransform,
    tween: Tween,
}

/// Pan/zoom state of a container
#[derive(Debug, Clone)]
pub struct Camera {
    /// Transform currently displayed
    pub transform: ZoomTransform,
    /// Container size in pixels
    pub viewport_size: (f32, f32),
    min_scale: f32,
    max_scale: f32,
    animation: Option<CameraAnimation>,
}

impl Camera {
    pub fn new(viewport_width: f32, viewport_height: f32, zoom: &ZoomConfig) -> Self {
        Self {
            transform: ZoomTransform::IDENTITY,
            viewport_size: (viewport_width, viewport_height),
            min_scale: zoom.min_scale,
            max_scale: zoom.max_scale,
            animation: None,
        }
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_size = (width.max(0.0), height.max(0.0));
    }

    pub fn screen_to_world(&self, screen_pos: Vec2) -> Vec2 {
        self.transform.invert(screen_pos)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Target of the in-flight animation, or the current transform
    pub fn target(&self) -> ZoomTransform {
        self.animation.map(|a| a.to).unwrap_or(self.transform)
    }

    /// Drag by a pixel delta. User input interrupts any animation.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.animation = None;
        self.transform.x += dx;
        self.transform.y += dy;
    }

    /// Multiply the scale by `factor`, keeping `screen_point` fixed
    pub fn zoom_toward(&mut self, screen_point: Vec2, factor: f32) {
        self.animation = None;
        let anchor = self.transform.invert(screen_point);
        let k = (self.transform.k * factor).clamp(self.min_scale, self.max_scale);
        self.transform = ZoomTransform {
            k,
            x: screen_point.x - anchor.x * k,
            y: screen_point.y - anchor.y * k,
        };
    }

    /// Wheel gesture. Returns false when the event should scroll the page instead.
    pub fn wheel(&mut self, delta_y: f32, modifier: bool, cursor: Vec2, zoom: &ZoomConfig) -> bool {
        if zoom.require_modifier && !modifier {
            return false;
        }
        let factor = 2f32.powf(-delta_y * zoom.wheel_sensitivity);
        self.zoom_toward(cursor, factor);
        true
    }

    /// Transform that centres `bounds` in the container.
    ///
    /// Returns `None` for degenerate content so callers leave the view alone.
    pub fn fit_transform(
        &self,
        bounds: &Bounds,
        padding: f32,
        tree: &TreeConfig,
    ) -> Option<ZoomTransform> {
        if bounds.is_degenerate() {
            return None;
        }
        let (w, h) = self.viewport_size;
        let full_width = w - 2.0 * tree.margin;
        let full_height = h - 2.0 * tree.margin;
        if full_width <= 0.0 || full_height <= 0.0 {
            return None;
        }

        let bw = bounds.width();
        let bh = bounds.height();
        let scale = (full_width / (bw + padding * 2.0))
            .min(full_height / (bh + tree.fit_vertical_slack))
            .min(tree.max_fit_scale)
            .clamp(self.min_scale, self.max_scale);

        Some(ZoomTransform {
            k: scale,
            x: tree.margin + (full_width - bw * scale) / 2.0 - bounds.min.x * scale,
            y: tree.margin + (full_height - bh * scale) / 2.0 - bounds.min.y * scale,
        })
    }

    /// Frame `bounds`, jumping or animating per `request`.
    ///
    /// A new fit supersedes any animation still in flight; it starts from
    /// whatever transform is on screen right now.
    pub fn fit_to_view(
        &mut self,
        bounds: &Bounds,
        request: FitRequest,
        now_ms: f64,
        tree: &TreeConfig,
    ) -> Option<ZoomTransform> {
        self.tick(now_ms);
        let target = self.fit_transform(bounds, request.padding, tree)?;
        if request.duration_ms > 0.0 && !self.transform.approx_eq(&target, 1e-4) {
            self.animation = Some(CameraAnimation {
                from: self.transform,
                to: target,
                tween: Tween::new(now_ms, request.duration_ms, Easing::CubicInOut),
            });
        } else {
            self.animation = None;
            self.transform = target;
        }
        tracing::debug!(
            "Fit to view: k={:.3} x={:.1} y={:.1} ({} ms)",
            target.k,
            target.x,
            target.y,
            request.duration_ms
        );
        Some(target)
    }

    /// Advance the animation. Returns true while still animating.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        let t = animation.tween.eased(now_ms) as f32;
        self.transform = animation.from.lerp(&animation.to, t);
        if animation.tween.is_complete(now_ms) {
            self.transform = animation.to;
            self.animation = None;
            return false;
        }
        true
    }

    pub fn stop_animation(&mut self) {
        self.animation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(800.0, 500.0, &ZoomConfig::default())
    }

    #[test]
    fn test_apply_and_invert() {
        let t = ZoomTransform::new(2.0, 10.0, -5.0);
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(t.apply(p), Vec2::new(16.0, 3.0));
        assert!((t.invert(t.apply(p)) - p).length() < 1e-5);
    }

    #[test]
    fn test_zoom_toward_keeps_point_fixed() {
        let mut camera = camera();
        camera.pan(40.0, 20.0);
        let cursor = Vec2::new(300.0, 200.0);
        let before = camera.screen_to_world(cursor);
        camera.zoom_toward(cursor, 1.5);
        let after = camera.screen_to_world(cursor);
        assert!((before - after).length() < 1e-3);
        assert_eq!(camera.transform.k, 1.5);
    }

    #[test]
    fn test_zoom_clamped_to_extent() {
        let mut camera = camera();
        camera.zoom_toward(Vec2::ZERO, 100.0);
        assert_eq!(camera.transform.k, 3.0);
        camera.zoom_toward(Vec2::ZERO, 0.0001);
        assert_eq!(camera.transform.k, 0.15);
    }

    #[test]
    fn test_plain_wheel_does_not_zoom() {
        let mut camera = camera();
        let zoom = ZoomConfig::default();
        assert!(!camera.wheel(-100.0, false, Vec2::ZERO, &zoom));
        assert_eq!(camera.transform, ZoomTransform::IDENTITY);
        assert!(camera.wheel(-500.0, true, Vec2::ZERO, &zoom));
        assert!((camera.transform.k - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_fit_centres_content() {
        let camera = camera();
        let tree = TreeConfig::default();
        let bounds = Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(360.0, 400.0));
        let t = camera.fit_transform(&bounds, 80.0, &tree).unwrap();
        // min(760 / 520, 460 / 440, 1.2)
        assert!((t.k - 460.0 / 440.0).abs() < 1e-5);
        let centre = t.apply(bounds.center());
        assert!((centre.x - 400.0).abs() < 1e-3);
        assert!((centre.y - 250.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_never_magnifies_past_cap() {
        let camera = camera();
        let bounds = Bounds::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let t = camera
            .fit_transform(&bounds, 0.0, &TreeConfig::default())
            .unwrap();
        assert_eq!(t.k, 1.2);
    }

    #[test]
    fn test_fit_degenerate_bounds_is_noop() {
        let mut camera = camera();
        let bounds = Bounds::from_points([Vec2::new(5.0, 5.0)]);
        let tree = TreeConfig::default();
        assert!(camera
            .fit_to_view(&bounds, tree.default_fit, 0.0, &tree)
            .is_none());
        assert_eq!(camera.transform, ZoomTransform::IDENTITY);
    }

    #[test]
    fn test_fit_animation_reaches_target() {
        let mut camera = camera();
        let tree = TreeConfig::default();
        let bounds = Bounds::new(Vec2::new(-50.0, 0.0), Vec2::new(500.0, 900.0));
        let target = camera
            .fit_to_view(&bounds, FitRequest::new(60.0, 600.0), 1000.0, &tree)
            .unwrap();
        assert!(camera.tick(1300.0));
        assert!(!camera.transform.approx_eq(&target, 1e-4));
        assert!(!camera.tick(1600.0));
        assert_eq!(camera.transform, target);
    }

    #[test]
    fn test_pan_interrupts_animation() {
        let mut camera = camera();
        let tree = TreeConfig::default();
        let bounds = Bounds::new(Vec2::ZERO, Vec2::new(500.0, 900.0));
        camera.fit_to_view(&bounds, tree.default_fit, 0.0, &tree);
        assert!(camera.is_animating());
        camera.pan(5.0, 5.0);
        assert!(!camera.is_animating());
    }
}
