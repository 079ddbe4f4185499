//! Atlas configuration with documented constants
//!
//! Every tuning number used by the tree, zoom, map and transport engines is
//! collected here. Defaults match the published site; a TOML file may
//! override any subset of them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{AtlasError, Result};
use crate::core::types::{Date, LatLng};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub tree: TreeConfig,
    pub zoom: ZoomConfig,
    pub map: MapConfig,
    pub transport: TransportConfig,
}

/// Padding and duration pair for a fit-to-view request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitRequest {
    /// Horizontal padding around the content bounds (pixels)
    pub padding: f32,
    /// Animated duration (milliseconds, 0 = jump)
    pub duration_ms: f64,
}

impl FitRequest {
    pub const fn new(padding: f32, duration_ms: f64) -> Self {
        Self {
            padding,
            duration_ms,
        }
    }
}

/// Language tree layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    // === LAYOUT ===
    /// Vertical space reserved per visible leaf (layout units)
    pub leaf_spacing: f32,

    /// Floor on the layout height so a nearly collapsed tree still breathes
    pub min_layout_height: f32,

    /// Horizontal distance between consecutive depths (layout units)
    pub depth_spacing: f32,

    /// Separation between adjacent siblings sharing a parent
    pub sibling_separation: f32,

    /// Separation between adjacent nodes with different parents
    ///
    /// The 1.3 : 1 ratio keeps cousin groups visually apart.
    pub cousin_separation: f32,

    // === ANIMATION ===
    /// Duration of the enter/update/exit transition after a relayout
    pub transition_ms: f64,

    /// Gap between the end of a transition and the automatic refit
    pub auto_fit_delay_ms: f64,

    /// Refit issued once a relayout transition completes
    pub auto_fit: FitRequest,

    /// Refit issued after the container is resized
    pub resize_fit: FitRequest,

    /// Refit issued on double-click
    pub double_click_fit: FitRequest,

    /// Refit issued by an explicit `fit_to_view` without arguments
    pub default_fit: FitRequest,

    /// Quiet period before a burst of resize events is acted upon
    pub resize_debounce_ms: f64,

    /// Period of the living-language pulse ring
    pub pulse_period_ms: f64,

    // === VIEWPORT ===
    /// Margin kept clear on every side of the viewport (pixels)
    pub margin: f32,

    /// Extra vertical slack added to the content height when fitting
    pub fit_vertical_slack: f32,

    /// Fitting never magnifies beyond this scale
    pub max_fit_scale: f32,

    /// Container height = clamp(width * ratio, min, max)
    pub container_height_ratio: f32,
    pub min_container_height: f32,
    pub max_container_height: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            leaf_spacing: 20.0,
            min_layout_height: 400.0,
            depth_spacing: 180.0,
            sibling_separation: 1.0,
            cousin_separation: 1.3,

            transition_ms: 600.0,
            auto_fit_delay_ms: 50.0,
            auto_fit: FitRequest::new(80.0, 400.0),
            resize_fit: FitRequest::new(80.0, 300.0),
            double_click_fit: FitRequest::new(0.0, 500.0),
            default_fit: FitRequest::new(60.0, 600.0),
            resize_debounce_ms: 100.0,
            pulse_period_ms: 2500.0,

            margin: 20.0,
            fit_vertical_slack: 40.0,
            max_fit_scale: 1.2,
            container_height_ratio: 0.6,
            min_container_height: 500.0,
            max_container_height: 650.0,
        }
    }
}

impl TreeConfig {
    /// Height of the tree container for a given width
    pub fn container_height(&self, width: f32) -> f32 {
        (width * self.container_height_ratio)
            .clamp(self.min_container_height, self.max_container_height)
    }
}

/// Pan/zoom configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Smallest allowed scale
    pub min_scale: f32,
    /// Largest allowed scale
    pub max_scale: f32,
    /// Scale change per wheel pixel (exponent base 2)
    ///
    /// Matches the browser convention of 0.002 per pixel line delta.
    pub wheel_sensitivity: f32,
    /// Plain wheel events scroll the page; only modifier + wheel zooms
    pub require_modifier: bool,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.15,
            max_scale: 3.0,
            wheel_sensitivity: 0.002,
            require_modifier: true,
        }
    }
}

/// Temporal migration map configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Earliest date on the timeline
    pub min_date: Date,
    /// Latest date on the timeline
    pub max_date: Date,

    /// Progress a producing migration must reach before its culture appears
    ///
    /// Open to tuning; 0.70 reads as "mostly arrived".
    pub dependency_threshold: f64,

    /// Share of a culture's lifetime used for fading in and out
    pub fade_fraction: f64,
    /// Upper bound on the fade window (years)
    pub max_fade_years: f64,
    /// Territories never fade below this opacity while displayed
    pub min_opacity: f64,

    /// Playing from within this many years of the end restarts from the beginning
    pub replay_margin: f64,
    /// Granularity of the date shown while playing (years)
    pub display_rounding: f64,
    /// Step of the date scrubber (years)
    pub seek_step: f64,

    /// Marker for the Proto-Indo-European homeland
    pub homeland: LatLng,
    /// Initial map centre
    pub initial_center: LatLng,
    pub initial_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,

    /// Half-width of the clickable band around a route (pixels)
    pub route_hit_tolerance: f64,
    /// Radius of the clickable culture marker (pixels)
    pub marker_hit_radius: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            min_date: -4500.0,
            max_date: -800.0,
            dependency_threshold: 0.70,
            fade_fraction: 0.15,
            max_fade_years: 200.0,
            min_opacity: 0.1,
            replay_margin: 50.0,
            display_rounding: 5.0,
            seek_step: 25.0,
            homeland: LatLng::new(47.5, 42.0),
            initial_center: LatLng::new(42.0, 45.0),
            initial_zoom: 3.0,
            min_zoom: 2.0,
            max_zoom: 7.0,
            route_hit_tolerance: 10.0,
            marker_hit_radius: 7.0,
        }
    }
}

/// Playback transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Timeline advance at 1x, in years per second
    pub base_years_per_second: f64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_years_per_second: 100.0,
        }
    }
}

impl AtlasConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AtlasConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(AtlasError::InvalidConfig(msg));

        if self.map.min_date >= self.map.max_date {
            return invalid(format!(
                "map.min_date ({}) should be < map.max_date ({})",
                self.map.min_date, self.map.max_date
            ));
        }

        if !(0.0..=1.0).contains(&self.map.dependency_threshold) {
            return invalid(format!(
                "map.dependency_threshold ({}) should be within [0, 1]",
                self.map.dependency_threshold
            ));
        }

        if !(0.0..=0.5).contains(&self.map.fade_fraction) {
            return invalid(format!(
                "map.fade_fraction ({}) should be within [0, 0.5]",
                self.map.fade_fraction
            ));
        }

        if self.zoom.min_scale <= 0.0 || self.zoom.min_scale >= self.zoom.max_scale {
            return invalid(format!(
                "zoom.min_scale ({}) should be positive and < zoom.max_scale ({})",
                self.zoom.min_scale, self.zoom.max_scale
            ));
        }

        if self.tree.leaf_spacing <= 0.0 || self.tree.depth_spacing <= 0.0 {
            return invalid("tree spacings must be positive".into());
        }

        if self.tree.sibling_separation <= 0.0 || self.tree.cousin_separation <= 0.0 {
            return invalid("tree separations must be positive".into());
        }

        if self.transport.base_years_per_second <= 0.0 {
            return invalid("transport.base_years_per_second must be positive".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<AtlasConfig> = OnceLock::new();

/// Process-wide atlas config, defaults unless `set_config` ran first
pub fn config() -> &'static AtlasConfig {
    CONFIG.get_or_init(AtlasConfig::default)
}

/// Install the process-wide config. Only the first call wins; later calls
/// hand the rejected config back.
pub fn set_config(config: AtlasConfig) -> std::result::Result<(), AtlasConfig> {
    CONFIG.set(config)
}
