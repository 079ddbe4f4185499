//! Date-driven culture visibility and territory fades

use crate::core::config::MapConfig;
use crate::core::types::Date;
use crate::data::{Culture, Dataset};
use crate::map::progress::route_progress;

/// Whether `culture` is on the map at `date`.
///
/// Origin cultures follow their own date range. A culture produced by a
/// migration also waits until that migration has progressed past the
/// configured threshold; a dependency naming a missing migration is ignored.
pub fn is_culture_visible(dataset: &Dataset, culture: &Culture, date: Date, config: &MapConfig) -> bool {
    if (culture.start as f64) > date || (culture.end as f64) < date {
        return false;
    }
    match dataset.producing_migration(&culture.id) {
        None => true,
        Some(route) => {
            if (route.start as f64) > date {
                return false;
            }
            route_progress(route, date) >= config.dependency_threshold - 1e-9
        }
    }
}

/// Cultures on the map at `date`, in dataset order
pub fn visible_cultures<'a>(dataset: &'a Dataset, date: Date, config: &MapConfig) -> Vec<&'a Culture> {
    dataset
        .cultures
        .iter()
        .filter(|c| is_culture_visible(dataset, c, date, config))
        .collect()
}

/// Territory opacity for a displayed culture.
///
/// Ramps in over the first fade window, out over the last, never below the
/// configured floor. The window is a share of the lifetime capped in years.
pub fn territory_opacity(culture: &Culture, date: Date, config: &MapConfig) -> f64 {
    let span = (culture.end - culture.start) as f64;
    let window = (span * config.fade_fraction).min(config.max_fade_years);
    let mut opacity: f64 = 1.0;
    if window > 0.0 {
        let elapsed = date - culture.start as f64;
        let remaining = culture.end as f64 - date;
        if elapsed < window {
            opacity = elapsed / window;
        }
        if remaining < window {
            opacity = opacity.min(remaining / window);
        }
    }
    opacity.clamp(config.min_opacity, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn culture(start: i32, end: i32) -> Culture {
        Culture {
            id: "test".into(),
            name: "Test Culture".into(),
            start,
            end,
            center: Default::default(),
            region: String::new(),
            description: String::new(),
            genetic_profile: None,
            innovations: Vec::new(),
            color: "#888".into(),
        }
    }

    #[test]
    fn test_fade_window_capped() {
        let config = MapConfig::default();
        // 2000-year lifetime: 15% would be 300 years, capped at 200
        let c = culture(-3000, -1000);
        assert!((territory_opacity(&c, -2900.0, &config) - 0.5).abs() < 1e-9);
        assert_eq!(territory_opacity(&c, -2000.0, &config), 1.0);
        assert!((territory_opacity(&c, -1050.0, &config) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_fade_floor() {
        let config = MapConfig::default();
        let c = culture(-3000, -2000);
        assert_eq!(territory_opacity(&c, -3000.0, &config), 0.1);
        assert_eq!(territory_opacity(&c, -2000.0, &config), 0.1);
    }

    #[test]
    fn test_zero_span_does_not_divide_by_zero() {
        let config = MapConfig::default();
        let c = culture(-2000, -2000);
        assert_eq!(territory_opacity(&c, -2000.0, &config), 1.0);
    }

    #[test]
    fn test_origin_culture_by_date_only() {
        let dataset = Dataset::embedded().unwrap();
        let config = MapConfig::default();
        let yamnaya = dataset.culture("yamnaya").unwrap();
        let mid = (yamnaya.start + yamnaya.end) as f64 / 2.0;
        assert!(is_culture_visible(&dataset, yamnaya, mid, &config));
        assert!(!is_culture_visible(&dataset, yamnaya, yamnaya.start as f64 - 1.0, &config));
    }
}
