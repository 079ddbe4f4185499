//! Temporal migration map integration tests

use std::sync::Arc;

use proptest::prelude::*;

use pie_atlas::core::config::AtlasConfig;
use pie_atlas::core::types::LatLng;
use pie_atlas::data::{Dataset, MigrationRoute};
use pie_atlas::map::*;

fn route(path: Vec<LatLng>, start: i32, end: i32) -> MigrationRoute {
    MigrationRoute {
        id: "test-route".into(),
        name: "Test route".into(),
        start,
        end,
        path,
        color: "#C0392B".into(),
        branch: None,
        short_label: None,
        label_offset: None,
        description: String::new(),
    }
}

fn straight() -> MigrationRoute {
    route(
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 10.0),
            LatLng::new(0.0, 20.0),
        ],
        -1000,
        -800,
    )
}

fn path_length(path: &[LatLng]) -> f64 {
    path.windows(2)
        .map(|w| ((w[1].lat - w[0].lat).powi(2) + (w[1].lng - w[0].lng).powi(2)).sqrt())
        .sum()
}

#[test]
fn test_route_at_segment_boundary() {
    let path = visible_path(&straight(), -900.0).unwrap();
    assert_eq!(path, vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 10.0)]);
}

#[test]
fn test_route_mid_segment() {
    let path = visible_path(&straight(), -950.0).unwrap();
    assert_eq!(path, vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 5.0)]);
}

#[test]
fn test_degenerate_route_is_complete_once_started() {
    let r = route(straight().path, -1000, -1000);
    assert!(visible_path(&r, -1001.0).is_none());
    assert_eq!(visible_path(&r, -1000.0), Some(r.path.clone()));
    assert_eq!(RoutePhase::at(&r, -1000.0), RoutePhase::Complete);

    let reversed = route(straight().path, -1000, -1200);
    assert_eq!(visible_path(&reversed, -999.0), Some(reversed.path.clone()));
}

#[test]
fn test_transport_two_seconds_at_base_speed() {
    let config = AtlasConfig::default();
    let mut transport = Transport::new(&config.map, &config.transport);
    transport.play();
    let mut ts = 0.0;
    while ts <= 2000.0 {
        transport.on_frame(ts);
        ts += 1000.0 / 60.0;
    }
    let expected = config.map.min_date + 200.0;
    assert!((transport.date() - expected).abs() <= 2.0);
    assert!(transport.is_playing());
}

#[test]
fn test_transport_pause_keeps_date() {
    let config = AtlasConfig::default();
    let mut transport = Transport::new(&config.map, &config.transport);
    transport.play();
    transport.on_frame(0.0);
    transport.on_frame(500.0);
    transport.pause();
    let paused_at = transport.date();
    transport.on_frame(5000.0);
    assert_eq!(transport.date(), paused_at);

    // Resuming after a long pause does not count the paused time
    transport.play();
    transport.on_frame(9000.0);
    assert_eq!(transport.date(), paused_at);
}

#[test]
fn test_corded_ware_waits_for_yamnaya_migration() {
    let dataset = Dataset::embedded().unwrap();
    let config = AtlasConfig::default();
    let corded = dataset.culture("corded-ware").unwrap();

    // yamnaya-europe runs -3000..-2500; half way is -2750
    assert!(!is_culture_visible(&dataset, corded, -2750.0, &config.map));
    assert!(!visible_cultures(&dataset, -2750.0, &config.map)
        .iter()
        .any(|c| c.id == "corded-ware"));
    // Exactly 70%
    assert!(is_culture_visible(&dataset, corded, -2650.0, &config.map));
    assert!(visible_cultures(&dataset, -2600.0, &config.map)
        .iter()
        .any(|c| c.id == "corded-ware"));
}

#[test]
fn test_dependency_on_missing_migration_falls_back_to_dates() {
    let mut dataset = Dataset::embedded().unwrap();
    dataset
        .dependencies
        .insert("yamnaya".into(), "no-such-migration".into());
    let config = AtlasConfig::default();
    let yamnaya = dataset.culture("yamnaya").unwrap().clone();
    assert!(is_culture_visible(&dataset, &yamnaya, -3000.0, &config.map));
}

#[test]
fn test_selection_is_exclusive() {
    let dataset = Arc::new(Dataset::embedded().unwrap());
    let config = AtlasConfig::default();
    let mut view = MigrationMapView::new(dataset, &config, 1200.0, 700.0);
    view.seek(-3000.0);

    let yamnaya = view
        .dataset()
        .culture("yamnaya")
        .map(|c| c.center)
        .unwrap();
    let at = view.viewport().project(yamnaya);
    assert_eq!(
        view.click(at),
        Some(MapTarget::Culture("yamnaya".into()))
    );
    assert_eq!(view.selection().selected_culture(), Some("yamnaya"));
    assert!(view.selection().selected_route().is_none());

    // Far out in the Atlantic
    let empty = view.viewport().project(LatLng::new(40.0, -40.0));
    assert_eq!(view.click(empty), None);
    assert!(view.selection().is_empty());
    assert!(view.popup().is_none());
}

#[test]
fn test_scene_at_end_has_every_route_complete() {
    let dataset = Dataset::embedded().unwrap();
    let config = AtlasConfig::default();
    let scene = MapScene::build(&dataset, config.map.max_date, &config.map);
    assert_eq!(scene.route_states.len(), dataset.migrations.len());
    for state in &scene.route_states {
        assert_eq!(state.phase, RoutePhase::Complete, "{}", state.id);
        let route = dataset.migration(&state.id).unwrap();
        assert_eq!(state.path, route.path);
    }
}

fn waypoints() -> impl Strategy<Value = Vec<LatLng>> {
    prop::collection::vec((-60.0f64..60.0, -30.0f64..120.0), 2..10)
        .prop_map(|pts| pts.into_iter().map(|(lat, lng)| LatLng::new(lat, lng)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn nothing_before_start(path in waypoints(), start in -4000i32..-1000, len in 1i32..800, before in 0.001f64..500.0) {
        let r = route(path, start, start + len);
        prop_assert!(visible_path(&r, start as f64 - before).is_none());
    }

    #[test]
    fn full_path_after_end(path in waypoints(), start in -4000i32..-1000, len in 0i32..800, after in 0.0f64..500.0) {
        let r = route(path, start, start + len);
        let shown = visible_path(&r, (start + len) as f64 + after);
        prop_assert_eq!(shown, Some(r.path.clone()));
    }

    #[test]
    fn partial_path_only_grows(path in waypoints(), start in -4000i32..-1000, len in 2i32..800, a in 0.0f64..1.0, b in 0.0f64..1.0) {
        let r = route(path, start, start + len);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let d1 = start as f64 + lo * len as f64;
        let d2 = start as f64 + hi * len as f64;

        if let Some(p1) = visible_path(&r, d1) {
            let p2 = visible_path(&r, d2);
            prop_assert!(p2.is_some());
            let p2 = p2.unwrap_or_default();
            prop_assert!(p2.len() >= p1.len());
            // Every whole waypoint drawn earlier is still drawn, in place
            let kept = p1.len() - 1;
            prop_assert_eq!(&p1[..kept], &p2[..kept]);
            prop_assert!(path_length(&p2) + 1e-6 >= path_length(&p1));
        }
    }

    #[test]
    fn dependent_cultures_follow_threshold(date in -4500.0f64..-800.0) {
        let dataset = Dataset::embedded().unwrap();
        let config = AtlasConfig::default();
        for culture in &dataset.cultures {
            let Some(route) = dataset.producing_migration(&culture.id) else {
                continue;
            };
            let in_range = culture.start as f64 <= date && date <= culture.end as f64;
            let started = route.start as f64 <= date;
            let arrived = route_progress(route, date) >= config.map.dependency_threshold - 1e-9;
            prop_assert_eq!(
                is_culture_visible(&dataset, culture, date, &config.map),
                in_range && started && arrived
            );
        }
    }
}
