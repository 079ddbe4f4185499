//! Language tree engine integration tests

use std::collections::BTreeSet;

use proptest::prelude::*;

use pie_atlas::core::config::{AtlasConfig, FitRequest};
use pie_atlas::data::{Dataset, LanguageNode};
use pie_atlas::tree::*;

fn language_tree() -> LanguageNode {
    Dataset::embedded().unwrap().language_tree
}

fn name_set(model: &TreeViewModel) -> BTreeSet<String> {
    model.visible_names().into_iter().collect()
}

#[test]
fn test_expand_collapse_expand_round_trip() {
    let mut model = TreeViewModel::initialize(&language_tree());
    model.expand_all();
    let expanded = name_set(&model);
    assert_eq!(expanded.len(), model.tree.len());

    model.collapse_all();
    let collapsed = name_set(&model);
    let root = model.tree.root();
    assert_eq!(collapsed.len(), 1 + model.tree.node(root).children.len());

    model.expand_all();
    assert_eq!(name_set(&model), expanded);
}

#[test]
fn test_every_visible_node_is_placed_once() {
    let config = AtlasConfig::default();
    let mut view = LanguageTreeView::new(&language_tree(), &config, 1000.0, 0.0);
    view.expand_all(0.0);
    let model = view.model();
    let visible = model.visible_nodes();
    for id in model.tree.ids() {
        let placed = model.state.get(id).current.is_some();
        assert_eq!(placed, visible.contains(&id));
    }
}

#[test]
fn test_layout_is_horizontal_and_sized_by_leaves() {
    let config = AtlasConfig::default();
    let mut view = LanguageTreeView::new(&language_tree(), &config, 1000.0, 0.0);
    view.expand_all(0.0);
    let model = view.model();

    let leaves = model.visible_leaf_count() as f32;
    let depth = model.max_visible_depth() as f32;
    let mut max_x: f32 = 0.0;
    let mut max_y: f32 = 0.0;
    for id in model.visible_nodes() {
        let pos = model.state.get(id).current.unwrap();
        // Depth runs along x in whole steps
        let node = model.tree.node(id);
        assert!((pos.x - node.depth as f32 * config.tree.depth_spacing).abs() < 1e-3);
        max_x = max_x.max(pos.x);
        max_y = max_y.max(pos.y);
    }
    assert!((max_x - depth * config.tree.depth_spacing).abs() < 1e-3);
    assert!(max_y <= (leaves * config.tree.leaf_spacing).max(400.0) + 1e-3);
}

#[test]
fn test_siblings_keep_dataset_order() {
    let config = AtlasConfig::default();
    let view = LanguageTreeView::new(&language_tree(), &config, 1000.0, 0.0);
    let model = view.model();
    let root = model.tree.root();
    let ys: Vec<f32> = model
        .tree
        .node(root)
        .children
        .iter()
        .map(|c| model.state.get(*c).current.unwrap().y)
        .collect();
    assert!(ys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_fit_is_idempotent_and_capped() {
    let config = AtlasConfig::default();
    let mut view = LanguageTreeView::new(&language_tree(), &config, 1000.0, 0.0);
    view.tick(1000.0);
    let jump = FitRequest::new(60.0, 0.0);
    let first = view.fit_to_view(jump, 1000.0).unwrap();
    let second = view.fit_to_view(jump, 1000.0).unwrap();
    assert!(first.approx_eq(&second, 1e-6));
    assert!(first.k <= config.tree.max_fit_scale);
    assert!(first.k >= config.zoom.min_scale);
}

#[test]
fn test_transition_ends_at_new_layout() {
    let config = AtlasConfig::default();
    let mut view = LanguageTreeView::new(&language_tree(), &config, 1000.0, 0.0);
    view.tick(700.0);
    let germanic = view.find("Germanic").unwrap();
    view.toggle(germanic, 700.0);

    let settled = view.frame(700.0 + config.tree.transition_ms);
    for node in &settled.nodes {
        assert_eq!(
            Some(node.position),
            view.model().state.get(node.id).current,
            "{}",
            view.model().tree.node(node.id).name
        );
    }

    // Children start on top of their parent's old position
    let start = view.frame(700.0);
    let children = view.model().tree.node(germanic).children.clone();
    assert!(!children.is_empty());
    for child in children {
        let node = start.nodes.iter().find(|n| n.id == child).unwrap();
        assert_eq!(node.presence, Presence::Entering);
        assert_eq!(Some(node.position), start.position(germanic));
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]

    #[test]
    fn expand_all_ignores_toggle_history(picks in prop::collection::vec(0usize..200, 0..40)) {
        let mut model = TreeViewModel::initialize(&language_tree());
        model.expand_all();
        let reference = name_set(&model);

        let ids: Vec<NodeId> = model.tree.ids().collect();
        for pick in picks {
            let id = ids[pick % ids.len()];
            model.toggle(id);
            if pick % 7 == 0 {
                model.collapse_all();
            }
        }
        model.expand_all();
        prop_assert_eq!(name_set(&model), reference);
    }

    #[test]
    fn collapse_all_keeps_first_level(picks in prop::collection::vec(0usize..200, 0..40)) {
        let mut model = TreeViewModel::initialize(&language_tree());
        let ids: Vec<NodeId> = model.tree.ids().collect();
        for pick in picks {
            model.toggle(ids[pick % ids.len()]);
        }
        model.collapse_all();
        let root = model.tree.root();
        let expected = 1 + model.tree.node(root).children.len();
        prop_assert_eq!(model.visible_nodes().len(), expected);
        prop_assert_eq!(model.kind(root), NodeKind::Expanded);
    }
}
