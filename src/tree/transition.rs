//! Enter/update/exit interpolation between two layouts
//!
//! `frame(tree, state, t)` is a pure function of the view state's previous
//! and current positions. Nodes only in the new layout grow out of their
//! nearest ancestor's old position; nodes only in the old layout shrink into
//! their nearest surviving ancestor's new position.

use ahash::AHashMap;
use glam::Vec2;

use crate::tree::model::{LanguageTree, NodeId, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Entering,
    Updating,
    Exiting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameNode {
    pub id: NodeId,
    pub position: Vec2,
    pub presence: Presence,
    /// 0 = invisible, 1 = fully drawn; scales radius and label opacity
    pub appear: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLink {
    pub child: NodeId,
    pub source: Vec2,
    pub target: Vec2,
    pub appear: f32,
}

/// Interpolated geometry at one instant
#[derive(Debug, Clone, Default)]
pub struct TreeFrame {
    /// Parents before children
    pub nodes: Vec<FrameNode>,
    pub links: Vec<FrameLink>,
}

impl TreeFrame {
    pub fn position(&self, id: NodeId) -> Option<Vec2> {
        self.nodes.iter().find(|n| n.id == id).map(|n| n.position)
    }

    /// Positions of everything drawn, for restarting a transition mid-flight
    pub fn positions(&self) -> AHashMap<NodeId, Vec2> {
        self.nodes.iter().map(|n| (n.id, n.position)).collect()
    }
}

fn nearest<F>(tree: &LanguageTree, id: NodeId, lookup: F) -> Vec2
where
    F: Fn(NodeId) -> Option<Vec2>,
{
    tree.ancestors(id).find_map(lookup).unwrap_or(Vec2::ZERO)
}

/// Geometry at eased time `t` in [0, 1]
pub fn frame(tree: &LanguageTree, state: &ViewState, t: f32) -> TreeFrame {
    let t = t.clamp(0.0, 1.0);
    let mut nodes = Vec::new();

    // Ids are pre-order, so walking them in order keeps parents first
    for id in tree.ids() {
        let view = state.get(id);
        let node = match (view.previous, view.current) {
            (Some(from), Some(to)) => FrameNode {
                id,
                position: from.lerp(to, t),
                presence: Presence::Updating,
                appear: 1.0,
            },
            (None, Some(to)) => {
                let from = nearest(tree, id, |a| state.get(a).previous);
                FrameNode {
                    id,
                    position: from.lerp(to, t),
                    presence: Presence::Entering,
                    appear: t,
                }
            }
            (Some(from), None) => {
                if t >= 1.0 {
                    continue;
                }
                let to = nearest(tree, id, |a| state.get(a).current);
                FrameNode {
                    id,
                    position: from.lerp(to, t),
                    presence: Presence::Exiting,
                    appear: 1.0 - t,
                }
            }
            (None, None) => continue,
        };
        nodes.push(node);
    }

    let positions: AHashMap<NodeId, Vec2> = nodes.iter().map(|n| (n.id, n.position)).collect();
    let links = nodes
        .iter()
        .filter_map(|n| {
            let parent = tree.node(n.id).parent?;
            let source = *positions.get(&parent)?;
            Some(FrameLink {
                child: n.id,
                source,
                target: n.position,
                appear: n.appear,
            })
        })
        .collect();

    TreeFrame { nodes, links }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LanguageNode, LanguageStatus};

    fn setup() -> (LanguageTree, ViewState) {
        let root = LanguageNode::new("Root", LanguageStatus::Reconstructed).with_children(vec![
            LanguageNode::new("A", LanguageStatus::Extinct)
                .with_children(vec![LanguageNode::new("A1", LanguageStatus::Living)]),
        ]);
        (LanguageTree::from_node(&root), ViewState::default())
    }

    #[test]
    fn test_entering_node_grows_from_ancestor() {
        let (tree, mut state) = setup();
        let root = tree.root();
        let a = tree.find("A").unwrap();
        let a1 = tree.find("A1").unwrap();
        state.get_mut(root).previous = Some(Vec2::new(0.0, 100.0));
        state.get_mut(root).current = Some(Vec2::new(0.0, 100.0));
        state.get_mut(a).previous = Some(Vec2::new(180.0, 100.0));
        state.get_mut(a).current = Some(Vec2::new(180.0, 50.0));
        state.get_mut(a1).current = Some(Vec2::new(360.0, 50.0));

        let start = frame(&tree, &state, 0.0);
        assert_eq!(start.position(a1), Some(Vec2::new(180.0, 100.0)));
        let end = frame(&tree, &state, 1.0);
        assert_eq!(end.position(a1), Some(Vec2::new(360.0, 50.0)));
        let mid = frame(&tree, &state, 0.5);
        let node = mid.nodes.iter().find(|n| n.id == a1).unwrap();
        assert_eq!(node.presence, Presence::Entering);
        assert_eq!(node.appear, 0.5);
    }

    #[test]
    fn test_exiting_node_shrinks_into_survivor() {
        let (tree, mut state) = setup();
        let root = tree.root();
        let a = tree.find("A").unwrap();
        let a1 = tree.find("A1").unwrap();
        state.get_mut(root).previous = Some(Vec2::ZERO);
        state.get_mut(root).current = Some(Vec2::ZERO);
        state.get_mut(a).previous = Some(Vec2::new(180.0, 0.0));
        state.get_mut(a).current = Some(Vec2::new(180.0, 20.0));
        state.get_mut(a1).previous = Some(Vec2::new(360.0, 0.0));

        let mid = frame(&tree, &state, 0.5);
        let node = mid.nodes.iter().find(|n| n.id == a1).unwrap();
        assert_eq!(node.presence, Presence::Exiting);
        assert_eq!(node.position, Vec2::new(270.0, 10.0));
        assert_eq!(mid.links.len(), 2);

        let end = frame(&tree, &state, 1.0);
        assert!(end.position(a1).is_none());
        assert_eq!(end.links.len(), 1);
    }
}
