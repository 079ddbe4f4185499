//! Visual attributes of tree nodes and links

use glam::Vec2;

use crate::data::LanguageStatus;
use crate::render::colors::{self, branch_color, status_color, status_label_color, Color};
use crate::render::{Easing, TextAnchor};
use crate::tree::model::{LanguageTree, NodeId, NodeKind};

/// Offset of the status dot and pulse ring from the node centre
pub const STATUS_DOT_OFFSET: Vec2 = Vec2::new(8.0, -6.0);
pub const STATUS_DOT_RADIUS: f32 = 3.0;

/// Average glyph width as a share of the font size, for label extents
const GLYPH_WIDTH_RATIO: f32 = 0.6;

/// Color of the branch a node belongs to.
///
/// Walks up to the depth-1 ancestor and looks its name up in the palette.
/// The root gets the highlight color.
pub fn node_branch_color(tree: &LanguageTree, id: NodeId) -> Color {
    match tree.branch_of(id) {
        None => colors::ROOT_HIGHLIGHT,
        Some(branch) => branch_color(&tree.node(branch).name).unwrap_or(colors::DEFAULT_BRANCH),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub text: String,
    pub offset: Vec2,
    pub anchor: TextAnchor,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
}

impl LabelStyle {
    /// Rough box around the label, relative to the node centre
    pub fn extent(&self) -> (Vec2, Vec2) {
        let width = self.text.chars().count() as f32 * self.size * GLYPH_WIDTH_RATIO;
        let half_height = self.size * 0.6;
        let left = match self.anchor {
            TextAnchor::Start => self.offset.x,
            TextAnchor::Middle => self.offset.x - width / 2.0,
            TextAnchor::End => self.offset.x - width,
        };
        (
            Vec2::new(left, self.offset.y - half_height),
            Vec2::new(left + width, self.offset.y + half_height),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub radius: f32,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
    /// "+" when collapsed, "−" when expanded
    pub indicator: Option<&'static str>,
    pub indicator_size: f32,
    pub label: LabelStyle,
    /// Status dot for living and revived leaves
    pub status_dot: Option<Color>,
    /// Accessible description of what a click does
    pub action: String,
}

pub fn node_style(tree: &LanguageTree, id: NodeId, kind: NodeKind) -> NodeStyle {
    let node = tree.node(id);
    let is_root = node.depth == 0;
    let branch = node_branch_color(tree, id);

    let radius = match kind {
        _ if is_root => 12.0,
        NodeKind::Collapsed => 8.0,
        NodeKind::Expanded => 7.0,
        NodeKind::Leaf => 4.5,
    };
    let fill = match kind {
        _ if is_root => colors::ROOT_HIGHLIGHT,
        NodeKind::Leaf => colors::WHITE,
        NodeKind::Collapsed | NodeKind::Expanded => branch,
    };
    let indicator = match kind {
        NodeKind::Collapsed => Some("+"),
        NodeKind::Expanded => Some("\u{2212}"),
        NodeKind::Leaf => None,
    };

    let (offset, anchor) = match kind {
        _ if is_root => (Vec2::new(0.0, -1.2 * 16.0), TextAnchor::Middle),
        NodeKind::Leaf => (Vec2::new(14.0, 0.0), TextAnchor::Start),
        _ => (Vec2::new(-14.0, 0.0), TextAnchor::End),
    };
    let size = match node.depth {
        0 => 16.0,
        1 => 13.0,
        2 => 12.0,
        _ => 11.0,
    };
    let reconstructed = node.status == LanguageStatus::Reconstructed;
    let label = LabelStyle {
        text: if reconstructed {
            format!("*{}", node.name)
        } else {
            node.name.clone()
        },
        offset,
        anchor,
        size,
        bold: node.depth <= 1,
        italic: reconstructed,
        color: status_label_color(node.status),
    };

    let status_dot = (kind == NodeKind::Leaf && node.status.is_spoken())
        .then(|| status_color(node.status));

    let action = match kind {
        NodeKind::Expanded => format!("Collapse {}", node.name),
        NodeKind::Collapsed => format!("Expand {}", node.name),
        NodeKind::Leaf => node.name.clone(),
    };

    NodeStyle {
        radius,
        fill,
        stroke: branch,
        stroke_width: if is_root { 3.0 } else { 2.0 },
        indicator,
        indicator_size: if is_root { 14.0 } else { 10.0 },
        label,
        status_dot,
        action,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkStyle {
    pub color: Color,
    pub width: f32,
    pub opacity: f32,
}

/// Style of the link ending at `child`; thinner with depth
pub fn link_style(tree: &LanguageTree, child: NodeId) -> LinkStyle {
    let depth = tree.node(child).depth as f32;
    LinkStyle {
        color: node_branch_color(tree, child),
        width: (4.0 - depth * 0.6).max(1.5),
        opacity: 0.5,
    }
}

/// Control points of the horizontal "diagonal" between two nodes
pub fn diagonal(source: Vec2, target: Vec2) -> [Vec2; 4] {
    let mid_x = (source.x + target.x) / 2.0;
    [
        source,
        Vec2::new(mid_x, source.y),
        Vec2::new(mid_x, target.y),
        target,
    ]
}

/// Expanding ring around a status dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseRing {
    pub radius: f32,
    pub opacity: f32,
    pub stroke_width: f32,
}

impl PulseRing {
    /// Ring at `phase` in [0, 1] of one pulse period
    pub fn at(phase: f64) -> Self {
        let t = Easing::CubicOut.apply(phase) as f32;
        Self {
            radius: 3.0 + (10.0 - 3.0) * t,
            opacity: 0.7 * (1.0 - t),
            stroke_width: 1.5 + (0.5 - 1.5) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, LanguageNode};

    fn tree() -> LanguageTree {
        let dataset = Dataset::embedded().unwrap();
        LanguageTree::from_node(&dataset.language_tree)
    }

    #[test]
    fn test_branch_color_walks_to_first_level() {
        let tree = tree();
        let germanic = branch_color("Germanic").unwrap();
        let english = tree.find("English").unwrap();
        assert_eq!(node_branch_color(&tree, english), germanic);
        assert_eq!(node_branch_color(&tree, tree.root()), colors::ROOT_HIGHLIGHT);
    }

    #[test]
    fn test_unknown_branch_uses_default() {
        let root = LanguageNode::new("Root", LanguageStatus::Reconstructed).with_children(vec![
            LanguageNode::new("Unlisted", LanguageStatus::Extinct)
                .with_children(vec![LanguageNode::new("Leaf", LanguageStatus::Living)]),
        ]);
        let tree = LanguageTree::from_node(&root);
        let leaf = tree.find("Leaf").unwrap();
        assert_eq!(node_branch_color(&tree, leaf), colors::DEFAULT_BRANCH);
    }

    #[test]
    fn test_node_styles_by_kind() {
        let tree = tree();
        let root = node_style(&tree, tree.root(), NodeKind::Expanded);
        assert_eq!(root.radius, 12.0);
        assert_eq!(root.label.anchor, TextAnchor::Middle);
        assert!(root.label.italic && root.label.text.starts_with('*'));

        let germanic = tree.find("Germanic").unwrap();
        let collapsed = node_style(&tree, germanic, NodeKind::Collapsed);
        assert_eq!(collapsed.radius, 8.0);
        assert_eq!(collapsed.indicator, Some("+"));
        assert_eq!(collapsed.label.anchor, TextAnchor::End);
        assert_eq!(collapsed.action, "Expand Germanic");

        let english = tree.find("English").unwrap();
        let leaf = node_style(&tree, english, NodeKind::Leaf);
        assert_eq!(leaf.radius, 4.5);
        assert_eq!(leaf.fill, colors::WHITE);
        assert_eq!(leaf.label.offset.x, 14.0);
        assert!(leaf.status_dot.is_some());
    }

    #[test]
    fn test_link_width_floor() {
        let tree = tree();
        let germanic = tree.find("Germanic").unwrap();
        assert!((link_style(&tree, germanic).width - 3.4).abs() < 1e-6);
        let english = tree.find("English").unwrap();
        assert!((link_style(&tree, english).width - 1.6).abs() < 1e-6);

        let mut deep = LanguageNode::new("L6", LanguageStatus::Living);
        for name in ["L5", "L4", "L3", "L2", "L1", "L0"] {
            deep = LanguageNode::new(name, LanguageStatus::Extinct).with_children(vec![deep]);
        }
        let deep_tree = LanguageTree::from_node(&deep);
        let bottom = deep_tree.find("L6").unwrap();
        assert_eq!(link_style(&deep_tree, bottom).width, 1.5);
    }

    #[test]
    fn test_pulse_ring_endpoints() {
        let start = PulseRing::at(0.0);
        assert_eq!(start.radius, 3.0);
        assert_eq!(start.opacity, 0.7);
        let end = PulseRing::at(1.0);
        assert!((end.radius - 10.0).abs() < 1e-6);
        assert!(end.opacity.abs() < 1e-6);
        assert!((end.stroke_width - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_diagonal_is_horizontal_s_curve() {
        let [a, c1, c2, b] = diagonal(Vec2::new(0.0, 0.0), Vec2::new(100.0, 50.0));
        assert_eq!(a, Vec2::ZERO);
        assert_eq!(c1, Vec2::new(50.0, 0.0));
        assert_eq!(c2, Vec2::new(50.0, 50.0));
        assert_eq!(b, Vec2::new(100.0, 50.0));
    }
}
