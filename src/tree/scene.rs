//! Tree frame -> drawable primitives in content coordinates

use glam::Vec2;

use crate::render::colors;
use crate::render::{HitRegion, HitShape, Primitive, Stroke, TextAnchor, TextStyle};
use crate::tree::model::{NodeId, TreeViewModel};
use crate::tree::style::{
    diagonal, link_style, node_style, PulseRing, STATUS_DOT_OFFSET, STATUS_DOT_RADIUS,
};
use crate::tree::transition::{Presence, TreeFrame};
use crate::viewport::Bounds;

pub type TreePrimitive = Primitive<Vec2>;
pub type TreeHitRegion = HitRegion<Vec2, NodeId>;

/// Nodes smaller than this are still easy to click
const MIN_HIT_RADIUS: f32 = 10.0;

#[derive(Debug, Clone, Default)]
pub struct TreeScene {
    /// Links first, then nodes in pre-order
    pub primitives: Vec<TreePrimitive>,
    /// Later regions sit on top
    pub hit_regions: Vec<TreeHitRegion>,
}

impl TreeScene {
    /// Render `frame`. `pulse` is the current phase of the status-dot ring,
    /// `None` to draw no ring.
    pub fn build(model: &TreeViewModel, frame: &TreeFrame, pulse: Option<f64>) -> Self {
        let mut scene = TreeScene::default();
        let tree = &model.tree;

        for link in &frame.links {
            let style = link_style(tree, link.child);
            let [from, c1, c2, to] = diagonal(link.source, link.target);
            scene.primitives.push(Primitive::Curve {
                from,
                c1,
                c2,
                to,
                stroke: Stroke::new(style.color, style.width, style.opacity * link.appear),
            });
        }

        let ring = pulse.map(PulseRing::at);
        for node in &frame.nodes {
            let style = node_style(tree, node.id, model.kind(node.id));
            let center = node.position;
            let radius = style.radius * node.appear;

            scene.primitives.push(Primitive::Circle {
                center,
                radius,
                fill: Some(style.fill),
                fill_opacity: 1.0,
                stroke: Some(Stroke::new(style.stroke, style.stroke_width, node.appear)),
            });
            if let Some(indicator) = style.indicator {
                scene.primitives.push(Primitive::Text {
                    anchor: center,
                    offset: (0.0, 0.0),
                    text: indicator.to_string(),
                    style: TextStyle::new(colors::WHITE, style.indicator_size)
                        .bold()
                        .with_opacity(node.appear),
                });
            }

            let label = &style.label;
            let mut text_style = TextStyle::new(label.color, label.size)
                .italic(label.italic)
                .anchored(label.anchor)
                .with_opacity(node.appear);
            if label.bold {
                text_style = text_style.bold();
            }
            scene.primitives.push(Primitive::Text {
                anchor: center,
                offset: (label.offset.x, label.offset.y),
                text: label.text.clone(),
                style: text_style,
            });

            if let Some(dot) = style.status_dot {
                let dot_center = center + STATUS_DOT_OFFSET;
                if let Some(ring) = ring {
                    scene.primitives.push(Primitive::Circle {
                        center: dot_center,
                        radius: ring.radius,
                        fill: None,
                        fill_opacity: 0.0,
                        stroke: Some(Stroke::new(dot, ring.stroke_width, ring.opacity * node.appear)),
                    });
                }
                scene.primitives.push(Primitive::Circle {
                    center: dot_center,
                    radius: STATUS_DOT_RADIUS,
                    fill: Some(dot),
                    fill_opacity: 0.9 * node.appear,
                    stroke: None,
                });
            }

            // Shrinking nodes are already gone from the model
            if node.presence != Presence::Exiting {
                scene.hit_regions.push(HitRegion {
                    target: node.id,
                    shape: HitShape::Circle {
                        center,
                        radius: style.radius.max(MIN_HIT_RADIUS),
                    },
                });
            }
        }
        scene
    }

    /// Topmost node under a content-space point
    pub fn node_at(&self, point: Vec2) -> Option<NodeId> {
        self.hit_regions.iter().rev().find_map(|region| match &region.shape {
            HitShape::Circle { center, radius } if center.distance(point) <= *radius => {
                Some(region.target)
            }
            _ => None,
        })
    }
}

/// Box around node circles and labels of the settled layout.
///
/// Links never leave the box spanned by their endpoints, so they add nothing.
pub fn content_bounds(model: &TreeViewModel) -> Bounds {
    let mut bounds = Bounds::empty();
    for id in model.visible_nodes() {
        let Some(center) = model.state.get(id).current else {
            continue;
        };
        let style = node_style(&model.tree, id, model.kind(id));
        bounds.include_box(center, Vec2::splat(style.radius + style.stroke_width / 2.0));
        let (min, max) = style.label.extent();
        bounds.include(center + min);
        bounds.include(center + max);
        if style.status_dot.is_some() {
            bounds.include_box(center + STATUS_DOT_OFFSET, Vec2::splat(STATUS_DOT_RADIUS));
        }
    }
    bounds
}

/// Label anchor used by text backends that cannot measure glyphs
pub fn anchor_shift(anchor: TextAnchor, width: f32) -> f32 {
    match anchor {
        TextAnchor::Start => 0.0,
        TextAnchor::Middle => -width / 2.0,
        TextAnchor::End => -width,
    }
}
