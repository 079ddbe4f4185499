//! Immutable language tree arena plus a separate expand/position view state

use ahash::AHashMap;
use glam::Vec2;

use crate::data::{LanguageNode, LanguageStatus};

/// Index of a node in the arena. Ids are assigned in pre-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A language plus its links into the arena
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub status: LanguageStatus,
    pub period: Option<String>,
    pub region: Option<String>,
    pub speakers: Option<String>,
    pub note: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Flattened, read-only language tree. Root is always `NodeId(0)`.
#[derive(Debug, Clone)]
pub struct LanguageTree {
    nodes: Vec<TreeNode>,
}

impl LanguageTree {
    pub fn from_node(root: &LanguageNode) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(root.count()),
        };
        tree.push(root, None, 0);
        tree
    }

    fn push(&mut self, node: &LanguageNode, parent: Option<NodeId>, depth: usize) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(TreeNode {
            name: node.name.clone(),
            status: node.status,
            period: node.period.clone(),
            region: node.region.clone(),
            speakers: node.speakers.clone(),
            note: node.note.clone(),
            parent,
            children: Vec::with_capacity(node.children.len()),
            depth,
        });
        for child in &node.children {
            let child_id = self.push(child, Some(id), depth + 1);
            self.nodes[id.index()].children.push(child_id);
        }
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    /// Panics on ids from another tree
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.index()]
    }

    /// All ids in pre-order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// First node with this name in pre-order
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeId(i as u32))
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(id).and_then(|n| n.parent), move |p| {
            self.get(*p).and_then(|n| n.parent)
        })
    }

    /// The depth-1 ancestor (or the node itself at depth 1); `None` for the root
    pub fn branch_of(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        if node.depth == 0 {
            return None;
        }
        if node.depth == 1 {
            return Some(id);
        }
        self.ancestors(id)
            .find(|a| self.get(*a).map(|n| n.depth == 1).unwrap_or(false))
    }
}

/// Shape of a node in the current view.
///
/// Exactly one holds: a leaf, a node showing its children, or a node whose
/// children are hidden behind the collapsed marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Expanded,
    Collapsed,
}

/// Per-node view state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeViewState {
    /// Meaningless for leaves
    pub expanded: bool,
    /// Where the node was drawn when the last relayout started
    pub previous: Option<Vec2>,
    /// Where the last relayout placed it; `None` when hidden
    pub current: Option<Vec2>,
}

/// Parallel map of view state keyed by node id
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    states: AHashMap<NodeId, NodeViewState>,
}

impl ViewState {
    pub fn get(&self, id: NodeId) -> NodeViewState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeViewState {
        self.states.entry(id).or_default()
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.get(id).expanded
    }

    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        self.get_mut(id).expanded = expanded;
    }
}

/// Children visible under the current view state
pub trait Hierarchy {
    fn root(&self) -> NodeId;
    fn visible_children(&self, id: NodeId) -> &[NodeId];
}

/// The language tree with its mutable view state
#[derive(Debug, Clone)]
pub struct TreeViewModel {
    pub tree: LanguageTree,
    pub state: ViewState,
}

impl Hierarchy for TreeViewModel {
    fn root(&self) -> NodeId {
        self.tree.root()
    }

    fn visible_children(&self, id: NodeId) -> &[NodeId] {
        match self.tree.get(id) {
            Some(node) if self.state.is_expanded(id) => &node.children,
            _ => &[],
        }
    }
}

impl TreeViewModel {
    /// Build the view model showing the root and its immediate children only
    pub fn initialize(root: &LanguageNode) -> Self {
        let tree = LanguageTree::from_node(root);
        let mut state = ViewState::default();
        for id in tree.ids() {
            let node = tree.node(id);
            state.set_expanded(id, node.depth == 0 && !node.is_leaf());
        }
        tracing::debug!("Initialized language tree with {} nodes", tree.len());
        Self { tree, state }
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        match self.tree.get(id) {
            None => NodeKind::Leaf,
            Some(node) if node.is_leaf() => NodeKind::Leaf,
            Some(_) if self.state.is_expanded(id) => NodeKind::Expanded,
            Some(_) => NodeKind::Collapsed,
        }
    }

    /// Flip one node. Descendants keep their own state for re-expansion.
    /// Returns false for leaves, which have nothing to toggle.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        match self.kind(id) {
            NodeKind::Leaf => false,
            NodeKind::Expanded => {
                self.state.set_expanded(id, false);
                true
            }
            NodeKind::Collapsed => {
                self.state.set_expanded(id, true);
                true
            }
        }
    }

    pub fn expand_all(&mut self) {
        let ids: Vec<NodeId> = self.tree.ids().collect();
        for id in ids {
            if !self.tree.node(id).is_leaf() {
                self.state.set_expanded(id, true);
            }
        }
    }

    /// Collapse every visible internal node below the root, deepest first.
    ///
    /// The root stays open so the major branches remain on screen. Subtrees
    /// that are already hidden keep their inner state.
    pub fn collapse_all(&mut self) {
        let root = self.tree.root();
        if !self.tree.node(root).is_leaf() {
            self.state.set_expanded(root, true);
        }
        self.collapse_visible(root);
    }

    fn collapse_visible(&mut self, id: NodeId) {
        if self.kind(id) != NodeKind::Expanded {
            return;
        }
        let children = self.tree.node(id).children.clone();
        for child in children {
            self.collapse_visible(child);
        }
        if self.tree.node(id).depth >= 1 {
            self.state.set_expanded(id, false);
        }
    }

    /// Visible nodes in pre-order
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.tree.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.visible_children(id).iter().rev().copied());
        }
        out
    }

    /// (parent, child) pairs of the visible tree
    pub fn visible_links(&self) -> Vec<(NodeId, NodeId)> {
        self.visible_nodes()
            .into_iter()
            .flat_map(|id| self.visible_children(id).iter().map(move |c| (id, *c)))
            .collect()
    }

    pub fn visible_names(&self) -> Vec<String> {
        self.visible_nodes()
            .into_iter()
            .map(|id| self.tree.node(id).name.clone())
            .collect()
    }

    /// Visible nodes with no visible children (collapsed nodes count)
    pub fn visible_leaf_count(&self) -> usize {
        self.visible_nodes()
            .into_iter()
            .filter(|id| self.visible_children(*id).is_empty())
            .count()
    }

    pub fn max_visible_depth(&self) -> usize {
        self.visible_nodes()
            .into_iter()
            .map(|id| self.tree.node(id).depth)
            .max()
            .unwrap_or(0)
    }
}
