//! Tidy tree layout (Buchheim, Jünger and Leipert's linear-time
//! Reingold-Tilford)
//!
//! Produces breadth (`x`) and depth (`y`) coordinates scaled into a given
//! size. The horizontal tree swaps them when drawing: depth runs left to
//! right, siblings top to bottom.

use crate::tree::model::{Hierarchy, NodeId};

/// Gap between neighbouring nodes, in units of one node slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separation {
    /// Neighbours sharing a parent
    pub siblings: f64,
    /// Neighbours with different parents
    pub cousins: f64,
}

impl Default for Separation {
    fn default() -> Self {
        Self {
            siblings: 1.0,
            cousins: 2.0,
        }
    }
}

/// Final position of a visible node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub depth: usize,
    /// Breadth coordinate in [0, breadth]
    pub x: f64,
    /// Depth coordinate in [0, depth extent]
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct TidyLayout {
    pub separation: Separation,
    /// Extent along the sibling axis
    pub breadth: f64,
    /// Extent along the depth axis
    pub depth: f64,
}

/// Working record of the algorithm. Index 0 is a virtual parent of the root.
#[derive(Debug, Clone)]
struct Walker {
    id: Option<NodeId>,
    parent: usize,
    children: Vec<usize>,
    /// Index among siblings
    number: usize,
    depth: usize,
    /// Default ancestor of the subtree
    ancestor: usize,
    /// Per-parent default ancestor used by apportion
    default_ancestor: Option<usize>,
    /// Thread to the next contour node
    thread: Option<usize>,
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
}

impl Walker {
    fn new(id: Option<NodeId>, parent: usize, number: usize, depth: usize, own: usize) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            number,
            depth,
            ancestor: own,
            default_ancestor: None,
            thread: None,
            prelim: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
        }
    }
}

struct Walk<'a> {
    nodes: Vec<Walker>,
    separation: &'a Separation,
}

impl<'a> Walk<'a> {
    fn build<H: Hierarchy>(hierarchy: &H, separation: &'a Separation) -> Self {
        let mut nodes = vec![Walker::new(None, 0, 0, 0, 0)];
        nodes.push(Walker::new(Some(hierarchy.root()), 0, 0, 0, 1));
        nodes[0].children.push(1);

        let mut stack = vec![1usize];
        while let Some(index) = stack.pop() {
            let Some(id) = nodes[index].id else {
                continue;
            };
            let depth = nodes[index].depth + 1;
            for (number, child) in hierarchy.visible_children(id).iter().enumerate() {
                let own = nodes.len();
                nodes.push(Walker::new(Some(*child), index, number, depth, own));
                nodes[index].children.push(own);
                stack.push(own);
            }
        }
        Self { nodes, separation }
    }

    fn separation(&self, a: usize, b: usize) -> f64 {
        if self.nodes[a].parent == self.nodes[b].parent {
            self.separation.siblings
        } else {
            self.separation.cousins
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.first().copied().or(self.nodes[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.last().copied().or(self.nodes[v].thread)
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let spread = (self.nodes[wp].number as f64 - self.nodes[wm].number as f64).max(1.0);
        let change = shift / spread;
        self.nodes[wp].change -= change;
        self.nodes[wp].shift += shift;
        self.nodes[wm].change += change;
        self.nodes[wp].prelim += shift;
        self.nodes[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.nodes[v].children.len()).rev() {
            let w = self.nodes[v].children[i];
            self.nodes[w].prelim += shift;
            self.nodes[w].modifier += shift;
            change += self.nodes[w].change;
            shift += self.nodes[w].shift + change;
        }
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let candidate = self.nodes[vim].ancestor;
        if self.nodes[candidate].parent == self.nodes[v].parent {
            candidate
        } else {
            ancestor
        }
    }

    fn apportion(&mut self, v: usize, w: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = w else {
            return ancestor;
        };
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.nodes[self.nodes[v].parent].children[0];
        let mut sip = self.nodes[vip].modifier;
        let mut sop = self.nodes[vop].modifier;
        let mut sim = self.nodes[vim].modifier;
        let mut som = self.nodes[vom].modifier;

        let (next_vim, next_vip) = loop {
            let next_vim = self.next_right(vim);
            let next_vip = self.next_left(vip);
            let (Some(nvim), Some(nvip)) = (next_vim, next_vip) else {
                break (next_vim, next_vip);
            };
            vim = nvim;
            vip = nvip;
            vom = self.next_left(vom).unwrap_or(vom);
            vop = self.next_right(vop).unwrap_or(vop);
            self.nodes[vop].ancestor = v;

            let shift = self.nodes[vim].prelim + sim - self.nodes[vip].prelim - sip
                + self.separation(vim, vip);
            if shift > 0.0 {
                let a = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(a, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.nodes[vim].modifier;
            sip += self.nodes[vip].modifier;
            som += self.nodes[vom].modifier;
            sop += self.nodes[vop].modifier;
        };

        if let Some(nvim) = next_vim {
            if self.next_right(vop).is_none() {
                self.nodes[vop].thread = Some(nvim);
                self.nodes[vop].modifier += sim - sop;
            }
        }
        if let Some(nvip) = next_vip {
            if self.next_left(vom).is_none() {
                self.nodes[vom].thread = Some(nvip);
                self.nodes[vom].modifier += sip - som;
                ancestor = v;
            }
        }
        ancestor
    }

    fn first_walk(&mut self, v: usize) {
        let parent = self.nodes[v].parent;
        let number = self.nodes[v].number;
        let left_sibling = (number > 0).then(|| self.nodes[parent].children[number - 1]);

        if !self.nodes[v].children.is_empty() {
            self.execute_shifts(v);
            let first = self.nodes[v].children[0];
            let last = self.nodes[v].children[self.nodes[v].children.len() - 1];
            let midpoint = (self.nodes[first].prelim + self.nodes[last].prelim) / 2.0;
            match left_sibling {
                Some(w) => {
                    self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
                    self.nodes[v].modifier = self.nodes[v].prelim - midpoint;
                }
                None => self.nodes[v].prelim = midpoint,
            }
        } else if let Some(w) = left_sibling {
            self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
        }

        let default = self.nodes[parent]
            .default_ancestor
            .unwrap_or(self.nodes[parent].children[0]);
        let ancestor = self.apportion(v, left_sibling, default);
        self.nodes[parent].default_ancestor = Some(ancestor);
    }

    /// Children before parents, siblings left to right
    fn post_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(1usize, false)];
        while let Some((v, visited)) = stack.pop() {
            if visited {
                out.push(v);
                continue;
            }
            stack.push((v, true));
            for child in self.nodes[v].children.iter().rev() {
                stack.push((*child, false));
            }
        }
        out
    }

    /// Parents before children
    fn pre_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![1usize];
        while let Some(v) = stack.pop() {
            out.push(v);
            stack.extend(self.nodes[v].children.iter().rev().copied());
        }
        out
    }

    /// Breadth coordinates before scaling, in pre-order
    fn run(&mut self) -> Vec<(usize, f64)> {
        for v in self.post_order() {
            self.first_walk(v);
        }
        self.nodes[0].modifier = -self.nodes[1].prelim;

        let order = self.pre_order();
        let mut xs = Vec::with_capacity(order.len());
        for v in order {
            let parent_modifier = self.nodes[self.nodes[v].parent].modifier;
            xs.push((v, self.nodes[v].prelim + parent_modifier));
            self.nodes[v].modifier += parent_modifier;
        }
        xs
    }
}

impl TidyLayout {
    pub fn new(separation: Separation, breadth: f64, depth: f64) -> Self {
        Self {
            separation,
            breadth,
            depth,
        }
    }

    /// Place every visible node, parents before children
    pub fn layout<H: Hierarchy>(&self, hierarchy: &H) -> Vec<PlacedNode> {
        let mut walk = Walk::build(hierarchy, &self.separation);
        let xs = walk.run();

        let mut left = (1usize, 0.0f64);
        let mut right = (1usize, 0.0f64);
        let mut bottom = 0usize;
        for (v, x) in &xs {
            if *x < left.1 {
                left = (*v, *x);
            }
            if *x > right.1 {
                right = (*v, *x);
            }
            bottom = bottom.max(walk.nodes[*v].depth);
        }

        let s = if left.0 == right.0 {
            1.0
        } else {
            walk.separation(left.0, right.0) / 2.0
        };
        let tx = s - left.1;
        let kx = self.breadth / (right.1 + s + tx);
        let ky = self.depth / (bottom.max(1) as f64);

        xs.into_iter()
            .filter_map(|(v, x)| {
                let node = &walk.nodes[v];
                let id = node.id?;
                Some(PlacedNode {
                    id,
                    parent: walk.nodes[node.parent].id,
                    depth: node.depth,
                    x: (x + tx) * kx,
                    y: node.depth as f64 * ky,
                })
            })
            .collect()
    }
}
