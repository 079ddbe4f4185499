//! Hierarchical language tree layout engine
//!
//! The language tree itself never changes. Expand/collapse flags and node
//! positions live in a separate view state, a tidy layout places the visible
//! part, and transitions between layouts are a pure function of time.

pub mod layout;
pub mod model;
pub mod scene;
pub mod style;
pub mod transition;
pub mod view;

pub use layout::{PlacedNode, Separation, TidyLayout};
pub use model::{Hierarchy, LanguageTree, NodeId, NodeKind, TreeViewModel, ViewState};
pub use scene::{content_bounds, TreeScene};
pub use style::{link_style, node_branch_color, node_style, LinkStyle, NodeStyle};
pub use transition::{frame, FrameNode, Presence, TreeFrame};
pub use view::{LanguageTreeView, NodeDetails, TreeEvent};
