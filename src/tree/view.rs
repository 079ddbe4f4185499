//! Interactive language tree: relayout, transitions, fitting and input
//!
//! The host owns the clock. Every call that changes what is on screen takes
//! the current time in milliseconds, and [`LanguageTreeView::tick`] must be
//! called once per animation frame to run due timers and advance tweens.

use glam::Vec2;

use crate::core::config::{AtlasConfig, FitRequest, TreeConfig, ZoomConfig};
use crate::data::{LanguageNode, LanguageStatus};
use crate::render::{Easing, Tween};
use crate::schedule::{Debouncer, Scheduler, TaskId};
use crate::tree::layout::{Separation, TidyLayout};
use crate::tree::model::{NodeId, NodeKind, TreeViewModel};
use crate::tree::scene::{content_bounds, TreeScene};
use crate::tree::transition::{frame, TreeFrame};
use crate::viewport::{Camera, ZoomTransform};

/// Timer events owned by the tree view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    AutoFit,
    ResizeFit,
    Pulse,
}

/// Details of the selected language; absent fields are simply not shown
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDetails {
    pub name: String,
    pub status: LanguageStatus,
    pub period: Option<String>,
    pub region: Option<String>,
    pub speakers: Option<String>,
    pub note: Option<String>,
}

pub struct LanguageTreeView {
    model: TreeViewModel,
    config: TreeConfig,
    zoom: ZoomConfig,
    camera: Camera,
    scheduler: Scheduler<TreeEvent>,
    auto_fit: Option<TaskId>,
    resize: Debouncer,
    pulse_task: TaskId,
    pulse_started: f64,
    transition: Tween,
    selected: Option<NodeId>,
    relayouts: u64,
}

impl LanguageTreeView {
    /// Build the view for a container `width` pixels wide
    pub fn new(root: &LanguageNode, config: &AtlasConfig, width: f32, now_ms: f64) -> Self {
        let tree_config = config.tree.clone();
        let height = tree_config.container_height(width);
        let mut scheduler = Scheduler::new();
        scheduler.advance_to(now_ms);
        let pulse_task = scheduler.schedule_periodic(tree_config.pulse_period_ms, TreeEvent::Pulse);

        let mut view = Self {
            model: TreeViewModel::initialize(root),
            camera: Camera::new(width, height, &config.zoom),
            zoom: config.zoom.clone(),
            scheduler,
            auto_fit: None,
            resize: Debouncer::new(tree_config.resize_debounce_ms),
            pulse_task,
            pulse_started: now_ms,
            transition: Tween::new(now_ms, tree_config.transition_ms, Easing::CubicInOut),
            selected: None,
            relayouts: 0,
            config: tree_config,
        };
        view.relayout(now_ms);

        // First render grows everything out of the root
        let root_id = view.model.tree.root();
        let root_state = view.model.state.get_mut(root_id);
        root_state.previous = root_state.current;
        view
    }

    pub fn model(&self) -> &TreeViewModel {
        &self.model
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn transform(&self) -> ZoomTransform {
        self.camera.transform
    }

    pub fn viewport_size(&self) -> (f32, f32) {
        self.camera.viewport_size
    }

    /// Number of relayouts performed so far
    pub fn relayout_count(&self) -> u64 {
        self.relayouts
    }

    pub fn is_auto_fit_pending(&self) -> bool {
        self.auto_fit
            .map(|id| self.scheduler.is_pending(id))
            .unwrap_or(false)
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending_count()
    }

    pub fn is_transitioning(&self, now_ms: f64) -> bool {
        !self.transition.is_complete(now_ms)
    }

    /// Position every visible node and start the transition from whatever is
    /// drawn right now. Replaces any pending auto-fit.
    fn relayout(&mut self, now_ms: f64) {
        let drawn = self.frame(now_ms).positions();
        let ids: Vec<NodeId> = self.model.tree.ids().collect();
        for id in &ids {
            let state = self.model.state.get_mut(*id);
            state.previous = drawn.get(id).copied();
            state.current = None;
        }

        let leaves = self.model.visible_leaf_count();
        let depth = self.model.max_visible_depth();
        let breadth = (leaves as f32 * self.config.leaf_spacing).max(self.config.min_layout_height);
        let extent = depth.max(1) as f32 * self.config.depth_spacing;
        let layout = TidyLayout::new(
            Separation {
                siblings: self.config.sibling_separation as f64,
                cousins: self.config.cousin_separation as f64,
            },
            breadth as f64,
            extent as f64,
        );
        // Horizontal tree: depth runs along screen x, siblings along screen y
        for placed in layout.layout(&self.model) {
            self.model.state.get_mut(placed.id).current =
                Some(Vec2::new(placed.y as f32, placed.x as f32));
        }

        self.transition = Tween::new(now_ms, self.config.transition_ms, Easing::CubicInOut);
        if let Some(previous) = self.auto_fit.take() {
            self.scheduler.cancel(previous);
        }
        let delay = self.config.transition_ms + self.config.auto_fit_delay_ms;
        self.auto_fit = Some(self.scheduler.schedule_once(delay, TreeEvent::AutoFit));
        self.relayouts += 1;

        tracing::debug!(
            "Relayout: {} visible nodes, {} leaves, depth {} ({:.0}x{:.0})",
            self.model.visible_nodes().len(),
            leaves,
            depth,
            extent,
            breadth
        );
    }

    /// Run timers due by `now_ms` and advance animations.
    /// Returns true while anything is still moving.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        for event in self.scheduler.advance_to(now_ms) {
            match event {
                TreeEvent::AutoFit => {
                    self.auto_fit = None;
                    self.fit_with(self.config.auto_fit, now_ms);
                }
                TreeEvent::ResizeFit => {
                    self.fit_with(self.config.resize_fit, now_ms);
                }
                TreeEvent::Pulse => {
                    self.pulse_started = now_ms;
                }
            }
        }
        let camera_moving = self.camera.tick(now_ms);
        camera_moving || self.is_transitioning(now_ms)
    }

    /// Expand or collapse `id`. Leaves are left alone and cause no relayout.
    pub fn toggle(&mut self, id: NodeId, now_ms: f64) -> bool {
        self.tick(now_ms);
        if !self.model.toggle(id) {
            return false;
        }
        tracing::debug!(
            "Toggled {} -> {:?}",
            self.model.tree.node(id).name,
            self.model.kind(id)
        );
        self.relayout(now_ms);
        true
    }

    /// A click on a node toggles it and selects it
    pub fn click_node(&mut self, id: NodeId, now_ms: f64) {
        if self.model.tree.get(id).is_none() {
            return;
        }
        self.toggle(id, now_ms);
        self.selected = Some(id);
    }

    /// Click at a container point; empty space clears the selection
    pub fn click(&mut self, screen: Vec2, now_ms: f64) -> Option<NodeId> {
        match self.node_at(screen, now_ms) {
            Some(id) => {
                self.click_node(id, now_ms);
                Some(id)
            }
            None => {
                self.clear_selection();
                None
            }
        }
    }

    pub fn select(&mut self, id: NodeId) {
        if self.model.tree.get(id).is_some() {
            self.selected = Some(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn selected_details(&self) -> Option<NodeDetails> {
        let node = self.model.tree.get(self.selected?)?;
        Some(NodeDetails {
            name: node.name.clone(),
            status: node.status,
            period: node.period.clone(),
            region: node.region.clone(),
            speakers: node.speakers.clone(),
            note: node.note.clone(),
        })
    }

    pub fn expand_all(&mut self, now_ms: f64) {
        self.tick(now_ms);
        self.model.expand_all();
        self.relayout(now_ms);
    }

    pub fn collapse_all(&mut self, now_ms: f64) {
        self.tick(now_ms);
        self.model.collapse_all();
        self.relayout(now_ms);
    }

    fn fit_with(&mut self, request: FitRequest, now_ms: f64) -> Option<ZoomTransform> {
        let bounds = content_bounds(&self.model);
        self.camera
            .fit_to_view(&bounds, request, now_ms, &self.config)
    }

    /// Frame the settled layout with an explicit padding and duration
    pub fn fit_to_view(&mut self, request: FitRequest, now_ms: f64) -> Option<ZoomTransform> {
        self.tick(now_ms);
        self.fit_with(request, now_ms)
    }

    /// Fit with the default padding and duration
    pub fn fit_default(&mut self, now_ms: f64) -> Option<ZoomTransform> {
        self.fit_to_view(self.config.default_fit, now_ms)
    }

    pub fn double_click(&mut self, now_ms: f64) -> Option<ZoomTransform> {
        self.fit_to_view(self.config.double_click_fit, now_ms)
    }

    /// Drag by a pixel delta
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.camera.pan(dx, dy);
    }

    /// Modifier-wheel zoom around the cursor. Returns false when the
    /// gesture should scroll the page instead.
    pub fn wheel(&mut self, delta_y: f32, modifier: bool, cursor: Vec2) -> bool {
        self.camera.wheel(delta_y, modifier, cursor, &self.zoom)
    }

    /// The container changed width; refits after the resize burst settles
    pub fn resize(&mut self, width: f32, now_ms: f64) {
        self.tick(now_ms);
        let height = self.config.container_height(width);
        self.camera.set_viewport_size(width, height);
        self.resize.trigger(&mut self.scheduler, TreeEvent::ResizeFit);
    }

    /// Interpolated geometry at `now_ms`
    pub fn frame(&self, now_ms: f64) -> TreeFrame {
        let t = self.transition.eased(now_ms) as f32;
        frame(&self.model.tree, &self.model.state, t)
    }

    /// Phase of the status-dot pulse in [0, 1]
    pub fn pulse_phase(&self, now_ms: f64) -> f64 {
        ((now_ms - self.pulse_started) / self.config.pulse_period_ms).clamp(0.0, 1.0)
    }

    /// Primitives in content coordinates; apply `transform()` to draw
    pub fn scene(&self, now_ms: f64) -> TreeScene {
        let pulse = self
            .scheduler
            .is_pending(self.pulse_task)
            .then(|| self.pulse_phase(now_ms));
        TreeScene::build(&self.model, &self.frame(now_ms), pulse)
    }

    /// Node under a container point
    pub fn node_at(&self, screen: Vec2, now_ms: f64) -> Option<NodeId> {
        let content = self.camera.screen_to_world(screen);
        self.scene(now_ms).node_at(content)
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.model.kind(id)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.model.tree.find(name)
    }

    pub fn visible_names(&self) -> Vec<String> {
        self.model.visible_names()
    }

    /// Stop every timer and animation; the view is inert afterwards
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.resize.cancel(&mut self.scheduler);
        self.auto_fit = None;
        self.camera.stop_animation();
        tracing::debug!("Language tree view torn down");
    }
}
