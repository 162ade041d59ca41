//! Pointer-driven docking on top of [`crate::tree::LayoutTree`].
//!
//! [`DockingFacade`] is the single entry point the UI talks to. It owns the current tree (behind
//! an `Arc`, replaced wholesale on every change), the [`DragController`], and the listeners that
//! get told about layout and drag changes.
//!
//! Typical frame loop:
//! - on pointer down over a tab: [`DockingFacade::start_drag`] with the frame's
//!   [`GeometrySnapshot`],
//! - on pointer move: [`DockingFacade::update_pointer`] (paint a preview for
//!   [`DockingFacade::drag_target`]),
//! - on release: [`DockingFacade::drop`]; on Escape: [`DockingFacade::cancel`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use egui::Pos2;

use crate::tree::{LayoutTree, Leaf, PanelId, SplitDir, Tab, TabId, TreeError};

mod debug;
mod drag_state;
mod drop_apply;
mod drop_policy;
mod geometry;
mod options;
mod resolver;
mod types;


pub use drag_state::{DragController, DragStarted, DropOutcome};
pub use geometry::{GeometrySnapshot, PanelGeometry, SolveMetrics, TabGeometry};
pub use options::DockingOptions;
pub use resolver::resolve;
pub use types::{CancelReason, DragItem, DragKind, DragStatus, DropTarget};

/// Notifications emitted synchronously by [`DockingFacade`].
#[derive(Clone, Debug)]
pub enum DockingEvent {
    /// The tree was replaced.
    LayoutChanged(Arc<LayoutTree>),

    /// A drag started, changed target, or ended.
    DragStateChanged {
        status: DragStatus,
        target: DropTarget,
    },

    /// A command was rejected; the tree is unchanged.
    CommandFailed {
        command: &'static str,
        error: TreeError,
    },
}

/// Handle returned by [`DockingFacade::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&DockingEvent)>;

/// The command and notification surface of the docking engine.
pub struct DockingFacade {
    pub options: DockingOptions,

    tree: Arc<LayoutTree>,
    drag: DragController,

    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,

    debug_log: VecDeque<String>,
    debug_seq: u64,
    debug_last_integrity_hash: Option<u64>,
}

impl fmt::Debug for DockingFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockingFacade")
            .field("options", &self.options)
            .field("tree", &self.tree)
            .field("drag", &self.drag)
            .field("listeners", &self.listeners.len())
            .field("debug_log", &self.debug_log.len())
            .finish_non_exhaustive()
    }
}

impl DockingFacade {
    pub fn new(tree: LayoutTree) -> Self {
        Self::new_with_options(tree, DockingOptions::default())
    }

    pub fn new_with_options(tree: LayoutTree, options: DockingOptions) -> Self {
        let mut facade = Self {
            options,
            tree: Arc::new(tree),
            drag: DragController::new(),
            listeners: Vec::new(),
            next_subscription: 1,
            debug_log: VecDeque::new(),
            debug_seq: 0,
            debug_last_integrity_hash: None,
        };
        facade.debug_check_integrity("new");
        facade
    }

    /// The current tree. Unchanged (pointer-identical) across cancelled drags, no-ops and
    /// failed commands.
    pub fn tree(&self) -> Arc<LayoutTree> {
        Arc::clone(&self.tree)
    }

    /// Register a listener called synchronously for every [`DockingEvent`].
    pub fn subscribe(&mut self, listener: impl FnMut(&DockingEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.saturating_add(1);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: DockingEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    fn emit_drag_status(&mut self, status: DragStatus, target: DropTarget) {
        self.debug_log_event(|| format!("drag {status:?} target={target:?}"));
        self.emit(DockingEvent::DragStateChanged { status, target });
    }

    fn emit_failure(&mut self, command: &'static str, error: TreeError) {
        log::warn!("{command} failed: {error}");
        self.debug_log_event(|| format!("{command} FAILED: {error}"));
        self.emit(DockingEvent::CommandFailed { command, error });
    }

    /// Install `next` as the current tree and notify, unless nothing changed.
    fn commit(&mut self, command: &'static str, next: LayoutTree) -> Arc<LayoutTree> {
        if next == *self.tree {
            log::debug!("{command}: no change");
            self.debug_log_event(|| format!("{command} no-op"));
            return self.tree();
        }

        self.tree = Arc::new(next);
        log::debug!(
            "{command}: applied (leaves={} tabs={})",
            self.tree.leaf_count(),
            self.tree.tab_count()
        );
        self.debug_log_event(|| format!("{command} applied"));
        self.debug_check_integrity(command);

        let tree = self.tree();
        self.emit(DockingEvent::LayoutChanged(Arc::clone(&tree)));
        tree
    }

    /// Run a direct command against the current tree.
    fn apply(
        &mut self,
        command: &'static str,
        op: impl FnOnce(&LayoutTree) -> Result<LayoutTree, TreeError>,
    ) -> Result<Arc<LayoutTree>, TreeError> {
        match op(&*self.tree) {
            Ok(next) => {
                if next != *self.tree && self.options.cancel_drag_on_command {
                    self.supersede_drag();
                }
                Ok(self.commit(command, next))
            }
            Err(error) => {
                self.emit_failure(command, error.clone());
                Err(error)
            }
        }
    }

    fn supersede_drag(&mut self) {
        if self.drag.supersede().is_some() {
            self.emit_drag_status(
                DragStatus::Cancelled(CancelReason::Superseded),
                DropTarget::None,
            );
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Drag commands

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn drag_item(&self) -> Option<DragItem> {
        self.drag.item().copied()
    }

    /// Where the current drag would land, [`DropTarget::None`] when idle.
    pub fn drag_target(&self) -> DropTarget {
        self.drag.target()
    }

    /// Start dragging `tab` out of leaf `source_panel`. Returns the initial target.
    ///
    /// # Errors
    /// [`TreeError::NotFound`] / [`TreeError::InvalidTarget`] if `tab` is not in leaf
    /// `source_panel`. A drag already in progress is kept in that case.
    pub fn start_drag(
        &mut self,
        tab: TabId,
        source_panel: PanelId,
        pointer: Pos2,
        snapshot: impl Into<Arc<GeometrySnapshot>>,
    ) -> Result<DropTarget, TreeError> {
        let started = match self.drag.start(
            &self.tree,
            tab,
            source_panel,
            pointer,
            snapshot.into(),
            &self.options,
        ) {
            Ok(started) => started,
            Err(error) => {
                self.emit_failure("start_drag", error.clone());
                return Err(error);
            }
        };

        if started.superseded.is_some() {
            self.emit_drag_status(
                DragStatus::Cancelled(CancelReason::Superseded),
                DropTarget::None,
            );
        }
        self.emit_drag_status(DragStatus::Dragging(started.item), started.target);
        Ok(started.target)
    }

    /// Move the pointer of the current drag. Returns the (possibly unchanged) target.
    pub fn update_pointer(&mut self, pointer: Pos2) -> DropTarget {
        if let Some(target) = self.drag.update_pointer(pointer, &self.options) {
            self.emit_retarget(target);
        }
        self.drag.target()
    }

    /// Hand the current drag a fresh geometry snapshot. Returns the (possibly unchanged) target.
    pub fn set_geometry(&mut self, snapshot: impl Into<Arc<GeometrySnapshot>>) -> DropTarget {
        if let Some(target) = self.drag.set_geometry(snapshot.into(), &self.options) {
            self.emit_retarget(target);
        }
        self.drag.target()
    }

    fn emit_retarget(&mut self, target: DropTarget) {
        if let Some(item) = self.drag.item().copied() {
            self.emit_drag_status(DragStatus::Dragging(item), target);
        }
    }

    /// Release the current drag.
    ///
    /// Returns the tree after the drop: the new one on commit, the unchanged one when the drag is
    /// cancelled for lack of a target (or when there is no drag).
    ///
    /// # Errors
    /// The [`TreeError`] that made the commit fail; the drag is then reported as
    /// `Cancelled(Failed(..))` and the tree is unchanged.
    pub fn drop(&mut self) -> Result<Arc<LayoutTree>, TreeError> {
        let Some(outcome) = self.drag.drop(&self.tree, &self.options) else {
            return Ok(self.tree());
        };

        match outcome {
            DropOutcome::Committed { tree, target } => {
                let tree = self.commit("drop", tree);
                self.emit_drag_status(DragStatus::Committed, target);
                Ok(tree)
            }
            DropOutcome::Cancelled(CancelReason::Failed(error)) => {
                self.emit_drag_status(
                    DragStatus::Cancelled(CancelReason::Failed(error.clone())),
                    DropTarget::None,
                );
                Err(error)
            }
            DropOutcome::Cancelled(reason) => {
                self.emit_drag_status(DragStatus::Cancelled(reason), DropTarget::None);
                Ok(self.tree())
            }
        }
    }

    /// Abort the current drag. Returns `false` if there was none.
    pub fn cancel(&mut self) -> bool {
        if self.drag.cancel().is_none() {
            return false;
        }
        self.emit_drag_status(DragStatus::Cancelled(CancelReason::Explicit), DropTarget::None);
        true
    }

    /// The pointer capture was lost mid-drag. Returns `false` if there was no drag.
    pub fn pointer_lost(&mut self) -> bool {
        if self.drag.pointer_lost().is_none() {
            return false;
        }
        self.emit_drag_status(
            DragStatus::Cancelled(CancelReason::PointerLost),
            DropTarget::None,
        );
        true
    }

    // ---------------------------------------------------------------------------------------------
    // Direct commands

    /// See [`LayoutTree::split_panel`].
    ///
    /// # Errors
    /// As [`LayoutTree::split_panel`].
    pub fn split_panel(
        &mut self,
        target: PanelId,
        dir: SplitDir,
        new_leaf: Leaf,
        position_after: bool,
    ) -> Result<Arc<LayoutTree>, TreeError> {
        self.apply("split_panel", |tree| {
            tree.split_panel(target, dir, new_leaf, position_after)
        })
    }

    /// See [`LayoutTree::move_tab`].
    ///
    /// # Errors
    /// As [`LayoutTree::move_tab`].
    pub fn move_tab(
        &mut self,
        tab: TabId,
        source: PanelId,
        target: PanelId,
        index: Option<usize>,
    ) -> Result<Arc<LayoutTree>, TreeError> {
        self.apply("move_tab", |tree| tree.move_tab(tab, source, target, index))
    }

    /// # Errors
    /// As [`LayoutTree::close_tab`].
    pub fn close_tab(&mut self, tab: TabId) -> Result<Arc<LayoutTree>, TreeError> {
        self.apply("close_tab", |tree| tree.close_tab(tab))
    }

    /// # Errors
    /// As [`LayoutTree::close_panel`].
    pub fn close_panel(&mut self, panel: PanelId) -> Result<Arc<LayoutTree>, TreeError> {
        self.apply("close_panel", |tree| tree.close_panel(panel))
    }

    /// # Errors
    /// As [`LayoutTree::resize`].
    pub fn resize(&mut self, split: PanelId, sizes: &[f32]) -> Result<Arc<LayoutTree>, TreeError> {
        self.apply("resize", |tree| tree.resize(split, sizes))
    }

    /// # Errors
    /// As [`LayoutTree::maximize`].
    pub fn maximize(&mut self, panel: PanelId) -> Result<Arc<LayoutTree>, TreeError> {
        self.apply("maximize", |tree| tree.maximize(panel))
    }

    /// # Errors
    /// Never fails; the `Result` keeps the command surface uniform.
    pub fn restore(&mut self) -> Result<Arc<LayoutTree>, TreeError> {
        self.apply("restore", |tree| Ok(tree.restore()))
    }

    /// # Errors
    /// As [`LayoutTree::toggle_maximize`].
    pub fn toggle_maximize(&mut self, panel: PanelId) -> Result<Arc<LayoutTree>, TreeError> {
        self.apply("toggle_maximize", |tree| tree.toggle_maximize(panel))
    }

    /// # Errors
    /// As [`LayoutTree::add_tab`].
    pub fn add_tab(
        &mut self,
        panel: PanelId,
        tab: Tab,
        index: Option<usize>,
    ) -> Result<Arc<LayoutTree>, TreeError> {
        self.apply("add_tab", |tree| tree.add_tab(panel, tab, index))
    }

    /// # Errors
    /// As [`LayoutTree::activate_tab`].
    pub fn activate_tab(&mut self, tab: TabId) -> Result<Arc<LayoutTree>, TreeError> {
        self.apply("activate_tab", |tree| tree.activate_tab(tab))
    }

    /// # Errors
    /// As [`LayoutTree::set_tab_pinned`].
    pub fn set_tab_pinned(
        &mut self,
        tab: TabId,
        pinned: bool,
    ) -> Result<Arc<LayoutTree>, TreeError> {
        self.apply("set_tab_pinned", |tree| tree.set_tab_pinned(tab, pinned))
    }

    /// Swap in a whole new layout (e.g. one restored from storage), re-checking its invariants.
    ///
    /// # Errors
    /// [`TreeError::InvalidArgument`] if `tree` is not a valid layout.
    pub fn replace_tree(&mut self, tree: LayoutTree) -> Result<Arc<LayoutTree>, TreeError> {
        self.apply("replace_tree", move |_| tree.validated())
    }
}
