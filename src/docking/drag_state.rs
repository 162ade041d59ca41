use std::sync::Arc;

use egui::Pos2;

use crate::tree::{LayoutTree, PanelId, TabId, TreeError};

use super::drop_apply::apply_drop;
use super::geometry::GeometrySnapshot;
use super::options::DockingOptions;
use super::resolver::resolve;
use super::types::{CancelReason, DragItem, DropTarget};

#[derive(Debug)]
struct ActiveDrag {
    session: u64,
    item: DragItem,
    snapshot: Arc<GeometrySnapshot>,
    pointer: Pos2,
    target: DropTarget,
}

/// Result of [`DragController::start`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragStarted {
    /// The drag that was in progress and got cancelled by this one.
    pub superseded: Option<DragItem>,
    pub item: DragItem,
    pub target: DropTarget,
}

/// Result of [`DragController::drop`].
#[derive(Clone, Debug, PartialEq)]
pub enum DropOutcome {
    Committed {
        tree: LayoutTree,
        target: DropTarget,
    },
    Cancelled(CancelReason),
}

/// The drag state machine: idle, or dragging one item.
///
/// Pointer moves only re-run the resolver against the cached geometry snapshot; the tree is read
/// when the drag starts and when it is dropped.
#[derive(Debug, Default)]
pub struct DragController {
    next_session: u64,
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn item(&self) -> Option<&DragItem> {
        self.active.as_ref().map(|a| &a.item)
    }

    /// The current target, [`DropTarget::None`] when idle.
    pub fn target(&self) -> DropTarget {
        self.active.as_ref().map_or(DropTarget::None, |a| a.target)
    }

    /// Begin dragging `tab` out of leaf `source_panel`.
    ///
    /// A drag already in progress is cancelled first (reported in [`DragStarted::superseded`]).
    ///
    /// # Errors
    /// [`TreeError::NotFound`] / [`TreeError::InvalidTarget`] if `tab` is not in leaf
    /// `source_panel`. The controller is left as it was.
    pub fn start(
        &mut self,
        tree: &LayoutTree,
        tab: TabId,
        source_panel: PanelId,
        pointer: Pos2,
        snapshot: Arc<GeometrySnapshot>,
        options: &DockingOptions,
    ) -> Result<DragStarted, TreeError> {
        let item = DragItem::for_tab(tree, tab, source_panel)?;

        let superseded = self.end(CancelReason::Superseded).map(|(item, _)| item);

        let session = self.next_session.max(1);
        self.next_session = session.saturating_add(1);

        let target = resolve(pointer, &snapshot, &item, options);
        log::debug!(
            "drag session START id={session} tab={tab} source={source_panel} target={target:?}"
        );

        self.active = Some(ActiveDrag {
            session,
            item,
            snapshot,
            pointer,
            target,
        });

        Ok(DragStarted {
            superseded,
            item,
            target,
        })
    }

    /// Move the pointer. Returns the new target only if it changed.
    pub fn update_pointer(&mut self, pointer: Pos2, options: &DockingOptions) -> Option<DropTarget> {
        let active = self.active.as_mut()?;
        active.pointer = pointer;
        Self::retarget(active, options)
    }

    /// Swap in fresh geometry (e.g. after a resize) and re-resolve at the last pointer position.
    /// Returns the new target only if it changed.
    pub fn set_geometry(
        &mut self,
        snapshot: Arc<GeometrySnapshot>,
        options: &DockingOptions,
    ) -> Option<DropTarget> {
        let active = self.active.as_mut()?;
        active.snapshot = snapshot;
        Self::retarget(active, options)
    }

    fn retarget(active: &mut ActiveDrag, options: &DockingOptions) -> Option<DropTarget> {
        let target = resolve(active.pointer, &active.snapshot, &active.item, options);
        if target == active.target {
            return None;
        }
        log::debug!(
            "drag session TARGET id={} {:?} -> {target:?}",
            active.session,
            active.target
        );
        active.target = target;
        Some(target)
    }

    /// Release the pointer: commit the current target against `tree`, or cancel.
    ///
    /// Returns `None` when no drag is in progress. `tree` itself is never modified; a committed
    /// drop carries the new tree.
    pub fn drop(&mut self, tree: &LayoutTree, options: &DockingOptions) -> Option<DropOutcome> {
        let active = self.active.take()?;

        if active.target.is_none() {
            log::debug!("drag session CANCEL id={} reason=NoTarget", active.session);
            return Some(DropOutcome::Cancelled(CancelReason::NoTarget));
        }

        let outcome = match apply_drop(tree, &active.item, active.target, options) {
            Ok(tree) => {
                log::debug!(
                    "drag session COMMIT id={} target={:?}",
                    active.session,
                    active.target
                );
                DropOutcome::Committed {
                    tree,
                    target: active.target,
                }
            }
            Err(err) => {
                log::warn!(
                    "drag session FAILED id={} target={:?}: {err}",
                    active.session,
                    active.target
                );
                DropOutcome::Cancelled(CancelReason::Failed(err))
            }
        };
        Some(outcome)
    }

    /// Abort the drag (e.g. Escape). Returns the cancelled item, if any.
    pub fn cancel(&mut self) -> Option<DragItem> {
        self.end(CancelReason::Explicit).map(|(item, _)| item)
    }

    /// The pointer capture was lost. Same as [`Self::cancel`] with a different reason.
    pub fn pointer_lost(&mut self) -> Option<DragItem> {
        self.end(CancelReason::PointerLost).map(|(item, _)| item)
    }

    /// Cancel because something else changed the layout under the drag.
    pub(crate) fn supersede(&mut self) -> Option<DragItem> {
        self.end(CancelReason::Superseded).map(|(item, _)| item)
    }

    fn end(&mut self, reason: CancelReason) -> Option<(DragItem, CancelReason)> {
        let active = self.active.take()?;
        log::debug!("drag session CANCEL id={} reason={reason:?}", active.session);
        Some((active.item, reason))
    }
}

#[cfg(test)]
mod tests {
    use egui::{Rect, Vec2};

    use super::*;
    use crate::docking::geometry::SolveMetrics;
    use crate::tree::test_util::{leaf, split, tab_layout, tree};
    use crate::tree::{DockSide, SplitDir};

    fn setup() -> (LayoutTree, Arc<GeometrySnapshot>) {
        let t = tree(split(
            1,
            SplitDir::Horizontal,
            vec![leaf(2, &[10, 11]), leaf(3, &[12])],
        ));
        let area = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 224.0));
        let snapshot = GeometrySnapshot::solve(&t, area, SolveMetrics::default());
        (t, Arc::new(snapshot))
    }

    fn p(id: u64) -> PanelId {
        PanelId::from_u64(id)
    }

    fn t(id: u64) -> TabId {
        TabId::from_u64(id)
    }

    #[test]
    fn start_requires_tab_in_source() {
        let (tree, snapshot) = setup();
        let opt = DockingOptions::default();
        let mut drag = DragController::new();

        let err = drag
            .start(&tree, t(12), p(2), Pos2::ZERO, snapshot, &opt)
            .expect_err("drag must not start");
        assert!(matches!(err, TreeError::NotFound(_)));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn pointer_updates_report_changes_only() {
        let (tree, snapshot) = setup();
        let opt = DockingOptions::default();
        let mut drag = DragController::new();

        let started = drag
            .start(&tree, t(11), p(2), Pos2::new(150.0, 10.0), snapshot, &opt)
            .expect("drag must start");
        assert_eq!(started.superseded, None);
        assert_eq!(started.item.source_index, 1);
        // Hovering its own tab: no-op.
        assert_eq!(started.target, DropTarget::None);

        // Centre of the right leaf's body.
        let body = DropTarget::PanelBody { panel: p(3) };
        assert_eq!(drag.update_pointer(Pos2::new(300.0, 124.0), &opt), Some(body));
        assert_eq!(drag.update_pointer(Pos2::new(301.0, 125.0), &opt), None);
        assert_eq!(drag.target(), body);

        // Right edge band of the right leaf.
        assert_eq!(
            drag.update_pointer(Pos2::new(395.0, 124.0), &opt),
            Some(DropTarget::Edge {
                panel: p(3),
                side: DockSide::Right
            })
        );
    }

    #[test]
    fn drop_commits_resolved_target() {
        let (tree, snapshot) = setup();
        let opt = DockingOptions::default();
        let mut drag = DragController::new();

        drag.start(&tree, t(11), p(2), Pos2::new(300.0, 124.0), snapshot, &opt)
            .expect("drag must start");
        let Some(DropOutcome::Committed { tree: next, target }) = drag.drop(&tree, &opt) else {
            panic!("expected commit");
        };
        assert_eq!(target, DropTarget::PanelBody { panel: p(3) });
        assert_eq!(tab_layout(&next), vec![vec![10], vec![12, 11]]);
        assert!(!drag.is_dragging());
        assert_eq!(drag.drop(&tree, &opt), None);
    }

    #[test]
    fn drop_without_target_cancels() {
        let (tree, snapshot) = setup();
        let opt = DockingOptions::default();
        let mut drag = DragController::new();

        drag.start(&tree, t(11), p(2), Pos2::new(-50.0, -50.0), snapshot, &opt)
            .expect("drag must start");
        assert_eq!(
            drag.drop(&tree, &opt),
            Some(DropOutcome::Cancelled(CancelReason::NoTarget))
        );
    }

    #[test]
    fn drop_against_changed_tree_fails() {
        let (tree, snapshot) = setup();
        let opt = DockingOptions::default();
        let mut drag = DragController::new();

        drag.start(&tree, t(11), p(2), Pos2::new(300.0, 124.0), snapshot, &opt)
            .expect("drag must start");
        let changed = tree.close_tab(t(11)).expect("close_tab must succeed");
        let outcome = drag.drop(&changed, &opt);
        assert!(
            matches!(
                outcome,
                Some(DropOutcome::Cancelled(CancelReason::Failed(TreeError::NotFound(_))))
            ),
            "{outcome:?}"
        );
    }

    #[test]
    fn new_start_supersedes_and_geometry_retargets() {
        let (tree, snapshot) = setup();
        let opt = DockingOptions::default();
        let mut drag = DragController::new();

        drag.start(&tree, t(10), p(2), Pos2::new(300.0, 124.0), snapshot.clone(), &opt)
            .expect("drag must start");
        let started = drag
            .start(&tree, t(12), p(3), Pos2::new(100.0, 124.0), snapshot, &opt)
            .expect("drag must start");
        assert_eq!(started.superseded.map(|i| i.tab_id), Some(t(10)));
        assert_eq!(started.target, DropTarget::PanelBody { panel: p(2) });

        // Once the source leaf is maximized the pointer is over its own body: no target.
        let maximized = tree.maximize(p(3)).expect("maximize must succeed");
        let area = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 224.0));
        let fresh = GeometrySnapshot::solve(&maximized, area, SolveMetrics::default());
        assert_eq!(drag.set_geometry(Arc::new(fresh), &opt), Some(DropTarget::None));

        assert_eq!(drag.pointer_lost().map(|i| i.tab_id), Some(t(12)));
        assert_eq!(drag.cancel(), None);
    }
}
