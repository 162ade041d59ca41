use crate::tree::PanelId;

use super::types::{DragItem, DropTarget};

/// Would inserting the dragged tab into `panel` at `slot` leave the layout unchanged?
///
/// `slot` is an insertion slot counted before the tab is removed (`None` appends). On the source
/// leaf, both slots around the tab's current position keep it where it is.
pub(super) fn is_noop_insert(item: &DragItem, panel: PanelId, slot: Option<usize>) -> bool {
    if panel != item.source_panel {
        return false;
    }
    match slot {
        None => item.source_index + 1 >= item.source_tab_count,
        Some(slot) => slot == item.source_index || slot == item.source_index + 1,
    }
}

/// Splitting the source leaf to host its only tab would just recreate the same leaf.
pub(super) fn is_noop_edge(item: &DragItem, panel: PanelId) -> bool {
    panel == item.source_panel && item.source_tab_count <= 1
}

/// The source's own tab bar is not a target when the dragged tab is alone in it.
pub(super) fn skip_tab_bar(item: &DragItem, panel: PanelId) -> bool {
    panel == item.source_panel && item.source_tab_count <= 1
}

/// Turn a target that would not change anything into [`DropTarget::None`].
pub(super) fn reject_noop(item: &DragItem, target: DropTarget) -> DropTarget {
    let noop = match target {
        DropTarget::None => false,
        DropTarget::PanelBody { panel } | DropTarget::TabBar { panel } => {
            is_noop_insert(item, panel, None)
        }
        DropTarget::TabPosition { panel, index } => is_noop_insert(item, panel, Some(index)),
        DropTarget::Edge { panel, .. } => is_noop_edge(item, panel),
    };
    if noop { DropTarget::None } else { target }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docking::types::DragKind;
    use crate::tree::{DockSide, TabId};

    fn item(source_index: usize, source_tab_count: usize) -> DragItem {
        DragItem {
            kind: DragKind::Tab,
            tab_id: TabId::from_u64(1),
            source_panel: PanelId::from_u64(7),
            source_index,
            source_tab_count,
        }
    }

    #[test]
    fn slots_around_source_are_noops() {
        let it = item(1, 3);
        let p = PanelId::from_u64(7);
        assert!(is_noop_insert(&it, p, Some(1)));
        assert!(is_noop_insert(&it, p, Some(2)));
        assert!(!is_noop_insert(&it, p, Some(0)));
        assert!(!is_noop_insert(&it, p, Some(3)));
        assert!(!is_noop_insert(&it, p, None));
        assert!(!is_noop_insert(&it, PanelId::from_u64(8), Some(1)));
    }

    #[test]
    fn appending_last_tab_to_own_panel_is_noop() {
        let it = item(2, 3);
        let p = PanelId::from_u64(7);
        assert_eq!(
            reject_noop(&it, DropTarget::PanelBody { panel: p }),
            DropTarget::None
        );
    }

    #[test]
    fn edge_on_single_tab_source_is_noop() {
        let p = PanelId::from_u64(7);
        let edge = DropTarget::Edge {
            panel: p,
            side: DockSide::Left,
        };
        assert_eq!(reject_noop(&item(0, 1), edge), DropTarget::None);
        assert_eq!(reject_noop(&item(0, 2), edge), edge);
        assert!(skip_tab_bar(&item(0, 1), p));
        assert!(!skip_tab_bar(&item(0, 2), p));
    }
}
