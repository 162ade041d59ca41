use crate::tree::{LayoutTree, TreeError};

use super::options::DockingOptions;
use super::types::{DragItem, DropTarget};

/// Apply a resolved drop to `tree`.
///
/// An edge drop is a split followed by a move into the new leaf. Both steps produce new values,
/// so if the move fails the split is simply discarded and `tree` stays as it was.
pub(super) fn apply_drop(
    tree: &LayoutTree,
    item: &DragItem,
    target: DropTarget,
    options: &DockingOptions,
) -> Result<LayoutTree, TreeError> {
    match target {
        DropTarget::None => Err(TreeError::InvalidArgument("no drop target".to_owned())),
        DropTarget::PanelBody { panel } | DropTarget::TabBar { panel } => {
            tree.move_tab(item.tab_id, item.source_panel, panel, None)
        }
        DropTarget::TabPosition { panel, index } => {
            tree.move_tab(item.tab_id, item.source_panel, panel, Some(index))
        }
        DropTarget::Edge { panel, side } => {
            let first = options.first_child_fraction();
            let new_fraction = if side.is_after() { 1.0 - first } else { first };

            let (split, new_panel) =
                tree.split_panel_for_move(panel, side.split_dir(), side.is_after(), new_fraction)?;
            log::debug!("drop: split {panel} at {side:?}, new leaf {new_panel}");
            split.move_tab(item.tab_id, item.source_panel, new_panel, None)
        }
    }
}
