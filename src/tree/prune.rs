use super::{LayoutTree, PanelId, PanelNode};

/// Scale `sizes` so they sum to one. Degenerate input is replaced by an even distribution.
pub(super) fn normalize_sizes(sizes: &mut [f32]) {
    if sizes.is_empty() {
        return;
    }
    let sum: f32 = sizes.iter().sum();
    if sum.is_finite() && sum > 0.0 {
        for size in sizes.iter_mut() {
            *size /= sum;
        }
    } else {
        let even = 1.0 / sizes.len() as f32;
        sizes.fill(even);
    }
}

/// Remove the child `id` from whichever split holds it.
///
/// The split loses the child and its size share (the rest is renormalised). A split left with a
/// single child is replaced by that child in place, so the child inherits the split's slot and
/// size in the grandparent.
///
/// Returns `false` if `id` is not a strict descendant of `node`.
fn remove_descendant(node: &mut PanelNode, id: PanelId) -> bool {
    let PanelNode::Split(split) = node else {
        return false;
    };

    let Some(pos) = split.children.iter().position(|c| c.id() == id) else {
        return split
            .children
            .iter_mut()
            .any(|child| remove_descendant(child, id));
    };

    split.children.remove(pos);
    if pos < split.sizes.len() {
        split.sizes.remove(pos);
    }
    normalize_sizes(&mut split.sizes);

    if split.children.len() == 1 {
        if let Some(only) = split.children.pop() {
            log::debug!("prune: collapsed split {} into {}", split.id, only.id());
            *node = only;
        }
    }
    true
}

impl LayoutTree {
    /// Drop `leaf` from the tree and collapse under-populated splits.
    ///
    /// Must not be called for the root; the root is emptied instead by the callers.
    pub(super) fn prune_leaf(&mut self, leaf: PanelId) {
        if remove_descendant(&mut self.root, leaf) {
            log::debug!("prune: removed leaf {leaf}");
        }
        if self.maximized == Some(leaf) {
            self.maximized = None;
        }
    }

    /// Prune `leaf` if it has become empty and is not the root.
    pub(super) fn prune_if_empty(&mut self, leaf: PanelId) {
        if self.root.id() == leaf {
            return;
        }
        let is_empty = self
            .find_node(leaf)
            .and_then(PanelNode::as_leaf)
            .is_some_and(|l| l.is_empty());
        if is_empty {
            self.prune_leaf(leaf);
        }
    }
}
