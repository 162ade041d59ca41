//! Layout mutations. Each takes `&self` and returns a new tree; the receiver is never touched.

use super::prune::normalize_sizes;
use super::traverse::{find_leaf_mut, find_node_mut};
use super::{
    Leaf, LayoutTree, PanelId, PanelNode, SIZE_TOLERANCE, Split, SplitDir, Tab, TabId,
    TreeError,
};

impl LayoutTree {
    /// Replace leaf `target` with a two-way split holding the old leaf and `new_leaf`, sized evenly.
    ///
    /// `position_after` puts `new_leaf` second (right of / below the old leaf).
    ///
    /// # Errors
    /// See [`Self::split_panel_at`].
    pub fn split_panel(
        &self,
        target: PanelId,
        dir: SplitDir,
        new_leaf: Leaf,
        position_after: bool,
    ) -> Result<Self, TreeError> {
        self.split_panel_at(target, dir, new_leaf, position_after, 0.5)
    }

    /// Like [`Self::split_panel`], giving `new_fraction` of the space to `new_leaf`.
    ///
    /// The new split takes the old leaf's place (and size share) in its parent. Its id comes from
    /// the tree's allocator.
    ///
    /// # Errors
    /// - [`TreeError::NotFound`] if `target` does not exist.
    /// - [`TreeError::InvalidTarget`] if `target` is a split.
    /// - [`TreeError::InvalidArgument`] if `new_leaf` has no tabs, reuses a panel or tab id, has
    ///   an active tab it does not hold, or `new_fraction` is not strictly between 0 and 1.
    pub fn split_panel_at(
        &self,
        target: PanelId,
        dir: SplitDir,
        new_leaf: Leaf,
        position_after: bool,
        new_fraction: f32,
    ) -> Result<Self, TreeError> {
        self.leaf(target)?;
        if new_leaf.is_empty() {
            return Err(TreeError::InvalidArgument(format!(
                "new panel {} has no tabs",
                new_leaf.id
            )));
        }
        self.insert_split(target, dir, new_leaf, position_after, new_fraction)
    }

    /// Split `target` around a fresh empty leaf and return the new leaf's id.
    ///
    /// The result is only valid once a tab has been moved into the new leaf; callers must do that
    /// before publishing the tree.
    pub(crate) fn split_panel_for_move(
        &self,
        target: PanelId,
        dir: SplitDir,
        position_after: bool,
        new_fraction: f32,
    ) -> Result<(Self, PanelId), TreeError> {
        let new_panel = self.fresh_panel_id();
        let next = self.insert_split(
            target,
            dir,
            Leaf::new(new_panel),
            position_after,
            new_fraction,
        )?;
        Ok((next, new_panel))
    }

    fn insert_split(
        &self,
        target: PanelId,
        dir: SplitDir,
        new_leaf: Leaf,
        position_after: bool,
        new_fraction: f32,
    ) -> Result<Self, TreeError> {
        self.leaf(target)?;

        if !(new_fraction > 0.0 && new_fraction < 1.0) {
            return Err(TreeError::InvalidArgument(format!(
                "split fraction {new_fraction} must be in (0, 1)"
            )));
        }
        if self.find_node(new_leaf.id).is_some() {
            return Err(TreeError::InvalidArgument(format!(
                "panel id {} already in use",
                new_leaf.id
            )));
        }
        self.check_new_tabs(&new_leaf.tabs)?;
        if let Some(active) = new_leaf.active {
            if new_leaf.tab_index(active).is_none() {
                return Err(TreeError::InvalidArgument(format!(
                    "active tab {active} is not in panel {}",
                    new_leaf.id
                )));
            }
        }

        let mut next = self.clone();
        next.reserve_panel_id(new_leaf.id);
        let split_id = next.alloc_panel_id();

        let Some(slot) = find_node_mut(&mut next.root, target) else {
            return Err(TreeError::panel_not_found(target));
        };
        let old = std::mem::replace(slot, PanelNode::Leaf(Leaf::new(split_id)));
        let new = PanelNode::Leaf(new_leaf);
        let (children, sizes) = if position_after {
            (vec![old, new], vec![1.0 - new_fraction, new_fraction])
        } else {
            (vec![new, old], vec![new_fraction, 1.0 - new_fraction])
        };
        *slot = PanelNode::Split(Split {
            id: split_id,
            dir,
            children,
            sizes,
        });

        Ok(next)
    }

    /// Move `tab` from leaf `source` into leaf `target` at slot `index` (default: append) and make
    /// it active there.
    ///
    /// `index` is an insertion slot into the target's tabs as they are *before* the move
    /// (`0..=len`). Reordering within one leaf that ends at the tab's current position returns an
    /// identical tree. A source leaf left empty is pruned (unless it is the root).
    ///
    /// # Errors
    /// - [`TreeError::NotFound`] if either panel does not exist or `tab` is not in `source`.
    /// - [`TreeError::InvalidTarget`] if either panel is a split.
    /// - [`TreeError::InvalidArgument`] if `index` is past the end of the target's tabs.
    pub fn move_tab(
        &self,
        tab: TabId,
        source: PanelId,
        target: PanelId,
        index: Option<usize>,
    ) -> Result<Self, TreeError> {
        let from = self
            .leaf(source)?
            .tab_index(tab)
            .ok_or(TreeError::tab_not_found(tab))?;
        let target_len = self.leaf(target)?.tabs.len();
        let slot = match index {
            None => target_len,
            Some(index) if index <= target_len => index,
            Some(index) => {
                return Err(TreeError::InvalidArgument(format!(
                    "tab index {index} out of range for panel {target} with {target_len} tabs"
                )));
            }
        };

        let mut next = self.clone();

        if source == target {
            let to = if slot > from { slot - 1 } else { slot };
            if to == from {
                return Ok(next);
            }
            let Some(leaf) = find_leaf_mut(&mut next.root, source) else {
                return Err(TreeError::panel_not_found(source));
            };
            let moved = leaf.tabs.remove(from);
            leaf.insert_tab_at(to, moved);
            return Ok(next);
        }

        let Some(source_leaf) = find_leaf_mut(&mut next.root, source) else {
            return Err(TreeError::panel_not_found(source));
        };
        let moved = source_leaf.remove_tab_at(from);

        let Some(target_leaf) = find_leaf_mut(&mut next.root, target) else {
            return Err(TreeError::panel_not_found(target));
        };
        target_leaf.insert_tab_at(slot, moved);

        next.prune_if_empty(source);
        Ok(next)
    }

    /// Remove `tab` from the tree, pruning its leaf if it becomes empty.
    ///
    /// The last tab of a root leaf may be closed; the root then stays as an empty leaf.
    ///
    /// # Errors
    /// [`TreeError::NotFound`] if `tab` does not exist.
    pub fn close_tab(&self, tab: TabId) -> Result<Self, TreeError> {
        let location = self.find_tab(tab).ok_or(TreeError::tab_not_found(tab))?;

        let mut next = self.clone();
        let Some(leaf) = find_leaf_mut(&mut next.root, location.panel) else {
            return Err(TreeError::panel_not_found(location.panel));
        };
        leaf.remove_tab_at(location.index);
        next.prune_if_empty(location.panel);
        Ok(next)
    }

    /// Remove leaf `panel` and all of its tabs.
    ///
    /// Closing the root leaf empties it instead, since a tree always has a root.
    ///
    /// # Errors
    /// [`TreeError::NotFound`] for an unknown panel, [`TreeError::InvalidTarget`] for a split.
    pub fn close_panel(&self, panel: PanelId) -> Result<Self, TreeError> {
        self.leaf(panel)?;

        let mut next = self.clone();
        if next.root.id() == panel {
            next.root = PanelNode::Leaf(Leaf::new(panel));
            return Ok(next);
        }
        next.prune_leaf(panel);
        Ok(next)
    }

    /// Replace the sizes of split `split`. Stored sizes are renormalised to sum exactly to one.
    ///
    /// # Errors
    /// - [`TreeError::NotFound`] for an unknown panel, [`TreeError::InvalidTarget`] for a leaf.
    /// - [`TreeError::InvalidArgument`] if the length differs from the child count, an entry is
    ///   negative or not finite, or the sum is off by more than [`SIZE_TOLERANCE`].
    pub fn resize(&self, split: PanelId, sizes: &[f32]) -> Result<Self, TreeError> {
        let child_count = self.split(split)?.children.len();
        if sizes.len() != child_count {
            return Err(TreeError::InvalidArgument(format!(
                "expected {child_count} sizes for split {split}, got {}",
                sizes.len()
            )));
        }
        if let Some(bad) = sizes.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(TreeError::InvalidArgument(format!("invalid size {bad}")));
        }
        let sum: f32 = sizes.iter().sum();
        if (sum - 1.0).abs() > SIZE_TOLERANCE {
            return Err(TreeError::InvalidArgument(format!(
                "sizes sum to {sum}, expected 1"
            )));
        }

        let mut next = self.clone();
        let Some(PanelNode::Split(node)) = find_node_mut(&mut next.root, split) else {
            return Err(TreeError::panel_not_found(split));
        };
        node.sizes = sizes.to_vec();
        normalize_sizes(&mut node.sizes);
        Ok(next)
    }

    /// Show only leaf `panel`.
    ///
    /// # Errors
    /// [`TreeError::NotFound`] for an unknown panel, [`TreeError::InvalidTarget`] for a split.
    pub fn maximize(&self, panel: PanelId) -> Result<Self, TreeError> {
        self.leaf(panel)?;
        let mut next = self.clone();
        next.maximized = Some(panel);
        Ok(next)
    }

    /// Clear the maximized panel, if any.
    #[must_use]
    pub fn restore(&self) -> Self {
        let mut next = self.clone();
        next.maximized = None;
        next
    }

    /// Maximize `panel`, or restore if it is already the maximized one.
    ///
    /// # Errors
    /// Same as [`Self::maximize`].
    pub fn toggle_maximize(&self, panel: PanelId) -> Result<Self, TreeError> {
        if self.maximized == Some(panel) {
            Ok(self.restore())
        } else {
            self.maximize(panel)
        }
    }

    /// Open `tab` in leaf `panel` at slot `index` (default: append) and make it active.
    ///
    /// # Errors
    /// - [`TreeError::NotFound`] / [`TreeError::InvalidTarget`] for a bad panel.
    /// - [`TreeError::InvalidArgument`] for a duplicate tab id or an out-of-range index.
    pub fn add_tab(&self, panel: PanelId, tab: Tab, index: Option<usize>) -> Result<Self, TreeError> {
        let len = self.leaf(panel)?.tabs.len();
        self.check_new_tabs(std::slice::from_ref(&tab))?;
        let slot = index.unwrap_or(len);
        if slot > len {
            return Err(TreeError::InvalidArgument(format!(
                "tab index {slot} out of range for panel {panel} with {len} tabs"
            )));
        }

        let mut next = self.clone();
        let Some(leaf) = find_leaf_mut(&mut next.root, panel) else {
            return Err(TreeError::panel_not_found(panel));
        };
        leaf.insert_tab_at(slot, tab);
        Ok(next)
    }

    /// Make `tab` the active tab of its leaf.
    ///
    /// # Errors
    /// [`TreeError::NotFound`] if `tab` does not exist.
    pub fn activate_tab(&self, tab: TabId) -> Result<Self, TreeError> {
        let location = self.find_tab(tab).ok_or(TreeError::tab_not_found(tab))?;
        let mut next = self.clone();
        if let Some(leaf) = find_leaf_mut(&mut next.root, location.panel) {
            leaf.active = Some(tab);
        }
        Ok(next)
    }

    /// Set the pinned flag of `tab`.
    ///
    /// # Errors
    /// [`TreeError::NotFound`] if `tab` does not exist.
    pub fn set_tab_pinned(&self, tab: TabId, pinned: bool) -> Result<Self, TreeError> {
        let location = self.find_tab(tab).ok_or(TreeError::tab_not_found(tab))?;
        let mut next = self.clone();
        if let Some(t) = find_leaf_mut(&mut next.root, location.panel)
            .and_then(|leaf| leaf.tabs.get_mut(location.index))
        {
            t.pinned = pinned;
        }
        Ok(next)
    }

    fn check_new_tabs(&self, tabs: &[Tab]) -> Result<(), TreeError> {
        for (i, tab) in tabs.iter().enumerate() {
            if self.find_tab(tab.id).is_some() || tabs[..i].iter().any(|t| t.id == tab.id) {
                return Err(TreeError::InvalidArgument(format!(
                    "tab id {} already in use",
                    tab.id
                )));
            }
        }
        Ok(())
    }
}
