use super::{Leaf, LayoutTree, NodeKind, PanelId, PanelNode, Split, Tab, TabId, TreeError};

/// Where a tab lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TabLocation {
    pub panel: PanelId,
    pub index: usize,
}

/// A leaf together with the ids of its ancestors, root first.
#[derive(Clone, Debug)]
pub struct LeafPath<'a> {
    pub leaf: &'a Leaf,
    pub ancestors: Vec<PanelId>,
}

impl LeafPath<'_> {
    /// Whether `id` is this leaf or one of its ancestors.
    pub fn contains(&self, id: PanelId) -> bool {
        self.leaf.id == id || self.ancestors.contains(&id)
    }
}

/// Pre-order iterator over all leaves.
pub(super) struct Leaves<'a> {
    stack: Vec<&'a PanelNode>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Leaf;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                PanelNode::Leaf(leaf) => return Some(leaf),
                PanelNode::Split(split) => self.stack.extend(split.children.iter().rev()),
            }
        }
        None
    }
}

pub(super) fn max_panel_id(node: &PanelNode) -> u64 {
    match node {
        PanelNode::Leaf(leaf) => leaf.id.get(),
        PanelNode::Split(split) => split
            .children
            .iter()
            .map(max_panel_id)
            .fold(split.id.get(), u64::max),
    }
}

fn find_node(node: &PanelNode, id: PanelId) -> Option<&PanelNode> {
    if node.id() == id {
        return Some(node);
    }
    match node {
        PanelNode::Leaf(_) => None,
        PanelNode::Split(split) => split.children.iter().find_map(|c| find_node(c, id)),
    }
}

pub(super) fn find_node_mut(node: &mut PanelNode, id: PanelId) -> Option<&mut PanelNode> {
    if node.id() == id {
        return Some(node);
    }
    match node {
        PanelNode::Leaf(_) => None,
        PanelNode::Split(split) => split
            .children
            .iter_mut()
            .find_map(|c| find_node_mut(c, id)),
    }
}

pub(super) fn find_leaf_mut(node: &mut PanelNode, id: PanelId) -> Option<&mut Leaf> {
    match find_node_mut(node, id)? {
        PanelNode::Leaf(leaf) => Some(leaf),
        PanelNode::Split(_) => None,
    }
}

fn find_parent(node: &PanelNode, id: PanelId) -> Option<&Split> {
    let PanelNode::Split(split) = node else {
        return None;
    };
    if split.children.iter().any(|c| c.id() == id) {
        return Some(split);
    }
    split.children.iter().find_map(|c| find_parent(c, id))
}

fn collect_leaf_paths<'a>(
    node: &'a PanelNode,
    ancestors: &mut Vec<PanelId>,
    out: &mut Vec<LeafPath<'a>>,
) {
    match node {
        PanelNode::Leaf(leaf) => out.push(LeafPath {
            leaf,
            ancestors: ancestors.clone(),
        }),
        PanelNode::Split(split) => {
            ancestors.push(split.id);
            for child in &split.children {
                collect_leaf_paths(child, ancestors, out);
            }
            ancestors.pop();
        }
    }
}

impl LayoutTree {
    pub fn find_node(&self, id: PanelId) -> Option<&PanelNode> {
        find_node(&self.root, id)
    }

    /// The split directly containing `id`. `None` for the root or an unknown id.
    pub fn find_parent(&self, id: PanelId) -> Option<&Split> {
        find_parent(&self.root, id)
    }

    /// Resolve `id` to a leaf.
    ///
    /// # Errors
    /// [`TreeError::NotFound`] for an unknown id, [`TreeError::InvalidTarget`] for a split.
    pub fn leaf(&self, id: PanelId) -> Result<&Leaf, TreeError> {
        match self.find_node(id) {
            Some(PanelNode::Leaf(leaf)) => Ok(leaf),
            Some(PanelNode::Split(_)) => Err(TreeError::InvalidTarget {
                panel: id,
                expected: NodeKind::Leaf,
            }),
            None => Err(TreeError::panel_not_found(id)),
        }
    }

    /// Resolve `id` to a split.
    ///
    /// # Errors
    /// [`TreeError::NotFound`] for an unknown id, [`TreeError::InvalidTarget`] for a leaf.
    pub fn split(&self, id: PanelId) -> Result<&Split, TreeError> {
        match self.find_node(id) {
            Some(PanelNode::Split(split)) => Ok(split),
            Some(PanelNode::Leaf(_)) => Err(TreeError::InvalidTarget {
                panel: id,
                expected: NodeKind::Split,
            }),
            None => Err(TreeError::panel_not_found(id)),
        }
    }

    /// All leaves, depth-first pre-order.
    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> + '_ {
        Leaves {
            stack: vec![&self.root],
        }
    }

    /// All leaves in pre-order, each with its ancestor chain.
    pub fn leaves_with_ancestors(&self) -> Vec<LeafPath<'_>> {
        let mut out = Vec::new();
        collect_leaf_paths(&self.root, &mut Vec::new(), &mut out);
        out
    }

    pub fn find_tab(&self, tab: TabId) -> Option<TabLocation> {
        self.leaves().find_map(|leaf| {
            leaf.tab_index(tab).map(|index| TabLocation {
                panel: leaf.id,
                index,
            })
        })
    }

    pub fn tab(&self, tab: TabId) -> Option<&Tab> {
        self.leaves()
            .flat_map(|leaf| leaf.tabs.iter())
            .find(|t| t.id == tab)
    }

    pub fn leaf_of_tab(&self, tab: TabId) -> Option<&Leaf> {
        self.leaves().find(|leaf| leaf.tab_index(tab).is_some())
    }

    /// Whether a leaf is shown given the current maximize state.
    pub fn is_leaf_visible(&self, id: PanelId) -> bool {
        let Some(maximized) = self.maximized else {
            return self.leaf(id).is_ok();
        };
        self.leaves_with_ancestors()
            .iter()
            .any(|path| path.leaf.id == id && path.contains(maximized))
    }

    pub fn visible_leaves(&self) -> Vec<&Leaf> {
        match self.maximized {
            None => self.leaves().collect(),
            Some(maximized) => self
                .leaves_with_ancestors()
                .into_iter()
                .filter(|path| path.contains(maximized))
                .map(|path| path.leaf)
                .collect(),
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    pub fn tab_count(&self) -> usize {
        self.leaves().map(|leaf| leaf.tabs.len()).sum()
    }
}
