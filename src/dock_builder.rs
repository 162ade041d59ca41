use std::collections::BTreeMap;

use crate::tree::{
    ComponentId, DockSide, Leaf, LayoutTree, NodeKind, PanelId, PanelNode, Split, Tab, TabId,
    TreeError,
};

/// A logical node id used by [`DockBuilder`].
///
/// Each node becomes the panel with the same raw id in the finished tree, so hosts can keep
/// references to the panels they scripted (e.g. to open more tabs into "the sidebar" later).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DockNodeId(u64);

impl DockNodeId {
    pub fn panel_id(self) -> PanelId {
        PanelId::from_u64(self.0)
    }
}

#[derive(Clone, Debug)]
enum Node {
    Tabs {
        tabs: Vec<Tab>,
    },
    Split {
        side: DockSide,
        side_fraction: f32,
        main: DockNodeId,
        side_node: DockNodeId,
    },
}

/// Builds a default [`LayoutTree`] from code, Dear ImGui `DockBuilder` style:
/// create a node, split it, dock tabs into the resulting leaves, then `finish()`.
///
/// Leaves left without tabs are dropped from the finished tree (the root excepted), so a script
/// can reserve areas that only some configurations fill.
pub struct DockBuilder {
    next_node_id: u64,
    next_tab_id: u64,
    nodes: BTreeMap<DockNodeId, Node>,
}

impl Default for DockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DockBuilder {
    pub fn new() -> Self {
        Self {
            next_node_id: 1,
            next_tab_id: 1,
            nodes: BTreeMap::new(),
        }
    }

    fn alloc_node_id(&mut self) -> DockNodeId {
        let id = DockNodeId(self.next_node_id);
        self.next_node_id = self.next_node_id.saturating_add(1);
        id
    }

    /// Create an empty leaf node.
    #[must_use]
    pub fn add_node(&mut self) -> DockNodeId {
        let id = self.alloc_node_id();
        self.nodes.insert(id, Node::Tabs { tabs: Vec::new() });
        id
    }

    /// Split an existing node and return `(side, main)`.
    ///
    /// `node` itself becomes the split; its previous content moves into `main`, and `side` is a
    /// new empty leaf placed at `side` of it, receiving `side_fraction` of the space.
    #[must_use]
    pub fn split_node(
        &mut self,
        node: DockNodeId,
        side: DockSide,
        side_fraction: f32,
    ) -> (DockNodeId, DockNodeId) {
        let side_fraction = side_fraction.clamp(0.0, 1.0);

        let old = self
            .nodes
            .remove(&node)
            .unwrap_or(Node::Tabs { tabs: Vec::new() });
        let main = self.alloc_node_id();
        self.nodes.insert(main, old);

        let side_node = self.add_node();

        self.nodes.insert(
            node,
            Node::Split {
                side,
                side_fraction,
                main,
                side_node,
            },
        );

        (side_node, main)
    }

    /// Open a new tab in leaf `node`, returning its freshly allocated id.
    ///
    /// # Errors
    /// See [`Self::dock_existing_tab`].
    pub fn dock_tab(
        &mut self,
        node: DockNodeId,
        component: impl Into<ComponentId>,
        title: impl Into<String>,
    ) -> Result<TabId, TreeError> {
        let id = TabId::from_u64(self.next_tab_id);
        self.dock_existing_tab(node, Tab::new(id, component, title))?;
        Ok(id)
    }

    /// Dock a prepared tab into leaf `node`.
    ///
    /// # Errors
    /// - [`TreeError::NotFound`] if `node` was never created.
    /// - [`TreeError::InvalidTarget`] if `node` has been split.
    pub fn dock_existing_tab(&mut self, node: DockNodeId, tab: Tab) -> Result<(), TreeError> {
        match self.nodes.get_mut(&node) {
            Some(Node::Tabs { tabs }) => {
                self.next_tab_id = self.next_tab_id.max(tab.id.get().saturating_add(1));
                tabs.push(tab);
                Ok(())
            }
            Some(Node::Split { .. }) => Err(TreeError::InvalidTarget {
                panel: node.panel_id(),
                expected: NodeKind::Leaf,
            }),
            None => Err(TreeError::panel_not_found(node.panel_id())),
        }
    }

    /// Finish building. `root` is typically the first `add_node()`, mutated by splits.
    ///
    /// # Errors
    /// [`TreeError::InvalidArgument`] if the result breaks a tree invariant (duplicate tab ids
    /// from [`Self::dock_existing_tab`]).
    pub fn finish(self, root: DockNodeId) -> Result<LayoutTree, TreeError> {
        fn build_node(
            node_id: DockNodeId,
            nodes: &mut BTreeMap<DockNodeId, Node>,
        ) -> Option<PanelNode> {
            match nodes.remove(&node_id)? {
                Node::Tabs { tabs } => (!tabs.is_empty())
                    .then(|| PanelNode::Leaf(Leaf::with_tabs(node_id.panel_id(), tabs))),
                Node::Split {
                    side,
                    side_fraction,
                    main,
                    side_node,
                } => {
                    let main_panel = build_node(main, nodes);
                    let side_panel = build_node(side_node, nodes);

                    let (main_panel, side_panel) = match (main_panel, side_panel) {
                        (Some(m), Some(s)) => (m, s),
                        (only, None) | (None, only) => return only,
                    };

                    let (children, sizes) = if side.is_after() {
                        (vec![main_panel, side_panel], vec![1.0 - side_fraction, side_fraction])
                    } else {
                        (vec![side_panel, main_panel], vec![side_fraction, 1.0 - side_fraction])
                    };

                    Some(PanelNode::Split(Split {
                        id: node_id.panel_id(),
                        dir: side.split_dir(),
                        children,
                        sizes,
                    }))
                }
            }
        }

        let mut nodes = self.nodes;
        let root_node =
            build_node(root, &mut nodes).unwrap_or(PanelNode::Leaf(Leaf::new(root.panel_id())));
        LayoutTree::new(root_node)
    }
}
