//! The panel layout tree: a recursive, immutable value describing how panels are split and which
//! tabs each panel holds.
//!
//! Every mutation is a method taking `&self` and returning a brand new [`LayoutTree`] (or a
//! [`TreeError`]). Nothing is ever mutated in place from the point of view of a consumer, so a
//! tree can be shared freely (e.g. behind an `Arc`) while the next one is being computed.
//!
//! There are no parent pointers: parent lookups are top-down traversals.

use std::fmt;

mod error;
mod integrity;
mod ops;
mod prune;
mod traverse;

#[cfg(test)]
mod model_tests;

pub use error::{Missing, NodeKind, TreeError, TreeErrorKind};
pub(crate) use integrity::hash_issues;
pub use traverse::{LeafPath, TabLocation};

/// Allowed deviation of a split's `sizes` sum from `1.0`.
pub const SIZE_TOLERANCE: f32 = 1e-3;

/// Stable identifier of a panel node (split or leaf).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PanelId(u64);

impl PanelId {
    pub const fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Stable identifier of a tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TabId(u64);

impl TabId {
    pub const fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Opaque reference to the content shown in a tab.
///
/// Resolved by the host's component registry; the docking engine never looks inside.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Axis along which a [`Split`] lays out its children.
///
/// `Horizontal` places children side by side (left to right), `Vertical` stacks them (top to
/// bottom).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SplitDir {
    Horizontal,
    Vertical,
}

/// One side of a panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DockSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl DockSide {
    /// The split axis that docking at this side creates.
    pub fn split_dir(self) -> SplitDir {
        match self {
            Self::Left | Self::Right => SplitDir::Horizontal,
            Self::Top | Self::Bottom => SplitDir::Vertical,
        }
    }

    /// Whether the new panel goes after (right of / below) the existing one.
    pub fn is_after(self) -> bool {
        matches!(self, Self::Right | Self::Bottom)
    }
}

/// A tab: one piece of content living in exactly one [`Leaf`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Tab {
    pub id: TabId,
    pub component: ComponentId,
    pub title: String,

    /// UI hint: whether the tab chrome shows a close button.
    pub closeable: bool,

    /// UI hint: pinned tabs are rendered compactly and kept by "close others" style commands.
    pub pinned: bool,
}

impl Tab {
    pub fn new(id: TabId, component: impl Into<ComponentId>, title: impl Into<String>) -> Self {
        Self {
            id,
            component: component.into(),
            title: title.into(),
            closeable: true,
            pinned: false,
        }
    }

    #[must_use]
    pub fn with_closeable(mut self, closeable: bool) -> Self {
        self.closeable = closeable;
        self
    }

    #[must_use]
    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }
}

/// A panel that directly holds tabs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Leaf {
    pub id: PanelId,
    pub tabs: Vec<Tab>,
    pub active: Option<TabId>,
}

impl Leaf {
    /// An empty leaf. Only valid at rest as the root, or transiently while a drop is applied.
    pub fn new(id: PanelId) -> Self {
        Self {
            id,
            tabs: Vec::new(),
            active: None,
        }
    }

    /// A leaf holding `tabs`, with the first one active.
    pub fn with_tabs(id: PanelId, tabs: Vec<Tab>) -> Self {
        let active = tabs.first().map(|tab| tab.id);
        Self { id, tabs, active }
    }

    pub fn tab_index(&self, tab: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab)
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        let active = self.active?;
        self.tabs.iter().find(|t| t.id == active)
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Remove the tab at `index`, moving the active marker to a neighbour if needed.
    ///
    /// The tab that slides into the removed slot is preferred, then the one before it.
    pub(crate) fn remove_tab_at(&mut self, index: usize) -> Tab {
        let tab = self.tabs.remove(index);
        if self.active == Some(tab.id) {
            self.active = self
                .tabs
                .get(index)
                .or_else(|| index.checked_sub(1).and_then(|prev| self.tabs.get(prev)))
                .map(|t| t.id);
        }
        tab
    }

    pub(crate) fn insert_tab_at(&mut self, index: usize, tab: Tab) {
        self.active = Some(tab.id);
        self.tabs.insert(index, tab);
    }
}

/// A panel that arranges two or more children along an axis.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Split {
    pub id: PanelId,
    pub dir: SplitDir,
    pub children: Vec<PanelNode>,

    /// Fraction of the available space given to each child. Same length as `children`, sums to 1.
    pub sizes: Vec<f32>,
}

/// A node of the layout tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PanelNode {
    Split(Split),
    Leaf(Leaf),
}

impl PanelNode {
    pub fn id(&self) -> PanelId {
        match self {
            Self::Split(split) => split.id,
            Self::Leaf(leaf) => leaf.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Split(_) => NodeKind::Split,
            Self::Leaf(_) => NodeKind::Leaf,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Split(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&Split> {
        match self {
            Self::Split(split) => Some(split),
            Self::Leaf(_) => None,
        }
    }
}

impl From<Leaf> for PanelNode {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<Split> for PanelNode {
    fn from(split: Split) -> Self {
        Self::Split(split)
    }
}

/// The whole layout: a root node plus view state.
///
/// Construct with [`LayoutTree::new`] (or [`crate::DockBuilder`]); both guarantee the tree
/// invariants hold. All mutation methods return a new tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LayoutTree {
    root: PanelNode,

    /// When set, only this leaf is shown.
    maximized: Option<PanelId>,

    /// Next raw value handed out by the panel id allocator. Always above every id in the tree.
    next_panel_id: u64,
}

impl LayoutTree {
    /// Wrap `root` in a tree, checking every invariant.
    ///
    /// # Errors
    /// [`TreeError::InvalidArgument`] listing the violated invariants.
    pub fn new(root: impl Into<PanelNode>) -> Result<Self, TreeError> {
        let root = root.into();
        let next_panel_id = traverse::max_panel_id(&root).saturating_add(1);
        Self {
            root,
            maximized: None,
            next_panel_id,
        }
        .validated()
    }

    /// Re-check a tree that did not come from [`LayoutTree::new`] (e.g. one loaded from storage).
    ///
    /// Also repairs a stale id allocator.
    ///
    /// # Errors
    /// [`TreeError::InvalidArgument`] listing the violated invariants.
    pub fn validated(mut self) -> Result<Self, TreeError> {
        let floor = traverse::max_panel_id(&self.root).saturating_add(1);
        self.next_panel_id = self.next_panel_id.max(floor);

        let issues = self.integrity_issues();
        if issues.is_empty() {
            Ok(self)
        } else {
            Err(TreeError::InvalidArgument(issues.join("; ")))
        }
    }

    pub fn root(&self) -> &PanelNode {
        &self.root
    }

    pub fn maximized(&self) -> Option<PanelId> {
        self.maximized
    }

    /// The id the next split or new leaf will receive.
    ///
    /// Peeking does not reserve it: pass a leaf with this id to [`Self::split_panel`] and the
    /// returned tree will have moved past it.
    pub fn fresh_panel_id(&self) -> PanelId {
        PanelId(self.next_panel_id)
    }

    /// Human-readable list of invariant violations. Empty for a valid tree.
    pub fn integrity_issues(&self) -> Vec<String> {
        integrity::tree_integrity_issues(self)
    }

    fn alloc_panel_id(&mut self) -> PanelId {
        let id = PanelId(self.next_panel_id);
        self.next_panel_id = self.next_panel_id.saturating_add(1);
        id
    }

    fn reserve_panel_id(&mut self, id: PanelId) {
        self.next_panel_id = self.next_panel_id.max(id.0.saturating_add(1));
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::{Leaf, LayoutTree, PanelId, PanelNode, Split, SplitDir, Tab, TabId};

    pub(crate) fn tab(id: u64) -> Tab {
        Tab::new(TabId::from_u64(id), format!("component-{id}"), format!("Tab {id}"))
    }

    pub(crate) fn leaf(id: u64, tabs: &[u64]) -> PanelNode {
        PanelNode::Leaf(Leaf::with_tabs(
            PanelId::from_u64(id),
            tabs.iter().copied().map(tab).collect(),
        ))
    }

    pub(crate) fn split(id: u64, dir: SplitDir, children: Vec<PanelNode>) -> PanelNode {
        let n = children.len();
        PanelNode::Split(Split {
            id: PanelId::from_u64(id),
            dir,
            children,
            sizes: vec![1.0 / n as f32; n],
        })
    }

    pub(crate) fn tree(root: PanelNode) -> LayoutTree {
        match LayoutTree::new(root) {
            Ok(tree) => tree,
            Err(err) => panic!("test tree must be valid: {err}"),
        }
    }

    /// Tab ids per leaf, in pre-order.
    pub(crate) fn tab_layout(tree: &LayoutTree) -> Vec<Vec<u64>> {
        tree.leaves()
            .map(|leaf| leaf.tabs.iter().map(|t| t.id.get()).collect())
            .collect()
    }
}
