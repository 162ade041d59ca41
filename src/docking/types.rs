use crate::tree::{DockSide, LayoutTree, PanelId, TabId, TreeError};

/// What is being dragged. Only tabs can be dragged today.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DragKind {
    Tab,
}

/// The item carried by an in-progress drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DragItem {
    pub kind: DragKind,
    pub tab_id: TabId,
    pub source_panel: PanelId,

    /// Position of the tab in the source leaf when the drag started.
    pub source_index: usize,

    /// Number of tabs in the source leaf when the drag started (the dragged one included).
    pub source_tab_count: usize,
}

impl DragItem {
    /// Capture a tab drag, checking that `tab` lives in leaf `source_panel`.
    pub(crate) fn for_tab(
        tree: &LayoutTree,
        tab: TabId,
        source_panel: PanelId,
    ) -> Result<Self, TreeError> {
        let leaf = tree.leaf(source_panel)?;
        let source_index = leaf
            .tab_index(tab)
            .ok_or_else(|| TreeError::tab_not_found(tab))?;
        Ok(Self {
            kind: DragKind::Tab,
            tab_id: tab,
            source_panel,
            source_index,
            source_tab_count: leaf.tabs.len(),
        })
    }
}

/// Where a drag would land if released now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DropTarget {
    #[default]
    None,

    /// Anywhere over a leaf's content: append as the last tab.
    PanelBody { panel: PanelId },

    /// Over a tab bar without per-tab geometry: append as the last tab.
    TabBar { panel: PanelId },

    /// Over a tab bar at an insertion slot.
    TabPosition { panel: PanelId, index: usize },

    /// Near a leaf edge: split the leaf and put the tab in the new half.
    Edge { panel: PanelId, side: DockSide },
}

impl DropTarget {
    pub fn panel(self) -> Option<PanelId> {
        match self {
            Self::None => None,
            Self::PanelBody { panel }
            | Self::TabBar { panel }
            | Self::TabPosition { panel, .. }
            | Self::Edge { panel, .. } => Some(panel),
        }
    }

    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

/// Why a drag ended without changing the layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancelReason {
    /// Released over no valid target.
    NoTarget,

    /// The host called `cancel` (e.g. Escape).
    Explicit,

    /// The pointer capture was lost (window blur, touch interrupted).
    PointerLost,

    /// A new drag or a direct layout command replaced this one.
    Superseded,

    /// The commit was rejected by the tree.
    Failed(TreeError),
}

/// Observable drag state, as reported through `DockingEvent::DragStateChanged`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragStatus {
    Dragging(DragItem),
    Committed,
    Cancelled(CancelReason),
}

impl DragStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Dragging(_))
    }
}
