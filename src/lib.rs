//! Panel layout and drag-and-drop docking for tabbed, IDE-like workspaces.
//!
//! - [`tree`]: the immutable panel tree (splits and tab-holding leaves) and its pure operations.
//! - [`docking`]: hit-testing a pointer against screen geometry, the drag state machine, and
//!   [`DockingFacade`], the command/notification surface a UI drives.
//! - [`dock_builder`]: build a default layout from code.
//!
//! Rendering, persistence and the content of tabs are left to the host.

#![forbid(unsafe_code)]

pub mod dock_builder;
pub mod docking;
pub mod tree;

pub use dock_builder::{DockBuilder, DockNodeId};
pub use docking::{
    CancelReason, DockingEvent, DockingFacade, DockingOptions, DragItem, DragStatus, DropTarget,
    GeometrySnapshot, PanelGeometry, SubscriptionId,
};
pub use tree::{
    ComponentId, DockSide, LayoutTree, Leaf, PanelId, PanelNode, Split, SplitDir, Tab, TabId,
    TreeError,
};
