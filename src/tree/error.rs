use std::fmt;

use super::{PanelId, TabId};

/// Which kind of node an operation expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Split,
    Leaf,
}

/// The id that could not be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Missing {
    Panel(PanelId),
    Tab(TabId),
}

/// Coarse classification of a [`TreeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeErrorKind {
    NotFound,
    InvalidTarget,
    InvalidArgument,
}

/// Why a layout operation was rejected. The input tree is always left untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// A referenced panel or tab does not exist.
    NotFound(Missing),

    /// The panel exists but is the wrong kind of node for the operation.
    InvalidTarget { panel: PanelId, expected: NodeKind },

    /// Malformed input (sizes, indices, duplicate ids, …).
    InvalidArgument(String),
}

impl TreeError {
    pub fn kind(&self) -> TreeErrorKind {
        match self {
            Self::NotFound(_) => TreeErrorKind::NotFound,
            Self::InvalidTarget { .. } => TreeErrorKind::InvalidTarget,
            Self::InvalidArgument(_) => TreeErrorKind::InvalidArgument,
        }
    }

    pub(crate) fn panel_not_found(panel: PanelId) -> Self {
        Self::NotFound(Missing::Panel(panel))
    }

    pub(crate) fn tab_not_found(tab: TabId) -> Self {
        Self::NotFound(Missing::Tab(tab))
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(Missing::Panel(panel)) => write!(f, "panel {panel} not found"),
            Self::NotFound(Missing::Tab(tab)) => write!(f, "tab {tab} not found"),
            Self::InvalidTarget { panel, expected } => {
                write!(f, "panel {panel} is not a {expected:?}")
            }
            Self::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
        }
    }
}

impl std::error::Error for TreeError {}
