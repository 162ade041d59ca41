/// Options for [`super::DockingFacade`].
#[derive(Clone, Debug)]
pub struct DockingOptions {
    /// Depth of each edge band, as a fraction of the leaf's width (left/right) or height
    /// (top/bottom). A pointer inside a band targets a split at that edge.
    ///
    /// Clamped to `0.0..=0.5`.
    pub edge_band_fraction: f32,

    /// Vertical slack (in points) added above and below every tab bar when hit-testing, so a
    /// drop slightly off the bar still lands in it.
    pub tab_bar_margin: f32,

    /// Share of the space the first child gets after an edge drop splits a leaf.
    ///
    /// Must be strictly between 0 and 1; out-of-range values fall back to an even split.
    pub split_fraction: f32,

    /// If true, a direct command (`split_panel`, `close_tab`, …) issued while a drag is in
    /// progress cancels the drag first, since its source index may no longer be valid.
    pub cancel_drag_on_command: bool,

    /// If true, record drag and command events in a small ring buffer, readable with
    /// `debug_log_text()`.
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep (ring buffer).
    pub debug_event_log_capacity: usize,

    /// If true, check tree integrity after every applied change and log what breaks.
    pub debug_integrity: bool,
}

impl Default for DockingOptions {
    fn default() -> Self {
        Self {
            edge_band_fraction: 0.2,
            tab_bar_margin: 8.0,
            split_fraction: 0.5,
            cancel_drag_on_command: true,
            debug_event_log: false,
            debug_event_log_capacity: 256,
            debug_integrity: cfg!(debug_assertions),
        }
    }
}

impl DockingOptions {
    pub(crate) fn edge_band(&self) -> f32 {
        if self.edge_band_fraction.is_finite() {
            self.edge_band_fraction.clamp(0.0, 0.5)
        } else {
            0.0
        }
    }

    pub(crate) fn tab_bar_slack(&self) -> f32 {
        if self.tab_bar_margin.is_finite() {
            self.tab_bar_margin.max(0.0)
        } else {
            0.0
        }
    }

    pub(crate) fn first_child_fraction(&self) -> f32 {
        if self.split_fraction > 0.0 && self.split_fraction < 1.0 {
            self.split_fraction
        } else {
            0.5
        }
    }

    pub(crate) fn debug_log_capacity(&self) -> usize {
        self.debug_event_log_capacity.clamp(1, 10_000)
    }
}
