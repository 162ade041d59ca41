use ahash::HashMap;
use egui::{Pos2, Rect, Vec2};

use crate::tree::{LayoutTree, Leaf, PanelId, PanelNode, SplitDir, TabId};

/// Screen rect of one tab header.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TabGeometry {
    pub tab: TabId,
    pub rect: Rect,
}

/// Screen geometry of one mounted leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelGeometry {
    pub panel: PanelId,

    /// The content area. Edge bands are measured against it.
    pub body: Rect,

    pub tab_bar: Option<Rect>,

    /// Tab headers in tab order.
    pub tabs: Vec<TabGeometry>,
}

impl PanelGeometry {
    pub fn new(panel: PanelId, body: Rect) -> Self {
        Self {
            panel,
            body,
            tab_bar: None,
            tabs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tab_bar(mut self, rect: Rect) -> Self {
        self.tab_bar = Some(rect);
        self
    }

    #[must_use]
    pub fn with_tab(mut self, tab: TabId, rect: Rect) -> Self {
        self.tabs.push(TabGeometry { tab, rect });
        self
    }
}

/// Sizes used by [`GeometrySnapshot::solve`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveMetrics {
    pub tab_bar_height: f32,
    pub tab_width: f32,
}

impl Default for SolveMetrics {
    fn default() -> Self {
        Self {
            tab_bar_height: 24.0,
            tab_width: 120.0,
        }
    }
}

/// A read-only capture of where every mounted leaf, tab bar and tab is on screen.
///
/// Built by the UI layer each frame (or by [`Self::solve`]) and handed to the drag controller,
/// which hit-tests against it without touching the tree.
#[derive(Clone, Debug, Default)]
pub struct GeometrySnapshot {
    panels: Vec<PanelGeometry>,
    index: HashMap<PanelId, usize>,
}

impl PartialEq for GeometrySnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.panels == other.panels
    }
}

impl GeometrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a panel, replacing any previous entry for the same id.
    pub fn insert_panel(&mut self, geometry: PanelGeometry) {
        match self.index.get(&geometry.panel) {
            Some(&i) => self.panels[i] = geometry,
            None => {
                self.index.insert(geometry.panel, self.panels.len());
                self.panels.push(geometry);
            }
        }
    }

    #[must_use]
    pub fn with_panel(mut self, geometry: PanelGeometry) -> Self {
        self.insert_panel(geometry);
        self
    }

    pub fn panel(&self, id: PanelId) -> Option<&PanelGeometry> {
        self.index.get(&id).and_then(|&i| self.panels.get(i))
    }

    pub fn panels(&self) -> &[PanelGeometry] {
        &self.panels
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn tab_rect(&self, tab: TabId) -> Option<Rect> {
        self.panels
            .iter()
            .flat_map(|p| p.tabs.iter())
            .find(|t| t.tab == tab)
            .map(|t| t.rect)
    }

    /// Lay out the visible leaves of `tree` inside `area`.
    ///
    /// Splits divide their rect along the axis by `sizes`; each leaf gets a tab bar strip on top
    /// (tabs placed left to right at a fixed width) and the rest as its body. A maximized leaf
    /// takes the whole area.
    pub fn solve(tree: &LayoutTree, area: Rect, metrics: SolveMetrics) -> Self {
        let mut snapshot = Self::default();
        match tree.maximized().and_then(|id| tree.leaf(id).ok()) {
            Some(leaf) => snapshot.insert_leaf(leaf, area, metrics),
            None => snapshot.solve_node(tree.root(), area, metrics),
        }
        snapshot
    }

    fn solve_node(&mut self, node: &PanelNode, area: Rect, metrics: SolveMetrics) {
        let split = match node {
            PanelNode::Leaf(leaf) => {
                self.insert_leaf(leaf, area, metrics);
                return;
            }
            PanelNode::Split(split) => split,
        };

        let (start, extent) = match split.dir {
            SplitDir::Horizontal => (area.min.x, area.width()),
            SplitDir::Vertical => (area.min.y, area.height()),
        };
        let last = split.children.len().saturating_sub(1);
        let mut cursor = start;

        for (i, (child, size)) in split.children.iter().zip(&split.sizes).enumerate() {
            // The last child absorbs rounding so the children tile the area exactly.
            let end = if i == last {
                start + extent
            } else {
                cursor + extent * size
            };
            let rect = match split.dir {
                SplitDir::Horizontal => Rect::from_min_max(
                    Pos2::new(cursor, area.min.y),
                    Pos2::new(end, area.max.y),
                ),
                SplitDir::Vertical => Rect::from_min_max(
                    Pos2::new(area.min.x, cursor),
                    Pos2::new(area.max.x, end),
                ),
            };
            self.solve_node(child, rect, metrics);
            cursor = end;
        }
    }

    fn insert_leaf(&mut self, leaf: &Leaf, area: Rect, metrics: SolveMetrics) {
        let bar_height = metrics.tab_bar_height.clamp(0.0, area.height().max(0.0));
        if bar_height <= 0.0 {
            self.insert_panel(PanelGeometry::new(leaf.id, area));
            return;
        }

        let split_y = area.min.y + bar_height;
        let bar = Rect::from_min_max(area.min, Pos2::new(area.max.x, split_y));
        let body = Rect::from_min_max(Pos2::new(area.min.x, split_y), area.max);
        let tab_size = Vec2::new(metrics.tab_width.max(0.0), bar_height);

        let geometry = leaf.tabs.iter().enumerate().fold(
            PanelGeometry::new(leaf.id, body).with_tab_bar(bar),
            |geometry, (i, tab)| {
                let min = Pos2::new(bar.min.x + tab_size.x * i as f32, bar.min.y);
                geometry.with_tab(tab.id, Rect::from_min_size(min, tab_size))
            },
        );
        self.insert_panel(geometry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::test_util::{leaf, split, tree};

    fn area() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 300.0))
    }

    #[test]
    fn insert_replaces_same_panel() {
        let p = PanelId::from_u64(1);
        let a = Rect::from_min_size(Pos2::ZERO, Vec2::splat(10.0));
        let b = Rect::from_min_size(Pos2::ZERO, Vec2::splat(20.0));
        let snapshot = GeometrySnapshot::new()
            .with_panel(PanelGeometry::new(p, a))
            .with_panel(PanelGeometry::new(p, b));
        assert_eq!(snapshot.panels().len(), 1);
        assert_eq!(snapshot.panel(p).map(|g| g.body), Some(b));
    }

    #[test]
    fn solve_tiles_split_by_sizes() {
        let t = tree(split(
            1,
            SplitDir::Horizontal,
            vec![
                leaf(2, &[10, 11]),
                split(3, SplitDir::Vertical, vec![leaf(4, &[12]), leaf(5, &[13])]),
            ],
        ));
        let t = t.resize(PanelId::from_u64(1), &[0.25, 0.75]).expect("resize must succeed");
        let snapshot = GeometrySnapshot::solve(&t, area(), SolveMetrics::default());

        assert_eq!(snapshot.panels().len(), 3);
        let left = snapshot.panel(PanelId::from_u64(2)).expect("panel must have geometry");
        assert_eq!(left.tab_bar.map(|r| r.width()), Some(100.0));
        assert_eq!(left.body.min, Pos2::new(0.0, 24.0));
        assert_eq!(left.tabs.len(), 2);
        assert_eq!(
            snapshot.tab_rect(TabId::from_u64(11)).map(|r| r.min),
            Some(Pos2::new(120.0, 0.0))
        );

        let bottom = snapshot.panel(PanelId::from_u64(5)).expect("panel must have geometry");
        assert_eq!(bottom.tab_bar.map(|r| r.min), Some(Pos2::new(100.0, 150.0)));
        assert_eq!(bottom.body.max, Pos2::new(400.0, 300.0));
    }

    #[test]
    fn solve_gives_maximized_leaf_the_whole_area() {
        let t = tree(split(
            1,
            SplitDir::Horizontal,
            vec![leaf(2, &[10]), leaf(3, &[11])],
        ))
        .maximize(PanelId::from_u64(3))
        .expect("maximize must succeed");
        let snapshot = GeometrySnapshot::solve(&t, area(), SolveMetrics::default());
        assert_eq!(snapshot.panels().len(), 1);
        assert_eq!(
            snapshot.panel(PanelId::from_u64(3)).and_then(|g| g.tab_bar),
            Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 24.0)))
        );
    }
}
