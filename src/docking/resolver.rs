//! Pointer → [`DropTarget`] classification.
//!
//! Zones are tried in priority order and the first one that matches decides the result, even if
//! that result is a no-op (`DropTarget::None`):
//! 1. tab bars (vertically expanded by `tab_bar_margin`),
//! 2. edge bands of leaf bodies,
//! 3. leaf bodies.

use std::cmp::Ordering;

use egui::{Pos2, Rect, Vec2};
use itertools::Itertools as _;

use crate::tree::DockSide;

use super::drop_policy;
use super::geometry::{GeometrySnapshot, PanelGeometry};
use super::options::DockingOptions;
use super::types::{DragItem, DropTarget};

pub fn resolve(
    pointer: Pos2,
    snapshot: &GeometrySnapshot,
    item: &DragItem,
    options: &DockingOptions,
) -> DropTarget {
    if !pointer.is_finite() {
        return DropTarget::None;
    }

    let target = resolve_tab_bar(pointer, snapshot, item, options)
        .or_else(|| resolve_edge(pointer, snapshot, options.edge_band()))
        .or_else(|| resolve_body(pointer, snapshot))
        .unwrap_or_default();

    drop_policy::reject_noop(item, target)
}

fn area(rect: Rect) -> f32 {
    rect.width() * rect.height()
}

fn vertical_distance(rect: Rect, pointer: Pos2) -> f32 {
    if pointer.y < rect.min.y {
        rect.min.y - pointer.y
    } else if pointer.y > rect.max.y {
        pointer.y - rect.max.y
    } else {
        0.0
    }
}

/// Smaller body first, then the lower panel id.
fn by_area(a: &PanelGeometry, b: &PanelGeometry) -> Ordering {
    area(a.body)
        .total_cmp(&area(b.body))
        .then(a.panel.cmp(&b.panel))
}

fn resolve_tab_bar(
    pointer: Pos2,
    snapshot: &GeometrySnapshot,
    item: &DragItem,
    options: &DockingOptions,
) -> Option<DropTarget> {
    let margin = Vec2::new(0.0, options.tab_bar_slack());

    let hit = snapshot
        .panels()
        .iter()
        .filter(|g| !drop_policy::skip_tab_bar(item, g.panel))
        .filter_map(|g| {
            let bar = g.tab_bar?;
            bar.expand2(margin)
                .contains(pointer)
                .then(|| (g, bar, vertical_distance(bar, pointer)))
        })
        .min_by(|(a, bar_a, da), (b, bar_b, db)| {
            da.total_cmp(db)
                .then(area(*bar_a).total_cmp(&area(*bar_b)))
                .then(a.panel.cmp(&b.panel))
        })
        .map(|(g, _, _)| g)?;

    if hit.tabs.is_empty() {
        return Some(DropTarget::TabBar { panel: hit.panel });
    }
    Some(DropTarget::TabPosition {
        panel: hit.panel,
        index: tab_slot(hit, pointer.x),
    })
}

/// Insertion slot for a pointer at `x`: next to the tab whose horizontal midpoint is nearest,
/// before it when left of the midpoint.
fn tab_slot(geometry: &PanelGeometry, x: f32) -> usize {
    let nearest = geometry
        .tabs
        .iter()
        .position_min_by(|a, b| {
            (a.rect.center().x - x)
                .abs()
                .total_cmp(&(b.rect.center().x - x).abs())
        });
    match nearest {
        Some(i) if x < geometry.tabs[i].rect.center().x => i,
        Some(i) => i + 1,
        None => 0,
    }
}

/// Which edge band of `body` contains `pointer`, if any.
///
/// Distances are relative to the body's size, so corners go to whichever edge is relatively
/// nearer; ties prefer left/right. A pointer exactly `band` away from an edge is outside it.
pub(crate) fn edge_side(body: Rect, pointer: Pos2, band: f32) -> Option<DockSide> {
    if band <= 0.0 || body.width() <= 0.0 || body.height() <= 0.0 || !body.contains(pointer) {
        return None;
    }

    let left = (pointer.x - body.min.x) / body.width();
    let right = (body.max.x - pointer.x) / body.width();
    let top = (pointer.y - body.min.y) / body.height();
    let bottom = (body.max.y - pointer.y) / body.height();

    let horizontal = if left <= right {
        (DockSide::Left, left)
    } else {
        (DockSide::Right, right)
    };
    let vertical = if top <= bottom {
        (DockSide::Top, top)
    } else {
        (DockSide::Bottom, bottom)
    };
    let (side, dist) = if horizontal.1 <= vertical.1 {
        horizontal
    } else {
        vertical
    };

    (dist < band).then_some(side)
}

fn resolve_edge(pointer: Pos2, snapshot: &GeometrySnapshot, band: f32) -> Option<DropTarget> {
    snapshot
        .panels()
        .iter()
        .filter_map(|g| Some((g, edge_side(g.body, pointer, band)?)))
        .min_by(|(a, _), (b, _)| by_area(a, b))
        .map(|(g, side)| DropTarget::Edge {
            panel: g.panel,
            side,
        })
}

fn resolve_body(pointer: Pos2, snapshot: &GeometrySnapshot) -> Option<DropTarget> {
    snapshot
        .panels()
        .iter()
        .filter(|g| g.body.contains(pointer))
        .min_by(|a, b| by_area(a, b))
        .map(|g| DropTarget::PanelBody { panel: g.panel })
}
