use std::hash::{Hash as _, Hasher as _};

use ahash::HashSet;

use super::{LayoutTree, PanelId, PanelNode, SIZE_TOLERANCE, TabId};

pub(super) fn tree_integrity_issues(tree: &LayoutTree) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();

    let root_id = tree.root.id();
    let mut panel_ids: HashSet<PanelId> = HashSet::default();
    let mut tab_ids: HashSet<TabId> = HashSet::default();
    let mut leaf_ids: HashSet<PanelId> = HashSet::default();
    let mut max_id = 0u64;
    let mut stack: Vec<&PanelNode> = vec![&tree.root];

    while let Some(node) = stack.pop() {
        let id = node.id();
        max_id = max_id.max(id.get());
        if !panel_ids.insert(id) {
            issues.push(format!("integrity: duplicate panel id {id}"));
        }

        match node {
            PanelNode::Leaf(leaf) => {
                leaf_ids.insert(id);

                for tab in &leaf.tabs {
                    if !tab_ids.insert(tab.id) {
                        issues.push(format!(
                            "integrity: duplicate tab id {} (seen again in {id})",
                            tab.id
                        ));
                    }
                }

                if let Some(active) = leaf.active {
                    if leaf.tab_index(active).is_none() {
                        issues.push(format!(
                            "integrity: leaf {id} active {active} not in tabs={:?}",
                            leaf.tabs.iter().map(|t| t.id).collect::<Vec<_>>()
                        ));
                    }
                }

                if leaf.tabs.is_empty() && id != root_id {
                    issues.push(format!("integrity: non-root leaf {id} has no tabs"));
                }
            }
            PanelNode::Split(split) => {
                if split.children.len() < 2 {
                    issues.push(format!(
                        "integrity: split {id} has {} children",
                        split.children.len()
                    ));
                }

                if split.sizes.len() != split.children.len() {
                    issues.push(format!(
                        "integrity: split {id} has {} sizes for {} children",
                        split.sizes.len(),
                        split.children.len()
                    ));
                }

                if split.sizes.iter().any(|s| !s.is_finite() || *s < 0.0) {
                    issues.push(format!("integrity: split {id} sizes={:?}", split.sizes));
                } else {
                    let sum: f32 = split.sizes.iter().sum();
                    if (sum - 1.0).abs() > SIZE_TOLERANCE {
                        issues.push(format!("integrity: split {id} sizes sum to {sum}"));
                    }
                }

                stack.extend(split.children.iter());
            }
        }
    }

    if let Some(maximized) = tree.maximized {
        if !leaf_ids.contains(&maximized) {
            issues.push(format!("integrity: maximized {maximized} is not a leaf"));
        }
    }

    if tree.next_panel_id <= max_id {
        issues.push(format!(
            "integrity: id allocator at {} but tree uses P{max_id}",
            tree.next_panel_id
        ));
    }

    issues
}

pub(crate) fn hash_issues(lines: &[String]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for line in lines {
        line.hash(&mut hasher);
    }
    hasher.finish()
}
