use crate::tree::{LayoutTree, PanelNode, hash_issues};

use super::DockingFacade;

/// A compact, copy-pasteable outline of `tree`, at most `max_nodes` lines after the header.
pub(crate) fn tree_summary(tree: &LayoutTree, max_nodes: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut stack: Vec<(&PanelNode, usize)> = vec![(tree.root(), 0)];

    while let Some((node, depth)) = stack.pop() {
        if lines.len() >= max_nodes {
            lines.push("…".to_owned());
            break;
        }
        let indent = "  ".repeat(depth);
        match node {
            PanelNode::Leaf(leaf) => {
                let tabs: Vec<String> = leaf.tabs.iter().map(|t| t.id.to_string()).collect();
                let visible = tree.is_leaf_visible(leaf.id);
                lines.push(format!(
                    "{indent}{} Leaf tabs=[{}] active={:?} visible={visible}",
                    leaf.id,
                    tabs.join(","),
                    leaf.active.map(|a| a.get())
                ));
            }
            PanelNode::Split(split) => {
                lines.push(format!(
                    "{indent}{} Split({:?}) sizes={:?}",
                    split.id, split.dir, split.sizes
                ));
                stack.extend(split.children.iter().rev().map(|c| (c, depth + 1)));
            }
        }
    }

    format!(
        "root={} leaves={} tabs={} maximized={:?}\n{}",
        tree.root().id(),
        tree.leaf_count(),
        tree.tab_count(),
        tree.maximized().map(|m| m.get()),
        lines.join("\n")
    )
}

impl DockingFacade {
    /// `message` is only formatted when the event log is enabled.
    pub(super) fn debug_log_event(&mut self, message: impl FnOnce() -> String) {
        if !self.options.debug_event_log {
            return;
        }
        self.push_debug_log_line(message());
    }

    fn push_debug_log_line(&mut self, message: String) {
        let cap = self.options.debug_log_capacity();
        while self.debug_log.len() >= cap {
            self.debug_log.pop_front();
        }
        self.debug_seq = self.debug_seq.wrapping_add(1);
        self.debug_log
            .push_back(format!("[{}] {}", self.debug_seq, message));
    }

    /// Clear the debug event ring buffer.
    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }

    /// The debug event ring buffer, one event per line (empty unless
    /// [`super::DockingOptions::debug_event_log`] is set).
    pub fn debug_log_text(&self) -> String {
        self.debug_log
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check the current tree, logging only when the set of issues changes.
    pub(super) fn debug_check_integrity(&mut self, context: &'static str) {
        if !self.options.debug_integrity {
            return;
        }

        let issues = self.tree.integrity_issues();
        let hash = hash_issues(&issues);
        let prev = self.debug_last_integrity_hash.replace(hash);
        if prev == Some(hash) {
            return;
        }

        if issues.is_empty() {
            if prev.is_some() {
                log::info!("integrity OK after {context}");
                self.push_debug_log_line(format!("integrity OK after {context}"));
            }
            return;
        }

        log::warn!(
            "integrity FAIL after {context}: {} issue(s)\n{}",
            issues.len(),
            issues.join("\n")
        );
        self.push_debug_log_line(format!(
            "integrity FAIL after {context} issues={}",
            issues.len()
        ));
        for issue in issues {
            self.push_debug_log_line(issue);
        }
        let summary = tree_summary(&self.tree, 48);
        self.push_debug_log_line(format!("integrity tree_summary:\n{summary}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::test_util::{leaf, split, tree};
    use crate::tree::{PanelId, SplitDir};

    #[test]
    fn summary_lists_nodes_in_preorder() {
        let t = tree(split(
            1,
            SplitDir::Horizontal,
            vec![
                leaf(2, &[10, 11]),
                split(3, SplitDir::Vertical, vec![leaf(4, &[12]), leaf(5, &[13])]),
            ],
        ))
        .maximize(PanelId::from_u64(4))
        .expect("maximize must succeed");

        let text = tree_summary(&t, 48);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "root=P1 leaves=3 tabs=4 maximized=Some(4)");
        assert!(lines[1].starts_with("P1 Split(Horizontal)"), "{text}");
        assert!(lines[2].starts_with("  P2 Leaf tabs=[T10,T11]"), "{text}");
        assert!(lines[2].ends_with("visible=false"), "{text}");
        assert!(lines[4].starts_with("    P4 Leaf"), "{text}");
        assert!(lines[4].ends_with("visible=true"), "{text}");
    }

    #[test]
    fn event_message_is_only_built_when_logging() {
        let t = tree(split(1, SplitDir::Horizontal, vec![leaf(2, &[10]), leaf(3, &[11])]));
        let mut facade = DockingFacade::new(t);
        assert!(!facade.options.debug_event_log);
        facade.debug_log_event(|| panic!("message formatted with the event log disabled"));
        assert_eq!(facade.debug_log_text(), "");

        facade.options.debug_event_log = true;
        let mut built = false;
        facade.debug_log_event(|| {
            built = true;
            "hover".to_owned()
        });
        assert!(built, "message must be built when the event log is on");
        assert!(facade.debug_log_text().ends_with("] hover"));
    }

    #[test]
    fn summary_is_truncated() {
        let t = tree(split(
            1,
            SplitDir::Horizontal,
            vec![leaf(2, &[10]), leaf(3, &[11]), leaf(4, &[12])],
        ));
        let text = tree_summary(&t, 2);
        assert_eq!(text.lines().count(), 4);
        assert!(text.ends_with('…'));
    }
}
