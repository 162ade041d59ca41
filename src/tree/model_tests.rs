use super::test_util::tab;
use super::{DockSide, Leaf, LayoutTree, PanelId, PanelNode, Split, SplitDir, TabId};

fn assert_tree_ok(tree: &LayoutTree) {
    let issues = tree.integrity_issues();
    assert!(
        issues.is_empty(),
        "tree integrity failed:\n{}\n{tree:#?}",
        issues.join("\n")
    );
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed ^ 0xD0C3_D0C3_D0C3_D0C3)
    }

    fn next_u64(&mut self) -> u64 {
        // Simple LCG: deterministic, fast, no dependency.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005u64)
            .wrapping_add(1442695040888963407u64);
        self.0 >> 11
    }

    fn next_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() as usize) % upper
    }

    fn next_bool(&mut self) -> bool {
        (self.next_u64() & 1) != 0
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        (!items.is_empty()).then(|| items[self.next_usize(items.len())])
    }
}

struct Ids {
    next_tab: u64,
}

impl Ids {
    fn tab(&mut self) -> TabId {
        self.next_tab += 1;
        TabId::from_u64(self.next_tab)
    }
}

fn random_node(rng: &mut Rng, ids: &mut Ids, next_panel: &mut u64, depth: usize) -> PanelNode {
    *next_panel += 1;
    let id = PanelId::from_u64(*next_panel);

    if depth == 0 || rng.next_usize(3) == 0 {
        let count = 1 + rng.next_usize(3);
        let tabs = (0..count).map(|_| tab(ids.tab().get())).collect();
        return PanelNode::Leaf(Leaf::with_tabs(id, tabs));
    }

    let n = 2 + rng.next_usize(2);
    let children: Vec<PanelNode> = (0..n)
        .map(|_| random_node(rng, ids, next_panel, depth - 1))
        .collect();
    let mut sizes: Vec<f32> = (0..n).map(|_| 1.0 + rng.next_usize(4) as f32).collect();
    let sum: f32 = sizes.iter().sum();
    sizes.iter_mut().for_each(|s| *s /= sum);

    PanelNode::Split(Split {
        id,
        dir: if rng.next_bool() {
            SplitDir::Horizontal
        } else {
            SplitDir::Vertical
        },
        children,
        sizes,
    })
}

fn all_panel_ids(tree: &LayoutTree) -> Vec<PanelId> {
    fn walk(node: &PanelNode, out: &mut Vec<PanelId>) {
        out.push(node.id());
        if let PanelNode::Split(split) = node {
            for child in &split.children {
                walk(child, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(tree.root(), &mut out);
    out
}

fn all_tab_ids(tree: &LayoutTree) -> Vec<TabId> {
    tree.leaves()
        .flat_map(|leaf| leaf.tabs.iter().map(|t| t.id))
        .collect()
}

/// One random operation. Some are deliberately invalid; those must fail without side effects.
fn random_step(rng: &mut Rng, ids: &mut Ids, tree: &LayoutTree) -> Option<LayoutTree> {
    let panels = all_panel_ids(tree);
    let leaves: Vec<PanelId> = tree.leaves().map(|l| l.id).collect();
    let tabs = all_tab_ids(tree);

    let result = match rng.next_usize(9) {
        0 => {
            let target = rng.pick(&panels)?;
            let side = rng.pick(&[DockSide::Top, DockSide::Right, DockSide::Bottom, DockSide::Left])?;
            let new_leaf = if rng.next_usize(4) == 0 {
                Leaf::new(tree.fresh_panel_id())
            } else {
                Leaf::with_tabs(tree.fresh_panel_id(), vec![tab(ids.tab().get())])
            };
            let was_empty = new_leaf.is_empty();
            let result = tree.split_panel(target, side.split_dir(), new_leaf, side.is_after());
            assert!(
                !(was_empty && result.is_ok()),
                "split with an empty leaf was accepted"
            );
            result
        }
        1 | 2 => {
            let tab_id = rng.pick(&tabs)?;
            let source = if rng.next_usize(8) == 0 {
                rng.pick(&panels)?
            } else {
                tree.find_tab(tab_id)?.panel
            };
            let target = rng.pick(&panels)?;
            let index = rng.next_bool().then(|| rng.next_usize(4));
            tree.move_tab(tab_id, source, target, index)
        }
        3 => tree.close_tab(rng.pick(&tabs)?),
        4 => tree.close_panel(rng.pick(&panels)?),
        5 => {
            let split_id = rng.pick(&panels)?;
            let n = tree
                .find_node(split_id)
                .and_then(PanelNode::as_split)
                .map_or(1 + rng.next_usize(3), |s| s.children.len());
            let mut sizes: Vec<f32> = (0..n).map(|_| 1.0 + rng.next_usize(5) as f32).collect();
            if rng.next_usize(4) != 0 {
                let sum: f32 = sizes.iter().sum();
                sizes.iter_mut().for_each(|s| *s /= sum);
            }
            tree.resize(split_id, &sizes)
        }
        6 => tree.toggle_maximize(rng.pick(&panels)?),
        7 => {
            let target = rng.pick(&leaves)?;
            tree.add_tab(target, tab(ids.tab().get()), rng.next_bool().then_some(0))
        }
        _ => tree.activate_tab(rng.pick(&tabs)?),
    };

    match result {
        Ok(next) => Some(next),
        Err(_err) => {
            // A rejected operation has no output; the input must be untouched and still valid.
            assert_tree_ok(tree);
            None
        }
    }
}

#[test]
fn model_random_operations_keep_invariants() {
    for seed in 1u64..=16u64 {
        let mut rng = Rng::new(seed);
        let mut ids = Ids { next_tab: 0 };
        let mut next_panel = 0;
        let root = random_node(&mut rng, &mut ids, &mut next_panel, 3);
        let mut tree = LayoutTree::new(root).expect("tree must be valid");
        assert_tree_ok(&tree);

        for _step in 0..300 {
            let before = tree.clone();
            if let Some(next) = random_step(&mut rng, &mut ids, &tree) {
                assert_tree_ok(&next);
                tree = next;
            }
            // Operations are pure: the previous value is never modified.
            assert_tree_ok(&before);

            if tree.tab_count() == 0 {
                tree = tree.add_tab(tree.root().id(), tab(ids.tab().get()), None).expect("add_tab must succeed");
            }
        }
    }
}

#[test]
fn model_tab_count_is_conserved_by_moves() {
    for seed in 100u64..=110u64 {
        let mut rng = Rng::new(seed);
        let mut ids = Ids { next_tab: 0 };
        let mut next_panel = 0;
        let mut tree = LayoutTree::new(random_node(&mut rng, &mut ids, &mut next_panel, 3))
            .expect("tree must be valid");
        let total = tree.tab_count();

        for _ in 0..200 {
            let tabs = all_tab_ids(&tree);
            let leaves: Vec<PanelId> = tree.leaves().map(|l| l.id).collect();
            let (Some(tab_id), Some(target)) = (rng.pick(&tabs), rng.pick(&leaves)) else {
                break;
            };
            let Some(source) = tree.find_tab(tab_id).map(|loc| loc.panel) else {
                continue;
            };
            let index = rng.next_bool().then_some(0);
            tree = tree.move_tab(tab_id, source, target, index).expect("move_tab must succeed");
            assert_eq!(tree.tab_count(), total);
            assert_eq!(tree.find_tab(tab_id).map(|loc| loc.panel), Some(target));
            assert_tree_ok(&tree);
        }
    }
}

#[test]
fn model_self_moves_are_identity() {
    for seed in 200u64..=205u64 {
        let mut rng = Rng::new(seed);
        let mut ids = Ids { next_tab: 0 };
        let mut next_panel = 0;
        let tree = LayoutTree::new(random_node(&mut rng, &mut ids, &mut next_panel, 2))
            .expect("tree must be valid");

        for tab_id in all_tab_ids(&tree) {
            let Some(loc) = tree.find_tab(tab_id) else {
                continue;
            };
            let same = tree
                .move_tab(tab_id, loc.panel, loc.panel, Some(loc.index))
                .expect("move_tab must succeed");
            assert_eq!(same, tree);
        }
    }
}
