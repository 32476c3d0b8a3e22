//! Rendering the store as `termtree` trees.

use std::collections::HashSet;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{Item, ItemId, TreeStore};

pub trait ToTermTree {
    /// One tree per effective root.
    fn to_term_trees(&self) -> Vec<Tree<String>>;
}

impl ToTermTree for TreeStore {
    #[instrument(level = "debug", skip(self))]
    fn to_term_trees(&self) -> Vec<Tree<String>> {
        fn build(store: &TreeStore, item: &Item, seen: &mut HashSet<ItemId>) -> Tree<String> {
            let mut tree = Tree::new(node_label(item));
            for child in store.children_of(&item.id) {
                if seen.insert(child.id.clone()) {
                    tree.push(build(store, child, seen));
                }
            }
            tree
        }

        let mut seen = HashSet::new();
        self.items()
            .filter(|item| self.is_effective_root(item))
            .map(|root| {
                seen.insert(root.id.clone());
                build(self, root, &mut seen)
            })
            .collect()
    }
}

/// `id` alone, or `id: label` when the item carries a label.
pub fn node_label(item: &Item) -> String {
    match item.label() {
        Some(label) => format!("{}: {}", item.id, label),
        None => item.id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_forest_when_rendering_then_one_tree_per_root() {
        let store = TreeStore::new(vec![
            Item::root(1).with_field("label", "one"),
            Item::child(2, 1),
            Item::root(10),
        ]);

        let trees = store.to_term_trees();

        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].root, "1: one");
        assert_eq!(trees[0].leaves.len(), 1);
        assert_eq!(trees[0].leaves[0].root, "2");
        assert_eq!(trees[1].root, "10");
    }

    #[test]
    fn given_pure_cycle_when_rendering_then_nothing_is_rooted() {
        let store = TreeStore::new(vec![Item::child(1, 2), Item::child(2, 1)]);
        assert!(store.to_term_trees().is_empty());
    }
}
