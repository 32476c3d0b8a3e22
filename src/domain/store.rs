//! Arena-backed item store with materialized root-to-node paths.

use std::collections::{HashMap, HashSet, VecDeque};

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace, warn};

use crate::domain::error::{StoreError, StoreResult};
use crate::domain::id::ItemId;
use crate::domain::item::{strip_reserved, Item, ItemPatch};

/// Flat collection of items linked by parent ids.
///
/// Items are owned by the arena; `order` keeps insertion order and `index`
/// maps ids to arena slots. Every accessor hands out clones, never references
/// into the store.
#[derive(Debug)]
pub struct TreeStore {
    arena: Arena<Item>,
    order: Vec<Index>,
    index: HashMap<ItemId, Index>,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
            order: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl TreeStore {
    /// Build a store, tolerating dangling parents and malformed ancestry.
    ///
    /// Items may arrive in any order. A repeated id keeps its first occurrence.
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        let mut store = Self::default();
        for item in items {
            store.insert_raw(item);
        }
        store.refresh_all_paths();
        store
    }

    /// Build a store, rejecting duplicate ids, dangling parents and cycles.
    pub fn try_new(items: impl IntoIterator<Item = Item>) -> StoreResult<Self> {
        let mut store = Self::default();
        for item in items {
            if store.index.contains_key(&item.id) {
                return Err(StoreError::DuplicateId(item.id));
            }
            store.insert_raw(item);
        }
        if let Some(issue) = store.integrity_issues().into_iter().next() {
            return Err(issue);
        }
        store.refresh_all_paths();
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    /// All items in insertion order.
    #[instrument(level = "trace", skip(self))]
    pub fn get_all(&self) -> Vec<Item> {
        self.items().cloned().collect()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_item(&self, id: &ItemId) -> Option<Item> {
        self.lookup(id).cloned()
    }

    /// Direct children of `id`, in insertion order. Unknown ids have none.
    #[instrument(level = "trace", skip(self))]
    pub fn get_children(&self, id: &ItemId) -> Vec<Item> {
        self.children_of(id).cloned().collect()
    }

    /// Every descendant of `id`, breadth-first, each exactly once.
    #[instrument(level = "trace", skip(self))]
    pub fn get_all_children(&self, id: &ItemId) -> Vec<Item> {
        self.descendants_of(id).into_iter().cloned().collect()
    }

    /// Ancestors of `id`, root first, ending with its immediate parent.
    #[instrument(level = "trace", skip(self))]
    pub fn get_all_parents(&self, id: &ItemId) -> Vec<Item> {
        let Some(item) = self.lookup(id) else {
            return Vec::new();
        };

        let mut seen: HashSet<&ItemId> = HashSet::from([&item.id]);
        let mut chain = Vec::new();
        let mut cursor = item.parent.as_ref();
        while let Some(parent_id) = cursor {
            let Some(parent) = self.lookup(parent_id) else {
                break;
            };
            if !seen.insert(&parent.id) {
                trace!("ancestry of {} loops at {}", id, parent.id);
                break;
            }
            chain.push(parent);
            cursor = parent.parent.as_ref();
        }

        chain.into_iter().rev().cloned().collect()
    }

    /// Items without a resolvable parent, in insertion order.
    pub fn roots(&self) -> Vec<Item> {
        self.items()
            .filter(|item| self.is_effective_root(item))
            .cloned()
            .collect()
    }

    /// Insert a new item. Returns `false` and changes nothing when the id is
    /// taken or the parent link would close a cycle.
    #[instrument(level = "debug", skip(self, item), fields(id = %item.id))]
    pub fn add_item(&mut self, item: Item) -> bool {
        match self.insert_item(item, false) {
            Ok(()) => true,
            Err(e) => {
                debug!("add ignored: {}", e);
                false
            }
        }
    }

    /// Insert a new item, failing on a taken id, a missing parent or a cycle.
    #[instrument(level = "debug", skip(self, item), fields(id = %item.id))]
    pub fn try_add_item(&mut self, item: Item) -> StoreResult<()> {
        self.insert_item(item, true)
    }

    /// Remove `id` and its whole subtree. Returns the removed ids, root first.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_item(&mut self, id: &ItemId) -> Vec<ItemId> {
        if !self.index.contains_key(id) {
            return Vec::new();
        }

        let mut doomed = vec![id.clone()];
        doomed.extend(self.descendants_of(id).into_iter().map(|d| d.id.clone()));

        for key in &doomed {
            if let Some(idx) = self.index.remove(key) {
                self.arena.remove(idx);
            }
        }
        self.order.retain(|idx| self.arena.contains(*idx));

        debug!("removed {} item(s)", doomed.len());
        doomed
    }

    /// Merge `patch` onto an existing item. Returns `false` for unknown ids
    /// and for re-parenting that would close a cycle.
    #[instrument(level = "debug", skip(self, patch), fields(id = %patch.id))]
    pub fn update_item(&mut self, patch: ItemPatch) -> bool {
        match self.apply_patch(patch, false) {
            Ok(()) => true,
            Err(e @ StoreError::CycleDetected(_)) => {
                warn!("update refused: {}", e);
                false
            }
            Err(e) => {
                debug!("update ignored: {}", e);
                false
            }
        }
    }

    /// Merge `patch`, failing on an unknown id, a missing parent or a cycle.
    #[instrument(level = "debug", skip(self, patch), fields(id = %patch.id))]
    pub fn try_update_item(&mut self, patch: ItemPatch) -> StoreResult<()> {
        self.apply_patch(patch, true)
    }

    /// Dangling parents and cyclic ancestry in the current contents.
    pub fn integrity_issues(&self) -> Vec<StoreError> {
        let mut issues = Vec::new();
        for item in self.items() {
            let Some(parent) = &item.parent else {
                continue;
            };
            if !self.index.contains_key(parent) {
                issues.push(StoreError::OrphanedParent {
                    id: item.id.clone(),
                    parent: parent.clone(),
                });
            } else if self.on_cycle(item) {
                issues.push(StoreError::CycleDetected(item.id.clone()));
            }
        }
        issues
    }

    pub(crate) fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.order.iter().filter_map(|&idx| self.arena.get(idx))
    }

    pub(crate) fn lookup(&self, id: &ItemId) -> Option<&Item> {
        self.index.get(id).and_then(|&idx| self.arena.get(idx))
    }

    pub(crate) fn children_of<'a>(&'a self, id: &'a ItemId) -> impl Iterator<Item = &'a Item> + 'a {
        self.items()
            .filter(move |item| item.parent.as_ref() == Some(id))
    }

    pub(crate) fn is_effective_root(&self, item: &Item) -> bool {
        match &item.parent {
            None => true,
            Some(parent) => !self.index.contains_key(parent),
        }
    }

    fn descendants_of<'a>(&'a self, id: &'a ItemId) -> Vec<&'a Item> {
        let mut result = Vec::new();
        let mut seen: HashSet<&ItemId> = HashSet::from([id]);
        let mut queue: VecDeque<&ItemId> = VecDeque::from([id]);

        while let Some(current) = queue.pop_front() {
            for child in self.children_of(current) {
                if seen.insert(&child.id) {
                    result.push(child);
                    queue.push_back(&child.id);
                }
            }
        }
        result
    }

    /// Whether walking up from `item` leads back to it.
    fn on_cycle(&self, item: &Item) -> bool {
        let mut seen: HashSet<&ItemId> = HashSet::new();
        let mut cursor = item.parent.as_ref();
        while let Some(parent_id) = cursor {
            if parent_id == &item.id {
                return true;
            }
            if !seen.insert(parent_id) {
                return false;
            }
            cursor = self.lookup(parent_id).and_then(|p| p.parent.as_ref());
        }
        false
    }

    /// Whether giving `id` the parent `parent` would close a cycle.
    fn would_cycle(&self, id: &ItemId, parent: &ItemId) -> bool {
        parent == id || self.descendants_of(id).iter().any(|d| &d.id == parent)
    }

    /// Root-first ids from the top of the resolvable chain down to `id`.
    ///
    /// Stops at a missing parent (the orphan becomes the effective root) or
    /// at the first repeated id.
    fn resolve_path<'a>(&'a self, id: &'a ItemId, parent: Option<&'a ItemId>) -> Vec<ItemId> {
        let mut chain = vec![id];
        let mut seen: HashSet<&ItemId> = HashSet::from([id]);
        let mut cursor = parent;
        while let Some(parent_id) = cursor {
            let Some(parent) = self.lookup(parent_id) else {
                break;
            };
            if !seen.insert(&parent.id) {
                break;
            }
            chain.push(&parent.id);
            cursor = parent.parent.as_ref();
        }
        chain.into_iter().rev().cloned().collect()
    }

    fn insert_raw(&mut self, mut item: Item) -> bool {
        if self.index.contains_key(&item.id) {
            return false;
        }
        item.sanitize();
        let id = item.id.clone();
        let idx = self.arena.insert(item);
        self.order.push(idx);
        self.index.insert(id, idx);
        true
    }

    fn insert_item(&mut self, item: Item, strict: bool) -> StoreResult<()> {
        if self.index.contains_key(&item.id) {
            return Err(StoreError::DuplicateId(item.id));
        }
        if let Some(parent) = &item.parent {
            if self.would_cycle(&item.id, parent) {
                return Err(StoreError::CycleDetected(item.id));
            }
            if strict && !self.index.contains_key(parent) {
                return Err(StoreError::OrphanedParent {
                    id: item.id.clone(),
                    parent: parent.clone(),
                });
            }
        }

        let id = item.id.clone();
        self.insert_raw(item);
        // also re-roots earlier orphans that declared `id` as their parent
        self.refresh_subtree(&id);
        Ok(())
    }

    fn apply_patch(&mut self, patch: ItemPatch, strict: bool) -> StoreResult<()> {
        let ItemPatch { id, parent, mut fields } = patch;
        let Some(current) = self.lookup(&id) else {
            return Err(StoreError::NotFound(id));
        };

        let reparent = parent.filter(|new_parent| new_parent != &current.parent);
        if let Some(Some(target)) = &reparent {
            if self.would_cycle(&id, target) {
                return Err(StoreError::CycleDetected(id));
            }
            if strict && !self.index.contains_key(target) {
                return Err(StoreError::OrphanedParent {
                    id,
                    parent: target.clone(),
                });
            }
        }

        strip_reserved(&mut fields);
        let Some(item) = self
            .index
            .get(&id)
            .and_then(|&idx| self.arena.get_mut(idx))
        else {
            return Err(StoreError::NotFound(id));
        };
        item.fields.extend(fields);

        if let Some(new_parent) = reparent {
            item.parent = new_parent;
            self.refresh_subtree(&id);
        }
        Ok(())
    }

    fn refresh_all_paths(&mut self) {
        let paths: Vec<(Index, Vec<ItemId>)> = self
            .order
            .iter()
            .filter_map(|&idx| {
                let item = self.arena.get(idx)?;
                Some((idx, self.resolve_path(&item.id, item.parent.as_ref())))
            })
            .collect();
        self.write_paths(paths);
    }

    /// Recompute the path of `id` and, depth-first, of everything below it.
    fn refresh_subtree(&mut self, id: &ItemId) {
        let mut paths = Vec::new();
        let mut seen: HashSet<ItemId> = HashSet::new();
        let mut stack = vec![id.clone()];

        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(&idx) = self.index.get(&current) {
                if let Some(item) = self.arena.get(idx) {
                    paths.push((idx, self.resolve_path(&item.id, item.parent.as_ref())));
                }
            }
            let children: Vec<ItemId> = self.children_of(&current).map(|c| c.id.clone()).collect();
            stack.extend(children.into_iter().rev());
        }

        trace!("refreshed {} path(s) under {}", paths.len(), id);
        self.write_paths(paths);
    }

    fn write_paths(&mut self, paths: Vec<(Index, Vec<ItemId>)>) {
        for (idx, path) in paths {
            if let Some(item) = self.arena.get_mut(idx) {
                item.path = path;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[Item]) -> Vec<ItemId> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    fn chain() -> TreeStore {
        TreeStore::new(vec![Item::root(1), Item::child(2, 1), Item::child(3, 2)])
    }

    #[test]
    fn given_chain_when_constructed_then_paths_are_materialized() {
        let store = chain();
        let item = store.get_item(&3.into()).unwrap();
        assert_eq!(item.path, vec![1.into(), 2.into(), 3.into()]);
        assert_eq!(ids(&store.get_all_parents(&3.into())), vec![1.into(), 2.into()]);
    }

    #[test]
    fn given_children_before_parents_when_constructed_then_paths_resolve() {
        let store = TreeStore::new(vec![Item::child(3, 2), Item::child(2, 1), Item::root(1)]);
        assert_eq!(
            store.get_item(&3.into()).unwrap().path,
            vec![1.into(), 2.into(), 3.into()]
        );
        assert_eq!(ids(&store.get_all()), vec![3.into(), 2.into(), 1.into()]);
    }

    #[test]
    fn given_removed_middle_when_removing_then_subtree_and_slots_are_gone() {
        let mut store = chain();
        let removed = store.remove_item(&2.into());

        assert_eq!(removed, vec![2.into(), 3.into()]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.arena.len(), 1);
        assert_eq!(store.index.len(), 1);
        assert!(store.get_item(&3.into()).is_none());
    }

    #[test]
    fn given_two_node_cycle_when_querying_then_traversals_terminate() {
        let store = TreeStore::new(vec![Item::child(1, 2), Item::child(2, 1)]);

        assert_eq!(ids(&store.get_all_children(&1.into())), vec![2.into()]);
        assert_eq!(ids(&store.get_all_parents(&1.into())), vec![2.into()]);
        assert_eq!(store.get_item(&1.into()).unwrap().path, vec![2.into(), 1.into()]);
        assert_eq!(store.integrity_issues().len(), 2);
    }

    #[test]
    fn given_orphans_when_parent_is_added_then_their_paths_heal() {
        let mut store = TreeStore::new(vec![Item::child(2, 1), Item::child(3, 2)]);
        assert_eq!(store.get_item(&3.into()).unwrap().path, vec![2.into(), 3.into()]);

        assert!(store.add_item(Item::root(1)));

        assert_eq!(
            store.get_item(&3.into()).unwrap().path,
            vec![1.into(), 2.into(), 3.into()]
        );
    }

    #[test]
    fn given_returned_copy_when_mutated_then_store_is_unchanged() {
        let store = chain();
        let mut copy = store.get_item(&2.into()).unwrap();
        copy.fields.insert("label".into(), "changed".into());
        copy.path.clear();

        let fresh = store.get_item(&2.into()).unwrap();
        assert!(fresh.label().is_none());
        assert_eq!(fresh.path, vec![1.into(), 2.into()]);
    }
}
