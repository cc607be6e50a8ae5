use std::collections::HashMap;

use crate::item::{ItemId, TreeItem};
use crate::mutate::RemovedItem;

/// A tree paired with an id lookup table.
///
/// The table maps every id to its child-index path from the root and is updated by the
/// same call that changes the tree, so lookups never walk the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedTree<T = ()> {
    items: Vec<TreeItem<T>>,
    paths: HashMap<ItemId, Vec<usize>>,
}

impl<T> Default for IndexedTree<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            paths: HashMap::new(),
        }
    }
}

impl<T> IndexedTree<T> {
    pub fn new(items: Vec<TreeItem<T>>) -> Self {
        let mut paths = HashMap::new();
        index_children(&items, &[], 0, &mut paths);
        Self { items, paths }
    }

    #[inline]
    pub fn items(&self) -> &[TreeItem<T>] {
        &self.items
    }

    pub fn into_items(self) -> Vec<TreeItem<T>> {
        self.items
    }

    /// Number of items in the whole tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.paths.contains_key(id)
    }

    pub fn get(&self, id: &ItemId) -> Option<&TreeItem<T>> {
        node_at(&self.items, self.paths.get(id)?)
    }

    pub fn parent_id(&self, id: &ItemId) -> Option<&ItemId> {
        let path = self.paths.get(id)?;
        let (_, parent_path) = path.split_last()?;
        node_at(&self.items, parent_path).map(|parent| &parent.id)
    }

    /// Replace the whole tree, e.g. after a drop.
    pub fn replace_items(&mut self, items: Vec<TreeItem<T>>) {
        *self = Self::new(items);
    }

    pub fn remove(&mut self, id: &ItemId) -> Option<RemovedItem<T>> {
        let path = self.paths.get(id)?.clone();
        let (&index, parent_path) = path.split_last()?;
        let parent_id = node_at(&self.items, parent_path).map(|parent| parent.id.clone());

        let siblings = children_at_mut(&mut self.items, parent_path)?;
        let item = siblings.remove(index);
        unindex_subtree(&item, &mut self.paths);
        index_children(siblings, parent_path, index, &mut self.paths);

        Some(RemovedItem {
            item,
            parent_id,
            index,
        })
    }

    /// Apply `update` to the item `id`, re-indexing its subtree. Returns `false` for
    /// unknown ids.
    pub fn update(&mut self, id: &ItemId, update: impl FnOnce(&mut TreeItem<T>)) -> bool {
        let Some(path) = self.paths.get(id).cloned() else {
            return false;
        };
        let Some(node) = node_at_mut(&mut self.items, &path) else {
            return false;
        };
        unindex_subtree(node, &mut self.paths);
        update(node);
        index_subtree(node, path, &mut self.paths);
        true
    }

    /// Insert `item` at `index` among the children of `parent_id`. Returns the actual
    /// parent and index used.
    pub fn insert(
        &mut self,
        parent_id: Option<&ItemId>,
        index: usize,
        item: TreeItem<T>,
    ) -> (Option<ItemId>, usize) {
        let parent_path = match parent_id {
            Some(parent_id) => match self.paths.get(parent_id) {
                Some(path) => Some(path.clone()),
                None => {
                    log::warn!("insert target {parent_id} not found, inserting at the root");
                    None
                }
            },
            None => None,
        };
        let resolved_parent = parent_path.as_ref().and(parent_id.cloned());
        let parent_path = parent_path.unwrap_or_default();

        let Some(siblings) = children_at_mut(&mut self.items, &parent_path) else {
            return (None, 0);
        };
        let index = index.min(siblings.len());
        siblings.insert(index, item);
        index_children(siblings, &parent_path, index, &mut self.paths);
        (resolved_parent, index)
    }
}

fn node_at<'a, T>(items: &'a [TreeItem<T>], path: &[usize]) -> Option<&'a TreeItem<T>> {
    let (first, rest) = path.split_first()?;
    let mut node = items.get(*first)?;
    for ix in rest {
        node = node.children.get(*ix)?;
    }
    Some(node)
}

fn node_at_mut<'a, T>(items: &'a mut [TreeItem<T>], path: &[usize]) -> Option<&'a mut TreeItem<T>> {
    let (first, rest) = path.split_first()?;
    let mut node = items.get_mut(*first)?;
    for ix in rest {
        node = node.children.get_mut(*ix)?;
    }
    Some(node)
}

fn children_at_mut<'a, T>(
    items: &'a mut Vec<TreeItem<T>>,
    parent_path: &[usize],
) -> Option<&'a mut Vec<TreeItem<T>>> {
    if parent_path.is_empty() {
        return Some(items);
    }
    node_at_mut(items, parent_path).map(|parent| &mut parent.children)
}

/// Index `siblings[from..]`, whose parent lives at `parent_path`.
fn index_children<T>(
    siblings: &[TreeItem<T>],
    parent_path: &[usize],
    from: usize,
    paths: &mut HashMap<ItemId, Vec<usize>>,
) {
    for (ix, child) in siblings.iter().enumerate().skip(from) {
        let mut path = Vec::with_capacity(parent_path.len() + 1);
        path.extend_from_slice(parent_path);
        path.push(ix);
        index_subtree(child, path, paths);
    }
}

fn index_subtree<T>(item: &TreeItem<T>, path: Vec<usize>, paths: &mut HashMap<ItemId, Vec<usize>>) {
    index_children(&item.children, &path, 0, paths);
    paths.insert(item.id.clone(), path);
}

fn unindex_subtree<T>(item: &TreeItem<T>, paths: &mut HashMap<ItemId, Vec<usize>>) {
    paths.remove(&item.id);
    for child in &item.children {
        unindex_subtree(child, paths);
    }
}
