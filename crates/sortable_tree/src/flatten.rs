use std::collections::HashMap;

use crate::item::{FlattenedItem, ItemId, TreeItem};

/// Flatten a tree into pre-order rows annotated with parent, depth and sibling index.
pub fn flatten<T: Clone>(items: &[TreeItem<T>]) -> Vec<FlattenedItem<T>> {
    let mut entries = Vec::new();
    add_entries(items, None, 0, &mut entries);
    entries
}

fn add_entries<T: Clone>(
    items: &[TreeItem<T>],
    parent_id: Option<&ItemId>,
    depth: usize,
    entries: &mut Vec<FlattenedItem<T>>,
) {
    for (index, item) in items.iter().enumerate() {
        entries.push(FlattenedItem {
            id: item.id.clone(),
            label: item.label.clone(),
            collapsed: item.collapsed,
            can_fetch_children: item.can_fetch_children,
            disable_dragging: item.disable_dragging,
            data: item.data.clone(),
            parent_id: parent_id.cloned(),
            depth,
            index,
            children_len: item.children.len(),
        });
        add_entries(&item.children, Some(&item.id), depth + 1, entries);
    }
}

/// Rebuild a nested tree from flattened rows.
///
/// Rows may come in any order; each one is appended to its parent's children in input
/// order. A row whose parent cannot be resolved among the input rows is attached to the
/// root at the position its input order implies.
pub fn build_tree<T>(flattened: Vec<FlattenedItem<T>>) -> Vec<TreeItem<T>> {
    let mut positions: HashMap<ItemId, usize> = HashMap::with_capacity(flattened.len());
    for (ix, entry) in flattened.iter().enumerate() {
        positions.entry(entry.id.clone()).or_insert(ix);
    }

    let mut root_children = Vec::new();
    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); flattened.len()];
    for (ix, entry) in flattened.iter().enumerate() {
        let parent_ix = entry.parent_id.as_ref().and_then(|parent_id| {
            let parent_ix = positions.get(parent_id).copied();
            if parent_ix.is_none() {
                log::warn!(
                    "parent {parent_id} of item {} not found, attaching it to the root",
                    entry.id
                );
            }
            parent_ix.filter(|parent_ix| *parent_ix != ix)
        });
        match parent_ix {
            Some(parent_ix) => children_of[parent_ix].push(ix),
            None => root_children.push(ix),
        }
    }

    let mut slots: Vec<Option<TreeItem<T>>> = flattened
        .into_iter()
        .map(|entry| Some(entry.into_item()))
        .collect();

    let mut roots: Vec<TreeItem<T>> = root_children
        .iter()
        .filter_map(|ix| take_subtree(*ix, &mut slots, &children_of))
        .collect();

    // Rows caught in a parent cycle never hang off the root.
    for ix in 0..slots.len() {
        if slots[ix].is_some() {
            log::warn!("item at row {ix} is not reachable from the root, attaching it there");
            if let Some(item) = take_subtree(ix, &mut slots, &children_of) {
                roots.push(item);
            }
        }
    }

    roots
}

fn take_subtree<T>(
    ix: usize,
    slots: &mut [Option<TreeItem<T>>],
    children_of: &[Vec<usize>],
) -> Option<TreeItem<T>> {
    let mut item = slots[ix].take()?;
    item.children = children_of[ix]
        .iter()
        .filter_map(|child_ix| take_subtree(*child_ix, slots, children_of))
        .collect();
    Some(item)
}
