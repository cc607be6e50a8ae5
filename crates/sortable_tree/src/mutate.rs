use crate::item::{ItemId, TreeItem};

/// An item taken out of the tree together with where it used to be.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedItem<T = ()> {
    pub item: TreeItem<T>,
    pub parent_id: Option<ItemId>,
    pub index: usize,
}

/// Return the tree without the item `id` (and its subtree). Unknown ids leave the tree
/// unchanged.
pub fn remove_item_by_id<T>(mut items: Vec<TreeItem<T>>, id: &ItemId) -> Vec<TreeItem<T>> {
    remove_item(&mut items, id);
    items
}

/// Return the tree with `update` applied to the item `id`. Unknown ids leave the tree
/// unchanged.
pub fn set_item_properties<T>(
    mut items: Vec<TreeItem<T>>,
    id: &ItemId,
    update: impl FnOnce(&mut TreeItem<T>),
) -> Vec<TreeItem<T>> {
    if let Some(item) = find_item_mut(&mut items, id) {
        update(item);
    }
    items
}

/// Flip the `collapsed` flag of `id`.
pub fn toggle_collapsed<T>(items: Vec<TreeItem<T>>, id: &ItemId) -> Vec<TreeItem<T>> {
    set_item_properties(items, id, |item| item.collapsed = !item.collapsed)
}

/// Pre-order search for `id`.
pub fn get_item_by_id<'a, T>(items: &'a [TreeItem<T>], id: &ItemId) -> Option<&'a TreeItem<T>> {
    for node in items {
        if node.id == *id {
            return Some(node);
        }
        if let Some(found) = get_item_by_id(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Number of descendants below `id`, for the drag overlay badge. `0` for unknown ids.
pub fn get_child_count<T>(items: &[TreeItem<T>], id: &ItemId) -> usize {
    get_item_by_id(items, id).map_or(0, |item| count_descendants(&item.children))
}

fn count_descendants<T>(items: &[TreeItem<T>]) -> usize {
    items
        .iter()
        .map(|item| 1 + count_descendants(&item.children))
        .sum()
}

/// Return the tree with `item` inserted at `index` among the children of `parent_id`
/// (the root when `None`). The index is clamped; an unknown parent falls back to the root.
pub fn insert_item<T>(
    mut items: Vec<TreeItem<T>>,
    parent_id: Option<&ItemId>,
    index: usize,
    item: TreeItem<T>,
) -> Vec<TreeItem<T>> {
    insert_item_at(&mut items, parent_id, index, item);
    items
}

/// The parent id and sibling index of `id`.
pub fn locate_item<T>(items: &[TreeItem<T>], id: &ItemId) -> Option<(Option<ItemId>, usize)> {
    find_parent_and_index(items, id, None)
}

/// Whether `id` is `item` itself or one of its descendants.
pub fn subtree_contains<T>(item: &TreeItem<T>, id: &ItemId) -> bool {
    if item.id == *id {
        return true;
    }
    item.children
        .iter()
        .any(|child| subtree_contains(child, id))
}

pub(crate) fn remove_item<T>(items: &mut Vec<TreeItem<T>>, id: &ItemId) -> Option<RemovedItem<T>> {
    remove_item_recursive(items, id, None)
}

fn remove_item_recursive<T>(
    items: &mut Vec<TreeItem<T>>,
    target_id: &ItemId,
    parent_id: Option<&ItemId>,
) -> Option<RemovedItem<T>> {
    if let Some(index) = items.iter().position(|item| item.id == *target_id) {
        let item = items.remove(index);
        return Some(RemovedItem {
            item,
            parent_id: parent_id.cloned(),
            index,
        });
    }

    for node in items.iter_mut() {
        let node_id = node.id.clone();
        if let Some(removed) = remove_item_recursive(&mut node.children, target_id, Some(&node_id))
        {
            return Some(removed);
        }
    }

    None
}

pub(crate) fn find_item_mut<'a, T>(
    items: &'a mut [TreeItem<T>],
    id: &ItemId,
) -> Option<&'a mut TreeItem<T>> {
    for node in items.iter_mut() {
        if node.id == *id {
            return Some(node);
        }
        if let Some(found) = find_item_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Insert and report where the item actually landed.
pub(crate) fn insert_item_at<T>(
    root_items: &mut Vec<TreeItem<T>>,
    parent_id: Option<&ItemId>,
    index: usize,
    item: TreeItem<T>,
) -> (Option<ItemId>, usize) {
    if let Some(parent_id) = parent_id
        && let Some(parent) = find_item_mut(root_items, parent_id)
    {
        let ix = index.min(parent.children.len());
        parent.children.insert(ix, item);
        return (Some(parent_id.clone()), ix);
    }

    if let Some(parent_id) = parent_id {
        log::warn!("insert target {parent_id} not found, inserting at the root");
    }
    let ix = index.min(root_items.len());
    root_items.insert(ix, item);
    (None, ix)
}

fn find_parent_and_index<T>(
    items: &[TreeItem<T>],
    target_id: &ItemId,
    parent_id: Option<&ItemId>,
) -> Option<(Option<ItemId>, usize)> {
    for (index, node) in items.iter().enumerate() {
        if node.id == *target_id {
            return Some((parent_id.cloned(), index));
        }
        if let Some(found) = find_parent_and_index(&node.children, target_id, Some(&node.id)) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &'static str, children: Vec<TreeItem>) -> TreeItem {
        TreeItem::new(id, id).children(children)
    }

    fn dump(items: &[TreeItem], depth: usize, out: &mut String) {
        for node in items {
            out.push_str(&"  ".repeat(depth));
            out.push_str(node.id.as_str());
            if node.collapsed {
                out.push_str(" (collapsed)");
            }
            out.push('\n');
            dump(&node.children, depth + 1, out);
        }
    }

    fn dumped(items: &[TreeItem]) -> String {
        let mut s = String::new();
        dump(items, 0, &mut s);
        s.trim_end().to_string()
    }

    fn sample() -> Vec<TreeItem> {
        vec![
            item("A", vec![]),
            item("B", vec![item("B1", vec![item("B1a", vec![])]), item("B2", vec![])]),
            item("C", vec![]),
        ]
    }

    #[test]
    fn remove_nested_item() {
        let tree = remove_item_by_id(sample(), &"B1".into());
        assert_eq!(
            dumped(&tree),
            r#"A
B
  B2
C"#
        );
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        assert_eq!(remove_item_by_id(sample(), &"zzz".into()), sample());
    }

    #[test]
    fn remove_reports_origin() {
        let mut tree = sample();
        let removed = remove_item(&mut tree, &"B2".into()).unwrap();
        assert_eq!(removed.parent_id, Some("B".into()));
        assert_eq!(removed.index, 1);
        assert_eq!(removed.item.id, "B2");
    }

    #[test]
    fn update_touches_only_the_target() {
        let tree = set_item_properties(sample(), &"B1".into(), |item| {
            item.collapsed = !item.collapsed;
            item.label = "renamed".into();
        });
        assert_eq!(
            dumped(&tree),
            r#"A
B
  B1 (collapsed)
    B1a
  B2
C"#
        );
        assert_eq!(get_item_by_id(&tree, &"B1".into()).unwrap().label, "renamed");
        assert_eq!(get_item_by_id(&tree, &"B2".into()).unwrap().label, "B2");
    }

    #[test]
    fn update_unknown_id_is_a_no_op() {
        let tree = set_item_properties(sample(), &"nope".into(), |item| item.collapsed = true);
        assert_eq!(tree, sample());
    }

    #[test]
    fn get_finds_deep_items() {
        let tree = sample();
        assert_eq!(get_item_by_id(&tree, &"B1a".into()).unwrap().id, "B1a");
        assert!(get_item_by_id(&tree, &"nope".into()).is_none());
    }

    #[test]
    fn child_count_counts_all_descendants() {
        let tree = sample();
        assert_eq!(get_child_count(&tree, &"B".into()), 3);
        assert_eq!(get_child_count(&tree, &"B1".into()), 1);
        assert_eq!(get_child_count(&tree, &"A".into()), 0);
        assert_eq!(get_child_count(&tree, &"nope".into()), 0);
    }

    #[test]
    fn insert_into_parent_and_root() {
        let tree = insert_item(sample(), Some(&"B".into()), 1, item("N", vec![]));
        let tree = insert_item(tree, None, 99, item("Z", vec![]));
        let tree = insert_item(tree, Some(&"ghost".into()), 0, item("G", vec![]));
        assert_eq!(
            dumped(&tree),
            r#"G
A
B
  B1
    B1a
  N
  B2
C
Z"#
        );
    }

    #[test]
    fn locate_and_contains() {
        let tree = sample();
        assert_eq!(locate_item(&tree, &"B2".into()), Some((Some("B".into()), 1)));
        assert_eq!(locate_item(&tree, &"C".into()), Some((None, 2)));
        assert!(subtree_contains(&tree[1], &"B1a".into()));
        assert!(!subtree_contains(&tree[1], &"C".into()));
    }
}
