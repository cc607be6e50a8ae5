use std::collections::HashSet;

use crate::item::{FlattenedItem, ItemId};

/// Remove every row that descends from one of `ids`. The rows for `ids` themselves stay.
///
/// `items` must be in pre-order, so a single forward pass sees each parent before its
/// descendants.
pub fn remove_children_of<T>(
    items: Vec<FlattenedItem<T>>,
    ids: impl IntoIterator<Item = ItemId>,
) -> Vec<FlattenedItem<T>> {
    let mut excluded: HashSet<ItemId> = ids.into_iter().collect();
    if excluded.is_empty() {
        return items;
    }

    items
        .into_iter()
        .filter(|item| {
            let hidden = item
                .parent_id
                .as_ref()
                .is_some_and(|parent_id| excluded.contains(parent_id));
            if hidden && item.children_len > 0 {
                excluded.insert(item.id.clone());
            }
            !hidden
        })
        .collect()
}

/// Ids of rows whose children are hidden: collapsed rows that actually have children.
pub fn collapsed_ids<T>(items: &[FlattenedItem<T>]) -> Vec<ItemId> {
    items
        .iter()
        .filter(|item| item.collapsed && item.children_len > 0)
        .map(|item| item.id.clone())
        .collect()
}

/// Rows to render: collapsed subtrees hidden, plus the subtree of the item being dragged.
pub fn visible_items<T>(
    items: Vec<FlattenedItem<T>>,
    active_id: Option<&ItemId>,
) -> Vec<FlattenedItem<T>> {
    let mut hidden = collapsed_ids(&items);
    if let Some(active_id) = active_id {
        hidden.push(active_id.clone());
    }
    remove_children_of(items, hidden)
}

/// A lone root item cannot be moved anywhere meaningful, so it is locked in place.
pub fn lock_single_root<T>(mut items: Vec<FlattenedItem<T>>) -> Vec<FlattenedItem<T>> {
    let mut roots = items.iter_mut().filter(|item| item.parent_id.is_none());
    if let (Some(root), None) = (roots.next(), roots.next()) {
        root.disable_dragging = true;
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TreeItem, flatten};

    fn ids(items: &[FlattenedItem]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    fn sample(collapse_b: bool) -> Vec<FlattenedItem> {
        flatten(&[
            TreeItem::new("A", "A"),
            TreeItem::new("B", "B")
                .collapsed(collapse_b)
                .child(TreeItem::new("B1", "B1").child(TreeItem::new("B1a", "B1a")))
                .child(TreeItem::new("B2", "B2")),
            TreeItem::new("C", "C"),
        ])
    }

    #[test]
    fn hides_whole_subtree_transitively() {
        let visible = remove_children_of(sample(false), [ItemId::from("B")]);
        assert_eq!(ids(&visible), vec!["A", "B", "C"]);
    }

    #[test]
    fn no_ids_keeps_everything() {
        let visible = remove_children_of(sample(false), Vec::new());
        assert_eq!(ids(&visible), vec!["A", "B", "B1", "B1a", "B2", "C"]);
    }

    #[test]
    fn collapsed_rows_hide_children() {
        let items = sample(true);
        assert_eq!(collapsed_ids(&items), vec![ItemId::from("B")]);
        assert_eq!(ids(&visible_items(items, None)), vec!["A", "B", "C"]);
    }

    #[test]
    fn collapsed_leaf_is_not_collected() {
        let items = flatten(&[TreeItem::<()>::new("A", "A").collapsed(true)]);
        assert!(collapsed_ids(&items).is_empty());
    }

    #[test]
    fn active_item_keeps_its_row_but_hides_children() {
        let visible = visible_items(sample(false), Some(&"B1".into()));
        assert_eq!(ids(&visible), vec!["A", "B", "B1", "B2", "C"]);
    }

    #[test]
    fn single_root_is_locked() {
        let items = lock_single_root(flatten(&[
            TreeItem::<()>::new("R", "R").child(TreeItem::new("R1", "R1"))
        ]));
        assert!(items[0].disable_dragging);
        assert!(!items[1].disable_dragging);

        let items = lock_single_root(sample(false));
        assert!(items.iter().all(|item| !item.disable_dragging));
    }
}
