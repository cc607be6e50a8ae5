use std::collections::HashSet;

use crate::item::{ItemId, TreeItem};
use crate::mutate::{get_item_by_id, set_item_properties, subtree_contains, toggle_collapsed};

/// Supplies children for items that load them on demand.
///
/// `request_children` must not block: the answer comes back later through
/// [`LazyChildren::resolve`].
pub trait ChildrenProvider {
    fn request_children(&mut self, id: &ItemId);
}

impl<F: FnMut(&ItemId)> ChildrenProvider for F {
    fn request_children(&mut self, id: &ItemId) {
        self(id)
    }
}

/// Tracks which items have a children fetch in flight.
#[derive(Debug, Clone, Default)]
pub struct LazyChildren {
    pending: HashSet<ItemId>,
}

impl LazyChildren {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, id: &ItemId) -> bool {
        self.pending.contains(id)
    }

    /// Drop pending requests for `item` and its descendants, e.g. after removing it.
    pub fn forget_subtree<T>(&mut self, item: &TreeItem<T>) {
        self.pending.retain(|id| !subtree_contains(item, id));
    }

    /// Collapse or expand `id`.
    ///
    /// Expanding a collapsed item that can fetch children but has none yet asks `provider`
    /// instead and leaves the tree as is until [`resolve`](Self::resolve). Repeated
    /// requests for an item already pending are ignored.
    pub fn toggle_collapse<T>(
        &mut self,
        items: Vec<TreeItem<T>>,
        id: &ItemId,
        provider: &mut impl ChildrenProvider,
    ) -> Vec<TreeItem<T>> {
        let Some(item) = get_item_by_id(&items, id) else {
            return items;
        };

        if item.can_fetch_children && item.collapsed && item.children.is_empty() {
            if self.pending.insert(id.clone()) {
                log::debug!("requesting children of {id}");
                provider.request_children(id);
            }
            return items;
        }

        toggle_collapsed(items, id)
    }

    /// Install fetched `children` under `id` and expand it.
    pub fn resolve<T>(
        &mut self,
        items: Vec<TreeItem<T>>,
        id: &ItemId,
        children: Vec<TreeItem<T>>,
    ) -> Vec<TreeItem<T>> {
        if !self.pending.remove(id) {
            log::debug!("children of {id} arrived without a pending request");
        }
        set_item_properties(items, id, move |item| {
            item.children = children;
            item.collapsed = false;
        })
    }

    /// Forget a pending request, e.g. after the fetch failed. The item stays collapsed.
    pub fn abandon(&mut self, id: &ItemId) -> bool {
        self.pending.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoFetch;

    impl ChildrenProvider for NoFetch {
        fn request_children(&mut self, id: &ItemId) {
            panic!("unexpected fetch for {id}");
        }
    }

    fn sample() -> Vec<TreeItem> {
        vec![
            TreeItem::new("A", "A"),
            TreeItem::new("L", "Lazy")
                .can_fetch_children(true)
                .collapsed(true),
            TreeItem::new("B", "B").child(TreeItem::new("B1", "B1")),
        ]
    }

    #[test]
    fn expanding_empty_lazy_item_requests_children_once() {
        let mut lazy = LazyChildren::new();
        let mut requested = Vec::new();
        let mut provider = |id: &ItemId| requested.push(id.clone());

        let items = lazy.toggle_collapse(sample(), &"L".into(), &mut provider);
        let items = lazy.toggle_collapse(items, &"L".into(), &mut provider);

        assert_eq!(items, sample());
        assert!(lazy.is_pending(&"L".into()));
        assert_eq!(requested, vec![ItemId::from("L")]);
    }

    #[test]
    fn resolve_installs_children_and_expands() {
        let mut lazy = LazyChildren::new();
        let items = lazy.toggle_collapse(sample(), &"L".into(), &mut |_: &ItemId| {});
        let items = lazy.resolve(items, &"L".into(), vec![TreeItem::new("L1", "L1")]);

        let loaded = get_item_by_id(&items, &"L".into()).unwrap();
        assert!(!loaded.collapsed);
        assert_eq!(loaded.children[0].id, "L1");
        assert!(!lazy.is_pending(&"L".into()));
    }

    #[test]
    fn ordinary_items_just_toggle() {
        let mut lazy = LazyChildren::new();
        let mut provider = NoFetch;
        let items = lazy.toggle_collapse(sample(), &"B".into(), &mut provider);
        assert!(get_item_by_id(&items, &"B".into()).unwrap().collapsed);

        let items = lazy.toggle_collapse(items, &"missing".into(), &mut provider);
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn loaded_lazy_item_toggles_without_fetching() {
        let mut lazy = LazyChildren::new();
        let items = lazy.resolve(sample(), &"L".into(), vec![TreeItem::new("L1", "L1")]);
        let mut provider = NoFetch;
        let items = lazy.toggle_collapse(items, &"L".into(), &mut provider);
        assert!(get_item_by_id(&items, &"L".into()).unwrap().collapsed);
    }

    #[test]
    fn forgetting_a_subtree_clears_requests_inside_it() {
        let mut lazy = LazyChildren::new();
        let tree = vec![
            TreeItem::<()>::new("P", "P").child(
                TreeItem::new("L", "Lazy")
                    .can_fetch_children(true)
                    .collapsed(true),
            ),
            TreeItem::new("M", "More")
                .can_fetch_children(true)
                .collapsed(true),
        ];
        let tree = lazy.toggle_collapse(tree, &"L".into(), &mut |_: &ItemId| {});
        let tree = lazy.toggle_collapse(tree, &"M".into(), &mut |_: &ItemId| {});

        lazy.forget_subtree(&tree[0]);
        assert!(!lazy.is_pending(&"L".into()));
        assert!(lazy.is_pending(&"M".into()));
    }

    #[test]
    fn abandon_clears_pending() {
        let mut lazy = LazyChildren::new();
        let _ = lazy.toggle_collapse(sample(), &"L".into(), &mut |_: &ItemId| {});
        assert!(lazy.abandon(&"L".into()));
        assert!(!lazy.abandon(&"L".into()));
    }
}
