mod announce;
mod collapse;
mod config;
mod error;
mod flatten;
mod index;
mod item;
mod keyboard;
mod lazy;
mod mutate;
mod projection;
mod session;

pub use announce::{Announcement, Placement};
pub use collapse::{collapsed_ids, lock_single_root, remove_children_of, visible_items};
pub use config::TreeConfig;
pub use error::DragError;
pub use flatten::{build_tree, flatten};
pub use index::IndexedTree;
pub use item::{FlattenedItem, ItemId, RowAttributes, TreeItem};
pub use keyboard::{KeyboardStep, keyboard_target};
pub use lazy::{ChildrenProvider, LazyChildren};
pub use mutate::{
    RemovedItem, get_child_count, get_item_by_id, insert_item, locate_item, remove_item_by_id,
    set_item_properties, subtree_contains, toggle_collapsed,
};
pub use projection::{Projection, array_move, drag_depth, get_projection};
pub use session::{ActiveDrag, DragSession, DragState, DropResult, Dropped};
