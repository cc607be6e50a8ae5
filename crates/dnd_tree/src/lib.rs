mod tree;

pub use sortable_tree::{Announcement, DropResult, ItemId, RemovedItem, TreeConfig, TreeItem};
pub use tree::{DndTree, DndTreeEntry, DndTreeRowState, DndTreeState, dnd_tree};
