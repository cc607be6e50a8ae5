use thiserror::Error;

use crate::item::ItemId;

/// Errors from driving a [`DragSession`](crate::DragSession) out of order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    #[error("item {0} is not in the tree")]
    UnknownItem(ItemId),
    #[error("item {0} cannot be dragged")]
    DraggingDisabled(ItemId),
    #[error("a drag of {0} is already in progress")]
    AlreadyDragging(ItemId),
    #[error("no drag in progress")]
    NotDragging,
}
