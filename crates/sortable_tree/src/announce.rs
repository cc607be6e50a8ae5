use std::fmt;

use crate::item::{FlattenedItem, ItemId};
use crate::projection::{Projection, array_move};

/// Where a moved item sits relative to a neighbor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Before(ItemId),
    After(ItemId),
    Under(ItemId),
}

/// Structured drag feedback for assistive technology. `Display` renders the spoken text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    PickedUp(ItemId),
    Moved {
        id: ItemId,
        placement: Placement,
        dropped: bool,
    },
    Cancelled(ItemId),
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Announcement::PickedUp(id) => write!(f, "Picked up {id}."),
            Announcement::Moved {
                id,
                placement,
                dropped,
            } => {
                let moved = if *dropped { "dropped" } else { "moved" };
                match placement {
                    Placement::Before(other) => write!(f, "{id} was {moved} before {other}."),
                    Placement::After(other) => write!(f, "{id} was {moved} after {other}."),
                    Placement::Under(other) => {
                        let nested = if *dropped { "dropped" } else { "nested" };
                        write!(f, "{id} was {nested} under {other}.")
                    }
                }
            }
            Announcement::Cancelled(id) => write!(
                f,
                "Moving was cancelled. {id} was dropped in its original position."
            ),
        }
    }
}

/// Describe where `active_id` would end up over `over_id`, relative to its new neighbors
/// in the full flattened tree.
pub(crate) fn movement<T>(
    items: &[FlattenedItem<T>],
    active_id: &ItemId,
    over_id: &ItemId,
    projection: &Projection,
    dropped: bool,
) -> Option<Announcement> {
    let over_ix = items.iter().position(|item| item.id == *over_id)?;
    let active_ix = items.iter().position(|item| item.id == *active_id)?;

    let mut order: Vec<usize> = (0..items.len()).collect();
    array_move(&mut order, active_ix, over_ix);
    let row = |position: usize| &items[order[position]];

    let placement = match over_ix.checked_sub(1).map(row) {
        None => {
            let next = order.get(over_ix + 1).map(|ix| &items[*ix])?;
            Placement::Before(next.id.clone())
        }
        Some(previous) if projection.depth > previous.depth => {
            Placement::Under(previous.id.clone())
        }
        Some(previous) => {
            let mut sibling = Some(previous);
            while let Some(current) = sibling
                && projection.depth < current.depth
            {
                sibling = current
                    .parent_id
                    .as_ref()
                    .and_then(|parent_id| items.iter().find(|item| item.id == *parent_id));
            }
            Placement::After(sibling?.id.clone())
        }
    };

    Some(Announcement::Moved {
        id: active_id.clone(),
        placement,
        dropped,
    })
}
