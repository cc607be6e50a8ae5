use crate::item::{FlattenedItem, ItemId};

/// Where the dragged item would land if dropped now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub depth: usize,
    pub min_depth: usize,
    pub max_depth: usize,
    pub parent_id: Option<ItemId>,
}

/// Move the element at `from` so it ends up at index `to`, keeping every other element in
/// its relative order.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

/// Convert a horizontal drag distance into a depth delta. Halves round towards positive
/// infinity.
pub fn drag_depth(offset: f32, indentation_width: f32) -> i64 {
    if indentation_width.is_nan() || indentation_width <= 0.0 || !offset.is_finite() {
        return 0;
    }
    (offset / indentation_width + 0.5).floor() as i64
}

/// Compute the projected depth and parent of `active_id` if it were dropped on `over_id`
/// with the given horizontal offset.
///
/// `items` should be the visible rows (collapsed and dragged subtrees already removed).
/// Returns `None` when either id is not among them.
pub fn get_projection<T>(
    items: &[FlattenedItem<T>],
    active_id: &ItemId,
    over_id: &ItemId,
    drag_offset: f32,
    indentation_width: f32,
) -> Option<Projection> {
    let over_ix = items.iter().position(|item| item.id == *over_id)?;
    let active_ix = items.iter().position(|item| item.id == *active_id)?;
    let active = &items[active_ix];

    // Only indices are shuffled; rows are read through them.
    let mut order: Vec<usize> = (0..items.len()).collect();
    array_move(&mut order, active_ix, over_ix);
    let row = |position: usize| &items[order[position]];

    let previous = over_ix.checked_sub(1).map(row);
    let next = (over_ix + 1 < order.len()).then(|| row(over_ix + 1));

    let projected_depth =
        (active.depth as i64).saturating_add(drag_depth(drag_offset, indentation_width));
    let max_depth = previous.map_or(0, |previous| previous.depth + 1);
    let min_depth = next.map_or(0, |next| next.depth);

    let depth = if projected_depth >= max_depth as i64 {
        max_depth
    } else if projected_depth < min_depth as i64 {
        min_depth
    } else {
        projected_depth as usize
    };

    let parent_id = match previous {
        None => None,
        Some(_) if depth == 0 => None,
        Some(previous) if depth == previous.depth => previous.parent_id.clone(),
        Some(previous) if depth > previous.depth => Some(previous.id.clone()),
        Some(_) => (0..over_ix)
            .rev()
            .map(row)
            .find(|item| item.depth == depth)
            .and_then(|item| item.parent_id.clone()),
    };

    log::trace!(
        "projection for {active_id} over {over_id}: depth {depth} in [{min_depth}, {max_depth}], parent {parent_id:?}"
    );

    Some(Projection {
        depth,
        min_depth,
        max_depth,
        parent_id,
    })
}
