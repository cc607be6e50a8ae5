use crate::item::{FlattenedItem, ItemId};
use crate::projection::Projection;

/// A discrete keyboard move while an item is being carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardStep {
    Up,
    Down,
    Left,
    Right,
}

impl KeyboardStep {
    /// Map a key name (`"up"`, `"down"`, `"left"`, `"right"`) to a step.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// The over target and synthetic horizontal offset a keyboard step leads to.
///
/// Up/Down move one visible row and keep the current depth request. Left/Right ask for one
/// level shallower/deeper, and are refused (`None`) when the projection is already at its
/// bound.
pub fn keyboard_target<T>(
    visible: &[FlattenedItem<T>],
    active_id: &ItemId,
    over_id: &ItemId,
    projection: &Projection,
    indentation_width: f32,
    step: KeyboardStep,
) -> Option<(ItemId, f32)> {
    let active_depth = visible.iter().find(|item| item.id == *active_id)?.depth;
    let over_ix = visible.iter().position(|item| item.id == *over_id)?;
    let offset_for = |depth: usize| (depth as f32 - active_depth as f32) * indentation_width;

    match step {
        KeyboardStep::Up => {
            let target = visible.get(over_ix.checked_sub(1)?)?;
            Some((target.id.clone(), offset_for(projection.depth)))
        }
        KeyboardStep::Down => {
            let target = visible.get(over_ix + 1)?;
            Some((target.id.clone(), offset_for(projection.depth)))
        }
        KeyboardStep::Left => {
            if projection.depth <= projection.min_depth {
                return None;
            }
            Some((over_id.clone(), offset_for(projection.depth - 1)))
        }
        KeyboardStep::Right => {
            if projection.depth >= projection.max_depth {
                return None;
            }
            Some((over_id.clone(), offset_for(projection.depth + 1)))
        }
    }
}
