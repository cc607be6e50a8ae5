use std::mem;

use crate::announce::{self, Announcement};
use crate::collapse::{lock_single_root, visible_items};
use crate::config::{TreeConfig, checked_indentation_width};
use crate::error::DragError;
use crate::flatten::{build_tree, flatten};
use crate::item::{FlattenedItem, ItemId, TreeItem};
use crate::keyboard::{KeyboardStep, keyboard_target};
use crate::mutate::{get_item_by_id, locate_item};
use crate::projection::{Projection, array_move, get_projection};

/// What a completed drag changed.
#[derive(Debug, Clone, PartialEq)]
pub struct DropResult<T = ()> {
    /// The moved item after the move, with its subtree.
    pub moved_item: TreeItem<T>,
    /// Id of the new parent, `None` at the root.
    pub parent: Option<ItemId>,
    /// Index among the new parent's children.
    pub index: usize,
}

/// The committed outcome of a drop: the new tree plus what changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Dropped<T = ()> {
    pub items: Vec<TreeItem<T>>,
    pub result: DropResult<T>,
    pub announcement: Option<Announcement>,
}

/// State of an item being carried.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrag {
    pub active_id: ItemId,
    /// Parent the item had when picked up.
    pub origin_parent_id: Option<ItemId>,
    pub over_id: Option<ItemId>,
    /// Horizontal distance from where the drag started, in pixels.
    pub offset: f32,
    pub projection: Option<Projection>,
    /// Last `(parent_id, over_id)` pair an announcement was made for.
    announced: Option<(Option<ItemId>, ItemId)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

/// Drives one drag at a time: start, move, then drop or cancel.
///
/// The session never holds the tree. Every transition takes the committed tree from the
/// caller, and a drop hands back a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    indentation_width: f32,
    state: DragState,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::from_config(&TreeConfig::default())
    }
}

impl DragSession {
    /// Non-positive or non-finite widths fall back to the default.
    pub fn new(indentation_width: f32) -> Self {
        Self {
            indentation_width: checked_indentation_width(indentation_width),
            state: DragState::Idle,
        }
    }

    pub fn from_config(config: &TreeConfig) -> Self {
        Self::new(config.indentation_width)
    }

    #[inline]
    pub fn indentation_width(&self) -> f32 {
        self.indentation_width
    }

    pub fn set_indentation_width(&mut self, indentation_width: f32) {
        self.indentation_width = checked_indentation_width(indentation_width);
    }

    #[inline]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    fn active(&self) -> Option<&ActiveDrag> {
        match &self.state {
            DragState::Dragging(drag) => Some(drag),
            DragState::Idle => None,
        }
    }

    pub fn active_id(&self) -> Option<&ItemId> {
        self.active().map(|drag| &drag.active_id)
    }

    pub fn over_id(&self) -> Option<&ItemId> {
        self.active().and_then(|drag| drag.over_id.as_ref())
    }

    pub fn offset(&self) -> f32 {
        self.active().map_or(0., |drag| drag.offset)
    }

    pub fn projection(&self) -> Option<&Projection> {
        self.active().and_then(|drag| drag.projection.as_ref())
    }

    /// Rows to render for `items` in the current state.
    pub fn visible_items<T: Clone>(&self, items: &[TreeItem<T>]) -> Vec<FlattenedItem<T>> {
        visible_items(lock_single_root(flatten(items)), self.active_id())
    }

    /// Depth a row should be drawn at: the projected depth for the carried item.
    pub fn display_depth<T>(&self, entry: &FlattenedItem<T>) -> usize {
        match self.active() {
            Some(drag) if drag.active_id == entry.id => drag
                .projection
                .as_ref()
                .map_or(entry.depth, |projection| projection.depth),
            _ => entry.depth,
        }
    }

    /// Pick up `id`. The over target starts on the item itself.
    pub fn start<T: Clone>(
        &mut self,
        items: &[TreeItem<T>],
        id: &ItemId,
    ) -> Result<Announcement, DragError> {
        if let Some(active_id) = self.active_id() {
            return Err(DragError::AlreadyDragging(active_id.clone()));
        }

        let rows = lock_single_root(flatten(items));
        let entry = rows
            .iter()
            .find(|entry| entry.id == *id)
            .ok_or_else(|| DragError::UnknownItem(id.clone()))?;
        if entry.disable_dragging {
            return Err(DragError::DraggingDisabled(id.clone()));
        }

        let origin_parent_id = entry.parent_id.clone();
        let visible = visible_items(rows, Some(id));
        let projection = get_projection(&visible, id, id, 0., self.indentation_width);

        log::debug!("drag started for {id} (parent {origin_parent_id:?})");
        self.state = DragState::Dragging(ActiveDrag {
            active_id: id.clone(),
            announced: Some((origin_parent_id.clone(), id.clone())),
            origin_parent_id,
            over_id: Some(id.clone()),
            offset: 0.,
            projection,
        });
        Ok(Announcement::PickedUp(id.clone()))
    }

    /// Update the over target and horizontal offset, recomputing the projection.
    ///
    /// Returns an announcement when the projected position changed since the last one.
    /// An `over_id` that is not a visible row clears the projection.
    pub fn drag_move<T: Clone>(
        &mut self,
        items: &[TreeItem<T>],
        over_id: Option<&ItemId>,
        offset: f32,
    ) -> Result<Option<Announcement>, DragError> {
        let indentation_width = self.indentation_width;
        let DragState::Dragging(drag) = &mut self.state else {
            return Err(DragError::NotDragging);
        };

        let rows = lock_single_root(flatten(items));
        let visible = visible_items(rows.clone(), Some(&drag.active_id));

        drag.over_id = over_id.cloned();
        drag.offset = offset;
        drag.projection = over_id.and_then(|over_id| {
            get_projection(&visible, &drag.active_id, over_id, offset, indentation_width)
        });

        let (Some(over_id), Some(projection)) = (over_id, drag.projection.as_ref()) else {
            return Ok(None);
        };
        let position = (projection.parent_id.clone(), over_id.clone());
        if drag.announced.as_ref() == Some(&position) {
            return Ok(None);
        }
        let announcement = announce::movement(&rows, &drag.active_id, over_id, projection, false);
        drag.announced = Some(position);
        Ok(announcement)
    }

    /// Move the over target or depth request by one keyboard step.
    ///
    /// Returns `Ok(None)` when the step would leave the valid range.
    pub fn key_step<T: Clone>(
        &mut self,
        items: &[TreeItem<T>],
        step: KeyboardStep,
    ) -> Result<Option<Announcement>, DragError> {
        let Some(drag) = self.active() else {
            return Err(DragError::NotDragging);
        };
        let (Some(over_id), Some(projection)) = (&drag.over_id, &drag.projection) else {
            return Ok(None);
        };

        let visible = self.visible_items(items);
        let Some((over_id, offset)) = keyboard_target(
            &visible,
            &drag.active_id,
            over_id,
            projection,
            self.indentation_width,
            step,
        ) else {
            return Ok(None);
        };
        self.drag_move(items, Some(&over_id), offset)
    }

    /// Commit the current projection, returning the new tree and a [`DropResult`].
    ///
    /// Without an over target or projection this behaves like [`cancel`](Self::cancel)
    /// and returns `Ok(None)`. The session is idle afterwards either way.
    pub fn drop<T: Clone>(
        &mut self,
        items: &[TreeItem<T>],
    ) -> Result<Option<Dropped<T>>, DragError> {
        let DragState::Dragging(drag) = mem::take(&mut self.state) else {
            return Err(DragError::NotDragging);
        };
        let (Some(over_id), Some(projection)) = (drag.over_id, drag.projection) else {
            log::debug!("drag of {} released without a target", drag.active_id);
            return Ok(None);
        };
        let active_id = drag.active_id;

        // Hidden descendants travel with their ancestors through their parent ids.
        let mut rows = flatten(items);
        let (Some(over_ix), Some(active_ix)) = (
            rows.iter().position(|row| row.id == over_id),
            rows.iter().position(|row| row.id == active_id),
        ) else {
            log::debug!("drop target {over_id} or item {active_id} vanished from the tree");
            return Ok(None);
        };

        let announcement = announce::movement(&rows, &active_id, &over_id, &projection, true);

        let row = &mut rows[active_ix];
        row.depth = projection.depth;
        row.parent_id = projection.parent_id;
        array_move(&mut rows, active_ix, over_ix);
        let items = build_tree(rows);

        let Some((parent, index)) = locate_item(&items, &active_id) else {
            return Ok(None);
        };
        let Some(moved_item) = get_item_by_id(&items, &active_id).cloned() else {
            return Ok(None);
        };

        log::debug!("dropped {active_id} under {parent:?} at index {index}");
        Ok(Some(Dropped {
            result: DropResult {
                moved_item,
                parent,
                index,
            },
            items,
            announcement,
        }))
    }

    /// Abandon the drag. The caller's tree was never touched.
    pub fn cancel(&mut self) -> Option<Announcement> {
        let DragState::Dragging(drag) = mem::take(&mut self.state) else {
            return None;
        };
        log::debug!("drag of {} cancelled", drag.active_id);
        Some(Announcement::Cancelled(drag.active_id))
    }
}
