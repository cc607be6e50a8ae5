use std::{ops::Range, rc::Rc};

use gpui::{
    App, AppContext as _, Context, ElementId, Entity, EntityId, FocusHandle,
    InteractiveElement as _, IntoElement, ListSizingBehavior, ParentElement as _, Pixels, Point,
    Render, RenderOnce, ScrollStrategy, SharedString, StatefulInteractiveElement as _,
    StyleRefinement, Styled, UniformListScrollHandle, Window, div, prelude::FluentBuilder as _, px,
    uniform_list,
};
use gpui_component::list::ListItem;
use gpui_component::scroll::{Scrollbar, ScrollbarState};
use gpui_component::{ActiveTheme as _, StyledExt as _};
use sortable_tree::{
    Announcement, DragSession, Dropped, DropResult, FlattenedItem, IndexedTree, ItemId,
    KeyboardStep, LazyChildren, RemovedItem, RowAttributes, TreeConfig, TreeItem, array_move,
    get_child_count, subtree_contains,
};

const CONTEXT: &str = "DndTree";

/// Create a [`DndTree`].
pub fn dnd_tree<T, R>(state: &Entity<DndTreeState<T>>, render_item: R) -> DndTree<T>
where
    T: Clone + 'static,
    R: Fn(usize, &DndTreeEntry<T>, DndTreeRowState, &mut Window, &mut App) -> ListItem + 'static,
{
    DndTree::new(state, render_item)
}

#[derive(Clone)]
struct DndTreeDrag {
    tree_id: EntityId,
    item_id: ItemId,
    label: SharedString,
    child_count: usize,
}

struct DragGhost {
    label: SharedString,
    child_count: usize,
}

impl Render for DragGhost {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        div()
            .flex()
            .items_center()
            .gap(px(6.))
            .px(px(10.))
            .py(px(6.))
            .rounded(px(8.))
            .bg(theme.popover)
            .border_1()
            .border_color(theme.border)
            .shadow_md()
            .text_color(theme.popover_foreground)
            .text_sm()
            .child(self.label.clone())
            .when(self.child_count > 0, |this| {
                this.child(
                    div()
                        .px(px(6.))
                        .rounded(px(8.))
                        .bg(theme.primary)
                        .text_color(theme.primary_foreground)
                        .text_xs()
                        .child(self.child_count.to_string()),
                )
            })
    }
}

/// A visible row of the tree.
#[derive(Clone)]
pub struct DndTreeEntry<T = ()> {
    row: FlattenedItem<T>,
    depth: usize,
    loading: bool,
}

impl<T> DndTreeEntry<T> {
    #[inline]
    pub fn id(&self) -> &ItemId {
        &self.row.id
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.row.label
    }

    #[inline]
    pub fn data(&self) -> &T {
        &self.row.data
    }

    #[inline]
    pub fn row(&self) -> &FlattenedItem<T> {
        &self.row
    }

    /// Indentation level. For the item being dragged this is the projected depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn parent_id(&self) -> Option<&ItemId> {
        self.row.parent_id.as_ref()
    }

    #[inline]
    pub fn is_folder(&self) -> bool {
        self.row.has_children()
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.row.collapsed
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.row.disable_dragging
    }

    /// Children were requested and have not arrived yet.
    #[inline]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn row_attributes(&self) -> RowAttributes {
        self.row.row_attributes()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DndTreeRowState {
    pub selected: bool,
    /// This row is the item being carried.
    pub dragging: bool,
    /// Render the carried row as a drop indicator line instead of its content.
    pub indicator: bool,
}

type LoadChildren<T> = Rc<dyn Fn(&ItemId, &mut Context<DndTreeState<T>>)>;

struct DndTreeStateCallbacks<T: 'static> {
    on_drop: Option<Rc<dyn Fn(&DropResult<T>, &[TreeItem<T>])>>,
    on_remove: Option<Rc<dyn Fn(&RemovedItem<T>)>>,
    on_load_children: Option<LoadChildren<T>>,
    on_announce: Option<Rc<dyn Fn(&Announcement)>>,
}

impl<T: 'static> Default for DndTreeStateCallbacks<T> {
    fn default() -> Self {
        Self {
            on_drop: None,
            on_remove: None,
            on_load_children: None,
            on_announce: None,
        }
    }
}

/// State for a sortable tree.
pub struct DndTreeState<T: 'static = ()> {
    focus_handle: FocusHandle,
    tree: IndexedTree<T>,
    entries: Vec<DndTreeEntry<T>>,
    /// Visible row ids before the carried row is moved; pointer hits resolve against these.
    slots: Vec<ItemId>,
    config: TreeConfig,
    session: DragSession,
    lazy: LazyChildren,
    scrollbar_state: ScrollbarState,
    scroll_handle: UniformListScrollHandle,
    selected_id: Option<ItemId>,
    drag_origin_x: Option<Pixels>,
    pointer_drag: bool,
    announcement: Option<Announcement>,
    callbacks: DndTreeStateCallbacks<T>,
    render_item:
        Rc<dyn Fn(usize, &DndTreeEntry<T>, DndTreeRowState, &mut Window, &mut App) -> ListItem>,
}

impl<T: Clone + 'static> DndTreeState<T> {
    pub fn new(cx: &mut App) -> Self {
        let config = TreeConfig::default();
        Self {
            focus_handle: cx.focus_handle(),
            tree: IndexedTree::default(),
            entries: Vec::new(),
            slots: Vec::new(),
            session: DragSession::from_config(&config),
            config,
            lazy: LazyChildren::new(),
            scrollbar_state: ScrollbarState::default(),
            scroll_handle: UniformListScrollHandle::default(),
            selected_id: None,
            drag_origin_x: None,
            pointer_drag: false,
            announcement: None,
            callbacks: DndTreeStateCallbacks::default(),
            render_item: Rc::new(|_, _, _, _, _| ListItem::new("dnd-tree-empty")),
        }
    }

    /// Set the tree options. `indentation_width` is both the row indentation and the
    /// horizontal drag distance per depth level.
    pub fn config(mut self, config: TreeConfig) -> Self {
        self.session.set_indentation_width(config.indentation_width);
        self.config = config;
        self.rebuild_entries();
        self
    }

    pub fn tree_config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn items(mut self, items: impl Into<Vec<TreeItem<T>>>) -> Self {
        self.tree = IndexedTree::new(items.into());
        self.rebuild_entries();
        self
    }

    pub fn set_items(&mut self, items: impl Into<Vec<TreeItem<T>>>, cx: &mut Context<Self>) {
        self.session.cancel();
        self.tree = IndexedTree::new(items.into());
        self.selected_id = None;
        self.drag_origin_x = None;
        self.pointer_drag = false;
        self.rebuild_entries();
        cx.notify();
    }

    pub fn root_items(&self) -> &[TreeItem<T>] {
        self.tree.items()
    }

    pub fn get_item(&self, id: &ItemId) -> Option<&TreeItem<T>> {
        self.tree.get(id)
    }

    pub fn entries(&self) -> &[DndTreeEntry<T>] {
        &self.entries
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected_id = self.selected_id.as_ref()?;
        self.entries.iter().position(|entry| entry.id() == selected_id)
    }

    pub fn set_selected_index(&mut self, ix: Option<usize>, cx: &mut Context<Self>) {
        self.selected_id = ix
            .and_then(|ix| self.entries.get(ix))
            .map(|entry| entry.id().clone());
        cx.notify();
    }

    pub fn selected_entry(&self) -> Option<&DndTreeEntry<T>> {
        self.selected_index().and_then(|ix| self.entries.get(ix))
    }

    /// The most recent drag announcement, for a live region.
    pub fn announcement(&self) -> Option<&Announcement> {
        self.announcement.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    /// Provide a callback invoked after a successful drop with the new tree.
    pub fn on_drop(mut self, on_drop: impl Fn(&DropResult<T>, &[TreeItem<T>]) + 'static) -> Self {
        self.callbacks.on_drop = Some(Rc::new(on_drop));
        self
    }

    pub fn on_remove(mut self, on_remove: impl Fn(&RemovedItem<T>) + 'static) -> Self {
        self.callbacks.on_remove = Some(Rc::new(on_remove));
        self
    }

    /// Provide a callback that starts fetching children of a lazily loaded item.
    ///
    /// Deliver the result with [`resolve_children`](Self::resolve_children), or give up with
    /// [`abandon_children`](Self::abandon_children).
    pub fn on_load_children(
        mut self,
        on_load_children: impl Fn(&ItemId, &mut Context<Self>) + 'static,
    ) -> Self {
        self.callbacks.on_load_children = Some(Rc::new(on_load_children));
        self
    }

    pub fn on_announce(mut self, on_announce: impl Fn(&Announcement) + 'static) -> Self {
        self.callbacks.on_announce = Some(Rc::new(on_announce));
        self
    }

    /// Collapse or expand `id`, requesting children first for unloaded lazy items.
    pub fn toggle_collapse(&mut self, id: &ItemId, cx: &mut Context<Self>) {
        let on_load_children = self.callbacks.on_load_children.clone();
        let mut provider = |id: &ItemId| match &on_load_children {
            Some(on_load_children) => on_load_children(id, cx),
            None => log::warn!("no children loader for {id}"),
        };
        let items = std::mem::take(&mut self.tree).into_items();
        self.tree = IndexedTree::new(self.lazy.toggle_collapse(items, id, &mut provider));
        self.rebuild_entries();
        cx.notify();
    }

    /// Install children fetched for `id` and expand it.
    pub fn resolve_children(
        &mut self,
        id: &ItemId,
        children: Vec<TreeItem<T>>,
        cx: &mut Context<Self>,
    ) {
        let items = std::mem::take(&mut self.tree).into_items();
        self.tree = IndexedTree::new(self.lazy.resolve(items, id, children));
        self.rebuild_entries();
        cx.notify();
    }

    /// Give up on a children request. The item stays collapsed.
    pub fn abandon_children(&mut self, id: &ItemId, cx: &mut Context<Self>) {
        if self.lazy.abandon(id) {
            self.rebuild_entries();
            cx.notify();
        }
    }

    /// Remove `id` and its subtree. A drag or children request inside that subtree is
    /// dropped with it.
    pub fn remove(&mut self, id: &ItemId, cx: &mut Context<Self>) -> Option<RemovedItem<T>> {
        let removed = self.tree.remove(id)?;
        if self
            .session
            .active_id()
            .is_some_and(|active_id| subtree_contains(&removed.item, active_id))
        {
            self.session.cancel();
            self.pointer_drag = false;
            self.drag_origin_x = None;
        }
        self.lazy.forget_subtree(&removed.item);
        if let Some(on_remove) = self.callbacks.on_remove.clone() {
            on_remove(&removed);
        }
        self.rebuild_entries();
        cx.notify();
        Some(removed)
    }

    /// Append `item` to the children of `parent_id`, or to the root. The parent is
    /// expanded so the new item is visible.
    pub fn add_item(
        &mut self,
        parent_id: Option<&ItemId>,
        item: TreeItem<T>,
        cx: &mut Context<Self>,
    ) {
        let parent_id = parent_id.filter(|_| {
            if !self.config.allow_nested_item_addition {
                log::warn!("nested item addition is disabled, adding to the root");
            }
            self.config.allow_nested_item_addition
        });
        if let Some(parent_id) = parent_id {
            self.tree.update(parent_id, |parent| parent.collapsed = false);
        }
        self.selected_id = Some(item.id.clone());
        self.tree.insert(parent_id, usize::MAX, item);
        self.rebuild_entries();
        cx.notify();
    }

    fn rebuild_entries(&mut self) {
        let (slots, rows) = arrange_rows(&self.session, self.tree.items());
        let entries = rows
            .into_iter()
            .map(|row| DndTreeEntry {
                depth: self.session.display_depth(&row),
                loading: self.lazy.is_pending(&row.id),
                row,
            })
            .collect();
        self.slots = slots;
        self.entries = entries;
    }

    fn announce(&mut self, announcement: Announcement) {
        log::debug!("{announcement}");
        if let Some(on_announce) = self.callbacks.on_announce.clone() {
            on_announce(&announcement);
        }
        self.announcement = Some(announcement);
    }

    fn select_ix(&mut self, ix: usize, cx: &mut Context<Self>) {
        let ix = ix.min(self.entries.len().saturating_sub(1));
        self.selected_id = self.entries.get(ix).map(|entry| entry.id().clone());
        self.scroll_handle
            .scroll_to_item(ix, ScrollStrategy::Center);
        cx.notify();
    }

    fn start_drag(&mut self, id: &ItemId, cx: &mut Context<Self>) -> bool {
        match self.session.start(self.tree.items(), id) {
            Ok(announcement) => {
                self.selected_id = Some(id.clone());
                self.announce(announcement);
                self.rebuild_entries();
                cx.notify();
                true
            }
            Err(err) => {
                log::debug!("drag not started: {err}");
                false
            }
        }
    }

    fn move_drag(&mut self, over_id: Option<ItemId>, offset: f32, cx: &mut Context<Self>) {
        let before = (
            self.session.over_id().cloned(),
            self.session.projection().cloned(),
        );
        match self
            .session
            .drag_move(self.tree.items(), over_id.as_ref(), offset)
        {
            Ok(Some(announcement)) => self.announce(announcement),
            Ok(None) => {}
            Err(err) => {
                log::debug!("drag move ignored: {err}");
                return;
            }
        }
        let after = (
            self.session.over_id().cloned(),
            self.session.projection().cloned(),
        );
        if before != after {
            self.rebuild_entries();
            cx.notify();
        }
    }

    fn key_step(&mut self, step: KeyboardStep, cx: &mut Context<Self>) {
        match self.session.key_step(self.tree.items(), step) {
            Ok(Some(announcement)) => self.announce(announcement),
            Ok(None) => return,
            Err(err) => {
                log::debug!("keyboard step ignored: {err}");
                return;
            }
        }
        self.rebuild_entries();
        if let Some(ix) = self.selected_index() {
            self.scroll_handle
                .scroll_to_item(ix, ScrollStrategy::Center);
        }
        cx.notify();
    }

    fn finish_drop(&mut self, cx: &mut Context<Self>) {
        self.pointer_drag = false;
        self.drag_origin_x = None;
        match self.session.drop(self.tree.items()) {
            Ok(Some(Dropped {
                items,
                result,
                announcement,
            })) => {
                self.tree.replace_items(items);
                self.selected_id = Some(result.moved_item.id.clone());
                if let Some(announcement) = announcement {
                    self.announce(announcement);
                }
                if let Some(on_drop) = self.callbacks.on_drop.clone() {
                    on_drop(&result, self.tree.items());
                }
            }
            Ok(None) => log::debug!("released without a drop target"),
            // Row and list both receive the drop; the second one finds the session idle.
            Err(_) => return,
        }
        self.rebuild_entries();
        cx.notify();
    }

    fn cancel_drag(&mut self, cx: &mut Context<Self>) {
        self.pointer_drag = false;
        self.drag_origin_x = None;
        if let Some(announcement) = self.session.cancel() {
            self.announce(announcement);
            self.rebuild_entries();
            cx.notify();
        }
    }

    fn drag_offset(&self, x: Pixels) -> f32 {
        self.drag_origin_x.map_or(0., |origin_x| (x - origin_x).into())
    }

    fn on_entry_click(
        &mut self,
        ix: usize,
        _event: &gpui::ClickEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let Some(entry) = self.entries.get(ix) else {
            return;
        };
        let id = entry.id().clone();
        let toggle = self.config.collapsible && entry.is_folder();
        self.selected_id = Some(id.clone());
        if toggle {
            self.toggle_collapse(&id, cx);
        } else {
            cx.notify();
        }
    }

    fn on_drag_start(
        &mut self,
        drag: &DndTreeDrag,
        _cursor_offset: Point<Pixels>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if drag.tree_id != cx.entity_id() {
            return;
        }
        if self.start_drag(&drag.item_id, cx) {
            self.pointer_drag = true;
            self.drag_origin_x = Some(window.mouse_position().x);
        }
    }

    fn on_drag_move(
        &mut self,
        event: &gpui::DragMoveEvent<DndTreeDrag>,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !cx.has_active_drag() || !self.pointer_drag {
            return;
        }
        let drag = event.drag(cx);
        if drag.tree_id != cx.entity_id() {
            return;
        }

        let mouse_position = event.event.position;
        if !event.bounds.contains(&mouse_position) {
            let offset = self.drag_offset(mouse_position.x);
            self.move_drag(None, offset, cx);
        }
    }

    fn on_row_drag_move(
        &mut self,
        row_ix: usize,
        event: &gpui::DragMoveEvent<DndTreeDrag>,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !cx.has_active_drag() || !self.pointer_drag {
            return;
        }
        let drag = event.drag(cx);
        if drag.tree_id != cx.entity_id() {
            return;
        }

        let mouse_position = event.event.position;
        if !event.bounds.contains(&mouse_position) {
            return;
        }

        let Some(over_id) = self.slots.get(row_ix).cloned() else {
            return;
        };
        let offset = self.drag_offset(mouse_position.x);
        self.move_drag(Some(over_id), offset, cx);
    }

    fn on_drag_drop(&mut self, drag: &DndTreeDrag, window: &mut Window, cx: &mut Context<Self>) {
        if drag.tree_id != cx.entity_id() {
            return;
        }
        if self.session.is_dragging() {
            let offset = self.drag_offset(window.mouse_position().x);
            let over_id = self.session.over_id().cloned();
            self.move_drag(over_id, offset, cx);
        }
        self.finish_drop(cx);
    }

    fn on_key_down(&mut self, event: &gpui::KeyDownEvent, cx: &mut Context<Self>) -> bool {
        let key = event.keystroke.key.as_str();

        if self.session.is_dragging() {
            if self.pointer_drag {
                return false;
            }
            return match key {
                "escape" => {
                    self.cancel_drag(cx);
                    true
                }
                "enter" | "space" => {
                    self.finish_drop(cx);
                    true
                }
                _ => match KeyboardStep::from_key(key) {
                    Some(step) => {
                        self.key_step(step, cx);
                        true
                    }
                    None => false,
                },
            };
        }

        if self.entries.is_empty() {
            return false;
        }
        let selected_ix = self
            .selected_index()
            .unwrap_or(0)
            .min(self.entries.len() - 1);

        match key {
            "space" | "enter" => {
                let id = self.entries[selected_ix].id().clone();
                self.start_drag(&id, cx)
            }
            "up" => {
                self.select_ix(selected_ix.saturating_sub(1), cx);
                true
            }
            "down" => {
                self.select_ix(selected_ix + 1, cx);
                true
            }
            "right" | "left" => {
                let entry = &self.entries[selected_ix];
                let expand = key == "right";
                if entry.is_folder() && entry.is_collapsed() == expand {
                    let id = entry.id().clone();
                    self.toggle_collapse(&id, cx);
                    return true;
                }
                if !expand
                    && let Some(parent_id) = entry.parent_id()
                    && let Some(parent_ix) = self
                        .entries
                        .iter()
                        .position(|entry| entry.id() == parent_id)
                {
                    self.select_ix(parent_ix, cx);
                    return true;
                }
                false
            }
            _ => false,
        }
    }
}

impl<T: Clone + 'static> Render for DndTreeState<T> {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        // Released outside of any drop target.
        if self.pointer_drag && !cx.has_active_drag() {
            self.cancel_drag(cx);
        }

        let render_item = Rc::clone(&self.render_item);
        let state_entity = cx.entity();
        let show_indicator = self.config.show_drop_indicator;

        div()
            .id("dnd-tree-state")
            .size_full()
            .relative()
            .child(
                uniform_list("entries", self.entries.len(), {
                    cx.processor(move |state, visible_range: Range<usize>, window, cx| {
                        let selected_ix = state.selected_index();
                        let active_id = state.session.active_id().cloned();
                        let mut items = Vec::with_capacity(visible_range.len());
                        for ix in visible_range {
                            let entry = &state.entries[ix];
                            let dragging = active_id.as_ref() == Some(entry.id());
                            let row_state = DndTreeRowState {
                                selected: Some(ix) == selected_ix,
                                dragging,
                                indicator: dragging && show_indicator,
                            };

                            let item = (render_item)(ix, entry, row_state, window, cx);
                            let drag_value = DndTreeDrag {
                                tree_id: cx.entity_id(),
                                item_id: entry.id().clone(),
                                label: entry.label().to_string().into(),
                                child_count: get_child_count(state.tree.items(), entry.id()),
                            };

                            let is_disabled = entry.is_disabled();
                            let row = div()
                                .id(ElementId::Name(row_element_name(
                                    &entry.row_attributes(),
                                )))
                                .child(item.selected(row_state.selected))
                                .on_drag_move::<DndTreeDrag>(cx.listener(
                                    move |this, ev, window, cx| {
                                        this.on_row_drag_move(ix, ev, window, cx);
                                    },
                                ))
                                .on_drop::<DndTreeDrag>(cx.listener(Self::on_drag_drop))
                                .on_click(cx.listener(move |this, click_event, window, cx| {
                                    this.on_entry_click(ix, click_event, window, cx);
                                }))
                                .when(!is_disabled, |this| {
                                    let state_entity = state_entity.clone();
                                    this.on_drag(
                                        drag_value,
                                        move |drag, cursor_offset, window, cx| {
                                            state_entity.update(cx, |state, cx| {
                                                state.on_drag_start(
                                                    drag,
                                                    cursor_offset,
                                                    window,
                                                    cx,
                                                );
                                            });
                                            cx.new(|_| DragGhost {
                                                label: drag.label.clone(),
                                                child_count: drag.child_count,
                                            })
                                        },
                                    )
                                });

                            items.push(row);
                        }
                        items
                    })
                })
                .on_drag_move::<DndTreeDrag>(cx.listener(Self::on_drag_move))
                .on_drop::<DndTreeDrag>(cx.listener(Self::on_drag_drop))
                .flex_grow()
                .size_full()
                .track_scroll(self.scroll_handle.clone())
                .with_sizing_behavior(ListSizingBehavior::Auto)
                .into_any_element(),
            )
            .child(
                div()
                    .absolute()
                    .top_0()
                    .right_0()
                    .bottom_0()
                    .w(px(12.))
                    .child(Scrollbar::uniform_scroll(
                        &self.scrollbar_state,
                        &self.scroll_handle,
                    )),
            )
    }
}

/// Element name of a rendered row, carrying its attribute pairs so automation can read
/// the item id and, for nested rows, the parent id.
fn row_element_name(attributes: &RowAttributes) -> SharedString {
    let mut name = String::from("tree-item");
    for (key, value) in attributes.pairs() {
        name.push_str(&format!("[{key}={value}]"));
    }
    name.into()
}

/// Visible rows in display order. The carried row is moved to its over target; the
/// returned ids keep the order before that move so pointer hits stay stable.
fn arrange_rows<T: Clone>(
    session: &DragSession,
    items: &[TreeItem<T>],
) -> (Vec<ItemId>, Vec<FlattenedItem<T>>) {
    let mut rows = session.visible_items(items);
    let slots = rows.iter().map(|row| row.id.clone()).collect();

    if let (Some(active_id), Some(over_id)) = (session.active_id(), session.over_id())
        && let Some(active_ix) = rows.iter().position(|row| row.id == *active_id)
        && let Some(over_ix) = rows.iter().position(|row| row.id == *over_id)
    {
        array_move(&mut rows, active_ix, over_ix);
    }
    (slots, rows)
}

/// A sortable tree element with nesting by horizontal drag.
#[derive(IntoElement)]
pub struct DndTree<T: Clone + 'static = ()> {
    id: ElementId,
    state: Entity<DndTreeState<T>>,
    style: StyleRefinement,
    render_item:
        Rc<dyn Fn(usize, &DndTreeEntry<T>, DndTreeRowState, &mut Window, &mut App) -> ListItem>,
}

impl<T: Clone + 'static> DndTree<T> {
    pub fn new<R>(state: &Entity<DndTreeState<T>>, render_item: R) -> Self
    where
        R: Fn(usize, &DndTreeEntry<T>, DndTreeRowState, &mut Window, &mut App) -> ListItem
            + 'static,
    {
        Self {
            id: ElementId::Name(format!("dnd-tree-{}", state.entity_id()).into()),
            state: state.clone(),
            style: StyleRefinement::default(),
            render_item: Rc::new(move |ix, entry, row_state, window, cx| {
                render_item(ix, entry, row_state, window, cx)
            }),
        }
    }
}

impl<T: Clone + 'static> Styled for DndTree<T> {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl<T: Clone + 'static> RenderOnce for DndTree<T> {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let focus_handle = self.state.read(cx).focus_handle.clone();
        let state_entity = self.state.clone();
        self.state
            .update(cx, |state, _| state.render_item = self.render_item);

        div()
            .id(self.id)
            .key_context(CONTEXT)
            .track_focus(&focus_handle)
            .on_key_down(move |event, window, cx| {
                let handled = state_entity.update(cx, |state, cx| state.on_key_down(event, cx));
                if handled {
                    window.prevent_default();
                    cx.stop_propagation();
                }
            })
            .size_full()
            .child(self.state)
            .refine_style(&self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &'static str, children: Vec<TreeItem>) -> TreeItem {
        TreeItem::new(id, id).children(children)
    }

    fn ids(rows: &[FlattenedItem]) -> Vec<&str> {
        rows.iter().map(|row| row.id.as_str()).collect()
    }

    fn sample() -> Vec<TreeItem> {
        vec![
            item("A", vec![]),
            item("B", vec![item("B1", vec![])]),
            item("C", vec![]),
        ]
    }

    #[test]
    fn row_names_carry_parent_only_when_nested() {
        let session = DragSession::default();
        let (_, rows) = arrange_rows(&session, &sample());
        let names: Vec<String> = rows
            .iter()
            .map(|row| row_element_name(&row.row_attributes()).to_string())
            .collect();
        assert_eq!(names[1], "tree-item[data-tree-item-id=B]");
        assert_eq!(
            names[2],
            "tree-item[data-tree-item-id=B1][data-tree-item-parent-id=B]"
        );
        assert!(!names[0].contains(RowAttributes::PARENT_ID));
        assert!(!names[3].contains(RowAttributes::PARENT_ID));
    }

    #[test]
    fn idle_rows_follow_the_tree() {
        let session = DragSession::default();
        let (slots, rows) = arrange_rows(&session, &sample());
        assert_eq!(ids(&rows), vec!["A", "B", "B1", "C"]);
        assert_eq!(slots.len(), rows.len());
    }

    #[test]
    fn carried_row_is_shown_at_its_target() {
        let tree = sample();
        let mut session = DragSession::new(16.);
        session.start(&tree, &"B".into()).unwrap();
        session.drag_move(&tree, Some(&"C".into()), 0.).unwrap();

        let (slots, rows) = arrange_rows(&session, &tree);
        assert_eq!(ids(&rows), vec!["A", "C", "B"]);
        assert_eq!(slots, vec!["A".into(), "B".into(), ItemId::from("C")]);
    }

    #[test]
    fn carried_row_uses_projected_depth() {
        let tree = sample();
        let mut session = DragSession::new(16.);
        session.start(&tree, &"C".into()).unwrap();
        session.drag_move(&tree, Some(&"C".into()), 16.).unwrap();

        let (_, rows) = arrange_rows(&session, &tree);
        let carried = rows.iter().find(|row| row.id == "C").unwrap();
        assert_eq!(carried.depth, 0);
        assert_eq!(session.display_depth(carried), 1);
    }
}
