use std::time::Duration;

use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::ActiveTheme as _;
use gpui_component::button::{Button, ButtonVariants as _};
use gpui_component::list::ListItem;
use gpui_component::{Icon, IconName, Sizable as _, h_flex, v_flex};
use gpui_dnd_tree::{
    DndTreeEntry, DndTreeRowState, DndTreeState, TreeConfig, TreeItem, dnd_tree,
};
use serde::Deserialize;

/// A tree and its options as stored on disk.
#[derive(Debug, Deserialize)]
pub struct DemoTree {
    #[serde(default)]
    pub config: TreeConfig,
    pub items: Vec<TreeItem>,
}

impl DemoTree {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub struct SortableTreeExample {
    tree: Entity<DndTreeState>,
    next_id: usize,
}

impl SortableTreeExample {
    pub fn view(demo: DemoTree, _window: &mut Window, cx: &mut App) -> Entity<Self> {
        let tree = cx.new(|cx| {
            DndTreeState::new(cx)
                .config(demo.config)
                .items(demo.items)
                .on_drop(|result, _items| {
                    log::info!(
                        "moved {} under {:?} at {}",
                        result.moved_item.id,
                        result.parent,
                        result.index
                    );
                })
                .on_remove(|removed| log::info!("removed {}", removed.item.id))
                .on_load_children(|id, cx| {
                    let id = id.clone();
                    cx.spawn(async move |this, cx| {
                        cx.background_executor()
                            .timer(Duration::from_millis(600))
                            .await;
                        let children = (1..=3)
                            .map(|n| TreeItem::new(format!("{id}/{n}"), format!("{id} {n}")))
                            .collect();
                        this.update(cx, |state, cx| state.resolve_children(&id, children, cx))
                            .ok();
                    })
                    .detach();
                })
        });
        cx.new(|_| Self { tree, next_id: 1 })
    }

    fn add_item(&mut self, nested: bool, cx: &mut Context<Self>) {
        let id = format!("new-{}", self.next_id);
        self.next_id += 1;
        self.tree.update(cx, |tree, cx| {
            let parent_id = nested
                .then(|| tree.selected_entry().map(|entry| entry.id().clone()))
                .flatten();
            tree.add_item(parent_id.as_ref(), TreeItem::new(id.as_str(), id.as_str()), cx);
        });
    }

    fn remove_selected(&mut self, cx: &mut Context<Self>) {
        self.tree.update(cx, |tree, cx| {
            let Some(id) = tree.selected_entry().map(|entry| entry.id().clone()) else {
                return;
            };
            tree.remove(&id, cx);
        });
    }
}

impl Render for SortableTreeExample {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let state = self.tree.read(cx);
        let tree_dump = format_tree(state.root_items());
        let config = state.tree_config().clone();
        let announcement = state
            .announcement()
            .map(|announcement| announcement.to_string())
            .unwrap_or_default();
        let indentation = px(config.indentation_width);

        v_flex()
            .size_full()
            .p(px(16.))
            .gap_y_3()
            .child(
                v_flex()
                    .gap_y_1()
                    .child(
                        div()
                            .text_xl()
                            .font_weight(FontWeight::BOLD)
                            .child("Sortable Tree"),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child("Drag rows to reorder. Drag right to nest under the row above, left to move out. Keyboard: space picks up the selected row, arrows move it, enter drops, escape cancels."),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child(format!("Announcement: {announcement}")),
                    ),
            )
            .child(
                h_flex()
                    .gap_x_2()
                    .items_center()
                    .child(
                        Button::new("sortable-tree-add")
                            .label("Add item")
                            .ghost()
                            .on_click(cx.listener(|this, _, _window, cx| this.add_item(false, cx))),
                    )
                    .when(config.allow_nested_item_addition, |this| {
                        this.child(
                            Button::new("sortable-tree-add-nested")
                                .label("Add to selected")
                                .ghost()
                                .on_click(
                                    cx.listener(|this, _, _window, cx| this.add_item(true, cx)),
                                ),
                        )
                    })
                    .when(config.removable, |this| {
                        this.child(
                            Button::new("sortable-tree-remove")
                                .label("Remove selected")
                                .ghost()
                                .on_click(
                                    cx.listener(|this, _, _window, cx| this.remove_selected(cx)),
                                ),
                        )
                    }),
            )
            .child(
                h_flex()
                    .flex_1()
                    .min_h(px(0.))
                    .gap_x_3()
                    .child(
                        div()
                            .w(px(420.))
                            .h_full()
                            .rounded(px(12.))
                            .border_1()
                            .border_color(theme.border)
                            .bg(theme.background)
                            .child(dnd_tree(
                                &self.tree,
                                move |ix, entry, row_state, _window, cx| {
                                    render_tree_row(ix, entry, row_state, indentation, cx)
                                },
                            )),
                    )
                    .child(
                        v_flex()
                            .flex_1()
                            .min_w(px(0.))
                            .h_full()
                            .rounded(px(12.))
                            .border_1()
                            .border_color(theme.border)
                            .bg(theme.background)
                            .p(px(12.))
                            .gap_y_0p5()
                            .children(
                                tree_dump
                                    .lines()
                                    .map(|line| div().text_sm().child(line.to_string())),
                            ),
                    ),
            )
    }
}

fn render_tree_row(
    ix: usize,
    entry: &DndTreeEntry,
    row_state: DndTreeRowState,
    indentation: Pixels,
    cx: &mut App,
) -> ListItem {
    let theme = cx.theme();
    let indent = indentation * entry.depth();

    if row_state.indicator {
        return ListItem::new(ix).pl(px(10.) + indent).child(
            div()
                .h(px(2.))
                .w_full()
                .rounded(px(1.))
                .bg(theme.drag_border),
        );
    }

    let chevron = if entry.is_collapsed() {
        IconName::ChevronRight
    } else {
        IconName::ChevronDown
    };

    ListItem::new(ix)
        .pl(px(10.) + indent)
        .when(row_state.dragging, |this| this.opacity(0.5))
        .child(
            h_flex()
                .gap_x_2()
                .items_center()
                .child(
                    div().w(px(16.)).when(entry.is_folder(), |this| {
                        this.child(Icon::new(chevron).small().text_color(theme.muted_foreground))
                    }),
                )
                .child(entry.label().to_string())
                .when(entry.is_loading(), |this| {
                    this.child(
                        div()
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .child("loading"),
                    )
                })
                .when(entry.is_disabled(), |this| {
                    this.child(
                        div()
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .child("locked"),
                    )
                }),
        )
}

fn format_tree(items: &[TreeItem]) -> String {
    fn walk(items: &[TreeItem], depth: usize, out: &mut String) {
        for item in items {
            out.push_str(&"  ".repeat(depth));
            out.push_str(item.id.as_str());
            if item.collapsed {
                out.push_str(" (collapsed)");
            }
            out.push('\n');
            walk(&item.children, depth + 1, out);
        }
    }

    let mut out = String::new();
    walk(items, 0, &mut out);
    out
}
