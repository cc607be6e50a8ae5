use sortable_tree::{
    Announcement, DragSession, IndexedTree, ItemId, KeyboardStep, LazyChildren, Placement,
    TreeConfig, TreeItem, build_tree, flatten, get_child_count, get_item_by_id, get_projection,
    remove_children_of, remove_item_by_id, set_item_properties, visible_items,
};

fn item(id: &'static str, children: Vec<TreeItem>) -> TreeItem {
    TreeItem::new(id, id).children(children)
}

fn dump(items: &[TreeItem], depth: usize, out: &mut String) {
    for node in items {
        out.push_str(&"  ".repeat(depth));
        out.push_str(node.id.as_str());
        if node.collapsed {
            out.push_str(" (collapsed)");
        }
        out.push('\n');
        dump(&node.children, depth + 1, out);
    }
}

fn dumped(items: &[TreeItem]) -> String {
    let mut s = String::new();
    dump(items, 0, &mut s);
    s.trim_end().to_string()
}

fn abc() -> Vec<TreeItem> {
    vec![
        item("A", vec![]),
        item("B", vec![item("B1", vec![])]),
        item("C", vec![]),
    ]
}

fn id(s: &str) -> ItemId {
    ItemId::from(s)
}

#[test]
fn drag_to_the_end_at_root_depth() {
    let tree = abc();
    let mut session = DragSession::new(50.);
    session.start(&tree, &id("A")).unwrap();
    session.drag_move(&tree, Some(&id("C")), 0.).unwrap();

    let projection = session.projection().unwrap();
    assert_eq!(projection.depth, 0);
    assert_eq!(projection.parent_id, None);

    let dropped = session.drop(&tree).unwrap().unwrap();
    assert_eq!(
        dumped(&dropped.items),
        r#"B
  B1
C
A"#
    );
}

#[test]
fn drag_right_nests_under_previous_row() {
    let tree = abc();
    let mut session = DragSession::new(50.);
    session.start(&tree, &id("A")).unwrap();
    session.drag_move(&tree, Some(&id("C")), 120.).unwrap();

    let projection = session.projection().unwrap();
    assert_eq!(projection.max_depth, 1);
    assert_eq!(projection.depth, 1);
    assert_eq!(projection.parent_id, Some(id("C")));

    let dropped = session.drop(&tree).unwrap().unwrap();
    assert_eq!(
        dumped(&dropped.items),
        r#"B
  B1
C
  A"#
    );
    assert_eq!(dropped.result.parent, Some(id("C")));
    assert_eq!(dropped.result.index, 0);
}

#[test]
fn collapsed_item_hides_children_but_stays_visible() {
    let tree = set_item_properties(abc(), &id("B"), |item| item.collapsed = true);
    let visible: Vec<_> = visible_items(flatten(&tree), None)
        .into_iter()
        .map(|row| row.id)
        .collect();
    assert_eq!(visible, vec![id("A"), id("B"), id("C")]);

    let filtered = remove_children_of(flatten(&abc()), [id("B")]);
    assert!(filtered.iter().all(|row| row.id != "B1"));
}

#[test]
fn removing_only_child_leaves_parent_childless() {
    let tree = remove_item_by_id(abc(), &id("B1"));
    assert_eq!(
        dumped(&tree),
        r#"A
B
C"#
    );
    let b = get_item_by_id(&tree, &id("B")).unwrap();
    assert!(b.children.is_empty());
    assert_eq!(b.label, "B");
}

#[test]
fn drag_to_the_top_becomes_first_root() {
    let tree = abc();
    let mut session = DragSession::new(50.);
    session.start(&tree, &id("C")).unwrap();
    let announcement = session.drag_move(&tree, Some(&id("A")), 0.).unwrap();
    assert_eq!(
        announcement,
        Some(Announcement::Moved {
            id: id("C"),
            placement: Placement::Before(id("A")),
            dropped: false,
        })
    );

    let dropped = session.drop(&tree).unwrap().unwrap();
    assert_eq!(
        dumped(&dropped.items),
        r#"C
A
B
  B1"#
    );
    assert_eq!(dropped.result.parent, None);
    assert_eq!(dropped.result.index, 0);
}

#[test]
fn flatten_then_build_restores_the_tree() {
    let tree = vec![
        item("A", vec![item("A1", vec![item("A1a", vec![])])]),
        item("B", vec![]).collapsed(true),
        item("C", vec![item("C1", vec![]), item("C2", vec![])]),
    ];
    assert_eq!(build_tree(flatten(&tree)), tree);
}

#[test]
fn projection_from_config_width() {
    let config = TreeConfig::from_json_str(r#"{ "indentationWidth": 20 }"#).unwrap();
    let rows = flatten(&abc());
    let projection = get_projection(&rows, &id("C"), &id("C"), 25., config.indentation_width)
        .unwrap();
    assert_eq!(projection.depth, 1);
    assert_eq!(projection.parent_id, Some(id("B")));
}

#[test]
fn keyboard_drag_round_trip() {
    let tree = abc();
    let mut session = DragSession::from_config(&TreeConfig::default());
    assert_eq!(
        session.start(&tree, &id("A")).unwrap().to_string(),
        "Picked up A."
    );
    session.key_step(&tree, KeyboardStep::Down).unwrap();
    session.key_step(&tree, KeyboardStep::Down).unwrap();
    let announced = session.key_step(&tree, KeyboardStep::Right).unwrap();
    assert_eq!(announced.unwrap().to_string(), "A was nested under B1.");

    let dropped = session.drop(&tree).unwrap().unwrap();
    assert_eq!(
        dumped(&dropped.items),
        r#"B
  B1
    A
C"#
    );
    assert_eq!(
        dropped.announcement.unwrap().to_string(),
        "A was dropped under B1."
    );
}

#[test]
fn json_tree_with_lazy_children() {
    let json = r#"[
        { "id": 1, "label": "Home" },
        { "id": "docs", "label": "Docs", "collapsed": true, "canFetchChildren": true }
    ]"#;
    let tree: Vec<TreeItem> = serde_json::from_str(json).unwrap();
    assert_eq!(tree[0].id, "1");

    let mut lazy = LazyChildren::new();
    let mut requested = Vec::new();
    let tree = lazy.toggle_collapse(tree, &id("docs"), &mut |id: &ItemId| {
        requested.push(id.clone())
    });
    assert_eq!(requested, vec![id("docs")]);

    let tree = lazy.resolve(
        tree,
        &id("docs"),
        vec![item("intro", vec![]), item("api", vec![])],
    );
    assert_eq!(get_child_count(&tree, &id("docs")), 2);
    assert_eq!(
        dumped(&tree),
        r#"1
docs
  intro
  api"#
    );
}

#[test]
fn indexed_tree_follows_mutations() {
    let mut tree = IndexedTree::new(abc());
    assert_eq!(tree.parent_id(&id("B1")), Some(&id("B")));

    let removed = tree.remove(&id("B")).unwrap();
    assert!(!tree.contains(&id("B1")));
    tree.insert(Some(&id("C")), 0, removed.item);
    assert_eq!(tree.parent_id(&id("B")), Some(&id("C")));
    assert_eq!(tree.parent_id(&id("B1")), Some(&id("B")));
    assert_eq!(
        dumped(tree.items()),
        r#"A
C
  B
    B1"#
    );
}
