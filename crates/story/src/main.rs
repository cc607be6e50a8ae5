mod sortable_tree;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use env_logger::Env;
use gpui::*;
use gpui_component::Root;
use gpui_dnd_tree::TreeConfig;

use crate::sortable_tree::{DemoTree, SortableTreeExample};

const DEMO_TREE: &str = include_str!("../assets/demo_tree.json");

/// Load the tree from the JSON file given as the first argument, or the bundled demo.
/// A second argument names a config file that replaces the tree's own options.
fn load_demo() -> anyhow::Result<DemoTree> {
    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let mut demo = match args.next() {
        Some(path) => DemoTree::from_json(&read(&path)?)
            .with_context(|| format!("failed to parse {}", path.display()))?,
        None => DemoTree::from_json(DEMO_TREE)?,
    };
    if let Some(path) = args.next() {
        demo.config = TreeConfig::from_json_str(&read(&path)?)
            .with_context(|| format!("failed to parse {}", path.display()))?;
    }
    Ok(demo)
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let demo = load_demo()?;
    log::info!("loaded {} root items", demo.items.len());
    log::debug!("tree config: {}", demo.config.to_json_pretty()?);

    let app = Application::new();
    app.run(move |cx| {
        gpui_component::init(cx);
        cx.activate(true);

        cx.spawn(async move |cx| {
            cx.open_window(
                WindowOptions {
                    titlebar: Some(TitlebarOptions {
                        title: Some("Sortable Tree".into()),
                        appears_transparent: false,
                        traffic_light_position: None,
                    }),
                    ..Default::default()
                },
                |window, cx| {
                    let view = SortableTreeExample::view(demo, window, cx);
                    cx.new(|cx| Root::new(view, window, cx))
                },
            )?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });

    Ok(())
}
