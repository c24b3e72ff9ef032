//! Dropdown Demo
//!
//! Drives a dropdown through a scripted session with a simulated host:
//! open from the trigger, type a query, arrow down, press enter, then
//! dismiss a second open with a click outside.
//!
//! Run with: cargo run -p dropkit --example dropdown_demo
//! Set RUST_LOG=dropkit=debug to see the lifecycle transitions.

use std::sync::Arc;
use std::time::Duration;

use dropkit::parts::{ListModel, ListRow, SlotModel, TriggerModel};
use dropkit::{
    Bounds, DropdownEnv, DropdownOptions, DropdownRoot, HostBridge, HostEvent, InstanceKey,
    KeyCode, KeyEvent, ListenerRegistry, ManualClock, PlacementMode, PointerEvent, SectionMeta,
};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct Language {
    id: &'static str,
    name: &'static str,
    family: &'static str,
}

fn languages() -> Vec<Language> {
    [
        ("rs", "Rust", "systems"),
        ("c", "C", "systems"),
        ("hs", "Haskell", "functional"),
        ("ml", "OCaml", "functional"),
        ("zig", "Zig", "systems"),
    ]
    .into_iter()
    .map(|(id, name, family)| Language { id, name, family })
    .collect()
}

fn render(root: &DropdownRoot<Language>) {
    let ctx = root.context();
    let trigger = TriggerModel::from_context(&ctx, "Choose a language");
    println!(
        "[{}] {} ({:?})",
        if trigger.expanded { "v" } else { ">" },
        trigger.label,
        ctx.phase()
    );
    if !ctx.is_open() {
        return;
    }

    println!("  search: {:?}", ctx.search_query());
    for row in ListModel::from_context(&ctx).rows {
        match row {
            ListRow::SectionHeader(meta) => println!("  -- {} --", meta.label),
            ListRow::Item(item) => println!(
                "  {}{}{}",
                if item.is_focused { "> " } else { "  " },
                item.label,
                if item.is_selected { " *" } else { "" }
            ),
            ListRow::Separator => println!("  ----"),
            ListRow::Empty => println!("  (no matches)"),
        }
    }
    let footer = SlotModel::from_context(&ctx);
    println!("  {} of {} shown", footer.filtered, footer.total);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dropkit=info")),
        )
        .init();

    let clock = ManualClock::new();
    let host = HostBridge::new();
    let listeners = ListenerRegistry::new();

    host.set_viewport_size(800.0, 600.0);
    host.set_bounds_callback(Arc::new(|id: &str| {
        if id.ends_with("_trigger") {
            Some(Bounds::new(20.0, 40.0, 200.0, 32.0))
        } else if id.ends_with("_content") {
            Some(Bounds::new(20.0, 76.0, 200.0, 240.0))
        } else {
            None
        }
    }));
    host.set_focus_callback(Arc::new(|id: Option<&str>| {
        tracing::info!("host: focus -> {:?}", id);
    }));

    let mut root = DropdownRoot::mount(
        DropdownOptions::new(|l: &Language| l.id.to_string(), |l: &Language| l.name.to_string())
            .items(languages())
            .get_item_section(|l: &Language| Some(SectionMeta::new(l.family, l.family)))
            .placement(PlacementMode::Auto)
            .on_select(|l: &Language| tracing::info!("selected {}", l.name))
            .on_open_change(|open| tracing::info!("open changed: {open}")),
        DropdownEnv::new()
            .host(host.clone())
            .listeners(listeners.clone())
            .clock(Arc::new(clock.clone()))
            .key(InstanceKey::explicit("lang")),
    )?;

    let frame = |root: &mut DropdownRoot<Language>, clock: &ManualClock, ms: u64| {
        clock.advance(Duration::from_millis(ms));
        let effects = root.update();
        root.apply_effects(&effects);
    };

    render(&root);

    // Click the trigger
    let ctx = root.context();
    TriggerModel::from_context(&ctx, "").press(&ctx);
    frame(&mut root, &clock, 0);
    frame(&mut root, &clock, 200);
    render(&root);

    // Type, then navigate with the keyboard
    root.context().set_search_query("a");
    frame(&mut root, &clock, 16);
    for key in [KeyCode::ArrowDown, KeyCode::ArrowDown] {
        let response = listeners.dispatch(&HostEvent::KeyDown(KeyEvent::new(key)));
        tracing::debug!("{:?} prevent_default={}", key, response.prevent_default);
        frame(&mut root, &clock, 16);
    }
    render(&root);

    listeners.dispatch(&HostEvent::KeyDown(KeyEvent::new(KeyCode::Enter)));
    frame(&mut root, &clock, 16);
    frame(&mut root, &clock, 150);
    render(&root);

    // Open again and dismiss with a click outside
    let effects = root.open();
    root.apply_effects(&effects);
    frame(&mut root, &clock, 200);
    listeners.dispatch(&HostEvent::PointerDown(PointerEvent::mouse(600.0, 500.0)));
    frame(&mut root, &clock, 16);
    frame(&mut root, &clock, 150);
    render(&root);

    root.unmount();
    Ok(())
}
