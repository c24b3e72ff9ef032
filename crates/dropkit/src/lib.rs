//! Dropkit
//!
//! A headless, composable dropdown/select widget. The crate owns the
//! behavior (open/close lifecycle, selection, search filtering, keyboard
//! navigation, placement and outside-press dismissal) and leaves rendering
//! to the host.
//!
//! # Architecture
//!
//! - [`DropdownRoot`] holds the state and runs the lifecycle machine
//!   (`Closed -> Opening -> Open -> Closing -> Closed`)
//! - [`DropdownContext`] is the reference-stable snapshot every part reads,
//!   plus queued mutations the root applies on `update()`
//! - [`parts`] turns a context into plain models for the trigger, panel,
//!   search box, list and header/footer slots
//! - Pure building blocks ([`filter`], [`sections`], [`placement`],
//!   [`keyboard`]) can be used on their own
//!
//! # Example
//!
//! ```rust
//! use dropkit::parts::{ListModel, TriggerModel};
//! use dropkit::{DropdownOptions, DropdownRoot};
//!
//! #[derive(Clone)]
//! struct Country {
//!     code: &'static str,
//!     name: &'static str,
//! }
//!
//! let mut root = DropdownRoot::new(
//!     DropdownOptions::new(|c: &Country| c.code.to_string(), |c: &Country| c.name.to_string())
//!         .items(vec![
//!             Country { code: "fr", name: "France" },
//!             Country { code: "de", name: "Germany" },
//!         ])
//!         .on_select(|c: &Country| println!("picked {}", c.name)),
//! )
//! .unwrap();
//!
//! let ctx = root.context();
//! TriggerModel::from_context(&ctx, "Country").press(&ctx);
//! root.update();
//!
//! let list = ListModel::from_context(&root.context());
//! assert_eq!(list.item_rows().count(), 2);
//! ```

pub mod accessors;
pub mod context;
pub mod effects;
pub mod error;
pub mod filter;
pub mod keyboard;
pub mod options;
pub mod outside;
pub mod parts;
pub mod placement;
pub mod root;
pub mod sections;
pub mod state;

pub use accessors::{Accessors, FilterFn, ItemIcon, SectionFn, SectionMeta};
pub use context::{
    expect_dropdown_context, provide, use_dropdown_context, ContextSnapshot, DropdownContext,
};
pub use effects::{DropdownEffect, Effects};
pub use error::{DropdownError, Result};
pub use filter::default_filter;
pub use keyboard::{KeyResponse, KeyboardNav, NavCommand};
pub use options::{DropdownOptions, DropdownSettings, OpenChangeCallback, SelectCallback};
pub use outside::OutsideClickDetector;
pub use placement::{anchor_point, resolve_placement, Placement, PlacementMode};
pub use root::{DropdownEnv, DropdownRoot};
pub use sections::{group_items, GroupedItems, Section};
pub use state::{AnimationState, DropdownPhase};

// Re-export the primitives hosts need to drive a root
pub use dropkit_animation::{Clock, ManualClock, SharedClock, SystemClock};
pub use dropkit_core::{
    Bounds, EventResponse, HostBridge, HostEvent, InstanceKey, KeyCode, KeyEvent,
    ListenerRegistry, PointerEvent, Region,
};
