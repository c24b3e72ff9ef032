//! Host side effects requested by dropdown transitions
//!
//! Transitions never touch the host directly. They return effects, and the
//! caller applies them after the state change is complete, typically right
//! after the frame's `update()`.

use smallvec::SmallVec;

use dropkit_core::HostBridge;

/// A side effect for the host to perform
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropdownEffect {
    /// Move keyboard focus into the search input
    FocusSearchInput { element_id: String },
    /// Scroll the selected row into view inside the panel
    ScrollIntoView { element_id: String },
}

/// Effects produced by one operation, in the order they should run
pub type Effects = SmallVec<[DropdownEffect; 2]>;

impl DropdownEffect {
    /// Element the effect targets
    pub fn element_id(&self) -> &str {
        match self {
            DropdownEffect::FocusSearchInput { element_id }
            | DropdownEffect::ScrollIntoView { element_id } => element_id,
        }
    }

    /// Perform the effect through the host bridge
    pub fn apply(&self, host: &HostBridge) {
        match self {
            DropdownEffect::FocusSearchInput { element_id } => {
                host.set_focus(Some(element_id.as_str()));
            }
            DropdownEffect::ScrollIntoView { element_id } => {
                host.scroll_element_into_view(element_id);
            }
        }
    }
}

/// Apply every effect in order
pub fn apply_all<'a>(effects: impl IntoIterator<Item = &'a DropdownEffect>, host: &HostBridge) {
    for effect in effects {
        effect.apply(host);
    }
}
