//! Shared dropdown context
//!
//! Every part of a dropdown (trigger, search box, list, header, footer)
//! reads the same [`DropdownContext`]: an immutable snapshot of the root's
//! state plus a dispatcher for mutations.
//!
//! The snapshot is reference-stable. Asking the root for its context twice
//! without an intervening state change returns the same `Arc`, so parts can
//! skip work with [`DropdownContext::ptr_eq`].
//!
//! Mutations never touch the root directly. They queue an intent that the
//! root applies on its next `update()`, which keeps callbacks free to call
//! them at any time, even while the root itself is running user code.
//!
//! Deeply nested parts that do not receive the context as an argument can
//! look it up from the innermost [`provide`] scope on the current thread:
//!
//! ```rust
//! use dropkit::{expect_dropdown_context, provide, DropdownOptions, DropdownRoot};
//!
//! let root = DropdownRoot::new(
//!     DropdownOptions::new(|s: &String| s.clone(), |s: &String| s.clone())
//!         .items(vec!["Red".to_string(), "Green".to_string()]),
//! )
//! .unwrap();
//!
//! let count = provide(&root.context(), || {
//!     let ctx = expect_dropdown_context::<String>("ColorList");
//!     ctx.filtered_items().len()
//! });
//! assert_eq!(count, 2);
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use dropkit_core::{recover, InstanceKey, KeyCode};

use crate::accessors::Accessors;
use crate::error::{DropdownError, Result};
use crate::placement::Placement;
use crate::state::{AnimationState, DropdownPhase};

/// A mutation requested through the context or a global listener
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Intent<T> {
    Open,
    Close,
    CloseImmediate,
    Toggle,
    Select(T),
    SetSelectedItem(Option<T>),
    SetSearchQuery(String),
    SetIsOpen(bool),
    SetFocusedIndex(Option<usize>),
    Key(KeyCode),
}

/// FIFO of pending intents shared by the root and its contexts
pub(crate) struct IntentQueue<T>(Arc<Mutex<VecDeque<Intent<T>>>>);

impl<T> Clone for IntentQueue<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> IntentQueue<T> {
    pub(crate) fn new() -> Self {
        Self(Arc::new(Mutex::new(VecDeque::new())))
    }

    pub(crate) fn push(&self, intent: Intent<T>) {
        recover(self.0.lock()).push_back(intent);
    }

    pub(crate) fn pop(&self) -> Option<Intent<T>> {
        recover(self.0.lock()).pop_front()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        recover(self.0.lock()).len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        recover(self.0.lock()).is_empty()
    }
}

/// Element id of the trigger
pub fn trigger_element_id(key: &InstanceKey) -> String {
    key.derive("trigger")
}

/// Element id of the floating panel
pub fn content_element_id(key: &InstanceKey) -> String {
    key.derive("content")
}

/// Element id of the search input
pub fn search_element_id(key: &InstanceKey) -> String {
    key.derive("search")
}

/// Element id of an item row, from the item's key
pub fn item_element_id(key: &InstanceKey, item_key: &str) -> String {
    key.derive(&format!("item_{item_key}"))
}

/// Immutable view of a dropdown's state at one version
#[derive(Debug)]
pub struct ContextSnapshot<T> {
    pub key: InstanceKey,
    pub phase: DropdownPhase,
    pub placement: Placement,
    pub selected_item: Option<T>,
    pub search_query: String,
    pub items: Arc<[T]>,
    pub filtered_items: Arc<[T]>,
    pub focused_index: Option<usize>,
    pub disabled: bool,
    pub offset: f32,
    pub use_portal: bool,
    pub close_on_select: bool,
    pub accessors: Accessors<T>,
}

/// Context handed to every dropdown part
pub struct DropdownContext<T> {
    snapshot: Arc<ContextSnapshot<T>>,
    version: u64,
    intents: IntentQueue<T>,
}

impl<T> Clone for DropdownContext<T> {
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
            version: self.version,
            intents: self.intents.clone(),
        }
    }
}

impl<T> std::fmt::Debug for DropdownContext<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropdownContext")
            .field("key", &self.snapshot.key)
            .field("version", &self.version)
            .field("phase", &self.snapshot.phase)
            .field("search_query", &self.snapshot.search_query)
            .finish()
    }
}

impl<T> DropdownContext<T> {
    pub(crate) fn new(snapshot: ContextSnapshot<T>, version: u64, intents: IntentQueue<T>) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            version,
            intents,
        }
    }

    /// Whether two contexts share the same snapshot
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.snapshot, &b.snapshot)
    }

    pub fn snapshot(&self) -> &ContextSnapshot<T> {
        &self.snapshot
    }

    /// State version this snapshot was taken at
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn key(&self) -> &InstanceKey {
        &self.snapshot.key
    }

    pub fn accessors(&self) -> &Accessors<T> {
        &self.snapshot.accessors
    }

    pub fn phase(&self) -> DropdownPhase {
        self.snapshot.phase
    }

    pub fn is_open(&self) -> bool {
        self.snapshot.phase.is_open()
    }

    pub fn animation_state(&self) -> AnimationState {
        self.snapshot.phase.animation_state()
    }

    pub fn placement(&self) -> Placement {
        self.snapshot.placement
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.snapshot.selected_item.as_ref()
    }

    pub fn search_query(&self) -> &str {
        &self.snapshot.search_query
    }

    /// Full item list
    pub fn items(&self) -> &Arc<[T]> {
        &self.snapshot.items
    }

    /// Items passing the current search query
    pub fn filtered_items(&self) -> &Arc<[T]> {
        &self.snapshot.filtered_items
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.snapshot.focused_index
    }

    pub fn is_disabled(&self) -> bool {
        self.snapshot.disabled
    }

    pub fn offset(&self) -> f32 {
        self.snapshot.offset
    }

    pub fn use_portal(&self) -> bool {
        self.snapshot.use_portal
    }

    pub fn close_on_select(&self) -> bool {
        self.snapshot.close_on_select
    }

    /// Whether `item` is the selected item, compared by key
    pub fn is_selected(&self, item: &T) -> bool {
        let accessors = &self.snapshot.accessors;
        self.snapshot
            .selected_item
            .as_ref()
            .is_some_and(|selected| accessors.key(selected) == accessors.key(item))
    }

    pub fn trigger_id(&self) -> String {
        trigger_element_id(&self.snapshot.key)
    }

    pub fn content_id(&self) -> String {
        content_element_id(&self.snapshot.key)
    }

    pub fn search_id(&self) -> String {
        search_element_id(&self.snapshot.key)
    }

    pub fn item_id(&self, item: &T) -> String {
        item_element_id(&self.snapshot.key, &self.snapshot.accessors.key(item))
    }

    // =========================================================================
    // Mutations (applied on the root's next update)
    // =========================================================================

    pub fn open(&self) {
        self.intents.push(Intent::Open);
    }

    /// Animated close
    pub fn close(&self) {
        self.intents.push(Intent::Close);
    }

    /// Close without the exit animation
    pub fn close_immediate(&self) {
        self.intents.push(Intent::CloseImmediate);
    }

    pub fn toggle(&self) {
        self.intents.push(Intent::Toggle);
    }

    /// Pick an item, as a click on its row would
    pub fn select(&self, item: T) {
        self.intents.push(Intent::Select(item));
    }

    /// Change the selection without firing `on_select`
    pub fn set_selected_item(&self, item: Option<T>) {
        self.intents.push(Intent::SetSelectedItem(item));
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.intents.push(Intent::SetSearchQuery(query.into()));
    }

    /// Open (with focus) or close immediately
    pub fn set_is_open(&self, open: bool) {
        self.intents.push(Intent::SetIsOpen(open));
    }

    /// Move the keyboard focus, e.g. on pointer hover
    pub fn set_focused_index(&self, index: Option<usize>) {
        self.intents.push(Intent::SetFocusedIndex(index));
    }

    /// Feed a key press from a focused part (the search input)
    pub fn press_key(&self, key: KeyCode) {
        self.intents.push(Intent::Key(key));
    }
}

// =============================================================================
// Scoped lookup
// =============================================================================

thread_local! {
    static SCOPES: RefCell<Vec<Box<dyn Any>>> = RefCell::new(Vec::new());
}

struct ScopeGuard;

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        SCOPES.with(|scopes| {
            scopes.borrow_mut().pop();
        });
    }
}

/// Run `f` with `ctx` as the innermost dropdown context of its item type
///
/// Scopes nest; lookups find the innermost one. The scope ends when `f`
/// returns or unwinds.
pub fn provide<T: 'static, R>(ctx: &DropdownContext<T>, f: impl FnOnce() -> R) -> R {
    SCOPES.with(|scopes| scopes.borrow_mut().push(Box::new(ctx.clone())));
    let _guard = ScopeGuard;
    f()
}

/// Look up the innermost provided context for item type `T`
///
/// `consumer` names the calling part in the error.
pub fn use_dropdown_context<T: 'static>(consumer: &'static str) -> Result<DropdownContext<T>> {
    SCOPES
        .with(|scopes| {
            scopes
                .borrow()
                .iter()
                .rev()
                .find_map(|scope| scope.downcast_ref::<DropdownContext<T>>().cloned())
        })
        .ok_or(DropdownError::MissingContext { consumer })
}

/// Like [`use_dropdown_context`], but panics outside a scope
///
/// # Panics
///
/// Panics when no dropdown context for `T` is being provided.
#[track_caller]
pub fn expect_dropdown_context<T: 'static>(consumer: &'static str) -> DropdownContext<T> {
    match use_dropdown_context(consumer) {
        Ok(ctx) => ctx,
        Err(err) => panic!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(name: &str, version: u64) -> DropdownContext<String> {
        DropdownContext::new(
            ContextSnapshot {
                key: InstanceKey::explicit(name),
                phase: DropdownPhase::Open,
                placement: Placement::Bottom,
                selected_item: Some("b".to_string()),
                search_query: String::new(),
                items: vec!["a".to_string(), "b".to_string()].into(),
                filtered_items: vec!["a".to_string(), "b".to_string()].into(),
                focused_index: None,
                disabled: false,
                offset: 4.0,
                use_portal: false,
                close_on_select: true,
                accessors: Accessors::new(|s: &String| s.clone(), |s: &String| s.to_uppercase()),
            },
            version,
            IntentQueue::new(),
        )
    }

    #[test]
    fn test_missing_context_error() {
        let err = use_dropdown_context::<String>("SearchBox").unwrap_err();
        assert_eq!(err, DropdownError::MissingContext { consumer: "SearchBox" });
        assert!(err.to_string().contains("SearchBox"));
        assert!(err.to_string().contains("DropdownRoot"));
    }

    #[test]
    #[should_panic(expected = "`ListBox` must be used inside a `DropdownRoot`")]
    fn test_expect_context_panics_outside_scope() {
        let _ = expect_dropdown_context::<String>("ListBox");
    }

    #[test]
    fn test_innermost_scope_wins() {
        let outer = context("outer", 1);
        let inner = context("inner", 1);

        provide(&outer, || {
            assert_eq!(
                expect_dropdown_context::<String>("Part").key().get(),
                "outer"
            );
            provide(&inner, || {
                assert_eq!(
                    expect_dropdown_context::<String>("Part").key().get(),
                    "inner"
                );
            });
            assert_eq!(
                expect_dropdown_context::<String>("Part").key().get(),
                "outer"
            );
        });
        assert!(use_dropdown_context::<String>("Part").is_err());
    }

    #[test]
    fn test_scope_is_typed() {
        let ctx = context("strings", 1);
        provide(&ctx, || {
            assert!(use_dropdown_context::<u32>("Part").is_err());
        });
    }

    #[test]
    fn test_scope_unwinds_on_panic() {
        let ctx = context("unwinding", 1);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            provide(&ctx, || panic!("render failed"));
        }));
        assert!(result.is_err());
        assert!(use_dropdown_context::<String>("Part").is_err());
    }

    #[test]
    fn test_mutations_are_queued_in_order() {
        let ctx = context("queue", 1);
        ctx.set_search_query("b");
        ctx.select("b".to_string());
        ctx.close();

        assert_eq!(ctx.intents.len(), 3);
        assert_eq!(ctx.intents.pop(), Some(Intent::SetSearchQuery("b".into())));
        assert_eq!(ctx.intents.pop(), Some(Intent::Select("b".into())));
        assert_eq!(ctx.intents.pop(), Some(Intent::Close));
        assert_eq!(ctx.intents.pop(), None);
    }

    #[test]
    fn test_selection_and_ids() {
        let ctx = context("dd", 3);
        assert!(ctx.is_selected(&"b".to_string()));
        assert!(!ctx.is_selected(&"a".to_string()));
        assert_eq!(ctx.search_id(), "dd_search");
        assert_eq!(ctx.item_id(&"a".to_string()), "dd_item_a");
        assert_eq!(ctx.version(), 3);

        let copy = ctx.clone();
        assert!(DropdownContext::ptr_eq(&ctx, &copy));
        assert!(!DropdownContext::ptr_eq(&ctx, &context("dd", 3)));
    }
}
