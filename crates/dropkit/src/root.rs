//! Dropdown root
//!
//! `DropdownRoot` owns one dropdown instance: its lifecycle phase, the
//! selection, the search query, keyboard focus, the animation timers and
//! the global listeners that exist while it is open.
//!
//! # Frame loop
//!
//! The host drives the root once per frame, or sleeps for the wait
//! [`next_deadline`](DropdownRoot::next_deadline) reports and then updates:
//!
//! ```rust
//! use dropkit::{DropdownOptions, DropdownRoot};
//!
//! let mut root = DropdownRoot::new(
//!     DropdownOptions::new(|s: &&str| s.to_string(), |s: &&str| s.to_string())
//!         .items(["Apple", "Banana", "Cherry"])
//!         .enter_duration(0.0),
//! )
//! .unwrap();
//!
//! let effects = root.open();
//! root.apply_effects(&effects);
//! assert!(root.is_open());
//!
//! // Parts mutate through the context; the root applies it on update
//! root.context().set_search_query("an");
//! root.update();
//! assert_eq!(root.filtered_items().len(), 1);
//! ```
//!
//! Host events go through the shared [`ListenerRegistry`]; listeners only
//! queue intents, so the host must call [`update`](DropdownRoot::update)
//! after dispatching.

use std::cell::{OnceCell, RefCell};
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashSet;

use dropkit_animation::{AnimationTiming, SharedClock, SystemClock, TimerHandle, TimerId, TimerScheduler};
use dropkit_core::{HostBridge, InstanceKey, KeyCode, ListenerRegistry, PointerEvent, Region};

use crate::accessors::Accessors;
use crate::context::{
    content_element_id, item_element_id, search_element_id, trigger_element_id, ContextSnapshot,
    DropdownContext, Intent, IntentQueue,
};
use crate::effects::{apply_all, DropdownEffect, Effects};
use crate::error::Result;
use crate::filter::apply_filter;
use crate::keyboard::{KeyCapture, KeyResponse, KeyboardNav, NavCommand};
use crate::options::{DropdownOptions, DropdownSettings, OpenChangeCallback, SelectCallback};
use crate::outside::OutsideClickDetector;
use crate::placement::{resolve_placement, Placement};
use crate::sections::display_order;
use crate::state::{AnimationState, DropdownPhase, PhaseEvent};

/// Timer payloads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AnimationStep {
    EnterComplete,
    ExitComplete,
}

/// Host capabilities a root is mounted against
#[derive(Clone, Debug)]
pub struct DropdownEnv {
    host: HostBridge,
    listeners: ListenerRegistry,
    clock: SharedClock,
    key: Option<InstanceKey>,
}

impl Default for DropdownEnv {
    fn default() -> Self {
        Self {
            host: HostBridge::new(),
            listeners: ListenerRegistry::new(),
            clock: Arc::new(SystemClock::new()),
            key: None,
        }
    }
}

impl DropdownEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: HostBridge) -> Self {
        self.host = host;
        self
    }

    /// Registry the host dispatches its global events into
    pub fn listeners(mut self, listeners: ListenerRegistry) -> Self {
        self.listeners = listeners;
        self
    }

    /// Time source for the enter/exit timers
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Fixed instance key instead of a generated one
    pub fn key(mut self, key: InstanceKey) -> Self {
        self.key = Some(key);
        self
    }
}

/// One dropdown instance
pub struct DropdownRoot<T> {
    key: InstanceKey,
    phase: DropdownPhase,
    placement: Placement,
    selected_item: Option<T>,
    search_query: String,
    items: Arc<[T]>,
    accessors: Accessors<T>,
    settings: DropdownSettings,
    timing: AnimationTiming,
    on_select: Option<SelectCallback<T>>,
    on_open_change: Option<OpenChangeCallback>,
    nav: KeyboardNav,
    scheduler: TimerScheduler<AnimationStep>,
    pending: Option<TimerHandle<AnimationStep>>,
    host: HostBridge,
    outside: OutsideClickDetector,
    keys: KeyCapture,
    intents: IntentQueue<T>,
    /// Bumped on every observable change
    version: u64,
    filtered: OnceCell<Arc<[T]>>,
    context: RefCell<Option<DropdownContext<T>>>,
}

impl<T> std::fmt::Debug for DropdownRoot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropdownRoot")
            .field("key", &self.key)
            .field("phase", &self.phase)
            .field("placement", &self.placement)
            .field("search_query", &self.search_query)
            .field("items", &self.items.len())
            .field("version", &self.version)
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> DropdownRoot<T> {
    /// Mount with a private host bridge, registry and system clock
    #[track_caller]
    pub fn new(options: DropdownOptions<T>) -> Result<Self> {
        Self::mount(options, DropdownEnv::default())
    }

    /// Mount against the given host capabilities
    ///
    /// Fails if the configured durations or offset are unusable.
    #[track_caller]
    pub fn mount(options: DropdownOptions<T>, env: DropdownEnv) -> Result<Self> {
        let settings = options.resolved_settings();
        let timing = settings.validate()?;
        let key = match env.key {
            Some(key) => key,
            None => InstanceKey::new("dropdown"),
        };

        let intents = IntentQueue::new();
        let outside = {
            let queue = intents.clone();
            OutsideClickDetector::new(env.listeners.clone(), move || queue.push(Intent::Close))
        };

        let items: Arc<[T]> = options.items.into();
        warn_duplicate_keys(&key, &items, &options.accessors);
        tracing::debug!(
            "DropdownRoot {}: mounted with {} items, placement {:?}",
            key,
            items.len(),
            settings.placement
        );

        Ok(Self {
            key,
            phase: DropdownPhase::Closed,
            placement: Placement::Bottom,
            selected_item: options.selected_item,
            search_query: String::new(),
            items,
            accessors: options.accessors,
            settings,
            timing,
            on_select: options.on_select,
            on_open_change: options.on_open_change,
            nav: KeyboardNav::new(),
            scheduler: TimerScheduler::new(env.clock),
            pending: None,
            host: env.host,
            outside,
            keys: KeyCapture::new(env.listeners),
            intents,
            version: 0,
            filtered: OnceCell::new(),
            context: RefCell::new(None),
        })
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn key(&self) -> &InstanceKey {
        &self.key
    }

    pub fn phase(&self) -> DropdownPhase {
        self.phase
    }

    /// True from the moment of opening until the exit animation finishes
    pub fn is_open(&self) -> bool {
        self.phase.is_open()
    }

    pub fn animation_state(&self) -> AnimationState {
        self.phase.animation_state()
    }

    /// Placement resolved at the last open
    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.selected_item.as_ref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn items(&self) -> &Arc<[T]> {
        &self.items
    }

    /// Items passing the current query, cached until items or query change
    pub fn filtered_items(&self) -> Arc<[T]> {
        Arc::clone(
            self.filtered
                .get_or_init(|| apply_filter(&self.items, &self.search_query, &self.accessors)),
        )
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.nav.focused_index()
    }

    pub fn settings(&self) -> &DropdownSettings {
        &self.settings
    }

    pub fn accessors(&self) -> &Accessors<T> {
        &self.accessors
    }

    pub fn host(&self) -> &HostBridge {
        &self.host
    }

    /// State version; changes whenever the context would change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Context for the dropdown's parts
    ///
    /// Returns the same snapshot until the state changes.
    pub fn context(&self) -> DropdownContext<T> {
        let mut cache = self.context.borrow_mut();
        if let Some(ctx) = cache.as_ref().filter(|ctx| ctx.version() == self.version) {
            return ctx.clone();
        }

        let ctx = DropdownContext::new(self.snapshot(), self.version, self.intents.clone());
        *cache = Some(ctx.clone());
        ctx
    }

    fn snapshot(&self) -> ContextSnapshot<T> {
        ContextSnapshot {
            key: self.key.clone(),
            phase: self.phase,
            placement: self.placement,
            selected_item: self.selected_item.clone(),
            search_query: self.search_query.clone(),
            items: Arc::clone(&self.items),
            filtered_items: self.filtered_items(),
            focused_index: self.nav.focused_index(),
            disabled: self.settings.disabled,
            offset: self.settings.offset,
            use_portal: self.settings.use_portal,
            close_on_select: self.settings.close_on_select,
            accessors: self.accessors.clone(),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open the dropdown
    ///
    /// From `Closed`: resolves the placement, attaches the global listeners
    /// and notifies `on_open_change(true)`. From `Closing`: cancels the exit
    /// and plays the enter animation again, keeping the placement.
    /// Already opening or open: no-op. Disabled: no-op.
    pub fn open(&mut self) -> Effects {
        let mut effects = Effects::new();
        if self.settings.disabled {
            tracing::trace!("DropdownRoot {}: open ignored, disabled", self.key);
            return effects;
        }

        let from = self.phase;
        let Some(next) = from.on_event(PhaseEvent::Open) else {
            tracing::trace!("DropdownRoot {}: open ignored in {:?}", self.key, from);
            return effects;
        };

        self.cancel_pending();
        self.phase = next;
        self.schedule(AnimationStep::EnterComplete, self.timing.enter);

        effects.push(DropdownEffect::FocusSearchInput {
            element_id: search_element_id(&self.key),
        });

        if from == DropdownPhase::Closed {
            let trigger = self.host.get_bounds(&trigger_element_id(&self.key));
            let (_, viewport_height) = self.host.viewport_size();
            self.placement = resolve_placement(self.settings.placement, trigger, viewport_height);
            self.nav.reset();
            self.attach_listeners();

            if let Some(element_id) = self.selected_element_id() {
                effects.push(DropdownEffect::ScrollIntoView { element_id });
            }
            tracing::debug!(
                "DropdownRoot {}: opening, placement {:?}",
                self.key,
                self.placement
            );
            self.touch();
            self.notify_open_change(true);
        } else {
            tracing::debug!("DropdownRoot {}: reopening during exit", self.key);
            self.touch();
        }

        effects
    }

    /// Start the exit animation
    ///
    /// No-op when closed or already closing.
    pub fn close(&mut self) {
        let Some(next) = self.phase.on_event(PhaseEvent::Close) else {
            tracing::trace!("DropdownRoot {}: close ignored in {:?}", self.key, self.phase);
            return;
        };

        self.cancel_pending();
        self.phase = next;
        self.schedule(AnimationStep::ExitComplete, self.timing.exit);
        tracing::debug!("DropdownRoot {}: closing", self.key);
        self.touch();
    }

    /// Close without the exit animation
    pub fn close_immediate(&mut self) {
        let Some(next) = self.phase.on_event(PhaseEvent::CloseImmediate) else {
            return;
        };

        self.cancel_pending();
        self.phase = next;
        self.finish_close();
    }

    /// Open when closed, close otherwise
    ///
    /// A dropdown in its exit animation still counts as open, so toggling
    /// it again is a no-op.
    pub fn toggle(&mut self) -> Effects {
        if self.phase.is_open() {
            self.close();
            Effects::new()
        } else {
            self.open()
        }
    }

    /// Controlled open state
    ///
    /// `true` opens (and focuses the search input); `false` closes
    /// immediately, without the exit animation.
    pub fn set_is_open(&mut self, open: bool) -> Effects {
        if open {
            self.open()
        } else {
            self.close_immediate();
            Effects::new()
        }
    }

    fn finish_close(&mut self) {
        self.search_query.clear();
        self.nav.reset();
        self.detach_listeners();
        self.filtered.take();
        tracing::debug!("DropdownRoot {}: closed", self.key);
        self.touch();
        self.notify_open_change(false);
    }

    fn complete_animation(&mut self, id: TimerId, step: AnimationStep) {
        if self.pending.as_ref().map(TimerHandle::id) != Some(id) {
            tracing::trace!("DropdownRoot {}: stale timer {:?}", self.key, id);
            return;
        }
        self.pending = None;

        let expected = match step {
            AnimationStep::EnterComplete => DropdownPhase::Opening,
            AnimationStep::ExitComplete => DropdownPhase::Closing,
        };
        if self.phase != expected {
            return;
        }
        let Some(next) = self.phase.on_event(PhaseEvent::AnimationComplete) else {
            return;
        };

        self.phase = next;
        if next == DropdownPhase::Closed {
            self.finish_close();
        } else {
            tracing::debug!("DropdownRoot {}: open", self.key);
            self.touch();
        }
    }

    // =========================================================================
    // Selection and search
    // =========================================================================

    /// Pick an item
    ///
    /// Disabled items are ignored. Otherwise the item becomes the
    /// selection, `on_select` runs, and the dropdown closes if
    /// `close_on_select` is set.
    pub fn select(&mut self, item: T) {
        if self.accessors.is_disabled(&item) {
            tracing::trace!(
                "DropdownRoot {}: ignoring disabled item {}",
                self.key,
                self.accessors.key(&item)
            );
            return;
        }

        tracing::debug!(
            "DropdownRoot {}: selected {}",
            self.key,
            self.accessors.key(&item)
        );
        self.selected_item = Some(item);
        self.touch();

        if let (Some(on_select), Some(item)) = (self.on_select.clone(), self.selected_item.as_ref()) {
            on_select(item);
        }
        if self.settings.close_on_select {
            self.close();
        }
    }

    /// Replace the selection without running `on_select`
    pub fn set_selected_item(&mut self, item: Option<T>) {
        let same = match (&self.selected_item, &item) {
            (None, None) => true,
            (Some(current), Some(next)) => self.accessors.key(current) == self.accessors.key(next),
            _ => false,
        };
        if same {
            return;
        }
        self.selected_item = item;
        self.touch();
    }

    /// Update the search query
    ///
    /// Ignored while closed; the query is always empty then.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        if !self.phase.is_open() {
            tracing::trace!("DropdownRoot {}: query ignored while closed", self.key);
            return;
        }
        let query = query.into();
        if query == self.search_query {
            return;
        }

        self.search_query = query;
        self.nav.reset();
        self.filtered.take();
        self.touch();
    }

    /// Replace the item list
    pub fn set_items(&mut self, items: impl Into<Arc<[T]>>) {
        self.items = items.into();
        warn_duplicate_keys(&self.key, &self.items, &self.accessors);
        self.filtered.take();
        let len = self.filtered_items().len();
        self.nav.clamp(len);
        self.touch();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if self.settings.disabled != disabled {
            self.settings.disabled = disabled;
            self.touch();
        }
    }

    /// Move the keyboard focus directly (pointer hover)
    pub fn set_focused_index(&mut self, index: Option<usize>) {
        let len = self.filtered_items().len();
        let before = self.nav.focused_index();
        self.nav.set_focused(index, len);
        if self.nav.focused_index() != before {
            self.touch();
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Handle a navigation key
    ///
    /// Only acts while open. The returned response tells the host whether to
    /// suppress the platform default.
    pub fn handle_key(&mut self, key: KeyCode) -> KeyResponse {
        if !self.phase.is_open() {
            return KeyResponse {
                handled: false,
                command: NavCommand::None,
            };
        }

        let filtered = self.filtered_items();
        let order = display_order(&filtered, &self.accessors);
        let before = self.nav.focused_index();
        let response = self.nav.handle_key_in(key, &order);
        if self.nav.focused_index() != before {
            self.touch();
        }

        match response.command {
            NavCommand::Select(index) => {
                if let Some(item) = filtered.get(index).cloned() {
                    self.select(item);
                }
            }
            NavCommand::Close => self.close(),
            NavCommand::None => {}
        }
        response
    }

    /// Handle a pointer press directly, without the listener registry
    ///
    /// Returns true if the press was outside and started a close.
    pub fn handle_pointer_down(&mut self, event: &PointerEvent) -> bool {
        if !self.phase.is_open() || !self.outside.is_outside(event) {
            return false;
        }
        self.close();
        true
    }

    /// Region (trigger plus panel) that does not count as outside
    pub fn set_boundary(&self, region: Region) {
        self.outside.set_boundary(region);
    }

    pub fn boundary(&self) -> Region {
        self.outside.boundary()
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    /// Apply fired timers and queued intents
    ///
    /// Returns the effects of every transition that ran, in order.
    pub fn update(&mut self) -> Effects {
        for (id, step) in self.scheduler.take_due() {
            self.complete_animation(id, step);
        }

        let mut effects = Effects::new();
        while let Some(intent) = self.intents.pop() {
            effects.extend(self.apply_intent(intent));
        }
        if self.phase.is_open() {
            self.sync_boundary_from_host();
        }
        effects
    }

    /// Time left until the next timer is due, if any
    ///
    /// Zero once a timer is overdue; a host loop can sleep for this long
    /// before calling `update()`.
    pub fn next_deadline(&self) -> Option<Duration> {
        let deadline = self.scheduler.next_deadline()?;
        Some(deadline.saturating_sub(self.scheduler.now()))
    }

    /// Whether `update()` has anything to do now or later
    pub fn has_pending_work(&self) -> bool {
        !self.intents.is_empty() || self.scheduler.pending_count() > 0
    }

    /// Run effects against this root's host bridge
    pub fn apply_effects(&self, effects: &Effects) {
        apply_all(effects, &self.host);
    }

    /// Tear the instance down
    ///
    /// Cancels timers and removes global listeners; callbacks never fire
    /// afterwards. Dropping the root does the same.
    pub fn unmount(self) {
        tracing::debug!("DropdownRoot {}: unmount", self.key);
    }

    fn apply_intent(&mut self, intent: Intent<T>) -> Effects {
        match intent {
            Intent::Open => return self.open(),
            Intent::Toggle => return self.toggle(),
            Intent::SetIsOpen(open) => return self.set_is_open(open),
            Intent::Close => self.close(),
            Intent::CloseImmediate => self.close_immediate(),
            Intent::Select(item) => self.select(item),
            Intent::SetSelectedItem(item) => self.set_selected_item(item),
            Intent::SetSearchQuery(query) => self.set_search_query(query),
            Intent::SetFocusedIndex(index) => self.set_focused_index(index),
            Intent::Key(key) => {
                self.handle_key(key);
            }
        }
        Effects::new()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn touch(&mut self) {
        self.version += 1;
    }

    fn schedule(&mut self, step: AnimationStep, delay: Duration) {
        self.pending = Some(self.scheduler.schedule(delay, step));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }

    fn notify_open_change(&self, open: bool) {
        if let Some(on_open_change) = &self.on_open_change {
            on_open_change(open);
        }
    }

    fn attach_listeners(&mut self) {
        let queue = self.intents.clone();
        self.keys.attach(move |key| queue.push(Intent::Key(key)));
        self.sync_boundary_from_host();
        self.outside.sync(true);
    }

    fn detach_listeners(&mut self) {
        self.outside.sync(false);
        self.keys.detach();
    }

    /// Rebuild the boundary from the host's layout, when it knows any of it
    fn sync_boundary_from_host(&self) {
        let rects: Vec<_> = [trigger_element_id(&self.key), content_element_id(&self.key)]
            .iter()
            .filter_map(|id| self.host.get_bounds(id))
            .collect();
        if rects.is_empty() {
            return;
        }
        let mut region = Region::new();
        for rect in rects {
            region.push(rect);
        }
        self.outside.set_boundary(region);
    }

    /// Row id of the selected item, if it is in the visible list
    fn selected_element_id(&self) -> Option<String> {
        let selected = self.selected_item.as_ref()?;
        let selected_key = self.accessors.key(selected);
        self.filtered_items()
            .iter()
            .any(|item| self.accessors.key(item) == selected_key)
            .then(|| item_element_id(&self.key, &selected_key))
    }
}

impl<T> Drop for DropdownRoot<T> {
    fn drop(&mut self) {
        let canceled = self.scheduler.cancel_all();
        self.outside.detach();
        self.keys.detach();
        if canceled > 0 {
            tracing::trace!("DropdownRoot {}: dropped {} pending timers", self.key, canceled);
        }
    }
}

fn warn_duplicate_keys<T>(key: &InstanceKey, items: &[T], accessors: &Accessors<T>) {
    let mut seen = FxHashSet::default();
    for item in items {
        let item_key = accessors.key(item);
        if seen.contains(&item_key) {
            tracing::warn!(
                "DropdownRoot {}: duplicate item key {:?}; selection and focus may misbehave",
                key,
                item_key
            );
        } else {
            seen.insert(item_key);
        }
    }
}
