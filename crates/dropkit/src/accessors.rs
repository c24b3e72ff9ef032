//! Item accessors
//!
//! Items are opaque to the dropdown. Everything it needs to know about an
//! item (identity, label, grouping, styling) comes from caller-supplied
//! accessor functions bundled in [`Accessors`].
//!
//! Only `key` and `display` are required. Every optional accessor that is
//! left unset simply turns its feature off: no descriptions, no sections,
//! no separators, nothing disabled.

use std::any::Any;
use std::sync::Arc;

/// Item identity (must be unique within the current collection)
pub type KeyFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Human-readable item label
pub type DisplayFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Secondary text under the label
pub type DescriptionFn<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Icon fragment for an item
pub type IconFn<T> = Arc<dyn Fn(&T) -> Option<ItemIcon> + Send + Sync>;

/// Section an item belongs to
pub type SectionFn<T> = Arc<dyn Fn(&T) -> Option<SectionMeta> + Send + Sync>;

/// Whether a separator follows the item at the given index
pub type SeparatorFn<T> = Arc<dyn Fn(&T, usize) -> bool + Send + Sync>;

/// Whether an item can be selected
pub type DisabledFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Styling hook: (item, is_selected, is_disabled) -> class name
pub type ClassNameFn<T> = Arc<dyn Fn(&T, bool, bool) -> String + Send + Sync>;

/// Replacement for the default substring filter
pub type FilterFn<T> = Arc<dyn Fn(&[T], &str) -> Vec<T> + Send + Sync>;

/// Opaque icon fragment
///
/// The dropdown never looks inside; the rendering layer downcasts it back to
/// whatever it stored (an SVG string, an image id, a prebuilt element).
#[derive(Clone)]
pub struct ItemIcon(Arc<dyn Any + Send + Sync>);

impl ItemIcon {
    /// Wrap any value as an icon fragment
    pub fn new<V: Any + Send + Sync>(value: V) -> Self {
        Self(Arc::new(value))
    }

    /// Get the wrapped value back
    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.0.downcast_ref::<V>()
    }
}

impl PartialEq for ItemIcon {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for ItemIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ItemIcon(..)")
    }
}

/// Metadata of a labeled group of items
#[derive(Clone, Debug, PartialEq)]
pub struct SectionMeta {
    /// Grouping identity; items with equal keys share a section
    pub key: String,
    /// Header label
    pub label: String,
    /// Optional header description
    pub description: Option<String>,
    /// Optional header icon
    pub icon: Option<ItemIcon>,
}

impl SectionMeta {
    /// Create a section with a key and label
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: None,
            icon: None,
        }
    }

    /// Set the header description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the header icon
    pub fn icon(mut self, icon: ItemIcon) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// Bundle of accessor functions for item type `T`
pub struct Accessors<T> {
    pub(crate) key: KeyFn<T>,
    pub(crate) display: DisplayFn<T>,
    pub(crate) description: Option<DescriptionFn<T>>,
    pub(crate) icon: Option<IconFn<T>>,
    pub(crate) section: Option<SectionFn<T>>,
    pub(crate) separator: Option<SeparatorFn<T>>,
    pub(crate) disabled: Option<DisabledFn<T>>,
    pub(crate) class_name: Option<ClassNameFn<T>>,
    pub(crate) filter: Option<FilterFn<T>>,
}

impl<T> Clone for Accessors<T> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            display: Arc::clone(&self.display),
            description: self.description.clone(),
            icon: self.icon.clone(),
            section: self.section.clone(),
            separator: self.separator.clone(),
            disabled: self.disabled.clone(),
            class_name: self.class_name.clone(),
            filter: self.filter.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Accessors<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessors")
            .field("description", &self.description.is_some())
            .field("icon", &self.icon.is_some())
            .field("section", &self.section.is_some())
            .field("separator", &self.separator.is_some())
            .field("disabled", &self.disabled.is_some())
            .field("class_name", &self.class_name.is_some())
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

impl<T> Accessors<T> {
    /// Create a bundle with the two required accessors
    pub fn new<K, D>(key: K, display: D) -> Self
    where
        K: Fn(&T) -> String + Send + Sync + 'static,
        D: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            key: Arc::new(key),
            display: Arc::new(display),
            description: None,
            icon: None,
            section: None,
            separator: None,
            disabled: None,
            class_name: None,
            filter: None,
        }
    }

    /// Item identity
    pub fn key(&self, item: &T) -> String {
        (self.key)(item)
    }

    /// Item label
    pub fn display(&self, item: &T) -> String {
        (self.display)(item)
    }

    /// Item description, if a description accessor is set
    pub fn description(&self, item: &T) -> Option<String> {
        self.description.as_ref().and_then(|f| f(item))
    }

    /// Item icon, if an icon accessor is set
    pub fn icon(&self, item: &T) -> Option<ItemIcon> {
        self.icon.as_ref().and_then(|f| f(item))
    }

    /// Item section, if a section accessor is set
    pub fn section(&self, item: &T) -> Option<SectionMeta> {
        self.section.as_ref().and_then(|f| f(item))
    }

    /// The section accessor itself
    pub fn section_fn(&self) -> Option<&SectionFn<T>> {
        self.section.as_ref()
    }

    /// Whether a separator follows this item
    pub fn separator_after(&self, item: &T, index: usize) -> bool {
        self.separator.as_ref().is_some_and(|f| f(item, index))
    }

    /// Whether the item is disabled
    pub fn is_disabled(&self, item: &T) -> bool {
        self.disabled.as_ref().is_some_and(|f| f(item))
    }

    /// Class name for the item, if a class name accessor is set
    pub fn class_name(&self, item: &T, is_selected: bool, is_disabled: bool) -> Option<String> {
        self.class_name
            .as_ref()
            .map(|f| f(item, is_selected, is_disabled))
    }

    /// The custom filter, if one replaces the default
    pub fn filter_fn(&self) -> Option<&FilterFn<T>> {
        self.filter.as_ref()
    }
}
