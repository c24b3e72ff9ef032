//! Search filtering
//!
//! The default filter keeps items whose display text contains the trimmed
//! query, case-insensitively, in their original order. A custom
//! [`FilterFn`](crate::accessors::FilterFn) replaces it entirely.

use std::sync::Arc;

use crate::accessors::Accessors;

/// Case-insensitive substring match against an already trimmed query
pub fn matches(display: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    display.to_lowercase().contains(&query.to_lowercase())
}

/// Filter `items` by `query` using `display` as the searchable text
///
/// A query that is empty after trimming keeps every item.
pub fn default_filter<T, F>(items: &[T], query: &str, display: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> String,
{
    let query = query.trim();
    if query.is_empty() {
        return items.to_vec();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| display(item).to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Apply the configured filter to a shared item list
///
/// With the default filter and a blank query the input list is returned as
/// is, so consumers comparing by pointer see no change.
pub(crate) fn apply_filter<T: Clone>(
    items: &Arc<[T]>,
    query: &str,
    accessors: &Accessors<T>,
) -> Arc<[T]> {
    if let Some(custom) = accessors.filter_fn() {
        return custom(items, query).into();
    }
    if query.trim().is_empty() {
        return Arc::clone(items);
    }
    default_filter(items, query, |item| accessors.display(item)).into()
}
