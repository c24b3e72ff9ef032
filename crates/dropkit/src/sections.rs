//! Section grouping
//!
//! Partitions items into labeled sections by the section accessor. Sections
//! appear in first-seen order, items keep their relative order inside each
//! section, and items without a section are collected separately.

use indexmap::IndexMap;

use crate::accessors::{Accessors, SectionFn, SectionMeta};

/// A labeled group of items
#[derive(Clone, Debug, PartialEq)]
pub struct Section<T> {
    /// Metadata taken from the first item seen with this section key
    pub meta: SectionMeta,
    /// Items in their original relative order
    pub items: Vec<T>,
}

/// Result of grouping
#[derive(Clone, Debug, PartialEq)]
pub struct GroupedItems<T> {
    /// Sections in first-seen order
    pub sections: Vec<Section<T>>,
    /// Items without a section
    pub ungrouped: Vec<T>,
}

impl<T> Default for GroupedItems<T> {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            ungrouped: Vec::new(),
        }
    }
}

impl<T> GroupedItems<T> {
    /// Total number of items across sections and the ungrouped bucket
    pub fn len(&self) -> usize {
        self.ungrouped.len() + self.sections.iter().map(|s| s.items.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any item carried a section
    pub fn has_sections(&self) -> bool {
        !self.sections.is_empty()
    }
}

/// Group items by the section accessor
///
/// Without an accessor every item is ungrouped.
pub fn group_items<T: Clone>(items: &[T], section_of: Option<&SectionFn<T>>) -> GroupedItems<T> {
    match section_of {
        Some(section_of) => group_by(items.iter().cloned(), |item| section_of(item)),
        None => GroupedItems {
            sections: Vec::new(),
            ungrouped: items.to_vec(),
        },
    }
}

/// Indices of `items` in the order the list shows them
///
/// Ungrouped items first, then each section in first-seen order. Without a
/// section accessor this is plain index order.
pub(crate) fn display_order<T>(items: &[T], accessors: &Accessors<T>) -> Vec<usize> {
    let grouped = group_by(0..items.len(), |&i| accessors.section(&items[i]));
    let mut order = grouped.ungrouped;
    for section in grouped.sections {
        order.extend(section.items);
    }
    order
}

/// Group any sequence by a section lookup
pub(crate) fn group_by<I, F>(items: impl IntoIterator<Item = I>, section_of: F) -> GroupedItems<I>
where
    F: Fn(&I) -> Option<SectionMeta>,
{
    let mut buckets: IndexMap<String, Section<I>> = IndexMap::new();
    let mut ungrouped = Vec::new();

    for item in items {
        match section_of(&item) {
            Some(meta) => {
                buckets
                    .entry(meta.key.clone())
                    .or_insert_with(|| Section {
                        meta,
                        items: Vec::new(),
                    })
                    .items
                    .push(item);
            }
            None => ungrouped.push(item),
        }
    }

    GroupedItems {
        sections: buckets.into_values().collect(),
        ungrouped,
    }
}
