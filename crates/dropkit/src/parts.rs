//! Headless part models
//!
//! Each visual part of a dropdown (trigger, panel, search box, list,
//! header and footer slots) gets a plain data model built from the shared
//! context. A rendering layer turns these into its own elements; nothing
//! here draws.
//!
//! List rows come out in render order: ungrouped items first, then each
//! section behind its header. When the panel opens upward the whole row
//! sequence is reversed, so the first item stays closest to the trigger.

use dropkit_core::Bounds;

use crate::accessors::{ItemIcon, SectionMeta};
use crate::context::DropdownContext;
use crate::placement::{anchor_point, Placement};
use crate::sections::group_by;
use crate::state::AnimationState;

/// Model of the trigger button
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerModel {
    pub element_id: String,
    /// Selected item's display text, or the placeholder
    pub label: String,
    pub is_placeholder: bool,
    /// The panel is showing (aria-expanded)
    pub expanded: bool,
    pub disabled: bool,
}

impl TriggerModel {
    pub fn from_context<T>(ctx: &DropdownContext<T>, placeholder: &str) -> Self {
        let (label, is_placeholder) = match ctx.selected_item() {
            Some(item) => (ctx.accessors().display(item), false),
            None => (placeholder.to_string(), true),
        };
        Self {
            element_id: ctx.trigger_id(),
            label,
            is_placeholder,
            expanded: ctx.is_open(),
            disabled: ctx.is_disabled(),
        }
    }

    /// Trigger activation (click, enter, space)
    pub fn press<T>(&self, ctx: &DropdownContext<T>) {
        if !self.disabled {
            ctx.toggle();
        }
    }
}

/// Model of the floating panel
#[derive(Clone, Debug, PartialEq)]
pub struct ContentModel {
    pub element_id: String,
    /// Mounted; stays true during the exit animation
    pub visible: bool,
    pub placement: Placement,
    pub offset: f32,
    pub use_portal: bool,
    pub animation_state: AnimationState,
}

impl ContentModel {
    pub fn from_context<T>(ctx: &DropdownContext<T>) -> Self {
        Self {
            element_id: ctx.content_id(),
            visible: ctx.is_open(),
            placement: ctx.placement(),
            offset: ctx.offset(),
            use_portal: ctx.use_portal(),
            animation_state: ctx.animation_state(),
        }
    }

    /// Where the panel attaches for a given trigger rectangle
    pub fn anchor(&self, trigger: Bounds) -> (f32, f32) {
        anchor_point(trigger, self.placement, self.offset)
    }
}

/// Model of the search input
#[derive(Clone, Debug, PartialEq)]
pub struct SearchBoxModel {
    pub element_id: String,
    pub query: String,
    pub visible: bool,
}

impl SearchBoxModel {
    pub fn from_context<T>(ctx: &DropdownContext<T>) -> Self {
        Self {
            element_id: ctx.search_id(),
            query: ctx.search_query().to_string(),
            visible: ctx.is_open(),
        }
    }

    /// Text typed into the input
    pub fn input<T>(&self, ctx: &DropdownContext<T>, text: impl Into<String>) {
        ctx.set_search_query(text);
    }
}

/// One selectable row
#[derive(Clone, Debug, PartialEq)]
pub struct ItemRow<T> {
    pub item: T,
    /// Position in the filtered list
    pub index: usize,
    pub key: String,
    pub element_id: String,
    pub label: String,
    pub description: Option<String>,
    pub icon: Option<ItemIcon>,
    pub class_name: Option<String>,
    pub is_selected: bool,
    pub is_disabled: bool,
    /// Keyboard focus is on this row
    pub is_focused: bool,
}

impl<T: Clone> ItemRow<T> {
    /// Row clicked
    pub fn press(&self, ctx: &DropdownContext<T>) {
        if !self.is_disabled {
            ctx.select(self.item.clone());
        }
    }

    /// Pointer entered the row
    pub fn hover(&self, ctx: &DropdownContext<T>) {
        ctx.set_focused_index(Some(self.index));
    }
}

/// A rendered line of the list
#[derive(Clone, Debug, PartialEq)]
pub enum ListRow<T> {
    SectionHeader(SectionMeta),
    Item(ItemRow<T>),
    Separator,
    /// Nothing matches the query
    Empty,
}

/// Model of the item list
#[derive(Clone, Debug, PartialEq)]
pub struct ListModel<T> {
    pub rows: Vec<ListRow<T>>,
}

impl<T: Clone> ListModel<T> {
    pub fn from_context(ctx: &DropdownContext<T>) -> Self {
        let accessors = ctx.accessors();
        let filtered = ctx.filtered_items();
        if filtered.is_empty() {
            return Self {
                rows: vec![ListRow::Empty],
            };
        }

        let build_row = |index: usize, item: &T| {
            let key = accessors.key(item);
            let is_selected = ctx.is_selected(item);
            let is_disabled = accessors.is_disabled(item);
            ItemRow {
                item: item.clone(),
                index,
                element_id: ctx.item_id(item),
                label: accessors.display(item),
                description: accessors.description(item),
                icon: accessors.icon(item),
                class_name: accessors.class_name(item, is_selected, is_disabled),
                is_selected,
                is_disabled,
                is_focused: ctx.focused_index() == Some(index),
                key,
            }
        };

        let mut rows = Vec::with_capacity(filtered.len());
        let push_item = |rows: &mut Vec<ListRow<T>>, index: usize, item: &T| {
            rows.push(ListRow::Item(build_row(index, item)));
            if accessors.separator_after(item, index) {
                rows.push(ListRow::Separator);
            }
        };

        let grouped = group_by(filtered.iter().enumerate(), |(_, item)| accessors.section(item));
        for (index, item) in grouped.ungrouped {
            push_item(&mut rows, index, item);
        }
        for section in grouped.sections {
            rows.push(ListRow::SectionHeader(section.meta));
            for (index, item) in section.items {
                push_item(&mut rows, index, item);
            }
        }

        if ctx.placement().is_top() {
            rows.reverse();
        }
        Self { rows }
    }

    pub fn item_rows(&self) -> impl Iterator<Item = &ItemRow<T>> {
        self.rows.iter().filter_map(|row| match row {
            ListRow::Item(item) => Some(item),
            _ => None,
        })
    }

    /// Whether the list shows the no-results state
    pub fn is_empty(&self) -> bool {
        matches!(self.rows.as_slice(), [ListRow::Empty])
    }
}

/// Data for the header and footer slots
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotModel {
    pub total: usize,
    pub filtered: usize,
    pub query: String,
    pub is_open: bool,
}

/// Header slot above the list
pub type HeaderModel = SlotModel;

/// Footer slot below the list
pub type FooterModel = SlotModel;

impl SlotModel {
    pub fn from_context<T>(ctx: &DropdownContext<T>) -> Self {
        Self {
            total: ctx.items().len(),
            filtered: ctx.filtered_items().len(),
            query: ctx.search_query().to_string(),
            is_open: ctx.is_open(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DropdownEnv, DropdownOptions, DropdownRoot, PlacementMode};
    use dropkit_core::InstanceKey;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: &'static str,
        group: Option<&'static str>,
    }

    fn item(id: &'static str, group: Option<&'static str>) -> Item {
        Item { id, group }
    }

    fn root_with(
        items: Vec<Item>,
        configure: impl FnOnce(DropdownOptions<Item>) -> DropdownOptions<Item>,
    ) -> DropdownRoot<Item> {
        let options = DropdownOptions::new(|i: &Item| i.id.to_string(), |i: &Item| i.id.to_uppercase())
            .items(items)
            .get_item_section(|i: &Item| i.group.map(|g| SectionMeta::new(g, g)));
        DropdownRoot::mount(
            configure(options),
            DropdownEnv::new().key(InstanceKey::explicit("list")),
        )
        .unwrap()
    }

    fn shape(list: &ListModel<Item>) -> Vec<String> {
        list.rows
            .iter()
            .map(|row| match row {
                ListRow::SectionHeader(meta) => format!("#{}", meta.key),
                ListRow::Item(row) => row.key.clone(),
                ListRow::Separator => "--".to_string(),
                ListRow::Empty => "(empty)".to_string(),
            })
            .collect()
    }

    fn sample() -> Vec<Item> {
        vec![
            item("kiwi", Some("fruit")),
            item("salt", None),
            item("leek", Some("veg")),
            item("fig", Some("fruit")),
        ]
    }

    #[test]
    fn test_rows_in_render_order() {
        let mut root = root_with(sample(), |o| o);
        root.open();
        let list = ListModel::from_context(&root.context());
        assert_eq!(
            shape(&list),
            vec!["salt", "#fruit", "kiwi", "fig", "#veg", "leek"]
        );

        let fig = list.item_rows().find(|r| r.key == "fig").unwrap();
        assert_eq!(fig.index, 3);
        assert_eq!(fig.label, "FIG");
        assert_eq!(fig.element_id, "list_item_fig");
    }

    #[test]
    fn test_top_placement_reverses_rows() {
        let mut root = root_with(sample(), |o| o.placement(PlacementMode::Top));
        root.open();
        let list = ListModel::from_context(&root.context());
        assert_eq!(
            shape(&list),
            vec!["leek", "#veg", "fig", "kiwi", "#fruit", "salt"]
        );
    }

    #[test]
    fn test_separators_follow_items() {
        let mut root = root_with(
            vec![item("a", None), item("b", None), item("c", None)],
            |o| o.get_item_separator(|_, index| index == 0),
        );
        root.open();
        let list = ListModel::from_context(&root.context());
        assert_eq!(shape(&list), vec!["a", "--", "b", "c"]);
    }

    #[test]
    fn test_empty_state() {
        let mut root = root_with(sample(), |o| o);
        root.open();
        root.set_search_query("zzz");
        let ctx = root.context();
        let list = ListModel::from_context(&ctx);
        assert!(list.is_empty());
        assert_eq!(list.item_rows().count(), 0);

        let footer = FooterModel::from_context(&ctx);
        assert_eq!((footer.total, footer.filtered), (4, 0));
        assert_eq!(footer.query, "zzz");
    }

    #[test]
    fn test_row_flags() {
        let mut root = root_with(sample(), |o| {
            o.selected_item(item("leek", Some("veg")))
                .get_item_disabled(|i: &Item| i.id == "salt")
                .get_item_class_name(|_, selected, disabled| {
                    format!("row{}{}", if selected { " sel" } else { "" }, if disabled { " off" } else { "" })
                })
        });
        root.open();
        root.handle_key(dropkit_core::KeyCode::ArrowDown);

        let list = ListModel::from_context(&root.context());
        let rows: Vec<_> = list.item_rows().collect();
        let kiwi = rows.iter().find(|r| r.key == "kiwi").unwrap();
        let salt = rows.iter().find(|r| r.key == "salt").unwrap();
        let leek = rows.iter().find(|r| r.key == "leek").unwrap();

        // first row shown, not first filtered index
        assert!(salt.is_focused);
        assert!(!kiwi.is_focused);
        assert!(salt.is_disabled);
        assert_eq!(salt.class_name.as_deref(), Some("row off"));
        assert!(leek.is_selected);
        assert_eq!(leek.class_name.as_deref(), Some("row sel"));
    }

    #[test]
    fn test_row_press_and_hover_dispatch() {
        let mut root = root_with(sample(), |o| o.get_item_disabled(|i: &Item| i.id == "salt"));
        root.open();

        let list = ListModel::from_context(&root.context());
        let ctx = root.context();
        for row in list.item_rows() {
            if row.key == "salt" {
                row.press(&ctx);
            }
            if row.key == "leek" {
                row.hover(&ctx);
            }
        }
        root.update();
        assert_eq!(root.selected_item(), None);
        assert_eq!(root.focused_index(), Some(2));

        let list = ListModel::from_context(&root.context());
        let fig = list.item_rows().find(|r| r.key == "fig").unwrap().clone();
        fig.press(&root.context());
        root.update();
        assert_eq!(root.selected_item().map(|i| i.id), Some("fig"));
    }

    #[test]
    fn test_trigger_and_search_models() {
        let mut root = root_with(sample(), |o| o);
        let trigger = TriggerModel::from_context(&root.context(), "Pick one");
        assert_eq!(trigger.label, "Pick one");
        assert!(trigger.is_placeholder);
        assert!(!trigger.expanded);
        assert_eq!(trigger.element_id, "list_trigger");

        trigger.press(&root.context());
        root.update();
        assert!(root.is_open());

        let ctx = root.context();
        let search = SearchBoxModel::from_context(&ctx);
        assert!(search.visible);
        search.input(&ctx, "ki");
        root.update();
        assert_eq!(SearchBoxModel::from_context(&root.context()).query, "ki");

        root.set_selected_item(Some(item("fig", Some("fruit"))));
        let trigger = TriggerModel::from_context(&root.context(), "Pick one");
        assert_eq!(trigger.label, "FIG");
        assert!(trigger.expanded);
    }

    #[test]
    fn test_content_model() {
        let mut root = root_with(sample(), |o| o.offset(8.0).use_portal(true));
        root.open();
        let content = ContentModel::from_context(&root.context());
        assert!(content.visible);
        assert!(content.use_portal);
        assert_eq!(content.animation_state, AnimationState::Entering);
        assert_eq!(
            content.anchor(Bounds::new(10.0, 10.0, 100.0, 30.0)),
            (10.0, 48.0)
        );
    }
}
