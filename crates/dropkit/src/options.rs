//! Dropdown configuration
//!
//! [`DropdownOptions`] is the builder a caller fills in before mounting a
//! [`DropdownRoot`](crate::DropdownRoot): items, initial selection,
//! callbacks, accessors and the plain-data [`DropdownSettings`].
//!
//! `DropdownSettings` can also be loaded from a config file. Keys are
//! accepted in camelCase or snake_case, and the legacy `dropdownPlacement`
//! key is still honored (with a deprecation warning) when `placement` is
//! absent.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use dropkit_animation::AnimationTiming;

use crate::accessors::{Accessors, ItemIcon, SectionMeta};
use crate::error::{DropdownError, Result};
use crate::placement::PlacementMode;

/// Called with the item the user picked
pub type SelectCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Called when the dropdown opens (`true`) or finishes closing (`false`)
pub type OpenChangeCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Default gap between trigger and panel, in logical pixels
pub const DEFAULT_OFFSET: f32 = 4.0;

/// Plain-data dropdown settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSettings", rename_all = "camelCase")]
pub struct DropdownSettings {
    /// Requested panel placement
    pub placement: PlacementMode,
    /// Gap between trigger and panel
    pub offset: f32,
    /// Close after a selection
    pub close_on_select: bool,
    /// Render the panel in a detached top-level layer
    pub use_portal: bool,
    /// Disable the whole dropdown
    pub disabled: bool,
    /// Enter animation length in seconds
    pub enter_duration: f32,
    /// Exit animation length in seconds
    pub exit_duration: f32,
}

impl Default for DropdownSettings {
    fn default() -> Self {
        let timing = AnimationTiming::dropdown();
        Self {
            placement: PlacementMode::Bottom,
            offset: DEFAULT_OFFSET,
            close_on_select: true,
            use_portal: false,
            disabled: false,
            enter_duration: timing.enter.as_secs_f32(),
            exit_duration: timing.exit.as_secs_f32(),
        }
    }
}

impl DropdownSettings {
    /// Check values and build the animation timing
    pub fn validate(&self) -> Result<AnimationTiming> {
        if !self.offset.is_finite() {
            return Err(DropdownError::InvalidSettings(format!(
                "offset must be finite (got {})",
                self.offset
            )));
        }
        Ok(AnimationTiming::from_secs(
            self.enter_duration,
            self.exit_duration,
        )?)
    }
}

/// Wire form of the settings, before normalization
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RawSettings {
    placement: Option<PlacementMode>,
    #[serde(alias = "dropdown_placement")]
    dropdown_placement: Option<PlacementMode>,
    offset: Option<f32>,
    #[serde(alias = "close_on_select")]
    close_on_select: Option<bool>,
    #[serde(alias = "use_portal")]
    use_portal: Option<bool>,
    disabled: Option<bool>,
    #[serde(alias = "enter_duration")]
    enter_duration: Option<f32>,
    #[serde(alias = "exit_duration")]
    exit_duration: Option<f32>,
}

impl From<RawSettings> for DropdownSettings {
    fn from(raw: RawSettings) -> Self {
        let defaults = DropdownSettings::default();
        Self {
            placement: normalize_placement(raw.placement, raw.dropdown_placement)
                .unwrap_or(defaults.placement),
            offset: raw.offset.unwrap_or(defaults.offset),
            close_on_select: raw.close_on_select.unwrap_or(defaults.close_on_select),
            use_portal: raw.use_portal.unwrap_or(defaults.use_portal),
            disabled: raw.disabled.unwrap_or(defaults.disabled),
            enter_duration: raw.enter_duration.unwrap_or(defaults.enter_duration),
            exit_duration: raw.exit_duration.unwrap_or(defaults.exit_duration),
        }
    }
}

/// Merge the canonical placement with the legacy alias
///
/// The canonical value wins when both are present.
pub fn normalize_placement(
    placement: Option<PlacementMode>,
    legacy: Option<PlacementMode>,
) -> Option<PlacementMode> {
    match (placement, legacy) {
        (Some(placement), Some(legacy)) => {
            if placement != legacy {
                tracing::warn!(
                    "dropdownPlacement ({:?}) ignored in favor of placement ({:?})",
                    legacy,
                    placement
                );
            }
            Some(placement)
        }
        (Some(placement), None) => Some(placement),
        (None, Some(legacy)) => {
            tracing::warn!("dropdownPlacement is deprecated, use placement instead");
            Some(legacy)
        }
        (None, None) => None,
    }
}

/// Builder for a dropdown instance
pub struct DropdownOptions<T> {
    pub(crate) items: Vec<T>,
    pub(crate) selected_item: Option<T>,
    pub(crate) on_select: Option<SelectCallback<T>>,
    pub(crate) on_open_change: Option<OpenChangeCallback>,
    pub(crate) accessors: Accessors<T>,
    pub(crate) settings: DropdownSettings,
    pub(crate) placement: Option<PlacementMode>,
    pub(crate) legacy_placement: Option<PlacementMode>,
}

impl<T> std::fmt::Debug for DropdownOptions<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropdownOptions")
            .field("items", &self.items.len())
            .field("has_selection", &self.selected_item.is_some())
            .field("accessors", &self.accessors)
            .field("settings", &self.settings)
            .finish()
    }
}

impl<T> DropdownOptions<T> {
    /// Start with the two required accessors
    pub fn new<K, D>(get_item_key: K, get_item_display: D) -> Self
    where
        K: Fn(&T) -> String + Send + Sync + 'static,
        D: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            items: Vec::new(),
            selected_item: None,
            on_select: None,
            on_open_change: None,
            accessors: Accessors::new(get_item_key, get_item_display),
            settings: DropdownSettings::default(),
            placement: None,
            legacy_placement: None,
        }
    }

    /// Items to choose from
    pub fn items(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    /// Initial selection
    ///
    /// Only read at mount time.
    pub fn selected_item(mut self, item: T) -> Self {
        self.selected_item = Some(item);
        self
    }

    pub fn on_select<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_select = Some(Arc::new(f));
        self
    }

    pub fn on_open_change<F>(mut self, f: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on_open_change = Some(Arc::new(f));
        self
    }

    pub fn get_item_description<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.accessors.description = Some(Arc::new(f));
        self
    }

    pub fn get_item_icon<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Option<ItemIcon> + Send + Sync + 'static,
    {
        self.accessors.icon = Some(Arc::new(f));
        self
    }

    pub fn get_item_section<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Option<SectionMeta> + Send + Sync + 'static,
    {
        self.accessors.section = Some(Arc::new(f));
        self
    }

    pub fn get_item_separator<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, usize) -> bool + Send + Sync + 'static,
    {
        self.accessors.separator = Some(Arc::new(f));
        self
    }

    pub fn get_item_disabled<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.accessors.disabled = Some(Arc::new(f));
        self
    }

    /// Class name hook, called with (item, is_selected, is_disabled)
    pub fn get_item_class_name<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, bool, bool) -> String + Send + Sync + 'static,
    {
        self.accessors.class_name = Some(Arc::new(f));
        self
    }

    /// Replace the default case-insensitive substring filter
    pub fn filter_items<F>(mut self, f: F) -> Self
    where
        F: Fn(&[T], &str) -> Vec<T> + Send + Sync + 'static,
    {
        self.accessors.filter = Some(Arc::new(f));
        self
    }

    pub fn placement(mut self, placement: PlacementMode) -> Self {
        self.placement = Some(placement);
        self
    }

    /// Legacy name of [`placement`](Self::placement)
    #[deprecated(note = "use `placement` instead")]
    pub fn dropdown_placement(mut self, placement: PlacementMode) -> Self {
        self.legacy_placement = Some(placement);
        self
    }

    pub fn offset(mut self, offset: f32) -> Self {
        self.settings.offset = offset;
        self
    }

    pub fn close_on_select(mut self, close: bool) -> Self {
        self.settings.close_on_select = close;
        self
    }

    pub fn use_portal(mut self, use_portal: bool) -> Self {
        self.settings.use_portal = use_portal;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.settings.disabled = disabled;
        self
    }

    /// Enter animation length in seconds
    pub fn enter_duration(mut self, seconds: f32) -> Self {
        self.settings.enter_duration = seconds;
        self
    }

    /// Exit animation length in seconds
    pub fn exit_duration(mut self, seconds: f32) -> Self {
        self.settings.exit_duration = seconds;
        self
    }

    /// Apply a whole settings block, e.g. one loaded from a config file
    ///
    /// Replaces every plain-data option set so far, placement included.
    pub fn settings(mut self, settings: DropdownSettings) -> Self {
        self.settings = settings;
        self.placement = None;
        self.legacy_placement = None;
        self
    }

    /// Settings with builder-level placement overrides folded in
    pub(crate) fn resolved_settings(&self) -> DropdownSettings {
        let mut settings = self.settings.clone();
        if let Some(placement) = normalize_placement(self.placement, self.legacy_placement) {
            settings.placement = placement;
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> DropdownOptions<String> {
        DropdownOptions::new(|s: &String| s.clone(), |s: &String| s.clone())
    }

    #[test]
    fn test_defaults() {
        let settings = DropdownSettings::default();
        assert_eq!(settings.placement, PlacementMode::Bottom);
        assert_eq!(settings.offset, DEFAULT_OFFSET);
        assert!(settings.close_on_select);
        assert!(!settings.disabled);
        assert_eq!(settings.validate().unwrap(), AnimationTiming::dropdown());
    }

    #[test]
    fn test_builder_placement() {
        let settings = options().placement(PlacementMode::Auto).resolved_settings();
        assert_eq!(settings.placement, PlacementMode::Auto);
    }

    #[test]
    #[allow(deprecated)]
    fn test_legacy_builder_placement() {
        let settings = options().dropdown_placement(PlacementMode::Top).resolved_settings();
        assert_eq!(settings.placement, PlacementMode::Top);

        let settings = options()
            .dropdown_placement(PlacementMode::Top)
            .placement(PlacementMode::Auto)
            .resolved_settings();
        assert_eq!(settings.placement, PlacementMode::Auto);
    }

    #[test]
    fn test_normalize_placement() {
        assert_eq!(normalize_placement(None, None), None);
        assert_eq!(
            normalize_placement(None, Some(PlacementMode::Top)),
            Some(PlacementMode::Top)
        );
        assert_eq!(
            normalize_placement(Some(PlacementMode::Bottom), Some(PlacementMode::Top)),
            Some(PlacementMode::Bottom)
        );
    }

    #[test]
    fn test_settings_from_json() {
        let settings: DropdownSettings = serde_json::from_str(
            r#"{ "placement": "auto", "closeOnSelect": false, "enterDuration": 0.1 }"#,
        )
        .unwrap();
        assert_eq!(settings.placement, PlacementMode::Auto);
        assert!(!settings.close_on_select);
        assert_eq!(settings.enter_duration, 0.1);
        assert_eq!(settings.offset, DEFAULT_OFFSET);
    }

    #[test]
    fn test_settings_legacy_key() {
        let settings: DropdownSettings =
            serde_json::from_str(r#"{ "dropdownPlacement": "top" }"#).unwrap();
        assert_eq!(settings.placement, PlacementMode::Top);

        let settings: DropdownSettings =
            serde_json::from_str(r#"{ "dropdownPlacement": "top", "placement": "bottom" }"#)
                .unwrap();
        assert_eq!(settings.placement, PlacementMode::Bottom);
    }

    #[test]
    fn test_settings_from_toml_snake_case() {
        let settings: DropdownSettings = toml::from_str(
            r#"
            dropdown_placement = "auto"
            use_portal = true
            exit_duration = 0.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.placement, PlacementMode::Auto);
        assert!(settings.use_portal);
        assert_eq!(settings.exit_duration, 0.0);
    }

    #[test]
    fn test_settings_serialize_canonical_keys() {
        let json = serde_json::to_value(DropdownSettings::default()).unwrap();
        assert_eq!(json["placement"], "bottom");
        assert_eq!(json["closeOnSelect"], true);
        assert!(json.get("dropdownPlacement").is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = DropdownSettings {
            exit_duration: -1.0,
            ..DropdownSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(DropdownError::InvalidTiming(_))
        ));

        let settings = DropdownSettings {
            offset: f32::INFINITY,
            ..DropdownSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(DropdownError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_settings_block_resets_builder_placement() {
        let settings = options()
            .placement(PlacementMode::Top)
            .settings(DropdownSettings {
                placement: PlacementMode::Auto,
                ..DropdownSettings::default()
            })
            .resolved_settings();
        assert_eq!(settings.placement, PlacementMode::Auto);
    }
}
