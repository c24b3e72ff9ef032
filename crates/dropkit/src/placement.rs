//! Panel placement
//!
//! Decides whether the dropdown panel opens below or above its trigger. The
//! decision is made once per open, from the trigger's rectangle at that
//! moment, and does not track scrolling or resizing while open.

use serde::{Deserialize, Serialize};

use dropkit_core::Bounds;

/// Requested placement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Always open below the trigger
    #[default]
    Bottom,
    /// Always open above the trigger
    Top,
    /// Open toward the larger half of the viewport
    Auto,
}

/// Resolved placement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Bottom,
    Top,
}

impl Placement {
    /// Whether the panel sits above the trigger
    pub fn is_top(self) -> bool {
        matches!(self, Placement::Top)
    }
}

impl From<Placement> for PlacementMode {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Bottom => PlacementMode::Bottom,
            Placement::Top => PlacementMode::Top,
        }
    }
}

/// Resolve a requested placement against the trigger's position
///
/// `Auto` flips to `Top` only when the trigger's vertical center lies below
/// the middle of the viewport. A missing trigger rectangle or an unknown
/// (non-positive) viewport height falls back to `Bottom`.
pub fn resolve_placement(
    requested: PlacementMode,
    trigger: Option<Bounds>,
    viewport_height: f32,
) -> Placement {
    match requested {
        PlacementMode::Bottom => Placement::Bottom,
        PlacementMode::Top => Placement::Top,
        PlacementMode::Auto => {
            let Some(trigger) = trigger else {
                return Placement::Bottom;
            };
            if !(viewport_height.is_finite() && viewport_height > 0.0) {
                return Placement::Bottom;
            }
            if trigger.center_y() > viewport_height / 2.0 {
                Placement::Top
            } else {
                Placement::Bottom
            }
        }
    }
}

/// Point where the panel attaches, given the trigger rectangle
///
/// For `Bottom` this is the trigger's bottom-left corner pushed down by
/// `offset`; for `Top` it is the top-left corner pushed up. The panel's own
/// edge (top edge for `Bottom`, bottom edge for `Top`) goes at this point.
pub fn anchor_point(trigger: Bounds, placement: Placement, offset: f32) -> (f32, f32) {
    match placement {
        Placement::Bottom => (trigger.x, trigger.bottom() + offset),
        Placement::Top => (trigger.x, trigger.y - offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_modes_ignore_geometry() {
        let low = Some(Bounds::new(0.0, 900.0, 100.0, 40.0));
        assert_eq!(
            resolve_placement(PlacementMode::Bottom, low, 1000.0),
            Placement::Bottom
        );
        assert_eq!(
            resolve_placement(PlacementMode::Top, None, 0.0),
            Placement::Top
        );
    }

    #[test]
    fn test_auto_flips_in_lower_half() {
        // center at 620 of 1000
        let trigger = Some(Bounds::new(0.0, 600.0, 100.0, 40.0));
        assert_eq!(
            resolve_placement(PlacementMode::Auto, trigger, 1000.0),
            Placement::Top
        );

        // center at 120
        let trigger = Some(Bounds::new(0.0, 100.0, 100.0, 40.0));
        assert_eq!(
            resolve_placement(PlacementMode::Auto, trigger, 1000.0),
            Placement::Bottom
        );
    }

    #[test]
    fn test_auto_exact_middle_stays_bottom() {
        let trigger = Some(Bounds::new(0.0, 480.0, 100.0, 40.0));
        assert_eq!(
            resolve_placement(PlacementMode::Auto, trigger, 1000.0),
            Placement::Bottom
        );
    }

    #[test]
    fn test_auto_without_geometry_is_bottom() {
        assert_eq!(
            resolve_placement(PlacementMode::Auto, None, 1000.0),
            Placement::Bottom
        );
        let trigger = Some(Bounds::new(0.0, 600.0, 100.0, 40.0));
        assert_eq!(
            resolve_placement(PlacementMode::Auto, trigger, 0.0),
            Placement::Bottom
        );
        assert_eq!(
            resolve_placement(PlacementMode::Auto, trigger, f32::NAN),
            Placement::Bottom
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let trigger = Some(Bounds::new(10.0, 700.0, 120.0, 32.0));
        let first = resolve_placement(PlacementMode::Auto, trigger, 800.0);
        for _ in 0..10 {
            assert_eq!(resolve_placement(PlacementMode::Auto, trigger, 800.0), first);
        }
    }

    #[test]
    fn test_anchor_point() {
        let trigger = Bounds::new(20.0, 100.0, 200.0, 40.0);
        assert_eq!(anchor_point(trigger, Placement::Bottom, 4.0), (20.0, 144.0));
        assert_eq!(anchor_point(trigger, Placement::Top, 4.0), (20.0, 96.0));
    }

    #[test]
    fn test_placement_mode_serde_names() {
        let mode: PlacementMode = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(mode, PlacementMode::Auto);
        assert_eq!(serde_json::to_string(&Placement::Top).unwrap(), "\"top\"");
    }
}
