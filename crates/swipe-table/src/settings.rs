//! Per-direction swipe and expansion settings.

use serde::{Deserialize, Serialize};
use swipe_table_core::Color;

use crate::animation::{Easing, SwipeAnimation};

/// How buttons move while they are being revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeTransition {
    /// Buttons spread out from the cell border.
    #[default]
    Border,
    /// Buttons stay in place and are uncovered by the content.
    Static,
    /// Buttons are attached to the content edge and move with it.
    Drag,
    /// Each button is revealed from its center outwards.
    ClipCenter,
    /// The button strip unfolds around the cell border.
    Rotate3d,
}

/// Where the expanded button's content sits while it fills the revealed area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionLayout {
    /// Content follows the content edge of the cell.
    #[default]
    Border,
    /// Content is centered in the revealed area.
    Center,
}

/// Default reveal threshold, as a fraction of the buttons width.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 0.5;
/// Default expansion trigger threshold, as a multiple of the buttons width.
pub const DEFAULT_EXPANSION_THRESHOLD: f32 = 1.5;
/// Default duration of the expand/collapse of the expanded button, in seconds.
pub const DEFAULT_EXPANSION_ANIMATION_DURATION: f32 = 0.2;

/// Swipe settings for one side of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeSettings {
    /// Transition used while swiping buttons.
    pub transition: SwipeTransition,
    /// Fraction of the buttons width past which the buttons stay open on release.
    pub threshold: f32,
    /// Shift of the buttons away from the cell border.
    pub offset: f32,
    /// Top margin of the buttons.
    pub top_margin: f32,
    /// Bottom margin of the buttons.
    pub bottom_margin: f32,
    /// Animation used when the buttons are shown.
    pub show_animation: SwipeAnimation,
    /// Animation used when the buttons are hidden.
    pub hide_animation: SwipeAnimation,
    /// Animation used when the cell springs back from beyond the buttons.
    pub stretch_animation: SwipeAnimation,
    /// Keep the buttons open when the threshold is reached on release.
    /// When false the buttons always hide on release.
    pub keep_buttons_swiped: bool,
    /// Only the buttons move; the content stays in place.
    pub only_swipe_buttons: bool,
    /// Allow dragging past the buttons width. When false, the swipe stops
    /// right after the last button.
    pub enable_swipe_bounces: bool,
    /// Fraction of the finger movement applied past the buttons width.
    pub swipe_bounce_rate: f32,
    /// Allow the swipe to continue into the opposite side once started here.
    pub allows_opposite_swipe: bool,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        Self {
            transition: SwipeTransition::Border,
            threshold: DEFAULT_SWIPE_THRESHOLD,
            offset: 0.0,
            top_margin: 0.0,
            bottom_margin: 0.0,
            show_animation: SwipeAnimation::default(),
            hide_animation: SwipeAnimation::default(),
            stretch_animation: SwipeAnimation::default(),
            keep_buttons_swiped: true,
            only_swipe_buttons: false,
            enable_swipe_bounces: true,
            swipe_bounce_rate: 1.0,
            allows_opposite_swipe: true,
        }
    }
}

impl SwipeSettings {
    /// Set the transition.
    pub fn with_transition(mut self, transition: SwipeTransition) -> Self {
        self.transition = transition;
        self
    }

    /// Set the reveal threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set whether the buttons stay open on release.
    pub fn with_keep_buttons_swiped(mut self, keep: bool) -> Self {
        self.keep_buttons_swiped = keep;
        self
    }

    /// Set whether the swipe may bounce past the buttons width.
    pub fn with_swipe_bounces(mut self, enabled: bool) -> Self {
        self.enable_swipe_bounces = enabled;
        self
    }

    /// Use the same duration for the show, hide and stretch animations.
    pub fn set_animation_duration(&mut self, duration: f32) {
        self.show_animation.duration = duration;
        self.hide_animation.duration = duration;
        self.stretch_animation.duration = duration;
    }

    /// Offset past which a release keeps `buttons_width` of buttons open.
    #[inline]
    pub fn reveal_threshold(&self, buttons_width: f32) -> f32 {
        buttons_width * self.threshold.max(0.0)
    }
}

/// Settings that make one button of a side expandable.
///
/// Buttons are not expandable by default (`button_index` is `None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionSettings {
    /// Index of the expandable button in the side's buttons.
    pub button_index: Option<usize>,
    /// Fill the cell on trigger instead of springing back.
    pub fill_on_trigger: bool,
    /// Multiple of the buttons width past which the expansion triggers.
    pub threshold: f32,
    /// Background of the expanded button. The button's own color by default.
    pub expansion_color: Option<Color>,
    /// Layout of the expanded button's content.
    pub expansion_layout: ExpansionLayout,
    /// Animation used when the expansion is triggered.
    pub trigger_animation: SwipeAnimation,
    /// Duration of the button's change from normal to expanded, in seconds.
    pub animation_duration: f32,
}

impl Default for ExpansionSettings {
    fn default() -> Self {
        Self {
            button_index: None,
            fill_on_trigger: false,
            threshold: DEFAULT_EXPANSION_THRESHOLD,
            expansion_color: None,
            expansion_layout: ExpansionLayout::Border,
            trigger_animation: SwipeAnimation::new(0.3, Easing::CubicOut),
            animation_duration: DEFAULT_EXPANSION_ANIMATION_DURATION,
        }
    }
}

impl ExpansionSettings {
    /// Make the button at `index` expandable.
    pub fn expandable(index: usize) -> Self {
        Self {
            button_index: Some(index),
            ..Self::default()
        }
    }

    /// Set whether the button fills the cell on trigger.
    pub fn with_fill_on_trigger(mut self, fill: bool) -> Self {
        self.fill_on_trigger = fill;
        self
    }

    /// Set the trigger threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the expansion color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.expansion_color = Some(color);
        self
    }

    /// Set the content layout.
    pub fn with_layout(mut self, layout: ExpansionLayout) -> Self {
        self.expansion_layout = layout;
        self
    }

    /// The expandable button index, if it addresses one of `button_count` buttons.
    ///
    /// An index past the buttons disables the expansion.
    pub fn valid_index(&self, button_count: usize) -> Option<usize> {
        self.button_index.filter(|index| *index < button_count)
    }

    /// Offset past which the expansion triggers for `buttons_width` of buttons.
    #[inline]
    pub fn trigger_offset(&self, buttons_width: f32) -> f32 {
        buttons_width * self.threshold.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_settings_defaults() {
        let settings = SwipeSettings::default();
        assert_eq!(settings.transition, SwipeTransition::Border);
        assert_eq!(settings.threshold, 0.5);
        assert!(settings.keep_buttons_swiped);
        assert!(settings.enable_swipe_bounces);
        assert!(!settings.only_swipe_buttons);
        assert_eq!(settings.reveal_threshold(200.0), 100.0);
    }

    #[test]
    fn test_set_animation_duration() {
        let mut settings = SwipeSettings::default();
        settings.set_animation_duration(0.5);
        assert_eq!(settings.show_animation.duration, 0.5);
        assert_eq!(settings.hide_animation.duration, 0.5);
        assert_eq!(settings.stretch_animation.duration, 0.5);
    }

    #[test]
    fn test_expansion_defaults() {
        let expansion = ExpansionSettings::default();
        assert_eq!(expansion.button_index, None);
        assert_eq!(expansion.threshold, 1.5);
        assert_eq!(expansion.valid_index(3), None);
        assert_eq!(expansion.trigger_offset(200.0), 300.0);
    }

    #[test]
    fn test_expansion_valid_index() {
        let expansion = ExpansionSettings::expandable(1);
        assert_eq!(expansion.valid_index(2), Some(1));
        // No buttons yet: nothing to expand, and not a configuration error.
        assert_eq!(expansion.valid_index(0), None);
        assert_eq!(expansion.valid_index(1), None);
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let settings: SwipeSettings =
            serde_json::from_str(r#"{"transition": "clip_center", "threshold": 0.3}"#).unwrap();
        assert_eq!(settings.transition, SwipeTransition::ClipCenter);
        assert_eq!(settings.threshold, 0.3);
        assert!(settings.keep_buttons_swiped);

        let expansion: ExpansionSettings = serde_json::from_str(
            r##"{"button_index": 0, "fill_on_trigger": true, "expansion_color": "#FF3B30"}"##,
        )
        .unwrap();
        assert_eq!(expansion.button_index, Some(0));
        assert!(expansion.fill_on_trigger);
        assert_eq!(expansion.expansion_color, Color::from_hex("#FF3B30"));
    }
}
