//! Swipe configuration loaded from TOML or JSON.
//!
//! A [`SwipeConfig`] describes both sides of a cell and its behavior flags,
//! so swipe behavior can ship as data next to the rest of an application's
//! settings. Every field has a default, so a file only lists what it changes:
//!
//! ```toml
//! swipe_background_color = "#EFEFF4"
//!
//! [behavior]
//! allows_multiple_swipe = false
//!
//! [right.settings]
//! transition = "clip_center"
//! threshold = 0.6
//!
//! [right.expansion]
//! button_index = 0
//! fill_on_trigger = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use swipe_table_core::logging::targets;
use swipe_table_core::{Color, Error, Result};

use crate::cell::{CellBehavior, SwipeCell};
use crate::settings::{ExpansionSettings, SwipeSettings};
use crate::types::SwipeDirection;

/// Settings of one side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideConfig {
    /// Swipe settings.
    pub settings: SwipeSettings,
    /// Expansion settings.
    pub expansion: ExpansionSettings,
}

/// Swipe configuration of a cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Left side, revealed by swiping left to right.
    pub left: SideConfig,
    /// Right side, revealed by swiping right to left.
    pub right: SideConfig,
    /// Behavior flags.
    pub behavior: CellBehavior,
    /// Color drawn behind the buttons.
    pub swipe_background_color: Option<Color>,
}

impl SwipeConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::parse("TOML", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| Error::parse("JSON", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file. The format follows the extension, `.toml`
    /// or `.json`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(Error::UnsupportedFormat { path: path.to_path_buf() }),
        };

        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = parse(&text)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded swipe configuration");
        Ok(config)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::parse("TOML", e.to_string()))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::parse("JSON", e.to_string()))
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<()> {
        for (name, side) in [("left", &self.left), ("right", &self.right)] {
            let settings = &side.settings;
            non_negative(name, "settings.threshold", settings.threshold)?;
            non_negative(name, "settings.show_animation.duration", settings.show_animation.duration)?;
            non_negative(name, "settings.hide_animation.duration", settings.hide_animation.duration)?;
            non_negative(
                name,
                "settings.stretch_animation.duration",
                settings.stretch_animation.duration,
            )?;
            non_negative(name, "settings.top_margin", settings.top_margin)?;
            non_negative(name, "settings.bottom_margin", settings.bottom_margin)?;
            if !(0.0..=1.0).contains(&settings.swipe_bounce_rate) {
                return Err(Error::invalid_value(
                    format!("{name}.settings.swipe_bounce_rate"),
                    format!("must be between 0 and 1, got {}", settings.swipe_bounce_rate),
                ));
            }

            let expansion = &side.expansion;
            non_negative(name, "expansion.threshold", expansion.threshold)?;
            non_negative(name, "expansion.animation_duration", expansion.animation_duration)?;
            non_negative(
                name,
                "expansion.trigger_animation.duration",
                expansion.trigger_animation.duration,
            )?;
        }
        Ok(())
    }

    /// Configure `cell` with these settings.
    ///
    /// Buttons are left alone. An expansion index past the side's current
    /// buttons is kept, since buttons may still come from a delegate. Until
    /// it addresses a button, that side swipes without expanding.
    pub fn apply_to(&self, cell: &mut SwipeCell) {
        for (direction, side) in [
            (SwipeDirection::LeftToRight, &self.left),
            (SwipeDirection::RightToLeft, &self.right),
        ] {
            let count = cell.buttons(direction).len();
            if let Some(index) = side.expansion.button_index {
                if count > 0 && index >= count {
                    tracing::warn!(
                        target: targets::CONFIG,
                        ?direction,
                        index,
                        count,
                        "expansion index out of range for current buttons"
                    );
                }
            }
            *cell.settings_mut(direction) = side.settings.clone();
            *cell.expansion_mut(direction) = side.expansion.clone();
        }
        *cell.behavior_mut() = self.behavior;
        cell.set_swipe_background_color(self.swipe_background_color);
        cell.refresh_buttons(false);
    }
}

fn non_negative(side: &str, field: &str, value: f32) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_value(
            format!("{side}.{field}"),
            format!("must be non-negative, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::button::SwipeButton;
    use crate::gesture::{GestureState, PanGestureEvent};
    use crate::settings::SwipeTransition;
    use crate::types::SwipeState;
    use swipe_table_core::Point;

    const SAMPLE: &str = r##"
swipe_background_color = "#EFEFF4"

[behavior]
allows_multiple_swipe = true

[right.settings]
transition = "clip_center"
threshold = 0.6

[right.expansion]
button_index = 0
fill_on_trigger = true
"##;

    #[test]
    fn test_from_toml_str() {
        let config = SwipeConfig::from_toml_str(SAMPLE).unwrap();
        assert!(config.behavior.allows_multiple_swipe);
        assert!(config.behavior.allows_opposite_swipe, "unlisted flags keep defaults");
        assert_eq!(config.right.settings.transition, SwipeTransition::ClipCenter);
        assert_eq!(config.right.settings.threshold, 0.6);
        assert_eq!(config.right.expansion.button_index, Some(0));
        assert!(config.right.expansion.fill_on_trigger);
        assert_eq!(config.left, SideConfig::default());
        assert_eq!(config.swipe_background_color, Color::from_hex("#EFEFF4"));
    }

    #[test]
    fn test_from_json_str() {
        let config = SwipeConfig::from_json_str(
            r#"{ "left": { "settings": { "keep_buttons_swiped": false } } }"#,
        )
        .unwrap();
        assert!(!config.left.settings.keep_buttons_swiped);
        assert_eq!(config.right, SideConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let err = SwipeConfig::from_toml_str("[right.settings\nthreshold = 1").unwrap_err();
        assert!(matches!(err, Error::Parse { format: "TOML", .. }));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let err = SwipeConfig::from_json_str(r#"{ "right": { "settings": { "threshold": -1.0 } } }"#)
            .unwrap_err();
        match err {
            Error::InvalidValue { field, .. } => assert_eq!(field, "right.settings.threshold"),
            other => panic!("unexpected error: {other}"),
        }

        let err = SwipeConfig::from_json_str(
            r#"{ "left": { "settings": { "swipe_bounce_rate": 1.5 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("swipe.toml");
        std::fs::File::create(&toml_path)
            .unwrap()
            .write_all(SAMPLE.as_bytes())
            .unwrap();
        let config = SwipeConfig::load(&toml_path).unwrap();
        assert!(config.right.expansion.fill_on_trigger);

        let json_path = dir.path().join("swipe.json");
        std::fs::write(&json_path, config.to_json_string().unwrap()).unwrap();
        assert_eq!(SwipeConfig::load(&json_path).unwrap(), config);

        let yaml_path = dir.path().join("swipe.yaml");
        assert!(matches!(
            SwipeConfig::load(&yaml_path),
            Err(Error::UnsupportedFormat { .. })
        ));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(SwipeConfig::load(&missing), Err(Error::Io { .. })));
    }

    #[test]
    fn test_toml_output_parses_back() {
        let config = SwipeConfig::from_toml_str(SAMPLE).unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(SwipeConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_apply_to_cell() {
        let config = SwipeConfig::from_toml_str(SAMPLE).unwrap();
        let mut cell = SwipeCell::new();
        config.apply_to(&mut cell);

        assert!(cell.behavior().allows_multiple_swipe);
        assert_eq!(
            cell.settings(SwipeDirection::RightToLeft).transition,
            SwipeTransition::ClipCenter
        );
        assert_eq!(cell.expansion(SwipeDirection::RightToLeft).button_index, Some(0));
        assert_eq!(cell.swipe_background_color(), Color::from_hex("#EFEFF4"));
    }

    #[test]
    fn test_apply_out_of_range_expansion() {
        let config = SwipeConfig::from_toml_str("[right.expansion]\nbutton_index = 5\n").unwrap();
        let mut cell = SwipeCell::new().with_buttons(
            SwipeDirection::RightToLeft,
            vec![SwipeButton::new("Delete", Color::RED).with_width(80.0)],
        );
        config.apply_to(&mut cell);
        assert_eq!(cell.expansion(SwipeDirection::RightToLeft).button_index, Some(5));

        let start = Point::new(300.0, 22.0);
        let pan = |state, x: f32| PanGestureEvent::new(state, Point::new(x, 22.0), start, Point::ZERO, Point::ZERO);
        assert!(cell.handle_pan(&pan(GestureState::Started, 288.0)));
        cell.handle_pan(&pan(GestureState::Updated, 100.0));

        // No button to expand: the drag stops at the buttons width.
        assert_eq!(cell.swipe_offset(), -80.0);
        assert_eq!(cell.swipe_state(), SwipeState::SwipingRightToLeft);
        assert_eq!(cell.active_expansion(), None);
    }
}
