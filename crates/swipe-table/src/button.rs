//! Swipe action buttons.

use std::fmt;
use std::sync::Arc;

use swipe_table_core::{Color, EdgeInsets, Rect};

use crate::delegate::SwipeContext;

/// Default horizontal padding around a button's content.
pub const DEFAULT_BUTTON_PADDING: f32 = 10.0;

/// Advance of one title glyph when measuring a button.
pub const TITLE_GLYPH_WIDTH: f32 = 8.5;

/// Width of an icon when measuring a button.
pub const ICON_WIDTH: f32 = 24.0;

/// Gap between icon and title.
pub const ICON_TITLE_SPACING: f32 = 4.0;

/// Height of the title line when placing a button's content.
pub const TITLE_LINE_HEIGHT: f32 = 17.0;

/// Where a button's icon sits relative to its title.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum IconPlacement {
    /// Icon before the title, on one line.
    #[default]
    Leading,
    /// Icon centered over the title, `spacing` points above it.
    Above {
        /// Vertical gap between icon and title.
        spacing: f32,
    },
}

/// Callback invoked when a button is tapped.
///
/// Returns `true` to hide the buttons after the tap.
pub type ButtonCallback = Arc<dyn Fn(&SwipeContext) -> bool + Send + Sync>;

/// A button revealed by swiping a cell.
///
/// Buttons are plain values; the cell lays them out and the host draws them
/// from the frames the cell reports.
///
/// # Example
///
/// ```
/// use swipe_table::button::SwipeButton;
/// use swipe_table_core::Color;
///
/// let delete = SwipeButton::new("Delete", Color::RED)
///     .with_padding(20.0)
///     .with_callback(|_cx| true);
/// assert!(delete.intrinsic_width() > 40.0);
/// ```
#[derive(Clone)]
pub struct SwipeButton {
    /// Title text.
    pub title: String,
    /// Icon name, resolved by the host.
    pub icon: Option<String>,
    /// Background color.
    pub background: Color,
    /// Padding around the content.
    pub insets: EdgeInsets,
    /// Fixed width. `0.0` sizes the button to fit its content.
    pub button_width: f32,
    /// Arrangement of icon and title.
    pub icon_placement: IconPlacement,
    callback: Option<ButtonCallback>,
}

impl SwipeButton {
    /// Create a button with a title and background color.
    pub fn new(title: impl Into<String>, background: Color) -> Self {
        Self {
            title: title.into(),
            icon: None,
            background,
            insets: EdgeInsets::horizontal(DEFAULT_BUTTON_PADDING),
            button_width: 0.0,
            icon_placement: IconPlacement::Leading,
            callback: None,
        }
    }

    /// Create an icon-only button.
    pub fn with_icon_only(icon: impl Into<String>, background: Color) -> Self {
        Self::new("", background).with_icon(icon)
    }

    /// Set the horizontal padding.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.insets = EdgeInsets::horizontal(padding);
        self
    }

    /// Set the padding on every edge.
    pub fn with_insets(mut self, insets: EdgeInsets) -> Self {
        self.insets = insets;
        self
    }

    /// Set the icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Center the icon over the title, `spacing` points apart.
    pub fn with_icon_over_text(mut self, spacing: f32) -> Self {
        self.icon_placement = IconPlacement::Above {
            spacing: spacing.max(0.0),
        };
        self
    }

    /// Set a fixed width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.button_width = width.max(0.0);
        self
    }

    /// Set the tap callback.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SwipeContext) -> bool + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Whether a tap callback is set.
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Run the tap callback.
    ///
    /// Returns `None` if the button has no callback, else whether to hide
    /// the buttons.
    pub fn invoke(&self, cx: &SwipeContext) -> Option<bool> {
        self.callback.as_ref().map(|callback| callback(cx))
    }

    /// Width of the button before any equalization.
    pub fn intrinsic_width(&self) -> f32 {
        if self.button_width > 0.0 {
            return self.button_width;
        }
        let title = self.title_width();
        let icon = if self.icon.is_some() { ICON_WIDTH } else { 0.0 };
        let content = match self.icon_placement {
            IconPlacement::Above { .. } => title.max(icon),
            IconPlacement::Leading if title > 0.0 && icon > 0.0 => title + ICON_TITLE_SPACING + icon,
            IconPlacement::Leading => title + icon,
        };
        content + self.insets.horizontal_total()
    }

    /// Frames of the icon and the title, centered in `content`.
    ///
    /// `content` is the button's content rect as reported in its frame.
    pub fn content_rects(&self, content: Rect) -> (Option<Rect>, Option<Rect>) {
        let title_width = self.title_width();
        let has_title = title_width > 0.0;
        let has_icon = self.icon.is_some();
        let center = content.center();

        match self.icon_placement {
            IconPlacement::Above { spacing } => {
                let spacing = if has_title && has_icon { spacing } else { 0.0 };
                let height = if has_icon { ICON_WIDTH } else { 0.0 }
                    + spacing
                    + if has_title { TITLE_LINE_HEIGHT } else { 0.0 };
                let top = center.y - height / 2.0;
                let icon = has_icon
                    .then(|| Rect::new(center.x - ICON_WIDTH / 2.0, top, ICON_WIDTH, ICON_WIDTH));
                let title_top = if has_icon { top + ICON_WIDTH + spacing } else { top };
                let title = has_title.then(|| {
                    Rect::new(center.x - title_width / 2.0, title_top, title_width, TITLE_LINE_HEIGHT)
                });
                (icon, title)
            }
            IconPlacement::Leading => {
                let spacing = if has_title && has_icon { ICON_TITLE_SPACING } else { 0.0 };
                let icon_width = if has_icon { ICON_WIDTH } else { 0.0 };
                let left = center.x - (icon_width + spacing + title_width) / 2.0;
                let icon = has_icon.then(|| {
                    Rect::new(left, center.y - ICON_WIDTH / 2.0, ICON_WIDTH, ICON_WIDTH)
                });
                let title = has_title.then(|| {
                    Rect::new(
                        left + icon_width + spacing,
                        center.y - TITLE_LINE_HEIGHT / 2.0,
                        title_width,
                        TITLE_LINE_HEIGHT,
                    )
                });
                (icon, title)
            }
        }
    }

    fn title_width(&self) -> f32 {
        self.title.chars().count() as f32 * TITLE_GLYPH_WIDTH
    }
}

impl fmt::Debug for SwipeButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeButton")
            .field("title", &self.title)
            .field("icon", &self.icon)
            .field("background", &self.background)
            .field("insets", &self.insets)
            .field("button_width", &self.button_width)
            .field("icon_placement", &self.icon_placement)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellId;

    #[test]
    fn test_intrinsic_width_fits_title() {
        let button = SwipeButton::new("Mark", Color::GRAY);
        assert_eq!(button.intrinsic_width(), 4.0 * TITLE_GLYPH_WIDTH + 20.0);

        let padded = button.with_padding(30.0);
        assert_eq!(padded.intrinsic_width(), 4.0 * TITLE_GLYPH_WIDTH + 60.0);
    }

    #[test]
    fn test_intrinsic_width_with_icon() {
        let icon_only = SwipeButton::with_icon_only("trash", Color::RED);
        assert_eq!(icon_only.intrinsic_width(), ICON_WIDTH + 20.0);

        let both = SwipeButton::new("Go", Color::GREEN).with_icon("check");
        assert_eq!(
            both.intrinsic_width(),
            2.0 * TITLE_GLYPH_WIDTH + ICON_TITLE_SPACING + ICON_WIDTH + 20.0
        );
    }

    #[test]
    fn test_icon_over_text_width() {
        let stacked = SwipeButton::new("Archive", Color::GRAY)
            .with_icon("box")
            .with_icon_over_text(6.0);
        assert_eq!(stacked.icon_placement, IconPlacement::Above { spacing: 6.0 });
        assert_eq!(stacked.intrinsic_width(), 7.0 * TITLE_GLYPH_WIDTH + 20.0);

        let short = SwipeButton::new("X", Color::GRAY).with_icon("x").with_icon_over_text(6.0);
        assert_eq!(short.intrinsic_width(), ICON_WIDTH + 20.0);
    }

    #[test]
    fn test_content_rects() {
        let content = Rect::new(0.0, 0.0, 100.0, 80.0);

        let stacked = SwipeButton::new("Go", Color::GREEN)
            .with_icon("check")
            .with_icon_over_text(5.0);
        let (icon, title) = stacked.content_rects(content);
        let (icon, title) = (icon.unwrap(), title.unwrap());
        // 24 + 5 + 17 = 46 points tall, centered in 80.
        assert_eq!(icon, Rect::new(38.0, 17.0, ICON_WIDTH, ICON_WIDTH));
        assert_eq!(title.top(), 46.0);
        assert_eq!(title.center().x, 50.0);

        let inline = SwipeButton::new("Go", Color::GREEN).with_icon("check");
        let (icon, title) = inline.content_rects(content);
        let (icon, title) = (icon.unwrap(), title.unwrap());
        assert_eq!(icon.top(), title.top() - (ICON_WIDTH - TITLE_LINE_HEIGHT) / 2.0);
        assert_eq!(title.left(), icon.right() + ICON_TITLE_SPACING);
        assert_eq!((icon.left() + title.right()) / 2.0, 50.0);

        let (icon, title) = SwipeButton::new("Delete", Color::RED).content_rects(content);
        assert!(icon.is_none());
        assert_eq!(title.unwrap().center(), content.center());
    }

    #[test]
    fn test_fixed_width_wins() {
        let button = SwipeButton::new("A very long title", Color::ORANGE).with_width(60.0);
        assert_eq!(button.intrinsic_width(), 60.0);
    }

    #[test]
    fn test_invoke_callback() {
        let cx = SwipeContext::new(CellId::next(), None);
        let plain = SwipeButton::new("More", Color::GRAY);
        assert_eq!(plain.invoke(&cx), None);

        let hiding = plain.clone().with_callback(|_| true);
        assert!(hiding.has_callback());
        assert_eq!(hiding.invoke(&cx), Some(true));
        assert!(format!("{hiding:?}").contains("has_callback: true"));
    }
}
