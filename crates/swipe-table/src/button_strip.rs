//! Layout of one side's buttons while they are swiped in.
//!
//! A [`ButtonStrip`] owns the buttons of one side of a cell and turns the
//! revealed width into a frame per button, following the side's
//! [`SwipeTransition`]. Buttons are ordered from the cell border inward:
//! index 0 sits against the border on both sides.
//!
//! One button can be expanded. While expanded it spans the whole revealed
//! width, its content follows the [`ExpansionLayout`], and the other buttons
//! fade out. The change between the normal and the expanded layout is
//! animated over the expansion's `animation_duration`.

use std::time::Instant;

use swipe_table_core::logging::targets;
use swipe_table_core::{Color, Point, Rect, Size};

use crate::animation::{AnimationTick, Easing, OffsetAnimator, SwipeAnimation};
use crate::button::SwipeButton;
use crate::settings::{ExpansionLayout, SwipeSettings, SwipeTransition};
use crate::types::SwipeDirection;

/// Where and how to draw one button, in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonFrame {
    /// Index of the button in its side's buttons.
    pub index: usize,
    /// Button bounds.
    pub frame: Rect,
    /// Bounds of the title and icon.
    pub content: Rect,
    /// Visible part of the button, when it is clipped.
    pub clip: Option<Rect>,
    /// Rotation about the cell border, in degrees. `0.0` is flat.
    pub rotation: f32,
    /// Background color.
    pub background: Color,
    /// Opacity from `0.0` (hidden) to `1.0`.
    pub opacity: f32,
}

impl ButtonFrame {
    /// Whether the button is drawn at all.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// Area that receives taps.
    #[inline]
    pub fn hit_rect(&self) -> Rect {
        self.clip.unwrap_or(self.frame)
    }
}

#[derive(Debug, Clone, Copy)]
struct Expansion {
    index: usize,
    color: Color,
    layout: ExpansionLayout,
}

/// The buttons of one side of a cell and their current layout.
#[derive(Debug)]
pub struct ButtonStrip {
    side: SwipeDirection,
    buttons: Vec<SwipeButton>,
    widths: Vec<f32>,
    /// Distance of each button from the border once fully revealed.
    positions: Vec<f32>,
    total_width: f32,
    expansion: Option<Expansion>,
    /// Progress between the normal (0) and expanded (1) layout.
    morph_value: f32,
    morph: OffsetAnimator<()>,
    backdrop: Option<Color>,
    frames: Vec<ButtonFrame>,
}

impl ButtonStrip {
    /// Build a strip for `side`.
    ///
    /// Unless `allows_different_width` is set, every button gets the width of
    /// the widest one.
    pub fn new(side: SwipeDirection, buttons: Vec<SwipeButton>, allows_different_width: bool) -> Self {
        let intrinsic: Vec<f32> = buttons.iter().map(SwipeButton::intrinsic_width).collect();
        let widths = if allows_different_width {
            intrinsic
        } else {
            let widest = intrinsic.iter().copied().fold(0.0, f32::max);
            vec![widest; buttons.len()]
        };

        let mut positions = Vec::with_capacity(widths.len());
        let mut total_width = 0.0;
        for width in &widths {
            positions.push(total_width);
            total_width += width;
        }

        tracing::trace!(
            target: targets::BUTTONS,
            side = ?side,
            count = buttons.len(),
            total_width,
            "built button strip"
        );

        Self {
            side,
            buttons,
            widths,
            positions,
            total_width,
            expansion: None,
            morph_value: 0.0,
            morph: OffsetAnimator::new(),
            backdrop: None,
            frames: Vec::new(),
        }
    }

    /// Side this strip belongs to.
    pub fn side(&self) -> SwipeDirection {
        self.side
    }

    /// The buttons, border first.
    pub fn buttons(&self) -> &[SwipeButton] {
        &self.buttons
    }

    /// Button at `index`.
    pub fn button(&self, index: usize) -> Option<&SwipeButton> {
        self.buttons.get(index)
    }

    /// Number of buttons.
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// Whether the strip has no buttons.
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Laid-out width of every button.
    pub fn widths(&self) -> &[f32] {
        &self.widths
    }

    /// Sum of the button widths: the offset at which the side is fully revealed.
    pub fn total_width(&self) -> f32 {
        self.total_width
    }

    /// Frames computed by the last [`layout`](Self::layout).
    pub fn frames(&self) -> &[ButtonFrame] {
        &self.frames
    }

    /// Frame of the button at `index` from the last layout.
    pub fn frame(&self, index: usize) -> Option<&ButtonFrame> {
        self.frames.iter().find(|f| f.index == index)
    }

    /// Color painted behind the whole strip, if any.
    pub fn backdrop(&self) -> Option<Color> {
        self.backdrop
    }

    /// Set or clear the color painted behind the whole strip.
    pub fn set_backdrop(&mut self, color: Option<Color>) {
        self.backdrop = color;
    }

    /// Index of the expanded button.
    pub fn expanded_index(&self) -> Option<usize> {
        self.expansion.map(|e| e.index)
    }

    /// Whether a button is expanded or collapsing.
    pub fn is_expanded(&self) -> bool {
        self.expansion.is_some()
    }

    /// Whether the expand/collapse change is still running.
    pub fn is_morphing(&self) -> bool {
        self.morph.is_running()
    }

    /// Expand the button at `index`.
    ///
    /// `color` defaults to the button's background. Out-of-range indices are
    /// ignored.
    pub fn expand(
        &mut self,
        index: usize,
        color: Option<Color>,
        layout: ExpansionLayout,
        duration: f32,
    ) {
        debug_assert!(index < self.buttons.len(), "expansion index {index} out of range");
        let Some(button) = self.buttons.get(index) else {
            return;
        };
        if self.expansion.is_some_and(|e| e.index == index) && self.morph.target() != Some(0.0) {
            return;
        }

        tracing::debug!(target: targets::BUTTONS, side = ?self.side, index, "expanding button");
        self.expansion = Some(Expansion {
            index,
            color: color.unwrap_or(button.background),
            layout,
        });
        self.morph_to(1.0, duration);
    }

    /// Return the expanded button to its normal layout.
    ///
    /// With `animated`, the button collapses over `duration` seconds and
    /// stays reported as expanded until the change finishes.
    pub fn end_expansion(&mut self, animated: bool, duration: f32) {
        if self.expansion.is_none() {
            return;
        }
        tracing::debug!(target: targets::BUTTONS, side = ?self.side, animated, "ending expansion");
        if animated && duration > 0.0 {
            self.morph_to(0.0, duration);
        } else {
            self.morph.cancel();
            self.morph_value = 0.0;
            self.expansion = None;
        }
    }

    fn morph_to(&mut self, target: f32, duration: f32) {
        if duration <= 0.0 {
            self.morph.cancel();
            self.morph_value = target;
            if target <= 0.0 {
                self.expansion = None;
            }
            return;
        }
        self.morph.start(
            self.morph_value,
            target,
            SwipeAnimation::new(duration, Easing::CubicOut),
            None,
        );
    }

    /// Advance the expand/collapse change. Returns `true` if the layout
    /// needs to be recomputed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.morph.tick(now) {
            AnimationTick::Idle => false,
            AnimationTick::Running { value } => {
                self.morph_value = value;
                true
            }
            AnimationTick::Finished { value, .. } => {
                self.morph_value = value;
                if value <= 0.0 {
                    self.expansion = None;
                }
                true
            }
        }
    }

    /// Compute every button's frame for `revealed` points of revealed width.
    pub fn layout(&mut self, settings: &SwipeSettings, revealed: f32, cell_size: Size) {
        let revealed = revealed.abs();
        let total = self.total_width;
        let t = if total > 0.0 { (revealed / total).min(1.0) } else { 0.0 };
        let top = settings.top_margin;
        let height = (cell_size.height - settings.top_margin - settings.bottom_margin).max(0.0);

        self.frames.clear();
        let mut expanded_frame = None;

        for (index, button) in self.buttons.iter().enumerate() {
            let width = self.widths[index];
            let position = self.positions[index];

            let (distance, clip_width, rotation) = match settings.transition {
                SwipeTransition::Drag => (position - total * (1.0 - t), None, 0.0),
                SwipeTransition::Static => (position, None, 0.0),
                SwipeTransition::Border => (position * t, None, 0.0),
                SwipeTransition::ClipCenter => (position, Some(width * t), 0.0),
                SwipeTransition::Rotate3d => (position, None, 90.0 * (1.0 - t)),
            };

            let frame = self.rect_at(distance + settings.offset, width, top, height, cell_size.width);
            let clip = clip_width.map(|clip_width| {
                Rect::new(
                    frame.left() + (width - clip_width) / 2.0,
                    frame.top(),
                    clip_width,
                    frame.height(),
                )
            });

            let mut button_frame = ButtonFrame {
                index,
                frame,
                content: frame.inset(button.insets),
                clip,
                rotation,
                background: button.background,
                opacity: 1.0,
            };

            match self.expansion {
                Some(expansion) if self.morph_value > 0.0 => {
                    let m = self.morph_value;
                    if expansion.index == index {
                        let full = self.rect_at(0.0, revealed, top, height, cell_size.width);
                        let content_distance = match expansion.layout {
                            ExpansionLayout::Border => revealed - width,
                            ExpansionLayout::Center => (revealed - width) / 2.0,
                        }
                        .max(0.0);
                        let content = self
                            .rect_at(content_distance, width, top, height, cell_size.width)
                            .inset(button.insets);

                        button_frame.frame = frame.lerp(&full, m);
                        button_frame.content = button_frame.content.lerp(&content, m);
                        button_frame.clip = None;
                        button_frame.rotation = rotation * (1.0 - m);
                        button_frame.background = button.background.lerp(&expansion.color, m);
                        expanded_frame = Some(button_frame);
                        continue;
                    }
                    button_frame.opacity = 1.0 - m;
                }
                _ => {}
            }

            self.frames.push(button_frame);
        }

        // Drawn last so it covers the others.
        if let Some(frame) = expanded_frame {
            self.frames.push(frame);
        }
    }

    fn rect_at(&self, distance: f32, width: f32, top: f32, height: f32, cell_width: f32) -> Rect {
        match self.side {
            SwipeDirection::LeftToRight => Rect::new(distance, top, width, height),
            SwipeDirection::RightToLeft => Rect::new(cell_width - distance - width, top, width, height),
        }
    }

    /// Index of the visible button under `point`, topmost first.
    pub fn button_at(&self, point: Point) -> Option<usize> {
        self.frames
            .iter()
            .rev()
            .find(|f| f.is_visible() && f.hit_rect().contains(point))
            .map(|f| f.index)
    }
}
