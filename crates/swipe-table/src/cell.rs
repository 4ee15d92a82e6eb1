//! The swipeable cell.
//!
//! [`SwipeCell`] turns pan gestures into a horizontal offset, decides on
//! release whether its buttons stay open, hide or trigger an expansion, and
//! animates the offset there. Positive offsets reveal the left buttons,
//! negative offsets the right ones, so only one side is ever open.
//!
//! The cell is headless. The host feeds it gestures and frame ticks and draws
//! what [`SwipeCell::layout`] reports.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use swipe_table::{SwipeButton, SwipeCell, SwipeDirection, SwipeState};
//! use swipe_table_core::Color;
//!
//! let mut cell = SwipeCell::new();
//! cell.set_buttons(
//!     SwipeDirection::RightToLeft,
//!     vec![SwipeButton::new("Delete", Color::RED).with_width(80.0)],
//! );
//!
//! cell.show_swipe(SwipeDirection::RightToLeft, true, None);
//! let t0 = Instant::now();
//! cell.tick(t0);
//! cell.tick(t0 + Duration::from_secs(1));
//!
//! assert_eq!(cell.swipe_offset(), -80.0);
//! assert_eq!(cell.swipe_state(), SwipeState::SwipingRightToLeft);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use swipe_table_core::logging::targets;
use swipe_table_core::{Color, Point, Rect, Signal, Size};

use crate::animation::{AnimationTick, OffsetAnimator, SwipeAnimation};
use crate::button::SwipeButton;
use crate::button_strip::{ButtonFrame, ButtonStrip};
use crate::delegate::{SwipeCellDelegate, SwipeContext};
use crate::gesture::{GestureState, PanGestureEvent};
use crate::settings::{ExpansionSettings, SwipeSettings};
use crate::types::{CellId, IndexPath, SwipeDirection, SwipeState};

/// Size of a cell that has not been laid out by a table yet.
pub const DEFAULT_CELL_SIZE: Size = Size::new(320.0, 44.0);

/// Release velocity, in points per second, above which the swipe snaps in
/// the direction of the finger.
pub const INERTIA_VELOCITY: f32 = 100.0;

/// Offsets closer than this are treated as equal when deciding to animate.
const OFFSET_EPSILON: f32 = 0.001;

/// Callback run when an offset change finishes. Receives `true` if the
/// change reached its target, `false` if it was interrupted.
pub type SwipeCompletion = Box<dyn FnOnce(bool) + Send>;

/// Behavior flags of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CellBehavior {
    /// Other rows stay open when this one starts swiping.
    pub allows_multiple_swipe: bool,
    /// Buttons keep their own widths instead of the widest one's.
    pub allows_buttons_with_different_width: bool,
    /// A swipe may start on a visible button.
    pub allows_swipe_when_tapping_buttons: bool,
    /// A swipe may continue into the opposite side.
    pub allows_opposite_swipe: bool,
    /// Swiping keeps the cell highlighted.
    pub preserves_selection_status: bool,
    /// The tap that dismisses an open row also reaches the tapped row.
    pub touch_on_dismiss_swipe: bool,
}

impl Default for CellBehavior {
    fn default() -> Self {
        Self {
            allows_multiple_swipe: false,
            allows_buttons_with_different_width: false,
            allows_swipe_when_tapping_buttons: true,
            allows_opposite_swipe: true,
            preserves_selection_status: false,
            touch_on_dismiss_swipe: false,
        }
    }
}

/// A button tap, emitted by [`SwipeCell::button_tapped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonTap {
    /// The cell the button belongs to.
    pub context: SwipeContext,
    /// Side of the button.
    pub direction: SwipeDirection,
    /// Index of the button in its side.
    pub index: usize,
    /// The tap came from an expansion trigger rather than a finger.
    pub from_expansion: bool,
    /// The buttons are hidden as a result.
    pub auto_hide: bool,
}

/// What a tap on an open cell did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// A button was tapped.
    ButtonTapped {
        /// Side of the button.
        direction: SwipeDirection,
        /// Index of the button.
        index: usize,
        /// The buttons are being hidden.
        auto_hide: bool,
    },
    /// The tap hid the buttons.
    Dismissed,
    /// The tap was not handled by the swipe.
    Ignored,
}

/// Everything the host needs to draw a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeLayout {
    /// Current signed offset.
    pub offset: f32,
    /// Current state.
    pub state: SwipeState,
    /// Side being revealed.
    pub direction: Option<SwipeDirection>,
    /// Frame of the cell content, in cell coordinates.
    pub content: Rect,
    /// Whether the swipe overlay (buttons and moved content) is shown.
    pub overlay_visible: bool,
    /// Color behind the buttons.
    pub swipe_background: Option<Color>,
    /// Color filling the revealed area while an expansion springs back.
    pub backdrop: Option<Color>,
    /// Frames of the revealed side's buttons, in drawing order.
    pub buttons: Vec<ButtonFrame>,
}

enum Completion {
    Callback(SwipeCompletion),
    ExpansionTrigger {
        direction: SwipeDirection,
        index: usize,
    },
    ProgrammaticExpand,
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Callback"),
            Self::ExpansionTrigger { direction, index } => f
                .debug_struct("ExpansionTrigger")
                .field("direction", direction)
                .field("index", index)
                .finish(),
            Self::ProgrammaticExpand => f.write_str("ProgrammaticExpand"),
        }
    }
}

#[derive(Debug, Default)]
struct Side {
    buttons: Vec<SwipeButton>,
    settings: SwipeSettings,
    expansion: ExpansionSettings,
    strip: Option<ButtonStrip>,
}

impl Side {
    fn total_width(&self) -> f32 {
        self.strip.as_ref().map_or(0.0, ButtonStrip::total_width)
    }

    fn has_strip(&self) -> bool {
        self.strip.as_ref().is_some_and(|strip| !strip.is_empty())
    }
}

#[derive(Debug, Clone)]
struct PanSession {
    start_translation: f32,
    start_offset: f32,
    first_direction: Option<SwipeDirection>,
    allow_left: bool,
    allow_right: bool,
    span: tracing::Span,
}

impl PanSession {
    fn allows(&self, direction: SwipeDirection) -> bool {
        match direction {
            SwipeDirection::LeftToRight => self.allow_left,
            SwipeDirection::RightToLeft => self.allow_right,
        }
    }
}

/// A table cell with swipeable buttons on either side.
pub struct SwipeCell {
    id: CellId,
    index_path: Option<IndexPath>,
    size: Size,
    delegate: Option<Arc<dyn SwipeCellDelegate>>,
    left: Side,
    right: Side,
    behavior: CellBehavior,
    swipe_background_color: Option<Color>,

    swipe_state: SwipeState,
    swipe_offset: f32,
    target_offset: f32,
    gesture_active: bool,
    pan: Option<PanSession>,
    animator: OffsetAnimator<Completion>,
    active_expansion: Option<SwipeDirection>,
    /// Set while a triggered expansion animates, so it is not collapsed on the way.
    expansion_locked: bool,

    overlay_visible: bool,
    highlighted: bool,
    editing: bool,
    content_revision: u64,

    /// Emitted with `(state, gesture_active)` when the swipe state changes.
    pub state_changed: Signal<(SwipeState, bool)>,
    /// Emitted after a button is tapped or triggered by an expansion.
    pub button_tapped: Signal<ButtonTap>,
}

impl Default for SwipeCell {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SwipeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeCell")
            .field("id", &self.id)
            .field("index_path", &self.index_path)
            .field("size", &self.size)
            .field("has_delegate", &self.delegate.is_some())
            .field("swipe_state", &self.swipe_state)
            .field("swipe_offset", &self.swipe_offset)
            .field("target_offset", &self.target_offset)
            .field("gesture_active", &self.gesture_active)
            .field("active_expansion", &self.active_expansion)
            .finish_non_exhaustive()
    }
}

impl SwipeCell {
    /// Create a cell with no buttons and default settings.
    pub fn new() -> Self {
        Self {
            id: CellId::next(),
            index_path: None,
            size: DEFAULT_CELL_SIZE,
            delegate: None,
            left: Side::default(),
            right: Side::default(),
            behavior: CellBehavior::default(),
            swipe_background_color: None,
            swipe_state: SwipeState::None,
            swipe_offset: 0.0,
            target_offset: 0.0,
            gesture_active: false,
            pan: None,
            animator: OffsetAnimator::new(),
            active_expansion: None,
            expansion_locked: false,
            overlay_visible: false,
            highlighted: false,
            editing: false,
            content_revision: 0,
            state_changed: Signal::new(),
            button_tapped: Signal::new(),
        }
    }

    /// Set the cell size using builder pattern.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Set the delegate using builder pattern.
    pub fn with_delegate(mut self, delegate: Arc<dyn SwipeCellDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Set the buttons of one side using builder pattern.
    pub fn with_buttons(mut self, direction: SwipeDirection, buttons: Vec<SwipeButton>) -> Self {
        self.set_buttons(direction, buttons);
        self
    }

    // =========================================================================
    // Identity and geometry
    // =========================================================================

    /// The cell's process-unique id.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// The row the cell displays.
    pub fn index_path(&self) -> Option<IndexPath> {
        self.index_path
    }

    /// Attach the cell to a row.
    pub fn set_index_path(&mut self, index_path: Option<IndexPath>) {
        self.index_path = index_path;
    }

    /// Context passed to the delegate and button callbacks.
    pub fn context(&self) -> SwipeContext {
        SwipeContext::new(self.id, self.index_path)
    }

    /// Cell size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Resize the cell. The current offset is kept and buttons are laid out again.
    pub fn set_size(&mut self, size: Size) {
        if self.size == size {
            return;
        }
        self.size = size;
        if self.swipe_offset != 0.0 {
            self.apply_offset(self.swipe_offset);
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// The delegate.
    pub fn delegate(&self) -> Option<&Arc<dyn SwipeCellDelegate>> {
        self.delegate.as_ref()
    }

    /// Set or clear the delegate.
    pub fn set_delegate(&mut self, delegate: Option<Arc<dyn SwipeCellDelegate>>) {
        self.delegate = delegate;
    }

    /// Behavior flags.
    pub fn behavior(&self) -> &CellBehavior {
        &self.behavior
    }

    /// Mutable behavior flags.
    pub fn behavior_mut(&mut self) -> &mut CellBehavior {
        &mut self.behavior
    }

    /// Color drawn behind the buttons.
    pub fn swipe_background_color(&self) -> Option<Color> {
        self.swipe_background_color
    }

    /// Set the color drawn behind the buttons.
    pub fn set_swipe_background_color(&mut self, color: Option<Color>) {
        self.swipe_background_color = color;
    }

    /// Buttons of one side, border first.
    pub fn buttons(&self, direction: SwipeDirection) -> &[SwipeButton] {
        &self.side(direction).buttons
    }

    /// Replace the buttons of one side.
    ///
    /// If that side is open, it is narrowed to fit the new buttons.
    pub fn set_buttons(&mut self, direction: SwipeDirection, buttons: Vec<SwipeButton>) {
        let side = self.side_mut(direction);
        side.buttons = buttons;
        side.strip = None;
        if SwipeDirection::from_offset(self.swipe_offset) == Some(direction) {
            if self.active_expansion == Some(direction) {
                self.active_expansion = None;
            }
            self.build_strips();
            self.fit_open_side();
        }
    }

    /// Swipe settings of one side.
    pub fn settings(&self, direction: SwipeDirection) -> &SwipeSettings {
        &self.side(direction).settings
    }

    /// Mutable swipe settings of one side.
    pub fn settings_mut(&mut self, direction: SwipeDirection) -> &mut SwipeSettings {
        &mut self.side_mut(direction).settings
    }

    /// Expansion settings of one side.
    pub fn expansion(&self, direction: SwipeDirection) -> &ExpansionSettings {
        &self.side(direction).expansion
    }

    /// Mutable expansion settings of one side.
    pub fn expansion_mut(&mut self, direction: SwipeDirection) -> &mut ExpansionSettings {
        &mut self.side_mut(direction).expansion
    }

    /// The laid-out buttons of one side, once they have been built.
    pub fn strip(&self, direction: SwipeDirection) -> Option<&ButtonStrip> {
        self.side(direction).strip.as_ref()
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Current swipe state.
    pub fn swipe_state(&self) -> SwipeState {
        self.swipe_state
    }

    /// Current signed offset.
    pub fn swipe_offset(&self) -> f32 {
        self.swipe_offset
    }

    /// Offset the cell is moving towards.
    pub fn target_offset(&self) -> f32 {
        self.target_offset
    }

    /// Whether a finger is driving the offset.
    pub fn is_gesture_active(&self) -> bool {
        self.gesture_active
    }

    /// Whether an offset animation is running.
    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Whether any buttons are revealed.
    pub fn is_open(&self) -> bool {
        self.swipe_offset != 0.0
    }

    /// Side whose expandable button is expanded.
    pub fn active_expansion(&self) -> Option<SwipeDirection> {
        self.active_expansion
    }

    /// Whether the swipe overlay is shown.
    pub fn is_overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Whether the cell is highlighted.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Highlight the cell. Ignored while the cell is swiped.
    pub fn set_highlighted(&mut self, highlighted: bool) {
        if highlighted && self.overlay_visible {
            return;
        }
        self.highlighted = highlighted;
    }

    /// Whether the table is in editing mode.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Enter or leave editing mode. Entering it closes the cell.
    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
        if editing && self.swipe_offset != 0.0 {
            self.set_swipe_offset(0.0);
        }
    }

    /// Incremented every time the content must be redrawn into the overlay.
    pub fn content_revision(&self) -> u64 {
        self.content_revision
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Feed a pan gesture in cell coordinates.
    ///
    /// Returns `true` if the cell handles the gesture. A gesture refused at
    /// its start is ignored until the next one.
    pub fn handle_pan(&mut self, event: &PanGestureEvent) -> bool {
        match event.state {
            GestureState::Started => self.begin_pan(event),
            GestureState::Updated => self.update_pan(event),
            GestureState::Ended => self.end_pan(event.velocity.x),
            GestureState::Cancelled => self.end_pan(0.0),
        }
    }

    fn begin_pan(&mut self, event: &PanGestureEvent) -> bool {
        self.pan = None;
        let Some((allow_left, allow_right)) =
            self.begin_permissions(event.start_position, event.translation)
        else {
            return false;
        };

        let span = tracing::debug_span!(target: targets::CELL, "swipe_gesture", cell = self.id.as_u64());
        let _entered = span.enter();

        if let Some(Some(completion)) = self.animator.cancel() {
            self.run_completion(completion, false);
        }
        self.gesture_active = true;
        self.target_offset = self.swipe_offset;

        let first_direction = SwipeDirection::from_offset(self.swipe_offset)
            .or_else(|| SwipeDirection::from_offset(event.translation.x));
        tracing::debug!(
            target: targets::CELL,
            offset = self.swipe_offset,
            ?first_direction,
            allow_left,
            allow_right,
            "swipe began"
        );

        self.pan = Some(PanSession {
            start_translation: event.translation.x,
            start_offset: self.swipe_offset,
            first_direction,
            allow_left,
            allow_right,
            span: span.clone(),
        });
        true
    }

    /// Decide whether a pan starting at `point` may swipe the cell, and in
    /// which directions.
    fn begin_permissions(&mut self, point: Point, translation: Point) -> Option<(bool, bool)> {
        if self.editing {
            tracing::debug!(target: targets::CELL, "swipe refused: editing");
            return None;
        }
        if translation.y.abs() > translation.x.abs() {
            tracing::trace!(target: targets::CELL, "swipe refused: vertical pan");
            return None;
        }
        if !self.behavior.allows_swipe_when_tapping_buttons && self.button_at(point).is_some() {
            tracing::debug!(target: targets::CELL, "swipe refused: touch on a button");
            return None;
        }

        self.ensure_buttons();

        if let Some(open) = SwipeDirection::from_offset(self.swipe_offset) {
            let other = open.opposite();
            let other_allowed = self.side(other).has_strip() && self.delegate_allows(other, point);
            return Some(match open {
                SwipeDirection::LeftToRight => (true, other_allowed),
                SwipeDirection::RightToLeft => (other_allowed, true),
            });
        }

        let allow_left = self.left.has_strip() && self.delegate_allows(SwipeDirection::LeftToRight, point);
        let allow_right =
            self.right.has_strip() && self.delegate_allows(SwipeDirection::RightToLeft, point);
        if !allow_left && !allow_right {
            tracing::debug!(target: targets::CELL, "swipe refused: no swipeable side");
            return None;
        }

        let initial = SwipeDirection::from_offset(translation.x);
        let initial_allowed = match initial {
            Some(SwipeDirection::LeftToRight) => allow_left,
            Some(SwipeDirection::RightToLeft) => allow_right,
            None => true,
        };
        if !initial_allowed {
            tracing::debug!(target: targets::CELL, ?initial, "swipe refused: direction not allowed");
            return None;
        }
        Some((allow_left, allow_right))
    }

    fn delegate_allows(&self, direction: SwipeDirection, point: Point) -> bool {
        let cx = self.context();
        self.delegate
            .as_ref()
            .is_none_or(|delegate| delegate.can_swipe(&cx, direction, point))
    }

    fn update_pan(&mut self, event: &PanGestureEvent) -> bool {
        let Some(session) = self.pan.as_mut() else {
            return false;
        };
        let mut candidate = session.start_offset + (event.translation.x - session.start_translation);
        if session.first_direction.is_none() {
            session.first_direction = SwipeDirection::from_offset(candidate);
        }
        let session = session.clone();
        let _entered = session.span.enter();

        if let Some(first) = session.first_direction {
            let opposite = SwipeDirection::from_offset(candidate) == Some(first.opposite());
            if opposite
                && !(self.behavior.allows_opposite_swipe && self.side(first).settings.allows_opposite_swipe)
            {
                candidate = 0.0;
            }
        }

        let offset = self.filter_swipe(candidate, &session);
        tracing::trace!(target: targets::GESTURE, candidate, offset, "swipe moved");
        self.target_offset = offset;
        self.apply_offset(offset);
        true
    }

    /// Restrict a dragged offset to what the revealed side allows.
    fn filter_swipe(&self, candidate: f32, session: &PanSession) -> f32 {
        let Some(direction) = SwipeDirection::from_offset(candidate) else {
            return 0.0;
        };
        let side = self.side(direction);
        let Some(strip) = side.strip.as_ref().filter(|strip| !strip.is_empty()) else {
            return 0.0;
        };
        if !session.allows(direction) {
            return 0.0;
        }

        let total = strip.total_width();
        let magnitude = candidate.abs();
        let bounces =
            side.settings.enable_swipe_bounces && side.expansion.valid_index(strip.len()).is_some();

        let magnitude = if magnitude <= total {
            magnitude
        } else if bounces {
            let rate = side.settings.swipe_bounce_rate.clamp(0.0, 1.0);
            (total + (magnitude - total) * rate).min(self.size.width.max(total))
        } else {
            total
        };
        magnitude * direction.sign()
    }

    fn end_pan(&mut self, velocity: f32) -> bool {
        let Some(session) = self.pan.take() else {
            return false;
        };
        let _entered = session.span.enter();
        self.gesture_active = false;
        self.resolve_release(velocity);
        true
    }

    /// Pick the resting offset after the finger lifts and animate there.
    fn resolve_release(&mut self, velocity: f32) {
        let offset = self.swipe_offset;
        let Some(direction) = SwipeDirection::from_offset(offset) else {
            self.target_offset = 0.0;
            return;
        };
        let sign = direction.sign();
        let magnitude = offset.abs();

        if self.active_expansion == Some(direction) {
            let cell_width = self.size.width;
            let side = self.side_mut(direction);
            let expansion = side.expansion.clone();
            let total = side.total_width();
            let triggered = side.strip.as_mut().and_then(|strip| {
                let index = strip.expanded_index()?;
                if expansion.fill_on_trigger {
                    Some((index, cell_width.max(total) * sign))
                } else {
                    strip.set_backdrop(expansion.expansion_color);
                    Some((index, 0.0))
                }
            });
            if let Some((index, target)) = triggered {
                tracing::debug!(
                    target: targets::CELL,
                    ?direction,
                    index,
                    fill = expansion.fill_on_trigger,
                    "expansion triggered"
                );
                self.expansion_locked = true;
                self.set_offset(
                    target,
                    Some(expansion.trigger_animation),
                    Some(Completion::ExpansionTrigger { direction, index }),
                );
                return;
            }
        }

        let side = self.side(direction);
        let settings = side.settings.clone();
        let total = side.total_width();
        debug_assert!(settings.threshold >= 0.0, "negative swipe threshold");

        let open_target = if settings.keep_buttons_swiped { total * sign } else { 0.0 };
        let mut target = if magnitude >= settings.reveal_threshold(total) {
            open_target
        } else {
            0.0
        };
        if velocity.abs() > INERTIA_VELOCITY {
            target = if velocity.signum() == sign { open_target } else { 0.0 };
        }

        let animation = if target == 0.0 {
            settings.hide_animation
        } else if magnitude > target.abs() {
            settings.stretch_animation
        } else {
            settings.show_animation
        };
        tracing::debug!(target: targets::CELL, offset, velocity, target, "swipe released");
        self.set_offset(target, Some(animation), None);
    }

    /// Handle a tap at `point` (cell coordinates) while the cell is open.
    ///
    /// A tap on a button runs it; a tap on the moved content hides the
    /// buttons unless the delegate objects.
    pub fn handle_tap(&mut self, point: Point) -> TapOutcome {
        if self.swipe_offset == 0.0 {
            return TapOutcome::Ignored;
        }
        if let Some((direction, index)) = self.button_at(point) {
            let auto_hide = self.tap_button(direction, index);
            return TapOutcome::ButtonTapped {
                direction,
                index,
                auto_hide,
            };
        }

        let cx = self.context();
        let hide = self
            .delegate
            .as_ref()
            .is_none_or(|delegate| delegate.should_hide_swipe_on_tap(&cx, point));
        if hide {
            self.hide_swipe(true, None);
            TapOutcome::Dismissed
        } else {
            TapOutcome::Ignored
        }
    }

    /// The revealed button under `point` (cell coordinates).
    pub fn button_at(&self, point: Point) -> Option<(SwipeDirection, usize)> {
        let direction = SwipeDirection::from_offset(self.swipe_offset)?;
        let magnitude = self.swipe_offset.abs();
        let revealed = match direction {
            SwipeDirection::LeftToRight => point.x < magnitude,
            SwipeDirection::RightToLeft => point.x >= self.size.width - magnitude,
        };
        if !revealed {
            return None;
        }
        self.side(direction)
            .strip
            .as_ref()?
            .button_at(point)
            .map(|index| (direction, index))
    }

    /// Run the button at `index` of one side, as if it was tapped.
    ///
    /// Returns whether the buttons are hidden as a result.
    pub fn tap_button(&mut self, direction: SwipeDirection, index: usize) -> bool {
        if index >= self.side(direction).buttons.len() {
            tracing::debug!(target: targets::CELL, ?direction, index, "tap on a missing button ignored");
            return false;
        }
        let auto_hide = self.fire_tap(direction, index, false);
        if auto_hide {
            self.hide_swipe(true, None);
        }
        auto_hide
    }

    fn fire_tap(&mut self, direction: SwipeDirection, index: usize, from_expansion: bool) -> bool {
        let Some(button) = self.side(direction).buttons.get(index).cloned() else {
            return false;
        };
        let cx = self.context();
        let callback_hide = button.invoke(&cx).unwrap_or(false);
        let delegate_hide = self
            .delegate
            .as_ref()
            .is_some_and(|delegate| delegate.button_tapped(&cx, direction, index, from_expansion));
        let auto_hide = callback_hide || delegate_hide;

        tracing::debug!(
            target: targets::CELL,
            ?direction,
            index,
            from_expansion,
            auto_hide,
            "button tapped"
        );
        self.button_tapped.emit(ButtonTap {
            context: cx,
            direction,
            index,
            from_expansion,
            auto_hide,
        });
        auto_hide
    }

    // =========================================================================
    // Programmatic control
    // =========================================================================

    /// Hide the buttons.
    pub fn hide_swipe(&mut self, animated: bool, completion: Option<SwipeCompletion>) {
        let animation = animated.then(|| match SwipeDirection::from_offset(self.swipe_offset) {
            Some(direction) => self.side(direction).settings.hide_animation,
            None => SwipeAnimation::default(),
        });
        self.set_offset(0.0, animation, completion.map(Completion::Callback));
    }

    /// Reveal the buttons of one side.
    ///
    /// If that side has no buttons the completion runs with `false`.
    pub fn show_swipe(
        &mut self,
        direction: SwipeDirection,
        animated: bool,
        completion: Option<SwipeCompletion>,
    ) {
        self.ensure_buttons();
        let side = self.side(direction);
        let total = side.total_width();
        if total <= 0.0 {
            tracing::debug!(target: targets::CELL, ?direction, "no buttons to show");
            if let Some(completion) = completion {
                completion(false);
            }
            return;
        }
        let animation = animated.then_some(side.settings.show_animation);
        self.set_offset(
            total * direction.sign(),
            animation,
            completion.map(Completion::Callback),
        );
    }

    /// Move to `offset` without animation.
    pub fn set_swipe_offset(&mut self, offset: f32) {
        self.set_swipe_offset_with(offset, None, None);
    }

    /// Move to `offset`, animated with the show or hide animation of the
    /// side involved.
    pub fn set_swipe_offset_animated(
        &mut self,
        offset: f32,
        animated: bool,
        completion: Option<SwipeCompletion>,
    ) {
        let animation = animated.then(|| {
            match SwipeDirection::from_offset(offset) {
                Some(direction) => self.side(direction).settings.show_animation,
                None => match SwipeDirection::from_offset(self.swipe_offset) {
                    Some(direction) => self.side(direction).settings.hide_animation,
                    None => SwipeAnimation::default(),
                },
            }
        });
        self.set_swipe_offset_with(offset, animation, completion);
    }

    /// Move to `offset` with an explicit animation, or immediately when
    /// `animation` is `None`.
    ///
    /// The offset is limited to the cell width and to sides that have buttons.
    pub fn set_swipe_offset_with(
        &mut self,
        offset: f32,
        animation: Option<SwipeAnimation>,
        completion: Option<SwipeCompletion>,
    ) {
        self.ensure_buttons();
        let offset = self.clamp_offset(offset);
        self.set_offset(offset, animation, completion.map(Completion::Callback));
    }

    /// Play the expansion of one side as if the user had dragged past its
    /// threshold, then close the cell.
    ///
    /// Only sides whose expansion fills on trigger can be expanded, and only
    /// when no expansion is active.
    pub fn expand_swipe(&mut self, direction: SwipeDirection, animated: bool) {
        if self.active_expansion.is_some() || !self.side(direction).expansion.fill_on_trigger {
            return;
        }
        self.ensure_buttons();
        let side = self.side(direction);
        let Some(strip) = side.strip.as_ref() else {
            return;
        };
        if side.expansion.valid_index(strip.len()).is_none() {
            return;
        }
        let target = strip.total_width() * side.expansion.threshold * 2.0 * direction.sign();
        let animation = animated.then_some(side.expansion.trigger_animation);
        tracing::debug!(target: targets::CELL, ?direction, target, "expanding programmatically");
        self.set_offset(target, animation, Some(Completion::ProgrammaticExpand));
    }

    /// Mark the content as changed so the host redraws it into the overlay.
    pub fn refresh_content_view(&mut self) {
        self.content_revision = self.content_revision.wrapping_add(1);
        tracing::trace!(target: targets::CELL, revision = self.content_revision, "content refreshed");
    }

    /// Rebuild the buttons. With `use_delegate`, they are fetched from the
    /// delegate again.
    ///
    /// An open side is narrowed to fit its rebuilt buttons.
    pub fn refresh_buttons(&mut self, use_delegate: bool) {
        if use_delegate {
            self.left.buttons.clear();
            self.right.buttons.clear();
        }
        self.end_expansions();
        self.left.strip = None;
        self.right.strip = None;
        self.ensure_buttons();
        self.fit_open_side();
    }

    /// Reset the cell before it displays another row.
    pub fn prepare_for_reuse(&mut self) {
        tracing::debug!(target: targets::CELL, cell = self.id.as_u64(), "preparing for reuse");
        if let Some(Some(completion)) = self.animator.cancel() {
            self.run_completion(completion, false);
        }
        self.pan = None;
        self.gesture_active = false;
        self.expansion_locked = false;
        self.end_expansions();
        self.apply_offset(0.0);
        self.target_offset = 0.0;

        if self.delegate.as_ref().is_some_and(|delegate| delegate.provides_buttons()) {
            self.left = Side::default();
            self.right = Side::default();
        } else {
            self.left.strip = None;
            self.right.strip = None;
        }
        self.highlighted = false;
        self.editing = false;
        self.refresh_content_view();
    }

    // =========================================================================
    // Frames
    // =========================================================================

    /// Advance running animations to `now`. Returns `true` if the layout changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut morphed = false;
        for strip in [self.left.strip.as_mut(), self.right.strip.as_mut()]
            .into_iter()
            .flatten()
        {
            morphed |= strip.tick(now);
        }

        let moved = match self.animator.tick(now) {
            AnimationTick::Idle => false,
            AnimationTick::Running { value } => {
                self.apply_offset(value);
                true
            }
            AnimationTick::Finished { value, completion } => {
                self.apply_offset(value);
                if let Some(completion) = completion {
                    self.run_completion(completion, true);
                }
                true
            }
        };

        if morphed && !moved {
            self.apply_offset(self.swipe_offset);
        }
        moved || morphed
    }

    /// What to draw for the current frame.
    pub fn layout(&self) -> SwipeLayout {
        let direction = SwipeDirection::from_offset(self.swipe_offset);
        let side = direction.map(|direction| self.side(direction));
        let strip = side.and_then(|side| side.strip.as_ref());
        let only_buttons = side.is_some_and(|side| side.settings.only_swipe_buttons);
        let content_offset = if only_buttons { 0.0 } else { self.swipe_offset };

        SwipeLayout {
            offset: self.swipe_offset,
            state: self.swipe_state,
            direction,
            content: Rect::from_size(self.size).translate_x(content_offset),
            overlay_visible: self.overlay_visible,
            swipe_background: self.swipe_background_color,
            backdrop: strip.and_then(ButtonStrip::backdrop),
            buttons: strip.map(|strip| strip.frames().to_vec()).unwrap_or_default(),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn side(&self, direction: SwipeDirection) -> &Side {
        match direction {
            SwipeDirection::LeftToRight => &self.left,
            SwipeDirection::RightToLeft => &self.right,
        }
    }

    fn side_mut(&mut self, direction: SwipeDirection) -> &mut Side {
        match direction {
            SwipeDirection::LeftToRight => &mut self.left,
            SwipeDirection::RightToLeft => &mut self.right,
        }
    }

    /// Fetch missing buttons from the delegate and build missing strips.
    fn ensure_buttons(&mut self) {
        if let Some(delegate) = self.delegate.clone() {
            let cx = self.context();
            for direction in [SwipeDirection::LeftToRight, SwipeDirection::RightToLeft] {
                let side = self.side_mut(direction);
                if !side.buttons.is_empty() {
                    continue;
                }
                if let Some(buttons) =
                    delegate.swipe_buttons(&cx, direction, &mut side.settings, &mut side.expansion)
                {
                    tracing::debug!(
                        target: targets::CELL,
                        ?direction,
                        count = buttons.len(),
                        "fetched buttons from delegate"
                    );
                    side.buttons = buttons;
                    side.strip = None;
                }
            }
        }
        self.build_strips();
    }

    fn build_strips(&mut self) {
        let different_widths = self.behavior.allows_buttons_with_different_width;
        for direction in [SwipeDirection::LeftToRight, SwipeDirection::RightToLeft] {
            let side = self.side_mut(direction);
            if side.strip.is_none() && !side.buttons.is_empty() {
                if let Some(index) = side.expansion.button_index
                    && index >= side.buttons.len()
                {
                    tracing::warn!(
                        target: targets::BUTTONS,
                        ?direction,
                        index,
                        count = side.buttons.len(),
                        "expansion index out of range, side will not expand"
                    );
                }
                side.strip = Some(ButtonStrip::new(direction, side.buttons.clone(), different_widths));
            }
        }
    }

    fn clamp_offset(&self, offset: f32) -> f32 {
        let Some(direction) = SwipeDirection::from_offset(offset) else {
            return 0.0;
        };
        let total = self.side(direction).total_width();
        if total <= 0.0 {
            return 0.0;
        }
        offset.abs().min(self.size.width.max(total)) * direction.sign()
    }

    /// Bring the open side back within its buttons after they were rebuilt.
    fn fit_open_side(&mut self) {
        let Some(direction) = SwipeDirection::from_offset(self.swipe_offset) else {
            return;
        };
        let offset = if self.active_expansion == Some(direction) {
            self.clamp_offset(self.swipe_offset)
        } else {
            let total = self.side(direction).total_width();
            self.swipe_offset.abs().min(total) * direction.sign()
        };
        if offset != self.swipe_offset {
            tracing::debug!(
                target: targets::CELL,
                ?direction,
                from = self.swipe_offset,
                to = offset,
                "open side narrowed to its buttons"
            );
        }
        if !self.animator.is_running() && !self.gesture_active {
            self.target_offset = offset;
        }
        self.apply_offset(offset);
    }

    fn end_expansions(&mut self) {
        for strip in [self.left.strip.as_mut(), self.right.strip.as_mut()]
            .into_iter()
            .flatten()
        {
            strip.end_expansion(false, 0.0);
        }
        self.active_expansion = None;
    }

    /// Move to `target`, animated when `animation` is given and the offset
    /// actually changes. Interrupts any running animation.
    fn set_offset(
        &mut self,
        target: f32,
        animation: Option<SwipeAnimation>,
        completion: Option<Completion>,
    ) {
        if let Some(Some(previous)) = self.animator.cancel() {
            self.run_completion(previous, false);
        }
        self.target_offset = target;

        match animation.filter(|animation| animation.duration > 0.0) {
            Some(animation) if (target - self.swipe_offset).abs() > OFFSET_EPSILON => {
                tracing::trace!(
                    target: targets::ANIMATION,
                    from = self.swipe_offset,
                    to = target,
                    "animating swipe offset"
                );
                self.animator.start(self.swipe_offset, target, animation, completion);
            }
            _ => {
                self.apply_offset(target);
                if let Some(completion) = completion {
                    self.run_completion(completion, true);
                }
            }
        }
    }

    fn run_completion(&mut self, completion: Completion, finished: bool) {
        match completion {
            Completion::Callback(callback) => callback(finished),
            Completion::ExpansionTrigger { direction, index } => {
                self.expansion_locked = false;
                if let Some(strip) = self.side_mut(direction).strip.as_mut() {
                    strip.set_backdrop(None);
                }
                if !finished {
                    return;
                }
                if self.fire_tap(direction, index, true) {
                    self.end_expansions();
                    self.set_offset(0.0, None, None);
                }
            }
            Completion::ProgrammaticExpand => {
                if finished {
                    self.end_expansions();
                    self.set_offset(0.0, None, None);
                }
            }
        }
    }

    /// Show `offset` and derive the overlay, expansion and state from it.
    fn apply_offset(&mut self, offset: f32) {
        let direction =
            SwipeDirection::from_offset(offset).filter(|direction| self.side(*direction).has_strip());
        let Some(direction) = direction else {
            self.swipe_offset = 0.0;
            self.end_expansions();
            self.update_state(SwipeState::None);
            self.set_overlay_visible(false);
            return;
        };

        self.swipe_offset = offset;
        self.set_overlay_visible(true);

        if let Some(other) = self.active_expansion.filter(|active| *active != direction) {
            if let Some(strip) = self.side_mut(other).strip.as_mut() {
                strip.end_expansion(false, 0.0);
            }
            self.active_expansion = None;
        }

        let magnitude = offset.abs();
        let side = match direction {
            SwipeDirection::LeftToRight => &mut self.left,
            SwipeDirection::RightToLeft => &mut self.right,
        };
        if let Some(strip) = side.strip.as_mut() {
            let total = strip.total_width();
            let expansion = &side.expansion;
            match expansion.valid_index(strip.len()) {
                Some(index) if total > 0.0 && magnitude > expansion.trigger_offset(total) => {
                    if self.active_expansion != Some(direction) {
                        strip.expand(
                            index,
                            expansion.expansion_color,
                            expansion.expansion_layout,
                            expansion.animation_duration,
                        );
                        self.active_expansion = Some(direction);
                    }
                }
                _ if self.active_expansion == Some(direction) && !self.expansion_locked => {
                    strip.end_expansion(true, expansion.animation_duration);
                    self.active_expansion = None;
                }
                _ => {}
            }
            strip.layout(&side.settings, magnitude, self.size);
        }

        let state = if self.active_expansion == Some(direction) {
            direction.expanding_state()
        } else {
            direction.swiping_state()
        };
        self.update_state(state);
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        if self.overlay_visible == visible {
            return;
        }
        self.overlay_visible = visible;
        let cx = self.context();
        if visible {
            if !self.behavior.preserves_selection_status {
                self.highlighted = false;
            }
            if let Some(delegate) = &self.delegate {
                delegate.will_begin_swiping(&cx);
            }
        } else if let Some(delegate) = &self.delegate {
            delegate.will_end_swiping(&cx);
        }
    }

    fn update_state(&mut self, state: SwipeState) {
        if self.swipe_state == state {
            return;
        }
        let previous = std::mem::replace(&mut self.swipe_state, state);
        tracing::debug!(
            target: targets::CELL,
            cell = self.id.as_u64(),
            ?previous,
            ?state,
            gesture_active = self.gesture_active,
            "swipe state changed"
        );
        if let Some(delegate) = &self.delegate {
            delegate.swipe_state_changed(&self.context(), state, self.gesture_active);
        }
        self.state_changed.emit((state, self.gesture_active));
    }
}

static_assertions::assert_impl_all!(SwipeCell: Send);

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use parking_lot::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::animation::Easing;

    fn pan(state: GestureState, dx: f32, dy: f32, velocity: f32) -> PanGestureEvent {
        let start = Point::new(160.0, 22.0);
        PanGestureEvent::new(
            state,
            Point::new(start.x + dx, start.y + dy),
            start,
            Point::ZERO,
            Point::new(velocity, 0.0),
        )
    }

    fn two_buttons() -> Vec<SwipeButton> {
        vec![
            SwipeButton::new("Delete", Color::RED).with_width(100.0),
            SwipeButton::new("More", Color::GRAY).with_width(100.0),
        ]
    }

    fn setup() -> SwipeCell {
        SwipeCell::new().with_buttons(SwipeDirection::RightToLeft, two_buttons())
    }

    /// Drag right-to-left by `distance` and release with `velocity`.
    fn drag(cell: &mut SwipeCell, distance: f32, velocity: f32) {
        assert!(cell.handle_pan(&pan(GestureState::Started, -12.0, 0.0, 0.0)));
        cell.handle_pan(&pan(GestureState::Updated, -12.0 - distance, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Ended, -12.0 - distance, 0.0, velocity));
    }

    fn settle(cell: &mut SwipeCell) {
        let t0 = Instant::now();
        cell.tick(t0);
        cell.tick(t0 + Duration::from_secs(2));
    }

    #[test]
    fn test_drag_follows_finger() {
        let mut cell = setup();
        cell.handle_pan(&pan(GestureState::Started, -12.0, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Updated, -62.0, 0.0, 0.0));

        assert_eq!(cell.swipe_offset(), -50.0);
        assert_eq!(cell.swipe_state(), SwipeState::SwipingRightToLeft);
        assert!(cell.is_gesture_active());
        assert!(cell.is_overlay_visible());
    }

    #[test]
    fn test_drag_clamped_to_buttons_width() {
        let mut cell = setup();
        cell.handle_pan(&pan(GestureState::Started, -12.0, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Updated, -400.0, 0.0, 0.0));
        assert_eq!(cell.swipe_offset(), -200.0);

        // No left buttons: dragging the other way stops at zero.
        cell.handle_pan(&pan(GestureState::Updated, 80.0, 0.0, 0.0));
        assert_eq!(cell.swipe_offset(), 0.0);
        assert_eq!(cell.swipe_state(), SwipeState::None);
    }

    #[test]
    fn test_release_below_threshold_hides() {
        let mut cell = setup();
        drag(&mut cell, 80.0, 0.0);
        assert_eq!(cell.target_offset(), 0.0);
        assert!(cell.is_animating());

        settle(&mut cell);
        assert_eq!(cell.swipe_offset(), 0.0);
        assert_eq!(cell.swipe_state(), SwipeState::None);
        assert!(!cell.is_overlay_visible());
    }

    #[test]
    fn test_release_past_threshold_opens() {
        let mut cell = setup();
        drag(&mut cell, 120.0, 0.0);
        assert_eq!(cell.target_offset(), -200.0);

        settle(&mut cell);
        assert_eq!(cell.swipe_offset(), -200.0);
        assert!(!cell.is_animating());
    }

    #[test]
    fn test_release_without_keep_buttons_swiped() {
        let mut cell = setup();
        cell.settings_mut(SwipeDirection::RightToLeft).keep_buttons_swiped = false;
        drag(&mut cell, 120.0, 0.0);
        assert_eq!(cell.target_offset(), 0.0);
    }

    #[test]
    fn test_release_inertia() {
        let mut cell = setup();
        // Short drag flicked open.
        drag(&mut cell, 40.0, -500.0);
        assert_eq!(cell.target_offset(), -200.0);

        // Long drag flicked closed.
        let mut cell = setup();
        drag(&mut cell, 150.0, 300.0);
        assert_eq!(cell.target_offset(), 0.0);
    }

    #[test]
    fn test_release_at_target_does_not_animate() {
        let mut cell = setup();
        drag(&mut cell, 200.0, 0.0);
        assert_eq!(cell.swipe_offset(), -200.0);
        assert!(!cell.is_animating());
    }

    #[test]
    fn test_vertical_pan_refused() {
        let mut cell = setup();
        assert!(!cell.handle_pan(&pan(GestureState::Started, -5.0, 30.0, 0.0)));
        assert!(!cell.handle_pan(&pan(GestureState::Updated, -60.0, 30.0, 0.0)));
        assert_eq!(cell.swipe_offset(), 0.0);
    }

    #[test]
    fn test_direction_without_buttons_refused() {
        let mut cell = setup();
        assert!(!cell.handle_pan(&pan(GestureState::Started, 12.0, 0.0, 0.0)));
    }

    #[test]
    fn test_editing_refuses_swipe() {
        let mut cell = setup();
        cell.set_editing(true);
        assert!(!cell.handle_pan(&pan(GestureState::Started, -12.0, 0.0, 0.0)));
    }

    #[test]
    fn test_opposite_swipe_disallowed() {
        let mut cell = setup().with_buttons(SwipeDirection::LeftToRight, two_buttons());
        cell.behavior_mut().allows_opposite_swipe = false;

        cell.handle_pan(&pan(GestureState::Started, -12.0, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Updated, -60.0, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Updated, 60.0, 0.0, 0.0));
        assert_eq!(cell.swipe_offset(), 0.0);

        cell.behavior_mut().allows_opposite_swipe = true;
        cell.handle_pan(&pan(GestureState::Updated, 60.0, 0.0, 0.0));
        assert_eq!(cell.swipe_offset(), 72.0);
        assert_eq!(cell.swipe_state(), SwipeState::SwipingLeftToRight);
    }

    #[test]
    fn test_new_gesture_interrupts_animation() {
        let mut cell = setup();
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = reported.clone();
        cell.show_swipe(
            SwipeDirection::RightToLeft,
            true,
            Some(Box::new(move |finished| sink.lock().push(finished))),
        );
        assert!(cell.is_animating());

        cell.handle_pan(&pan(GestureState::Started, -12.0, 0.0, 0.0));
        assert!(!cell.is_animating());
        assert_eq!(*reported.lock(), vec![false]);
    }

    #[test]
    fn test_show_swipe_without_buttons_reports_failure() {
        let mut cell = setup();
        let reported = Arc::new(Mutex::new(None));
        let sink = reported.clone();
        cell.show_swipe(
            SwipeDirection::LeftToRight,
            true,
            Some(Box::new(move |finished| *sink.lock() = Some(finished))),
        );
        assert_eq!(*reported.lock(), Some(false));
        assert_eq!(cell.swipe_offset(), 0.0);
    }

    #[test]
    fn test_set_swipe_offset_immediate_completes() {
        let mut cell = setup();
        let reported = Arc::new(Mutex::new(None));
        let sink = reported.clone();
        cell.set_swipe_offset_with(
            -150.0,
            None,
            Some(Box::new(move |finished| *sink.lock() = Some(finished))),
        );
        assert_eq!(cell.swipe_offset(), -150.0);
        assert_eq!(*reported.lock(), Some(true));

        cell.set_swipe_offset(75.0);
        assert_eq!(cell.swipe_offset(), 0.0, "left side has no buttons");
    }

    #[test]
    fn test_state_changes_notify_once() {
        let mut cell = setup();
        let states = Arc::new(Mutex::new(Vec::new()));
        let sink = states.clone();
        cell.state_changed.connect(move |&(state, active)| sink.lock().push((state, active)));

        cell.handle_pan(&pan(GestureState::Started, -12.0, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Updated, -40.0, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Updated, -90.0, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Ended, -90.0, 0.0, 0.0));
        settle(&mut cell);

        assert_eq!(
            *states.lock(),
            vec![
                (SwipeState::SwipingRightToLeft, true),
                (SwipeState::None, false),
            ]
        );
    }

    #[test]
    fn test_tap_button_runs_callback_and_hides() {
        let taps = Arc::new(AtomicUsize::new(0));
        let counter = taps.clone();
        let mut cell = SwipeCell::new().with_buttons(
            SwipeDirection::RightToLeft,
            vec![
                SwipeButton::new("Delete", Color::RED)
                    .with_width(100.0)
                    .with_callback(move |_| {
                        counter.fetch_add(1, Ordering::SeqCst);
                        true
                    }),
            ],
        );
        cell.set_swipe_offset(-100.0);

        let outcome = cell.handle_tap(Point::new(280.0, 20.0));
        assert_eq!(
            outcome,
            TapOutcome::ButtonTapped {
                direction: SwipeDirection::RightToLeft,
                index: 0,
                auto_hide: true
            }
        );
        assert_eq!(taps.load(Ordering::SeqCst), 1);
        assert_eq!(cell.target_offset(), 0.0);
    }

    #[test]
    fn test_tap_on_content_dismisses() {
        let mut cell = setup();
        cell.set_swipe_offset(-200.0);
        assert_eq!(cell.handle_tap(Point::new(40.0, 20.0)), TapOutcome::Dismissed);
        assert!(cell.is_animating());

        let mut closed = setup();
        assert_eq!(closed.handle_tap(Point::new(40.0, 20.0)), TapOutcome::Ignored);
    }

    #[test]
    fn test_swipe_blocked_on_buttons() {
        let mut cell = setup();
        cell.behavior_mut().allows_swipe_when_tapping_buttons = false;
        cell.set_swipe_offset(-200.0);

        let on_button = PanGestureEvent::new(
            GestureState::Started,
            Point::new(270.0, 20.0),
            Point::new(290.0, 20.0),
            Point::ZERO,
            Point::ZERO,
        );
        assert!(!cell.handle_pan(&on_button));
    }

    #[test]
    fn test_expansion_fill_on_trigger() {
        let mut cell = setup();
        *cell.expansion_mut(SwipeDirection::RightToLeft) = ExpansionSettings::expandable(0)
            .with_fill_on_trigger(true)
            .with_threshold(1.2);

        cell.handle_pan(&pan(GestureState::Started, -12.0, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Updated, -262.0, 0.0, 0.0));
        assert_eq!(cell.swipe_offset(), -250.0);
        assert_eq!(cell.swipe_state(), SwipeState::ExpandingRightToLeft);

        cell.handle_pan(&pan(GestureState::Ended, -262.0, 0.0, 0.0));
        assert_eq!(cell.target_offset(), -320.0);
        settle(&mut cell);

        assert_eq!(cell.swipe_offset(), -320.0);
        let layout = cell.layout();
        let expanded = layout.buttons.last().copied().unwrap();
        assert_eq!(expanded.index, 0);
        assert_eq!(expanded.frame.width(), 320.0);
    }

    #[test]
    fn test_expansion_collapses_when_dragged_back() {
        let mut cell = setup();
        *cell.expansion_mut(SwipeDirection::RightToLeft) = ExpansionSettings::expandable(0);

        cell.handle_pan(&pan(GestureState::Started, -12.0, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Updated, -320.0, 0.0, 0.0));
        assert_eq!(cell.active_expansion(), Some(SwipeDirection::RightToLeft));

        cell.handle_pan(&pan(GestureState::Updated, -150.0, 0.0, 0.0));
        assert_eq!(cell.active_expansion(), None);
        assert_eq!(cell.swipe_state(), SwipeState::SwipingRightToLeft);
    }

    #[test]
    fn test_bounce_rate_damps_overdrag() {
        let mut cell = setup();
        *cell.expansion_mut(SwipeDirection::RightToLeft) = ExpansionSettings::expandable(0);
        cell.settings_mut(SwipeDirection::RightToLeft).swipe_bounce_rate = 0.5;

        cell.handle_pan(&pan(GestureState::Started, -12.0, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Updated, -252.0, 0.0, 0.0));
        assert_eq!(cell.swipe_offset(), -220.0);
    }

    #[test]
    fn test_expand_swipe_programmatic() {
        let mut cell = setup();
        *cell.expansion_mut(SwipeDirection::RightToLeft) =
            ExpansionSettings::expandable(0).with_fill_on_trigger(true);

        cell.expand_swipe(SwipeDirection::RightToLeft, false);
        assert_eq!(cell.swipe_offset(), 0.0);
        assert_eq!(cell.swipe_state(), SwipeState::None);

        // Not fill-on-trigger: nothing happens.
        cell.expansion_mut(SwipeDirection::RightToLeft).fill_on_trigger = false;
        cell.expand_swipe(SwipeDirection::RightToLeft, true);
        assert!(!cell.is_animating());
    }

    #[test]
    fn test_only_swipe_buttons_keeps_content() {
        let mut cell = setup();
        cell.settings_mut(SwipeDirection::RightToLeft).only_swipe_buttons = true;
        cell.set_swipe_offset(-100.0);
        assert_eq!(cell.layout().content.left(), 0.0);

        cell.settings_mut(SwipeDirection::RightToLeft).only_swipe_buttons = false;
        assert_eq!(cell.layout().content.left(), -100.0);
    }

    #[test]
    fn test_prepare_for_reuse_resets() {
        let mut cell = setup();
        cell.set_index_path(Some(IndexPath::new(0, 3)));
        cell.set_swipe_offset(-200.0);
        let revision = cell.content_revision();

        cell.prepare_for_reuse();
        assert_eq!(cell.swipe_offset(), 0.0);
        assert_eq!(cell.swipe_state(), SwipeState::None);
        assert!(cell.strip(SwipeDirection::RightToLeft).is_none());
        // Buttons set directly survive reuse.
        assert_eq!(cell.buttons(SwipeDirection::RightToLeft).len(), 2);
        assert!(cell.content_revision() > revision);
    }

    #[test]
    fn test_hide_animation_uses_settings() {
        let mut cell = setup();
        cell.settings_mut(SwipeDirection::RightToLeft).hide_animation =
            SwipeAnimation::new(0.5, Easing::Linear);
        cell.set_swipe_offset(-200.0);
        cell.hide_swipe(true, None);

        let t0 = Instant::now();
        cell.tick(t0);
        cell.tick(t0 + Duration::from_millis(250));
        assert!((cell.swipe_offset() + 100.0).abs() < 0.5);
    }

    #[test]
    fn test_fewer_buttons_narrow_open_side() {
        let mut cell = setup();
        cell.set_swipe_offset(-200.0);

        let one = vec![SwipeButton::new("Delete", Color::RED).with_width(100.0)];
        cell.set_buttons(SwipeDirection::RightToLeft, one);
        assert_eq!(cell.swipe_offset(), -100.0);
        assert_eq!(cell.target_offset(), -100.0);
        assert_eq!(cell.swipe_state(), SwipeState::SwipingRightToLeft);

        cell.refresh_buttons(false);
        assert_eq!(cell.swipe_offset(), -100.0);

        cell.set_buttons(SwipeDirection::RightToLeft, Vec::new());
        assert_eq!(cell.swipe_offset(), 0.0);
        assert_eq!(cell.swipe_state(), SwipeState::None);
    }

    struct Provider {
        count: AtomicUsize,
        calls: AtomicUsize,
    }

    impl SwipeCellDelegate for Provider {
        fn provides_buttons(&self) -> bool {
            true
        }

        fn swipe_buttons(
            &self,
            _cx: &SwipeContext,
            direction: SwipeDirection,
            _settings: &mut SwipeSettings,
            _expansion: &mut ExpansionSettings,
        ) -> Option<Vec<SwipeButton>> {
            if direction != SwipeDirection::RightToLeft {
                return None;
            }
            self.calls.fetch_add(1, Ordering::SeqCst);
            let count = self.count.load(Ordering::SeqCst);
            Some(
                (0..count)
                    .map(|i| SwipeButton::new(format!("Action {i}"), Color::GRAY).with_width(100.0))
                    .collect(),
            )
        }
    }

    #[test]
    fn test_refresh_buttons_from_delegate() {
        let provider = Arc::new(Provider {
            count: AtomicUsize::new(2),
            calls: AtomicUsize::new(0),
        });
        let mut cell = SwipeCell::new().with_delegate(provider.clone());
        cell.show_swipe(SwipeDirection::RightToLeft, false, None);
        assert_eq!(cell.swipe_offset(), -200.0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        // Without the delegate, the existing buttons are laid out again.
        provider.count.store(1, Ordering::SeqCst);
        cell.refresh_buttons(false);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cell.buttons(SwipeDirection::RightToLeft).len(), 2);

        cell.refresh_buttons(true);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cell.buttons(SwipeDirection::RightToLeft).len(), 1);
        assert_eq!(cell.swipe_offset(), -100.0);
    }

    #[test]
    fn test_set_swipe_offset_animated_picks_animation() {
        let mut cell = setup();
        let settings = cell.settings_mut(SwipeDirection::RightToLeft);
        settings.show_animation = SwipeAnimation::new(0.4, Easing::Linear);
        settings.hide_animation = SwipeAnimation::new(0.2, Easing::Linear);

        cell.set_swipe_offset_animated(-200.0, true, None);
        let t0 = Instant::now();
        cell.tick(t0);
        cell.tick(t0 + Duration::from_millis(200));
        assert!((cell.swipe_offset() + 100.0).abs() < 0.5, "show animation runs 0.4 s");
        cell.tick(t0 + Duration::from_millis(400));
        assert_eq!(cell.swipe_offset(), -200.0);

        cell.set_swipe_offset_animated(0.0, true, None);
        let t1 = t0 + Duration::from_millis(500);
        cell.tick(t1);
        cell.tick(t1 + Duration::from_millis(100));
        assert!((cell.swipe_offset() + 100.0).abs() < 0.5, "hide animation runs 0.2 s");

        cell.set_swipe_offset_animated(-150.0, false, None);
        assert_eq!(cell.swipe_offset(), -150.0);
        assert!(!cell.is_animating());
    }

    struct KeepOpen;

    impl SwipeCellDelegate for KeepOpen {
        fn should_hide_swipe_on_tap(&self, _cx: &SwipeContext, _point: Point) -> bool {
            false
        }
    }

    #[test]
    fn test_tap_on_content_kept_open_by_delegate() {
        let mut cell = setup().with_delegate(Arc::new(KeepOpen));
        cell.set_swipe_offset(-200.0);

        assert_eq!(cell.handle_tap(Point::new(40.0, 20.0)), TapOutcome::Ignored);
        assert_eq!(cell.swipe_offset(), -200.0);
        assert!(!cell.is_animating());
    }

    #[test]
    fn test_preserves_selection_status() {
        let mut cell = setup();
        cell.set_highlighted(true);
        cell.set_swipe_offset(-100.0);
        assert!(!cell.is_highlighted());

        let mut cell = setup();
        cell.behavior_mut().preserves_selection_status = true;
        cell.set_highlighted(true);
        cell.set_swipe_offset(-100.0);
        assert!(cell.is_highlighted());
    }

    #[test]
    fn test_opposite_swipe_per_side() {
        // The side the swipe started on decides.
        let mut cell = setup().with_buttons(SwipeDirection::LeftToRight, two_buttons());
        cell.settings_mut(SwipeDirection::RightToLeft).allows_opposite_swipe = false;
        cell.handle_pan(&pan(GestureState::Started, -12.0, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Updated, -60.0, 0.0, 0.0));
        assert_eq!(cell.swipe_offset(), -48.0);
        cell.handle_pan(&pan(GestureState::Updated, 60.0, 0.0, 0.0));
        assert_eq!(cell.swipe_offset(), 0.0);

        let mut cell = setup().with_buttons(SwipeDirection::LeftToRight, two_buttons());
        cell.settings_mut(SwipeDirection::LeftToRight).allows_opposite_swipe = false;
        cell.handle_pan(&pan(GestureState::Started, -12.0, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Updated, -60.0, 0.0, 0.0));
        cell.handle_pan(&pan(GestureState::Updated, 60.0, 0.0, 0.0));
        assert_eq!(cell.swipe_offset(), 72.0);
    }

    #[test]
    fn test_buttons_with_different_width() {
        let mut cell = SwipeCell::new().with_buttons(
            SwipeDirection::RightToLeft,
            vec![
                SwipeButton::new("Flag", Color::ORANGE).with_width(60.0),
                SwipeButton::new("Delete", Color::RED).with_width(100.0),
            ],
        );
        cell.show_swipe(SwipeDirection::RightToLeft, false, None);
        assert_eq!(cell.swipe_offset(), -200.0, "widths equalized to the widest");

        cell.behavior_mut().allows_buttons_with_different_width = true;
        cell.refresh_buttons(false);
        let strip = cell.strip(SwipeDirection::RightToLeft).unwrap();
        assert_eq!(strip.widths(), &[60.0, 100.0]);
        assert_eq!(cell.swipe_offset(), -160.0);

        cell.hide_swipe(false, None);
        cell.show_swipe(SwipeDirection::RightToLeft, false, None);
        assert_eq!(cell.swipe_offset(), -160.0);
    }
}
