//! Cell delegate: policy hooks and notifications from a swipe cell.

use swipe_table_core::Point;

use crate::button::SwipeButton;
use crate::settings::{ExpansionSettings, SwipeSettings};
use crate::types::{CellId, IndexPath, SwipeDirection, SwipeState};

/// Identifies the cell a delegate call is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwipeContext {
    /// The cell instance.
    pub cell_id: CellId,
    /// The row the cell currently displays, if it is on screen.
    pub index_path: Option<IndexPath>,
}

impl SwipeContext {
    /// Create a context.
    pub fn new(cell_id: CellId, index_path: Option<IndexPath>) -> Self {
        Self {
            cell_id,
            index_path,
        }
    }
}

/// Receives swipe policy questions and notifications from a cell.
///
/// Every method has a default, so implementors only override what they
/// need. A cell without a delegate behaves as if it had one that uses
/// every default.
pub trait SwipeCellDelegate: Send + Sync {
    /// Whether the cell may be swiped in `direction`, starting at `point`
    /// (cell coordinates).
    ///
    /// A side without buttons is never swipeable regardless of the answer.
    fn can_swipe(&self, cx: &SwipeContext, direction: SwipeDirection, point: Point) -> bool {
        let _ = (cx, direction, point);
        true
    }

    /// The swipe state changed. `gesture_active` is true while a finger drives
    /// the change.
    fn swipe_state_changed(&self, cx: &SwipeContext, state: SwipeState, gesture_active: bool) {
        let _ = (cx, state, gesture_active);
    }

    /// A button was tapped, or triggered by an expansion when
    /// `from_expansion` is true.
    ///
    /// Returns `true` to hide the buttons. The result is combined with the
    /// button's own callback: either one asking to hide wins.
    fn button_tapped(
        &self,
        cx: &SwipeContext,
        direction: SwipeDirection,
        index: usize,
        from_expansion: bool,
    ) -> bool {
        let _ = (cx, direction, index, from_expansion);
        false
    }

    /// Whether this delegate supplies buttons through
    /// [`swipe_buttons`](Self::swipe_buttons).
    ///
    /// Cells whose delegate provides buttons drop them on reuse and fetch
    /// them again on the next swipe.
    fn provides_buttons(&self) -> bool {
        false
    }

    /// Buttons for one side, fetched lazily when a swipe begins.
    ///
    /// The settings for that side can be adjusted in place. `None` keeps the
    /// buttons the cell already has.
    fn swipe_buttons(
        &self,
        cx: &SwipeContext,
        direction: SwipeDirection,
        settings: &mut SwipeSettings,
        expansion: &mut ExpansionSettings,
    ) -> Option<Vec<SwipeButton>> {
        let _ = (cx, direction, settings, expansion);
        None
    }

    /// Whether a tap on the swiped content at `point` hides the buttons.
    fn should_hide_swipe_on_tap(&self, cx: &SwipeContext, point: Point) -> bool {
        let _ = (cx, point);
        true
    }

    /// The cell is about to leave the `None` state.
    fn will_begin_swiping(&self, cx: &SwipeContext) {
        let _ = cx;
    }

    /// The cell returned to the `None` state.
    fn will_end_swiping(&self, cx: &SwipeContext) {
        let _ = cx;
    }
}
