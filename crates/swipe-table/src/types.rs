//! Shared swipe vocabulary: directions, states and row addressing.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Direction of a swipe.
///
/// A left-to-right swipe reveals the left buttons and produces a positive
/// offset; a right-to-left swipe reveals the right buttons and produces a
/// negative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    /// Finger moves right, left buttons appear.
    LeftToRight,
    /// Finger moves left, right buttons appear.
    RightToLeft,
}

impl SwipeDirection {
    /// Direction implied by the sign of an offset. Zero has no direction.
    #[inline]
    pub fn from_offset(offset: f32) -> Option<Self> {
        if offset > 0.0 {
            Some(Self::LeftToRight)
        } else if offset < 0.0 {
            Some(Self::RightToLeft)
        } else {
            None
        }
    }

    /// `1.0` for left-to-right, `-1.0` for right-to-left.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Self::LeftToRight => 1.0,
            Self::RightToLeft => -1.0,
        }
    }

    /// The other direction.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Self::LeftToRight => Self::RightToLeft,
            Self::RightToLeft => Self::LeftToRight,
        }
    }

    /// The swiping state for this direction.
    #[inline]
    pub fn swiping_state(self) -> SwipeState {
        match self {
            Self::LeftToRight => SwipeState::SwipingLeftToRight,
            Self::RightToLeft => SwipeState::SwipingRightToLeft,
        }
    }

    /// The expanding state for this direction.
    #[inline]
    pub fn expanding_state(self) -> SwipeState {
        match self {
            Self::LeftToRight => SwipeState::ExpandingLeftToRight,
            Self::RightToLeft => SwipeState::ExpandingRightToLeft,
        }
    }
}

/// Current swipe state of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeState {
    /// Buttons hidden.
    #[default]
    None,
    /// Left buttons are being revealed or are open.
    SwipingLeftToRight,
    /// Right buttons are being revealed or are open.
    SwipingRightToLeft,
    /// The expandable left button is expanded.
    ExpandingLeftToRight,
    /// The expandable right button is expanded.
    ExpandingRightToLeft,
}

impl SwipeState {
    /// The direction this state belongs to, if any.
    pub fn direction(self) -> Option<SwipeDirection> {
        match self {
            Self::None => None,
            Self::SwipingLeftToRight | Self::ExpandingLeftToRight => {
                Some(SwipeDirection::LeftToRight)
            }
            Self::SwipingRightToLeft | Self::ExpandingRightToLeft => {
                Some(SwipeDirection::RightToLeft)
            }
        }
    }

    /// Whether an expandable button is expanded.
    pub fn is_expanding(self) -> bool {
        matches!(
            self,
            Self::ExpandingLeftToRight | Self::ExpandingRightToLeft
        )
    }
}

/// Position of a row in a sectioned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    /// Create an index path.
    #[inline]
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}

/// Process-unique identifier of a cell instance.
///
/// Survives recycling: a reused cell keeps its id while its index path changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u64);

impl CellId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}
