//! Animation support for swipe cells.
//!
//! This module provides the easing curves and the frame-driven offset animator
//! used to show, hide and stretch swipe buttons.
//!
//! # Easing Functions
//!
//! Easing functions control the rate of change during animations. They take a
//! normalized progress value `t` (0.0 to 1.0) and return a transformed value.
//!
//! # Example
//!
//! ```
//! use swipe_table::animation::{Easing, SwipeAnimation};
//!
//! let hide = SwipeAnimation::new(0.25, Easing::QuadOut);
//! let halfway = hide.value(0.125, hide.duration, 200.0, 0.0);
//! assert!(halfway < 100.0);
//! ```

mod animator;
mod easing;

pub use animator::{AnimationTick, DEFAULT_ANIMATION_DURATION, OffsetAnimator, SwipeAnimation};
pub use easing::{Easing, ease, lerp_eased};
