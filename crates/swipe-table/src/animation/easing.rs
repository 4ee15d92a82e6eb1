//! Easing functions for swipe animations.
//!
//! Easing functions map a linear progress value (0.0 to 1.0) to a transformed
//! value that creates smoother, more natural-looking motion.

use serde::{Deserialize, Serialize};

/// Available easing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-in (starts slow, accelerates).
    QuadIn,
    /// Quadratic ease-out (starts fast, decelerates).
    QuadOut,
    /// Quadratic ease-in-out (smooth start and end).
    QuadInOut,
    /// Cubic ease-in (more pronounced than quadratic).
    CubicIn,
    /// Cubic ease-out (more pronounced than quadratic).
    #[default]
    CubicOut,
    /// Cubic ease-in-out (more pronounced than quadratic).
    CubicInOut,
    /// Bounce at the start, settling toward the end value.
    BounceIn,
    /// Overshoot-free bounce against the end value.
    BounceOut,
    /// Bounce in for the first half, bounce out for the second.
    BounceInOut,
}

impl Easing {
    /// Every easing function, in declaration order.
    pub const ALL: [Easing; 10] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::BounceIn,
        Easing::BounceOut,
        Easing::BounceInOut,
    ];

    /// Whether this curve bounces (is not monotonic).
    pub fn is_bounce(self) -> bool {
        matches!(
            self,
            Easing::BounceIn | Easing::BounceOut | Easing::BounceInOut
        )
    }
}

/// Apply an easing function to a progress value.
///
/// # Arguments
///
/// * `easing` - The easing function to apply
/// * `t` - Progress value from 0.0 to 1.0
///
/// # Example
///
/// ```
/// use swipe_table::animation::{ease, Easing};
///
/// assert_eq!(ease(Easing::Linear, 0.5), 0.5);
/// assert!(ease(Easing::QuadIn, 0.5) < 0.5);
/// assert!(ease(Easing::QuadOut, 0.5) > 0.5);
/// ```
#[inline]
pub fn ease(easing: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::QuadIn => ease_in_quad(t),
        Easing::QuadOut => ease_out_quad(t),
        Easing::QuadInOut => ease_in_out_quad(t),
        Easing::CubicIn => ease_in_cubic(t),
        Easing::CubicOut => ease_out_cubic(t),
        Easing::CubicInOut => ease_in_out_cubic(t),
        Easing::BounceIn => ease_in_bounce(t),
        Easing::BounceOut => ease_out_bounce(t),
        Easing::BounceInOut => ease_in_out_bounce(t),
    }
}

/// Interpolate between two values using an easing function.
#[inline]
pub fn lerp_eased(easing: Easing, start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * ease(easing, t)
}

// =============================================================================
// Quadratic Easing
// =============================================================================

#[inline]
fn ease_in_quad(t: f32) -> f32 {
    t * t
}

#[inline]
fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[inline]
fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

// =============================================================================
// Cubic Easing
// =============================================================================

#[inline]
fn ease_in_cubic(t: f32) -> f32 {
    t * t * t
}

#[inline]
fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[inline]
fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

// =============================================================================
// Bounce Easing
// =============================================================================

const BOUNCE_AMPLITUDE: f32 = 7.5625;
const BOUNCE_SPAN: f32 = 2.75;

fn ease_out_bounce(t: f32) -> f32 {
    if t < 1.0 / BOUNCE_SPAN {
        BOUNCE_AMPLITUDE * t * t
    } else if t < 2.0 / BOUNCE_SPAN {
        let t = t - 1.5 / BOUNCE_SPAN;
        BOUNCE_AMPLITUDE * t * t + 0.75
    } else if t < 2.5 / BOUNCE_SPAN {
        let t = t - 2.25 / BOUNCE_SPAN;
        BOUNCE_AMPLITUDE * t * t + 0.9375
    } else {
        let t = t - 2.625 / BOUNCE_SPAN;
        BOUNCE_AMPLITUDE * t * t + 0.984375
    }
}

#[inline]
fn ease_in_bounce(t: f32) -> f32 {
    1.0 - ease_out_bounce(1.0 - t)
}

#[inline]
fn ease_in_out_bounce(t: f32) -> f32 {
    if t < 0.5 {
        ease_in_bounce(t * 2.0) * 0.5
    } else {
        ease_out_bounce(t * 2.0 - 1.0) * 0.5 + 0.5
    }
}
