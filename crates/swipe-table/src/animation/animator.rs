//! Offset animation driven by the host frame clock.
//!
//! An [`OffsetAnimator`] interpolates a single horizontal offset from one value
//! to another. It does not own a timer: the host calls [`OffsetAnimator::tick`]
//! once per displayed frame, and the first tick after [`OffsetAnimator::start`]
//! fixes the start time. Starting a new animation replaces the running one and
//! hands back the replaced animation's completion so the caller can report it
//! as interrupted.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use swipe_table_core::logging::targets;

use super::easing::{Easing, lerp_eased};

/// Default animation duration in seconds.
pub const DEFAULT_ANIMATION_DURATION: f32 = 0.3;

/// Duration and easing of one swipe animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeAnimation {
    /// Duration in seconds.
    pub duration: f32,
    /// Easing curve.
    pub easing: Easing,
}

impl Default for SwipeAnimation {
    fn default() -> Self {
        Self {
            duration: DEFAULT_ANIMATION_DURATION,
            easing: Easing::default(),
        }
    }
}

impl SwipeAnimation {
    /// Create an animation with the given duration (seconds) and easing.
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// Value of the animation `elapsed` seconds in.
    ///
    /// Returns `from` at `elapsed == 0` and exactly `to` once `elapsed`
    /// reaches `duration`.
    ///
    /// ```
    /// use swipe_table::animation::{Easing, SwipeAnimation};
    ///
    /// let animation = SwipeAnimation::new(0.3, Easing::Linear);
    /// assert_eq!(animation.value(0.15, 0.3, 0.0, 200.0), 100.0);
    /// assert_eq!(animation.value(0.3, 0.3, 0.0, 200.0), 200.0);
    /// ```
    pub fn value(&self, elapsed: f32, duration: f32, from: f32, to: f32) -> f32 {
        if duration <= 0.0 {
            return to;
        }
        let t = (elapsed / duration).min(1.0);
        if t >= 1.0 {
            return to;
        }
        lerp_eased(self.easing, from, to, t)
    }

    /// The duration as a [`Duration`]. Negative durations count as zero.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f32(self.duration.max(0.0))
    }
}

/// Result of advancing an [`OffsetAnimator`] by one frame.
#[derive(Debug)]
pub enum AnimationTick<C> {
    /// No animation is running.
    Idle,
    /// The animation is in flight at `value`.
    Running {
        /// Current offset.
        value: f32,
    },
    /// The animation reached its target on this frame.
    Finished {
        /// Final offset, equal to the target.
        value: f32,
        /// Completion registered when the animation was started.
        completion: Option<C>,
    },
}

#[derive(Debug)]
struct ActiveAnimation<C> {
    from: f32,
    to: f32,
    animation: SwipeAnimation,
    start_time: Option<Instant>,
    completion: Option<C>,
}

/// Animates an offset between two values, one frame at a time.
///
/// `C` is the completion payload stored alongside the animation. The animator
/// never calls it: it is returned from [`tick`](Self::tick) when the animation
/// finishes, and from [`start`](Self::start) or [`cancel`](Self::cancel) when
/// the animation is interrupted.
#[derive(Debug)]
pub struct OffsetAnimator<C> {
    active: Option<ActiveAnimation<C>>,
}

impl<C> Default for OffsetAnimator<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> OffsetAnimator<C> {
    /// Create an idle animator.
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Check if an animation is currently running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Target value of the running animation.
    pub fn target(&self) -> Option<f32> {
        self.active.as_ref().map(|a| a.to)
    }

    /// Start animating from `from` to `to`.
    ///
    /// Any running animation is replaced; its completion is returned so the
    /// caller can report the interruption. When it returns `Some`, the
    /// replaced animation never finished.
    pub fn start(
        &mut self,
        from: f32,
        to: f32,
        animation: SwipeAnimation,
        completion: Option<C>,
    ) -> Option<Option<C>> {
        let replaced = self.cancel();
        tracing::trace!(
            target: targets::ANIMATION,
            from,
            to,
            duration = animation.duration,
            easing = ?animation.easing,
            "starting offset animation"
        );
        self.active = Some(ActiveAnimation {
            from,
            to,
            animation,
            start_time: None,
            completion,
        });
        replaced
    }

    /// Stop the running animation without reaching its target.
    ///
    /// Returns `Some(completion)` if an animation was running.
    pub fn cancel(&mut self) -> Option<Option<C>> {
        let active = self.active.take()?;
        tracing::trace!(target: targets::ANIMATION, to = active.to, "offset animation interrupted");
        Some(active.completion)
    }

    /// Advance the animation to `now`.
    ///
    /// The first tick after [`start`](Self::start) fixes the start time and
    /// yields the `from` value.
    pub fn tick(&mut self, now: Instant) -> AnimationTick<C> {
        let Some(active) = self.active.as_mut() else {
            return AnimationTick::Idle;
        };

        let start_time = *active.start_time.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start_time).as_secs_f32();
        let duration = active.animation.duration;

        if duration <= 0.0 || elapsed >= duration {
            let finished = self.active.take();
            let (value, completion) = finished
                .map(|a| (a.to, a.completion))
                .unwrap_or_default();
            tracing::trace!(target: targets::ANIMATION, value, "offset animation finished");
            return AnimationTick::Finished { value, completion };
        }

        let value = active
            .animation
            .value(elapsed, duration, active.from, active.to);
        AnimationTick::Running { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_value_boundaries() {
        for easing in Easing::ALL {
            let animation = SwipeAnimation::new(0.3, easing);
            assert_eq!(animation.value(0.0, 0.3, 40.0, 200.0), 40.0, "{easing:?}");
            assert_eq!(animation.value(0.3, 0.3, 40.0, 200.0), 200.0, "{easing:?}");
            assert_eq!(animation.value(1.0, 0.3, 40.0, 200.0), 200.0, "{easing:?}");
        }
    }

    #[test]
    fn test_value_zero_duration() {
        let animation = SwipeAnimation::default();
        assert_eq!(animation.value(0.0, 0.0, 10.0, 20.0), 20.0);
    }

    #[test]
    fn test_defaults() {
        let animation = SwipeAnimation::default();
        assert_eq!(animation.duration, 0.3);
        assert_eq!(animation.easing, Easing::CubicOut);
        assert_eq!(animation.duration(), Duration::from_secs_f32(0.3));
    }

    #[test]
    fn test_animator_runs_to_completion() {
        let mut animator = OffsetAnimator::<&'static str>::new();
        assert!(animator
            .start(0.0, 100.0, SwipeAnimation::new(0.2, Easing::Linear), Some("done"))
            .is_none());
        assert!(animator.is_running());
        assert_eq!(animator.target(), Some(100.0));

        let t0 = Instant::now();
        match animator.tick(t0) {
            AnimationTick::Running { value } => assert_eq!(value, 0.0),
            other => panic!("unexpected {other:?}"),
        }
        match animator.tick(t0 + ms(100)) {
            AnimationTick::Running { value } => assert!((value - 50.0).abs() < 0.01),
            other => panic!("unexpected {other:?}"),
        }
        match animator.tick(t0 + ms(200)) {
            AnimationTick::Finished { value, completion } => {
                assert_eq!(value, 100.0);
                assert_eq!(completion, Some("done"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!animator.is_running());
        assert!(matches!(animator.tick(t0 + ms(300)), AnimationTick::Idle));
    }

    #[test]
    fn test_start_replaces_running_animation() {
        let mut animator = OffsetAnimator::new();
        animator.start(0.0, 100.0, SwipeAnimation::default(), Some(1));
        let replaced = animator.start(50.0, 0.0, SwipeAnimation::default(), Some(2));
        assert_eq!(replaced, Some(Some(1)));
        assert_eq!(animator.target(), Some(0.0));
    }

    #[test]
    fn test_cancel() {
        let mut animator = OffsetAnimator::<u8>::new();
        assert!(animator.cancel().is_none());

        animator.start(0.0, 100.0, SwipeAnimation::default(), None);
        assert_eq!(animator.cancel(), Some(None));
        assert!(!animator.is_running());
    }

    #[test]
    fn test_zero_duration_finishes_on_first_tick() {
        let mut animator = OffsetAnimator::<()>::new();
        animator.start(0.0, -80.0, SwipeAnimation::new(0.0, Easing::Linear), Some(()));
        match animator.tick(Instant::now()) {
            AnimationTick::Finished { value, completion } => {
                assert_eq!(value, -80.0);
                assert!(completion.is_some());
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
