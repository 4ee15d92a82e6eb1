//! Pan and tap recognition from raw touch input.
//!
//! The table view and its cells do not consume touches directly. Touch points
//! are fed to a [`GestureRecognizer`], which turns them into the two gestures a
//! swipe cell understands: a horizontal-or-vertical pan (with translation and
//! velocity) and a tap.
//!
//! # Usage
//!
//! ```
//! use std::time::{Duration, Instant};
//! use swipe_table::gesture::{GestureRecognizer, RecognizedGesture, TouchPhase, TouchPoint};
//! use swipe_table_core::Point;
//!
//! let mut recognizer = GestureRecognizer::new();
//! let t0 = Instant::now();
//!
//! recognizer.process(&TouchPoint::new(1, Point::new(10.0, 20.0), TouchPhase::Started, t0));
//! let gestures = recognizer.process(&TouchPoint::new(
//!     1,
//!     Point::new(60.0, 22.0),
//!     TouchPhase::Moved,
//!     t0 + Duration::from_millis(16),
//! ));
//! assert!(matches!(gestures.as_slice(), [RecognizedGesture::Pan(_)]));
//! ```

use std::collections::HashMap;
use std::time::{Duration, Instant};

use swipe_table_core::Point;
use swipe_table_core::logging::targets;

/// Default tap timeout in milliseconds.
///
/// A tap must complete within this duration to be recognized.
pub const DEFAULT_TAP_TIMEOUT_MS: u64 = 300;

/// Default double-tap timeout in milliseconds.
pub const DEFAULT_DOUBLE_TAP_TIMEOUT_MS: u64 = 300;

/// Default maximum movement for a tap in points.
///
/// Movement beyond this threshold cancels tap recognition and starts a pan.
pub const DEFAULT_TAP_SLOP: f32 = 10.0;

/// Fallback frame interval used when two samples share a timestamp.
const MIN_SAMPLE_INTERVAL: f32 = 0.001;

/// Phase of a touch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// The finger touched the surface.
    Started,
    /// The finger moved.
    Moved,
    /// The finger was lifted.
    Ended,
    /// The system cancelled the touch.
    Cancelled,
}

/// One touch sample in table-view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Identifier stable for the lifetime of the touch.
    pub id: u64,
    /// Position of the touch.
    pub position: Point,
    /// Phase of the touch.
    pub phase: TouchPhase,
    /// When the sample was taken.
    pub timestamp: Instant,
}

impl TouchPoint {
    /// Create a touch sample.
    pub fn new(id: u64, position: Point, phase: TouchPhase, timestamp: Instant) -> Self {
        Self {
            id,
            position,
            phase,
            timestamp,
        }
    }
}

/// State of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureState {
    /// The gesture was recognized.
    Started,
    /// The gesture moved.
    Updated,
    /// The gesture finished normally.
    Ended,
    /// The gesture was interrupted.
    Cancelled,
}

impl GestureState {
    /// Whether the gesture is over.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled)
    }
}

/// A pan (drag) gesture sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGestureEvent {
    /// Gesture state.
    pub state: GestureState,
    /// Current touch position.
    pub position: Point,
    /// Position where the touch started.
    pub start_position: Point,
    /// Total movement since the touch started.
    pub translation: Point,
    /// Movement since the previous sample.
    pub delta: Point,
    /// Velocity in points per second.
    pub velocity: Point,
}

impl PanGestureEvent {
    /// Create a pan event.
    pub fn new(
        state: GestureState,
        position: Point,
        start_position: Point,
        delta: Point,
        velocity: Point,
    ) -> Self {
        Self {
            state,
            position,
            start_position,
            translation: Point::new(
                position.x - start_position.x,
                position.y - start_position.y,
            ),
            delta,
            velocity,
        }
    }
}

/// A tap gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapGestureEvent {
    /// Position of the tap.
    pub position: Point,
    /// Number of consecutive taps (2 for a double tap).
    pub tap_count: u32,
}

/// Recognized gesture events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecognizedGesture {
    /// Single or multi-tap gesture.
    Tap(TapGestureEvent),
    /// Pan/drag gesture.
    Pan(PanGestureEvent),
}

/// Configuration for the gesture recognizer.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Maximum duration for a tap.
    pub tap_timeout: Duration,
    /// Maximum duration between taps for a multi-tap.
    pub double_tap_timeout: Duration,
    /// Maximum movement allowed for a tap.
    pub tap_slop: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_timeout: Duration::from_millis(DEFAULT_TAP_TIMEOUT_MS),
            double_tap_timeout: Duration::from_millis(DEFAULT_DOUBLE_TAP_TIMEOUT_MS),
            tap_slop: DEFAULT_TAP_SLOP,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TouchState {
    start_time: Instant,
    start_pos: Point,
    current_pos: Point,
    current_time: Instant,
    velocity: Point,
    moved_beyond_slop: bool,
    /// Its pan was cancelled; it drives nothing until lifted.
    spent: bool,
}

#[derive(Debug, Clone, Copy)]
struct TapState {
    position: Point,
    time: Instant,
    tap_count: u32,
}

/// Gesture recognizer that detects pans and taps from touch samples.
///
/// Only single-finger gestures are recognized. A second finger landing during
/// a pan cancels it.
#[derive(Debug)]
pub struct GestureRecognizer {
    config: GestureConfig,
    touches: HashMap<u64, TouchState>,
    last_tap: Option<TapState>,
    /// Touch driving the current pan, if any.
    pan_touch: Option<u64>,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureRecognizer {
    /// Creates a new gesture recognizer with default configuration.
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    /// Creates a new gesture recognizer with the given configuration.
    pub fn with_config(config: GestureConfig) -> Self {
        Self {
            config,
            touches: HashMap::new(),
            last_tap: None,
            pan_touch: None,
        }
    }

    /// The recognizer configuration.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Whether a pan is in progress.
    pub fn is_panning(&self) -> bool {
        self.pan_touch.is_some()
    }

    /// Processes a touch sample and returns any recognized gestures.
    pub fn process(&mut self, point: &TouchPoint) -> Vec<RecognizedGesture> {
        let mut gestures = Vec::new();
        match point.phase {
            TouchPhase::Started => self.handle_touch_start(point, &mut gestures),
            TouchPhase::Moved => self.handle_touch_move(point, &mut gestures),
            TouchPhase::Ended => self.handle_touch_end(point, &mut gestures),
            TouchPhase::Cancelled => self.handle_touch_cancel(point, &mut gestures),
        }
        gestures
    }

    /// Processes several samples in order.
    pub fn process_all<'a>(
        &mut self,
        points: impl IntoIterator<Item = &'a TouchPoint>,
    ) -> Vec<RecognizedGesture> {
        points.into_iter().flat_map(|p| self.process(p)).collect()
    }

    fn handle_touch_start(&mut self, point: &TouchPoint, gestures: &mut Vec<RecognizedGesture>) {
        self.touches.insert(
            point.id,
            TouchState {
                start_time: point.timestamp,
                start_pos: point.position,
                current_pos: point.position,
                current_time: point.timestamp,
                velocity: Point::ZERO,
                moved_beyond_slop: false,
                spent: false,
            },
        );

        if self.touches.len() > 1 {
            if let Some(pan_id) = self.pan_touch.take() {
                if let Some(touch) = self.touches.get_mut(&pan_id) {
                    touch.spent = true;
                    tracing::debug!(target: targets::GESTURE, "second touch cancelled pan");
                    gestures.push(RecognizedGesture::Pan(PanGestureEvent::new(
                        GestureState::Cancelled,
                        touch.current_pos,
                        touch.start_pos,
                        Point::ZERO,
                        Point::ZERO,
                    )));
                }
            }
        }
    }

    fn handle_touch_move(&mut self, point: &TouchPoint, gestures: &mut Vec<RecognizedGesture>) {
        let single_touch = self.touches.len() == 1;
        let tap_slop = self.config.tap_slop;
        let Some(touch) = self.touches.get_mut(&point.id) else {
            return;
        };

        let prev_pos = touch.current_pos;
        let velocity = calculate_velocity(prev_pos, touch.current_time, point.position, point.timestamp);
        touch.current_pos = point.position;
        touch.current_time = point.timestamp;
        touch.velocity = velocity;

        if !touch.moved_beyond_slop {
            let dx = touch.current_pos.x - touch.start_pos.x;
            let dy = touch.current_pos.y - touch.start_pos.y;
            if (dx * dx + dy * dy).sqrt() > tap_slop {
                touch.moved_beyond_slop = true;
            }
        }

        if !single_touch || !touch.moved_beyond_slop || touch.spent {
            return;
        }

        let delta = Point::new(point.position.x - prev_pos.x, point.position.y - prev_pos.y);
        let state = if self.pan_touch.is_none() {
            self.pan_touch = Some(point.id);
            tracing::trace!(target: targets::GESTURE, x = point.position.x, y = point.position.y, "pan started");
            GestureState::Started
        } else {
            GestureState::Updated
        };

        gestures.push(RecognizedGesture::Pan(PanGestureEvent::new(
            state,
            point.position,
            touch.start_pos,
            delta,
            velocity,
        )));
    }

    fn handle_touch_end(&mut self, point: &TouchPoint, gestures: &mut Vec<RecognizedGesture>) {
        let Some(touch) = self.touches.remove(&point.id) else {
            return;
        };

        if self.pan_touch == Some(point.id) {
            self.pan_touch = None;
            // A lift sample at the last position keeps the last move's velocity.
            let velocity = if point.position == touch.current_pos {
                touch.velocity
            } else {
                calculate_velocity(touch.current_pos, touch.current_time, point.position, point.timestamp)
            };
            tracing::trace!(target: targets::GESTURE, vx = velocity.x, "pan ended");
            gestures.push(RecognizedGesture::Pan(PanGestureEvent::new(
                GestureState::Ended,
                point.position,
                touch.start_pos,
                Point::new(
                    point.position.x - touch.current_pos.x,
                    point.position.y - touch.current_pos.y,
                ),
                velocity,
            )));
            return;
        }

        let duration = point.timestamp.saturating_duration_since(touch.start_time);
        if touch.moved_beyond_slop || duration >= self.config.tap_timeout || !self.touches.is_empty() {
            return;
        }

        let tap_count = match self.last_tap {
            Some(last_tap)
                if point.timestamp.saturating_duration_since(last_tap.time)
                    < self.config.double_tap_timeout
                    && distance(point.position, last_tap.position) < self.config.tap_slop =>
            {
                last_tap.tap_count + 1
            }
            _ => 1,
        };

        self.last_tap = Some(TapState {
            position: point.position,
            time: point.timestamp,
            tap_count,
        });

        gestures.push(RecognizedGesture::Tap(TapGestureEvent {
            position: point.position,
            tap_count,
        }));
    }

    fn handle_touch_cancel(&mut self, point: &TouchPoint, gestures: &mut Vec<RecognizedGesture>) {
        let Some(touch) = self.touches.remove(&point.id) else {
            return;
        };

        if self.pan_touch == Some(point.id) {
            self.pan_touch = None;
            gestures.push(RecognizedGesture::Pan(PanGestureEvent::new(
                GestureState::Cancelled,
                point.position,
                touch.start_pos,
                Point::ZERO,
                Point::ZERO,
            )));
        }
    }

    /// Resets the recognizer state.
    pub fn reset(&mut self) {
        self.touches.clear();
        self.last_tap = None;
        self.pan_touch = None;
    }
}

fn distance(p1: Point, p2: Point) -> f32 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

fn calculate_velocity(prev: Point, prev_time: Instant, current: Point, time: Instant) -> Point {
    let dt = time
        .saturating_duration_since(prev_time)
        .as_secs_f32()
        .max(MIN_SAMPLE_INTERVAL);
    Point::new((current.x - prev.x) / dt, (current.y - prev.y) / dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(id: u64, phase: TouchPhase, x: f32, y: f32, at: Instant) -> TouchPoint {
        TouchPoint::new(id, Point::new(x, y), phase, at)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_single_tap() {
        let mut recognizer = GestureRecognizer::new();
        let t0 = Instant::now();

        assert!(recognizer.process(&touch(1, TouchPhase::Started, 100.0, 100.0, t0)).is_empty());
        let gestures = recognizer.process(&touch(1, TouchPhase::Ended, 102.0, 100.0, t0 + ms(80)));

        assert_eq!(gestures.len(), 1);
        match &gestures[0] {
            RecognizedGesture::Tap(e) => assert_eq!(e.tap_count, 1),
            other => panic!("Expected tap gesture, got {other:?}"),
        }
    }

    #[test]
    fn test_double_tap() {
        let mut recognizer = GestureRecognizer::new();
        let t0 = Instant::now();

        recognizer.process(&touch(1, TouchPhase::Started, 100.0, 100.0, t0));
        recognizer.process(&touch(1, TouchPhase::Ended, 100.0, 100.0, t0 + ms(50)));
        recognizer.process(&touch(2, TouchPhase::Started, 100.0, 100.0, t0 + ms(150)));
        let gestures = recognizer.process(&touch(2, TouchPhase::Ended, 100.0, 100.0, t0 + ms(200)));

        match gestures.as_slice() {
            [RecognizedGesture::Tap(e)] => assert_eq!(e.tap_count, 2),
            other => panic!("Expected double tap, got {other:?}"),
        }
    }

    #[test]
    fn test_slow_press_is_not_a_tap() {
        let mut recognizer = GestureRecognizer::new();
        let t0 = Instant::now();

        recognizer.process(&touch(1, TouchPhase::Started, 100.0, 100.0, t0));
        let gestures = recognizer.process(&touch(1, TouchPhase::Ended, 100.0, 100.0, t0 + ms(400)));
        assert!(gestures.is_empty());
    }

    #[test]
    fn test_pan_gesture() {
        let mut recognizer = GestureRecognizer::new();
        let t0 = Instant::now();

        recognizer.process(&touch(1, TouchPhase::Started, 100.0, 100.0, t0));

        // Within slop: nothing yet.
        assert!(recognizer.process(&touch(1, TouchPhase::Moved, 105.0, 100.0, t0 + ms(10))).is_empty());

        let gestures = recognizer.process(&touch(1, TouchPhase::Moved, 150.0, 100.0, t0 + ms(20)));
        match gestures.as_slice() {
            [RecognizedGesture::Pan(e)] => {
                assert_eq!(e.state, GestureState::Started);
                assert_eq!(e.translation, Point::new(50.0, 0.0));
                assert_eq!(e.delta, Point::new(45.0, 0.0));
            }
            other => panic!("Expected pan start, got {other:?}"),
        }
        assert!(recognizer.is_panning());

        let gestures = recognizer.process(&touch(1, TouchPhase::Moved, 200.0, 110.0, t0 + ms(70)));
        match gestures.as_slice() {
            [RecognizedGesture::Pan(e)] => {
                assert_eq!(e.state, GestureState::Updated);
                assert_eq!(e.translation, Point::new(100.0, 10.0));
                // 50 points in 50 ms.
                assert!((e.velocity.x - 1000.0).abs() < 1.0);
            }
            other => panic!("Expected pan update, got {other:?}"),
        }

        let gestures = recognizer.process(&touch(1, TouchPhase::Ended, 200.0, 110.0, t0 + ms(80)));
        match gestures.as_slice() {
            [RecognizedGesture::Pan(e)] => {
                assert_eq!(e.state, GestureState::Ended);
                assert!(e.velocity.x > 0.0);
            }
            other => panic!("Expected pan end, got {other:?}"),
        }
        assert!(!recognizer.is_panning());
    }

    #[test]
    fn test_pan_cancel() {
        let mut recognizer = GestureRecognizer::new();
        let t0 = Instant::now();

        recognizer.process(&touch(1, TouchPhase::Started, 100.0, 100.0, t0));
        recognizer.process(&touch(1, TouchPhase::Moved, 40.0, 100.0, t0 + ms(16)));
        let gestures = recognizer.process(&touch(1, TouchPhase::Cancelled, 40.0, 100.0, t0 + ms(32)));

        assert!(matches!(
            gestures.as_slice(),
            [RecognizedGesture::Pan(e)] if e.state == GestureState::Cancelled
        ));
    }

    #[test]
    fn test_second_touch_cancels_pan() {
        let mut recognizer = GestureRecognizer::new();
        let t0 = Instant::now();

        recognizer.process(&touch(1, TouchPhase::Started, 100.0, 100.0, t0));
        recognizer.process(&touch(1, TouchPhase::Moved, 140.0, 100.0, t0 + ms(16)));
        let gestures = recognizer.process(&touch(2, TouchPhase::Started, 10.0, 10.0, t0 + ms(20)));

        assert!(matches!(
            gestures.as_slice(),
            [RecognizedGesture::Pan(e)] if e.state == GestureState::Cancelled
        ));
        assert!(!recognizer.is_panning());
    }

    #[test]
    fn test_cancelled_pan_does_not_restart() {
        let mut recognizer = GestureRecognizer::new();
        let t0 = Instant::now();

        recognizer.process(&touch(1, TouchPhase::Started, 100.0, 100.0, t0));
        recognizer.process(&touch(1, TouchPhase::Moved, 50.0, 100.0, t0 + ms(16)));
        recognizer.process(&touch(2, TouchPhase::Started, 10.0, 10.0, t0 + ms(20)));
        recognizer.process(&touch(2, TouchPhase::Ended, 10.0, 10.0, t0 + ms(40)));

        // The first finger keeps moving alone, but its pan is over.
        assert!(recognizer.process(&touch(1, TouchPhase::Moved, 40.0, 100.0, t0 + ms(56))).is_empty());
        assert!(!recognizer.is_panning());
        assert!(recognizer.process(&touch(1, TouchPhase::Ended, 40.0, 100.0, t0 + ms(72))).is_empty());

        // A fresh touch pans again.
        recognizer.process(&touch(3, TouchPhase::Started, 100.0, 100.0, t0 + ms(100)));
        let gestures = recognizer.process(&touch(3, TouchPhase::Moved, 60.0, 100.0, t0 + ms(116)));
        assert!(matches!(
            gestures.as_slice(),
            [RecognizedGesture::Pan(e)] if e.state == GestureState::Started
        ));
    }

    #[test]
    fn test_reset() {
        let mut recognizer = GestureRecognizer::new();
        let t0 = Instant::now();

        recognizer.process(&touch(1, TouchPhase::Started, 100.0, 100.0, t0));
        recognizer.process(&touch(1, TouchPhase::Moved, 150.0, 100.0, t0 + ms(16)));
        recognizer.reset();

        assert!(!recognizer.is_panning());
        assert!(recognizer.process(&touch(1, TouchPhase::Ended, 150.0, 100.0, t0 + ms(32))).is_empty());
    }
}
