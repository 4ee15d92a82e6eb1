//! Core pieces for swipe-table.
//!
//! This crate provides the foundational components shared by the swipe cell
//! and the table view manager:
//!
//! - **Signal/Slot System**: Type-safe notifications for state changes
//! - **Geometry**: Points, sizes, rectangles, insets and colors
//! - **Errors**: The error type returned by configuration loading
//! - **Logging**: `tracing` targets for each subsystem
//!
//! # Signal/Slot Example
//!
//! ```
//! use swipe_table_core::Signal;
//!
//! let state_changed = Signal::<(u8, bool)>::new();
//!
//! let conn_id = state_changed.connect(|(state, gesture_active)| {
//!     println!("state {state}, gesture active: {gesture_active}");
//! });
//!
//! state_changed.emit((1, true));
//! state_changed.disconnect(conn_id);
//! ```

mod error;
pub mod geometry;
pub mod logging;
pub mod signal;

pub use error::{Error, Result};
pub use geometry::{Color, EdgeInsets, Point, Rect, Size};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
