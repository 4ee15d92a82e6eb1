//! Swipeable table cells.
//!
//! A [`SwipeCell`] reveals action buttons when swiped left or right. Buttons
//! can follow one of several [transitions](settings::SwipeTransition), stay
//! open past a threshold, and one button per side can expand to fill the cell
//! and fire when the user drags far enough. A [`TableViewManager`] owns the
//! rows of a sectioned table and coordinates swipes between its cells.
//!
//! Everything here is headless. The host application:
//!
//! 1. turns raw touches into gestures with a [`GestureRecognizer`],
//! 2. feeds pan and tap gestures to the cell (or the manager),
//! 3. calls `tick` once per frame while animations run,
//! 4. draws what [`SwipeCell::layout`] reports.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use swipe_table::gesture::{GestureState, PanGestureEvent};
//! use swipe_table::{SwipeButton, SwipeCell, SwipeDirection};
//! use swipe_table_core::{Color, Point};
//!
//! let mut cell = SwipeCell::new().with_buttons(
//!     SwipeDirection::RightToLeft,
//!     vec![
//!         SwipeButton::new("Delete", Color::RED).with_width(100.0),
//!         SwipeButton::new("More", Color::GRAY).with_width(100.0),
//!     ],
//! );
//!
//! let start = Point::new(200.0, 22.0);
//! let pan = |state, x: f32| PanGestureEvent::new(state, Point::new(x, 22.0), start, Point::ZERO, Point::ZERO);
//! cell.handle_pan(&pan(GestureState::Started, 190.0));
//! cell.handle_pan(&pan(GestureState::Updated, 70.0));
//! cell.handle_pan(&pan(GestureState::Ended, 70.0));
//!
//! // Dragged past half the buttons width: the buttons stay open.
//! let now = Instant::now();
//! cell.tick(now);
//! cell.tick(now + Duration::from_secs(1));
//! assert_eq!(cell.swipe_offset(), -200.0);
//! ```

pub mod animation;
pub mod button;
pub mod button_strip;
pub mod cell;
pub mod config;
pub mod delegate;
pub mod gesture;
pub mod manager;
pub mod settings;
pub mod types;

pub use animation::{Easing, SwipeAnimation};
pub use button::SwipeButton;
pub use cell::{ButtonTap, CellBehavior, SwipeCell, SwipeCompletion, SwipeLayout, TapOutcome};
pub use config::{SideConfig, SwipeConfig};
pub use delegate::{SwipeCellDelegate, SwipeContext};
pub use gesture::GestureRecognizer;
pub use manager::{TableItem, TableSection, TableTap, TableViewManager};
pub use settings::{ExpansionLayout, ExpansionSettings, SwipeSettings, SwipeTransition};
pub use types::{CellId, IndexPath, SwipeDirection, SwipeState};
