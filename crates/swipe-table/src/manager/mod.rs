//! Declarative table glue for swipe cells.
//!
//! A [`TableViewManager`] holds sections of [`TableItem`]s, hands out recycled
//! [`SwipeCell`](crate::SwipeCell)s for visible rows, and coordinates swipes
//! across rows: opening one row closes the others, and a tap outside an open
//! row dismisses it.
//!
//! # Example
//!
//! ```
//! use swipe_table::manager::{TableItem, TableSection, TableViewManager};
//! use swipe_table::IndexPath;
//!
//! let mut manager = TableViewManager::new().with_section(
//!     TableSection::with_header("Inbox")
//!         .with_item(TableItem::new("Meeting notes"))
//!         .with_item(TableItem::new("Invoice").with_height(60.0)),
//! );
//!
//! let row = IndexPath::new(0, 1);
//! assert_eq!(manager.height_for(row), 60.0);
//! assert!(manager.dequeue_cell(row).is_some());
//! ```

mod item;
mod table;

pub use item::{CellType, DEFAULT_CELL_IDENTIFIER, DEFAULT_ROW_HEIGHT, TableItem, TableSection};
pub use table::{CellSetup, TableTap, TableViewManager};
