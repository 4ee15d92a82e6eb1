//! The table view manager.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use swipe_table_core::logging::targets;
use swipe_table_core::{Point, Signal, Size};

use super::item::{CellType, DEFAULT_ROW_HEIGHT, TableItem, TableSection};
use crate::cell::{DEFAULT_CELL_SIZE, SwipeCell, TapOutcome};
use crate::config::SwipeConfig;
use crate::delegate::SwipeCellDelegate;
use crate::gesture::{GestureState, PanGestureEvent};
use crate::types::{CellId, IndexPath};

/// Hook run on every cell handed out by [`TableViewManager::dequeue_cell`].
pub type CellSetup = Box<dyn Fn(IndexPath, &TableItem, &mut SwipeCell) + Send + Sync>;

/// What a tap on the table did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableTap {
    /// The tap closed other open rows and went no further.
    Dismissed,
    /// The tap went to an open row.
    Cell {
        /// Row that received the tap.
        index_path: IndexPath,
        /// What the row did with it.
        outcome: TapOutcome,
    },
    /// The tap selected a row.
    Selected(IndexPath),
    /// Nothing handled the tap.
    Ignored,
}

struct VisibleCell {
    identifier: String,
    cell: SwipeCell,
}

/// Owns the rows of a sectioned table and the swipe cells that display them.
///
/// The manager recycles cells per identifier, routes gestures and frame
/// ticks to the right cell, and keeps a single row open at a time unless the
/// cells allow multiple swipes.
pub struct TableViewManager {
    sections: Vec<TableSection>,
    registry: HashMap<String, f32>,
    default_row_height: f32,
    width: f32,
    visible: BTreeMap<IndexPath, VisibleCell>,
    reuse_pool: HashMap<String, Vec<SwipeCell>>,
    delegate: Option<Arc<dyn SwipeCellDelegate>>,
    config: Option<SwipeConfig>,
    cell_setup: Option<CellSetup>,
    tracking: Option<IndexPath>,
    editing: bool,

    /// Emitted when a new cell is created.
    pub cell_loaded: Signal<CellId>,
    /// Emitted when a cell is about to display a row.
    pub cell_will_appear: Signal<IndexPath>,
    /// Emitted when a row's cell went back to the reuse pool.
    pub cell_did_disappear: Signal<IndexPath>,
    /// Emitted when a tap selects a row.
    pub row_selected: Signal<IndexPath>,
}

impl Default for TableViewManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TableViewManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableViewManager")
            .field("sections", &self.sections.len())
            .field("registry", &self.registry)
            .field("width", &self.width)
            .field("visible", &self.visible.keys().collect::<Vec<_>>())
            .field("tracking", &self.tracking)
            .field("editing", &self.editing)
            .finish_non_exhaustive()
    }
}

impl TableViewManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            registry: HashMap::new(),
            default_row_height: DEFAULT_ROW_HEIGHT,
            width: DEFAULT_CELL_SIZE.width,
            visible: BTreeMap::new(),
            reuse_pool: HashMap::new(),
            delegate: None,
            config: None,
            cell_setup: None,
            tracking: None,
            editing: false,
            cell_loaded: Signal::new(),
            cell_will_appear: Signal::new(),
            cell_did_disappear: Signal::new(),
            row_selected: Signal::new(),
        }
    }

    /// Set the table width using builder pattern.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width.max(0.0);
        self
    }

    /// Set the delegate given to every cell using builder pattern.
    pub fn with_delegate(mut self, delegate: Arc<dyn SwipeCellDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Set the swipe configuration applied to every cell using builder pattern.
    pub fn with_config(mut self, config: SwipeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the hook run on every dequeued cell using builder pattern.
    pub fn with_cell_setup<F>(mut self, setup: F) -> Self
    where
        F: Fn(IndexPath, &TableItem, &mut SwipeCell) + Send + Sync + 'static,
    {
        self.cell_setup = Some(Box::new(setup));
        self
    }

    /// Append a section using builder pattern.
    pub fn with_section(mut self, section: TableSection) -> Self {
        self.sections.push(section);
        self
    }

    // =========================================================================
    // Sections and items
    // =========================================================================

    /// The sections.
    pub fn sections(&self) -> &[TableSection] {
        &self.sections
    }

    /// The section at `index`.
    pub fn section(&self, index: usize) -> Option<&TableSection> {
        self.sections.get(index)
    }

    /// Mutable section at `index`. Call [`reload_data`](Self::reload_data)
    /// after changing its rows.
    pub fn section_mut(&mut self, index: usize) -> Option<&mut TableSection> {
        self.sections.get_mut(index)
    }

    /// Append a section.
    pub fn add_section(&mut self, section: TableSection) {
        self.sections.push(section);
    }

    /// Remove the section at `index` and reload.
    pub fn remove_section(&mut self, index: usize) -> Option<TableSection> {
        if index >= self.sections.len() {
            return None;
        }
        let section = self.sections.remove(index);
        self.reload_data();
        Some(section)
    }

    /// Replace every section and reload.
    pub fn set_sections(&mut self, sections: Vec<TableSection>) {
        self.sections = sections;
        self.reload_data();
    }

    /// Number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of rows in `section`.
    pub fn row_count(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, TableSection::len)
    }

    /// The item displayed at `index_path`.
    pub fn item(&self, index_path: IndexPath) -> Option<&TableItem> {
        self.sections.get(index_path.section)?.item(index_path.row)
    }

    /// Every row, in display order.
    pub fn index_paths(&self) -> impl Iterator<Item = IndexPath> + '_ {
        self.sections
            .iter()
            .enumerate()
            .flat_map(|(section, s)| (0..s.len()).map(move |row| IndexPath::new(section, row)))
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Register the default height of cells with `identifier`.
    pub fn register(&mut self, identifier: impl Into<String>, height: f32) {
        self.registry.insert(identifier.into(), height.max(0.0));
    }

    /// Height registered for `identifier`.
    pub fn registered_height(&self, identifier: &str) -> Option<f32> {
        self.registry.get(identifier).copied()
    }

    /// Height of rows without an explicit or registered height.
    pub fn default_row_height(&self) -> f32 {
        self.default_row_height
    }

    /// Set the height of rows without an explicit or registered height.
    pub fn set_default_row_height(&mut self, height: f32) {
        self.default_row_height = height.max(0.0);
    }

    /// Height of the row at `index_path`: the item's own height, else the
    /// height registered for its identifier, else the default.
    pub fn height_for(&self, index_path: IndexPath) -> f32 {
        let Some(item) = self.item(index_path) else {
            return self.default_row_height;
        };
        item.height
            .or_else(|| self.registered_height(&item.cell_identifier))
            .unwrap_or(self.default_row_height)
    }

    /// Position of the row within its section.
    pub fn cell_type(&self, index_path: IndexPath) -> Option<CellType> {
        CellType::for_row(index_path.row, self.row_count(index_path.section))
    }

    /// Table width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Resize the table. Visible cells follow.
    pub fn set_width(&mut self, width: f32) {
        self.width = width.max(0.0);
        let paths: Vec<_> = self.visible.keys().copied().collect();
        for path in paths {
            let size = Size::new(self.width, self.height_for(path));
            if let Some(visible) = self.visible.get_mut(&path) {
                visible.cell.set_size(size);
            }
        }
    }

    /// Top of the row at `index_path`, from the top of the table.
    pub fn row_offset(&self, index_path: IndexPath) -> Option<f32> {
        self.item(index_path)?;
        Some(
            self.index_paths()
                .take_while(|path| *path < index_path)
                .map(|path| self.height_for(path))
                .sum(),
        )
    }

    /// Total height of every row.
    pub fn content_height(&self) -> f32 {
        self.index_paths().map(|path| self.height_for(path)).sum()
    }

    /// Row at vertical position `y`, from the top of the table.
    pub fn index_path_at(&self, y: f32) -> Option<IndexPath> {
        if y < 0.0 {
            return None;
        }
        let mut top = 0.0;
        for path in self.index_paths() {
            let bottom = top + self.height_for(path);
            if y < bottom {
                return Some(path);
            }
            top = bottom;
        }
        None
    }

    // =========================================================================
    // Cells
    // =========================================================================

    /// The delegate given to every cell.
    pub fn delegate(&self) -> Option<&Arc<dyn SwipeCellDelegate>> {
        self.delegate.as_ref()
    }

    /// Set the delegate given to every cell, including visible ones.
    pub fn set_delegate(&mut self, delegate: Option<Arc<dyn SwipeCellDelegate>>) {
        for visible in self.visible.values_mut() {
            visible.cell.set_delegate(delegate.clone());
        }
        for cell in self.reuse_pool.values_mut().flatten() {
            cell.set_delegate(delegate.clone());
        }
        self.delegate = delegate;
    }

    /// Set the swipe configuration applied to every cell, including visible ones.
    pub fn set_config(&mut self, config: Option<SwipeConfig>) {
        if let Some(config) = &config {
            for visible in self.visible.values_mut() {
                config.apply_to(&mut visible.cell);
            }
        }
        self.config = config;
    }

    /// The cell displaying `index_path`, creating or recycling one if needed.
    ///
    /// Returns `None` if there is no row at `index_path`.
    pub fn dequeue_cell(&mut self, index_path: IndexPath) -> Option<&mut SwipeCell> {
        let item = self.item(index_path)?.clone();
        if self.visible.contains_key(&index_path) {
            return self.cell_mut(index_path);
        }

        let identifier = item.cell_identifier.clone();
        let recycled = self.reuse_pool.get_mut(&identifier).and_then(Vec::pop);
        let mut cell = match recycled {
            Some(mut cell) => {
                tracing::trace!(
                    target: targets::MANAGER,
                    cell = cell.id().as_u64(),
                    %index_path,
                    "reusing cell"
                );
                cell.prepare_for_reuse();
                cell
            }
            None => self.create_cell(&identifier),
        };

        cell.set_index_path(Some(index_path));
        cell.set_size(Size::new(self.width, self.height_for(index_path)));
        if let Some(config) = &self.config {
            config.apply_to(&mut cell);
        }
        if self.editing {
            cell.set_editing(true);
        }
        if let Some(setup) = &self.cell_setup {
            setup(index_path, &item, &mut cell);
        }

        self.cell_will_appear.emit(index_path);
        let visible = self
            .visible
            .entry(index_path)
            .or_insert(VisibleCell { identifier, cell });
        Some(&mut visible.cell)
    }

    fn create_cell(&self, identifier: &str) -> SwipeCell {
        let mut cell = SwipeCell::new();
        cell.set_delegate(self.delegate.clone());
        tracing::debug!(
            target: targets::MANAGER,
            cell = cell.id().as_u64(),
            identifier,
            "created cell"
        );
        self.cell_loaded.emit(cell.id());
        cell
    }

    /// Move the cell displaying `index_path` to the reuse pool.
    pub fn end_display(&mut self, index_path: IndexPath) -> bool {
        let Some(VisibleCell { identifier, cell }) = self.visible.remove(&index_path) else {
            return false;
        };
        if self.tracking == Some(index_path) {
            self.tracking = None;
        }
        self.reuse_pool.entry(identifier).or_default().push(cell);
        self.cell_did_disappear.emit(index_path);
        true
    }

    /// Send every visible cell back to the reuse pool.
    pub fn reload_data(&mut self) {
        let paths: Vec<_> = self.visible.keys().copied().collect();
        tracing::debug!(target: targets::MANAGER, visible = paths.len(), "reloading data");
        for path in paths {
            self.end_display(path);
        }
    }

    /// The cell displaying `index_path`, if it is visible.
    pub fn cell(&self, index_path: IndexPath) -> Option<&SwipeCell> {
        self.visible.get(&index_path).map(|visible| &visible.cell)
    }

    /// Mutable cell displaying `index_path`, if it is visible.
    pub fn cell_mut(&mut self, index_path: IndexPath) -> Option<&mut SwipeCell> {
        self.visible.get_mut(&index_path).map(|visible| &mut visible.cell)
    }

    /// Rows that currently have a cell, in display order.
    pub fn visible_index_paths(&self) -> Vec<IndexPath> {
        self.visible.keys().copied().collect()
    }

    /// Rows whose buttons are revealed.
    pub fn open_index_paths(&self) -> Vec<IndexPath> {
        self.visible
            .iter()
            .filter(|(_, visible)| visible.cell.is_open())
            .map(|(path, _)| *path)
            .collect()
    }

    /// Number of recycled cells waiting for `identifier`.
    pub fn pooled_count(&self, identifier: &str) -> usize {
        self.reuse_pool.get(identifier).map_or(0, Vec::len)
    }

    /// Hide every open row except `except`. Returns how many rows were hidden.
    pub fn hide_open_cells(&mut self, except: Option<IndexPath>) -> usize {
        let mut hidden = 0;
        for (path, visible) in &mut self.visible {
            if Some(*path) != except && visible.cell.is_open() {
                visible.cell.hide_swipe(true, None);
                hidden += 1;
            }
        }
        if hidden > 0 {
            tracing::debug!(target: targets::MANAGER, hidden, ?except, "hid open rows");
        }
        hidden
    }

    /// Whether the table is in editing mode.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Enter or leave editing mode on every visible cell.
    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
        for visible in self.visible.values_mut() {
            visible.cell.set_editing(editing);
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Route a pan gesture.
    ///
    /// A gesture starting on `index_path` belongs to that row until it ends;
    /// later events go to that row regardless of `index_path`. Positions are
    /// in the row's coordinates.
    pub fn handle_pan(&mut self, index_path: IndexPath, event: &PanGestureEvent) -> bool {
        if event.state == GestureState::Started {
            let Some(cell) = self.cell_mut(index_path) else {
                return false;
            };
            if !cell.handle_pan(event) {
                return false;
            }
            let allows_multiple = cell.behavior().allows_multiple_swipe;
            self.tracking = Some(index_path);
            if !allows_multiple {
                self.hide_open_cells(Some(index_path));
            }
            return true;
        }

        let Some(tracked) = self.tracking else {
            return false;
        };
        let handled = self
            .cell_mut(tracked)
            .is_some_and(|cell| cell.handle_pan(event));
        if event.state.is_finished() {
            self.tracking = None;
        }
        handled
    }

    /// Route a tap at `point` (row coordinates) on `index_path`, or outside
    /// any row when `index_path` is `None`.
    ///
    /// A tap while other rows are open hides them. The tap stops there unless
    /// every open row allows touches on dismiss.
    pub fn handle_tap(&mut self, index_path: Option<IndexPath>, point: Point) -> TableTap {
        let others: Vec<_> = self
            .open_index_paths()
            .into_iter()
            .filter(|path| Some(*path) != index_path)
            .collect();
        if !others.is_empty() {
            let pass_through = others.iter().all(|path| {
                self.cell(*path)
                    .is_some_and(|cell| cell.behavior().touch_on_dismiss_swipe)
            });
            self.hide_open_cells(index_path);
            if !pass_through {
                return TableTap::Dismissed;
            }
        }

        let Some(index_path) = index_path else {
            return TableTap::Ignored;
        };
        if let Some(cell) = self.cell_mut(index_path) {
            if cell.is_open() {
                let outcome = cell.handle_tap(point);
                return TableTap::Cell { index_path, outcome };
            }
        }

        let selectable = self.item(index_path).is_some_and(|item| item.selectable);
        if selectable && !self.editing {
            tracing::debug!(target: targets::MANAGER, %index_path, "row selected");
            self.row_selected.emit(index_path);
            TableTap::Selected(index_path)
        } else {
            TableTap::Ignored
        }
    }

    /// Advance every visible cell to `now`. Returns `true` if any layout changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for visible in self.visible.values_mut() {
            changed |= visible.cell.tick(now);
        }
        changed
    }

    // =========================================================================
    // Responder navigation
    // =========================================================================

    /// The closest focusable row before `index_path`.
    pub fn index_path_for_previous_responder(&self, index_path: IndexPath) -> Option<IndexPath> {
        self.index_paths()
            .take_while(|path| *path < index_path)
            .filter(|path| self.is_focusable(*path))
            .last()
    }

    /// The closest focusable row after `index_path`.
    pub fn index_path_for_next_responder(&self, index_path: IndexPath) -> Option<IndexPath> {
        self.index_paths()
            .skip_while(|path| *path <= index_path)
            .find(|path| self.is_focusable(*path))
    }

    fn is_focusable(&self, index_path: IndexPath) -> bool {
        self.item(index_path).is_some_and(|item| item.focusable)
    }
}

static_assertions::assert_impl_all!(TableViewManager: Send);
