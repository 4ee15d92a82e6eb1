//! Rows and sections of a managed table.

/// Height of a row with no explicit or registered height.
pub const DEFAULT_ROW_HEIGHT: f32 = 44.0;

/// Cell identifier used by items that do not name one.
pub const DEFAULT_CELL_IDENTIFIER: &str = "default";

/// Position of a row within its section, used for grouped styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// First of several rows.
    First,
    /// Neither first nor last.
    Middle,
    /// Last of several rows.
    Last,
    /// Only row of its section.
    Single,
}

impl CellType {
    /// Type of row `row` in a section of `count` rows.
    pub fn for_row(row: usize, count: usize) -> Option<Self> {
        match (row, count) {
            (_, 0) => None,
            (row, count) if row >= count => None,
            (_, 1) => Some(Self::Single),
            (0, _) => Some(Self::First),
            (row, count) if row + 1 == count => Some(Self::Last),
            _ => Some(Self::Middle),
        }
    }
}

/// One row of a managed table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableItem {
    /// Main text.
    pub title: String,
    /// Secondary text.
    pub detail: Option<String>,
    /// Explicit height. Overrides the height registered for the identifier.
    pub height: Option<f32>,
    /// Kind of cell that displays the item. Cells are recycled per identifier.
    pub cell_identifier: String,
    /// Whether the row takes part in responder navigation.
    pub focusable: bool,
    /// Whether tapping the row selects it.
    pub selectable: bool,
}

impl TableItem {
    /// Create an item with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: None,
            height: None,
            cell_identifier: DEFAULT_CELL_IDENTIFIER.to_string(),
            focusable: false,
            selectable: true,
        }
    }

    /// Set the detail text using builder pattern.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set an explicit height using builder pattern.
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height.max(0.0));
        self
    }

    /// Set the cell identifier using builder pattern.
    pub fn with_cell_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.cell_identifier = identifier.into();
        self
    }

    /// Set whether the row takes part in responder navigation.
    pub fn with_focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Set whether tapping the row selects it.
    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }
}

/// A titled group of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSection {
    /// Text above the rows.
    pub header_title: Option<String>,
    /// Text below the rows.
    pub footer_title: Option<String>,
    items: Vec<TableItem>,
}

impl TableSection {
    /// Create an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty section with a header.
    pub fn with_header(header: impl Into<String>) -> Self {
        Self {
            header_title: Some(header.into()),
            ..Self::default()
        }
    }

    /// Set the footer using builder pattern.
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer_title = Some(footer.into());
        self
    }

    /// Append an item using builder pattern.
    pub fn with_item(mut self, item: TableItem) -> Self {
        self.items.push(item);
        self
    }

    /// Append an item.
    pub fn add_item(&mut self, item: TableItem) {
        self.items.push(item);
    }

    /// Insert an item at `row`, clamped to the end.
    pub fn insert_item(&mut self, row: usize, item: TableItem) {
        let row = row.min(self.items.len());
        self.items.insert(row, item);
    }

    /// Remove the item at `row`.
    pub fn remove_item(&mut self, row: usize) -> Option<TableItem> {
        (row < self.items.len()).then(|| self.items.remove(row))
    }

    /// The items.
    pub fn items(&self) -> &[TableItem] {
        &self.items
    }

    /// The item at `row`.
    pub fn item(&self, row: usize) -> Option<&TableItem> {
        self.items.get(row)
    }

    /// Mutable item at `row`.
    pub fn item_mut(&mut self, row: usize) -> Option<&mut TableItem> {
        self.items.get_mut(row)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the section has no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
