use crate::row::Column;
use crate::sort::SortOrder;

/// Result of activating a column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub column: Column,
    /// Order the comparator is applied with.
    pub order: SortOrder,
    /// Glyph drawn on the header.
    pub glyph: char,
}

/// Derived view over the source rows plus the sort toggles.
///
/// `rows` holds indices into the source; the rows themselves are never copied.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub query: String,
    pub rows: Vec<usize>,
    toggles: [SortOrder; 5],
    active: Option<(Column, char)>,
}

impl ViewState {
    pub fn new(nrows: usize) -> Self {
        Self {
            query: String::new(),
            rows: (0..nrows).collect(),
            toggles: [SortOrder::default(); 5],
            active: None,
        }
    }

    pub fn toggle(&self, column: Column) -> SortOrder {
        self.toggles[column.index()]
    }

    pub fn active(&self) -> Option<(Column, char)> {
        self.active
    }

    /// Shows the glyph of `column`'s stored order without sorting or flipping.
    pub fn mark(&mut self, column: Column) {
        self.active = Some((column, self.toggle(column).glyph()));
    }

    /// Activates `column` as a header click does.
    ///
    /// Both the applied order and the glyph come from the stored toggle before
    /// the click; the stored toggle flips afterwards. Other columns keep theirs.
    pub fn activate(&mut self, column: Column) -> Activation {
        let order = self.toggle(column);
        self.toggles[column.index()] = order.flip();
        let glyph = order.glyph();
        self.active = Some((column, glyph));
        Activation {
            column,
            order,
            glyph,
        }
    }
}
