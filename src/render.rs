use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace};

use crate::filter::filter;
use crate::row::{Column, Row};
use crate::sort::sort;
use crate::view_state::{Activation, ViewState};

/// Indicator shown when the view holds no rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmptyState {
    pub visible: bool,
}

/// Anything the film table can be drawn into.
pub trait RenderTarget {
    fn clear(&mut self);
    fn append_row(&mut self, row: &Row);
    fn set_sort_icon(&mut self, column: Column, glyph: Option<char>);
    /// Targets without an empty state indicator return `None`.
    fn empty_state(&mut self) -> Option<&mut EmptyState>;
}

/// Runs filter and sort against a [`ViewState`] and pushes the result into a target.
pub struct RenderController {
    source: Arc<[Row]>,
}

impl RenderController {
    pub fn new(source: Arc<[Row]>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &[Row] {
        &self.source
    }

    /// Full view in source order, rendered once. `preselected` shows a glyph
    /// without sorting.
    pub fn initialize<T: RenderTarget>(
        &self,
        target: &mut T,
        preselected: Option<Column>,
    ) -> ViewState {
        let mut state = ViewState::new(self.source.len());
        if let Some(column) = preselected {
            state.mark(column);
        }
        self.update_icons(&state, target);
        self.render(&state, target);
        state
    }

    /// Re-derives the view from the source for `query`.
    pub fn apply_query<T: RenderTarget>(&self, state: &mut ViewState, query: &str, target: &mut T) {
        let start_time = Instant::now();
        state.rows = filter(&self.source, query);
        state.query = query.to_string();
        debug!(
            "Filter {:?} kept {}/{} rows in {}ms",
            query,
            state.rows.len(),
            self.source.len(),
            start_time.elapsed().as_millis()
        );
        self.render(state, target);
    }

    /// Sorts the current view by `column` as a header click does.
    pub fn activate_column<T: RenderTarget>(
        &self,
        state: &mut ViewState,
        column: Column,
        target: &mut T,
    ) -> Activation {
        let activation = state.activate(column);
        state.rows = sort(&self.source, &state.rows, column, activation.order);
        debug!(
            "Sorted {} rows by {} ({})",
            state.rows.len(),
            column,
            activation.order
        );
        self.update_icons(state, target);
        self.render(state, target);
        activation
    }

    pub fn render<T: RenderTarget>(&self, state: &ViewState, target: &mut T) {
        target.clear();
        for &idx in &state.rows {
            target.append_row(&self.source[idx]);
        }
        if let Some(empty) = target.empty_state() {
            empty.visible = state.rows.is_empty();
        }
        trace!("Rendered {} rows", state.rows.len());
    }

    fn update_icons<T: RenderTarget>(&self, state: &ViewState, target: &mut T) {
        let active = state.active();
        for column in Column::ALL {
            let glyph = active.filter(|(c, _)| *c == column).map(|(_, g)| g);
            target.set_sort_icon(column, glyph);
        }
    }
}
