use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Cell, Clear, Paragraph, Row as TableRow, Table, TableState, Wrap},
};
use tracing::trace;

use crate::domain::{EMPTY_STATE_TEXT, FVError};
use crate::model::{Model, UIData};
use crate::row::Column;

pub const CMDLINE_HEIGH: usize = 1;
pub const TABLE_HEADER_HEIGHT: usize = 1;
pub const MIN_TABLE_HEIGHT: usize = 1;
pub const SEARCH_LABEL: &str = "Search: ";
pub const SEARCH_BUTTON: &str = "[ Search ]";
pub const SEARCH_FIELD_MIN_WIDTH: usize = 8;
pub const SEARCH_FIELD_MAX_WIDTH: usize = 40;

/// Relative width of the columns, in `Column::ALL` order.
pub const COLUMN_CONSTRAINTS: [Constraint; 5] = [
    Constraint::Percentage(30),
    Constraint::Percentage(8),
    Constraint::Percentage(24),
    Constraint::Percentage(18),
    Constraint::Percentage(20),
];

/// Screen regions of the header cells, table body and search line.
#[derive(Clone, Debug, PartialEq)]
pub struct UILayout {
    pub width: usize,
    pub height: usize,
    pub header_cells: Vec<Rect>,
    pub body: Rect,
    pub search_label: Rect,
    pub search_field: Rect,
    pub button: Rect,
    pub status: Rect,
}

fn to_u16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

impl UILayout {
    /// Fails when the table body, the search field or the button does not fit.
    pub fn from_values(ui_width: usize, ui_height: usize) -> Result<Self, FVError> {
        if ui_height < TABLE_HEADER_HEIGHT + MIN_TABLE_HEIGHT + CMDLINE_HEIGH || ui_width == 0 {
            return Err(FVError::MissingElement("table body"));
        }
        let label_width = SEARCH_LABEL.chars().count();
        let button_width = SEARCH_BUTTON.chars().count();
        if ui_width < label_width + SEARCH_FIELD_MIN_WIDTH {
            return Err(FVError::MissingElement("search field"));
        }
        if ui_width < label_width + SEARCH_FIELD_MIN_WIDTH + 1 + button_width {
            return Err(FVError::MissingElement("search button"));
        }

        let (w, h) = (to_u16(ui_width), to_u16(ui_height));
        let table_height = to_u16(ui_height - TABLE_HEADER_HEIGHT - CMDLINE_HEIGH);
        let header = Rect::new(0, 0, w, to_u16(TABLE_HEADER_HEIGHT));
        let body = Rect::new(0, header.bottom(), w, table_height);
        let cmdline_y = h - to_u16(CMDLINE_HEIGH);

        let field_width = (ui_width - label_width - 1 - button_width)
            .clamp(SEARCH_FIELD_MIN_WIDTH, SEARCH_FIELD_MAX_WIDTH);
        let search_label = Rect::new(0, cmdline_y, to_u16(label_width), 1);
        let search_field = Rect::new(search_label.right(), cmdline_y, to_u16(field_width), 1);
        let button = Rect::new(search_field.right() + 1, cmdline_y, to_u16(button_width), 1);
        let status_x = button.right() + 1;
        let status = Rect::new(status_x.min(w), cmdline_y, w.saturating_sub(status_x), 1);

        let layout = UILayout {
            width: ui_width,
            height: ui_height,
            header_cells: Layout::horizontal(COLUMN_CONSTRAINTS).split(header).to_vec(),
            body,
            search_label,
            search_field,
            button,
            status,
        };
        trace!("Build UILayout: {:?}", layout);
        Ok(layout)
    }

    pub fn header_at(&self, position: Position) -> Option<Column> {
        self.header_cells
            .iter()
            .position(|r| r.contains(position))
            .map(|idx| Column::ALL[idx])
    }
}

#[derive(Default)]
pub struct TableUI {
    table_state: TableState,
}

impl TableUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let data = model.get_uidata();
        let Some(layout) = &data.layout else {
            let notice = Paragraph::new("Terminal too small")
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(notice, frame.area());
            return;
        };

        self.draw_header(data, layout, frame);
        self.draw_table(data, layout, frame);
        self.draw_cmdline(data, layout, frame);
        if data.show_popup {
            Self::draw_popup(&data.popup_message, frame);
        }
    }

    fn draw_header(&self, data: &UIData, layout: &UILayout, frame: &mut Frame) {
        for (column, area) in Column::ALL.into_iter().zip(layout.header_cells.iter()) {
            let mut spans = vec![Span::from(column.label()).bold()];
            if let Some(glyph) = data.icons[column.index()] {
                spans.push(Span::from(format!(" {glyph}")).yellow());
            }
            frame.render_widget(Paragraph::new(Line::from(spans)).underlined(), *area);
        }
    }

    fn draw_table(&mut self, data: &UIData, layout: &UILayout, frame: &mut Frame) {
        let rows = data
            .rows
            .iter()
            .map(|cells| TableRow::new(cells.iter().map(|c| Cell::from(c.as_str()))));
        let table = Table::new(rows, COLUMN_CONSTRAINTS)
            .column_spacing(0)
            .row_highlight_style(Style::new().reversed());

        if data.rows.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(data.selected_row));
        }
        frame.render_stateful_widget(table, layout.body, &mut self.table_state);

        if data.empty_state.as_ref().is_some_and(|e| e.visible) {
            let area = Rect { height: 1, ..layout.body };
            let notice = Paragraph::new(EMPTY_STATE_TEXT)
                .alignment(Alignment::Center)
                .italic();
            frame.render_widget(notice, area);
        }
    }

    fn draw_cmdline(&self, data: &UIData, layout: &UILayout, frame: &mut Frame) {
        frame.render_widget(Paragraph::new(SEARCH_LABEL).bold(), layout.search_label);

        let field_width = layout.search_field.width as usize;
        let input = &data.cmdinput;
        // Scroll the text so the curser stays visible.
        let skip = input.curser_pos.saturating_sub(field_width.saturating_sub(1));
        let visible: String = input.input.chars().skip(skip).take(field_width).collect();
        let field_style = if data.active_cmdinput {
            Style::new().reversed()
        } else {
            Style::new().underlined()
        };
        frame.render_widget(
            Paragraph::new(visible).style(field_style),
            layout.search_field,
        );
        if data.active_cmdinput {
            let x = layout.search_field.x + (input.curser_pos - skip) as u16;
            frame.set_cursor_position(Position::new(x, layout.search_field.y));
        }

        frame.render_widget(Paragraph::new(SEARCH_BUTTON).bold().cyan(), layout.button);
        frame.render_widget(
            Paragraph::new(format!("{} | {}", data.status_message, data.name))
                .alignment(Alignment::Right),
            layout.status,
        );
    }

    fn draw_popup(message: &str, frame: &mut Frame) {
        let area = frame.area();
        let width = (message.lines().map(|l| l.chars().count()).max().unwrap_or(0) + 4)
            .min(area.width as usize) as u16;
        let height = (message.lines().count() + 2).min(area.height as usize) as u16;
        let popup = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(message).block(Block::bordered().title(" Help ")),
            popup,
        );
    }
}
