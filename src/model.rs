use std::sync::Arc;

use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, info, trace, warn};

use crate::domain::{FVConfig, FVError, HELP_TEXT, Message};
use crate::inputter::{InputResult, Inputter};
use crate::render::{EmptyState, RenderController, RenderTarget};
use crate::row::{Column, Row};
use crate::ui::UILayout;
use crate::view_state::ViewState;

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    POPUP,
    CMDINPUT,
}

/// Everything the ui needs to draw one frame.
pub struct UIData {
    pub name: String,
    pub rows: Vec<[String; 5]>,
    pub icons: [Option<char>; 5],
    pub empty_state: Option<EmptyState>,
    pub selected_row: usize,
    pub show_popup: bool,
    pub popup_message: String,
    pub layout: Option<UILayout>,
    pub cmdinput: InputResult,
    pub active_cmdinput: bool,
    pub status_message: String,
}

impl UIData {
    pub fn empty(show_empty_state: bool) -> Self {
        UIData {
            name: String::new(),
            rows: Vec::new(),
            icons: [None; 5],
            empty_state: show_empty_state.then(EmptyState::default),
            selected_row: 0,
            show_popup: false,
            popup_message: String::new(),
            layout: None,
            cmdinput: InputResult::default(),
            active_cmdinput: false,
            status_message: String::new(),
        }
    }
}

impl RenderTarget for UIData {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, row: &Row) {
        self.rows.push(row.cells());
    }

    fn set_sort_icon(&mut self, column: Column, glyph: Option<char>) {
        self.icons[column.index()] = glyph;
    }

    fn empty_state(&mut self) -> Option<&mut EmptyState> {
        self.empty_state.as_mut()
    }
}

pub struct Model {
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    controller: RenderController,
    view: ViewState,
    uidata: UIData,
    input: Inputter,
}

impl Model {
    pub fn init(
        config: &FVConfig,
        name: &str,
        source: Arc<[Row]>,
        layout: Option<UILayout>,
    ) -> Self {
        let controller = RenderController::new(source);
        let mut uidata = UIData::empty(config.show_empty_state);
        uidata.name = name.to_string();
        uidata.layout = layout;
        let view = controller.initialize(&mut uidata, config.initial_sort_column);

        let mut model = Self {
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            controller,
            view,
            uidata,
            input: Inputter::default(),
        };
        model.set_status_message(format!("{} films", model.controller.source().len()));
        model
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn layout(&self) -> Option<&UILayout> {
        self.uidata.layout.as_ref()
    }

    /// While the search field is focused every key goes to it.
    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::CMDINPUT
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.uidata.status_message = message.into();
    }

    fn page_size(&self) -> usize {
        self.layout().map_or(1, |l| l.body.height.max(1) as usize)
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), FVError> {
        let Some(msg) = message else {
            return Ok(());
        };
        trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);
        match self.modus {
            Modus::TABLE => match msg {
                Message::Quit => self.quit(),
                Message::Help => self.show_help(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::MoveUp => self.move_selection_up(1),
                Message::MoveDown => self.move_selection_down(1),
                Message::MovePageUp => self.move_selection_up(self.page_size()),
                Message::MovePageDown => self.move_selection_down(self.page_size()),
                Message::MoveBeginning => self.uidata.selected_row = 0,
                Message::MoveEnd => {
                    self.uidata.selected_row = self.uidata.rows.len().saturating_sub(1)
                }
                Message::Search => self.enter_cmd_mode(),
                Message::Submit => self.submit_query(),
                Message::SortBy(column) => self.sort_column(column),
                _ => (),
            },
            Modus::POPUP => match msg {
                Message::Quit => self.quit(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::Exit | Message::Help => self.close_popup(),
                _ => (),
            },
            Modus::CMDINPUT => match msg {
                Message::RawKey(key) => self.raw_input(key),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::Submit => self.submit_query(),
                Message::SortBy(column) => self.sort_column(column),
                _ => (),
            },
        }
        Ok(())
    }

    // -------------------- Control handling functions ---------------------- //

    fn ui_resize(&mut self, width: usize, height: usize) {
        let (old_width, old_height) = self.layout().map_or((0, 0), |l| (l.width, l.height));
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            old_width, width, old_height, height
        );
        self.uidata.layout = match UILayout::from_values(width, height) {
            Ok(layout) => Some(layout),
            Err(e) => {
                warn!("Cannot lay out the table: {e}");
                None
            }
        };
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
        self.uidata.popup_message = HELP_TEXT.to_string();
        self.uidata.show_popup = true;
    }

    fn close_popup(&mut self) {
        trace!("Close popup ...");
        self.modus = self.previous_modus;
        self.previous_modus = Modus::POPUP;
        self.uidata.show_popup = false;
    }

    fn enter_cmd_mode(&mut self) {
        trace!("Entering search field ...");
        self.previous_modus = self.modus;
        self.modus = Modus::CMDINPUT;
        self.uidata.active_cmdinput = true;
        self.uidata.cmdinput = self.input.get();
    }

    fn leave_cmd_mode(&mut self) {
        if self.modus == Modus::CMDINPUT {
            self.modus = Modus::TABLE;
            self.previous_modus = Modus::CMDINPUT;
        }
        self.uidata.active_cmdinput = false;
        self.uidata.cmdinput = self.input.get();
    }

    fn raw_input(&mut self, key: KeyEvent) {
        let result = self.input.read(key);
        if result.canceled {
            self.input.set(&self.view.query);
            self.leave_cmd_mode();
        } else if result.finished {
            self.submit_query();
        } else {
            self.uidata.cmdinput = result;
        }
    }

    /// Filters the source by the current search field content.
    fn submit_query(&mut self) {
        let query = self.input.value().to_string();
        self.controller
            .apply_query(&mut self.view, &query, &mut self.uidata);
        self.uidata.selected_row = 0;
        self.leave_cmd_mode();

        let found = self.view.rows.len();
        info!("Search {:?} matched {} films", query, found);
        if found == 0 {
            self.set_status_message("Found no matches!");
        } else {
            self.set_status_message(format!(
                "Found {}/{} films",
                found,
                self.controller.source().len()
            ));
        }
    }

    fn sort_column(&mut self, column: Column) {
        let activation = self
            .controller
            .activate_column(&mut self.view, column, &mut self.uidata);
        debug!("Activated {:?}", activation);
        self.uidata.selected_row = self
            .uidata
            .selected_row
            .min(self.uidata.rows.len().saturating_sub(1));
        self.set_status_message(format!(
            "Sorted by {} {}",
            activation.column.label(),
            activation.glyph
        ));
    }

    fn move_selection_up(&mut self, size: usize) {
        self.uidata.selected_row = self.uidata.selected_row.saturating_sub(size);
    }

    fn move_selection_down(&mut self, size: usize) {
        let last = self.uidata.rows.len().saturating_sub(1);
        self.uidata.selected_row = (self.uidata.selected_row + size).min(last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::films;
    use ratatui::crossterm::event::{KeyCode, KeyEvent};

    fn model() -> Model {
        let layout = UILayout::from_values(100, 10).ok();
        Model::init(&FVConfig::default(), "films.json", films(), layout)
    }

    fn titles(model: &Model) -> Vec<&str> {
        model
            .get_uidata()
            .rows
            .iter()
            .map(|r| r[0].as_str())
            .collect()
    }

    fn type_query(model: &mut Model, query: &str) {
        model.update(Some(Message::Search)).unwrap();
        for c in query.chars() {
            model
                .update(Some(Message::RawKey(KeyEvent::from(KeyCode::Char(c)))))
                .unwrap();
        }
    }

    fn press_enter(model: &mut Model) {
        model
            .update(Some(Message::RawKey(KeyEvent::from(KeyCode::Enter))))
            .unwrap();
    }

    #[test]
    fn starts_with_all_rows_and_preselected_glyph() {
        let model = model();
        assert_eq!(titles(&model), vec!["Dune", "Duel", "Jaws"]);
        assert_eq!(model.get_uidata().icons[0], Some('▲'));
        assert_eq!(model.get_uidata().status_message, "3 films");
    }

    #[test]
    fn no_preselected_column() {
        let config = FVConfig::default().initial_sort_column(None);
        let model = Model::init(&config, "films.json", films(), None);
        assert_eq!(model.get_uidata().icons, [None; 5]);
    }

    #[test]
    fn enter_in_search_field_filters() {
        let mut model = model();
        type_query(&mut model, "du");
        assert!(model.raw_keyevents());
        // Typing alone does not filter.
        assert_eq!(titles(&model).len(), 3);

        press_enter(&mut model);
        assert!(!model.raw_keyevents());
        assert_eq!(titles(&model), vec!["Dune", "Duel"]);
        assert_eq!(model.view().query, "du");
        assert_eq!(model.get_uidata().status_message, "Found 2/3 films");
    }

    #[test]
    fn button_submits_current_field_value() {
        let mut model = model();
        type_query(&mut model, "jaws");
        model.update(Some(Message::Submit)).unwrap();
        assert_eq!(titles(&model), vec!["Jaws"]);

        // Enter on the table acts like the button.
        model.update(Some(Message::Submit)).unwrap();
        assert_eq!(titles(&model), vec!["Jaws"]);
    }

    #[test]
    fn no_match_shows_empty_state() {
        let mut model = model();
        type_query(&mut model, "zz");
        press_enter(&mut model);
        let data = model.get_uidata();
        assert!(data.rows.is_empty());
        assert_eq!(data.empty_state, Some(EmptyState { visible: true }));
        assert_eq!(data.status_message, "Found no matches!");
    }

    #[test]
    fn empty_state_can_be_disabled() {
        let config = FVConfig::default().show_empty_state(false);
        let mut model = Model::init(&config, "films.json", films(), None);
        type_query(&mut model, "zz");
        press_enter(&mut model);
        assert_eq!(model.get_uidata().empty_state, None);
    }

    #[test]
    fn escape_restores_last_applied_query() {
        let mut model = model();
        type_query(&mut model, "du");
        press_enter(&mut model);
        type_query(&mut model, "ne");
        assert_eq!(model.get_uidata().cmdinput.input, "dune");

        model
            .update(Some(Message::RawKey(KeyEvent::from(KeyCode::Esc))))
            .unwrap();
        assert!(!model.raw_keyevents());
        assert_eq!(model.get_uidata().cmdinput.input, "du");
        assert_eq!(titles(&model), vec!["Dune", "Duel"]);
    }

    #[test]
    fn header_clicks_sort_current_view() {
        let mut model = model();
        model.update(Some(Message::SortBy(Column::ReleaseYear))).unwrap();
        assert_eq!(titles(&model), vec!["Duel", "Jaws", "Dune"]);
        assert_eq!(model.get_uidata().icons, [None, Some('▲'), None, None, None]);

        model.update(Some(Message::SortBy(Column::ReleaseYear))).unwrap();
        assert_eq!(titles(&model), vec!["Dune", "Jaws", "Duel"]);
        assert_eq!(model.get_uidata().status_message, "Sorted by Year ▼");
    }

    #[test]
    fn sort_after_filter_keeps_single_row() {
        let mut model = model();
        type_query(&mut model, "Dune");
        press_enter(&mut model);
        model.update(Some(Message::SortBy(Column::Title))).unwrap();
        assert_eq!(titles(&model), vec!["Dune"]);
    }

    #[test]
    fn selection_stays_inside_view() {
        let mut model = model();
        model.update(Some(Message::MoveEnd)).unwrap();
        assert_eq!(model.get_uidata().selected_row, 2);
        model.update(Some(Message::MovePageDown)).unwrap();
        assert_eq!(model.get_uidata().selected_row, 2);
        model.update(Some(Message::MoveUp)).unwrap();
        assert_eq!(model.get_uidata().selected_row, 1);

        type_query(&mut model, "jaws");
        press_enter(&mut model);
        assert_eq!(model.get_uidata().selected_row, 0);
    }

    #[test]
    fn help_popup_opens_and_closes() {
        let mut model = model();
        model.update(Some(Message::Help)).unwrap();
        assert!(model.get_uidata().show_popup);
        // Sorting is ignored while the popup is open.
        model.update(Some(Message::SortBy(Column::Title))).unwrap();
        assert_eq!(titles(&model), vec!["Dune", "Duel", "Jaws"]);
        model.update(Some(Message::Exit)).unwrap();
        assert!(!model.get_uidata().show_popup);
    }

    #[test]
    fn resize_too_small_drops_layout() {
        let mut model = model();
        model.update(Some(Message::Resize(10, 2))).unwrap();
        assert!(model.layout().is_none());
        model.update(Some(Message::Resize(80, 24))).unwrap();
        assert!(model.layout().is_some());
    }

    #[test]
    fn quit() {
        let mut model = model();
        model.update(Some(Message::Quit)).unwrap();
        assert_eq!(model.status, Status::QUITTING);
    }
}
