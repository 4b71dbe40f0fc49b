use std::path::PathBuf;

use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;
use thiserror::Error;

use crate::row::Column;

#[derive(Debug, Error)]
pub enum FVError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Could not parse film data: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("File not found: {0:?}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0:?}")]
    PermissionDenied(PathBuf),
    #[error("Invalid path {0:?}: {1}")]
    InvalidPath(String, String),
    #[error("Required element missing: {0}")]
    MissingElement(&'static str),
    #[error("Unknown column {0:?}")]
    UnknownColumn(String),
    #[error("Logging setup failed: {0}")]
    LoggingFailed(String),
}

#[derive(Debug, Clone)]
pub enum Message {
    Quit,
    Exit,
    Help,
    Resize(usize, usize),
    MoveUp,
    MoveDown,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    Search,
    Submit,
    SortBy(Column),
    RawKey(KeyEvent),
}

#[derive(Debug, Clone, Setters)]
pub struct FVConfig {
    pub event_poll_time: u64,
    pub show_empty_state: bool,
    pub initial_sort_column: Option<Column>,
}

impl Default for FVConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            show_empty_state: true,
            initial_sort_column: Some(Column::Title),
        }
    }
}

pub const EMPTY_STATE_TEXT: &str = "No films match your search.";

pub const HELP_TEXT: &str = "\
filmview

  /, click field    Edit the title search
  Enter             Apply search (in field or table)
  click [ Search ]  Apply search
  Esc               Leave search field / close popup
  1 .. 5, click     Sort by column (click again to flip)
  j, k, arrows      Move selection
  PgUp, PgDn        Move by page
  g, G              Jump to first / last row
  ?                 Show this help
  q                 Quit";
