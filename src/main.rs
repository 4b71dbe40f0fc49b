use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::{execute, terminal};
use tracing::{error, info};

mod controller;
mod domain;
mod filter;
mod inputter;
mod logging;
mod model;
mod render;
mod row;
mod sort;
mod ui;
mod view_state;

use controller::Controller;
use domain::{FVConfig, FVError};
use model::{Model, Status};
use row::{Column, JsonFile, RowProvider};
use ui::{TableUI, UILayout};

/// Browse a list of films, search by title and sort by any column.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file holding an array of film records.
    #[arg(default_value = "films.json")]
    path: String,

    /// Where to write the log.
    #[arg(long, default_value = "~/.cache/filmview/filmview.log")]
    log_file: String,

    /// Column shown as sorted at startup, or "none".
    #[arg(long, default_value = "title", value_parser = parse_sort_column)]
    sort_column: ::std::option::Option<Column>,

    /// Do not show a notice when no film matches.
    #[arg(long)]
    no_empty_state: bool,

    /// Event poll timeout in milliseconds.
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,
}

fn parse_sort_column(s: &str) -> Result<Option<Column>, FVError> {
    match s.trim() {
        "none" => Ok(None),
        name => name.parse::<Column>().map(Some),
    }
}

impl Args {
    fn config(&self) -> FVConfig {
        FVConfig::default()
            .event_poll_time(self.poll_ms)
            .show_empty_state(!self.no_empty_state)
            .initial_sort_column(self.sort_column)
    }
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Err(e) => {
            error!("Exiting: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(args: Args) -> Result<(), FVError> {
    logging::init(&row::expand_path(&args.log_file)?)?;
    let config = args.config();
    info!("Starting filmview with {:?}", config);

    let path = row::expand_path(&args.path)?;
    let source = JsonFile::new(path.clone())
        .load()
        .inspect_err(|e| error!("Loading {:?} failed: {e}", path))?;

    let (width, height) = terminal::size()?;
    let layout = UILayout::from_values(width as usize, height as usize)
        .inspect_err(|e| error!("Setup aborted: {e}"))?;

    let mut model = Model::init(&config, &row::file_name(&path), source, Some(layout));
    let mut ui = TableUI::new();
    let controller = Controller::new(&config);

    let mut terminal = ratatui::init();

    let result = (|| -> Result<(), FVError> {
        execute!(stdout(), EnableMouseCapture)?;
        while model.status != Status::QUITTING {
            // Render the current view
            terminal.draw(|f| ui.draw(&model, f))?;

            // Handle events and map to a Message
            let message = controller.handle_event(&model)?;
            model.update(message)?;
        }
        Ok(())
    })();

    let _ = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    info!("Bye, last search {:?}", model.view().query);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_defaults_to_title() {
        let args = Args::try_parse_from(["filmview"]).unwrap();
        assert_eq!(args.sort_column, Some(Column::Title));
        assert_eq!(args.config().initial_sort_column, Some(Column::Title));
    }

    #[test]
    fn sort_column_accepts_names_and_none() {
        let args = Args::try_parse_from(["filmview", "--sort-column", "release_year"]).unwrap();
        assert_eq!(args.sort_column, Some(Column::ReleaseYear));

        let args = Args::try_parse_from(["filmview", "--sort-column", "none"]).unwrap();
        assert_eq!(args.config().initial_sort_column, None);
    }

    #[test]
    fn unknown_sort_column_is_a_usage_error() {
        let err = Args::try_parse_from(["filmview", "--sort-column", "budget"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
