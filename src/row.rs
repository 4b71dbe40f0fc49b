use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::FVError;

/// Rendered in place of an absent or null field.
pub const MISSING_VALUE: &str = "∅";

/// A single field value as it appears in the data file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(serde_json::Number),
    Text(String),
    // Anything else (booleans, arrays, objects) is kept but never compares.
    Malformed(serde_json::Value),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Malformed(v) => write!(f, "{v}"),
        }
    }
}

/// One film record. Fields are optional so a sparse record still loads.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub release_year: Option<Value>,
    #[serde(default)]
    pub director: Option<Value>,
    #[serde(default)]
    pub box_office: Option<Value>,
    #[serde(default)]
    pub country: Option<Value>,
}

impl Row {
    pub fn get(&self, column: Column) -> Option<&Value> {
        match column {
            Column::Title => self.title.as_ref(),
            Column::ReleaseYear => self.release_year.as_ref(),
            Column::Director => self.director.as_ref(),
            Column::BoxOffice => self.box_office.as_ref(),
            Column::Country => self.country.as_ref(),
        }
    }

    /// Display text of every field, in column order.
    pub fn cells(&self) -> [String; 5] {
        Column::ALL.map(|c| match self.get(c) {
            Some(v) => v.to_string(),
            None => MISSING_VALUE.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title,
    ReleaseYear,
    Director,
    BoxOffice,
    Country,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Title,
        Column::ReleaseYear,
        Column::Director,
        Column::BoxOffice,
        Column::Country,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Field name in the data file.
    pub fn name(self) -> &'static str {
        match self {
            Column::Title => "title",
            Column::ReleaseYear => "release_year",
            Column::Director => "director",
            Column::BoxOffice => "box_office",
            Column::Country => "country",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::Title => "Title",
            Column::ReleaseYear => "Year",
            Column::Director => "Director",
            Column::BoxOffice => "Box office",
            Column::Country => "Country",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = FVError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FVError::UnknownColumn(s.to_string()))
    }
}

/// Yields the source rows once per session.
pub trait RowProvider {
    fn load(&self) -> Result<Arc<[Row]>, FVError>;
}

/// Reads a JSON array of film records from disk.
#[derive(Debug)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> Result<String, FVError> {
        fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FVError::FileNotFound(self.path.clone()),
            ErrorKind::PermissionDenied => FVError::PermissionDenied(self.path.clone()),
            _ => FVError::IoError(e),
        })
    }
}

impl RowProvider for JsonFile {
    fn load(&self) -> Result<Arc<[Row]>, FVError> {
        let start_time = Instant::now();
        let raw = self.read()?;
        let rows = parse_rows(&raw)?;
        info!(
            "Loaded {} films from {:?} in {}ms",
            rows.len(),
            self.path,
            start_time.elapsed().as_millis()
        );
        Ok(rows)
    }
}

pub fn parse_rows(raw: &str) -> Result<Arc<[Row]>, FVError> {
    let rows: Vec<Row> = serde_json::from_str(raw)?;
    for (idx, row) in rows.iter().enumerate().filter(|(_, r)| r.title.is_none()) {
        debug!("Row {idx} has no title: {row:?}");
    }
    Ok(rows.into())
}

pub fn expand_path(path: &str) -> Result<PathBuf, FVError> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| FVError::InvalidPath(path.to_string(), e.to_string()))
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("???")
        .to_string()
}
