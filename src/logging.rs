//! Tracing setup. The terminal belongs to the ui, so logs go to a file.

use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::domain::FVError;

/// Installs the global subscriber writing to `log_path`.
///
/// Respects `RUST_LOG`, defaults to `info`. Creates missing parent directories.
pub fn init(log_path: &Path) -> Result<(), FVError> {
    let directory = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(directory)?;

    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            FVError::InvalidPath(log_path.display().to_string(), "no file name".into())
        })?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|e| FVError::LoggingFailed(e.to_string()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false),
        )
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| FVError::LoggingFailed(e.to_string()))
}
