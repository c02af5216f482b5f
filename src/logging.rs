//! Log setup.
//!
//! The terminal belongs to the editor, so logs only go to a file, and only
//! when one is named on the command line.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::core::error::{EditorError, Result};

/// Environment variable holding the log filter, e.g. `slate=trace`
pub const LOG_ENV: &str = "SLATE_LOG";

/// Install a global subscriber appending to `path`.
///
/// The filter comes from `SLATE_LOG` and defaults to `info`.
pub fn init(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| EditorError::io(path, e))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| EditorError::Cli(format!("cannot install logger: {}", e)))
}
