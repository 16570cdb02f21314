// Poptop Library - Public API

use std::fs::OpenOptions;
use std::path::Path;

// Re-export error types
pub mod error;
pub use error::{PoptopError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::{DashboardConfig, WidgetKind};

/// Initialize logging.
///
/// The dashboard owns the terminal, so records go to `log_file` when one is
/// given. Without it logging stays off unless `RUST_LOG` asks for it, in
/// which case records go to stderr.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");

    let mut builder = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let mut builder = env_logger::Builder::from_env(env);
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder
        }
        None if std::env::var_os("RUST_LOG").is_some() => env_logger::Builder::from_env(env),
        None => {
            let mut builder = env_logger::Builder::new();
            builder.filter_level(log::LevelFilter::Off);
            builder
        }
    };

    builder
        .try_init()
        .map_err(|e| PoptopError::config(format!("logger already initialized: {e}")))
}
