use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

/// Install the global logger. `RUST_LOG` overrides the default `info` filter.
///
/// With a `file`, records are appended there instead of stderr: the play
/// screen owns the terminal and stray stderr output would tear it.
pub fn init(file: Option<&Path>) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();

    if let Some(path) = file {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        }
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(log_file)));
    }

    builder.try_init().context("Logger already initialised")?;
    Ok(())
}
