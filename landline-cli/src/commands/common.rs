//! Helpers shared across CLI commands.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;

use crate::error::CliError;

/// A stderr spinner, hidden when stderr is not a terminal.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]),
    );
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Write `value` as JSON to `output`, or stdout when `None`.
pub fn write_json<T: Serialize>(
    value: &T,
    output: Option<&Path>,
    pretty: bool,
) -> Result<(), CliError> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|error| CliError::Output {
                target: path.display().to_string(),
                error,
            })?;
            write_to(value, BufWriter::new(file), pretty, &path.display().to_string())
        }
        None => write_to(value, io::stdout().lock(), pretty, "stdout"),
    }
}

fn write_to<T: Serialize, W: Write>(
    value: &T,
    mut writer: W,
    pretty: bool,
    target: &str,
) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)
        .and_then(|_| writer.flush())
        .map_err(|error| CliError::Output {
            target: target.to_string(),
            error,
        })
}

/// Human-readable byte size.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b >= GB {
        format!("{:.2} GB", b / GB)
    } else if b >= MB {
        format!("{:.2} MB", b / MB)
    } else if b >= KB {
        format!("{:.2} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}
