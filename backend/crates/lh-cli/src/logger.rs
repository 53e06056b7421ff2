use crate::error::{CliError, Result as CliErrorResult};

use std::path::Path;
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use lh_config::LogLevel;
use log::debug;

fn logger_error(message: String) -> CliError {
    CliError::Logger { message }
}

/// Route `log` records through fern.
///
/// With `log_file` set, records are appended there (with their target).
/// Otherwise they go to stderr, which keeps stdout free for command output.
pub fn initialize(level: LogLevel, log_file: Option<&Path>, colored: bool) -> CliErrorResult<()> {
    let sink = match log_file {
        Some(path) => file_sink(path)?,
        None => stderr_sink(colored),
    };

    Dispatch::new()
        .level(*level)
        .chain(sink)
        .apply()
        .map_err(|e| logger_error(format!("Logger already installed: {e}")))?;

    debug!(
        "Logging at {} to {}",
        *level,
        log_file.map_or_else(|| "stderr".to_string(), |p| p.display().to_string())
    );
    Ok(())
}

fn file_sink(path: &Path) -> CliErrorResult<Dispatch> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| logger_error(format!("Cannot create {}: {}", dir.display(), e)))?;
    }

    let file = fern::log_file(path)
        .map_err(|e| logger_error(format!("Cannot open {}: {}", path.display(), e)))?;

    Ok(Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} - {}] {} [{}]",
                humantime::format_rfc3339(SystemTime::now()),
                record.level(),
                message,
                record.target()
            ))
        })
        .chain(file))
}

fn stderr_sink(colored: bool) -> Dispatch {
    let palette = colored.then(|| {
        ColoredLevelConfig::new()
            .trace(Color::Magenta)
            .debug(Color::Blue)
            .info(Color::Green)
            .warn(Color::Yellow)
            .error(Color::Red)
    });

    Dispatch::new()
        .format(move |out, message, record| {
            let stamp = humantime::format_rfc3339(SystemTime::now());
            match &palette {
                Some(palette) => out.finish(format_args!(
                    "[{} - {}] {}",
                    stamp,
                    palette.color(record.level()),
                    message
                )),
                None => out.finish(format_args!("[{} - {}] {}", stamp, record.level(), message)),
            }
        })
        .chain(std::io::stderr())
}
