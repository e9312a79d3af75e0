use crate::error::{Result as ServerErrorResult, ServerError};

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::{LevelFilter, info};

/// Initialize the global logger.
///
/// With `log_file` set, lines go to that file with RFC 3339 millisecond timestamps and
/// source locations. Otherwise they go to stdout tagged with the log target, with the
/// level colored when `colored` is set.
pub fn initialize(
    log_level: sp_config::LogLevel,
    log_file: Option<PathBuf>,
    colored: bool,
) -> ServerErrorResult<()> {
    let level_filter = log_level.0;

    let sink = match log_file {
        Some(ref path) => file_dispatch(open_log_file(path)?),
        None => stdout_dispatch(colored),
    };

    Dispatch::new()
        .level(level_filter)
        // sqlx logs every statement at info
        .level_for("sqlx::query", LevelFilter::Warn)
        .chain(sink)
        .apply()
        .map_err(|e| ServerError::Logger {
            message: format!("Failed to initialize logger: {e}"),
        })?;

    match log_file {
        Some(ref path) => info!("Logger initialized: level={level_filter:?}, file={}", path.display()),
        None => info!("Logger initialized: level={level_filter:?}, stdout"),
    }

    // Bridge tracing to log
    tracing_log::LogTracer::init().ok();

    Ok(())
}

/// Open `path` for appending, creating it when missing
pub(crate) fn open_log_file(path: &Path) -> ServerErrorResult<File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ServerError::LogFile {
            path: path.display().to_string(),
            source,
        })
}

fn file_dispatch(file: File) -> Dispatch {
    Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} - {}] {message} [{}:{}]",
                humantime::format_rfc3339_millis(SystemTime::now()),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
            ))
        })
        .chain(file)
}

fn stdout_dispatch(colored: bool) -> Dispatch {
    let colors = colored.then(|| {
        ColoredLevelConfig::new()
            .trace(Color::Magenta)
            .debug(Color::Blue)
            .info(Color::Green)
            .warn(Color::Yellow)
            .error(Color::Red)
    });

    Dispatch::new()
        .format(move |out, message, record| {
            let level = match colors {
                Some(colors) => colors.color(record.level()).to_string(),
                None => record.level().to_string(),
            };
            out.finish(format_args!(
                "[{} - {level}] {message} [{}]",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.target(),
            ))
        })
        .chain(std::io::stdout())
}
