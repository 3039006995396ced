//! Console and rolling JSON file logging on `tracing`

use crate::config::LoggingConfig;
use crate::domain::{FhirflowError, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const LEVELS: [(&str, Level); 5] = [
    ("trace", Level::TRACE),
    ("debug", Level::DEBUG),
    ("info", Level::INFO),
    ("warn", Level::WARN),
    ("error", Level::ERROR),
];

const LOG_FILE_PREFIX: &str = "fhirflow.log";

/// Holds the file writer's worker; dropping it flushes buffered lines
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs the global subscriber
///
/// Events from the `fhirflow` target at `log_level_str` and above go to the
/// console, and to a rolling JSON file under `config.local_path` when local
/// logging is enabled. `RUST_LOG` replaces the level filter when set.
///
/// # Errors
///
/// Fails on an unknown level or an unusable log directory, and when a global
/// subscriber is already installed.
pub fn init_logging(log_level_str: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(log_level_str)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fhirflow={level}")));

    let mut layers = vec![fmt::layer()
        .with_target(true)
        .with_filter(filter.clone())
        .boxed()];

    let file_guard = if config.local_enabled {
        let (writer, guard) = tracing_appender::non_blocking(rolling_appender(config)?);
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(writer)
                .with_filter(filter)
                .boxed(),
        );
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| FhirflowError::Configuration(format!("Failed to initialize logging: {e}")))?;

    tracing::info!(
        level = %level,
        local_enabled = config.local_enabled,
        local_path = %config.local_path,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn rolling_appender(config: &LoggingConfig) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        FhirflowError::Configuration(format!(
            "Failed to create log directory {}: {e}",
            config.local_path
        ))
    })?;

    Ok(RollingFileAppender::new(
        rotation(&config.local_rotation),
        &config.local_path,
        LOG_FILE_PREFIX,
    ))
}

// Validated names only reach here; anything else falls back to daily files.
fn rotation(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

/// Maps a level name, in any case, to a [`Level`]
///
/// # Errors
///
/// Returns a configuration error naming the accepted levels.
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    let wanted = level_str.to_ascii_lowercase();
    LEVELS
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, level)| *level)
        .ok_or_else(|| {
            let names: Vec<&str> = LEVELS.iter().map(|(name, _)| *name).collect();
            FhirflowError::Configuration(format!(
                "Unknown log level '{level_str}', expected one of {}",
                names.join(", ")
            ))
        })
}
