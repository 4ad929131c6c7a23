//! Log output for the loader binary.
//!
//! Two line formats are supported: a colored human-readable one for terminals
//! and one JSON object per line for log collectors.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter};

const CRATE_TARGET: &str = "table_loader";

/// Installs the global logger.
///
/// `RUST_LOG` is read first. `level` then applies to this crate and to
/// anything `RUST_LOG` does not mention, while `sqlx` statement logging is
/// held at warn so per-batch inserts do not flood the output.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// ```bash
/// RUST_LOG=sqlx=debug table_loader people.csv --table people
/// table_loader people.csv --table people --log-level debug --log-format json
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder
        .filter_level(level)
        .filter_module("sqlx", LevelFilter::Warn)
        .filter_module(CRATE_TARGET, level);

    match format {
        LogFormat::Json => builder.format(|buf, record| {
            let line = json_line(
                chrono::Utc::now().timestamp_millis(),
                record.level(),
                record.target(),
                &record.args().to_string(),
            );
            writeln!(buf, "{}", line)
        }),
        LogFormat::Plain => builder.format(|buf, record| {
            let line = plain_line(record.level(), record.target(), &record.args().to_string());
            writeln!(buf, "{}", line)
        }),
    };

    builder.try_init()?;
    Ok(())
}

/// One log record as a JSON object with `ts` in epoch milliseconds.
fn json_line(ts_millis: i64, level: Level, target: &str, message: &str) -> String {
    serde_json::json!({
        "ts": ts_millis,
        "level": level.as_str(),
        "target": target,
        "msg": message,
    })
    .to_string()
}

/// `[LEVEL] module: message`, with the crate prefix dropped from the module path.
fn plain_line(level: Level, target: &str, message: &str) -> String {
    format!(
        "[{}] {}: {}",
        paint_level(level),
        short_target(target).cyan(),
        message
    )
}

fn paint_level(level: Level) -> ColoredString {
    let label = format!("{:<5}", level.as_str());
    match level {
        Level::Error => label.red().bold(),
        Level::Warn => label.yellow(),
        Level::Info => label.green(),
        Level::Debug => label.blue(),
        Level::Trace => label.dimmed(),
    }
}

fn short_target(target: &str) -> &str {
    match target.strip_prefix(CRATE_TARGET) {
        Some("") => CRATE_TARGET,
        Some(rest) => rest.strip_prefix("::").unwrap_or(target),
        None => target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_twice_fails_without_panicking() {
        // Only the first initialization in the process can succeed
        let _ = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let result = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }

    #[test]
    fn test_json_line_is_one_parseable_object() {
        let line = json_line(
            1_700_000_000_000,
            Level::Warn,
            "table_loader::loader",
            "bad \"value\"\non line 3",
        );
        assert!(!line.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["ts"], 1_700_000_000_000i64);
        assert_eq!(parsed["level"], "WARN");
        assert_eq!(parsed["target"], "table_loader::loader");
        assert_eq!(parsed["msg"], "bad \"value\"\non line 3");
    }

    #[test]
    fn test_plain_line_shortens_crate_targets() {
        assert_eq!(short_target("table_loader::storage::batch"), "storage::batch");
        assert_eq!(short_target("table_loader"), "table_loader");
        assert_eq!(short_target("table_loader_extra"), "table_loader_extra");
        assert_eq!(short_target("sqlx::query"), "sqlx::query");

        let line = plain_line(Level::Info, "table_loader::loader", "Opened loader");
        assert!(line.contains("loader"));
        assert!(line.ends_with(": Opened loader"));
    }
}
