// src/system/logging.rs

use crate::constants::LOG_ENV_VAR;
use colored::{ColoredString, Colorize};
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

/// Initializes the global logger.
///
/// Records go to stderr behind a colored level badge. The level is `info`, or
/// `debug` when `debug` is set; `LOADENV_LOG` overrides both.
pub fn init(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let env = Env::default().filter_or(LOG_ENV_VAR, default_level);

    let result = Builder::from_env(env)
        .format(|buf, record| writeln!(buf, "{} {}", badge(record.level()), record.args()))
        .try_init();

    if result.is_err() {
        log::debug!("Logger was already initialized.");
    }
}

/// The colored prefix printed before every record.
pub fn badge(level: Level) -> ColoredString {
    match level {
        Level::Error => " ERROR ".black().on_red(),
        Level::Warn => " WARN ".black().on_yellow(),
        Level::Info => " INFO ".black().on_blue(),
        Level::Debug => " DEBUG ".black().on_cyan(),
        Level::Trace => " TRACE ".black().on_white(),
    }
}
