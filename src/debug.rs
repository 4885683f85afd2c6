//! Logging bridge for the keymap CLI
//!
//! Routes every `log::info!()` etc. from the keymap crates to stderr.
//! The level comes from, in order of precedence:
//! - the `--log-level` CLI flag
//! - the DEBUG_LEVEL environment variable:
//!   - 0: Off
//!   - 1: Errors only
//!   - 2: Info level (registry build, config loading)
//!   - 3: Debug level (fired bindings, removals)
//!   - 4: Trace level (every key event and the held-key set)
//! - otherwise warnings only, so duplicate-binding reports are visible.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Map a DEBUG_LEVEL value to a level filter.
pub fn level_from_debug_level(value: &str) -> Option<log::LevelFilter> {
    match value.trim().parse::<u8>() {
        Ok(0) => Some(log::LevelFilter::Off),
        Ok(1) => Some(log::LevelFilter::Error),
        Ok(2) => Some(log::LevelFilter::Info),
        Ok(3) => Some(log::LevelFilter::Debug),
        Ok(4) => Some(log::LevelFilter::Trace),
        _ => None,
    }
}

struct StderrLogger {
    out: Mutex<std::io::Stderr>,
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut out = self.out.lock();
        // Nowhere left to report a failed write to stderr
        let _ = writeln!(
            out,
            "[{}] [{:<5}] [{}] {}",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = self.out.lock().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Install the stderr logger. Later calls only adjust the level.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>) {
    let level = cli_level
        .or_else(|| {
            std::env::var("DEBUG_LEVEL")
                .ok()
                .and_then(|v| level_from_debug_level(&v))
        })
        .unwrap_or(log::LevelFilter::Warn);

    let logger = LOGGER.get_or_init(|| StderrLogger {
        out: Mutex::new(std::io::stderr()),
    });
    // Fails only if a logger is already installed; the level below still applies
    let _ = log::set_logger(logger);
    log::set_max_level(level);
}
