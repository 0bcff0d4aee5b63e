//! Diagnostics go to a file in the data directory; the terminal belongs to
//! the rituals. Filter with `RITUALS_LOG` (default `warn`).

use std::fs::OpenOptions;
use std::sync::Mutex;

use rituals_core::config::data_dir;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "RITUALS_LOG";
pub const LOG_FILE: &str = "rituals.log";

pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let Ok(dir) = data_dir() else {
        return;
    };
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
    else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
