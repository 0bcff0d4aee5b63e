use chrono::Local;
use rituals_core::{one, stillness, untangle, Config, EventLog, Result, Ritual, SystemClock};

use crate::term::TerminalConsole;

/// Run one ritual in this process against the real terminal.
pub fn run(ritual: Ritual) -> Result<()> {
    let config = Config::load_or_default();
    let log = EventLog::new(config.log_path(ritual));
    let mut console = TerminalConsole::new();
    let mut clock = SystemClock::new();

    let ending = match ritual {
        Ritual::Stillness => stillness::run(
            &mut console,
            &mut clock,
            &config.stillness,
            &log,
            Local::now().date_naive(),
        )?,
        Ritual::One => one::run(&mut console, &mut clock, &config.one, &log)?,
        Ritual::Untangle => untangle::run(&mut console, &mut clock, &config.untangle, &log)?,
    };
    tracing::info!(%ritual, ?ending, "ritual finished");
    Ok(())
}
