//! UNTANGLE: name the next honest step in one sentence.

use std::io;
use std::path::Path;
use std::time::Duration;

use crate::clock::Clock;
use crate::config::UntangleConfig;
use crate::events::LogEvent;
use crate::logger::{read_last, EventLog};
use crate::session::Ending;
use crate::view::{Card, Console, Tone};

/// Collapse whitespace and make sure the text ends like a sentence.
pub fn normalize_sentence(s: &str) -> String {
    let mut out = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some(last) = out.chars().last() {
        if !matches!(last, '.' | '!' | '?') {
            out.push('.');
        }
    }
    out
}

/// Turn raw input into the sentence to keep: first line only, normalized.
/// `None` when there is nothing to keep.
pub fn compose_entry(raw: &str) -> Option<String> {
    let first = raw.lines().find(|l| !l.trim().is_empty())?;
    let sentence = normalize_sentence(first);
    (!sentence.is_empty()).then_some(sentence)
}

/// `/q`, `q`, `quit` or `exit`.
pub fn is_exit(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "/q" | "q" | "quit" | "exit"
    )
}

/// The sentence from the last entry in `path`, if the last line is one.
pub fn last_sentence(path: &Path) -> Option<String> {
    read_last(path)?
        .get("sentence")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn prompt_screen(recalled: Option<&str>) -> Card {
    let mut card = Card::framed("UNTANGLE")
        .blank()
        .line("UNTANGLE", Tone::Strong)
        .blank()
        .line("name the next honest step", Tone::Dim)
        .line("one sentence only", Tone::Dim);
    if let Some(last) = recalled {
        card = card
            .blank()
            .line("last time:", Tone::Dim)
            .line(last, Tone::Dim);
    }
    card.blank()
        .line("press ENTER to submit.", Tone::Dim)
        .line("type /q to exit.", Tone::Dim)
}

pub fn saved_screen() -> Card {
    Card::framed("UNTANGLE")
        .blank()
        .line("saved", Tone::Strong)
        .blank()
        .line("release it", Tone::Dim)
}

/// Run a whole UNTANGLE invocation.
pub fn run<C, K>(
    console: &mut C,
    clock: &mut K,
    cfg: &UntangleConfig,
    log: &EventLog,
) -> io::Result<Ending>
where
    C: Console + ?Sized,
    K: Clock + ?Sized,
{
    let recalled = if cfg.recall_last {
        last_sentence(log.path())
    } else {
        None
    };
    console.show(&prompt_screen(recalled.as_deref()))?;

    let raw = console.read_line("> ")?.unwrap_or_default();
    if is_exit(&raw) {
        console.clear()?;
        return Ok(Ending::Aborted);
    }
    let Some(sentence) = compose_entry(&raw) else {
        console.clear()?;
        return Ok(Ending::Aborted);
    };

    log.record(&LogEvent::Entry { sentence });

    console.show(&saved_screen())?;
    clock.sleep(Duration::from_millis(cfg.linger_ms));
    console.clear()?;
    Ok(Ending::Completed)
}
