//! ONE: a single task, one deep-work block, then a mandatory break.

use std::io;
use std::time::Duration;

use crate::clock::Clock;
use crate::config::OneConfig;
use crate::events::{LogEvent, Outcome};
use crate::logger::{EventLog, TerminalRecord};
use crate::prompt::{ask, is_abort};
use crate::render::{fmt_mmss, remaining_secs, run_phase, Phase, Surface};
use crate::session::Ending;
use crate::view::{Card, Console, Tone};

/// Used when the task prompt is left blank.
pub const DEFAULT_TASK: &str = "return to the task";

/// The focus block being worked on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneSession {
    pub task: String,
    pub minutes: u32,
    pub interrupted: bool,
    pub outcome: Outcome,
}

impl OneSession {
    pub fn new(task: impl Into<String>, minutes: u32) -> Self {
        Self {
            task: task.into(),
            minutes,
            interrupted: false,
            outcome: Outcome::Released,
        }
    }

    fn end_event(&self) -> LogEvent {
        LogEvent::OneEnd {
            task: self.task.clone(),
            minutes: self.minutes,
            interrupted: self.interrupted,
            outcome: self.outcome,
        }
    }

    fn released(&self) -> LogEvent {
        LogEvent::OneEnd {
            task: self.task.clone(),
            minutes: self.minutes,
            interrupted: true,
            outcome: Outcome::Released,
        }
    }
}

fn minutes(m: u32) -> Duration {
    Duration::from_secs(u64::from(m) * 60)
}

// ── Screens ──────────────────────────────────────────────────────────

pub fn task_screen(cfg: &OneConfig) -> Card {
    Card::framed("ONE")
        .blank()
        .line("what is the one thing?", Tone::Strong)
        .blank()
        .line(
            format!(
                "({} minutes. one line. no editing once started)",
                cfg.work_minutes
            ),
            Tone::Dim,
        )
}

pub fn arrival_screen(session: &OneSession) -> Card {
    Card::framed("ONE")
        .blank()
        .line("commit", Tone::Strong)
        .blank()
        .line(session.task.clone(), Tone::Strong)
        .blank()
        .line(format!("{} minutes", session.minutes), Tone::Dim)
        .blank()
        .line("(q to exit)", Tone::Dim)
}

pub fn work_screen(task: &str, remaining_secs: u64) -> Card {
    Card::bare()
        .blank()
        .line("ONE", Tone::Strong)
        .blank()
        .line(task, Tone::Strong)
        .blank()
        .blank()
        .line(fmt_mmss(remaining_secs), Tone::Dim)
        .blank()
        .line("remain", Tone::Dim)
        .blank()
        .line("q to release", Tone::Dim)
}

pub fn break_screen(remaining_secs: u64) -> Card {
    Card::bare()
        .blank()
        .line("break", Tone::Strong)
        .blank()
        .line(fmt_mmss(remaining_secs), Tone::Dim)
        .blank()
        .line("walk • water • breathe", Tone::Dim)
        .blank()
        .line("(q to end)", Tone::Dim)
}

pub fn end_question() -> Card {
    Card::framed("ONE")
        .blank()
        .line("complete", Tone::Strong)
        .blank()
        .line("did you finish?", Tone::Dim)
        .blank()
        .line("[y] yes    [n] no", Tone::Accent)
}

// ── Flow ─────────────────────────────────────────────────────────────

/// Map an answer to "did you finish?". `None` means ask again.
pub fn parse_outcome(answer: &str) -> Option<Outcome> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(Outcome::Complete),
        "n" | "no" | "" => Some(Outcome::Released),
        _ => None,
    }
}

/// Ask for the task. `None` when the user backs out.
pub fn choose_task<C: Console + ?Sized>(
    console: &mut C,
    cfg: &OneConfig,
) -> io::Result<Option<String>> {
    let raw = ask(console, &task_screen(cfg))?;
    if is_abort(&raw) {
        return Ok(None);
    }
    let task = raw.trim();
    Ok(Some(if task.is_empty() {
        DEFAULT_TASK.to_string()
    } else {
        task.to_string()
    }))
}

fn ask_outcome<C: Console + ?Sized>(console: &mut C) -> io::Result<Outcome> {
    console.show(&end_question())?;
    loop {
        // End of input counts as "no".
        let Some(answer) = console.read_line("> ")? else {
            return Ok(Outcome::Released);
        };
        if let Some(outcome) = parse_outcome(&answer) {
            return Ok(outcome);
        }
    }
}

/// Run a whole ONE invocation.
pub fn run<C, K>(
    console: &mut C,
    clock: &mut K,
    cfg: &OneConfig,
    log: &EventLog,
) -> io::Result<Ending>
where
    C: Console + ?Sized,
    K: Clock + ?Sized,
{
    let Some(task) = choose_task(console, cfg)? else {
        console.clear()?;
        return Ok(Ending::Aborted);
    };
    let mut session = OneSession::new(task, cfg.work_minutes);
    tracing::info!(minutes = session.minutes, "one configured");

    let terminal = TerminalRecord::arm(log, session.released());

    let arrival = Phase::new(cfg.arrival(), Duration::from_millis(50), Surface::Static);
    let arrival_card = arrival_screen(&session);
    if run_phase(console, clock, &arrival, |_| arrival_card.clone()).interrupted() {
        session.interrupted = true;
        terminal.commit(session.released());
        console.clear()?;
        return Ok(Ending::Interrupted);
    }

    console.bell();
    log.record(&LogEvent::OneStart {
        task: session.task.clone(),
        minutes: session.minutes,
    });

    let total = minutes(session.minutes);
    let work = Phase::new(total, cfg.frame(), Surface::Live);
    let task = session.task.clone();
    if run_phase(console, clock, &work, |elapsed| {
        work_screen(&task, remaining_secs(total, elapsed))
    })
    .interrupted()
    {
        session.interrupted = true;
        terminal.commit(session.released());
        console.clear()?;
        return Ok(Ending::Interrupted);
    }
    console.bell();

    session.outcome = ask_outcome(console)?;

    log.record(&LogEvent::BreakStart {
        minutes: cfg.break_minutes,
    });
    console.clear()?;
    let break_total = minutes(cfg.break_minutes);
    let rest = Phase::new(break_total, cfg.frame(), Surface::Live);
    let quit_break = run_phase(console, clock, &rest, |elapsed| {
        break_screen(remaining_secs(break_total, elapsed))
    })
    .interrupted();
    log.record(&LogEvent::BreakEnd {
        minutes: cfg.break_minutes,
        interrupted: quit_break,
    });

    terminal.commit(session.end_event());
    console.clear()?;
    Ok(Ending::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_answers() {
        assert_eq!(parse_outcome("y"), Some(Outcome::Complete));
        assert_eq!(parse_outcome(" YES "), Some(Outcome::Complete));
        assert_eq!(parse_outcome("n"), Some(Outcome::Released));
        assert_eq!(parse_outcome(""), Some(Outcome::Released));
        assert_eq!(parse_outcome("maybe"), None);
    }

    #[test]
    fn work_screen_counts_down() {
        let card = work_screen("write report", 25 * 60);
        let text = card.text();
        assert!(text.contains("write report"));
        assert!(text.contains("25:00"));
        assert!(text.contains("q to release"));
    }

    #[test]
    fn break_screen_counts_down() {
        assert!(break_screen(61).text().contains("01:01"));
    }

    #[test]
    fn new_session_defaults_to_released() {
        let s = OneSession::new("x", 25);
        assert_eq!(s.outcome, Outcome::Released);
        assert!(!s.interrupted);
    }
}
