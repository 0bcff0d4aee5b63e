//! STILLNESS: a guided breathing session.
//!
//! configure -> home -> arrival -> breathe -> complete -> integrate

use std::io;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::breath::{breath_bar, breath_template, BreathPreset, PRESETS};
use crate::clock::Clock;
use crate::config::StillnessConfig;
use crate::events::LogEvent;
use crate::logger::{EventLog, TerminalRecord};
use crate::prompt::{ask, is_abort, is_yes, parse_choice, parse_minutes};
use crate::render::{run_phase, wait_for_key, Phase, Surface};
use crate::session::Ending;
use crate::view::{Card, Console, Tone};

const SIGNATURE_LINES: [&str; 5] = [
    "nothing needs to change",
    "you are allowed to be here",
    "this breath is enough",
    "return to the body",
    "soften the effort",
];

const MIND_WORDS: [&str; 6] = ["scattered", "noticing", "settling", "open", "quiet", "vast"];

const COMPLETE_LINGER: Duration = Duration::from_millis(1200);

/// Sessions this long or longer offer deep sitting.
const DEEP_MIN_MINUTES: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Meteorological seasons.
    pub fn of(date: NaiveDate) -> Self {
        match date.month() {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    fn intentions(self) -> &'static [&'static str] {
        match self {
            Season::Winter => &[
                "rest beneath effort",
                "nothing to accomplish",
                "let stillness hold you",
                "soften and remain",
            ],
            Season::Spring => &[
                "let attention grow",
                "begin again gently",
                "notice what opens",
                "arrive where you are",
            ],
            Season::Summer => &[
                "remain open",
                "breathe and widen",
                "stay with what is",
                "this breath is enough",
            ],
            Season::Autumn => &[
                "release what is complete",
                "let the mind untie itself",
                "exhale and simplify",
                "return to the body",
            ],
        }
    }
}

/// The intention of the day, rotating daily within the season.
pub fn intention_for(date: NaiveDate) -> &'static str {
    let options = Season::of(date).intentions();
    options[date.ordinal() as usize % options.len()]
}

/// Slow drift through "weather" words, one every 90 seconds.
pub fn mind_word(elapsed: Duration) -> &'static str {
    let idx = (elapsed.as_secs() / 90) as usize;
    MIND_WORDS[idx % MIND_WORDS.len()]
}

/// FNV-1a. Fixed so a day's whisper does not move between builds.
fn stable_seed(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// A single signature line shown once, briefly, during a session.
///
/// Planned up front from a seed of date, preset and length so the live
/// screen stays a function of elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct Whisper {
    pub line: &'static str,
    /// Seconds into the session, if the session gets a whisper at all.
    pub at: Option<f64>,
    pub show_secs: f64,
}

impl Whisper {
    pub fn plan(date: NaiveDate, session: &StillnessSession, cfg: &StillnessConfig) -> Self {
        let seed = stable_seed(&format!("{}-{}-{}", date, session.preset.key, session.minutes));
        let mut rng = Pcg64::seed_from_u64(seed);

        let line = SIGNATURE_LINES
            .choose(&mut rng)
            .copied()
            .unwrap_or(SIGNATURE_LINES[0]);

        let total = session.total().as_secs_f64();
        let min = cfg.whisper_min_secs as f64;
        let at = if !session.deep && total > min + 30.0 {
            Some(rng.gen_range(min..(total - 25.0)))
        } else {
            None
        };

        Self {
            line,
            at,
            show_secs: cfg.whisper_show_secs as f64,
        }
    }

    pub fn visible_at(&self, elapsed: f64) -> Option<&'static str> {
        let at = self.at?;
        (elapsed >= at && elapsed <= at + self.show_secs).then_some(self.line)
    }
}

/// One configured breathing session.
#[derive(Debug, Clone, PartialEq)]
pub struct StillnessSession {
    pub preset: &'static BreathPreset,
    pub minutes: u32,
    pub intention: String,
    /// Terminal-as-void: only a narrow bar, no words.
    pub deep: bool,
}

impl StillnessSession {
    pub fn total(&self) -> Duration {
        Duration::from_secs(u64::from(self.minutes) * 60)
    }

    fn start_event(&self) -> LogEvent {
        LogEvent::SessionStart {
            preset: self.preset.key.to_string(),
            label: self.preset.label.to_string(),
            minutes: self.minutes,
            deep: self.deep,
        }
    }

    fn end_event(&self, interrupted: bool) -> LogEvent {
        LogEvent::SessionEnd {
            preset: self.preset.key.to_string(),
            label: self.preset.label.to_string(),
            minutes: self.minutes,
            deep: self.deep,
            interrupted,
        }
    }
}

// ── Screens ──────────────────────────────────────────────────────────

pub fn choose_screen() -> Card {
    let mut card = Card::framed("STILLNESS / CHOOSE")
        .blank()
        .line("choose a breath practice", Tone::Strong)
        .blank();
    for (i, p) in PRESETS.iter().enumerate() {
        card = card.line(format!("{}. {}", i + 1, p.label), Tone::Accent);
    }
    card.blank()
        .line("choose duration (minutes)", Tone::Strong)
        .line("options: 1, 2, 5, 10, 20", Tone::Dim)
        .blank()
        .line("enter practice number (default 1)", Tone::Accent)
}

pub fn home_screen(session: &StillnessSession, clock_hhmm: &str, cfg: &StillnessConfig) -> Card {
    Card::framed("STILLNESS")
        .line("STILLNESS", Tone::Strong)
        .blank()
        .line(session.intention.clone(), Tone::Italic)
        .blank()
        .line(format!("time  {clock_hhmm}"), Tone::Dim)
        .line(format!("session  {}", session.preset.label), Tone::Dim)
        .line(format!("duration  {} min", session.minutes), Tone::Dim)
        .blank()
        .line(format!("breath  {}", session.preset.texture), Tone::Dim)
        .spans(breath_template(session.preset, cfg.bar_width))
        .blank()
        .line("mind  settling", Tone::Dim)
        .blank()
        .line("press ENTER to begin", Tone::Accent)
        .line("q then ENTER to quit", Tone::Dim)
}

pub fn arrival_screen() -> Card {
    Card::bare()
        .blank()
        .line("arrive", Tone::Strong)
        .blank()
        .line("place attention in the body", Tone::Dim)
}

/// The breathing view at `elapsed` into the session.
pub fn live_screen(
    elapsed: Duration,
    session: &StillnessSession,
    whisper: &Whisper,
    cfg: &StillnessConfig,
) -> Card {
    let t = elapsed.as_secs_f64();
    let width = if session.deep {
        cfg.deep_bar_width
    } else {
        cfg.bar_width
    };
    let bar = breath_bar(t, session.preset, width);

    if session.deep {
        return Card::bare().blank().spans(bar).blank();
    }

    let cue = whisper.visible_at(t).unwrap_or(session.preset.cue);
    let mut card = Card {
        bordered: !cfg.zen_mode,
        ..Card::bare()
    }
    .blank()
    .spans(bar)
    .blank()
    .line(cue, Tone::Dim)
    .blank();
    if elapsed < Duration::from_secs(cfg.mind_show_secs) {
        card = card
            .line(format!("mind: {}", mind_word(elapsed)), Tone::Dim)
            .blank();
    }
    card.line("q to end", Tone::Dim)
}

pub fn complete_screen() -> Card {
    Card::bare()
        .blank()
        .line("complete", Tone::Strong)
        .blank()
        .line("remain seated a moment", Tone::Dim)
        .blank()
        .line("press any key to return", Tone::Dim)
}

pub fn integrate_screen() -> Card {
    Card::bare()
        .blank()
        .line("what are you carrying forward?", Tone::Strong)
        .blank()
        .line("(hold the answer gently)", Tone::Dim)
}

// ── Flow ─────────────────────────────────────────────────────────────

/// Gather preset, duration and depth. Every answer has a default.
pub fn configure<C: Console + ?Sized>(
    console: &mut C,
    cfg: &StillnessConfig,
    intention: &str,
) -> io::Result<StillnessSession> {
    let choice = ask(console, &choose_screen())?;
    let preset = &PRESETS[parse_choice(&choice, PRESETS.len()) - 1];

    let minutes_raw = console
        .read_line(&format!("duration in minutes (default {}): ", cfg.default_minutes))?
        .unwrap_or_default();
    let minutes = parse_minutes(&minutes_raw, cfg.default_minutes);

    let deep = if minutes >= DEEP_MIN_MINUTES {
        let answer = console
            .read_line("deep sitting (terminal-as-void)? [y/N]: ")?
            .unwrap_or_default();
        is_yes(&answer)
    } else {
        false
    };

    Ok(StillnessSession {
        preset,
        minutes,
        intention: intention.to_string(),
        deep,
    })
}

/// Run a whole STILLNESS invocation.
pub fn run<C, K>(
    console: &mut C,
    clock: &mut K,
    cfg: &StillnessConfig,
    log: &EventLog,
    today: NaiveDate,
) -> io::Result<Ending>
where
    C: Console + ?Sized,
    K: Clock + ?Sized,
{
    let session = configure(console, cfg, intention_for(today))?;
    tracing::info!(
        preset = session.preset.key,
        minutes = session.minutes,
        deep = session.deep,
        "stillness configured"
    );

    let hhmm = Local::now().format("%H:%M").to_string();
    console.show(&home_screen(&session, &hhmm, cfg))?;
    match console.read_line("")? {
        Some(answer) if !is_abort(&answer) => {}
        _ => {
            console.clear()?;
            return Ok(Ending::Aborted);
        }
    }

    let terminal = TerminalRecord::arm(log, session.end_event(true));

    let arrival = Phase::new(cfg.arrival(), Duration::from_millis(50), Surface::Static);
    if run_phase(console, clock, &arrival, |_| arrival_screen()).interrupted() {
        terminal.commit(session.end_event(true));
        console.clear()?;
        return Ok(Ending::Interrupted);
    }

    console.bell();
    log.record(&session.start_event());

    let whisper = Whisper::plan(today, &session, cfg);
    let active = Phase::new(session.total(), cfg.frame(), Surface::Live);
    let interrupted = run_phase(console, clock, &active, |elapsed| {
        live_screen(elapsed, &session, &whisper, cfg)
    })
    .interrupted();

    console.bell();
    let linger = Phase::new(COMPLETE_LINGER, cfg.frame(), Surface::Live).mandatory();
    run_phase(console, clock, &linger, |_| complete_screen());

    let integrate = Phase::new(cfg.integrate(), cfg.frame(), Surface::Static).mandatory();
    run_phase(console, clock, &integrate, |_| integrate_screen());

    terminal.commit(session.end_event(interrupted));

    // Logged. Everything below is display only and cannot fail the session.
    if let Err(e) = console.show(&complete_screen()) {
        tracing::debug!("closing card not shown: {e}");
    }
    wait_for_key(console, clock, cfg.return_wait(), cfg.frame());
    let hhmm = Local::now().format("%H:%M").to_string();
    if let Err(e) = console.show(&home_screen(&session, &hhmm, cfg)) {
        tracing::debug!("home card not shown: {e}");
    }

    Ok(if interrupted {
        Ending::Interrupted
    } else {
        Ending::Completed
    })
}
