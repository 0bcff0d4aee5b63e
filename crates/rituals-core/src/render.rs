//! The render loop shared by every timed phase.
//!
//! A phase runs until its duration has elapsed or the quit key is seen.
//! Each tick the card is derived from elapsed time alone, so dropped frames
//! or scheduler jitter change how often the screen updates but never what
//! it shows.
//!
//! ```text
//! Arrival (static) -> Active (live) -> Completion -> [Follow-up (live)]
//! ```

use std::time::Duration;

use crate::clock::Clock;
use crate::view::{Card, Console};

/// Ctrl-C as delivered by a terminal in raw mode.
pub const CTRL_C: char = '\u{3}';

/// Where a phase draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Normal screen, cleared and reprinted when the card changes.
    Static,
    /// Alternate buffer for the duration of the phase.
    Live,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    Elapsed,
    Interrupted,
}

impl PhaseOutcome {
    pub fn interrupted(self) -> bool {
        self == PhaseOutcome::Interrupted
    }
}

/// A time-bounded segment of a ritual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub duration: Duration,
    pub tick: Duration,
    pub surface: Surface,
    /// Whether the quit key ends the phase early.
    pub cancellable: bool,
}

impl Phase {
    pub fn new(duration: Duration, tick: Duration, surface: Surface) -> Self {
        Self {
            duration,
            tick: tick.max(Duration::from_millis(1)),
            surface,
            cancellable: true,
        }
    }

    /// A phase the user has to sit through.
    pub fn mandatory(mut self) -> Self {
        self.cancellable = false;
        self
    }
}

pub fn is_quit_key(key: char) -> bool {
    key.eq_ignore_ascii_case(&'q') || key == CTRL_C
}

/// Holds the alternate buffer for a live phase and gives it back on every
/// exit path, including unwinding.
struct LiveScope<'a, C: Console + ?Sized> {
    console: &'a mut C,
    live: bool,
}

impl<'a, C: Console + ?Sized> LiveScope<'a, C> {
    fn enter(console: &'a mut C, surface: Surface) -> Self {
        let live = surface == Surface::Live;
        if live {
            if let Err(e) = console.enter_live() {
                tracing::debug!("could not enter live screen: {e}");
            }
        }
        Self { console, live }
    }

    fn draw(&mut self, card: &Card) {
        let result = if self.live {
            self.console.paint(card)
        } else {
            self.console.show(card)
        };
        if let Err(e) = result {
            tracing::debug!("repaint failed: {e}");
        }
    }
}

impl<C: Console + ?Sized> Drop for LiveScope<'_, C> {
    fn drop(&mut self) {
        if self.live {
            if let Err(e) = self.console.leave_live() {
                tracing::debug!("could not leave live screen: {e}");
            }
        }
    }
}

/// Run one phase to completion or cancellation.
///
/// `payload` maps elapsed time to the card to show. Repaints are skipped
/// when the card has not changed. Cancellation is checked once per tick.
pub fn run_phase<C, K, F>(console: &mut C, clock: &mut K, phase: &Phase, payload: F) -> PhaseOutcome
where
    C: Console + ?Sized,
    K: Clock + ?Sized,
    F: Fn(Duration) -> Card,
{
    let mut scope = LiveScope::enter(console, phase.surface);
    let start = clock.now();
    let mut last: Option<Card> = None;

    loop {
        let elapsed = clock.now().saturating_sub(start);
        if elapsed >= phase.duration {
            return PhaseOutcome::Elapsed;
        }

        let card = payload(elapsed);
        if last.as_ref() != Some(&card) {
            scope.draw(&card);
            last = Some(card);
        }

        if phase.cancellable && scope.console.read_key().is_some_and(is_quit_key) {
            tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "phase interrupted");
            return PhaseOutcome::Interrupted;
        }

        clock.sleep(phase.tick);
    }
}

/// Wait for any key, up to `timeout`. Returns the key if one arrived.
pub fn wait_for_key<C, K>(console: &mut C, clock: &mut K, timeout: Duration, tick: Duration) -> Option<char>
where
    C: Console + ?Sized,
    K: Clock + ?Sized,
{
    let tick = tick.max(Duration::from_millis(1));
    let start = clock.now();
    while clock.now().saturating_sub(start) < timeout {
        if let Some(key) = console.read_key() {
            return Some(key);
        }
        clock.sleep(tick);
    }
    None
}

/// Whole seconds left in a phase.
pub fn remaining_secs(total: Duration, elapsed: Duration) -> u64 {
    total.saturating_sub(elapsed).as_secs()
}

/// `MM:SS` countdown.
pub fn fmt_mmss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
