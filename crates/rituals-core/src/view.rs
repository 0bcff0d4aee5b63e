//! Presentation-agnostic screens and the console seam.
//!
//! Flows describe what to show as a [`Card`]; a [`Console`] decides how to
//! draw it. The terminal front end lives in the CLI crate.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crate::clock::{Clock, ManualClock};

/// Visual weight of a span. Mapped to colours by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Accent,
    Strong,
    Mid,
    Dim,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// One centred line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A full screen of centred text, optionally framed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Card {
    pub title: Option<String>,
    pub bordered: bool,
    pub lines: Vec<Line>,
}

impl Card {
    /// A framed card with a centred title.
    pub fn framed(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            bordered: true,
            lines: Vec::new(),
        }
    }

    /// Borderless card.
    pub fn bare() -> Self {
        Self::default()
    }

    pub fn line(mut self, text: impl Into<String>, tone: Tone) -> Self {
        self.lines.push(Line {
            spans: vec![Span::new(text, tone)],
        });
        self
    }

    pub fn spans(mut self, spans: Vec<Span>) -> Self {
        self.lines.push(Line { spans });
        self
    }

    pub fn blank(mut self) -> Self {
        self.lines.push(Line::default());
        self
    }

    /// Plain text, one line per row.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Everything a ritual needs from the terminal.
pub trait Console {
    /// Clear the normal screen and print a static card.
    fn show(&mut self, card: &Card) -> io::Result<()>;

    /// Switch to the full-screen alternate buffer.
    fn enter_live(&mut self) -> io::Result<()>;

    /// Repaint the alternate buffer.
    fn paint(&mut self, card: &Card) -> io::Result<()>;

    /// Restore the normal screen.
    fn leave_live(&mut self) -> io::Result<()>;

    /// Blocking line read. `Ok(None)` on end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Non-blocking single key read. Never fails: any problem is "no key".
    fn read_key(&mut self) -> Option<char>;

    /// Best-effort terminal bell.
    fn bell(&mut self);

    fn clear(&mut self) -> io::Result<()>;
}

/// In-memory console for tests and dry runs.
///
/// Lines are answered from a queue. Keys are scripted against a
/// [`ManualClock`] so a test can say "press q ten seconds in".
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    clock: Option<ManualClock>,
    lines: VecDeque<String>,
    keys: VecDeque<(Duration, char)>,
    pub shown: Vec<Card>,
    pub painted: Vec<Card>,
    pub bells: usize,
    pub live_sessions: usize,
    pub live: bool,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(mut self, clock: ManualClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Queue a line of input.
    pub fn input(mut self, line: impl Into<String>) -> Self {
        self.lines.push_back(line.into());
        self
    }

    /// Press `key` once the clock reaches `at`.
    pub fn key_at(mut self, at: Duration, key: char) -> Self {
        self.keys.push_back((at, key));
        self
    }

    fn now(&self) -> Duration {
        self.clock.as_ref().map(Clock::now).unwrap_or_default()
    }

    /// Every card drawn so far, static and live, in order.
    pub fn all_text(&self) -> String {
        self.shown
            .iter()
            .chain(self.painted.iter())
            .map(Card::text)
            .collect::<Vec<_>>()
            .join("\n---\n")
    }
}

impl Console for ScriptedConsole {
    fn show(&mut self, card: &Card) -> io::Result<()> {
        self.shown.push(card.clone());
        Ok(())
    }

    fn enter_live(&mut self) -> io::Result<()> {
        self.live = true;
        self.live_sessions += 1;
        Ok(())
    }

    fn paint(&mut self, card: &Card) -> io::Result<()> {
        self.painted.push(card.clone());
        Ok(())
    }

    fn leave_live(&mut self) -> io::Result<()> {
        self.live = false;
        Ok(())
    }

    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    fn read_key(&mut self) -> Option<char> {
        let now = self.now();
        match self.keys.front() {
            Some(&(at, key)) if at <= now => {
                self.keys.pop_front();
                Some(key)
            }
            _ => None,
        }
    }

    fn bell(&mut self) {
        self.bells += 1;
    }

    fn clear(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_text_joins_lines() {
        let card = Card::framed("ONE")
            .line("commit", Tone::Strong)
            .blank()
            .spans(vec![Span::new("a", Tone::Dim), Span::new("b", Tone::Accent)]);
        assert_eq!(card.text(), "commit\n\nab");
        assert_eq!(card.title.as_deref(), Some("ONE"));
    }

    #[test]
    fn scripted_keys_wait_for_the_clock() {
        let clock = ManualClock::new();
        let mut console = ScriptedConsole::new()
            .with_clock(clock.clone())
            .key_at(Duration::from_secs(2), 'q');
        assert_eq!(console.read_key(), None);
        clock.advance(Duration::from_secs(2));
        assert_eq!(console.read_key(), Some('q'));
        assert_eq!(console.read_key(), None);
    }

    #[test]
    fn scripted_lines_run_out_as_eof() {
        let mut console = ScriptedConsole::new().input("yes");
        assert_eq!(console.read_line("> ").unwrap().as_deref(), Some("yes"));
        assert_eq!(console.read_line("> ").unwrap(), None);
    }
}
