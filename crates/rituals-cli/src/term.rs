//! Terminal implementation of [`Console`].
//!
//! Static cards are printed on the normal screen with crossterm. Live phases
//! switch to the alternate buffer in raw mode and repaint with ratatui.
//!
//! Keys are read under one of two disciplines:
//! - **Poll**: raw mode is already held by the live screen, so just check
//!   for a pending key and read it.
//! - **RawRead**: acquire raw mode, check, read one key, release. Release
//!   happens in a drop guard so prior terminal settings always come back.
//!
//! Any failure along the way reads as "no key".

use std::io::{self, BufRead, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{ContentStyle, Print, PrintStyledContent, Stylize};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TuiLine, Span as TuiSpan};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;

use rituals_core::render::CTRL_C;
use rituals_core::{Card, Console, Tone};

/// Horizontal padding inside a framed static card.
const CARD_PADDING: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Poll,
    RawRead,
}

/// Raw mode for as long as the guard lives.
struct RawModeGuard;

impl RawModeGuard {
    /// `None` when the terminal has no raw mode (not a tty, unsupported).
    fn acquire() -> Option<Self> {
        match enable_raw_mode() {
            Ok(()) => Some(Self),
            Err(e) => {
                tracing::trace!("raw mode unavailable: {e}");
                None
            }
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn key_char(key: KeyEvent) -> Option<char> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(CTRL_C),
        KeyCode::Char(c) => Some(c),
        KeyCode::Enter => Some('\n'),
        _ => None,
    }
}

/// Check for one pending key without blocking. Consumes at most one event.
fn poll_key() -> Option<char> {
    match event::poll(Duration::ZERO) {
        Ok(true) => {}
        _ => return None,
    }
    match event::read() {
        Ok(Event::Key(key)) => key_char(key),
        _ => None,
    }
}

pub fn read_key(mode: KeyMode) -> Option<char> {
    match mode {
        KeyMode::Poll => poll_key(),
        KeyMode::RawRead => {
            let _raw = RawModeGuard::acquire()?;
            poll_key()
        }
    }
}

fn tone_style(tone: Tone) -> ContentStyle {
    let base = ContentStyle::new().green();
    match tone {
        Tone::Accent | Tone::Mid => base,
        Tone::Strong => base.bold(),
        Tone::Dim => base.dim(),
        Tone::Italic => base.italic(),
    }
}

fn tui_style(tone: Tone) -> Style {
    let base = Style::default().fg(Color::Green);
    match tone {
        Tone::Accent | Tone::Mid => base,
        Tone::Strong => base.add_modifier(Modifier::BOLD),
        Tone::Dim => base.add_modifier(Modifier::DIM),
        Tone::Italic => base.add_modifier(Modifier::ITALIC),
    }
}

fn to_paragraph(card: &Card) -> Paragraph<'static> {
    let lines: Vec<TuiLine<'static>> = card
        .lines
        .iter()
        .map(|line| {
            TuiLine::from(
                line.spans
                    .iter()
                    .map(|s| TuiSpan::styled(s.text.clone(), tui_style(s.tone)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let mut paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    if card.bordered {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title_alignment(Alignment::Center);
        if let Some(title) = &card.title {
            block = block.title(title.clone());
        }
        paragraph = paragraph.block(block);
    }
    paragraph
}

/// Vertically centred area tall enough for the card.
fn card_area(card: &Card, area: Rect) -> Rect {
    let border = if card.bordered { 2 } else { 0 };
    let height = (card.lines.len() as u16 + border).min(area.height);
    Rect::new(
        area.x,
        area.y + (area.height - height) / 2,
        area.width,
        height,
    )
}

/// Lay a card out as plain rows for the normal screen: each row is a list of
/// (text, tone) runs, already centred within `width` columns.
pub fn layout_static(card: &Card, width: usize) -> Vec<Vec<(String, Option<Tone>)>> {
    let content_width = card
        .lines
        .iter()
        .map(|l| l.text().chars().count())
        .max()
        .unwrap_or(0);
    let title = card.title.as_deref().unwrap_or("");

    let centre = |text_len: usize, inner: usize| {
        let left = inner.saturating_sub(text_len) / 2;
        let right = inner.saturating_sub(text_len + left);
        (left, right)
    };

    let mut rows = Vec::new();
    if card.bordered {
        let inner = (content_width + 2 * CARD_PADDING)
            .max(title.chars().count() + 4)
            .min(width.saturating_sub(2));
        let margin = " ".repeat(width.saturating_sub(inner + 2) / 2);

        let label = if title.is_empty() {
            String::new()
        } else {
            format!(" {title} ")
        };
        let (l, r) = centre(label.chars().count(), inner);
        rows.push(vec![(
            format!("{margin}╭{}{label}{}╮", "─".repeat(l), "─".repeat(r)),
            None,
        )]);
        for line in &card.lines {
            let (l, r) = centre(line.text().chars().count(), inner);
            let mut row = vec![(format!("{margin}│{}", " ".repeat(l)), None)];
            row.extend(line.spans.iter().map(|s| (s.text.clone(), Some(s.tone))));
            row.push((format!("{}│", " ".repeat(r)), None));
            rows.push(row);
        }
        rows.push(vec![(format!("{margin}╰{}╯", "─".repeat(inner)), None)]);
    } else {
        for line in &card.lines {
            let (l, _) = centre(line.text().chars().count(), width);
            let mut row = vec![(" ".repeat(l), None)];
            row.extend(line.spans.iter().map(|s| (s.text.clone(), Some(s.tone))));
            rows.push(row);
        }
    }
    rows
}

/// The real terminal.
pub struct TerminalConsole {
    out: Stdout,
    live: Option<Terminal<CrosstermBackend<Stdout>>>,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            live: None,
        }
    }

    fn key_mode(&self) -> KeyMode {
        if self.live.is_some() {
            KeyMode::Poll
        } else {
            KeyMode::RawRead
        }
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.live.take().is_some() {
            disable_raw_mode()?;
            execute!(self.out, LeaveAlternateScreen, Show)?;
        }
        Ok(())
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn show(&mut self, card: &Card) -> io::Result<()> {
        let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        queue!(self.out, Print("\r\n"))?;
        for row in layout_static(card, width) {
            for (text, tone) in row {
                match tone {
                    Some(tone) => queue!(self.out, PrintStyledContent(tone_style(tone).apply(text)))?,
                    None => queue!(
                        self.out,
                        PrintStyledContent(ContentStyle::new().green().apply(text))
                    )?,
                }
            }
            queue!(self.out, Print("\r\n"))?;
        }
        self.out.flush()
    }

    fn enter_live(&mut self) -> io::Result<()> {
        if self.live.is_some() {
            return Ok(());
        }
        enable_raw_mode()?;
        execute!(self.out, EnterAlternateScreen, Hide)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.clear()?;
        self.live = Some(terminal);
        Ok(())
    }

    fn paint(&mut self, card: &Card) -> io::Result<()> {
        let Some(terminal) = self.live.as_mut() else {
            return self.show(card);
        };
        terminal.draw(|f| {
            let area = card_area(card, f.size());
            f.render_widget(to_paragraph(card), area);
        })?;
        Ok(())
    }

    fn leave_live(&mut self) -> io::Result<()> {
        self.restore()
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        execute!(self.out, Print(prompt))?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn read_key(&mut self) -> Option<char> {
        read_key(self.key_mode())
    }

    fn bell(&mut self) {
        let _ = self.out.write_all(b"\x07").and_then(|()| self.out.flush());
    }

    fn clear(&mut self) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }
}

impl Drop for TerminalConsole {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(rows: &[Vec<(String, Option<Tone>)>]) -> Vec<String> {
        rows.iter()
            .map(|row| row.iter().map(|(t, _)| t.as_str()).collect())
            .collect()
    }

    #[test]
    fn bare_cards_are_centred() {
        let card = Card::bare().line("arrive", Tone::Strong);
        let rows = plain(&layout_static(&card, 20));
        assert_eq!(rows, vec!["       arrive"]);
    }

    #[test]
    fn framed_cards_have_matching_edges() {
        let card = Card::framed("ONE").line("commit", Tone::Strong).blank();
        let rows = plain(&layout_static(&card, 40));
        assert_eq!(rows.len(), 4);
        let widths: Vec<_> = rows.iter().map(|r| r.chars().count()).collect();
        assert!(widths.iter().all(|&w| w == widths[0]));
        assert!(rows[0].contains(" ONE "));
        assert!(rows[0].trim_start().starts_with('╭'));
        assert!(rows[3].trim_start().starts_with('╰'));
    }

    #[test]
    fn narrow_terminal_does_not_underflow() {
        let card = Card::framed("STILLNESS / CHOOSE").line("a long line of text", Tone::Dim);
        let rows = layout_static(&card, 4);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn card_area_is_vertically_centred() {
        let card = Card::bare().line("a", Tone::Dim).line("b", Tone::Dim);
        let area = card_area(&card, Rect::new(0, 0, 80, 24));
        assert_eq!(area, Rect::new(0, 11, 80, 2));
        let framed = Card::framed("x").line("a", Tone::Dim);
        assert_eq!(card_area(&framed, Rect::new(0, 0, 80, 2)).height, 2);
    }

    #[test]
    fn ctrl_c_maps_to_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_char(key), Some(CTRL_C));
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(key_char(key), Some('q'));
        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(key_char(key), None);
    }
}
