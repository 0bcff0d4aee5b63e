//! Line-prompt helpers.
//!
//! Bad input is never an error: every prompt has a documented default and
//! numeric answers are clamped or snapped into range.

use std::io;

use crate::view::{Card, Console};

/// Durations offered for a breathing session, in minutes.
pub const ALLOWED_MINUTES: [u32; 5] = [1, 2, 5, 10, 20];

/// Hard guardrails applied before snapping.
pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 180;

/// Minutes used when the answer is not a number at all.
pub const UNPARSEABLE_MINUTES: u32 = 20;

/// `q`, `quit` or `exit`, case-insensitive.
pub fn is_abort(input: &str) -> bool {
    matches!(
        input.trim().to_lowercase().as_str(),
        "q" | "quit" | "exit"
    )
}

/// Closest allowed duration, ties broken toward the smaller option.
pub fn snap_minutes(requested: u32) -> u32 {
    let clamped = requested.clamp(MIN_MINUTES, MAX_MINUTES);
    let mut best = ALLOWED_MINUTES[0];
    for &option in &ALLOWED_MINUTES[1..] {
        // Strict comparison keeps the earlier (smaller) option on a tie.
        if option.abs_diff(clamped) < best.abs_diff(clamped) {
            best = option;
        }
    }
    best
}

/// Interpret a minutes answer: blank uses `default`, garbage uses
/// [`UNPARSEABLE_MINUTES`], then snap.
pub fn parse_minutes(input: &str, default: u32) -> u32 {
    let input = input.trim();
    let requested = if input.is_empty() {
        default
    } else {
        match input.parse::<i64>() {
            Ok(n) => n.clamp(MIN_MINUTES as i64, MAX_MINUTES as i64) as u32,
            Err(_) => UNPARSEABLE_MINUTES,
        }
    };
    snap_minutes(requested)
}

/// 1-based menu choice. Blank, garbage or out of range picks 1.
pub fn parse_choice(input: &str, count: usize) -> usize {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => n,
        _ => 1,
    }
}

pub fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Show `card` and read one line. End of input reads as an empty answer.
pub fn ask<C: Console + ?Sized>(console: &mut C, card: &Card) -> io::Result<String> {
    console.show(card)?;
    Ok(console.read_line("> ")?.unwrap_or_default())
}
