//! Breath presets and the breathing waveform.
//!
//! A cycle is inhale -> hold (top) -> exhale -> hold (bottom). Fullness is
//! 0.0 when empty and 1.0 when full, eased with a raised cosine so the curve
//! is smooth through every phase boundary.

use std::f64::consts::PI;

use crate::view::{Span, Tone};

/// A named, immutable breathing pattern. Durations are in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreathPreset {
    pub key: &'static str,
    pub label: &'static str,
    pub inhale: f64,
    pub hold_top: f64,
    pub exhale: f64,
    pub hold_bottom: f64,
    pub texture: &'static str,
    pub cue: &'static str,
}

/// Built-in presets in menu order. The first is the default.
pub const PRESETS: [BreathPreset; 4] = [
    BreathPreset {
        key: "zazen",
        label: "Settle the nervous system",
        inhale: 4.5,
        hold_top: 1.5,
        exhale: 7.0,
        hold_bottom: 0.0,
        texture: "░▒▓█▓▒░",
        cue: "breathe",
    },
    BreathPreset {
        key: "equal",
        label: "Balance and steady",
        inhale: 5.0,
        hold_top: 0.0,
        exhale: 5.0,
        hold_bottom: 0.0,
        texture: "░▒▓▓▒░",
        cue: "steady",
    },
    BreathPreset {
        key: "box",
        label: "Regain control",
        inhale: 4.0,
        hold_top: 4.0,
        exhale: 4.0,
        hold_bottom: 4.0,
        texture: "█ ▓ ▒ ░",
        cue: "box",
    },
    BreathPreset {
        key: "sigh",
        label: "Release tension",
        inhale: 3.5,
        hold_top: 0.0,
        exhale: 7.5,
        hold_bottom: 0.0,
        texture: "░░▒▒▓▓▓",
        cue: "release",
    },
];

/// Look up a preset by key.
pub fn preset(key: &str) -> Option<&'static BreathPreset> {
    PRESETS.iter().find(|p| p.key == key)
}

impl BreathPreset {
    /// Length of one full cycle in seconds.
    pub fn period(&self) -> f64 {
        self.inhale + self.hold_top + self.exhale + self.hold_bottom
    }
}

/// Breath fullness in `[0, 1]` at `t` seconds into the session.
pub fn fullness(t: f64, preset: &BreathPreset) -> f64 {
    let period = preset.period();
    if period <= 0.0 || !period.is_finite() || !t.is_finite() {
        return 0.0;
    }
    let mut x = t.rem_euclid(period);

    if x < preset.inhale {
        let p = x / preset.inhale;
        return (0.5 - 0.5 * (PI * p).cos()).clamp(0.0, 1.0);
    }

    x -= preset.inhale;
    if x < preset.hold_top {
        return 1.0;
    }

    x -= preset.hold_top;
    if x < preset.exhale {
        let p = x / preset.exhale;
        return (0.5 + 0.5 * (PI * p).cos()).clamp(0.0, 1.0);
    }

    0.0
}

const INHALE: (&str, Tone) = ("█", Tone::Strong);
const HOLD: (&str, Tone) = ("░", Tone::Dim);
const EXHALE: (&str, Tone) = ("▒", Tone::Mid);

fn segments(preset: &BreathPreset) -> [((&'static str, Tone), f64); 4] {
    [
        (INHALE, preset.inhale),
        (HOLD, preset.hold_top),
        (EXHALE, preset.exhale),
        (HOLD, preset.hold_bottom),
    ]
}

/// Space-separated glyphs padded to `width * 2` columns so a centred bar
/// does not shift as it grows.
fn glyph_row(counts: &[((&'static str, Tone), usize)], width: usize) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut columns = 0;
    for &((glyph, tone), count) in counts {
        for _ in 0..count {
            if columns > 0 {
                spans.push(Span::new(" ", Tone::Dim));
                columns += 1;
            }
            spans.push(Span::new(glyph, tone));
            columns += 1;
        }
    }
    let target = width * 2;
    if columns < target {
        spans.push(Span::new(" ".repeat(target - columns), Tone::Dim));
    }
    spans
}

/// One glyph per whole second elapsed in the current cycle.
pub fn breath_bar(t: f64, preset: &BreathPreset, width: usize) -> Vec<Span> {
    let period = preset.period();
    let mut rest = if period > 0.0 && t.is_finite() {
        t.rem_euclid(period)
    } else {
        0.0
    };

    let mut counts = Vec::with_capacity(4);
    for (glyph, len) in segments(preset) {
        if rest < len {
            counts.push((glyph, rest as usize));
            break;
        }
        counts.push((glyph, len as usize));
        rest -= len;
    }
    glyph_row(&counts, width)
}

/// Whole-cycle preview for the home screen.
pub fn breath_template(preset: &BreathPreset, width: usize) -> Vec<Span> {
    let counts: Vec<_> = segments(preset)
        .into_iter()
        .map(|(glyph, len)| (glyph, len as usize))
        .collect();
    glyph_row(&counts, width)
}
