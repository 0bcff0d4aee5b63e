//! # Rituals Core Library
//!
//! Timing, flows and logging for a small suite of terminal rituals:
//! STILLNESS (breathing), ONE (single-task focus) and UNTANGLE (one-sentence
//! journaling). The terminal itself lives behind the [`Console`] trait so
//! every flow can run against a scripted console and a manual clock.
//!
//! ## Architecture
//!
//! - **Render loop**: [`render::run_phase`] drives one timed phase from
//!   wall-clock time, repainting a card derived purely from elapsed time and
//!   polling for the quit key once per tick
//! - **Breath**: presets and the raised-cosine fullness waveform
//! - **Flows**: one module per ritual sequencing arrival, active phase,
//!   completion and follow-up
//! - **Event log**: append-only JSON lines, best-effort, with a guard that
//!   writes exactly one terminal event per started session
//! - **Config**: TOML file with per-field defaults

pub mod breath;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod one;
pub mod prompt;
pub mod render;
pub mod ritual;
pub mod session;
pub mod stillness;
pub mod untangle;
pub mod view;

pub use breath::{fullness, BreathPreset, PRESETS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{ConfigError, CoreError, LogError, Result};
pub use events::{LogEvent, LogRecord, Outcome};
pub use logger::{read_last, EventLog, TerminalRecord};
pub use render::{run_phase, Phase, PhaseOutcome, Surface};
pub use ritual::Ritual;
pub use session::Ending;
pub use view::{Card, Console, Line, ScriptedConsole, Span, Tone};
