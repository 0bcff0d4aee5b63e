use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// How a focus session ended, as reported by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Complete,
    Released,
}

/// Every log line written by a ritual is one of these.
///
/// Serialized with an `event` tag so each line stays self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    SessionStart {
        preset: String,
        label: String,
        minutes: u32,
        deep: bool,
    },
    SessionEnd {
        preset: String,
        label: String,
        minutes: u32,
        deep: bool,
        interrupted: bool,
    },
    OneStart {
        task: String,
        minutes: u32,
    },
    OneEnd {
        task: String,
        minutes: u32,
        interrupted: bool,
        outcome: Outcome,
    },
    BreakStart {
        minutes: u32,
    },
    BreakEnd {
        minutes: u32,
        interrupted: bool,
    },
    Entry {
        sentence: String,
    },
}

impl LogEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LogEvent::SessionStart { .. } => "session_start",
            LogEvent::SessionEnd { .. } => "session_end",
            LogEvent::OneStart { .. } => "one_start",
            LogEvent::OneEnd { .. } => "one_end",
            LogEvent::BreakStart { .. } => "break_start",
            LogEvent::BreakEnd { .. } => "break_end",
            LogEvent::Entry { .. } => "entry",
        }
    }
}

/// One line of a log file: the event plus its timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(flatten)]
    pub event: LogEvent,
    /// Local time, `YYYY-MM-DDTHH:MM:SS`.
    pub ts: String,
}

impl LogRecord {
    pub fn new(event: LogEvent, at: DateTime<Local>) -> Self {
        Self {
            event,
            ts: at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }

    pub fn now(event: LogEvent) -> Self {
        Self::new(event, Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_flattens_event_fields_next_to_ts() {
        let at = Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        let record = LogRecord::new(
            LogEvent::OneEnd {
                task: "write report".into(),
                minutes: 25,
                interrupted: false,
                outcome: Outcome::Complete,
            },
            at,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["event"], "one_end");
        assert_eq!(json["task"], "write report");
        assert_eq!(json["interrupted"], false);
        assert_eq!(json["outcome"], "complete");
        assert_eq!(json["ts"], "2026-03-04T05:06:07");
    }

    #[test]
    fn name_matches_serialized_tag() {
        let event = LogEvent::BreakEnd {
            minutes: 5,
            interrupted: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], event.name());
    }

    #[test]
    fn unknown_fields_are_tolerated_on_read() {
        let line = r#"{"event":"entry","sentence":"rest.","ts":"2026-01-01T00:00:00","mood":"calm"}"#;
        let record: LogRecord = serde_json::from_str(line).unwrap();
        assert_eq!(
            record.event,
            LogEvent::Entry {
                sentence: "rest.".into()
            }
        );
    }
}
