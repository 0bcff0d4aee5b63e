use serde::{Deserialize, Serialize};

/// The three rituals the launcher knows how to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ritual {
    Stillness,
    One,
    Untangle,
}

impl Ritual {
    /// Menu order.
    pub const ALL: [Ritual; 3] = [Ritual::Stillness, Ritual::One, Ritual::Untangle];

    /// Display name, as shown on cards.
    pub fn title(self) -> &'static str {
        match self {
            Ritual::Stillness => "STILLNESS",
            Ritual::One => "ONE",
            Ritual::Untangle => "UNTANGLE",
        }
    }

    /// Subcommand / config key.
    pub fn key(self) -> &'static str {
        match self {
            Ritual::Stillness => "stillness",
            Ritual::One => "one",
            Ritual::Untangle => "untangle",
        }
    }

    pub fn log_file_name(self) -> String {
        format!("{}_log.jsonl", self.key())
    }

    /// Resolve a numbered menu choice ("1".."3").
    pub fn from_menu_choice(choice: &str) -> Option<Ritual> {
        match choice.trim() {
            "1" => Some(Ritual::Stillness),
            "2" => Some(Ritual::One),
            "3" => Some(Ritual::Untangle),
            _ => None,
        }
    }

    /// Only UNTANGLE offers "view previous" on the return screen.
    pub fn has_viewable_entry(self) -> bool {
        matches!(self, Ritual::Untangle)
    }
}

impl std::fmt::Display for Ritual {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_choices_map_in_order() {
        assert_eq!(Ritual::from_menu_choice("1"), Some(Ritual::Stillness));
        assert_eq!(Ritual::from_menu_choice(" 2 "), Some(Ritual::One));
        assert_eq!(Ritual::from_menu_choice("3"), Some(Ritual::Untangle));
        assert_eq!(Ritual::from_menu_choice("4"), None);
        assert_eq!(Ritual::from_menu_choice(""), None);
    }

    #[test]
    fn log_files_are_per_ritual() {
        assert_eq!(Ritual::One.log_file_name(), "one_log.jsonl");
        assert_eq!(Ritual::Untangle.log_file_name(), "untangle_log.jsonl");
    }
}
