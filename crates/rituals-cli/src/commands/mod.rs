pub mod config;
pub mod last;
pub mod ritual;

use clap::ValueEnum;
use rituals_core::Ritual;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RitualArg {
    Stillness,
    One,
    Untangle,
}

impl From<RitualArg> for Ritual {
    fn from(arg: RitualArg) -> Self {
        match arg {
            RitualArg::Stillness => Ritual::Stillness,
            RitualArg::One => Ritual::One,
            RitualArg::Untangle => Ritual::Untangle,
        }
    }
}
