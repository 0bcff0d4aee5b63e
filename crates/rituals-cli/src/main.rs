use clap::{Parser, Subcommand};

mod commands;
mod launcher;
mod logging;
mod term;

#[derive(Parser)]
#[command(
    name = "rituals",
    version,
    about = "Small terminal rituals: STILLNESS, ONE, UNTANGLE"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the launcher menu (the default)
    Menu,
    /// Guided breathing with a timed session
    Stillness,
    /// One task, one focus block, then a break
    One,
    /// Name the next honest step in one sentence
    Untangle,
    /// Print the last logged record of a ritual
    Last {
        #[arg(value_enum)]
        ritual: commands::RitualArg,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    logging::init();

    let cli = Cli::parse();
    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => launcher::run(),
        Commands::Stillness => commands::ritual::run(rituals_core::Ritual::Stillness),
        Commands::One => commands::ritual::run(rituals_core::Ritual::One),
        Commands::Untangle => commands::ritual::run(rituals_core::Ritual::Untangle),
        Commands::Last { ritual } => commands::last::run(ritual.into()),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
