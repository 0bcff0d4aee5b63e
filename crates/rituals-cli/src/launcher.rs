//! The menu: pick a ritual, run it as its own process, come back.
//!
//! Each ritual runs in a child process so a crash or an abandoned terminal
//! state in one never leaks into the menu.

use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use rituals_core::untangle::last_sentence;
use rituals_core::{Card, Config, Console, CoreError, Ritual, Tone};

/// Exit code reported when the child did not exit on its own.
pub const INTERRUPTED_EXIT: i32 = 130;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    Exited(i32),
    /// The program could not be started.
    Missing(String),
}

fn is_quit(answer: &str) -> bool {
    matches!(answer, "q" | "quit" | "exit")
}

pub fn menu_card() -> Card {
    let mut card = Card::framed("STILLNESS / ONE / UNTANGLE")
        .blank()
        .line("RITUALS", Tone::Strong)
        .blank()
        .line("choose", Tone::Dim)
        .blank();
    for (i, ritual) in Ritual::ALL.iter().enumerate() {
        card = card.line(format!("{}. {}", i + 1, ritual.title()), Tone::Accent);
    }
    card.blank().line("q to quit", Tone::Dim)
}

pub fn return_card(ritual: Ritual) -> Card {
    let mut card = Card::framed("RITUALS")
        .blank()
        .line(ritual.title(), Tone::Strong)
        .blank()
        .line("return to dashboard", Tone::Dim)
        .blank()
        .line("r to return", Tone::Accent);
    if ritual.has_viewable_entry() {
        card = card.line("v to view previous", Tone::Accent);
    }
    card.line("q to quit", Tone::Dim)
}

pub fn previous_entry_card(sentence: Option<&str>) -> Card {
    Card::framed("UNTANGLE")
        .blank()
        .line("previous entry", Tone::Strong)
        .blank()
        .line(sentence.unwrap_or("no previous entry found"), Tone::Dim)
        .blank()
        .line("r to return · q to quit", Tone::Accent)
}

pub fn missing_card(name: &str) -> Card {
    Card::bare()
        .blank()
        .line(format!("missing: {name}"), Tone::Dim)
}

#[cfg(unix)]
type Interrupts = tokio::signal::unix::Signal;
#[cfg(windows)]
type Interrupts = tokio::signal::windows::CtrlC;

#[cfg(unix)]
fn interrupts() -> io::Result<Interrupts> {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
}

#[cfg(windows)]
fn interrupts() -> io::Result<Interrupts> {
    tokio::signal::windows::ctrl_c()
}

/// Holds Ctrl-C for the menu while a ritual owns the terminal.
///
/// The terminal sends SIGINT to the whole foreground group, so without a
/// handler the menu would die with the ritual. Once installed the handler
/// stays for the life of the process.
#[derive(Debug)]
struct InterruptShield {
    runtime: tokio::runtime::Runtime,
    interrupts: Interrupts,
}

impl InterruptShield {
    fn install() -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let interrupts = {
            let _rt = runtime.enter();
            interrupts()?
        };
        Ok(Self {
            runtime,
            interrupts,
        })
    }

    /// Spawn `command` and wait for it, absorbing interrupts meanwhile.
    fn status(&mut self, command: Command) -> io::Result<ExitStatus> {
        let Self {
            runtime,
            interrupts,
        } = self;
        let mut child = {
            let _rt = runtime.enter();
            tokio::process::Command::from(command).spawn()?
        };
        runtime.block_on(async {
            loop {
                tokio::select! {
                    status = child.wait() => return status,
                    Some(()) = interrupts.recv() => {
                        tracing::debug!("interrupt while a ritual runs; menu stays");
                    }
                }
            }
        })
    }
}

/// Where rituals are launched from.
#[derive(Debug)]
pub struct Launcher {
    program: PathBuf,
    root: PathBuf,
    config: Config,
    shield: Option<InterruptShield>,
}

impl Launcher {
    pub fn new(program: impl Into<PathBuf>, root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            program: program.into(),
            root: root.into(),
            config,
            shield: None,
        }
    }

    /// Launch rituals with this executable, from its own directory.
    pub fn from_current_exe(config: Config) -> rituals_core::Result<Self> {
        let program = std::env::current_exe()?;
        let root = program
            .parent()
            .map(PathBuf::from)
            .ok_or_else(|| {
                CoreError::Custom(format!("no directory for {}", program.display()))
            })?;
        Ok(Self::new(program, root, config))
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    fn status(&mut self, mut command: Command) -> io::Result<ExitStatus> {
        if self.shield.is_none() {
            match InterruptShield::install() {
                Ok(shield) => self.shield = Some(shield),
                Err(e) => tracing::warn!("Ctrl-C will also end the menu: {e}"),
            }
        }
        match self.shield.as_mut() {
            Some(shield) => shield.status(command),
            None => command.status(),
        }
    }

    /// Run `ritual` in a child process and wait for it.
    pub fn launch(&mut self, ritual: Ritual) -> Launch {
        let mut command = Command::new(&self.program);
        command.arg(ritual.key()).current_dir(&self.root);
        match self.status(command) {
            Ok(status) => {
                let code = status.code().unwrap_or(INTERRUPTED_EXIT);
                tracing::info!(%ritual, code, "ritual exited");
                Launch::Exited(code)
            }
            Err(e) => {
                tracing::warn!(%ritual, program = %self.program.display(), "spawn failed: {e}");
                Launch::Missing(self.program_name())
            }
        }
    }

    /// The menu loop. Returns when the user quits or input ends.
    pub fn run<C: Console + ?Sized>(&mut self, console: &mut C) -> io::Result<()> {
        loop {
            console.clear()?;
            console.show(&menu_card())?;
            let Some(answer) = console.read_line("> ")? else {
                return Ok(());
            };
            let choice = answer.trim().to_lowercase();
            if is_quit(&choice) {
                console.clear()?;
                return Ok(());
            }
            let Some(ritual) = Ritual::from_menu_choice(&choice) else {
                continue;
            };

            if let Launch::Missing(name) = self.launch(ritual) {
                console.clear()?;
                console.show(&missing_card(&name))?;
                if console.read_line("press ENTER to return ")?.is_none() {
                    return Ok(());
                }
                continue;
            }

            if !self.after(console, ritual)? {
                console.clear()?;
                return Ok(());
            }
        }
    }

    /// The return point after a ritual. `false` means quit.
    fn after<C: Console + ?Sized>(&self, console: &mut C, ritual: Ritual) -> io::Result<bool> {
        console.clear()?;
        console.show(&return_card(ritual))?;
        loop {
            let Some(answer) = console.read_line("> ")? else {
                return Ok(false);
            };
            let answer = answer.trim().to_lowercase();
            if is_quit(&answer) {
                return Ok(false);
            }
            if matches!(answer.as_str(), "" | "r" | "return") {
                return Ok(true);
            }
            if ritual.has_viewable_entry() && matches!(answer.as_str(), "v" | "view") {
                let last = last_sentence(&self.config.log_path(ritual));
                console.clear()?;
                console.show(&previous_entry_card(last.as_deref()))?;
            }
        }
    }
}

pub fn run() -> rituals_core::Result<()> {
    let mut launcher = Launcher::from_current_exe(Config::load_or_default())?;
    let mut console = crate::term::TerminalConsole::new();
    launcher.run(&mut console)?;
    Ok(())
}
