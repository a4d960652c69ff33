use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use modshell::config::Config;
use modshell::help::TeraHelpRenderer;
use modshell::session::{default_session_path, Session};
use modshell::{modules, ModuleCatalog};

#[derive(Debug, Parser)]
#[command(name = "modshell", version, about = "Interactive shell for pluggable command modules")]
struct Cli {
    /// Config file (default: ~/.config/modshell/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session file to load and save
    #[arg(long)]
    session: Option<PathBuf>,

    /// Do not save the session on exit
    #[arg(long)]
    no_save: bool,

    /// Run a command line and exit (repeatable)
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    commands: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    modshell::logging::init_tracing(&config.logging);

    let session_path = cli
        .session
        .clone()
        .or_else(|| config.session.path.clone())
        .unwrap_or_else(default_session_path);
    let session = Arc::new(Session::load_from(&session_path).context("Failed to load session")?);

    let mut catalog = ModuleCatalog::new(session.clone());
    if let Some(template) = &config.help.template {
        let renderer =
            TeraHelpRenderer::from_file(template).context("Failed to load help template")?;
        catalog = catalog.with_renderer(Arc::new(renderer));
    }
    for module in modules::builtin() {
        catalog.load(module).context("Failed to load module")?;
    }

    if cli.commands.is_empty() {
        repl(&mut catalog)?;
    } else {
        for line in &cli.commands {
            if !execute(&mut catalog, line) {
                break;
            }
        }
    }

    if config.session.autosave && !cli.no_save {
        session
            .save_to(&session_path)
            .context("Failed to save session")?;
    }
    Ok(())
}

fn repl(catalog: &mut ModuleCatalog) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "modshell> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if !execute(catalog, &line) {
            break;
        }
    }
    Ok(())
}

/// A line typed at the shell.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Empty,
    Quit,
    Modules,
    /// `:help` with an optional module name.
    Help(Option<&'a str>),
    Dispatch(&'a str),
}

impl<'a> ShellCommand<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));

        match command {
            "" => Self::Empty,
            ":quit" | ":exit" => Self::Quit,
            ":modules" => Self::Modules,
            ":help" => Self::Help(Some(rest.trim()).filter(|name| !name.is_empty())),
            _ => Self::Dispatch(line),
        }
    }
}

/// Handle one shell line. Returns false when the shell should exit.
fn execute(catalog: &mut ModuleCatalog, line: &str) -> bool {
    match ShellCommand::parse(line) {
        ShellCommand::Empty => {}
        ShellCommand::Quit => return false,
        ShellCommand::Modules => print_modules(catalog),
        ShellCommand::Help(None) => {
            println!("usage: :help <module>");
            print_modules(catalog);
        }
        ShellCommand::Help(Some(name)) => match catalog.help(name) {
            Some(Ok(text)) => println!("{}", text),
            Some(Err(e)) => tracing::error!(error = %e, "Failed to render help"),
            None => tracing::warn!(module = %name, "Module not found"),
        },
        ShellCommand::Dispatch(line) => {
            catalog.dispatch(line);
        }
    }
    true
}

fn print_modules(catalog: &ModuleCatalog) {
    for name in catalog.names() {
        println!("{}", name);
    }
}
