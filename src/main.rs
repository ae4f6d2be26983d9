mod app;
mod config;
mod document;
mod editor;
mod error;
mod event;
mod highlight;
mod logging;
mod search;
mod ui;

use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context};
use crossterm::{
    cursor::SetCursorStyle,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::{App, WELCOME_CONTENT, WELCOME_TITLE};
use config::Config;
use document::{Document, DocumentKind};
use event::run_app;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!("notefind {}", VERSION);
    println!("A terminal note viewer with a fast in-note find bar");
    println!();
    println!("USAGE:");
    println!("    notefind [OPTIONS] [PATH]");
    println!();
    println!("ARGUMENTS:");
    println!("    [PATH]              Note to open; without it a welcome note is shown");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help          Print help information");
    println!("    -v, --version       Print version information");
    println!("    -c, --config FILE   Use FILE instead of the default config");
    println!("    --config-path       Print the default config file path");
    println!();
    println!("ENVIRONMENT:");
    println!("    {}        tracing filter, e.g. notefind=debug", logging::LOG_ENV);
}

fn resolve_path(path_str: &str) -> Option<PathBuf> {
    let expanded = shellexpand::tilde(path_str).to_string();
    let path = PathBuf::from(&expanded);
    let absolute = if path.is_absolute() {
        path
    } else {
        env::current_dir().ok()?.join(path)
    };

    absolute.canonicalize().ok().or(Some(absolute))
}

enum Command {
    Run { note: Option<PathBuf>, config: Option<PathBuf> },
    Exit,
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut note = None;
    let mut config = None;
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--version" => {
                println!("notefind {}", VERSION);
                return Ok(Command::Exit);
            }
            "-h" | "--help" => {
                print_help();
                return Ok(Command::Exit);
            }
            "--config-path" => {
                println!("{}", Config::config_path().display());
                return Ok(Command::Exit);
            }
            "-c" | "--config" => {
                let value = iter.next().context("--config needs a file argument")?;
                config = Some(resolve_path(value).context("invalid config path")?);
            }
            arg if arg.starts_with('-') => {
                bail!("unknown option: {} (run 'notefind --help' for usage)", arg);
            }
            path_arg => {
                let path = resolve_path(path_arg)
                    .with_context(|| format!("invalid path: {}", path_arg))?;
                if !path.is_file() {
                    bail!("not a file: {}", path.display());
                }
                note = Some(path);
            }
        }
    }

    Ok(Command::Run { note, config })
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let (note_path, config_path) = match parse_args(&args)? {
        Command::Run { note, config } => (note, config),
        Command::Exit => return Ok(()),
    };

    let (config, config_error) = match &config_path {
        Some(path) => {
            let config = Config::load_from(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            (config, None)
        }
        None => Config::load_or_create(),
    };

    let log_path = logging::init(&config.log_level).context("failed to set up logging")?;
    tracing::info!(version = VERSION, log = %log_path.display(), "notefind starting");
    if let Some(e) = config_error {
        tracing::warn!(
            path = %Config::config_path().display(),
            error = %e,
            "using default config"
        );
    }

    let document = match &note_path {
        Some(path) => Document::load(path)?,
        None => Document::from_text(WELCOME_TITLE, DocumentKind::Text, WELCOME_CONTENT),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetCursorStyle::SteadyBar)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, document);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        SetCursorStyle::DefaultUserShape,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "event loop failed");
    }
    tracing::info!("notefind exiting");
    result.context("terminal error")
}
