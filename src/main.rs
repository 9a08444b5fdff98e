use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Stdout},
    path::PathBuf,
    time::Instant,
};
use tracing::{info, warn};

use versemask::{
    config::{read_text_file, Config, ConfigStore, FileConfigStore},
    error::ConfigError,
    input::intent_for_key,
    logging::{init_logging, LoggingConfig},
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    App, SessionController,
};

/// hide a verse one word at a time until you can say it by heart
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A verse memorization TUI: every press hides one more random word (its length stays visible as a hint) until the whole verse is hidden."
)]
pub struct Cli {
    /// verse reference shown above the text
    #[clap(short = 'r', long)]
    reference: Option<String>,

    /// verse text to memorize; words are split on single spaces
    #[clap(short = 't', long, conflicts_with = "text_file")]
    text: Option<String>,

    /// read the verse text from a file
    #[clap(short = 'f', long)]
    text_file: Option<PathBuf>,

    /// character used to mask hidden words
    #[clap(short = 'm', long)]
    mask: Option<char>,

    /// seed for the hiding order (random when omitted)
    #[clap(long)]
    seed: Option<u64>,

    /// config file to read instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// save the effective settings to the config file and exit
    #[clap(long)]
    write_config: bool,

    /// where to write logs (default: versemask.log in the platform state directory)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// log level or filter directive; RUST_LOG takes precedence
    #[clap(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    fn logging_config(&self) -> LoggingConfig {
        let default = LoggingConfig::default();
        LoggingConfig {
            path: self.log_file.clone().or(default.path),
            level: self.log_level.clone(),
        }
    }

    /// Layer command line overrides on top of the loaded config.
    fn apply(&self, mut cfg: Config) -> Result<Config, ConfigError> {
        if let Some(reference) = &self.reference {
            cfg.reference = reference.clone();
        }
        if let Some(text) = &self.text {
            cfg.text = text.clone();
        }
        if let Some(path) = &self.text_file {
            cfg.text = read_text_file(path)?;
        }
        if let Some(mask) = self.mask {
            cfg.mask = mask;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn build_app(cfg: &Config, seed: Option<u64>) -> App {
    let verse = cfg.verse();
    let session = match seed {
        Some(seed) => SessionController::with_seed(verse, seed),
        None => SessionController::new(verse),
    };
    App::new(session, cfg.mask)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = init_logging(&cli.logging_config()) {
        info!(log = %path.display(), "versemask starting");
    }

    let store = cli.config_store();
    let cfg = cli.apply(store.load()?)?;

    if cli.write_config {
        store.save(&cfg)?;
        println!("config written to {}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = build_app(&cfg, cli.seed);
    info!(
        reference = %cfg.reference,
        words = app.session.total(),
        "session ready"
    );

    let mut terminal = enter_terminal()?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Run `setup`; if it fails, call `restore` before handing back the error.
fn with_restore<T>(
    setup: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce(),
) -> io::Result<T> {
    let result = setup();
    if result.is_err() {
        restore();
    }
    result
}

fn enter_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    with_restore(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(stdout))
        },
        || {
            // best effort: the setup error is the one worth reporting
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);
    terminal.draw(|f| ui(app, f))?;

    loop {
        let redraw = match runner.step() {
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize(width, height) => {
                app.resize(width, height);
                true
            }
            AppEvent::Key(key) => match intent_for_key(key) {
                Some(intent) => {
                    if app.dispatch(intent, Instant::now()) {
                        break;
                    }
                    true
                }
                None => false,
            },
            AppEvent::Disconnected => {
                warn!("terminal input closed, leaving");
                return Err(
                    io::Error::new(io::ErrorKind::BrokenPipe, "terminal input closed").into(),
                );
            }
        };

        if redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
