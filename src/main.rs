use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, terminal,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use patternflix::animations::{self, Frame, PATTERNS};
use patternflix::catalog::Catalog;
use patternflix::config::{self, Config};
use patternflix::external::{self, ControlCommand, ControlSource};
use patternflix::progress::{self, JsonFileStore, ProgressStore, SolvedMap};
use patternflix::render::{ColorMode, RecordingSurface, RenderMode};
use patternflix::stage::{Command, Stage, StageOptions};
use patternflix::Error;

/// Longest the loop blocks on input, so control commands are picked up
/// while nothing is playing.
const IDLE_POLL: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(
    name = "patternflix",
    version,
    about = "Step through LeetCode pattern animations in the terminal"
)]
struct Cli {
    /// Pattern to open: name or any alias (use --list to see all)
    pattern: Option<String>,

    /// Render mode
    #[arg(short, long, value_enum)]
    render: Option<RenderMode>,

    /// Color mode
    #[arg(short, long, value_enum)]
    color: Option<ColorMode>,

    /// Playback speed multiplier (0.5-2.0)
    #[arg(short, long)]
    speed: Option<f64>,

    /// Start playing as soon as the pattern opens
    #[arg(short = 'p', long)]
    autoplay: bool,

    /// List available patterns and exit
    #[arg(short, long)]
    list: bool,

    /// Hide the status bar
    #[arg(long)]
    clean: bool,

    /// Print every step's description instead of opening the player
    #[arg(long)]
    trace: bool,

    /// Last step printed by --trace
    #[arg(long, default_value = "100")]
    steps: usize,

    /// Read JSON control commands from a watched file, or "-" for stdin
    #[arg(long, value_name = "FILE|-")]
    control: Option<String>,

    /// Problem catalog (JSON); prints solved-problem progress
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// User whose progress is read or updated
    #[arg(short, long)]
    user: Option<String>,

    /// Mark a problem id as solved
    #[arg(long, value_name = "ID")]
    solve: Option<String>,

    /// Mark a problem id as unsolved
    #[arg(long, value_name = "ID")]
    unsolve: Option<String>,

    /// Write logs to this file (filter with PATTERNFLIX_LOG)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Print the config file path and exit
    #[arg(long)]
    show_config: bool,

    /// Print a default config file and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        print!("{}", config::default_config_string());
        return Ok(());
    }
    if cli.show_config {
        match config::config_path() {
            Some(path) if path.exists() => println!("{}", path.display()),
            Some(path) => println!("{} (not created yet, see --init-config)", path.display()),
            None => println!("no config directory on this platform"),
        }
        return Ok(());
    }

    let config = config::load_config();
    let headless = cli.trace || cli.list || progress_requested(&cli);
    init_logging(cli.log_file.as_deref().or(config.log_file.as_deref()), headless)?;

    if cli.list {
        println!("Available patterns:");
        for entry in PATTERNS {
            println!("  {:<24} {}", entry.name, entry.title);
        }
        println!("\nAliases such as pattern-9-two-heaps or 9 are accepted too.");
        println!("Render modes: half-block, braille");
        println!("Color modes: mono, ansi16, ansi256, true-color");
        return Ok(());
    }

    if progress_requested(&cli) {
        return run_progress(&cli, &config);
    }

    let pattern = cli
        .pattern
        .clone()
        .or_else(|| config.pattern.clone())
        .unwrap_or_else(|| PATTERNS[0].name.to_string());
    if animations::entry(&pattern).is_none() {
        return Err::<(), _>(Error::UnknownPattern(pattern)).context("see --list for the available patterns");
    }

    if cli.trace {
        trace(&pattern, cli.steps);
        return Ok(());
    }

    let control = cli
        .control
        .as_deref()
        .map(|arg| external::spawn_reader(ControlSource::from_arg(arg)));

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let mut writer = BufWriter::with_capacity(256 * 1024, stdout);
    let result = run_player(&mut writer, &cli, &config, &pattern, control);

    // Cleanup
    execute!(writer, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    result
}

fn progress_requested(cli: &Cli) -> bool {
    cli.catalog.is_some() || cli.solve.is_some() || cli.unsolve.is_some()
}

/// Logs go to a file when one is configured. Headless runs fall back to
/// stderr, the player never logs to the terminal.
fn init_logging(file: Option<&Path>, headless: bool) -> anyhow::Result<()> {
    let filter = || EnvFilter::try_from_env("PATTERNFLIX_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    match file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .with(filter())
                .init();
        }
        None if headless && std::env::var_os("PATTERNFLIX_LOG").is_some() => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .with(filter())
                .init();
        }
        None => {}
    }
    Ok(())
}

fn trace(pattern: &str, steps: usize) {
    let Some(entry) = animations::entry(pattern) else {
        return;
    };
    println!("{}", entry.title);
    let mut surface = RecordingSurface::new();
    for step in 0..=steps {
        match (entry.simulate)(&mut surface, step) {
            Frame::Finished => {
                println!("{step:>4}  (finished)");
                break;
            }
            Frame::Continuing { description } => println!("{step:>4}  {description}"),
        }
    }
}

fn run_progress(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let Some(catalog_path) = cli.catalog.as_ref().or(config.catalog.as_ref()) else {
        bail!("no catalog given: pass --catalog or set `catalog` in the config file");
    };
    let catalog = Catalog::load(catalog_path)?;
    let user = cli
        .user
        .clone()
        .or_else(|| config.user.clone())
        .unwrap_or_else(|| "default".to_string());
    let mut store = match &config.progress_dir {
        Some(dir) => JsonFileStore::new(dir),
        None => JsonFileStore::default_location()?,
    };

    for (id, solved) in [(&cli.solve, true), (&cli.unsolve, false)] {
        let Some(id) = id else { continue };
        if catalog.problem(id).is_none() {
            return Err(Error::UnknownProblem(id.clone()).into());
        }
        store
            .set_solved(&user, id, solved)
            .with_context(|| format!("updating progress in {}", store.dir().display()))?;
    }

    let solved = store.load(&user)?;
    print_progress(&catalog, &solved, &user);
    Ok(())
}

fn print_progress(catalog: &Catalog, solved: &SolvedMap, user: &str) {
    let all = progress::overall(catalog, solved);
    println!(
        "Progress for {user}: {}/{} solved ({}%)",
        all.solved,
        all.total,
        all.percent()
    );
    for (pattern, tally) in progress::per_pattern(catalog, solved) {
        let animation = pattern
            .animation()
            .map(|e| format!("  [animation: {}]", e.name))
            .unwrap_or_default();
        println!("\n{}  {}/{}{animation}", pattern.name, tally.solved, tally.total);
        for problem in pattern.problems() {
            let mark = if solved.get(&problem.id).copied().unwrap_or(false) { 'x' } else { ' ' };
            println!("  [{mark}] {:>5}  {}", problem.id, problem.name);
        }
    }
}

enum Input {
    Quit,
    Apply(Command),
}

fn key_input(key: KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let command = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Input::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(Input::Quit);
        }
        KeyCode::Char(' ') => Command::Toggle,
        KeyCode::Char('r') => Command::Reset,
        KeyCode::Char('+') | KeyCode::Char('=') => Command::Faster,
        KeyCode::Char('-') | KeyCode::Char('_') => Command::Slower,
        KeyCode::Right | KeyCode::Char('n') => Command::NextPattern,
        KeyCode::Left | KeyCode::Char('p') => Command::PreviousPattern,
        KeyCode::Char('m') => Command::CycleRender,
        KeyCode::Char('c') => Command::CycleColor,
        KeyCode::Char('h') => Command::ToggleStatus,
        _ => return None,
    };
    Some(Input::Apply(command))
}

/// Commands after which stale rows may remain on screen.
fn relayouts(command: &Command) -> bool {
    matches!(command, Command::CycleRender | Command::ToggleStatus)
}

fn run_player(
    stdout: &mut BufWriter<io::Stdout>,
    cli: &Cli,
    config: &Config,
    pattern: &str,
    control: Option<Receiver<ControlCommand>>,
) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut stage = Stage::new(StageOptions {
        cols,
        rows,
        render_mode: cli
            .render
            .or_else(|| config.render.map(Into::into))
            .unwrap_or(RenderMode::HalfBlock),
        color_mode: cli
            .color
            .or_else(|| config.color.map(Into::into))
            .unwrap_or(ColorMode::TrueColor),
        color_quant: config.color_quant.unwrap_or(0),
        hide_status: cli.clean || config.clean.unwrap_or(false),
        speed: cli.speed.or(config.speed).unwrap_or(1.0),
    });
    stage.open(pattern);
    if cli.autoplay || config.autoplay.unwrap_or(false) {
        stage.apply(Command::Play, Instant::now());
    }
    write!(stdout, "\x1b[2J")?;

    loop {
        if let Some(rx) = &control {
            while let Ok(command) = rx.try_recv() {
                stage.apply(command.into(), Instant::now());
            }
        }

        stage.tick(Instant::now());
        if stage.take_dirty() {
            stdout.write_all(stage.frame().as_bytes())?;
            stdout.flush()?;
        }

        let timeout = stage
            .controller()
            .until_next(Instant::now())
            .map_or(IDLE_POLL, |d| d.min(IDLE_POLL));
        if !event::poll(timeout)? {
            continue;
        }
        match event::read()? {
            Event::Resize(w, h) => {
                stage.resize(w, h);
                write!(stdout, "\x1b[2J")?;
            }
            Event::Key(key) => match key_input(key) {
                Some(Input::Quit) => return Ok(()),
                Some(Input::Apply(command)) => {
                    if relayouts(&command) {
                        write!(stdout, "\x1b[2J")?;
                    }
                    stage.apply(command, Instant::now());
                }
                None => {}
            },
            _ => {}
        }
    }
}
