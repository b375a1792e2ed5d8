use clap::Parser;
use fractal_scanner::config::{AppConfig, DEFAULT_CONFIG_FILE};
use fractal_scanner::controllers::session::overlay::SessionState;
use fractal_scanner::core::fractals::fractal_family::FractalFamily;
use fractal_scanner::logging::session_subscriber;
use fractal_scanner::presenters::file::image_codec::ImageFileCodec;
use fractal_scanner::storage::history::HistoryStore;
use fractal_scanner::{Command, CommandOutcome, SessionController, parse_step};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

/// Renders escape-time fractals headlessly, driven by a list of steps.
#[derive(Debug, Parser)]
#[command(name = "fractal_scanner", version)]
struct Cli {
    /// TOML configuration file; missing or invalid files fall back to defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Display size used by "screen resolution" presets and cursor mapping.
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    display: Option<(u32, u32)>,

    /// Family for the first frame (mandelbrot, julia, burning-ship, tricorn, newton).
    #[arg(long)]
    family: Option<FractalFamily>,

    /// Step to apply after the first frame, e.g. `cursor:640,360` or `zoom-in`. Repeatable.
    #[arg(long = "step", value_name = "STEP", value_parser = parse_step)]
    steps: Vec<Command>,

    /// Export the final frame here (png or ppm).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Give up on a scan that takes longer than this.
    #[arg(long, default_value_t = 600)]
    timeout_secs: u64,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: u32 = width.trim().parse().map_err(|_| format!("invalid width in '{s}'"))?;
    let height: u32 = height.trim().parse().map_err(|_| format!("invalid height in '{s}'"))?;

    if width == 0 || height == 0 {
        return Err(format!("display size must be positive, got '{s}'"));
    }

    Ok((width, height))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let bootstrap = tracing_subscriber::fmt().with_writer(std::io::stderr).finish();
    let config = tracing::subscriber::with_default(bootstrap, || AppConfig::load(&cli.config));

    let (subscriber, log_file) = session_subscriber(&config.logging, &config.log_directory());
    tracing::subscriber::with_default(subscriber, || run(&cli, &config, log_file))
}

fn run(cli: &Cli, config: &AppConfig, log_file: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    if let Some(path) = log_file {
        tracing::info!(path = %path.display(), "logging to file");
    }

    let history = HistoryStore::new(
        config.history_directory(),
        config.general.max_history_states,
        Box::new(ImageFileCodec::png()),
    )?;
    let mut session = SessionController::new(config, history);

    if let Some((width, height)) = cli.display {
        session.dispatch(Command::SetDisplaySize { width, height });
        session.dispatch(Command::MoveCursor {
            x: f64::from(width) / 2.0,
            y: f64::from(height) / 2.0,
        });
    }

    let timeout = Duration::from_secs(cli.timeout_secs);
    let first = cli.family.map_or(Command::Regenerate, Command::SelectFamily);
    let mut commands = std::iter::once(first)
        .chain(cli.steps.iter().cloned())
        .peekable();

    while let Some(command) = commands.next() {
        let outcome = session.dispatch(command.clone());
        tracing::info!(?command, ?outcome, "step applied");

        // A following pause or cancel step acts on the scan just started.
        let keep_running = commands.peek().is_some_and(Command::allowed_while_generating);
        if !keep_running {
            settle(&mut session, timeout)?;
        }
    }

    if let Some(output) = &cli.output {
        let outcome = session.dispatch(Command::Export(output.clone()));
        if outcome != CommandOutcome::Applied {
            return Err(format!("could not export to {}", output.display()).into());
        }
    }

    println!("{}", session.overlay());
    Ok(())
}

fn settle(session: &mut SessionController, timeout: Duration) -> Result<(), Box<dyn Error>> {
    session.poll_events();
    if session.state() == SessionState::Paused {
        tracing::warn!("resuming paused scan before continuing");
        session.dispatch(Command::TogglePause);
    }

    if !session.wait_until_idle(timeout) {
        return Err(format!("scan did not finish within {}s", timeout.as_secs()).into());
    }

    Ok(())
}
