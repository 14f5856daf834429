//! Command-line runner for Conway's Game of Life.

mod source;
mod telemetry;
mod terminal;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use life_core::{Error, LifeConfig, PatternFormat, RandomGridConfig};
use life_world::{shared_sink, Grid, RunConfig, Simulation};
use source::GridSource;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};

/// Run Conway's Game of Life simulation
#[derive(Parser, Debug)]
#[command(name = "life")]
#[command(about = "Run Conway's Game of Life simulation")]
struct Args {
    /// File to append renderings to; `-` writes to stdout
    #[arg(long, short = 'o', default_value = "-")]
    outfile: String,

    /// Pause between turns in whole milliseconds (e.g. 500)
    #[arg(long, short = 'd')]
    delay: Option<u64>,

    /// Turns to run; zero or negative runs indefinitely
    #[arg(long, short = 't', allow_negative_numbers = true)]
    turns: Option<i64>,

    /// Clear the screen before each turn
    #[arg(long, short = 'c')]
    clear: bool,

    /// Wait for a line on stdin between turns
    #[arg(long, short = 'i')]
    interactive: bool,

    /// Show an animated spinner between turns
    #[arg(long, short = 's')]
    spinner: bool,

    /// JSON file with `run` and `spinner` sections; flags override `run`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start with a predefined grid
    #[command(visible_alias = "def")]
    Defined {
        /// Starting grid: blank for the demo, `-` for stdin, `@FILE` for a file,
        /// or the pattern itself
        #[arg(long, short = 'g', default_value = "")]
        grid: String,

        /// Row delimiter; defaults to `;` for inline patterns and newline otherwise
        #[arg(long, short = 'D')]
        delimiter: Option<char>,
    },
    /// Start with a randomly generated grid
    #[command(visible_alias = "rand")]
    Random {
        /// Width of the sampled area
        #[arg(long, short = 'w', default_value_t = 9)]
        width: u32,

        /// Height of the sampled area
        #[arg(long, short = 'H', default_value_t = 9)]
        height: u32,

        /// Probability of a living cell, in (0, 1]
        #[arg(long, short = 'p', default_value_t = 0.5)]
        probability: f64,

        /// Seed for a reproducible grid
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Args {
    fn life_config(&self) -> Result<LifeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                LifeConfig::from_json(&json)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => LifeConfig::default(),
        };

        let settings = &mut config.run;

        if let Some(delay) = self.delay {
            settings.delay_ms = delay;
        }
        if let Some(turns) = self.turns {
            settings.max_turns = turns;
        }
        settings.clear_screen |= self.clear;
        settings.interactive |= self.interactive;
        settings.spinner |= self.spinner;
        Ok(config)
    }

    fn grid_source(&self) -> Option<GridSource> {
        match &self.command {
            Some(Command::Defined { grid, .. }) => Some(GridSource::parse(grid)),
            Some(Command::Random { .. }) => None,
            None => Some(GridSource::Demo),
        }
    }

    async fn initial_grid(&self) -> Result<Grid> {
        match &self.command {
            Some(Command::Random {
                width,
                height,
                probability,
                seed,
            }) => {
                let config = RandomGridConfig {
                    width: *width,
                    height: *height,
                    probability: *probability,
                    seed: *seed,
                };
                let mut rng = source::seeded_rng(config.seed);
                Ok(source::random_grid(&config, &mut rng)?)
            }
            Some(Command::Defined { grid, delimiter }) => {
                GridSource::parse(grid)
                    .load(delimiter.map(PatternFormat::with_delimiter))
                    .await
            }
            None => GridSource::Demo.load(None).await,
        }
    }
}

fn open_sink(outfile: &str) -> Result<Box<dyn Write + Send>> {
    if outfile == "-" {
        return Ok(Box::new(std::io::stdout()));
    }
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(outfile)
        .with_context(|| format!("failed to open {}", outfile))?;
    Ok(Box::new(file))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.verbose, args.log_json)?;

    let LifeConfig { run: settings, spinner } = args.life_config()?;
    if settings.interactive && args.grid_source().is_some_and(|source| source.reads_stdin()) {
        bail!("interactive mode reads stdin, so the grid cannot come from stdin too");
    }

    let grid = args.initial_grid().await?;
    info!(population = grid.population(), "Starting grid ready");

    let mut config = RunConfig::new(shared_sink(open_sink(&args.outfile)?), settings.clone())
        .with_spinner(spinner);
    if settings.interactive {
        config = config.with_advance(terminal::stdin_advance());
    }
    if settings.clear_screen {
        config = config.with_clearer(Box::new(terminal::CrosstermClearer));
    }
    let simulation = Simulation::new(grid, config)?;

    tokio::select! {
        result = simulation.run() => match result {
            Ok(report) => info!(
                turns = report.turns,
                population = report.final_grid.population(),
                "Run complete"
            ),
            Err(Error::InputClosed(reason)) => info!("Stopping: {}", reason),
            Err(e) => return Err(e.into()),
        },
        _ = shutdown_signal() => {}
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
