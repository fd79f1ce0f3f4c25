use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use lucky_wheel_core::{
    parse_priority_list, AppConfig, DrawEngine, FeedbackPort, MusicDeck, StopOutcome,
    ToggleOutcome, WheelError,
};
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::{number_label, print_history, print_status, spawn_renderer, BellFeedback};

fn main() -> lucky_wheel_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.settings.resolve()?;
    let feedback = Arc::new(BellFeedback);
    let engine = match cli.settings.seed {
        Some(seed) => DrawEngine::with_seed(config.clone(), feedback.clone(), seed)?,
        None => DrawEngine::new(config.clone(), feedback.clone())?,
    };
    let engine = Arc::new(engine);

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => run_play(engine, feedback.as_ref(), &config),
        Commands::Draw { count, spin_ms } => run_draw(&engine, count, spin_ms),
    }
}

fn run_play(
    engine: Arc<DrawEngine>,
    feedback: &dyn FeedbackPort,
    config: &AppConfig,
) -> lucky_wheel_core::Result<()> {
    tracing::info!(range = %engine.snapshot()?.range, "starting interactive session");

    let mut deck = MusicDeck::new();
    deck.sync(&config.audio, feedback);
    let _renderer = spawn_renderer(engine.clone(), config.timing.tick_interval());

    println!("LUCKY WHEEL");
    println!("[Enter] start/stop  [h] history  [s] status  [c] clear  [m] music  [q] quit");
    print_status(&engine.snapshot()?);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while let Some(line) = lines.next() {
        match line?.trim() {
            "" => match engine.toggle() {
                Ok(ToggleOutcome::Started) => println!("Spinning... press Enter to stop."),
                Ok(ToggleOutcome::Stopped(item)) => {
                    println!("\r*** WINNER: {} ***", item.number);
                }
                Err(err) if err.is_exhausted() => {
                    println!("No more numbers available. Clear the history (c) or widen the range.");
                }
                Err(err) => return Err(err),
            },
            "h" => print_history(&engine.snapshot()?),
            "s" => {
                let snapshot = engine.snapshot()?;
                println!("Current: {}", number_label(snapshot.current_number));
                print_status(&snapshot);
            }
            "c" => {
                print!("Clear the draw history? [y/N] ");
                io::stdout().flush()?;
                let answer = lines.next().transpose()?.unwrap_or_default();
                if answer.trim().eq_ignore_ascii_case("y") {
                    engine.clear()?;
                    println!("History cleared.");
                }
            }
            "m" => match deck.toggle(&config.audio, feedback) {
                Ok(true) => println!("Music on."),
                Ok(false) => println!("Music off."),
                Err(WheelError::MusicUnset) => {
                    println!("Set a music URL first (--music-url or the settings file).");
                }
                Err(err) => return Err(err),
            },
            "q" => break,
            other => println!("Unknown command `{other}`."),
        }
    }

    if engine.is_spinning()? {
        engine.stop()?;
    }
    Ok(())
}

fn run_draw(engine: &DrawEngine, count: usize, spin_ms: u64) -> lucky_wheel_core::Result<()> {
    tracing::info!(count, spin_ms, "running batch draw");

    for _ in 0..count {
        match engine.start() {
            Ok(_) => {}
            Err(err) if err.is_exhausted() => {
                println!("No more numbers available.");
                break;
            }
            Err(err) => return Err(err),
        }

        std::thread::sleep(Duration::from_millis(spin_ms));

        if let StopOutcome::Won(item) = engine.stop()? {
            println!("#{} {}", engine.history()?.len(), item.number);
        }
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Lucky wheel number drawing", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct SettingsArgs {
    /// JSON settings file. Command line flags override its values.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Smallest drawable number.
    #[arg(long, global = true, allow_negative_numbers = true)]
    min: Option<i64>,
    /// Largest drawable number.
    #[arg(long, global = true, allow_negative_numbers = true)]
    max: Option<i64>,
    /// Comma separated numbers drawn first, in order, e.g. "10, 25, 99".
    #[arg(short, long, global = true)]
    priority: Option<String>,
    /// Cue and music volume between 0.0 and 1.0.
    #[arg(long, global = true)]
    volume: Option<f32>,
    /// Background music track.
    #[arg(long, global = true)]
    music_url: Option<String>,
    /// Seed for reproducible draws.
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl SettingsArgs {
    fn resolve(&self) -> lucky_wheel_core::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_json_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(min) = self.min {
            config.draw.min = min;
        }
        if let Some(max) = self.max {
            config.draw.max = max;
        }
        if let Some(priority) = &self.priority {
            config.draw.priority_list = parse_priority_list(priority);
        }
        if let Some(volume) = self.volume {
            config.audio.volume = volume;
        }
        if let Some(url) = &self.music_url {
            config.audio.music_url = url.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive session driven from the keyboard (default).
    Play,
    /// Draw a batch of numbers without interaction.
    Draw {
        /// How many numbers to draw.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Spin duration before each stop, in milliseconds.
        #[arg(long, default_value_t = 500)]
        spin_ms: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_defaults() {
        let cli = Cli::try_parse_from([
            "lucky-wheel",
            "--min",
            "-5",
            "--max",
            "5",
            "--priority",
            "3, x, -2",
            "draw",
            "-n",
            "4",
        ])
        .unwrap();

        let config = cli.settings.resolve().unwrap();
        assert_eq!(config.draw.min, -5);
        assert_eq!(config.draw.max, 5);
        assert_eq!(config.draw.priority_list, vec![3, -2]);
        assert!(matches!(cli.command, Some(Commands::Draw { count: 4, .. })));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let cli = Cli::try_parse_from(["lucky-wheel", "--min", "9", "--max", "1"]).unwrap();
        assert!(matches!(
            cli.settings.resolve(),
            Err(WheelError::InvalidRange { min: 9, max: 1 })
        ));
    }
}
