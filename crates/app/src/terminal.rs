use std::io::{self, Write};
use std::sync::Arc;

use chrono::Local;
use lucky_wheel_core::{DisplaySnapshot, DrawEngine, FeedbackPort, Result, Ticker};

/// Terminal stand-in for tone playback: rings the bell on a win and logs
/// the music transport.
#[derive(Debug, Default)]
pub struct BellFeedback;

impl FeedbackPort for BellFeedback {
    fn on_tick(&self, volume: f32) -> Result<()> {
        tracing::trace!(volume, "tick");
        Ok(())
    }

    fn on_win(&self, volume: f32) -> Result<()> {
        let mut err = io::stderr().lock();
        err.write_all(b"\x07")?;
        err.flush()?;
        tracing::debug!(volume, "win bell");
        Ok(())
    }

    fn play_music(&self, volume: f32) -> Result<()> {
        tracing::info!(volume, "music playing");
        Ok(())
    }

    fn pause_music(&self) -> Result<()> {
        tracing::info!("music paused");
        Ok(())
    }

    fn set_music(&self, url: &str) -> Result<()> {
        tracing::debug!(url, "music track selected");
        Ok(())
    }

    fn set_volume(&self, volume: f32) -> Result<()> {
        tracing::debug!(volume, "music volume set");
        Ok(())
    }
}

/// Redraws the number line while a spin is running. Observes the engine
/// through snapshots only.
pub fn spawn_renderer(engine: Arc<DrawEngine>, interval: std::time::Duration) -> Ticker {
    Ticker::every(interval, move || match engine.snapshot() {
        Ok(snapshot) => {
            if snapshot.is_spinning {
                print!("\r  {}   ", number_label(snapshot.current_number));
                io::stdout().flush().is_ok()
            } else {
                true
            }
        }
        Err(_) => false,
    })
}

pub fn number_label(number: Option<i64>) -> String {
    number.map_or_else(|| "---".to_string(), |n| n.to_string())
}

pub fn print_status(snapshot: &DisplaySnapshot) {
    println!(
        "Range: {} | Drawn: {}",
        snapshot.range,
        snapshot.drawn_count()
    );
}

pub fn print_history(snapshot: &DisplaySnapshot) {
    if snapshot.history.is_empty() {
        println!("No numbers drawn yet.");
        return;
    }

    for (ordinal, item) in snapshot.numbered_history() {
        let time = item.timestamp.with_timezone(&Local).format("%H:%M:%S");
        println!("#{ordinal:<4} {:>8}   {time}", item.number);
    }
}
