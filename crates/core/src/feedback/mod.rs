//! Fire-and-forget audio/visual cues emitted by the draw engine and its host.

use std::sync::{Mutex, MutexGuard};

use crate::{Result, WheelError};

/// Host capability that renders cues. Implementations may fail; callers in
/// this crate log the failure and carry on.
pub trait FeedbackPort: Send + Sync {
    /// One animation frame of a spin.
    ///
    /// Sent after the engine lock is released, so a single tick from a frame
    /// that was already in flight may arrive after the matching `on_win`.
    /// The displayed number is never changed by such a frame.
    fn on_tick(&self, volume: f32) -> Result<()>;

    /// A winner was committed.
    fn on_win(&self, volume: f32) -> Result<()>;

    fn play_music(&self, volume: f32) -> Result<()>;

    fn pause_music(&self) -> Result<()>;

    fn set_music(&self, url: &str) -> Result<()>;

    fn set_volume(&self, volume: f32) -> Result<()>;
}

/// Port that ignores every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl FeedbackPort for NullFeedback {
    fn on_tick(&self, _volume: f32) -> Result<()> {
        Ok(())
    }

    fn on_win(&self, _volume: f32) -> Result<()> {
        Ok(())
    }

    fn play_music(&self, _volume: f32) -> Result<()> {
        Ok(())
    }

    fn pause_music(&self) -> Result<()> {
        Ok(())
    }

    fn set_music(&self, _url: &str) -> Result<()> {
        Ok(())
    }

    fn set_volume(&self, _volume: f32) -> Result<()> {
        Ok(())
    }
}

/// A cue as observed by [`RecordingFeedback`].
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackCue {
    Tick(f32),
    Win(f32),
    PlayMusic(f32),
    PauseMusic,
    SetMusic(String),
    SetVolume(f32),
}

/// Port that keeps every cue it receives, optionally failing each call
/// after recording it. Handy for hosts that replay cues and for tests.
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    cues: Mutex<Vec<FeedbackCue>>,
    failing: bool,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records cues but reports every call as failed.
    pub fn failing() -> Self {
        Self {
            cues: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn cues(&self) -> Vec<FeedbackCue> {
        self.lock().map(|cues| cues.clone()).unwrap_or_default()
    }

    pub fn count(&self, predicate: impl Fn(&FeedbackCue) -> bool) -> usize {
        self.cues().iter().filter(|cue| predicate(cue)).count()
    }

    fn record(&self, cue: FeedbackCue) -> Result<()> {
        self.lock()?.push(cue);
        if self.failing {
            Err(WheelError::feedback("playback rejected by host"))
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<FeedbackCue>>> {
        self.cues
            .lock()
            .map_err(|_| WheelError::msg("feedback recorder has been poisoned"))
    }
}

impl FeedbackPort for RecordingFeedback {
    fn on_tick(&self, volume: f32) -> Result<()> {
        self.record(FeedbackCue::Tick(volume))
    }

    fn on_win(&self, volume: f32) -> Result<()> {
        self.record(FeedbackCue::Win(volume))
    }

    fn play_music(&self, volume: f32) -> Result<()> {
        self.record(FeedbackCue::PlayMusic(volume))
    }

    fn pause_music(&self) -> Result<()> {
        self.record(FeedbackCue::PauseMusic)
    }

    fn set_music(&self, url: &str) -> Result<()> {
        self.record(FeedbackCue::SetMusic(url.to_string()))
    }

    fn set_volume(&self, volume: f32) -> Result<()> {
        self.record(FeedbackCue::SetVolume(volume))
    }
}

/// Runs a feedback call, logging instead of propagating a failure.
pub(crate) fn emit(cue: &'static str, result: Result<()>) {
    if let Err(err) = result {
        tracing::warn!(cue, error = %err, "feedback cue failed");
    }
}
