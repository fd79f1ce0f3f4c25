use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::feedback::emit;
use crate::{
    AppConfig, AudioConfig, DisplaySnapshot, DrawConfig, DrawHistoryItem, DrawSession,
    FeedbackPort, Result, StartOutcome, StopOutcome, Ticker, TimingConfig, WheelError,
};

/// Result of [`DrawEngine::toggle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    Stopped(DrawHistoryItem),
}

/// High level draw engine façade.
///
/// Wraps a [`DrawSession`] behind a single mutex together with the spin
/// animation timer and the celebration timer, so `start`, `stop`, `clear`
/// and timer callbacks are serialized. Feedback cues are sent after the
/// lock is released and their failures are only logged.
pub struct DrawEngine {
    shared: Arc<Mutex<EngineState>>,
    feedback: Arc<dyn FeedbackPort>,
}

struct EngineState {
    session: DrawSession,
    audio: AudioConfig,
    timing: TimingConfig,
    spin_timer: Option<Ticker>,
    celebration_timer: Option<Ticker>,
}

impl EngineState {
    fn cancel_timers(&mut self) {
        if let Some(mut timer) = self.spin_timer.take() {
            timer.cancel();
        }
        if let Some(mut timer) = self.celebration_timer.take() {
            timer.cancel();
        }
    }
}

impl DrawEngine {
    /// Creates an engine seeded from system entropy.
    pub fn new(config: AppConfig, feedback: Arc<dyn FeedbackPort>) -> Result<Self> {
        config.audio.validate()?;
        let session = DrawSession::new(config.draw.clone())?;
        Ok(Self::from_session(session, config, feedback))
    }

    /// Creates an engine whose draws are reproducible for a given seed.
    pub fn with_seed(config: AppConfig, feedback: Arc<dyn FeedbackPort>, seed: u64) -> Result<Self> {
        config.audio.validate()?;
        let session = DrawSession::with_seed(config.draw.clone(), seed)?;
        Ok(Self::from_session(session, config, feedback))
    }

    fn from_session(session: DrawSession, config: AppConfig, feedback: Arc<dyn FeedbackPort>) -> Self {
        let state = EngineState {
            session,
            audio: config.audio,
            timing: config.timing,
            spin_timer: None,
            celebration_timer: None,
        };
        Self {
            shared: Arc::new(Mutex::new(state)),
            feedback,
        }
    }

    /// Begins a spin and its animation timer. Fails with
    /// [`WheelError::Exhausted`] when nothing is left to draw.
    pub fn start(&self) -> Result<StartOutcome> {
        let mut state = self.lock()?;
        let outcome = state.session.start()?;

        if let StartOutcome::Started { epoch } = outcome {
            if let Some(mut timer) = state.celebration_timer.take() {
                timer.cancel();
            }
            let interval = state.timing.tick_interval();
            let shared = Arc::downgrade(&self.shared);
            let feedback = self.feedback.clone();
            state.spin_timer = Some(Ticker::every(interval, move || {
                animate_frame(&shared, feedback.as_ref(), epoch)
            }));
        }

        Ok(outcome)
    }

    /// Cancels the animation timer, then commits a winner.
    pub fn stop(&self) -> Result<StopOutcome> {
        let (outcome, volume) = {
            let mut state = self.lock()?;
            if let Some(mut timer) = state.spin_timer.take() {
                timer.cancel();
            }

            let outcome = state.session.stop()?;
            if let StopOutcome::Won(_) = outcome {
                let epoch = state.session.epoch();
                let delay = state.timing.celebration();
                let shared = Arc::downgrade(&self.shared);
                state.celebration_timer = Some(Ticker::once(delay, move || {
                    finish_celebration(&shared, epoch);
                }));
            }
            (outcome, state.audio.volume)
        };

        if let StopOutcome::Won(_) = outcome {
            if volume > 0.0 {
                emit("win", self.feedback.on_win(volume));
            }
        }

        Ok(outcome)
    }

    /// Starts when idle, stops when spinning.
    pub fn toggle(&self) -> Result<ToggleOutcome> {
        if self.is_spinning()? {
            match self.stop()? {
                StopOutcome::Won(item) => Ok(ToggleOutcome::Stopped(item)),
                StopOutcome::NotSpinning => Err(WheelError::msg("spin ended before it was stopped")),
            }
        } else {
            self.start()?;
            Ok(ToggleOutcome::Started)
        }
    }

    /// Empties the history and returns to idle, abandoning any spin.
    /// Callers are expected to have confirmed this with the user.
    pub fn clear(&self) -> Result<()> {
        let mut state = self.lock()?;
        state.cancel_timers();
        state.session.clear();
        Ok(())
    }

    /// Applies a new configuration snapshot. Invalid settings are rejected
    /// and the previous configuration stays in force.
    pub fn set_config(&self, config: AppConfig) -> Result<()> {
        config.audio.validate()?;
        let mut state = self.lock()?;
        state.session.set_config(config.draw)?;
        state.audio = config.audio;
        state.timing = config.timing;
        Ok(())
    }

    pub fn set_draw_config(&self, draw: DrawConfig) -> Result<()> {
        self.lock()?.session.set_config(draw)
    }

    pub fn config(&self) -> Result<AppConfig> {
        let state = self.lock()?;
        Ok(AppConfig {
            draw: state.session.config().clone(),
            audio: state.audio.clone(),
            timing: state.timing,
        })
    }

    pub fn snapshot(&self) -> Result<DisplaySnapshot> {
        Ok(self.lock()?.session.snapshot())
    }

    pub fn current_number(&self) -> Result<Option<i64>> {
        Ok(self.lock()?.session.current_number())
    }

    pub fn is_spinning(&self) -> Result<bool> {
        Ok(self.lock()?.session.is_spinning())
    }

    pub fn is_celebrating(&self) -> Result<bool> {
        Ok(self.lock()?.session.is_celebrating())
    }

    /// Committed draws, newest first.
    pub fn history(&self) -> Result<Vec<DrawHistoryItem>> {
        Ok(self.lock()?.session.history().all())
    }

    fn lock(&self) -> Result<MutexGuard<'_, EngineState>> {
        self.shared
            .lock()
            .map_err(|_| WheelError::msg("draw engine state has been poisoned"))
    }
}

impl std::fmt::Debug for DrawEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawEngine").finish()
    }
}

/// Spin timer callback. Returns `false` once the spin it belongs to is over.
fn animate_frame(shared: &Weak<Mutex<EngineState>>, feedback: &dyn FeedbackPort, epoch: u64) -> bool {
    let Some(shared) = shared.upgrade() else {
        return false;
    };

    let volume = {
        let Ok(mut state) = shared.lock() else {
            return false;
        };
        if state.session.animate(epoch).is_none() {
            return false;
        }
        state.audio.volume
    };

    if volume > 0.0 {
        emit("tick", feedback.on_tick(volume));
    }
    true
}

fn finish_celebration(shared: &Weak<Mutex<EngineState>>, epoch: u64) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let Ok(mut state) = shared.lock() else {
        return;
    };
    if state.session.end_celebration(epoch) {
        tracing::debug!(epoch, "celebration finished");
    }
}
