use crate::feedback::emit;
use crate::{AudioConfig, FeedbackPort, Result, WheelError};

/// Background music transport kept in step with the audio settings.
///
/// Draw cues go through [`crate::DrawEngine`]; the deck only drives the
/// music side of the [`FeedbackPort`] and is owned by the host.
#[derive(Debug, Default, Clone)]
pub struct MusicDeck {
    playing: bool,
}

impl MusicDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the user asked for music to play.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Pushes the current settings to the port. Call after every settings
    /// change and after toggling.
    pub fn sync(&self, audio: &AudioConfig, port: &dyn FeedbackPort) {
        if !audio.has_music() {
            emit("pause_music", port.pause_music());
            return;
        }

        emit("set_music", port.set_music(audio.music_url.trim()));
        emit("set_volume", port.set_volume(audio.volume));
        if self.playing {
            emit("play_music", port.play_music(audio.volume));
        } else {
            emit("pause_music", port.pause_music());
        }
    }

    /// Flips between playing and paused. Fails with
    /// [`WheelError::MusicUnset`] when no track is configured.
    pub fn toggle(&mut self, audio: &AudioConfig, port: &dyn FeedbackPort) -> Result<bool> {
        if !audio.has_music() {
            return Err(WheelError::MusicUnset);
        }

        self.playing = !self.playing;
        tracing::info!(playing = self.playing, track = %audio.music_url, "music toggled");
        self.sync(audio, port);
        Ok(self.playing)
    }
}
