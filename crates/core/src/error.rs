/// Result alias that carries the custom [`WheelError`] type.
pub type Result<T> = std::result::Result<T, WheelError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum WheelError {
    /// Every number in the configured range has already been drawn and no
    /// priority number is left. Recoverable by clearing the history or
    /// widening the range.
    #[error("no numbers left to draw in the configured range")]
    Exhausted,
    /// The configured range is empty.
    #[error("invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: i64, max: i64 },
    #[error("volume {0} is outside 0.0..=1.0")]
    InvalidVolume(f32),
    /// Music playback was requested without a configured track.
    #[error("no background music configured")]
    MusicUnset,
    /// Raised by feedback ports. The engine only ever logs these.
    #[error("feedback channel failed: {0}")]
    Feedback(String),
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl WheelError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn feedback<T: Into<String>>(msg: T) -> Self {
        Self::Feedback(msg.into())
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

impl From<&str> for WheelError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for WheelError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
