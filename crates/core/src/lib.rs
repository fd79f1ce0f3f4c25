//! Core library for the Lucky Wheel number drawing tool.
//!
//! A user starts a spin, stops it, and the engine commits a winning number
//! that is never drawn twice. Numbers on the priority list win first, in
//! order; after that every remaining number in the range is equally
//! likely. Audio and visual cues are handed to a host supplied
//! [`FeedbackPort`].

pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod history;
pub mod pool;
pub mod selector;
pub mod spin;
pub mod timeline;

pub use audio::MusicDeck;
pub use config::{parse_priority_list, AppConfig, AudioConfig, DrawConfig, TimingConfig};
pub use engine::{DrawEngine, ToggleOutcome};
pub use error::{Result, WheelError};
pub use feedback::{FeedbackCue, FeedbackPort, NullFeedback, RecordingFeedback};
pub use history::{DrawHistoryItem, HistoryLedger};
pub use pool::{available_pool, DrawRange};
pub use selector::{available_priority, select_winner};
pub use spin::{DisplaySnapshot, DrawSession, SpinState, StartOutcome, StopOutcome};
pub use timeline::Ticker;
