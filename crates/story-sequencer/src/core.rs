mod commands;
mod engine;
mod error;
mod machine;
mod player;
mod script;
mod stage;
mod state;

pub use engine::SequencerEngine;
pub use error::{PlaybackError, Result, SequencerError};
pub use machine::{Deadline, DeadlineKind, Sequencer};
pub use player::{MediaNotifier, StoryPlayer};
pub use script::{AudioStep, LightingPattern, LightingStep, Step, StoryScript, VideoStep};
pub use script::{DEFAULT_RESTART_PAUSE_MS, DEFAULT_STARTUP_DELAY_MS};
pub use stage::{AudioSurface, LightingSurface, Stage, VideoSurface};
pub use state::{MediaSource, Phase, SequencerState};

use commands::SequencerCommand;

/// Time in milliseconds
pub type TimeMs = u64;
