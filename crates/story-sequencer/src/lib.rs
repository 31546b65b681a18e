//! Scripted story playback: narration, focused videos and lighting patterns
//! walked in order by a single-task state machine, with user video selection
//! pre-empting the current step.

pub mod core;

pub use crate::core::{MediaNotifier, Phase, SequencerError, SequencerState, Stage, Step, StoryPlayer, StoryScript};
