use super::LightingPattern;
use serde::{Deserialize, Serialize};

/// Which media element reported completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum MediaSource {
	Narration,
	Video(usize),
}

/// What the sequencer is currently waiting on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
	/// Not started yet
	#[default]
	Idle,
	/// Startup delay armed
	Starting,
	/// Waiting for the narration of `step` to end
	Narrating { step: usize },
	/// Video of `step` on screen, deadline armed
	VideoFocused { step: usize, video: usize },
	/// Pattern of `step` applied, deadline armed
	Lighting { step: usize },
	/// User-selected video playing, automatic mode suspended
	Manual { video: usize },
	/// Pass finished, restart deadline armed
	RestartPause,
	/// Nothing pending can move the sequence; only a video selection recovers
	Stalled { step: Option<usize>, reason: String },
}

impl Phase {
	pub const fn is_stalled(&self) -> bool {
		matches!(self, Self::Stalled { .. })
	}

	/// Step index the phase belongs to, if any
	pub const fn step(&self) -> Option<usize> {
		match self {
			Self::Narrating { step } | Self::VideoFocused { step, .. } | Self::Lighting { step } => Some(*step),
			Self::Stalled { step, .. } => *step,
			_ => None,
		}
	}
}

/// Observable snapshot published after every transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SequencerState {
	pub cursor: usize,
	pub step_count: usize,
	/// Automatic progression active
	pub auto_active: bool,
	/// Set while a user-selected video plays
	pub manual_video: Option<usize>,
	pub phase: Phase,
	pub focused_video: Option<usize>,
	pub lighting: Option<LightingPattern>,
	/// Display text of the step being presented
	pub caption: Option<String>,
	/// Completed passes through the script
	pub passes: u64,
	pub last_error: Option<String>,
}

impl SequencerState {
	pub fn new(step_count: usize) -> Self {
		Self {
			step_count,
			..Self::default()
		}
	}

	pub const fn is_complete(&self) -> bool {
		self.cursor >= self.step_count
	}
}
