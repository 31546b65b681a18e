use thiserror::Error;

pub type Result<T> = std::result::Result<T, SequencerError>;

#[derive(Error, Debug)]
pub enum SequencerError {
	#[error("Invalid script: {0}")]
	InvalidScript(String),

	#[error("Video index {index} out of range ({available} videos on stage)")]
	VideoIndexOutOfRange { index: usize, available: usize },

	#[error("Sequencer already started")]
	AlreadyStarted,

	#[error("Failed to read script {path}: {source}")]
	ScriptIo {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse script: {0}")]
	ScriptParse(#[from] serde_json::Error),

	#[error("Internal error: {0}")]
	Internal(String),
}

/// A playback request declined by the host (e.g. autoplay policy)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
	#[error("Playback of {media} rejected: {reason}")]
	Rejected { media: String, reason: String },
}

impl PlaybackError {
	pub fn rejected(media: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::Rejected {
			media: media.into(),
			reason: reason.into(),
		}
	}
}
