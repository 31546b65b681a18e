use super::error::Result;
use super::MediaSource;
use tokio::sync::oneshot;

/// Internal command type used inside the sequencer engine
#[derive(Debug)]
pub enum SequencerCommand {
	// Commands with response
	Start {
		response: oneshot::Sender<Result<()>>,
	},
	SelectVideo {
		index: usize,
		response: oneshot::Sender<Result<()>>,
	},

	// Fire-and-forget
	MediaEnded(MediaSource),
}

impl SequencerCommand {
	pub const fn name(&self) -> &'static str {
		match self {
			Self::Start { .. } => "start",
			Self::SelectVideo { .. } => "select_video",
			Self::MediaEnded(_) => "media_ended",
		}
	}
}
