use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::error::{Result, SequencerError};
use super::{MediaSource, Sequencer, SequencerCommand, SequencerEngine, SequencerState, Stage, StoryScript};

/// Handed to media surfaces so they can report completion back to the engine
#[derive(Debug, Clone)]
pub struct MediaNotifier {
	command_tx: mpsc::UnboundedSender<SequencerCommand>,
}

impl MediaNotifier {
	pub fn media_ended(&self, source: MediaSource) -> Result<()> {
		self
			.command_tx
			.send(SequencerCommand::MediaEnded(source))
			.map_err(|_| SequencerError::Internal("Failed to send command".into()))
	}

	pub fn narration_ended(&self) -> Result<()> {
		self.media_ended(MediaSource::Narration)
	}

	pub fn video_ended(&self, index: usize) -> Result<()> {
		self.media_ended(MediaSource::Video(index))
	}
}

/// The sequencer actor façade
pub struct StoryPlayer {
	command_tx: mpsc::UnboundedSender<SequencerCommand>,
	state_rx: watch::Receiver<SequencerState>,
	task_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
	cancel_token: CancellationToken,
}

impl StoryPlayer {
	/// Validate the script against the stage and spawn the engine task.
	///
	/// `build_stage` receives the notifier its surfaces use to report media completion.
	pub fn new<F>(script: StoryScript, build_stage: F) -> Result<Self>
	where
		F: FnOnce(MediaNotifier) -> Stage,
	{
		let cancel_token = CancellationToken::new();
		let (command_tx, command_rx) = mpsc::unbounded_channel();

		let stage = build_stage(MediaNotifier { command_tx: command_tx.clone() });
		let machine = Sequencer::new(script, stage)?;

		let engine = SequencerEngine::new(machine);
		let state_rx = engine.subscribe();

		let task_handle = tokio::spawn(engine.run(command_rx, cancel_token.clone()));

		info!("StoryPlayer created");

		Ok(Self {
			command_tx,
			state_rx,
			task_handle: Arc::new(Mutex::new(Some(task_handle))),
			cancel_token,
		})
	}

	async fn request(&self, build: impl FnOnce(oneshot::Sender<Result<()>>) -> SequencerCommand) -> Result<()> {
		let (tx, rx) = oneshot::channel();
		self.command_tx.send(build(tx)).map_err(|_| SequencerError::Internal("Failed to send command".into()))?;

		rx.await.map_err(|_| SequencerError::Internal("Engine dropped".into()))?
	}

	/// Begin the story after the script's startup delay
	pub async fn start(&self) -> Result<()> {
		self.request(|response| SequencerCommand::Start { response }).await
	}

	/// User picked a video: pre-empt the current step and play it
	pub async fn select_video(&self, index: usize) -> Result<()> {
		self.request(|response| SequencerCommand::SelectVideo { index, response }).await
	}

	pub fn notifier(&self) -> MediaNotifier {
		MediaNotifier {
			command_tx: self.command_tx.clone(),
		}
	}

	pub fn media_ended(&self, source: MediaSource) -> Result<()> {
		self.notifier().media_ended(source)
	}

	// Access state
	pub fn subscribe(&self) -> watch::Receiver<SequencerState> {
		self.state_rx.clone()
	}
	pub fn current_state(&self) -> SequencerState {
		self.state_rx.borrow().clone()
	}

	// Shutdown the engine task
	pub async fn shutdown(&self) {
		self.cancel_token.cancel();
		if let Some(handle) = self.task_handle.lock().await.take() {
			let _ = handle.await;
		}
	}
}

impl Drop for StoryPlayer {
	fn drop(&mut self) {
		self.cancel_token.cancel();
	}
}
