use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{Sequencer, SequencerCommand, SequencerState};

/// Real timer backing the machine's single deadline slot
#[derive(Debug, Clone, Copy)]
struct ArmedTimer {
	id: u64,
	at: Instant,
}

// ============================================================================
// SequencerEngine
// ============================================================================

pub struct SequencerEngine {
	machine: Sequencer,
	state_tx: watch::Sender<SequencerState>,
	state_rx: watch::Receiver<SequencerState>,
}

impl SequencerEngine {
	pub fn new(machine: Sequencer) -> Self {
		let (state_tx, state_rx) = watch::channel(machine.state().clone());
		info!("SequencerEngine created ({} steps)", machine.script().len());
		Self { machine, state_tx, state_rx }
	}

	pub fn subscribe(&self) -> watch::Receiver<SequencerState> {
		self.state_rx.clone()
	}

	pub async fn run(mut self, mut command_rx: mpsc::UnboundedReceiver<SequencerCommand>, cancel: CancellationToken) {
		let mut timer: Option<ArmedTimer> = None;

		info!("Sequencer engine started");

		loop {
			self.sync_timer(&mut timer);

			tokio::select! {
				// Sleep only while a deadline is armed
				() = async {
					if let Some(t) = timer {
						sleep_until(t.at).await;
					} else {
						std::future::pending::<()>().await;
					}
				} => {
					if let Some(t) = timer.take() {
						self.machine.on_deadline(t.id);
						self.publish();
					}
				}

				Some(cmd) = command_rx.recv() => {
					debug!("Handling {} command", cmd.name());
					self.handle_command(cmd);
					self.publish();
				}

				() = cancel.cancelled() => {
					info!("Sequencer engine cancelled");
					break;
				}
			}
		}
	}

	fn handle_command(&mut self, cmd: SequencerCommand) {
		match cmd {
			SequencerCommand::Start { response } => {
				let _ = response.send(self.machine.start());
			}
			SequencerCommand::SelectVideo { index, response } => {
				let _ = response.send(self.machine.interrupt(index));
			}
			SequencerCommand::MediaEnded(source) => self.machine.on_media_ended(source),
		}
	}

	/// Mirror the machine's deadline slot. A new id means the old timer was superseded.
	fn sync_timer(&self, timer: &mut Option<ArmedTimer>) {
		match self.machine.armed_deadline() {
			Some(d) if timer.map(|t| t.id) != Some(d.id) => {
				*timer = Some(ArmedTimer {
					id: d.id,
					at: Instant::now() + d.after,
				});
			}
			Some(_) => {}
			None => *timer = None,
		}
	}

	fn publish(&self) {
		self.state_tx.send_if_modified(|current| {
			let next = self.machine.state();
			if current == next {
				false
			} else {
				current.clone_from(next);
				true
			}
		});
	}
}
