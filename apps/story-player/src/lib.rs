mod config;
pub mod console;
mod input;

pub use config::Config;
pub use input::Input;

use anyhow::Context;
use story_sequencer::core::{SequencerState, StoryPlayer};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use console::AutoplayGate;

/// Build the simulated stage, start the story and serve stdin until quit or cancellation
pub async fn run<R>(config: Config, input: R, cancel: CancellationToken) -> anyhow::Result<()>
where
	R: AsyncBufRead + Unpin,
{
	let script = config.load_script().context("Failed to load story script")?;
	info!("📜 Loaded story with {} steps", script.len());

	let gate = AutoplayGate::new(config.block_autoplay);
	let player = StoryPlayer::new(script, |notifier| console::stage(&config, &gate, &notifier)).context("Story does not fit the stage")?;

	player.start().await?;
	spawn_state_logger(&player, cancel.clone());

	let mut lines = input.lines();
	loop {
		tokio::select! {
			() = cancel.cancelled() => break,
			line = lines.next_line() => {
				let Some(line) = line? else {
					info!("Input closed, playing on until interrupted");
					cancel.cancelled().await;
					break;
				};
				match Input::parse(&line) {
					Input::SelectVideo(index) => {
						gate.user_gesture();
						if let Err(e) = player.select_video(index).await {
							warn!("Selection rejected: {}", e);
						}
					}
					Input::State => println!("{}", serde_json::to_string_pretty(&player.current_state())?),
					Input::Quit => break,
					Input::Empty => {}
					Input::Unknown(text) => warn!("Unknown input '{}' (try: select <n>, state, quit)", text),
				}
			}
		}
	}

	player.shutdown().await;
	Ok(())
}

/// Log stalls and pass completions as they are published
fn spawn_state_logger(player: &StoryPlayer, cancel: CancellationToken) {
	let mut state_rx = player.subscribe();

	tokio::spawn(async move {
		let mut last = SequencerState::default();
		loop {
			tokio::select! {
				() = cancel.cancelled() => break,
				changed = state_rx.changed() => {
					if changed.is_err() {
						break;
					}
					let state = state_rx.borrow_and_update().clone();
					if state.phase.is_stalled() && !last.phase.is_stalled() {
						error!("⏸ Story stalled: {}. Select a video to continue.", state.last_error.as_deref().unwrap_or("unknown error"));
					}
					if state.passes > last.passes {
						info!("🏁 Completed pass {}", state.passes);
					}
					last = state;
				}
			}
		}
	});
}
