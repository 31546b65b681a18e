use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::{PlaybackError, Result, SequencerError};
use super::{MediaSource, Phase, SequencerState, Stage, Step, StoryScript};

/// Why a deadline was armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineKind {
	Startup,
	/// Display duration of the video or lighting step at this index
	StepElapsed(usize),
	Restart,
}

/// The single pending timer. Arming a new one supersedes the old id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
	pub id: u64,
	pub kind: DeadlineKind,
	pub after: Duration,
}

/// Synchronous story state machine.
///
/// Owns the script, the stage and the only deadline slot. Every transition goes
/// through `advance`, `interrupt`, `on_media_ended` or `on_deadline`; the caller
/// is responsible for turning `armed_deadline` into a real timer and feeding the
/// fire back with its id.
#[derive(Debug)]
pub struct Sequencer {
	script: StoryScript,
	stage: Stage,
	state: SequencerState,
	deadline: Option<Deadline>,
	next_deadline_id: u64,
}

impl Sequencer {
	pub fn new(script: StoryScript, stage: Stage) -> Result<Self> {
		script.validate(stage.video_count())?;
		let state = SequencerState::new(script.len());

		Ok(Self {
			script,
			stage,
			state,
			deadline: None,
			next_deadline_id: 0,
		})
	}

	pub const fn state(&self) -> &SequencerState {
		&self.state
	}

	pub const fn script(&self) -> &StoryScript {
		&self.script
	}

	pub const fn armed_deadline(&self) -> Option<Deadline> {
		self.deadline
	}

	// ------------------------------------------------------------------
	// Deadline slot
	// ------------------------------------------------------------------

	fn arm(&mut self, kind: DeadlineKind, after: Duration) {
		if let Some(old) = self.deadline.take() {
			debug!("Deadline {} ({:?}) superseded", old.id, old.kind);
		}
		self.next_deadline_id += 1;
		self.deadline = Some(Deadline {
			id: self.next_deadline_id,
			kind,
			after,
		});
	}

	fn cancel_deadline(&mut self) {
		if let Some(old) = self.deadline.take() {
			debug!("Deadline {} ({:?}) cancelled", old.id, old.kind);
		}
	}

	// ------------------------------------------------------------------
	// Operations
	// ------------------------------------------------------------------

	/// Leave `Idle` and arm the startup delay
	pub fn start(&mut self) -> Result<()> {
		if self.state.phase != Phase::Idle {
			return Err(SequencerError::AlreadyStarted);
		}
		self.state.phase = Phase::Starting;
		self.arm(DeadlineKind::Startup, self.script.startup_delay());
		info!("Story starting in {}ms ({} steps)", self.script.startup_delay_ms, self.script.len());
		Ok(())
	}

	/// Present the step under the cursor, or schedule the restart after a full pass
	pub fn advance(&mut self) {
		self.cancel_deadline();

		let cursor = self.state.cursor;
		let Some(step) = self.script.step(cursor).cloned() else {
			self.finish_pass();
			return;
		};

		self.state.auto_active = true;
		self.state.caption = Some(step.text().to_string());
		info!("Starting step {}: {}", cursor, step.text());

		match step {
			Step::Audio(audio) => self.narrate(cursor, &audio.src),
			Step::Video(video) => self.narrate(cursor, &video.audio_src),
			Step::Lighting(lighting) => {
				self.stage.broadcast_lighting(lighting.pattern);
				self.state.lighting = Some(lighting.pattern);
				self.state.phase = Phase::Lighting { step: cursor };
				self.arm(DeadlineKind::StepElapsed(cursor), Duration::from_millis(lighting.duration_ms));
			}
		}
	}

	/// Manual video selection. Pre-empts the current step without moving the cursor.
	pub fn interrupt(&mut self, video: usize) -> Result<()> {
		let available = self.stage.video_count();
		if video >= available {
			return Err(SequencerError::VideoIndexOutOfRange { index: video, available });
		}

		info!("User selected video {}", video);
		self.state.auto_active = false;
		self.cancel_deadline();
		self.state.manual_video = Some(video);
		self.stage.stop_narration();

		let result = self.stage.focus_video(video, None);
		self.state.focused_video = self.stage.focused();

		match result {
			Ok(()) => self.state.phase = Phase::Manual { video },
			Err(e) => {
				self.state.manual_video = None;
				self.stall(None, &e);
			}
		}
		Ok(())
	}

	pub fn on_media_ended(&mut self, source: MediaSource) {
		match (source, self.state.phase.clone()) {
			(MediaSource::Narration, Phase::Narrating { step }) => self.narration_finished(step),

			(MediaSource::Video(ended), Phase::VideoFocused { video, .. }) if ended == video => {
				self.cancel_deadline();
				self.leave_video(video);
				self.state.cursor += 1;
				self.advance();
			}

			(MediaSource::Video(ended), Phase::Manual { video }) if ended == video => {
				info!("Manual playback of video {} finished, resuming at step {}", video, self.state.cursor);
				self.leave_video(video);
				self.state.manual_video = None;
				self.advance();
			}

			(source, phase) => debug!("Ignoring {:?} end during {:?}", source, phase),
		}
	}

	/// Deadline fired. Stale ids are ignored.
	pub fn on_deadline(&mut self, id: u64) {
		let Some(deadline) = self.deadline.filter(|d| d.id == id) else {
			debug!("Ignoring stale deadline {}", id);
			return;
		};
		self.deadline = None;

		match deadline.kind {
			DeadlineKind::Startup => self.advance(),
			DeadlineKind::StepElapsed(step) => {
				match self.state.phase.clone() {
					Phase::VideoFocused { video, .. } => self.leave_video(video),
					Phase::Lighting { .. } => {}
					phase => {
						warn!("Step {} deadline fired during {:?}", step, phase);
						return;
					}
				}
				self.state.cursor += 1;
				self.advance();
			}
			DeadlineKind::Restart => {
				info!("Restarting story");
				self.state.cursor = 0;
				self.advance();
			}
		}
	}

	// ------------------------------------------------------------------
	// Transition helpers
	// ------------------------------------------------------------------

	fn narrate(&mut self, step: usize, source: &str) {
		match self.stage.play_narration(source) {
			Ok(()) => self.state.phase = Phase::Narrating { step },
			Err(e) => self.stall(Some(step), &e),
		}
	}

	fn narration_finished(&mut self, step: usize) {
		match self.script.step(step).cloned() {
			Some(Step::Video(video)) => {
				let result = self.stage.focus_video(video.index, Some(&video.src));
				self.state.focused_video = self.stage.focused();
				if let Err(e) = result {
					// Nothing is focused now; the step deadline below still moves the story on
					warn!("Video {} did not start: {}", video.index, e);
					self.state.last_error = Some(e.to_string());
				}
				self.state.phase = Phase::VideoFocused { step, video: video.index };
				self.arm(DeadlineKind::StepElapsed(step), Duration::from_millis(video.duration_ms));
			}
			_ => {
				self.state.cursor += 1;
				self.advance();
			}
		}
	}

	fn leave_video(&mut self, video: usize) {
		self.stage.unfocus_video(video);
		self.state.focused_video = self.stage.focused();
	}

	fn finish_pass(&mut self) {
		self.state.auto_active = false;
		self.state.caption = None;
		self.state.passes += 1;
		self.state.phase = Phase::RestartPause;
		info!("Story sequence completed. Waiting {}ms to restart.", self.script.restart_pause_ms);
		self.arm(DeadlineKind::Restart, self.script.restart_pause());
	}

	fn stall(&mut self, step: Option<usize>, error: &PlaybackError) {
		warn!("Playback rejected, sequence stalled until a video is selected: {}", error);
		self.cancel_deadline();
		self.state.auto_active = false;
		self.state.last_error = Some(error.to_string());
		self.state.phase = Phase::Stalled {
			step,
			reason: error.to_string(),
		};
	}
}
