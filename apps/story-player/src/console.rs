//! Terminal stand-ins for the page's audio, video and lighting elements.
//!
//! Playback is simulated: a started track spawns a timer task that reports
//! completion through the `MediaNotifier`, and pausing cancels that task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use story_sequencer::core::{AudioSurface, LightingPattern, LightingSurface, MediaNotifier, MediaSource, PlaybackError, Stage, VideoSurface};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::Config;

/// Stand-in for a browser autoplay policy: closed until the first user gesture
#[derive(Debug, Clone, Default)]
pub struct AutoplayGate {
	blocked: Arc<AtomicBool>,
}

impl AutoplayGate {
	pub fn new(blocked: bool) -> Self {
		Self {
			blocked: Arc::new(AtomicBool::new(blocked)),
		}
	}

	pub fn user_gesture(&self) {
		if self.blocked.swap(false, Ordering::SeqCst) {
			info!("User gesture received, autoplay unlocked");
		}
	}

	fn check(&self, media: &str) -> Result<(), PlaybackError> {
		if self.blocked.load(Ordering::SeqCst) {
			Err(PlaybackError::rejected(media, "NotAllowedError: autoplay requires a user gesture"))
		} else {
			Ok(())
		}
	}
}

/// A running simulated playback; cancelled on pause or replacement
struct Playback {
	notifier: MediaNotifier,
	length: Duration,
	token: Option<CancellationToken>,
}

impl Playback {
	fn new(notifier: MediaNotifier, length: Duration) -> Self {
		Self { notifier, length, token: None }
	}

	fn begin(&mut self, source: MediaSource) {
		self.cancel();
		let token = CancellationToken::new();
		let child = token.clone();
		let notifier = self.notifier.clone();
		let length = self.length;

		tokio::spawn(async move {
			tokio::select! {
				() = tokio::time::sleep(length) => {
					if let Err(e) = notifier.media_ended(source) {
						debug!("Sequencer gone before {:?} ended: {}", source, e);
					}
				}
				() = child.cancelled() => {}
			}
		});

		self.token = Some(token);
	}

	fn cancel(&mut self) {
		if let Some(token) = self.token.take() {
			token.cancel();
		}
	}
}

pub struct ConsoleNarration {
	playback: Playback,
	gate: AutoplayGate,
	muted: bool,
}

impl AudioSurface for ConsoleNarration {
	fn play(&mut self, source: &str) -> Result<(), PlaybackError> {
		self.gate.check(source)?;
		info!("🔊 Narration: {} (muted: {})", source, self.muted);
		self.playback.begin(MediaSource::Narration);
		Ok(())
	}

	fn pause(&mut self) {
		self.playback.cancel();
	}

	fn rewind(&mut self) {}

	fn set_muted(&mut self, muted: bool) {
		self.muted = muted;
	}
}

pub struct ConsoleVideo {
	index: usize,
	source: Option<String>,
	playback: Playback,
	gate: AutoplayGate,
}

impl VideoSurface for ConsoleVideo {
	fn load(&mut self, source: &str) {
		self.source = Some(source.to_string());
	}

	fn play(&mut self) -> Result<(), PlaybackError> {
		let name = self.source.clone().unwrap_or_else(|| format!("video {}", self.index));
		self.gate.check(&name)?;
		info!("🎬 Video {} playing: {}", self.index, name);
		self.playback.begin(MediaSource::Video(self.index));
		Ok(())
	}

	fn pause(&mut self) {
		self.playback.cancel();
	}

	fn rewind(&mut self) {}

	fn set_muted(&mut self, _muted: bool) {}

	fn set_focused(&mut self, focused: bool) {
		debug!("Video {} focused: {}", self.index, focused);
	}

	fn set_playing(&mut self, _playing: bool) {}
}

pub struct ConsoleLights {
	name: String,
}

impl LightingSurface for ConsoleLights {
	fn apply(&mut self, pattern: LightingPattern) {
		if pattern == LightingPattern::Off {
			info!("💡 {} off", self.name);
		} else {
			info!("💡 {} → {}", self.name, pattern);
		}
	}
}

/// Build the simulated stage described by `config`
pub fn stage(config: &Config, gate: &AutoplayGate, notifier: &MediaNotifier) -> Stage {
	if config.videos == 0 {
		warn!("Stage has no video surfaces; video selection will be rejected");
	}

	let narration = ConsoleNarration {
		playback: Playback::new(notifier.clone(), config.narration_ms),
		gate: gate.clone(),
		muted: false,
	};

	let videos = (0..config.videos).map(|index| {
		Box::new(ConsoleVideo {
			index,
			source: None,
			playback: Playback::new(notifier.clone(), config.video_ms),
			gate: gate.clone(),
		}) as Box<dyn VideoSurface>
	});

	let lights = config.lights.iter().map(|name| Box::new(ConsoleLights { name: name.clone() }) as Box<dyn LightingSurface>);

	Stage::new(Box::new(narration)).with_videos(videos).with_lights(lights)
}
