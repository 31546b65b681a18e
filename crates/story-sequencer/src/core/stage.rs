use super::error::PlaybackError;
use super::LightingPattern;
use tracing::debug;

/// Narration channel. A single one exists per stage.
pub trait AudioSurface: Send {
	/// Switch to `source` and start playing it.
	/// Completion is reported back through `MediaNotifier::narration_ended`.
	fn play(&mut self, source: &str) -> Result<(), PlaybackError>;
	fn pause(&mut self);
	fn rewind(&mut self);
	fn set_muted(&mut self, muted: bool);
}

/// One embedded video. Completion is reported through `MediaNotifier::video_ended`.
pub trait VideoSurface: Send {
	fn load(&mut self, source: &str);
	fn play(&mut self) -> Result<(), PlaybackError>;
	fn pause(&mut self);
	fn rewind(&mut self);
	fn set_muted(&mut self, muted: bool);
	/// Visual emphasis consumed by presentation styling
	fn set_focused(&mut self, focused: bool);
	fn set_playing(&mut self, playing: bool);
}

pub trait LightingSurface: Send {
	fn apply(&mut self, pattern: LightingPattern);
}

/// Every output surface the sequencer drives
pub struct Stage {
	narration: Box<dyn AudioSurface>,
	videos: Vec<Box<dyn VideoSurface>>,
	lights: Vec<Box<dyn LightingSurface>>,
	focused: Option<usize>,
}

impl Stage {
	pub fn new(narration: Box<dyn AudioSurface>) -> Self {
		Self {
			narration,
			videos: Vec::new(),
			lights: Vec::new(),
			focused: None,
		}
	}

	pub fn with_video(mut self, video: Box<dyn VideoSurface>) -> Self {
		self.videos.push(video);
		self
	}

	pub fn with_videos(mut self, videos: impl IntoIterator<Item = Box<dyn VideoSurface>>) -> Self {
		self.videos.extend(videos);
		self
	}

	pub fn with_light(mut self, light: Box<dyn LightingSurface>) -> Self {
		self.lights.push(light);
		self
	}

	pub fn with_lights(mut self, lights: impl IntoIterator<Item = Box<dyn LightingSurface>>) -> Self {
		self.lights.extend(lights);
		self
	}

	pub fn video_count(&self) -> usize {
		self.videos.len()
	}

	pub const fn focused(&self) -> Option<usize> {
		self.focused
	}

	pub(crate) fn play_narration(&mut self, source: &str) -> Result<(), PlaybackError> {
		self.narration.set_muted(false);
		self.narration.play(source)
	}

	pub(crate) fn stop_narration(&mut self) {
		self.narration.pause();
		self.narration.rewind();
	}

	/// Focus and play `index`. All other videos are unfocused first.
	/// A rejected `play()` leaves nothing focused.
	/// The caller guarantees `index < video_count()`.
	pub(crate) fn focus_video(&mut self, index: usize, source: Option<&str>) -> Result<(), PlaybackError> {
		self.unfocus_all();

		let video = &mut self.videos[index];
		if let Some(src) = source {
			video.load(src);
		}
		video.set_focused(true);
		video.set_playing(true);
		video.set_muted(false);
		self.focused = Some(index);

		if let Err(e) = video.play() {
			self.unfocus_video(index);
			return Err(e);
		}
		Ok(())
	}

	/// Pause, mute and rewind `index`, dropping its visual emphasis
	pub(crate) fn unfocus_video(&mut self, index: usize) {
		let Some(video) = self.videos.get_mut(index) else { return };
		video.pause();
		video.set_muted(true);
		video.rewind();
		video.set_focused(false);
		video.set_playing(false);

		if self.focused == Some(index) {
			self.focused = None;
		}
	}

	pub(crate) fn unfocus_all(&mut self) {
		for index in 0..self.videos.len() {
			self.unfocus_video(index);
		}
	}

	/// Same pattern to every lighting surface
	pub(crate) fn broadcast_lighting(&mut self, pattern: LightingPattern) {
		debug!("Broadcasting lighting pattern {} to {} surfaces", pattern, self.lights.len());
		for light in &mut self.lights {
			light.apply(pattern);
		}
	}
}

impl std::fmt::Debug for Stage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Stage")
			.field("videos", &self.videos.len())
			.field("lights", &self.lights.len())
			.field("focused", &self.focused)
			.finish_non_exhaustive()
	}
}
