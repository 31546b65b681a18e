use super::error::{Result, SequencerError};
use super::TimeMs;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Pause between the end of a pass and the restart of the story
pub const DEFAULT_RESTART_PAUSE_MS: TimeMs = 30_000;

/// Delay between `start` and the first step
pub const DEFAULT_STARTUP_DELAY_MS: TimeMs = 500;

/// Decorative lighting state broadcast to every lighting surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingPattern {
	Off,
	Steady,
	Twinkle,
	Chase,
	Pulse,
}

impl LightingPattern {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Off => "off",
			Self::Steady => "steady",
			Self::Twinkle => "twinkle",
			Self::Chase => "chase",
			Self::Pulse => "pulse",
		}
	}
}

impl std::fmt::Display for LightingPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Narration-only step. Advances when the narration ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioStep {
	pub src: String,
	/// Nominal length of the narration. Informational only.
	pub duration_ms: TimeMs,
	pub text: String,
}

/// Narration followed by a focused video shown for `duration_ms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStep {
	pub index: usize,
	pub src: String,
	pub audio_src: String,
	pub duration_ms: TimeMs,
	pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightingStep {
	pub pattern: LightingPattern,
	pub duration_ms: TimeMs,
	pub text: String,
}

/// One scripted unit of the presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
	Audio(AudioStep),
	Video(VideoStep),
	Lighting(LightingStep),
}

impl Step {
	pub fn audio(src: impl Into<String>, duration_ms: TimeMs, text: impl Into<String>) -> Self {
		Self::Audio(AudioStep {
			src: src.into(),
			duration_ms,
			text: text.into(),
		})
	}

	pub fn video(index: usize, src: impl Into<String>, audio_src: impl Into<String>, duration_ms: TimeMs, text: impl Into<String>) -> Self {
		Self::Video(VideoStep {
			index,
			src: src.into(),
			audio_src: audio_src.into(),
			duration_ms,
			text: text.into(),
		})
	}

	pub fn lighting(pattern: LightingPattern, duration_ms: TimeMs, text: impl Into<String>) -> Self {
		Self::Lighting(LightingStep {
			pattern,
			duration_ms,
			text: text.into(),
		})
	}

	pub fn text(&self) -> &str {
		match self {
			Self::Audio(s) => &s.text,
			Self::Video(s) => &s.text,
			Self::Lighting(s) => &s.text,
		}
	}

	pub const fn duration_ms(&self) -> TimeMs {
		match self {
			Self::Audio(s) => s.duration_ms,
			Self::Video(s) => s.duration_ms,
			Self::Lighting(s) => s.duration_ms,
		}
	}

	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Audio(_) => "audio",
			Self::Video(_) => "video",
			Self::Lighting(_) => "lighting",
		}
	}
}

/// The fixed, ordered story a sequencer walks through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryScript {
	pub steps: Vec<Step>,
	#[serde(default = "default_restart_pause")]
	pub restart_pause_ms: TimeMs,
	#[serde(default = "default_startup_delay")]
	pub startup_delay_ms: TimeMs,
}

const fn default_restart_pause() -> TimeMs {
	DEFAULT_RESTART_PAUSE_MS
}

const fn default_startup_delay() -> TimeMs {
	DEFAULT_STARTUP_DELAY_MS
}

impl StoryScript {
	pub fn new(steps: Vec<Step>) -> Self {
		Self {
			steps,
			restart_pause_ms: DEFAULT_RESTART_PAUSE_MS,
			startup_delay_ms: DEFAULT_STARTUP_DELAY_MS,
		}
	}

	pub fn with_restart_pause(mut self, ms: TimeMs) -> Self {
		self.restart_pause_ms = ms;
		self
	}

	pub fn with_startup_delay(mut self, ms: TimeMs) -> Self {
		self.startup_delay_ms = ms;
		self
	}

	pub const fn restart_pause(&self) -> Duration {
		Duration::from_millis(self.restart_pause_ms)
	}

	pub const fn startup_delay(&self) -> Duration {
		Duration::from_millis(self.startup_delay_ms)
	}

	pub fn len(&self) -> usize {
		self.steps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	pub fn step(&self, index: usize) -> Option<&Step> {
		self.steps.get(index)
	}

	/// Highest video index referenced by any step
	pub fn max_video_index(&self) -> Option<usize> {
		self
			.steps
			.iter()
			.filter_map(|s| match s {
				Step::Video(v) => Some(v.index),
				_ => None,
			})
			.max()
	}

	/// Check the script against a stage with `video_count` video surfaces.
	///
	/// Every media source must be non-empty. Video and lighting durations arm the
	/// step deadline and must be positive; an audio step's duration is never
	/// timed, its narration end advances the story.
	pub fn validate(&self, video_count: usize) -> Result<()> {
		if self.restart_pause_ms == 0 {
			return Err(SequencerError::InvalidScript("restart pause must be positive".to_string()));
		}
		for (i, step) in self.steps.iter().enumerate() {
			match step {
				Step::Audio(a) if a.src.is_empty() => {
					return Err(SequencerError::InvalidScript(format!("step {i} has an empty narration source")));
				}
				Step::Video(v) => {
					if v.duration_ms == 0 {
						return Err(SequencerError::InvalidScript(format!("step {i} has invalid duration")));
					}
					if v.audio_src.is_empty() {
						return Err(SequencerError::InvalidScript(format!("step {i} has an empty narration source")));
					}
					if v.src.is_empty() {
						return Err(SequencerError::InvalidScript(format!("step {i} has an empty video source")));
					}
					if v.index >= video_count {
						return Err(SequencerError::VideoIndexOutOfRange {
							index: v.index,
							available: video_count,
						});
					}
				}
				Step::Lighting(l) if l.duration_ms == 0 => {
					return Err(SequencerError::InvalidScript(format!("step {i} has invalid duration")));
				}
				_ => {}
			}
		}
		Ok(())
	}

	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let raw = std::fs::read_to_string(path).map_err(|e| SequencerError::ScriptIo {
			path: path.display().to_string(),
			source: e,
		})?;
		Self::from_json(&raw)
	}

	/// The "Seven Weeks of Lord Buddha" story: intro, four video weeks, outro
	pub fn seven_weeks() -> Self {
		const VIDEO: &str = "https://www.learningcontainer.com/wp-content/uploads/2020/05/sample-mp4-file.mp4";
		let song = |n: u8| format!("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-{n}.mp3");

		Self::new(vec![
			Step::audio(song(1), 8000, "Welcome to The Seven Weeks of Lord Buddha. Let us begin our journey."),
			Step::video(0, VIDEO, song(2), 5000, "This is the first week, a time of profound enlightenment."),
			Step::video(1, VIDEO, song(3), 7000, "The second week brought deeper contemplation and peace."),
			Step::video(2, VIDEO, song(4), 6000, "During the third week, the path became clearer."),
			Step::video(3, VIDEO, song(5), 8000, "The fourth week saw great challenges and triumphs."),
			Step::audio(song(6), 10000, "And so concludes our story of the Seven Weeks. Thank you for joining us."),
		])
	}
}

impl Default for StoryScript {
	fn default() -> Self {
		Self::seven_weeks()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_tagged_steps_with_defaults() {
		let json = r#"{
			"steps": [
				{ "type": "audio", "src": "intro.mp3", "duration_ms": 8000, "text": "Welcome" },
				{ "type": "video", "index": 1, "src": "week.mp4", "audio_src": "week.mp3", "duration_ms": 5000, "text": "Week one" },
				{ "type": "lighting", "pattern": "twinkle", "duration_ms": 3000, "text": "Stars" }
			]
		}"#;

		let script = StoryScript::from_json(json).unwrap();
		assert_eq!(script.len(), 3);
		assert_eq!(script.restart_pause_ms, DEFAULT_RESTART_PAUSE_MS);
		assert_eq!(script.startup_delay_ms, DEFAULT_STARTUP_DELAY_MS);
		assert_eq!(script.steps[1], Step::video(1, "week.mp4", "week.mp3", 5000, "Week one"));
		assert_eq!(script.steps[2], Step::lighting(LightingPattern::Twinkle, 3000, "Stars"));
		assert_eq!(script.max_video_index(), Some(1));
	}

	#[test]
	fn rejects_unknown_pattern() {
		let json = r#"{ "steps": [ { "type": "lighting", "pattern": "strobe", "duration_ms": 1, "text": "" } ] }"#;
		assert!(matches!(StoryScript::from_json(json), Err(SequencerError::ScriptParse(_))));
	}

	#[test]
	fn validate_checks_video_range_and_durations() {
		let script = StoryScript::new(vec![Step::video(2, "v.mp4", "a.mp3", 1000, "")]);
		assert!(matches!(script.validate(2), Err(SequencerError::VideoIndexOutOfRange { index: 2, available: 2 })));
		assert!(script.validate(3).is_ok());

		let zero = StoryScript::new(vec![Step::lighting(LightingPattern::Chase, 0, "")]);
		assert!(matches!(zero.validate(0), Err(SequencerError::InvalidScript(_))));

		let no_pause = StoryScript::new(vec![]).with_restart_pause(0);
		assert!(no_pause.validate(0).is_err());
	}

	#[test]
	fn validate_requires_every_media_source() {
		let no_video = StoryScript::new(vec![Step::video(0, "", "a.mp3", 1000, "")]);
		assert!(matches!(no_video.validate(1), Err(SequencerError::InvalidScript(msg)) if msg.contains("video source")));

		let no_narration = StoryScript::new(vec![Step::audio("", 1000, "")]);
		assert!(matches!(no_narration.validate(0), Err(SequencerError::InvalidScript(msg)) if msg.contains("narration source")));

		// Audio durations are informational, so zero is accepted
		assert!(StoryScript::new(vec![Step::audio("a.mp3", 0, "")]).validate(0).is_ok());
	}

	#[test]
	fn empty_script_is_valid() {
		assert!(StoryScript::new(vec![]).validate(0).is_ok());
	}

	#[test]
	fn builtin_story_matches_four_videos() {
		let script = StoryScript::seven_weeks();
		assert_eq!(script.len(), 6);
		assert_eq!(script.max_video_index(), Some(3));
		assert!(script.validate(4).is_ok());
		assert_eq!(script.step(0).map(Step::kind), Some("audio"));
		assert_eq!(script.step(5).map(Step::duration_ms), Some(10000));
	}

	#[test]
	fn missing_file_reports_path() {
		let err = StoryScript::from_json_file("/nonexistent/story.json").unwrap_err();
		assert!(err.to_string().contains("/nonexistent/story.json"));
	}
}
