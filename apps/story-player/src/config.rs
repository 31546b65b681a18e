use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use story_sequencer::core::{SequencerError, StoryScript, TimeMs};

#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
pub struct Config {
	#[arg(long, env = "STORY_SCRIPT", help = "JSON story script; the built-in Seven Weeks story is used when absent")]
	pub script: Option<PathBuf>,

	#[arg(long, env = "STORY_VIDEOS", default_value = "4", help = "Number of video surfaces on the stage")]
	pub videos: usize,

	#[arg(
        long,
        env = "STORY_LIGHTS",
        default_value = "dots,bulbs",
        value_delimiter = ',',
        help = "Names of the lighting surfaces patterns are broadcast to"
    )]
	pub lights: Vec<String>,

	#[arg(long, env = "STORY_RESTART_PAUSE_MS", help = "Override the pause between passes in milliseconds")]
	pub restart_pause_ms: Option<TimeMs>,

	#[arg(long, env = "STORY_STARTUP_DELAY_MS", help = "Override the delay before the first step in milliseconds")]
	pub startup_delay_ms: Option<TimeMs>,

	#[arg(
        long,
        env = "STORY_NARRATION_MS",
        default_value = "3000",
        value_parser = parse_millis,
        help = "Simulated length of every narration track in milliseconds"
    )]
	pub narration_ms: Duration,

	#[arg(
        long,
        env = "STORY_VIDEO_MS",
        default_value = "8000",
        value_parser = parse_millis,
        help = "Simulated length of every video in milliseconds"
    )]
	pub video_ms: Duration,

	#[arg(long, env = "STORY_BLOCK_AUTOPLAY", help = "Reject playback until the first video selection, like a browser autoplay policy")]
	pub block_autoplay: bool,
}

impl Config {
	pub fn new() -> Self {
		Self::parse()
	}

	/// Load the configured script and apply timing overrides
	pub fn load_script(&self) -> Result<StoryScript, SequencerError> {
		let mut script = match &self.script {
			Some(path) => StoryScript::from_json_file(path)?,
			None => StoryScript::seven_weeks(),
		};

		if let Some(ms) = self.restart_pause_ms {
			script = script.with_restart_pause(ms);
		}
		if let Some(ms) = self.startup_delay_ms {
			script = script.with_startup_delay(ms);
		}

		Ok(script)
	}

	#[cfg(test)]
	pub fn test() -> Self {
		Self {
			script: None,
			videos: 4,
			lights: vec!["dots".into(), "bulbs".into()],
			restart_pause_ms: None,
			startup_delay_ms: None,
			narration_ms: Duration::from_millis(100),
			video_ms: Duration::from_millis(200),
			block_autoplay: false,
		}
	}
}

fn parse_millis(s: &str) -> Result<Duration, std::num::ParseIntError> {
	s.parse::<u64>().map(Duration::from_millis)
}
