use std::path::PathBuf;
use std::time::Duration;
use story_player::console::{self, AutoplayGate};
use story_player::Config;
use story_sequencer::core::{Phase, StoryPlayer};
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

fn config() -> Config {
	Config {
		script: None,
		videos: 4,
		lights: vec!["dots".into()],
		restart_pause_ms: Some(1000),
		startup_delay_ms: Some(0),
		narration_ms: Duration::from_millis(50),
		video_ms: Duration::from_millis(80),
		block_autoplay: true,
	}
}

#[tokio::test(start_paused = true)]
async fn test_session_quits_on_command() {
	let input = BufReader::new(&b"state\nselect 1\nbogus\nquit\n"[..]);
	let result = story_player::run(config(), input, CancellationToken::new()).await;
	assert!(result.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_session_runs_until_cancelled_after_eof() {
	let cancel = CancellationToken::new();
	let stopper = cancel.clone();
	tokio::spawn(async move {
		tokio::time::sleep(Duration::from_secs(5)).await;
		stopper.cancel();
	});

	let result = story_player::run(config(), BufReader::new(&b""[..]), cancel).await;
	assert!(result.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_blocked_autoplay_stalls_until_a_selection() {
	let config = config();
	let gate = AutoplayGate::new(config.block_autoplay);
	let player = StoryPlayer::new(config.load_script().unwrap(), |notifier| console::stage(&config, &gate, &notifier)).unwrap();
	player.start().await.unwrap();

	tokio::time::sleep(Duration::from_millis(10)).await;
	let state = player.current_state();
	assert_eq!(state.phase.step(), Some(0));
	assert!(matches!(state.phase, Phase::Stalled { ref reason, .. } if reason.contains("NotAllowedError")));
	assert!(!state.auto_active);

	// Nothing moves a stalled story on its own
	tokio::time::sleep(Duration::from_secs(5)).await;
	assert!(player.current_state().phase.is_stalled());

	gate.user_gesture();
	player.select_video(1).await.unwrap();
	let state = player.current_state();
	assert_eq!(state.phase, Phase::Manual { video: 1 });
	assert_eq!(state.focused_video, Some(1));

	// The simulated video runs 80ms, then the interrupted narration replays
	tokio::time::sleep(Duration::from_millis(100)).await;
	let state = player.current_state();
	assert_eq!(state.phase, Phase::Narrating { step: 0 });
	assert!(state.auto_active);
	assert_eq!(state.focused_video, None);

	player.shutdown().await;
}

#[tokio::test]
async fn test_session_fails_on_missing_script() {
	let mut config = config();
	config.script = Some(PathBuf::from("/missing/story.json"));

	let err = story_player::run(config, BufReader::new(&b""[..]), CancellationToken::new()).await.unwrap_err();
	assert!(format!("{err:#}").contains("/missing/story.json"));
}

#[tokio::test]
async fn test_session_rejects_script_larger_than_stage() {
	let mut config = config();
	config.videos = 2;

	let err = story_player::run(config, BufReader::new(&b""[..]), CancellationToken::new()).await.unwrap_err();
	assert!(format!("{err:#}").contains("out of range"));
}
