use story_player::Config;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	// Initialize tracing
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,story_sequencer=info,story_player=info")))
		.with(tracing_subscriber::fmt::layer().with_target(true).with_line_number(true))
		.init();

	tracing::info!("🎬 Starting story player");

	let config = Config::new();
	let cancel = CancellationToken::new();

	// Setup signal handling for graceful shutdown
	let shutdown = cancel.clone();
	tokio::spawn(async move {
		match tokio::signal::ctrl_c().await {
			Ok(()) => {
				tracing::info!("🛑 Received shutdown signal (Ctrl+C)");
				shutdown.cancel();
			}
			Err(e) => {
				tracing::error!("Failed to listen for shutdown signal: {}", e);
			}
		}
	});

	tracing::info!("   Type a video number to select it, 'state' to inspect, 'quit' to exit");

	if let Err(e) = story_player::run(config, BufReader::new(tokio::io::stdin()), cancel).await {
		tracing::error!("❌ Player error: {:#}", e);
		return Err(e);
	}

	tracing::info!("👋 Story player stopped");
	Ok(())
}
