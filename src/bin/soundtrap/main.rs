use anyhow::Result;
use soundtrap::audio::{Player, Recorder};
use soundtrap::capture;
use soundtrap::config::AppConfig;
use soundtrap::server::{self, AppState};
use soundtrap::state::{RecordingState, ShutdownFlag};
use soundtrap::store::RecordingStore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_logging();

    if config.list_input_devices {
        for name in Recorder::list_devices()? {
            println!("{name}");
        }
        return Ok(());
    }
    if config.list_output_devices {
        for name in Player::list_devices()? {
            println!("{name}");
        }
        return Ok(());
    }

    let store = Arc::new(RecordingStore::new(&config.audio_dir, config.sample_rate));
    store.ensure_dir()?;

    let recording = RecordingState::new();
    let shutdown = ShutdownFlag::new();

    // Daemon-style thread: it observes the shutdown flag each iteration but
    // is deliberately not joined, so an interrupt never waits out an
    // in-flight capture before the process exits.
    let _capture = capture::spawn(&config, recording.clone(), shutdown.clone(), store.clone())?;

    let state = AppState::new(recording, store, config.output_device.clone());
    server::serve(&config, state, shutdown.clone()).await?;

    shutdown.trigger();
    info!("shutting down");
    // Hard exit: dropping the runtime would block on in-flight playback in
    // the blocking pool, and the capture thread may be mid-chunk.
    std::process::exit(0);
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
