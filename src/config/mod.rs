//! Command-line parsing and validation helpers.

mod validation;

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CHUNK_SECS: u64 = 5;
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_ENERGY_THRESHOLD: f32 = 0.1;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_PORT: u16 = 8080;

/// CLI options for the soundtrap daemon. Validated values keep the capture
/// loop and the HTTP server inside sane operating ranges.
#[derive(Debug, Parser, Clone)]
#[command(about = "Sound-activated audio recorder with an HTTP control plane", author, version)]
pub struct AppConfig {
    /// Duration of one capture chunk in seconds
    #[arg(long = "chunk-secs", default_value_t = DEFAULT_CHUNK_SECS)]
    pub chunk_secs: u64,

    /// Capture sample rate in Hz
    #[arg(long = "sample-rate", default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,

    /// RMS energy above which a chunk is persisted
    #[arg(long = "energy-threshold", default_value_t = DEFAULT_ENERGY_THRESHOLD, allow_negative_numbers = true)]
    pub energy_threshold: f32,

    /// Directory where detected chunks are stored
    #[arg(long = "audio-dir", env = "SOUNDTRAP_AUDIO_DIR", default_value = "audio")]
    pub audio_dir: PathBuf,

    /// Sleep between capture-loop iterations (milliseconds)
    #[arg(long = "poll-interval-ms", default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,

    /// Address the HTTP server binds to
    #[arg(long, env = "SOUNDTRAP_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port the HTTP server listens on
    #[arg(long, env = "SOUNDTRAP_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Preferred audio input device name
    #[arg(long)]
    pub input_device: Option<String>,

    /// Preferred audio output device name
    #[arg(long)]
    pub output_device: Option<String>,

    /// Print detected audio input devices and exit
    #[arg(long = "list-input-devices", default_value_t = false)]
    pub list_input_devices: bool,

    /// Print detected audio output devices and exit
    #[arg(long = "list-output-devices", default_value_t = false)]
    pub list_output_devices: bool,
}

impl AppConfig {
    pub fn chunk_duration(&self) -> Duration {
        Duration::from_secs(self.chunk_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
