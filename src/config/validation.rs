use super::AppConfig;
use anyhow::{bail, Result};
use clap::Parser;

const MIN_CHUNK_SECS: u64 = 1;
const MAX_CHUNK_SECS: u64 = 60;
const MIN_SAMPLE_RATE: u32 = 8_000;
const MAX_SAMPLE_RATE: u32 = 96_000;
const MIN_POLL_INTERVAL_MS: u64 = 50;
const MAX_POLL_INTERVAL_MS: u64 = 10_000;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values before the capture loop or server start.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CHUNK_SECS..=MAX_CHUNK_SECS).contains(&self.chunk_secs) {
            bail!(
                "--chunk-secs must be between {MIN_CHUNK_SECS} and {MAX_CHUNK_SECS}, got {}",
                self.chunk_secs
            );
        }
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            bail!(
                "--sample-rate must be between {MIN_SAMPLE_RATE} and {MAX_SAMPLE_RATE} Hz, got {}",
                self.sample_rate
            );
        }
        if self.energy_threshold.is_nan() || !(0.0..=1.0).contains(&self.energy_threshold) {
            bail!(
                "--energy-threshold must be between 0.0 and 1.0, got {}",
                self.energy_threshold
            );
        }
        if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&self.poll_interval_ms) {
            bail!(
                "--poll-interval-ms must be between {MIN_POLL_INTERVAL_MS} and {MAX_POLL_INTERVAL_MS} ms, got {}",
                self.poll_interval_ms
            );
        }
        if self.host.is_empty() {
            bail!("--host must not be empty");
        }
        Ok(())
    }
}
