//! Speaker playback via CPAL.
//!
//! Mirrors the recorder: build an output stream, let it run for the length of
//! the buffer, then tear it down. The call blocks until playback completes so
//! the control surface can report "played" truthfully.

use super::resample::resample_to_rate;
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use std::time::Duration;
use tracing::{debug, warn};

// Extra sleep after the nominal buffer length so the device queue drains.
const DRAIN_PAD: Duration = Duration::from_millis(100);

/// Audio output device wrapper.
pub struct Player {
    device: cpal::Device,
}

impl Player {
    /// List speaker names so the CLI can expose a selector.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host
            .output_devices()
            .context("no output devices available")?;
        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Create a player, optionally forcing a specific output device.
    pub fn new(preferred_device: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match preferred_device {
            Some(name) => {
                let mut devices = host
                    .output_devices()
                    .context("no output devices available")?;
                devices
                    .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                    .ok_or_else(|| anyhow!("output device '{name}' not found"))?
            }
            None => host
                .default_output_device()
                .context("no default output device available")?,
        };
        Ok(Self { device })
    }

    /// Get the name of the active playback device.
    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string())
    }

    /// Play mono samples recorded at `sample_rate`, blocking until the buffer
    /// has been driven to the device in full.
    pub fn play(&self, samples: &[f32], sample_rate: u32) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let default_config = self.device.default_output_config()?;
        let format = default_config.sample_format();
        let device_config: StreamConfig = default_config.into();
        let device_sample_rate = device_config.sample_rate.0;
        let channels = usize::from(device_config.channels.max(1));

        debug!(
            ?format,
            device_sample_rate, channels, "opening playback stream"
        );

        let frames = resample_to_rate(samples, sample_rate, device_sample_rate);
        let playout = Duration::from_secs_f64(frames.len() as f64 / f64::from(device_sample_rate));

        let err_fn = |err| warn!(error = %err, "playback stream error");

        // Each callback pulls the next frames and duplicates them across all
        // output channels; past the end it writes silence.
        let stream = match format {
            SampleFormat::F32 => {
                let mut pos = 0usize;
                self.device.build_output_stream(
                    &device_config,
                    move |data: &mut [f32], _| {
                        for frame in data.chunks_mut(channels) {
                            let sample = frames.get(pos).copied().unwrap_or(0.0);
                            frame.fill(sample);
                            pos += 1;
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            SampleFormat::I16 => {
                let mut pos = 0usize;
                self.device.build_output_stream(
                    &device_config,
                    move |data: &mut [i16], _| {
                        for frame in data.chunks_mut(channels) {
                            let sample = frames.get(pos).copied().unwrap_or(0.0);
                            frame.fill((sample.clamp(-1.0, 1.0) * 32_767.0) as i16);
                            pos += 1;
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            SampleFormat::U16 => {
                let mut pos = 0usize;
                self.device.build_output_stream(
                    &device_config,
                    move |data: &mut [u16], _| {
                        for frame in data.chunks_mut(channels) {
                            let sample = frames.get(pos).copied().unwrap_or(0.0);
                            let scaled = (sample.clamp(-1.0, 1.0) * 0.5 + 0.5) * 65_535.0;
                            frame.fill(scaled as u16);
                            pos += 1;
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            other => return Err(anyhow!("unsupported sample format: {other:?}")),
        };

        stream.play()?;
        std::thread::sleep(playout + DRAIN_PAD);
        if let Err(err) = stream.pause() {
            warn!(error = %err, "failed to pause playback stream");
        }
        drop(stream);

        Ok(())
    }
}
