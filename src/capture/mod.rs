//! Perpetual capture-and-detect loop.
//!
//! Runs on a dedicated thread for the process lifetime: poll the recording
//! flag, pull one fixed-duration chunk from the input device, classify it,
//! and persist it when it carries sound. Every failure inside the loop is
//! logged and survived; availability of the loop outranks any single chunk.


use crate::audio::{ChunkVerdict, EnergyDetector, Recorder};
use crate::config::AppConfig;
use crate::state::{RecordingState, ShutdownFlag};
use crate::store::RecordingStore;
use anyhow::{Context, Result};
use chrono::Local;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Blocking "give me one chunk" primitive. The production implementation is
/// the CPAL recorder; tests substitute synthetic buffers.
pub trait ChunkSource {
    fn next_chunk(&mut self, duration: Duration, sample_rate: u32) -> Result<Vec<f32>>;
}

impl ChunkSource for Recorder {
    fn next_chunk(&mut self, duration: Duration, sample_rate: u32) -> Result<Vec<f32>> {
        self.record_for(duration, sample_rate)
    }
}

/// The detection-and-recording engine.
pub struct CaptureLoop {
    detector: EnergyDetector,
    store: Arc<RecordingStore>,
    state: RecordingState,
    shutdown: ShutdownFlag,
    chunk_duration: Duration,
    sample_rate: u32,
    poll_interval: Duration,
}

impl CaptureLoop {
    pub fn new(
        config: &AppConfig,
        state: RecordingState,
        shutdown: ShutdownFlag,
        store: Arc<RecordingStore>,
    ) -> Self {
        Self {
            detector: EnergyDetector::new(config.energy_threshold),
            store,
            state,
            shutdown,
            chunk_duration: config.chunk_duration(),
            sample_rate: config.sample_rate,
            poll_interval: config.poll_interval(),
        }
    }

    /// Run until the shutdown flag is set.
    ///
    /// While recording is inactive no capture call is made; the loop only
    /// sleeps and re-checks, so flipping the flag takes effect within one
    /// poll interval. While active, a stop request lands at the next chunk
    /// boundary, at most one chunk duration away.
    pub fn run(&self, source: &mut dyn ChunkSource) {
        info!(
            threshold = self.detector.threshold(),
            chunk_secs = self.chunk_duration.as_secs(),
            "capture loop started"
        );
        while !self.shutdown.is_triggered() {
            if !self.state.is_active() {
                thread::sleep(self.poll_interval);
                continue;
            }

            debug!("listening");
            match source.next_chunk(self.chunk_duration, self.sample_rate) {
                Ok(chunk) => {
                    self.process_chunk(&chunk);
                }
                Err(err) => {
                    warn!(error = %err, "chunk capture failed, retrying next cycle");
                }
            }
            thread::sleep(self.poll_interval);
        }
        info!("capture loop stopped");
    }

    /// Classify one chunk and persist it on a positive verdict.
    fn process_chunk(&self, samples: &[f32]) {
        match self.detector.classify(samples) {
            ChunkVerdict::Invalid => {
                warn!("chunk contains NaN samples, skipping detection");
            }
            ChunkVerdict::Silence { energy } => {
                debug!(energy, "no significant sound detected");
            }
            ChunkVerdict::Sound { energy } => {
                let path = self.store.chunk_path(Local::now());
                match self.store.save(&path, samples) {
                    Ok(()) => {
                        info!(energy, path = %path.display(), "sound detected, chunk saved");
                    }
                    Err(err) => {
                        // Losing one detection beats killing the loop.
                        error!(error = %err, "failed to persist detected chunk");
                    }
                }
            }
        }
    }
}

/// Spawn the capture loop on its own named thread.
///
/// The input device is opened inside the thread; if it is unavailable the
/// loop keeps retrying at the poll interval instead of giving up, so a
/// microphone plugged in later is picked up without a restart.
pub fn spawn(
    config: &AppConfig,
    state: RecordingState,
    shutdown: ShutdownFlag,
    store: Arc<RecordingStore>,
) -> Result<JoinHandle<()>> {
    let capture = CaptureLoop::new(config, state, shutdown.clone(), store);
    let preferred_device = config.input_device.clone();
    let poll_interval = config.poll_interval();

    thread::Builder::new()
        .name("capture".into())
        .spawn(move || {
            let mut recorder = loop {
                if shutdown.is_triggered() {
                    return;
                }
                match Recorder::new(preferred_device.as_deref()) {
                    Ok(recorder) => {
                        info!(device = %recorder.device_name(), "capture device ready");
                        break recorder;
                    }
                    Err(err) => {
                        warn!(error = %err, "input device unavailable, retrying");
                        thread::sleep(poll_interval);
                    }
                }
            };
            capture.run(&mut recorder);
        })
        .context("failed to spawn capture thread")
}
