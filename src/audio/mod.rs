//! Audio device I/O and energy-based sound detection.
//!
//! Capture and playback go through CPAL. Incoming audio is downmixed to mono
//! and resampled to the configured rate before the detector sees it, so the
//! rest of the pipeline never has to care about device-native formats.

mod detector;
mod playback;
mod recorder;
mod resample;
#[cfg(test)]
mod tests;

pub use detector::{rms, ChunkVerdict, EnergyDetector};
pub use playback::Player;
pub use recorder::Recorder;
