//! Energy-based sound detection.
//!
//! Classifies a captured chunk as sound or silence by comparing its RMS
//! energy against a fixed threshold. A chunk containing NaN samples is
//! rejected whole; device read glitches must never count as a detection.

/// Outcome of classifying one capture chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChunkVerdict {
    /// RMS energy exceeded the threshold; the chunk should be persisted.
    Sound { energy: f32 },
    /// Below the threshold; the chunk is discarded.
    Silence { energy: f32 },
    /// NaN-poisoned buffer; discarded without contributing a measurement.
    Invalid,
}

/// Stateless chunk classifier. Deterministic given the buffer.
#[derive(Debug, Clone, Copy)]
pub struct EnergyDetector {
    threshold: f32,
}

impl EnergyDetector {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn classify(&self, samples: &[f32]) -> ChunkVerdict {
        if samples.iter().any(|s| s.is_nan()) {
            return ChunkVerdict::Invalid;
        }
        let energy = rms(samples);
        if energy > self.threshold {
            ChunkVerdict::Sound { energy }
        } else {
            ChunkVerdict::Silence { energy }
        }
    }
}

/// Root-mean-square amplitude of a sample buffer. Empty input reads as 0.0.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let energy: f32 = samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32;
    energy.sqrt()
}
