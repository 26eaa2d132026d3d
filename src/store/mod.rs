//! Filesystem-backed store for detected recordings.
//!
//! A flat directory of WAV files is the whole persistence model: no index, no
//! metadata, the listing is the source of truth. Filenames encode the local
//! wall-clock time of the detection at second resolution, so they sort
//! lexically in creation order. Two triggers inside the same second collide
//! and the later write wins; that overwrite is documented behavior.

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%m-%d_%Hh-%Mm-%Ss";

/// Directory of persisted recordings plus the WAV format they are written in.
pub struct RecordingStore {
    root: PathBuf,
    spec: WavSpec,
}

impl RecordingStore {
    /// Create a store rooted at `root`, writing mono 32-bit float WAV at
    /// `sample_rate`. The directory is not touched until `ensure_dir`.
    pub fn new(root: impl AsRef<Path>, sample_rate: u32) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            spec: WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 32,
                sample_format: SampleFormat::Float,
            },
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create audio directory {}", self.root.display()))
    }

    /// Derive the file path for a detection at `at`. Sub-second precision is
    /// dropped, so calls within the same second return the same path.
    pub fn chunk_path(&self, at: DateTime<Local>) -> PathBuf {
        self.root
            .join(format!("{}.wav", at.format(TIMESTAMP_FORMAT)))
    }

    /// Persist a chunk of mono samples at `path`.
    pub fn save(&self, path: &Path, samples: &[f32]) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = WavWriter::new(BufWriter::new(file), self.spec)
            .with_context(|| format!("failed to start WAV writer for {}", path.display()))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .with_context(|| format!("failed to write sample to {}", path.display()))?;
        }
        writer
            .finalize()
            .with_context(|| format!("failed to finalize {}", path.display()))?;
        Ok(())
    }

    /// Names of all recordings currently on disk, regular files only, sorted
    /// lexically for a deterministic listing.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("failed to read audio directory {}", self.root.display()))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.context("failed to read directory entry")?;
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Resolve a client-supplied name to a path under the storage root.
    /// Returns None for missing files and for names that try to escape the
    /// root (separators, parent components).
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return None;
        }
        let path = self.root.join(name);
        if path.is_file() {
            Some(path)
        } else {
            None
        }
    }

    /// Read a stored recording back into memory. Integer WAVs are normalized
    /// to [-1.0, 1.0] so playback never has to branch on the on-disk format.
    pub fn load(path: &Path) -> Result<(Vec<f32>, u32)> {
        let reader = hound::WavReader::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let spec = reader.spec();
        let sample_rate = spec.sample_rate;

        let samples: std::result::Result<Vec<f32>, _> = match spec.sample_format {
            SampleFormat::Float => reader.into_samples::<f32>().collect(),
            SampleFormat::Int => {
                let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_value))
                    .collect()
            }
        };
        let samples =
            samples.with_context(|| format!("failed to decode {}", path.display()))?;

        Ok((samples, sample_rate))
    }
}
