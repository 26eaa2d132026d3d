//! Linear-interpolation resampling between device-native and configured rates.
//!
//! Good enough for loudness detection and voice-band playback; nothing in the
//! pipeline depends on phase accuracy or sharp anti-aliasing.

/// Convert `samples` from `source_rate` to `target_rate`. Identical rates and
/// empty buffers pass through untouched.
pub(super) fn resample_to_rate(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || samples.is_empty() {
        return samples.to_vec();
    }
    let ratio = f64::from(target_rate) / f64::from(source_rate);
    let out_len = ((samples.len() as f64) * ratio).round().max(1.0) as usize;
    let last = samples.len() - 1;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let pos = i as f64 / ratio;
        let idx = (pos.floor() as usize).min(last);
        let next = (idx + 1).min(last);
        let frac = (pos - idx as f64) as f32;
        out.push(samples[idx] + (samples[next] - samples[idx]) * frac);
    }
    out
}
