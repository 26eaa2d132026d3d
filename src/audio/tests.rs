use super::detector::{rms, ChunkVerdict, EnergyDetector};
use super::recorder::append_downmixed_samples;
use super::resample::resample_to_rate;

#[test]
fn rms_of_constant_amplitude_equals_amplitude() {
    let chunk = vec![0.2f32; 1024];
    assert!((rms(&chunk) - 0.2).abs() < 1e-6);

    let negative = vec![-0.4f32; 1024];
    assert!((rms(&negative) - 0.4).abs() < 1e-5);
}

#[test]
fn rms_of_empty_buffer_is_zero() {
    assert_eq!(rms(&[]), 0.0);
}

#[test]
fn classifies_constant_tone_above_threshold_as_sound() {
    let detector = EnergyDetector::new(0.1);
    let chunk = vec![0.2f32; 2048];
    match detector.classify(&chunk) {
        ChunkVerdict::Sound { energy } => assert!((energy - 0.2).abs() < 1e-6),
        other => panic!("expected sound, got {other:?}"),
    }
}

#[test]
fn classifies_quiet_chunk_as_silence() {
    let detector = EnergyDetector::new(0.1);
    assert!(matches!(
        detector.classify(&vec![0.0f32; 2048]),
        ChunkVerdict::Silence { .. }
    ));
    assert!(matches!(
        detector.classify(&vec![0.05f32; 2048]),
        ChunkVerdict::Silence { .. }
    ));
}

#[test]
fn single_nan_sample_invalidates_whole_chunk() {
    let detector = EnergyDetector::new(0.1);
    let mut chunk = vec![0.9f32; 2048];
    chunk[1234] = f32::NAN;
    assert_eq!(detector.classify(&chunk), ChunkVerdict::Invalid);
}

#[test]
fn threshold_comparison_is_strict() {
    // A chunk sitting exactly on the threshold does not trigger.
    let detector = EnergyDetector::new(0.1);
    assert!(matches!(
        detector.classify(&vec![0.1f32; 1024]),
        ChunkVerdict::Silence { .. }
    ));
}

#[test]
fn downmixes_multi_channel_audio() {
    let mut buf = Vec::new();
    let samples = [1.0f32, -1.0, 0.5, 0.5];
    append_downmixed_samples(&mut buf, &samples, 2, |sample| sample);
    assert_eq!(buf, vec![0.0, 0.5]);
}

#[test]
fn preserves_single_channel_audio() {
    let mut buf = Vec::new();
    let samples = [0.1f32, 0.2, 0.3];
    append_downmixed_samples(&mut buf, &samples, 1, |sample| sample);
    assert_eq!(buf, samples);
}

#[test]
fn downmix_handles_trailing_partial_frame() {
    let mut buf = Vec::new();
    let samples = [0.2f32, 0.4, 0.6];
    append_downmixed_samples(&mut buf, &samples, 2, |sample| sample);
    assert_eq!(buf.len(), 2);
    assert!((buf[1] - 0.6).abs() < 1e-6);
}

#[test]
fn resample_passes_through_matching_rates() {
    let input = vec![0.1f32, 0.2, 0.3];
    assert_eq!(resample_to_rate(&input, 44_100, 44_100), input);
}

#[test]
fn resample_scales_length_by_rate_ratio() {
    let input = vec![0.0f32; 44_100];
    let out = resample_to_rate(&input, 44_100, 22_050);
    assert_eq!(out.len(), 22_050);

    let out = resample_to_rate(&input, 22_050, 44_100);
    assert_eq!(out.len(), 88_200);
}

#[test]
fn resample_preserves_constant_signal() {
    let input = vec![0.5f32; 4800];
    for sample in resample_to_rate(&input, 48_000, 44_100) {
        assert!((sample - 0.5).abs() < 1e-6);
    }
}
