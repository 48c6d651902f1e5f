//! Voice pipeline tests
//!
//! Exercises the endpointing state machine and WAV encoding without
//! audio hardware.

use std::io::Cursor;

use habla::voice::{SAMPLE_RATE, SegmenterState, UtteranceSegmenter, samples_to_wav};

/// Generate sine wave audio samples
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate silence
fn generate_silence(duration_secs: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    vec![0.0; num_samples]
}

#[test]
fn test_segmenter_starts_idle() {
    let segmenter = UtteranceSegmenter::new();
    assert_eq!(segmenter.state(), SegmenterState::Idle);
    assert_eq!(segmenter.idle_samples(), 0);
    assert!(segmenter.speech_buffer().is_empty());
}

#[test]
fn test_silence_does_not_start_listening() {
    let mut segmenter = UtteranceSegmenter::new();

    let silence = generate_silence(0.5);
    assert!(!segmenter.process(&silence));
    assert_eq!(segmenter.state(), SegmenterState::Idle);
    assert_eq!(segmenter.idle_samples(), silence.len());
}

#[test]
fn test_speech_then_silence_completes_utterance() {
    let mut segmenter = UtteranceSegmenter::new();

    let speech = generate_sine_samples(440.0, 0.5, 0.3);
    assert!(!segmenter.process(&speech));
    assert_eq!(segmenter.state(), SegmenterState::Listening);

    let more_speech = generate_sine_samples(440.0, 0.3, 0.3);
    segmenter.process(&more_speech);

    let silence = generate_silence(0.6);
    assert!(segmenter.process(&silence));
}

#[test]
fn test_speech_buffer_accumulates() {
    let mut segmenter = UtteranceSegmenter::new();

    let chunk1 = generate_sine_samples(440.0, 0.1, 0.3);
    segmenter.process(&chunk1);

    let chunk2 = generate_sine_samples(440.0, 0.1, 0.3);
    segmenter.process(&chunk2);

    assert_eq!(segmenter.speech_buffer().len(), chunk1.len() + chunk2.len());
}

#[test]
fn test_take_speech_buffer_drains() {
    let mut segmenter = UtteranceSegmenter::new();

    let speech = generate_sine_samples(440.0, 0.1, 0.3);
    segmenter.process(&speech);

    let taken = segmenter.take_speech_buffer();
    assert_eq!(taken.len(), speech.len());
    assert!(segmenter.speech_buffer().is_empty());
}

#[test]
fn test_reset_returns_to_idle() {
    let mut segmenter = UtteranceSegmenter::new();

    let speech = generate_sine_samples(440.0, 0.2, 0.3);
    segmenter.process(&speech);
    assert_eq!(segmenter.state(), SegmenterState::Listening);

    segmenter.reset();
    assert_eq!(segmenter.state(), SegmenterState::Idle);
    assert!(segmenter.speech_buffer().is_empty());
    assert_eq!(segmenter.idle_samples(), 0);
}

#[test]
fn test_idle_time_accumulates_across_chunks() {
    let mut segmenter = UtteranceSegmenter::new();

    for _ in 0..5 {
        segmenter.process(&generate_silence(0.1));
    }

    let expected = generate_silence(0.1).len() * 5;
    assert_eq!(segmenter.idle_samples(), expected);
}

#[test]
fn test_stall_counts_toward_idle_budget() {
    let mut segmenter = UtteranceSegmenter::new();

    segmenter.note_stall(1600);
    segmenter.note_stall(1600);
    assert_eq!(segmenter.idle_samples(), 3200);

    // Stalls during an utterance do not count
    let speech = generate_sine_samples(440.0, 0.2, 0.3);
    segmenter.process(&speech);
    assert_eq!(segmenter.state(), SegmenterState::Listening);

    segmenter.note_stall(1600);
    assert_eq!(segmenter.idle_samples(), 3200);
}

#[test]
fn test_brief_noise_does_not_defer_idle_budget() {
    let mut segmenter = UtteranceSegmenter::new();

    // 0.1s of noise is below the minimum speech duration
    let noise = generate_sine_samples(440.0, 0.1, 0.3);
    assert!(!segmenter.process(&noise));
    assert_eq!(segmenter.state(), SegmenterState::Listening);

    // Trailing silence must never complete this as an utterance, and
    // once the segmenter gives up, everything heard counts as idle time
    let mut fed = noise.len();
    for _ in 0..12 {
        let chunk = generate_silence(0.1);
        fed += chunk.len();
        assert!(!segmenter.process(&chunk));
    }

    assert_eq!(segmenter.state(), SegmenterState::Idle);
    assert_eq!(segmenter.idle_samples(), fed);
}

#[test]
fn test_samples_to_wav_header() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let wav_data = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    assert_eq!(&wav_data[0..4], b"RIFF");
    assert_eq!(&wav_data[8..12], b"WAVE");
    assert!(wav_data.len() > 44); // header is 44 bytes
}

#[test]
fn test_wav_roundtrip() {
    let original_samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav_data = samples_to_wav(&original_samples, SAMPLE_RATE).unwrap();

    let cursor = Cursor::new(wav_data);
    let mut reader = hound::WavReader::new(cursor).unwrap();

    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);

    let read_samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_samples.len(), original_samples.len());
}
