//! Utterance endpointing
//!
//! Decides when the speaker has finished one utterance, using RMS energy
//! over the incoming sample stream. The recognizer feeds it capture chunks
//! and stops listening once a segment completes or the initial-silence
//! budget runs out.

/// Minimum audio energy to consider a chunk speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum amount of speech for a usable utterance (samples at 16kHz)
const MIN_SPEECH_SAMPLES: usize = 4800; // 0.3 seconds

/// Trailing silence that ends an utterance (samples)
const SILENCE_SAMPLES: usize = 8000; // 0.5 seconds

/// State of the segmenter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    /// Waiting for speech to begin
    Idle,
    /// Speech detected, accumulating the utterance
    Listening,
}

/// Segments one utterance out of a live sample stream
pub struct UtteranceSegmenter {
    state: SegmenterState,
    speech_buffer: Vec<f32>,
    speech_samples: usize,
    silence_counter: usize,
    idle_samples: usize,
}

impl Default for UtteranceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl UtteranceSegmenter {
    /// Create a segmenter waiting for speech
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SegmenterState::Idle,
            speech_buffer: Vec::new(),
            speech_samples: 0,
            silence_counter: 0,
            idle_samples: 0,
        }
    }

    /// Feed captured samples
    ///
    /// Returns true once the utterance is complete: enough speech was
    /// heard and it was followed by trailing silence.
    pub fn process(&mut self, samples: &[f32]) -> bool {
        let energy = calculate_energy(samples);
        let is_speech = energy > ENERGY_THRESHOLD;

        match self.state {
            SegmenterState::Idle => {
                if is_speech {
                    self.state = SegmenterState::Listening;
                    self.speech_buffer.clear();
                    self.speech_buffer.extend_from_slice(samples);
                    self.speech_samples = samples.len();
                    self.silence_counter = 0;
                    tracing::trace!(energy, "speech detected, listening");
                } else {
                    self.idle_samples += samples.len();
                }
            }
            SegmenterState::Listening => {
                self.speech_buffer.extend_from_slice(samples);

                if is_speech {
                    self.speech_samples += samples.len();
                    self.silence_counter = 0;
                } else {
                    self.silence_counter += samples.len();
                }

                tracing::trace!(
                    buffer_len = self.speech_buffer.len(),
                    speech = self.speech_samples,
                    silence = self.silence_counter,
                    is_speech,
                    "listening state"
                );

                if self.silence_counter > SILENCE_SAMPLES
                    && self.speech_samples > MIN_SPEECH_SAMPLES
                {
                    tracing::debug!(samples = self.speech_buffer.len(), "utterance complete");
                    return true;
                }

                // Brief noise with no real speech behind it: go back to
                // idle, counting everything heard toward the idle budget
                if self.silence_counter > SILENCE_SAMPLES * 2 {
                    tracing::trace!("noise without speech, resetting");
                    let heard = self.idle_samples + self.speech_buffer.len();
                    self.reset();
                    self.idle_samples = heard;
                }
            }
        }

        false
    }

    /// Record a capture gap where no samples were delivered
    ///
    /// A stalled input stream consumes the idle budget the same way
    /// delivered silence does, so a dead microphone cannot block the
    /// listener forever. Gaps while an utterance is in progress are
    /// ignored.
    pub fn note_stall(&mut self, samples: usize) {
        if self.state == SegmenterState::Idle {
            self.idle_samples += samples;
        }
    }

    /// Samples of uninterrupted idle time heard so far
    ///
    /// Used by the recognizer to bound how long it waits for speech to
    /// start before giving up with a no-match.
    #[must_use]
    pub const fn idle_samples(&self) -> usize {
        self.idle_samples
    }

    /// Take the accumulated utterance, clearing it
    pub fn take_speech_buffer(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.speech_buffer)
    }

    /// Accumulated utterance so far
    #[must_use]
    pub fn speech_buffer(&self) -> &[f32] {
        &self.speech_buffer
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SegmenterState {
        self.state
    }

    /// Reset to idle, discarding any buffered speech
    pub fn reset(&mut self) {
        self.state = SegmenterState::Idle;
        self.speech_buffer.clear();
        self.speech_samples = 0;
        self.silence_counter = 0;
        self.idle_samples = 0;
    }
}

/// RMS energy of a sample chunk
#[allow(clippy::cast_precision_loss)]
fn calculate_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_calculation() {
        let silence = vec![0.0f32; 100];
        assert!(calculate_energy(&silence) < 0.001);

        let loud = vec![0.5f32; 100];
        assert!(calculate_energy(&loud) > 0.4);
    }

    #[test]
    fn test_idle_counts_silence() {
        let mut segmenter = UtteranceSegmenter::new();
        assert!(!segmenter.process(&vec![0.0f32; 1600]));
        assert_eq!(segmenter.state(), SegmenterState::Idle);
        assert_eq!(segmenter.idle_samples(), 1600);
    }

    #[test]
    fn test_speech_starts_listening() {
        let mut segmenter = UtteranceSegmenter::new();
        assert!(!segmenter.process(&vec![0.3f32; 1600]));
        assert_eq!(segmenter.state(), SegmenterState::Listening);
    }
}
