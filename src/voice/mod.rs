//! Voice processing module
//!
//! Audio capture and playback on the default devices, utterance
//! endpointing, and the Azure Speech REST clients for recognition and
//! synthesis. [`AzureSpeech`] composes them into the speech capability
//! consumed by the turn orchestration (see `turn.rs`).

mod capture;
mod playback;
mod segment;
mod stt;
mod tts;

pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
pub use playback::AudioPlayback;
pub use segment::{SegmenterState, UtteranceSegmenter};
pub use stt::{RecognitionOutcome, SpeechRecognizer};
pub use tts::SpeechSynthesizer;

use async_trait::async_trait;

use crate::turn::SpeechService;
use crate::{Config, Result, config};

/// How often the capture buffer is drained into the segmenter
const POLL_INTERVAL_MS: u64 = 100;

/// Samples one poll interval is worth at the capture rate
const POLL_INTERVAL_SAMPLES: usize = SAMPLE_RATE as usize / 10;

/// Silence budget before giving up on hearing speech at all
const INITIAL_SILENCE_SAMPLES: usize = SAMPLE_RATE as usize * 10;

/// Hard cap on utterance length
const MAX_UTTERANCE_SAMPLES: usize = SAMPLE_RATE as usize * 30;

/// Speech capability backed by the Azure Speech service
///
/// One instance owns both audio devices and both REST clients; it is
/// constructed once at bootstrap and used by exactly one turn.
pub struct AzureSpeech {
    capture: AudioCapture,
    playback: AudioPlayback,
    recognizer: SpeechRecognizer,
    synthesizer: SpeechSynthesizer,
}

impl AzureSpeech {
    /// Open the audio devices and build the recognition and synthesis
    /// clients
    ///
    /// # Errors
    ///
    /// Returns error if an audio device cannot be opened or the speech
    /// credentials are invalid. Callers treat this as fatal.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            capture: AudioCapture::new()?,
            playback: AudioPlayback::new()?,
            recognizer: SpeechRecognizer::new(
                config.speech_key.clone(),
                config.region.clone(),
                config::RECOGNITION_LANGUAGE.to_string(),
            )?,
            synthesizer: SpeechSynthesizer::new(
                config.speech_key.clone(),
                config.region.clone(),
                config::SYNTHESIS_VOICE.to_string(),
            )?,
        })
    }

    /// Listen until one utterance completes or the silence budget runs out
    ///
    /// Returns the captured samples, or `None` when nothing was heard.
    async fn capture_utterance(&mut self) -> Result<Option<Vec<f32>>> {
        let mut segmenter = UtteranceSegmenter::new();
        self.capture.clear_buffer();
        self.capture.start()?;

        let utterance = loop {
            tokio::time::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS)).await;

            let samples = self.capture.take_buffer();
            if samples.is_empty() {
                // No callbacks from the stream still spends the budget
                segmenter.note_stall(POLL_INTERVAL_SAMPLES);
            } else if segmenter.process(&samples) {
                break Some(segmenter.take_speech_buffer());
            }

            if segmenter.state() == SegmenterState::Idle
                && segmenter.idle_samples() > INITIAL_SILENCE_SAMPLES
            {
                tracing::debug!("initial silence budget exhausted");
                break None;
            }

            if segmenter.speech_buffer().len() > MAX_UTTERANCE_SAMPLES {
                tracing::debug!("utterance length cap reached");
                break Some(segmenter.take_speech_buffer());
            }
        };

        self.capture.stop();
        Ok(utterance)
    }
}

#[async_trait(?Send)]
impl SpeechService for AzureSpeech {
    async fn recognize_once(&mut self) -> Result<RecognitionOutcome> {
        let Some(samples) = self.capture_utterance().await? else {
            return Ok(RecognitionOutcome::NoMatch);
        };

        let wav = samples_to_wav(&samples, SAMPLE_RATE)?;
        Ok(self.recognizer.recognize(&wav).await)
    }

    async fn synthesize(&mut self, text: &str) -> Result<()> {
        let audio = self.synthesizer.synthesize(text).await?;
        self.playback.play_mp3(&audio).await
    }
}
