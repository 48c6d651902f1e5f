//! Speech-to-text via the Azure Speech short-audio REST API

use serde::Deserialize;

use crate::{Error, Result};

/// Classified result of one recognition call
///
/// Exactly one variant applies per call; `Recognized` is the only variant
/// carrying usable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    /// Speech was recognized and transcribed
    Recognized(String),
    /// No speech was detected, or no match was found for the audio
    NoMatch,
    /// Recognition was canceled by the service or the transport
    Canceled {
        /// Service-reported cancellation reason
        reason: String,
        /// Present when the cancellation was caused by an underlying error
        error_detail: Option<String>,
    },
}

/// Response from the Azure Speech recognition API (simple format)
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RecognitionResponse {
    recognition_status: String,
    #[serde(default)]
    display_text: String,
}

/// Transcribes one utterance of WAV audio
pub struct SpeechRecognizer {
    client: reqwest::Client,
    subscription_key: String,
    region: String,
    language: String,
}

impl SpeechRecognizer {
    /// Create a recognizer for the given subscription
    ///
    /// # Errors
    ///
    /// Returns error if the subscription key or region is empty.
    pub fn new(subscription_key: String, region: String, language: String) -> Result<Self> {
        if subscription_key.is_empty() || region.is_empty() {
            return Err(Error::Config(
                "speech key and region required for recognition".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            subscription_key,
            region,
            language,
        })
    }

    /// Recognize one utterance from WAV bytes
    ///
    /// Never fails for service-side conditions: transport and API errors
    /// classify as `Canceled` so the caller sees one outcome per call.
    pub async fn recognize(&self, audio: &[u8]) -> RecognitionOutcome {
        tracing::debug!(audio_bytes = audio.len(), "starting recognition");

        let url = format!(
            "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1?language={}&format=simple",
            self.region, self.language
        );

        let response = match self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .header("Content-Type", "audio/wav; codecs=audio/pcm; samplerate=16000")
            .body(audio.to_vec())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "recognition request failed");
                return RecognitionOutcome::Canceled {
                    reason: "Error".to_string(),
                    error_detail: Some(e.to_string()),
                };
            }
        };

        let status = response.status();
        tracing::debug!(status = %status, "received recognition response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "speech API error");
            return RecognitionOutcome::Canceled {
                reason: "Error".to_string(),
                error_detail: Some(format!("speech API error {status}: {body}")),
            };
        }

        match response.json::<RecognitionResponse>().await {
            Ok(result) => classify(&result.recognition_status, result.display_text),
            Err(e) => {
                tracing::error!(error = %e, "failed to parse recognition response");
                RecognitionOutcome::Canceled {
                    reason: "Error".to_string(),
                    error_detail: Some(e.to_string()),
                }
            }
        }
    }
}

/// Map a service recognition status to an outcome
fn classify(status: &str, display_text: String) -> RecognitionOutcome {
    match status {
        "Success" => {
            tracing::info!(transcript = %display_text, "recognition complete");
            RecognitionOutcome::Recognized(display_text)
        }
        "NoMatch" | "InitialSilenceTimeout" | "BabbleTimeout" => {
            tracing::info!(status, "no speech recognized");
            RecognitionOutcome::NoMatch
        }
        other => {
            tracing::warn!(status = other, "recognition canceled");
            RecognitionOutcome::Canceled {
                reason: other.to_string(),
                error_detail: None,
            }
        }
    }
}
