//! Text-to-speech via the Azure Speech REST API

use crate::{Error, Result};

/// Output format requested from the synthesis endpoint
const OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";

/// Synthesizes speech from text
pub struct SpeechSynthesizer {
    client: reqwest::Client,
    subscription_key: String,
    region: String,
    voice: String,
}

impl SpeechSynthesizer {
    /// Create a synthesizer for the given subscription and voice
    ///
    /// # Errors
    ///
    /// Returns error if the subscription key or region is empty.
    pub fn new(subscription_key: String, region: String, voice: String) -> Result<Self> {
        if subscription_key.is_empty() || region.is_empty() {
            return Err(Error::Config(
                "speech key and region required for synthesis".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            subscription_key,
            region,
            voice,
        })
    }

    /// Synthesize text to speech
    ///
    /// # Returns
    ///
    /// Audio bytes (MP3 format)
    ///
    /// # Errors
    ///
    /// Returns error if the synthesis request fails.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        tracing::debug!(chars = text.len(), voice = %self.voice, "starting synthesis");

        let url = format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            self.region
        );

        let ssml = build_ssml(&self.voice, text);

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .body(ssml)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("speech API error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        tracing::debug!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }
}

/// Build the SSML document for one synthesis request
fn build_ssml(voice: &str, text: &str) -> String {
    // The voice name encodes its locale, e.g. es-ES-ElviraNeural
    let lang = voice
        .splitn(3, '-')
        .take(2)
        .collect::<Vec<_>>()
        .join("-");

    format!(
        "<speak version='1.0' xml:lang='{lang}'><voice name='{voice}'>{}</voice></speak>",
        escape_xml(text)
    )
}

/// Escape text for embedding in SSML
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_xml("it's \"fine\""), "it&apos;s &quot;fine&quot;");
        assert_eq!(escape_xml("¿Qué hora es?"), "¿Qué hora es?");
    }

    #[test]
    fn test_build_ssml() {
        let ssml = build_ssml("es-ES-ElviraNeural", "Hola <tag>");
        assert!(ssml.contains("xml:lang='es-ES'"));
        assert!(ssml.contains("<voice name='es-ES-ElviraNeural'>"));
        assert!(ssml.contains("Hola &lt;tag&gt;"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = SpeechSynthesizer::new(
            String::new(),
            "westeurope".to_string(),
            "es-ES-ElviraNeural".to_string(),
        );
        assert!(result.is_err());
    }
}
