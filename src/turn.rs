//! Turn orchestration
//!
//! One turn is: capture an utterance, classify the recognition outcome,
//! and — only for a recognized non-empty transcript — generate a reply
//! and speak it. The two cloud capabilities sit behind traits so the
//! orchestration is testable without audio hardware or a network.
//!
//! Failure policy: per-turn failures from generation or synthesis are
//! reported on one line and swallowed; the process still exits normally.
//! Only bootstrap failures terminate the process (see `main.rs`).

use async_trait::async_trait;

use crate::Result;
use crate::voice::RecognitionOutcome;

/// Speech capability: one-shot recognition from the default microphone
/// and spoken synthesis to the default speaker
#[async_trait(?Send)]
pub trait SpeechService {
    /// Capture and transcribe one utterance, blocking until a terminal
    /// outcome
    async fn recognize_once(&mut self) -> Result<RecognitionOutcome>;

    /// Speak the given text, blocking until playback completes
    async fn synthesize(&mut self, text: &str) -> Result<()>;
}

/// Generation capability: one completion for a single-message context
#[async_trait(?Send)]
pub trait ChatModel {
    /// Request one reply for the prompt
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Capture one utterance and report its classified outcome
///
/// Prints exactly one status line per branch, plus one error-detail line
/// when a cancellation was caused by an underlying error. Returns the
/// transcript only when speech was recognized.
///
/// # Errors
///
/// Returns error only for local device failures; service-side conditions
/// arrive as classified outcomes.
pub async fn listen(speech: &mut dyn SpeechService) -> Result<Option<String>> {
    println!("Listening, say something...");
    let outcome = speech.recognize_once().await?;
    Ok(report_outcome(&outcome, false))
}

/// Recognition-only variant: capture one utterance and report it, with a
/// configuration hint when the cancellation was error-caused
///
/// # Errors
///
/// Returns error only for local device failures.
pub async fn recognize_only(speech: &mut dyn SpeechService) -> Result<()> {
    println!("Listening, say something...");
    let outcome = speech.recognize_once().await?;
    report_outcome(&outcome, true);
    Ok(())
}

/// Print the status line(s) for an outcome; transcript for `Recognized`
fn report_outcome(outcome: &RecognitionOutcome, with_hint: bool) -> Option<String> {
    match outcome {
        RecognitionOutcome::Recognized(text) => {
            println!("Recognized: {text}");
            Some(text.clone())
        }
        RecognitionOutcome::NoMatch => {
            println!("No speech could be recognized.");
            None
        }
        RecognitionOutcome::Canceled {
            reason,
            error_detail,
        } => {
            println!("Recognition canceled: {reason}");
            if let Some(detail) = error_detail {
                println!("Error details: {detail}");
                if with_hint {
                    println!("Did you set the speech resource key and region values correctly?");
                }
            }
            None
        }
    }
}

/// Generate a reply for the transcript and speak it
///
/// Empty transcripts are a no-op: the function returns immediately with
/// no network call. A failure from either the generation call or the
/// synthesis call is reported on one line and swallowed.
pub async fn reply(model: &dyn ChatModel, speech: &mut dyn SpeechService, transcript: &str) {
    if transcript.is_empty() {
        return;
    }

    println!("Generating reply...");

    if let Err(e) = generate_and_speak(model, speech, transcript).await {
        println!("Error while talking to the chatbot: {e}");
        tracing::debug!(error = %e, "turn degraded to no spoken reply");
    }
}

async fn generate_and_speak(
    model: &dyn ChatModel,
    speech: &mut dyn SpeechService,
    transcript: &str,
) -> Result<()> {
    let text = model.complete(transcript).await?;
    println!("Chatbot reply: {text}");

    // The reply is passed to synthesis exactly as generated
    speech.synthesize(&text).await
}

/// Run one full turn: listen, then reply if something was recognized
///
/// # Errors
///
/// Returns error only for local device failures during capture.
pub async fn run_turn(speech: &mut dyn SpeechService, model: &dyn ChatModel) -> Result<()> {
    if let Some(transcript) = listen(speech).await? {
        reply(model, speech, &transcript).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_yields_transcript() {
        let outcome = RecognitionOutcome::Recognized("hola".to_string());
        assert_eq!(report_outcome(&outcome, false), Some("hola".to_string()));
    }

    #[test]
    fn test_no_match_yields_nothing() {
        assert_eq!(report_outcome(&RecognitionOutcome::NoMatch, false), None);
    }

    #[test]
    fn test_canceled_yields_nothing() {
        let outcome = RecognitionOutcome::Canceled {
            reason: "Error".to_string(),
            error_detail: Some("connection refused".to_string()),
        };
        assert_eq!(report_outcome(&outcome, true), None);
    }
}
