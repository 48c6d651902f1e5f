//! Habla - a single-turn voice chatbot for Azure OpenAI and Azure Speech
//!
//! This library provides the pieces of one voice turn:
//! - Audio capture and playback on the default devices
//! - Speech recognition and synthesis via the Azure Speech REST API
//! - Chat completions via an Azure OpenAI deployment
//! - The turn orchestration tying them together
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      habla                           │
//! │   Capture  │  Segmenter  │  Turn  │  Playback       │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Azure REST APIs                      │
//! │   Speech STT  │  Speech TTS  │  OpenAI chat         │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod turn;
pub mod voice;

pub use chat::{ChatClient, ChatMessage};
pub use config::Config;
pub use error::{Error, Result};
pub use turn::{ChatModel, SpeechService};
pub use voice::{AzureSpeech, RecognitionOutcome};
