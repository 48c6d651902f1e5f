//! Configuration for the habla voice turn
//!
//! Everything comes from the process environment; there is no config file.
//! Construction is fail-fast: a missing or empty variable aborts startup
//! before any audio or network activity.

use crate::{Error, Result};

/// Language tag for speech recognition
pub const RECOGNITION_LANGUAGE: &str = "es-ES";

/// Neural voice used for speech synthesis
pub const SYNTHESIS_VOICE: &str = "es-ES-ElviraNeural";

/// Azure OpenAI REST API version
pub const API_VERSION: &str = "2025-01-01-preview";

/// Sampling temperature for chat completions
pub const TEMPERATURE: f32 = 0.7;

/// Azure service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Azure OpenAI resource endpoint, e.g. `https://myresource.openai.azure.com`
    pub endpoint: String,

    /// Azure OpenAI API key
    pub api_key: String,

    /// Chat model deployment name
    pub deployment: String,

    /// Azure Speech subscription key
    pub speech_key: String,

    /// Azure region, e.g. `westeurope`
    pub region: String,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Reads `AZURE_OPENAI_API_ENDPOINT`, `AZURE_OPENAI_API_KEY`,
    /// `AZURE_OPENAI_DEPLOYMENT`, `AZURE_SPEECH_KEY` and `AZURE_REGION`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first variable that is missing
    /// or empty.
    pub fn from_env() -> Result<Self> {
        Self::new(
            require_env("AZURE_OPENAI_API_ENDPOINT")?,
            require_env("AZURE_OPENAI_API_KEY")?,
            require_env("AZURE_OPENAI_DEPLOYMENT")?,
            require_env("AZURE_SPEECH_KEY")?,
            require_env("AZURE_REGION")?,
        )
    }

    /// Build a configuration from explicit values
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if any value is empty.
    pub fn new(
        endpoint: String,
        api_key: String,
        deployment: String,
        speech_key: String,
        region: String,
    ) -> Result<Self> {
        for (name, value) in [
            ("endpoint", &endpoint),
            ("api key", &api_key),
            ("deployment", &deployment),
            ("speech key", &speech_key),
            ("region", &region),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{name} must not be empty")));
            }
        }

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            deployment,
            speech_key,
            region,
        })
    }
}

/// Read a required environment variable, rejecting empty values
fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{name} is not set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(endpoint: &str) -> Result<Config> {
        Config::new(
            endpoint.to_string(),
            "key".to_string(),
            "gpt-4o".to_string(),
            "speech-key".to_string(),
            "westeurope".to_string(),
        )
    }

    #[test]
    fn test_valid_config() {
        let config = make_config("https://example.openai.azure.com").unwrap();
        assert_eq!(config.endpoint, "https://example.openai.azure.com");
        assert_eq!(config.region, "westeurope");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = make_config("https://example.openai.azure.com/").unwrap();
        assert_eq!(config.endpoint, "https://example.openai.azure.com");
    }

    #[test]
    fn test_empty_value_rejected() {
        let err = Config::new(
            "https://example.openai.azure.com".to_string(),
            String::new(),
            "gpt-4o".to_string(),
            "speech-key".to_string(),
            "westeurope".to_string(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("api key"));
    }

    #[test]
    fn test_whitespace_value_rejected() {
        assert!(make_config("   ").is_err());
    }
}
