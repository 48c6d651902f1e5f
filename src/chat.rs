//! Chat completions via the Azure OpenAI REST API

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::turn::ChatModel;
use crate::{Config, Error, Result, config};

/// One message in a chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Message role (`user`, `assistant`, `system`)
    pub role: &'static str,
    /// Message text
    pub content: String,
}

#[derive(Serialize)]
struct CompletionRequest {
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for one Azure OpenAI chat deployment
pub struct ChatClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
    temperature: f32,
}

impl ChatClient {
    /// Build a client from the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint, key or deployment is empty.
    pub fn new(config: &Config) -> Result<Self> {
        if config.endpoint.is_empty() || config.api_key.is_empty() || config.deployment.is_empty() {
            return Err(Error::Config(
                "endpoint, API key and deployment required for chat".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            deployment: config.deployment.clone(),
            api_version: config::API_VERSION.to_string(),
            temperature: config::TEMPERATURE,
        })
    }

    /// Request one completion for the given messages
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response carries no
    /// usable reply text.
    pub async fn complete_messages(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        );

        let request = CompletionRequest {
            messages,
            temperature: self.temperature,
        };

        tracing::debug!(deployment = %self.deployment, "requesting completion");

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "chat API error");
            return Err(Error::Chat(format!("chat API error {status}: {body}")));
        }

        let result: CompletionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse completion response");
            e
        })?;

        let reply = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Chat("completion carried no reply text".to_string()))?;

        tracing::info!(chars = reply.len(), "completion received");
        Ok(reply)
    }
}

#[async_trait(?Send)]
impl ChatModel for ChatClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.complete_messages(vec![ChatMessage {
            role: "user",
            content: prompt.to_string(),
        }])
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config() -> Config {
        Config::new(
            "https://example.openai.azure.com".to_string(),
            "key".to_string(),
            "gpt-4o".to_string(),
            "speech-key".to_string(),
            "westeurope".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_client_from_config() {
        let client = ChatClient::new(&make_config()).unwrap();
        assert_eq!(client.deployment, "gpt-4o");
        assert_eq!(client.api_version, config::API_VERSION);
        assert!((client.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_request_serialization() {
        let request = CompletionRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: "¿Qué hora es?".to_string(),
            }],
            temperature: 0.7,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "¿Qué hora es?");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"Son las tres."}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(json).unwrap();
        let reply = parsed.choices[0].message.content.as_deref();
        assert_eq!(reply, Some("Son las tres."));
    }

    #[test]
    fn test_response_without_content() {
        let json = r#"{"choices":[{"message":{"role":"assistant"}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
