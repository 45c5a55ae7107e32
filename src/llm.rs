//! Model backend client
//!
//! One client speaking both supported wire formats: Gemini generateContent
//! and OpenAI-compatible chat completions. Uses a long-lived reqwest::Client
//! for connection pooling.

use crate::config::{ModelBinding, ModelProvider};
use crate::error::AnalyzerError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

const MAX_OUTPUT_TOKENS: u32 = 2048;

/// Seam between the pipeline and the model backend.
#[async_trait::async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, system_instruction: &str, prompt: &str) -> crate::Result<String>;
}

#[async_trait::async_trait]
impl CompletionModel for LlmClient {
    async fn complete(&self, system_instruction: &str, prompt: &str) -> crate::Result<String> {
        self.generate(system_instruction, prompt).await
    }
}

/// Reusable model backend client (connection-pooled)
pub struct LlmClient {
    client: Client,
    binding: ModelBinding,
    gemini_base_url: String,
    openai_base_url: String,
}

impl LlmClient {
    pub fn new(binding: ModelBinding) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            binding,
            gemini_base_url: GEMINI_BASE_URL.to_string(),
            openai_base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    /// Generate a completion for a system instruction + user prompt pair.
    ///
    /// The credential is checked here, not at construction, so a missing
    /// key surfaces at the first call.
    pub async fn generate(&self, system_instruction: &str, prompt: &str) -> crate::Result<String> {
        if self.binding.api_key.is_empty() {
            return Err(AnalyzerError::LlmError(format!(
                "No API key configured for {:?} backend",
                self.binding.provider
            )));
        }

        match self.binding.provider {
            ModelProvider::Gemini => self.generate_gemini(system_instruction, prompt).await,
            ModelProvider::OpenAi => self.generate_openai(system_instruction, prompt).await,
        }
    }

    async fn generate_gemini(&self, system_instruction: &str, prompt: &str) -> crate::Result<String> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.gemini_base_url, self.binding.model, self.binding.api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.binding.temperature,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: system_instruction.to_string(),
                }],
            },
        };

        info!(model = %self.binding.model, "Calling Gemini API");

        let response = self.client.post(&url).json(&request).send().await.map_err(|e| {
            error!("Gemini API request failed: {}", e);
            AnalyzerError::LlmError(format!("Gemini API error: {}", e))
        })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response: {}", error_text);
            return Err(AnalyzerError::LlmError(format!(
                "Gemini API error: {}",
                error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            AnalyzerError::LlmError(format!("Gemini parse error: {}", e))
        })?;

        let answer = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| AnalyzerError::LlmError("Empty response from Gemini".to_string()))?;

        Ok(answer)
    }

    async fn generate_openai(&self, system_instruction: &str, prompt: &str) -> crate::Result<String> {
        let request = OpenAiRequest {
            model: self.binding.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_instruction.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.binding.temperature,
        };

        info!(model = %self.binding.model, "Calling OpenAI-compatible API");

        let response = self
            .client
            .post(&self.openai_base_url)
            .bearer_auth(&self.binding.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("OpenAI API request failed: {}", e);
                AnalyzerError::LlmError(format!("OpenAI API error: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenAI API error response: {}", error_text);
            return Err(AnalyzerError::LlmError(format!(
                "OpenAI API error: {}",
                error_text
            )));
        }

        let completion: OpenAiResponse = response.json().await.map_err(|e| {
            AnalyzerError::LlmError(format!("OpenAI parse error: {}", e))
        })?;

        let answer = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AnalyzerError::LlmError("Empty response from OpenAI".to_string()))?;

        Ok(answer)
    }
}

//
// ================= Gemini wire format =================
//

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(rename = "systemInstruction")]
    system_instruction: SystemInstruction,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

//
// ================= OpenAI wire format =================
//

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelBinding;

    #[test]
    fn test_gemini_request_serialization() {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "What is the revenue trend?".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.5,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: "You are a financial analyst".to_string(),
                }],
            },
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("What is the revenue trend?"));
        assert!(json.contains("systemInstruction"));
        assert!(json.contains("maxOutputTokens"));
    }

    #[test]
    fn test_openai_request_serialization() {
        let request = OpenAiRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "What is the revenue trend?".to_string(),
            }],
            temperature: 0.7,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("gpt-3.5-turbo"));
        assert!(json.contains("What is the revenue trend?"));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_at_call_time() {
        let client = LlmClient::new(ModelBinding::select(None, None));
        let result = client.generate("system", "prompt").await;

        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.to_lowercase().contains("api key"));
    }
}
