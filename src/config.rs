//! Startup configuration
//!
//! Environment is read exactly once, at process start, into an explicit
//! config value that is passed to the components that need it. No other
//! module reads ambient environment state.

use std::env;

/// Which model backend a binding talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProvider {
    Gemini,
    OpenAi,
}

/// A model binding: provider, model identifier, sampling temperature and
/// the credential used to call it.
///
/// An empty `api_key` is allowed — the binding fails at the first model
/// call rather than at startup.
#[derive(Debug, Clone)]
pub struct ModelBinding {
    pub provider: ModelProvider,
    pub model: String,
    pub temperature: f32,
    pub api_key: String,
}

impl ModelBinding {
    /// Select the backend from the available credentials.
    ///
    /// A Gemini key wins over an OpenAI key. With neither present the
    /// default OpenAI binding is returned with an empty key.
    pub fn select(google_api_key: Option<String>, openai_api_key: Option<String>) -> Self {
        if let Some(key) = google_api_key.filter(|k| !k.trim().is_empty()) {
            return Self {
                provider: ModelProvider::Gemini,
                model: "gemini-2.5-flash".to_string(),
                temperature: 0.5,
                api_key: key,
            };
        }

        let api_key = openai_api_key.unwrap_or_default();
        Self {
            provider: ModelProvider::OpenAi,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            api_key,
        }
    }
}

/// Process-wide configuration, built once in the binaries.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: ModelBinding,
    /// Present when the real search provider should be used.
    pub serper_api_key: Option<String>,
    pub port: u16,
}

impl AppConfig {
    /// Read configuration from the environment. Call once at startup,
    /// after `dotenv` has been loaded.
    pub fn from_env() -> Self {
        let model = ModelBinding::select(
            env::var("GOOGLE_API_KEY").ok(),
            env::var("OPENAI_API_KEY").ok(),
        );

        let serper_api_key = env::var("SERPER_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let port = env::var("PORT")
            .or_else(|_| env::var("API_PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Self {
            model,
            serper_api_key,
            port,
        }
    }
}
