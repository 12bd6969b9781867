//! [`LlmClient`] over the OpenAI Chat Completions API.
//!
//! Reads `OPENAI_API_KEY` from the environment unless a config is passed in. Every
//! stage sends one system and one user message.

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestUserMessage, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs, ResponseFormat as WireFormat,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, ResponseFormat};

/// Chat model handle. Temperature starts at 0 so grading is as repeatable as the
/// provider allows.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl ChatOpenAI {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new(), model)
    }

    /// Explicit key or base URL, e.g. for a compatible gateway.
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(
        &self,
        system: &str,
        user: &str,
        format: ResponseFormat,
    ) -> Result<CreateChatCompletionRequest, AgentError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.as_str())
            .temperature(self.temperature)
            .messages([
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage::from(
                    system,
                )),
                ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(user)),
            ]);
        if format == ResponseFormat::Json {
            args.response_format(WireFormat::JsonObject);
        }
        args.build()
            .map_err(|e| AgentError::llm(format!("building chat request: {}", e)))
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        format: ResponseFormat,
    ) -> Result<String, AgentError> {
        let request = self.request(system, user, format)?;
        tracing::debug!(model = %self.model, ?format, "chat completion request");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::llm(format!("chat completion: {}", e)))?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion usage"
            );
        }
        match response.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content.unwrap_or_default()),
            None => Err(AgentError::llm("chat completion returned no choices")),
        }
    }
}
