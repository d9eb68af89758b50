use async_openai::{
    Client,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
        CreateChatCompletionResponse,
    },
};

use super::{GenerateRequest, GenerateResponse, Provider};

/// Chat-completions text provider, selected with `LLM_PROVIDER=openai`.
pub struct OpenAIProvider {
    client: Client<OpenAIConfig>,
}

impl OpenAIProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::with_config(OpenAIConfig::new().with_api_key(api_key)),
        }
    }
}

fn chat_request(req: &GenerateRequest) -> CreateChatCompletionRequest {
    let system = ChatCompletionRequestSystemMessage {
        content: ChatCompletionRequestSystemMessageContent::Text(req.system.clone()),
        name: None,
    };
    let user = ChatCompletionRequestUserMessage {
        content: ChatCompletionRequestUserMessageContent::Text(req.prompt.clone()),
        name: None,
    };

    #[allow(deprecated)]
    CreateChatCompletionRequest {
        model: req.model.clone(),
        messages: vec![
            ChatCompletionRequestMessage::System(system),
            ChatCompletionRequestMessage::User(user),
        ],
        max_completion_tokens: Some(req.max_tokens),
        ..Default::default()
    }
}

fn into_generate_response(response: CreateChatCompletionResponse) -> GenerateResponse {
    let first = response.choices.into_iter().next();
    let finish_reason = first
        .as_ref()
        .and_then(|c| c.finish_reason)
        .map(|r| format!("{r:?}").to_lowercase())
        .unwrap_or_default();
    let content = first.and_then(|c| c.message.content).unwrap_or_default();
    let (input_tokens, output_tokens) = response
        .usage
        .map(|u| (u.prompt_tokens, u.completion_tokens))
        .unwrap_or((0, 0));

    GenerateResponse {
        content,
        model: response.model,
        input_tokens,
        output_tokens,
        finish_reason,
        provider: String::new(),
    }
}

#[async_trait::async_trait]
impl Provider for OpenAIProvider {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let response = self.client.chat().create(chat_request(req)).await?;
        Ok(into_generate_response(response))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_has_system_then_user() {
        let request = chat_request(&GenerateRequest {
            model: "gpt-4o".into(),
            system: "write stamp prompts".into(),
            prompt: "Create me a prompt for Coit Tower in San Francisco, California".into(),
            max_tokens: 2048,
            operation: "stamp_prompt".into(),
        });

        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.max_completion_tokens, Some(2048));
        assert!(matches!(
            request.messages.as_slice(),
            [
                ChatCompletionRequestMessage::System(_),
                ChatCompletionRequestMessage::User(_)
            ]
        ));
    }
}
