use crate::types::{
    ContentBlock, ModelReply, StopReason, ToolDescriptor, ToolInvocationRequest, Turn,
};

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessage,
    ChatCompletionRequestAssistantMessageContent, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessage, ChatCompletionRequestSystemMessageContent,
    ChatCompletionRequestToolMessage, ChatCompletionRequestToolMessageContent,
    ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent, ChatCompletionTool,
    ChatCompletionToolType, CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    CreateChatCompletionResponse, FinishReason, FunctionCall, FunctionObject,
};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Everything one round sends to the remote endpoint.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub history: Vec<Turn>,
    pub tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    OpenAI(#[from] OpenAIError),
    #[error("response contained no choices")]
    NoChoices,
}

#[async_trait]
pub trait ChatBackend {
    async fn complete(&self, request: ChatRequest) -> Result<ModelReply, BackendError>;
}

/// Chat-completions backend. Anthropic, OpenAI and most self-hosted servers
/// speak this wire format; only the base URL differs.
pub struct OpenAiBackend {
    inner: Client<OpenAIConfig>,
}

impl OpenAiBackend {
    pub fn new(api_key: &str, api_base: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base.trim_end_matches('/'));
        Self {
            inner: Client::with_config(config),
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn complete(&self, request: ChatRequest) -> Result<ModelReply, BackendError> {
        let request = openai_request(&request)?;
        let response = self.inner.chat().create(request).await?;
        model_reply(response)
    }
}

impl From<&ToolDescriptor> for ChatCompletionTool {
    fn from(value: &ToolDescriptor) -> Self {
        Self {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: value.name.clone(),
                description: Some(value.description.clone()),
                parameters: Some(value.parameters.clone()),
                strict: None,
            },
        }
    }
}

pub fn openai_request(request: &ChatRequest) -> Result<CreateChatCompletionRequest, OpenAIError> {
    let mut args = CreateChatCompletionRequestArgs::default();
    args.model(request.model.clone())
        .messages(openai_messages(&request.system, &request.history))
        .max_completion_tokens(request.max_tokens)
        .n(1);
    if !request.tools.is_empty() {
        args.tools(
            request
                .tools
                .iter()
                .map(ChatCompletionTool::from)
                .collect::<Vec<_>>(),
        );
    }
    args.build()
}

pub fn openai_messages(system: &str, history: &[Turn]) -> Vec<ChatCompletionRequestMessage> {
    let mut messages = vec![ChatCompletionRequestMessage::System(
        ChatCompletionRequestSystemMessage {
            content: ChatCompletionRequestSystemMessageContent::Text(system.to_string()),
            name: None,
        },
    )];
    for turn in history {
        match turn {
            Turn::User(text) => messages.push(ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(text.clone()),
                    name: None,
                },
            )),
            Turn::Assistant { text, tool_calls } => {
                let tool_calls: Vec<_> = tool_calls
                    .iter()
                    .map(|call| ChatCompletionMessageToolCall {
                        id: call.id.clone(),
                        r#type: ChatCompletionToolType::Function,
                        function: FunctionCall {
                            name: call.name.clone(),
                            arguments: call.arguments.to_string(),
                        },
                    })
                    .collect();
                messages.push(ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessage {
                        content: if text.is_empty() && !tool_calls.is_empty() {
                            None
                        } else {
                            Some(ChatCompletionRequestAssistantMessageContent::Text(
                                text.clone(),
                            ))
                        },
                        tool_calls: if tool_calls.is_empty() {
                            None
                        } else {
                            Some(tool_calls)
                        },
                        ..Default::default()
                    },
                ))
            }
            Turn::ToolResults(results) => {
                messages.extend(results.iter().map(|result| {
                    ChatCompletionRequestMessage::Tool(ChatCompletionRequestToolMessage {
                        content: ChatCompletionRequestToolMessageContent::Text(
                            result.content.clone(),
                        ),
                        tool_call_id: result.id.clone(),
                    })
                }))
            }
        }
    }
    messages
}

pub fn model_reply(response: CreateChatCompletionResponse) -> Result<ModelReply, BackendError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(BackendError::NoChoices)?;

    let stop = match choice.finish_reason {
        Some(FinishReason::ToolCalls) => StopReason::ToolUse,
        _ => StopReason::EndTurn,
    };

    let mut blocks = vec![];
    if let Some(text) = choice.message.content.filter(|text| !text.is_empty()) {
        blocks.push(ContentBlock::Text(text));
    }
    for call in choice.message.tool_calls.unwrap_or_default() {
        blocks.push(ContentBlock::ToolUse(ToolInvocationRequest {
            id: call.id,
            arguments: parse_arguments(&call.function.arguments),
            name: call.function.name,
        }));
    }
    Ok(ModelReply { stop, blocks })
}

// Unparseable arguments are kept as a raw string so the tool call fails on
// its own instead of failing the round.
fn parse_arguments(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolInvocationResult;
    use serde_json::json;

    fn response(body: Value) -> CreateChatCompletionResponse {
        serde_json::from_value(body).unwrap()
    }

    fn completion(message: Value, finish_reason: &str) -> CreateChatCompletionResponse {
        response(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1751932800,
            "model": "claude-3-5-sonnet-20241022",
            "choices": [{
                "index": 0,
                "message": message,
                "finish_reason": finish_reason
            }]
        }))
    }

    #[test]
    fn plain_text_reply_ends_the_turn() {
        let reply = model_reply(completion(
            json!({"role": "assistant", "content": "Hello!"}),
            "stop",
        ))
        .unwrap();
        assert_eq!(reply.stop, StopReason::EndTurn);
        assert_eq!(reply.text(), "Hello!");
        assert!(reply.tool_requests().is_empty());
    }

    #[test]
    fn tool_calls_keep_their_order_and_ids() {
        let reply = model_reply(completion(
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [
                    {"id": "call_a", "type": "function",
                     "function": {"name": "get_monday", "arguments": "{\"date_str\":\"2025-07-08\"}"}},
                    {"id": "call_b", "type": "function",
                     "function": {"name": "get_current_date", "arguments": ""}}
                ]
            }),
            "tool_calls",
        ))
        .unwrap();
        assert_eq!(reply.stop, StopReason::ToolUse);
        let requests = reply.tool_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].id, "call_a");
        assert_eq!(requests[0].arguments, json!({"date_str": "2025-07-08"}));
        assert_eq!(requests[1].id, "call_b");
        assert_eq!(requests[1].arguments, json!({}));
    }

    #[test]
    fn garbled_arguments_are_kept_raw() {
        assert_eq!(parse_arguments("{not json"), json!("{not json"));
    }

    #[test]
    fn empty_choices_is_an_error() {
        let err = model_reply(response(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1751932800,
            "model": "m",
            "choices": []
        })))
        .unwrap_err();
        assert!(matches!(err, BackendError::NoChoices));
    }

    #[test]
    fn history_maps_to_chat_messages() {
        let history = vec![
            Turn::User("monday of 2025-07-08?".into()),
            Turn::Assistant {
                text: String::new(),
                tool_calls: vec![ToolInvocationRequest {
                    id: "call_a".into(),
                    name: "get_monday".into(),
                    arguments: json!({"date_str": "2025-07-08"}),
                }],
            },
            Turn::ToolResults(vec![ToolInvocationResult {
                id: "call_a".into(),
                content: "2025-07-07".into(),
                is_error: false,
            }]),
            Turn::assistant_text("It is 2025-07-07."),
        ];
        let messages = serde_json::to_value(openai_messages("be helpful", &history)).unwrap();
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[2]["tool_calls"][0]["id"], "call_a");
        assert_eq!(messages[3]["role"], "tool");
        assert_eq!(messages[3]["tool_call_id"], "call_a");
        assert_eq!(messages[3]["content"], "2025-07-07");
        assert_eq!(messages[4]["content"], "It is 2025-07-07.");
        assert_eq!(messages.as_array().unwrap().len(), 5);
    }

    #[test]
    fn tools_are_omitted_when_empty() {
        let mut request = ChatRequest {
            model: "m".into(),
            max_tokens: 1000,
            system: "s".into(),
            history: vec![Turn::User("hi".into())],
            tools: vec![],
        };
        assert!(openai_request(&request).unwrap().tools.is_none());

        request.tools.push(ToolDescriptor {
            name: "get_current_date".into(),
            description: "today".into(),
            parameters: json!({"type": "object"}),
        });
        let tools = openai_request(&request).unwrap().tools.unwrap();
        assert_eq!(tools[0].function.name, "get_current_date");
    }
}
