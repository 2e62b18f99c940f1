use serde_json::Value;

/// A tool advertised to the model: its name, what it does, and the JSON
/// schema of its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocationRequest {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocationResult {
    pub id: String,
    pub content: String,
    pub is_error: bool,
}

/// One entry of the conversation history. History is append-only; a turn is
/// never edited after it is pushed.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    User(String),
    Assistant {
        text: String,
        tool_calls: Vec<ToolInvocationRequest>,
    },
    /// Every result of one round, in the order the calls were requested.
    ToolResults(Vec<ToolInvocationResult>),
}

impl Turn {
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Turn::Assistant {
            text: text.into(),
            tool_calls: vec![],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    ToolUse(ToolInvocationRequest),
}

/// What the remote endpoint returned for one round.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReply {
    pub stop: StopReason,
    pub blocks: Vec<ContentBlock>,
}

impl ModelReply {
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text(text) => Some(text.as_str()),
                ContentBlock::ToolUse(_) => None,
            })
            .collect()
    }

    pub fn tool_requests(&self) -> Vec<ToolInvocationRequest> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse(request) => Some(request.clone()),
                ContentBlock::Text(_) => None,
            })
            .collect()
    }
}
