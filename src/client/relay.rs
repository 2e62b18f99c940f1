use super::backend::{BackendError, ChatBackend, ChatRequest};
use crate::types::{
    ModelReply, StopReason, ToolInvocationRequest, ToolInvocationResult, ToolSet, ToolCallError,
    Turn,
};

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant with access to date-related tools.

You should:
- Answer general questions normally and conversationally
- Use the available date tools when users ask about dates, weekdays, or week information
- Be friendly and helpful with all types of questions

The tools available to you are for date calculations, but you can discuss any topic the user wants to talk about.";

#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub model: String,
    pub max_tokens: u32,
    pub system_prompt: String,
    /// Resend the tool descriptors on the follow-up round.
    pub followup_tools: bool,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: SYSTEM_PROMPT.to_string(),
            followup_tools: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("initial request failed: {0}")]
    FirstRound(#[source] BackendError),
    #[error("follow-up request failed: {0}")]
    SecondRound(#[source] BackendError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    /// Tool names in the order they were requested.
    pub tools_used: Vec<String>,
    /// Tools whose result was an error string rather than a value.
    pub failed_tools: Vec<String>,
}

/// Result of one user turn. `history` is always handed back, even on failure.
#[derive(Debug)]
pub struct Exchange {
    pub history: Vec<Turn>,
    pub outcome: Result<Reply, RelayError>,
}

/// Drives one user turn through at most two rounds with the backend,
/// running any requested tools locally in between.
pub struct Relay<B, C> {
    backend: B,
    toolset: ToolSet<C>,
    context: C,
    settings: RelaySettings,
}

impl<B, C> Relay<B, C>
where
    B: ChatBackend,
    C: Clone,
{
    pub fn new(backend: B, toolset: ToolSet<C>, context: C, settings: RelaySettings) -> Self {
        Self {
            backend,
            toolset,
            context,
            settings,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn send(&self, mut history: Vec<Turn>, message: String) -> Exchange {
        let checkpoint = history.len();
        history.push(Turn::User(message));

        let first = match self.round(&history, true).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "initial round failed");
                history.truncate(checkpoint);
                return Exchange {
                    history,
                    outcome: Err(RelayError::FirstRound(err)),
                };
            }
        };

        let requests = first.tool_requests();
        if first.stop == StopReason::EndTurn || requests.is_empty() {
            let text = first.text();
            history.push(Turn::assistant_text(text.clone()));
            return Exchange {
                history,
                outcome: Ok(Reply {
                    text,
                    tools_used: vec![],
                    failed_tools: vec![],
                }),
            };
        }

        let tools_used = requests.iter().map(|call| call.name.clone()).collect();
        let results: Vec<_> = requests.iter().map(|call| self.dispatch(call)).collect();
        let failed_tools = requests
            .iter()
            .zip(&results)
            .filter(|(_, result)| result.is_error)
            .map(|(call, _)| call.name.clone())
            .collect();
        history.push(Turn::Assistant {
            text: first.text(),
            tool_calls: requests,
        });
        history.push(Turn::ToolResults(results));

        let second = match self.round(&history, self.settings.followup_tools).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "follow-up round failed");
                return Exchange {
                    history,
                    outcome: Err(RelayError::SecondRound(err)),
                };
            }
        };

        if second.stop == StopReason::ToolUse {
            // no third round; unanswered calls are not recorded
            tracing::warn!(
                dropped = second.tool_requests().len(),
                "follow-up reply requested more tools"
            );
        }
        let text = second.text();
        history.push(Turn::assistant_text(text.clone()));
        Exchange {
            history,
            outcome: Ok(Reply {
                text,
                tools_used,
                failed_tools,
            }),
        }
    }

    async fn round(&self, history: &[Turn], with_tools: bool) -> Result<ModelReply, BackendError> {
        let request = ChatRequest {
            model: self.settings.model.clone(),
            max_tokens: self.settings.max_tokens,
            system: self.settings.system_prompt.clone(),
            history: history.to_vec(),
            tools: if with_tools {
                self.toolset.descriptors()
            } else {
                vec![]
            },
        };
        tracing::debug!(turns = history.len(), with_tools, "sending round");
        let reply = self.backend.complete(request).await?;
        tracing::debug!(stop = ?reply.stop, blocks = reply.blocks.len(), "received reply");
        Ok(reply)
    }

    fn dispatch(&self, call: &ToolInvocationRequest) -> ToolInvocationResult {
        tracing::info!(tool = %call.name, id = %call.id, "invoking tool");
        let outcome = self
            .toolset
            .try_tool_call(self.context.clone(), &call.name, call.arguments.clone());
        let (content, is_error) = match outcome {
            Ok(Ok(text)) => (text, false),
            Ok(Err(err)) => (format!("Error executing {}: {err}", call.name), true),
            Err(err @ ToolCallError::NotFound(_)) => {
                tracing::warn!(tool = %call.name, "model requested an unknown tool");
                (err.to_string(), true)
            }
            Err(err @ ToolCallError::Deserialization(_)) => {
                (format!("Error executing {}: {err}", call.name), true)
            }
        };
        ToolInvocationResult {
            id: call.id.clone(),
            content,
            is_error,
        }
    }
}
