mod conversation;
mod tool;
mod toolset;

pub use conversation::{
    ContentBlock, ModelReply, StopReason, ToolDescriptor, ToolInvocationRequest,
    ToolInvocationResult, Turn,
};
pub use tool::{NoContext, Tool};
pub use toolset::{ToolCallError, ToolSet, ToolSetCreationError, ValidationError};
