mod tool_object;
#[allow(clippy::module_inception)]
mod toolset;
mod types;

pub use tool_object::ValidationError;
pub use toolset::ToolSet;
pub use types::{ToolCallError, ToolSetCreationError};
