use super::tool_object::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolSetCreationError {
    #[error("error validating schema")]
    Validation(ValidationError),
    #[error("two or more tools have the same name: {0}")]
    NameConflict(String),
}

#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("{0}")]
    Deserialization(serde_json::Error),
    #[error("Unknown tool: {0}")]
    NotFound(String),
}
