use super::tool_object::ToolObject;
use super::types::*;
use crate::types::{Tool, ToolDescriptor};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Closed mapping from tool name to implementation. The descriptor sent to
/// the model is derived from the same type that executes the call, so a tool
/// cannot be advertised without an implementation behind it.
pub struct ToolSet<C> {
    tools: BTreeMap<String, ToolObject<C>>,
}

impl<C> Default for ToolSet<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ToolSet<C> {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    pub fn add_tool<T>(mut self) -> Result<Self, ToolSetCreationError>
    where
        T: JsonSchema + Tool<Context = C> + for<'de> Deserialize<'de> + 'static + Send + Sync,
        C: 'static,
    {
        let tool_object =
            ToolObject::try_from_tool::<T>().map_err(ToolSetCreationError::Validation)?;
        if self.tools.contains_key(&tool_object.name) {
            Err(ToolSetCreationError::NameConflict(tool_object.name.clone()))
        } else {
            self.tools.insert(tool_object.name.clone(), tool_object);
            Ok(self)
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.values().map(ToolObject::descriptor).collect()
    }

    /// Deserializes `arguments` into the named tool and runs it. The outer
    /// error means the call never ran; the inner one comes from the tool.
    pub fn try_tool_call(
        &self,
        context: C,
        tool_name: &str,
        arguments: Value,
    ) -> Result<anyhow::Result<String>, ToolCallError> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| ToolCallError::NotFound(tool_name.to_owned()))
            .and_then(|tool| {
                tool.try_deserialize(arguments)
                    .map_err(ToolCallError::Deserialization)
            })?;
        Ok(tool.apply(context))
    }
}
