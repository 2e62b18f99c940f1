use crate::types::{Tool, ToolDescriptor};

use schemars::JsonSchema;
use schemars::schema::{Schema, SchemaObject};
use schemars::schema_for;
use serde::de::Deserialize;
use serde_json::Error as JsonError;
use serde_json::Value;
use thiserror::Error;

type ToolTraitObject<T> = Box<dyn Tool<Context = T> + Send + Sync>;
type Deserializer<T> = Box<dyn Fn(Value) -> Result<ToolTraitObject<T>, JsonError> + Send + Sync>;

/// A registered tool: the schema advertised to the model and the
/// deserializer that turns call arguments back into the typed tool.
pub struct ToolObject<C> {
    pub json_schema: Value,
    pub description: String,
    pub name: String,
    deserializer: Deserializer<C>,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing metadata")]
    MissingMetadata,
    #[error("could not convert to json")]
    JsonSerialization(JsonError),
}

impl<C> ToolObject<C> {
    pub fn try_deserialize(&self, arguments: Value) -> Result<ToolTraitObject<C>, JsonError> {
        let deserializer = &self.deserializer;
        deserializer(arguments)
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.json_schema.clone(),
        }
    }

    pub fn try_from_tool<T>() -> Result<Self, ValidationError>
    where
        T: JsonSchema + Tool<Context = C> + Send + Sync + for<'de> Deserialize<'de> + 'static,
        C: 'static,
    {
        let schema = schema_for!(T);

        let (name, description) = validate_tool_schema(&schema.schema)?;

        let mut json_schema =
            serde_json::to_value(schema).map_err(ValidationError::JsonSerialization)?;
        // name and description travel beside the schema, not inside it
        if let Some(object) = json_schema.as_object_mut() {
            object.remove("$schema");
            object.remove("title");
            object.remove("description");
        }

        let deserializer = Box::new(|arguments: Value| {
            serde_json::from_value::<T>(arguments)
                .map(|tool| Box::new(tool) as ToolTraitObject<C>)
        });

        Ok(Self {
            name,
            json_schema,
            description,
            deserializer,
        })
    }
}

fn validate_tool_schema(schema: &SchemaObject) -> Result<(String, String), ValidationError> {
    let name = schema
        .metadata
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?
        .title
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?
        .to_string();

    let description = validate_tool_description(schema)?;
    Ok((name, description))
}

// this could probably be converted to a compile-time check with a macro
fn validate_tool_description(schema: &SchemaObject) -> Result<String, ValidationError> {
    let description = schema
        .metadata
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?
        .description
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?;

    if let Some(object) = schema.object.as_deref() {
        for sub_schema in object.properties.values() {
            if let Schema::Object(sub_schema_object) = sub_schema {
                validate_tool_description(sub_schema_object)?;
            }
        }
    }

    Ok(description.to_string())
}
