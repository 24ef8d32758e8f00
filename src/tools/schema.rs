//! Wire-shape helper translating parameter lists into JSON-Schema descriptors.
use std::collections::BTreeMap;

use rmcp::model::JsonObject;
use serde::Serialize;
use serde_json::Value;

use super::definition::ParameterDefinition;

/// Minimal JSON-Schema subset advertised as a tool's input schema.
///
/// Invariant: every name listed in `required` exists in `properties`. Any
/// value built through [`ToolSchema::from_parameters`] upholds it by
/// construction; [`ToolSchema::is_consistent`] checks hand-built values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: BTreeMap<String, Property>,
    pub required: Vec<String>,
}

/// Structural descriptor of one schema property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl ToolSchema {
    /// Build the `{type: "object", properties, required}` descriptor for an
    /// ordered parameter list. Every declared parameter is required.
    pub fn from_parameters(parameters: &[ParameterDefinition]) -> Self {
        let mut properties = BTreeMap::new();
        let mut required = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            properties.insert(
                parameter.name.clone(),
                Property {
                    kind: parameter.kind.as_str().to_string(),
                    description: parameter.description.clone(),
                },
            );
            required.push(parameter.name.clone());
        }

        Self {
            kind: "object".to_string(),
            properties,
            required,
        }
    }

    /// `required` may only reference declared properties.
    pub fn is_consistent(&self) -> bool {
        self.required
            .iter()
            .all(|name| self.properties.contains_key(name))
    }

    /// Serialize into the object shape `rmcp` expects for `Tool.input_schema`.
    pub fn into_input_schema(self) -> JsonObject {
        match serde_json::to_value(&self) {
            Ok(Value::Object(map)) => map,
            _ => JsonObject::new(),
        }
    }
}
