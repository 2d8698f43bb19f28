// SPDX-License-Identifier: MIT

//! Variable actions
//!
//! `InitializeVariable` is restricted to the root-level graph; the other
//! variable actions may appear anywhere.

use super::id::{IdSource, UuidSource};
use super::node::ActionNode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Type tag of the restricted initialize-variable action
pub const INITIALIZE_VARIABLE: &str = "InitializeVariable";

/// Declared type of a flow variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Integer,
    Boolean,
    Float,
    Array,
    Object,
}

impl VariableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::String => "string",
            VariableType::Integer => "integer",
            VariableType::Boolean => "boolean",
            VariableType::Float => "float",
            VariableType::Array => "array",
            VariableType::Object => "object",
        }
    }
}

/// Builder for an `InitializeVariable` action
#[derive(Debug, Clone)]
pub struct InitVariable {
    name: String,
    var_name: String,
    var_type: VariableType,
    value: Option<Value>,
}

impl InitVariable {
    pub fn new(name: impl Into<String>, var_name: impl Into<String>, var_type: VariableType) -> Self {
        Self {
            name: name.into(),
            var_name: var_name.into(),
            var_type,
            value: None,
        }
    }

    /// Initial value; omitted from the export when unset
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn build(self) -> ActionNode {
        self.build_with(&UuidSource)
    }

    pub fn build_with(self, ids: &dyn IdSource) -> ActionNode {
        let mut variable = Map::new();
        variable.insert("name".to_string(), Value::String(self.var_name));
        variable.insert(
            "type".to_string(),
            Value::String(self.var_type.as_str().to_string()),
        );
        if let Some(value) = self.value {
            variable.insert("value".to_string(), value);
        }

        let mut payload = Map::new();
        payload.insert(
            "inputs".to_string(),
            json!({ "variables": [Value::Object(variable)] }),
        );
        ActionNode::with_id_source(ids, self.name, INITIALIZE_VARIABLE, payload)
    }
}

/// Operations on an existing variable, all shaped `inputs: {name, value}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableOp {
    Set,
    AppendToString,
    Increment,
    Decrement,
}

impl VariableOp {
    pub fn type_tag(&self) -> &'static str {
        match self {
            VariableOp::Set => "SetVariable",
            VariableOp::AppendToString => "AppendToStringVariable",
            VariableOp::Increment => "IncrementVariable",
            VariableOp::Decrement => "DecrementVariable",
        }
    }

    /// Resolve a type tag back to the operation
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "SetVariable" => Some(VariableOp::Set),
            "AppendToStringVariable" => Some(VariableOp::AppendToString),
            "IncrementVariable" => Some(VariableOp::Increment),
            "DecrementVariable" => Some(VariableOp::Decrement),
            _ => None,
        }
    }

    pub fn build(
        &self,
        name: impl Into<String>,
        var_name: impl Into<String>,
        value: impl Into<Value>,
    ) -> ActionNode {
        self.build_with(&UuidSource, name, var_name, value)
    }

    pub fn build_with(
        &self,
        ids: &dyn IdSource,
        name: impl Into<String>,
        var_name: impl Into<String>,
        value: impl Into<Value>,
    ) -> ActionNode {
        let var_name: String = var_name.into();
        let value: Value = value.into();
        let mut payload = Map::new();
        payload.insert(
            "inputs".to_string(),
            json!({ "name": var_name, "value": value }),
        );
        ActionNode::with_id_source(ids, name, self.type_tag(), payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::id::SequentialIds;

    #[test]
    fn test_init_variable_export() {
        let ids = SequentialIds::new("v");
        let node = InitVariable::new("Init", "count", VariableType::Integer)
            .value(0)
            .build_with(&ids);
        assert_eq!(node.kind(), INITIALIZE_VARIABLE);
        assert_eq!(
            node.export(),
            json!({
                "metadata": {"operationMetadataId": "v-1"},
                "type": "InitializeVariable",
                "runAfter": {},
                "inputs": {"variables": [{"name": "count", "type": "integer", "value": 0}]}
            })
        );
    }

    #[test]
    fn test_init_variable_without_value() {
        let node = InitVariable::new("Init", "items", VariableType::Array).build();
        assert_eq!(
            node.payload()["inputs"],
            json!({"variables": [{"name": "items", "type": "array"}]})
        );
    }

    #[test]
    fn test_variable_ops() {
        let node = VariableOp::Increment.build("Bump", "count", 1);
        assert_eq!(node.kind(), "IncrementVariable");
        assert_eq!(node.payload()["inputs"], json!({"name": "count", "value": 1}));

        let node = VariableOp::AppendToString.build("Add", "log", "line");
        assert_eq!(node.kind(), "AppendToStringVariable");
    }

    #[test]
    fn test_type_tag_round_trip() {
        for op in [
            VariableOp::Set,
            VariableOp::AppendToString,
            VariableOp::Increment,
            VariableOp::Decrement,
        ] {
            assert_eq!(VariableOp::from_type_tag(op.type_tag()), Some(op));
        }
        assert_eq!(VariableOp::from_type_tag(INITIALIZE_VARIABLE), None);
    }
}
