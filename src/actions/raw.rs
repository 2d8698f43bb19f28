// SPDX-License-Identifier: MIT

//! Pre-exported action mappings

use serde_json::{Map, Value};
use std::collections::HashSet;

const REQUIRED_KEYS: [&str; 3] = ["type", "inputs", "metadata"];

/// An already exported action mapping, re-validated on every export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawActions {
    definition: Map<String, Value>,
}

impl RawActions {
    pub fn new(definition: Map<String, Value>) -> Self {
        Self { definition }
    }

    /// Build from a JSON value; anything but an object is an empty mapping
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(definition) => Self { definition },
            _ => Self::default(),
        }
    }

    /// Check that every entry is a complete action whose `runAfter` only
    /// names entries defined before it (or itself)
    pub fn validate(&self) -> bool {
        if self.definition.is_empty() {
            return false;
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for (name, node) in &self.definition {
            seen.insert(name.as_str());
            let Some(node) = node.as_object() else {
                return false;
            };
            if REQUIRED_KEYS.iter().any(|key| !node.contains_key(*key)) {
                return false;
            }
            if let Some(run_after) = node.get("runAfter").and_then(Value::as_object) {
                if run_after.keys().any(|dep| !seen.contains(dep.as_str())) {
                    return false;
                }
            }
        }
        true
    }

    /// The mapping if it validates, otherwise an empty one
    pub fn export(&self) -> Map<String, Value> {
        if self.validate() {
            self.definition.clone()
        } else {
            log::warn!("Discarding raw actions that failed validation");
            Map::new()
        }
    }
}
