// SPDX-License-Identifier: MIT

//! YAML schema types for flow definitions
//!
//! Actions are listed in order. Without `after` or `top`, each action runs
//! after the one listed before it.

use crate::actions::RunMode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level flow definition
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FlowDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Trigger payloads keyed by trigger name, exported verbatim
    #[serde(default)]
    pub triggers: Map<String, Value>,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
}

/// One action in a flow definition
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ActionDefinition {
    pub name: String,
    /// Type tag, e.g. `Compose`, `If`, `Foreach`, `Scope`, `Until`
    #[serde(rename = "type")]
    pub kind: String,
    /// Exported as `inputs` for non-composite actions
    pub inputs: Option<Value>,
    /// Name of the action this one runs after
    pub after: Option<String>,
    #[serde(default)]
    pub mode: RunMode,
    /// Attach under the root with no dependencies
    #[serde(default)]
    pub top: bool,
    /// Guard expression for `If`
    pub condition: Option<String>,
    /// Item expression for `Foreach`
    pub foreach: Option<String>,
    /// Exit expression for `Until`
    pub expression: Option<String>,
    /// Iteration cap for `Until`
    pub limit: Option<u32>,
    /// Nested actions of composite kinds (`If` true branch)
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
    /// False branch of `If`
    #[serde(rename = "else")]
    pub else_actions: Option<Vec<ActionDefinition>>,
    /// Pre-exported actions for `Scope`, used instead of `actions`
    pub raw: Option<Value>,
}
