// SPDX-License-Identifier: MIT

//! Top-level flow document

use crate::actions::{ActionGraph, ActionNode, IdSource, RunMode};
use crate::error::{FlowError, GraphError};
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub const DEFAULT_SCHEMA: &str =
    "https://schema.management.azure.com/providers/Microsoft.Logic/schemas/2016-06-01/workflowdefinition.json#";
pub const DEFAULT_VERSION: &str = "1.0.0.0";

static DEFAULT_PARAMETERS: Lazy<Value> = Lazy::new(|| {
    json!({
        "$connections": {
            "defaultValue": {},
            "type": "Object"
        },
        "$authentication": {
            "defaultValue": {},
            "type": "SecureObject"
        }
    })
});

/// A flow: triggers plus the root-level action graph
#[derive(Debug, Clone)]
pub struct Flow {
    triggers: Map<String, Value>,
    actions: ActionGraph,
}

impl Flow {
    pub fn new() -> Self {
        Self {
            triggers: Map::new(),
            actions: ActionGraph::new(true),
        }
    }

    pub fn with_id_source(ids: Arc<dyn IdSource>) -> Self {
        Self {
            triggers: Map::new(),
            actions: ActionGraph::with_id_source(true, ids),
        }
    }

    /// Add a trigger; its payload is exported verbatim under `name`
    pub fn set_trigger(&mut self, name: impl Into<String>, payload: Value) -> Result<(), FlowError> {
        let name = name.into();
        if self.triggers.contains_key(&name) {
            return Err(FlowError::DuplicateTrigger(name));
        }
        self.triggers.insert(name, payload);
        Ok(())
    }

    /// Append an action, after `after` when given, otherwise after the
    /// last appended action
    pub fn append_action(
        &mut self,
        action: ActionNode,
        after: Option<&str>,
        mode: RunMode,
    ) -> Result<String, GraphError> {
        match after {
            Some(after) => self.actions.add_after(action, after, mode),
            None => self.actions.append(action, mode),
        }
    }

    /// Add an action with no dependencies
    pub fn add_top_action(&mut self, action: ActionNode) -> Result<String, GraphError> {
        self.actions.add_top(action)
    }

    pub fn actions(&self) -> &ActionGraph {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionGraph {
        &mut self.actions
    }

    pub fn export(&self) -> Value {
        json!({
            "$schema": DEFAULT_SCHEMA,
            "contentVersion": DEFAULT_VERSION,
            "parameters": *DEFAULT_PARAMETERS,
            "triggers": self.triggers,
            "actions": self.actions.export(),
        })
    }

    pub fn export_json(&self, pretty: bool) -> Result<String, FlowError> {
        let document = self.export();
        let json = if pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(json)
    }
}

impl Default for Flow {
    fn default() -> Self {
        Self::new()
    }
}
