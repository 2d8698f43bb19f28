// SPDX-License-Identifier: MIT

//! Composite actions that contain nested action graphs
//!
//! - `If` guards two branches with a compiled condition
//! - `Foreach` runs its actions once per item
//! - `Scope` groups actions
//! - `Until` repeats its actions until an expression holds

use super::graph::ActionGraph;
use super::id::{IdSource, UuidSource};
use super::node::{ActionNode, NestedActions};
use crate::condition::Condition;
use serde_json::{json, Map, Value};

/// Default iteration cap of an `Until` loop
pub const DEFAULT_UNTIL_LIMIT: u32 = 60;
/// Default timeout of an `Until` loop, as an ISO 8601 duration
pub const DEFAULT_UNTIL_TIMEOUT: &str = "PT1H";

/// Builder for an `If` action
#[derive(Debug, Clone)]
pub struct IfStatement {
    name: String,
    condition: Condition,
    true_actions: Option<ActionGraph>,
    false_actions: Option<ActionGraph>,
}

impl IfStatement {
    pub fn new(name: impl Into<String>, condition: Condition) -> Self {
        Self {
            name: name.into(),
            condition,
            true_actions: None,
            false_actions: None,
        }
    }

    pub fn true_actions(mut self, actions: ActionGraph) -> Self {
        self.true_actions = Some(actions);
        self
    }

    pub fn false_actions(mut self, actions: ActionGraph) -> Self {
        self.false_actions = Some(actions);
        self
    }

    pub fn build(self) -> ActionNode {
        self.build_with(&UuidSource)
    }

    pub fn build_with(self, ids: &dyn IdSource) -> ActionNode {
        let mut payload = Map::new();
        payload.insert("expression".to_string(), self.condition.export());
        payload.insert("actions".to_string(), Value::Object(Map::new()));

        let mut node = ActionNode::with_id_source(ids, self.name, "If", payload);
        if let Some(actions) = self.true_actions {
            node = node.with_nested(&["actions"], actions);
        }
        if let Some(actions) = self.false_actions {
            node = node.with_nested(&["else", "actions"], actions);
        }
        node
    }
}

/// `Foreach` action over the items of `foreach`
pub fn foreach(name: impl Into<String>, foreach: impl Into<String>, actions: ActionGraph) -> ActionNode {
    foreach_with(&UuidSource, name, foreach, actions)
}

pub fn foreach_with(
    ids: &dyn IdSource,
    name: impl Into<String>,
    foreach: impl Into<String>,
    actions: ActionGraph,
) -> ActionNode {
    let mut payload = Map::new();
    payload.insert("foreach".to_string(), Value::String(foreach.into()));
    ActionNode::with_id_source(ids, name, "Foreach", payload).with_nested(&["actions"], actions)
}

/// `Scope` action grouping a graph or a pre-exported mapping
pub fn scope(name: impl Into<String>, actions: impl Into<NestedActions>) -> ActionNode {
    scope_with(&UuidSource, name, actions)
}

pub fn scope_with(
    ids: &dyn IdSource,
    name: impl Into<String>,
    actions: impl Into<NestedActions>,
) -> ActionNode {
    ActionNode::with_id_source(ids, name, "Scope", Map::new()).with_nested(&["actions"], actions)
}

/// Builder for an `Until` (do-until) loop
#[derive(Debug, Clone)]
pub struct UntilStatement {
    name: String,
    actions: ActionGraph,
    expression: String,
    limit_count: u32,
}

impl UntilStatement {
    /// `expression` is an opaque workflow expression, e.g. `@equals(...)`
    pub fn new(name: impl Into<String>, actions: ActionGraph, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions,
            expression: expression.into(),
            limit_count: DEFAULT_UNTIL_LIMIT,
        }
    }

    pub fn limit_count(mut self, count: u32) -> Self {
        self.limit_count = count;
        self
    }

    pub fn build(self) -> ActionNode {
        self.build_with(&UuidSource)
    }

    pub fn build_with(self, ids: &dyn IdSource) -> ActionNode {
        let mut payload = Map::new();
        payload.insert("actions".to_string(), Value::Null);
        payload.insert("expression".to_string(), Value::String(self.expression));
        payload.insert(
            "limit".to_string(),
            json!({ "count": self.limit_count, "timeout": DEFAULT_UNTIL_TIMEOUT }),
        );
        ActionNode::with_id_source(ids, self.name, "Until", payload)
            .with_nested(&["actions"], self.actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::id::SequentialIds;
    use crate::actions::state::RunMode;
    use crate::actions::variable::VariableOp;
    use crate::actions::RawActions;
    use std::sync::Arc;

    fn branch(ids: &Arc<SequentialIds>, action: &str) -> ActionGraph {
        let mut graph = ActionGraph::with_id_source(false, ids.clone());
        let node = VariableOp::Set.build_with(ids.as_ref(), action, "flag", true);
        graph.append(node, RunMode::Normal).unwrap();
        graph
    }

    #[test]
    fn test_if_without_branches() {
        let ids = SequentialIds::new("id");
        let node = IfStatement::new("Check", Condition::new("count > 3").unwrap()).build_with(&ids);
        assert_eq!(
            node.export(),
            json!({
                "metadata": {"operationMetadataId": "id-1"},
                "type": "If",
                "runAfter": {},
                "expression": {"greater": ["@variables('count')", 3]},
                "actions": {}
            })
        );
    }

    #[test]
    fn test_if_with_both_branches() {
        let ids = Arc::new(SequentialIds::new("id"));
        let node = IfStatement::new("Check", Condition::new("ok == true").unwrap())
            .true_actions(branch(&ids, "OnTrue"))
            .false_actions(branch(&ids, "OnFalse"))
            .build_with(ids.as_ref());

        let exported = node.export();
        assert_eq!(exported["actions"]["OnTrue"]["type"], json!("SetVariable"));
        assert_eq!(
            exported["else"]["actions"]["OnFalse"]["inputs"],
            json!({"name": "flag", "value": true})
        );
    }

    #[test]
    fn test_duplicate_regenerates_nested_ids() {
        let ids = Arc::new(SequentialIds::new("id"));
        let node = IfStatement::new("Check", Condition::new("a").unwrap())
            .true_actions(branch(&ids, "Inner"))
            .build_with(ids.as_ref());
        let copy = node.duplicate(ids.as_ref());

        let original = node.export();
        let duplicated = copy.export();
        assert_ne!(
            original["actions"]["Inner"]["metadata"],
            duplicated["actions"]["Inner"]["metadata"]
        );
        assert_eq!(original["expression"], duplicated["expression"]);
    }

    #[test]
    fn test_foreach_export() {
        let ids = Arc::new(SequentialIds::new("id"));
        let node = foreach_with(
            ids.as_ref(),
            "Each",
            "@variables('items')",
            branch(&ids, "Body"),
        );
        let exported = node.export();
        assert_eq!(exported["type"], json!("Foreach"));
        assert_eq!(exported["foreach"], json!("@variables('items')"));
        assert!(exported["actions"].get("Body").is_some());
    }

    #[test]
    fn test_scope_with_raw_actions() {
        let raw = RawActions::from_value(json!({
            "A": {"type": "Compose", "inputs": 1, "metadata": {}}
        }));
        let node = scope("Group", raw);
        assert_eq!(node.export()["actions"]["A"]["inputs"], json!(1));
    }

    #[test]
    fn test_until_limit() {
        let ids = Arc::new(SequentialIds::new("id"));
        let node = UntilStatement::new("Loop", branch(&ids, "Step"), "@equals(1, 1)")
            .limit_count(5)
            .build_with(ids.as_ref());
        let exported = node.export();
        assert_eq!(exported["limit"], json!({"count": 5, "timeout": "PT1H"}));
        assert_eq!(exported["expression"], json!("@equals(1, 1)"));
        assert!(exported["actions"].get("Step").is_some());

        let default = UntilStatement::new("Loop", ActionGraph::new(false), "@true").build();
        assert_eq!(default.export()["limit"]["count"], json!(DEFAULT_UNTIL_LIMIT));
    }
}
