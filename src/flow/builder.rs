// SPDX-License-Identifier: MIT

//! Flow builder - turns flow definitions into action graphs
//!
//! Nested action lists of composite actions become non-root graphs, so
//! `InitializeVariable` is only accepted at the top level.

use super::document::Flow;
use super::loader::FlowLoader;
use super::types::{ActionDefinition, FlowDefinition};
use crate::actions::statements::{foreach_with, scope_with};
use crate::actions::{
    ActionGraph, ActionNode, IdSource, IfStatement, RawActions, UntilStatement, UuidSource,
};
use crate::condition::Condition;
use crate::error::FlowError;
use serde_json::Map;
use std::path::Path;
use std::sync::Arc;

/// Builds flows from YAML definitions
pub struct FlowBuilder {
    loader: FlowLoader,
    ids: Arc<dyn IdSource>,
}

impl FlowBuilder {
    pub fn new() -> Self {
        Self::with_id_source(Arc::new(UuidSource))
    }

    pub fn with_id_source(ids: Arc<dyn IdSource>) -> Self {
        Self {
            loader: FlowLoader::new(),
            ids,
        }
    }

    /// Build a flow from a YAML file path
    pub fn build_file<P: AsRef<Path>>(&self, path: P) -> Result<Flow, FlowError> {
        let def = self.loader.load_flow(path)?;
        self.build(&def)
    }

    /// Build a flow from a parsed definition
    pub fn build(&self, def: &FlowDefinition) -> Result<Flow, FlowError> {
        let mut flow = Flow::with_id_source(Arc::clone(&self.ids));
        for (name, payload) in &def.triggers {
            flow.set_trigger(name.clone(), payload.clone())?;
        }
        self.fill_graph(flow.actions_mut(), &def.actions)?;

        log::info!(
            "Built flow '{}' with {} actions ({} top-level)",
            def.name,
            flow.actions().len(),
            flow.actions().children_of(None).len()
        );
        Ok(flow)
    }

    /// Build a non-root graph for a nested action list
    fn build_graph(&self, defs: &[ActionDefinition]) -> Result<ActionGraph, FlowError> {
        let mut graph = ActionGraph::with_id_source(false, Arc::clone(&self.ids));
        self.fill_graph(&mut graph, defs)?;
        Ok(graph)
    }

    fn fill_graph(&self, graph: &mut ActionGraph, defs: &[ActionDefinition]) -> Result<(), FlowError> {
        for def in defs {
            let node = self.build_node(def)?;
            let name = if def.top {
                graph.add_top(node)?
            } else if let Some(after) = &def.after {
                graph.add_after(node, after, def.mode)?
            } else {
                graph.append(node, def.mode)?
            };
            log::debug!("Added action '{}' ({})", name, def.kind);
        }
        Ok(())
    }

    fn build_node(&self, def: &ActionDefinition) -> Result<ActionNode, FlowError> {
        let ids = self.ids.as_ref();
        let node = match def.kind.as_str() {
            "If" => {
                let source = def.condition.as_deref().ok_or_else(|| {
                    FlowError::definition(format!("If action '{}' missing condition", def.name))
                })?;
                let mut statement = IfStatement::new(&def.name, Condition::new(source)?);
                if !def.actions.is_empty() {
                    statement = statement.true_actions(self.build_graph(&def.actions)?);
                }
                if let Some(else_actions) = &def.else_actions {
                    statement = statement.false_actions(self.build_graph(else_actions)?);
                }
                statement.build_with(ids)
            }
            "Foreach" => {
                let items = def.foreach.as_deref().ok_or_else(|| {
                    FlowError::definition(format!("Foreach action '{}' missing foreach", def.name))
                })?;
                foreach_with(ids, &def.name, items, self.build_graph(&def.actions)?)
            }
            "Scope" => match &def.raw {
                Some(raw) => scope_with(ids, &def.name, RawActions::from_value(raw.clone())),
                None => scope_with(ids, &def.name, self.build_graph(&def.actions)?),
            },
            "Until" => {
                let expression = def.expression.as_deref().ok_or_else(|| {
                    FlowError::definition(format!("Until action '{}' missing expression", def.name))
                })?;
                let mut statement =
                    UntilStatement::new(&def.name, self.build_graph(&def.actions)?, expression);
                if let Some(limit) = def.limit {
                    statement = statement.limit_count(limit);
                }
                statement.build_with(ids)
            }
            kind => {
                let mut payload = Map::new();
                if let Some(inputs) = &def.inputs {
                    payload.insert("inputs".to_string(), inputs.clone());
                }
                ActionNode::with_id_source(ids, &def.name, kind, payload)
            }
        };
        Ok(node)
    }
}

impl Default for FlowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
