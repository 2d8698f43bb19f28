// SPDX-License-Identifier: MIT

//! Action nodes - the unit of an action graph
//!
//! A node is a type tag plus an opaque payload. The graph only looks at the
//! name, the identity, the dependency map and the parent flag; everything
//! else is produced by the action constructors and exported verbatim.

use super::graph::ActionGraph;
use super::id::{IdSource, UuidSource};
use super::raw::RawActions;
use super::state::ExecutionState;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Export keys owned by the node itself; payload entries never replace them
const RESERVED_KEYS: [&str; 3] = ["metadata", "type", "runAfter"];

/// Action sequence nested inside a composite action
#[derive(Debug, Clone)]
pub enum NestedActions {
    Graph(ActionGraph),
    Raw(RawActions),
}

impl NestedActions {
    pub fn export(&self) -> Map<String, Value> {
        match self {
            NestedActions::Graph(graph) => graph.export(),
            NestedActions::Raw(raw) => raw.export(),
        }
    }

    fn duplicate(&self) -> Self {
        match self {
            NestedActions::Graph(graph) => NestedActions::Graph(graph.duplicate()),
            NestedActions::Raw(raw) => NestedActions::Raw(raw.clone()),
        }
    }
}

impl From<ActionGraph> for NestedActions {
    fn from(graph: ActionGraph) -> Self {
        NestedActions::Graph(graph)
    }
}

impl From<RawActions> for NestedActions {
    fn from(raw: RawActions) -> Self {
        NestedActions::Raw(raw)
    }
}

/// Nested actions exported under a key path, e.g. `["else", "actions"]`
#[derive(Debug, Clone)]
struct NestedSlot {
    path: Vec<String>,
    actions: NestedActions,
}

/// One workflow step.
///
/// `Clone` is a raw copy that keeps the identity and the parent flag, so a
/// copy cannot be inserted next to its original. Use [`ActionNode::duplicate`]
/// for an independent node.
#[derive(Debug, Clone)]
pub struct ActionNode {
    id: String,
    name: String,
    kind: String,
    payload: Map<String, Value>,
    nested: Vec<NestedSlot>,
    run_after: BTreeMap<String, Vec<ExecutionState>>,
    has_parent: bool,
}

impl ActionNode {
    /// Create a node with a random identity
    pub fn new(name: impl Into<String>, kind: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self::with_id(UuidSource.next_id(), name, kind, payload)
    }

    /// Create a node drawing its identity from `ids`
    pub fn with_id_source(
        ids: &dyn IdSource,
        name: impl Into<String>,
        kind: impl Into<String>,
        payload: Map<String, Value>,
    ) -> Self {
        Self::with_id(ids.next_id(), name, kind, payload)
    }

    fn with_id(
        id: String,
        name: impl Into<String>,
        kind: impl Into<String>,
        payload: Map<String, Value>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
            payload,
            nested: Vec::new(),
            run_after: BTreeMap::new(),
            has_parent: false,
        }
    }

    /// Attach a nested action sequence exported under `path`.
    ///
    /// If the payload already holds the first key of `path`, the export keeps
    /// that key's position.
    pub fn with_nested(mut self, path: &[&str], actions: impl Into<NestedActions>) -> Self {
        self.nested.push(NestedSlot {
            path: path.iter().map(|s| s.to_string()).collect(),
            actions: actions.into(),
        });
        self
    }

    pub(crate) fn sentinel(name: &str) -> Self {
        Self::with_id(String::new(), name, "", Map::new())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.payload
    }

    pub fn run_after(&self) -> &BTreeMap<String, Vec<ExecutionState>> {
        &self.run_after
    }

    pub fn has_parent(&self) -> bool {
        self.has_parent
    }

    /// Nested action sequences, with their export paths
    pub fn nested(&self) -> impl Iterator<Item = (&[String], &NestedActions)> {
        self.nested
            .iter()
            .map(|slot| (slot.path.as_slice(), &slot.actions))
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Record the parent gate and mark the node as attached
    pub(crate) fn attach_to(&mut self, parent: Option<&str>, states: Vec<ExecutionState>) {
        self.run_after.clear();
        if let Some(parent) = parent {
            self.run_after.insert(parent.to_string(), states);
        }
        self.has_parent = true;
    }

    /// Independent copy: fresh identity, no dependencies, no parent.
    ///
    /// The payload is deep-copied and nested graphs are duplicated as well.
    pub fn duplicate(&self, ids: &dyn IdSource) -> Self {
        Self {
            id: ids.next_id(),
            name: self.name.clone(),
            kind: self.kind.clone(),
            payload: self.payload.clone(),
            nested: self
                .nested
                .iter()
                .map(|slot| NestedSlot {
                    path: slot.path.clone(),
                    actions: slot.actions.duplicate(),
                })
                .collect(),
            run_after: BTreeMap::new(),
            has_parent: false,
        }
    }

    /// Exported form: metadata, type and runAfter, then the payload fields.
    ///
    /// Payload entries named like a reserved key are dropped, so the export
    /// always shows the node's own type tag and resolved dependencies.
    pub fn export(&self) -> Value {
        let mut d = Map::new();
        d.insert(
            "metadata".to_string(),
            json!({ "operationMetadataId": self.id }),
        );
        d.insert("type".to_string(), Value::String(self.kind.clone()));
        d.insert("runAfter".to_string(), self.export_run_after());
        for (key, value) in &self.payload {
            if RESERVED_KEYS.contains(&key.as_str()) {
                log::warn!(
                    "Ignoring payload key '{}' on action '{}'",
                    key,
                    self.name
                );
                continue;
            }
            d.insert(key.clone(), value.clone());
        }
        for slot in &self.nested {
            insert_at_path(&mut d, &slot.path, Value::Object(slot.actions.export()));
        }
        Value::Object(d)
    }

    fn export_run_after(&self) -> Value {
        let entries = self.run_after.iter().map(|(parent, states)| {
            let states = states
                .iter()
                .map(|s| Value::String(s.as_str().to_string()))
                .collect();
            (parent.clone(), Value::Array(states))
        });
        Value::Object(entries.collect())
    }
}

fn insert_at_path(target: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = target;
    for key in parents {
        let entry = current
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }
    current.insert(last.clone(), value);
}
