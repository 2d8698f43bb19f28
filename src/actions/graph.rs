// SPDX-License-Identifier: MIT

//! Action graph - a rooted collection of uniquely named action nodes
//!
//! Every node hangs under exactly one parent. Top-level nodes hang under a
//! sentinel root that is never exported. A graph is built by a single
//! writer; sharing one across threads for insertion is the caller's
//! responsibility.

use super::id::{IdSource, UuidSource};
use super::node::ActionNode;
use super::state::{ExecutionState, RunMode};
use super::variable::INITIALIZE_VARIABLE;
use crate::error::GraphError;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry name of the sentinel root
pub const ROOT_NAME: &str = "root";

const SENTINEL: usize = 0;

/// A rooted tree of action nodes with run-after gates
#[derive(Clone)]
pub struct ActionGraph {
    /// Insertion order; index 0 is the sentinel and parents precede children
    nodes: Vec<ActionNode>,
    parents: Vec<usize>,
    children: Vec<Vec<usize>>,
    by_name: HashMap<String, usize>,
    last_appended: usize,
    is_root: bool,
    ids: Arc<dyn IdSource>,
}

impl ActionGraph {
    /// Create an empty graph; `is_root` marks the flow's top-level container
    pub fn new(is_root: bool) -> Self {
        Self::with_id_source(is_root, Arc::new(UuidSource))
    }

    pub fn with_id_source(is_root: bool, ids: Arc<dyn IdSource>) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert(ROOT_NAME.to_string(), SENTINEL);
        Self {
            nodes: vec![ActionNode::sentinel(ROOT_NAME)],
            parents: vec![SENTINEL],
            children: vec![Vec::new()],
            by_name,
            last_appended: SENTINEL,
            is_root,
            ids,
        }
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn id_source(&self) -> Arc<dyn IdSource> {
        Arc::clone(&self.ids)
    }

    /// Number of nodes, not counting the sentinel
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ActionNode> {
        self.index_of(name).map(|i| &self.nodes[i])
    }

    /// Mutable access to a node, for payload edits after insertion
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ActionNode> {
        self.index_of(name).map(move |i| &mut self.nodes[i])
    }

    /// Node names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes[1..].iter().map(|n| n.name())
    }

    /// The node that `append` attaches after, if any
    pub fn last_appended(&self) -> Option<&ActionNode> {
        (self.last_appended != SENTINEL).then(|| &self.nodes[self.last_appended])
    }

    /// Parent name of a node; `None` for top-level and unknown nodes
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        let parent = self.parents[self.index_of(name)?];
        (parent != SENTINEL).then(|| self.nodes[parent].name())
    }

    /// Child names of a node, or of the root when `name` is `None`
    pub fn children_of(&self, name: Option<&str>) -> Vec<&str> {
        let index = match name {
            Some(name) => match self.index_of(name) {
                Some(i) => i,
                None => return Vec::new(),
            },
            None => SENTINEL,
        };
        self.children[index]
            .iter()
            .map(|&c| self.nodes[c].name())
            .collect()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied().filter(|&i| i != SENTINEL)
    }

    /// Attach a node directly under the root, with no dependencies
    pub fn add_top(&mut self, node: ActionNode) -> Result<String, GraphError> {
        self.validate(&node, None)?;
        Ok(self.link(node, SENTINEL, Vec::new()))
    }

    /// Attach a node after the named node, gated by `mode`
    pub fn add_after(
        &mut self,
        node: ActionNode,
        after: &str,
        mode: RunMode,
    ) -> Result<String, GraphError> {
        let parent = self.validate(&node, Some(after))?;
        Ok(self.link(node, parent, mode.state_set()))
    }

    /// Attach a node after the last appended one
    pub fn append(&mut self, node: ActionNode, mode: RunMode) -> Result<String, GraphError> {
        self.validate(&node, None)?;
        let parent = self.last_appended;
        Ok(self.link(node, parent, mode.state_set()))
    }

    /// Check insertion rules; returns the resolved reference node
    fn validate(&self, node: &ActionNode, reference: Option<&str>) -> Result<usize, GraphError> {
        if self.nodes[1..].iter().any(|n| n.id() == node.id()) {
            return Err(GraphError::DuplicateIdentity {
                name: node.name().to_string(),
            });
        }
        if node.has_parent() {
            return Err(GraphError::AlreadyHasParent {
                name: node.name().to_string(),
            });
        }
        let parent = match reference {
            Some(name) => self
                .index_of(name)
                .ok_or_else(|| GraphError::UnknownReference {
                    name: name.to_string(),
                })?,
            None => SENTINEL,
        };
        if !self.is_root && node.kind() == INITIALIZE_VARIABLE {
            return Err(GraphError::RestrictedKind {
                name: node.name().to_string(),
                kind: node.kind().to_string(),
            });
        }
        Ok(parent)
    }

    /// First free name among `name`, `name_1`, `name_2`, ...
    fn unique_name(&self, name: &str) -> String {
        let mut candidate = name.to_string();
        let mut counter = 1;
        while self.by_name.contains_key(&candidate) {
            candidate = format!("{}_{}", name, counter);
            counter += 1;
        }
        candidate
    }

    /// Register a validated node under `parent`
    fn link(&mut self, mut node: ActionNode, parent: usize, states: Vec<ExecutionState>) -> String {
        let name = self.unique_name(node.name());
        if name != node.name() {
            log::debug!("Renamed action '{}' to '{}'", node.name(), name);
        }
        node.set_name(name.clone());

        let parent_name = (parent != SENTINEL).then(|| self.nodes[parent].name().to_string());
        node.attach_to(parent_name.as_deref(), states);

        let index = self.nodes.len();
        self.nodes.push(node);
        self.parents.push(parent);
        self.children.push(Vec::new());
        self.children[parent].push(index);
        self.by_name.insert(name.clone(), index);
        self.last_appended = index;
        name
    }

    /// Gate states a node was attached with
    fn states_of(node: &ActionNode) -> Vec<ExecutionState> {
        node.run_after()
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| RunMode::Normal.state_set())
    }

    /// Structurally identical graph whose nodes all have fresh identities.
    ///
    /// Each node keeps the gate states it was attached with; they are not
    /// reset to `{Succeeded}` the way a plain re-append would.
    pub fn duplicate(&self) -> ActionGraph {
        let mut copy = ActionGraph::with_id_source(self.is_root, Arc::clone(&self.ids));
        let mut mapping = vec![SENTINEL; self.nodes.len()];

        for (index, node) in self.nodes.iter().enumerate().skip(1) {
            let parent = mapping[self.parents[index]];
            let states = if parent == SENTINEL {
                Vec::new()
            } else {
                Self::states_of(node)
            };
            copy.link(node.duplicate(self.ids.as_ref()), parent, states);
            mapping[index] = copy.nodes.len() - 1;
        }

        let last = self.nodes[self.last_appended].name();
        copy.last_appended = copy.by_name.get(last).copied().unwrap_or(SENTINEL);
        copy
    }

    /// Splice `other` after this graph.
    ///
    /// `other`'s top-level nodes run after this graph's last appended node;
    /// its deeper nodes keep their positions. Neither operand is modified.
    pub fn merge(&self, other: &ActionGraph) -> ActionGraph {
        let mut merged = self.duplicate();
        merged.is_root |= other.is_root;

        let anchor = merged.last_appended;
        let mut mapping = vec![anchor; other.nodes.len()];

        for (index, node) in other.nodes.iter().enumerate().skip(1) {
            let original_parent = other.parents[index];
            let parent = mapping[original_parent];
            let states = if parent == SENTINEL {
                Vec::new()
            } else if original_parent == SENTINEL {
                RunMode::Normal.state_set()
            } else {
                Self::states_of(node)
            };
            merged.link(node.duplicate(merged.ids.as_ref()), parent, states);
            mapping[index] = merged.nodes.len() - 1;
        }

        log::debug!(
            "Merged {} actions after {} into graph of {}",
            other.len(),
            self.len(),
            merged.len()
        );
        merged
    }

    /// Copy of this graph with a copy of `node` appended
    pub fn merge_node(&self, node: &ActionNode) -> Result<ActionGraph, GraphError> {
        let mut merged = self.duplicate();
        let copy = node.duplicate(merged.ids.as_ref());
        merged.append(copy, RunMode::Normal)?;
        Ok(merged)
    }

    /// Exported mapping of node name to node payload, in insertion order
    pub fn export(&self) -> Map<String, Value> {
        self.nodes[1..]
            .iter()
            .map(|n| (n.name().to_string(), n.export()))
            .collect()
    }
}

impl Default for ActionGraph {
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Debug for ActionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionGraph")
            .field("nodes", &self.names().collect::<Vec<_>>())
            .field("is_root", &self.is_root)
            .finish_non_exhaustive()
    }
}
