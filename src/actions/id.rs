// SPDX-License-Identifier: MIT

//! Identity generation for action nodes

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of unique node identities.
///
/// Identities only need to be unique per process; graphs take the source
/// as a dependency so tests can make output deterministic. Graphs compare
/// identities as strings, so nodes inserted into one graph must not draw
/// from sources that can repeat each other's output. With [`SequentialIds`],
/// build nodes from the graph's own source (see [`ActionGraph::id_source`]).
///
/// [`ActionGraph::id_source`]: super::graph::ActionGraph::id_source
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Counter-based identities: `{prefix}-1`, `{prefix}-2`, ...
///
/// Each instance counts from 1, so two instances with one prefix produce
/// the same identities.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", self.prefix, n)
    }
}
