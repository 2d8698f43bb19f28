// SPDX-License-Identifier: MIT

//! Build declarative automation flows.
//!
//! - [`condition`] compiles boolean expressions into branch guards
//! - [`actions`] assembles action nodes into run-after graphs
//! - [`flow`] wraps a root graph and triggers into a flow document

pub mod actions;
pub mod condition;
pub mod error;
pub mod flow;

pub use error::{ConditionError, FlowError, GraphError, LexicalError, StructuralError};
