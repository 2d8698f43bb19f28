// SPDX-License-Identifier: MIT

//! Action dependency graphs
//!
//! This module provides:
//! - `ActionNode` - one step of a flow: a type tag plus an opaque payload
//! - `ActionGraph` - a rooted collection of nodes joined by run-after gates
//! - constructors for variable and composite actions

pub mod graph;
pub mod id;
pub mod node;
pub mod raw;
pub mod state;
pub mod statements;
pub mod variable;

pub use graph::{ActionGraph, ROOT_NAME};
pub use id::{IdSource, SequentialIds, UuidSource};
pub use node::{ActionNode, NestedActions};
pub use raw::RawActions;
pub use state::{ExecutionState, RunMode};
pub use statements::{foreach, scope, IfStatement, UntilStatement};
pub use variable::{InitVariable, VariableOp, VariableType, INITIALIZE_VARIABLE};
