// SPDX-License-Identifier: MIT

pub mod builder;
pub mod document;
pub mod loader;
pub mod types;

pub use builder::FlowBuilder;
pub use document::{Flow, DEFAULT_SCHEMA, DEFAULT_VERSION};
pub use loader::FlowLoader;
pub use types::{ActionDefinition, FlowDefinition};
