// SPDX-License-Identifier: MIT

//! Typed error handling for powerflow
//!
//! Condition compilation and graph construction each have their own error
//! type; `FlowError` wraps both for callers that build whole flows.

use thiserror::Error;

/// Top-level error type for powerflow
#[derive(Debug, Error)]
pub enum FlowError {
    /// Condition expression could not be compiled
    #[error("Condition error: {0}")]
    Condition(#[from] ConditionError),

    /// Action graph rejected an insertion
    #[error("Validation error: {0}")]
    Graph(#[from] GraphError),

    /// Flow definition is missing or has inconsistent fields
    #[error("Definition error: {0}")]
    Definition(String),

    /// Trigger names must be unique within a flow
    #[error("Trigger '{0}' already exists in flow")]
    DuplicateTrigger(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Failures while splitting an expression into tokens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexicalError {
    /// A double quote without a matching closing quote
    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },

    /// A character no token can start with
    #[error("Unknown character '{character}' at position {position}")]
    UnknownCharacter { character: char, position: usize },
}

/// Failures while arranging tokens into a tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// An operator had fewer operands than it needs
    #[error("Malformed expression: insufficient operands for operator {operator}")]
    InsufficientOperands { operator: String },

    /// A `)` without a matching `(`, or a `(` that was never closed
    #[error("Malformed expression: unbalanced parenthesis")]
    UnbalancedParenthesis,

    /// The expression did not reduce to exactly one tree
    #[error("Malformed expression: expected a single expression, found {remaining}")]
    Malformed { remaining: usize },
}

/// Errors from compiling a condition expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),

    #[error(transparent)]
    Structural(#[from] StructuralError),
}

/// Insertion failures on an action graph. The graph is left unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The node (by identity) is already part of this graph
    #[error("Action '{name}' already exists in actions")]
    DuplicateIdentity { name: String },

    /// The node was already attached to a graph
    #[error("Action '{name}' already has a parent")]
    AlreadyHasParent { name: String },

    /// The reference node is not registered in this graph
    #[error("Action '{name}' is not in actions")]
    UnknownReference { name: String },

    /// The node kind may only be placed in the root-level graph
    #[error("Action '{name}' of type {kind} cannot be set into non-root actions")]
    RestrictedKind { name: String, kind: String },
}

impl FlowError {
    /// Create a definition error
    pub fn definition(message: impl Into<String>) -> Self {
        Self::Definition(message.into())
    }
}
