// SPDX-License-Identifier: MIT

//! Condition compilation for branch guards
//!
//! This module turns human-readable boolean expressions into the nested
//! mapping form that conditional actions embed under `expression`:
//! - `var2 == false` becomes `{"equals": ["@variables('var2')", false]}`
//! - `a != b` becomes `{"not": {"equals": [...]}}`
//! - `a or b and c` groups as `a or (b and c)`
//!
//! Expressions are compiled, never evaluated.

mod ast;
mod lower;
mod parser;
mod token;

pub use ast::{CompareOp, Expression, LogicalOp};
pub use lower::{compile, lower, variable_reference};
pub use parser::{build_ast, parse, to_postfix};
pub use token::{tokenize, Token, TokenKind};

pub use lower::compile as compile_condition;

use crate::error::ConditionError;
use serde_json::Value;

/// A parsed condition, kept alongside its source text
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    source: String,
    ast: Expression,
}

impl Condition {
    pub fn new(expression: &str) -> Result<Self, ConditionError> {
        Ok(Self {
            source: expression.to_string(),
            ast: parse(expression)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Expression {
        &self.ast
    }

    pub fn export(&self) -> Value {
        lower(&self.ast)
    }
}

impl std::str::FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_condition_exports_compiled_form() {
        let condition = Condition::new("var2 == false").unwrap();
        assert_eq!(condition.source(), "var2 == false");
        assert_eq!(
            condition.export(),
            json!({"equals": ["@variables('var2')", false]})
        );
        assert_eq!(condition.export(), compile_condition("var2 == false").unwrap());
    }

    #[test]
    fn test_condition_from_str() {
        let condition: Condition = "x > 1".parse().unwrap();
        assert!(matches!(condition.ast(), Expression::Binary { .. }));
        assert!("x >".parse::<Condition>().is_err());
    }
}
