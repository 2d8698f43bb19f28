//! Lowering of condition ASTs into the nested workflow-expression format

use super::ast::Expression;
use super::parser::parse;
use crate::error::ConditionError;
use serde_json::{json, Number, Value};

/// Compile an expression string into its nested mapping form.
///
/// Either the whole expression compiles or an error is returned; there is
/// no partial output.
pub fn compile(expression: &str) -> Result<Value, ConditionError> {
    let ast = parse(expression)?;
    Ok(lower(&ast))
}

/// Convert an expression tree into its nested mapping form
pub fn lower(expr: &Expression) -> Value {
    match expr {
        Expression::Literal(text) => lower_literal(text),
        Expression::Not(operand) => json!({ "not": lower(operand) }),
        Expression::Binary { op, left, right } => {
            let operands = json!([lower(left), lower(right)]);
            match op.schema_name() {
                Some(name) => json!({ name: operands }),
                None => json!({ "not": { "equals": operands } }),
            }
        }
        Expression::Logical { op, left, right } => {
            json!({ op.schema_name(): [lower(left), lower(right)] })
        }
    }
}

fn lower_literal(text: &str) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if text.contains('"') {
        return Value::String(text.replace('"', ""));
    }

    let number = if text.contains('.') {
        text.parse::<f64>().ok().and_then(Number::from_f64)
    } else {
        text.parse::<i64>()
            .ok()
            .map(Number::from)
            .or_else(|| wide_integer(text))
    };

    match number {
        Some(n) => Value::Number(n),
        None => Value::String(variable_reference(text)),
    }
}

/// Digit strings past `i64`, as `u64` or else the nearest float
fn wide_integer(text: &str) -> Option<Number> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse::<Number>().ok()
}

/// Workflow expression that reads the named variable
pub fn variable_reference(name: &str) -> String {
    format!("@variables('{}')", name)
}
