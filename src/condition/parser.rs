//! Condition expression parser
//!
//! Parsing runs in two passes over the token stream: a shunting-yard pass
//! that rewrites infix tokens to postfix order, then a stack pass that
//! folds the postfix tokens into an [`Expression`] tree.

use super::ast::{CompareOp, Expression, LogicalOp};
use super::token::{tokenize, Token, TokenKind};
use crate::error::{ConditionError, StructuralError};

/// Binding strength of an operator token; higher binds tighter
fn precedence(token: &Token) -> Option<u8> {
    if token.kind != TokenKind::Operator {
        return None;
    }
    match token.text.as_str() {
        "==" | "!=" | ">" | "<" | ">=" | "<=" => Some(4),
        "not" => Some(3),
        "and" => Some(2),
        "or" => Some(1),
        _ => None,
    }
}

/// Parse a condition expression string into an AST
pub fn parse(input: &str) -> Result<Expression, ConditionError> {
    let tokens = tokenize(input)?;
    let postfix = to_postfix(tokens)?;
    Ok(build_ast(postfix)?)
}

/// Reorder infix tokens into postfix order.
///
/// Operators of equal precedence pop before the incoming one is pushed, so
/// every operator is left-associative.
pub fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, StructuralError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Operator => {
                let incoming = precedence(&token).unwrap_or(0);
                while let Some(top) = stack.last() {
                    match precedence(top) {
                        Some(p) if p >= incoming => {
                            if let Some(op) = stack.pop() {
                                output.push(op);
                            }
                        }
                        _ => break,
                    }
                }
                stack.push(token);
            }
            TokenKind::LeftParen => stack.push(token),
            TokenKind::RightParen => loop {
                match stack.pop() {
                    Some(t) if t.kind == TokenKind::LeftParen => break,
                    Some(t) => output.push(t),
                    None => return Err(StructuralError::UnbalancedParenthesis),
                }
            },
            TokenKind::Literal | TokenKind::Identifier | TokenKind::String => output.push(token),
        }
    }

    while let Some(token) = stack.pop() {
        if token.kind == TokenKind::LeftParen {
            return Err(StructuralError::UnbalancedParenthesis);
        }
        output.push(token);
    }

    log::trace!(
        "Postfix: {}",
        output
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    );
    Ok(output)
}

/// Fold postfix tokens into a single expression tree
pub fn build_ast(postfix: Vec<Token>) -> Result<Expression, StructuralError> {
    let mut stack: Vec<Expression> = Vec::new();

    for token in postfix {
        if token.kind != TokenKind::Operator {
            stack.push(Expression::Literal(token.text));
            continue;
        }

        if token.text == "not" {
            let operand = stack
                .pop()
                .ok_or_else(|| insufficient(&token))?;
            stack.push(Expression::not(operand));
        } else if let Some(op) = CompareOp::from_symbol(&token.text) {
            let (left, right) = pop_pair(&mut stack, &token)?;
            stack.push(Expression::binary(op, left, right));
        } else if let Some(op) = LogicalOp::from_keyword(&token.text) {
            let (left, right) = pop_pair(&mut stack, &token)?;
            stack.push(Expression::logical(op, left, right));
        } else {
            stack.push(Expression::Literal(token.text));
        }
    }

    if stack.len() != 1 {
        return Err(StructuralError::Malformed {
            remaining: stack.len(),
        });
    }
    stack
        .pop()
        .ok_or(StructuralError::Malformed { remaining: 0 })
}

/// Pop the right operand, then the left one
fn pop_pair(
    stack: &mut Vec<Expression>,
    token: &Token,
) -> Result<(Expression, Expression), StructuralError> {
    let right = stack.pop().ok_or_else(|| insufficient(token))?;
    let left = stack.pop().ok_or_else(|| insufficient(token))?;
    Ok((left, right))
}

fn insufficient(token: &Token) -> StructuralError {
    StructuralError::InsufficientOperands {
        operator: token.text.clone(),
    }
}
