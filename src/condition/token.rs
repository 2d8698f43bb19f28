// SPDX-License-Identifier: MIT

//! Tokenizer for condition expressions

use crate::error::LexicalError;

const KEYWORDS: [&str; 5] = ["and", "or", "not", "true", "false"];
const TWO_CHAR_OPERATORS: [&str; 4] = ["==", "!=", ">=", "<="];

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Comparison operators and the `and`, `or`, `not` keywords
    Operator,
    LeftParen,
    RightParen,
    /// Numbers and the `true`/`false` keywords
    Literal,
    /// Variable name
    Identifier,
    /// Double-quoted string, quotes included in the text
    String,
}

/// One lexical unit of an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Classify an accumulated word (keyword, number or identifier)
    fn word(text: String) -> Self {
        let kind = match text.as_str() {
            "and" | "or" | "not" => TokenKind::Operator,
            "true" | "false" => TokenKind::Literal,
            _ if text.chars().all(|c| c.is_ascii_digit() || c == '.') => TokenKind::Literal,
            _ => TokenKind::Identifier,
        };
        Self { kind, text }
    }
}

/// Split an expression into tokens, scanning left to right
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexicalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let pair: String = chars[i..(i + 2).min(chars.len())].iter().collect();

        if c == ' ' {
            flush(&mut word, &mut tokens);
        } else if TWO_CHAR_OPERATORS.contains(&pair.as_str()) {
            flush(&mut word, &mut tokens);
            tokens.push(Token::new(TokenKind::Operator, pair));
            i += 1;
        } else if c == '>' || c == '<' {
            flush(&mut word, &mut tokens);
            tokens.push(Token::new(TokenKind::Operator, c));
        } else if c == '(' {
            flush(&mut word, &mut tokens);
            tokens.push(Token::new(TokenKind::LeftParen, "("));
        } else if c == ')' {
            flush(&mut word, &mut tokens);
            tokens.push(Token::new(TokenKind::RightParen, ")"));
        } else if c == '"' {
            flush(&mut word, &mut tokens);
            let end = chars[i + 1..]
                .iter()
                .position(|&q| q == '"')
                .map(|offset| i + 1 + offset)
                .ok_or(LexicalError::UnterminatedString { position: i })?;
            let text: String = chars[i..=end].iter().collect();
            tokens.push(Token::new(TokenKind::String, text));
            i = end;
        } else if c.is_ascii_digit() || c == '.' {
            word.push(c);
        } else if c.is_alphabetic() || c == '-' || c == '_' {
            word.push(c);
            // Keywords end as soon as the next character cannot continue a word.
            let at_boundary = chars.get(i + 1).map_or(true, |n| !n.is_alphanumeric());
            if at_boundary && KEYWORDS.contains(&word.as_str()) {
                flush(&mut word, &mut tokens);
            }
        } else {
            return Err(LexicalError::UnknownCharacter {
                character: c,
                position: i,
            });
        }

        i += 1;
    }
    flush(&mut word, &mut tokens);

    log::trace!("Tokenized '{}' into {} tokens", input, tokens.len());
    Ok(tokens)
}

fn flush(word: &mut String, tokens: &mut Vec<Token>) {
    if !word.is_empty() {
        tokens.push(Token::word(std::mem::take(word)));
    }
}
