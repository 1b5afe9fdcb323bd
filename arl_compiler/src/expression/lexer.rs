//! Expression tokenizer
//!
//! A name is a maximal run of name characters (spaces included) with the
//! surrounding spaces trimmed. A `[class]` directly after a name makes it a
//! membership reference.

use std::iter::Peekable;
use std::str::CharIndices;

use super::error::ExpressionError;
use super::token::{PositionedToken, Token};
use crate::syntax::{is_class_char, is_name_char};

pub fn tokenize(expr: &str) -> Result<Vec<PositionedToken>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        let single = match c {
            '&' => Some(Token::And),
            '|' => Some(Token::Or),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        };

        if let Some(token) = single {
            chars.next();
            tokens.push(PositionedToken::new(token, start, 1));
        } else if is_name_char(c) {
            if let Some(token) = read_reference(expr, start, &mut chars)? {
                tokens.push(token);
            }
        } else if c.is_whitespace() {
            chars.next();
        } else {
            return Err(ExpressionError::UnexpectedCharacter { ch: c, offset: start });
        }
    }

    Ok(tokens)
}

fn read_reference(
    expr: &str,
    start: usize,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<Option<PositionedToken>, ExpressionError> {
    let mut end = start;
    while let Some(&(index, c)) = chars.peek() {
        if !is_name_char(c) {
            break;
        }
        end = index + c.len_utf8();
        chars.next();
    }

    let run = &expr[start..end];
    let name = run.trim();
    if name.is_empty() {
        return Ok(None);
    }
    let offset = start + (run.len() - run.trim_start().len());

    let mut class = None;
    let mut token_end = offset + name.len();

    if let Some(&(open, '[')) = chars.peek() {
        let close = expr[open + 1..]
            .find(']')
            .map(|i| open + 1 + i)
            .ok_or(ExpressionError::UnclosedClass { offset: open })?;

        let inner = expr[open + 1..close].trim();
        if inner.is_empty() || !inner.chars().all(is_class_char) {
            return Err(ExpressionError::InvalidClassReference {
                text: expr[open..=close].to_string(),
                offset: open,
            });
        }

        for (index, _) in chars.by_ref() {
            if index == close {
                break;
            }
        }

        class = Some(inner.to_string());
        token_end = close + 1;
    }

    Ok(Some(PositionedToken::new(
        Token::Reference {
            name: name.to_string(),
            class,
        },
        offset,
        token_end - offset,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn reference(name: &str, class: Option<&str>) -> Token {
        Token::Reference {
            name: name.to_string(),
            class: class.map(str::to_string),
        }
    }

    #[test]
    fn test_tokenize_references_and_operators() {
        let tokens = tokenize("Temp[Low] & (R1 | Mode[very high])").unwrap();
        let kinds: Vec<Token> = tokens.iter().map(|t| t.token.clone()).collect();

        assert_eq!(
            kinds,
            vec![
                reference("Temp", Some("Low")),
                Token::And,
                Token::LParen,
                reference("R1", None),
                Token::Or,
                reference("Mode", Some("very high")),
                Token::RParen,
            ]
        );
        assert_eq!((tokens[0].offset, tokens[0].len), (0, 9));
        assert_eq!(tokens[3].offset, 13);
    }

    #[test]
    fn test_names_keep_inner_spaces() {
        let tokens = tokenize("  high load  &x").unwrap();
        assert_eq!(tokens[0].token, reference("high load", None));
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[2].token, reference("x", None));
    }

    #[test]
    fn test_space_before_class_bracket() {
        let tokens = tokenize("Temp [ Low ]").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, reference("Temp", Some("Low")));
        assert_eq!(tokens[0].end(), 12);
    }

    #[test]
    fn test_invalid_characters() {
        assert_matches!(
            tokenize("A + B"),
            Err(ExpressionError::UnexpectedCharacter { ch: '+', offset: 2 })
        );
        assert_matches!(
            tokenize("[Low]"),
            Err(ExpressionError::UnexpectedCharacter { ch: '[', offset: 0 })
        );
        assert_matches!(
            tokenize("A]"),
            Err(ExpressionError::UnexpectedCharacter { ch: ']', offset: 1 })
        );
    }

    #[test]
    fn test_bad_class_references() {
        assert_matches!(tokenize("Temp[Low"), Err(ExpressionError::UnclosedClass { offset: 4 }));
        assert_matches!(
            tokenize("Temp[]"),
            Err(ExpressionError::InvalidClassReference { offset: 4, .. })
        );
        assert_matches!(
            tokenize("Temp[a.b]"),
            Err(ExpressionError::InvalidClassReference { .. })
        );
    }
}
