//! Boolean structure check
//!
//! ```text
//! expr   := term ('|' term)*
//! term   := factor ('&' factor)*
//! factor := reference | '(' expr ')'
//! ```
//!
//! References stand in for boolean values; nothing is evaluated.

use super::error::ExpressionError;
use super::token::{PositionedToken, Token};

const OPERAND: &str = "a reference or '('";

struct Parser<'a> {
    tokens: &'a [PositionedToken],
    position: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a PositionedToken> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'a PositionedToken> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        match self.peek() {
            Some(next) if &next.token == expected => {
                self.position += 1;
                true
            }
            _ => false,
        }
    }

    fn expr(&mut self, depth: usize) -> Result<(), ExpressionError> {
        self.term(depth)?;
        while self.eat(&Token::Or) {
            self.term(depth)?;
        }
        Ok(())
    }

    fn term(&mut self, depth: usize) -> Result<(), ExpressionError> {
        self.factor(depth)?;
        while self.eat(&Token::And) {
            self.factor(depth)?;
        }
        Ok(())
    }

    fn factor(&mut self, depth: usize) -> Result<(), ExpressionError> {
        let next = self
            .advance()
            .ok_or(ExpressionError::UnexpectedEnd { expected: OPERAND })?;

        match &next.token {
            Token::Reference { .. } => Ok(()),
            Token::LParen => {
                if depth + 1 > self.max_depth {
                    return Err(ExpressionError::TooDeep {
                        limit: self.max_depth,
                        offset: next.offset,
                    });
                }
                self.expr(depth + 1)?;
                match self.advance() {
                    Some(close) if close.token == Token::RParen => Ok(()),
                    Some(other) => Err(unexpected(other)),
                    None => Err(ExpressionError::UnexpectedEnd { expected: "')'" }),
                }
            }
            _ => Err(unexpected(next)),
        }
    }
}

fn unexpected(token: &PositionedToken) -> ExpressionError {
    ExpressionError::UnexpectedToken {
        found: token.token.to_string(),
        offset: token.offset,
    }
}

/// Check that the tokens form one well-nested boolean expression
pub fn check_structure(tokens: &[PositionedToken], max_depth: usize) -> Result<(), ExpressionError> {
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }

    let mut parser = Parser {
        tokens,
        position: 0,
        max_depth,
    };
    parser.expr(0)?;

    match parser.peek() {
        Some(trailing) => Err(unexpected(trailing)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::lexer::tokenize;
    use assert_matches::assert_matches;

    fn check(expr: &str) -> Result<(), ExpressionError> {
        check_structure(&tokenize(expr)?, 8)
    }

    #[test]
    fn test_well_formed_expressions() {
        for expr in [
            "R1",
            "Temp[Low] & R1",
            "A | B & C",
            "(A | B) & (C | (D & E))",
            "((A))",
        ] {
            assert!(check(expr).is_ok(), "rejected '{}'", expr);
        }
    }

    #[test]
    fn test_malformed_expressions() {
        assert_matches!(check(""), Err(ExpressionError::Empty));
        assert_matches!(check("   "), Err(ExpressionError::Empty));
        assert_matches!(check("A &"), Err(ExpressionError::UnexpectedEnd { .. }));
        assert_matches!(check("(A | B"), Err(ExpressionError::UnexpectedEnd { expected: "')'" }));
        assert_matches!(check("A B)"), Err(ExpressionError::UnexpectedToken { offset: 3, .. }));
        assert_matches!(check("& A"), Err(ExpressionError::UnexpectedToken { offset: 0, .. }));
        assert_matches!(check("A && B"), Err(ExpressionError::UnexpectedToken { offset: 3, .. }));
        assert_matches!(check("()"), Err(ExpressionError::UnexpectedToken { offset: 1, .. }));
        assert_matches!(check("Temp[Low]High"), Err(ExpressionError::UnexpectedToken { offset: 9, .. }));
    }

    #[test]
    fn test_depth_limit() {
        let tokens = tokenize("((A))").unwrap();
        assert!(check_structure(&tokens, 2).is_ok());
        assert_matches!(
            check_structure(&tokens, 1),
            Err(ExpressionError::TooDeep { limit: 1, offset: 1 })
        );
    }
}
