use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `name` or `name[class]`
    Reference { name: String, class: Option<String> },
    And,
    Or,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Reference {
                name,
                class: Some(class),
            } => write!(f, "{}[{}]", name, class),
            Token::Reference { name, class: None } => f.write_str(name),
            Token::And => f.write_str("&"),
            Token::Or => f.write_str("|"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// A token and the byte range it covers in the expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    pub token: Token,
    pub offset: usize,
    pub len: usize,
}

impl PositionedToken {
    pub fn new(token: Token, offset: usize, len: usize) -> Self {
        Self { token, offset, len }
    }

    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}
