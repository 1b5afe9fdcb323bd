//! Rule and conclusion definitions: tokenizing, structure checking and
//! reference resolution against the features and known aliases

mod error;
mod grammar;
mod lexer;
mod token;
mod validator;

pub use error::ExpressionError;
pub use grammar::check_structure;
pub use lexer::tokenize;
pub use token::{PositionedToken, Token};
pub use validator::{validate_expression, AliasLookup, ExpressionValidator, Validation};
