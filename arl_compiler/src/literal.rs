//! Value literals used as class bounds and point values
//!
//! Classification of a token, first match wins:
//! - `"..."` is a string literal (quotes removed)
//! - ASCII digits only is an integer
//! - `-?digits[.digits]` is a float (so `-5` is a float)
//! - anything else is an unresolved symbolic name, bound later from data

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Str(String),
    Unresolved(String),
}

impl Literal {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Literal::Unresolved(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Literal::Integer(_) | Literal::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Integer(v) => Some(*v as f64),
            Literal::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// Classify a trimmed token
pub fn parse_literal(token: &str) -> Literal {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        return Literal::Str(token[1..token.len() - 1].to_string());
    }

    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(v) = token.parse::<i64>() {
            return Literal::Integer(v);
        }
    }

    if is_float_token(token) {
        if let Ok(v) = token.parse::<f64>() {
            return Literal::Float(v);
        }
    }

    Literal::Unresolved(token.to_string())
}

/// `-?\d+\.?\d*`
fn is_float_token(token: &str) -> bool {
    let unsigned = token.strip_prefix('-').unwrap_or(token);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

/// Floats always carry a decimal point so they re-parse as floats.
pub(crate) fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{}", format_float(*v)),
            Literal::Str(s) => write!(f, "\"{}\"", s),
            Literal::Unresolved(name) => write!(f, "{}", name),
        }
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Literal::Integer(v) => serializer.serialize_i64(*v),
            Literal::Float(v) => serializer.serialize_f64(*v),
            Literal::Str(s) | Literal::Unresolved(s) => serializer.serialize_str(s),
        }
    }
}
