//! JSON token model shared by both decode paths.
//!
//! The serde visitor and the direct lexer both reduce their input to a
//! [`Token`], so the nullable and timestamp rules are written once.

use std::borrow::Cow;

use serde_json::Number;

use crate::error::DecodeResult;

/// A single JSON value as seen by a codec hook.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Null,
    /// Unquoted (and unescaped) string content.
    Str(Cow<'a, str>),
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Array,
    Object,
}

impl<'a> Token<'a> {
    /// Name of the token shape, used in `UnexpectedToken` diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Null => "null",
            Token::Str(_) => "string",
            Token::Bool(_) => "boolean",
            Token::I64(_) | Token::U64(_) | Token::F64(_) => "number",
            Token::Array => "array",
            Token::Object => "object",
        }
    }

    /// Textual form of the token, used as the offending input in
    /// `InvalidFormat` diagnostics and by layouts that parse numbers as text.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Token::Null => Cow::Borrowed("null"),
            Token::Str(s) => Cow::Borrowed(s.as_ref()),
            Token::Bool(b) => Cow::Owned(b.to_string()),
            Token::I64(n) => Cow::Owned(n.to_string()),
            Token::U64(n) => Cow::Owned(n.to_string()),
            Token::F64(f) => Cow::Owned(f.to_string()),
            Token::Array => Cow::Borrowed("[...]"),
            Token::Object => Cow::Borrowed("{...}"),
        }
    }
}

impl From<Number> for Token<'static> {
    fn from(n: Number) -> Self {
        if let Some(u) = n.as_u64() {
            Token::U64(u)
        } else if let Some(i) = n.as_i64() {
            Token::I64(i)
        } else {
            // serde_json numbers are always representable as one of the three
            Token::F64(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

/// Lex one raw JSON value for the direct decode path.
///
/// Containers are classified by their opening byte only: no target kind
/// accepts them, so their content is never inspected.
pub fn lex(raw: &str) -> DecodeResult<Token<'static>> {
    let raw = raw.trim();
    match raw.as_bytes().first() {
        Some(b'n') if raw == "null" => Ok(Token::Null),
        Some(b't') if raw == "true" => Ok(Token::Bool(true)),
        Some(b'f') if raw == "false" => Ok(Token::Bool(false)),
        Some(b'{') => Ok(Token::Object),
        Some(b'[') => Ok(Token::Array),
        Some(b'"') => {
            let s: String = serde_json::from_str(raw)?;
            Ok(Token::Str(Cow::Owned(s)))
        }
        _ => {
            let n: Number = serde_json::from_str(raw)?;
            Ok(Token::from(n))
        }
    }
}
