//! Primitive grammars for nullable scalars.
//!
//! A [`Scalar`] describes how one primitive kind is read from quoted text and
//! from a bare JSON token, and how it is written back.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::codec::token::Token;
use crate::error::ParseFailure;

/// Grammar capability of a primitive kind wrapped by [`Nullable`](super::Nullable).
pub trait Scalar: Clone + Default + PartialEq + fmt::Debug + Serialize {
    /// Kind name used in diagnostics, e.g. `int64`.
    const KIND: &'static str;

    /// Operation label attached to decode errors, e.g. `ReadNullInt64`.
    const OP_NAME: &'static str;

    /// Whether a quoted empty payload decodes as null.
    const EMPTY_TEXT_IS_NULL: bool = true;

    /// Parse the unquoted content of a JSON string.
    fn parse_text(text: &str) -> Result<Self, ParseFailure>;

    /// Read a bare (non-string) token. `None` when the token shape is never
    /// valid for this kind.
    fn from_native(token: &Token<'_>) -> Option<Result<Self, ParseFailure>>;

    /// Native JSON representation.
    fn to_json_value(&self) -> Value;

    /// Whether a present value still counts as empty for omission.
    fn is_blank(&self) -> bool {
        false
    }
}

impl Scalar for String {
    const KIND: &'static str = "string";
    const OP_NAME: &'static str = "ReadNullString";
    const EMPTY_TEXT_IS_NULL: bool = false;

    fn parse_text(text: &str) -> Result<Self, ParseFailure> {
        Ok(text.to_string())
    }

    fn from_native(_token: &Token<'_>) -> Option<Result<Self, ParseFailure>> {
        None
    }

    fn to_json_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! integer_scalar {
    ($ty:ty, $kind:literal, $op:literal) => {
        impl Scalar for $ty {
            const KIND: &'static str = $kind;
            const OP_NAME: &'static str = $op;

            fn parse_text(text: &str) -> Result<Self, ParseFailure> {
                Ok(text.parse::<$ty>()?)
            }

            fn from_native(token: &Token<'_>) -> Option<Result<Self, ParseFailure>> {
                match *token {
                    // widened first so every kind shares the fallible conversion
                    Token::I64(n) => Some(Self::try_from(i128::from(n)).map_err(Into::into)),
                    Token::U64(n) => Some(Self::try_from(i128::from(n)).map_err(Into::into)),
                    Token::F64(_) => Some(Err(ParseFailure::NotAnInteger)),
                    _ => None,
                }
            }

            fn to_json_value(&self) -> Value {
                Value::from(*self)
            }
        }
    };
}

integer_scalar!(i64, "int64", "ReadNullInt64");
integer_scalar!(i32, "int32", "ReadNullInt32");
integer_scalar!(i16, "int16", "ReadNullInt16");
integer_scalar!(i8, "int8", "ReadNullInt8");
integer_scalar!(u64, "uint64", "ReadNullUint64");
integer_scalar!(u32, "uint32", "ReadNullUint32");
integer_scalar!(u16, "uint16", "ReadNullUint16");
integer_scalar!(u8, "uint8", "ReadNullUint8");

impl Scalar for f64 {
    const KIND: &'static str = "float64";
    const OP_NAME: &'static str = "ReadNullFloat64";

    /// `NaN` and infinities parse in Rust but have no JSON literal.
    fn parse_text(text: &str) -> Result<Self, ParseFailure> {
        let value = text.parse::<f64>()?;
        if !value.is_finite() {
            return Err(ParseFailure::NotFinite);
        }
        Ok(value)
    }

    fn from_native(token: &Token<'_>) -> Option<Result<Self, ParseFailure>> {
        match *token {
            Token::I64(n) => Some(Ok(n as f64)),
            Token::U64(n) => Some(Ok(n as f64)),
            Token::F64(f) => Some(Ok(f)),
            _ => None,
        }
    }

    fn to_json_value(&self) -> Value {
        // non-finite floats have no JSON form and become null
        Value::from(*self)
    }
}

impl Scalar for bool {
    const KIND: &'static str = "bool";
    const OP_NAME: &'static str = "ReadNullBool";

    fn parse_text(text: &str) -> Result<Self, ParseFailure> {
        Ok(text.parse::<bool>()?)
    }

    fn from_native(token: &Token<'_>) -> Option<Result<Self, ParseFailure>> {
        match *token {
            Token::Bool(b) => Some(Ok(b)),
            _ => None,
        }
    }

    fn to_json_value(&self) -> Value {
        Value::Bool(*self)
    }
}
