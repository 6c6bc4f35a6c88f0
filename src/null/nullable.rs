//! Three-state nullable scalar.
//!
//! A [`Nullable`] distinguishes a value that is present (including a present
//! zero or empty value) from one that is null or absent. Absent and null both
//! decode to `exists = false`; the difference only survives at the enclosing
//! object, depending on how it is encoded (see [`EmptyFields`]).
//!
//! [`EmptyFields`]: crate::codec::EmptyFields

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::codec::encode::FieldEncoder;
use crate::codec::token::{lex, Token};
use crate::codec::visitor::{TokenDecoder, TokenVisitor};
use crate::error::{DecodeError, DecodeResult};
use crate::null::scalar::Scalar;

/// A primitive value plus a presence flag.
///
/// Invariant: when `exists()` is false, `value()` is `T::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Nullable<T> {
    value: T,
    exists: bool,
}

impl<T: Scalar> Nullable<T> {
    /// A present value.
    pub fn from_value(value: T) -> Self {
        Self {
            value,
            exists: true,
        }
    }

    /// The null/absent state.
    pub fn null() -> Self {
        Self::default()
    }

    pub fn from_option(value: Option<T>) -> Self {
        value.map_or_else(Self::null, Self::from_value)
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn is_null(&self) -> bool {
        !self.exists
    }

    pub fn as_option(&self) -> Option<&T> {
        self.exists.then_some(&self.value)
    }

    pub fn into_option(self) -> Option<T> {
        self.exists.then_some(self.value)
    }

    /// Omission hook for `#[serde(skip_serializing_if = "Nullable::is_empty")]`
    /// and [`EmptyFields::Omit`](crate::codec::EmptyFields::Omit).
    ///
    /// Null counts as empty, so on an omitting path an explicit null and an
    /// absent key encode identically.
    pub fn is_empty(&self) -> bool {
        !self.exists || self.value.is_blank()
    }

    /// Apply the three-state decode rule to one token.
    pub fn from_token(token: Token<'_>) -> DecodeResult<Self> {
        match token {
            Token::Null => Ok(Self::null()),
            Token::Str(text) => {
                if text.is_empty() && T::EMPTY_TEXT_IS_NULL {
                    return Ok(Self::null());
                }
                T::parse_text(&text)
                    .map(Self::from_value)
                    .map_err(|cause| {
                        DecodeError::invalid_format(T::OP_NAME, text.into_owned(), T::KIND, cause)
                    })
            }
            other => match T::from_native(&other) {
                Some(Ok(value)) => Ok(Self::from_value(value)),
                Some(Err(cause)) => Err(DecodeError::invalid_format(
                    T::OP_NAME,
                    other.text(),
                    T::KIND,
                    cause,
                )),
                None => Err(DecodeError::unexpected_token(T::OP_NAME, other.kind())),
            },
        }
    }

    /// Direct single-value decode from raw JSON text.
    pub fn from_json(raw: &str) -> DecodeResult<Self> {
        Self::from_token(lex(raw)?)
    }

    /// Direct single-value encode to JSON text.
    pub fn to_json(&self) -> String {
        self.encode().to_string()
    }
}

impl<T: Scalar> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Self::from_value(value)
    }
}

impl<T: Scalar> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        Self::from_option(value)
    }
}

impl<T: Scalar + fmt::Display> fmt::Display for Nullable<T> {
    /// The value for present scalars, nothing for null.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exists {
            write!(f, "{}", self.value)
        } else {
            Ok(())
        }
    }
}

impl<T: Scalar> FieldEncoder for Nullable<T> {
    fn encode(&self) -> Value {
        if self.exists {
            self.value.to_json_value()
        } else {
            Value::Null
        }
    }

    fn is_empty(&self) -> bool {
        Nullable::is_empty(self)
    }
}

/// Decode hook for one nullable kind.
struct NullableDecoder<T>(PhantomData<fn() -> T>);

impl<T: Scalar> TokenDecoder for NullableDecoder<T> {
    type Output = Nullable<T>;

    fn expecting(&self) -> &'static str {
        T::KIND
    }

    fn decode(&self, token: Token<'_>) -> DecodeResult<Nullable<T>> {
        Nullable::from_token(token)
    }
}

impl<T: Scalar> Serialize for Nullable<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.exists {
            self.value.serialize(serializer)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de, T: Scalar> Deserialize<'de> for Nullable<T> {
    /// Decoded through `deserialize_option`, so a missing struct field reads
    /// as null instead of failing.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(TokenVisitor(NullableDecoder(PhantomData)))
    }
}
