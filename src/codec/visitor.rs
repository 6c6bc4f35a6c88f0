//! Generic serde visitor for the decode hook.
//!
//! One visitor serves every nullable kind and every timestamp layout: serde
//! callbacks are reduced to a [`Token`] and handed to a [`TokenDecoder`].

use std::borrow::Cow;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};

use crate::codec::token::Token;
use crate::error::DecodeResult;

/// Decode hook: turns one token into a value.
pub trait TokenDecoder {
    type Output;

    /// Description of accepted input, for serde's "invalid type" messages.
    fn expecting(&self) -> &'static str;

    fn decode(&self, token: Token<'_>) -> DecodeResult<Self::Output>;
}

/// Serde visitor that forwards every JSON shape to a [`TokenDecoder`].
pub struct TokenVisitor<D>(pub D);

impl<D: TokenDecoder> TokenVisitor<D> {
    fn finish<E: de::Error>(self, token: Token<'_>) -> Result<D::Output, E> {
        self.0.decode(token).map_err(E::custom)
    }
}

impl<'de, D: TokenDecoder> Visitor<'de> for TokenVisitor<D> {
    type Value = D::Output;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.0.expecting())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        self.finish(Token::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        self.finish(Token::Null)
    }

    fn visit_some<T>(self, deserializer: T) -> Result<Self::Value, T::Error>
    where
        T: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        self.finish(Token::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        self.finish(Token::I64(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        self.finish(Token::U64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        self.finish(Token::F64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        self.finish(Token::Str(Cow::Borrowed(v)))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        self.finish(Token::Str(Cow::Owned(v)))
    }

    fn visit_seq<A>(self, _seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        self.finish(Token::Array)
    }

    fn visit_map<A>(self, _map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        self.finish(Token::Object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    struct Echo;

    impl TokenDecoder for Echo {
        type Output = String;

        fn expecting(&self) -> &'static str {
            "anything but an array"
        }

        fn decode(&self, token: Token<'_>) -> DecodeResult<String> {
            match token {
                Token::Array => Err(DecodeError::unexpected_token("Echo", token.kind())),
                other => Ok(format!("{}:{}", other.kind(), other.text())),
            }
        }
    }

    fn echo(raw: &str) -> Result<String, serde_json::Error> {
        let mut de = serde_json::Deserializer::from_str(raw);
        de::Deserializer::deserialize_any(&mut de, TokenVisitor(Echo))
    }

    #[test]
    fn test_visitor_maps_shapes() {
        assert_eq!(echo("null").unwrap(), "null:null");
        assert_eq!(echo("\"x\"").unwrap(), "string:x");
        assert_eq!(echo("7").unwrap(), "number:7");
        assert_eq!(echo("-7").unwrap(), "number:-7");
        assert_eq!(echo("true").unwrap(), "boolean:true");
        assert_eq!(echo("{}").unwrap(), "object:{...}");
    }

    #[test]
    fn test_visitor_reports_decode_error() {
        let err = echo("[1]").unwrap_err();
        assert!(err.to_string().contains("Echo: unexpected array token"));
    }
}
