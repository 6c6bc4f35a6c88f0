//! Decode error taxonomy.
//!
//! Every decode hook reports failures through [`DecodeError`]. Encoding is
//! total and never produces an error.

use std::num::{ParseFloatError, ParseIntError, TryFromIntError};
use std::str::ParseBoolError;

use serde_json::error::Category;
use thiserror::Error;

use crate::null::Scalar;
use crate::timestamp::TimestampLayout;

/// Result alias for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Failure while decoding a single JSON value into a nullable scalar or a
/// timestamp.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The token had an acceptable shape but its content does not match the
    /// grammar of the target kind.
    #[error("{op}: invalid {expected} value {input:?}: {cause}")]
    InvalidFormat {
        op: &'static str,
        input: String,
        expected: &'static str,
        #[source]
        cause: ParseFailure,
    },

    /// The token's JSON shape is never valid for the target kind.
    #[error("{op}: unexpected {found} token")]
    UnexpectedToken { op: &'static str, found: &'static str },

    /// A well-formed document had a value the target type rejected.
    #[error("{source}")]
    Field {
        op: Option<&'static str>,
        source: serde_json::Error,
    },

    /// The raw input was not a JSON document.
    #[error("malformed JSON: {0}")]
    Json(#[source] serde_json::Error),
}

impl DecodeError {
    pub fn invalid_format(
        op: &'static str,
        input: impl Into<String>,
        expected: &'static str,
        cause: impl Into<ParseFailure>,
    ) -> Self {
        DecodeError::InvalidFormat {
            op,
            input: input.into(),
            expected,
            cause: cause.into(),
        }
    }

    pub fn unexpected_token(op: &'static str, found: &'static str) -> Self {
        DecodeError::UnexpectedToken { op, found }
    }

    /// Operation label the failure is attributed to, if any.
    pub fn op(&self) -> Option<&'static str> {
        match self {
            DecodeError::InvalidFormat { op, .. } | DecodeError::UnexpectedToken { op, .. } => {
                Some(op)
            }
            DecodeError::Field { op, .. } => *op,
            DecodeError::Json(_) => None,
        }
    }
}

/// Engine errors are split by category: data errors keep the operation
/// label of the hook that raised them, everything else is malformed JSON.
impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => DecodeError::Field {
                op: attributed_op(&err.to_string()),
                source: err,
            },
            Category::Syntax | Category::Eof | Category::Io => DecodeError::Json(err),
        }
    }
}

/// Hook messages start with `<op>: `.
fn attributed_op(message: &str) -> Option<&'static str> {
    let (prefix, _) = message.split_once(": ")?;
    let scalar_ops = [
        <String as Scalar>::OP_NAME,
        <i64 as Scalar>::OP_NAME,
        <i32 as Scalar>::OP_NAME,
        <i16 as Scalar>::OP_NAME,
        <i8 as Scalar>::OP_NAME,
        <u64 as Scalar>::OP_NAME,
        <u32 as Scalar>::OP_NAME,
        <u16 as Scalar>::OP_NAME,
        <u8 as Scalar>::OP_NAME,
        <f64 as Scalar>::OP_NAME,
        <bool as Scalar>::OP_NAME,
    ];
    scalar_ops
        .into_iter()
        .chain(TimestampLayout::ALL.map(TimestampLayout::op_name))
        .find(|op| *op == prefix)
}

/// Underlying cause of an [`DecodeError::InvalidFormat`].
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error(transparent)]
    Int(#[from] ParseIntError),

    #[error(transparent)]
    Float(#[from] ParseFloatError),

    #[error(transparent)]
    Bool(#[from] ParseBoolError),

    #[error(transparent)]
    Convert(#[from] TryFromIntError),

    #[error(transparent)]
    Time(#[from] chrono::ParseError),

    #[error("number has a fractional part")]
    NotAnInteger,

    #[error("number is not finite")]
    NotFinite,

    #[error("instant out of range")]
    OutOfRange,

    #[error("input does not match layout")]
    LayoutMismatch,
}
