//! Codec adapter module.
//!
//! Connects nullable scalars and timestamps to the JSON engine through the
//! codec hook triplet:
//! - decode: [`TokenDecoder`], driven either by serde ([`TokenVisitor`]) or
//!   by the direct single-value lexer ([`lex`])
//! - encode: [`FieldEncoder::encode`]
//! - is-empty: [`FieldEncoder::is_empty`], applied under an explicit
//!   [`EmptyFields`] policy

pub mod encode;
pub mod token;
pub mod visitor;

pub use encode::*;
pub use token::*;
pub use visitor::*;
