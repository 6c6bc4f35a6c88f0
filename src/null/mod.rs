//! Nullable scalar module.
//!
//! One generic [`Nullable`] type, instantiated per primitive kind through the
//! [`Scalar`] grammar trait.

pub mod nullable;
pub mod scalar;

pub use nullable::*;
pub use scalar::*;

pub type NullString = Nullable<String>;
pub type NullInt64 = Nullable<i64>;
pub type NullInt32 = Nullable<i32>;
pub type NullInt16 = Nullable<i16>;
pub type NullInt8 = Nullable<i8>;
pub type NullUint64 = Nullable<u64>;
pub type NullUint32 = Nullable<u32>;
pub type NullUint16 = Nullable<u16>;
pub type NullUint8 = Nullable<u8>;
pub type NullFloat64 = Nullable<f64>;
pub type NullBool = Nullable<bool>;
