//! Timestamp normalization module.
//!
//! Source timestamps arrive in several encodings (RFC 3339, ANSI-C with zone,
//! unix milliseconds, fractional unix seconds, fluentd and suricata text).
//! Each is a [`TimestampLayout`]; all of them decode to one UTC
//! [`Timestamp`] and encode through the canonical layout.

pub mod format;
pub mod instant;
pub mod layout;

pub use instant::*;
pub use layout::*;
