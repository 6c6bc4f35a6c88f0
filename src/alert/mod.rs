//! Alert record module.
//!
//! The alert shape consumed at the delivery boundary.

pub mod record;

pub use record::*;
