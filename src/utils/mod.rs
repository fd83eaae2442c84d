//! Utility functions and helpers.

pub mod console;
pub mod decode;

pub use decode::{DecodedPayload, decode_payload};
