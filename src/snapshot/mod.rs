//! Snapshot codec.
//!
//! A snapshot is the only artifact meant to cross the capture/report
//! boundary. Decoding only ever instantiates the allow-listed node types.

pub mod codec;

// Re-export main types and functions
pub use codec::{decode, encode, Snapshot};
