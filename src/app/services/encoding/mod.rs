//! Encoding normalization for ANS source files
//!
//! Government CSV exports arrive in a mix of UTF-8, Windows-1252 and Latin-1,
//! sometimes double-encoded by intermediate tooling. This module turns raw
//! file bytes into clean text in two steps:
//!
//! - [`decoder`] - ordered candidate-encoding chain, first successful strict
//!   decode wins
//! - [`repair`] - best-effort mojibake repair driven by a versioned,
//!   configurable pattern table
//!
//! Decoding failure is fatal for the file (it is skipped and counted); a
//! garbled-but-decodable file passes through with repair applied.

pub mod decoder;
pub mod repair;

#[cfg(test)]
pub mod tests;

pub use decoder::{DecodedText, TextDecoder};
pub use repair::MojibakeRepairer;
