// Mon Oct 19 2026 - Alex

//! Byte-signature scanning.
//!
//! A signature is written either as text (`"48 8B ? ^ 0B&0F"`) or as a list of
//! [`pattern::mask`] primitives, compiled once into a [`CompiledPattern`] and
//! then searched for in any number of buffers.
//!
//! ```
//! use sigscan::CompiledPattern;
//!
//! let pattern: CompiledPattern = "48 8B ? ? C3".parse().unwrap();
//! let data = [0x90, 0x90, 0x48, 0x8B, 0x00, 0xFF, 0xC3];
//! assert_eq!(pattern.find(&data), Some(2));
//! ```

pub mod config;
pub mod pattern;
pub mod utils;

pub use config::Config;
pub use pattern::{CompiledPattern, Mask, PatternError, PatternScanner, Signature, Token, NOT_FOUND};
