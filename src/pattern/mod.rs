// Mon Oct 19 2026 - Alex

pub mod token;
pub mod mask;
pub mod compiler;
pub mod matcher;
pub mod cache;
pub mod signature;
pub mod scanner;
pub mod error;

pub use token::Token;
pub use mask::{Expand, Mask};
pub use compiler::{render, tokenize, CompiledPattern, Group};
pub use matcher::{find, find_all, find_strided, find_tokens, to_signed_offset, Matches, NOT_FOUND};
pub use cache::{cached, PatternCache};
pub use signature::Signature;
pub use scanner::{FileReport, PatternScanner, ScanHit};
pub use error::PatternError;

/// Compiles pattern text and returns the first match in `data`.
pub fn find_str(data: &[u8], source: &str) -> Result<Option<usize>, PatternError> {
    let pattern = cached(source)?;
    Ok(pattern.find(data))
}
