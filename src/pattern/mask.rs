// Mon Oct 19 2026 - Alex

//! Composable building blocks for signatures.
//!
//! Every primitive expands eagerly into a flat run of [`Token`]s; primitives
//! compose by concatenation only.
//!
//! ```
//! use sigscan::pattern::mask;
//! use sigscan::CompiledPattern;
//!
//! let pattern = CompiledPattern::from_masks(&[
//!     mask::byte(0x48),
//!     mask::any(2),
//!     mask::anchor(),
//!     mask::dword(0xDEADBEEF),
//! ])
//! .unwrap();
//! assert_eq!(pattern.len(), 7);
//! assert_eq!(pattern.anchor_offset(), 3);
//! ```

use crate::pattern::compiler::tokenize;
use crate::pattern::{PatternError, Token};

/// Anything that can be flattened into a token run.
pub trait Expand {
    /// Number of buffer bytes the expansion spans. Anchors count as zero.
    fn size(&self) -> usize;

    fn expand_into(&self, out: &mut Vec<Token>);

    fn expand(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        self.expand_into(&mut tokens);
        tokens
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mask {
    Byte(u8),
    Word(u16),
    Dword(u32),
    Qword(u64),
    Any(usize),
    Str(String),
    Masked(u8, u8),
    Sequence(usize, Vec<Mask>),
    Anchor,
    Tokens(Vec<Token>),
}

impl Expand for Mask {
    fn size(&self) -> usize {
        match self {
            Mask::Byte(_) | Mask::Masked(..) => 1,
            Mask::Word(_) => 2,
            Mask::Dword(_) => 4,
            Mask::Qword(_) => 8,
            Mask::Any(count) => *count,
            Mask::Str(s) => s.len(),
            Mask::Sequence(times, inner) => times * inner.size(),
            Mask::Anchor => 0,
            Mask::Tokens(tokens) => tokens.size(),
        }
    }

    fn expand_into(&self, out: &mut Vec<Token>) {
        match self {
            Mask::Byte(value) => out.push(Token::Literal(*value)),
            Mask::Word(value) => out.extend(value.to_le_bytes().map(Token::Literal)),
            Mask::Dword(value) => out.extend(value.to_le_bytes().map(Token::Literal)),
            Mask::Qword(value) => out.extend(value.to_le_bytes().map(Token::Literal)),
            Mask::Any(count) => out.extend(std::iter::repeat(Token::Wildcard).take(*count)),
            Mask::Str(s) => out.extend(s.bytes().map(Token::Literal)),
            Mask::Masked(value, mask) => out.push(Token::masked(*value, *mask)),
            Mask::Sequence(times, inner) => {
                let start = out.len();
                inner.expand_into(out);
                let end = out.len();
                for _ in 1..*times {
                    out.extend_from_within(start..end);
                }
                if *times == 0 {
                    out.truncate(start);
                }
            }
            Mask::Anchor => out.push(Token::Anchor),
            Mask::Tokens(tokens) => out.extend_from_slice(tokens),
        }
    }
}

impl Expand for Token {
    fn size(&self) -> usize {
        self.width()
    }

    fn expand_into(&self, out: &mut Vec<Token>) {
        out.push(*self);
    }
}

impl<T: Expand> Expand for [T] {
    fn size(&self) -> usize {
        self.iter().map(Expand::size).sum()
    }

    fn expand_into(&self, out: &mut Vec<Token>) {
        for item in self {
            item.expand_into(out);
        }
    }
}

impl<T: Expand> Expand for Vec<T> {
    fn size(&self) -> usize {
        self.as_slice().size()
    }

    fn expand_into(&self, out: &mut Vec<Token>) {
        self.as_slice().expand_into(out)
    }
}

pub fn byte(value: u8) -> Mask {
    Mask::Byte(value)
}

pub fn word(value: u16) -> Mask {
    Mask::Word(value)
}

pub fn dword(value: u32) -> Mask {
    Mask::Dword(value)
}

pub fn qword(value: u64) -> Mask {
    Mask::Qword(value)
}

/// `count` wildcard bytes.
pub fn any(count: usize) -> Mask {
    Mask::Any(count)
}

/// One literal per byte of `s`, without a terminator.
pub fn string(s: &str) -> Mask {
    Mask::Str(s.to_string())
}

pub fn bytes(values: &[u8]) -> Mask {
    Mask::Tokens(values.iter().copied().map(Token::Literal).collect())
}

pub fn masked(value: u8, mask: u8) -> Mask {
    Mask::Masked(value, mask)
}

/// The concatenation of `inner`, repeated `times` times.
pub fn sequence(times: usize, inner: Vec<Mask>) -> Mask {
    Mask::Sequence(times, inner)
}

pub fn anchor() -> Mask {
    Mask::Anchor
}

/// Embeds a textual pattern (`"48 8B ? ^ C3"`) as a primitive.
pub fn pattern(source: &str) -> Result<Mask, PatternError> {
    Ok(Mask::Tokens(tokenize(source)?))
}
