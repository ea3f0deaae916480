// Mon Oct 19 2026 - Alex

use std::fmt;

/// A single matchable unit of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Literal(u8),
    Wildcard,
    /// Matches when `data & mask == value`. [`Token::masked`] and
    /// `CompiledPattern::from_tokens` turn a `0x00` or `0xFF` mask into
    /// `Wildcard` or `Literal`.
    Masked { value: u8, mask: u8 },
    /// Zero-width marker for the offset a match reports.
    Anchor,
}

impl Token {
    pub fn literal(value: u8) -> Self {
        Self::Literal(value)
    }

    pub fn wildcard() -> Self {
        Self::Wildcard
    }

    pub fn anchor() -> Self {
        Self::Anchor
    }

    pub fn masked(value: u8, mask: u8) -> Self {
        match mask {
            0x00 => Self::Wildcard,
            0xFF => Self::Literal(value),
            _ => Self::Masked { value, mask },
        }
    }

    pub fn matches(&self, byte: u8) -> bool {
        match *self {
            Self::Literal(value) => value == byte,
            Self::Wildcard => true,
            Self::Masked { value, mask } => byte & mask == value,
            Self::Anchor => false,
        }
    }

    /// Number of buffer bytes this token consumes.
    pub fn width(&self) -> usize {
        match self {
            Self::Anchor => 0,
            _ => 1,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self, Self::Anchor)
    }

    pub fn value(&self) -> Option<u8> {
        match *self {
            Self::Literal(value) | Self::Masked { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn mask(&self) -> Option<u8> {
        match *self {
            Self::Masked { mask, .. } => Some(mask),
            _ => None,
        }
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::Wildcard
    }
}

impl From<u8> for Token {
    fn from(byte: u8) -> Self {
        Self::Literal(byte)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{:02X}", value),
            Self::Wildcard => f.write_str("?"),
            Self::Masked { value, mask } => write!(f, "{:02X}&{:02X}", value, mask),
            Self::Anchor => f.write_str("^"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_degrades() {
        assert_eq!(Token::masked(0x12, 0x00), Token::Wildcard);
        assert_eq!(Token::masked(0x12, 0xFF), Token::Literal(0x12));
        assert_eq!(
            Token::masked(0x0B, 0x0F),
            Token::Masked { value: 0x0B, mask: 0x0F }
        );
    }

    #[test]
    fn test_token_matches() {
        assert!(Token::Wildcard.matches(0xAB));
        assert!(Token::literal(0xAB).matches(0xAB));
        assert!(!Token::literal(0xAB).matches(0xAC));
        assert!(Token::masked(0x0B, 0x0F).matches(0xAB));
        assert!(!Token::masked(0x00, 0x0F).matches(0xAB));
        assert!(!Token::Anchor.matches(0x00));
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::literal(0x4).to_string(), "04");
        assert_eq!(Token::Wildcard.to_string(), "?");
        assert_eq!(Token::Anchor.to_string(), "^");
        assert_eq!(Token::masked(0xa0, 0xf0).to_string(), "A0&F0");
    }

    #[test]
    fn test_anchor_is_zero_width() {
        assert_eq!(Token::Anchor.width(), 0);
        assert_eq!(Token::Wildcard.width(), 1);
    }
}
