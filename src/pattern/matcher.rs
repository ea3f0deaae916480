// Mon Oct 19 2026 - Alex

use crate::pattern::mask::Expand;
use crate::pattern::{CompiledPattern, Token};
use std::num::NonZeroUsize;

/// Sentinel for callers that need the result as a single signed integer.
pub const NOT_FOUND: isize = -1;

/// Converts a search result to the signed offset form, `NOT_FOUND` on a miss.
pub fn to_signed_offset(result: Option<usize>) -> isize {
    result
        .and_then(|offset| isize::try_from(offset).ok())
        .unwrap_or(NOT_FOUND)
}

/// First match of `pattern` in `data`, reported at the anchor.
pub fn find(data: &[u8], pattern: &CompiledPattern) -> Option<usize> {
    find_strided(data, pattern, NonZeroUsize::MIN)
}

/// Like [`find`], trying only the start positions `0, stride, 2 * stride, ...`.
///
/// An empty pattern matches at offset 0.
pub fn find_strided(data: &[u8], pattern: &CompiledPattern, stride: NonZeroUsize) -> Option<usize> {
    Matches::new(data, pattern, stride).next()
}

/// Every match in increasing order. Matches may overlap.
pub fn find_all(data: &[u8], pattern: &CompiledPattern, stride: NonZeroUsize) -> Vec<usize> {
    Matches::new(data, pattern, stride).collect()
}

/// Lazily walks the candidate positions of one buffer.
pub struct Matches<'a> {
    data: &'a [u8],
    pattern: &'a CompiledPattern,
    stride: usize,
    next: Option<usize>,
    last: Option<usize>,
}

impl<'a> Matches<'a> {
    pub fn new(data: &'a [u8], pattern: &'a CompiledPattern, stride: NonZeroUsize) -> Self {
        let last = data.len().checked_sub(pattern.len());
        Self {
            data,
            pattern,
            stride: stride.get(),
            next: last.map(|_| 0),
            last,
        }
    }
}

impl Iterator for Matches<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let last = self.last?;

        while let Some(i) = self.next {
            self.next = i.checked_add(self.stride).filter(|&n| n <= last);
            if matches_at(self.data, self.pattern, i) {
                return Some(i + self.pattern.anchor_offset());
            }
        }

        None
    }
}

#[inline]
fn matches_at(data: &[u8], pattern: &CompiledPattern, i: usize) -> bool {
    let bytes = pattern.bytes();

    for group in pattern.groups() {
        let start = i + group.start;
        if data[start..start + group.len] != bytes[group.range()] {
            return false;
        }
    }

    let tokens = pattern.tokens();
    pattern
        .masked_positions()
        .iter()
        .all(|&j| tokens[j].matches(data[i + j]))
}

/// Ungrouped scan for token runs assembled at run time.
///
/// Anchors are zero-width and ignored, so the start of the match is reported.
pub fn find_tokens(data: &[u8], tokens: &[Token], stride: NonZeroUsize) -> Option<usize> {
    let last = data.len().checked_sub(tokens.size())?;

    (0..=last).step_by(stride.get()).find(|&i| {
        tokens
            .iter()
            .filter(|t| !t.is_anchor())
            .zip(&data[i..])
            .all(|(token, &byte)| token.matches(byte))
    })
}

impl CompiledPattern {
    pub fn find(&self, data: &[u8]) -> Option<usize> {
        find(data, self)
    }

    pub fn find_strided(&self, data: &[u8], stride: NonZeroUsize) -> Option<usize> {
        find_strided(data, self, stride)
    }

    pub fn find_all(&self, data: &[u8], stride: NonZeroUsize) -> Vec<usize> {
        find_all(data, self, stride)
    }

    /// Checks the pattern against the start of `data`, ignoring the anchor.
    pub fn matches_at(&self, data: &[u8]) -> bool {
        data.len() >= self.len() && matches_at(data, self, 0)
    }

    pub fn matches<'a>(&'a self, data: &'a [u8], stride: NonZeroUsize) -> Matches<'a> {
        Matches::new(data, self, stride)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::mask;

    fn stride(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_find_string() {
        let data = b"Hello, World! This is a test string to check if the pattern matching works.";
        let pattern = CompiledPattern::from_masks(&[mask::string("test string")]).unwrap();
        assert_eq!(find(data, &pattern), Some(24));
    }

    #[test]
    fn test_find_repeated_sequence() {
        let data = b"Test buffer 123 123 123.";
        let pattern =
            CompiledPattern::from_masks(&[mask::sequence(3, vec![mask::string("123"), mask::any(1)])])
                .unwrap();
        assert_eq!(pattern.len(), 12);
        assert_eq!(find(data, &pattern), Some(12));
    }

    #[test]
    fn test_find_with_wildcards() {
        let mut data = vec![0x90; 16];
        data[5..10].copy_from_slice(&[0x48, 0x8B, 0x00, 0xFF, 0xC3]);
        let pattern = CompiledPattern::parse("48 8B ? ? C3").unwrap();
        assert_eq!(find(&data, &pattern), Some(5));
    }

    #[test]
    fn test_masked_and_anchor() {
        let pattern = CompiledPattern::parse("00&0F ^ 10").unwrap();
        assert_eq!(find(&[0xAB, 0x10], &pattern), None);
        assert_eq!(find(&[0x00, 0x10], &pattern), Some(1));
        assert_eq!(find(&[0xF0, 0x10], &pattern), Some(1));
    }

    #[test]
    fn test_masked_only_pattern() {
        let pattern = CompiledPattern::parse("? 0B&0F").unwrap();
        assert_eq!(find(&[0x00, 0x01, 0x3B], &pattern), Some(1));
    }

    #[test]
    fn test_pattern_longer_than_buffer() {
        let pattern = CompiledPattern::parse("01 02 03").unwrap();
        assert_eq!(find(&[0x01, 0x02], &pattern), None);
        assert_eq!(find(&[], &pattern), None);
        assert!(find_all(&[0x01], &pattern, stride(1)).is_empty());
    }

    #[test]
    fn test_empty_pattern_matches_at_zero() {
        let pattern = CompiledPattern::parse("").unwrap();
        assert_eq!(find(b"abc", &pattern), Some(0));
        assert_eq!(find(&[], &pattern), Some(0));
    }

    #[test]
    fn test_match_at_buffer_end() {
        let pattern = CompiledPattern::parse("AA BB").unwrap();
        assert_eq!(find(&[0x00, 0x00, 0xAA, 0xBB], &pattern), Some(2));
        assert_eq!(find(&[0xAA, 0xBB], &pattern), Some(0));
    }

    #[test]
    fn test_stride_skips_positions() {
        let data = [0x00, 0xAA, 0x00, 0x00, 0xAA, 0x00];
        let pattern = CompiledPattern::parse("AA").unwrap();
        assert_eq!(find_strided(&data, &pattern, stride(1)), Some(1));
        assert_eq!(find_strided(&data, &pattern, stride(2)), Some(4));
        assert_eq!(find_strided(&data, &pattern, stride(4)), Some(4));
        assert_eq!(find_strided(&data, &pattern, stride(3)), None);
        assert_eq!(find_strided(&data, &pattern, stride(usize::MAX)), None);
    }

    #[test]
    fn test_first_match_wins() {
        let data = b"xxabxxabxx";
        let pattern = CompiledPattern::from_masks(&[mask::string("ab")]).unwrap();
        assert_eq!(find(data, &pattern), Some(2));
        assert_eq!(find_all(data, &pattern, stride(1)), vec![2, 6]);
    }

    #[test]
    fn test_find_all_reports_anchor() {
        let data = [0x01, 0x02, 0x01, 0x02];
        let pattern = CompiledPattern::parse("01 ^ 02").unwrap();
        assert_eq!(pattern.find_all(&data, stride(1)), vec![1, 3]);
    }

    #[test]
    fn test_find_is_deterministic() {
        let data = b"aaaaabaaaab";
        let pattern = CompiledPattern::parse("61 ? 62").unwrap();
        let first = pattern.find_strided(data, stride(1));
        assert_eq!(first, pattern.find_strided(data, stride(1)));
        assert_eq!(first, Some(3));
    }

    #[test]
    fn test_find_tokens() {
        let data = [0x10, 0x20, 0x48, 0xAB, 0xC3];
        let tokens = [Token::Literal(0x48), Token::Anchor, Token::Wildcard, Token::Literal(0xC3)];
        assert_eq!(find_tokens(&data, &tokens, stride(1)), Some(2));
        assert_eq!(find_tokens(&data, &tokens, stride(3)), None);
        assert_eq!(find_tokens(&data, &[Token::masked(0x08, 0x0F)], stride(1)), Some(2));
        assert_eq!(find_tokens(&[0x01], &[Token::Wildcard, Token::Wildcard], stride(1)), None);
        assert_eq!(find_tokens(&[], &[], stride(1)), Some(0));
        assert_eq!(find_tokens(&[0xC3], &[Token::Anchor, Token::Anchor, Token::Literal(0xC3)], stride(1)), Some(0));
        assert_eq!(find_tokens(&[], &[Token::Anchor], stride(1)), Some(0));
    }

    #[test]
    fn test_matches_at() {
        let pattern = CompiledPattern::parse("48 ? 0B&0F").unwrap();
        assert!(pattern.matches_at(&[0x48, 0x00, 0xAB]));
        assert!(!pattern.matches_at(&[0x48, 0x00, 0xA0]));
        assert!(!pattern.matches_at(&[0x48]));
    }

    #[test]
    fn test_signed_offset() {
        assert_eq!(to_signed_offset(Some(0)), 0);
        assert_eq!(to_signed_offset(Some(44)), 44);
        assert_eq!(to_signed_offset(None), NOT_FOUND);
    }
}
