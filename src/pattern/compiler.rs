// Mon Oct 19 2026 - Alex

use crate::pattern::mask::{Expand, Mask};
use crate::pattern::{PatternError, Token};
use itertools::Itertools;
use std::fmt;
use std::str::FromStr;

/// A maximal run of consecutive literal tokens, compared as one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Group {
    pub start: usize,
    pub len: usize,
}

impl Group {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }
}

/// Search-ready form of a signature.
///
/// Built once and immutable afterwards. The matcher reads `groups`, `bytes`
/// and `masked` directly, so nothing is derived per search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    tokens: Vec<Token>,
    bytes: Vec<u8>,
    groups: Vec<Group>,
    masked: Vec<usize>,
    anchor_offset: usize,
    has_anchor: bool,
}

impl CompiledPattern {
    pub fn from_masks(masks: &[Mask]) -> Result<Self, PatternError> {
        Self::from_tokens(masks.expand())
    }

    pub fn parse(source: &str) -> Result<Self, PatternError> {
        Self::from_tokens(tokenize(source)?)
    }

    /// Strips the anchor out of `raw` and derives the search layout.
    pub fn from_tokens(raw: Vec<Token>) -> Result<Self, PatternError> {
        let mut anchor: Option<(usize, usize)> = None;
        let mut tokens = Vec::with_capacity(raw.len());

        for (raw_index, token) in raw.into_iter().enumerate() {
            if token.is_anchor() {
                if let Some((first, _)) = anchor {
                    return Err(PatternError::MultipleAnchors {
                        first,
                        second: raw_index,
                    });
                }
                anchor = Some((raw_index, tokens.len()));
            } else if let Token::Masked { value, mask } = token {
                tokens.push(Token::masked(value, mask));
            } else {
                tokens.push(token);
            }
        }

        let anchor_offset = anchor.map(|(_, offset)| offset).unwrap_or(0);
        if !tokens.is_empty() && anchor_offset >= tokens.len() {
            return Err(PatternError::AnchorOutOfRange {
                offset: anchor_offset,
                length: tokens.len(),
            });
        }

        let bytes = tokens.iter().map(|t| t.value().unwrap_or(0)).collect();
        let groups = derive_groups(&tokens);
        let masked = tokens
            .iter()
            .positions(|t| matches!(t, Token::Masked { .. }))
            .collect();

        let pattern = Self {
            tokens,
            bytes,
            groups,
            masked,
            anchor_offset,
            has_anchor: anchor.is_some(),
        };

        log::debug!(
            "compiled pattern `{}`: {} bytes, {} groups, anchor at {}",
            pattern,
            pattern.len(),
            pattern.groups.len(),
            pattern.anchor_offset
        );

        Ok(pattern)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Expected value at each position; zero where the position is a wildcard.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Indices of the masked tokens, in increasing order.
    pub fn masked_positions(&self) -> &[usize] {
        &self.masked
    }

    pub fn anchor_offset(&self) -> usize {
        self.anchor_offset
    }

    pub fn has_anchor(&self) -> bool {
        self.has_anchor
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn literal_count(&self) -> usize {
        self.groups.iter().map(|g| g.len).sum()
    }
}

impl FromStr for CompiledPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let anchor = self.has_anchor.then_some(self.anchor_offset);
        let mut first = true;
        for (i, token) in self.tokens.iter().enumerate() {
            if anchor == Some(i) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str("^")?;
                first = false;
            }
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
            first = false;
        }
        if self.tokens.is_empty() && self.has_anchor {
            f.write_str("^")?;
        }
        Ok(())
    }
}

/// Renders a token run in pattern-string form.
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().join(" ")
}

fn derive_groups(tokens: &[Token]) -> Vec<Group> {
    let mut groups = Vec::new();
    let mut open: Option<usize> = None;

    for (i, token) in tokens.iter().enumerate() {
        match (token.is_literal(), open) {
            (true, None) => open = Some(i),
            (false, Some(start)) => {
                groups.push(Group {
                    start,
                    len: i - start,
                });
                open = None;
            }
            _ => {}
        }
    }

    if let Some(start) = open {
        groups.push(Group {
            start,
            len: tokens.len() - start,
        });
    }

    groups
}

/// Splits pattern text (`"48 8B ? ^ 0B&0F"`) into raw tokens, anchor included.
pub fn tokenize(source: &str) -> Result<Vec<Token>, PatternError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            c if c.is_ascii_whitespace() => i += 1,
            b'?' => {
                tokens.push(Token::Wildcard);
                i += 1;
            }
            b'^' => {
                tokens.push(Token::Anchor);
                i += 1;
            }
            b'&' => return Err(PatternError::malformed(i, "`&` must follow a two-digit byte")),
            _ => {
                let value = hex_pair(bytes, i)?;
                i += 2;

                if bytes.get(i) == Some(&b'&') {
                    if i + 1 >= bytes.len() {
                        return Err(PatternError::malformed(i, "dangling `&` without mask"));
                    }
                    let mask = hex_pair(bytes, i + 1)?;
                    tokens.push(Token::masked(value, mask));
                    i += 3;
                } else {
                    tokens.push(Token::Literal(value));
                }
            }
        }
    }

    Ok(tokens)
}

fn hex_pair(bytes: &[u8], at: usize) -> Result<u8, PatternError> {
    let high = hex_digit(bytes, at)?;
    let low = hex_digit(bytes, at + 1)?;
    Ok(high << 4 | low)
}

fn hex_digit(bytes: &[u8], at: usize) -> Result<u8, PatternError> {
    let Some(&c) = bytes.get(at) else {
        return Err(PatternError::malformed(at, "unexpected end of pattern, expected hex digit"));
    };

    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 0xA),
        b'A'..=b'F' => Ok(c - b'A' + 0xA),
        _ => Err(PatternError::malformed(
            at,
            format!("expected hex digit, found {:?}", c as char),
        )),
    }
}
