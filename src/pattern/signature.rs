// Mon Oct 19 2026 - Alex

use crate::pattern::{cache, CompiledPattern, PatternCache, PatternError};
use std::fmt;
use std::sync::Arc;

/// A compiled pattern with the name it is known by.
#[derive(Debug, Clone)]
pub struct Signature {
    name: String,
    source: String,
    compiled: Arc<CompiledPattern>,
}

impl Signature {
    pub fn new(name: &str, source: &str) -> Result<Self, PatternError> {
        Self::with_cache(name, source, cache::global())
    }

    /// Compiles `source` through `cache` instead of the process-wide one.
    pub fn with_cache(name: &str, source: &str, cache: &PatternCache) -> Result<Self, PatternError> {
        let compiled = cache.get_or_compile(source)?;
        Ok(Self {
            name: name.to_string(),
            source: source.to_string(),
            compiled,
        })
    }

    pub fn from_compiled(name: &str, compiled: CompiledPattern) -> Self {
        Self {
            name: name.to_string(),
            source: compiled.to_string(),
            compiled: Arc::new(compiled),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.compiled
    }

    pub fn find(&self, data: &[u8]) -> Option<usize> {
        self.compiled.find(data)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.compiled)
    }
}
