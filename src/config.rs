// Mon Oct 19 2026 - Alex

use crate::pattern::{cache, PatternCache, PatternError, Signature};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Validation(String),
    #[error("Signature `{name}` is invalid: {source}")]
    Signature {
        name: String,
        #[source]
        source: PatternError,
    },
    #[error("Unknown signature: {0}")]
    UnknownSignature(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub stride: usize,
    pub threads: usize,
    pub parallel: bool,
    pub use_mmap: bool,
    pub find_all: bool,
    pub log_level: String,
    pub cache_capacity: usize,
    /// Signature name to pattern text.
    pub signatures: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stride: 1,
            threads: num_cpus::get(),
            parallel: true,
            use_mmap: true,
            find_all: false,
            log_level: "warn".to_string(),
            cache_capacity: 1000,
            signatures: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;

        log::debug!(
            "loaded config from {} ({} signatures)",
            path.display(),
            config.signatures.len()
        );

        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_signature(mut self, name: &str, pattern: &str) -> Self {
        self.signatures.insert(name.to_string(), pattern.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stride == 0 {
            return Err(ConfigError::Validation("stride must be greater than 0".to_string()));
        }
        if self.threads == 0 {
            return Err(ConfigError::Validation("threads must be greater than 0".to_string()));
        }
        let cache = self.pattern_cache();
        for name in self.signatures.keys() {
            self.signature_with(name, &cache)?;
        }
        Ok(())
    }

    pub fn stride(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.stride)
            .ok_or_else(|| ConfigError::Validation("stride must be greater than 0".to_string()))
    }

    /// A cache bounded by `cache_capacity`.
    pub fn pattern_cache(&self) -> PatternCache {
        PatternCache::new(self.cache_capacity)
    }

    pub fn signature(&self, name: &str) -> Result<Signature, ConfigError> {
        self.signature_with(name, cache::global())
    }

    pub fn signature_with(&self, name: &str, cache: &PatternCache) -> Result<Signature, ConfigError> {
        let source = self
            .signatures
            .get(name)
            .ok_or_else(|| ConfigError::UnknownSignature(name.to_string()))?;

        Signature::with_cache(name, source, cache).map_err(|source| ConfigError::Signature {
            name: name.to_string(),
            source,
        })
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        crate::utils::logging::level_from_str(&self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stride().unwrap().get(), 1);
    }

    #[test]
    fn test_zero_stride_rejected() {
        let config = Config::new().with_stride(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        assert!(config.stride().is_err());
    }

    #[test]
    fn test_bad_signature_rejected() {
        let config = Config::new().with_signature("broken", "48 &");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Signature { ref name, .. }) if name == "broken"
        ));
    }

    #[test]
    fn test_signature_lookup() {
        let config = Config::new().with_signature("prologue", "55 48 89 E5");
        let sig = config.signature("prologue").unwrap();
        assert_eq!(sig.pattern().len(), 4);
        assert!(matches!(
            config.signature("missing"),
            Err(ConfigError::UnknownSignature(_))
        ));
    }

    #[test]
    fn test_cache_capacity_bounds_cache() {
        let config: Config = serde_json::from_str(
            r#"{ "cache_capacity": 2, "signatures": { "a": "01", "b": "02", "c": "03" } }"#,
        )
        .unwrap();
        let cache = config.pattern_cache();
        assert_eq!(cache.capacity(), 2);

        for name in ["a", "b", "c"] {
            config.signature_with(name, &cache).unwrap();
            assert!(cache.size() <= 2);
        }
        assert!(cache.get("03").is_some());

        let config = Config { cache_capacity: 0, ..config };
        let cache = config.pattern_cache();
        config.signature_with("a", &cache).unwrap();
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "stride": 4, "signatures": { "ret": "C3" } }"#).unwrap();
        assert_eq!(config.stride, 4);
        assert!(config.parallel);
        assert_eq!(config.signatures["ret"], "C3");
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("sigscan-config-{}.json", std::process::id()));
        let config = Config::new().with_stride(2).with_signature("ret", "C3");
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.stride, 2);
        assert_eq!(loaded.signatures, config.signatures);

        std::fs::remove_file(&path).ok();
        assert!(matches!(Config::load(&path), Err(ConfigError::NotFound(_))));
    }
}
