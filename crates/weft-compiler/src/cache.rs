//! Output cache keyed by a digest of the compilation inputs.
//!
//! Serving the same program repeatedly (one compilation per request) would
//! otherwise redo the whole pipeline. The cache key covers everything that
//! can change the output: source text, locale, and the unsafe-mode seed.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::options::CompilerOptions;

/// A cache of exported program text, keyed by input digest.
///
/// The cache is an explicit value the caller owns and passes around; the
/// pipeline itself never consults one.
#[derive(Debug, Clone, Default)]
pub struct CompileCache {
    entries: HashMap<[u8; 32], String>,
}

impl CompileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digest of every input that affects the output.
    pub fn key(source: &str, options: &CompilerOptions) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update([0]);
        hasher.update(options.locale.as_bytes());
        hasher.update([0, options.unsafe_mode as u8]);
        hasher.finalize().into()
    }

    pub fn get(&self, source: &str, options: &CompilerOptions) -> Option<&str> {
        self.entries
            .get(&Self::key(source, options))
            .map(String::as_str)
    }

    pub fn insert(&mut self, source: &str, options: &CompilerOptions, output: String) {
        self.entries.insert(Self::key(source, options), output);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_requires_same_inputs() {
        let mut cache = CompileCache::new();
        let en = CompilerOptions::new("en", false);
        cache.insert("source", &en, "output".to_string());

        assert_eq!(cache.get("source", &en), Some("output"));
        assert_eq!(cache.get("source ", &en), None);
        assert_eq!(cache.get("source", &CompilerOptions::new("cs", false)), None);
        assert_eq!(cache.get("source", &CompilerOptions::new("en", true)), None);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut cache = CompileCache::new();
        let options = CompilerOptions::default();
        cache.insert("x", &options, "one".to_string());
        cache.insert("x", &options, "two".to_string());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("x", &options), Some("two"));
    }

    #[test]
    fn test_key_separates_source_from_locale() {
        // "ab" + locale "c" must not collide with "a" + locale "bc".
        let a = CompileCache::key("ab", &CompilerOptions::new("c", false));
        let b = CompileCache::key("a", &CompilerOptions::new("bc", false));
        assert_ne!(a, b);
    }
}
