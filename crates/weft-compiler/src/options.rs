//! Per-compilation options.

use serde::{Deserialize, Serialize};

/// The default locale used when the caller does not pick one.
pub const DEFAULT_LOCALE: &str = "en_US";

/// Options for one compilation: the active locale and the unsafe-mode seed.
///
/// The seed is combined with any `.unsafe_mode` section found in the source;
/// either one enables unsafe mode in the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerOptions {
    pub locale: String,
    pub unsafe_mode: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            unsafe_mode: false,
        }
    }
}

impl CompilerOptions {
    pub fn new(locale: impl Into<String>, unsafe_mode: bool) -> Self {
        Self {
            locale: locale.into(),
            unsafe_mode,
        }
    }

    /// Check a locale string against `^[a-z]{2}(_[A-Z]{2}(\.[a-zA-Z0-9-]+)?)?$`.
    ///
    /// Callers accepting locales from the outside (query parameters, CLI
    /// arguments) should reject anything this refuses before compiling.
    pub fn is_valid_locale(locale: &str) -> bool {
        let bytes = locale.as_bytes();
        if bytes.len() < 2 || !bytes[..2].iter().all(u8::is_ascii_lowercase) {
            return false;
        }
        let rest = &bytes[2..];
        if rest.is_empty() {
            return true;
        }
        if rest.len() < 3 || rest[0] != b'_' || !rest[1..3].iter().all(u8::is_ascii_uppercase) {
            return false;
        }
        let variant = &rest[3..];
        if variant.is_empty() {
            return true;
        }
        variant[0] == b'.'
            && variant.len() > 1
            && variant[1..]
                .iter()
                .all(|b| b.is_ascii_alphanumeric() || *b == b'-')
    }
}
