use serde::{Deserialize, Serialize};
use std::fmt;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Malformed source text: bad section headers, bad entry lines,
    /// unknown mnemonics, unparsable value references.
    Lexical,
    /// Token stream shape violations: unterminated blocks, render-only
    /// instructions outside render sections, reserved element names.
    Structural,
    /// Whole-program violations: locale resolution, duplicate keys,
    /// missing `main`.
    Semantic,
}

/// Numeric error code (E100–E399).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Lexical errors (E100–E199) ──
    pub const CONTENT_BEFORE_SECTION: Self = Self(100);
    pub const MISSING_SECTION_ARGUMENT: Self = Self(101);
    pub const UNKNOWN_SECTION_KIND: Self = Self(102);
    pub const MALFORMED_STRING_ENTRY: Self = Self(110);
    pub const MALFORMED_ROM_ENTRY: Self = Self(111);
    pub const BAD_ENTRY_KEY: Self = Self(112);
    pub const UNKNOWN_INSTRUCTION: Self = Self(120);
    pub const MISSING_ARGUMENT: Self = Self(121);
    pub const MALFORMED_VALUE_REF: Self = Self(122);
    pub const MALFORMED_OFFSET: Self = Self(123);

    // ── Structural errors (E200–E299) ──
    pub const UNEXPECTED_TOKEN: Self = Self(200);
    pub const UNTERMINATED_BLOCK: Self = Self(201);
    pub const RENDER_ONLY_INSTRUCTION: Self = Self(202);
    pub const RESERVED_ELEMENT_NAME: Self = Self(203);

    // ── Semantic errors (E300–E399) ──
    pub const MISSING_LOCALE: Self = Self(300);
    pub const DUPLICATE_LOCALE: Self = Self(301);
    pub const DUPLICATE_KEY: Self = Self(302);
    pub const MISSING_MAIN: Self = Self(303);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Lexical,
            200..=299 => ErrorCategory::Structural,
            _ => ErrorCategory::Semantic,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Structural => write!(f, "structural"),
            Self::Semantic => write!(f, "semantic"),
        }
    }
}

/// A structured weft compiler error.
///
/// Every stage is fail-fast: the first error aborts the compilation, so one
/// of these is the whole story. The host renders it — either via [`fmt::Display`]
/// or from the JSON form; it must not parse free-form strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeftError {
    /// Source file name.
    pub file: String,
    /// Error code (e.g., E120).
    pub code: ErrorCode,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// 1-based source line number. `None` for whole-program errors that
    /// have no single offending line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// The exact source line for context, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line: Option<String>,
}

impl WeftError {
    /// Create an error pinned to a source line.
    pub fn at_line(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        line: u32,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            category: code.category(),
            message: message.into(),
            line: Some(line),
            source_line: Some(source_line.into()),
        }
    }

    /// Create a whole-program error with no line position.
    pub fn semantic(file: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            code,
            category: code.category(),
            message: message.into(),
            line: None,
            source_line: None,
        }
    }
}

impl fmt::Display for WeftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(
                f,
                "{}:{}: {} [{}] {}",
                self.file, line, self.code, self.category, self.message
            ),
            None => write!(
                f,
                "{}: {} [{}] {}",
                self.file, self.code, self.category, self.message
            ),
        }
    }
}

impl std::error::Error for WeftError {}
