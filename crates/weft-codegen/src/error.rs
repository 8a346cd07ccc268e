//! Codegen error types.

use thiserror::Error;

/// Errors that can occur while generating the call protocol. These are
/// whole-program failures with no single source line to point at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// No constant-table section matched the active locale.
    #[error("no {table} section for the locale '{locale}' found in the program")]
    MissingLocale { table: &'static str, locale: String },

    /// Two sections of the same table kind matched the active locale.
    #[error("the locale '{locale}' was already defined for the {table} table")]
    DuplicateLocale { table: &'static str, locale: String },

    /// A key was defined twice within one table.
    #[error("the {table} table key {key} is already defined")]
    DuplicateKey { table: &'static str, key: i64 },

    /// The program has no code section labeled `main`.
    #[error("no \"main\" code section found in the program")]
    MissingMain,

    /// An internal consistency check failed.
    #[error("internal codegen error: {0}")]
    Internal(String),
}

/// Codegen result type alias.
pub type CodegenResult<T> = Result<T, CodegenError>;
