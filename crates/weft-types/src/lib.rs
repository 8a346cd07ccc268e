//! Shared types for the weft compiler.
//!
//! This crate defines the AST arena, value references, source handling,
//! and error types used across all compiler stages.

pub mod ast;
mod error;
mod source;
mod value;

pub use error::{ErrorCategory, ErrorCode, WeftError};
pub use source::SourceFile;
pub use value::{hex_literal, BadValueRef, ValueRef, ValueRefKind};

/// Result type used by the lexer and parser stages.
pub type Result<T> = std::result::Result<T, WeftError>;
